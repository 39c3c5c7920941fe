//! Page sources: where positioned words come from.
//!
//! The extractor only needs [`Page`]s. Anything that can produce them
//! implements [`PageSource`]: in-memory pages (tests, callers with their own
//! PDF stack) or the bundled [`LopdfPageSource`].

pub mod lopdf_source;

pub use lopdf_source::LopdfPageSource;

use crate::error::Result;
use crate::layout::Page;

/// Producer of decoded pages in document order.
pub trait PageSource {
    /// Decode all pages.
    ///
    /// Unparseable input fails with
    /// [`Error::MalformedDocument`](crate::Error::MalformedDocument); a single
    /// page that cannot be read yields an empty page instead.
    fn load_pages(&self) -> Result<Vec<Page>>;
}

impl PageSource for Vec<Page> {
    fn load_pages(&self) -> Result<Vec<Page>> {
        Ok(self.clone())
    }
}

impl PageSource for [Page] {
    fn load_pages(&self) -> Result<Vec<Page>> {
        Ok(self.to_vec())
    }
}
