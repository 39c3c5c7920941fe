//! Configuration for header/footer detection and position clustering.
//!
//! Thresholds are fractions of page height unless noted otherwise. Every field
//! can be overridden independently, either through the `with_*` builders or by
//! deserializing a partial JSON object (missing keys keep their defaults).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Extraction thresholds passed by value into every component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Top band of the page considered for running headers (default 0.12).
    pub header_threshold: f64,

    /// Relative top beyond which repeated text may be a footer (default 0.88).
    pub footer_threshold: f64,

    /// Fraction of pages a footer candidate must appear on (default 0.25).
    pub min_repetition_ratio: f64,

    /// Maximum distance between positions in one cluster (default 0.02).
    pub clustering_threshold: f64,

    /// Clusters smaller than this are discarded (default 2).
    pub min_cluster_size: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorConfig {
    /// Default top band for running headers.
    pub const HEADER_THRESHOLD: f64 = 0.12;
    /// Default bottom band for footers.
    pub const FOOTER_THRESHOLD: f64 = 0.88;
    /// Default minimum repetition ratio.
    pub const MIN_REPETITION_RATIO: f64 = 0.25;
    /// Default clustering distance.
    pub const CLUSTERING_THRESHOLD: f64 = 0.02;
    /// Default minimum cluster size.
    pub const MIN_CLUSTER_SIZE: usize = 2;

    /// Create a configuration with the default thresholds.
    pub fn new() -> Self {
        Self {
            header_threshold: Self::HEADER_THRESHOLD,
            footer_threshold: Self::FOOTER_THRESHOLD,
            min_repetition_ratio: Self::MIN_REPETITION_RATIO,
            clustering_threshold: Self::CLUSTERING_THRESHOLD,
            min_cluster_size: Self::MIN_CLUSTER_SIZE,
        }
    }

    /// Override the header band.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_textflow::ExtractorConfig;
    ///
    /// let config = ExtractorConfig::new().with_header_threshold(0.2);
    /// assert_eq!(config.header_threshold, 0.2);
    /// assert_eq!(config.footer_threshold, 0.88);
    /// ```
    pub fn with_header_threshold(mut self, value: f64) -> Self {
        self.header_threshold = value;
        self
    }

    /// Override the footer band.
    pub fn with_footer_threshold(mut self, value: f64) -> Self {
        self.footer_threshold = value;
        self
    }

    /// Override the minimum repetition ratio.
    pub fn with_min_repetition_ratio(mut self, value: f64) -> Self {
        self.min_repetition_ratio = value;
        self
    }

    /// Override the clustering distance.
    pub fn with_clustering_threshold(mut self, value: f64) -> Self {
        self.clustering_threshold = value;
        self
    }

    /// Override the minimum cluster size.
    pub fn with_min_cluster_size(mut self, value: usize) -> Self {
        self.min_cluster_size = value;
        self
    }

    /// Parse a (possibly partial) JSON object and validate it.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_textflow::ExtractorConfig;
    ///
    /// let config = ExtractorConfig::from_json_str(r#"{"footer_threshold": 0.9}"#).unwrap();
    /// assert_eq!(config.footer_threshold, 0.9);
    /// assert_eq!(config.header_threshold, 0.12);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the threshold invariants.
    ///
    /// Requires `0 < header_threshold < footer_threshold < 1`,
    /// `0 < min_repetition_ratio <= 1`, a positive clustering threshold and a
    /// minimum cluster size of at least one. NaN fails every check.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<()> {
        if !(self.header_threshold > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "header_threshold must be > 0, got {}",
                self.header_threshold
            )));
        }
        if !(self.header_threshold < self.footer_threshold) {
            return Err(Error::InvalidConfig(format!(
                "header_threshold ({}) must be below footer_threshold ({})",
                self.header_threshold, self.footer_threshold
            )));
        }
        if !(self.footer_threshold < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "footer_threshold must be < 1, got {}",
                self.footer_threshold
            )));
        }
        if !(self.min_repetition_ratio > 0.0 && self.min_repetition_ratio <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "min_repetition_ratio must be in (0, 1], got {}",
                self.min_repetition_ratio
            )));
        }
        if !(self.clustering_threshold > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "clustering_threshold must be > 0, got {}",
                self.clustering_threshold
            )));
        }
        if self.min_cluster_size == 0 {
            return Err(Error::InvalidConfig("min_cluster_size must be at least 1".into()));
        }
        Ok(())
    }
}
