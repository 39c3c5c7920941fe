//! Extract layout-aware text from a PDF
//!
//! Prints reading-order lines (default), HTML or JSON nodes.
//!
//! Usage:
//!   cargo run --release --bin pdf_textflow -- report.pdf
//!   cargo run --release --bin pdf_textflow -- report.pdf --html --page-numbers
//!   cargo run --release --bin pdf_textflow -- report.pdf --json --config thresholds.json -v

use pdf_textflow::{ExtractorConfig, PdfTextExtractor};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Lines,
    Html,
    Json,
}

struct CliConfig {
    input: PathBuf,
    mode: OutputMode,
    include_page_numbers: bool,
    config_path: Option<PathBuf>,
    verbose: bool,
}

impl CliConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut input = None;
        let mut mode = OutputMode::Lines;
        let mut include_page_numbers = false;
        let mut config_path = None;
        let mut verbose = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--html" => mode = OutputMode::Html,
                "--json" => mode = OutputMode::Json,
                "--page-numbers" => include_page_numbers = true,
                "--config" => {
                    i += 1;
                    match args.get(i) {
                        Some(path) => config_path = Some(PathBuf::from(path)),
                        None => return Err("--config requires a file argument".to_string()),
                    }
                },
                "--verbose" | "-v" => verbose = true,
                "--help" | "-h" => return Err(usage()),
                other if other.starts_with('-') => {
                    return Err(format!("Unknown option: {other}\n{}", usage()));
                },
                other => input = Some(PathBuf::from(other)),
            }
            i += 1;
        }

        let input = input.ok_or_else(usage)?;
        Ok(Self {
            input,
            mode,
            include_page_numbers,
            config_path,
            verbose,
        })
    }
}

fn usage() -> String {
    "Usage: pdf_textflow <file.pdf> [--html] [--json] [--page-numbers] [--config FILE] [-v]"
        .to_string()
}

fn run(cli: &CliConfig) -> pdf_textflow::Result<String> {
    let config = match &cli.config_path {
        Some(path) => ExtractorConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => ExtractorConfig::default(),
    };

    let extractor = PdfTextExtractor::open(&cli.input, config)?;
    log::info!(
        "Loaded {} ({} pages)",
        cli.input.display(),
        extractor.page_count()
    );

    if cli.verbose {
        let (headers, footers) = extractor.detect_headers_footers();
        log::info!("Running headers: {:?}", headers);
        log::info!("Running footers: {:?}", footers);
    }

    match cli.mode {
        OutputMode::Lines => Ok(extractor.extract_lines(cli.include_page_numbers).join("\n")),
        OutputMode::Html => extractor.extract_html_default(cli.include_page_numbers),
        OutputMode::Json => {
            let nodes = extractor.extract_nodes(cli.include_page_numbers);
            Ok(serde_json::to_string_pretty(&nodes)?)
        },
    }
}

fn main() -> ExitCode {
    let cli = match CliConfig::from_args() {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        },
    };

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match run(&cli) {
        Ok(output) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{output}") {
                eprintln!("Error writing output: {e}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}
