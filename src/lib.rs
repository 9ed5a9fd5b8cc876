//! PriceBot processor library
//!
//! A Rust library for cleaning property valuation reports and estimating
//! property values against a scraped comparables database.
//!
//! This library provides tools for:
//! - Filling gaps in hierarchical address columns from a canonical gazetteer
//! - Selecting comparable listings by area window and location cascade
//! - Fencing price outliers with an interquartile-range filter
//! - Writing valuation results back into the report atomically
//! - Consolidating per-region scraped CSV files into one reference table

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod cleaner;
        pub mod comparables;
        pub mod gazetteer;
        pub mod merger;
        pub mod normalizer;
        pub mod numeric;
        pub mod report;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Address, AddressLevel, Valuation};
pub use config::MatchingConfig;

/// Result type alias for the PriceBot processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for report cleaning and valuation operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV error in file '{file}': {message}")]
    Csv {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Configuration error (bad arguments, malformed reference file)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A required column is absent from a tabular input
    #[error("Missing required column '{column}' in file '{file}'")]
    MissingColumn { file: String, column: String },

    /// Input or reference file not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// The report file is open in another application
    #[error(
        "Cannot write report '{path}': the file is locked. \
         Close it in the other application and run the command again."
    )]
    ReportLocked { path: String },

    /// Invalid glob pattern for region file discovery
    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::Csv {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a missing column error
    pub fn missing_column(file: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            file: file.into(),
            column: column.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a report locked error
    pub fn report_locked(path: impl Into<String>) -> Self {
        Self::ReportLocked { path: path.into() }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::Csv {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<glob::GlobError> for Error {
    fn from(error: glob::GlobError) -> Self {
        Self::Io {
            message: "Directory scan failed".to_string(),
            source: error.into(),
        }
    }
}
