use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (negative tolerance, blank company name, etc.).
    ConfigValidation(String),
    /// Fixture text is structurally invalid (not a JSON array, bad CSV row, ...).
    FixtureParse { source: String, message: String },
    /// Two records in the same pool share an id.
    DuplicateId { source: String, id: String },
    /// Unsupported fixture file extension.
    UnsupportedFormat(String),
    /// IO error (file read, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::FixtureParse { source, message } => {
                write!(f, "{source}: cannot parse records: {message}")
            }
            Self::DuplicateId { source, id } => {
                write!(f, "{source}: duplicate record id '{id}'")
            }
            Self::UnsupportedFormat(path) => {
                write!(f, "unsupported input format: {path} (expected .json or .csv)")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
