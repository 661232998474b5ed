//! Error types shared across the pinfile library.

/// All errors that can occur while parsing or validating a manifest.
#[derive(thiserror::Error, Debug)]
pub enum PinError {
    #[error("invalid version: {0}")]
    Version(String),

    #[error("invalid package name: {0}")]
    Name(String),

    #[error("unsupported specifier '{op}': only exact '==' pins are allowed")]
    Specifier { op: String },

    #[error("environment markers are not supported: '{0}'")]
    Marker(String),

    #[error("unsupported requirement syntax: {0}")]
    Syntax(String),

    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<PinError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PinError {
    /// Attach a 1-based source line number to an error.
    pub fn at_line(self, line: usize) -> PinError {
        match self {
            PinError::Line { .. } => self,
            other => PinError::Line {
                line,
                source: Box::new(other),
            },
        }
    }

    /// The source line this error points at, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            PinError::Line { line, .. } => Some(*line),
            _ => None,
        }
    }
}
