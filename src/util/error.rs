// logmonitor - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.
//
// Parse errors are deliberately NOT part of this hierarchy: they borrow the
// offending line, are counted by the reader worker, and never cross a thread
// boundary (see core::parser::ParseError).

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for the monitor pipeline.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum MonitorError {
    /// The log file could not be opened or created at startup.
    Open { path: PathBuf, source: io::Error },

    /// The tailer hit an I/O error it cannot recover from. Latched by the
    /// async buffer and surfaced to the scheduler at the next buffer swap.
    TailLost { path: PathBuf, source: io::Error },

    /// The terminal could not be initialised or written to.
    Render { source: io::Error },
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "cannot open log file '{}': {source}", path.display())
            }
            Self::TailLost { path, source } => {
                write!(f, "lost track of log file '{}': {source}", path.display())
            }
            Self::Render { source } => write!(f, "terminal render error: {source}"),
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::TailLost { source, .. } => Some(source),
            Self::Render { source } => Some(source),
        }
    }
}

/// Convenience type alias for monitor results.
pub type Result<T> = std::result::Result<T, MonitorError>;
