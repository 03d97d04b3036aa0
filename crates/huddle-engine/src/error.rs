//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode of startup and the command
//! session. Rejected commands are not errors here; they are reported on
//! the output stream and the session continues.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: huddle_core::config::ConfigError,
    },

    /// Loading or saving the data file failed.
    #[error("persistence error: {source}")]
    Persistence {
        /// The underlying persistence error.
        #[from]
        source: huddle_core::persistence::PersistenceError,
    },

    /// Reading commands or writing responses failed.
    #[error("session I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A response could not be encoded.
    #[error("failed to encode response: {source}")]
    Encode {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
