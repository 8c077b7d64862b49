use perch_core::PlacementError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config could not be serialized: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error("unknown log level `{0}`")]
    InvalidLogLevel(String),
    #[error("logger already installed")]
    Logger(#[from] log::SetLoggerError),
    /// The session that owned the command queue has been dropped.
    #[error("session is closed")]
    SessionClosed,
    #[error("asset load failed: {0}")]
    AssetLoad(String),
}
