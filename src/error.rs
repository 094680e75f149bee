use thiserror::Error;

#[derive(Error, Debug)]
pub enum VarioError {
    #[error("Pressure sensor not detected: {0}")]
    SensorInit(String),

    #[error("Settings store error: {0}")]
    Store(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Audio output error: {0}")]
    Audio(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Pressure trace line {line}: {message}")]
    Trace { line: usize, message: String },

    #[error("Button script line {line}: {message}")]
    Script { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, VarioError>;
