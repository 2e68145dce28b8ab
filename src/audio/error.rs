use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AudioError {
    #[error("Audio output device error: {0}")]
    Device(String),

    #[error("Could not decode the stream: {0}")]
    Decode(String),

    #[error("{0}")]
    Download(String),
}
