use std::fmt;

/// Top-level error type for the spectro-core public API.
#[derive(Debug)]
pub enum SpectroError {
    /// The audio source could not be located or opened.
    InputUnavailable(String),
    /// Chunk count, level count or the derived chunk size resolve to zero.
    InvalidConfig(String),
    /// The sample buffer does not match its declared stream layout.
    InvalidInput(String),
    /// FFT misuse (e.g. a non-power-of-two transform length).
    Dsp(String),
}

impl fmt::Display for SpectroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpectroError::InputUnavailable(msg) => write!(f, "input unavailable: {}", msg),
            SpectroError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            SpectroError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            SpectroError::Dsp(msg) => write!(f, "DSP error: {}", msg),
        }
    }
}

impl std::error::Error for SpectroError {}

/// Convenience alias so callers can write `Result<T>` instead of `Result<T, SpectroError>`.
pub type Result<T> = std::result::Result<T, SpectroError>;
