use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefdataError {
    #[error("Request to the reference service failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Malformed reference payload: {0}")]
    Malformed(String),
}

impl RefdataError {
    /// Timeouts, connection resets and other transport failures may
    /// resolve on retry; a malformed payload will not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RefdataError::Request(_))
    }
}
