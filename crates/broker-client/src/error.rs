use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Failed to build the HTTP client: {0}")]
    ClientBuild(String),

    #[error("Failed to send the API request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The API request returned HTTP {0}: {1}")]
    Api(reqwest::StatusCode, String),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from API: {0}")]
    InvalidData(String),
}
