use thiserror::Error;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to build the HTTP client: {0}")]
    ClientBuild(String),

    #[error("Failed to send the sheets API request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The sheets API returned an error: {0}")]
    Api(String),
}
