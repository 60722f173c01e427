use sea_spool_types::SpoolErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpErr {
    #[error("Request Error: {0}")]
    Request(#[source] reqwest::Error),
    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },
    /// The response body broke off; the download can be restarted.
    #[error("Payload Error: {0}")]
    Payload(Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Error, Debug)]
pub enum DriverErr<E: std::error::Error> {
    #[error("HttpErr: {0}")]
    Http(#[from] HttpErr),
    #[error("SpoolErr: {0}")]
    Sink(SpoolErr<E>),
}

impl HttpErr {
    pub fn payload<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
        Self::Payload(Box::new(e))
    }

    /// Only payload errors are worth a retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Payload(_))
    }
}
