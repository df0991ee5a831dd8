use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResponderError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("upstream service unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("FAQ index not loaded: {0}")]
    IndexNotLoaded(String),
    #[error("FAQ index misaligned: {vectors} vectors but {records} metadata records")]
    IndexMisaligned { vectors: usize, records: usize },
    #[error("dimension mismatch: index holds {expected}-dimensional vectors, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("index encoding error: {0}")]
    Encoding(#[from] bincode::Error),
    #[error("template error: {0}")]
    Template(#[from] handlebars::TemplateError),
    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),
}

// every transport failure, timeouts included, is an upstream outage to callers
impl From<reqwest::Error> for ResponderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ResponderError::UpstreamUnavailable(format!("request timed out: {err}"))
        } else {
            ResponderError::UpstreamUnavailable(err.to_string())
        }
    }
}

impl ResponderError {
    /// Startup-time failures that must abort the process rather than degrade a request.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ResponderError::IndexNotLoaded(_) | ResponderError::IndexMisaligned { .. }
        )
    }
}
