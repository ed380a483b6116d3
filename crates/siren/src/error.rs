pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("every candidate algorithm failed all of its trials")]
    NoUsableAlgorithm,

    #[error("layout algorithm {algorithm} failed: {message}")]
    AlgorithmFailure { algorithm: String, message: String },

    #[error("layout is missing a position for node {node}")]
    MissingPosition { node: String },

    #[error("evaluation cancelled")]
    Cancelled,
}

impl Error {
    pub(crate) fn invalid_configuration(reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}
