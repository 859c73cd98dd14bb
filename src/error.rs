//! Crate-wide error type

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] crate::conllu::ParseError),

    #[error(transparent)]
    Config(#[from] crate::deprel::ConfigError),

    #[error(transparent)]
    Tagging(#[from] crate::tagging::TaggingError),

    #[error(transparent)]
    Corpus(#[from] crate::corpus::CorpusError),

    #[error(transparent)]
    Report(#[from] crate::report::ReportError),
}

pub type Result<T> = std::result::Result<T, Error>;
