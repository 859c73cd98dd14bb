//! Input selection for both pipelines
//!
//! Picks a document loader by file extension and a tagger by build
//! features. CoNLL-U input works in every build; spaCy DocBins and spaCy
//! tagging need the `spacy` feature.

use crate::conllu::{self, CoNLLUReader, ParseError};
use crate::tagging::Tagger;
use crate::tree::Document;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Unsupported corpus format: {0} (expected .conllu, .conll, .gz or .spacy)")]
    UnsupportedFormat(String),

    #[error("{0} requires building with the `spacy` feature")]
    SpacyDisabled(String),

    #[error("spaCy error: {0}")]
    Spacy(String),
}

/// A count limit from the command line; `None` means no limit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limit(pub Option<usize>);

impl FromStr for Limit {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "None" {
            Ok(Limit(None))
        } else {
            s.parse().map(|n| Limit(Some(n)))
        }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(n) => write!(f, "{}", n),
            None => f.write_str("None"),
        }
    }
}

/// Document collection formats we can read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusFormat {
    CoNLLU,
    DocBin,
}

impl CorpusFormat {
    pub fn from_path(path: &Path) -> Result<Self, CorpusError> {
        let name = path.to_string_lossy();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("conllu" | "conll" | "gz") => Ok(CorpusFormat::CoNLLU),
            Some("spacy") => Ok(CorpusFormat::DocBin),
            _ => Err(CorpusError::UnsupportedFormat(name.into_owned())),
        }
    }
}

/// Load up to `max_docs` documents from a parsed corpus
///
/// `model` names the spaCy model whose vocabulary a DocBin needs; CoNLL-U
/// input ignores it.
pub fn load_documents(
    path: &Path,
    model: &str,
    max_docs: Option<usize>,
) -> Result<Vec<Document>, CorpusError> {
    let mut documents = match CorpusFormat::from_path(path)? {
        CorpusFormat::CoNLLU => conllu::read_documents(path)?,
        CorpusFormat::DocBin => load_docbin(path, model, max_docs)?,
    };
    if let Some(max) = max_docs {
        documents.truncate(max);
    }
    log::info!(
        "loaded {} documents ({} sentences) from {}",
        documents.len(),
        documents.iter().map(|doc| doc.sentences.len()).sum::<usize>(),
        path.display()
    );
    Ok(documents)
}

#[cfg(feature = "spacy")]
fn load_docbin(
    path: &Path,
    model: &str,
    max_docs: Option<usize>,
) -> Result<Vec<Document>, CorpusError> {
    crate::spacy::load_docbin(path, model, max_docs).map_err(CorpusError::Spacy)
}

#[cfg(not(feature = "spacy"))]
fn load_docbin(
    path: &Path,
    _model: &str,
    _max_docs: Option<usize>,
) -> Result<Vec<Document>, CorpusError> {
    Err(CorpusError::SpacyDisabled(format!(
        "Reading {}",
        path.display()
    )))
}

/// Sentences of a CoNLL-U file, for re-tagging
pub fn read_sentences(path: &Path) -> Result<CoNLLUReader<Box<dyn std::io::BufRead>>, CorpusError> {
    CoNLLUReader::from_file(path)
        .map_err(|source| CorpusError::Parse(ParseError::Io { line_num: 0, source }))
}

/// The tagger backend for this build
#[cfg(feature = "spacy")]
pub fn load_tagger(model: &str) -> Result<Box<dyn Tagger>, crate::Error> {
    Ok(Box::new(crate::spacy::SpacyTagger::load(model)?))
}

/// The tagger backend for this build
#[cfg(not(feature = "spacy"))]
pub fn load_tagger(model: &str) -> Result<Box<dyn Tagger>, crate::Error> {
    Err(CorpusError::SpacyDisabled(format!("Tagging with {}", model)).into())
}
