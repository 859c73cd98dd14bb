//! spaCy backend through pyo3
//!
//! Two entry points: [`SpacyTagger`] re-tags whitespace-tokenized sentences,
//! and [`load_docbin`] turns a serialized `DocBin` into [`Document`]s.
//! Both need a Python environment with spaCy and the requested model.

use crate::pos::UPos;
use crate::tagging::{Tagger, TaggingError};
use crate::tree::{Document, Tree, Word};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::collections::HashMap;
use std::path::Path;

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "en_core_web_lg";

/// Helper macro for PyO3 error mapping
macro_rules! py_err {
    ($operation:expr, $e:expr) => {
        format!("Failed to {}: {}", $operation, $e)
    };
}

fn load_model<'py>(py: Python<'py>, model_name: &str) -> Result<Bound<'py, PyAny>, String> {
    let spacy = py.import("spacy").map_err(|e| {
        format!(
            "Failed to import spacy: {}. Make sure spacy is installed: pip install spacy",
            e
        )
    })?;
    spacy.call_method1("load", (model_name,)).map_err(|e| {
        format!(
            "Failed to load SpaCy model '{}': {}. Download it with: python -m spacy download {}",
            model_name, e, model_name
        )
    })
}

fn to_upos(tag: &str) -> PyResult<UPos> {
    tag.parse::<UPos>()
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Tagger that runs a spaCy pipeline over pre-split words
///
/// The `Doc` is built directly from the given words, so spaCy's own
/// tokenizer never runs and token count always equals word count.
pub struct SpacyTagger {
    nlp: Py<PyAny>,
}

impl SpacyTagger {
    pub fn load(model_name: &str) -> Result<Self, TaggingError> {
        Python::attach(|py| {
            let nlp = load_model(py, model_name).map_err(TaggingError::Backend)?;
            log::info!("loaded spaCy model {}", model_name);
            Ok(Self { nlp: nlp.unbind() })
        })
    }

    fn run<'py>(&self, py: Python<'py>, tokens: &[&str]) -> PyResult<Vec<UPos>> {
        let nlp = self.nlp.bind(py);
        let doc_class = py.import("spacy.tokens")?.getattr("Doc")?;

        let kwargs = PyDict::new(py);
        kwargs.set_item("words", tokens.to_vec())?;
        kwargs.set_item("spaces", vec![true; tokens.len()])?;
        let mut doc = doc_class.call((nlp.getattr("vocab")?,), Some(&kwargs))?;

        for component in nlp.getattr("pipeline")?.try_iter()? {
            let process = component?.get_item(1)?;
            doc = process.call1((doc,))?;
        }

        let mut tags = Vec::with_capacity(tokens.len());
        for token in doc.try_iter()? {
            let pos = token?.getattr("pos_")?.extract::<String>()?;
            tags.push(to_upos(&pos)?);
        }
        Ok(tags)
    }
}

impl Tagger for SpacyTagger {
    fn tag(&mut self, tokens: &[&str]) -> Result<Vec<UPos>, TaggingError> {
        Python::attach(|py| self.run(py, tokens))
            .map_err(|e| TaggingError::Backend(py_err!("tag sentence", e)))
    }
}

fn convert_sentence(sent: &Bound<'_, PyAny>) -> PyResult<Tree> {
    let start = sent.getattr("start")?.extract::<usize>()?;
    let text = sent.getattr("text")?.extract::<String>()?;
    let mut tree = Tree::with_metadata(Some(text), HashMap::new());

    for (id, token) in sent.try_iter()?.enumerate() {
        let token = token?;
        let form = token.getattr("text")?.extract::<String>()?;
        let lemma = token.getattr("lemma_")?.extract::<String>()?;
        let upos = to_upos(&token.getattr("pos_")?.extract::<String>()?)?;
        let deprel = token.getattr("dep_")?.extract::<String>()?;
        let tag = token.getattr("tag_")?.extract::<String>()?;
        let whitespace = token.getattr("whitespace_")?.extract::<String>()?;
        let head = token.getattr("head")?.getattr("i")?.extract::<usize>()?;

        let mut word = Word::new(id, &form, &lemma, upos, &deprel);
        if !tag.is_empty() {
            word = word.with_xpos(&tag);
        }
        if whitespace.is_empty() {
            word.misc.insert("SpaceAfter".to_string(), "No".to_string());
        }
        // spaCy heads are document offsets; roots point at themselves
        word.head = head.checked_sub(start);
        tree.add_word(word);
    }

    tree.link();
    Ok(tree)
}

fn convert_doc(doc: &Bound<'_, PyAny>) -> PyResult<Document> {
    let mut sentences = Vec::new();
    for sent in doc.getattr("sents")?.try_iter()? {
        sentences.push(convert_sentence(&sent?)?);
    }
    Ok(Document::new(sentences))
}

/// Load up to `max_docs` documents from a `.spacy` DocBin file
///
/// The model supplies the vocabulary the DocBin was serialized against.
pub fn load_docbin(
    path: &Path,
    model_name: &str,
    max_docs: Option<usize>,
) -> Result<Vec<Document>, String> {
    Python::attach(|py| {
        let nlp = load_model(py, model_name)?;
        let read = || -> PyResult<Vec<Document>> {
            let doc_bin = py.import("spacy.tokens")?.getattr("DocBin")?.call0()?;
            let doc_bin = doc_bin.call_method1("from_disk", (path.to_string_lossy().into_owned(),))?;
            let docs = doc_bin.call_method1("get_docs", (nlp.getattr("vocab")?,))?;

            let mut documents = Vec::new();
            for doc in docs.try_iter()? {
                if max_docs.is_some_and(|max| documents.len() >= max) {
                    break;
                }
                documents.push(convert_doc(&doc?)?);
            }
            Ok(documents)
        };
        read().map_err(|e| py_err!(format!("read DocBin {}", path.display()), e))
    })
}
