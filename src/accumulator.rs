//! Per-lemma, per-combination collection of accepted verb occurrences

use crate::deprel::CombinationKey;
use crate::filter::{Rejection, VerbFilter};
use crate::tree::{Document, Tree};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

/// One accepted verb in context
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub verb_form: String,
    pub doc_index: usize,
    pub sent_index: usize,
    pub sentence: String,
}

/// Occurrences of one lemma, bucketed by combination key
pub type Buckets = FxHashMap<CombinationKey, Vec<Occurrence>>;

/// lemma -> combination key -> occurrences
///
/// Lemmas iterate in first-seen order.
#[derive(Debug, Default)]
pub struct Accumulator {
    lemmas: IndexMap<String, Buckets>,
    rejections: FxHashMap<Rejection, usize>,
    candidates: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one accepted occurrence
    pub fn insert(&mut self, lemma: &str, key: CombinationKey, occurrence: Occurrence) {
        if !self.lemmas.contains_key(lemma) {
            self.lemmas.insert(lemma.to_string(), Buckets::default());
        }
        self.lemmas[lemma].entry(key).or_default().push(occurrence);
    }

    /// Run the filter over every word of a sentence
    pub fn add_sentence(
        &mut self,
        filter: &VerbFilter,
        tree: &Tree,
        doc_index: usize,
        sent_index: usize,
    ) {
        let mut sentence = None;
        for word in &tree.words {
            self.candidates += 1;
            match filter.evaluate(tree, word) {
                Ok(key) => {
                    let sentence = sentence.get_or_insert_with(|| tree.text()).clone();
                    self.insert(
                        &word.lemma,
                        key,
                        Occurrence {
                            verb_form: word.form.clone(),
                            doc_index,
                            sent_index,
                            sentence,
                        },
                    );
                }
                Err(Rejection::NotVerb) => {
                    *self.rejections.entry(Rejection::NotVerb).or_default() += 1;
                }
                Err(reason) => {
                    log::debug!(
                        "doc {} sent {}: rejected {:?} ({})",
                        doc_index,
                        sent_index,
                        word.form,
                        reason
                    );
                    *self.rejections.entry(reason).or_default() += 1;
                }
            }
        }
    }

    pub fn add_document(&mut self, filter: &VerbFilter, document: &Document, doc_index: usize) {
        for (sent_index, tree) in document.sentences.iter().enumerate() {
            self.add_sentence(filter, tree, doc_index, sent_index);
        }
    }

    /// Build an accumulator from a whole document collection
    pub fn from_documents<'a, I>(filter: &VerbFilter, documents: I) -> Self
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut acc = Self::new();
        for (doc_index, document) in documents.into_iter().enumerate() {
            acc.add_document(filter, document, doc_index);
        }
        acc
    }

    pub fn lemmas(&self) -> impl Iterator<Item = (&str, &Buckets)> {
        self.lemmas.iter().map(|(lemma, buckets)| (lemma.as_str(), buckets))
    }

    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }

    /// Occurrences of a lemma under a key; empty when none were recorded
    pub fn occurrences(&self, lemma: &str, key: &CombinationKey) -> &[Occurrence] {
        self.lemmas
            .get(lemma)
            .and_then(|buckets| buckets.get(key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Bucket size, with a missing bucket counting as zero
    pub fn count(&self, lemma: &str, key: &CombinationKey) -> usize {
        self.occurrences(lemma, key).len()
    }

    /// All occurrences of a lemma across buckets
    pub fn total(&self, lemma: &str) -> usize {
        self.lemmas
            .get(lemma)
            .map(|buckets| buckets.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    pub fn accepted(&self) -> usize {
        self.lemmas.keys().map(|lemma| self.total(lemma)).sum()
    }

    pub fn rejected(&self, reason: Rejection) -> usize {
        self.rejections.get(&reason).copied().unwrap_or(0)
    }

    /// Number of tokens inspected
    pub fn candidates(&self) -> usize {
        self.candidates
    }

    pub fn log_summary(&self) {
        log::info!(
            "{} tokens inspected, {} verb occurrences accepted across {} lemmas",
            self.candidates,
            self.accepted(),
            self.len()
        );
        for reason in Rejection::ALL {
            log::info!("  rejected ({}): {}", reason, self.rejected(reason));
        }
    }
}
