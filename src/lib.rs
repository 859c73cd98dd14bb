//! Depset: verb dependency-set statistics over parsed corpora
//!
//! Two batch pipelines over dependency-annotated text:
//! - re-tagging CoNLL-U sentences into a word/tag table
//! - bucketing verbs by the relation labels of their dependents and
//!   reporting per-verb counts

pub mod accumulator; // lemma -> combination -> occurrences
pub mod conllu; // CoNLL-U file parsing
pub mod corpus; // Input format and backend selection
pub mod deprel; // Relation sets and combination keys
pub mod error;
pub mod filter; // Verb acceptance predicate
pub mod pos; // Coarse part-of-speech tags
pub mod report; // Dependency-set CSV reports
pub mod tagging; // Tag converter
pub mod tree; // Tree data structures

// spaCy backend
#[cfg(feature = "spacy")]
pub mod spacy;

// Re-exports for convenience
pub use accumulator::{Accumulator, Occurrence};
pub use conllu::CoNLLUReader;
pub use deprel::{CombinationKey, DepSetType, DependencySet};
pub use error::{Error, Result};
pub use filter::{Rejection, VerbFilter};
pub use pos::UPos;
pub use report::{ColumnSet, ReportWriter};
pub use tagging::{TagRow, Tagger};
pub use tree::{Document, Token, Tree, Word, WordId};
