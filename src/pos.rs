//! Coarse part-of-speech categories
//!
//! The Universal Dependencies UPOS inventory, plus spaCy's `SPACE` tag for
//! whitespace tokens. Parsers and taggers hand us strings; everything past
//! the reader works with [`UPos`].

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown part-of-speech tag: {0:?}")]
pub struct UnknownTag(pub String);

/// Coarse part-of-speech tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UPos {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    X,
    Space,
}

impl UPos {
    pub const ALL: [UPos; 18] = [
        UPos::Adj,
        UPos::Adp,
        UPos::Adv,
        UPos::Aux,
        UPos::Cconj,
        UPos::Det,
        UPos::Intj,
        UPos::Noun,
        UPos::Num,
        UPos::Part,
        UPos::Pron,
        UPos::Propn,
        UPos::Punct,
        UPos::Sconj,
        UPos::Sym,
        UPos::Verb,
        UPos::X,
        UPos::Space,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UPos::Adj => "ADJ",
            UPos::Adp => "ADP",
            UPos::Adv => "ADV",
            UPos::Aux => "AUX",
            UPos::Cconj => "CCONJ",
            UPos::Det => "DET",
            UPos::Intj => "INTJ",
            UPos::Noun => "NOUN",
            UPos::Num => "NUM",
            UPos::Part => "PART",
            UPos::Pron => "PRON",
            UPos::Propn => "PROPN",
            UPos::Punct => "PUNCT",
            UPos::Sconj => "SCONJ",
            UPos::Sym => "SYM",
            UPos::Verb => "VERB",
            UPos::X => "X",
            UPos::Space => "SPACE",
        }
    }

    /// Punctuation and whitespace carry no syntactic content for our purposes
    #[inline]
    pub fn is_irrelevant(self) -> bool {
        matches!(self, UPos::Punct | UPos::Space)
    }
}

impl FromStr for UPos {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Unannotated fields fall into the catch-all category
        if s.is_empty() || s == "_" {
            return Ok(UPos::X);
        }
        UPos::ALL
            .iter()
            .copied()
            .find(|pos| pos.as_str() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

impl fmt::Display for UPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
