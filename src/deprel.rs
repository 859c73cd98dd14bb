//! Dependency-relation sets and combination keys
//!
//! A [`DependencySet`] is the set of relation labels a verb may carry as
//! dependents for the analysis to accept it. Accepted verbs are bucketed by a
//! [`CombinationKey`]: the sorted, deduplicated labels of their dependents.

use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rendering of the empty combination in every report
pub const NO_DEPS: &str = "NO_DEPS";

/// Separator between labels inside a combination key
pub const KEY_SEPARATOR: &str = "_";

/// Relations that mark a verb as a clausal modifier of its head
pub const CLAUSAL_MODIFIER_RELATIONS: [&str; 3] = ["relcl", "advcl", "acl"];

/// Relation label of punctuation dependents
pub const PUNCT_RELATION: &str = "punct";

/// Relation label of adjectival modifiers
pub const AMOD_RELATION: &str = "amod";

const NON_CLAUSAL_COMPLEMENTS: [&str; 8] = [
    "acomp",
    "attr",
    "dative",
    "dobj",
    "nsubj",
    "nsubjpass",
    "prep",
    "prt",
];

const CLAUSAL_COMPLEMENTS: [&str; 2] = ["ccomp", "xcomp"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("dep set type is not legal: {0:?} (expected NON_CLAUSAL or COMPLETE)")]
    UnknownDepSet(String),
}

/// Named dependency-relation set configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepSetType {
    /// Non-clausal complements only
    NonClausal,
    /// Non-clausal plus clausal complements
    Complete,
}

impl DepSetType {
    pub fn as_str(self) -> &'static str {
        match self {
            DepSetType::NonClausal => "NON_CLAUSAL",
            DepSetType::Complete => "COMPLETE",
        }
    }

    pub fn labels(self) -> Vec<&'static str> {
        match self {
            DepSetType::NonClausal => NON_CLAUSAL_COMPLEMENTS.to_vec(),
            DepSetType::Complete => NON_CLAUSAL_COMPLEMENTS
                .iter()
                .chain(CLAUSAL_COMPLEMENTS.iter())
                .copied()
                .collect(),
        }
    }

    pub fn dependency_set(self) -> DependencySet {
        DependencySet::new(self.labels())
    }
}

impl FromStr for DepSetType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NON_CLAUSAL" => Ok(DepSetType::NonClausal),
            "COMPLETE" => Ok(DepSetType::Complete),
            other => Err(ConfigError::UnknownDepSet(other.to_string())),
        }
    }
}

impl fmt::Display for DepSetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of relation labels accepted as verb dependents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySet {
    labels: BTreeSet<String>,
}

impl DependencySet {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// True when every label is in the set
    pub fn accepts_all<'a, I>(&self, labels: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        labels.into_iter().all(|label| self.contains(label))
    }

    /// Every subset of the set as a combination key
    ///
    /// Ordered by subset size, then lexicographically over the sorted
    /// labels, so the empty combination comes first. Reports use this order
    /// for rows and columns.
    pub fn combinations(&self) -> Vec<CombinationKey> {
        (0..=self.labels.len())
            .flat_map(|k| {
                self.labels
                    .iter()
                    .combinations(k)
                    .map(|subset| CombinationKey(subset.into_iter().join(KEY_SEPARATOR)))
            })
            .collect()
    }
}

/// Order-independent identifier for a set of relation labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CombinationKey(String);

impl CombinationKey {
    /// Sort and deduplicate the labels, then join them
    pub fn from_labels<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let set: BTreeSet<&str> = labels.into_iter().collect();
        CombinationKey(set.into_iter().join(KEY_SEPARATOR))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw joined labels; empty for no dependents
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Report name: the joined labels, or `NO_DEPS`
    pub fn display_name(&self) -> &str {
        if self.0.is_empty() { NO_DEPS } else { &self.0 }
    }
}

impl fmt::Display for CombinationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
