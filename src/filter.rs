//! Verb acceptance and dependent filtering
//!
//! Decides, per verb, whether it goes into the dependency-set statistics and
//! which of its dependents make up its combination key.

use crate::deprel::{
    AMOD_RELATION, CLAUSAL_MODIFIER_RELATIONS, CombinationKey, DependencySet, PUNCT_RELATION,
};
use crate::pos::UPos;
use crate::tree::{Tree, Word};
use std::fmt;

/// Why a candidate token was left out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rejection {
    /// Not a VERB, or not purely alphabetic
    NotVerb,
    /// Attached to its head as relcl, advcl or acl
    ClausalModifier,
    /// Participle used as an adjective on a noun
    AdjectivalModifier,
    /// Has a dependent outside the configured set
    DisallowedDependents,
}

impl Rejection {
    pub const ALL: [Rejection; 4] = [
        Rejection::NotVerb,
        Rejection::ClausalModifier,
        Rejection::AdjectivalModifier,
        Rejection::DisallowedDependents,
    ];
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rejection::NotVerb => "not a verb",
            Rejection::ClausalModifier => "clausal modifier",
            Rejection::AdjectivalModifier => "adjectival modifier",
            Rejection::DisallowedDependents => "disallowed dependents",
        })
    }
}

/// Non-empty and made only of Unicode alphabetic characters
///
/// Uses the Unicode `Alphabetic` property, which is broader than the
/// letter categories: letter numbers such as `Ⅻ` and many dependent vowel
/// signs count too.
fn is_alphabetic(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_alphabetic)
}

/// Applies the acceptance predicate for one dependency set
#[derive(Debug, Clone)]
pub struct VerbFilter {
    dependency_set: DependencySet,
}

impl VerbFilter {
    pub fn new(dependency_set: DependencySet) -> Self {
        Self { dependency_set }
    }

    pub fn dependency_set(&self) -> &DependencySet {
        &self.dependency_set
    }

    /// Dependents that count towards the combination key
    ///
    /// Drops punctuation attachments and whitespace tokens.
    pub fn clean_children<'a>(&self, tree: &'a Tree, word: &Word) -> Vec<&'a Word> {
        word.children(tree)
            .into_iter()
            .filter(|child| child.deprel != PUNCT_RELATION && child.upos != UPos::Space)
            .collect()
    }

    /// Check the token itself: a VERB spelled with letters only
    pub fn verify_token_type(&self, word: &Word) -> bool {
        word.upos == UPos::Verb && is_alphabetic(&word.form)
    }

    /// Check the token is not a relcl/advcl/acl of its head
    ///
    /// The token is looked up among its head's children and the relation
    /// found there is tested. Heads that are punctuation or whitespace, and
    /// roots, always pass.
    pub fn check_not_clausal_modifier(&self, tree: &Tree, word: &Word) -> bool {
        let Some(head) = word.parent(tree) else {
            return true;
        };
        if head.upos.is_irrelevant() {
            return true;
        }
        !head.children(tree).into_iter().any(|sibling| {
            sibling.id == word.id && CLAUSAL_MODIFIER_RELATIONS.contains(&sibling.deprel.as_str())
        })
    }

    /// Check the token is not an `amod` of a noun
    pub fn check_not_amod(&self, tree: &Tree, word: &Word) -> bool {
        !(word.deprel == AMOD_RELATION
            && word.parent(tree).is_some_and(|head| head.upos == UPos::Noun))
    }

    /// Check every cleaned dependent's relation is in the configured set
    pub fn check_dependent_types(&self, children: &[&Word]) -> bool {
        self.dependency_set
            .accepts_all(children.iter().map(|child| child.deprel.as_str()))
    }

    /// Run the full predicate
    ///
    /// On acceptance returns the combination key built from the cleaned
    /// dependents.
    pub fn evaluate(&self, tree: &Tree, word: &Word) -> Result<CombinationKey, Rejection> {
        if !self.verify_token_type(word) {
            return Err(Rejection::NotVerb);
        }
        if !self.check_not_clausal_modifier(tree, word) {
            return Err(Rejection::ClausalModifier);
        }
        if !self.check_not_amod(tree, word) {
            return Err(Rejection::AdjectivalModifier);
        }
        let children = self.clean_children(tree, word);
        if !self.check_dependent_types(&children) {
            return Err(Rejection::DisallowedDependents);
        }
        Ok(CombinationKey::from_labels(
            children.iter().map(|child| child.deprel.as_str()),
        ))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::conllu::CoNLLUReader;
    use crate::deprel::DepSetType;

    pub(crate) fn parse(conllu: &str) -> Tree {
        CoNLLUReader::from_string(conllu).next().unwrap().unwrap()
    }

    fn complete() -> VerbFilter {
        VerbFilter::new(DepSetType::Complete.dependency_set())
    }

    const JOHN_LOVES_MARY: &str = "1\tJohn\tJohn\tPROPN\tNNP\t_\t2\tnsubj\t_\t_
2\tloves\tlove\tVERB\tVBZ\t_\t0\tROOT\t_\t_
3\tMary\tMary\tPROPN\tNNP\t_\t2\tdobj\t_\tSpaceAfter=No
4\t.\t.\tPUNCT\t.\t_\t2\tpunct\t_\t_
";

    #[test]
    fn test_accepts_subject_object_verb() {
        let tree = parse(JOHN_LOVES_MARY);
        let key = complete().evaluate(&tree, &tree.words[1]).unwrap();
        assert_eq!(key.as_str(), "dobj_nsubj");
    }

    #[test]
    fn test_clean_children_drops_punct() {
        let tree = parse(JOHN_LOVES_MARY);
        let filter = complete();
        let children = filter.clean_children(&tree, &tree.words[1]);
        let labels: Vec<&str> = children.iter().map(|c| c.deprel.as_str()).collect();
        assert_eq!(labels, vec!["nsubj", "dobj"]);
    }

    #[test]
    fn test_rejects_non_verbs_and_non_alphabetic() {
        let tree = parse(JOHN_LOVES_MARY);
        assert_eq!(
            complete().evaluate(&tree, &tree.words[0]),
            Err(Rejection::NotVerb)
        );

        let tree = parse("1\t2nd\t2nd\tVERB\tVB\t_\t0\tROOT\t_\t_\n");
        assert_eq!(
            complete().evaluate(&tree, &tree.words[0]),
            Err(Rejection::NotVerb)
        );
    }

    #[test]
    fn test_is_alphabetic() {
        assert!(is_alphabetic("café"));
        assert!(is_alphabetic("Ⅻ"));
        assert!(!is_alphabetic("re-do"));
        assert!(!is_alphabetic("go2"));
        assert!(!is_alphabetic(""));
    }

    #[test]
    fn test_verb_without_dependents_has_empty_key() {
        let tree = parse("1\tRun\trun\tVERB\tVB\t_\t0\tROOT\t_\tSpaceAfter=No\n2\t!\t!\tPUNCT\t.\t_\t1\tpunct\t_\t_\n");
        let key = complete().evaluate(&tree, &tree.words[0]).unwrap();
        assert!(key.is_empty());
        assert_eq!(key.to_string(), "NO_DEPS");
    }

    #[test]
    fn test_rejects_relative_clause_verb() {
        // the man who left
        let tree = parse(
            "1\tthe\tthe\tDET\tDT\t_\t2\tdet\t_\t_
2\tman\tman\tNOUN\tNN\t_\t0\tROOT\t_\t_
3\twho\twho\tPRON\tWP\t_\t4\tnsubj\t_\t_
4\tleft\tleave\tVERB\tVBD\t_\t2\trelcl\t_\t_
",
        );
        assert_eq!(
            complete().evaluate(&tree, &tree.words[3]),
            Err(Rejection::ClausalModifier)
        );
    }

    #[test]
    fn test_clausal_check_passes_under_punct_head() {
        let tree = parse(
            "1\t-\t-\tPUNCT\t:\t_\t0\tROOT\t_\t_
2\tgo\tgo\tVERB\tVB\t_\t1\tadvcl\t_\t_
",
        );
        assert!(complete().check_not_clausal_modifier(&tree, &tree.words[1]));
        assert!(complete().evaluate(&tree, &tree.words[1]).is_ok());
    }

    #[test]
    fn test_rejects_verb_with_relcl_dependent() {
        let tree = parse(
            "1\tsaw\tsee\tVERB\tVBD\t_\t0\tROOT\t_\t_
2\tthat\tthat\tPRON\tWDT\t_\t3\tnsubj\t_\t_
3\tshone\tshine\tVERB\tVBD\t_\t1\trelcl\t_\t_
",
        );
        for set in [DepSetType::NonClausal, DepSetType::Complete] {
            let filter = VerbFilter::new(set.dependency_set());
            assert_eq!(
                filter.evaluate(&tree, &tree.words[0]),
                Err(Rejection::DisallowedDependents)
            );
        }
    }

    #[test]
    fn test_rejects_amod_of_noun() {
        let tree = parse(
            "1\tbroken\tbreak\tVERB\tVBN\t_\t2\tamod\t_\t_
2\tglass\tglass\tNOUN\tNN\t_\t0\tROOT\t_\t_
",
        );
        assert_eq!(
            complete().evaluate(&tree, &tree.words[0]),
            Err(Rejection::AdjectivalModifier)
        );
    }

    #[test]
    fn test_amod_of_non_noun_is_kept() {
        let tree = parse(
            "1\tbroken\tbreak\tVERB\tVBN\t_\t2\tamod\t_\t_
2\tthem\tthey\tPRON\tPRP\t_\t0\tROOT\t_\t_
",
        );
        assert!(complete().check_not_amod(&tree, &tree.words[0]));
    }

    #[test]
    fn test_clausal_complement_depends_on_set() {
        let tree = parse(
            "1\tI\tI\tPRON\tPRP\t_\t2\tnsubj\t_\t_
2\twant\twant\tVERB\tVBP\t_\t0\tROOT\t_\t_
3\tto\tto\tPART\tTO\t_\t4\taux\t_\t_
4\tgo\tgo\tVERB\tVB\t_\t2\txcomp\t_\t_
",
        );
        let non_clausal = VerbFilter::new(DepSetType::NonClausal.dependency_set());
        assert_eq!(
            non_clausal.evaluate(&tree, &tree.words[1]),
            Err(Rejection::DisallowedDependents)
        );
        assert_eq!(
            complete().evaluate(&tree, &tree.words[1]).unwrap().as_str(),
            "nsubj_xcomp"
        );
    }
}
