//! Dependency tree data structures
//!
//! A [`Tree`] is one parsed sentence; a [`Document`] is an ordered run of
//! sentences. Heads are plain indices into the sentence's word vector, so
//! nothing here owns anything else.

use crate::pos::UPos;
use std::collections::HashMap;

/// Index of a word within its sentence
pub type WordId = usize;

/// Key/value pairs from the MISC column
pub type Misc = HashMap<String, String>;

/// One token line as it appears in the file
///
/// Multiword ranges and empty nodes show up here even though they never
/// become [`Word`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub form: String,
    pub xpos: Option<String>,
}

/// A word in a dependency tree
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub id: WordId,
    pub form: String,
    pub lemma: String,
    pub upos: UPos,
    pub xpos: Option<String>,
    pub deprel: String,
    pub head: Option<WordId>,
    pub children: Vec<WordId>,
    pub misc: Misc,
}

impl Word {
    /// Create a new word with the given attributes
    pub fn new(id: WordId, form: &str, lemma: &str, upos: UPos, deprel: &str) -> Self {
        Self {
            id,
            form: form.to_string(),
            lemma: lemma.to_string(),
            upos,
            xpos: None,
            deprel: deprel.to_string(),
            head: None,
            children: Vec::new(),
            misc: Misc::new(),
        }
    }

    pub fn with_xpos(mut self, xpos: &str) -> Self {
        self.xpos = Some(xpos.to_string());
        self
    }

    fn token(&self) -> Token {
        Token {
            form: self.form.clone(),
            xpos: self.xpos.clone(),
        }
    }

    pub fn parent<'a>(&self, tree: &'a Tree) -> Option<&'a Word> {
        self.head.and_then(|id| tree.word(id))
    }

    pub fn children<'a>(&self, tree: &'a Tree) -> Vec<&'a Word> {
        tree.children(self.id)
    }

    fn space_after(&self) -> bool {
        self.misc.get("SpaceAfter").is_none_or(|v| v != "No")
    }
}

/// A dependency tree (sentence)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    pub words: Vec<Word>,
    /// Every token line in file order, words included
    pub tokens: Vec<Token>,
    pub root_id: Option<WordId>,
    pub sentence_text: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl Tree {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(
        sentence_text: Option<String>,
        metadata: HashMap<String, String>,
    ) -> Self {
        Self {
            sentence_text,
            metadata,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Add a word to the tree, and its token line
    pub fn add_word(&mut self, word: Word) -> WordId {
        let id = word.id;
        self.tokens.push(word.token());
        self.words.push(word);
        id
    }

    /// Add a token line that is not a syntactic word
    pub fn add_token(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Get a word by ID
    pub fn word(&self, id: WordId) -> Option<&Word> {
        self.words.get(id)
    }

    /// Wire up children and root from each word's `head`
    ///
    /// Heads outside the sentence and self-loops are cleared to `None`.
    pub fn link(&mut self) {
        let n = self.words.len();
        for word in &mut self.words {
            word.children.clear();
        }
        self.root_id = None;
        for i in 0..n {
            let head = self.words[i].head;
            match head {
                Some(h) if h < n && h != i => self.words[h].children.push(i),
                Some(h) => {
                    if h >= n {
                        log::warn!("word {} has head {} outside sentence of length {}", i, h, n);
                    }
                    self.words[i].head = None;
                    self.root_id.get_or_insert(i);
                }
                None => {
                    self.root_id.get_or_insert(i);
                }
            }
        }
    }

    /// Get the children of a word
    pub fn children(&self, id: WordId) -> Vec<&Word> {
        self.word(id)
            .map(|word| {
                word.children
                    .iter()
                    .filter_map(|&child| self.word(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the head of a word
    pub fn parent(&self, id: WordId) -> Option<&Word> {
        self.word(id).and_then(|word| word.parent(self))
    }

    /// Sentence text from the `# text` comment, or rebuilt from the forms
    pub fn text(&self) -> String {
        if let Some(text) = &self.sentence_text {
            return text.clone();
        }
        let mut text = String::new();
        for word in &self.words {
            text.push_str(&word.form);
            if word.space_after() {
                text.push(' ');
            }
        }
        text.truncate(text.trim_end().len());
        text
    }
}

/// An ordered collection of sentences, e.g. one post
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub id: Option<String>,
    pub sentences: Vec<Tree>,
}

impl Document {
    pub fn new(sentences: Vec<Tree>) -> Self {
        Self {
            id: None,
            sentences,
        }
    }
}
