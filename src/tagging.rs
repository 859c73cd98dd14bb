//! Re-tagging of pre-segmented sentences
//!
//! Each CoNLL-U sentence is rebuilt from the token lines that carry a
//! language-specific tag, split on single spaces and handed to a [`Tagger`].
//! The tagger sees exactly one token per word, so its output lines up with
//! the filtered input.
//!
//! Every token line counts, empty nodes included. Lines with a null XPOS
//! never reach the tagger. That covers the surface forms of multiword
//! tokens, but also any ordinary word left untagged in the corpus, so
//! output and input token counts can differ.

use crate::corpus::Limit;
use crate::pos::UPos;
use crate::report::{ReportError, create};
use crate::tree::Tree;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

pub const TAG_HEADERS: [&str; 4] = ["Word", "POS_Tag", "Sentence_Count", "Token_ID"];

#[derive(Debug, Error)]
pub enum TaggingError {
    #[error("Tagger returned {got} tags for {expected} tokens")]
    Misaligned { expected: usize, got: usize },

    #[error("Tagger backend error: {0}")]
    Backend(String),
}

/// Part-of-speech tagger over pre-tokenized input
pub trait Tagger {
    /// Tag each token; must return exactly one tag per token
    fn tag(&mut self, tokens: &[&str]) -> Result<Vec<UPos>, TaggingError>;
}

/// One output row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRow {
    pub word: String,
    pub pos_tag: UPos,
    pub sentence_count: usize,
    pub token_id: usize,
}

/// Forms of the token lines with a non-null XPOS, joined by single spaces
pub fn sentence_text(tree: &Tree) -> String {
    tree.tokens
        .iter()
        .filter(|token| token.xpos.is_some())
        .map(|token| token.form.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split on single spaces; never splits inside a token otherwise
pub fn whitespace_tokenize(text: &str) -> Vec<&str> {
    text.split(' ').filter(|token| !token.is_empty()).collect()
}

/// Re-tag a run of sentences
///
/// Stops once `limit` sentences have been processed; `None` processes all.
/// The sentence counter advances for every input sentence, including those
/// that end up with no tokens.
pub fn convert_sentences<I, T>(
    trees: I,
    tagger: &mut T,
    limit: Option<usize>,
) -> Result<Vec<TagRow>, crate::Error>
where
    I: IntoIterator<Item = Result<Tree, crate::conllu::ParseError>>,
    T: Tagger + ?Sized,
{
    let mut rows = Vec::new();
    let mut sentence_count = 0;

    if limit == Some(0) {
        return Ok(rows);
    }

    for tree in trees {
        let tree = tree?;
        let text = sentence_text(&tree);
        let tokens = whitespace_tokenize(&text);

        if !tokens.is_empty() {
            let tags = tagger.tag(&tokens)?;
            if tags.len() != tokens.len() {
                return Err(TaggingError::Misaligned {
                    expected: tokens.len(),
                    got: tags.len(),
                }
                .into());
            }
            rows.extend(tokens.iter().zip(tags).enumerate().map(
                |(token_id, (token, pos_tag))| TagRow {
                    word: token.to_string(),
                    pos_tag,
                    sentence_count,
                    token_id,
                },
            ));
        } else {
            log::debug!("sentence {} has no tagged words", sentence_count);
        }

        sentence_count += 1;
        if limit.is_some_and(|limit| sentence_count >= limit) {
            break;
        }
    }

    log::info!("tagged {} tokens in {} sentences", rows.len(), sentence_count);
    Ok(rows)
}

pub fn write_rows<W: Write>(rows: &[TagRow], out: W) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(TAG_HEADERS)?;
    for row in rows {
        writer.write_record([
            row.word.as_str(),
            row.pos_tag.as_str(),
            row.sentence_count.to_string().as_str(),
            row.token_id.to_string().as_str(),
        ])?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_rows_file(rows: &[TagRow], path: &Path) -> Result<(), ReportError> {
    write_rows(rows, create(path)?)
}

/// Output file name for a given sentence limit
pub fn output_file_name(limit: Limit) -> String {
    format!("output_with_pos_SPACY_tags_{}_sentences.csv", limit)
}
