//! CoNLL-U file parsing
//!
//! Parses CoNLL-U format files into Tree structures. Multiword tokens and
//! empty nodes stay out of the dependency structure but are kept as raw
//! [`Token`]s; everything else in the ten columns is kept. UPOS values
//! outside the universal tag set are read as `X` with a warning. Files
//! ending in `.gz` are decompressed on the fly.
//!
//! CoNLL-U format: https://universaldependencies.org/format.html

use crate::pos::UPos;
use crate::tree::{Document, Misc, Token, Tree, Word, WordId};
use bstr::ByteSlice;
use bstr::io::BufReadExt;
use flate2::read::MultiGzDecoder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;
use thiserror::Error;

/// Metadata key set on the first sentence of a new document
pub const NEWDOC_KEY: &str = "newdoc";

/// Error during CoNLL-U parsing
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("IO error at line {line_num}: {source}")]
    Io {
        line_num: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error at line {line_num}: {message}")]
    Syntax { line_num: usize, message: String },
}

impl ParseError {
    fn syntax(line_num: usize, message: impl Into<String>) -> Self {
        ParseError::Syntax {
            line_num,
            message: message.into(),
        }
    }
}

/// Token ID column: a word, a multiword range, or an empty node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenId {
    Single(usize),
    Range(usize, usize),
    Decimal(usize, usize),
}

/// CoNLL-U reader that iterates over sentences
pub struct CoNLLUReader<R: BufRead> {
    reader: R,
    line_num: usize,
    buf: Vec<u8>,
    done: bool,
}

impl CoNLLUReader<Box<dyn BufRead>> {
    /// Create a reader from a file path, decompressing `.gz` files
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let reader: Box<dyn BufRead> = if path.extension().is_some_and(|ext| ext == "gz") {
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        Ok(Self::new(reader))
    }
}

impl CoNLLUReader<Cursor<Vec<u8>>> {
    /// Create a reader from a string
    pub fn from_string(text: &str) -> Self {
        Self::new(Cursor::new(text.as_bytes().to_vec()))
    }
}

impl<R: BufRead> CoNLLUReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_num: 0,
            buf: Vec::new(),
            done: false,
        }
    }

    fn read_line(&mut self) -> std::io::Result<bool> {
        self.buf.clear();
        let mut got = false;
        let buf = &mut self.buf;
        self.reader.for_byte_line(|line| {
            buf.extend_from_slice(line);
            got = true;
            Ok(false)
        })?;
        Ok(got)
    }
}

impl<R: BufRead> Iterator for CoNLLUReader<R> {
    type Item = Result<Tree, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut tree_lines: Vec<(usize, Vec<u8>)> = Vec::new();
        let mut metadata = HashMap::new();
        let mut sentence_text = None;

        // Read lines until we hit a blank line (sentence boundary) or EOF
        loop {
            self.line_num += 1;
            match self.read_line() {
                Err(source) => {
                    self.done = true;
                    return Some(Err(ParseError::Io {
                        line_num: self.line_num,
                        source,
                    }));
                }
                Ok(false) => {
                    self.done = true;
                    if tree_lines.is_empty() {
                        return None;
                    }
                    break;
                }
                Ok(true) => {
                    let line = self.buf.trim();

                    if line.is_empty() {
                        if !tree_lines.is_empty() {
                            break;
                        }
                        continue;
                    }

                    if line[0] == b'#' {
                        let comment = match line[1..].to_str() {
                            Ok(s) => s,
                            Err(_) => {
                                self.done = true;
                                return Some(Err(ParseError::syntax(
                                    self.line_num,
                                    "comment is not valid UTF-8",
                                )));
                            }
                        };
                        parse_comment(comment, &mut metadata, &mut sentence_text);
                        continue;
                    }

                    tree_lines.push((self.line_num, line.to_vec()));
                }
            }
        }

        let result = parse_tree(tree_lines, sentence_text, metadata);
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

/// Parse a comment line (starts with #)
fn parse_comment(
    comment: &str,
    metadata: &mut HashMap<String, String>,
    sentence_text: &mut Option<String>,
) {
    let comment = comment.trim();

    if let Some((key, value)) = comment.split_once('=') {
        let key = key.trim();
        let value = value.trim();

        if key == "text" {
            *sentence_text = Some(value.to_string());
        } else if key == "newdoc id" {
            metadata.insert(NEWDOC_KEY.to_string(), value.to_string());
        } else {
            metadata.insert(key.to_string(), value.to_string());
        }
    } else if comment == NEWDOC_KEY {
        metadata.insert(NEWDOC_KEY.to_string(), String::new());
    }
}

/// Parse accumulated lines into a Tree
fn parse_tree(
    lines: Vec<(usize, Vec<u8>)>,
    sentence_text: Option<String>,
    metadata: HashMap<String, String>,
) -> Result<Tree, ParseError> {
    let mut tree = Tree::with_metadata(sentence_text, metadata);

    for (line_num, line) in lines {
        let word_id = tree.len();
        match parse_line(&line, line_num, word_id)? {
            Line::Word(word) => {
                tree.add_word(word);
            }
            Line::Token(token) => tree.add_token(token),
        }
    }

    tree.link();
    Ok(tree)
}

/// Split a line into its tab-separated fields
fn split_fields(line: &[u8]) -> Vec<&[u8]> {
    let mut fields = Vec::with_capacity(10);
    let mut start = 0;
    for tab in memchr::memchr_iter(b'\t', line) {
        fields.push(&line[start..tab]);
        start = tab + 1;
    }
    fields.push(&line[start..]);
    fields
}

fn field_str(field: &[u8], line_num: usize, name: &str) -> Result<String, ParseError> {
    field
        .to_str()
        .map(str::to_string)
        .map_err(|_| ParseError::syntax(line_num, format!("{} is not valid UTF-8", name)))
}

/// A parsed token line
enum Line {
    Word(Word),
    /// Multiword range or empty node
    Token(Token),
}

fn parse_xpos(field: &[u8], line_num: usize) -> Result<Option<String>, ParseError> {
    if field == b"_" {
        Ok(None)
    } else {
        field_str(field, line_num, "XPOS").map(Some)
    }
}

fn parse_upos(field: &[u8], line_num: usize) -> Result<UPos, ParseError> {
    let tag = field_str(field, line_num, "UPOS")?;
    Ok(tag.parse::<UPos>().unwrap_or_else(|e| {
        log::warn!("line {}: {}, reading it as X", line_num, e);
        UPos::X
    }))
}

/// Parse a single CoNLL-U line
fn parse_line(line: &[u8], line_num: usize, word_id: WordId) -> Result<Line, ParseError> {
    let fields = split_fields(line);

    if fields.len() != 10 {
        return Err(ParseError::syntax(
            line_num,
            format!("Expected 10 fields, found {}", fields.len()),
        ));
    }

    let form = field_str(fields[1], line_num, "FORM")?;

    match parse_id(fields[0], line_num)? {
        TokenId::Range(_, _) | TokenId::Decimal(_, _) => {
            return Ok(Line::Token(Token {
                form,
                xpos: parse_xpos(fields[4], line_num)?,
            }));
        }
        TokenId::Single(_) => {}
    }

    let lemma = if fields[2] == b"_" {
        form.clone()
    } else {
        field_str(fields[2], line_num, "LEMMA")?
    };

    let upos = parse_upos(fields[3], line_num)?;
    let xpos = parse_xpos(fields[4], line_num)?;

    let head = parse_head(fields[6], line_num)?;
    let deprel = field_str(fields[7], line_num, "DEPREL")?;
    let misc = parse_misc(fields[9]);

    Ok(Line::Word(Word {
        id: word_id,
        form,
        lemma,
        upos,
        xpos,
        deprel,
        head,
        children: Vec::new(),
        misc,
    }))
}

fn parse_usize(s: &[u8], line_num: usize, what: &str) -> Result<usize, ParseError> {
    match atoi::atoi::<usize>(s) {
        Some(n) if s.iter().all(u8::is_ascii_digit) => Ok(n),
        _ => Err(ParseError::syntax(
            line_num,
            format!("Invalid {}: {}", what, s.as_bstr()),
        )),
    }
}

/// Parse ID field (can be integer, range, or decimal)
fn parse_id(s: &[u8], line_num: usize) -> Result<TokenId, ParseError> {
    if let Some(dash) = memchr::memchr(b'-', s) {
        let start = parse_usize(&s[..dash], line_num, "range start")?;
        let end = parse_usize(&s[dash + 1..], line_num, "range end")?;
        Ok(TokenId::Range(start, end))
    } else if let Some(dot) = memchr::memchr(b'.', s) {
        let main = parse_usize(&s[..dot], line_num, "decimal main")?;
        let sub = parse_usize(&s[dot + 1..], line_num, "decimal sub")?;
        Ok(TokenId::Decimal(main, sub))
    } else {
        Ok(TokenId::Single(parse_usize(s, line_num, "ID")?))
    }
}

/// Parse HEAD field (0 or integer)
fn parse_head(s: &[u8], line_num: usize) -> Result<Option<WordId>, ParseError> {
    if s == b"_" {
        return Ok(None);
    }
    // HEAD is 1-indexed in CoNLL-U, with 0 for the root
    match parse_usize(s, line_num, "HEAD")? {
        0 => Ok(None),
        head => Ok(Some(head - 1)),
    }
}

/// Parse MISC field (key=value|key=value)
fn parse_misc(s: &[u8]) -> Misc {
    let mut misc = Misc::new();

    if s == b"_" {
        return misc;
    }

    for pair in s.split_str("|") {
        if let Some((key, value)) = pair.split_once_str("=") {
            misc.insert(
                key.to_str_lossy().into_owned(),
                value.to_str_lossy().into_owned(),
            );
        }
    }

    misc
}

/// Group sentences into documents at `# newdoc` boundaries
///
/// Input without any `newdoc` marker comes back as a single document.
pub fn group_documents<I>(trees: I) -> Result<Vec<Document>, ParseError>
where
    I: IntoIterator<Item = Result<Tree, ParseError>>,
{
    let mut documents: Vec<Document> = Vec::new();

    for tree in trees {
        let tree = tree?;
        let newdoc = tree.metadata.get(NEWDOC_KEY).cloned();
        if newdoc.is_none() {
            if let Some(doc) = documents.last_mut() {
                doc.sentences.push(tree);
                continue;
            }
        }
        documents.push(Document {
            id: newdoc.filter(|id| !id.is_empty()),
            sentences: vec![tree],
        });
    }

    Ok(documents)
}

/// Read every document from a CoNLL-U file
pub fn read_documents(path: &Path) -> Result<Vec<Document>, ParseError> {
    let reader =
        CoNLLUReader::from_file(path).map_err(|source| ParseError::Io { line_num: 0, source })?;
    group_documents(reader)
}
