//! Re-tag the sentences of a CoNLL-U corpus and write a word/tag table
//!
//! Usage: tag_converter <file_to_process> <n_sentences>
//!
//! `<n_sentences>` may be `None` to process the whole file.

use anyhow::{Context, Result};
use clap::Parser;
use depset::corpus::{self, Limit};
use depset::tagging;
use std::path::PathBuf;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(version, about = "Convert CoNLL-U sentences into a word/POS-tag CSV")]
struct Opts {
    /// CoNLL-U file to re-tag (plain or .gz)
    file_to_process: PathBuf,

    /// Number of sentences to process, or None for all
    n_sentences: Limit,

    /// spaCy model used for tagging
    #[arg(long, env = "SPACY_MODEL", default_value = "en_core_web_lg")]
    model: String,

    /// Directory the CSV is written to
    #[arg(long, env = "TAGS_OUTPUT_DIR", default_value = "files/tags_data")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let opts = Opts::parse();

    let mut tagger = corpus::load_tagger(&opts.model)?;
    let sentences = corpus::read_sentences(&opts.file_to_process)
        .with_context(|| format!("opening {}", opts.file_to_process.display()))?;
    let rows = tagging::convert_sentences(sentences, tagger.as_mut(), opts.n_sentences.0)
        .with_context(|| format!("tagging {}", opts.file_to_process.display()))?;

    std::fs::create_dir_all(&opts.out_dir)
        .with_context(|| format!("creating {}", opts.out_dir.display()))?;
    let output = opts.out_dir.join(tagging::output_file_name(opts.n_sentences));
    tagging::write_rows_file(&rows, &output)?;

    println!(
        "data converted and saved to {} with spaCy POS tags",
        output.display()
    );
    Ok(())
}
