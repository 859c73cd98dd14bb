//! Bucket verbs by the relation labels of their dependents
//!
//! Usage: dependency_set <spacy_file_name> <num_of_posts> <dep_set_type>
//!
//! Reads a parsed corpus (spaCy DocBin or CoNLL-U), keeps the verbs whose
//! dependents all fall in the chosen relation set and writes a sentence
//! report and a per-verb counter report.

use anyhow::{Context, Result};
use clap::Parser;
use depset::corpus::{self, Limit};
use depset::report::{self, ColumnSet, ReportWriter};
use depset::{Accumulator, DepSetType, VerbFilter};
use std::path::PathBuf;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(version, about = "Verb dependency-set statistics over a parsed corpus")]
struct Opts {
    /// Parsed corpus: .spacy DocBin, or .conllu/.conll/.gz
    spacy_file_name: PathBuf,

    /// Number of documents (posts) to read, or None for all
    num_of_posts: Limit,

    /// Relation set: NON_CLAUSAL or COMPLETE
    dep_set_type: DepSetType,

    /// spaCy model whose vocabulary the DocBin uses
    #[arg(long, env = "SPACY_MODEL", default_value = "en_core_web_lg")]
    model: String,

    /// Directory the reports are written to
    #[arg(
        long,
        env = "DEPSET_OUTPUT_DIR",
        default_value = "files/dependency_set/source_files"
    )]
    out_dir: PathBuf,

    /// Counter report columns: count, percent or both
    #[arg(long, default_value = "count")]
    columns: ColumnSet,
}

fn main() -> Result<()> {
    env_logger::init();
    let opts = Opts::parse();

    let dependency_set = opts.dep_set_type.dependency_set();
    let filter = VerbFilter::new(dependency_set.clone());

    let documents = corpus::load_documents(&opts.spacy_file_name, &opts.model, opts.num_of_posts.0)
        .with_context(|| format!("loading {}", opts.spacy_file_name.display()))?;

    let accumulator = Accumulator::from_documents(&filter, &documents);
    accumulator.log_summary();

    std::fs::create_dir_all(&opts.out_dir)
        .with_context(|| format!("creating {}", opts.out_dir.display()))?;
    let date = chrono::Local::now().format("%Y_%m_%d").to_string();
    let (sents_name, counter_name) =
        report::report_file_names(&opts.num_of_posts.to_string(), &date, opts.dep_set_type);

    let writer = ReportWriter::new(&accumulator, &dependency_set);
    let sents_path = opts.out_dir.join(sents_name);
    writer.write_sentences_file(&sents_path)?;
    log::info!("wrote {}", sents_path.display());

    let counter_path = opts.out_dir.join(counter_name);
    writer.write_counter_file(&counter_path, opts.columns)?;
    log::info!("wrote {}", counter_path.display());

    Ok(())
}
