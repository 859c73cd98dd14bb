use depset::corpus::{self, Limit};
use depset::report::ColumnSet;
use depset::tagging::{self, TaggingError};
use depset::{Accumulator, DepSetType, ReportWriter, Tagger, UPos, VerbFilter};
use std::io::Write;
use std::path::Path;

const POSTS: &str = "# newdoc id = post-1
# text = John gave Mary a book.
1\tJohn\tJohn\tPROPN\tNNP\t_\t2\tnsubj\t_\t_
2\tgave\tgive\tVERB\tVBD\t_\t0\tROOT\t_\t_
3\tMary\tMary\tPROPN\tNNP\t_\t2\tdative\t_\t_
4\ta\ta\tDET\tDT\t_\t5\tdet\t_\t_
5\tbook\tbook\tNOUN\tNN\t_\t2\tdobj\t_\tSpaceAfter=No
6\t.\t.\tPUNCT\t.\t_\t2\tpunct\t_\t_

# text = The man who left smiled.
1\tThe\tthe\tDET\tDT\t_\t2\tdet\t_\t_
2\tman\tman\tNOUN\tNN\t_\t5\tnsubj\t_\t_
3\twho\twho\tPRON\tWP\t_\t4\tnsubj\t_\t_
4\tleft\tleave\tVERB\tVBD\t_\t2\trelcl\t_\t_
5\tsmiled\tsmile\tVERB\tVBD\t_\t0\tROOT\t_\tSpaceAfter=No
6\t.\t.\tPUNCT\t.\t_\t5\tpunct\t_\t_

# newdoc id = post-2
# text = She gave up.
1\tShe\tshe\tPRON\tPRP\t_\t2\tnsubj\t_\t_
2\tgave\tgive\tVERB\tVBD\t_\t0\tROOT\t_\t_
3\tup\tup\tADP\tRP\t_\t2\tprt\t_\tSpaceAfter=No
4\t.\t.\tPUNCT\t.\t_\t2\tpunct\t_\t_

# text = Go!
1\tGo\tgo\tVERB\tVB\t_\t0\tROOT\t_\tSpaceAfter=No
2\t!\t!\tPUNCT\t.\t_\t1\tpunct\t_\t_

";

fn write_corpus(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("posts.conllu");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(POSTS.as_bytes()).unwrap();
    path
}

fn run_dependency_set(corpus_path: &Path, out_dir: &Path, set: DepSetType) -> (String, String) {
    let dependency_set = set.dependency_set();
    let filter = VerbFilter::new(dependency_set.clone());
    let documents = corpus::load_documents(corpus_path, "en_core_web_lg", None).unwrap();
    let accumulator = Accumulator::from_documents(&filter, &documents);

    let writer = ReportWriter::new(&accumulator, &dependency_set);
    let sents = out_dir.join("sents.csv");
    let counter = out_dir.join("counter.csv");
    writer.write_sentences_file(&sents).unwrap();
    writer.write_counter_file(&counter, ColumnSet::Both).unwrap();

    (
        std::fs::read_to_string(sents).unwrap(),
        std::fs::read_to_string(counter).unwrap(),
    )
}

#[test]
fn dependency_set_reports() {
    let dir = tempfile::tempdir().unwrap();
    let corpus_path = write_corpus(dir.path());
    let (sents, counter) = run_dependency_set(&corpus_path, dir.path(), DepSetType::NonClausal);

    let rows: Vec<&str> = sents.lines().collect();
    assert_eq!(
        rows,
        vec![
            "Lemma (V),Verb form,Dep struct,Sentence,Doc index,Sent index",
            "give,gave,nsubj_prt,She gave up.,1,0",
            "give,gave,dative_dobj_nsubj,John gave Mary a book.,0,0",
            "smile,smiled,nsubj,The man who left smiled.,0,1",
            "go,Go,NO_DEPS,Go!,1,1",
        ]
    );

    let mut lines = counter.lines();
    let header: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert_eq!(header[0], "Lemma (V)");
    assert_eq!(header[1], "NO_DEPS_COUNT");
    assert_eq!(header[2], "NO_DEPS%");
    assert_eq!(header.len(), 1 + 2 * (1 << 8));

    for line in lines {
        let cells: Vec<&str> = line.split(',').collect();
        assert_eq!(cells.len(), header.len());
        let counts: usize = cells[1..].iter().step_by(2).map(|c| c.parse::<usize>().unwrap()).sum();
        let shares: f64 = cells[2..].iter().step_by(2).map(|c| c.parse::<f64>().unwrap()).sum();
        let expected = if cells[0] == "give" { 2 } else { 1 };
        assert_eq!(counts, expected, "{}", cells[0]);
        assert!((shares - 1.0).abs() < 1e-9, "{}", cells[0]);
    }
}

#[test]
fn dependency_set_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let corpus_path = write_corpus(dir.path());
    let first = run_dependency_set(&corpus_path, dir.path(), DepSetType::Complete);
    let second = run_dependency_set(&corpus_path, dir.path(), DepSetType::Complete);
    assert_eq!(first, second);
}

struct SuffixTagger;

impl Tagger for SuffixTagger {
    fn tag(&mut self, tokens: &[&str]) -> Result<Vec<UPos>, TaggingError> {
        Ok(tokens
            .iter()
            .map(|t| {
                if t.ends_with("ed") || *t == "gave" {
                    UPos::Verb
                } else if t.chars().all(|c| c.is_ascii_punctuation()) {
                    UPos::Punct
                } else {
                    UPos::Noun
                }
            })
            .collect())
    }
}

#[test]
fn tag_converter_table() {
    let dir = tempfile::tempdir().unwrap();
    let corpus_path = write_corpus(dir.path());

    let sentences = corpus::read_sentences(&corpus_path).unwrap();
    let rows = tagging::convert_sentences(sentences, &mut SuffixTagger, None).unwrap();
    assert_eq!(rows.len(), 6 + 6 + 4 + 2);

    let output = dir.path().join(tagging::output_file_name(Limit(None)));
    tagging::write_rows_file(&rows, &output).unwrap();
    let first = std::fs::read(&output).unwrap();

    let text = String::from_utf8(first.clone()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Word,POS_Tag,Sentence_Count,Token_ID");
    assert_eq!(lines[1], "John,NOUN,0,0");
    assert_eq!(lines[2], "gave,VERB,0,1");
    assert_eq!(lines[11], "smiled,VERB,1,4");
    assert_eq!(lines[18], "!,PUNCT,3,1");

    let sentences = corpus::read_sentences(&corpus_path).unwrap();
    let rows = tagging::convert_sentences(sentences, &mut SuffixTagger, None).unwrap();
    tagging::write_rows_file(&rows, &output).unwrap();
    assert_eq!(std::fs::read(&output).unwrap(), first);
}
