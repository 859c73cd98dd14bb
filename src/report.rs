//! CSV reports over an [`Accumulator`]
//!
//! Two reports, both driven by the same fixed combination order so that the
//! output is stable for a given dependency set:
//! - the sentence report, one row per accepted occurrence
//! - the counter report, one row per lemma with a column (or two) per
//!   combination

use crate::accumulator::Accumulator;
use crate::deprel::{CombinationKey, DepSetType, DependencySet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub const LEMMA_HEADER: &str = "Lemma (V)";

pub const SENTENCE_HEADERS: [&str; 6] = [
    LEMMA_HEADER,
    "Verb form",
    "Dep struct",
    "Sentence",
    "Doc index",
    "Sent index",
];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown column set: {0:?} (expected count, percent or both)")]
pub struct UnknownColumnSet(pub String);

/// Which statistics the counter report carries per combination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnSet {
    #[default]
    Count,
    Percent,
    Both,
}

impl ColumnSet {
    pub fn count(self) -> bool {
        matches!(self, ColumnSet::Count | ColumnSet::Both)
    }

    pub fn percent(self) -> bool {
        matches!(self, ColumnSet::Percent | ColumnSet::Both)
    }

    /// Column names for one combination
    pub fn fieldnames(self, key: &CombinationKey) -> Vec<String> {
        let mut names = Vec::with_capacity(2);
        if self.count() {
            names.push(format!("{}_COUNT", key.display_name()));
        }
        if self.percent() {
            names.push(format!("{}%", key.display_name()));
        }
        names
    }
}

impl FromStr for ColumnSet {
    type Err = UnknownColumnSet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "count" => Ok(ColumnSet::Count),
            "percent" | "%" => Ok(ColumnSet::Percent),
            "both" => Ok(ColumnSet::Both),
            _ => Err(UnknownColumnSet(s.to_string())),
        }
    }
}

/// Share of a bucket in its lemma's total
///
/// Empty buckets render as `0`; anything else as the shortest float that
/// round-trips (`0.5`, `1.0`, `0.3333333333333333`).
fn format_ratio(count: usize, total: usize) -> String {
    if count == 0 || total == 0 {
        "0".to_string()
    } else {
        format!("{:?}", count as f64 / total as f64)
    }
}

/// Writes both reports for one dependency set
pub struct ReportWriter<'a> {
    accumulator: &'a Accumulator,
    combinations: Vec<CombinationKey>,
}

impl<'a> ReportWriter<'a> {
    pub fn new(accumulator: &'a Accumulator, dependency_set: &DependencySet) -> Self {
        Self {
            accumulator,
            combinations: dependency_set.combinations(),
        }
    }

    pub fn combinations(&self) -> &[CombinationKey] {
        &self.combinations
    }

    /// Header of the counter report
    pub fn counter_headers(&self, columns: ColumnSet) -> Vec<String> {
        std::iter::once(LEMMA_HEADER.to_string())
            .chain(
                self.combinations
                    .iter()
                    .flat_map(|key| columns.fieldnames(key)),
            )
            .collect()
    }

    /// One row per accepted occurrence
    pub fn write_sentences<W: Write>(&self, out: W) -> Result<(), ReportError> {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(SENTENCE_HEADERS)?;

        for (lemma, _) in self.accumulator.lemmas() {
            for key in &self.combinations {
                for occurrence in self.accumulator.occurrences(lemma, key) {
                    writer.write_record([
                        lemma,
                        occurrence.verb_form.as_str(),
                        key.display_name(),
                        occurrence.sentence.as_str(),
                        occurrence.doc_index.to_string().as_str(),
                        occurrence.sent_index.to_string().as_str(),
                    ])?;
                }
            }
        }

        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// One row per lemma with per-combination counts and/or shares
    pub fn write_counter<W: Write>(&self, out: W, columns: ColumnSet) -> Result<(), ReportError> {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(self.counter_headers(columns))?;

        for (lemma, _) in self.accumulator.lemmas() {
            let total = self.accumulator.total(lemma);
            let mut row = vec![lemma.to_string()];
            for key in &self.combinations {
                let count = self.accumulator.count(lemma, key);
                if columns.count() {
                    row.push(count.to_string());
                }
                if columns.percent() {
                    row.push(format_ratio(count, total));
                }
            }
            writer.write_record(&row)?;
        }

        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    pub fn write_sentences_file(&self, path: &Path) -> Result<(), ReportError> {
        self.write_sentences(create(path)?)
    }

    pub fn write_counter_file(&self, path: &Path, columns: ColumnSet) -> Result<(), ReportError> {
        self.write_counter(create(path)?, columns)
    }
}

/// File names of the sentence and counter reports
///
/// `posts` is the document limit as given on the command line and `date` the
/// run date, so reruns on other days never overwrite earlier reports.
pub fn report_file_names(posts: &str, date: &str, set: DepSetType) -> (String, String) {
    let set = set.as_str().to_ascii_lowercase();
    (
        format!("dependency_set_from_first_{}_posts_lg_sents_{}_{}.csv", posts, date, set),
        format!("dependency_set_from_first_{}_posts_lg_counter_{}_{}.csv", posts, date, set),
    )
}

pub(crate) fn create(path: &Path) -> Result<BufWriter<File>, ReportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ReportError::Io {
            path: path.display().to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::Occurrence;

    fn occurrence(form: &str, doc_index: usize) -> Occurrence {
        Occurrence {
            verb_form: form.to_string(),
            doc_index,
            sent_index: 0,
            sentence: format!("They {} it, really.", form),
        }
    }

    fn fixture() -> (Accumulator, DependencySet) {
        let set = DependencySet::new(["nsubj", "dobj"]);
        let mut acc = Accumulator::new();
        let both = CombinationKey::from_labels(["nsubj", "dobj"]);
        let subj = CombinationKey::from_labels(["nsubj"]);
        acc.insert("take", both.clone(), occurrence("took", 0));
        acc.insert("take", CombinationKey::default(), occurrence("take", 1));
        acc.insert("take", both, occurrence("takes", 2));
        acc.insert("go", subj, occurrence("went", 3));
        (acc, set)
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<(), ReportError>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_sentence_report_order() {
        let (acc, set) = fixture();
        let writer = ReportWriter::new(&acc, &set);
        let csv = render(|out| writer.write_sentences(out));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Lemma (V),Verb form,Dep struct,Sentence,Doc index,Sent index",
                "take,take,NO_DEPS,\"They take it, really.\",1,0",
                "take,took,dobj_nsubj,\"They took it, really.\",0,0",
                "take,takes,dobj_nsubj,\"They takes it, really.\",2,0",
                "go,went,nsubj,\"They went it, really.\",3,0",
            ]
        );
    }

    #[test]
    fn test_counter_report_counts() {
        let (acc, set) = fixture();
        let writer = ReportWriter::new(&acc, &set);
        let csv = render(|out| writer.write_counter(out, ColumnSet::Count));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Lemma (V),NO_DEPS_COUNT,dobj_COUNT,nsubj_COUNT,dobj_nsubj_COUNT",
                "take,1,0,0,2",
                "go,0,0,1,0",
            ]
        );
    }

    #[test]
    fn test_counter_report_both() {
        let (acc, set) = fixture();
        let writer = ReportWriter::new(&acc, &set);
        let csv = render(|out| writer.write_counter(out, ColumnSet::Both));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Lemma (V),NO_DEPS_COUNT,NO_DEPS%,dobj_COUNT,dobj%,nsubj_COUNT,nsubj%,dobj_nsubj_COUNT,dobj_nsubj%"
        );
        assert_eq!(lines[1], "take,1,0.3333333333333333,0,0,0,0,2,0.6666666666666666");
        assert_eq!(lines[2], "go,0,0,0,0,1,1.0,0,0");
    }

    #[test]
    fn test_percentages_sum_to_one() {
        let (acc, set) = fixture();
        let writer = ReportWriter::new(&acc, &set);
        let csv = render(|out| writer.write_counter(out, ColumnSet::Percent));
        for line in csv.lines().skip(1) {
            let sum: f64 = line
                .split(',')
                .skip(1)
                .map(|v| v.parse::<f64>().unwrap())
                .sum();
            assert!((sum - 1.0).abs() < 1e-9, "{}", line);
        }
    }

    #[test]
    fn test_column_set_from_str() {
        assert_eq!("count".parse::<ColumnSet>(), Ok(ColumnSet::Count));
        assert_eq!("PERCENT".parse::<ColumnSet>(), Ok(ColumnSet::Percent));
        assert_eq!("both".parse::<ColumnSet>(), Ok(ColumnSet::Both));
        assert!("all".parse::<ColumnSet>().is_err());
    }

    #[test]
    fn test_report_file_names() {
        let (sents, counter) = report_file_names("100", "2024_01_31", DepSetType::NonClausal);
        assert_eq!(
            sents,
            "dependency_set_from_first_100_posts_lg_sents_2024_01_31_non_clausal.csv"
        );
        assert_eq!(
            counter,
            "dependency_set_from_first_100_posts_lg_counter_2024_01_31_non_clausal.csv"
        );
    }

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(0, 5), "0");
        assert_eq!(format_ratio(1, 2), "0.5");
        assert_eq!(format_ratio(3, 3), "1.0");
    }
}
