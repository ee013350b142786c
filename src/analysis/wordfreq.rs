//! Word frequency across all message bodies.
//!
//! Punctuation handling is deliberately light: enough that `hello,` and
//! `Hello` land on the same key.

use super::stopwords::load_ignore_list;
use super::Aggregator;
use crate::models::ReportOutput;
use crate::time::LocalizedMessage;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use tracing::debug;

/// Characters stripped from both ends of every token.
const STRIP_CHARS: &[char] = &['?', '!', ':', ',', '.', '"', '(', ')', '*', '\'', '-'];

/// Normalize a whitespace-delimited token into a table key.
pub fn normalize_word(token: &str) -> String {
    token
        .replace("&quot;", "\"")
        .trim_matches(STRIP_CHARS)
        .to_lowercase()
}

/// Count normalized words. Tokens that normalize to nothing are dropped.
pub fn count_words(messages: &[LocalizedMessage]) -> BTreeMap<String, usize> {
    let mut words: BTreeMap<String, usize> = BTreeMap::new();

    for msg in messages {
        for token in msg.body().split_whitespace() {
            let word = normalize_word(token);
            if word.is_empty() {
                continue;
            }
            *words.entry(word).or_default() += 1;
        }
    }

    words
}

/// Format the qualifying words in alphabetical order.
///
/// Tabular lines are `word count`; wordle lines repeat `word ` `count` times.
pub fn frequency_lines(
    words: &BTreeMap<String, usize>,
    ignore: &HashSet<String>,
    min_count: usize,
    wordle: bool,
) -> Vec<String> {
    words
        .iter()
        .filter(|&(word, &count)| count >= min_count && !ignore.contains(word.as_str()))
        .map(|(word, &count)| {
            if wordle {
                format!("{} ", word).repeat(count)
            } else {
                format!("{} {}", word, count)
            }
        })
        .collect()
}

/// Text-only word-frequency report.
#[derive(Debug, Clone)]
pub struct WordFrequencyReport {
    min_count: usize,
    ignore_file: PathBuf,
    wordle: bool,
}

impl WordFrequencyReport {
    pub fn new(min_count: usize, ignore_file: impl Into<PathBuf>, wordle: bool) -> Self {
        Self {
            min_count,
            ignore_file: ignore_file.into(),
            wordle,
        }
    }
}

impl Aggregator for WordFrequencyReport {
    fn name(&self) -> &'static str {
        "wordfreq"
    }

    fn run(&self, messages: &[LocalizedMessage]) -> ReportOutput {
        let words = count_words(messages);
        debug!("Counted {} distinct words", words.len());

        let ignore = load_ignore_list(&self.ignore_file);
        ReportOutput::Text(frequency_lines(
            &words,
            &ignore,
            self.min_count,
            self.wordle,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::localized;
    use std::io::Write;

    fn repeated(word: &str, times: usize) -> String {
        vec![word; times].join(" ")
    }

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("Hello,"), "hello");
        assert_eq!(normalize_word("hello"), "hello");
        assert_eq!(normalize_word("(\"Deploy!\")"), "deploy");
        assert_eq!(normalize_word("&quot;quoted&quot;"), "quoted");
        assert_eq!(normalize_word("don't"), "don't");
        assert_eq!(normalize_word("--"), "");
    }

    #[test]
    fn test_count_merges_punctuation_variants() {
        let messages = localized(&[
            ("2013-04-01T09:00:00Z", "Bob", "Hello, world"),
            ("2013-04-01T09:01:00Z", "Ann", "hello world!"),
            ("2013-04-01T09:02:00Z", "Ann", "-- ..."),
        ]);
        let words = count_words(&messages);
        assert_eq!(words.get("hello"), Some(&2));
        assert_eq!(words.get("world"), Some(&2));
        assert_eq!(words.len(), 2);
    }

    #[test]
    fn test_threshold_boundary() {
        let messages = localized(&[
            ("2013-04-01T09:00:00Z", "Bob", repeated("exactly", 100).as_str()),
            ("2013-04-01T09:01:00Z", "Bob", repeated("almost", 99).as_str()),
        ]);
        let words = count_words(&messages);
        let lines = frequency_lines(&words, &HashSet::new(), 100, false);
        assert_eq!(lines, vec!["exactly 100".to_string()]);
    }

    #[test]
    fn test_lines_sorted_and_ignored() {
        let mut words = BTreeMap::new();
        words.insert("zeta".to_string(), 150);
        words.insert("alpha".to_string(), 120);
        words.insert("the".to_string(), 900);
        let ignore: HashSet<String> = ["the".to_string()].into_iter().collect();

        let lines = frequency_lines(&words, &ignore, 100, false);
        assert_eq!(lines, vec!["alpha 120", "zeta 150"]);
    }

    #[test]
    fn test_wordle_format() {
        let mut words = BTreeMap::new();
        words.insert("ship".to_string(), 3);
        let lines = frequency_lines(&words, &HashSet::new(), 1, true);
        assert_eq!(lines, vec!["ship ship ship ".to_string()]);
    }

    #[test]
    fn test_report_reads_ignore_file() {
        let mut ignore = tempfile::NamedTempFile::new().unwrap();
        writeln!(ignore, "common").unwrap();

        let body = format!("{} {}", repeated("common", 100), repeated("rare", 100));
        let messages = localized(&[("2013-04-01T09:00:00Z", "Bob", body.as_str())]);

        let report = WordFrequencyReport::new(100, ignore.path(), false);
        assert_eq!(
            report.run(&messages),
            ReportOutput::Text(vec!["rare 100".to_string()])
        );
    }

    #[test]
    fn test_report_without_ignore_file() {
        let dir = tempfile::tempdir().unwrap();
        let body = repeated("word", 100);
        let messages = localized(&[("2013-04-01T09:00:00Z", "Bob", body.as_str())]);

        let report = WordFrequencyReport::new(100, dir.path().join("missing.txt"), false);
        assert_eq!(
            report.run(&messages),
            ReportOutput::Text(vec!["word 100".to_string()])
        );
    }
}
