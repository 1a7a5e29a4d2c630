//! Lexical dependency inference over task titles.
//!
//! A task T is considered to depend on another task O of the same batch when
//! T's lower-cased title mentions O's lower-cased title right after one of the
//! [`PREREQUISITE_KEYWORDS`] (optionally followed by "the"), or contains one of
//! the literal forms `"<O> then"` / `"after <O>"`.
//!
//! The heuristic is approximate on purpose and kept as is: a title that is a
//! substring of another title can produce a false-positive edge, and
//! paraphrased references are missed.

use crate::TaskNodeData;
use regex::Regex;
use tracing::debug;

/// Keywords that, directly followed by another task's title, mark that task as
/// a prerequisite.
pub const PREREQUISITE_KEYWORDS: [&str; 10] = [
    "after",
    "before",
    "requires",
    "dependency",
    "prerequisite",
    "following",
    "preceding",
    "once",
    "then",
    "next",
];

/// Precompiled patterns for recognising references to one candidate
/// prerequisite title.
#[derive(Debug)]
struct ReferenceMatcher {
    keyword_pattern: Option<Regex>,
    then_form: String,
    after_form: String,
}

impl ReferenceMatcher {
    /// Returns `None` for empty or whitespace-only titles, which never match.
    fn new(title: &str) -> Option<Self> {
        if title.trim().is_empty() {
            return None;
        }

        let lowered = title.to_lowercase();
        let source = format!(
            r"\b(?:{})\s+(?:the\s+)?{}",
            PREREQUISITE_KEYWORDS.join("|"),
            regex::escape(&lowered)
        );
        let keyword_pattern = match Regex::new(&source) {
            Ok(pattern) => Some(pattern),
            Err(err) => {
                debug!(title, %err, "Keyword pattern rejected, using literal forms only");
                None
            }
        };

        Some(Self {
            keyword_pattern,
            then_form: format!("{lowered} then"),
            after_form: format!("after {lowered}"),
        })
    }

    /// Whether `dependent_title` (already lower-cased) references this title.
    fn is_referenced_by(&self, dependent_title: &str) -> bool {
        self.keyword_pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(dependent_title))
            || dependent_title.contains(&self.then_form)
            || dependent_title.contains(&self.after_form)
    }
}

/// Infer prerequisites for every task of a batch.
///
/// Returns, for each task index, the indices of the tasks it depends on in
/// input order. A task is never reported as its own prerequisite; identity is
/// positional, so repeated titles still count as distinct tasks.
pub(crate) fn infer_prerequisites<T: TaskNodeData>(tasks: &[T]) -> Vec<Vec<usize>> {
    let candidates: Vec<(usize, ReferenceMatcher)> = tasks
        .iter()
        .enumerate()
        .filter_map(|(index, task)| ReferenceMatcher::new(task.title()).map(|m| (index, m)))
        .collect();

    tasks
        .iter()
        .enumerate()
        .map(|(index, task)| {
            let title = task.title().to_lowercase();
            candidates
                .iter()
                .filter(|(other, matcher)| *other != index && matcher.is_referenced_by(&title))
                .map(|(other, _)| *other)
                .collect()
        })
        .collect()
}
