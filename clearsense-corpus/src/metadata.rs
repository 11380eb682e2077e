//! One-line instance headers.
//!
//! ```text
//! <path> <sentence> <token> <lemma> <label>\t<original sentence text>
//! ```
//!
//! `sentence` and `token` are a bare index, or `index[start,end]` when the
//! field is anchored to the original text.

use crate::errors::{CorpusError, CorpusResult};
use clearsense::Span;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static INDEX_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)(?:\[(\d+),(\d+)\])?$").expect("Invalid index reference regex")
});

/// An index with an optional anchoring span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRef {
    pub index: usize,
    pub span: Option<Span>,
}

impl IndexRef {
    pub fn new(index: usize) -> Self {
        Self { index, span: None }
    }

    pub fn anchored(index: usize, span: Span) -> Self {
        Self {
            index,
            span: Some(span),
        }
    }

    fn parse(field: &str, name: &str) -> CorpusResult<Self> {
        let malformed = |message: String| CorpusError::MalformedMetadata { line: 0, message };
        let captures = INDEX_REF
            .captures(field)
            .ok_or_else(|| malformed(format!("invalid {} reference {:?}", name, field)))?;
        let number = |group: usize| -> CorpusResult<Option<usize>> {
            captures
                .get(group)
                .map(|m| {
                    m.as_str().parse::<usize>().map_err(|e| {
                        malformed(format!("invalid {} reference {:?}: {}", name, field, e))
                    })
                })
                .transpose()
        };
        let index = number(1)?.unwrap_or_default();
        let span = match (number(2)?, number(3)?) {
            (Some(start), Some(end)) if start <= end => Some(Span::new(start, end)),
            (Some(start), Some(end)) => {
                return Err(malformed(format!(
                    "{} span [{},{}] ends before it starts",
                    name, start, end
                )))
            }
            _ => None,
        };
        Ok(Self { index, span })
    }
}

impl fmt::Display for IndexRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(f, "{}[{},{}]", self.index, span.start, span.end),
            None => write!(f, "{}", self.index),
        }
    }
}

/// Header describing one labeled focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceMetadata {
    pub path: String,
    pub sentence: IndexRef,
    pub token: IndexRef,
    pub lemma: String,
    pub label: String,
    pub original_text: String,
}

impl InstanceMetadata {
    /// Returns true if both the sentence and the token are anchored.
    pub fn is_anchored(&self) -> bool {
        self.sentence.span.is_some() && self.token.span.is_some()
    }

    /// Decode a header line (without any leading `#`).
    ///
    /// A trailing `-suffix` on the label is stripped: everything from the
    /// first `-` onward is discarded.
    pub fn decode(line: &str) -> CorpusResult<Self> {
        let (prefix, original_text) = line.split_once('\t').ok_or_else(|| {
            CorpusError::MalformedMetadata {
                line: 0,
                message: format!("missing tab before original text in {:?}", line),
            }
        })?;

        let fields: Vec<&str> = prefix.split(' ').collect();
        let [path, sentence, token, lemma, label] = fields[..] else {
            return Err(CorpusError::MalformedMetadata {
                line: 0,
                message: format!("expected 5 space-separated fields, found {}", fields.len()),
            });
        };
        if [path, lemma, label].iter().any(|field| field.is_empty()) {
            return Err(CorpusError::MalformedMetadata {
                line: 0,
                message: format!("empty field in {:?}", prefix),
            });
        }

        Ok(Self {
            path: path.to_string(),
            sentence: IndexRef::parse(sentence, "sentence")?,
            token: IndexRef::parse(token, "token")?,
            lemma: lemma.to_string(),
            label: strip_label_suffix(label).to_string(),
            original_text: original_text.to_string(),
        })
    }

    /// Render the header line; the exact inverse of [`InstanceMetadata::decode`].
    ///
    /// Each index field is written as `index[start,end]` when it has a span
    /// of its own and as a bare index otherwise; a span starting at 0 is
    /// still a span. Fields that `decode` could not split back apart are
    /// rejected: `path`, `lemma` and `label` must be non-empty and free of
    /// whitespace, and the original text must stay on one line.
    pub fn encode(&self) -> CorpusResult<String> {
        for (field, value) in [("path", &self.path), ("lemma", &self.lemma), ("label", &self.label)] {
            if value.is_empty() || value.contains(char::is_whitespace) {
                return Err(CorpusError::UnencodableField {
                    field,
                    value: value.clone(),
                });
            }
        }
        if self.original_text.contains(['\n', '\r']) {
            return Err(CorpusError::UnencodableField {
                field: "original_text",
                value: self.original_text.clone(),
            });
        }
        Ok(self.to_string())
    }
}

impl fmt::Display for InstanceMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}\t{}",
            self.path, self.sentence, self.token, self.lemma, self.label, self.original_text
        )
    }
}

/// Remove a `-suffix` annotation from a label.
pub fn strip_label_suffix(label: &str) -> &str {
    label.split_once('-').map_or(label, |(bare, _)| bare)
}
