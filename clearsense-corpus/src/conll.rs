//! Token-per-line dependency trees.
//!
//! Blocks are separated by blank lines. Each block starts with zero or more
//! `#` header lines followed by one tab-separated line per token:
//!
//! ```text
//! ID  FORM  LEMMA  POS  HEAD  DEPREL  [LABEL]
//! ```
//!
//! `ID` is 1-based, `HEAD` is 0 for the root, and `_` marks an empty column.

use crate::errors::{CorpusError, CorpusResult};
use clearsense::{FeatureKey, ParsedTree, Token};
use std::io::BufRead;

/// Placeholder for an empty column.
pub const EMPTY: &str = "_";

const MIN_COLUMNS: usize = 6;

/// A parsed block with its raw header lines.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeBlock {
    /// Header lines with the leading `#` and following whitespace removed
    pub header: Vec<String>,
    pub tree: ParsedTree,
    /// 1-based line number of the first token line
    pub line: usize,
}

/// Read every block from `reader`; tree indices count blocks from 0.
pub fn read_blocks<R: BufRead>(reader: R) -> CorpusResult<Vec<TreeBlock>> {
    let mut blocks = Vec::new();
    let mut header = Vec::new();
    let mut rows: Vec<(usize, String)> = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let number = number + 1;
        let trimmed = line.trim_end_matches('\r');

        if trimmed.trim().is_empty() {
            if !rows.is_empty() {
                blocks.push(build_block(blocks.len(), std::mem::take(&mut header), &rows)?);
                rows.clear();
            }
        } else if let Some(rest) = trimmed.strip_prefix('#') {
            if !rows.is_empty() {
                return Err(CorpusError::MalformedTree {
                    line: number,
                    message: "header line inside a token block".to_string(),
                });
            }
            header.push(rest.trim_start().to_string());
        } else {
            rows.push((number, trimmed.to_string()));
        }
    }
    if !rows.is_empty() {
        blocks.push(build_block(blocks.len(), header, &rows)?);
    } else if !header.is_empty() {
        return Err(CorpusError::MalformedTree {
            line: 0,
            message: "header lines without a following tree".to_string(),
        });
    }

    tracing::debug!(blocks = blocks.len(), "read dependency trees");
    Ok(blocks)
}

fn build_block(index: usize, header: Vec<String>, rows: &[(usize, String)]) -> CorpusResult<TreeBlock> {
    let mut tokens = Vec::with_capacity(rows.len());
    let mut root = None;

    for (position, (number, row)) in rows.iter().enumerate() {
        let malformed = |message: String| CorpusError::MalformedTree {
            line: *number,
            message,
        };
        let columns: Vec<&str> = row.split('\t').collect();
        if columns.len() < MIN_COLUMNS {
            return Err(malformed(format!(
                "expected at least {} tab-separated columns, found {}",
                MIN_COLUMNS,
                columns.len()
            )));
        }

        let id: usize = columns[0]
            .parse()
            .map_err(|_| malformed(format!("invalid token id {:?}", columns[0])))?;
        if id != position + 1 {
            return Err(malformed(format!("expected token id {}, found {}", position + 1, id)));
        }
        let head: usize = columns[4]
            .parse()
            .map_err(|_| malformed(format!("invalid head {:?}", columns[4])))?;
        if head > rows.len() {
            return Err(malformed(format!("head {} outside tree of {} tokens", head, rows.len())));
        }

        let mut token = Token::new(position, columns[1]);
        for (key, value) in [
            (FeatureKey::Lemma, columns[2]),
            (FeatureKey::Pos, columns[3]),
            (FeatureKey::Dep, columns[5]),
        ] {
            if value != EMPTY {
                token.add_feature(key, value);
            }
        }
        if let Some(&label) = columns.get(MIN_COLUMNS) {
            if label != EMPTY {
                token.add_feature(FeatureKey::Sense, label);
            }
        }
        if head == 0 {
            root.get_or_insert(position);
        } else {
            token.head = Some(head - 1);
        }
        tokens.push(token);
    }

    let line = rows.first().map_or(0, |(number, _)| *number);
    Ok(TreeBlock {
        header,
        tree: ParsedTree::new(index, tokens, root.unwrap_or(0)),
        line,
    })
}

/// Render `tree` as token lines, writing `label_key` into the label column.
pub fn tree_to_string(tree: &ParsedTree, label_key: &FeatureKey) -> String {
    let column = |token: &Token, key: &FeatureKey| token.feature(key).unwrap_or(EMPTY).to_string();
    tree.tokens()
        .iter()
        .map(|token| {
            let head = token.head.map_or(0, |head| head + 1);
            [
                (token.index + 1).to_string(),
                token.text().to_string(),
                column(token, &FeatureKey::Lemma),
                column(token, &FeatureKey::Pos),
                head.to_string(),
                column(token, &FeatureKey::Dep),
                column(token, label_key),
            ]
            .join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
