//! Recovering character spans for sentences and tokens.
//!
//! The parser collaborator returns text only. Positions are recovered by a
//! forward-only search: each sentence is located in its line starting at the
//! end of the previous sentence, and each token is located in its sentence
//! starting at the end of the previous token. Repeated substrings therefore
//! resolve to their first occurrence at or after the previous match.

use crate::errors::{CoreError, CoreResult};
use crate::parser::NlpParser;
use crate::span::{char_offset, split_chunks, Chunk, Span};
use crate::tree::{FeatureKey, ParsedTree};
use std::io::Read;

/// Locate `needle` in `haystack` at or after character offset `from`.
///
/// Returns the character span relative to `haystack`.
fn find_from(haystack: &str, needle: &str, from: usize) -> Option<Span> {
    let from_byte = crate::span::byte_offset(haystack, from)?;
    let found = haystack[from_byte..].find(needle)? + from_byte;
    let start = char_offset(haystack, found);
    Some(Span::new(start, start + needle.chars().count()))
}

/// A sentence or token that could not be located during lenient anchoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorFailure {
    /// The sentence was dropped; no tree was produced for it.
    Sentence {
        line: usize,
        sentence: String,
        from: usize,
    },
    /// The token was kept without a span.
    Token {
        /// Index of the produced tree in the output
        tree: usize,
        token_index: usize,
        token: String,
        from: usize,
    },
}

/// Trees produced by lenient anchoring, with every failure that occurred.
#[derive(Debug, Default)]
pub struct AnchorReport {
    pub trees: Vec<ParsedTree>,
    pub failures: Vec<AnchorFailure>,
}

impl AnchorReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Stateless offset arithmetic over an original text.
///
/// Tree indices are assigned sequentially over all sentences of the text.
pub struct SpanTracker<P> {
    parser: P,
}

impl<P: NlpParser> SpanTracker<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Anchor every sentence and token of `text`.
    ///
    /// Fails on the first sentence or token that cannot be located.
    pub fn anchor(&self, text: &str) -> CoreResult<Vec<ParsedTree>> {
        let mut trees = Vec::new();
        self.walk(text, |event| match event {
            Located::Tree(tree) => {
                trees.push(tree);
                Ok(())
            }
            Located::MissingSentence { line, sentence, from } => {
                Err(CoreError::SentenceNotFound { line, sentence, from })
            }
            Located::MissingToken {
                sentence,
                token_index,
                token,
                from,
                ..
            } => Err(CoreError::TokenNotFound {
                sentence,
                token_index,
                token,
                from,
            }),
        })?;
        tracing::debug!(trees = trees.len(), "anchored text");
        Ok(trees)
    }

    /// Anchor `text`, recording failures instead of aborting.
    ///
    /// Unlocated tokens keep `span == None` and do not move the search
    /// origin; unlocated sentences are skipped.
    pub fn anchor_lenient(&self, text: &str) -> AnchorReport {
        let mut report = AnchorReport::default();
        let outcome: CoreResult<()> = self.walk(text, |event| {
            match event {
                Located::Tree(tree) => report.trees.push(tree),
                Located::MissingSentence { line, sentence, from } => {
                    tracing::warn!(line, %sentence, from, "sentence not found in line");
                    report
                        .failures
                        .push(AnchorFailure::Sentence { line, sentence, from });
                }
                Located::MissingToken {
                    tree,
                    token_index,
                    token,
                    from,
                    ..
                } => {
                    tracing::warn!(tree, token_index, %token, from, "token not found in sentence");
                    report.failures.push(AnchorFailure::Token {
                        tree,
                        token_index,
                        token,
                        from,
                    });
                }
            }
            Ok(())
        });
        debug_assert!(outcome.is_ok());
        report
    }

    /// Read the whole source and anchor it.
    pub fn read<R: Read>(&self, mut reader: R) -> CoreResult<Vec<ParsedTree>> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        self.anchor(&text)
    }

    fn walk<F>(&self, text: &str, mut sink: F) -> CoreResult<()>
    where
        F: FnMut(Located) -> CoreResult<()>,
    {
        let mut tree_index = 0;
        for chunk in split_chunks(text) {
            if chunk.is_blank() {
                continue;
            }
            tracing::trace!(line = chunk.line, span = %chunk.span, "segmenting chunk");

            let mut sentence_end = 0;
            for sentence in self.parser.segment(chunk.text) {
                let sentence = sentence.trim();
                let Some(local) = find_from(chunk.text, sentence, sentence_end) else {
                    sink(Located::MissingSentence {
                        line: chunk.line,
                        sentence: sentence.to_string(),
                        from: sentence_end,
                    })?;
                    continue;
                };
                sentence_end = local.end;

                let tree = self.anchor_sentence(&chunk, sentence, local, tree_index, &mut sink)?;
                sink(Located::Tree(tree))?;
                tree_index += 1;
            }
        }
        Ok(())
    }

    fn anchor_sentence<F>(
        &self,
        chunk: &Chunk<'_>,
        sentence: &str,
        local: Span,
        tree_index: usize,
        sink: &mut F,
    ) -> CoreResult<ParsedTree>
    where
        F: FnMut(Located) -> CoreResult<()>,
    {
        let sentence_span = local.shift(chunk.span.start);
        let tokens = self.parser.tokenize(sentence);
        let mut tree = self.parser.parse(&tokens);
        tree.index = tree_index;

        let mut token_end = 0;
        for token in tree.tokens_mut() {
            let text = token.text().to_string();
            match find_from(sentence, &text, token_end) {
                Some(found) => {
                    token_end = found.end;
                    token.span = Some(found.shift(sentence_span.start));
                }
                None => {
                    token.span = None;
                    sink(Located::MissingToken {
                        tree: tree_index,
                        sentence: sentence_span,
                        token_index: token.index,
                        token: text,
                        from: token_end,
                    })?;
                }
            }
        }

        tree.span = Some(sentence_span);
        tree.add_feature(FeatureKey::Text, sentence);
        Ok(tree)
    }
}

/// Events produced while walking a text.
enum Located {
    Tree(ParsedTree),
    MissingSentence {
        line: usize,
        sentence: String,
        from: usize,
    },
    MissingToken {
        tree: usize,
        sentence: Span,
        token_index: usize,
        token: String,
        from: usize,
    },
}

/// Reads a text source and anchors it with a parser.
pub struct AnchoredTextReader<P> {
    tracker: SpanTracker<P>,
}

impl<P: NlpParser> AnchoredTextReader<P> {
    pub fn new(parser: P) -> Self {
        Self {
            tracker: SpanTracker::new(parser),
        }
    }

    /// Read all trees from `reader`; I/O and anchoring failures are fatal.
    pub fn read_instances<R: Read>(&self, reader: R) -> CoreResult<Vec<ParsedTree>> {
        self.tracker.read(reader)
    }
}
