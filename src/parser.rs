//! The segmentation/tokenization/parsing collaborator.

use crate::tree::{FeatureKey, ParsedTree, Token};
use unicode_segmentation::UnicodeSegmentation;

/// An external NLP engine that returns text only, never positions.
///
/// Every token produced by [`NlpParser::tokenize`] must be a literal
/// substring of the sentence it was produced from, and every sentence a
/// literal substring of its input; anchoring relies on locating them.
pub trait NlpParser {
    /// Split text into sentences.
    fn segment(&self, text: &str) -> Vec<String>;

    /// Split a sentence into tokens.
    fn tokenize(&self, sentence: &str) -> Vec<String>;

    /// Parse tokens into a tree whose tokens carry [`FeatureKey::Text`].
    fn parse(&self, tokens: &[String]) -> ParsedTree;
}

impl<P: NlpParser + ?Sized> NlpParser for &P {
    fn segment(&self, text: &str) -> Vec<String> {
        (**self).segment(text)
    }

    fn tokenize(&self, sentence: &str) -> Vec<String> {
        (**self).tokenize(sentence)
    }

    fn parse(&self, tokens: &[String]) -> ParsedTree {
        (**self).parse(tokens)
    }
}

/// Rule-free parser built on Unicode text segmentation (UAX #29).
///
/// Sentences follow Unicode sentence boundaries, tokens are the
/// non-whitespace word-boundary pieces, and the tree is flat: the first
/// token is the root and governs every other token.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeParser;

impl NlpParser for UnicodeParser {
    fn segment(&self, text: &str) -> Vec<String> {
        text.unicode_sentences()
            .map(str::trim)
            .filter(|sentence| !sentence.is_empty())
            .map(String::from)
            .collect()
    }

    fn tokenize(&self, sentence: &str) -> Vec<String> {
        sentence
            .split_word_bounds()
            .filter(|piece| !piece.trim().is_empty())
            .map(String::from)
            .collect()
    }

    fn parse(&self, tokens: &[String]) -> ParsedTree {
        let nodes = tokens
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let token = Token::new(index, text.as_str())
                    .with_feature(FeatureKey::Lemma, text.to_lowercase());
                if index == 0 {
                    token
                } else {
                    token.with_head(0).with_feature(FeatureKey::Dep, "dep")
                }
            })
            .collect();
        ParsedTree::new(0, nodes, 0)
    }
}
