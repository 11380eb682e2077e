//! Parsed dependency structures.
//!
//! A [`ParsedTree`] is an ordered sequence of [`Token`]s with a designated
//! root. Anchoring is additive: a tree and its tokens may carry a [`Span`]
//! into the original text, checked with [`ParsedTree::is_anchored`] rather
//! than through a separate type.

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Keys of the string features attached to tokens, trees and instances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureKey {
    /// Surface form
    Text,
    Lemma,
    /// Part-of-speech tag
    Pos,
    /// Dependency relation to the head
    Dep,
    /// Gold label
    Gold,
    /// Predicted or annotated sense
    Sense,
    /// Predicate lemma of a labeled focus
    Predicate,
    /// Verbatim instance header
    Metadata,
    /// Any other named feature, e.g. a resource lookup
    Custom(String),
}

impl FeatureKey {
    pub fn name(&self) -> &str {
        match self {
            FeatureKey::Text => "text",
            FeatureKey::Lemma => "lemma",
            FeatureKey::Pos => "pos",
            FeatureKey::Dep => "dep",
            FeatureKey::Gold => "gold",
            FeatureKey::Sense => "sense",
            FeatureKey::Predicate => "predicate",
            FeatureKey::Metadata => "metadata",
            FeatureKey::Custom(name) => name,
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single token of a parsed sentence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Token {
    /// Position within the sentence (0-based)
    pub index: usize,
    /// Index of the governing token, `None` for the root
    pub head: Option<usize>,
    /// Character span in the original text, when anchored
    pub span: Option<Span>,
    features: HashMap<FeatureKey, String>,
}

impl Token {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        let mut token = Self {
            index,
            ..Self::default()
        };
        token.add_feature(FeatureKey::Text, text);
        token
    }

    /// Set the head token.
    pub fn with_head(mut self, head: usize) -> Self {
        self.head = Some(head);
        self
    }

    /// Add a feature, builder style.
    pub fn with_feature(mut self, key: FeatureKey, value: impl Into<String>) -> Self {
        self.add_feature(key, value);
        self
    }

    pub fn add_feature(&mut self, key: FeatureKey, value: impl Into<String>) {
        self.features.insert(key, value.into());
    }

    pub fn feature(&self, key: &FeatureKey) -> Option<&str> {
        self.features.get(key).map(String::as_str)
    }

    /// Surface text of the token (empty if unset).
    pub fn text(&self) -> &str {
        self.feature(&FeatureKey::Text).unwrap_or("")
    }

    pub fn is_anchored(&self) -> bool {
        self.span.is_some()
    }
}

/// An ordered sequence of tokens with a designated root.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedTree {
    /// Position of this tree within its source (sentence number)
    pub index: usize,
    /// Index of the root token
    pub root: usize,
    /// Character span of the sentence in the original text, when anchored
    pub span: Option<Span>,
    tokens: Vec<Token>,
    features: HashMap<FeatureKey, String>,
}

impl ParsedTree {
    pub fn new(index: usize, tokens: Vec<Token>, root: usize) -> Self {
        Self {
            index,
            root,
            span: None,
            tokens,
            features: HashMap::new(),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn tokens_mut(&mut self) -> &mut [Token] {
        &mut self.tokens
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Token> {
        self.tokens.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn root_token(&self) -> Option<&Token> {
        self.tokens.get(self.root)
    }

    /// Governing token of `index`, if any.
    pub fn head_of(&self, index: usize) -> Option<&Token> {
        self.tokens
            .get(index)
            .and_then(|token| token.head)
            .and_then(|head| self.tokens.get(head))
    }

    /// Tokens governed by `index`, in sentence order.
    pub fn children_of(&self, index: usize) -> Vec<&Token> {
        self.tokens
            .iter()
            .filter(|token| token.head == Some(index))
            .collect()
    }

    pub fn add_feature(&mut self, key: FeatureKey, value: impl Into<String>) {
        self.features.insert(key, value.into());
    }

    pub fn feature(&self, key: &FeatureKey) -> Option<&str> {
        self.features.get(key).map(String::as_str)
    }

    /// A tree counts as anchored when it and every token carry a span.
    pub fn is_anchored(&self) -> bool {
        self.span.is_some() && self.tokens.iter().all(Token::is_anchored)
    }

    /// Token texts joined by single spaces.
    pub fn joined_text(&self) -> String {
        self.tokens
            .iter()
            .map(Token::text)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ParsedTree {
    /// Renders `text[start,end)` for each token, separated by spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(token.text())?;
            if let Some(span) = token.span {
                write!(f, "{}", span)?;
            }
        }
        Ok(())
    }
}
