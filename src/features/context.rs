//! Context builders: token groups relative to an instance's focus.

use crate::instance::FocusInstance;
use crate::tree::{FeatureKey, Token};

/// A group of tokens with a stable identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NlpContext<'a> {
    identifier: String,
    tokens: Vec<&'a Token>,
}

impl<'a> NlpContext<'a> {
    pub fn new(identifier: impl Into<String>, tokens: Vec<&'a Token>) -> Self {
        Self {
            identifier: identifier.into(),
            tokens,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn tokens(&self) -> &[&'a Token] {
        &self.tokens
    }
}

/// Produces zero or more contexts for an instance.
///
/// Identifiers must depend only on the builder's configuration and the
/// structure it follows, never on token content, so that the same semantic
/// context gets the same identifier on every instance.
pub trait ContextFactory: Send + Sync {
    fn contexts<'a>(&self, instance: &'a FocusInstance) -> Vec<NlpContext<'a>>;
}

/// The focus token alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusContext;

impl ContextFactory for FocusContext {
    fn contexts<'a>(&self, instance: &'a FocusInstance) -> Vec<NlpContext<'a>> {
        vec![NlpContext::new("focus", vec![instance.focus_token()])]
    }
}

/// One context per relative offset, e.g. `-1` for the preceding token.
///
/// Offsets that fall outside the sentence produce no context.
#[derive(Debug, Clone, Default)]
pub struct OffsetContext {
    offsets: Vec<isize>,
}

impl OffsetContext {
    pub fn new(offsets: impl IntoIterator<Item = isize>) -> Self {
        Self {
            offsets: offsets.into_iter().collect(),
        }
    }
}

impl ContextFactory for OffsetContext {
    fn contexts<'a>(&self, instance: &'a FocusInstance) -> Vec<NlpContext<'a>> {
        let tree = instance.tree();
        self.offsets
            .iter()
            .filter_map(|&offset| {
                let position = instance.focus.checked_add_signed(offset)?;
                let token = tree.get(position)?;
                Some(NlpContext::new(format!("tok[{}]", offset), vec![token]))
            })
            .collect()
    }
}

/// All tokens within a window around the focus, focus excluded, as one group.
#[derive(Debug, Clone, Copy)]
pub struct WindowContext {
    before: usize,
    after: usize,
}

impl WindowContext {
    pub fn new(before: usize, after: usize) -> Self {
        Self { before, after }
    }
}

impl ContextFactory for WindowContext {
    fn contexts<'a>(&self, instance: &'a FocusInstance) -> Vec<NlpContext<'a>> {
        let tokens = instance.tree().tokens();
        let start = instance.focus.saturating_sub(self.before);
        let end = instance.focus.saturating_add(self.after).saturating_add(1).min(tokens.len());
        let window: Vec<&Token> = tokens[start..end]
            .iter()
            .filter(|token| token.index != instance.focus)
            .collect();
        if window.is_empty() {
            return Vec::new();
        }
        vec![NlpContext::new(
            format!("win[-{},+{}]", self.before, self.after),
            window,
        )]
    }
}

/// The token governing the focus; nothing for the root.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadContext;

impl ContextFactory for HeadContext {
    fn contexts<'a>(&self, instance: &'a FocusInstance) -> Vec<NlpContext<'a>> {
        instance
            .tree()
            .head_of(instance.focus)
            .map(|head| vec![NlpContext::new("head", vec![head])])
            .unwrap_or_default()
    }
}

/// Dependents of the focus.
///
/// Grouped: one `children` context holding every dependent. Split: one
/// context per dependent, identified by its relation (`child:nsubj`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ChildrenContext {
    by_relation: bool,
}

impl ChildrenContext {
    pub fn grouped() -> Self {
        Self { by_relation: false }
    }

    pub fn by_relation() -> Self {
        Self { by_relation: true }
    }
}

impl ContextFactory for ChildrenContext {
    fn contexts<'a>(&self, instance: &'a FocusInstance) -> Vec<NlpContext<'a>> {
        let children = instance.tree().children_of(instance.focus);
        if children.is_empty() {
            return Vec::new();
        }
        if !self.by_relation {
            return vec![NlpContext::new("children", children)];
        }
        children
            .into_iter()
            .map(|child| {
                let relation = child.feature(&FeatureKey::Dep).unwrap_or("_");
                NlpContext::new(format!("child:{}", relation), vec![child])
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ParsedTree;
    use std::sync::Arc;

    fn instance(focus: usize) -> FocusInstance {
        // the fox jumped over the fence
        let dep = |index: usize, text: &str, head: usize, rel: &str| {
            Token::new(index, text)
                .with_head(head)
                .with_feature(FeatureKey::Dep, rel)
        };
        let tokens = vec![
            dep(0, "the", 1, "det"),
            dep(1, "fox", 2, "nsubj"),
            Token::new(2, "jumped").with_feature(FeatureKey::Dep, "root"),
            dep(3, "over", 5, "prep"),
            dep(4, "the", 5, "det"),
            dep(5, "fence", 2, "nmod"),
        ];
        FocusInstance::new(0, focus, Arc::new(ParsedTree::new(0, tokens, 2))).unwrap()
    }

    fn render(contexts: &[NlpContext<'_>]) -> Vec<(String, Vec<String>)> {
        contexts
            .iter()
            .map(|c| {
                (
                    c.identifier().to_string(),
                    c.tokens().iter().map(|t| t.text().to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_offsets_skip_out_of_range() {
        let instance = instance(1);
        let contexts = OffsetContext::new([-2, -1, 1]).contexts(&instance);
        assert_eq!(
            render(&contexts),
            vec![
                ("tok[-1]".to_string(), vec!["the".to_string()]),
                ("tok[1]".to_string(), vec!["jumped".to_string()]),
            ]
        );
    }

    #[test]
    fn test_window_excludes_focus() {
        let instance = instance(2);
        let contexts = WindowContext::new(1, 2).contexts(&instance);
        assert_eq!(
            render(&contexts),
            vec![(
                "win[-1,+2]".to_string(),
                vec!["fox".to_string(), "over".to_string(), "the".to_string()]
            )]
        );
    }

    #[test]
    fn test_unbounded_window_stops_at_tree_end() {
        let instance = instance(2);
        let contexts = WindowContext::new(1, usize::MAX).contexts(&instance);
        assert_eq!(contexts.len(), 1);
        assert_eq!(
            render(&contexts)[0].1,
            vec!["fox".to_string(), "over".to_string(), "the".to_string(), "fence".to_string()]
        );
    }

    #[test]
    fn test_head_of_root_is_empty() {
        assert!(HeadContext.contexts(&instance(2)).is_empty());
        let focus = instance(1);
        let contexts = HeadContext.contexts(&focus);
        assert_eq!(render(&contexts), vec![("head".to_string(), vec!["jumped".to_string()])]);
    }

    #[test]
    fn test_children() {
        let instance = instance(2);
        assert_eq!(
            render(&ChildrenContext::grouped().contexts(&instance)),
            vec![("children".to_string(), vec!["fox".to_string(), "fence".to_string()])]
        );
        assert_eq!(
            render(&ChildrenContext::by_relation().contexts(&instance)),
            vec![
                ("child:nsubj".to_string(), vec!["fox".to_string()]),
                ("child:nmod".to_string(), vec!["fence".to_string()]),
            ]
        );
    }
}
