//! Reading and writing labeled focus instances.
//!
//! Header lines double as instance headers: each one labels a focus token of
//! the tree that follows it. The writer emits one header per instance and
//! each distinct tree once, after the headers of all its instances.

use crate::conll::{read_blocks, tree_to_string};
use crate::errors::{CorpusError, CorpusResult};
use crate::metadata::{IndexRef, InstanceMetadata};
use clearsense::{FeatureKey, FocusInstance, Labeled, ParsedTree};
use std::collections::BTreeSet;
use std::io::{BufRead, Write};
use std::sync::Arc;

/// Sense used for foci that carry no real label.
pub const DEFAULT_SENSE: &str = "NONE";

/// Options for [`InstanceCorpusReader`].
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Keep only foci with these lemmas; empty keeps everything
    pub lemma_filter: BTreeSet<String>,
    /// Foci labeled with this sense are skipped
    pub default_sense: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            lemma_filter: BTreeSet::new(),
            default_sense: DEFAULT_SENSE.to_string(),
        }
    }
}

impl ReaderConfig {
    /// Restrict reading to the given lemmas.
    pub fn with_lemmas<I, S>(mut self, lemmas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lemma_filter = lemmas.into_iter().map(Into::into).collect();
        self
    }
}

/// Reads and writes corpora of labeled focus instances.
#[derive(Debug, Clone, Default)]
pub struct InstanceCorpusReader {
    config: ReaderConfig,
}

impl InstanceCorpusReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read every tree and attach its headers.
    ///
    /// For each header the focus token receives `Gold`, `Sense` and
    /// `Predicate`; the tree receives `Text`, and anchored headers set the
    /// tree and focus spans. A header that cannot be decoded aborts reading.
    pub fn read_trees<R: BufRead>(&self, reader: R) -> CorpusResult<Vec<(Vec<InstanceMetadata>, ParsedTree)>> {
        let mut trees = Vec::new();
        for block in read_blocks(reader)? {
            let mut tree = block.tree;
            let mut headers = Vec::with_capacity(block.header.len());
            for (offset, raw) in block.header.iter().enumerate() {
                // header lines sit directly above the first token line
                let line = block.line.saturating_sub(block.header.len() - offset);
                let metadata = InstanceMetadata::decode(raw).map_err(|e| e.at_line(line))?;
                apply_header(&mut tree, &metadata, line)?;
                headers.push(metadata);
            }
            trees.push((headers, tree));
        }
        Ok(trees)
    }

    /// Read labeled instances, one per gold-labeled focus token.
    ///
    /// The lemma filter matches the header lemma (`Predicate`) and falls back
    /// to the token's `Lemma` column. Instance indices count kept instances
    /// only, so skipped foci leave no gaps.
    pub fn read_instances<R: BufRead>(&self, reader: R) -> CorpusResult<Vec<FocusInstance>> {
        let mut instances = Vec::new();
        let mut skipped = 0;

        for (headers, tree) in self.read_trees(reader)? {
            let tree = Arc::new(tree);
            for token in tree.tokens() {
                let Some(label) = token.feature(&FeatureKey::Gold) else {
                    continue;
                };
                let lemma = token
                    .feature(&FeatureKey::Predicate)
                    .or_else(|| token.feature(&FeatureKey::Lemma))
                    .unwrap_or_default();
                if !self.config.lemma_filter.is_empty() && !self.config.lemma_filter.contains(lemma) {
                    continue;
                }
                if label == self.config.default_sense {
                    skipped += 1;
                    continue;
                }

                let Some(mut instance) = FocusInstance::new(instances.len(), token.index, tree.clone()) else {
                    continue;
                };
                instance.add_feature(FeatureKey::Gold, label);
                if let Some(header) = headers.iter().find(|h| h.token.index == token.index) {
                    instance.add_feature(FeatureKey::Metadata, header.encode()?);
                }
                instances.push(instance);
            }
        }

        if skipped > 0 {
            tracing::warn!(skipped, "skipped instances labeled with the default sense");
        }
        tracing::info!(instances = instances.len(), "read corpus instances");
        Ok(instances)
    }

    /// Write instances grouped by tree.
    ///
    /// Instances that were read with a header re-emit it verbatim; others
    /// get a header built from the instance. Consecutive instances sharing a
    /// tree are followed by that tree once.
    pub fn write_instances<W: Write>(&self, instances: &[FocusInstance], mut writer: W) -> CorpusResult<()> {
        let Some(first) = instances.first() else {
            return Ok(());
        };
        let mut current = first;
        for instance in instances {
            if !instance.shares_tree_with(current) {
                write_tree(&mut writer, current.tree())?;
                current = instance;
            }
            let header = match instance.feature(&FeatureKey::Metadata) {
                Some(header) => header.to_string(),
                None => metadata_for(instance).encode()?,
            };
            writeln!(writer, "# {}", header)?;
        }
        write_tree(&mut writer, current.tree())?;
        writer.flush()?;
        Ok(())
    }
}

fn write_tree<W: Write>(writer: &mut W, tree: &ParsedTree) -> CorpusResult<()> {
    writeln!(writer, "{}", tree_to_string(tree, &FeatureKey::Sense))?;
    writeln!(writer)?;
    Ok(())
}

fn apply_header(tree: &mut ParsedTree, metadata: &InstanceMetadata, line: usize) -> CorpusResult<()> {
    let len = tree.len();
    let focus = tree
        .get_mut(metadata.token.index)
        .ok_or(CorpusError::FocusOutOfRange {
            line,
            token: metadata.token.index,
            len,
        })?;
    focus.add_feature(FeatureKey::Gold, metadata.label.as_str());
    focus.add_feature(FeatureKey::Sense, metadata.label.as_str());
    focus.add_feature(FeatureKey::Predicate, metadata.lemma.as_str());
    if let Some(span) = metadata.token.span {
        focus.span = Some(span);
    }
    if let Some(span) = metadata.sentence.span {
        tree.span = Some(span);
    }
    tree.add_feature(FeatureKey::Text, metadata.original_text.as_str());
    Ok(())
}

/// Build a header for an instance that was not read with one.
pub fn metadata_for(instance: &FocusInstance) -> InstanceMetadata {
    let tree = instance.tree();
    let focus = instance.focus_token();
    let label = instance
        .label()
        .or_else(|| focus.feature(&FeatureKey::Sense))
        .unwrap_or(DEFAULT_SENSE);
    let lemma = focus
        .feature(&FeatureKey::Predicate)
        .or_else(|| focus.feature(&FeatureKey::Lemma))
        .unwrap_or(crate::conll::EMPTY);
    InstanceMetadata {
        path: instance.index.to_string(),
        sentence: IndexRef {
            index: tree.index,
            span: tree.span,
        },
        token: IndexRef {
            index: focus.index,
            span: focus.span,
        },
        lemma: lemma.to_string(),
        label: label.to_string(),
        original_text: tree
            .feature(&FeatureKey::Text)
            .map(String::from)
            .unwrap_or_else(|| tree.joined_text()),
    }
}
