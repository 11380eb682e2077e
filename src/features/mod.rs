//! Context feature extraction.
//!
//! A [`ContextFeatureExtractor`] combines context builders (token groups
//! relative to a focus) with per-token extractors. Every (context,
//! extractor) pair yields one [`StringFeature`] whose identifier is derived
//! from the two identifiers alone, so the same semantic feature maps to the
//! same vocabulary entry on every instance.
//!
//! A [`ListAnnotator`] adds resource lookups to tokens beforehand, stored
//! under custom feature keys.

mod annotator;
mod context;
mod extractor;
mod function;
mod pipeline;

pub use annotator::{ListAnnotator, MultimapResource, LIST_DELIM};
pub use context::{
    ChildrenContext, ContextFactory, FocusContext, HeadContext, NlpContext, OffsetContext,
    WindowContext,
};
pub use extractor::{FeatureExtractor, FnExtractor, LookupExtractor, LowercaseExtractor, MISSING_VALUE};
pub use function::{
    compute_id, ContextFeatureExtractor, StringFeature, CONTEXT_DELIM, ID_DELIM, VALUE_DELIM,
};
pub use pipeline::FeaturePipeline;
