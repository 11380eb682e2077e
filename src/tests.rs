use crate::features::{HeadContext, LookupExtractor, OffsetContext, WindowContext};
use crate::{
    split_chunks, ContextFeatureExtractor, FeatureKey, FeatureModel, FeaturePipeline,
    FocusInstance, Labeled, SpanTracker, UnicodeParser,
};
use std::sync::Arc;

const TEXT: &str = "The dogs run home.\n\nShe will run the shop. They run fast.\nNobody ran.";

/// Anchor `TEXT` and label every occurrence of "run".
fn run_instances() -> Vec<FocusInstance> {
    let trees = SpanTracker::new(UnicodeParser).anchor(TEXT).unwrap();
    let labels = ["run.02", "run.01", "run.02"];
    let mut instances = Vec::new();
    for tree in trees.into_iter().map(Arc::new) {
        for token in tree.tokens().iter().filter(|t| t.text() == "run") {
            let label = labels[instances.len()];
            let instance = FocusInstance::new(instances.len(), token.index, tree.clone())
                .unwrap()
                .with_feature(FeatureKey::Gold, label);
            instances.push(instance);
        }
    }
    instances
}

#[test]
fn test_chunks_cover_scenario_text() {
    let chunks = split_chunks(TEXT);
    assert_eq!(chunks.len(), 4);
    assert_eq!(chunks.first().map(|c| c.span.start), Some(0));
    assert_eq!(chunks.last().map(|c| c.span.end), Some(TEXT.chars().count()));
    for pair in chunks.windows(2) {
        assert_eq!(pair[0].span.end, pair[1].span.start);
    }
}

#[test]
fn test_anchored_instances_point_into_text() {
    let instances = run_instances();
    assert_eq!(instances.len(), 3);
    for instance in &instances {
        let span = instance.focus_token().span.unwrap();
        assert_eq!(span.slice(TEXT), Some("run"));
    }
    let starts: Vec<_> = instances
        .iter()
        .map(|i| i.focus_token().span.unwrap().start)
        .collect();
    assert_eq!(starts, vec![9, 29, 48]);
    assert_eq!(instances[1].tree().index, 1);
    assert_eq!(instances[2].tree().index, 2);
}

#[test]
fn test_pipeline_over_anchored_instances() {
    let extractor = ContextFeatureExtractor::new()
        .context(OffsetContext::new([-1, 1]))
        .context(WindowContext::new(2, 0))
        .context(HeadContext)
        .extractor(LookupExtractor::new(FeatureKey::Lemma));
    let mut pipeline = FeaturePipeline::new(vec![extractor]);
    let instances = run_instances();
    let vectors = pipeline.fit(&instances).unwrap();

    assert_eq!(vectors.len(), 3);
    for (vector, instance) in vectors.iter().zip(&instances) {
        assert_eq!(vector.label(), instance.label());
        assert!(!vector.vector.is_empty());
    }
    let model: &FeatureModel = pipeline.model();
    assert_eq!(model.labels().len(), 2);
    assert_eq!(model.feature(0).unwrap(), "tok[-1]_lemma=dogs");
    assert_eq!(
        model.feature_index("win[-2,+0]_lemma=the|dogs"),
        Some(2)
    );
}
