use crate::{read_blocks, InstanceCorpusReader, InstanceMetadata};
use clearsense::{FeatureKey, FocusInstance, Labeled, Span, SpanTracker, UnicodeParser};
use std::fs::File;
use std::io::{BufReader, Write};
use std::sync::Arc;

const TEXT: &str = "The dogs run home.\n\nShe will run the shop. They run fast.";

/// Anchor `TEXT` and label every "run" token.
fn anchored_instances(text: &str) -> Vec<FocusInstance> {
    let trees = SpanTracker::new(UnicodeParser).anchor(text).unwrap();
    let mut instances = Vec::new();
    for tree in trees.into_iter().map(Arc::new) {
        for token in tree.tokens().iter().filter(|t| t.text() == "run") {
            let label = if instances.len() % 2 == 0 { "run.02" } else { "run.01" };
            let instance = FocusInstance::new(instances.len(), token.index, tree.clone())
                .unwrap()
                .with_feature(FeatureKey::Gold, label);
            instances.push(instance);
        }
    }
    instances
}

fn write_to_string(instances: &[FocusInstance]) -> String {
    let mut out = Vec::new();
    InstanceCorpusReader::default()
        .write_instances(instances, &mut out)
        .unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_anchored_instances_survive_write_and_read() {
    let instances = anchored_instances(TEXT);
    assert_eq!(instances.len(), 3);

    let written = write_to_string(&instances);
    let first_header = written.lines().next().unwrap().replace('\t', "<TAB>");
    insta::assert_snapshot!(first_header, @"# 0 0[0,18] 2[9,12] run run.02<TAB>The dogs run home.");

    let reread = InstanceCorpusReader::default()
        .read_instances(written.as_bytes())
        .unwrap();
    assert_eq!(reread.len(), instances.len());
    for (before, after) in instances.iter().zip(&reread) {
        assert_eq!(after.label(), before.label());
        assert_eq!(after.focus_token().span, before.focus_token().span);
        assert_eq!(after.tree().span, before.tree().span);
        assert_eq!(after.focus_token().text(), "run");
        assert_eq!(
            after.tree().feature(&FeatureKey::Text),
            before.tree().feature(&FeatureKey::Text)
        );
    }
    let span = reread[2].focus_token().span.unwrap();
    assert_eq!(span.slice(TEXT), Some("run"));
}

#[test]
fn test_shared_tree_written_once() {
    let instances = anchored_instances("They run and run again.");
    assert_eq!(instances.len(), 2);
    assert!(instances[0].shares_tree_with(&instances[1]));

    let written = write_to_string(&instances);
    assert_eq!(written.lines().filter(|l| l.starts_with('#')).count(), 2);

    let blocks = read_blocks(written.as_bytes()).unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].header.len(), 2);
    assert_eq!(blocks[0].tree.len(), 6);
}

#[test]
fn test_headers_are_reused_verbatim() {
    let corpus = "\
# wsj_0001.parse 4 1 run run.02-v\tThey run.
1\tThey\tthey\tPRP\t2\tnsubj
2\trun\trun\tVBP\t0\troot
";
    let instances = InstanceCorpusReader::default()
        .read_instances(corpus.as_bytes())
        .unwrap();
    let written = write_to_string(&instances);
    let header = written.lines().next().unwrap();
    assert_eq!(header, "# wsj_0001.parse 4 1 run run.02\tThey run.");

    let metadata = InstanceMetadata::decode(header.trim_start_matches("# ")).unwrap();
    assert_eq!(metadata.sentence.index, 4);
    assert!(!metadata.is_anchored());
}

#[test]
fn test_file_round_trip() {
    let instances = anchored_instances(TEXT);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(write_to_string(&instances).as_bytes()).unwrap();
    file.flush().unwrap();

    let reader = BufReader::new(File::open(file.path()).unwrap());
    let reread = InstanceCorpusReader::default().read_instances(reader).unwrap();
    let labels: Vec<_> = reread.iter().filter_map(|i| i.label()).collect();
    assert_eq!(labels, vec!["run.02", "run.01", "run.02"]);
    assert_eq!(
        reread[1].focus_token().span,
        Some(Span::new(29, 32))
    );
}
