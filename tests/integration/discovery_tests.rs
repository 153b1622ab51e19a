//! Integration tests for detector-output normalization and the
//! dedupe/whitelist pipeline.

use deadaudit::discovery::{dedupe, filter_whitelisted, skylos, vulture};
use deadaudit::{DetectorId, SymbolKind, Whitelist};
use std::path::Path;

const VULTURE_OUTPUT: &str = "\
mypkg/utils.py:10: unused function 'old_helper' (90% confidence)
mypkg/utils.py:25: unused variable 'cache_size' (60% confidence)
mypkg/models.py:3: unused class 'LegacyModel' (60% confidence, 40 lines)
mypkg/cli.py:1: unused import 'json' (90% confidence, 1 line)
";

const SKYLOS_OUTPUT: &str = r#"{
    "unused_functions": [
        {"name": "mypkg.utils.old_helper", "simple_name": "old_helper", "file": "mypkg/utils.py", "line": 10, "type": "function", "confidence": 75},
        {"name": "mypkg.io.write_legacy", "simple_name": "write_legacy", "file": "mypkg/io.py", "line": 42, "type": "function", "confidence": 80}
    ],
    "unused_parameters": [
        {"name": "verbose", "file": "mypkg/cli.py", "line": 7, "type": "parameter", "confidence": 65}
    ]
}"#;

#[test]
fn both_detector_outputs_normalize_to_one_shape() {
    let from_vulture = vulture::parse_output(VULTURE_OUTPUT);
    let from_skylos = skylos::parse_output(SKYLOS_OUTPUT, 60, Path::new("/repo"));

    assert_eq!(from_vulture.len(), 4);
    assert_eq!(from_skylos.len(), 3);
    assert!(from_vulture.iter().all(|c| c.source == DetectorId::Vulture));
    assert!(from_skylos.iter().all(|c| c.source == DetectorId::Skylos));

    let kinds: Vec<SymbolKind> = from_vulture.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SymbolKind::Function,
            SymbolKind::Variable,
            SymbolKind::Class,
            SymbolKind::Import
        ]
    );
}

#[test]
fn duplicate_findings_across_detectors_keep_first_seen() {
    let mut all = vulture::parse_output(VULTURE_OUTPUT);
    all.extend(skylos::parse_output(SKYLOS_OUTPUT, 60, Path::new("/repo")));

    let deduped = dedupe(all);

    // (mypkg/utils.py, old_helper) appears in both; the vulture record wins.
    let old_helper: Vec<_> = deduped.iter().filter(|c| c.name == "old_helper").collect();
    assert_eq!(old_helper.len(), 1);
    assert_eq!(old_helper[0].source, DetectorId::Vulture);
    assert_eq!(old_helper[0].confidence, 90);

    assert_eq!(deduped.len(), 6);
}

#[test]
fn whitelisted_names_are_removed_and_counted() {
    let mut all = vulture::parse_output(VULTURE_OUTPUT);
    all.extend(skylos::parse_output(SKYLOS_OUTPUT, 60, Path::new("/repo")));
    let deduped = dedupe(all);
    let total = deduped.len();

    let mut whitelist = Whitelist::default();
    whitelist.extend_from_text("old_helper  # kept for plugin API\nverbose\n");

    let result = filter_whitelisted(deduped, &whitelist);

    assert_eq!(result.whitelisted, 2);
    assert_eq!(result.candidates.len(), total - 2);
    assert!(!result.candidates.iter().any(|c| c.name == "old_helper"));
    assert!(!result.candidates.iter().any(|c| c.name == "verbose"));
}

#[test]
fn builtin_whitelist_filters_framework_names() {
    let output = "\
mypkg/cli.py:30: unused function 'main' (60% confidence)
mypkg/model.py:88: unused method 'forward' (60% confidence)
mypkg/utils.py:10: unused function 'old_helper' (90% confidence)
";
    let candidates = vulture::parse_output(output);
    let result = filter_whitelisted(candidates, &Whitelist::builtin());

    assert_eq!(result.whitelisted, 2);
    assert_eq!(result.candidates.len(), 1);
    assert_eq!(result.candidates[0].name, "old_helper");
}
