//! Loads the configuration files in /tests/fixtures/ from disk

use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tfcomponents::components_tree::Tree;
use tfcomponents::{load_config_dir, load_config_file, Severity};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn complete_configuration() {
    let (config, diagnostics) = load_config_file(fixture("complete.tfcomponents.hcl"));

    assert!(diagnostics.is_empty(), "{diagnostics}");
    let config = config.expect("config must be returned");

    assert!(config
        .filename
        .ends_with("tests/fixtures/complete.tfcomponents.hcl"));
    assert_eq!(
        config.components.keys().collect::<Vec<_>>(),
        vec!["database", "api"]
    );
    assert_eq!(config.groups.keys().collect::<Vec<_>>(), vec!["network"]);
    assert_eq!(
        config.input_variables.keys().collect::<Vec<_>>(),
        vec!["region", "instance_count"]
    );
    assert_eq!(config.local_values.keys().collect::<Vec<_>>(), vec!["prefix"]);

    let region = &config.input_variables["region"];
    assert_eq!(region.description.as_deref(), Some("Region to deploy into"));
    assert_eq!(region.validations.len(), 1);
    assert!(!config.input_variables["instance_count"].nullable);

    let endpoint = &config.output_values["endpoint"];
    assert_eq!(endpoint.preconditions.len(), 1);
    assert_eq!(endpoint.decl_range.start.line, 30);

    for (name, component) in &config.components {
        assert_eq!(name, &component.name);
        assert_eq!(component.call_addr().name, *name);
    }
}

#[test]
fn every_mistake_is_reported() {
    let (config, diagnostics) = load_config_file(fixture("mistakes.tfcomponents.hcl"));
    let config = config.expect("mistakes are not fatal");

    let summaries: Vec<_> = diagnostics.iter().map(|d| d.summary.as_str()).collect();
    assert_eq!(
        summaries,
        vec![
            "Unsupported block type",
            "Duplicate component group declaration",
            "Duplicate local value definition",
            "Missing required argument",
        ]
    );
    assert!(diagnostics
        .iter()
        .all(|d| d.severity == Severity::Error && d.subject.is_some()));

    assert_eq!(config.components.keys().collect::<Vec<_>>(), vec!["shared"]);
    assert!(config.groups.is_empty());
    assert_eq!(
        config.local_values["a"].expr,
        hcl::Expression::Number(hcl::Number::from(1u64))
    );
    assert!(config.output_values.is_empty());
}

#[test]
fn unreadable_file() {
    let (config, diagnostics) = load_config_file(fixture("missing.tfcomponents.hcl"));

    assert!(config.is_none());
    assert_eq!(diagnostics.len(), 1);

    let diagnostic = &diagnostics.as_slice()[0];
    assert_eq!(diagnostic.summary, "Can't open configuration file");
    assert_eq!(diagnostic.subject, None);
    assert!(diagnostic.detail.starts_with("Error while loading "));
    assert!(diagnostic.detail.contains("missing.tfcomponents.hcl: "));
}

#[test]
fn wrong_suffix_on_disk() {
    let (config, diagnostics) = load_config_file(fixture("project/notes.hcl"));

    assert!(config.is_none());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics.as_slice()[0].summary,
        "Invalid components configuration"
    );
}

#[test]
fn directory() {
    let (configs, diagnostics) = load_config_dir(fixture("project"));

    assert!(diagnostics.is_empty(), "{diagnostics}");
    let filenames: Vec<_> = configs
        .iter()
        .map(|config| config.filename.rsplit('/').next().unwrap_or_default())
        .collect();
    assert_eq!(filenames, vec!["a.tfcomponents.hcl", "b.tfcomponents.hcl"]);
}

#[test]
fn missing_directory() {
    let (configs, diagnostics) = load_config_dir(fixture("does-not-exist"));

    assert!(configs.is_empty());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics.as_slice()[0].summary,
        "Can't read configuration directory"
    );
}

#[test]
fn tree_from_loaded_files() {
    let (configs, diagnostics) = load_config_dir(fixture("project"));
    assert!(!diagnostics.has_errors());

    let mut tree = Tree::new();
    for config in &configs {
        tree.insert_group_calls(tree.root(), config);
    }

    let second = tree
        .lookup(&[tfcomponents::addrs::ComponentGroupCall::new("second")])
        .expect("group from b.tfcomponents.hcl");
    let node = tree.get(second);
    assert_eq!(node.depth(), 1);
    assert_eq!(node.parent(), Some(tree.root()));
    assert_eq!(node.root(), tree.root());
}
