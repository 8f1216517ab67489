//! Integration tests for configuration synthesis.

use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

use tfforge_iac::{
    render, CloudProvider, DocumentWriter, IacError, InputNormalizer, Synthesizer,
    TemplateRegistry, Topology,
};
use tempfile::tempdir;

fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn single_instance_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("provider", "aws"),
        ("topology", "single-instance"),
        ("serverName", "web1"),
        ("instanceType", "t3.micro"),
        ("region", ""),
        ("sgName", "sg-web"),
        ("subnetMode", "auto"),
    ]
}

fn render_form(pairs: &[(&str, &str)]) -> String {
    let registry = TemplateRegistry::builtin().unwrap();
    let params = InputNormalizer::new().normalize(&form(pairs)).unwrap();
    let variant = registry.select(params.provider, params.topology).unwrap();
    render(variant, &params).unwrap().text
}

fn every_variant_form(bootstrap: &'static str) -> Vec<Vec<(&'static str, &'static str)>> {
    vec![
        vec![("provider", "aws"), ("topology", "single-instance"), ("installNginx", bootstrap)],
        vec![
            ("provider", "aws"),
            ("topology", "ha-cluster"),
            ("capacity", "3"),
            ("installNginx", bootstrap),
        ],
        vec![("provider", "azure"), ("topology", "single-instance"), ("installNginx", bootstrap)],
    ]
}

#[test]
fn test_scenario_single_instance_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("main.tf");
    let synth = Synthesizer::new(
        Arc::new(TemplateRegistry::builtin().unwrap()),
        DocumentWriter::new(&path),
    );

    synth.synthesize(&form(&single_instance_form())).unwrap();
    let doc = fs::read_to_string(&path).unwrap();

    assert_eq!(doc.matches("resource \"aws_instance\"").count(), 1);
    assert!(doc.contains("Name    = \"web1\""));
    assert_eq!(doc.matches("resource \"aws_subnet\"").count(), 1);
    assert!(doc.contains("cidr_block        = \"172.31.250.0/24\""));
    assert!(doc.contains("region = \"ap-southeast-1\""));
    assert!(doc.contains("availability_zone = \"ap-southeast-1a\""));
    assert!(doc.contains("instance_type = \"t3.micro\""));
    assert!(doc.contains("name        = \"sg-web\""));
}

#[test]
fn test_scenario_manual_cidr() {
    let mut pairs = single_instance_form();
    pairs.retain(|(k, _)| *k != "subnetMode");
    pairs.push(("subnetMode", "manual"));
    pairs.push(("customCidr", "10.0.5.0/24"));

    let doc = render_form(&pairs);
    assert!(doc.contains("cidr_block        = \"10.0.5.0/24\""));
    assert!(!doc.contains("172.31.250.0/24"));
}

#[test]
fn test_auto_mode_ignores_custom_cidr() {
    let mut pairs = single_instance_form();
    pairs.push(("customCidr", "10.0.5.0/24"));

    let doc = render_form(&pairs);
    assert!(doc.contains("\"172.31.250.0/24\""));
    assert!(!doc.contains("10.0.5.0/24"));
}

#[test]
fn test_manual_mode_without_value_falls_back() {
    let mut pairs = single_instance_form();
    pairs.retain(|(k, _)| *k != "subnetMode");
    pairs.push(("subnetMode", "manual"));
    pairs.push(("customCidr", ""));

    let doc = render_form(&pairs);
    assert!(doc.contains("\"172.31.250.0/24\""));
}

#[test]
fn test_manual_cidr_with_surrounding_whitespace() {
    let mut pairs = single_instance_form();
    pairs.retain(|(k, _)| *k != "subnetMode");
    pairs.push(("subnetMode", "manual"));
    pairs.push(("customCidr", " 10.0.5.0/24 "));

    let doc = render_form(&pairs);
    assert!(doc.contains("cidr_block        = \"10.0.5.0/24\""));
    assert!(!doc.contains("172.31.250.0/24"));
}

#[test]
fn test_malformed_manual_cidr_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("main.tf");
    fs::write(&path, "previous\n").unwrap();
    let synth = Synthesizer::new(
        Arc::new(TemplateRegistry::builtin().unwrap()),
        DocumentWriter::new(&path),
    );

    let mut pairs = single_instance_form();
    pairs.retain(|(k, _)| *k != "subnetMode");
    pairs.push(("subnetMode", "manual"));
    pairs.push(("customCidr", "10.0.5.0/024"));
    let err = synth.synthesize(&form(&pairs)).unwrap_err();

    assert!(matches!(err, IacError::InvalidSubnetCidr(ref c) if c == "10.0.5.0/024"));
    assert!(err.is_caller_error());
    assert_eq!(fs::read_to_string(&path).unwrap(), "previous\n");
}

#[test]
fn test_form_without_topology_builds_single_instance() {
    let mut pairs = single_instance_form();
    pairs.retain(|(k, _)| *k != "topology");

    let doc = render_form(&pairs);
    assert_eq!(doc.matches("resource \"aws_instance\"").count(), 1);
    assert!(!doc.contains("aws_autoscaling_group"));
}

#[test]
fn test_scenario_ha_cluster() {
    let doc = render_form(&[
        ("provider", "aws"),
        ("topology", "ha-cluster"),
        ("capacity", "3"),
        ("installNginx", "yes"),
    ]);

    assert!(doc.contains("resource \"aws_autoscaling_group\""));
    assert!(doc.contains("desired_capacity    = 3\n"));
    assert!(doc.contains("min_size            = 3\n"));
    assert!(doc.contains("max_size            = 3\n"));
    assert!(!doc.contains("\"3\""));
    assert!(doc.contains("apt-get install -y nginx"));
    assert!(doc.contains("user_data = base64encode(<<-EOT"));
    assert!(doc.contains("resource \"aws_lb\""));
}

#[test]
fn test_scenario_unsupported_provider_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("main.tf");
    let synth = Synthesizer::new(
        Arc::new(TemplateRegistry::builtin().unwrap()),
        DocumentWriter::new(&path),
    );

    let mut pairs = single_instance_form();
    pairs[0] = ("provider", "oracle");
    let err = synth.synthesize(&form(&pairs)).unwrap_err();

    assert!(matches!(err, IacError::UnsupportedProvider(ref p) if p == "oracle"));
    assert!(err.is_caller_error());
    assert!(!path.exists());
}

#[test]
fn test_bootstrap_absent_leaves_no_trace() {
    for pairs in every_variant_form("no") {
        let doc = render_form(&pairs);
        assert!(!doc.contains("nginx"), "{doc}");
        assert!(!doc.contains("user_data"));
        assert!(!doc.contains("custom_data"));
        assert!(!doc.contains("web_url"));
        assert!(!doc.contains("{{"));
        assert!(!doc.contains("\n\n\n"), "omitted fragment left blank lines");
    }
}

#[test]
fn test_bootstrap_present_is_resolved() {
    for pairs in every_variant_form("yes") {
        let doc = render_form(&pairs);
        assert!(doc.contains("apt-get install -y nginx"));
        assert!(doc.contains("output \"web_url\""));
        assert!(doc.contains("Landing page served by nginx"));
        assert!(!doc.contains("{{"));
        assert!(!doc.contains("InstallBootstrapScript"));
    }
}

#[test]
fn test_one_backend_and_one_provider_block() {
    for pairs in every_variant_form("yes") {
        let doc = render_form(&pairs);
        assert_eq!(doc.matches("backend \"").count(), 1);
        assert_eq!(doc.matches("\nprovider \"").count(), 1);
    }
}

#[test]
fn test_render_is_deterministic_across_variants() {
    for pairs in every_variant_form("yes") {
        assert_eq!(render_form(&pairs), render_form(&pairs));
    }
}

#[test]
fn test_string_fields_are_quoted() {
    let doc = render_form(&[
        ("provider", "azure"),
        ("topology", "single-instance"),
        ("serverName", "vm1"),
        ("instanceType", "Standard_B1s"),
        ("region", "westeurope"),
        ("sgName", "nsg-web"),
    ]);

    assert!(doc.contains("name                  = \"vm1\""));
    assert!(doc.contains("size                  = \"Standard_B1s\""));
    assert!(doc.contains("location = \"westeurope\""));
    assert!(doc.contains("name                = \"nsg-web\""));
    assert!(doc.contains("address_prefixes     = [\"172.31.250.0/24\"]"));
}

#[test]
fn test_injection_attempt_is_escaped() {
    let doc = render_form(&[
        ("provider", "aws"),
        ("topology", "single-instance"),
        ("sgName", "x\"\n}\nresource \"aws_iam_user\" \"evil\" {\n  name = \"${path.module}"),
    ]);

    assert!(!doc.contains("resource \"aws_iam_user\""));
    assert!(doc.contains("name        = \"x\\\"\\n}\\nresource \\\"aws_iam_user\\\""));
    assert!(doc.contains("$${path.module}"));
}

#[test]
fn test_registry_rejects_unknown_combination() {
    let registry = TemplateRegistry::builtin().unwrap();
    assert!(registry
        .select(CloudProvider::Azure, Topology::HaCluster)
        .is_err());
}
