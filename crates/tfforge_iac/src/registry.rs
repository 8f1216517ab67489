//! Template registry and variant selection.
//!
//! The built-in templates live under `templates/` and are compiled into the
//! binary. [`TemplateRegistry::builtin`] parses them once; the registry is
//! read-only afterwards and is meant to be shared behind an `Arc`.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{IacError, IacResult};
use crate::provider::{CloudProvider, Topology};
use crate::template::Template;

const BUILTIN_TEMPLATES: &[(CloudProvider, Topology, &str)] = &[
    (
        CloudProvider::Aws,
        Topology::SingleInstance,
        include_str!("../templates/aws_single_instance.tf.tmpl"),
    ),
    (
        CloudProvider::Aws,
        Topology::HaCluster,
        include_str!("../templates/aws_ha_cluster.tf.tmpl"),
    ),
    (
        CloudProvider::Azure,
        Topology::SingleInstance,
        include_str!("../templates/azure_single_vm.tf.tmpl"),
    ),
];

/// A template bound to one provider/topology pair.
#[derive(Debug, Clone)]
pub struct TemplateVariant {
    provider: CloudProvider,
    topology: Topology,
    template: Template,
}

impl TemplateVariant {
    pub fn new(provider: CloudProvider, topology: Topology, template: Template) -> Self {
        Self {
            provider,
            topology,
            template,
        }
    }

    pub fn provider(&self) -> CloudProvider {
        self.provider
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Variant name, e.g. `aws/ha-cluster`.
    pub fn name(&self) -> String {
        variant_name(self.provider, self.topology)
    }

    pub fn summary(&self) -> VariantSummary {
        VariantSummary {
            name: self.name(),
            provider: self.provider,
            topology: self.topology,
            fragments: self.template.fragment_count(),
        }
    }
}

/// Serializable description of a registered variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantSummary {
    pub name: String,
    pub provider: CloudProvider,
    pub topology: Topology,
    pub fragments: usize,
}

/// Immutable set of template variants keyed by provider and topology.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    variants: BTreeMap<(CloudProvider, Topology), TemplateVariant>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and register every built-in template.
    pub fn builtin() -> IacResult<Self> {
        let mut registry = Self::new();
        for (provider, topology, source) in BUILTIN_TEMPLATES {
            let template = Template::parse(variant_name(*provider, *topology), source)?;
            registry.register(TemplateVariant::new(*provider, *topology, template));
        }
        info!("Loaded {} template variants", registry.len());
        Ok(registry)
    }

    /// Register a variant, replacing any previous one for the same pair.
    pub fn register(&mut self, variant: TemplateVariant) {
        debug!("Registering template variant {}", variant.name());
        self.variants
            .insert((variant.provider, variant.topology), variant);
    }

    /// Select the variant for a provider/topology pair.
    pub fn select(&self, provider: CloudProvider, topology: Topology) -> IacResult<&TemplateVariant> {
        self.variants
            .get(&(provider, topology))
            .ok_or(IacError::NoSuchVariant { provider, topology })
    }

    pub fn exists(&self, provider: CloudProvider, topology: Topology) -> bool {
        self.variants.contains_key(&(provider, topology))
    }

    /// All variants, ordered by provider then topology.
    pub fn list(&self) -> Vec<&TemplateVariant> {
        self.variants.values().collect()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

fn variant_name(provider: CloudProvider, topology: Topology) -> String {
    format!("{}/{}", provider, topology)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Field, Flag};
    use crate::template::Node;

    #[test]
    fn test_builtin_templates_parse() {
        let registry = TemplateRegistry::builtin().unwrap();
        assert_eq!(registry.len(), 3);
        assert!(registry.exists(CloudProvider::Aws, Topology::SingleInstance));
        assert!(registry.exists(CloudProvider::Aws, Topology::HaCluster));
        assert!(registry.exists(CloudProvider::Azure, Topology::SingleInstance));
    }

    #[test]
    fn test_select_unknown_combination() {
        let registry = TemplateRegistry::builtin().unwrap();
        let err = registry
            .select(CloudProvider::Azure, Topology::HaCluster)
            .unwrap_err();
        assert!(matches!(
            err,
            IacError::NoSuchVariant {
                provider: CloudProvider::Azure,
                topology: Topology::HaCluster
            }
        ));
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_select_is_exact() {
        let registry = TemplateRegistry::builtin().unwrap();
        for variant in registry.list() {
            let selected = registry.select(variant.provider(), variant.topology()).unwrap();
            assert_eq!(selected.name(), variant.name());
        }
    }

    #[test]
    fn test_list_order() {
        let registry = TemplateRegistry::builtin().unwrap();
        let names: Vec<String> = registry.list().iter().map(|v| v.name()).collect();
        assert_eq!(
            names,
            vec!["aws/single-instance", "aws/ha-cluster", "azure/single-instance"]
        );
    }

    #[test]
    fn test_only_cluster_uses_capacity() {
        let registry = TemplateRegistry::builtin().unwrap();
        for variant in registry.list() {
            let uses_capacity = variant
                .template()
                .placeholders()
                .iter()
                .any(|(field, _)| *field == Field::Capacity);
            assert_eq!(uses_capacity, variant.topology() == Topology::HaCluster);
        }
    }

    #[test]
    fn test_every_variant_gates_bootstrap() {
        let registry = TemplateRegistry::builtin().unwrap();
        for variant in registry.list() {
            let gated = variant.template().nodes().iter().any(|node| {
                matches!(node, Node::Fragment(f) if f.flag == Flag::InstallBootstrapScript)
            });
            assert!(gated, "{} has no bootstrap fragment", variant.name());
            assert!(variant.summary().fragments >= 1);
        }
    }

    #[test]
    fn test_empty_registry_selects_nothing() {
        let registry = TemplateRegistry::new();
        assert!(registry.is_empty());
        assert!(registry
            .select(CloudProvider::Aws, Topology::SingleInstance)
            .is_err());
    }
}
