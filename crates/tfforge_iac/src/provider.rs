//! Cloud provider and topology definitions.

use serde::{Deserialize, Serialize};

/// Supported cloud providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Aws,
    Azure,
}

impl CloudProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::Azure => "azure",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "aws" => Some(CloudProvider::Aws),
            "azure" => Some(CloudProvider::Azure),
            _ => None,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![CloudProvider::Aws, CloudProvider::Azure]
    }

    /// Get the Terraform provider name.
    pub fn provider_name(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::Azure => "azurerm",
        }
    }

    /// Region used when the form leaves the region blank.
    ///
    /// Both values name the same Singapore region. `ap-southeast-1` is an AWS
    /// region code that `azurerm` rejects as a location, so Azure documents
    /// get the Azure spelling instead.
    pub fn default_region(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "ap-southeast-1",
            CloudProvider::Azure => "southeastasia",
        }
    }
}

impl std::fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shape of the generated infrastructure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topology {
    /// One instance in one subnet.
    SingleInstance,
    /// Load balancer in front of an autoscaling group.
    HaCluster,
}

impl Topology {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topology::SingleInstance => "single-instance",
            Topology::HaCluster => "ha-cluster",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "single" | "single-instance" => Some(Topology::SingleInstance),
            "ha" | "ha-cluster" | "cluster" => Some(Topology::HaCluster),
            _ => None,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Topology::SingleInstance, Topology::HaCluster]
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
