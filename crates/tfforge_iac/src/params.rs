//! Form input normalization.
//!
//! Raw form submissions arrive as a flat map of field name to string. The
//! [`InputNormalizer`] turns that map into a [`ParameterRecord`]: booleans are
//! derived from the `"yes"` token, the subnet CIDR is resolved from the
//! auto/manual mode pair, and the region and topology get their defaults.
//! Identifier-like fields are taken verbatim; escaping happens at render time.

use std::collections::HashMap;
use std::net::Ipv4Addr;

use serde::Serialize;
use tracing::debug;

use crate::error::{IacError, IacResult};
use crate::provider::{CloudProvider, Topology};

/// CIDR used for auto mode and for manual mode without a value.
pub const DEFAULT_SUBNET_CIDR: &str = "172.31.250.0/24";

/// Bucket (AWS) or storage account (Azure) holding remote state.
pub const DEFAULT_STATE_BUCKET: &str = "terraform-state-tfforge";

/// Cluster size when the form omits or garbles the capacity.
pub const DEFAULT_CLUSTER_CAPACITY: u32 = 2;

/// The only value that turns a checkbox-style field on.
pub const TRUTHY_TOKEN: &str = "yes";

/// Form field names posted by the landing page.
pub mod fields {
    pub const PROVIDER: &str = "provider";
    pub const TOPOLOGY: &str = "topology";
    pub const SERVER_NAME: &str = "serverName";
    pub const INSTANCE_TYPE: &str = "instanceType";
    pub const REGION: &str = "region";
    pub const SG_NAME: &str = "sgName";
    pub const SUBNET_MODE: &str = "subnetMode";
    pub const CUSTOM_CIDR: &str = "customCidr";
    pub const CAPACITY: &str = "capacity";
    pub const INSTALL_NGINX: &str = "installNginx";
}

/// How the subnet CIDR is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubnetMode {
    Auto,
    Manual,
}

impl SubnetMode {
    /// Anything other than `manual` means auto.
    pub fn from_form(value: &str) -> Self {
        if value == "manual" {
            SubnetMode::Manual
        } else {
            SubnetMode::Auto
        }
    }
}

/// Substitutable record fields, as named inside templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ResourceName,
    InstanceSize,
    Region,
    SecurityGroupName,
    SubnetCidr,
    Capacity,
    StateBucket,
}

/// Whether a field renders as a string literal or a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
}

impl Field {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ResourceName" => Some(Field::ResourceName),
            "InstanceSize" => Some(Field::InstanceSize),
            "Region" => Some(Field::Region),
            "SecurityGroupName" => Some(Field::SecurityGroupName),
            "SubnetCidr" => Some(Field::SubnetCidr),
            "Capacity" => Some(Field::Capacity),
            "StateBucket" => Some(Field::StateBucket),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Field::ResourceName => "ResourceName",
            Field::InstanceSize => "InstanceSize",
            Field::Region => "Region",
            Field::SecurityGroupName => "SecurityGroupName",
            Field::SubnetCidr => "SubnetCidr",
            Field::Capacity => "Capacity",
            Field::StateBucket => "StateBucket",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Capacity => FieldKind::Number,
            _ => FieldKind::Text,
        }
    }
}

/// Boolean record fields that gate conditional fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    InstallBootstrapScript,
}

impl Flag {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "InstallBootstrapScript" => Some(Flag::InstallBootstrapScript),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Flag::InstallBootstrapScript => "InstallBootstrapScript",
        }
    }
}

/// A value bound to a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(u32),
}

/// Validated, defaulted parameters of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterRecord {
    pub resource_name: String,
    pub provider: CloudProvider,
    pub topology: Topology,
    pub instance_size: String,
    pub region: String,
    pub security_group_name: String,
    pub subnet_cidr: String,
    pub capacity: Option<u32>,
    pub install_bootstrap_script: bool,
    pub state_bucket: String,
}

impl ParameterRecord {
    /// Look up the value bound to a placeholder, if the record carries one.
    pub fn value(&self, field: Field) -> Option<FieldValue<'_>> {
        match field {
            Field::ResourceName => Some(FieldValue::Text(&self.resource_name)),
            Field::InstanceSize => Some(FieldValue::Text(&self.instance_size)),
            Field::Region => Some(FieldValue::Text(&self.region)),
            Field::SecurityGroupName => Some(FieldValue::Text(&self.security_group_name)),
            Field::SubnetCidr => Some(FieldValue::Text(&self.subnet_cidr)),
            Field::Capacity => self.capacity.map(FieldValue::Number),
            Field::StateBucket => Some(FieldValue::Text(&self.state_bucket)),
        }
    }

    pub fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::InstallBootstrapScript => self.install_bootstrap_script,
        }
    }
}

/// Turns raw form fields into a [`ParameterRecord`].
#[derive(Debug, Clone)]
pub struct InputNormalizer {
    state_bucket: String,
}

impl Default for InputNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl InputNormalizer {
    pub fn new() -> Self {
        Self {
            state_bucket: DEFAULT_STATE_BUCKET.to_string(),
        }
    }

    /// Set the remote state bucket written into every backend block.
    pub fn with_state_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.state_bucket = bucket.into();
        self
    }

    /// Normalize one submission. Absent keys read as empty strings.
    ///
    /// A missing topology means a single instance. Fails on an unknown
    /// provider, an unrecognized topology or a malformed manual CIDR; other
    /// strings are carried through as submitted.
    pub fn normalize(&self, raw: &HashMap<String, String>) -> IacResult<ParameterRecord> {
        let get = |key: &str| raw.get(key).map(String::as_str).unwrap_or("");

        let provider_raw = get(fields::PROVIDER);
        let provider = CloudProvider::from_str(provider_raw)
            .ok_or_else(|| IacError::UnsupportedProvider(provider_raw.to_string()))?;

        let topology = match get(fields::TOPOLOGY) {
            raw if raw.trim().is_empty() => Topology::SingleInstance,
            raw => Topology::from_str(raw)
                .ok_or_else(|| IacError::UnsupportedTopology(raw.to_string()))?,
        };

        let region = match get(fields::REGION) {
            "" => provider.default_region().to_string(),
            region => region.to_string(),
        };

        let subnet_cidr = resolve_subnet_cidr(
            SubnetMode::from_form(get(fields::SUBNET_MODE)),
            get(fields::CUSTOM_CIDR),
        )?;

        let capacity = match topology {
            Topology::HaCluster => Some(parse_capacity(get(fields::CAPACITY))),
            Topology::SingleInstance => None,
        };

        let record = ParameterRecord {
            resource_name: get(fields::SERVER_NAME).to_string(),
            provider,
            topology,
            instance_size: get(fields::INSTANCE_TYPE).to_string(),
            region,
            security_group_name: get(fields::SG_NAME).to_string(),
            subnet_cidr,
            capacity,
            install_bootstrap_script: get(fields::INSTALL_NGINX) == TRUTHY_TOKEN,
            state_bucket: self.state_bucket.clone(),
        };

        debug!("Normalized submission: {:?}", record);
        Ok(record)
    }
}

/// Resolve the subnet CIDR from the mode and the custom value.
///
/// A manual value is trimmed and must then be an IPv4 CIDR; it is never
/// replaced by the default unless it is blank.
pub fn resolve_subnet_cidr(mode: SubnetMode, custom: &str) -> IacResult<String> {
    let custom = custom.trim();
    match mode {
        SubnetMode::Auto => Ok(DEFAULT_SUBNET_CIDR.to_string()),
        SubnetMode::Manual if custom.is_empty() => Ok(DEFAULT_SUBNET_CIDR.to_string()),
        SubnetMode::Manual if is_ipv4_cidr(custom) => Ok(custom.to_string()),
        SubnetMode::Manual => Err(IacError::InvalidSubnetCidr(custom.to_string())),
    }
}

/// Check for `a.b.c.d/n` with a prefix length of at most 32.
pub fn is_ipv4_cidr(value: &str) -> bool {
    let Some((addr, prefix)) = value.split_once('/') else {
        return false;
    };
    if prefix.is_empty() || prefix.len() > 2 || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let prefix_ok = prefix.parse::<u8>().map(|p| p <= 32).unwrap_or(false);
    prefix_ok && addr.parse::<Ipv4Addr>().is_ok()
}

fn parse_capacity(raw: &str) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(0) => 1,
        Ok(n) => n,
        Err(_) => DEFAULT_CLUSTER_CAPACITY,
    }
}
