//! # tfforge_iac
//!
//! Terraform configuration synthesis from web form parameters.
//!
//! A submission flows through four stages:
//!
//! - [`InputNormalizer`] turns raw form fields into a [`ParameterRecord`]
//! - [`TemplateRegistry::select`] picks the variant for the provider/topology
//! - [`render`] binds the record into the variant's template
//! - [`DocumentWriter`] replaces the output file with the result
//!
//! [`Synthesizer`] runs the whole pipeline.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use tfforge_iac::{DocumentWriter, Synthesizer, TemplateRegistry};
//!
//! let registry = Arc::new(TemplateRegistry::builtin().unwrap());
//! let synth = Synthesizer::new(registry, DocumentWriter::new("main.tf"));
//!
//! let mut form = HashMap::new();
//! form.insert("provider".to_string(), "aws".to_string());
//! form.insert("topology".to_string(), "single-instance".to_string());
//! form.insert("serverName".to_string(), "web1".to_string());
//!
//! let report = synth.synthesize(&form).unwrap();
//! println!("wrote {} bytes", report.bytes_written);
//! ```

pub mod error;
pub mod params;
pub mod provider;
pub mod registry;
pub mod render;
pub mod synth;
pub mod template;
pub mod writer;

pub use error::{IacError, IacResult};
pub use params::{
    fields, Field, FieldKind, FieldValue, Flag, InputNormalizer, ParameterRecord, SubnetMode,
    DEFAULT_CLUSTER_CAPACITY, DEFAULT_STATE_BUCKET, DEFAULT_SUBNET_CIDR,
};
pub use provider::{CloudProvider, Topology};
pub use registry::{TemplateRegistry, TemplateVariant, VariantSummary};
pub use render::{escape_hcl_string, render, FragmentState, GeneratedDocument};
pub use synth::{SynthesisReport, Synthesizer};
pub use template::{Fragment, Node, Position, Template};
pub use writer::{DocumentWriter, DEFAULT_OUTPUT_PATH};
