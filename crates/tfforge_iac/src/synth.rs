//! Synthesis pipeline: normalize, select, render, write.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::IacResult;
use crate::params::{InputNormalizer, ParameterRecord};
use crate::provider::{CloudProvider, Topology};
use crate::registry::TemplateRegistry;
use crate::render::{render, GeneratedDocument};
use crate::writer::DocumentWriter;

/// Outcome of a successful synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesisReport {
    pub resource_name: String,
    pub security_group_name: String,
    pub subnet_cidr: String,
    pub provider: CloudProvider,
    pub topology: Topology,
    pub output_path: PathBuf,
    pub bytes_written: usize,
}

/// Turns one form submission into one written configuration document.
pub struct Synthesizer {
    normalizer: InputNormalizer,
    registry: Arc<TemplateRegistry>,
    writer: DocumentWriter,
}

impl Synthesizer {
    pub fn new(registry: Arc<TemplateRegistry>, writer: DocumentWriter) -> Self {
        Self {
            normalizer: InputNormalizer::new(),
            registry,
            writer,
        }
    }

    pub fn with_normalizer(mut self, normalizer: InputNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn writer(&self) -> &DocumentWriter {
        &self.writer
    }

    /// Normalize, select and render without touching the filesystem.
    pub fn preview(&self, raw: &HashMap<String, String>) -> IacResult<(ParameterRecord, GeneratedDocument)> {
        let params = self.normalizer.normalize(raw)?;
        let variant = self.registry.select(params.provider, params.topology)?;
        let document = render(variant, &params)?;
        Ok((params, document))
    }

    /// Run the full pipeline and write the document.
    ///
    /// Nothing is written unless rendering succeeded.
    pub fn synthesize(&self, raw: &HashMap<String, String>) -> IacResult<SynthesisReport> {
        let result = self.preview(raw).and_then(|(params, document)| {
            let bytes_written = self.writer.write(&document)?;
            Ok(SynthesisReport {
                resource_name: params.resource_name,
                security_group_name: params.security_group_name,
                subnet_cidr: params.subnet_cidr,
                provider: params.provider,
                topology: params.topology,
                output_path: self.writer.path().to_path_buf(),
                bytes_written,
            })
        });

        match &result {
            Ok(report) => info!(
                "Generated: server={}, sg={}, subnet={} ({}/{})",
                report.resource_name,
                report.security_group_name,
                report.subnet_cidr,
                report.provider,
                report.topology
            ),
            Err(e) => warn!("Synthesis failed: {}", e),
        }

        result
    }
}
