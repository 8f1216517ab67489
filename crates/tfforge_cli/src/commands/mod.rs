//! CLI command definitions.
//!
//! `serve` runs the web portal, `generate` runs one synthesis from the
//! command line and `variants` prints the template registry.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use tfforge_iac::{
    DocumentWriter, InputNormalizer, Synthesizer, TemplateRegistry, DEFAULT_OUTPUT_PATH,
    DEFAULT_STATE_BUCKET,
};

pub mod generate;
pub mod serve;
pub mod variants;

/// tfforge - Terraform configuration generator
#[derive(Parser)]
#[command(name = "tfforge")]
#[command(version, about = "tfforge - Terraform configuration generator")]
#[command(long_about = r#"
tfforge turns a handful of infrastructure parameters into a ready-to-apply
Terraform configuration.

COMMANDS:
  serve     → Run the web portal (form at /, submissions at POST /generate)
  generate  → Synthesize one configuration from --set pairs or a fields file
  variants  → List the registered provider/topology templates

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  4 - Rejected submission (unsupported variant or malformed subnet CIDR)
  5 - Template error
  6 - Output file error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web portal
    Serve(serve::ServeArgs),

    /// Generate a configuration without the web portal
    Generate(generate::GenerateArgs),

    /// List registered template variants
    Variants(variants::VariantsArgs),
}

/// Settings shared by every command that synthesizes documents.
#[derive(Args, Debug, Clone)]
pub struct SynthArgs {
    /// Output file, overwritten on every successful synthesis
    #[arg(short, long, env = "TFFORGE_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Remote state bucket (AWS) or storage account (Azure)
    #[arg(long, env = "TFFORGE_STATE_BUCKET", default_value = DEFAULT_STATE_BUCKET)]
    pub state_bucket: String,
}

impl SynthArgs {
    /// Load the registry and assemble a synthesizer.
    pub fn build(&self) -> Result<Synthesizer> {
        let registry = TemplateRegistry::builtin().context("Failed to load template registry")?;
        let normalizer = InputNormalizer::new().with_state_bucket(&self.state_bucket);

        Ok(
            Synthesizer::new(Arc::new(registry), DocumentWriter::new(&self.output))
                .with_normalizer(normalizer),
        )
    }
}
