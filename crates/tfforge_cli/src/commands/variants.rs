//! Variants command - List registered template variants.

use anyhow::{Context, Result};
use clap::Args;

use tfforge_iac::TemplateRegistry;

#[derive(Args)]
pub struct VariantsArgs {
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub async fn execute(args: VariantsArgs) -> Result<()> {
    let registry = TemplateRegistry::builtin().context("Failed to load template registry")?;
    let summaries: Vec<_> = registry.list().iter().map(|v| v.summary()).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("📦 {} template variant(s):\n", summaries.len());
    for summary in &summaries {
        println!(
            "   {:<24} {} fragment(s)",
            summary.name, summary.fragments
        );
    }

    Ok(())
}
