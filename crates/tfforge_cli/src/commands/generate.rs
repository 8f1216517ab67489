//! Generate command - Synthesize one configuration from the command line.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use super::SynthArgs;

#[derive(Args)]
pub struct GenerateArgs {
    /// Form field as key=value (repeatable), e.g. --set serverName=web1
    #[arg(short, long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    set: Vec<(String, String)>,

    /// YAML file mapping form field names to values
    #[arg(short, long)]
    fields: Option<PathBuf>,

    /// Print the document instead of writing it
    #[arg(long)]
    stdout: bool,

    #[command(flatten)]
    synth: SynthArgs,
}

pub async fn execute(args: GenerateArgs) -> Result<()> {
    let mut form = match &args.fields {
        Some(path) => load_fields(path)?,
        None => HashMap::new(),
    };
    // --set wins over the file
    form.extend(args.set.iter().cloned());

    let synth = args.synth.build()?;

    if args.stdout {
        let (_, document) = synth.preview(&form)?;
        print!("{}", document.as_str());
        return Ok(());
    }

    let report = synth.synthesize(&form)?;
    info!("Wrote {:?}", report.output_path);

    println!("✅ Configuration generated: {}", report.output_path.display());
    println!("   Provider:       {} ({})", report.provider, report.topology);
    println!("   Server:         {}", report.resource_name);
    println!("   Security Group: {}", report.security_group_name);
    println!("   Subnet CIDR:    {}", report.subnet_cidr);

    Ok(())
}

/// Parse a `key=value` pair. The value may be empty.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' in '{}'", s))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

fn load_fields(path: &Path) -> Result<HashMap<String, String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read fields file {:?}", path))?;
    parse_fields(&content).with_context(|| format!("Invalid fields file {:?}", path))
}

/// Read a YAML mapping of field names to scalars. Booleans become the form's
/// `yes`/`no` tokens.
fn parse_fields(content: &str) -> Result<HashMap<String, String>> {
    let raw: HashMap<String, serde_yaml::Value> = serde_yaml::from_str(content)?;

    raw.into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_yaml::Value::Null => String::new(),
                serde_yaml::Value::Bool(true) => "yes".to_string(),
                serde_yaml::Value::Bool(false) => "no".to_string(),
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::String(s) => s,
                _ => anyhow::bail!("field '{}' must be a scalar", key),
            };
            Ok((key, value))
        })
        .collect()
}
