use clap::Args;

use crate::cli::OutputFormat;
use crate::core::normalize::{normalize_as, normalize_brewery, strip_common_prefix};
use crate::core::types::NameKind;

#[derive(Args)]
pub struct NormalizeArgs {
    /// Names to normalize
    #[arg(required = true, num_args = 1..)]
    pub names: Vec<String>,

    /// Whether the names are brewery or beer names
    #[arg(long, value_enum, default_value = "beer")]
    pub kind: NameKind,

    /// Brewery the beers belong to; its name is stripped from the front of each beer name
    #[arg(long)]
    pub brewery: Option<String>,
}

pub fn run(args: NormalizeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let brewery = match (&args.brewery, args.kind) {
        (Some(brewery), NameKind::Beer) => Some(normalize_brewery(brewery)),
        (Some(_), NameKind::Brewery) => {
            eprintln!("Warning: --brewery only applies to beer names, ignoring it.");
            None
        }
        (None, _) => None,
    };

    if verbose {
        if let Some(brewery) = &brewery {
            eprintln!("Stripping brewery prefix '{brewery}'");
        }
    }

    let results: Vec<(&str, String)> = args
        .names
        .iter()
        .map(|raw| {
            let normalized = normalize_as(raw, args.kind);
            let normalized = match &brewery {
                Some(brewery) => strip_common_prefix(&normalized, brewery),
                None => normalized,
            };
            (raw.as_str(), normalized)
        })
        .collect();

    match format {
        OutputFormat::Text => {
            for (_, normalized) in &results {
                println!("{normalized}");
            }
        }
        OutputFormat::Json => {
            let output: Vec<_> = results
                .iter()
                .map(|(raw, normalized)| serde_json::json!({ "name": raw, "normalized": normalized }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("name\tnormalized");
            for (raw, normalized) in &results {
                println!("{raw}\t{normalized}");
            }
        }
    }

    Ok(())
}
