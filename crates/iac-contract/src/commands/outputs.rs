//! Inspect the blueprint's output contract and parse deployment outputs.

use super::{Context, OutputSource, load_blueprint_outputs, report_error};
use crate::blueprint::BlueprintOutputs;
use clap::Subcommand;
use iac_contract_core::{Framework, OutputSchema, ValueKind};
use iac_contract_output::{OutputFormatter, dim};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum OutputsAction {
    /// List the outputs every blueprint configuration must declare
    Keys {
        /// Show names in this framework's casing (default: canonical snake_case)
        #[arg(short, long)]
        framework: Option<Framework>,
    },
    /// Parse deployment outputs into the blueprint's output structure
    Parse {
        #[arg(short, long)]
        framework: Framework,
        /// Saved deployment outputs (JSON)
        #[arg(long, value_name = "FILE", conflicts_with = "live", required_unless_present = "live")]
        file: Option<PathBuf>,
        /// Query the deployment instead of reading a file
        #[arg(long)]
        live: bool,
    },
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct OutputKey {
    /// Name as declared in the IaC configuration
    pub name: String,
    pub canonical: String,
    pub shape: String,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct OutputKeysReport {
    /// Framework the names are spelled for, if any
    pub framework: Option<String>,
    pub keys: Vec<OutputKey>,
}

impl OutputFormatter for OutputKeysReport {
    fn format_text(&self) -> String {
        self.keys
            .iter()
            .map(|k| k.name.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_pretty(&self, colors: bool) -> String {
        let width = self.keys.iter().map(|k| k.name.len()).max().unwrap_or(0);
        self.keys
            .iter()
            .map(|k| format!("{:<width$}  {}", k.name, dim(&k.shape, colors)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn build_output_keys(framework: Option<Framework>) -> OutputKeysReport {
    OutputKeysReport {
        framework: framework.map(|f| f.label().to_string()),
        keys: BlueprintOutputs::fields()
            .iter()
            .map(|field| OutputKey {
                name: match framework {
                    Some(framework) => framework.output_key(field.name),
                    None => field.name.to_string(),
                },
                canonical: field.name.to_string(),
                shape: field.shape.to_string(),
            })
            .collect(),
    }
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct ParsedOutputs {
    pub framework: String,
    pub source: String,
    pub outputs: BlueprintOutputs,
}

impl OutputFormatter for ParsedOutputs {
    fn format_text(&self) -> String {
        let mut lines = vec![format!(
            "{} outputs from {}",
            self.framework, self.source
        )];
        lines.extend(summarize(&self.outputs).into_iter().map(|(name, summary)| {
            format!("  {name}: {summary}")
        }));
        lines.join("\n")
    }

    fn format_pretty(&self, colors: bool) -> String {
        let rows = summarize(&self.outputs);
        let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        let mut lines = vec![format!(
            "{} outputs {}",
            self.framework,
            dim(&format!("({})", self.source), colors)
        )];
        lines.extend(
            rows.into_iter()
                .map(|(name, summary)| format!("  {name:<width$}  {}", dim(&summary, colors))),
        );
        lines.join("\n")
    }
}

/// One line per output: its kind and size.
fn summarize(outputs: &BlueprintOutputs) -> Vec<(&'static str, String)> {
    let value = serde_json::to_value(outputs).unwrap_or_default();
    BlueprintOutputs::fields()
        .iter()
        .map(|field| {
            let summary = match value.get(field.ident) {
                Some(Value::Object(map)) => format!("object ({} keys)", map.len()),
                Some(Value::Array(items)) => format!("array ({} items)", items.len()),
                Some(other) => ValueKind::of(other).as_str().to_string(),
                None => "absent".to_string(),
            };
            (field.name, summary)
        })
        .collect()
}

pub fn cmd_outputs(ctx: &Context, action: OutputsAction) -> i32 {
    match action {
        OutputsAction::Keys { framework } => {
            build_output_keys(framework).print(&ctx.format);
            0
        }
        OutputsAction::Parse {
            framework,
            file,
            live,
        } => {
            let Some(source) = OutputSource::from_args(file, live) else {
                eprintln!("error: pass either --file or --live");
                return 1;
            };
            match load_blueprint_outputs(ctx, framework, &source) {
                Ok(outputs) => {
                    ParsedOutputs {
                        framework: framework.label().to_string(),
                        source: source.describe(),
                        outputs,
                    }
                    .print(&ctx.format);
                    0
                }
                Err(err) => report_error(&err),
            }
        }
    }
}
