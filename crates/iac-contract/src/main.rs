use anyhow::Context as _;
use clap::{Parser, Subcommand};
use iac_contract::commands::{
    self, Context, OutputSource,
    case::{Case, CaseReport},
    check::CheckReport,
    contract::{ContractSummary, ContractTarget},
    outputs::{OutputKeysReport, OutputsAction, ParsedOutputs},
    tools::ToolsReport,
};
use iac_contract::{ContractConfig, logging};
use iac_contract_core::Framework;
use iac_contract_output::{OutputFormat, print_output_schema};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "iac-contract")]
#[command(version)]
#[command(about = "Check that Terraform and Bicep blueprints honour the same output contract")]
struct Cli {
    /// Blueprint root (contains terraform/ and bicep/)
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Output as JSON Lines
    #[arg(long, global = true)]
    jsonl: bool,

    /// Human-friendly output with colors
    #[arg(long, global = true, conflicts_with = "compact")]
    pretty: bool,

    /// Plain text output
    #[arg(long, global = true)]
    compact: bool,

    /// Print the JSON schema of the command's output and exit
    #[arg(long, global = true)]
    output_schema: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the IaC configurations declare every required output
    Contract {
        #[arg(value_enum, default_value_t = ContractTarget::All)]
        target: ContractTarget,
        /// Read declared outputs from a saved terraform-docs JSON document or ARM template
        #[arg(long, value_name = "FILE")]
        declared: Option<PathBuf>,
    },
    /// Inspect required outputs or parse deployment outputs
    Outputs {
        #[command(subcommand)]
        action: OutputsAction,
    },
    /// Parse deployment outputs and run the offline checks
    Check {
        #[arg(short, long)]
        framework: Framework,
        /// Saved deployment outputs (JSON)
        #[arg(long, value_name = "FILE", conflicts_with = "live", required_unless_present = "live")]
        file: Option<PathBuf>,
        /// Query the deployment instead of reading a file
        #[arg(long)]
        live: bool,
    },
    /// List IaC tool adapters
    Tools,
    /// Convert names between snake_case and camelCase
    Case {
        #[arg(value_enum)]
        case: Case,
        #[arg(required = true)]
        names: Vec<String>,
    },
}

/// Config schema for editor integration.
fn handle_schema_flag() -> bool {
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(|s| s.as_str()) == Some("--schema") {
        let response = serde_json::json!({
            "config_path": ".iac-contract/config.toml",
            "format": "toml",
            "schema": schemars::schema_for!(ContractConfig)
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&response).unwrap_or_default()
        );
        true
    } else {
        false
    }
}

fn print_schema(command: &Commands) {
    match command {
        Commands::Contract { .. } => print_output_schema::<ContractSummary>(),
        Commands::Outputs {
            action: OutputsAction::Keys { .. },
        } => print_output_schema::<OutputKeysReport>(),
        Commands::Outputs {
            action: OutputsAction::Parse { .. },
        } => print_output_schema::<ParsedOutputs>(),
        Commands::Check { .. } => print_output_schema::<CheckReport>(),
        Commands::Tools => print_output_schema::<ToolsReport>(),
        Commands::Case { .. } => print_output_schema::<CaseReport>(),
    }
}

fn run(cli: Cli, root: PathBuf) -> anyhow::Result<i32> {
    if cli.output_schema {
        print_schema(&cli.command);
        return Ok(0);
    }

    let mut config = ContractConfig::load(&root).context("failed to load configuration")?;
    config.apply_env(|key| std::env::var(key).ok());
    tracing::debug!(?config, "configuration");

    let format = OutputFormat::from_cli(cli.json, cli.jsonl, cli.pretty, cli.compact, &config.pretty);
    let ctx = Context {
        root,
        config,
        format,
    };

    let code = match cli.command {
        Commands::Contract { target, declared } => {
            commands::contract::cmd_contract(&ctx, target, declared.as_deref())
        }
        Commands::Outputs { action } => commands::outputs::cmd_outputs(&ctx, action),
        Commands::Check {
            framework,
            file,
            live,
        } => match OutputSource::from_args(file, live) {
            Some(source) => commands::check::cmd_check(&ctx, framework, source),
            None => {
                eprintln!("error: pass either --file or --live");
                1
            }
        },
        Commands::Tools => commands::tools::cmd_tools(&ctx),
        Commands::Case { case, names } => commands::case::cmd_case(&ctx, case, &names),
    };
    Ok(code)
}

fn main() {
    if handle_schema_flag() {
        return;
    }

    let cli = Cli::parse();
    let root = cli.root.clone().unwrap_or_else(|| PathBuf::from("."));
    // Before the subscriber, so log filters in .env apply.
    let dotenv = dotenvy::from_path(root.join(".env"));
    logging::init(cli.verbose);
    if let Err(err) = dotenv
        && !err.not_found()
    {
        tracing::warn!(error = %err, "ignoring .env");
    }

    match run(cli, root) {
        Ok(code) => std::process::exit(code),
        Err(err) => std::process::exit(commands::report_error(&err)),
    }
}
