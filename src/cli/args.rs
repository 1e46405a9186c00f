use crate::{
    config::{LogLevel, Transport},
    constants::{exit_codes, verbosity},
    error::{Error, Result},
};
use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use serde_json::Value;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#;

/// Generate MCP server projects for filesystem, API and database backends.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new MCP server project.
    Create(CreateArgs),
    /// List the available backends with their tools and parameters.
    List,
    /// Print the rendered code of a backend without writing files.
    Render(RenderArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Project name, also the name of the generated directory.
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Backend type: filesystem, api or database.
    #[arg(short, long)]
    pub backend: Option<String>,

    /// Directory the project directory is created in.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Human-readable description of the server.
    #[arg(short, long)]
    pub description: Option<String>,

    /// Backend parameter as KEY=VALUE; VALUE is parsed as YAML.
    #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub params: Vec<(String, Value)>,

    /// Extra requirement added to requirements.txt.
    #[arg(long = "dependency", value_name = "SPEC")]
    pub dependencies: Vec<String>,

    /// Project file (.yaml, .yml or .json) with defaults for every option.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Transport of the generated server.
    #[arg(long, value_enum)]
    pub transport: Option<Transport>,

    /// Host the SSE transport binds to.
    #[arg(long)]
    pub host: Option<String>,

    /// Port the SSE transport listens on.
    #[arg(long)]
    pub port: Option<u16>,

    /// Default log level of the generated server.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Preview actions without touching the filesystem.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// Which piece of generated code to print.
#[derive(Debug, Clone, Copy, PartialEq, Default, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum RenderPart {
    #[default]
    Server,
    Init,
    Tests,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Backend type: filesystem, api or database.
    #[arg(value_name = "BACKEND")]
    pub backend: String,

    /// Part of the project to print.
    #[arg(long, value_enum, default_value_t = RenderPart::Server)]
    pub part: RenderPart,

    /// Backend parameter as KEY=VALUE; VALUE is parsed as YAML.
    #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub params: Vec<(String, Value)>,
}

/// Parses `KEY=VALUE`, reading VALUE as YAML so `true`, `42` and
/// `[a, b]` arrive typed. Anything that is not valid YAML stays a string.
pub fn parse_assignment(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .ok_or_else(|| Error::InvalidAssignment(raw.to_string()))?;

    let value = if value.trim().is_empty() {
        Value::String(value.to_string())
    } else {
        serde_yaml::from_str::<Value>(value).unwrap_or_else(|_| Value::String(value.to_string()))
    };
    Ok((key.trim().to_string(), value))
}

/// Parse command line arguments with custom handling for missing required inputs.
pub fn get_args() -> Cli {
    Cli::try_parse().unwrap_or_else(|e| {
        if matches!(
            e.kind(),
            ErrorKind::MissingRequiredArgument
                | ErrorKind::MissingSubcommand
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        ) {
            let mut command = Cli::command().help_template(HELP_TEMPLATE);
            if let Err(print_err) = command.print_help() {
                eprintln!("Failed to display help information: {print_err}");
            } else {
                println!();
            }
            std::process::exit(exit_codes::FAILURE);
        } else {
            e.exit();
        }
    })
}

/// Map `-v` counts to the appropriate log level.
pub fn get_log_level_from_verbose(verbose_count: u8) -> LevelFilter {
    match verbose_count {
        verbosity::OFF => LevelFilter::Error,
        verbosity::INFO => LevelFilter::Info,
        verbosity::DEBUG => LevelFilter::Debug,
        verbosity::TRACE.. => LevelFilter::Trace,
    }
}
