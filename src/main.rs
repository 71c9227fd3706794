use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use orapass::logging::Logger;
use orapass::types::{LogFormat, OutputFormat};
use orapass::validation;
use orapass::{CredentialQuery, CredentialResolver, Environment, WildcardPolicy};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Oracle password lookup - Retrieves a database password from an orapass file",
    long_about = None,
    disable_help_flag = true
)]
struct Args {
    /// Username (can also be set via ORACLE_USER environment variable)
    #[arg(
        short = 'u',
        long,
        help = "The username to obtain a password for. Overrides the ORACLE_USER environment variable. Defaults to the OS user."
    )]
    username: Option<String>,

    /// Database host (can also be set via ORACLE_HOST environment variable)
    #[arg(
        short = 'h',
        long,
        help = "The hostname that the database is on. Overrides the ORACLE_HOST environment variable. Defaults to localhost."
    )]
    host: Option<String>,

    /// Listener port (can also be set via ORACLE_PORT environment variable)
    #[arg(
        short = 'p',
        long,
        help = "The port that the database is listening on. Overrides the ORACLE_PORT environment variable. Defaults to 1521."
    )]
    port: Option<String>,

    /// Database name (can also be set via ORACLE_SID environment variable)
    #[arg(
        short = 'd',
        long,
        help = "The database to connect to. Overrides the ORACLE_SID environment variable."
    )]
    database: Option<String>,

    /// Orapass file searched before ORAPASSFILE and the default locations
    #[arg(short = 'f', long, help = "The orapass file to search for first.")]
    file: Option<String>,

    /// Print lookup traces on stderr
    #[arg(long, default_value = "false", help = "Debug mode.")]
    debug: bool,

    /// Quiet mode - do not print error messages
    #[arg(
        short = 'q',
        long,
        default_value = "false",
        help = "Quiet mode. Do not print any error messages."
    )]
    quiet: bool,

    /// Log file path for debug traces
    #[arg(
        short = 'l',
        long,
        help = "Also append debug traces to this file. Only used together with --debug."
    )]
    log_file: Option<String>,

    /// Debug trace format
    #[arg(
        long,
        default_value = "text",
        value_parser = clap::value_parser!(LogFormat),
        help = "Debug trace format: 'text' or 'json'"
    )]
    log_format: LogFormat,

    /// What to print on success
    #[arg(
        short = 'o',
        long,
        default_value = "password",
        value_parser = clap::value_parser!(OutputFormat),
        help = "Output on success: 'password' prints only the password, 'json' prints the whole matched entry"
    )]
    output: OutputFormat,

    /// Only let '*' match search keys that have a value
    #[arg(
        long,
        default_value = "false",
        help = "Do not let a '*' in the orapass file match a search key that is empty (e.g. no database given)."
    )]
    strict_wildcards: bool,

    /// -h is the host, so help is long-only
    #[arg(long, action = ArgAction::Help, help = "Print help")]
    help: Option<bool>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let quiet = args.quiet;

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !quiet {
                eprintln!("{}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    validation::validate_arguments(args.port.as_deref(), args.file.as_deref())?;

    let mut logger = Logger::new(args.debug, args.log_format);
    if let Some(log_file) = &args.log_file {
        logger = logger.with_log_file(log_file.clone());
    }
    let logger_arc = Arc::new(logger);

    let wildcard_policy = if args.strict_wildcards {
        WildcardPolicy::RequireQueryValue
    } else {
        WildcardPolicy::Unconditional
    };

    let resolver = CredentialResolver::new(Environment::from_process())
        .with_wildcard_policy(wildcard_policy)
        .with_logger(Arc::clone(&logger_arc));

    let mut query = CredentialQuery::new()
        .with_host(args.host.unwrap_or_default())
        .with_port(args.port.unwrap_or_default())
        .with_database(args.database.unwrap_or_default())
        .with_username(args.username.unwrap_or_default());
    if let Some(file) = args.file.filter(|f| !f.is_empty()) {
        query = query.with_file(file);
    }

    let record = match resolver.resolve(&query) {
        Ok(record) => record,
        Err(e) => {
            logger_arc.log_failure(&e.to_string());
            return Err(e.into());
        }
    };

    match args.output {
        OutputFormat::Password => println!("{}", record.password),
        OutputFormat::Json => {
            let json =
                serde_json::to_string(&record).context("Failed to serialize credential record")?;
            println!("{}", json);
        }
    }

    Ok(())
}
