//! sysauditctl - run system health checks from the command line

use anyhow::{Context, Result};
use clap::Parser;
use std::process;
use sysaudit_common::{AuditConfig, CheckRegistry};

use sysauditctl::cli::{parse_exit_code, Cli, Commands};
use sysauditctl::errors::{exit_code_for, EXIT_SUCCESS};
use sysauditctl::{commands, logging, output};

fn load_config(cli: &Cli) -> Result<AuditConfig> {
    let config = match &cli.config {
        Some(path) => AuditConfig::load_from(path)?,
        None => AuditConfig::load()?,
    };
    Ok(config)
}

fn run(cli: Cli) -> Result<i32> {
    let config = load_config(&cli).context("loading configuration")?;
    let level = if cli.verbose {
        "debug"
    } else {
        config.log.level.as_str()
    };
    logging::init(level);

    let registry = CheckRegistry::with_builtin();
    match &cli.command {
        Commands::List => {
            print!("{}", output::render_list(&registry));
            Ok(EXIT_SUCCESS)
        }
        Commands::Run(args) => {
            let color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
            let json = args.json;
            let report = commands::run_checks(&registry, args, config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", output::render_text(&report, color));
            }
            Ok(report.exit_code())
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(parse_exit_code(&e));
        }
    };
    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(exit_code_for(&e));
        }
    }
}
