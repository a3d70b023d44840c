//! fixeval CLI - Score a candidate bug fix against a reference fix.

use std::fs;
use std::io::stdout;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fixeval::analysis::Analyzer;
use fixeval::cli::{Cli, Command, InitArgs};
use fixeval::config::Config;
use fixeval::core::{Error, Result};
use fixeval::output::Format;
use fixeval::score::Evaluator;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        format,
        config,
        no_color,
        command,
        ..
    } = cli;

    let load = || -> Result<(Config, Format)> {
        let config = match &config {
            Some(path) => Config::from_file(path)?,
            None => Config::load_default(".")?,
        };
        let format = format
            .map(Format::from)
            .unwrap_or_else(|| config.output.format.into());
        if no_color || !config.output.color {
            colored::control::set_override(false);
        }
        Ok((config, format))
    };

    match command {
        Command::Evaluate(args) => {
            let (config, format) = load()?;
            let reference = args.reference_source()?.load(&config.input)?;
            let candidate = args.candidate_source()?.load(&config.input)?;
            let evaluator = Evaluator::new(&config.metrics)?;
            let result = evaluator.evaluate(&reference, &candidate)?;
            format.write_evaluation(&result, &mut stdout().lock())?;
            result.check_threshold(args.fail_under.or(config.fail_under))?;
        }
        Command::Analyze(args) => {
            let (config, format) = load()?;
            let input = args.source()?.load(&config.input)?;
            let analysis = Analyzer::new().analyze(&input)?;
            format.write_analysis(&analysis, &mut stdout().lock())?;
        }
        Command::Init(args) => {
            let content = if args.resolved {
                load()?.0.to_toml()?
            } else {
                Config::default_toml().to_string()
            };
            init(&args, &content)?;
        }
    }

    Ok(())
}

fn init(args: &InitArgs, content: &str) -> Result<()> {
    if args.output.exists() && !args.force {
        return Err(Error::config(format!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        )));
    }
    fs::write(&args.output, content)?;
    eprintln!("Wrote {}", args.output.display());
    Ok(())
}
