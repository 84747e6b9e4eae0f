mod cli;
mod config;
mod document;
mod engine;
mod error;
mod formula;
mod report;
mod resolve;
mod telemetry;
mod types;

use crate::error::AppError;
use crate::types::config::MatchScoreConfig;
use clap::Parser;
use tracing::{debug, info};

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const REJECTED: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn run() -> Result<i32, AppError> {
    let cli = cli::Cli::parse();

    if !cli.root.exists() {
        return Err(AppError::PathNotFound(cli.root.display().to_string()));
    }
    let loaded = config::load_config(&cli.root)?;
    let level = telemetry::level_for(
        cli.verbose,
        cli.quiet,
        loaded.as_ref().and_then(MatchScoreConfig::log_level),
    );
    telemetry::init(&level)?;
    for key in loaded.iter().flat_map(|cfg| &cfg.overrides) {
        debug!(key = %key, "config value overridden by a later layer");
    }
    let settings = loaded
        .as_ref()
        .map(MatchScoreConfig::engine_settings)
        .unwrap_or_default();

    match cli.command {
        cli::Commands::Evaluate(cmd) => {
            let profile_path = match (&cmd.profile, &cmd.stage) {
                (Some(path), _) => path.clone(),
                (None, Some(stage)) => {
                    let resolved = resolve::resolve_profile(&cli.root, stage, loaded.as_ref())?;
                    info!(
                        stage = %stage,
                        level = resolved.level.as_str(),
                        profile = %resolved.path.display(),
                        "resolved score profile"
                    );
                    resolved.path
                }
                (None, None) => {
                    return Err(AppError::ConfigParse(
                        "either --profile or --stage is required".to_string(),
                    ))
                }
            };

            let profile = document::load_valid_profile(&profile_path)?;
            let input = document::load_input(&cmd.input)?;
            let outcome = engine::calculate_match_score_with(&profile, &input, &settings);
            match &outcome {
                Ok(score) => info!(score = score.score, "match side scored"),
                Err(failure) => info!(errors = failure.errors.len(), "match side not scored"),
            }
            let scored = outcome.is_ok();

            let evaluation = report::EvaluationReport {
                profile_path: profile_path.display().to_string(),
                profile_version: profile.version,
                profile_digest: document::profile_digest(&profile)?,
                outcome,
            };
            let output_format = match cmd.format {
                cli::ReportFormat::Json => report::OutputFormat::Json,
                cli::ReportFormat::Md => report::OutputFormat::Md,
            };
            println!("{}", report::render(&evaluation, output_format)?);

            if scored {
                Ok(exit_code::SUCCESS)
            } else {
                Ok(exit_code::REJECTED)
            }
        }
        cli::Commands::Check(cmd) => {
            let profile = document::load_profile(&cmd.profile)?;
            match profile.validate(settings.max_formula_length) {
                Ok(()) => {
                    println!(
                        "check: {} v{} ok ({} parts, {} penalties)",
                        cmd.profile.display(),
                        profile.version,
                        profile.parts.len(),
                        profile.penalties.len()
                    );
                    Ok(exit_code::SUCCESS)
                }
                Err(issues) => {
                    println!("check: {} has {} issue(s)", cmd.profile.display(), issues.len());
                    for issue in &issues {
                        println!("- {issue}");
                    }
                    Ok(exit_code::REJECTED)
                }
            }
        }
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
