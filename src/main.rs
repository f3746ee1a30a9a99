use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use season_rename::RenameError;
use season_rename::config::load_config_or_default;
use season_rename::mover::apply_plan;
use season_rename::rename_engine::{ConfigBuilder, FileSystem, FolderPlan, RenameEngine, ScanMode};

#[derive(Parser, Debug)]
#[command(
    name = "season-rename",
    version,
    about = "Rename a TV season, a multi-season show or a movie to dotted names"
)]
struct Cli {
    /// Season folder, show folder with season subfolders, or movie folder
    folder: PathBuf,

    /// Title to use instead of the one guessed from the folder names
    #[arg(short, long)]
    title: Option<String>,

    /// Perform the renames (default is preview only)
    #[arg(long)]
    apply: bool,

    /// Print the plan as JSON
    #[arg(long)]
    json: bool,

    /// Settings file (defaults to ./season-rename.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "season_rename=debug" } else { "season_rename=info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("✗ Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let settings = load_config_or_default(cli.config.as_deref()).context("Failed to load settings")?;

    let config = ConfigBuilder::new()
        .directory(&cli.folder)
        .title(cli.title.clone())
        .settings(settings)
        .build()?;
    let engine = RenameEngine::new(config);

    let folder_plan = match engine.plan_directory(&FileSystem) {
        Ok(plan) => plan,
        Err(e @ (RenameError::Validation { .. } | RenameError::SeasonsFailed(_) | RenameError::Plan(_))) => {
            println!("✗ {}", e);
            println!("\nNo files were renamed.");
            return Ok(false);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to scan {}", cli.folder.display()));
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&folder_plan)?);
    } else {
        print_preview(&folder_plan);
    }

    if !cli.apply {
        return Ok(true);
    }

    if folder_plan.plan.is_empty() {
        println!("ℹ Nothing to rename.");
        return Ok(true);
    }

    let report = apply_plan(&folder_plan.plan);

    println!("===================");
    println!(
        "Summary: {} of {} files renamed",
        report.renamed_count(),
        folder_plan.plan.renamed_count()
    );
    for failure in &report.failed {
        println!(
            "✗ {} -> {}: {}",
            failure.source.display(),
            failure.target.display(),
            failure.reason
        );
    }

    if report.is_success() {
        println!("✓ All files renamed successfully!");
    } else if report.renamed_count() > 0 {
        println!("⚠ Some files were renamed, but there were errors with others.");
    } else {
        println!("✗ No files were renamed.");
    }

    Ok(report.is_success())
}

fn print_preview(folder_plan: &FolderPlan) {
    let title = if folder_plan.title.is_empty() { "(none)" } else { folder_plan.title.as_str() };
    println!("Mode: {}", folder_plan.mode);
    println!("Title: {}", title);
    if let Some(season) = folder_plan.season {
        println!("Season: {:02}", season);
    }

    let plan = &folder_plan.plan;
    let mut current_season = None;

    for entry in &plan.entries {
        if folder_plan.mode == ScanMode::MultiSeason && entry.season != current_season {
            current_season = entry.season;
            let folder = entry
                .source
                .parent()
                .and_then(|p| p.file_name())
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();
            println!("\n=== Season {:02} ({}) ===", entry.season.unwrap_or_default(), folder);
        }
        println!("{}  →  {}", entry.source_name(), entry.target_name);
    }

    if !plan.unchanged.is_empty() {
        println!("\nAlready named ({}):", plan.unchanged.len());
        for path in &plan.unchanged {
            println!("  {}", path.display());
        }
    }

    println!("\nTotal renames: {}", plan.renamed_count());
}
