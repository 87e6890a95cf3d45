use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

mod config;
mod source;

#[derive(Parser)]
#[command(
    name = "campaign-quotes",
    version,
    about = "Typeset the StarCraft campaign quotations page as LaTeX"
)]
struct Cli {
    /// Config file to load. Without it, ./campaign-quotes.json is used if
    /// present, otherwise built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ignore the cached page and fetch it again
    #[arg(long)]
    refresh: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "latex")]
    emit: EmitFormat,

    /// Suppress non-essential output
    #[arg(long)]
    quiet: bool,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum EmitFormat {
    /// LaTeX document
    Latex,
    /// Parsed token sequence as JSON
    Tokens,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;

    let page = source::load_page(&config.source_url, &config.cache_path, cli.refresh, cli.quiet)?;
    let output = render(&page, &config, cli.emit)?;

    if let Some(dir) = config.output_path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    std::fs::write(&config.output_path, output)
        .with_context(|| format!("Failed to write {}", config.output_path.display()))?;
    log::info!("wrote {}", config.output_path.display());

    if !cli.quiet {
        println!("{} {}", "Wrote".green().bold(), config.output_path.display());
    }
    Ok(())
}

/// Parse the trimmed page and produce the requested output. Nothing is
/// written until this succeeds.
fn render(page: &str, config: &config::QuotesConfig, emit: EmitFormat) -> Result<String> {
    let doc = campaign_parse::parse(page).context("Failed to parse page")?;

    let (errors, warnings): (Vec<_>, Vec<_>) = doc
        .validate()
        .into_iter()
        .partition(|d| d.severity == campaign_parse::Severity::Error);
    for diag in &warnings {
        log::warn!("{:?} at element {:?}: {}", diag.code, diag.index, diag.message);
    }
    if let Some(first) = errors.first() {
        for diag in &errors {
            log::error!("{:?} at element {:?}: {}", diag.code, diag.index, diag.message);
        }
        anyhow::bail!(
            "Parsed document is malformed ({} problems, first: {})",
            errors.len(),
            first.message
        );
    }

    match emit {
        EmitFormat::Latex => doc
            .to_latex(&config.preamble())
            .context("Failed to render LaTeX"),
        EmitFormat::Tokens => doc.to_json().context("Failed to serialize tokens"),
    }
}
