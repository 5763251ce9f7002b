use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::debug;

use proposal_cli::{app, config::Config, logging};
use proposal_core::ProposalEngine;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Roof-coating proposal calculator.
///
/// Recalculates proposal forms, imports saved profit summaries and renders
/// proposal documents.
#[derive(Debug, Parser)]
struct Cli {
    /// TOML file overriding the built-in rate card.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `proposal_core=trace`. Overrides `RUST_LOG`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Recalculate every row of a form CSV.
    Recalc {
        #[arg(long)]
        input: PathBuf,

        /// Echo-back CSV; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Recalculate a saved profit summary as a fresh revision.
    Import {
        #[arg(long)]
        sheet: PathBuf,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Write a proposal document and profit summary for every row.
    Render {
        #[arg(long)]
        input: PathBuf,

        /// Document template with `[[Placeholder]]` markers.
        #[arg(long)]
        template: PathBuf,

        #[arg(long)]
        out_dir: PathBuf,

        /// Profit summary CSV to fill in; a blank grid when omitted.
        #[arg(long)]
        sheet_template: Option<PathBuf>,
    },

    /// List the proposal folders a status change would move.
    Transition {
        #[arg(long)]
        input: PathBuf,

        /// Current status: open, under-contract, completed or dead.
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,
    },
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    let config = Config::load(cli.config.as_deref())?;
    let engine = ProposalEngine::new(config.rates)?;
    debug!(command = ?cli.command, "starting");

    match cli.command {
        Command::Recalc { input, output } => {
            app::recalc(&engine, &input, output.as_deref())?;
        }
        Command::Import { sheet, output } => {
            app::import(&engine, &sheet, output.as_deref())?;
        }
        Command::Render {
            input,
            template,
            out_dir,
            sheet_template,
        } => {
            app::render(
                &engine,
                app::RenderOptions {
                    input,
                    template,
                    out_dir,
                    sheet_template,
                    date: Local::now().date_naive(),
                },
            )
            .await?;
        }
        Command::Transition { input, from, to } => {
            for line in app::transition(&input, &from, &to)? {
                println!("{line}");
            }
        }
    }

    Ok(())
}
