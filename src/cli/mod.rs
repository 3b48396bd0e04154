//! Command-line interface for antigram-panel.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **extract**: Extract the structured panel from an xlsx workbook
//! - **inspect**: Show how the extractor read a workbook (rows, columns, strategies)
//! - **serve**: Start the web server
//!
//! ## Usage
//!
//! ```text
//! # Print the panel as JSON
//! antigram-panel extract data/antigram.xlsx --format json
//!
//! # Show which rows and columns the heuristics picked
//! antigram-panel inspect data/antigram.xlsx
//!
//! # Start the web UI
//! antigram-panel serve --port 8080 --open
//!
//! # Require a token for uploads
//! antigram-panel serve --upload-token s3cret
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod extract;
pub mod inspect;

#[derive(Parser)]
#[command(name = "antigram-panel")]
#[command(version)]
#[command(about = "Extract structured antigram panels from laboratory spreadsheets")]
#[command(
    long_about = "antigram-panel reads a red cell panel worksheet (xlsx) and recovers its structure.\n\nThe worksheet layout is not fixed: header rows move around, antigen columns vary by vendor, and the auto control row hides in different places. The extractor locates them heuristically and emits:\n- Panel metadata (brand, lot, expiry)\n- One record per panel cell with its antigen reactions\n- The auto control reactions per test phase"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the panel from a workbook
    Extract(extract::ExtractArgs),

    /// Show how the extractor read a workbook
    Inspect(inspect::InspectArgs),

    /// Start the web server
    Serve(ServeArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "PORT")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Path to the panel workbook
    #[arg(short, long, default_value = "data/antigram.xlsx")]
    pub data: PathBuf,

    /// Shared secret required to replace the workbook (uploads are open when unset)
    #[arg(long, env = "UPLOAD_TOKEN")]
    pub upload_token: Option<String>,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
