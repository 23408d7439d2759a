// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! Bencher Console CLI
//!
//! Terminal front end for the Bencher console engine.

use clap::{Parser, Subcommand};

mod client;
mod commands;
mod error;
mod tui;

use commands::Options;

/// Bencher Console - browse and edit Bencher resources from the terminal
#[derive(Parser)]
#[command(name = "bencher-console")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "console.yaml")]
    pub config: String,

    /// Override the API base URL
    #[arg(long)]
    pub api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List configured resources and their screens
    Resources,

    /// Show a resource's list screen
    List {
        /// Resource name, e.g. `testbeds`
        resource: String,

        /// Route parameter, e.g. `-p project_slug=my-project`
        #[arg(short, long = "param")]
        params: Vec<String>,
    },

    /// Show one entity's detail screen
    View {
        resource: String,

        /// Slug (or other key) of the entity
        slug: String,

        #[arg(short, long = "param")]
        params: Vec<String>,
    },

    /// Fill in and submit a resource's add form
    Add {
        resource: String,

        #[arg(short, long = "param")]
        params: Vec<String>,

        /// Field value, e.g. `-s name="Linux Box"`
        #[arg(short, long = "set")]
        set: Vec<String>,
    },

    /// Project metric data into chart series
    Perf {
        #[command(subcommand)]
        command: PerfCommand,
    },

    /// Validate a resource schema file
    Validate {
        /// Path to the schema file
        file: String,
    },

    /// Browse a resource interactively
    Dashboard {
        resource: String,

        #[arg(short, long = "param")]
        params: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum PerfCommand {
    /// Latency of one benchmark, in nanoseconds
    Latency {
        /// Benchmark name, e.g. `tests::benchmark_a`
        benchmark: String,

        /// Read the metrics listing from a file instead of the API
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Lines of a saved perf query response
    Lines {
        /// Path to the perf JSON
        file: String,

        /// Result indices to draw (default: all)
        #[arg(short, long, value_delimiter = ',')]
        active: Vec<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    let options = Options {
        config: &cli.config,
        api_url: cli.api_url.as_deref(),
    };

    // Dispatch to command handlers
    match &cli.command {
        Commands::Resources => commands::resources::execute(&options).await,
        Commands::List { resource, params } => {
            commands::list::execute(&options, resource, params).await
        }
        Commands::View {
            resource,
            slug,
            params,
        } => commands::view::execute(&options, resource, slug, params).await,
        Commands::Add {
            resource,
            params,
            set,
        } => commands::add::execute(&options, resource, params, set).await,
        Commands::Perf { command } => match command {
            PerfCommand::Latency { benchmark, file } => {
                commands::perf::latency(&options, benchmark, file.as_deref()).await
            }
            PerfCommand::Lines { file, active } => commands::perf::lines(file, active).await,
        },
        Commands::Validate { file } => commands::validate::execute(file).await,
        Commands::Dashboard { resource, params } => {
            commands::dashboard::execute(&options, resource, params).await
        }
    }
}
