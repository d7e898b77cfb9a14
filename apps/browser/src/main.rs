use std::{process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use browser_core::{Browser, HttpProcedureService, Intent, Route, ViewSnapshot};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::load_settings;
use render::{is_failure, render};

#[derive(Parser, Debug)]
#[command(about = "Browse procedures of an analyzed Progress codebase")]
struct Args {
    /// Analysis server root, overrides browser.toml and BROWSER_SERVER_URL.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search procedures by name.
    Search { text: String },
    /// Search inner procedures inside files matching FILE.
    SearchInner { file: String, inner: String },
    /// Show the analyzed sections of a program.
    Program {
        name: String,
        /// Open the section at this index; repeatable.
        #[arg(long = "expand")]
        expand: Vec<usize>,
        /// Open the CreateWindow section.
        #[arg(long)]
        expand_primary: bool,
    },
    /// Open a view by route, e.g. /search-inner/order.w/enable_UI
    Route { path: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(url) = args.server_url {
        settings.server_url = url;
    }
    if let Some(secs) = args.timeout_secs {
        settings.request_timeout_secs = secs;
    }
    info!(server = %settings.server_url, "browsing");

    let service = HttpProcedureService::new(&settings.server_url, settings.request_timeout())
        .with_context(|| format!("server_url: '{}' is not a valid address", settings.server_url))?;
    let mut browser = Browser::new(Arc::new(service));

    let snapshot = run(&mut browser, args.command).await?;
    println!("{}", render(&snapshot));

    Ok(if is_failure(&snapshot) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

async fn run(browser: &mut Browser, command: Command) -> Result<ViewSnapshot> {
    let intent = match command {
        Command::Search { text } => Intent::GlobalSearch(text),
        Command::SearchInner { file, inner } => Intent::ScopedSearch {
            file_name: file,
            inner_name: inner,
        },
        Command::Program {
            name,
            expand,
            expand_primary,
        } => {
            browser.dispatch(Intent::OpenProgram(name))?;
            browser.settle().await;
            return expand_sections(browser, &expand, expand_primary);
        }
        Command::Route { path } => Intent::Navigate(Route::parse(&path)),
    };

    browser.dispatch(intent)?;
    Ok(browser.settle().await)
}

/// Sections only exist once the program fetch succeeded; otherwise the
/// failure itself is the answer.
fn expand_sections(
    browser: &mut Browser,
    indexes: &[usize],
    primary: bool,
) -> Result<ViewSnapshot> {
    let view = browser.controller().program_view();
    if !view.status().is_ready() {
        return Ok(browser.snapshot());
    }

    let tree = view.tree();
    let mut targets = Vec::new();
    for &index in indexes {
        let id = tree
            .id_at(index)
            .with_context(|| format!("program has {} sections, no section {index}", tree.len()))?;
        if !targets.contains(&id) {
            targets.push(id);
        }
    }
    if primary {
        if let Some(id) = tree.primary_section_id() {
            if !targets.contains(&id) {
                targets.push(id);
            }
        }
    }

    let mut snapshot = browser.snapshot();
    for id in targets {
        snapshot = browser.dispatch(Intent::ToggleSection(id))?;
    }
    Ok(snapshot)
}
