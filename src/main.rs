use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::{prelude::*, reload, EnvFilter, Registry};

use steamdash::api::{build_client, fetch_catalog_with, RetryPolicy, StoreDetailFetcher};
use steamdash::app::App;
use steamdash::config::Config;
use steamdash::dashboard::{initial_view, ViewPayload, ViewState};
use steamdash::keybindings::KeybindingRegistry;
use steamdash::pipeline::{enrich, DashboardContext};
use steamdash::theme::ThemeVariant;
use steamdash::ui;

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Get the config directory path (~/.config/steamdash/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("steamdash"))
}

#[derive(Parser, Debug)]
#[command(
    name = "steamdash",
    version,
    about = "Terminal dashboard of Steam games grouped by genre"
)]
struct Args {
    /// Debug-level logging
    #[arg(long)]
    debug: bool,

    /// Config file (default: ~/.config/steamdash/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of catalog entries to enrich, overriding the config file
    #[arg(long, value_name = "N")]
    sample_size: Option<usize>,

    /// Print the initial dashboard view as JSON and exit
    #[arg(long)]
    json: bool,
}

/// Install the stderr subscriber. Returns a handle for quieting it while
/// the TUI owns the terminal, or `None` when `RUST_LOG` was given.
fn init_tracing(debug: bool) -> Option<FilterHandle> {
    let (filter, user_supplied) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => {
            let directive = if debug { "steamdash=debug" } else { "steamdash=info" };
            (EnvFilter::new(directive), false)
        }
    };

    let (filter, handle) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    (!user_supplied && !debug).then_some(handle)
}

/// Headless output for `--json`.
#[derive(Serialize)]
struct Snapshot<'a> {
    state: &'a ViewState,
    payload: &'a ViewPayload,
    catalog_size: usize,
    attempted: usize,
    built_at: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let filter_handle = init_tracing(args.debug);

    let config_path = match args.config {
        Some(path) => path,
        None => get_config_dir()?.join("config.toml"),
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if let Some(n) = args.sample_size {
        if n == 0 {
            anyhow::bail!("--sample-size must be at least 1");
        }
        config.sample_size = n;
    }
    tracing::debug!(?config, "Configuration loaded");

    let endpoints = config.endpoints().context("Invalid endpoint configuration")?;
    let client = build_client(config.request_timeout()).context("Failed to build HTTP client")?;

    // Catalog
    eprintln!("Fetching the game catalog...");
    let policy = RetryPolicy {
        request_timeout: config.request_timeout(),
        ..RetryPolicy::default()
    };
    let catalog = fetch_catalog_with(&client, &endpoints, &policy)
        .await
        .context("Failed to fetch the game catalog")?;
    eprintln!("Catalog: {} listable games", catalog.len());

    // Enrichment, with a one-line progress display on stderr
    let store_base = endpoints.store_base().to_string();
    let fetcher = StoreDetailFetcher::new(client, endpoints).with_timeout(config.request_timeout());
    let (progress_tx, mut progress_rx) = mpsc::channel::<(usize, usize)>(16);
    let printer = tokio::spawn(async move {
        while let Some((done, total)) = progress_rx.recv().await {
            eprint!("\rLooking up game details... {}/{}", done, total);
        }
        eprintln!();
    });

    let report = enrich(
        &fetcher,
        &catalog,
        config.sample_size,
        config.request_delay(),
        Some(&progress_tx),
    )
    .await;
    drop(progress_tx);
    if let Err(e) = printer.await {
        tracing::warn!(error = %e, "Progress printer task failed");
    }

    let ctx = Arc::new(DashboardContext::from_report(report, catalog.len(), store_base));
    let options = config.view_options();

    if args.json {
        let (state, payload) = initial_view(&ctx, &options);
        let snapshot = Snapshot {
            state: &state,
            payload: &payload,
            catalog_size: ctx.catalog_size(),
            attempted: ctx.attempted(),
            built_at: ctx.built_at().to_rfc3339(),
        };
        let json = serde_json::to_string_pretty(&snapshot).context("Failed to serialize view")?;
        println!("{}", json);
        return Ok(());
    }

    // Theme and keybindings
    let theme = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.theme, "Unknown theme, using dark");
        ThemeVariant::Dark
    });
    let mut keybindings = KeybindingRegistry::new();
    for warning in keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!("{}", warning);
        eprintln!("Warning: {}", warning);
    }

    let mut app = App::new(ctx, options, theme, keybindings);

    // The TUI owns the terminal from here; keep stderr quiet below warn.
    if let Some(handle) = &filter_handle {
        if let Err(e) = handle.modify(|f| *f = EnvFilter::new("steamdash=warn")) {
            tracing::debug!(error = %e, "Failed to lower log level for the TUI");
        }
    }

    ui::run(&mut app).await.context("Terminal UI failed")?;

    Ok(())
}
