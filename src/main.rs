// Crate-level lints: pixel math casts between f32, i32 and u32 are intentional
#![allow(clippy::cast_possible_truncation)] // f32->i32 casts for pixel positions
#![allow(clippy::cast_precision_loss)] // u32->f32 in layout calculations
#![allow(clippy::cast_possible_wrap)] // u32->i32 within page dimensions
#![allow(clippy::cast_sign_loss)] // i32->u32 where the sign is checked first

//! inkboard: renders a daily agenda or a date page for a 480x800 e-ink panel.
//!
//! One invocation produces one image:
//!
//! 1. Parse the command line and load the settings file (fatal on error)
//! 2. Install logging
//! 3. Fix "now" and the render window in the configured zone
//! 4. Agenda page: load events from every calendar source
//! 5. Load the current weather and the image assets
//! 6. Draw the page and write a PNG, or print the draw calls (`--dry-run`)
//!
//! Calendar, weather and asset failures are logged and rendered around.
//!
//! # Module Organization
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`settings`] | JSON settings and validation |
//! | [`clock`] | Render time zone |
//! | [`sources`] | iCalendar and CalDAV sources |
//! | [`fetch`] | Retry and per-source isolation |
//! | [`weather`] | Bright Sky client |
//! | [`assets`] | Logo and weather icon bitmaps |
//! | [`framebuffer`] | Page buffer and PNG encoding |
//! | [`render`] | Page drawing and output |
//!
//! Layout, text fitting and the views themselves live in `inkboard-common`.

mod assets;
mod clock;
mod error;
mod fetch;
mod framebuffer;
mod logging;
mod render;
mod settings;
mod sources;
mod weather;

use std::path::{Path, PathBuf};

use anyhow::{Context, ensure};
use chrono::NaiveDate;
use clap::Parser;
use inkboard_common::{EventCollection, Page, RenderContext};
use tracing::{error, info};

use crate::fetch::{FetchPolicy, fetch_events};
use crate::render::Output;
use crate::settings::Settings;
use crate::sources::CalendarSource;

#[derive(Debug, Parser)]
#[command(name = "inkboard", version, about = "Render a daily agenda or date page for an e-ink panel")]
struct Cli {
    /// Settings file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Page to render (agenda or today); overrides the settings file
    #[arg(long)]
    page: Option<Page>,

    /// PNG output path; overrides the settings file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log level (trace, debug, info, warning, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Print the draw calls instead of writing an image
    #[arg(long)]
    dry_run: bool,

    /// Render as of the start of this day (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli.config).with_context(|| format!("loading {}", cli.config.display()))?;
    logging::init(cli.log_level.as_deref(), &settings.log_level);

    let result = run(cli, settings).await;
    if let Err(e) = &result {
        error!("{e:#}");
    }
    result
}

async fn run(
    cli: Cli,
    settings: Settings,
) -> anyhow::Result<()> {
    let page = cli.page.unwrap_or(settings.page);
    check_calendars(page, &settings, &cli.config)?;

    let zone = settings.render_zone()?;
    let now = match cli.date {
        Some(date) => zone.start_of(date).with_context(|| format!("{date} has no midnight in the render zone"))?,
        None => zone.now(),
    };
    let window = zone.window(now);
    info!(%page, %now, "rendering");

    let client = sources::http_client(settings.fetch.timeout()).context("building the HTTP client")?;

    // =========================================================================
    // Events
    // =========================================================================

    let mut events = EventCollection::new();
    if page.needs_events() {
        let sources: Vec<CalendarSource> = settings.calendars.iter().map(CalendarSource::from).collect();
        let policy = FetchPolicy::from(&settings.fetch);
        fetch_events(&sources, &client, &window, zone, policy, &mut events).await;
    }

    // =========================================================================
    // Weather and Assets
    // =========================================================================

    let weather = weather::load_weather(&client, weather::BRIGHT_SKY_URL, settings.weather.as_ref()).await;
    let assets = assets::load_assets(&settings.assets, weather.as_ref());
    info!(weather = weather.is_some(), logo = assets.logo.is_some(), "inputs ready");

    // =========================================================================
    // Draw
    // =========================================================================

    let presentation = settings.presentation();
    let ctx = RenderContext {
        now,
        events: &events,
        weather: weather.as_ref(),
        assets: &assets,
        presentation: &presentation,
    };
    let output = if cli.dry_run { Output::DryRun } else { Output::Png(cli.output.unwrap_or(settings.output)) };
    render::render(page, &ctx, &output)
}

/// The page actually drawn, after the `--page` override, decides whether
/// calendars are required.
fn check_calendars(
    page: Page,
    settings: &Settings,
    config: &Path,
) -> anyhow::Result<()> {
    ensure!(
        !page.needs_events() || !settings.calendars.is_empty(),
        "the {page} page needs at least one calendar in {}",
        config.display()
    );
    Ok(())
}
