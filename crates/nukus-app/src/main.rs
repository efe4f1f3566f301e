use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use nukus_capture::{MonitorSurface, grant_channel};
use nukus_config::{Config, StyleStore};
use nukus_core::AppState;
use nukus_ocr::TextExtractor;
use nukus_overlay::{OverlayRenderer, OverlaySurface, TracingSurface};
use nukus_translator::TranslationChain;
use nukus_types::AppEvent;
use tokio::runtime::Runtime;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use self::commands::StyleChanges;
use self::controller::{AppController, PipelineParts};
use self::profile::ProfileStore;

mod capture;
mod commands;
mod controller;
mod events;
mod io;
mod permission;
mod pipeline;
mod profile;

#[cfg(test)]
mod tests;

/// Grace period for tasks to wind down after cancellation
const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

#[derive(Parser)]
#[command(name = "nukus", version, about = "Live screen translation overlay")]
struct Cli {
    /// Profile to load from the profiles folder
    #[arg(long, global = true, default_value = "main")]
    profile: String,

    /// Log as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Capture, translate and draw captions until Ctrl+C
    Run {
        /// Log captions instead of opening the overlay window
        #[arg(long)]
        headless: bool,
        /// Skip the consent prompt
        #[arg(long)]
        grant_capture: bool,
    },
    /// Show or change the overlay style
    Style {
        #[command(subcommand)]
        action: StyleAction,
    },
    /// Translate a single text with the configured providers
    Translate { text: String },
}

#[derive(Subcommand)]
enum StyleAction {
    Show,
    Set(StyleChanges),
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(atty::is(atty::Stream::Stderr))
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn load_config(profile: &str) -> anyhow::Result<Config> {
    let profiles = ProfileStore::in_app_root()?;
    profiles.init()?;
    let config = profiles.load(profile)?.with_env_overrides();
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let command = cli.command.unwrap_or(Command::Run {
        headless: false,
        grant_capture: false,
    });

    match command {
        Command::Run {
            headless,
            grant_capture,
        } => run(&cli.profile, headless, grant_capture),
        Command::Style { action } => {
            let store = StyleStore::in_app_root()?;
            match action {
                StyleAction::Show => commands::style_show(&store),
                StyleAction::Set(changes) => commands::style_set(&store, &changes),
            }
        }
        Command::Translate { text } => {
            let config = load_config(&cli.profile)?;
            runtime()?.block_on(commands::translate(&config, &text))
        }
    }
}

fn runtime() -> anyhow::Result<Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("nukus-worker")
        .build()?)
}

fn run(profile: &str, headless: bool, grant_capture: bool) -> anyhow::Result<()> {
    let config = load_config(profile)?;
    let headless = headless || config.overlay.headless;
    tracing::info!(
        "Translating {} -> {} (profile {})",
        config.translator.source_lang,
        config.translator.target_lang,
        profile
    );

    let runtime = runtime()?;
    let _guard = runtime.enter();

    // Fail before asking for consent when nothing could be recognized anyway
    let extractor = TextExtractor::new(nukus_ocr::platform_backend(&config.ocr.language)?);
    let translator = Arc::new(TranslationChain::from_config(&config.translator)?);

    let monitor_id = config.capture.monitor;
    let (width, height) = MonitorSurface::open(monitor_id)?.size();

    let style_store = StyleStore::in_app_root()?;
    let style = style_store.load();

    let surface: Box<dyn OverlaySurface> = if headless {
        Box::new(TracingSurface::new())
    } else {
        nukus_ui::prepare()?;
        Box::new(nukus_ui::SlintOverlaySurface::new(width, height))
    };
    let renderer = Arc::new(OverlayRenderer::new(surface));
    renderer.attach(style)?;

    let (grant_tx, grant_rx) = grant_channel();
    let revoker = match permission::request_capture(grant_capture, &grant_tx) {
        Ok(revoker) => revoker,
        Err(e) => {
            renderer.detach();
            return Err(e);
        }
    };

    let state = Arc::new(AppState::new(config));
    let controller = AppController::new(state.clone(), renderer.clone());
    let tasks = runtime.block_on(controller.spawn_tasks(
        grant_rx,
        move || MonitorSurface::open(monitor_id),
        PipelineParts {
            extractor,
            translator,
            style_store,
        },
    ));

    let supervisor = runtime.spawn(supervise(tasks, controller.cancel_token()));

    // Ctrl+C asks the event loop to shut everything down
    let events = controller.events();
    runtime.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            let _ = events.send(AppEvent::Shutdown).await;
        }
    });

    if headless {
        runtime.block_on(controller.cancel_token().cancelled());
    } else {
        // The overlay window lives on this thread; stop its loop once the app is cancelled
        let cancel = controller.cancel_token();
        runtime.spawn(async move {
            cancel.cancelled().await;
            nukus_ui::quit();
        });
        nukus_ui::run_event_loop()?;
    }

    revoker.revoke();
    controller.shutdown();
    if let Err(e) = runtime.block_on(supervisor) {
        tracing::error!("Supervisor failed: {e}");
    }
    tracing::info!("Final status: {}", state.status.summary());
    Ok(())
}

fn report(result: Result<anyhow::Result<()>, tokio::task::JoinError>) {
    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("Task failed: {e}"),
        Err(e) => tracing::error!("Task panicked: {e}"),
    }
}

/// Stop everything when any task exits early, then wait for the rest
async fn supervise(mut tasks: JoinSet<anyhow::Result<()>>, cancel: CancellationToken) {
    tokio::select! {
        _ = cancel.cancelled() => {}
        Some(result) = tasks.join_next() => {
            tracing::warn!("A task exited early, shutting down");
            report(result);
            cancel.cancel();
        }
    }

    let wait = async {
        while let Some(result) = tasks.join_next().await {
            report(result);
        }
    };
    if tokio::time::timeout(SHUTDOWN_GRACE, wait).await.is_err() {
        tracing::warn!("Tasks did not stop in time, aborting");
        tasks.abort_all();
    }
}
