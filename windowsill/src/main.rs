#![warn(clippy::pedantic)]

pub mod global;
pub mod sink;
pub mod store;

use anyhow::{Context, Result as AnyResult};
use rand::SeedableRng;
use windowsill_core::{ingest::Ingestor, render::RenderSink, sim::Simulator};

#[cfg(all(feature = "jemallocator", not(target_env = "msvc")))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Read the store into the global pool, then follow it. Only returns once the feed fails.
async fn ingest(store: store::JsonLinesStore) {
    let ingestor = Ingestor::new(store, global::pool().clone());
    if let Err(e) = ingestor.run().await {
        log::error!(
            "Sketch ingestion stopped, carrying on with {} pooled sketches: {e:#}",
            global::pool().len()
        );
    }
}

async fn frame_loop(
    mut simulator: Simulator<rand::rngs::StdRng>,
    mut sink: sink::HeadlessSink,
    interval: std::time::Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let start = tokio::time::Instant::now();
    loop {
        let now = ticker.tick().await;
        let now_ms = (now - start).as_secs_f64() * 1000.0;
        let frame = simulator.tick(now_ms, &global::pool().read());
        if let Err(e) = sink.submit(&frame) {
            log::warn!("Failed to draw frame: {e}");
        }
    }
}

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
    }

    let loaded = global::settings::Settings::get();
    if loaded.did_fail_to_load() {
        log::warn!("Using default settings.");
    }
    match loaded.save_if_absent() {
        Ok(true) => log::info!("Wrote default settings."),
        Ok(false) => (),
        Err(e) => log::warn!("Failed to save settings:\n{e:?}"),
    }
    let mut settings = loaded.settings.clone();

    // Args are a store path to show, overriding the configured one.
    // Paths are OSStrings, let the system handle character encoding restrictions.
    let mut paths = std::env::args_os().skip(1).map(std::path::PathBuf::from);
    if let Some(path) = paths.next() {
        settings.store = path;
    }
    if paths.next().is_some() {
        log::warn!("Only one store may be shown, ignoring the rest.");
    }
    if let Some(parent) = settings.store.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            log::warn!("Failed to create store directory {}: {e}", parent.display());
        }
    }
    log::info!("Showing sketches from {}", settings.store.display());

    // Nothing to show without a surface, bail before anything starts.
    let sink = sink::HeadlessSink::open(settings.surface, settings.snapshot_dir.clone())
        .context("opening the render surface")?;

    let rng = match settings.seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::from_entropy(),
    };
    let simulator = Simulator::new(
        settings.timing.clone(),
        settings.canvas,
        settings.selection,
        rng,
    );
    let store = store::JsonLinesStore::new(
        settings.store.clone(),
        std::time::Duration::from_millis(settings.poll_ms),
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    // Interleaved on one thread. Ingestion finishing, even with an error, leaves the frames running.
    runtime.block_on(async {
        tokio::join!(
            ingest(store),
            frame_loop(simulator, sink, settings.frame_interval()),
        )
    });
    Ok(())
}
