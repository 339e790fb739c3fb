//! Combat engine demo binary.
//!
//! Composition root that assembles an in-memory world and a
//! [`CombatService`], then plays it through a few battles:
//! 1. Concurrent autohunts, one per seeded hero
//! 2. A solo dungeon run for the first hero, driven by auto-attacks
//!
//! Narration streams from the service's event bus to stdout; logs go to
//! stderr. Runtime knobs come from `COMBAT_*` variables (see
//! [`RuntimeConfig::from_env`]) and demo knobs from `DEMO_*` variables.
//!
//! ```bash
//! COMBAT_PACING_MILLIS=0 DEMO_SEED=7 cargo run -p combat-client
//! ```
mod config;
mod content;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use combat_core::RngSource;
use combat_runtime::{
    AutoAttackProvider, BattleEvent, CombatService, EntropyRng, InMemoryStore, RngFactory,
    RuntimeConfig, Stores, Topic,
};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::DemoConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let runtime_config = RuntimeConfig::from_env();
    let demo = DemoConfig::from_env();
    tracing::info!(?runtime_config, ?demo, "starting combat demo");

    let store = Arc::new(InMemoryStore::new());
    let heroes = content::heroes(demo.hunts);
    content::seed_store(&store, &heroes)?;

    let service = CombatService::builder()
        .config(runtime_config)
        .stores(Stores::in_memory(store.clone()))
        .oracles(content::oracles())
        .rng_factory(rng_factory(demo.seed))
        .build()?;

    let printers = [
        spawn_printer(&service, Topic::Log)?,
        spawn_printer(&service, Topic::Outcome)?,
    ];

    let hunts: Vec<_> = heroes
        .iter()
        .map(|hero| {
            let service = service.clone();
            let user = hero.user;
            tokio::spawn(async move { (user, service.autohunt(user).await) })
        })
        .collect();
    for hunt in hunts {
        let (user, result) = hunt.await?;
        if let Err(err) = result {
            tracing::warn!(%user, error = %err, "autohunt failed");
        }
    }

    let leader = heroes
        .first()
        .map(|hero| hero.user)
        .context("no heroes were seeded")?;
    let report = service
        .dungeon(&[leader], &demo.dungeon, &AutoAttackProvider)
        .await
        .with_context(|| format!("dungeon run in {}", demo.dungeon))?;
    tracing::info!(outcome = ?report.outcome, rounds = report.rounds, "dungeon run over");

    // Dropping the last service handle closes the bus and ends the printers.
    drop(service);
    for printer in printers {
        printer.await?;
    }
    Ok(())
}

/// Per-battle random streams. A fixed seed still gives every battle its own
/// stream so concurrent hunts do not mirror each other.
fn rng_factory(seed: Option<u64>) -> RngFactory {
    match seed {
        Some(seed) => {
            let next = Arc::new(AtomicU64::new(seed));
            Arc::new(move || {
                let seed = next.fetch_add(1, Ordering::Relaxed);
                Box::new(EntropyRng::seeded(seed)) as Box<dyn RngSource + Send>
            })
        }
        None => Arc::new(|| Box::new(EntropyRng::new()) as Box<dyn RngSource + Send>),
    }
}

fn spawn_printer(service: &CombatService, topic: Topic) -> Result<JoinHandle<()>> {
    let mut events = service
        .subscribe(topic)
        .context("service was built without its event bus")?;
    Ok(tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => print_event(&event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(?topic, skipped, "printer fell behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }))
}

fn print_event(event: &BattleEvent) {
    match event {
        BattleEvent::Log { session, lines } => {
            for line in lines {
                println!("[{session}] {line}");
            }
        }
        BattleEvent::Started {
            session,
            mode,
            participants,
        } => {
            println!("[{session}] --- {mode:?} battle for {participants:?} ---");
        }
        BattleEvent::Finished { session, report } => {
            match serde_json::to_string_pretty(report) {
                Ok(json) => println!("[{session}] report:\n{json}"),
                Err(err) => tracing::warn!(%session, error = %err, "report not printable"),
            }
        }
        BattleEvent::RoundStarted { .. } | BattleEvent::StageEntered { .. } => {}
    }
}
