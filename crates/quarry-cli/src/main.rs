use std::sync::Arc;

use tokio::time::{Duration, sleep};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use quarry_core::app::{CommandRouter, ManagerConfig, QueueManager, TickDriver};
use quarry_core::impls::{SimWorld, StdoutNotifier};
use quarry_core::ports::Collaborators;

/// Scripted demo: a simulated world stands in for the real engine, catalog,
/// and inventory, and a short command script drives the queue end to end.
#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
    tracing::info!("quarry demo starting");

    // (A) Wire the collaborators: one SimWorld handle plays engine, catalog,
    // and inventory; notices go straight to stdout.
    let world = SimWorld::new();
    world.insert_resource("oak_log", 0);
    world.insert_resource("stone", 0);

    let ports = Arc::new(Collaborators::new(
        Arc::new(world.clone()),
        Arc::new(world.clone()),
        Arc::new(world.clone()),
        Arc::new(StdoutNotifier::new("Quarry")),
    ));
    let manager = QueueManager::new(ManagerConfig::default_v1(), ports);
    let router = CommandRouter::new(manager.clone());

    // (B) Start the tick loop (sped up from the host's 50ms cadence).
    let driver = TickDriver::spawn(manager.clone(), Duration::from_millis(10));

    // (C) Queue two jobs the way a user would.
    router.handle("#get 8 oak_log").await;
    router.handle("#get 4 stone").await;

    // (D) Let the world yield resources for a while, then pause mid-job.
    for _ in 0..20 {
        world.mine(1);
        sleep(Duration::from_millis(20)).await;
    }
    router.handle("#pause").await;
    println!("--- paused; status: {}", manager.status_summary().await);
    sleep(Duration::from_millis(200)).await;
    router.handle("#continue").await;

    // (E) Keep mining until both jobs are done.
    while manager.queued_count().await > 0 {
        world.mine(1);
        sleep(Duration::from_millis(20)).await;
        manager.tick().await; // clears a finished job even between driver ticks
    }

    let status = manager.snapshot().await;
    println!(
        "final status: {}",
        serde_json::to_string_pretty(&status).expect("status serializes")
    );

    driver.shutdown_and_join().await;
}
