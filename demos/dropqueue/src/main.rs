use std::time::Duration;

use tokio_stream::StreamExt;
use tracing::info;

use relay_core::{DropQueueConfig, drop_queue};
use relay_observe::{LoggerConfig, init_logger};

const ITEMS: u32 = 20;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Logger: RELAY_LOG_FORMAT=text|json, RUST_LOG=<directive>
    init_logger(&LoggerConfig::from_env()?)?;

    // 2) Slow consumer
    let (tx, rx) = drop_queue::<u32>(DropQueueConfig::default())?;
    let stats = rx.stats();
    let consumer = tokio::spawn(async move {
        let mut items = Box::pin(rx.consume());
        while let Some(v) = items.next().await {
            info!(item = v, "recv");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    });

    // 3) Burst that never blocks
    for i in 0..ITEMS {
        if tx.try_send(i) {
            info!(item = i, "send work");
        } else {
            info!(item = i, "drop");
        }
    }
    tx.close();

    consumer.await?;
    info!(
        accepted = stats.accepted(),
        dropped = stats.dropped(),
        "burst drained"
    );
    Ok(())
}
