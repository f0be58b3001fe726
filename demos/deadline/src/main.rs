use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;
use tracing::info;

use relay_core::{CancelSource, CancellableOperation, Outcome};
use relay_observe::{LoggerConfig, init_logger, log_outcome};

#[derive(Debug, Clone)]
struct Data {
    user_id: String,
}

/// Work that takes `period` unless cancelled first.
async fn fetch(token: relay_core::CancelToken, period: Duration) -> Option<Data> {
    token.sleep(period).await.ok()?;
    Some(Data {
        user_id: "123".to_string(),
    })
}

fn report<T: std::fmt::Debug>(op: &CancellableOperation, outcome: &Outcome<T>) {
    log_outcome(op.name(), outcome.state());
    if let Outcome::Completed(v) = outcome {
        info!(op = op.name(), value = ?v, "work complete");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Logger: RELAY_LOG_FORMAT=text|json, RUST_LOG=<directive>
    init_logger(&LoggerConfig::from_env()?)?;

    // 2) Explicit cancel after 50ms races 100ms of work
    {
        let op = CancellableOperation::new("cancel");
        let (source, guard) = CancelSource::new();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            guard.cancel();
        });
        let outcome = op
            .run(&source, |t| fetch(t, Duration::from_millis(100)))
            .await?;
        report(&op, &outcome);
    }

    // 3) Deadline 150ms from now, work needs 200ms
    {
        let op = CancellableOperation::new("deadline");
        let (source, _guard) = CancelSource::until(Instant::now() + Duration::from_millis(150));
        let outcome = op
            .run(&source, |t| fetch(t, Duration::from_millis(200)))
            .await?;
        report(&op, &outcome);
    }

    // 4) Timeout 150ms, work needs 50ms
    {
        let op = CancellableOperation::new("timeout");
        let (source, _guard) = CancelSource::timeout(Duration::from_millis(150));
        let outcome = op
            .run(&source, |t| fetch(t, Duration::from_millis(50)))
            .await?;
        report(&op, &outcome);
    }

    // 5) Random work against a 100ms limit
    {
        let op = CancellableOperation::new("select");
        let (source, _guard) = CancelSource::timeout(Duration::from_millis(100));
        let period = Duration::from_millis(rand::rng().random_range(0..200));
        let outcome = op.run(&source, |t| fetch(t, period)).await?;
        report(&op, &outcome);
    }

    Ok(())
}
