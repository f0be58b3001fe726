use std::time::Duration;

use tracing::{error, info};

use relay_core::{
    CancelSource, CancellableOperation, Outcome, Shutdown, ShutdownConfig, ShutdownOutcome,
    SignalWaiter, os_interrupt,
};
use relay_model::OperationError;
use relay_observe::{LoggerConfig, init_logger};

const STEPS: [(&str, Duration); 3] = [
    ("task 1", Duration::from_secs(2)),
    ("task 2", Duration::from_secs(1)),
    ("task 3", Duration::from_secs(1)),
];

async fn processor(shutdown: SignalWaiter) -> Result<(), OperationError> {
    info!("processor starting");

    for (name, period) in STEPS {
        info!(step = name, "processor working");
        let op = CancellableOperation::new(name);
        let (source, _guard) = CancelSource::linked(&shutdown);

        let outcome = op
            .run(&source, move |token| async move { token.sleep(period).await })
            .await
            .map_err(|e| OperationError::Other(e.to_string()))?;

        match outcome {
            Outcome::Completed(Ok(())) => {}
            Outcome::Completed(Err(interrupted)) => return Err(interrupted.into()),
            Outcome::Cancelled | Outcome::TimedOut => {
                info!(step = name, "shutting down early");
                return Err(OperationError::Interrupted);
            }
        }
    }

    info!("processor completed");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Logger: RELAY_LOG_FORMAT=text|json, RUST_LOG=<directive>
    init_logger(&LoggerConfig::from_env()?)?;
    info!("starting process");

    // 2) Control loop: interrupt, 3s deadline, or completion
    let shutdown = Shutdown::new(ShutdownConfig::default());
    info!("launching processor; press Ctrl+C to stop early");

    let waiter = shutdown.waiter();
    match shutdown.run(processor(waiter), os_interrupt()).await? {
        ShutdownOutcome::Completed { value, interrupted } => {
            match value {
                Ok(()) => info!(interrupted, "task completed"),
                Err(e) => info!(interrupted, error = %e, "task completed with error"),
            }
            info!("process ended");
            Ok(())
        }
        ShutdownOutcome::DeadlineExceeded => {
            error!("timeout: killing program");
            std::process::exit(1);
        }
    }
}
