use rand::Rng;
use tracing::info;

use relay_core::{FanOutCollector, FanOutConfig, FanOutReport};
use relay_model::{OperationError, WorkResult};
use relay_observe::{LoggerConfig, init_logger, log_result};

const ROUTINES: usize = 10;

fn insert(table: &'static str, id: usize) -> WorkResult {
    let op = format!("insert {table} value ({id})");
    if rand::rng().random_range(0..10) == 0 {
        let err = OperationError::rejected(format!("insert {id}"), format!("{table} table"));
        return WorkResult::failed(id, op, err);
    }
    WorkResult::ok(id, op)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Logger: RELAY_LOG_FORMAT=text|json, RUST_LOG=<directive>
    init_logger(&LoggerConfig::from_env()?)?;

    // 2) Every routine does one USERS and one TRANS insert
    let collector = FanOutCollector::new(FanOutConfig::new(ROUTINES, 2));
    info!(total = collector.config().total()?, "launching inserts");

    let results = collector
        .run(|id, step| async move {
            match step {
                0 => insert("USERS", id),
                _ => insert("TRANS", id),
            }
        })
        .await?;

    // 3) Report in arrival order
    for (n, r) in results.iter().enumerate() {
        info!(n = results.len() - n, "result");
        log_result(r);
    }

    let report = FanOutReport::from_results(&results);
    info!(
        total = report.total,
        succeeded = report.succeeded(),
        failed = report.failed,
        "inserts complete"
    );
    Ok(())
}
