use std::time::Duration;

use rand::Rng;
use tracing::info;

use relay_core::{Rendezvous, RendezvousSender};
use relay_observe::{LoggerConfig, init_logger};

const MAX_EXCHANGES: u32 = 4;

async fn request_ack() -> anyhow::Result<()> {
    let (req_tx, mut req_rx) = Rendezvous::<String>::channel();
    let (ack_tx, mut ack_rx) = Rendezvous::<String>::channel();

    tokio::spawn(async move {
        if let Some(task) = req_rx.recv().await {
            info!(%task, "worker received");
            let _ = ack_tx.send("ok done".to_string()).await;
        }
    });

    req_tx.send("do this".to_string()).await?;
    if let Some(ack) = ack_rx.recv().await {
        info!(%ack, "ack received");
    }
    Ok(())
}

async fn player(name: &'static str, mut inbox: Rendezvous<u32>, outbox: RendezvousSender<u32>) {
    loop {
        let Some(ball) = inbox.recv().await else {
            info!(player = name, "won");
            return;
        };

        if rand::rng().random_range(0..100) % 13 == 0 {
            info!(player = name, "missed");
            outbox.close();
            return;
        }

        info!(player = name, ball, "hit");
        if outbox.send(ball + 1).await.is_err() {
            return;
        }
    }
}

async fn ping_pong() -> anyhow::Result<()> {
    let (to_a, a_inbox) = Rendezvous::channel();
    let (to_b, b_inbox) = Rendezvous::channel();

    let serve = to_a.clone();
    let a = tokio::spawn(player("Hoanh", a_inbox, to_b));
    let b = tokio::spawn(player("Andrew", b_inbox, to_a));

    serve.send(1).await?;
    serve.close();

    a.await?;
    b.await?;
    Ok(())
}

async fn runner(mut track: Rendezvous<u32>, next: Option<RendezvousSender<u32>>) {
    let Some(baton) = track.recv().await else {
        return;
    };
    info!(runner = baton, "running with baton");

    tokio::time::sleep(Duration::from_millis(100)).await;

    match next {
        Some(next) => {
            info!(runner = baton, to = baton + 1, "exchange");
            let _ = next.send(baton + 1).await;
        }
        None => info!(runner = baton, "finished, race over"),
    }
}

async fn relay_race() -> anyhow::Result<()> {
    let (start, mut track) = Rendezvous::channel();
    let mut runners = Vec::new();

    for _ in 1..MAX_EXCHANGES {
        let (next, rx) = Rendezvous::channel();
        runners.push(tokio::spawn(runner(track, Some(next))));
        track = rx;
    }
    runners.push(tokio::spawn(runner(track, None)));

    start.send(1).await?;
    for r in runners {
        r.await?;
    }
    Ok(())
}

async fn select_with_timeout() -> anyhow::Result<()> {
    let limit = Duration::from_millis(100);

    // Receive side: the producer may be late.
    let (tx, mut rx) = Rendezvous::<&'static str>::channel();
    let delay = Duration::from_millis(rand::rng().random_range(0..200));
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send_timeout("work", limit).await;
    });
    match rx.recv_timeout(limit).await? {
        Some(v) => info!(value = v, "received"),
        None => info!("recv timed out"),
    }

    // Send side: the consumer may be late.
    let (tx, mut rx) = Rendezvous::<&'static str>::channel();
    let delay = Duration::from_millis(rand::rng().random_range(0..200));
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if let Ok(Some(v)) = rx.recv_timeout(limit).await {
            info!(value = v, "consumer got");
        }
    });
    match tx.send_timeout("work", limit).await {
        Ok(true) => info!("send work"),
        Ok(false) => info!("send timed out"),
        Err(e) => info!(error = %e, "consumer gone"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Logger: RELAY_LOG_FORMAT=text|json, RUST_LOG=<directive>
    init_logger(&LoggerConfig::from_env()?)?;

    info!("=> request and ack");
    request_ack().await?;

    info!("=> ping pong");
    ping_pong().await?;

    info!("=> relay race");
    relay_race().await?;

    info!("=> select with timeout");
    select_with_timeout().await?;

    Ok(())
}
