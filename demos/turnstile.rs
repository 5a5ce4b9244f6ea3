//! Coin-Operated Turnstile
//!
//! This example drives a turnstile automaton from a separate task.
//!
//! Key concepts:
//! - States as plain async functions returning the next state
//! - External events delivered through channels held in the context
//! - Actions streamed on the output channel, closed by the machine
//! - Live statistics streamed on the stats channel
//!
//! Run with: RUST_LOG=debug cargo run --example turnstile

use statefn::channel::{channel, Receiver, Sender};
use statefn::{next_state, state_fn, MachineBuilder, StateFuture, StateStats};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug)]
enum Action {
    Lock,
    Unlock,
    Block,
}

struct Turnstile {
    min_coins: u32,
    balance: u32,
    coins: Receiver<u32>,
    pushes: Receiver<()>,
    stop: Receiver<()>,
    actions: Sender<Action>,
}

fn locked(t: &mut Turnstile) -> StateFuture<'_, Turnstile> {
    Box::pin(async move {
        tokio::select! {
            Some(amount) = t.coins.recv() => {
                t.balance += amount;
                if t.balance < t.min_coins {
                    return next_state!(locked);
                }
                if t.actions.send(Action::Unlock).await.is_err() {
                    return None;
                }
                next_state!(unlocked)
            }
            Some(()) = t.pushes.recv() => {
                if t.actions.send(Action::Block).await.is_err() {
                    return None;
                }
                next_state!(locked)
            }
            _ = t.stop.recv() => None,
        }
    })
}

fn unlocked(t: &mut Turnstile) -> StateFuture<'_, Turnstile> {
    Box::pin(async move {
        t.balance = 0;

        tokio::select! {
            Some(()) = t.pushes.recv() => {
                if t.actions.send(Action::Lock).await.is_err() {
                    return None;
                }
                next_state!(locked)
            }
            _ = t.stop.recv() => None,
        }
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Turnstile State Machine ===\n");

    let (coins_tx, coins) = channel();
    let (pushes_tx, pushes) = channel();
    let (stop_tx, stop) = channel();
    let (actions_tx, mut actions) = channel();
    let (stats_tx, mut stats) = channel::<StateStats>();

    let mut turnstile = Turnstile {
        min_coins: 10,
        balance: 0,
        coins,
        pushes,
        stop,
        actions: actions_tx.clone(),
    };

    let machine = MachineBuilder::<Turnstile, Action>::new()
        .traced(true)
        .build();
    let run = tokio::spawn(async move {
        machine
            .run(
                state_fn!(locked),
                &mut turnstile,
                Some(actions_tx),
                Some(stats_tx),
            )
            .await
    });

    let printer = tokio::spawn(async move {
        while let Some(action) = actions.recv().await {
            println!("  action: {action:?}");
        }
    });
    let dashboard = tokio::spawn(async move {
        let mut updates = 0;
        while let Some(snapshot) = stats.recv().await {
            updates += 1;
            tracing::debug!(
                state = %snapshot.name,
                entries = snapshot.entry_count,
                spent = ?snapshot.total_time_spent,
                "stats update"
            );
        }
        updates
    });

    pushes_tx.send(()).await?; // Blocked, no coins.
    coins_tx.send(5).await?;
    pushes_tx.send(()).await?; // Blocked, not enough coins.
    coins_tx.send(5).await?;
    pushes_tx.send(()).await?; // Works.
    coins_tx.send(15).await?;
    pushes_tx.send(()).await?; // Works.
    pushes_tx.send(()).await?; // Blocked.
    stop_tx.close();

    printer.await?;
    let updates = dashboard.await?;
    let report = run.await?;

    println!("\nStatistics ({updates} snapshots received):");
    for stats in report.states.values() {
        println!(
            "  {:<10} entries: {:>2}  first entry after: {:?}  time spent: {:?}",
            stats.name, stats.entry_count, stats.time_to_first_entry, stats.total_time_spent
        );
    }
    println!("\nReport as JSON:\n{}", report.to_json()?);

    println!("\n=== Example Complete ===");
    Ok(())
}
