//! End-to-end test of a coin-operated turnstile driven by the machine.
//!
//! The turnstile starts locked. Inserting enough coins unlocks it; pushing an
//! unlocked turnstile lets one person through and locks it again. Pushing a
//! locked turnstile is blocked.

use statefn::channel::{channel, Receiver, Sender};
use statefn::{next_state, state_fn, Machine, RunReport, StateFuture, StateStats};
use tokio::task::JoinHandle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
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

struct Controls {
    coins: Sender<u32>,
    pushes: Sender<()>,
    stop: Sender<()>,
}

impl Controls {
    async fn put_coins(&self, amount: u32) {
        self.coins.send(amount).await.unwrap();
    }

    async fn push(&self) {
        self.pushes.send(()).await.unwrap();
    }

    fn off(&self) {
        self.stop.close();
    }
}

fn locked(t: &mut Turnstile) -> StateFuture<'_, Turnstile> {
    Box::pin(async move {
        tokio::select! {
            Some(amount) = t.coins.recv() => {
                t.balance += amount;
                if t.balance >= t.min_coins {
                    t.actions.send(Action::Unlock).await.unwrap();
                    return next_state!(unlocked);
                }
                next_state!(locked)
            }
            Some(()) = t.pushes.recv() => {
                t.actions.send(Action::Block).await.unwrap();
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
                t.actions.send(Action::Lock).await.unwrap();
                next_state!(locked)
            }
            _ = t.stop.recv() => None,
        }
    })
}

/// Switch a turnstile on, returning its controls, its action stream and the run.
fn switch_on(
    min_coins: u32,
    stats_out: Option<Sender<StateStats>>,
) -> (Controls, Receiver<Action>, JoinHandle<RunReport>) {
    let (coins_tx, coins) = channel();
    let (pushes_tx, pushes) = channel();
    let (stop_tx, stop) = channel();
    let (actions, actions_rx) = channel();

    let mut turnstile = Turnstile {
        min_coins,
        balance: 0,
        coins,
        pushes,
        stop,
        actions: actions.clone(),
    };

    let machine: Machine<Turnstile, Action> = Machine::new();
    let run = tokio::spawn(async move {
        machine
            .run(state_fn!(locked), &mut turnstile, Some(actions), stats_out)
            .await
    });

    let controls = Controls {
        coins: coins_tx,
        pushes: pushes_tx,
        stop: stop_tx,
    };
    (controls, actions_rx, run)
}

async fn scripted_session(controls: &Controls) {
    controls.push().await; // Blocked, no coins.
    controls.put_coins(5).await;
    controls.push().await; // Blocked, not enough coins.
    controls.put_coins(5).await;
    controls.push().await; // Works.
    controls.put_coins(15).await;
    controls.push().await; // Works.
    controls.push().await; // Blocked.
    controls.off();
}

#[tokio::test]
async fn turnstile_emits_expected_actions() {
    let (controls, mut actions, run) = switch_on(10, None);

    let printer = tokio::spawn(async move {
        let mut seen = Vec::new();
        while let Some(action) = actions.recv().await {
            seen.push(action);
        }
        seen
    });

    scripted_session(&controls).await;

    let seen = printer.await.unwrap();
    assert_eq!(
        seen,
        vec![
            Action::Block,
            Action::Block,
            Action::Unlock,
            Action::Lock,
            Action::Unlock,
            Action::Lock,
            Action::Block,
        ]
    );

    let report = run.await.unwrap();
    assert_eq!(report.entry_count("locked"), 7);
    assert_eq!(report.entry_count("unlocked"), 2);
    assert_eq!(report.invocations, 9);
}

#[tokio::test]
async fn turnstile_streams_two_snapshots_per_visit() {
    let (stats_tx, mut stats_rx) = channel();
    let (controls, mut actions, run) = switch_on(10, Some(stats_tx));

    let stats = tokio::spawn(async move {
        let mut received = Vec::new();
        while let Some(snapshot) = stats_rx.recv().await {
            received.push(snapshot);
        }
        received
    });
    let printer = tokio::spawn(async move { while actions.recv().await.is_some() {} });

    scripted_session(&controls).await;

    printer.await.unwrap();
    let received = stats.await.unwrap();
    let report = run.await.unwrap();

    assert_eq!(received.len() as u64, 2 * report.invocations);
    assert_eq!(received.first().map(|s| s.name.as_str()), Some("locked"));
    assert_eq!(received.last(), report.states.get("locked"));
}

#[tokio::test]
async fn turnstile_turned_off_immediately_closes_actions() {
    let (controls, mut actions, run) = switch_on(10, None);

    controls.off();

    assert_eq!(actions.recv().await, None);
    let report = run.await.unwrap();
    assert_eq!(report.entry_count("locked"), 1);
    assert_eq!(report.entry_count("unlocked"), 0);
}
