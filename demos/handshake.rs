//! Three-Way Handshake
//!
//! This example runs two automata, a client and a server, that talk to each
//! other only through channels held in their contexts.
//!
//! Key concepts:
//! - Two machines running as independent tasks
//! - States blocking on peer messages to drive transitions
//! - A transformer counting every state invocation
//!
//! Run with: RUST_LOG=debug cargo run --example handshake

use statefn::channel::{channel, Receiver, Sender};
use statefn::{next_state, state_fn, MachineBuilder, StateFn, StateFuture};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Segment {
    Syn,
    SynAck,
    Ack,
}

struct Peer {
    name: &'static str,
    inbox: Receiver<Segment>,
    outbox: Sender<Segment>,
    events: Sender<String>,
}

impl Peer {
    async fn note(&self, event: &str) -> bool {
        self.events
            .send(format!("{}: {event}", self.name))
            .await
            .is_ok()
    }
}

fn client_start(p: &mut Peer) -> StateFuture<'_, Peer> {
    Box::pin(async move {
        if p.outbox.send(Segment::Syn).await.is_err() || !p.note("sent SYN").await {
            return None;
        }
        next_state!(syn_sent)
    })
}

fn syn_sent(p: &mut Peer) -> StateFuture<'_, Peer> {
    Box::pin(async move {
        match p.inbox.recv().await {
            Some(Segment::SynAck) => {
                if p.outbox.send(Segment::Ack).await.is_err() {
                    return None;
                }
                next_state!(established)
            }
            Some(other) => {
                p.note(&format!("unexpected {other:?}")).await;
                next_state!(syn_sent)
            }
            None => None,
        }
    })
}

fn listen(p: &mut Peer) -> StateFuture<'_, Peer> {
    Box::pin(async move {
        match p.inbox.recv().await {
            Some(Segment::Syn) => {
                if p.outbox.send(Segment::SynAck).await.is_err() || !p.note("sent SYN-ACK").await
                {
                    return None;
                }
                next_state!(syn_received)
            }
            Some(_) => next_state!(listen),
            None => None,
        }
    })
}

fn syn_received(p: &mut Peer) -> StateFuture<'_, Peer> {
    Box::pin(async move {
        match p.inbox.recv().await {
            Some(Segment::Ack) => next_state!(established),
            Some(_) => next_state!(syn_received),
            None => None,
        }
    })
}

fn established(p: &mut Peer) -> StateFuture<'_, Peer> {
    Box::pin(async move {
        p.note("connection established").await;
        None
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Three-Way Handshake ===\n");

    let (to_server, server_inbox) = channel();
    let (to_client, client_inbox) = channel();
    let (client_events_tx, mut client_events) = channel();
    let (server_events_tx, mut server_events) = channel();

    let invocations = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&invocations);
    let counting = move |state: StateFn<Peer>| {
        counter.fetch_add(1, Ordering::Relaxed);
        state
    };

    let mut client = Peer {
        name: "client",
        inbox: client_inbox,
        outbox: to_server,
        events: client_events_tx.clone(),
    };
    let mut server = Peer {
        name: "server",
        inbox: server_inbox,
        outbox: to_client,
        events: server_events_tx.clone(),
    };

    let client_machine = MachineBuilder::<Peer, String>::new()
        .transformer(counting.clone())
        .traced(true)
        .build();
    let server_machine = MachineBuilder::<Peer, String>::new()
        .transformer(counting)
        .traced(true)
        .build();

    let server_run = tokio::spawn(async move {
        server_machine
            .run(state_fn!(listen), &mut server, Some(server_events_tx), None)
            .await
    });
    let client_run = tokio::spawn(async move {
        client_machine
            .run(state_fn!(client_start), &mut client, Some(client_events_tx), None)
            .await
    });

    let client_log = tokio::spawn(async move {
        while let Some(event) = client_events.recv().await {
            println!("  {event}");
        }
    });
    let server_log = tokio::spawn(async move {
        while let Some(event) = server_events.recv().await {
            println!("  {event}");
        }
    });

    client_log.await?;
    server_log.await?;
    let client_report = client_run.await?;
    let server_report = server_run.await?;

    println!("\nClient states: {:?}", client_report.states.keys().collect::<Vec<_>>());
    println!("Server states: {:?}", server_report.states.keys().collect::<Vec<_>>());
    println!(
        "Total state invocations: {}",
        invocations.load(Ordering::Relaxed)
    );

    println!("\n=== Example Complete ===");
    Ok(())
}
