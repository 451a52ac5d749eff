//! Connection Lifecycle
//!
//! This demo drives a client connection through its lifecycle against a
//! simulated socket.
//!
//! Key concepts:
//! - States declared with `state_enum!` and loaded from JSON
//! - `on` and `once` listeners for entry notifications
//! - `when(..).otherwise(..)` to await the outcome of a dial
//! - `at(..).otherwise(..)` to branch on the current state
//!
//! Run with: RUST_LOG=engineering=debug cargo run --example connection

use engineering::{state_enum, Machine};
use serde_json::json;
use std::collections::VecDeque;
use tracing_subscriber::EnvFilter;

state_enum! {
    enum Connection {
        Disconnected => "disconnected",
        Connecting => "connecting",
        Connected => "connected",
        Disconnecting => "disconnecting",
    }
}

/// Socket whose dial attempts succeed or fail according to a script.
struct Socket {
    outcomes: VecDeque<Result<String, String>>,
}

impl Socket {
    fn scripted(outcomes: impl IntoIterator<Item = Result<String, String>>) -> Self {
        Self {
            outcomes: outcomes.into_iter().collect(),
        }
    }

    fn dial(&mut self, address: &str) -> Result<String, String> {
        self.outcomes
            .pop_front()
            .unwrap_or_else(|| Err(format!("{address}: no route to host")))
    }
}

fn connect(client: &Machine<Connection, String>, socket: &mut Socket, address: &str) {
    client
        .at(Connection::Connected, |args| {
            println!("  already connected to {}", args.join(", "));
        })
        .at(Connection::Connecting, |_| {
            println!("  a dial is already in progress");
        })
        .otherwise(|_| {
            if let Err(e) = client.to(Connection::Connecting, [address.to_string()]) {
                println!("  cannot dial: {e}");
                return;
            }

            // The next transition out of `connecting` settles the dial.
            client
                .when(Connection::Connected, |args| {
                    println!("  dial resolved: connected ({})", args.join(", "));
                })
                .otherwise(|args| {
                    println!("  dial rejected: {}", args.join(", "));
                });

            let outcome = match socket.dial(address) {
                Ok(peer) => client.to(Connection::Connected, [peer]),
                Err(reason) => client.to(Connection::Disconnected, [reason]),
            };
            if let Err(e) = outcome {
                println!("  unexpected: {e}");
            }
        });
}

fn disconnect(client: &Machine<Connection, String>) {
    let closed = client
        .at(Connection::Connected, |_| {
            client
                .to(Connection::Disconnecting, ["client closed".to_string()])
                .and_then(|()| client.to(Connection::Disconnected, ["bye".to_string()]))
                .is_ok()
        })
        .otherwise(|_| false);

    if !closed {
        println!("  nothing to disconnect");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Connection Lifecycle ===\n");

    let client: Machine<Connection, String> = match Machine::from_value(json!({
        "states": {
            "disconnected": ["connecting"],
            "connecting": ["connected", "disconnected"],
            "connected": ["disconnecting", "disconnected"],
            "disconnecting": ["disconnected"]
        },
        "default": "disconnected"
    })) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return;
        }
    };

    println!("States: {:?}", client.states());
    println!("Initial state: {:?}\n", client.current());

    client
        .on(Connection::Connected, |args| {
            println!("  [on] connected to {}", args.join(", "));
        })
        .on(Connection::Disconnected, |args| {
            if !args.is_empty() {
                println!("  [on] disconnected: {}", args.join(", "));
            }
        })
        .once(Connection::Connected, |_| {
            println!("  [once] first connection established");
        });

    let mut socket = Socket::scripted([
        Err("connection refused".to_string()),
        Ok("10.0.0.7:5432".to_string()),
        Ok("10.0.0.8:5432".to_string()),
    ]);

    println!("1. Dial against a refusing server:");
    connect(&client, &mut socket, "db.internal:5432");

    println!("\n2. Dial again:");
    connect(&client, &mut socket, "db.internal:5432");

    println!("\n3. Dial while connected:");
    connect(&client, &mut socket, "db.internal:5432");

    println!("\n4. Skip a step:");
    if let Err(e) = client.to(Connection::Connecting, ["db.internal:5432".to_string()]) {
        println!("  rejected: {e}");
    }

    println!("\n5. Disconnect twice:");
    disconnect(&client);
    disconnect(&client);

    println!("\n6. Reconnect:");
    connect(&client, &mut socket, "db.internal:5432");

    println!("\nFinal state: {:?}", client.current());
    println!("\n=== Demo Complete ===");
}
