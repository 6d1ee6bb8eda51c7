//! Standalone CLI for the Solirona data pipeline
//!
//! Connects to the simulation server, tracks the snapshot store and logs the
//! aggregate status on its ticker cadence. Control commands are read from
//! stdin (`step [n]`, `nodes <count>`, `reconnect <prob>`, `add`, `remove`,
//! `rotate <angle>`, `gain <g>`, `chance <c>`, `pause`, `resume`).
//!
//! Run with: cargo run --bin solirona-cli --features cli

use std::sync::mpsc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use solirona_vis::core::{parse_message, Command, ViewController};
use solirona_vis::time::now_seconds;
use solirona_vis::websocket_native::NativeWsClient;

const DEFAULT_WS_URL: &str = "ws://127.0.0.1:5000/ws";

/// Either a server command or a local pause toggle.
enum CliAction {
    Send(Command),
    SetPaused(bool),
}

fn parse_line(line: &str) -> Option<CliAction> {
    let mut parts = line.split_whitespace();
    let action = match parts.next()? {
        "step" => CliAction::Send(Command::Step {
            count: parts.next().and_then(|s| s.parse().ok()).unwrap_or(1),
        }),
        "nodes" => CliAction::Send(Command::SetNodeCount {
            count: parts.next()?.parse().ok()?,
        }),
        "reconnect" => CliAction::Send(Command::Reconnect {
            connect_prob: parts.next()?.parse().ok()?,
        }),
        "add" => CliAction::Send(Command::AddNode),
        "remove" => CliAction::Send(Command::RemoveNode),
        "rotate" => CliAction::Send(Command::RotatePhaseAll {
            angle: parts.next()?.parse().ok()?,
        }),
        "gain" => CliAction::Send(Command::SetParams {
            interference_gain: Some(parts.next()?.parse().ok()?),
            collapse_chance: None,
        }),
        "chance" => CliAction::Send(Command::SetParams {
            interference_gain: None,
            collapse_chance: Some(parts.next()?.parse().ok()?),
        }),
        "pause" => CliAction::SetPaused(true),
        "resume" => CliAction::SetPaused(false),
        _ => return None,
    };
    Some(action)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,solirona_vis=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let url = std::env::var("SOLIRONA_WS").unwrap_or_else(|_| DEFAULT_WS_URL.to_string());

    info!(url = %url, "Connecting to simulation server");
    let client = NativeWsClient::connect(&url);

    // stdin command pump
    let (line_tx, line_rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            match stdin.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {
                    if line_tx.send(line.trim().to_string()).is_err() {
                        break;
                    }
                }
            }
        }
    });

    let mut view = ViewController::default();
    let mut snapshots = 0u64;
    let mut snapshots_last_log = 0u64;
    let mut prev_status = String::new();

    info!("Waiting for state frames...");

    loop {
        match client.rx.recv_timeout(Duration::from_millis(100)) {
            Ok(msg) => {
                if let Some(snapshot) = parse_message(&msg) {
                    view.on_snapshot(snapshot);
                    snapshots += 1;
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                warn!("connection task ended");
                break;
            }
        }

        while let Ok(line) = line_rx.try_recv() {
            match parse_line(&line) {
                Some(CliAction::Send(command)) => client.send(&command),
                Some(CliAction::SetPaused(paused)) => view.set_paused(paused),
                None => {
                    if !line.is_empty() {
                        warn!(%line, "unrecognized command");
                    }
                }
            }
        }

        view.tick(now_seconds());
        if view.status_line() != prev_status {
            prev_status = view.status_line().to_string();
            info!(
                status = %prev_status,
                snapshots_per_tick = snapshots - snapshots_last_log,
                "stats"
            );
            snapshots_last_log = snapshots;
        }
    }
    Ok(())
}
