//! Platform-agnostic core module - shared between WASM dashboard and CLI

pub mod commands;
pub mod layout;
pub mod parser;
pub mod render;
pub mod sample;
pub mod snapshot;
pub mod stats;
pub mod surface;
pub mod view;

pub use commands::Command;
pub use layout::{lane_layout, Lane, MAX_ROWS};
pub use parser::parse_message;
pub use render::render;
pub use sample::Amplitude;
pub use snapshot::{NetworkSnapshot, NodeState, SnapshotStore};
pub use stats::{aggregate, config_summary, ConfigSummary, NetworkStats};
pub use surface::{DrawOp, DrawSurface, RecordingSurface, Rgb};
pub use view::{Ticker, ViewController};
