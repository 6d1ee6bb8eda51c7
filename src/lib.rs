//! Solirona network visualization client
//!
//! Connects to the Solirona simulation server via WebSocket and displays:
//! - Per-node waveform traces, normalized per node, laid out in rows
//! - Collapse markers for nodes whose waveform has realized a value
//! - Rolling aggregate statistics on an independent cadence
//!
//! The core (`core` module) is platform-agnostic and fully testable without
//! a transport or a real canvas; the egui dashboard and the websocket
//! clients sit behind the `wasm` / `cli` feature gates.

pub mod core;
pub mod time;
pub mod ws_state;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod app;
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod theme;
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod websocket_wasm;

#[cfg(feature = "cli")]
pub mod websocket_native;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod wasm_entry {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use crate::app::SolironaApp;

    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();

        // Initialize tracing for browser console
        tracing_wasm::set_as_global_default();

        let web_options = eframe::WebOptions::default();

        wasm_bindgen_futures::spawn_local(async {
            let canvas = web_sys::window()
                .expect("no window")
                .document()
                .expect("no document")
                .get_element_by_id("canvas")
                .expect("no canvas element")
                .dyn_into::<web_sys::HtmlCanvasElement>()
                .expect("not a canvas element");

            eframe::WebRunner::new()
                .start(
                    canvas,
                    web_options,
                    Box::new(|cc| Ok(Box::new(SolironaApp::new(cc)))),
                )
                .await
                .expect("Failed to start eframe");
        });
    }
}
