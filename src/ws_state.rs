//! Shared WebSocket connection state
//!
//! Used by both WASM and native WebSocket clients.

/// WebSocket connection state
#[derive(Clone, Debug)]
pub enum WsState {
    Connecting,
    Connected,
    Disconnected,
    Error(String),
}

impl WsState {
    pub fn is_connected(&self) -> bool {
        matches!(self, WsState::Connected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_connected_reports_connected() {
        assert!(WsState::Connected.is_connected());
        assert!(!WsState::Connecting.is_connected());
        assert!(!WsState::Disconnected.is_connected());
        assert!(!WsState::Error("boom".into()).is_connected());
    }
}
