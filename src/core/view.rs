//! View controller: snapshot ownership, pause flag, tickers
//!
//! Owns everything that used to be page-global in the original client. The
//! dashboard is immediate-mode, so "render on snapshot arrival" is expressed
//! as committing the arrived snapshot to a displayed slot; [`ViewController::draw`]
//! always paints the displayed slot. Pause gates only the commit: the store
//! keeps tracking the latest snapshot while paused, the display goes stale,
//! and unpausing alone changes nothing until the next snapshot arrives.

use tracing::{debug, trace};

use super::render::render;
use super::snapshot::{NetworkSnapshot, SnapshotStore};
use super::stats::{aggregate, config_summary, format_calculations, format_status, NetworkStats};
use super::surface::DrawSurface;

/// Fixed-interval trigger driven by an externally supplied clock.
///
/// Callers pass `now` explicitly, so tests advance time without waiting.
/// Dropping the owner drops the ticker; nothing dangles.
#[derive(Debug)]
pub struct Ticker {
    period: f64,
    last: Option<f64>,
}

impl Ticker {
    pub fn new(period: f64) -> Self {
        Self { period, last: None }
    }

    /// True once per elapsed period. The first call arms the baseline.
    pub fn due(&mut self, now: f64) -> bool {
        match self.last {
            None => {
                self.last = Some(now);
                false
            }
            Some(last) if now - last >= self.period => {
                self.last = Some(now);
                true
            }
            Some(_) => false,
        }
    }
}

/// Status-box refresh period, seconds (observed client cadence).
pub const STATUS_PERIOD: f64 = 5.0;
/// Sidebar calculations refresh period, seconds.
pub const CALC_PERIOD: f64 = 5.0;

/// Owns the snapshot store, the pause flag and both display tickers.
pub struct ViewController {
    store: SnapshotStore,
    /// Last snapshot committed for drawing; stays stale while paused.
    displayed: Option<NetworkSnapshot>,
    paused: bool,
    status_ticker: Ticker,
    calc_ticker: Ticker,
    stats: NetworkStats,
    status_line: String,
    calc_text: String,
}

impl ViewController {
    pub fn new(status_period: f64, calc_period: f64) -> Self {
        Self {
            store: SnapshotStore::new(),
            displayed: None,
            paused: false,
            status_ticker: Ticker::new(status_period),
            calc_ticker: Ticker::new(calc_period),
            stats: NetworkStats::default(),
            status_line: String::new(),
            calc_text: String::new(),
        }
    }

    /// Handle an arriving snapshot: always replaces the store; commits it for
    /// display unless paused. Returns whether the display changed.
    pub fn on_snapshot(&mut self, snapshot: NetworkSnapshot) -> bool {
        self.store.replace(snapshot);
        if self.paused {
            trace!("paused, snapshot stored but not displayed");
            return false;
        }
        // Whole-value commit; readers only ever see a fully formed snapshot.
        self.displayed = self.store.current().cloned();
        true
    }

    /// Paint the displayed snapshot. No surface mutation when nothing is
    /// displayed yet.
    pub fn draw(&self, surface: &mut dyn DrawSurface, width: f32, height: f32) {
        if let Some(snapshot) = &self.displayed {
            render(snapshot, surface, width, height);
        }
    }

    /// Advance both tickers against the store's current value.
    ///
    /// Stats and status run regardless of the pause flag; only rendering is
    /// gated by pause.
    pub fn tick(&mut self, now: f64) {
        let status_due = self.status_ticker.due(now);
        let calc_due = self.calc_ticker.due(now);
        if !status_due && !calc_due {
            return;
        }

        let empty = NetworkSnapshot::default();
        let current = self.store.current().unwrap_or(&empty);
        self.stats = aggregate(current);

        if status_due {
            self.status_line = format_status(&self.stats, self.paused);
            debug!(status = %self.status_line, "status refreshed");
        }
        if calc_due {
            self.calc_text = format_calculations(&self.stats, &config_summary(current));
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        debug!(paused, "pause flag set");
        self.paused = paused;
    }

    pub fn toggle_paused(&mut self) {
        self.set_paused(!self.paused);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Latest snapshot received, displayed or not.
    pub fn latest(&self) -> Option<&NetworkSnapshot> {
        self.store.current()
    }

    pub fn stats(&self) -> &NetworkStats {
        &self.stats
    }

    pub fn status_line(&self) -> &str {
        &self.status_line
    }

    pub fn calc_text(&self) -> &str {
        &self.calc_text
    }
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new(STATUS_PERIOD, CALC_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::surface::RecordingSurface;
    use serde_json::json;

    fn snapshot(ids: &[&str]) -> NetworkSnapshot {
        let mut payload = serde_json::Map::new();
        for id in ids {
            payload.insert(id.to_string(), json!({ "waveform": [1.0, 2.0] }));
        }
        NetworkSnapshot::from_value(&serde_json::Value::Object(payload))
    }

    #[test]
    fn snapshot_arrival_updates_display_when_running() {
        let mut view = ViewController::default();
        assert!(view.on_snapshot(snapshot(&["a", "b"])));

        let mut surface = RecordingSurface::new();
        view.draw(&mut surface, 400.0, 400.0);
        assert_eq!(surface.stroke_count(), 2);
    }

    #[test]
    fn paused_view_stores_but_does_not_display() {
        let mut view = ViewController::default();
        view.on_snapshot(snapshot(&["a"]));

        let mut before = RecordingSurface::new();
        view.draw(&mut before, 400.0, 400.0);

        view.set_paused(true);
        // Three arrivals while paused: store tracks them, display does not.
        for ids in [&["a", "b"][..], &["a", "b", "c"][..], &["d"][..]] {
            assert!(!view.on_snapshot(snapshot(ids)));
        }
        assert_eq!(view.latest().unwrap().len(), 1);
        assert_eq!(view.latest().unwrap().node_ids(), &["d"]);

        // Unpausing alone does not re-render: the display still shows the
        // pre-pause snapshot.
        view.set_paused(false);
        let mut after = RecordingSurface::new();
        view.draw(&mut after, 400.0, 400.0);
        assert_eq!(after.ops, before.ops);

        // Only the next arrival refreshes the display.
        assert!(view.on_snapshot(snapshot(&["x", "y", "z"])));
        let mut fresh = RecordingSurface::new();
        view.draw(&mut fresh, 400.0, 400.0);
        assert_eq!(fresh.stroke_count(), 3);
    }

    #[test]
    fn draw_before_any_snapshot_touches_nothing() {
        let view = ViewController::default();
        let mut surface = RecordingSurface::new();
        view.draw(&mut surface, 400.0, 400.0);
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn tickers_fire_once_per_period() {
        let mut ticker = Ticker::new(5.0);
        assert!(!ticker.due(0.0)); // arms the baseline
        assert!(!ticker.due(4.9));
        assert!(ticker.due(5.0));
        assert!(!ticker.due(7.0));
        assert!(ticker.due(10.5));
    }

    #[test]
    fn tick_refreshes_stats_and_texts_against_latest_store() {
        let mut view = ViewController::new(5.0, 5.0);
        view.tick(0.0); // arm

        view.set_paused(true);
        view.on_snapshot(snapshot(&["a", "b", "c"]));

        // Stats run on the store's current value even while paused.
        view.tick(5.0);
        assert_eq!(view.stats().total, 3);
        assert_eq!(
            view.status_line(),
            "Running: false. Collapsed 0/3 (0.0%). Avg magnitude 1.500."
        );
        assert!(view.calc_text().contains("Nodes: 3"));
    }

    #[test]
    fn tick_with_empty_store_reports_zeroes() {
        let mut view = ViewController::new(1.0, 1.0);
        view.tick(0.0);
        view.tick(1.0);
        assert_eq!(view.stats().total, 0);
        assert_eq!(
            view.status_line(),
            "Running: true. Collapsed 0/0 (0.0%). Avg magnitude 0.000."
        );
    }
}
