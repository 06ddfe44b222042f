//! Narrow observer interfaces for the excluded UI layer.
//!
//! The original reached into UI manager objects through deep optional
//! chains; here the dependency is inverted: the UI registers observers and
//! the core calls out through these traits only.

/// Camera focus choreography notifications.
pub trait FocusObserver {
    fn on_focus_start(&self, _track_id: &str) {}
    fn on_focus_complete(&self, _track_id: &str) {}
    fn on_return_start(&self) {}
    fn on_return_complete(&self) {}
}

/// Galaxy-level notifications.
pub trait GalaxyObserver {
    fn on_body_hovered(&self, _track_id: Option<&str>) {}
    fn on_body_selected(&self, _track_id: &str) {}
    fn on_performance_degraded(&self) {}
}
