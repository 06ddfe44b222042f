//! Process-wide error registry: a bounded ring of reports plus the
//! escalation state shared by the fallback providers.
//!
//! The registry is the single shared-mutable structure in the core. It is
//! handed around as an `Rc<RefCell<ErrorRegistry>>` and only ever touched
//! from the frame tick, so there is no cross-frame locking.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use instant::Instant;

use crate::constants::{ERROR_LOG_CAPACITY, PERF_ESCALATION_COUNT};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ShaderCompile,
    ShaderLink,
    GpuContextLost,
    TextureLoad,
    GeometryGeneration,
    Animation,
    PerformanceWarning,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ShaderCompile => "shader-compile",
            ErrorKind::ShaderLink => "shader-link",
            ErrorKind::GpuContextLost => "gpu-context-lost",
            ErrorKind::TextureLoad => "texture-load",
            ErrorKind::GeometryGeneration => "geometry-generation",
            ErrorKind::Animation => "animation",
            ErrorKind::PerformanceWarning => "performance-warning",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// One entry of the append-only log.
#[derive(Clone, Debug)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub severity: Severity,
    pub message: String,
    /// Seconds since the registry was created.
    pub timestamp: f64,
    pub fallback_applied: bool,
}

pub type NotificationCallback = Box<dyn Fn(&ErrorReport)>;

pub struct ErrorRegistry {
    reports: VecDeque<ErrorReport>,
    capacity: usize,
    epoch: Instant,
    notify: Option<NotificationCallback>,
    consecutive_high_perf: u32,
    escalated: bool,
    context_lost: bool,
    shader_retry_available: bool,
}

/// Shared handle, cloned into every component that reports.
pub type SharedRegistry = Rc<RefCell<ErrorRegistry>>;

pub fn shared_registry() -> SharedRegistry {
    Rc::new(RefCell::new(ErrorRegistry::new()))
}

impl Default for ErrorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorRegistry {
    pub fn new() -> Self {
        Self::with_capacity(ERROR_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            reports: VecDeque::with_capacity(capacity.min(64)),
            capacity: capacity.max(1),
            epoch: Instant::now(),
            notify: None,
            consecutive_high_perf: 0,
            escalated: false,
            context_lost: false,
            shader_retry_available: false,
        }
    }

    /// User-facing notification hook, invoked for severity >= High.
    /// No-op while unset.
    pub fn set_notification_callback(&mut self, callback: NotificationCallback) {
        self.notify = Some(callback);
    }

    /// Append a report, log it by severity, and notify if severe enough.
    pub fn report(
        &mut self,
        kind: ErrorKind,
        severity: Severity,
        message: impl Into<String>,
        fallback_applied: bool,
    ) {
        let report = ErrorReport {
            kind,
            severity,
            message: message.into(),
            timestamp: self.epoch.elapsed().as_secs_f64(),
            fallback_applied,
        };
        match severity {
            Severity::Low => log::debug!("[{}] {}", kind.as_str(), report.message),
            Severity::Medium => log::info!("[{}] {}", kind.as_str(), report.message),
            Severity::High => log::warn!("[{}] {}", kind.as_str(), report.message),
            Severity::Critical => log::error!("[{}] {}", kind.as_str(), report.message),
        }
        if severity >= Severity::High {
            if let Some(notify) = &self.notify {
                notify(&report);
            }
        }
        // A non-performance report breaks the consecutive-warning chain.
        if kind != ErrorKind::PerformanceWarning {
            self.consecutive_high_perf = 0;
        }
        if self.reports.len() == self.capacity {
            self.reports.pop_front();
        }
        self.reports.push_back(report);
    }

    /// Performance warning with escalation bookkeeping. Returns `true` when
    /// this warning tripped the forced-low escalation (exactly once).
    pub fn report_performance_warning(
        &mut self,
        metric: &str,
        threshold: f64,
        value: f64,
    ) -> bool {
        let severity = if value >= threshold * 2.0 {
            Severity::High
        } else {
            Severity::Medium
        };
        self.report(
            ErrorKind::PerformanceWarning,
            severity,
            format!("{metric}: {value:.2} over threshold {threshold:.2}"),
            false,
        );
        if severity < Severity::High {
            self.consecutive_high_perf = 0;
            return false;
        }
        self.consecutive_high_perf += 1;
        if self.consecutive_high_perf >= PERF_ESCALATION_COUNT && !self.escalated {
            self.escalated = true;
            return true;
        }
        false
    }

    /// Whether performance warnings already escalated into forced low tier.
    pub fn escalated(&self) -> bool {
        self.escalated
    }

    // ---------------- GPU context loss ----------------

    pub fn mark_context_lost(&mut self) {
        self.context_lost = true;
        self.shader_retry_available = false;
    }

    /// Context restored; shader materials may retry compilation once.
    pub fn mark_context_restored(&mut self) {
        if self.context_lost {
            self.context_lost = false;
            self.shader_retry_available = true;
            log::info!("gpu context restored; one shader retry available");
        }
    }

    pub fn context_lost(&self) -> bool {
        self.context_lost
    }

    /// Consume the single post-restoration shader retry.
    pub fn take_shader_retry(&mut self) -> bool {
        std::mem::take(&mut self.shader_retry_available)
    }

    // ---------------- Introspection ----------------

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn reports(&self) -> impl Iterator<Item = &ErrorReport> {
        self.reports.iter()
    }

    pub fn latest(&self) -> Option<&ErrorReport> {
        self.reports.back()
    }

    pub fn count_of(&self, kind: ErrorKind) -> usize {
        self.reports.iter().filter(|r| r.kind == kind).count()
    }
}
