// ── Reconciliation ──
//
// Diffs each new port snapshot against the last one applied for that port
// and writes only what changed onto the bound visual targets. Sub-elements
// are created on first sight and reused afterwards, never duplicated.

pub mod memory;
pub mod presentation;
pub mod target;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::model::{PortId, PortSnapshot};
use presentation::{device_view, indicator, tooltip};
use target::{ChildKind, TargetRegistry, VisualTarget};

pub use memory::{MemoryBoard, MemoryElement, MemoryTarget};
pub use target::{Element, TargetRole, Tone};

// ── ReconciliationState ─────────────────────────────────────────────

/// The last snapshot applied for a port, tagged with its cycle.
#[derive(Debug, Clone)]
pub struct AppliedSnapshot {
    pub snapshot: Arc<PortSnapshot>,
    pub cycle: u64,
}

/// Port -> last-applied snapshot. Only used for diffing; losing it just
/// means the next cycle rewrites every target.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationState {
    applied: BTreeMap<PortId, AppliedSnapshot>,
}

impl ReconciliationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, port: &PortId) -> Option<&AppliedSnapshot> {
        self.applied.get(port)
    }

    pub fn snapshot(&self, port: &PortId) -> Option<&Arc<PortSnapshot>> {
        self.applied.get(port).map(|a| &a.snapshot)
    }

    /// All applied snapshots, ordered by port.
    pub fn snapshots(&self) -> Vec<Arc<PortSnapshot>> {
        self.applied.values().map(|a| Arc::clone(&a.snapshot)).collect()
    }

    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    pub fn clear(&mut self) {
        self.applied.clear();
    }

    fn record(&mut self, snapshot: Arc<PortSnapshot>, cycle: u64) {
        self.applied
            .insert(snapshot.port.clone(), AppliedSnapshot { snapshot, cycle });
    }
}

// ── Target application ──────────────────────────────────────────────

/// Bring every target bound to `new.port` in line with `new`.
///
/// Returns the number of targets visited; zero is not an error.
pub fn apply(
    previous: Option<&PortSnapshot>,
    new: &PortSnapshot,
    registry: &mut dyn TargetRegistry,
) -> usize {
    let mut visited = 0;
    registry.for_each_target(&new.port, &mut |target| {
        visited += 1;
        apply_target(target, previous, new);
    });
    visited
}

fn apply_target(target: &mut dyn VisualTarget, previous: Option<&PortSnapshot>, new: &PortSnapshot) {
    let (element, created) = target.ensure_child(ChildKind::LinkIndicator);
    // A freshly created indicator means the whole target is new to us.
    let fresh = created || previous.is_none();
    let changed = |differs: fn(&PortSnapshot, &PortSnapshot) -> bool| {
        fresh || previous.is_some_and(|p| differs(p, new))
    };

    if changed(PortSnapshot::indicator_differs) {
        let shown = indicator(new);
        element.set_text(&shown.text);
        element.set_badge(Some(shown.badge));
        element.set_tone(shown.tone);
        element.set_visible(true);
        trace!(port = %new.port, role = %target.role(), "indicator updated");
    }

    if changed(|a, b| a.metadata != b.metadata) {
        target.set_tooltip(tooltip(&new.metadata).as_deref());
    }

    if !target.accepts(ChildKind::ConnectedDevice) {
        return;
    }
    let device_changed = changed(|a, b| a.device != b.device);

    match device_view(&new.device, target.role()) {
        Some(view) => {
            let (element, created) = target.ensure_child(ChildKind::ConnectedDevice);
            if created || device_changed {
                element.set_text(&view.text);
                element.set_lines(&view.lines);
                element.set_tone(view.tone);
                element.set_visible(true);
            }
        }
        None if device_changed => {
            if let Some(element) = target.child_mut(ChildKind::ConnectedDevice) {
                element.set_visible(false);
            }
        }
        None => {}
    }
}

// ── Reconciler ──────────────────────────────────────────────────────

/// Result of applying one port snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied { targets: usize },
    /// Dropped because a newer cycle already updated this port.
    Stale,
}

/// Totals for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub ports_applied: usize,
    pub targets_touched: usize,
    pub stale_dropped: usize,
}

/// Owns the [`ReconciliationState`] and applies snapshots in order.
#[derive(Debug, Default)]
pub struct Reconciler {
    state: ReconciliationState,
    reject_stale: bool,
}

impl Reconciler {
    /// With `reject_stale`, a snapshot from a cycle strictly older than the
    /// one already applied for that port is dropped. Otherwise the last
    /// snapshot applied wins.
    pub fn new(reject_stale: bool) -> Self {
        Self {
            state: ReconciliationState::new(),
            reject_stale,
        }
    }

    pub fn state(&self) -> &ReconciliationState {
        &self.state
    }

    /// Forget every applied snapshot. The next cycle rewrites all targets.
    pub fn reset(&mut self) {
        self.state.clear();
    }

    pub fn apply(
        &mut self,
        cycle: u64,
        snapshot: Arc<PortSnapshot>,
        registry: &mut dyn TargetRegistry,
    ) -> ApplyOutcome {
        let previous = self.state.get(&snapshot.port);
        if self.reject_stale && previous.is_some_and(|p| p.cycle > cycle) {
            debug!(port = %snapshot.port, cycle, "dropping stale snapshot");
            return ApplyOutcome::Stale;
        }

        let targets = apply(previous.map(|p| p.snapshot.as_ref()), &snapshot, registry);
        self.state.record(snapshot, cycle);
        ApplyOutcome::Applied { targets }
    }

    pub fn apply_batch(
        &mut self,
        cycle: u64,
        snapshots: Vec<PortSnapshot>,
        registry: &mut dyn TargetRegistry,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for snapshot in snapshots {
            match self.apply(cycle, Arc::new(snapshot), registry) {
                ApplyOutcome::Applied { targets } => {
                    outcome.ports_applied += 1;
                    outcome.targets_touched += targets;
                }
                ApplyOutcome::Stale => outcome.stale_dropped += 1,
            }
        }
        outcome
    }
}
