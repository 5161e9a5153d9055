// ── In-memory target board ──
//
// A `TargetRegistry` that keeps every target as plain data and counts each
// creation and write. The CLI renders from it; tests assert against it.

use std::collections::BTreeMap;

use serde::Serialize;

use super::target::{ChildKind, Element, TargetRegistry, TargetRole, Tone, VisualTarget};
use crate::model::PortId;

// ── MemoryElement ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemoryElement {
    pub text: String,
    pub badge: Option<String>,
    pub tone: Option<Tone>,
    pub lines: Vec<String>,
    pub visible: bool,
    /// Number of setter calls received.
    pub writes: usize,
}

impl Element for MemoryElement {
    fn set_text(&mut self, text: &str) {
        text.clone_into(&mut self.text);
        self.writes += 1;
    }

    fn set_badge(&mut self, badge: Option<&str>) {
        self.badge = badge.map(str::to_owned);
        self.writes += 1;
    }

    fn set_tone(&mut self, tone: Tone) {
        self.tone = Some(tone);
        self.writes += 1;
    }

    fn set_lines(&mut self, lines: &[String]) {
        lines.clone_into(&mut self.lines);
        self.writes += 1;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.writes += 1;
    }
}

// ── MemoryTarget ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryTarget {
    pub role: TargetRole,
    pub tooltip: Option<String>,
    children: BTreeMap<ChildKind, MemoryElement>,
    creations: BTreeMap<ChildKind, usize>,
    tooltip_writes: usize,
}

impl MemoryTarget {
    pub fn new(role: TargetRole) -> Self {
        Self {
            role,
            tooltip: None,
            children: BTreeMap::new(),
            creations: BTreeMap::new(),
            tooltip_writes: 0,
        }
    }

    pub fn child(&self, kind: ChildKind) -> Option<&MemoryElement> {
        self.children.get(&kind)
    }

    /// How many times a child of `kind` has been created on this target.
    pub fn creations(&self, kind: ChildKind) -> usize {
        self.creations.get(&kind).copied().unwrap_or(0)
    }

    fn writes(&self) -> usize {
        self.tooltip_writes + self.children.values().map(|c| c.writes).sum::<usize>()
    }
}

impl VisualTarget for MemoryTarget {
    fn role(&self) -> TargetRole {
        self.role
    }

    fn child_mut(&mut self, kind: ChildKind) -> Option<&mut dyn Element> {
        self.children
            .get_mut(&kind)
            .map(|c| c as &mut dyn Element)
    }

    fn ensure_child(&mut self, kind: ChildKind) -> (&mut dyn Element, bool) {
        let created = !self.children.contains_key(&kind);
        if created {
            *self.creations.entry(kind).or_default() += 1;
        }
        let element: &mut dyn Element = self.children.entry(kind).or_default();
        (element, created)
    }

    fn set_tooltip(&mut self, tooltip: Option<&str>) {
        self.tooltip = tooltip.map(str::to_owned);
        self.tooltip_writes += 1;
    }
}

// ── MemoryBoard ─────────────────────────────────────────────────────

/// Port-keyed collection of [`MemoryTarget`]s.
#[derive(Debug, Clone, Default)]
pub struct MemoryBoard {
    targets: BTreeMap<PortId, Vec<MemoryTarget>>,
    auto_bind: Vec<TargetRole>,
}

impl MemoryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind one target per role the first time an unknown port is reconciled.
    pub fn with_auto_bind(roles: impl IntoIterator<Item = TargetRole>) -> Self {
        Self {
            targets: BTreeMap::new(),
            auto_bind: roles.into_iter().collect(),
        }
    }

    /// Bind a new, empty target to `port`. Returns its index for that port.
    pub fn bind(&mut self, port: PortId, role: TargetRole) -> usize {
        let bound = self.targets.entry(port).or_default();
        bound.push(MemoryTarget::new(role));
        bound.len() - 1
    }

    /// Drop every target bound to `port`, as when the surface is rebuilt.
    pub fn unbind(&mut self, port: &str) -> usize {
        self.targets.remove(port).map_or(0, |t| t.len())
    }

    pub fn targets(&self, port: &str) -> &[MemoryTarget] {
        self.targets.get(port).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn ports(&self) -> impl Iterator<Item = &PortId> {
        self.targets.keys()
    }

    /// Total writes across every target since the board was created.
    pub fn mutation_count(&self) -> usize {
        self.targets.values().flatten().map(MemoryTarget::writes).sum()
    }
}

impl TargetRegistry for MemoryBoard {
    fn for_each_target(&mut self, port: &PortId, visit: &mut dyn FnMut(&mut dyn VisualTarget)) {
        if !self.auto_bind.is_empty() && !self.targets.contains_key(port) {
            let bound = self.auto_bind.iter().map(|r| MemoryTarget::new(*r)).collect();
            self.targets.insert(port.clone(), bound);
        }
        let Some(bound) = self.targets.get_mut(port) else {
            return;
        };
        for target in bound {
            visit(target);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ensure_child_never_duplicates() {
        let mut target = MemoryTarget::new(TargetRole::StatusCard);

        let (_, first) = target.ensure_child(ChildKind::LinkIndicator);
        let (element, second) = target.ensure_child(ChildKind::LinkIndicator);
        element.set_text("● Link Up");

        assert!(first);
        assert!(!second);
        assert_eq!(target.creations(ChildKind::LinkIndicator), 1);
        assert_eq!(target.child(ChildKind::LinkIndicator).unwrap().text, "● Link Up");
    }

    #[test]
    fn child_mut_does_not_create() {
        let mut target = MemoryTarget::new(TargetRole::StatusCard);
        assert!(target.child_mut(ChildKind::ConnectedDevice).is_none());
        assert_eq!(target.creations(ChildKind::ConnectedDevice), 0);
    }

    #[test]
    fn auto_bind_creates_targets_on_first_sight() {
        let mut board = MemoryBoard::with_auto_bind([TargetRole::StatusCard, TargetRole::Selector]);
        let mut seen = Vec::new();

        board.for_each_target(&PortId::from("eno1"), &mut |t| seen.push(t.role()));
        board.for_each_target(&PortId::from("eno1"), &mut |t| seen.push(t.role()));

        assert_eq!(board.targets("eno1").len(), 2);
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn plain_board_visits_nothing_for_unknown_port() {
        let mut board = MemoryBoard::new();
        let mut visits = 0;
        board.for_each_target(&PortId::from("eno1"), &mut |_| visits += 1);

        assert_eq!(visits, 0);
        assert_eq!(board.ports().count(), 0);
    }

    #[test]
    fn unbind_removes_all_targets_for_port() {
        let mut board = MemoryBoard::new();
        board.bind(PortId::from("eno1"), TargetRole::StatusCard);
        board.bind(PortId::from("eno1"), TargetRole::Selector);

        assert_eq!(board.unbind("eno1"), 2);
        assert!(board.targets("eno1").is_empty());
    }
}
