// ── Visual target capabilities ──
//
// The reconciler never touches a rendering surface directly. Whatever owns
// the display injects a `TargetRegistry`; the reconciler only sees
// persistent, identity-keyed targets and their sub-elements.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::model::PortId;

/// The sub-elements a target can carry. At most one of each per target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChildKind {
    LinkIndicator,
    ConnectedDevice,
}

/// Where a target lives on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TargetRole {
    /// Sidebar card showing one port.
    StatusCard,
    /// Option in a port selector box elsewhere on the page.
    Selector,
}

/// Visual-state class of an element. Styling is the surface's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Tone {
    LinkUp,
    LinkDown,
    Offload,
    Unknown,
    Lldp,
    Arp,
}

/// One sub-element of a target.
pub trait Element {
    fn set_text(&mut self, text: &str);
    fn set_badge(&mut self, badge: Option<&str>);
    fn set_tone(&mut self, tone: Tone);
    fn set_lines(&mut self, lines: &[String]);
    /// Hiding never destroys the element.
    fn set_visible(&mut self, visible: bool);
}

/// A persistent visual node bound to one port.
pub trait VisualTarget {
    fn role(&self) -> TargetRole;

    /// Whether this target carries a sub-element of `kind` at all.
    fn accepts(&self, _kind: ChildKind) -> bool {
        true
    }

    /// The existing sub-element of `kind`, if one was ever created.
    fn child_mut(&mut self, kind: ChildKind) -> Option<&mut dyn Element>;

    /// The sub-element of `kind`, creating it when missing.
    ///
    /// The flag is `true` only when this call created it. Implementations
    /// must never hold two children of the same kind.
    fn ensure_child(&mut self, kind: ChildKind) -> (&mut dyn Element, bool);

    fn set_tooltip(&mut self, tooltip: Option<&str>);
}

/// Lookup from port identifier to the targets currently bound to it.
///
/// Zero targets for a port is normal.
pub trait TargetRegistry: Send {
    fn for_each_target(&mut self, port: &PortId, visit: &mut dyn FnMut(&mut dyn VisualTarget));
}
