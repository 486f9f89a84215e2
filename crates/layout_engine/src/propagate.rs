//! Layout propagation - deriving chain member positions from the root

use crate::{FontMetrics, GeometryProvider, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use word_model::{DocumentSession, NodeId, Slot};

/// Default vertical gap between chained boxes, in px-equivalent units
pub const DEFAULT_VERTICAL_SPACING: f32 = 7.5;
/// Upper clamp for configured vertical spacing
pub const MAX_VERTICAL_SPACING: f32 = 24.0;

/// Shared layout configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Gap between a box and its chained neighbor
    pub vertical_spacing: f32,
    /// Size assumed for a word the geometry provider cannot measure yet
    pub fallback_size: Size,
}

impl LayoutConfig {
    /// Create a config with a clamped vertical spacing
    pub fn with_spacing(spacing: f32) -> Self {
        Self {
            vertical_spacing: spacing.clamp(0.0, MAX_VERTICAL_SPACING),
            ..Self::default()
        }
    }

    /// Measure a word, falling back to the configured default size
    pub fn measure_or_default(&self, geometry: &dyn GeometryProvider, id: NodeId) -> Size {
        geometry.measure(id).unwrap_or(self.fallback_size)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            vertical_spacing: DEFAULT_VERTICAL_SPACING,
            fallback_size: Size::new(60.0, 24.0),
        }
    }
}

/// Recompute every chained position in the family of `root`.
///
/// Only the root's position is authoritative. Each box above sits at
/// `parent.y - cap_height - spacing`, each box below at
/// `parent.y + parent.height + spacing`, and the whole family shares the
/// root's horizontal anchor, page, and line attachment.
///
/// A missing or unknown `root` makes this a no-op; callers are expected to
/// have validated existence. Idempotent by construction: positions depend
/// only on the root and measured sizes.
pub fn propagate(
    session: &mut DocumentSession,
    geometry: &dyn GeometryProvider,
    metrics: &FontMetrics,
    config: &LayoutConfig,
    root: NodeId,
) {
    // Tolerate being handed a chain member instead of the root.
    let Some(root) = session.words.root_of(root) else {
        return;
    };
    let Some(anchor) = session.words.get(root) else {
        return;
    };
    let (x, page, line) = (anchor.x, anchor.page, anchor.line);

    for slot in [Slot::Top, Slot::Bottom] {
        let mut parent = root;
        let mut seen = HashSet::new();
        seen.insert(root);
        while let Some(child) = session.words.get(parent).and_then(|w| w.child(slot)) {
            if !seen.insert(child) || !session.words.contains(child) {
                break;
            }
            let parent_y = match session.words.get(parent) {
                Some(w) => w.y,
                None => break,
            };
            let y = match slot {
                Slot::Top => parent_y - metrics.cap_height - config.vertical_spacing,
                Slot::Bottom => {
                    let height = config.measure_or_default(geometry, parent).height;
                    parent_y + height + config.vertical_spacing
                }
            };
            if let Some(c) = session.words.get_mut(child) {
                c.x = x;
                c.y = y;
                c.page = page;
                // Derived field: children ride along with the root's line.
                c.line = line;
            }
            parent = child;
        }
    }
}
