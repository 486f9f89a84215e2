//! Collision guard for constrained dragging

use crate::{GeometryProvider, LayoutConfig, Point, Rect};
use word_model::{DocumentSession, NodeId};

/// Union bounding rectangle of every member of the family rooted at `root`.
pub fn family_bounds(
    session: &DocumentSession,
    geometry: &dyn GeometryProvider,
    layout: &LayoutConfig,
    root: NodeId,
) -> Option<Rect> {
    let mut bounds: Option<Rect> = None;
    for member in session.words.family(root) {
        let word = session.words.get(member)?;
        let size = layout.measure_or_default(geometry, member);
        let rect = Rect::new(word.x, word.y, size.width, size.height);
        bounds = Some(match bounds {
            Some(b) => b.union(&rect),
            None => rect,
        });
    }
    bounds
}

/// Family bounds as they would be with the root moved to `origin`.
pub fn family_bounds_at(
    session: &DocumentSession,
    geometry: &dyn GeometryProvider,
    layout: &LayoutConfig,
    root: NodeId,
    origin: Point,
) -> Option<Rect> {
    let word = session.words.get(root)?;
    let (dx, dy) = (origin.x - word.x, origin.y - word.y);
    let current = family_bounds(session, geometry, layout, root)?;
    Some(Rect::new(current.x + dx, current.y + dy, current.width, current.height))
}

/// Test a proposed move of one family against every other family on a page.
///
/// Returns the root id of the first blocking family, or `None` when the
/// move is clear. A blocked move is rejected entirely; there is no sliding
/// resolution.
pub fn check_collision(
    session: &DocumentSession,
    geometry: &dyn GeometryProvider,
    layout: &LayoutConfig,
    moving_root: NodeId,
    proposed: Rect,
    page: u32,
) -> Option<NodeId> {
    for other in session.words.roots_on_page(page) {
        if other.id == moving_root {
            continue;
        }
        if let Some(bounds) = family_bounds(session, geometry, layout, other.id) {
            if bounds.intersects(&proposed) {
                return Some(other.id);
            }
        }
    }
    None
}
