//! Baseline snapping with acquire/release hysteresis

use crate::{propagate, FontMetrics, GeometryProvider, LayoutConfig, PageProvider};
use serde::{Deserialize, Serialize};
use word_model::{DocumentSession, LineId, NodeId, TextLine};

/// Snapping thresholds and the baseline alignment constant.
///
/// The defaults are tuned against one specific font/DPI pairing and are
/// deliberately kept as configuration rather than re-derived; a different
/// geometry provider may need recalibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapConfig {
    /// Max distance at which an unsnapped box acquires a line
    pub acquire_threshold: f32,
    /// Distance a snapped box must exceed before its line is released
    pub release_threshold: f32,
    /// Fixed vertical nudge aligning the box baseline onto the line
    pub baseline_align: f32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            acquire_threshold: 40.0,
            release_threshold: 50.0,
            baseline_align: 16.0,
        }
    }
}

/// The baseline-adjusted vertical center of a line
fn line_center(line: &TextLine, metrics: &FontMetrics) -> f32 {
    line.y - metrics.body_height / 2.0
}

/// Vertical distance between a box center and a line center
fn distance(box_y: f32, box_height: f32, line: &TextLine, metrics: &FontMetrics) -> f32 {
    (box_y + box_height / 2.0 - line_center(line, metrics)).abs()
}

/// The y position a box of `height` takes when snapped to `line`.
pub fn snap_y(line: &TextLine, height: f32, metrics: &FontMetrics, config: &SnapConfig) -> f32 {
    line_center(line, metrics) - height / 2.0 + metrics.ascender_height - config.baseline_align
}

/// Decide which line, if any, the root should be snapped to.
///
/// Hysteresis: while already snapped, the current line is kept as long as
/// its distance stays under the release threshold, even when a nearer line
/// exists. While unsnapped, the nearest line within the acquire threshold
/// wins. The band between the two thresholds prevents flicker when a box is
/// dragged near two close lines.
pub fn propose_snap(
    session: &DocumentSession,
    geometry: &dyn GeometryProvider,
    metrics: &FontMetrics,
    layout: &LayoutConfig,
    snap: &SnapConfig,
    root: NodeId,
    page: u32,
) -> Option<LineId> {
    let word = session.words.get(root)?;
    let height = layout.measure_or_default(geometry, root).height;

    if let Some(current) = word.line {
        if let Some(line) = session.lines.line(current) {
            if distance(word.y, height, line, metrics) < snap.release_threshold {
                return Some(current);
            }
        }
    }

    session
        .lines
        .lines_on_page(page)
        .map(|line| (line.id, distance(word.y, height, line, metrics)))
        .filter(|(_, d)| *d < snap.acquire_threshold)
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(id, _)| id)
}

/// Attach a root to a line at the snapped position and re-propagate.
pub fn apply_snap(
    session: &mut DocumentSession,
    geometry: &dyn GeometryProvider,
    metrics: &FontMetrics,
    layout: &LayoutConfig,
    snap: &SnapConfig,
    root: NodeId,
    line_id: LineId,
) {
    let Some(line) = session.lines.line(line_id).cloned() else {
        return;
    };
    let height = layout.measure_or_default(geometry, root).height;
    let y = snap_y(&line, height, metrics, snap);
    if session.attach_root(line_id, root).is_err() {
        return;
    }
    if let Some(w) = session.words.get_mut(root) {
        w.y = y;
    }
    propagate(session, geometry, metrics, layout, root);
}

/// Detach a root from its line and re-propagate the derived fields.
pub fn release_snap(
    session: &mut DocumentSession,
    geometry: &dyn GeometryProvider,
    metrics: &FontMetrics,
    layout: &LayoutConfig,
    root: NodeId,
) {
    session.detach_root(root);
    propagate(session, geometry, metrics, layout, root);
}

/// Whether a word's right edge crosses the page's right margin.
///
/// Line wrapping on overflow is the caller's concern; this only reports the
/// fit of the current position.
pub fn would_exceed_margin(
    session: &DocumentSession,
    geometry: &dyn GeometryProvider,
    layout: &LayoutConfig,
    pages: &dyn PageProvider,
    id: NodeId,
) -> bool {
    let Some(word) = session.words.get(id) else {
        return false;
    };
    let width = layout.measure_or_default(geometry, id).width;
    let margins = pages.margins(word.page);
    word.x + width > margins.right()
}
