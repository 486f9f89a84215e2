//! Gesture-level editing engine
//!
//! All mutations happen synchronously inside gesture callbacks; within one
//! gesture the order is fixed: graph/line mutation, layout propagation,
//! snap decision, history recording. The host event loop serializes
//! callbacks, so nothing here suspends or runs concurrently.

use crate::{
    AddAnnotation, AddLine, AddWord, Checkpoint, DeleteFamily, DeleteLine, EditText, HistoryOp,
    MoveAnnotation, MoveWord, OpContext, Result, UndoManager,
};
use layout_engine::{
    apply_snap, check_collision, family_bounds_at, propagate, propose_snap, release_snap,
    would_exceed_margin, FontMetrics, GeometryProvider, LayoutConfig, PageProvider, Point, Rect,
    SnapConfig,
};
use word_model::{
    DocumentSession, LexiconStore, LineId, NodeId, Slot, WordFlags,
};

/// Navigation keys the engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
}

/// In-flight drag bookkeeping
#[derive(Debug, Clone, Copy)]
struct DragState {
    root: NodeId,
    page: u32,
    /// Pointer offset from the root origin at grab time
    grab: Point,
    start: Point,
    start_line: Option<LineId>,
    last_valid: Point,
    constrained: bool,
    moved: bool,
}

/// The interactive editing engine for one open document.
///
/// Owns the session, the undo history, and the consumed provider
/// interfaces. Every user gesture that mutates the document records
/// exactly one history operation; propagation and snapping side effects
/// are part of that gesture, never recorded separately.
pub struct EditorEngine {
    session: DocumentSession,
    history: UndoManager,
    geometry: Box<dyn GeometryProvider>,
    pages: Box<dyn PageProvider>,
    lexicon: Box<dyn LexiconStore>,
    metrics: FontMetrics,
    layout: LayoutConfig,
    snap: SnapConfig,
    drag: Option<DragState>,
}

impl EditorEngine {
    /// Create an engine for an empty document
    pub fn new(
        geometry: Box<dyn GeometryProvider>,
        pages: Box<dyn PageProvider>,
        lexicon: Box<dyn LexiconStore>,
    ) -> Self {
        Self {
            session: DocumentSession::new(),
            history: UndoManager::new(),
            geometry,
            pages,
            lexicon,
            metrics: FontMetrics::default(),
            layout: LayoutConfig::default(),
            snap: SnapConfig::default(),
            drag: None,
        }
    }

    /// Override the layout and snapping configuration
    pub fn with_configs(mut self, metrics: FontMetrics, layout: LayoutConfig, snap: SnapConfig) -> Self {
        self.metrics = metrics;
        self.layout = layout;
        self.snap = snap;
        self
    }

    /// The current document state
    pub fn session(&self) -> &DocumentSession {
        &self.session
    }

    /// Atomically replace the document (load boundary).
    ///
    /// History and any in-flight drag belong to the old document and are
    /// dropped; no mutation straddles the load.
    pub fn load_session(&mut self, session: DocumentSession) {
        self.drag = None;
        self.history.clear();
        self.session = session;
        tracing::info!(
            words = self.session.words.len(),
            lines = self.session.lines.len(),
            "document loaded"
        );
    }

    /// Whether undo is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether redo is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Whether any operation sits above the most recent checkpoint
    pub fn has_unsaved_changes(&self) -> bool {
        self.history.has_unsaved_changes()
    }

    // =========================================================================
    // Gesture operations
    // =========================================================================

    /// Add a root word at a position; snaps to a nearby line if one is in
    /// acquire range.
    pub fn add_word(
        &mut self,
        page: u32,
        at: Point,
        text: impl Into<String>,
        flags: WordFlags,
    ) -> NodeId {
        let mut op = AddWord::new(page, at.x, at.y, text, flags);
        let id = op.id;
        let ctx = OpContext {
            geometry: self.geometry.as_ref(),
            metrics: &self.metrics,
            layout: &self.layout,
            snap: &self.snap,
        };
        // The add cannot fail: the word is fresh and unattached.
        let inverse = op
            .apply(&mut self.session, &ctx)
            .unwrap_or(Box::new(DeleteFamily { target: id }));
        if let Some(line) = propose_snap(
            &self.session,
            self.geometry.as_ref(),
            &self.metrics,
            &self.layout,
            &self.snap,
            id,
            page,
        ) {
            apply_snap(
                &mut self.session,
                self.geometry.as_ref(),
                &self.metrics,
                &self.layout,
                &self.snap,
                id,
                line,
            );
            op.line = Some(line);
        }
        self.history.push(Box::new(op), inverse);
        id
    }

    /// Add a translation annotation in a slot of `parent`.
    ///
    /// The initial text is pre-filled from the lexicon. An occupied slot or
    /// vanished parent is a silent no-op; the UI removes the triggering
    /// affordance once a slot is filled.
    pub fn add_annotation(&mut self, parent: NodeId, slot: Slot) -> Option<NodeId> {
        let primary = self.session.words.get(parent)?.text.clone();
        let prefill = self
            .lexicon
            .lookup_translations(&primary)
            .into_iter()
            .next()
            .unwrap_or_default();
        let op = AddAnnotation::new(parent, slot, prefill);
        let id = op.id;
        self.execute_quiet(Box::new(op)).map(|_| id)
    }

    /// Replace the text of a word; layout follows the new width.
    pub fn edit_text(&mut self, target: NodeId, text: impl Into<String>) {
        let op = EditText {
            target,
            text: text.into(),
        };
        self.execute_quiet(Box::new(op));
    }

    /// Delete the whole family containing `target`
    pub fn delete_family(&mut self, target: NodeId) {
        self.execute_quiet(Box::new(DeleteFamily { target }));
    }

    /// Delete every currently selected family
    pub fn delete_selected(&mut self) {
        let roots: Vec<NodeId> = self
            .session
            .words
            .roots()
            .filter(|w| w.selected)
            .map(|w| w.id)
            .collect();
        for root in roots {
            self.delete_family(root);
        }
    }

    /// Re-parent an annotation into another empty slot
    pub fn move_annotation(&mut self, child: NodeId, to_parent: NodeId, to_slot: Slot) {
        self.execute_quiet(Box::new(MoveAnnotation {
            child,
            to_parent,
            to_slot,
        }));
    }

    /// Add a baseline to a page
    pub fn add_line(&mut self, page: u32, y: f32) -> LineId {
        let op = AddLine::new(page, y);
        let id = op.id;
        self.execute_quiet(Box::new(op));
        id
    }

    /// Delete an empty baseline. `LineNotEmpty` is surfaced so the UI can
    /// warn the user.
    pub fn delete_line(&mut self, id: LineId) -> Result<()> {
        self.execute(Box::new(DeleteLine { id }))
    }

    /// The word whose rendered box contains `at`, for pointer hit testing
    pub fn word_at(&self, page: u32, at: Point) -> Option<NodeId> {
        self.session
            .words
            .words()
            .filter(|w| w.page == page)
            .find(|w| {
                let size = self.layout.measure_or_default(self.geometry.as_ref(), w.id);
                Rect::new(w.x, w.y, size.width, size.height).contains(at)
            })
            .map(|w| w.id)
    }

    /// Whether a word currently overflows its page's right margin
    pub fn exceeds_margin(&self, id: NodeId) -> bool {
        would_exceed_margin(
            &self.session,
            self.geometry.as_ref(),
            &self.layout,
            self.pages.as_ref(),
            id,
        )
    }

    /// Mark "document saved"
    pub fn checkpoint(&mut self) {
        let _ = self.execute(Box::new(Checkpoint));
    }

    /// Undo the most recent operation; a no-op on an empty stack
    pub fn undo(&mut self) {
        let Some(inverse) = self.history.pop_undo() else {
            return;
        };
        let ctx = OpContext {
            geometry: self.geometry.as_ref(),
            metrics: &self.metrics,
            layout: &self.layout,
            snap: &self.snap,
        };
        if let Err(err) = inverse.apply(&mut self.session, &ctx) {
            tracing::warn!(%err, "undo failed; document left unchanged");
        }
    }

    /// Redo the most recently undone operation; a no-op on an empty stack
    pub fn redo(&mut self) {
        let Some(op) = self.history.pop_redo() else {
            return;
        };
        let ctx = OpContext {
            geometry: self.geometry.as_ref(),
            metrics: &self.metrics,
            layout: &self.layout,
            snap: &self.snap,
        };
        match op.apply(&mut self.session, &ctx) {
            Ok(inverse) => self.history.push_redone(op, inverse),
            Err(err) => tracing::warn!(%err, "redo failed; document left unchanged"),
        }
    }

    // =========================================================================
    // Pointer gestures
    // =========================================================================

    /// Begin dragging the family containing `target`.
    ///
    /// An already-live drag means the previous gesture never received its
    /// terminal event; it is reconciled here before the new one starts.
    pub fn on_pointer_down(&mut self, target: NodeId, at: Point, constrained_modifier: bool) {
        if self.drag.is_some() {
            tracing::debug!("reconciling interrupted drag");
            self.finish_drag();
        }
        let Some(root) = self.session.words.root_of(target) else {
            return;
        };
        let Some(word) = self.session.words.get(root) else {
            return;
        };
        let constrained = constrained_modifier || word.is_constrained();
        let state = DragState {
            root,
            page: word.page,
            grab: Point::new(at.x - word.x, at.y - word.y),
            start: Point::new(word.x, word.y),
            start_line: word.line,
            last_valid: Point::new(word.x, word.y),
            constrained,
            moved: false,
        };
        self.session.words.deselect_all();
        self.session.words.select_family(root);
        self.session.words.select_individual(target);
        self.drag = Some(state);
    }

    /// Track a pointer move during a drag.
    ///
    /// Constrained mode clamps the proposal to the page margins and rejects
    /// it entirely when another family's bounds would be overlapped.
    pub fn on_pointer_move(&mut self, at: Point) {
        let Some(mut drag) = self.drag else {
            return;
        };
        let mut proposed = Point::new(at.x - drag.grab.x, at.y - drag.grab.y);

        if drag.constrained {
            let Some(bounds) = family_bounds_at(
                &self.session,
                self.geometry.as_ref(),
                &self.layout,
                drag.root,
                proposed,
            ) else {
                return;
            };
            let margins = self.pages.margins(drag.page);
            let clamped = bounds.clamped_origin_within(&margins);
            proposed = Point::new(
                proposed.x + (clamped.x - bounds.x),
                proposed.y + (clamped.y - bounds.y),
            );
            let clamped_bounds = Rect::new(clamped.x, clamped.y, bounds.width, bounds.height);
            if let Some(blocker) = check_collision(
                &self.session,
                self.geometry.as_ref(),
                &self.layout,
                drag.root,
                clamped_bounds,
                drag.page,
            ) {
                tracing::debug!(%blocker, "constrained move blocked");
                return;
            }
        }

        if let Some(word) = self.session.words.get_mut(drag.root) {
            word.x = proposed.x;
            word.y = proposed.y;
        } else {
            // Family vanished mid-drag; drop the gesture.
            self.drag = None;
            return;
        }
        propagate(
            &mut self.session,
            self.geometry.as_ref(),
            &self.metrics,
            &self.layout,
            drag.root,
        );

        match propose_snap(
            &self.session,
            self.geometry.as_ref(),
            &self.metrics,
            &self.layout,
            &self.snap,
            drag.root,
            drag.page,
        ) {
            Some(line) => apply_snap(
                &mut self.session,
                self.geometry.as_ref(),
                &self.metrics,
                &self.layout,
                &self.snap,
                drag.root,
                line,
            ),
            None => {
                if self.session.words.get(drag.root).and_then(|w| w.line).is_some() {
                    release_snap(
                        &mut self.session,
                        self.geometry.as_ref(),
                        &self.metrics,
                        &self.layout,
                        drag.root,
                    );
                }
            }
        }

        if let Some(word) = self.session.words.get(drag.root) {
            drag.last_valid = Point::new(word.x, word.y);
            drag.moved = true;
        }
        self.drag = Some(drag);
    }

    /// End a drag, recording one move operation if anything changed
    pub fn on_pointer_up(&mut self, at: Point) {
        if self.drag.is_none() {
            return;
        }
        self.on_pointer_move(at);
        self.finish_drag();
    }

    /// Abandon a drag at its last valid position (e.g. pointer left the
    /// surface without a terminal up event)
    pub fn on_pointer_cancel(&mut self) {
        self.finish_drag();
    }

    fn finish_drag(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let Some(word) = self.session.words.get(drag.root) else {
            return;
        };
        let end = Point::new(word.x, word.y);
        let end_line = word.line;
        if !drag.moved || (end == drag.start && end_line == drag.start_line) {
            return;
        }
        let op = MoveWord {
            root: drag.root,
            from: (drag.start.x, drag.start.y),
            to: (end.x, end.y),
            from_line: drag.start_line,
            to_line: end_line,
        };
        // The document already holds the drag's end state; record without
        // re-applying.
        let inverse = Box::new(op.reversed());
        self.history.push(Box::new(op), inverse);
        tracing::debug!(root = %drag.root, "drag recorded");
    }

    // =========================================================================
    // Keyboard navigation
    // =========================================================================

    /// Move the individual selection along the chain or across families.
    ///
    /// Vertical keys walk the chain, stamping the navigation-memory flags
    /// on the box being entered. Horizontal keys jump to the neighboring
    /// family on the page and resume at the box last visited there.
    pub fn on_key_down(&mut self, key: NavKey) {
        let Some(current) = self
            .session
            .words
            .words()
            .find(|w| w.individually_selected && w.selected)
            .map(|w| w.id)
        else {
            return;
        };
        match key {
            NavKey::Up | NavKey::Down => self.navigate_vertical(current, key),
            NavKey::Left | NavKey::Right => self.navigate_horizontal(current, key),
        }
    }

    fn navigate_vertical(&mut self, current: NodeId, key: NavKey) {
        let Some(word) = self.session.words.get(current) else {
            return;
        };
        let parent_slot = word.parent.and_then(|p| {
            self.session
                .words
                .get(p)
                .and_then(|parent| parent.slot_of(current))
        });
        // The parent is visually above a bottom child and below a top child.
        let target = match key {
            NavKey::Up if parent_slot == Some(Slot::Bottom) => word.parent,
            NavKey::Up => word.child_top,
            NavKey::Down if parent_slot == Some(Slot::Top) => word.parent,
            NavKey::Down => word.child_bottom,
            _ => None,
        };
        let Some(target) = target else {
            return;
        };
        if let Some(t) = self.session.words.get_mut(target) {
            t.last_entered_from_bottom = key == NavKey::Up;
            t.last_entered_from_top = key == NavKey::Down;
        }
        self.session.words.select_individual(target);
    }

    fn navigate_horizontal(&mut self, current: NodeId, key: NavKey) {
        let Some(root) = self.session.words.root_of(current) else {
            return;
        };
        let Some(anchor) = self.session.words.get(root) else {
            return;
        };
        let (page, x) = (anchor.page, anchor.x);

        let mut candidates: Vec<(f32, NodeId)> = self
            .session
            .words
            .roots_on_page(page)
            .filter(|w| w.id != root)
            .filter(|w| match key {
                NavKey::Right => w.x > x,
                _ => w.x < x,
            })
            .map(|w| (w.x, w.id))
            .collect();
        candidates.sort_by(|(a, _), (b, _)| a.total_cmp(b));
        let next_root = match key {
            NavKey::Right => candidates.first().map(|(_, id)| *id),
            _ => candidates.last().map(|(_, id)| *id),
        };
        let Some(next_root) = next_root else {
            return;
        };

        // Resume at the box last visited in the target family; deselection
        // keeps that memory, so re-entry lands where the user left off.
        let resume = self
            .session
            .words
            .family(next_root)
            .into_iter()
            .find(|id| {
                self.session
                    .words
                    .get(*id)
                    .is_some_and(|w| w.individually_selected)
            })
            .unwrap_or(next_root);

        self.session.words.deselect_all();
        self.session.words.select_family(next_root);
        self.session.words.select_individual(resume);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn execute(&mut self, op: Box<dyn HistoryOp>) -> Result<()> {
        let ctx = OpContext {
            geometry: self.geometry.as_ref(),
            metrics: &self.metrics,
            layout: &self.layout,
            snap: &self.snap,
        };
        let inverse = op.apply(&mut self.session, &ctx)?;
        self.history.push(op, inverse);
        Ok(())
    }

    /// Execute, treating rejection (vanished id, occupied slot) as a quiet
    /// no-op per the error policy.
    fn execute_quiet(&mut self, op: Box<dyn HistoryOp>) -> Option<()> {
        match self.execute(op) {
            Ok(()) => Some(()),
            Err(err) => {
                tracing::debug!(%err, "gesture rejected");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout_engine::{HeadlessGeometry, Size, UniformPages};
    use word_model::EmptyLexicon;

    #[derive(Debug)]
    struct FixedLexicon(Vec<String>);

    impl LexiconStore for FixedLexicon {
        fn lookup_translations(&self, _primary: &str) -> Vec<String> {
            self.0.clone()
        }
    }

    fn engine() -> EditorEngine {
        EditorEngine::new(
            Box::new(HeadlessGeometry::new(Size::new(60.0, 24.0))),
            Box::new(UniformPages::default()),
            Box::new(EmptyLexicon),
        )
    }

    #[test]
    fn annotation_is_placed_below_its_parent() {
        let mut e = engine();
        let root = e.add_word(1, Point::new(100.0, 100.0), "logos", WordFlags::default());
        let below = e.add_annotation(root, Slot::Bottom).unwrap();
        let above = e.add_annotation(root, Slot::Top).unwrap();

        let b = e.session().words.get(below).unwrap();
        assert_eq!(b.x, 100.0);
        assert_eq!(b.y, 100.0 + 24.0 + 7.5);
        assert_eq!(b.page, 1);

        let a = e.session().words.get(above).unwrap();
        assert_eq!(a.y, 100.0 - 7.0 - 7.5);
    }

    #[test]
    fn occupied_slot_is_a_quiet_no_op() {
        let mut e = engine();
        let root = e.add_word(1, Point::new(100.0, 100.0), "logos", WordFlags::default());
        assert!(e.add_annotation(root, Slot::Bottom).is_some());
        assert!(e.add_annotation(root, Slot::Bottom).is_none());
        assert_eq!(e.session().words.len(), 2);
    }

    #[test]
    fn delete_family_then_undo_then_redo_round_trips() {
        let mut e = engine();
        let root = e.add_word(1, Point::new(100.0, 100.0), "logos", WordFlags::default());
        e.add_annotation(root, Slot::Bottom).unwrap();
        let populated = e.session().clone();

        e.delete_family(root);
        assert!(e.session().words.is_empty());
        let emptied = e.session().clone();

        e.undo();
        assert_eq!(e.session(), &populated);
        e.redo();
        assert_eq!(e.session(), &emptied);
        e.undo();
        assert_eq!(e.session(), &populated);
    }

    #[test]
    fn undo_and_redo_on_empty_stacks_change_nothing() {
        let mut e = engine();
        e.add_word(1, Point::new(100.0, 100.0), "w", WordFlags::default());
        let before = e.session().clone();

        e.redo();
        assert_eq!(e.session(), &before);
        e.undo();
        e.undo();
        e.undo();
        assert!(e.session().words.is_empty());
        e.redo();
        assert_eq!(e.session(), &before);
    }

    #[test]
    fn checkpoint_tracks_unsaved_changes() {
        let mut e = engine();
        assert!(!e.has_unsaved_changes());

        e.add_word(1, Point::new(100.0, 100.0), "w", WordFlags::default());
        assert!(e.has_unsaved_changes());

        e.checkpoint();
        assert!(!e.has_unsaved_changes());

        // Undoing past the checkpoint makes the document dirty again.
        e.undo();
        assert!(e.has_unsaved_changes());
        e.redo();
        assert!(!e.has_unsaved_changes());

        // An edit above the checkpoint is dirty; undoing it is clean.
        let root = e.session().words.words().next().map(|w| w.id).unwrap();
        e.edit_text(root, "edited");
        assert!(e.has_unsaved_changes());
        e.undo();
        assert!(!e.has_unsaved_changes());
    }

    #[test]
    fn added_word_snaps_to_a_nearby_line_and_redo_replays_it() {
        let mut e = engine();
        let line = e.add_line(1, 300.0);
        // Line center 292; a box dropped at y=280 has center 292, so it
        // snaps to y = 292 - 12 + 11 - 16.
        let root = e.add_word(1, Point::new(100.0, 280.0), "w", WordFlags::default());

        let snapped_y = 292.0 - 12.0 + 11.0 - 16.0;
        let w = e.session().words.get(root).unwrap();
        assert_eq!(w.y, snapped_y);
        assert_eq!(w.line, Some(line));
        let after = e.session().clone();

        e.undo();
        assert!(e.session().lines.line(line).unwrap().is_empty());
        e.redo();
        assert_eq!(e.session(), &after);
    }

    #[test]
    fn drag_records_exactly_one_move_with_its_line_change() {
        let mut e = engine();
        let line = e.add_line(1, 300.0);
        let root = e.add_word(1, Point::new(100.0, 100.0), "w", WordFlags::default());

        e.on_pointer_down(root, Point::new(100.0, 100.0), false);
        e.on_pointer_move(Point::new(100.0, 150.0));
        e.on_pointer_move(Point::new(100.0, 220.0));
        e.on_pointer_up(Point::new(100.0, 280.0));

        let w = e.session().words.get(root).unwrap();
        assert_eq!(w.line, Some(line));
        assert_eq!(w.y, 292.0 - 12.0 + 11.0 - 16.0);
        let end = e.session().clone();

        // Intermediate moves collapsed into a single recorded operation.
        e.undo();
        let w = e.session().words.get(root).unwrap();
        assert_eq!((w.x, w.y, w.line), (100.0, 100.0, None));
        assert!(e.session().lines.line(line).unwrap().is_empty());

        e.redo();
        assert_eq!(e.session(), &end);
    }

    #[test]
    fn drag_that_goes_nowhere_records_nothing() {
        let mut e = engine();
        let root = e.add_word(1, Point::new(100.0, 100.0), "w", WordFlags::default());
        let undo_available_before = e.can_undo();

        e.on_pointer_down(root, Point::new(110.0, 110.0), false);
        e.on_pointer_up(Point::new(110.0, 110.0));

        assert_eq!(e.can_undo(), undo_available_before);
        let w = e.session().words.get(root).unwrap();
        assert_eq!((w.x, w.y), (100.0, 100.0));
    }

    #[test]
    fn constrained_drag_rejects_overlapping_positions() {
        let mut e = engine();
        let mover = e.add_word(1, Point::new(100.0, 100.0), "a", WordFlags::default());
        e.add_word(1, Point::new(200.0, 100.0), "b", WordFlags::default());

        e.on_pointer_down(mover, Point::new(110.0, 110.0), true);

        // Proposal lands inside the other family: rejected, box stays put.
        e.on_pointer_move(Point::new(205.0, 110.0));
        let w = e.session().words.get(mover).unwrap();
        assert_eq!((w.x, w.y), (100.0, 100.0));

        // A clear proposal is accepted.
        e.on_pointer_move(Point::new(140.0, 110.0));
        let w = e.session().words.get(mover).unwrap();
        assert_eq!((w.x, w.y), (130.0, 100.0));

        e.on_pointer_up(Point::new(140.0, 110.0));
        e.undo();
        let w = e.session().words.get(mover).unwrap();
        assert_eq!((w.x, w.y), (100.0, 100.0));
    }

    #[test]
    fn constrained_drag_clamps_to_the_page_margins() {
        let mut e = engine();
        let root = e.add_word(1, Point::new(100.0, 100.0), "a", WordFlags::default());

        e.on_pointer_down(root, Point::new(100.0, 100.0), true);
        e.on_pointer_move(Point::new(-500.0, -500.0));

        // Default pages inset content by 48 on every side.
        let w = e.session().words.get(root).unwrap();
        assert_eq!((w.x, w.y), (48.0, 48.0));
    }

    #[test]
    fn interrupted_drag_is_reconciled_on_the_next_press() {
        let mut e = engine();
        let a = e.add_word(1, Point::new(100.0, 100.0), "a", WordFlags::default());
        let b = e.add_word(1, Point::new(400.0, 100.0), "b", WordFlags::default());

        e.on_pointer_down(a, Point::new(100.0, 100.0), false);
        e.on_pointer_move(Point::new(100.0, 200.0));
        // No pointer-up arrives; the next press closes out the first drag.
        e.on_pointer_down(b, Point::new(400.0, 100.0), false);
        e.on_pointer_up(Point::new(400.0, 100.0));

        let w = e.session().words.get(a).unwrap();
        assert_eq!((w.x, w.y), (100.0, 200.0));
        e.undo();
        let w = e.session().words.get(a).unwrap();
        assert_eq!((w.x, w.y), (100.0, 100.0));
    }

    #[test]
    fn annotation_text_is_prefilled_from_the_lexicon() {
        let mut e = EditorEngine::new(
            Box::new(HeadlessGeometry::new(Size::new(60.0, 24.0))),
            Box::new(UniformPages::default()),
            Box::new(FixedLexicon(vec!["word".into(), "speech".into()])),
        );
        let root = e.add_word(1, Point::new(100.0, 100.0), "logos", WordFlags::default());
        let child = e.add_annotation(root, Slot::Bottom).unwrap();
        assert_eq!(e.session().words.get(child).unwrap().text, "word");
    }

    #[test]
    fn deleting_a_populated_line_is_rejected() {
        let mut e = engine();
        let line = e.add_line(1, 300.0);
        e.add_word(1, Point::new(100.0, 280.0), "w", WordFlags::default());

        assert!(e.delete_line(line).is_err());
        assert!(e.session().lines.contains(line));

        let empty = e.add_line(1, 600.0);
        e.delete_line(empty).unwrap();
        assert!(!e.session().lines.contains(empty));
        e.undo();
        assert!(e.session().lines.contains(empty));
    }

    #[test]
    fn edit_text_undo_restores_the_prior_text() {
        let mut e = engine();
        let root = e.add_word(1, Point::new(100.0, 100.0), "logos", WordFlags::default());
        e.edit_text(root, "nomos");
        assert_eq!(e.session().words.get(root).unwrap().text, "nomos");
        e.undo();
        assert_eq!(e.session().words.get(root).unwrap().text, "logos");
        e.redo();
        assert_eq!(e.session().words.get(root).unwrap().text, "nomos");
    }

    #[test]
    fn vertical_navigation_walks_the_chain() {
        let mut e = engine();
        let root = e.add_word(1, Point::new(100.0, 100.0), "logos", WordFlags::default());
        let above = e.add_annotation(root, Slot::Top).unwrap();
        let below = e.add_annotation(root, Slot::Bottom).unwrap();

        e.on_pointer_down(root, Point::new(100.0, 100.0), false);
        e.on_pointer_cancel();

        e.on_key_down(NavKey::Up);
        assert!(e.session().words.get(above).unwrap().individually_selected);
        assert!(e.session().words.get(above).unwrap().last_entered_from_bottom);

        e.on_key_down(NavKey::Down);
        assert!(e.session().words.get(root).unwrap().individually_selected);

        e.on_key_down(NavKey::Down);
        assert!(e.session().words.get(below).unwrap().individually_selected);
        assert!(e.session().words.get(below).unwrap().last_entered_from_top);

        // Past the end of the chain the selection stays put.
        e.on_key_down(NavKey::Down);
        assert!(e.session().words.get(below).unwrap().individually_selected);
    }

    #[test]
    fn horizontal_navigation_jumps_between_families() {
        let mut e = engine();
        let left = e.add_word(1, Point::new(100.0, 100.0), "a", WordFlags::default());
        let right = e.add_word(1, Point::new(300.0, 100.0), "b", WordFlags::default());

        e.on_pointer_down(left, Point::new(100.0, 100.0), false);
        e.on_pointer_cancel();

        e.on_key_down(NavKey::Right);
        assert!(e.session().words.get(right).unwrap().individually_selected);
        assert!(e.session().words.get(right).unwrap().selected);

        e.on_key_down(NavKey::Left);
        assert!(e.session().words.get(left).unwrap().individually_selected);

        // No family further left; nothing changes.
        e.on_key_down(NavKey::Left);
        assert!(e.session().words.get(left).unwrap().individually_selected);
    }

    #[test]
    fn horizontal_navigation_resumes_at_the_last_visited_box() {
        let mut e = engine();
        let a = e.add_word(1, Point::new(100.0, 100.0), "a", WordFlags::default());
        let below = e.add_annotation(a, Slot::Bottom).unwrap();
        let b = e.add_word(1, Point::new(300.0, 100.0), "b", WordFlags::default());

        // Visit a's bottom annotation, hop to the neighbor and back.
        e.on_pointer_down(below, Point::new(110.0, 140.0), false);
        e.on_pointer_cancel();

        e.on_key_down(NavKey::Right);
        assert!(e.session().words.get(b).unwrap().individually_selected);
        assert!(!e.session().words.get(a).unwrap().selected);

        e.on_key_down(NavKey::Left);
        let resumed = e.session().words.get(below).unwrap();
        assert!(resumed.selected);
        assert!(resumed.individually_selected);
        assert!(!e.session().words.get(a).unwrap().individually_selected);
    }

    #[test]
    fn pointer_hit_testing_finds_the_word_under_the_cursor() {
        let mut e = engine();
        let root = e.add_word(1, Point::new(100.0, 100.0), "w", WordFlags::default());
        let below = e.add_annotation(root, Slot::Bottom).unwrap();

        assert_eq!(e.word_at(1, Point::new(110.0, 110.0)), Some(root));
        assert_eq!(e.word_at(1, Point::new(110.0, 140.0)), Some(below));
        assert_eq!(e.word_at(1, Point::new(500.0, 500.0)), None);
        assert_eq!(e.word_at(2, Point::new(110.0, 110.0)), None);
    }

    #[test]
    fn delete_selected_removes_every_selected_family() {
        let mut e = engine();
        let a = e.add_word(1, Point::new(100.0, 100.0), "a", WordFlags::default());
        e.add_annotation(a, Slot::Bottom).unwrap();
        e.add_word(1, Point::new(300.0, 100.0), "b", WordFlags::default());

        e.on_pointer_down(a, Point::new(100.0, 100.0), false);
        e.on_pointer_cancel();

        e.delete_selected();
        assert_eq!(e.session().words.len(), 1);
        e.undo();
        assert_eq!(e.session().words.len(), 3);
    }

    #[test]
    fn load_session_drops_history_and_drag() {
        let mut e = engine();
        let root = e.add_word(1, Point::new(100.0, 100.0), "w", WordFlags::default());
        e.on_pointer_down(root, Point::new(100.0, 100.0), false);

        e.load_session(DocumentSession::new());
        assert!(e.session().words.is_empty());
        assert!(!e.can_undo());
        assert!(!e.can_redo());

        // Stray pointer events for the old document are ignored.
        e.on_pointer_move(Point::new(200.0, 200.0));
        e.on_pointer_up(Point::new(200.0, 200.0));
        assert!(e.session().words.is_empty());
    }

    #[test]
    fn move_annotation_between_parents_round_trips() {
        let mut e = engine();
        let a = e.add_word(1, Point::new(100.0, 100.0), "a", WordFlags::default());
        let b = e.add_word(1, Point::new(300.0, 100.0), "b", WordFlags::default());
        let child = e.add_annotation(a, Slot::Bottom).unwrap();
        let before = e.session().clone();

        e.move_annotation(child, b, Slot::Top);
        let w = e.session().words.get(child).unwrap();
        assert_eq!(w.parent, Some(b));
        assert_eq!(w.x, 300.0);
        assert_eq!(w.y, 100.0 - 7.0 - 7.5);

        e.undo();
        assert_eq!(e.session(), &before);
    }
}

#[cfg(test)]
mod properties {
    use super::*;
    use layout_engine::{HeadlessGeometry, Size, UniformPages};
    use proptest::prelude::*;
    use word_model::EmptyLexicon;

    #[derive(Debug, Clone)]
    enum Gesture {
        AddWord(u16, u16),
        AddAnnotation(u8, bool),
        EditText(u8),
        DeleteFamily(u8),
        AddLine(u16),
        DeleteLine(u8),
        Checkpoint,
    }

    fn gesture_strategy() -> impl Strategy<Value = Gesture> {
        prop_oneof![
            (0u16..800, 0u16..1000).prop_map(|(x, y)| Gesture::AddWord(x, y)),
            (any::<u8>(), any::<bool>()).prop_map(|(n, top)| Gesture::AddAnnotation(n, top)),
            any::<u8>().prop_map(Gesture::EditText),
            any::<u8>().prop_map(Gesture::DeleteFamily),
            (0u16..1000).prop_map(Gesture::AddLine),
            any::<u8>().prop_map(Gesture::DeleteLine),
            Just(Gesture::Checkpoint),
        ]
    }

    fn nth_word(e: &EditorEngine, n: u8) -> Option<NodeId> {
        let mut ids: Vec<_> = e.session().words.words().map(|w| w.id).collect();
        ids.sort();
        if ids.is_empty() {
            None
        } else {
            Some(ids[n as usize % ids.len()])
        }
    }

    fn nth_line(e: &EditorEngine, n: u8) -> Option<LineId> {
        let mut ids: Vec<_> = e.session().lines.lines().map(|l| l.id).collect();
        ids.sort();
        if ids.is_empty() {
            None
        } else {
            Some(ids[n as usize % ids.len()])
        }
    }

    fn run(e: &mut EditorEngine, gestures: &[Gesture]) {
        for gesture in gestures {
            match *gesture {
                Gesture::AddWord(x, y) => {
                    e.add_word(1, Point::new(x as f32, y as f32), "w", WordFlags::default());
                }
                Gesture::AddAnnotation(n, top) => {
                    if let Some(id) = nth_word(e, n) {
                        let slot = if top { Slot::Top } else { Slot::Bottom };
                        e.add_annotation(id, slot);
                    }
                }
                Gesture::EditText(n) => {
                    if let Some(id) = nth_word(e, n) {
                        e.edit_text(id, "changed");
                    }
                }
                Gesture::DeleteFamily(n) => {
                    if let Some(id) = nth_word(e, n) {
                        e.delete_family(id);
                    }
                }
                Gesture::AddLine(y) => {
                    e.add_line(1, y as f32);
                }
                Gesture::DeleteLine(n) => {
                    if let Some(id) = nth_line(e, n) {
                        let _ = e.delete_line(id);
                    }
                }
                Gesture::Checkpoint => e.checkpoint(),
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        // Undoing every recorded gesture returns to the empty document, and
        // redoing them all lands back on the exact final state.
        #[test]
        fn full_undo_then_full_redo_round_trips(
            gestures in prop::collection::vec(gesture_strategy(), 1..40)
        ) {
            let mut e = EditorEngine::new(
                Box::new(HeadlessGeometry::new(Size::new(60.0, 24.0))),
                Box::new(UniformPages::default()),
                Box::new(EmptyLexicon),
            );
            run(&mut e, &gestures);
            let done = e.session().clone();

            while e.can_undo() {
                e.undo();
            }
            prop_assert!(e.session().words.is_empty());
            prop_assert!(e.session().lines.is_empty());

            while e.can_redo() {
                e.redo();
            }
            prop_assert_eq!(e.session(), &done);
        }
    }
}
