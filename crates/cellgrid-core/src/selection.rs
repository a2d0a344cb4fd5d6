//! Pointer selection, fill and drag-and-drop as one state machine.
//!
//! ```text
//!   Idle --press--> Selecting --enter--> Selecting --release--> Idle (selection kept)
//!   any  --drag_start--> Dragging --drop--> Idle (payload cleared)
//! ```
//!
//! The anchor set by `press` doubles as the focused cell for single-cell editing.
//! The machine never touches the grid; it hands back a [`FillPlan`] or a
//! [`DragPayload`] and the sheet applies the writes.

use cellgrid_engine::engine::CellRef;

/// A pending single-cell copy, held between drag start and drop.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DragPayload {
    pub source: CellRef,
    pub value: String,
}

/// What the pointer is doing right now.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Selecting,
    Dragging(DragPayload),
}

/// Writes produced by releasing a multi-cell selection: every target receives the
/// content of `source`, the last cell added to the selection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FillPlan {
    pub source: CellRef,
    pub targets: Vec<CellRef>,
}

#[derive(Clone, Debug, Default)]
pub struct Selection {
    anchor: Option<CellRef>,
    /// Insertion order, no duplicates.
    cells: Vec<CellRef>,
    gesture: Gesture,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer down on a cell: start a new selection anchored there.
    pub fn press(&mut self, cell_ref: CellRef) {
        self.anchor = Some(cell_ref.clone());
        self.cells = vec![cell_ref];
        self.gesture = Gesture::Selecting;
    }

    /// Pointer entered a cell. Grows the selection while selecting.
    /// Returns whether the cell was added.
    pub fn enter(&mut self, cell_ref: CellRef) -> bool {
        if self.gesture != Gesture::Selecting || self.cells.contains(&cell_ref) {
            return false;
        }
        self.cells.push(cell_ref);
        true
    }

    /// Pointer released. Ends selecting; a selection of more than one cell yields a
    /// fill plan. The selection itself is kept.
    pub fn release(&mut self) -> Option<FillPlan> {
        if self.gesture != Gesture::Selecting {
            return None;
        }
        self.gesture = Gesture::Idle;

        if self.cells.len() < 2 {
            return None;
        }
        let source = self.cells.last()?.clone();
        let targets = self
            .cells
            .iter()
            .filter(|c| **c != source)
            .cloned()
            .collect();
        Some(FillPlan { source, targets })
    }

    /// Begin dragging `value` out of `source`. Replaces any gesture in progress.
    pub fn drag_start(&mut self, source: CellRef, value: String) {
        self.gesture = Gesture::Dragging(DragPayload { source, value });
    }

    /// Drop the dragged payload. Returns it and returns to idle; None when nothing
    /// was being dragged.
    pub fn take_drop(&mut self) -> Option<DragPayload> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Dragging(payload) => Some(payload),
            other => {
                self.gesture = other;
                None
            }
        }
    }

    /// Abandon a drag without copying anything.
    pub fn cancel_drag(&mut self) {
        if matches!(self.gesture, Gesture::Dragging(_)) {
            self.gesture = Gesture::Idle;
        }
    }

    /// Forget everything, including the focused cell.
    pub fn clear(&mut self) {
        *self = Selection::default();
    }

    /// The focused cell (where the current selection began).
    pub fn anchor(&self) -> Option<&CellRef> {
        self.anchor.as_ref()
    }

    pub fn cells(&self) -> &[CellRef] {
        &self.cells
    }

    pub fn contains(&self, cell_ref: &CellRef) -> bool {
        self.cells.contains(cell_ref)
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn drag_payload(&self) -> Option<&DragPayload> {
        match &self.gesture {
            Gesture::Dragging(payload) => Some(payload),
            _ => None,
        }
    }
}
