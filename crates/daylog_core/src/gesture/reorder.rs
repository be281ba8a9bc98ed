//! Drag-to-reorder projection.
//!
//! # Responsibility
//! - Turn a live vertical drag delta into a provisional target index.
//! - Compute per-row visual displacement while the drag is in flight.
//! - Apply the committed move to an ordered working copy.
//!
//! # Invariants
//! - Projection is pure: it never touches storage.
//! - Non-dragged rows are displaced by exactly `0`, `+row_height` or
//!   `-row_height`.
//! - `target` is always a valid index for a non-empty list.

/// Provisional outcome of an in-flight drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Index the drag started from.
    pub dragged: usize,
    /// Index the dragged row would land on if released now.
    pub target: usize,
    /// Live vertical delta of the dragged row since touch start.
    pub delta_y: f32,
    /// Rendered row height captured when the drag was armed.
    pub row_height: f32,
    /// Number of rows the projection was computed for.
    pub len: usize,
}

/// Projects a drag of row `dragged` by `delta_y` over `len` rows.
///
/// Half-row offsets round towards positive infinity, so a drag of exactly
/// half a row downwards already moves one slot.
pub fn project(dragged: usize, delta_y: f32, row_height: f32, len: usize) -> Projection {
    let target = if len == 0 || row_height <= 0.0 || !delta_y.is_finite() {
        dragged
    } else {
        let offset_count = (delta_y / row_height + 0.5).floor() as i64;
        let last = (len - 1) as i64;
        (dragged as i64 + offset_count).clamp(0, last) as usize
    };

    Projection {
        dragged,
        target,
        delta_y,
        row_height,
        len,
    }
}

impl Projection {
    /// Whether releasing now would change the order.
    pub fn moves(&self) -> bool {
        self.dragged != self.target
    }

    /// Visual displacement for `row`.
    ///
    /// The dragged row follows the finger; rows between origin and target
    /// shift one slot to make room.
    pub fn displacement(&self, row: usize) -> f32 {
        let (dragged, target) = (self.dragged, self.target);
        if row == dragged {
            self.delta_y
        } else if row > dragged && row <= target {
            -self.row_height
        } else if row >= target && row < dragged {
            self.row_height
        } else {
            0.0
        }
    }

    /// Displacements for every row, indexed by row position.
    pub fn displacements(&self) -> Vec<f32> {
        (0..self.len).map(|row| self.displacement(row)).collect()
    }
}

/// Moves the element at `from` so that it ends up at index `to`.
///
/// Out-of-range indices leave `items` untouched and return `false`.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    true
}
