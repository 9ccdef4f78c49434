//src/reorder.rs

/// Moves the element at `from` to `to`, shifting everything in between by
/// one position. Out-of-range indices return the sequence unchanged.
pub fn move_item<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut moved = items.to_vec();
    if from >= moved.len() || to >= moved.len() || from == to {
        return moved;
    }
    let item = moved.remove(from);
    moved.insert(to, item);
    moved
}

/// End of a drag gesture. Ids are the draggable ids (list indices at drag start).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEnd {
    pub active: usize,
    pub over: Option<usize>,
}

impl DragEnd {
    /// `(from, to)` for a drop that changes the order, `None` for a drop
    /// outside the list or back onto the dragged item itself.
    pub fn resolve(&self) -> Option<(usize, usize)> {
        let over = self.over?;
        if over == self.active {
            return None;
        }
        Some((self.active, over))
    }
}

/// Keyboard drag in progress: the grabbed item and the slot it hovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub active: usize,
    pub over: usize,
}

impl DragState {
    pub const fn grab(index: usize) -> Self {
        Self {
            active: index,
            over: index,
        }
    }

    /// Moves the hover slot by `delta`, clamped to the list.
    pub fn hover_by(&mut self, delta: isize, len: usize) {
        if len == 0 {
            return;
        }
        let target = self.over as isize + delta;
        self.over = target.clamp(0, len as isize - 1) as usize;
    }

    pub const fn release(self) -> DragEnd {
        DragEnd {
            active: self.active,
            over: Some(self.over),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_forward_and_back_restores_order() {
        let items = vec!['a', 'b', 'c', 'd', 'e'];
        for from in 0..items.len() {
            for to in 0..items.len() {
                let moved = move_item(&items, from, to);
                assert_eq!(move_item(&moved, to, from), items, "from {from} to {to}");
            }
        }
    }

    #[test]
    fn move_shifts_elements_between() {
        assert_eq!(move_item(&[1, 2, 3, 4], 0, 2), vec![2, 3, 1, 4]);
        assert_eq!(move_item(&[1, 2, 3, 4], 3, 1), vec![1, 4, 2, 3]);
        assert_eq!(move_item(&[1, 2], 0, 5), vec![1, 2]);
    }

    #[test]
    fn drop_on_itself_or_nowhere_is_noop() {
        assert_eq!(DragEnd { active: 1, over: None }.resolve(), None);
        assert_eq!(DragEnd { active: 1, over: Some(1) }.resolve(), None);
        assert_eq!(DragEnd { active: 0, over: Some(1) }.resolve(), Some((0, 1)));
    }

    #[test]
    fn drag_returning_to_origin_resolves_to_noop() {
        let mut drag = DragState::grab(1);
        drag.hover_by(1, 3);
        drag.hover_by(-1, 3);
        assert_eq!(drag.release().resolve(), None);
    }

    #[test]
    fn hover_is_clamped() {
        let mut drag = DragState::grab(0);
        drag.hover_by(-3, 3);
        assert_eq!(drag.over, 0);
        drag.hover_by(10, 3);
        assert_eq!(drag.over, 2);
    }
}
