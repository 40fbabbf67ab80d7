use glam::Vec3;

/// Pointer drag on the card.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Grabbed world point minus the card translation at grab time
        offset: Vec3,
        /// Pointer holding the capture
        pointer_id: i32,
    },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    pub fn offset(&self) -> Option<Vec3> {
        match *self {
            DragState::Dragging { offset, .. } => Some(offset),
            DragState::Idle => None,
        }
    }

    pub fn captured_pointer(&self) -> Option<i32> {
        match *self {
            DragState::Dragging { pointer_id, .. } => Some(pointer_id),
            DragState::Idle => None,
        }
    }

    /// Starts a drag. Returns `false` (and changes nothing) if a drag is
    /// already in progress.
    pub fn grab(&mut self, pointer_id: i32, grab_point: Vec3, card_translation: Vec3) -> bool {
        if self.is_dragging() {
            return false;
        }
        *self = DragState::Dragging {
            offset: grab_point - card_translation,
            pointer_id,
        };
        true
    }

    /// Ends the drag held by `pointer_id`. Returns `true` if a capture was
    /// released.
    pub fn release(&mut self, pointer_id: i32) -> bool {
        if self.captured_pointer() == Some(pointer_id) {
            *self = DragState::Idle;
            true
        } else {
            false
        }
    }

    /// Where the card should be commanded to, given the pointer's world point.
    pub fn target(&self, pointer_world: Vec3) -> Option<Vec3> {
        self.offset().map(|offset| pointer_world - offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_grab_minus_card() {
        let mut drag = DragState::default();
        let p = Vec3::new(2.3, 3.1, 0.01);
        let q = Vec3::new(2.0, 4.0, 0.0);
        assert!(drag.grab(1, p, q));
        assert_eq!(drag.offset(), Some(p - q));
        // an unmoved pointer maps back onto the card
        assert!(drag.target(p).unwrap().abs_diff_eq(q, 1e-6));
    }

    #[test]
    fn release_only_for_capturing_pointer() {
        let mut drag = DragState::default();
        drag.grab(7, Vec3::ONE, Vec3::ZERO);
        assert!(!drag.grab(8, Vec3::ZERO, Vec3::ZERO));
        assert!(!drag.release(8));
        assert!(drag.is_dragging());
        assert!(drag.release(7));
        assert_eq!(drag, DragState::Idle);
        assert!(drag.captured_pointer().is_none());
        assert!(drag.target(Vec3::ONE).is_none());
    }
}
