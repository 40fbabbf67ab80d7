use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorStyle {
    #[default]
    Auto,
    Grab,
    Grabbing,
}

impl CursorStyle {
    pub fn for_state(hovered: bool, dragging: bool) -> Self {
        match (hovered, dragging) {
            (true, true) => CursorStyle::Grabbing,
            (true, false) => CursorStyle::Grab,
            (false, _) => CursorStyle::Auto,
        }
    }

    /// CSS `cursor` value
    pub fn as_css(&self) -> &'static str {
        match self {
            CursorStyle::Auto => "auto",
            CursorStyle::Grab => "grab",
            CursorStyle::Grabbing => "grabbing",
        }
    }
}

/// Remembers the style last handed to the host so only changes are reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorTracker {
    current: CursorStyle,
}

impl CursorTracker {
    pub fn current(&self) -> CursorStyle {
        self.current
    }

    pub fn update(&mut self, hovered: bool, dragging: bool) -> Option<CursorStyle> {
        self.set(CursorStyle::for_state(hovered, dragging))
    }

    pub fn reset(&mut self) -> Option<CursorStyle> {
        self.set(CursorStyle::Auto)
    }

    fn set(&mut self, style: CursorStyle) -> Option<CursorStyle> {
        if style == self.current {
            return None;
        }
        self.current = style;
        Some(style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_table() {
        assert_eq!(CursorStyle::for_state(false, false), CursorStyle::Auto);
        assert_eq!(CursorStyle::for_state(false, true), CursorStyle::Auto);
        assert_eq!(CursorStyle::for_state(true, false), CursorStyle::Grab);
        assert_eq!(CursorStyle::for_state(true, true), CursorStyle::Grabbing);
        assert_eq!(CursorStyle::Grabbing.as_css(), "grabbing");
    }

    #[test]
    fn tracker_reports_changes_only() {
        let mut tracker = CursorTracker::default();
        assert_eq!(tracker.current(), CursorStyle::Auto);
        assert_eq!(tracker.update(false, false), None);
        assert_eq!(tracker.update(true, false), Some(CursorStyle::Grab));
        assert_eq!(tracker.update(true, false), None);
        assert_eq!(tracker.update(true, true), Some(CursorStyle::Grabbing));
        assert_eq!(tracker.current(), CursorStyle::Grabbing);
        assert_eq!(tracker.reset(), Some(CursorStyle::Auto));
        assert_eq!(tracker.reset(), None);
    }
}
