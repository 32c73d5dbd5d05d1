//! Selection/hover state.
//!
//! Single selection and single hover, tracked by node id. Clicking the selected
//! node deselects it. Hover carries the pointer position for tooltip anchoring
//! and is suppressed while the viewport is panning. There is no failure mode:
//! the worst case is "nothing highlighted".

use arbor_layout::viewport::Point;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interaction {
    selected: Option<String>,
    hovered: Option<String>,
    pointer: Option<Point>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Click toggles: selecting the already-selected node clears the selection.
    pub fn click(&mut self, id: &str) {
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        } else {
            self.selected = Some(id.to_string());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Updates hover state. While `panning`, hover is suppressed entirely.
    pub fn hover(&mut self, id: Option<&str>, pointer: Point, panning: bool) {
        if panning {
            self.hovered = None;
            self.pointer = None;
            return;
        }
        self.hovered = id.map(str::to_string);
        self.pointer = id.is_some().then_some(pointer);
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    pub fn is_hovered(&self, id: &str) -> bool {
        self.hovered.as_deref() == Some(id)
    }

    /// Where a tooltip should anchor, when something is hovered.
    pub fn tooltip_anchor(&self) -> Option<Point> {
        self.pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_toggles_selection() {
        let mut state = Interaction::new();
        state.click("a");
        assert!(state.is_selected("a"));
        state.click("b");
        assert!(state.is_selected("b"));
        assert!(!state.is_selected("a"));
        state.click("b");
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn hover_tracks_pointer_until_cleared() {
        let mut state = Interaction::new();
        state.hover(Some("a"), Point::new(10.0, 20.0), false);
        assert!(state.is_hovered("a"));
        assert_eq!(state.tooltip_anchor(), Some(Point::new(10.0, 20.0)));

        state.hover(None, Point::new(0.0, 0.0), false);
        assert_eq!(state.hovered(), None);
        assert_eq!(state.tooltip_anchor(), None);
    }

    #[test]
    fn hover_is_suppressed_while_panning() {
        let mut state = Interaction::new();
        state.hover(Some("a"), Point::new(10.0, 20.0), true);
        assert_eq!(state.hovered(), None);
        assert_eq!(state.tooltip_anchor(), None);
    }
}
