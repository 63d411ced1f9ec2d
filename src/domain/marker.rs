/// The collectible question mark that gates the doors.

use crate::domain::entity::Pos;

#[derive(Clone, Debug)]
pub struct Marker {
    pub pos: Pos,
    visible: bool,
    collected: bool,
}

impl Marker {
    /// Fresh marker for a level load: hidden and not collected.
    pub fn new(pos: Pos) -> Self {
        Marker { pos, visible: false, collected: false }
    }

    pub fn show(&mut self) {
        if !self.collected {
            self.visible = true;
        }
    }

    #[allow(dead_code)]
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Pick the marker up. It disappears for the rest of the level.
    pub fn collect(&mut self) {
        self.collected = true;
        self.visible = false;
    }

    #[allow(dead_code)]
    pub fn drop(&mut self) {
        self.collected = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_hidden_and_uncollected() {
        let m = Marker::new(Pos::new(17, 18));
        assert!(!m.is_visible());
        assert!(!m.is_collected());
    }

    #[test]
    fn collect_hides() {
        let mut m = Marker::new(Pos::new(17, 18));
        m.show();
        assert!(m.is_visible());
        m.collect();
        assert!(m.is_collected());
        assert!(!m.is_visible());
    }

    #[test]
    fn show_after_collect_keeps_hidden() {
        let mut m = Marker::new(Pos::new(17, 18));
        m.collect();
        m.show();
        assert!(!m.is_visible());
        m.drop();
        m.show();
        assert!(m.is_visible());
    }
}
