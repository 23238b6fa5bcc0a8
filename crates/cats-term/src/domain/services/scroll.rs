/// Vertical scroll offset over `length` lines seen through a `viewport` of
/// lines. The offset never passes the last full page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scroll {
    position: usize,
    length: usize,
    viewport: usize,
}

impl Scroll {
    pub fn set_state(&mut self, length: usize, viewport: usize) {
        self.length = length;
        self.viewport = viewport;
        self.position = self.position.min(self.max());
    }

    fn max(&self) -> usize {
        return self.length.saturating_sub(self.viewport);
    }

    pub fn position(&self) -> usize {
        return self.position;
    }

    pub fn up(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    pub fn down(&mut self) {
        self.position = (self.position + 1).min(self.max());
    }

    pub fn up_page(&mut self) {
        self.position = self.position.saturating_sub(self.viewport.max(1));
    }

    pub fn down_page(&mut self) {
        self.position = (self.position + self.viewport.max(1)).min(self.max());
    }

    pub fn first(&mut self) {
        self.position = 0;
    }

    pub fn last(&mut self) {
        self.position = self.max();
    }

    pub fn is_position_at_last(&self) -> bool {
        return self.position == self.max();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_to_last_page() {
        let mut scroll = Scroll::default();
        scroll.set_state(10, 4);
        scroll.down_page();
        scroll.down_page();
        assert_eq!(scroll.position(), 6);
        assert!(scroll.is_position_at_last());

        scroll.up_page();
        scroll.up();
        assert_eq!(scroll.position(), 1);

        scroll.set_state(3, 4);
        assert_eq!(scroll.position(), 0);
        scroll.down();
        assert_eq!(scroll.position(), 0);
    }
}
