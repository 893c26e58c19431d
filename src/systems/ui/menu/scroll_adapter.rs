/// Inclusive index range `[min, max]` of the rows currently drawn.
///
/// Every constructor sizes the window to `min(max_visible, count)` rows, so a
/// list that fits entirely is always spanned from its first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollWindow {
    min: usize,
    max: usize,
}

pub fn visible_rows(count: usize, max_visible: usize) -> usize {
    max_visible.max(1).min(count)
}

impl ScrollWindow {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn top(count: usize, max_visible: usize) -> Self {
        let rows = visible_rows(count, max_visible);
        Self::new(0, rows.saturating_sub(1))
    }

    pub fn bottom(count: usize, max_visible: usize) -> Self {
        let rows = visible_rows(count, max_visible);
        if rows == 0 {
            return Self::default();
        }
        Self::new(count - rows, count - 1)
    }

    /// Window for a cursor jumped straight to `index`: the top window when the
    /// index fits in it, otherwise the window ending at `index`.
    pub fn containing(index: usize, count: usize, max_visible: usize) -> Self {
        let rows = visible_rows(count, max_visible);
        if rows == 0 {
            return Self::default();
        }
        let index = index.min(count - 1);
        if index < rows {
            Self::top(count, max_visible)
        } else {
            Self::new(index + 1 - rows, index)
        }
    }

    /// Keeps this window when it is still well-formed for `count` items and
    /// shows `selected`; otherwise falls back to [`ScrollWindow::containing`].
    pub fn fit(self, selected: usize, count: usize, max_visible: usize) -> Self {
        let rows = visible_rows(count, max_visible);
        if rows == 0 {
            return Self::default();
        }
        if self.len() == rows && self.max < count && self.contains(selected) {
            self
        } else {
            Self::containing(selected, count, max_visible)
        }
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn len(&self) -> usize {
        self.max - self.min + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.min..=self.max).contains(&index)
    }

    pub fn slide_down(&mut self) {
        self.min += 1;
        self.max += 1;
    }

    pub fn slide_up(&mut self) {
        self.min = self.min.saturating_sub(1);
        self.max = self.max.saturating_sub(1).max(self.min);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_spans_short_lists() {
        assert_eq!(ScrollWindow::top(4, 15), ScrollWindow::new(0, 3));
        assert_eq!(ScrollWindow::bottom(4, 15), ScrollWindow::new(0, 3));
        assert_eq!(ScrollWindow::containing(3, 4, 15), ScrollWindow::new(0, 3));
    }

    #[test]
    fn containing_bottom_aligns_deep_indices() {
        assert_eq!(ScrollWindow::containing(14, 20, 15), ScrollWindow::new(0, 14));
        assert_eq!(ScrollWindow::containing(17, 20, 15), ScrollWindow::new(3, 17));
        assert_eq!(ScrollWindow::containing(99, 20, 15), ScrollWindow::new(5, 19));
        assert_eq!(ScrollWindow::bottom(20, 15), ScrollWindow::new(5, 19));
    }

    #[test]
    fn fit_keeps_valid_windows_and_repairs_stale_ones() {
        let window = ScrollWindow::new(3, 17);
        assert_eq!(window.fit(10, 20, 15), window);
        assert_eq!(window.fit(2, 20, 15), ScrollWindow::new(0, 14));
        assert_eq!(window.fit(10, 12, 15), ScrollWindow::new(0, 11));
        assert_eq!(window.fit(0, 0, 15), ScrollWindow::default());
    }

    #[test]
    fn zero_max_visible_still_shows_one_row() {
        assert_eq!(ScrollWindow::containing(5, 10, 0), ScrollWindow::new(5, 5));
        assert_eq!(visible_rows(10, 0), 1);
    }
}
