//! Hit Grid - Terminal cell to watch input lookup
//!
//! One cell per terminal position, each holding the input drawn there
//! (or nothing). Filled from a `WatchLayout` after every resize, queried on
//! every mouse press.

use crate::types::{Inputs, WatchButton};

use super::layout::WatchLayout;

/// O(1) coordinate lookup of the input under a cell.
#[derive(Debug, Clone)]
pub struct HitGrid {
    width: u16,
    height: u16,
    cells: Vec<Inputs>,
}

impl HitGrid {
    /// Create an empty grid with the given dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Inputs::empty(); size],
        }
    }

    /// Grid covering a computed layout.
    pub fn from_layout(layout: &WatchLayout) -> Self {
        let mut grid = Self::new(layout.width, layout.height);
        grid.fill_layout(layout);
        grid
    }

    /// Repaint every region of `layout`, resizing to its dimensions first.
    pub fn fill_layout(&mut self, layout: &WatchLayout) {
        if (self.width, self.height) == (layout.width, layout.height) {
            self.clear();
        } else {
            self.resize(layout.width, layout.height);
        }
        for region in layout.regions() {
            self.fill_rect(region.x, region.y, region.width, region.height, region.input);
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resize the grid, clearing all contents.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let size = width as usize * height as usize;
        self.cells.resize(size, Inputs::empty());
        self.clear();
    }

    pub fn clear(&mut self) {
        self.cells.fill(Inputs::empty());
    }

    /// Fill a rectangle, clipped to the grid.
    pub fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16, input: Inputs) {
        for dy in 0..height {
            let cy = y.saturating_add(dy);
            if cy >= self.height {
                break;
            }
            for dx in 0..width {
                let cx = x.saturating_add(dx);
                if cx >= self.width {
                    break;
                }
                let idx = cy as usize * self.width as usize + cx as usize;
                if let Some(cell) = self.cells.get_mut(idx) {
                    *cell = input;
                }
            }
        }
    }

    /// The input drawn at a position.
    pub fn get(&self, x: u16, y: u16) -> Inputs {
        if x >= self.width || y >= self.height {
            return Inputs::empty();
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.cells.get(idx).copied().unwrap_or(Inputs::empty())
    }

    /// The button under a position.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<WatchButton> {
        self.get(x, y).button()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::layout::{compute_watch_layout, WatchMetrics};

    #[test]
    fn test_fill_and_get() {
        let mut grid = HitGrid::new(10, 5);
        grid.fill_rect(2, 1, 3, 2, Inputs::LEFT);

        assert_eq!(grid.get(2, 1), Inputs::LEFT);
        assert_eq!(grid.get(4, 2), Inputs::LEFT);
        assert_eq!(grid.get(5, 2), Inputs::empty());
        assert_eq!(grid.hit_test(3, 1), Some(WatchButton::Left));
        assert_eq!(grid.hit_test(0, 0), None);
    }

    #[test]
    fn test_out_of_bounds_is_empty() {
        let mut grid = HitGrid::new(4, 4);
        grid.fill_rect(2, 2, 10, 10, Inputs::FACE);
        assert_eq!(grid.get(3, 3), Inputs::FACE);
        assert_eq!(grid.get(4, 3), Inputs::empty());
        assert_eq!(grid.get(100, 100), Inputs::empty());
    }

    #[test]
    fn test_resize_clears() {
        let mut grid = HitGrid::new(4, 4);
        grid.fill_rect(0, 0, 4, 4, Inputs::TOP);
        grid.resize(6, 2);
        assert_eq!((grid.width(), grid.height()), (6, 2));
        assert_eq!(grid.get(0, 0), Inputs::empty());
    }

    #[test]
    fn test_fill_layout_follows_a_new_size() {
        let small = compute_watch_layout(80, 24, &WatchMetrics::default()).unwrap();
        let large = compute_watch_layout(120, 40, &WatchMetrics::default()).unwrap();
        let mut grid = HitGrid::from_layout(&small);

        grid.fill_layout(&large);

        assert_eq!((grid.width(), grid.height()), (120, 40));
        let old_face = small.face;
        let new_face = large.face;
        assert_ne!((old_face.x, old_face.y), (new_face.x, new_face.y));
        assert_eq!(grid.hit_test(new_face.x, new_face.y), Some(WatchButton::Face));
        assert_eq!(grid.hit_test(old_face.x, old_face.y), None);
    }

    #[test]
    fn test_from_layout_maps_every_button() {
        let layout = compute_watch_layout(80, 24, &WatchMetrics::default()).unwrap();
        let grid = HitGrid::from_layout(&layout);

        for button in WatchButton::ALL {
            let region = layout.region(button);
            assert_eq!(grid.hit_test(region.x, region.y), Some(button));
            assert_eq!(
                grid.hit_test(region.x + region.width - 1, region.y + region.height - 1),
                Some(button)
            );
        }
        assert_eq!(grid.hit_test(0, 0), None);
    }
}
