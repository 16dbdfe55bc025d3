//! Watch Layout - Taffy flexbox layout of the simulated watch body
//!
//! ```text
//! ┌──────────── body (column) ────────────┐
//! │              [  top  ]                │
//! │ [left]  ┌──── watch face ────┐ [right]│
//! │         │                    │        │
//! │         └────────────────────┘        │
//! │             [ bottom ]                │
//! └───────────────────────────────────────┘
//! ```
//!
//! The body is centered in the terminal. Every region is reported in
//! absolute terminal cells, tagged with the input it stands for.

use taffy::{
    AlignItems, AvailableSpace, Dimension, FlexDirection, JustifyContent, LengthPercentage, NodeId,
    Size, Style, TaffyTree,
};

use crate::error::{Result, ShellError};
use crate::types::{Inputs, WatchButton};

// =============================================================================
// METRICS
// =============================================================================

/// Sizes of the watch parts, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchMetrics {
    pub face_width: u16,
    pub face_height: u16,
    pub side_button_width: u16,
    pub edge_button_width: u16,
    pub edge_button_height: u16,
    pub gap: u16,
}

impl Default for WatchMetrics {
    fn default() -> Self {
        Self {
            face_width: 36,
            face_height: 12,
            side_button_width: 6,
            edge_button_width: 12,
            edge_button_height: 1,
            gap: 1,
        }
    }
}

// =============================================================================
// REGIONS
// =============================================================================

/// A rectangle in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub input: Inputs,
}

/// Computed positions of the watch parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchLayout {
    pub width: u16,
    pub height: u16,
    pub face: Region,
    pub left: Region,
    pub right: Region,
    pub top: Region,
    pub bottom: Region,
}

impl WatchLayout {
    /// Region of one physical button.
    pub fn region(&self, button: WatchButton) -> &Region {
        match button {
            WatchButton::Left => &self.left,
            WatchButton::Right => &self.right,
            WatchButton::Top => &self.top,
            WatchButton::Bottom => &self.bottom,
            WatchButton::Face => &self.face,
        }
    }

    /// All five regions.
    pub fn regions(&self) -> [&Region; 5] {
        [&self.top, &self.left, &self.face, &self.right, &self.bottom]
    }
}

// =============================================================================
// COMPUTE
// =============================================================================

fn cells(n: u16) -> Dimension {
    Dimension::Length(n as f32)
}

fn fixed(width: u16, height: u16) -> Style {
    Style {
        size: Size {
            width: cells(width),
            height: cells(height),
        },
        flex_shrink: 0.0,
        ..Default::default()
    }
}

fn row(gap: u16) -> Style {
    Style {
        flex_direction: FlexDirection::Row,
        justify_content: Some(JustifyContent::Center),
        align_items: Some(AlignItems::Center),
        gap: Size {
            width: LengthPercentage::Length(gap as f32),
            height: LengthPercentage::Length(0.0),
        },
        ..Default::default()
    }
}

struct Nodes {
    root: NodeId,
    body: NodeId,
    top_row: NodeId,
    middle_row: NodeId,
    bottom_row: NodeId,
    top: NodeId,
    left: NodeId,
    face: NodeId,
    right: NodeId,
    bottom: NodeId,
}

fn build_tree(tree: &mut TaffyTree<()>, width: u16, height: u16, m: &WatchMetrics) -> taffy::TaffyResult<Nodes> {
    let top = tree.new_leaf(fixed(m.edge_button_width, m.edge_button_height))?;
    let bottom = tree.new_leaf(fixed(m.edge_button_width, m.edge_button_height))?;
    let left = tree.new_leaf(fixed(m.side_button_width, m.face_height))?;
    let face = tree.new_leaf(fixed(m.face_width, m.face_height))?;
    let right = tree.new_leaf(fixed(m.side_button_width, m.face_height))?;

    let top_row = tree.new_with_children(row(m.gap), &[top])?;
    let middle_row = tree.new_with_children(row(m.gap), &[left, face, right])?;
    let bottom_row = tree.new_with_children(row(m.gap), &[bottom])?;

    let body = tree.new_with_children(
        Style {
            flex_direction: FlexDirection::Column,
            align_items: Some(AlignItems::Center),
            gap: Size {
                width: LengthPercentage::Length(0.0),
                height: LengthPercentage::Length(m.gap as f32),
            },
            flex_shrink: 0.0,
            ..Default::default()
        },
        &[top_row, middle_row, bottom_row],
    )?;

    let root = tree.new_with_children(
        Style {
            size: Size {
                width: cells(width),
                height: cells(height),
            },
            justify_content: Some(JustifyContent::Center),
            align_items: Some(AlignItems::Center),
            ..Default::default()
        },
        &[body],
    )?;

    Ok(Nodes {
        root,
        body,
        top_row,
        middle_row,
        bottom_row,
        top,
        left,
        face,
        right,
        bottom,
    })
}

/// Absolute position of `node`, given the absolute position of its parent.
fn region_at(
    tree: &TaffyTree<()>,
    node: NodeId,
    origin: (f32, f32),
    input: Inputs,
) -> taffy::TaffyResult<(Region, (f32, f32))> {
    let layout = tree.layout(node)?;
    let x = origin.0 + layout.location.x;
    let y = origin.1 + layout.location.y;
    let region = Region {
        x: x.max(0.0) as u16,
        y: y.max(0.0) as u16,
        width: layout.size.width.max(0.0) as u16,
        height: layout.size.height.max(0.0) as u16,
        input,
    };
    Ok((region, (x, y)))
}

fn compute(width: u16, height: u16, metrics: &WatchMetrics) -> taffy::TaffyResult<WatchLayout> {
    let mut tree: TaffyTree<()> = TaffyTree::new();
    let nodes = build_tree(&mut tree, width, height, metrics)?;

    tree.compute_layout(
        nodes.root,
        Size {
            width: AvailableSpace::Definite(width as f32),
            height: AvailableSpace::Definite(height as f32),
        },
    )?;

    let (_, root) = region_at(&tree, nodes.root, (0.0, 0.0), Inputs::empty())?;
    let (_, body) = region_at(&tree, nodes.body, root, Inputs::empty())?;
    let (_, top_row) = region_at(&tree, nodes.top_row, body, Inputs::empty())?;
    let (_, middle_row) = region_at(&tree, nodes.middle_row, body, Inputs::empty())?;
    let (_, bottom_row) = region_at(&tree, nodes.bottom_row, body, Inputs::empty())?;

    Ok(WatchLayout {
        width,
        height,
        top: region_at(&tree, nodes.top, top_row, Inputs::TOP)?.0,
        left: region_at(&tree, nodes.left, middle_row, Inputs::LEFT)?.0,
        face: region_at(&tree, nodes.face, middle_row, Inputs::FACE)?.0,
        right: region_at(&tree, nodes.right, middle_row, Inputs::RIGHT)?.0,
        bottom: region_at(&tree, nodes.bottom, bottom_row, Inputs::BOTTOM)?.0,
    })
}

/// Lay the watch out in a `width` x `height` terminal.
pub fn compute_watch_layout(width: u16, height: u16, metrics: &WatchMetrics) -> Result<WatchLayout> {
    compute(width, height, metrics).map_err(ShellError::Layout)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> WatchLayout {
        compute_watch_layout(80, 24, &WatchMetrics::default()).unwrap()
    }

    #[test]
    fn test_face_is_centered() {
        let l = layout();
        let m = WatchMetrics::default();
        assert_eq!(l.face.width, m.face_width);
        assert_eq!(l.face.height, m.face_height);
        assert_eq!(l.face.x, (80 - m.face_width) / 2);
    }

    #[test]
    fn test_buttons_surround_face() {
        let l = layout();
        assert!(l.left.x + l.left.width <= l.face.x);
        assert!(l.right.x >= l.face.x + l.face.width);
        assert!(l.top.y + l.top.height <= l.face.y);
        assert!(l.bottom.y >= l.face.y + l.face.height);
        assert_eq!(l.left.y, l.face.y);
    }

    #[test]
    fn test_regions_are_tagged() {
        let l = layout();
        for button in WatchButton::ALL {
            assert_eq!(l.region(button).input, button.input());
        }
    }

    #[test]
    fn test_regions_do_not_overlap() {
        let l = layout();
        let regions = l.regions();
        for (i, a) in regions.iter().enumerate() {
            for b in regions.iter().skip(i + 1) {
                let disjoint = a.x + a.width <= b.x
                    || b.x + b.width <= a.x
                    || a.y + a.height <= b.y
                    || b.y + b.height <= a.y;
                assert!(disjoint, "{a:?} overlaps {b:?}");
            }
        }
    }
}
