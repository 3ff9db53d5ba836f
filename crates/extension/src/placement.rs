use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    pub pos: [f64; 2],
    pub size: [f64; 2],
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PlacementOptions {
    pub side: Side,
    /// Whether the host should select the new node
    pub select: bool,
    /// Horizontal gap between the two nodes
    pub offset: f64,
    pub shift_y: f64,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            side: Side::Left,
            select: true,
            offset: 0.0,
            shift_y: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePlacement {
    pub pos: [f64; 2],
    pub select: bool,
}

/// Position for a node of `size` placed beside `anchor`
pub fn place_next_to(anchor: &Bounds, size: [f64; 2], options: &PlacementOptions) -> NodePlacement {
    let x = match options.side {
        Side::Left => anchor.pos[0] - (size[0] + options.offset),
        Side::Right => anchor.pos[0] + anchor.size[0] + options.offset,
    };
    NodePlacement {
        pos: [x, anchor.pos[1] + options.shift_y],
        select: options.select,
    }
}
