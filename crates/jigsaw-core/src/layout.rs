//! Board geometry: fit the image into the viewport and derive an integer tile size

use serde::{Deserialize, Serialize};

use crate::config::{GridConfig, VIEWPORT_MARGIN_PX};

/// Drawable area in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Everything the layout depends on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRequest {
    pub image_width: u32,
    pub image_height: u32,
    pub viewport: Size,
    pub grid_size: usize,
    pub gap: u32,
    pub padding: u32,
    pub scale_factor: f64,
}

impl LayoutRequest {
    pub fn new(image_width: u32, image_height: u32, viewport: Size, grid: &GridConfig) -> Self {
        Self {
            image_width,
            image_height,
            viewport,
            grid_size: grid.size,
            gap: grid.gap,
            padding: grid.padding,
            scale_factor: grid.scale_factor,
        }
    }
}

/// Computed board geometry. A zero tile size means nothing can be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Layout {
    pub tile_size: u32,
    pub board_width: u32,
    pub board_height: u32,
}

impl Layout {
    pub const EMPTY: Layout = Layout {
        tile_size: 0,
        board_width: 0,
        board_height: 0,
    };

    pub fn is_renderable(&self) -> bool {
        self.tile_size > 0
    }
}

/// Fit the image into the viewport, overshoot by the scale factor, then snap
/// to an integer square tile size. Board dimensions are rebuilt from the tile
/// size so the grid never drifts from the tiles it holds.
pub fn compute_layout(req: &LayoutRequest) -> Layout {
    if req.grid_size == 0 || req.image_width == 0 || req.image_height == 0 {
        return Layout::EMPTY;
    }

    let grid = req.grid_size as f64;
    let padding = f64::from(req.padding);
    let gap_total = u32::try_from(req.grid_size - 1)
        .map_or(u32::MAX, |gaps| req.gap.saturating_mul(gaps));

    let max_content_width = req.viewport.width - VIEWPORT_MARGIN_PX - padding;
    let max_content_height = req.viewport.height - VIEWPORT_MARGIN_PX - padding;
    if !(max_content_width > 0.0 && max_content_height > 0.0) {
        return Layout::EMPTY;
    }

    let image_ratio = f64::from(req.image_width) / f64::from(req.image_height);
    let container_ratio = max_content_width / max_content_height;

    let (content_width, content_height) = if image_ratio > container_ratio {
        (max_content_width, max_content_width / image_ratio)
    } else {
        (max_content_height * image_ratio, max_content_height)
    };

    let content_width = content_width * req.scale_factor;
    let content_height = content_height * req.scale_factor;

    let gap_total_px = f64::from(gap_total);
    let available = (content_width - gap_total_px).min(content_height - gap_total_px);
    let tile = (available / grid).floor();
    if !tile.is_finite() || tile < 1.0 || tile > f64::from(u32::MAX) {
        return Layout::EMPTY;
    }

    let tile_size = tile as u32;
    // A huge overshoot can produce a board no u32 can hold
    let side = u32::try_from(req.grid_size)
        .ok()
        .and_then(|n| tile_size.checked_mul(n))
        .and_then(|tiles| tiles.checked_add(gap_total))
        .and_then(|side| side.checked_add(req.padding));
    let Some(side) = side else {
        return Layout::EMPTY;
    };
    Layout {
        tile_size,
        board_width: side,
        board_height: side,
    }
}
