//! Pure projection of board state onto renderable tile visuals

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::layout::Layout;

/// One tile as the render surface should draw it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileVisual {
    pub slot: usize,
    /// Background offset into the full-board-sized image
    pub source_offset_x: i64,
    pub source_offset_y: i64,
    pub size: u32,
    /// Top-left corner of the slot inside the board, padding included
    pub x: u32,
    pub y: u32,
    pub label: String,
}

/// The whole board, ready for a render surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardVisual {
    pub grid_size: usize,
    pub tile_size: u32,
    pub board_width: u32,
    pub board_height: u32,
    pub gap: u32,
    pub padding: u32,
    pub image_src: String,
    pub tiles: Vec<TileVisual>,
}

/// Project the board through the layout. Returns `None` when the layout has
/// no drawable tile size or a slot position does not fit in pixels.
pub fn project(
    board: &Board,
    layout: &Layout,
    gap: u32,
    padding: u32,
    image_src: &str,
) -> Option<BoardVisual> {
    if !layout.is_renderable() {
        return None;
    }
    let size = layout.tile_size;
    let inset = padding / 2;
    let stride = size.checked_add(gap)?;
    let offset = |index: usize| {
        u32::try_from(index)
            .ok()
            .and_then(|i| i.checked_mul(stride))
            .and_then(|px| px.checked_add(inset))
    };

    let tiles = board
        .tiles()
        .iter()
        .enumerate()
        .map(|(slot, tile)| {
            let (row, col) = board.slot_position(slot);
            Some(TileVisual {
                slot,
                source_offset_x: -(tile.correct_col() as i64) * i64::from(size),
                source_offset_y: -(tile.correct_row() as i64) * i64::from(size),
                size,
                x: offset(col)?,
                y: offset(row)?,
                label: format!("Puzzle piece {}", slot + 1),
            })
        })
        .collect::<Option<Vec<_>>>()?;

    Some(BoardVisual {
        grid_size: board.grid_size(),
        tile_size: size,
        board_width: layout.board_width,
        board_height: layout.board_height,
        gap,
        padding,
        image_src: image_src.to_string(),
        tiles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Tile;

    fn layout() -> Layout {
        Layout {
            tile_size: 100,
            board_width: 100 * 3 + 4 + 16,
            board_height: 100 * 3 + 4 + 16,
        }
    }

    #[test]
    fn test_offsets_follow_correct_position() {
        let mut board = Board::solved(3).unwrap();
        board.swap(0, 8).unwrap();
        let visual = project(&board, &layout(), 2, 16, "img.png").unwrap();

        assert_eq!(visual.tiles.len(), 9);
        // Slot 0 now holds the bottom-right tile
        assert_eq!(visual.tiles[0].source_offset_x, -200);
        assert_eq!(visual.tiles[0].source_offset_y, -200);
        assert_eq!(visual.tiles[8].source_offset_x, 0);
        assert_eq!(visual.tiles[8].source_offset_y, 0);
        // Slot 5 is untouched: row 1, col 2
        assert_eq!(visual.tiles[5].source_offset_x, -200);
        assert_eq!(visual.tiles[5].source_offset_y, -100);
    }

    #[test]
    fn test_slot_positions_include_gap_and_padding() {
        let board = Board::solved(3).unwrap();
        let visual = project(&board, &layout(), 2, 16, "img.png").unwrap();
        assert_eq!((visual.tiles[0].x, visual.tiles[0].y), (8, 8));
        assert_eq!((visual.tiles[4].x, visual.tiles[4].y), (110, 110));
        assert_eq!((visual.tiles[8].x, visual.tiles[8].y), (212, 212));
        assert_eq!(visual.tiles[2].label, "Puzzle piece 3");
    }

    #[test]
    fn test_projection_is_idempotent() {
        let tiles = vec![Tile::new(1, 1), Tile::new(0, 1), Tile::new(1, 0), Tile::new(0, 0)];
        let board = Board::from_tiles(2, tiles).unwrap();
        let first = project(&board, &layout(), 2, 16, "img.png");
        let second = project(&board, &layout(), 2, 16, "img.png");
        assert_eq!(first, second);
    }

    #[test]
    fn test_unrenderable_layout_projects_nothing() {
        let board = Board::solved(3).unwrap();
        assert_eq!(project(&board, &Layout::EMPTY, 2, 16, "img.png"), None);
    }

    #[test]
    fn test_positions_past_u32_project_nothing() {
        let board = Board::solved(3).unwrap();
        let huge = Layout {
            tile_size: u32::MAX / 2,
            board_width: u32::MAX,
            board_height: u32::MAX,
        };
        assert_eq!(project(&board, &huge, 2, 16, "img.png"), None);
    }
}
