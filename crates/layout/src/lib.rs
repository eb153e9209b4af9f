//! Board Layout: pure, deterministic placement of tiles and piece placeholders.
//!
//! # Invariants
//! - Tile shade is a function of `(column + row)` parity only.
//! - The board is centred on the world origin in the XZ plane.
//! - Generation is idempotent: identical specs yield identical layouts.

pub mod board;
pub mod pieces;

pub use board::{
    BOARD_DIMENSION, BoardLayout, BoardSpec, LayoutError, MAX_BOARD_DIMENSION, TileDescriptor,
    TileShade,
};
pub use pieces::{MAX_RADIAL_SEGMENTS, PieceShape, PiecePlaceholder, Side, sample_placeholders};

pub fn crate_info() -> &'static str {
    "chessboard-layout v0.1.0"
}
