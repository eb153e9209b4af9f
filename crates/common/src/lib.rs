//! Shared value types used by every chessboard crate.

mod types;

pub use types::{Color, ColorParseError, Viewport, ViewportParseError};

pub fn crate_info() -> &'static str {
    "chessboard-common v0.1.0"
}
