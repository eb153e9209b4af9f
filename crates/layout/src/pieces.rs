use crate::board::{BoardLayout, LayoutError};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Which player a placeholder belongs to. Selects its material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Light,
    Dark,
}

/// Most radial segments a placeholder cylinder may use.
pub const MAX_RADIAL_SEGMENTS: u32 = 512;

/// Cylinder parameters shared by every placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieceShape {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub radial_segments: u32,
}

impl Default for PieceShape {
    fn default() -> Self {
        Self {
            radius_top: 6.0,
            radius_bottom: 6.0,
            height: 20.0,
            radial_segments: 32,
        }
    }
}

impl PieceShape {
    pub fn validate(&self) -> Result<(), LayoutError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.radius_top) || !positive(self.radius_bottom) {
            return Err(LayoutError::InvalidPieceShape("radii must be positive"));
        }
        if !positive(self.height) {
            return Err(LayoutError::InvalidPieceShape("height must be positive"));
        }
        if self.radial_segments < 3 {
            return Err(LayoutError::InvalidPieceShape(
                "at least 3 radial segments are required",
            ));
        }
        if self.radial_segments > MAX_RADIAL_SEGMENTS {
            return Err(LayoutError::TooManySegments(self.radial_segments));
        }
        Ok(())
    }
}

/// A static stand-in for a chess piece. Carries no game state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PiecePlaceholder {
    pub side: Side,
    pub column: u32,
    pub row: u32,
    /// Centre of the cylinder in world space.
    pub position: Vec3,
}

/// Squares the two sample pawns stand on: `(side, column, row)`.
const SAMPLE_SQUARES: [(Side, u32, u32); 2] = [(Side::Light, 0, 3), (Side::Dark, 6, 6)];

/// Place the two sample pawns on the board.
///
/// Each cylinder is centred above its square so that its base rests on the
/// tile's top face: `y = tile_thickness / 2 + height / 2`.
pub fn sample_placeholders(
    layout: &BoardLayout,
    shape: &PieceShape,
) -> Result<[PiecePlaceholder; 2], LayoutError> {
    shape.validate()?;
    let lift = layout.spec().tile_thickness / 2.0 + shape.height / 2.0;

    let place = |(side, column, row): (Side, u32, u32)| -> Result<PiecePlaceholder, LayoutError> {
        let square = layout.world_position(column, row)?;
        Ok(PiecePlaceholder {
            side,
            column,
            row,
            position: square + Vec3::Y * lift,
        })
    };

    Ok([place(SAMPLE_SQUARES[0])?, place(SAMPLE_SQUARES[1])?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardSpec;

    fn standard() -> BoardLayout {
        BoardLayout::generate(&BoardSpec::default()).unwrap()
    }

    #[test]
    fn sample_positions_match_reference_scene() {
        let [light, dark] = sample_placeholders(&standard(), &PieceShape::default()).unwrap();

        assert_eq!(light.side, Side::Light);
        assert_eq!(light.position, Vec3::new(-87.5, 11.0, -12.5));

        assert_eq!(dark.side, Side::Dark);
        assert_eq!(dark.position, Vec3::new(62.5, 11.0, 62.5));
    }

    #[test]
    fn placeholders_sit_on_tiles() {
        let layout = standard();
        for piece in sample_placeholders(&layout, &PieceShape::default()).unwrap() {
            let tile = layout.tile(piece.column, piece.row).unwrap();
            assert_eq!(piece.position.x, tile.position.x);
            assert_eq!(piece.position.z, tile.position.z);
        }
    }

    #[test]
    fn sides_differ() {
        let [a, b] = sample_placeholders(&standard(), &PieceShape::default()).unwrap();
        assert_ne!(a.side, b.side);
    }

    #[test]
    fn small_board_rejects_placement() {
        let spec = BoardSpec {
            dimension: 4,
            ..BoardSpec::default()
        };
        let layout = BoardLayout::generate(&spec).unwrap();
        assert!(matches!(
            sample_placeholders(&layout, &PieceShape::default()),
            Err(LayoutError::SquareOutOfBounds { .. })
        ));
    }

    #[test]
    fn degenerate_shape_rejected() {
        let shape = PieceShape {
            radial_segments: 2,
            ..PieceShape::default()
        };
        assert!(matches!(
            sample_placeholders(&standard(), &shape),
            Err(LayoutError::InvalidPieceShape(_))
        ));
    }

    #[test]
    fn oversized_shape_rejected() {
        let shape = PieceShape {
            radial_segments: u32::MAX,
            ..PieceShape::default()
        };
        assert_eq!(
            shape.validate(),
            Err(LayoutError::TooManySegments(u32::MAX))
        );
        let finest = PieceShape {
            radial_segments: MAX_RADIAL_SEGMENTS,
            ..PieceShape::default()
        };
        assert!(finest.validate().is_ok());
    }
}
