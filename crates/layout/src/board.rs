use crate::pieces::MAX_RADIAL_SEGMENTS;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Squares per side of a standard board.
pub const BOARD_DIMENSION: u32 = 8;

/// Largest supported board: one letter per file, `a` through `z`.
pub const MAX_BOARD_DIMENSION: u32 = 26;

/// Errors from validating layout inputs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("tile size must be positive and finite, got {0}")]
    NonPositiveTileSize(f32),
    #[error("tile thickness must be positive and finite, got {0}")]
    NonPositiveTileThickness(f32),
    #[error("board dimension must be at least 1")]
    ZeroDimension,
    #[error("board dimension {0} exceeds the maximum of {MAX_BOARD_DIMENSION}")]
    DimensionTooLarge(u32),
    #[error("square ({column}, {row}) lies outside a {dimension}x{dimension} board")]
    SquareOutOfBounds { column: u32, row: u32, dimension: u32 },
    #[error("invalid piece shape: {0}")]
    InvalidPieceShape(&'static str),
    #[error("{0} radial segments exceeds the maximum of {MAX_RADIAL_SEGMENTS}")]
    TooManySegments(u32),
}

/// Inputs to the board layout generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSpec {
    /// Edge length of one square tile in world units.
    pub tile_size: f32,
    /// Vertical thickness of each tile box.
    pub tile_thickness: f32,
    /// Squares per side.
    pub dimension: u32,
}

impl Default for BoardSpec {
    fn default() -> Self {
        Self {
            tile_size: 25.0,
            tile_thickness: 2.0,
            dimension: BOARD_DIMENSION,
        }
    }
}

impl BoardSpec {
    pub fn with_tile_size(tile_size: f32) -> Self {
        Self {
            tile_size,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(LayoutError::NonPositiveTileSize(self.tile_size));
        }
        if !(self.tile_thickness.is_finite() && self.tile_thickness > 0.0) {
            return Err(LayoutError::NonPositiveTileThickness(self.tile_thickness));
        }
        if self.dimension == 0 {
            return Err(LayoutError::ZeroDimension);
        }
        if self.dimension > MAX_BOARD_DIMENSION {
            return Err(LayoutError::DimensionTooLarge(self.dimension));
        }
        Ok(())
    }

    /// Distance from the origin to the centre of an edge tile.
    ///
    /// `(tile_size * dimension) / 2 - tile_size / 2`
    pub fn half_extent_offset(&self) -> f32 {
        (self.tile_size * self.dimension as f32) / 2.0 - self.tile_size / 2.0
    }

    /// Full edge length of the board.
    pub fn extent(&self) -> f32 {
        self.tile_size * self.dimension as f32
    }

    /// Centre of square `(column, row)` on the board surface plane (y = 0).
    pub fn world_position(&self, column: u32, row: u32) -> Vec3 {
        let offset = self.half_extent_offset();
        Vec3::new(
            column as f32 * self.tile_size - offset,
            0.0,
            row as f32 * self.tile_size - offset,
        )
    }
}

/// Checker shade of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileShade {
    Light,
    Dark,
}

impl TileShade {
    /// Light on even `(column + row)`, dark on odd.
    pub fn at(column: u32, row: u32) -> Self {
        if (column + row) % 2 == 0 {
            TileShade::Light
        } else {
            TileShade::Dark
        }
    }
}

/// One board square: grid coordinate, world position, shade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileDescriptor {
    pub column: u32,
    pub row: u32,
    pub position: Vec3,
    pub shade: TileShade,
}

impl TileDescriptor {
    /// Algebraic name of the square, e.g. `a1` for `(0, 0)`.
    ///
    /// Columns past `z` fall back to `c{column}r{rank}`.
    pub fn square_name(&self) -> String {
        match char::from_u32('a' as u32 + self.column) {
            Some(file) if file.is_ascii_lowercase() => format!("{file}{}", self.row + 1),
            _ => format!("c{}r{}", self.column, self.row + 1),
        }
    }
}

/// The generated board: its `BoardSpec` plus 64 (dimension²) tiles in generation order.
///
/// Tiles are ordered column-major: all rows of column 0, then column 1, ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardLayout {
    spec: BoardSpec,
    tiles: Vec<TileDescriptor>,
}

impl BoardLayout {
    /// Generate the layout for a validated spec.
    pub fn generate(spec: &BoardSpec) -> Result<Self, LayoutError> {
        spec.validate()?;

        let n = spec.dimension;
        let tiles: Vec<TileDescriptor> = (0..n)
            .flat_map(|column| {
                (0..n).map(move |row| TileDescriptor {
                    column,
                    row,
                    position: spec.world_position(column, row),
                    shade: TileShade::at(column, row),
                })
            })
            .collect();

        tracing::debug!(
            tiles = tiles.len(),
            tile_size = spec.tile_size,
            offset = spec.half_extent_offset(),
            "generated board layout"
        );

        Ok(Self { spec: *spec, tiles })
    }

    pub fn spec(&self) -> &BoardSpec {
        &self.spec
    }

    pub fn tiles(&self) -> &[TileDescriptor] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn half_extent_offset(&self) -> f32 {
        self.spec.half_extent_offset()
    }

    pub fn contains(&self, column: u32, row: u32) -> bool {
        column < self.spec.dimension && row < self.spec.dimension
    }

    /// Look up the tile at a grid coordinate.
    pub fn tile(&self, column: u32, row: u32) -> Option<&TileDescriptor> {
        if !self.contains(column, row) {
            return None;
        }
        let index = column as usize * self.spec.dimension as usize + row as usize;
        self.tiles.get(index)
    }

    /// World position of a square, or an error if it is off the board.
    pub fn world_position(&self, column: u32, row: u32) -> Result<Vec3, LayoutError> {
        self.tile(column, row)
            .map(|t| t.position)
            .ok_or(LayoutError::SquareOutOfBounds {
                column,
                row,
                dimension: self.spec.dimension,
            })
    }
}
