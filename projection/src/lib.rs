#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Isometric tile projection shared by the interaction controller and renderers.
//!
//! Every function here is a pure function of its explicit parameters: the
//! projection only stores the tile dimensions, and pan/zoom travel in a
//! [`Viewport`] value supplied by the caller.

use std::{error::Error, fmt};

use glam::Vec2;
use isomap_core::{GridSize, TileCoord};

/// Zoom bounds applied when zooming around the pointer.
pub const POINTER_ZOOM_RANGE: ZoomRange = ZoomRange::new(0.25, 3.0);

/// Zoom bounds applied by explicit zoom setters and center-on-zoom.
pub const VIEW_ZOOM_RANGE: ZoomRange = ZoomRange::new(0.3, 3.0);

/// Inclusive range used to clamp zoom factors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomRange {
    min: f32,
    max: f32,
}

impl ZoomRange {
    /// Creates a new zoom range.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Smallest permitted zoom factor.
    #[must_use]
    pub const fn min(&self) -> f32 {
        self.min
    }

    /// Largest permitted zoom factor.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Clamps `zoom` into the range. Non-finite input falls back to the lower bound.
    #[must_use]
    pub fn clamp(&self, zoom: f32) -> f32 {
        if zoom.is_finite() {
            zoom.clamp(self.min, self.max)
        } else {
            self.min
        }
    }
}

/// Pan offset and zoom factor applied on top of the projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Screen-space offset of tile `(0, 0)`.
    pub pan: Vec2,
    /// Uniform scale factor.
    pub zoom: f32,
}

impl Viewport {
    /// Creates a new viewport.
    #[must_use]
    pub const fn new(pan: Vec2, zoom: f32) -> Self {
        Self { pan, zoom }
    }

    /// Returns a copy whose pan is shifted by the provided screen delta.
    #[must_use]
    pub fn panned_by(self, delta: Vec2) -> Self {
        Self {
            pan: self.pan + delta,
            zoom: self.zoom,
        }
    }

    /// Returns a copy whose zoom is clamped into `range`, keeping the pan.
    #[must_use]
    pub fn with_zoom(self, zoom: f32, range: ZoomRange) -> Self {
        Self {
            pan: self.pan,
            zoom: range.clamp(zoom),
        }
    }

    /// Zooms while keeping the content under `cursor` visually fixed.
    ///
    /// The new pan satisfies `cursor - (cursor - old_pan) * (new_zoom / old_zoom)`.
    #[must_use]
    pub fn zoomed_at(self, cursor: Vec2, zoom: f32, range: ZoomRange) -> Self {
        let new_zoom = range.clamp(zoom);
        if self.zoom <= f32::EPSILON || !self.zoom.is_finite() {
            return Self::new(self.pan, new_zoom);
        }
        let ratio = new_zoom / self.zoom;
        Self {
            pan: cursor - (cursor - self.pan) * ratio,
            zoom: new_zoom,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 1.0)
    }
}

/// Diamond-shaped isometric projection between tile and screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsoProjection {
    half_tile: Vec2,
}

impl IsoProjection {
    /// Default on-screen width of one tile at zoom 1.
    pub const DEFAULT_TILE_WIDTH: f32 = 64.0;

    /// Default on-screen height of one tile at zoom 1.
    pub const DEFAULT_TILE_HEIGHT: f32 = 32.0;

    /// Creates a projection for tiles of the given on-screen size at zoom 1.
    ///
    /// Returns an error when either dimension is not a positive finite number.
    pub fn new(tile_width: f32, tile_height: f32) -> Result<Self, ProjectionError> {
        let valid = |value: f32| value.is_finite() && value > 0.0;
        if !valid(tile_width) || !valid(tile_height) {
            return Err(ProjectionError::InvalidTileSize {
                width: tile_width,
                height: tile_height,
            });
        }

        Ok(Self {
            half_tile: Vec2::new(tile_width * 0.5, tile_height * 0.5),
        })
    }

    /// Half of the tile width at zoom 1.
    #[must_use]
    pub const fn half_tile_width(&self) -> f32 {
        self.half_tile.x
    }

    /// Half of the tile height at zoom 1.
    #[must_use]
    pub const fn half_tile_height(&self) -> f32 {
        self.half_tile.y
    }

    /// Projects fractional tile coordinates to screen space.
    #[must_use]
    pub fn tile_to_screen(&self, tile: Vec2, viewport: Viewport) -> Vec2 {
        let half = self.half_tile * viewport.zoom;
        Vec2::new(
            (tile.x - tile.y) * half.x + viewport.pan.x,
            (tile.x + tile.y) * half.y + viewport.pan.y,
        )
    }

    /// Screen-space center of a whole tile.
    #[must_use]
    pub fn tile_center(&self, tile: TileCoord, viewport: Viewport) -> Vec2 {
        self.tile_to_screen(tile_vec(tile), viewport)
    }

    /// Inverse of [`tile_to_screen`](Self::tile_to_screen): maps a screen point to
    /// fractional tile coordinates.
    #[must_use]
    pub fn screen_to_tile(&self, screen: Vec2, viewport: Viewport) -> Vec2 {
        let half = self.half_tile * viewport.zoom;
        if half.x.abs() <= f32::EPSILON || half.y.abs() <= f32::EPSILON {
            return Vec2::ZERO;
        }
        let local = screen - viewport.pan;
        let difference = local.x / half.x;
        let sum = local.y / half.y;
        Vec2::new((sum + difference) * 0.5, (sum - difference) * 0.5)
    }

    /// Rounds the tile under `screen` to the nearest whole tile.
    ///
    /// Returns `None` when the snapped tile has a negative coordinate.
    #[must_use]
    pub fn snap(&self, screen: Vec2, viewport: Viewport) -> Option<TileCoord> {
        let tile = self.screen_to_tile(screen, viewport).round();
        if !tile.x.is_finite() || !tile.y.is_finite() || tile.x < 0.0 || tile.y < 0.0 {
            return None;
        }
        Some(TileCoord::new(tile.x as u32, tile.y as u32))
    }

    /// Snaps like [`snap`](Self::snap) but also rejects tiles outside `grid`.
    #[must_use]
    pub fn snap_within(&self, screen: Vec2, viewport: Viewport, grid: GridSize) -> Option<TileCoord> {
        self.snap(screen, viewport).filter(|tile| grid.contains(*tile))
    }

    /// Tests whether `screen` lies inside the diamond of `tile`.
    ///
    /// Uses `|dx| / half_width + |dy| / half_height <= 1` against the tile center.
    #[must_use]
    pub fn point_in_tile(&self, screen: Vec2, tile: TileCoord, viewport: Viewport) -> bool {
        let half = self.half_tile * viewport.zoom;
        if half.x <= f32::EPSILON || half.y <= f32::EPSILON {
            return false;
        }
        let delta = (screen - self.tile_center(tile, viewport)).abs();
        delta.x / half.x + delta.y / half.y <= 1.0
    }

    /// Screen-space corners of a tile diamond: top, right, bottom, left.
    #[must_use]
    pub fn tile_corners(&self, tile: TileCoord, viewport: Viewport) -> [Vec2; 4] {
        let center = self.tile_center(tile, viewport);
        let half = self.half_tile * viewport.zoom;
        [
            center - Vec2::new(0.0, half.y),
            center + Vec2::new(half.x, 0.0),
            center + Vec2::new(0.0, half.y),
            center - Vec2::new(half.x, 0.0),
        ]
    }

    /// Computes the viewport that centers the grid's center tile inside a
    /// screen area of `viewport_size` at the requested zoom.
    #[must_use]
    pub fn centered_on_grid(&self, grid: GridSize, viewport_size: Vec2, zoom: f32) -> Viewport {
        let zoom = VIEW_ZOOM_RANGE.clamp(zoom);
        let unpanned = Viewport::new(Vec2::ZERO, zoom);
        let center = self.tile_center(grid.center(), unpanned);
        Viewport::new(viewport_size * 0.5 - center, zoom)
    }
}

impl Default for IsoProjection {
    fn default() -> Self {
        Self {
            half_tile: Vec2::new(
                Self::DEFAULT_TILE_WIDTH * 0.5,
                Self::DEFAULT_TILE_HEIGHT * 0.5,
            ),
        }
    }
}

/// Converts a whole tile into fractional tile coordinates.
#[must_use]
pub fn tile_vec(tile: TileCoord) -> Vec2 {
    Vec2::new(tile.x() as f32, tile.y() as f32)
}

/// Errors that can occur when constructing a projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProjectionError {
    /// Tile dimensions must be positive and finite.
    InvalidTileSize {
        /// Provided tile width.
        width: f32,
        /// Provided tile height.
        height: f32,
    },
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileSize { width, height } => write!(
                f,
                "tile size must be positive and finite (received {width}x{height})"
            ),
        }
    }
}

impl Error for ProjectionError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec2_close(actual: Vec2, expected: Vec2) {
        assert!(
            (actual - expected).length() < 1e-3,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn forward_transform_matches_formula() {
        let projection = IsoProjection::default();
        let viewport = Viewport::new(Vec2::new(100.0, 20.0), 2.0);
        let screen = projection.tile_center(TileCoord::new(3, 1), viewport);
        assert_vec2_close(screen, Vec2::new((3.0 - 1.0) * 32.0 * 2.0 + 100.0, 4.0 * 16.0 * 2.0 + 20.0));
    }

    #[test]
    fn inverse_transform_round_trips() {
        let projection = IsoProjection::new(80.0, 40.0).expect("valid tile size");
        let viewports = [
            Viewport::default(),
            Viewport::new(Vec2::new(-312.5, 48.0), 0.25),
            Viewport::new(Vec2::new(640.0, -90.0), 2.75),
        ];
        for viewport in viewports {
            for (x, y) in [(0, 0), (7, 3), (39, 37), (12, 30)] {
                let tile = TileCoord::new(x, y);
                let screen = projection.tile_center(tile, viewport);
                assert_vec2_close(projection.screen_to_tile(screen, viewport), tile_vec(tile));
                assert_eq!(projection.snap(screen, viewport), Some(tile));
            }
        }
    }

    #[test]
    fn snap_rounds_to_nearest_tile() {
        let projection = IsoProjection::default();
        let viewport = Viewport::default();
        let near = projection.tile_to_screen(Vec2::new(4.3, 2.6), viewport);
        assert_eq!(projection.snap(near, viewport), Some(TileCoord::new(4, 3)));
    }

    #[test]
    fn snap_within_rejects_tiles_outside_grid() {
        let projection = IsoProjection::default();
        let viewport = Viewport::default();
        let grid = GridSize::new(5, 5);
        let outside = projection.tile_center(TileCoord::new(6, 1), viewport);
        assert_eq!(projection.snap_within(outside, viewport, grid), None);
        let negative = projection.tile_to_screen(Vec2::new(-2.0, 1.0), viewport);
        assert_eq!(projection.snap(negative, viewport), None);
    }

    #[test]
    fn point_in_tile_uses_diamond_inequality() {
        let projection = IsoProjection::default();
        let viewport = Viewport::new(Vec2::new(10.0, 10.0), 1.0);
        let tile = TileCoord::new(2, 2);
        let center = projection.tile_center(tile, viewport);
        assert!(projection.point_in_tile(center, tile, viewport));
        assert!(projection.point_in_tile(center + Vec2::new(15.0, 7.0), tile, viewport));
        assert!(!projection.point_in_tile(center + Vec2::new(20.0, 9.0), tile, viewport));
        assert!(!projection.point_in_tile(center + Vec2::new(0.0, 17.0), tile, viewport));
    }

    #[test]
    fn zoom_at_point_keeps_cursor_tile_fixed() {
        let projection = IsoProjection::default();
        let viewport = Viewport::new(Vec2::new(400.0, 60.0), 1.0);
        let cursor = Vec2::new(517.0, 333.0);
        let before = projection.screen_to_tile(cursor, viewport);

        let zoomed = viewport.zoomed_at(cursor, 2.2, POINTER_ZOOM_RANGE);
        let after = projection.screen_to_tile(cursor, zoomed);

        assert!((zoomed.zoom - 2.2).abs() < f32::EPSILON);
        assert_vec2_close(after, before);
    }

    #[test]
    fn zoom_at_point_clamps_into_range() {
        let viewport = Viewport::default();
        let zoomed = viewport.zoomed_at(Vec2::new(10.0, 10.0), 10.0, POINTER_ZOOM_RANGE);
        assert!((zoomed.zoom - 3.0).abs() < f32::EPSILON);
        let zoomed = viewport.zoomed_at(Vec2::new(10.0, 10.0), 0.01, POINTER_ZOOM_RANGE);
        assert!((zoomed.zoom - 0.25).abs() < f32::EPSILON);
        let fitted = viewport.with_zoom(0.01, VIEW_ZOOM_RANGE);
        assert!((fitted.zoom - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn centered_on_grid_places_center_tile_mid_screen() {
        let projection = IsoProjection::default();
        let grid = GridSize::new(40, 38);
        let size = Vec2::new(1280.0, 720.0);
        let viewport = projection.centered_on_grid(grid, size, 1.5);
        assert_vec2_close(projection.tile_center(grid.center(), viewport), size * 0.5);
    }

    #[test]
    fn invalid_tile_size_is_rejected_without_panicking() {
        let error = IsoProjection::new(0.0, 32.0).expect_err("zero width must be rejected");
        assert!(matches!(error, ProjectionError::InvalidTileSize { .. }));
        assert!(IsoProjection::new(64.0, f32::NAN).is_err());
    }
}
