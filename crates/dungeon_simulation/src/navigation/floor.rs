//! FloorGrid - пол подземелья (сетка квадратных тайлов)
//!
//! Тайл (i, j) центрирован в (i·size, 0, j·size). Вся сетка проходима,
//! поэтому nearest walkable point = clamp в bounding rect сетки.

use bevy::prelude::*;

use super::NavigationQuery;
use crate::config::LevelConfig;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct FloorGrid {
    pub columns: u32,
    pub rows: u32,
    pub tile_size: f32,
    pub floor_height: f32,
}

impl FloorGrid {
    pub fn new(columns: u32, rows: u32, tile_size: f32) -> Self {
        Self {
            columns,
            rows,
            tile_size,
            floor_height: 0.0,
        }
    }

    pub fn from_level(config: &LevelConfig) -> Self {
        Self::new(config.floor_columns, config.floor_rows, config.tile_size)
    }

    pub fn is_empty(&self) -> bool {
        self.columns == 0 || self.rows == 0
    }

    pub fn tile_center(&self, column: u32, row: u32) -> Vec3 {
        Vec3::new(
            column as f32 * self.tile_size,
            self.floor_height,
            row as f32 * self.tile_size,
        )
    }

    /// Позиции свободных тайлов для спавна (округлены вниз, порядок column-major)
    pub fn free_tile_positions(&self) -> Vec<Vec3> {
        let mut positions = Vec::with_capacity((self.columns * self.rows) as usize);
        for column in 0..self.columns {
            for row in 0..self.rows {
                let center = self.tile_center(column, row);
                positions.push(Vec3::new(center.x.floor(), self.floor_height, center.z.floor()));
            }
        }
        positions
    }

    /// (min, max) по XZ
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let half = self.tile_size * 0.5;
        let min = Vec2::splat(-half);
        let max = Vec2::new(
            (self.columns.saturating_sub(1)) as f32 * self.tile_size + half,
            (self.rows.saturating_sub(1)) as f32 * self.tile_size + half,
        );
        (min, max)
    }
}

impl NavigationQuery for FloorGrid {
    fn nearest_walkable_point(&self, approximate: Vec3) -> Vec3 {
        if self.is_empty() {
            return approximate;
        }

        let (min, max) = self.bounds();
        Vec3::new(
            approximate.x.clamp(min.x, max.x),
            self.floor_height,
            approximate.z.clamp(min.y, max.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_tiles_are_floored_grid_positions() {
        let grid = FloorGrid::new(10, 10, 7.2);
        let tiles = grid.free_tile_positions();

        assert_eq!(tiles.len(), 100);
        assert_eq!(tiles[0], Vec3::ZERO);
        // column 0, row 1 → z = floor(7.2)
        assert_eq!(tiles[1], Vec3::new(0.0, 0.0, 7.0));
        // column 1, row 0 → x = floor(7.2)
        assert_eq!(tiles[10], Vec3::new(7.0, 0.0, 0.0));
        // column 9, row 9 → floor(64.8)
        assert_eq!(tiles[99], Vec3::new(64.0, 0.0, 64.0));
    }

    #[test]
    fn test_nearest_walkable_point_clamps_to_floor() {
        let grid = FloorGrid::new(10, 10, 7.2);

        let inside = grid.nearest_walkable_point(Vec3::new(20.0, 9.1, 30.0));
        assert_eq!(inside, Vec3::new(20.0, 0.0, 30.0));

        let outside = grid.nearest_walkable_point(Vec3::new(-50.0, 3.0, 500.0));
        assert!((outside.x - -3.6).abs() < 1e-5);
        assert!((outside.z - 68.4).abs() < 1e-4);
        assert_eq!(outside.y, 0.0);
    }

    #[test]
    fn test_empty_grid_passes_point_through() {
        let grid = FloorGrid::new(0, 0, 7.2);
        let point = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(grid.nearest_walkable_point(point), point);
        assert!(grid.free_tile_positions().is_empty());
    }
}
