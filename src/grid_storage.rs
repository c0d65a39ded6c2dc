//! Spatial separation index for streamline spacing.

use bevy::prelude::*;
use std::collections::HashMap;

/// Point index bucketed into square cells of the tier separation.
///
/// Validity queries scan the 3x3 cell neighborhood, which is sufficient
/// because the query distance never exceeds the cell size.
#[derive(Clone, Debug)]
pub struct GridStorage {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<Vec2>>,
}

impl GridStorage {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    fn to_cell(&self, point: Vec2) -> (i32, i32) {
        (
            (point.x / self.cell_size).floor() as i32,
            (point.y / self.cell_size).floor() as i32,
        )
    }

    pub fn add_sample(&mut self, point: Vec2) {
        let cell = self.to_cell(point);
        self.cells.entry(cell).or_default().push(point);
    }

    pub fn add_polyline(&mut self, points: &[Vec2]) {
        for &point in points {
            self.add_sample(point);
        }
    }

    /// Merge every sample of `other` into this index.
    ///
    /// Samples are re-bucketed one by one since the two indices may use
    /// different cell sizes.
    pub fn add_all(&mut self, other: &GridStorage) {
        for points in other.cells.values() {
            for &point in points {
                self.add_sample(point);
            }
        }
    }

    /// True when no stored sample lies within `distance_sq` of `point`.
    pub fn is_valid_sample(&self, point: Vec2, distance_sq: f32) -> bool {
        let (cx, cy) = self.to_cell(point);
        for x in (cx - 1)..=(cx + 1) {
            for y in (cy - 1)..=(cy + 1) {
                if let Some(points) = self.cells.get(&(x, y)) {
                    for &sample in points {
                        if point.distance_squared(sample) < distance_sq {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }

    /// All samples in the cells overlapping a box of `radius` around
    /// `center`. Coarse on purpose; callers filter by actual distance.
    pub fn nearby_points(&self, center: Vec2, radius: f32) -> Vec<Vec2> {
        let min_cell = self.to_cell(center - Vec2::splat(radius));
        let max_cell = self.to_cell(center + Vec2::splat(radius));
        let mut result = Vec::new();
        for x in min_cell.0..=max_cell.0 {
            for y in min_cell.1..=max_cell.1 {
                if let Some(points) = self.cells.get(&(x, y)) {
                    result.extend(points);
                }
            }
        }
        result
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(Vec::is_empty)
    }
}
