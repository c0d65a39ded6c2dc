//! The blended tensor field and its sample lattice.

use bevy::prelude::*;

use crate::error::FieldError;
use crate::fields::BasisField;
use crate::tensor::Tensor;

/// Default generation area in world units.
pub const DEFAULT_CITY_SIZE: Vec2 = Vec2::new(100.0, 100.0);
/// Default spacing of the visualization lattice.
pub const DEFAULT_LATTICE_DIAMETER: f32 = 1.0;

pub struct TensorFieldPlugin;

impl Plugin for TensorFieldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TensorField>();
    }
}

/// Blended tensor field built from registered basis fields.
///
/// Also owns a lattice of sample points covering the generation area,
/// used to visualize the field as short line segments.
#[derive(Resource)]
pub struct TensorField {
    fields: Vec<BasisField>,
    points: Vec<Vec2>,
    diameter: f32,
}

impl Default for TensorField {
    fn default() -> Self {
        Self::new(
            DEFAULT_CITY_SIZE,
            -DEFAULT_CITY_SIZE * 0.5,
            DEFAULT_LATTICE_DIAMETER,
        )
    }
}

impl TensorField {
    /// An empty field over the given area, with lattice points every
    /// `diameter` units. The outermost ring of the lattice is skipped so
    /// samples stay inside the area.
    pub fn new(city_size: Vec2, origin: Vec2, diameter: f32) -> Self {
        let nx = (city_size.x / diameter).ceil() as i32 + 1;
        let ny = (city_size.y / diameter).ceil() as i32 + 1;
        let mut points = Vec::new();
        for x in 1..(nx - 1) {
            for y in 1..(ny - 1) {
                points.push(origin + Vec2::new(x as f32 * diameter, y as f32 * diameter));
            }
        }
        Self {
            fields: Vec::new(),
            points,
            diameter,
        }
    }

    /// Sample the blended field at `position`.
    ///
    /// With no fields registered this returns a unit tensor at angle zero,
    /// so tracing still has a flow to follow.
    pub fn get_point(&self, position: Vec2) -> Tensor {
        if self.fields.is_empty() {
            return Tensor::new(1.0, [0.0, 0.0]);
        }
        let mut tensor = Tensor::ZERO;
        for field in &self.fields {
            tensor.add(&field.weighted_tensor(position));
        }
        tensor
    }

    /// Register a grid field oriented along `theta`.
    pub fn add_grid(
        &mut self,
        center: Vec2,
        size: f32,
        decay: f32,
        theta: f32,
    ) -> Result<(), FieldError> {
        self.fields.push(BasisField::grid(center, size, decay, theta)?);
        Ok(())
    }

    /// Register a radial field around `center`.
    pub fn add_radial(&mut self, center: Vec2, size: f32, decay: f32) -> Result<(), FieldError> {
        self.fields.push(BasisField::radial(center, size, decay)?);
        Ok(())
    }

    /// Remove and return the field whose center is nearest to `position`.
    pub fn remove_field(&mut self, position: Vec2) -> Option<BasisField> {
        let nearest = self
            .fields
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.center()
                    .distance_squared(position)
                    .total_cmp(&b.center().distance_squared(position))
            })
            .map(|(index, _)| index)?;
        Some(self.fields.remove(nearest))
    }

    /// Segment visualizing the flow through `point`, spanning one lattice
    /// diameter on each side.
    pub fn tensor_line(&self, point: Vec2, direction: Vec2) -> [Vec2; 2] {
        [
            point - direction * self.diameter,
            point + direction * self.diameter,
        ]
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn fields(&self) -> &[BasisField] {
        &self.fields
    }

    pub fn diameter(&self) -> f32 {
        self.diameter
    }
}
