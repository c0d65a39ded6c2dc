//! Field integration: one Euler step through the tensor field.

use bevy::prelude::*;

use crate::tensor_field::TensorField;

/// Steps along the eigen-directions of a tensor field.
pub struct FieldIntegrator<'a> {
    field: &'a TensorField,
    step_length: f32,
}

impl<'a> FieldIntegrator<'a> {
    pub fn new(field: &'a TensorField, step_length: f32) -> Self {
        Self { field, step_length }
    }

    /// The step to take from `point`, following the major or minor
    /// eigenvector. A degenerate sample yields the zero vector: no flow.
    pub fn integrate(&self, point: Vec2, major: bool) -> Vec2 {
        let tensor = self.field.get_point(point);
        let direction = if major { tensor.major() } else { tensor.minor() };
        direction * self.step_length
    }
}
