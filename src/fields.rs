//! Basis fields blended into the global tensor field.
//!
//! Two kinds of design element: grid fields orient streets along a fixed
//! angle, radial fields curl them around a center. Each field carries a
//! radial falloff so its influence fades toward its extent.

use bevy::prelude::*;

use crate::error::FieldError;
use crate::tensor::Tensor;

/// What pattern a basis field imposes.
#[derive(Clone, Copy, Debug)]
pub enum FieldKind {
    /// Uniform orientation along `theta`.
    Grid { theta: f32 },
    /// Concentric flow around the field center.
    Radial,
}

/// A single design element contributing to the blended field.
#[derive(Clone, Copy, Debug)]
pub struct BasisField {
    center: Vec2,
    size: f32,
    decay: f32,
    kind: FieldKind,
}

impl BasisField {
    /// A grid field oriented along `theta`.
    pub fn grid(center: Vec2, size: f32, decay: f32, theta: f32) -> Result<Self, FieldError> {
        Self::new(center, size, decay, FieldKind::Grid { theta })
    }

    /// A radial field curling around `center`.
    pub fn radial(center: Vec2, size: f32, decay: f32) -> Result<Self, FieldError> {
        Self::new(center, size, decay, FieldKind::Radial)
    }

    fn new(center: Vec2, size: f32, decay: f32, kind: FieldKind) -> Result<Self, FieldError> {
        if size <= 0.0 {
            return Err(FieldError::InvalidSize { size });
        }
        Ok(Self {
            center,
            size,
            decay,
            kind,
        })
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// The unweighted tensor this field contributes at `point`.
    pub fn tensor(&self, point: Vec2) -> Tensor {
        match self.kind {
            FieldKind::Grid { theta } => Tensor::from_theta(theta),
            FieldKind::Radial => {
                let t = point - self.center;
                Tensor::new(1.0, [t.y * t.y - t.x * t.x, -2.0 * t.x * t.y])
            }
        }
    }

    /// Falloff weight at `point`.
    ///
    /// Distance is normalized by the field size; with zero decay the weight
    /// is a hard plateau that cuts off at the extent.
    pub fn weight(&self, point: Vec2) -> f32 {
        let norm_distance = point.distance(self.center) / self.size;
        if self.decay == 0.0 && norm_distance >= 1.0 {
            return 0.0;
        }
        (1.0 - norm_distance).max(0.0).powf(self.decay)
    }

    /// The field's tensor at `point`, scaled by its falloff weight.
    pub fn weighted_tensor(&self, point: Vec2) -> Tensor {
        self.tensor(point).scaled(self.weight(point))
    }
}
