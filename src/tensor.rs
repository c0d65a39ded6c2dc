//! Doubled-angle tensors for street orientation.
//!
//! Based on "Interactive Procedural Street Modeling" (Chen et al. 2008).
//! A traceless symmetric 2x2 tensor is stored as a magnitude plus the
//! doubled-angle basis `[cos 2θ, sin 2θ]`, which makes a direction and its
//! opposite encode the same tensor.

use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

/// A symmetric 2x2 tensor in doubled-angle form.
#[derive(Clone, Copy, Debug)]
pub struct Tensor {
    magnitude: f32,
    basis: [f32; 2],
}

impl Tensor {
    /// The degenerate tensor with no orientation.
    pub const ZERO: Tensor = Tensor {
        magnitude: 0.0,
        basis: [0.0, 0.0],
    };

    pub const fn new(magnitude: f32, basis: [f32; 2]) -> Self {
        Self { magnitude, basis }
    }

    /// Unit tensor oriented along `theta`.
    pub fn from_theta(theta: f32) -> Self {
        Self::new(1.0, [(2.0 * theta).cos(), (2.0 * theta).sin()])
    }

    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    /// Orientation angle recovered from the basis, zero for a degenerate
    /// tensor.
    pub fn theta(&self) -> f32 {
        if self.magnitude != 0.0 {
            (self.basis[1] / self.magnitude).atan2(self.basis[0] / self.magnitude) * 0.5
        } else {
            0.0
        }
    }

    /// Major eigenvector, or zero when the tensor is degenerate.
    pub fn major(&self) -> Vec2 {
        if self.magnitude != 0.0 {
            let theta = self.theta();
            Vec2::new(theta.cos(), theta.sin())
        } else {
            Vec2::ZERO
        }
    }

    /// Minor eigenvector, perpendicular to the major one.
    pub fn minor(&self) -> Vec2 {
        if self.magnitude != 0.0 {
            let theta = self.theta() + FRAC_PI_2;
            Vec2::new(theta.cos(), theta.sin())
        } else {
            Vec2::ZERO
        }
    }

    /// Accumulate another tensor into this one.
    ///
    /// Components sum weighted by both magnitudes; the folded magnitude is
    /// always 2.
    pub fn add(&mut self, other: &Tensor) {
        for i in 0..2 {
            self.basis[i] = self.basis[i] * self.magnitude + other.basis[i] * other.magnitude;
        }
        self.magnitude = 2.0;
    }

    /// This tensor with its magnitude scaled by `factor`.
    pub fn scaled(mut self, factor: f32) -> Self {
        self.magnitude *= factor;
        self
    }
}
