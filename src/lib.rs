//! Tensor-field street network generation.
//!
//! Streets are traced as evenly-spaced streamlines through a blended 2x2
//! tensor field, following "Interactive Procedural Street Modeling"
//! (Chen et al. 2008): grid and radial basis fields are weighted together,
//! traced along major and minor eigen-directions tier by tier, then
//! simplified into compact polylines.
//!
//! The crate is headless. Consumers register basis fields on the
//! [`TensorField`] resource, trigger a [`GenerateRoadsEvent`], and read the
//! per-tier polylines back from [`RoadNetwork`]; rendering is theirs.

use bevy::prelude::*;

pub mod error;
pub mod fields;
pub mod grid_storage;
pub mod integrator;
pub mod road_generator;
pub mod simplify;
pub mod streamlines;
pub mod tensor;
pub mod tensor_field;

pub use error::FieldError;
pub use fields::{BasisField, FieldKind};
pub use grid_storage::GridStorage;
pub use integrator::FieldIntegrator;
pub use road_generator::{
    GenerateRoadsEvent, RoadGenConfig, RoadGeneratorPlugin, RoadNetwork, RoadType, RoadsGenerated,
    TierRoads,
};
pub use simplify::simplify;
pub use streamlines::{StreamlineParams, StreamlineTracer};
pub use tensor::Tensor;
pub use tensor_field::{TensorField, TensorFieldPlugin};

/// Everything needed to generate street networks inside an [`App`].
pub struct TensorStreetsPlugin;

impl Plugin for TensorStreetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(tensor_field::TensorFieldPlugin)
            .add_plugins(road_generator::RoadGeneratorPlugin);
    }
}
