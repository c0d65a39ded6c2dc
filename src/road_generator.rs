//! Road network generation driver.
//!
//! Runs the three road tiers over the tensor field: highways first, then
//! main roads, then minor roads. Each tier absorbs the separation indices
//! of the tiers above it, so lower tiers thread between existing streets
//! instead of crossing them at grazing angles.

use bevy::prelude::*;

use crate::integrator::FieldIntegrator;
use crate::streamlines::{StreamlineParams, StreamlineTracer};
use crate::tensor_field::TensorField;

/// Road tier, highest capacity first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoadType {
    Highway,
    Main,
    Minor,
}

/// Streamlines traced for one road tier.
#[derive(Clone, Debug)]
pub struct TierRoads {
    pub road_type: RoadType,
    /// Raw traced polylines.
    pub raw: Vec<Vec<Vec2>>,
    /// Simplified counterparts, index-aligned with `raw`.
    pub simplified: Vec<Vec<Vec2>>,
}

/// The generated street network, one entry per tier.
#[derive(Resource, Default)]
pub struct RoadNetwork {
    pub tiers: Vec<TierRoads>,
}

impl RoadNetwork {
    pub fn tier(&self, road_type: RoadType) -> Option<&TierRoads> {
        self.tiers.iter().find(|tier| tier.road_type == road_type)
    }

    /// Total raw streamlines across all tiers.
    pub fn streamline_count(&self) -> usize {
        self.tiers.iter().map(|tier| tier.raw.len()).sum()
    }
}

/// Configuration for road network generation.
#[derive(Resource, Clone)]
pub struct RoadGenConfig {
    /// Size of the generation area in world units.
    pub city_size: Vec2,
    /// Center of the generation area. Tracing covers the box from
    /// `city_origin - city_size / 2`.
    pub city_origin: Vec2,
    /// Lattice spacing of the tensor field visualization.
    pub grid_diameter: f32,
    /// Integration step length shared by every tier.
    pub step_length: f32,
    /// Seed for deterministic generation. Each tier derives its own
    /// stream from this value.
    pub seed: u64,
    /// Highway tier parameters.
    pub highway: StreamlineParams,
    /// Main road tier parameters.
    pub main: StreamlineParams,
    /// Minor road tier parameters.
    pub minor: StreamlineParams,
}

impl Default for RoadGenConfig {
    fn default() -> Self {
        Self {
            city_size: Vec2::new(100.0, 100.0),
            city_origin: Vec2::ZERO,
            grid_diameter: 1.0,
            step_length: 1.0,
            seed: 42,
            highway: StreamlineParams::default(),
            main: StreamlineParams::default()
                .with_separation(5.0)
                .with_lookahead(500.0),
            minor: StreamlineParams::default()
                .with_separation(2.5)
                .with_lookahead(500.0),
        }
    }
}

/// Event to trigger road network generation.
#[derive(Event)]
pub struct GenerateRoadsEvent;

/// Marker resource set once roads have been generated.
#[derive(Resource, Default)]
pub struct RoadsGenerated(pub bool);

pub struct RoadGeneratorPlugin;

impl Plugin for RoadGeneratorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RoadGenConfig>()
            .init_resource::<RoadNetwork>()
            .init_resource::<RoadsGenerated>()
            .add_event::<GenerateRoadsEvent>()
            .add_systems(Update, generate_roads_on_event)
            .add_systems(Startup, trigger_initial_generation);
    }
}

fn trigger_initial_generation(mut events: EventWriter<GenerateRoadsEvent>) {
    events.send(GenerateRoadsEvent);
}

fn generate_roads_on_event(
    mut events: EventReader<GenerateRoadsEvent>,
    field: Res<TensorField>,
    config: Res<RoadGenConfig>,
    mut network: ResMut<RoadNetwork>,
    mut generated: ResMut<RoadsGenerated>,
) {
    for _ in events.read() {
        info!("Generating road network...");
        let result = generate_network(&field, &config);
        info!(
            "Road generation complete: {} streamlines across {} tiers",
            result.streamline_count(),
            result.tiers.len()
        );
        *network = result;
        generated.0 = true;
    }
}

/// Trace all three road tiers over `field`.
pub fn generate_network(field: &TensorField, config: &RoadGenConfig) -> RoadNetwork {
    let origin = config.city_origin - config.city_size * 0.5;
    let integrator = FieldIntegrator::new(field, config.step_length);

    let mut highways = StreamlineTracer::new(
        &integrator,
        config.city_size,
        origin,
        config.highway,
        config.seed,
    );
    highways.create_all_streamlines();

    let mut main_roads = StreamlineTracer::new(
        &integrator,
        config.city_size,
        origin,
        config.main,
        config.seed.wrapping_add(1),
    );
    main_roads.add_existing_streamlines(&highways);
    main_roads.create_all_streamlines();

    let mut minor_roads = StreamlineTracer::new(
        &integrator,
        config.city_size,
        origin,
        config.minor,
        config.seed.wrapping_add(2),
    );
    minor_roads.add_existing_streamlines(&highways);
    minor_roads.add_existing_streamlines(&main_roads);
    minor_roads.create_all_streamlines();

    let mut network = RoadNetwork::default();
    for (road_type, tracer) in [
        (RoadType::Highway, highways),
        (RoadType::Main, main_roads),
        (RoadType::Minor, minor_roads),
    ] {
        let (raw, simplified) = tracer.into_streamlines();
        network.tiers.push(TierRoads {
            road_type,
            raw,
            simplified,
        });
    }
    network
}
