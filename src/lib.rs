use bevy_app::prelude::*;
use bevy_asset::prelude::*;
use bevy_ecs::prelude::*;
use bevy_log::prelude::*;
use bevy_math::Vec3;
use bevy_mesh::{Mesh, VertexAttributeValues};
use bevy_reflect::prelude::*;
use bevy_render::mesh::Mesh3d;
use bevy_time::Time;

use builder::MeshBuilder;
use morph::{MorphAnimator, MorphState, MorphTargets};
use render_mesh::RenderMesh;
use storage::AssetsMorphTargets;
use sway::{apply_sway, Sway};

pub mod builder;
pub mod common;
pub mod error;
pub mod morph;
pub mod render_mesh;
pub mod storage;
pub mod sway;

pub use error::GeodesicError;

/// Global settings of every geodesic morph, inserted by [`GeodesicUnfoldPlugin`].
#[derive(Clone, Debug, Resource, Reflect)]
#[reflect(Resource, Default, Debug)]
pub struct MorphSettings {
    /// Morph progress gained per second; a morph takes `1 / speed` seconds.
    pub speed: f32,
    /// Where the flattened net sits relative to the sphere.
    pub net_offset: Vec3,
    /// Direction of the first morph. Meshes always start out flattened.
    pub initial_state: MorphState,
    /// Refresh vertex normals after every morph write.
    pub recompute_normals: bool,
}

impl Default for MorphSettings {
    fn default() -> Self {
        Self {
            speed: 0.5,
            net_offset: Vec3::new(-2.5, 0.1, 1.0),
            initial_state: MorphState::Unflattening,
            recompute_normals: true,
        }
    }
}

/// Add this to an entity to have a morphing geodesic icosahedron generated for it.
#[derive(Component, Clone, Debug, Default, Reflect)]
#[reflect(Component, Default, Debug)]
pub struct GeodesicIcosahedron {
    /// Rounds of 4-way subdivision, at most [`builder::MAX_SUBDIVISIONS`].
    pub subdivision_count: u8,
}

/// Generates geodesic icosahedra and animates them between sphere and net.
#[derive(Clone, Debug, Default)]
pub struct GeodesicUnfoldPlugin {
    settings: MorphSettings,
}

impl GeodesicUnfoldPlugin {
    pub fn with_settings(settings: MorphSettings) -> Self {
        Self { settings }
    }
}

impl Plugin for GeodesicUnfoldPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<MorphSettings>()
            .register_type::<GeodesicIcosahedron>()
            .register_type::<MorphAnimator>()
            .register_type::<Sway>()
            .insert_resource(self.settings.clone())
            .init_resource::<AssetsMorphTargets<Mesh>>()
            .add_event::<AssetEvent<Mesh>>()
            .add_systems(
                PreUpdate,
                (evict_morph_targets, build_geodesic_meshes).chain(),
            )
            .add_systems(Update, (animate_morphs, apply_sway));
    }
}

/// Drops the morph targets of mesh assets that were removed or lost their last handle.
pub fn evict_morph_targets(
    mut events: EventReader<AssetEvent<Mesh>>,
    mut morph_targets: ResMut<AssetsMorphTargets<Mesh>>,
) {
    for ev in events.read() {
        match ev {
            AssetEvent::Removed { id } | AssetEvent::Unused { id } => {
                if morph_targets.remove(*id).is_some() {
                    debug!("Evicted morph targets of mesh {}", id);
                }
            }
            _ => {}
        }
    }
}

/// Generates the mesh and morph targets of every added or changed
/// [`GeodesicIcosahedron`], replacing the ones it had before.
pub fn build_geodesic_meshes(
    mut commands: Commands,
    settings: Res<MorphSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut morph_targets: ResMut<AssetsMorphTargets<Mesh>>,
    changed: Query<
        (Entity, &GeodesicIcosahedron, Option<&Mesh3d>),
        Changed<GeodesicIcosahedron>,
    >,
) {
    for (entity, icosahedron, previous) in &changed {
        let builder = MeshBuilder::new(icosahedron.subdivision_count)
            .with_net_offset(settings.net_offset);

        let built = builder.build().and_then(|geodesic| {
            // the displayed mesh starts out as the flattened net
            let render_mesh = geodesic.flattened().to_render_mesh()?;
            Ok((MorphTargets::from(&geodesic), render_mesh))
        });
        let (targets, render_mesh) = match built {
            Ok(built) => built,
            Err(err) => {
                error!("Failed to build geodesic mesh for {}: {}", entity, err);
                continue;
            }
        };

        if let Some(Mesh3d(previous)) = previous {
            morph_targets.remove(previous);
            meshes.remove(previous);
        }

        let handle = meshes.add(render_mesh.to_bevy_mesh());
        morph_targets.insert(&handle, targets);

        debug!("Geodesic mesh {:?} ready for {}", handle.id(), entity);
        commands.entity(entity).insert((
            Mesh3d(handle),
            MorphAnimator::new(settings.initial_state, settings.speed),
        ));
    }
}

/// Ticks every [`MorphAnimator`] and uploads the new positions to its mesh.
pub fn animate_morphs(
    time: Res<Time>,
    settings: Res<MorphSettings>,
    morph_targets: Res<AssetsMorphTargets<Mesh>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut animators: Query<(Entity, &Mesh3d, &mut MorphAnimator)>,
) {
    let delta = time.delta_secs();

    for (entity, mesh3d, mut animator) in &mut animators {
        let Some(targets) = morph_targets.get(&mesh3d.0) else {
            continue;
        };
        let Some(mesh) = meshes.get(&mesh3d.0) else {
            warn!("Missing mesh for morphing entity {}", entity);
            continue;
        };
        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            warn!("Morphing mesh of {} has no float3 positions", entity);
            continue;
        };

        let mut buffer: Vec<Vec3> = positions.iter().copied().map(Vec3::from).collect();
        match animator.tick(delta, targets, &mut buffer) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(err) => {
                error!("Cannot morph {}: {}", entity, err);
                continue;
            }
        }

        let Some(mesh) = meshes.get_mut(&mesh3d.0) else {
            continue;
        };
        let mut render_mesh = RenderMesh {
            positions: buffer,
            ..Default::default()
        };
        if settings.recompute_normals {
            if let Some(indices) = mesh.indices() {
                render_mesh.set_indices(indices);
                render_mesh.compute_normals();
            }
        }
        render_mesh.write_into(mesh);
    }
}
