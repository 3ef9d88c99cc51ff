//! Every star is drawn by one mesh: four vertices per star, all at the star's
//! position, pushed apart in screen space by the vertex shader.

use bevy::asset::RenderAssetUsages;
use bevy::camera::visibility::NoFrustumCulling;
use bevy::light::NotShadowCaster;
use bevy::mesh::Indices;
use bevy::mesh::MeshVertexAttribute;
use bevy::mesh::MeshVertexBufferLayoutRef;
use bevy::mesh::PrimitiveTopology;
use bevy::pbr::MaterialPipeline;
use bevy::pbr::MaterialPipelineKey;
use bevy::prelude::*;
use bevy::render::render_resource::AsBindGroup;
use bevy::render::render_resource::RenderPipelineDescriptor;
use bevy::render::render_resource::ShaderType;
use bevy::render::render_resource::SpecializedMeshPipelineError;
use bevy::render::render_resource::VertexFormat;
use bevy::shader::ShaderRef;
use bevy::window::PrimaryWindow;

use super::catalog::StarCatalog;
use super::synthetic::default_synthetic_catalog;
use crate::asset_loader::CatalogReady;
use crate::camera::FovChanged;
use crate::camera::ViewerState;

const SHADER_ASSET_PATH: &str = "shaders/star_field.wgsl";

/// Which corner of its quad a vertex is, in [-1, 1]
pub const ATTRIBUTE_CORNER: MeshVertexAttribute =
    MeshVertexAttribute::new("StarCorner", 411_275_830, VertexFormat::Float32x2);

/// Point size in pixels before zoom
pub const ATTRIBUTE_SIZE: MeshVertexAttribute =
    MeshVertexAttribute::new("StarSize", 411_275_831, VertexFormat::Float32);

pub const ATTRIBUTE_MAGNITUDE: MeshVertexAttribute =
    MeshVertexAttribute::new("StarMagnitude", 411_275_832, VertexFormat::Float32);

const QUAD_CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];

pub struct StarFieldPlugin;

impl Plugin for StarFieldPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<StarFieldMaterial>::default())
            .add_systems(Startup, (create_star_material, spawn_synthetic_stars).chain())
            .add_observer(replace_with_catalog)
            .add_observer(update_star_fov)
            .add_systems(Update, update_size_scale);
    }
}

#[derive(ShaderType, Clone, Copy, Debug, PartialEq, Reflect)]
pub struct StarFieldSettings {
    /// Vertical field of view in degrees
    pub fov:        f32,
    /// Logical to physical pixel ratio of the window
    pub size_scale: f32,
}

#[derive(Asset, TypePath, AsBindGroup, Clone, Debug)]
pub struct StarFieldMaterial {
    #[uniform(0)]
    pub settings: StarFieldSettings,
}

impl Material for StarFieldMaterial {
    fn vertex_shader() -> ShaderRef { SHADER_ASSET_PATH.into() }

    fn fragment_shader() -> ShaderRef { SHADER_ASSET_PATH.into() }

    fn alpha_mode(&self) -> AlphaMode { AlphaMode::Add }

    fn enable_prepass() -> bool { false }

    fn enable_shadows() -> bool { false }

    fn specialize(
        _pipeline: &MaterialPipeline,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            ATTRIBUTE_CORNER.at_shader_location(1),
            ATTRIBUTE_SIZE.at_shader_location(2),
            ATTRIBUTE_MAGNITUDE.at_shader_location(3),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];

        if let Some(depth_stencil) = descriptor.depth_stencil.as_mut() {
            depth_stencil.depth_write_enabled = false;
        }
        Ok(())
    }
}

/// Shared by the synthetic and catalog star fields
#[derive(Resource, Clone, Debug)]
pub struct StarFieldMaterialHandle(pub Handle<StarFieldMaterial>);

#[derive(Component, Reflect, Debug)]
#[reflect(Component)]
pub struct StarField {
    pub star_count: usize,
}

/// Marks the random starfield that the catalog replaces
#[derive(Component, Reflect, Debug)]
#[reflect(Component)]
pub struct SyntheticStars;

/// Expands each star into a quad; positions, sizes and magnitudes must line up
pub fn build_star_mesh(positions: &[Vec3], sizes: &[f32], magnitudes: &[f32]) -> Mesh {
    let star_count = positions.len().min(sizes.len()).min(magnitudes.len());

    let mut vertex_positions = Vec::with_capacity(star_count * 4);
    let mut corners = Vec::with_capacity(star_count * 4);
    let mut vertex_sizes = Vec::with_capacity(star_count * 4);
    let mut vertex_magnitudes = Vec::with_capacity(star_count * 4);
    let mut indices = Vec::with_capacity(star_count * 6);

    for star in 0..star_count {
        let Ok(base) = u32::try_from(star * 4) else {
            break;
        };
        for corner in QUAD_CORNERS {
            vertex_positions.push(positions[star].to_array());
            corners.push(corner);
            vertex_sizes.push(sizes[star]);
            vertex_magnitudes.push(magnitudes[star]);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, vertex_positions)
        .with_inserted_attribute(ATTRIBUTE_CORNER, corners)
        .with_inserted_attribute(ATTRIBUTE_SIZE, vertex_sizes)
        .with_inserted_attribute(ATTRIBUTE_MAGNITUDE, vertex_magnitudes)
        .with_inserted_indices(Indices::U32(indices))
}

fn star_field_mesh(catalog: &StarCatalog) -> Mesh {
    build_star_mesh(&catalog.positions(), &catalog.sizes(), &catalog.magnitudes())
}

fn create_star_material(
    mut commands: Commands,
    viewer: Res<ViewerState>,
    mut materials: ResMut<Assets<StarFieldMaterial>>,
) {
    let handle = materials.add(StarFieldMaterial {
        settings: StarFieldSettings {
            fov:        viewer.camera.fov,
            size_scale: 1.0,
        },
    });
    commands.insert_resource(StarFieldMaterialHandle(handle));
}

fn spawn_star_field(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: &StarFieldMaterialHandle,
    catalog: &StarCatalog,
) -> Entity {
    commands
        .spawn((
            StarField {
                star_count: catalog.len(),
            },
            Mesh3d(meshes.add(star_field_mesh(catalog))),
            MeshMaterial3d(material.0.clone()),
            Transform::IDENTITY,
            NoFrustumCulling,
            NotShadowCaster,
        ))
        .id()
}

fn spawn_synthetic_stars(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    material: Res<StarFieldMaterialHandle>,
) {
    let catalog = default_synthetic_catalog();
    debug!("spawning {} synthetic stars", catalog.len());

    let entity = spawn_star_field(&mut commands, &mut meshes, &material, &catalog);
    commands
        .entity(entity)
        .insert((Name::new("SyntheticStars"), SyntheticStars));
}

fn replace_with_catalog(
    ready: On<CatalogReady>,
    mut commands: Commands,
    catalogs: Res<Assets<StarCatalog>>,
    synthetic: Query<Entity, With<SyntheticStars>>,
    mut meshes: ResMut<Assets<Mesh>>,
    material: Res<StarFieldMaterialHandle>,
) {
    let Some(catalog) = catalogs.get(ready.id) else {
        return;
    };

    if catalog.is_empty() {
        warn!("star catalog has no stars brighter than the limit, keeping synthetic stars");
        return;
    }

    for entity in &synthetic {
        commands.entity(entity).despawn();
    }

    info!(
        "star catalog loaded: {} stars, {} named, {} rows skipped ({:?})",
        catalog.len(),
        catalog.named_stars().count(),
        catalog.skipped_rows,
        catalog.angle_unit
    );
    let entity = spawn_star_field(&mut commands, &mut meshes, &material, catalog);
    commands.entity(entity).insert(Name::new("CatalogStars"));
}

fn update_star_fov(
    changed: On<FovChanged>,
    material: Res<StarFieldMaterialHandle>,
    mut materials: ResMut<Assets<StarFieldMaterial>>,
) {
    if let Some(mut star_material) = materials.get_mut(&material.0) {
        star_material.settings.fov = changed.fov;
    }
}

fn update_size_scale(
    window: Single<&Window, (With<PrimaryWindow>, Changed<Window>)>,
    material: Res<StarFieldMaterialHandle>,
    mut materials: ResMut<Assets<StarFieldMaterial>>,
) {
    let scale = window.scale_factor();
    let Some(current) = materials.get(&material.0) else {
        return;
    };
    if (current.settings.size_scale - scale).abs() <= f32::EPSILON {
        return;
    }
    if let Some(mut star_material) = materials.get_mut(&material.0) {
        debug!("star size scale {scale}");
        star_material.settings.size_scale = scale;
    }
}

#[cfg(test)]
mod star_field_tests {
    use bevy::mesh::VertexAttributeValues;

    use super::*;

    #[test]
    fn test_mesh_has_a_quad_per_star() {
        let positions = [Vec3::X * 45.0, Vec3::Y * 45.0, Vec3::NEG_Z * 45.0];
        let mesh = build_star_mesh(&positions, &[1.0, 2.0, 3.0], &[6.0, 3.0, 0.5]);

        assert_eq!(mesh.count_vertices(), 12);
        let Some(indices) = mesh.indices() else {
            panic!("star mesh must be indexed");
        };
        assert_eq!(indices.len(), 18);

        let Some(VertexAttributeValues::Float32(sizes)) = mesh.attribute(ATTRIBUTE_SIZE) else {
            panic!("missing size attribute");
        };
        assert_eq!(&sizes[4..8], &[2.0; 4]);

        let Some(VertexAttributeValues::Float32x3(vertex_positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("missing positions");
        };
        assert_eq!(vertex_positions[11], (Vec3::NEG_Z * 45.0).to_array());
    }

    #[test]
    fn test_mismatched_inputs_use_shortest() {
        let mesh = build_star_mesh(&[Vec3::X, Vec3::Y], &[1.0], &[1.0, 2.0]);
        assert_eq!(mesh.count_vertices(), 4);
    }
}
