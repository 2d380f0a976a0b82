//! Lowest-vertex scan over the map's tile meshes.

use bevy::prelude::*;
use bevy::render::mesh::VertexAttributeValues;

use geomap::ExtentShape;

/// Find the lowest mesh vertex inside the tabletop footprint and return its
/// world-space height. `None` when no vertex falls inside the footprint.
///
/// Each mesh's transform is approximated by uniform scale and translation
/// only; rotation is deliberately not corrected for, so rotated map content
/// scans slightly wrong. Known limitation, kept as-is.
pub fn lowest_vertex_world_y<'a>(
    meshes: &Assets<Mesh>,
    tiles: impl Iterator<Item = (&'a Mesh3d, &'a GlobalTransform)>,
    frame_scale_x: f32,
    shape: ExtentShape,
) -> Option<f32> {
    let mut lowest = f32::MAX;
    let mut lowest_vertex = Vec3::ZERO;
    let mut lowest_scale = 0.0_f32;
    let mut lowest_translation = Vec3::ZERO;
    let mut found = false;

    for (mesh3d, global) in tiles {
        let Some(mesh) = meshes.get(&mesh3d.0) else {
            continue;
        };
        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            continue;
        };

        let affine = global.affine();
        let scale_x = affine.matrix3.x_axis.x;
        let translation = Vec3::from(affine.translation);
        // Mesh translation expressed in the mesh's own (scaled) frame, and the
        // table half-size in that same frame.
        let offset = translation / scale_x;
        let half = frame_scale_x / (2.0 * scale_x);

        for p in positions {
            let vertex = Vec3::from_array(*p);
            if shape.scan_contains(vertex, offset, half) && vertex.y + offset.y < lowest {
                lowest = vertex.y + offset.y;
                lowest_vertex = vertex;
                lowest_scale = scale_x;
                lowest_translation = translation;
                found = true;
            }
        }
    }

    // Simplified transform of the winning vertex back to world space,
    // ignoring any rotation, matching the containment test above.
    found.then(|| (lowest_vertex * lowest_scale + lowest_translation).y)
}
