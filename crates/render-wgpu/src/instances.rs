use bytemuck::{Pod, Zeroable};
use chessboard_render::{GeometryId, Scene, SceneError};
use glam::Mat4;
use std::collections::BTreeMap;
use std::ops::Range;

/// Per-instance vertex data: model matrix columns, linear colour, surface.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct InstanceData {
    pub model_0: [f32; 4],
    pub model_1: [f32; 4],
    pub model_2: [f32; 4],
    pub model_3: [f32; 4],
    pub color: [f32; 4],
    /// x: metalness, y: roughness, z: 1.0 when the instance receives shadows.
    pub surface: [f32; 4],
}

/// One instanced draw: a geometry and its slice of the instance buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DrawBatch {
    pub geometry: GeometryId,
    pub instances: Range<u32>,
}

/// Instance buffer contents for one frame.
///
/// `data` holds the main-pass instances grouped by geometry, followed by a
/// copy of every shadow caster grouped the same way.
#[derive(Debug, Clone, Default)]
pub(crate) struct FrameInstances {
    pub data: Vec<InstanceData>,
    pub main: Vec<DrawBatch>,
    pub casters: Vec<DrawBatch>,
    /// Mesh instances dropped because the buffer was full.
    pub truncated: usize,
}

impl FrameInstances {
    pub fn main_count(&self) -> u32 {
        self.main.iter().map(|b| b.instances.len() as u32).sum()
    }

    pub fn caster_count(&self) -> u32 {
        self.casters.iter().map(|b| b.instances.len() as u32).sum()
    }
}

/// Pack every mesh in the scene into at most `capacity` instances.
pub(crate) fn collect_instances(
    scene: &Scene,
    capacity: usize,
) -> Result<FrameInstances, SceneError> {
    let mut main: BTreeMap<GeometryId, Vec<InstanceData>> = BTreeMap::new();
    let mut casters: BTreeMap<GeometryId, Vec<InstanceData>> = BTreeMap::new();
    let mut used = 0usize;
    let mut truncated = 0usize;

    for mesh in scene.mesh_instances() {
        let material = scene
            .material(mesh.material)
            .ok_or(SceneError::UnknownMaterial(mesh.material))?;
        let needed = if mesh.cast_shadow { 2 } else { 1 };
        if used + needed > capacity {
            truncated += 1;
            continue;
        }
        used += needed;

        let cols = Mat4::from_translation(mesh.position).to_cols_array_2d();
        let receive = if mesh.receive_shadow { 1.0 } else { 0.0 };
        let instance = InstanceData {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color: material.color.to_linear_rgba(),
            surface: [material.metalness, material.roughness, receive, 0.0],
        };
        main.entry(mesh.geometry).or_default().push(instance);
        if mesh.cast_shadow {
            casters.entry(mesh.geometry).or_default().push(instance);
        }
    }

    let mut frame = FrameInstances {
        truncated,
        ..Default::default()
    };
    frame.main = append_batches(&mut frame.data, main);
    frame.casters = append_batches(&mut frame.data, casters);
    Ok(frame)
}

fn append_batches(
    data: &mut Vec<InstanceData>,
    groups: BTreeMap<GeometryId, Vec<InstanceData>>,
) -> Vec<DrawBatch> {
    groups
        .into_iter()
        .map(|(geometry, instances)| {
            let start = data.len() as u32;
            data.extend(instances);
            DrawBatch {
                geometry,
                instances: start..data.len() as u32,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chessboard_common::Viewport;
    use chessboard_render::{SceneConfig, assemble};

    #[test]
    fn instance_layout_is_96_bytes() {
        assert_eq!(std::mem::size_of::<InstanceData>(), 96);
    }

    #[test]
    fn reference_scene_batches() {
        let assembled = assemble(&SceneConfig::default(), Viewport::default()).unwrap();
        let frame = collect_instances(&assembled.scene, 4096).unwrap();

        // One box batch for the tiles and one cylinder batch for the pawns.
        assert_eq!(frame.main.len(), 2);
        assert_eq!(frame.main_count(), 66);
        assert_eq!(frame.casters.len(), 1);
        assert_eq!(frame.caster_count(), 2);
        assert_eq!(frame.data.len(), 68);
        assert_eq!(frame.truncated, 0);

        // Caster batch follows the main batches in the buffer.
        assert_eq!(frame.casters[0].instances, 66..68);
    }

    #[test]
    fn tiles_receive_and_pawns_do_not() {
        let assembled = assemble(&SceneConfig::default(), Viewport::default()).unwrap();
        let frame = collect_instances(&assembled.scene, 4096).unwrap();
        let receivers = frame.data[..66]
            .iter()
            .filter(|i| i.surface[2] == 1.0)
            .count();
        assert_eq!(receivers, 64);
        for caster in &frame.data[66..] {
            assert_eq!(caster.surface[2], 0.0);
            assert_eq!(caster.model_3[1], 11.0);
        }
    }

    #[test]
    fn capacity_truncates_instances() {
        let assembled = assemble(&SceneConfig::default(), Viewport::default()).unwrap();
        let frame = collect_instances(&assembled.scene, 10).unwrap();
        assert!(frame.data.len() <= 10);
        assert!(frame.truncated > 0);
        assert_eq!(frame.main_count() as usize + frame.truncated, 66);
    }

    #[test]
    fn empty_scene_has_no_batches() {
        let frame = collect_instances(&Scene::new(), 16).unwrap();
        assert!(frame.main.is_empty());
        assert!(frame.casters.is_empty());
        assert!(frame.data.is_empty());
    }
}
