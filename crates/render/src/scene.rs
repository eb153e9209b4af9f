use chessboard_common::Color;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SCENE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a scene. Backends key their GPU caches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId(u64);

/// Handle to a node in a [`Scene`]. Never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

/// Handle to a shared geometry registered with a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(u32);

/// Handle to a shared material registered with a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(u32);

impl GeometryId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl MaterialId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Errors from scene graph operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("unknown geometry {0:?}")]
    UnknownGeometry(GeometryId),
    #[error("unknown material {0:?}")]
    UnknownMaterial(MaterialId),
    #[error("node {0:?} is not a group and cannot hold children")]
    NotAGroup(NodeId),
}

/// Geometry primitives, centred on their local origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    /// Upright cylinder along +Y, capped at both ends.
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
}

/// Surface description: base colour plus metalness/roughness reflectance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub color: Color,
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            metalness: 0.0,
            roughness: 1.0,
        }
    }
}

impl Material {
    pub fn with_color(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Uniform fill that reaches every surface.
    Ambient { color: Color, intensity: f32 },
    /// Parallel rays travelling from the node position towards `target`.
    Directional {
        color: Color,
        intensity: f32,
        target: Vec3,
        cast_shadow: bool,
    },
}

/// A drawable instance of a shared geometry and material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mesh {
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Mesh {
    pub fn new(geometry: GeometryId, material: MaterialId) -> Self {
        Self {
            geometry,
            material,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    pub fn casting_shadow(mut self) -> Self {
        self.cast_shadow = true;
        self
    }

    pub fn receiving_shadow(mut self) -> Self {
        self.receive_shadow = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    Group,
    Mesh(Mesh),
    Light(Light),
}

/// A scene graph node. `position` is relative to the parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub position: Vec3,
    pub kind: NodeKind,
}

impl Node {
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::ZERO,
            kind: NodeKind::Group,
        }
    }

    pub fn mesh(name: impl Into<String>, mesh: Mesh, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            kind: NodeKind::Mesh(mesh),
        }
    }

    pub fn light(name: impl Into<String>, light: Light, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            kind: NodeKind::Light(light),
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    node: Node,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A flattened mesh ready for drawing, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshInstance {
    pub node: NodeId,
    pub position: Vec3,
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

/// A flattened light in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightInstance {
    pub node: NodeId,
    pub position: Vec3,
    pub light: Light,
}

/// Hierarchical container of groups, meshes and lights.
///
/// Nodes live in an arena addressed by [`NodeId`]. Geometries and materials
/// are registered once and shared by handle. Traversal is depth-first in
/// insertion order, so flattening is deterministic.
#[derive(Debug)]
pub struct Scene {
    id: SceneId,
    geometries: Vec<Geometry>,
    materials: Vec<Material>,
    slots: Vec<Option<Slot>>,
    roots: Vec<NodeId>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            id: SceneId(NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed)),
            geometries: Vec::new(),
            materials: Vec::new(),
            slots: Vec::new(),
            roots: Vec::new(),
        }
    }

    pub fn id(&self) -> SceneId {
        self.id
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.geometries.push(geometry);
        GeometryId(self.geometries.len() as u32 - 1)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() as u32 - 1)
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(id.index())
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.index())
    }

    /// All registered geometries in registration order.
    pub fn geometries(&self) -> impl Iterator<Item = (GeometryId, &Geometry)> + '_ {
        self.geometries
            .iter()
            .enumerate()
            .map(|(i, g)| (GeometryId(i as u32), g))
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Add a node at the top level.
    pub fn add(&mut self, node: Node) -> Result<NodeId, SceneError> {
        self.insert(None, node)
    }

    /// Add a node under an existing group.
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> Result<NodeId, SceneError> {
        let kind = self
            .get(parent)
            .map(|p| p.kind)
            .ok_or(SceneError::UnknownNode(parent))?;
        if kind != NodeKind::Group {
            return Err(SceneError::NotAGroup(parent));
        }
        self.insert(Some(parent), node)
    }

    fn insert(&mut self, parent: Option<NodeId>, node: Node) -> Result<NodeId, SceneError> {
        if let NodeKind::Mesh(mesh) = &node.kind {
            if self.geometry(mesh.geometry).is_none() {
                return Err(SceneError::UnknownGeometry(mesh.geometry));
            }
            if self.material(mesh.material).is_none() {
                return Err(SceneError::UnknownMaterial(mesh.material));
            }
        }

        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Some(Slot {
            node,
            parent,
            children: Vec::new(),
        }));
        match parent {
            Some(p) => {
                if let Some(slot) = self.slot_mut(p) {
                    slot.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        Ok(id)
    }

    /// Remove a node and its whole subtree. Returns how many nodes were removed.
    pub fn remove(&mut self, id: NodeId) -> Result<usize, SceneError> {
        let parent = self
            .slot(id)
            .ok_or(SceneError::UnknownNode(id))?
            .parent;

        match parent {
            Some(p) => {
                if let Some(slot) = self.slot_mut(p) {
                    slot.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(slot) = self.slots.get_mut(next.0 as usize).and_then(Option::take) {
                stack.extend(slot.children);
                removed += 1;
            }
        }
        Ok(removed)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slot(id).map(|s| &s.node)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).and_then(|s| s.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slot(id).map(|s| s.children.as_slice()).unwrap_or(&[])
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Position of a node with all ancestor offsets applied.
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        let mut slot = self.slot(id)?;
        let mut position = slot.node.position;
        while let Some(parent) = slot.parent {
            slot = self.slot(parent)?;
            position += slot.node.position;
        }
        Some(position)
    }

    /// Every mesh in depth-first order with world positions resolved.
    pub fn mesh_instances(&self) -> Vec<MeshInstance> {
        let mut out = Vec::new();
        self.walk(|id, node, position| {
            if let NodeKind::Mesh(mesh) = node.kind {
                out.push(MeshInstance {
                    node: id,
                    position,
                    geometry: mesh.geometry,
                    material: mesh.material,
                    cast_shadow: mesh.cast_shadow,
                    receive_shadow: mesh.receive_shadow,
                });
            }
        });
        out
    }

    /// Every light in depth-first order with world positions resolved.
    pub fn lights(&self) -> Vec<LightInstance> {
        let mut out = Vec::new();
        self.walk(|id, node, position| {
            if let NodeKind::Light(light) = node.kind {
                out.push(LightInstance {
                    node: id,
                    position,
                    light,
                });
            }
        });
        out
    }

    fn walk(&self, mut visit: impl FnMut(NodeId, &Node, Vec3)) {
        let mut stack: Vec<(NodeId, Vec3)> =
            self.roots.iter().rev().map(|r| (*r, Vec3::ZERO)).collect();
        while let Some((id, origin)) = stack.pop() {
            let Some(slot) = self.slot(id) else {
                continue;
            };
            let position = origin + slot.node.position;
            visit(id, &slot.node, position);
            stack.extend(slot.children.iter().rev().map(|c| (*c, position)));
        }
    }

    fn slot(&self, id: NodeId) -> Option<&Slot> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot> {
        self.slots.get_mut(id.0 as usize).and_then(Option::as_mut)
    }
}
