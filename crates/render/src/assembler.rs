use crate::camera::PerspectiveCamera;
use crate::config::{ConfigError, SceneConfig};
use crate::scene::{Geometry, Light, Mesh, Node, NodeId, Scene, SceneError};
use chessboard_common::Viewport;
use chessboard_layout::{
    BoardLayout, LayoutError, PiecePlaceholder, Side, TileShade, sample_placeholders,
};
use glam::Vec3;

/// Aspect ratio used until the viewport has a non-zero area.
const DEFAULT_ASPECT: f32 = 16.0 / 9.0;

/// Errors from assembling the scene.
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
}

/// The assembled scene plus the handles and value records it was built from.
///
/// The value records (`layout`, `placeholders`) are the source of truth; the
/// node handles point into `scene` and nothing points back.
#[derive(Debug)]
pub struct AssembledScene {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub layout: BoardLayout,
    pub placeholders: [PiecePlaceholder; 2],
    pub ambient: NodeId,
    pub sun: NodeId,
    pub board: NodeId,
    /// Tile nodes in layout order.
    pub tiles: Vec<NodeId>,
    /// Piece nodes in placeholder order.
    pub pieces: Vec<NodeId>,
}

/// Build lights, camera, board tiles and piece placeholders into a new scene.
pub fn assemble(config: &SceneConfig, viewport: Viewport) -> Result<AssembledScene, AssembleError> {
    config.validate()?;

    let layout = BoardLayout::generate(&config.board)?;
    let placeholders = sample_placeholders(&layout, &config.pieces.shape)?;

    let mut scene = Scene::new();

    let ambient = scene.add(Node::light(
        "ambient",
        Light::Ambient {
            color: config.ambient.color,
            intensity: config.ambient.intensity,
        },
        Vec3::ZERO,
    ))?;
    let sun = scene.add(Node::light(
        "sun",
        Light::Directional {
            color: config.directional.color,
            intensity: config.directional.intensity,
            target: config.directional.target,
            cast_shadow: config.directional.cast_shadow,
        },
        config.directional.position,
    ))?;

    let spec = layout.spec();
    let tile_geometry = scene.add_geometry(Geometry::Box {
        width: spec.tile_size,
        height: spec.tile_thickness,
        depth: spec.tile_size,
    });
    let light_tile = scene.add_material(config.tiles.light);
    let dark_tile = scene.add_material(config.tiles.dark);

    let board = scene.add(Node::group("board"))?;
    let mut tiles = Vec::with_capacity(layout.len());
    for tile in layout.tiles() {
        let material = match tile.shade {
            TileShade::Light => light_tile,
            TileShade::Dark => dark_tile,
        };
        let id = scene.add_child(
            board,
            Node::mesh(
                format!("tile {}", tile.square_name()),
                Mesh::new(tile_geometry, material).receiving_shadow(),
                tile.position,
            ),
        )?;
        tiles.push(id);
    }

    let shape = config.pieces.shape;
    let piece_geometry = scene.add_geometry(Geometry::Cylinder {
        radius_top: shape.radius_top,
        radius_bottom: shape.radius_bottom,
        height: shape.height,
        radial_segments: shape.radial_segments,
    });
    let light_piece = scene.add_material(config.pieces.light);
    let dark_piece = scene.add_material(config.pieces.dark);

    let mut pieces = Vec::with_capacity(placeholders.len());
    for piece in &placeholders {
        let (name, material) = match piece.side {
            Side::Light => ("light pawn", light_piece),
            Side::Dark => ("dark pawn", dark_piece),
        };
        let id = scene.add(Node::mesh(
            name,
            Mesh::new(piece_geometry, material).casting_shadow(),
            piece.position,
        ))?;
        pieces.push(id);
    }

    let cam = &config.camera;
    let mut camera = PerspectiveCamera::new(cam.fov_degrees, DEFAULT_ASPECT, cam.near, cam.far)
        .looking_at(cam.position, cam.target);
    // A minimised window reports 0x0; keep the default aspect until a real size arrives.
    if !viewport.is_empty() {
        camera.set_aspect(viewport);
    }

    tracing::info!(
        tiles = tiles.len(),
        pieces = pieces.len(),
        nodes = scene.node_count(),
        "scene assembled"
    );

    Ok(AssembledScene {
        scene,
        camera,
        layout,
        placeholders,
        ambient,
        sun,
        board,
        tiles,
        pieces,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Light, NodeKind};

    fn reference() -> AssembledScene {
        assemble(&SceneConfig::default(), Viewport::new(1280, 720)).unwrap()
    }

    #[test]
    fn counts() {
        let assembled = reference();
        assert_eq!(assembled.tiles.len(), 64);
        assert_eq!(assembled.pieces.len(), 2);
        assert_eq!(assembled.scene.children(assembled.board).len(), 64);
        assert_eq!(assembled.scene.mesh_instances().len(), 66);
        assert_eq!(assembled.scene.lights().len(), 2);
        // 2 lights + board group + 64 tiles + 2 pieces
        assert_eq!(assembled.scene.node_count(), 69);
    }

    #[test]
    fn tiles_receive_and_pieces_cast() {
        let assembled = reference();
        let scene = &assembled.scene;
        for id in &assembled.tiles {
            let Some(NodeKind::Mesh(mesh)) = scene.get(*id).map(|n| n.kind) else {
                panic!("tile is not a mesh");
            };
            assert!(mesh.receive_shadow);
            assert!(!mesh.cast_shadow);
        }
        for id in &assembled.pieces {
            let Some(NodeKind::Mesh(mesh)) = scene.get(*id).map(|n| n.kind) else {
                panic!("piece is not a mesh");
            };
            assert!(mesh.cast_shadow);
            assert!(!mesh.receive_shadow);
        }
    }

    #[test]
    fn tile_nodes_mirror_layout() {
        let assembled = reference();
        let scene = &assembled.scene;
        for (tile, id) in assembled.layout.tiles().iter().zip(&assembled.tiles) {
            assert_eq!(scene.world_position(*id), Some(tile.position));
            let Some(NodeKind::Mesh(mesh)) = scene.get(*id).map(|n| n.kind) else {
                panic!("tile is not a mesh");
            };
            let color = scene.material(mesh.material).unwrap().color.hex();
            let expected = match tile.shade {
                TileShade::Light => 0xffffff,
                TileShade::Dark => 0x444444,
            };
            assert_eq!(color, expected);
        }
        assert_eq!(
            scene.get(assembled.tiles[0]).unwrap().name,
            "tile a1"
        );
    }

    #[test]
    fn pieces_have_distinct_materials_and_shared_geometry() {
        let assembled = reference();
        let scene = &assembled.scene;
        let meshes: Vec<Mesh> = assembled
            .pieces
            .iter()
            .map(|id| match scene.get(*id).map(|n| n.kind) {
                Some(NodeKind::Mesh(mesh)) => mesh,
                other => panic!("unexpected node {other:?}"),
            })
            .collect();
        assert_eq!(meshes[0].geometry, meshes[1].geometry);
        assert_ne!(meshes[0].material, meshes[1].material);

        let light = scene.material(meshes[0].material).unwrap();
        let dark = scene.material(meshes[1].material).unwrap();
        assert_ne!(light.color, dark.color);
        assert_eq!(light.metalness, 0.6);
        assert_eq!(dark.roughness, 0.4);

        assert_eq!(
            scene.world_position(assembled.pieces[0]),
            Some(Vec3::new(-87.5, 11.0, -12.5))
        );
        assert_eq!(
            scene.world_position(assembled.pieces[1]),
            Some(Vec3::new(62.5, 11.0, 62.5))
        );
    }

    #[test]
    fn lights_and_camera() {
        let assembled = reference();
        let scene = &assembled.scene;
        match scene.get(assembled.ambient).map(|n| n.kind) {
            Some(NodeKind::Light(Light::Ambient { intensity, .. })) => assert_eq!(intensity, 0.6),
            other => panic!("unexpected ambient node {other:?}"),
        }
        match scene.get(assembled.sun).map(|n| n.kind) {
            Some(NodeKind::Light(Light::Directional {
                intensity,
                cast_shadow,
                ..
            })) => {
                assert_eq!(intensity, 0.8);
                assert!(cast_shadow);
            }
            other => panic!("unexpected sun node {other:?}"),
        }
        assert_eq!(
            scene.world_position(assembled.sun),
            Some(Vec3::new(100.0, 200.0, 100.0))
        );

        let camera = assembled.camera;
        assert_eq!(camera.aspect(), 1280.0 / 720.0);
        assert_eq!(camera.position(), Vec3::new(0.0, 200.0, 300.0));
        assert_eq!(camera.target(), Vec3::ZERO);
        assert_eq!(camera.near(), 0.1);
        assert_eq!(camera.far(), 1000.0);
    }

    #[test]
    fn empty_viewport_keeps_default_aspect() {
        let assembled = assemble(&SceneConfig::default(), Viewport::new(0, 720)).unwrap();
        assert_eq!(assembled.camera.aspect(), 16.0 / 9.0);
        assert!(assembled.camera.view_projection().is_finite());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = SceneConfig::default();
        config.board.dimension = 4;
        assert!(matches!(
            assemble(&config, Viewport::default()),
            Err(AssembleError::Layout(LayoutError::SquareOutOfBounds { .. }))
        ));

        let mut config = SceneConfig::default();
        config.camera.far = 0.01;
        assert!(matches!(
            assemble(&config, Viewport::default()),
            Err(AssembleError::Config(_))
        ));
    }
}
