//! Scene graph.
//!
//! The scene is an ordered list of nodes. Render order follows insertion
//! order, lights are gathered into the light uniform, and the rect-area light
//! helper refers back to the light it visualises through its [`NodeId`].

use cgmath::{Matrix4, Point3, Rad, Vector3};

use crate::{
    config::{DirectionalLightConfig, RectAreaLightConfig},
    data_structures::instance::Instance,
    state::TextureSlot,
};

/// Handle to a node, the index it was inserted at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Position, Euler rotation (applied x, then y, then z) and scale of a node.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: [Rad<f32>; 3],
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn to_matrix(&self) -> Matrix4<f32> {
        let [x, y, z] = self.rotation;
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(x)
            * Matrix4::from_angle_y(y)
            * Matrix4::from_angle_z(z)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn to_instance(&self) -> Instance {
        let [x, y, z] = self.rotation;
        Instance {
            position: self.position,
            rotation: cgmath::Quaternion::from(cgmath::Matrix3::from_angle_x(x))
                * cgmath::Quaternion::from(cgmath::Matrix3::from_angle_y(y))
                * cgmath::Quaternion::from(cgmath::Matrix3::from_angle_z(z)),
            scale: self.scale,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: [Rad(0.0); 3],
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// The textured box. `size` is the full width, height and depth of its geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Cube {
    pub size: [f32; 3],
    pub transform: Transform,
    pub texture: TextureSlot,
}

impl Cube {
    pub fn new(size: [f32; 3], texture: TextureSlot) -> Self {
        Self {
            size,
            transform: Transform::default(),
            texture,
        }
    }

    pub fn half_extents(&self) -> Vector3<f32> {
        Vector3::new(self.size[0], self.size[1], self.size[2]) / 2.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Point3<f32>,
    pub target: Point3<f32>,
}

impl DirectionalLight {
    /// Direction the light travels in.
    pub fn direction(&self) -> Vector3<f32> {
        use cgmath::InnerSpace;
        (self.target - self.position).normalize()
    }
}

impl From<&DirectionalLightConfig> for DirectionalLight {
    fn from(config: &DirectionalLightConfig) -> Self {
        Self {
            color: config.color,
            intensity: config.intensity,
            position: config.position.into(),
            target: config.target.into(),
        }
    }
}

/// Planar light emitting along its local -Z from a `width` x `height` rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct RectAreaLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub width: f32,
    pub height: f32,
    pub position: Point3<f32>,
}

impl RectAreaLight {
    /// Corners in world space, counter-clockwise when seen from the lit side.
    pub fn corners(&self) -> [Point3<f32>; 4] {
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        let p = self.position;
        [
            Point3::new(p.x + hw, p.y - hh, p.z),
            Point3::new(p.x - hw, p.y - hh, p.z),
            Point3::new(p.x - hw, p.y + hh, p.z),
            Point3::new(p.x + hw, p.y + hh, p.z),
        ]
    }
}

impl From<&RectAreaLightConfig> for RectAreaLight {
    fn from(config: &RectAreaLightConfig) -> Self {
        Self {
            color: config.color,
            intensity: config.intensity,
            width: config.width,
            height: config.height,
            position: config.position.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneNode {
    Mesh(Cube),
    DirectionalLight(DirectionalLight),
    RectAreaLight(RectAreaLight),
    RectAreaLightHelper { light: NodeId },
    TransformGizmo,
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: SceneNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&SceneNode) -> bool) -> usize {
        self.nodes.iter().filter(|node| predicate(node)).count()
    }

    pub fn cube(&self, id: NodeId) -> Option<&Cube> {
        match self.nodes.get(id.0) {
            Some(SceneNode::Mesh(cube)) => Some(cube),
            _ => None,
        }
    }

    pub fn cube_mut(&mut self, id: NodeId) -> Option<&mut Cube> {
        match self.nodes.get_mut(id.0) {
            Some(SceneNode::Mesh(cube)) => Some(cube),
            _ => None,
        }
    }

    pub fn directional_light(&self, id: NodeId) -> Option<&DirectionalLight> {
        match self.nodes.get(id.0) {
            Some(SceneNode::DirectionalLight(light)) => Some(light),
            _ => None,
        }
    }

    pub fn directional_light_mut(&mut self, id: NodeId) -> Option<&mut DirectionalLight> {
        match self.nodes.get_mut(id.0) {
            Some(SceneNode::DirectionalLight(light)) => Some(light),
            _ => None,
        }
    }

    pub fn rect_area_light(&self, id: NodeId) -> Option<&RectAreaLight> {
        match self.nodes.get(id.0) {
            Some(SceneNode::RectAreaLight(light)) => Some(light),
            _ => None,
        }
    }
}
