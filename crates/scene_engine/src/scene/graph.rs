//! Scene tree
//!
//! Nodes live in a slot map owned by [`Scene`] and refer to each other by
//! [`NodeId`]. A node is either a group, which only holds children, or a
//! [`Component`] leaf. Transformations, save/reset and lighting applied to a
//! group reach every component below it.

use super::component::Component;
use crate::assets::ObjError;
use crate::foundation::math::{Mat4, Vec3};
use crate::render::lighting::{Lighting, PointLight};
use crate::render::{GraphicsApi, RenderError, ShaderError, ShaderProgram, TextureError};
use slotmap::{new_key_type, SlotMap};
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

new_key_type! {
    /// Handle to a node in a [`Scene`]
    pub struct NodeId;
}

/// Scene errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// The id was never issued or its node was destroyed
    #[error("Node {0:?} does not exist")]
    NodeNotFound(NodeId),

    /// Operation needs a group
    #[error("Node {0:?} is a component and cannot have children")]
    NotAGroup(NodeId),

    /// Operation needs a component
    #[error("Node {0:?} is a group, not a component")]
    NotAComponent(NodeId),

    /// Attaching would make a node its own ancestor
    #[error("Attaching {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// Would-be parent
        parent: NodeId,
        /// Would-be child
        child: NodeId,
    },

    /// `remove_component` on a node that is not a direct child
    #[error("Node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Claimed parent
        parent: NodeId,
        /// Claimed child
        child: NodeId,
    },

    /// Attribute data with the wrong length
    #[error("Invalid vertex data: {0}")]
    InvalidVertexData(String),

    /// GPU object creation failed
    #[error(transparent)]
    Render(#[from] RenderError),

    /// OBJ file could not be loaded
    #[error("Failed to load mesh: {0}")]
    Mesh(#[from] ObjError),

    /// Texture could not be loaded
    #[error(transparent)]
    Texture(#[from] TextureError),

    /// Shader could not be built
    #[error(transparent)]
    Shader(#[from] ShaderError),
}

/// Result type for scene operations
pub type SceneResult<T> = Result<T, SceneError>;

/// What a node is
pub enum NodeKind {
    /// Container whose operations fan out to its children
    Group,
    /// Drawable leaf
    Component(Box<Component>),
}

/// One entry of the scene tree
pub struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    lighting: Lighting,
    shader: Option<Rc<ShaderProgram>>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            lighting: Lighting::default(),
            shader: None,
        }
    }

    /// Group or component
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Whether this node is a group
    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group)
    }

    /// The component, for component nodes
    pub fn component(&self) -> Option<&Component> {
        match &self.kind {
            NodeKind::Component(component) => Some(&**component),
            NodeKind::Group => None,
        }
    }

    fn component_mut(&mut self) -> Option<&mut Component> {
        match &mut self.kind {
            NodeKind::Component(component) => Some(&mut **component),
            NodeKind::Group => None,
        }
    }

    /// Owning group, `None` for roots
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in attachment order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Lighting this node renders with
    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    /// Shader this node renders with
    pub fn shader(&self) -> Option<&Rc<ShaderProgram>> {
        self.shader.as_ref()
    }
}

/// Owner of every node
///
/// Nodes without a parent are roots; [`Scene::render_roots`] draws them in
/// creation or detach order.
pub struct Scene {
    api: Rc<dyn GraphicsApi>,
    nodes: SlotMap<NodeId, Node>,
    roots: Vec<NodeId>,
}

impl Scene {
    /// Empty scene drawing through `api`
    pub fn new(api: Rc<dyn GraphicsApi>) -> Self {
        Self {
            api,
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
        }
    }

    /// The graphics API components are created with
    pub fn api(&self) -> Rc<dyn GraphicsApi> {
        Rc::clone(&self.api)
    }

    /// New, empty root group
    pub fn create_group(&mut self) -> NodeId {
        self.insert(Node::new(NodeKind::Group))
    }

    /// New root component without geometry
    pub fn create_component(&mut self) -> NodeId {
        let component = Component::new(Rc::clone(&self.api));
        self.insert(Node::new(NodeKind::Component(Box::new(component))))
    }

    fn insert(&mut self, node: Node) -> NodeId {
        let id = self.nodes.insert(node);
        self.roots.push(id);
        id
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    fn node_or_err(&self, id: NodeId) -> SceneResult<&Node> {
        self.nodes.get(id).ok_or(SceneError::NodeNotFound(id))
    }

    /// Nodes without a parent, in the order they became roots
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Component stored at `id`
    pub fn component(&self, id: NodeId) -> Option<&Component> {
        self.nodes.get(id).and_then(Node::component)
    }

    /// Mutable component stored at `id`
    pub fn component_mut(&mut self, id: NodeId) -> Option<&mut Component> {
        self.nodes.get_mut(id).and_then(Node::component_mut)
    }

    /// Like [`Scene::component_mut`] but says why it failed
    pub fn try_component_mut(&mut self, id: NodeId) -> SceneResult<&mut Component> {
        let node = self.nodes.get_mut(id).ok_or(SceneError::NodeNotFound(id))?;
        node.component_mut().ok_or(SceneError::NotAComponent(id))
    }

    /// `id` followed by all its descendants, depth first, children in order
    pub fn subtree(&self, id: NodeId) -> SceneResult<Vec<NodeId>> {
        self.node_or_err(id)?;
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            order.push(next);
            if let Some(node) = self.nodes.get(next) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        Ok(order)
    }

    fn for_each_component(&mut self, id: NodeId, mut f: impl FnMut(&mut Component)) -> SceneResult<()> {
        for node_id in self.subtree(id)? {
            if let Some(component) = self.component_mut(node_id) {
                f(component);
            }
        }
        Ok(())
    }

    fn for_each_node(&mut self, id: NodeId, mut f: impl FnMut(&mut Node)) -> SceneResult<()> {
        for node_id in self.subtree(id)? {
            if let Some(node) = self.nodes.get_mut(node_id) {
                f(node);
            }
        }
        Ok(())
    }

    /// Render `node` (and, for groups, every descendant) with `shader`
    pub fn set_shader(&mut self, node: NodeId, shader: Rc<ShaderProgram>) -> SceneResult<()> {
        self.for_each_node(node, |n| n.shader = Some(Rc::clone(&shader)))
    }

    /// Build a shader from files and apply it as [`Scene::set_shader`] does
    pub fn set_shader_files<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        node: NodeId,
        vertex_path: P,
        fragment_path: Q,
    ) -> SceneResult<()> {
        self.node_or_err(node)?;
        let shader = ShaderProgram::from_files(Rc::clone(&self.api), vertex_path, fragment_path)?;
        self.set_shader(node, shader)
    }

    /// Shader `node` renders with
    pub fn shader(&self, node: NodeId) -> Option<Rc<ShaderProgram>> {
        self.nodes.get(node).and_then(|n| n.shader.clone())
    }

    /// Attach `child` under the group `parent`
    ///
    /// The child is detached from its previous parent first. Its whole
    /// subtree takes over the parent's ambient colour and point sources, and
    /// nodes without a shader pick up the parent's.
    pub fn add_component(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        let parent_node = self.node_or_err(parent)?;
        if !parent_node.is_group() {
            return Err(SceneError::NotAGroup(parent));
        }
        self.node_or_err(child)?;
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }

        self.detach(child);
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(child);
        }
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
        }

        let (lighting, shader) = match self.nodes.get(parent) {
            Some(p) => (p.lighting.clone(), p.shader.clone()),
            None => return Err(SceneError::NodeNotFound(parent)),
        };
        self.for_each_node(child, |n| {
            n.lighting = lighting.clone();
            if n.shader.is_none() {
                n.shader = shader.clone();
            }
        })?;

        log::trace!("Attached {:?} under {:?}", child, parent);
        Ok(())
    }

    /// Attach several children in order
    pub fn add_components<I>(&mut self, parent: NodeId, children: I) -> SceneResult<()>
    where
        I: IntoIterator<Item = NodeId>,
    {
        for child in children {
            self.add_component(parent, child)?;
        }
        Ok(())
    }

    /// Detach `child` from `parent`; it becomes a root and keeps its state
    pub fn remove_component(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        self.node_or_err(parent)?;
        if self.node_or_err(child)?.parent != Some(parent) {
            return Err(SceneError::NotAChild { parent, child });
        }
        self.detach(child);
        self.roots.push(child);
        Ok(())
    }

    /// Remove `node` and its subtree, releasing their GPU resources
    pub fn destroy(&mut self, node: NodeId) -> SceneResult<()> {
        let doomed = self.subtree(node)?;
        self.detach(node);
        for id in doomed {
            self.nodes.remove(id);
        }
        Ok(())
    }

    fn detach(&mut self, child: NodeId) {
        let old_parent = self.nodes.get_mut(child).and_then(|n| n.parent.take());
        match old_parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(parent) => parent.children.retain(|&c| c != child),
            None => self.roots.retain(|&r| r != child),
        }
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == candidate {
                return true;
            }
            match self.nodes.get(node).and_then(|n| n.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    /// Pre-multiply `t` onto every component's model matrix (world space)
    pub fn update_model(&mut self, node: NodeId, t: &Mat4) -> SceneResult<()> {
        self.for_each_component(node, |c| c.update_model(t))
    }

    /// Post-multiply `t` onto every component's model matrix (own frame)
    pub fn apply_fp_transformation(&mut self, node: NodeId, t: &Mat4) -> SceneResult<()> {
        self.for_each_component(node, |c| c.apply_fp_transformation(t))
    }

    /// Overwrite every component's model matrix
    pub fn set_model(&mut self, node: NodeId, m: &Mat4) -> SceneResult<()> {
        self.for_each_component(node, |c| c.set_model(*m))
    }

    /// Snapshot every component's model matrix
    pub fn save(&mut self, node: NodeId) -> SceneResult<()> {
        self.for_each_component(node, Component::save)
    }

    /// Restore every component's last snapshot
    pub fn reset(&mut self, node: NodeId) -> SceneResult<()> {
        self.for_each_component(node, Component::reset)
    }

    /// Restore every component's initial placement
    pub fn reset_to_initial(&mut self, node: NodeId) -> SceneResult<()> {
        self.for_each_component(node, Component::reset_to_initial)
    }

    /// Set the ambient colour of `node` and its descendants
    pub fn set_ambient_light_colour(&mut self, node: NodeId, colour: Vec3) -> SceneResult<()> {
        self.for_each_node(node, |n| n.lighting.ambient_colour = colour)
    }

    /// Ambient colour `node` renders with
    pub fn ambient_light_colour(&self, node: NodeId) -> SceneResult<Vec3> {
        Ok(self.node_or_err(node)?.lighting.ambient_colour)
    }

    /// Add a point light to `node` and its descendants
    pub fn add_point_source(&mut self, node: NodeId, location: Vec3, colour: Vec3, power: f32) -> SceneResult<()> {
        let light = PointLight::new(location, colour, power);
        self.for_each_node(node, |n| n.lighting.add_point_source(light))
    }

    /// Lighting `node` renders with
    pub fn lighting(&self, node: NodeId) -> SceneResult<&Lighting> {
        Ok(&self.node_or_err(node)?.lighting)
    }

    /// Point light locations of `node`
    pub fn point_source_locations(&self, node: NodeId) -> SceneResult<Vec<Vec3>> {
        Ok(self.lighting(node)?.point_source_locations())
    }

    /// Point light colours of `node`
    pub fn point_source_colours(&self, node: NodeId) -> SceneResult<Vec<Vec3>> {
        Ok(self.lighting(node)?.point_source_colours())
    }

    /// Point light powers of `node`
    pub fn point_source_powers(&self, node: NodeId) -> SceneResult<Vec<f32>> {
        Ok(self.lighting(node)?.point_source_powers())
    }

    /// World position of a component
    pub fn location(&self, node: NodeId) -> SceneResult<Vec3> {
        let n = self.node_or_err(node)?;
        n.component()
            .map(Component::location)
            .ok_or(SceneError::NotAComponent(node))
    }

    /// Draw `node` and its descendants; returns the number of draw calls
    ///
    /// Components without a shader or without vertices are skipped with a
    /// warning.
    pub fn render(&self, node: NodeId, view: &Mat4, projection: &Mat4) -> SceneResult<usize> {
        let mut drawn = 0;
        for id in self.subtree(node)? {
            let Some(n) = self.nodes.get(id) else { continue };
            let Some(component) = n.component() else { continue };
            match &n.shader {
                Some(shader) => {
                    if component.render(shader, view, projection, &n.lighting) {
                        drawn += 1;
                    }
                }
                None => log::warn!("Skipping component {:?} without a shader", id),
            }
        }
        Ok(drawn)
    }

    /// Draw every root in order
    pub fn render_roots(&self, view: &Mat4, projection: &Mat4) -> usize {
        self.roots
            .iter()
            .filter_map(|&root| self.render(root, view, projection).ok())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat4Ext;
    use crate::render::headless::{GlCall, HeadlessApi};
    use crate::render::MeshData;
    use approx::assert_relative_eq;

    fn scene() -> (Rc<HeadlessApi>, Scene) {
        let api = Rc::new(HeadlessApi::new());
        let scene = Scene::new(api.clone());
        (api, scene)
    }

    fn cube(scene: &mut Scene) -> NodeId {
        let id = scene.create_component();
        scene.try_component_mut(id).unwrap().set_mesh(&MeshData::cube()).unwrap();
        id
    }

    #[test]
    fn test_new_nodes_are_roots() {
        let (_, mut scene) = scene();
        let group = scene.create_group();
        let leaf = scene.create_component();
        assert_eq!(scene.roots(), &[group, leaf]);
        assert_eq!(scene.len(), 2);
        assert!(scene.node(group).unwrap().is_group());
    }

    #[test]
    fn test_attach_moves_child_between_parents() {
        let (_, mut scene) = scene();
        let a = scene.create_group();
        let b = scene.create_group();
        let leaf = scene.create_component();

        scene.add_component(a, leaf).unwrap();
        assert_eq!(scene.roots(), &[a, b]);
        scene.add_component(b, leaf).unwrap();

        assert!(scene.node(a).unwrap().children().is_empty());
        assert_eq!(scene.node(b).unwrap().children(), &[leaf]);
        assert_eq!(scene.node(leaf).unwrap().parent(), Some(b));
    }

    #[test]
    fn test_components_cannot_have_children() {
        let (_, mut scene) = scene();
        let leaf = scene.create_component();
        let other = scene.create_component();
        assert!(matches!(scene.add_component(leaf, other), Err(SceneError::NotAGroup(_))));
    }

    #[test]
    fn test_cycles_are_rejected() {
        let (_, mut scene) = scene();
        let outer = scene.create_group();
        let inner = scene.create_group();
        scene.add_component(outer, inner).unwrap();

        assert!(matches!(scene.add_component(inner, outer), Err(SceneError::Cycle { .. })));
        assert!(matches!(scene.add_component(outer, outer), Err(SceneError::Cycle { .. })));
    }

    #[test]
    fn test_attach_inherits_lighting_and_shader() {
        let (api, mut scene) = scene();
        let group = scene.create_group();
        let shader = ShaderProgram::colour_shader(api.clone()).unwrap();
        scene.set_shader(group, Rc::clone(&shader)).unwrap();
        scene.set_ambient_light_colour(group, Vec3::new(0.2, 0.2, 0.2)).unwrap();
        scene.add_point_source(group, Vec3::new(4.0, 4.0, 4.0), Vec3::new(1.0, 1.0, 1.0), 50.0).unwrap();

        let sub = scene.create_group();
        let leaf = scene.create_component();
        scene.add_point_source(leaf, Vec3::zeros(), Vec3::zeros(), 1.0).unwrap();
        scene.add_component(sub, leaf).unwrap();
        scene.add_component(group, sub).unwrap();

        assert_eq!(scene.ambient_light_colour(leaf).unwrap(), Vec3::new(0.2, 0.2, 0.2));
        assert_eq!(scene.point_source_locations(leaf).unwrap(), vec![Vec3::new(4.0, 4.0, 4.0)]);
        assert_eq!(scene.point_source_powers(leaf).unwrap(), vec![50.0]);
        assert!(Rc::ptr_eq(&scene.shader(leaf).unwrap(), &shader));
    }

    #[test]
    fn test_group_setters_propagate() {
        let (api, mut scene) = scene();
        let group = scene.create_group();
        let leaves = [scene.create_component(), scene.create_component()];
        scene.add_components(group, leaves).unwrap();

        scene.set_ambient_light_colour(group, Vec3::new(0.3, 0.0, 0.0)).unwrap();
        scene.add_point_source(group, Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 1.0, 0.0), 7.0).unwrap();
        let shader = ShaderProgram::texture_shader(api.clone()).unwrap();
        scene.set_shader(group, Rc::clone(&shader)).unwrap();

        for leaf in leaves {
            assert_eq!(scene.ambient_light_colour(leaf).unwrap(), Vec3::new(0.3, 0.0, 0.0));
            assert_eq!(scene.point_source_colours(leaf).unwrap(), vec![Vec3::new(0.0, 1.0, 0.0)]);
            assert!(Rc::ptr_eq(&scene.shader(leaf).unwrap(), &shader));
        }
    }

    #[test]
    fn test_group_transform_reaches_every_component() {
        let (_, mut scene) = scene();
        let group = scene.create_group();
        let a = cube(&mut scene);
        let b = cube(&mut scene);
        scene.try_component_mut(b).unwrap().set_init_model(Mat4::translation(Vec3::new(5.0, 0.0, 0.0)));
        scene.add_components(group, [a, b]).unwrap();

        scene.update_model(group, &Mat4::translation(Vec3::new(0.0, 1.0, 0.0))).unwrap();
        assert_relative_eq!(scene.location(a).unwrap(), Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(scene.location(b).unwrap(), Vec3::new(5.0, 1.0, 0.0));
        assert!(matches!(scene.location(group), Err(SceneError::NotAComponent(_))));
    }

    #[test]
    fn test_fp_transformation_on_group() {
        let (_, mut scene) = scene();
        let group = scene.create_group();
        let a = cube(&mut scene);
        scene.try_component_mut(a).unwrap().set_init_model(Mat4::translation(Vec3::new(3.0, 0.0, 0.0)));
        scene.add_component(group, a).unwrap();

        scene.apply_fp_transformation(group, &Mat4::rotation_y(1.0)).unwrap();
        // Rotation in the component's own frame keeps it in place
        assert_relative_eq!(scene.location(a).unwrap(), Vec3::new(3.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_save_and_reset_recurse() {
        let (_, mut scene) = scene();
        let outer = scene.create_group();
        let inner = scene.create_group();
        let a = cube(&mut scene);
        scene.add_component(inner, a).unwrap();
        scene.add_component(outer, inner).unwrap();

        let step = Mat4::translation(Vec3::new(1.0, 0.0, 0.0));
        scene.update_model(outer, &step).unwrap();
        scene.save(outer).unwrap();
        scene.update_model(outer, &step).unwrap();
        assert_relative_eq!(scene.location(a).unwrap(), Vec3::new(2.0, 0.0, 0.0));

        scene.reset(outer).unwrap();
        assert_relative_eq!(scene.location(a).unwrap(), Vec3::new(1.0, 0.0, 0.0));
        scene.reset_to_initial(outer).unwrap();
        assert_relative_eq!(scene.location(a).unwrap(), Vec3::zeros());
    }

    #[test]
    fn test_render_is_depth_first_in_attachment_order() {
        let (api, mut scene) = scene();
        let shader = ShaderProgram::colour_shader(api.clone()).unwrap();
        let root = scene.create_group();
        let sub = scene.create_group();
        let first = cube(&mut scene);
        let second = scene.create_component();
        scene
            .try_component_mut(second)
            .unwrap()
            .set_vertex_data(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
            .unwrap();
        let third = cube(&mut scene);

        scene.add_component(sub, second).unwrap();
        scene.add_components(root, [first, sub, third]).unwrap();
        scene.set_shader(root, shader).unwrap();
        api.clear_calls();

        let drawn = scene.render(root, &Mat4::identity(), &Mat4::identity()).unwrap();
        assert_eq!(drawn, 3);
        let counts: Vec<i32> = api
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                GlCall::DrawTriangles { count, .. } => Some(count),
                _ => None,
            })
            .collect();
        assert_eq!(counts, vec![36, 3, 36]);
    }

    #[test]
    fn test_render_skips_components_without_shader() {
        let (api, mut scene) = scene();
        let _ = cube(&mut scene);
        api.clear_calls();
        assert_eq!(scene.render_roots(&Mat4::identity(), &Mat4::identity()), 0);
        assert_eq!(api.draw_count(), 0);
    }

    #[test]
    fn test_remove_component_makes_root() {
        let (_, mut scene) = scene();
        let group = scene.create_group();
        let leaf = scene.create_component();
        let stranger = scene.create_component();
        scene.add_component(group, leaf).unwrap();

        assert!(matches!(
            scene.remove_component(group, stranger),
            Err(SceneError::NotAChild { .. })
        ));
        scene.remove_component(group, leaf).unwrap();
        assert_eq!(scene.node(leaf).unwrap().parent(), None);
        assert_eq!(scene.roots(), &[group, stranger, leaf]);
    }

    #[test]
    fn test_destroy_frees_subtree() {
        let (api, mut scene) = scene();
        let group = scene.create_group();
        let a = cube(&mut scene);
        let b = cube(&mut scene);
        scene.add_components(group, [a, b]).unwrap();
        assert!(api.live_buffers() > 0);

        scene.destroy(group).unwrap();
        assert!(scene.is_empty());
        assert!(scene.roots().is_empty());
        assert_eq!(api.live_buffers(), 0);
        assert!(matches!(scene.save(a), Err(SceneError::NodeNotFound(_))));
    }

    #[test]
    fn test_set_shader_files_error_leaves_node_untouched() {
        let (_, mut scene) = scene();
        let leaf = scene.create_component();
        let result = scene.set_shader_files(leaf, "/nonexistent.vert", "/nonexistent.frag");
        assert!(matches!(result, Err(SceneError::Shader(ShaderError::Io { .. }))));
        assert!(scene.shader(leaf).is_none());
    }
}
