//! Renderable leaf of the scene tree
//!
//! A [`Component`] owns copies of its vertex attributes, the GPU buffers they
//! were uploaded to, an optional texture and its model matrices. Shader and
//! lighting live on the owning [`super::Node`] and are passed in at render
//! time.

use super::graph::{SceneError, SceneResult};
use crate::assets::{ObjLoader, ObjOptions};
use crate::foundation::math::{utils, Mat4, Vec3};
use crate::render::lighting::{Lighting, MAX_POINT_LIGHTS};
use crate::render::shader::{attributes, uniforms, ShaderProgram};
use crate::render::{Buffer, GraphicsApi, MeshData, Texture, UniformValue};
use std::path::Path;
use std::rc::Rc;

/// Geometry, texture and placement of one drawable object
pub struct Component {
    api: Rc<dyn GraphicsApi>,

    vertices: Vec<f32>,
    colours: Vec<f32>,
    uvs: Vec<f32>,
    normals: Vec<f32>,

    vertex_buffer: Buffer,
    colour_buffer: Buffer,
    uv_buffer: Buffer,
    normal_buffer: Buffer,

    texture: Option<Texture>,
    shape_colour: Option<Vec3>,

    init_model: Mat4,
    model: Mat4,
    saved_model: Mat4,

    center: Vec3,
    location: Vec3,
}

impl Component {
    /// Empty component at the origin with identity matrices
    pub fn new(api: Rc<dyn GraphicsApi>) -> Self {
        Self {
            vertex_buffer: Buffer::new(Rc::clone(&api), 3),
            colour_buffer: Buffer::new(Rc::clone(&api), 3),
            uv_buffer: Buffer::new(Rc::clone(&api), 2),
            normal_buffer: Buffer::new(Rc::clone(&api), 3),
            api,
            vertices: Vec::new(),
            colours: Vec::new(),
            uvs: Vec::new(),
            normals: Vec::new(),
            texture: None,
            shape_colour: None,
            init_model: Mat4::identity(),
            model: Mat4::identity(),
            saved_model: Mat4::identity(),
            center: Vec3::zeros(),
            location: Vec3::zeros(),
        }
    }

    /// Set positions as flat `x, y, z` triples
    ///
    /// Attributes already set for a different vertex count are left alone but
    /// ignored when drawing until they are replaced.
    pub fn set_vertex_data(&mut self, data: &[f32]) -> SceneResult<()> {
        if data.len() % 3 != 0 {
            return Err(SceneError::InvalidVertexData(format!(
                "{} floats is not a whole number of xyz positions",
                data.len()
            )));
        }
        self.vertex_buffer.upload(data)?;
        self.vertices = data.to_vec();

        let positions: Vec<[f32; 3]> = data.chunks_exact(3).map(|p| [p[0], p[1], p[2]]).collect();
        self.center = crate::render::mesh::centroid(&positions);
        self.refresh_location();
        Ok(())
    }

    /// Set per-vertex RGB colours; drawn in place of the texture
    pub fn set_colour_data(&mut self, data: &[f32]) -> SceneResult<()> {
        self.check_matches(data.len(), 3, "colour")?;
        self.colour_buffer.upload(data)?;
        self.colours = data.to_vec();
        Ok(())
    }

    /// Set a single colour for the whole component (`shape_colour`)
    pub fn set_colour(&mut self, colour: Vec3) {
        self.shape_colour = Some(colour);
    }

    /// Set texture coordinates as flat `u, v` pairs
    pub fn set_uv_data(&mut self, data: &[f32]) -> SceneResult<()> {
        self.check_matches(data.len(), 2, "UV")?;
        self.uv_buffer.upload(data)?;
        self.uvs = data.to_vec();
        Ok(())
    }

    /// Set normals as flat `x, y, z` triples
    pub fn set_normal_data(&mut self, data: &[f32]) -> SceneResult<()> {
        self.check_matches(data.len(), 3, "normal")?;
        self.normal_buffer.upload(data)?;
        self.normals = data.to_vec();
        Ok(())
    }

    /// Replace positions, UVs and normals with `mesh`
    ///
    /// UVs or normals the mesh does not carry are dropped.
    pub fn set_mesh(&mut self, mesh: &MeshData) -> SceneResult<()> {
        self.set_vertex_data(&mesh.flat_positions())?;
        if mesh.uvs.len() == mesh.positions.len() && !mesh.uvs.is_empty() {
            self.set_uv_data(&mesh.flat_uvs())?;
        } else {
            self.uvs.clear();
        }
        if mesh.normals.len() == mesh.positions.len() && !mesh.normals.is_empty() {
            self.set_normal_data(&mesh.flat_normals())?;
        } else {
            self.normals.clear();
        }
        Ok(())
    }

    /// Load geometry from a Wavefront OBJ file
    pub fn load_wavefront<P: AsRef<Path>>(&mut self, path: P) -> SceneResult<()> {
        let mesh = ObjLoader::load_obj_with(path, ObjOptions::default())?;
        self.set_mesh(&mesh)
    }

    /// Load a DDS or image file as this component's texture
    pub fn load_texture<P: AsRef<Path>>(&mut self, path: P) -> SceneResult<()> {
        self.texture = Some(Texture::load(Rc::clone(&self.api), path)?);
        Ok(())
    }

    /// Use an already uploaded texture
    pub fn set_texture(&mut self, texture: Texture) {
        self.texture = Some(texture);
    }

    /// Initial placement: becomes the current, saved and reset matrix
    pub fn set_init_model(&mut self, model: Mat4) {
        self.init_model = model;
        self.saved_model = model;
        self.set_model(model);
    }

    /// Overwrite the model matrix
    pub fn set_model(&mut self, model: Mat4) {
        self.model = model;
        self.refresh_location();
    }

    /// Apply `t` in world space (`M = t · M`)
    pub fn update_model(&mut self, t: &Mat4) {
        self.set_model(t * self.model);
    }

    /// Apply `t` in the component's own frame (`M = M · t`)
    pub fn apply_fp_transformation(&mut self, t: &Mat4) {
        self.set_model(self.model * t);
    }

    /// Remember the current model matrix
    pub fn save(&mut self) {
        self.saved_model = self.model;
    }

    /// Go back to the last saved model matrix
    pub fn reset(&mut self) {
        self.set_model(self.saved_model);
    }

    /// Go back to the matrix given to [`Component::set_init_model`]
    pub fn reset_to_initial(&mut self) {
        self.set_model(self.init_model);
    }

    /// Current model matrix
    pub fn model(&self) -> &Mat4 {
        &self.model
    }

    /// World-space position of the geometry centroid
    pub fn location(&self) -> Vec3 {
        self.location
    }

    /// Centroid of the vertex data in model space
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Flat colour, if set
    pub fn shape_colour(&self) -> Option<Vec3> {
        self.shape_colour
    }

    /// Whether a texture has been loaded
    pub fn has_texture(&self) -> bool {
        self.texture.as_ref().is_some_and(Texture::is_loaded)
    }

    fn refresh_location(&mut self) {
        self.location = utils::transform_origin(&self.model, &self.center);
    }

    fn check_matches(&self, len: usize, components: usize, what: &str) -> SceneResult<()> {
        let expected = self.vertex_count() * components;
        if len != expected || len == 0 {
            return Err(SceneError::InvalidVertexData(format!(
                "{} data has {} floats, expected {} ({} vertices x {})",
                what,
                len,
                expected,
                self.vertex_count(),
                components
            )));
        }
        Ok(())
    }

    fn attribute_matches(&self, data: &[f32], components: usize) -> bool {
        !data.is_empty() && data.len() == self.vertex_count() * components
    }

    /// Draw with `shader` under view `V` and projection `P`
    ///
    /// Returns `false` without touching GL state when there is nothing to draw.
    pub fn render(&self, shader: &ShaderProgram, view: &Mat4, projection: &Mat4, lighting: &Lighting) -> bool {
        let vertex_count = self.vertex_count();
        if vertex_count == 0 {
            log::warn!("Skipping component without vertex data");
            return false;
        }

        shader.use_program();
        let mvp = projection * view * self.model;
        shader.set_uniform(uniforms::MVP, UniformValue::Mat4(&utils::to_column_major(&mvp)));
        shader.set_uniform(uniforms::MODEL, UniformValue::Mat4(&utils::to_column_major(&self.model)));
        shader.set_uniform(uniforms::VIEW, UniformValue::Mat4(&utils::to_column_major(view)));

        self.vertex_buffer.bind_attribute(attributes::POSITION);

        if self.attribute_matches(&self.colours, 3) {
            self.colour_buffer.bind_attribute(attributes::COLOUR_OR_UV);
        } else if let Some(texture) = self.texture.as_ref().filter(|_| self.attribute_matches(&self.uvs, 2)) {
            texture.bind(0);
            shader.set_uniform(uniforms::TEXTURE_SAMPLER, UniformValue::Int(0));
            self.uv_buffer.bind_attribute(attributes::COLOUR_OR_UV);
        }

        if self.attribute_matches(&self.normals, 3) {
            self.normal_buffer.bind_attribute(attributes::NORMAL);
        }

        if let Some(colour) = self.shape_colour {
            shader.set_uniform(uniforms::SHAPE_COLOUR, UniformValue::Vec3(&colour.into()));
        }

        upload_lighting(shader, lighting);

        self.api.draw_triangles(0, vertex_count as i32);

        for index in [attributes::POSITION, attributes::COLOUR_OR_UV, attributes::NORMAL] {
            self.api.disable_attribute(index);
        }
        true
    }
}

fn upload_lighting(shader: &ShaderProgram, lighting: &Lighting) {
    if lighting.point_sources.len() > MAX_POINT_LIGHTS {
        log::warn!(
            "{} point sources set, only the first {} are rendered",
            lighting.point_sources.len(),
            MAX_POINT_LIGHTS
        );
    }

    shader.set_uniform(
        uniforms::AMBIENT_LIGHT_COLOUR,
        UniformValue::Vec3(&lighting.ambient_colour.into()),
    );

    let (locations, colours, powers) = lighting.uniform_arrays();
    if !locations.is_empty() {
        shader.set_uniform(uniforms::POINT_SOURCE_LOCATIONS, UniformValue::Vec3Array(&locations));
        shader.set_uniform(uniforms::POINT_SOURCE_COLOURS, UniformValue::Vec3Array(&colours));
        shader.set_uniform(uniforms::POINT_SOURCE_POWERS, UniformValue::FloatArray(&powers));
    }
    shader.set_uniform(uniforms::POINT_SOURCE_COUNT, UniformValue::Int(powers.len() as i32));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat4Ext;
    use crate::render::headless::{GlCall, HeadlessApi, RecordedUniform};
    use crate::render::lighting::PointLight;
    use approx::assert_relative_eq;

    const TRIANGLE: [f32; 9] = [0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 3.0, 0.0];

    fn setup() -> (Rc<HeadlessApi>, Component, Rc<ShaderProgram>) {
        let api = Rc::new(HeadlessApi::new());
        let component = Component::new(api.clone());
        let shader = ShaderProgram::colour_shader(api.clone()).unwrap();
        (api, component, shader)
    }

    fn enabled_attributes(api: &HeadlessApi) -> Vec<(u32, i32)> {
        api.calls()
            .into_iter()
            .filter_map(|c| match c {
                GlCall::EnableAttribute { index, components, .. } => Some((index, components)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_vertex_data_must_be_xyz() {
        let (_, mut component, _) = setup();
        assert!(matches!(
            component.set_vertex_data(&[0.0; 7]),
            Err(SceneError::InvalidVertexData(_))
        ));
        component.set_vertex_data(&TRIANGLE).unwrap();
        assert_eq!(component.vertex_count(), 3);
    }

    #[test]
    fn test_attribute_lengths_must_match_vertices() {
        let (_, mut component, _) = setup();
        component.set_vertex_data(&TRIANGLE).unwrap();

        assert!(component.set_colour_data(&[1.0; 6]).is_err());
        assert!(component.set_uv_data(&[0.0; 4]).is_err());
        assert!(component.set_normal_data(&[0.0; 3]).is_err());

        component.set_colour_data(&[1.0; 9]).unwrap();
        component.set_uv_data(&[0.0; 6]).unwrap();
        component.set_normal_data(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]).unwrap();
    }

    #[test]
    fn test_location_follows_centroid_and_matrix() {
        let (_, mut component, _) = setup();
        component.set_vertex_data(&TRIANGLE).unwrap();
        assert_relative_eq!(component.location(), Vec3::new(1.0, 1.0, 0.0));

        component.update_model(&Mat4::translation(Vec3::new(0.0, 0.0, -5.0)));
        assert_relative_eq!(component.location(), Vec3::new(1.0, 1.0, -5.0));
    }

    #[test]
    fn test_update_model_premultiplies() {
        let (_, mut component, _) = setup();
        let placement = Mat4::translation(Vec3::new(2.0, 0.0, 0.0));
        let spin = Mat4::rotation_z(std::f32::consts::FRAC_PI_2);
        component.set_model(placement);

        component.update_model(&spin);
        assert_relative_eq!(*component.model(), spin * placement, epsilon = 1e-6);
        // Rotating about the world origin swings the component onto +Y
        assert_relative_eq!(component.location(), Vec3::new(0.0, 2.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_fp_transformation_postmultiplies() {
        let (_, mut component, _) = setup();
        let placement = Mat4::translation(Vec3::new(2.0, 0.0, 0.0));
        let spin = Mat4::rotation_z(std::f32::consts::FRAC_PI_2);
        component.set_model(placement);

        component.apply_fp_transformation(&spin);
        assert_relative_eq!(*component.model(), placement * spin, epsilon = 1e-6);
        // Spinning in place leaves the origin-centred component where it was
        assert_relative_eq!(component.location(), Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_save_reset_and_initial() {
        let (_, mut component, _) = setup();
        let start = Mat4::translation(Vec3::new(1.0, 0.0, 0.0));
        component.set_init_model(start);

        let step = Mat4::translation(Vec3::new(0.0, 1.0, 0.0));
        component.update_model(&step);
        component.save();
        component.update_model(&step);

        component.reset();
        assert_relative_eq!(*component.model(), step * start);
        component.reset_to_initial();
        assert_relative_eq!(*component.model(), start);
    }

    #[test]
    fn test_render_without_vertices_is_skipped() {
        let (api, component, shader) = setup();
        api.clear_calls();
        assert!(!component.render(&shader, &Mat4::identity(), &Mat4::identity(), &Lighting::default()));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_render_uploads_mvp_in_p_v_m_order() {
        let (api, mut component, shader) = setup();
        component.set_vertex_data(&TRIANGLE).unwrap();
        component.set_model(Mat4::translation(Vec3::new(1.0, 2.0, 3.0)));
        let view = Mat4::translation(Vec3::new(0.0, 0.0, -10.0));
        let projection = Mat4::new_perspective(1.0, 0.8, 0.1, 100.0);

        assert!(component.render(&shader, &view, &projection, &Lighting::default()));

        let expected = utils::to_column_major(&(projection * view * component.model()));
        assert_eq!(api.uniform_uploads(uniforms::MVP), vec![RecordedUniform::Mat4(expected)]);
        assert_eq!(api.draw_count(), 1);
        assert!(api.calls().contains(&GlCall::DrawTriangles { first: 0, count: 3 }));
        assert_eq!(enabled_attributes(&api), vec![(0, 3)]);
        let disabled = api.calls().iter().filter(|c| matches!(c, GlCall::DisableAttribute(_))).count();
        assert_eq!(disabled, 3);
    }

    #[test]
    fn test_colour_takes_precedence_over_texture() {
        let (api, mut component, shader) = setup();
        component.set_vertex_data(&TRIANGLE).unwrap();
        component.set_uv_data(&[0.0; 6]).unwrap();
        component.set_texture(
            Texture::from_rgba(api.clone(), &crate::assets::ImageData::solid_color(1, 1, [255; 4])).unwrap(),
        );
        component.set_colour_data(&[0.5; 9]).unwrap();
        api.clear_calls();

        component.render(&shader, &Mat4::identity(), &Mat4::identity(), &Lighting::default());
        assert_eq!(enabled_attributes(&api), vec![(0, 3), (1, 3)]);
        assert!(!api.calls().iter().any(|c| matches!(c, GlCall::BindTexture { .. })));
    }

    #[test]
    fn test_textured_render_binds_unit_zero() {
        let (api, mut component, shader) = setup();
        component.set_mesh(&MeshData::cube()).unwrap();
        component.set_texture(
            Texture::from_rgba(api.clone(), &crate::assets::ImageData::solid_color(1, 1, [255; 4])).unwrap(),
        );
        assert!(component.has_texture());
        api.clear_calls();

        component.render(&shader, &Mat4::identity(), &Mat4::identity(), &Lighting::default());
        assert!(api.calls().iter().any(|c| matches!(c, GlCall::BindTexture { unit: 0, .. })));
        assert_eq!(api.uniform_uploads(uniforms::TEXTURE_SAMPLER), vec![RecordedUniform::Int(0)]);
        assert_eq!(enabled_attributes(&api), vec![(0, 3), (1, 2), (2, 3)]);
        assert!(api.calls().contains(&GlCall::DrawTriangles { first: 0, count: 36 }));
    }

    #[test]
    fn test_uvs_without_texture_are_not_bound() {
        let (api, mut component, shader) = setup();
        component.set_mesh(&MeshData::cube()).unwrap();
        api.clear_calls();

        component.render(&shader, &Mat4::identity(), &Mat4::identity(), &Lighting::default());
        assert_eq!(enabled_attributes(&api), vec![(0, 3), (2, 3)]);
    }

    #[test]
    fn test_lighting_uniforms() {
        let (api, mut component, shader) = setup();
        component.set_vertex_data(&TRIANGLE).unwrap();
        component.set_colour(Vec3::new(1.0, 0.5, 0.0));

        let mut lighting = Lighting { ambient_colour: Vec3::new(0.1, 0.1, 0.1), ..Lighting::default() };
        for i in 0..(MAX_POINT_LIGHTS + 2) {
            lighting.add_point_source(PointLight::new(Vec3::new(i as f32, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0), 2.0));
        }
        component.render(&shader, &Mat4::identity(), &Mat4::identity(), &lighting);

        assert_eq!(api.uniform_uploads(uniforms::SHAPE_COLOUR), vec![RecordedUniform::Vec3([1.0, 0.5, 0.0])]);
        assert_eq!(api.uniform_uploads(uniforms::AMBIENT_LIGHT_COLOUR), vec![RecordedUniform::Vec3([0.1, 0.1, 0.1])]);
        assert_eq!(
            api.uniform_uploads(uniforms::POINT_SOURCE_COUNT),
            vec![RecordedUniform::Int(MAX_POINT_LIGHTS as i32)]
        );
        match &api.uniform_uploads(uniforms::POINT_SOURCE_POWERS)[0] {
            RecordedUniform::FloatArray(powers) => assert_eq!(powers.len(), MAX_POINT_LIGHTS),
            other => panic!("unexpected upload {:?}", other),
        }
    }

    #[test]
    fn test_set_mesh_drops_attributes_the_new_mesh_lacks() {
        let (api, mut component, shader) = setup();
        component.set_mesh(&MeshData::cube()).unwrap();
        component.set_texture(
            Texture::from_rgba(api.clone(), &crate::assets::ImageData::solid_color(1, 1, [255; 4])).unwrap(),
        );

        let bare = MeshData {
            positions: MeshData::cube().positions,
            uvs: Vec::new(),
            normals: Vec::new(),
        };
        component.set_mesh(&bare).unwrap();
        assert_eq!(component.vertex_count(), 36);
        api.clear_calls();

        component.render(&shader, &Mat4::identity(), &Mat4::identity(), &Lighting::default());
        assert_eq!(enabled_attributes(&api), vec![(0, 3)]);
        assert!(!api.calls().iter().any(|c| matches!(c, GlCall::BindTexture { .. })));
    }

    #[test]
    fn test_load_wavefront() {
        let (_, mut component, _) = setup();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.obj");
        std::fs::write(
            &path,
            "v 0 0 0\nv 2 0 0\nv 2 2 0\nv 0 2 0\nvt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\nf 1/1 2/2 3/3 4/4\n",
        )
        .unwrap();

        component.load_wavefront(&path).unwrap();
        assert_eq!(component.vertex_count(), 6);
        // Fan split: (0,0) (2,0) (2,2) and (0,0) (2,2) (0,2)
        assert_relative_eq!(component.center(), Vec3::new(1.0, 1.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_missing_texture_file() {
        let (_, mut component, _) = setup();
        assert!(matches!(
            component.load_texture("/nonexistent/uvmap.DDS"),
            Err(SceneError::Texture(_))
        ));
        assert!(!component.has_texture());
    }
}
