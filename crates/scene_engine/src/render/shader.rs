//! Shader program compilation and the fixed uniform interface
//!
//! Programs are shared between scene nodes through `Rc<ShaderProgram>`; the
//! GL program is deleted when the last owner goes away.

use super::backend::{GraphicsApi, ProgramHandle, RenderError, ShaderStage, UniformLocation, UniformValue};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

/// Uniform names every scene shader is expected to declare
///
/// Shaders may omit any of them; uploads to missing uniforms are skipped.
pub mod uniforms {
    /// `mat4` projection · view · model
    pub const MVP: &str = "MVP";
    /// `mat4` model matrix
    pub const MODEL: &str = "M";
    /// `mat4` view matrix
    pub const VIEW: &str = "V";
    /// `sampler2D` bound to texture unit 0
    pub const TEXTURE_SAMPLER: &str = "texture_sampler";
    /// `vec3` flat colour for the whole component
    pub const SHAPE_COLOUR: &str = "shape_colour";
    /// `vec3` ambient light
    pub const AMBIENT_LIGHT_COLOUR: &str = "ambient_light_colour";
    /// `vec3[8]` point light positions
    pub const POINT_SOURCE_LOCATIONS: &str = "point_source_locations";
    /// `vec3[8]` point light colours
    pub const POINT_SOURCE_COLOURS: &str = "point_source_colours";
    /// `float[8]` point light powers
    pub const POINT_SOURCE_POWERS: &str = "point_source_powers";
    /// `int` number of valid entries in the point light arrays
    pub const POINT_SOURCE_COUNT: &str = "point_source_count";
}

/// Vertex attribute slots shared by every scene shader
pub mod attributes {
    /// `vec3` position
    pub const POSITION: u32 = 0;
    /// `vec3` colour or `vec2` UV
    pub const COLOUR_OR_UV: u32 = 1;
    /// `vec3` normal
    pub const NORMAL: u32 = 2;
}

const COLOUR_VERTEX_SOURCE: &str = include_str!("../../resources/shaders/colour.vert");
const COLOUR_FRAGMENT_SOURCE: &str = include_str!("../../resources/shaders/colour.frag");
const TEXTURE_VERTEX_SOURCE: &str = include_str!("../../resources/shaders/texture.vert");
const TEXTURE_FRAGMENT_SOURCE: &str = include_str!("../../resources/shaders/texture.frag");

/// Shader loading errors
#[derive(Error, Debug)]
pub enum ShaderError {
    /// Source file could not be read
    #[error("Cannot open {stage:?} shader {path}: {source}")]
    Io {
        /// Stage the file was meant for
        stage: ShaderStage,
        /// Offending file
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// Stage failed to compile
    #[error("{stage:?} shader failed to compile:\n{log}")]
    Compile {
        /// Failing stage
        stage: ShaderStage,
        /// Driver info log
        log: String,
    },

    /// Program failed to link
    #[error("Shader program failed to link:\n{0}")]
    Link(String),

    /// GPU object creation failed
    #[error(transparent)]
    Backend(#[from] RenderError),
}

/// Linked vertex + fragment program
pub struct ShaderProgram {
    api: Rc<dyn GraphicsApi>,
    program: ProgramHandle,
    locations: RefCell<HashMap<String, Option<UniformLocation>>>,
}

impl ShaderProgram {
    /// Read, compile and link a vertex and a fragment shader
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(
        api: Rc<dyn GraphicsApi>,
        vertex_path: P,
        fragment_path: Q,
    ) -> Result<Rc<Self>, ShaderError> {
        let vertex_path = vertex_path.as_ref();
        let fragment_path = fragment_path.as_ref();
        let read = |stage, path: &Path| {
            std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
                stage,
                path: path.display().to_string(),
                source,
            })
        };
        let vertex_source = read(ShaderStage::Vertex, vertex_path)?;
        let fragment_source = read(ShaderStage::Fragment, fragment_path)?;

        log::info!("Building shader program from {:?} and {:?}", vertex_path, fragment_path);
        Self::from_sources(api, &vertex_source, &fragment_source)
    }

    /// Compile and link in-memory sources
    ///
    /// Individual stages are deleted once linked; a failed compile or link
    /// leaves no GL objects behind.
    pub fn from_sources(
        api: Rc<dyn GraphicsApi>,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Rc<Self>, ShaderError> {
        log::debug!("Compiling vertex shader...");
        let vertex = api
            .compile_shader(ShaderStage::Vertex, vertex_source)
            .map_err(|log| ShaderError::Compile { stage: ShaderStage::Vertex, log })?;

        log::debug!("Compiling fragment shader...");
        let fragment = match api.compile_shader(ShaderStage::Fragment, fragment_source) {
            Ok(fragment) => fragment,
            Err(log) => {
                api.delete_shader(vertex);
                return Err(ShaderError::Compile { stage: ShaderStage::Fragment, log });
            }
        };

        log::debug!("Linking program...");
        let linked = api.link_program(&[vertex, fragment]);
        api.delete_shader(vertex);
        api.delete_shader(fragment);
        let program = linked.map_err(ShaderError::Link)?;

        Ok(Rc::new(Self {
            api,
            program,
            locations: RefCell::new(HashMap::new()),
        }))
    }

    /// Built-in shader lit by the scene lights, coloured per vertex or by `shape_colour`
    pub fn colour_shader(api: Rc<dyn GraphicsApi>) -> Result<Rc<Self>, ShaderError> {
        Self::from_sources(api, COLOUR_VERTEX_SOURCE, COLOUR_FRAGMENT_SOURCE)
    }

    /// Built-in shader lit by the scene lights, sampling `texture_sampler` at the vertex UVs
    pub fn texture_shader(api: Rc<dyn GraphicsApi>) -> Result<Rc<Self>, ShaderError> {
        Self::from_sources(api, TEXTURE_VERTEX_SOURCE, TEXTURE_FRAGMENT_SOURCE)
    }

    /// Make this program current
    pub fn use_program(&self) {
        self.api.use_program(self.program);
    }

    /// Location of `name`, looked up once and cached
    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        if let Some(&cached) = self.locations.borrow().get(name) {
            return cached;
        }
        let location = self.api.uniform_location(self.program, name);
        if location.is_none() {
            log::debug!("Uniform '{}' is not active in program {:?}", name, self.program);
        }
        self.locations.borrow_mut().insert(name.to_string(), location);
        location
    }

    /// Upload `value` to `name` if the program declares it
    pub fn set_uniform(&self, name: &str, value: UniformValue<'_>) -> bool {
        match self.uniform_location(name) {
            Some(location) => {
                self.api.set_uniform(location, value);
                true
            }
            None => false,
        }
    }

    /// GL program name
    pub fn handle(&self) -> ProgramHandle {
        self.program
    }
}

impl std::fmt::Debug for ShaderProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderProgram").field("program", &self.program).finish()
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        self.api.delete_program(self.program);
    }
}
