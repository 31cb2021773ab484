//! Ambient and point lighting state
//!
//! Every scene node carries a [`Lighting`] value. Groups push theirs down to
//! descendants; components upload theirs as the fixed lighting uniforms.

use crate::foundation::math::Vec3;

/// Size of the `point_source_*` uniform arrays in the built-in shaders
pub const MAX_POINT_LIGHTS: usize = 8;

/// Omnidirectional light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// World-space position
    pub location: Vec3,
    /// RGB colour
    pub colour: Vec3,
    /// Intensity; the shaders divide by squared distance
    pub power: f32,
}

impl PointLight {
    /// Create a point light
    pub fn new(location: Vec3, colour: Vec3, power: f32) -> Self {
        Self { location, colour, power }
    }
}

/// Lighting inherited by a node
#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    /// Colour added to every fragment regardless of position
    pub ambient_colour: Vec3,
    /// Point lights in insertion order
    pub point_sources: Vec<PointLight>,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient_colour: Vec3::zeros(),
            point_sources: Vec::new(),
        }
    }
}

impl Lighting {
    /// Append a point light
    pub fn add_point_source(&mut self, light: PointLight) {
        if self.point_sources.len() == MAX_POINT_LIGHTS {
            log::warn!(
                "More than {} point sources; extra lights are kept but not rendered",
                MAX_POINT_LIGHTS
            );
        }
        self.point_sources.push(light);
    }

    /// Locations of every point light
    pub fn point_source_locations(&self) -> Vec<Vec3> {
        self.point_sources.iter().map(|l| l.location).collect()
    }

    /// Colours of every point light
    pub fn point_source_colours(&self) -> Vec<Vec3> {
        self.point_sources.iter().map(|l| l.colour).collect()
    }

    /// Powers of every point light
    pub fn point_source_powers(&self) -> Vec<f32> {
        self.point_sources.iter().map(|l| l.power).collect()
    }

    /// The lights that fit in the shader arrays
    pub fn uploaded_sources(&self) -> &[PointLight] {
        &self.point_sources[..self.point_sources.len().min(MAX_POINT_LIGHTS)]
    }

    /// Uniform-ready arrays `(locations, colours, powers)` for the uploaded lights
    pub fn uniform_arrays(&self) -> (Vec<[f32; 3]>, Vec<[f32; 3]>, Vec<f32>) {
        let sources = self.uploaded_sources();
        (
            sources.iter().map(|l| l.location.into()).collect(),
            sources.iter().map(|l| l.colour.into()).collect(),
            sources.iter().map(|l| l.power).collect(),
        )
    }
}
