//! # Configuration System
//!
//! Serializable configuration for the window, the renderer and the engine
//! loop. Any config type can be loaded from or saved to TOML or RON, picked by
//! file extension.

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values that parse but cannot be used
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// # Window Configuration
///
/// Parameters handed to GLFW when the window and its OpenGL context are
/// created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial client-area width in screen coordinates
    pub width: u32,
    /// Initial client-area height in screen coordinates
    pub height: u32,
    /// MSAA sample count (0 disables multisampling)
    pub samples: u32,
    /// Requested OpenGL context version (major, minor)
    pub gl_version: (u32, u32),
    /// Whether buffer swaps wait for vertical sync
    pub vsync: bool,
}

impl WindowConfig {
    /// Create a window configuration with the given title and size
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Self::default()
        }
    }

    /// Width divided by height
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.is_empty() {
            return Err(ConfigError::Invalid("window title cannot be empty".to_string()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.gl_version < (3, 3) {
            return Err(ConfigError::Invalid(format!(
                "OpenGL {}.{} is too old, 3.3 core is required",
                self.gl_version.0, self.gl_version.1
            )));
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Scene Engine".to_string(),
            width: 1024,
            height: 768,
            samples: 4,
            gl_version: (3, 3),
            vsync: true,
        }
    }
}

/// # Renderer Configuration
///
/// Global OpenGL state applied once after the context is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Colour the framebuffer is cleared to every frame (RGBA)
    pub clear_colour: [f32; 4],
    /// Whether depth testing (`LESS`) is enabled
    pub depth_test: bool,
}

impl RendererConfig {
    /// Set the clear colour
    pub fn with_clear_colour(mut self, r: f32, g: f32, b: f32, a: f32) -> Self {
        self.clear_colour = [r, g, b, a];
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clear_colour.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(ConfigError::Invalid(format!(
                "clear colour components must be within 0..=1, got {:?}",
                self.clear_colour
            )));
        }
        Ok(())
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_colour: [0.0, 0.0, 0.4, 0.0],
            depth_test: true,
        }
    }
}

/// # Engine Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
/// This is the main configuration structure applications should use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,
    /// Window and context settings
    pub window: WindowConfig,
    /// Global render state
    pub renderer: RendererConfig,
    /// Install the escape-closes-window key handler
    pub quit_on_escape: bool,
}

impl EngineConfig {
    /// Create a configuration with a window title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            window: WindowConfig {
                title: title.into(),
                ..WindowConfig::default()
            },
            ..Self::default()
        }
    }

    /// Set the window configuration
    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    /// Set the renderer configuration
    pub fn with_renderer(mut self, renderer: RendererConfig) -> Self {
        self.renderer = renderer;
        self
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window.validate()?;
        self.renderer.validate()?;
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            window: WindowConfig::default(),
            renderer: RendererConfig::default(),
            quit_on_escape: true,
        }
    }
}

impl Config for EngineConfig {}
