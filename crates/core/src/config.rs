//! Demo configuration: which surface to draw on and where the two shader
//! sources live.
//!
//! Loaded from JSON with `serde_json`. Missing fields take the defaults,
//! which describe the bundled page layout (`www/index.html`): a canvas
//! called `myCanvas` and two `<script>` elements `shaderVs` / `shaderFs`
//! whose `src` points at the shader text.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default display surface identifier.
pub const DEFAULT_SURFACE_ID: &str = "myCanvas";
/// Default element holding the vertex shader URI.
pub const DEFAULT_VERTEX_ELEMENT: &str = "shaderVs";
/// Default element holding the fragment shader URI.
pub const DEFAULT_FRAGMENT_ELEMENT: &str = "shaderFs";

/// Where to find one shader's source text.
///
/// Serialized as `{"uri": "..."}` or `{"element": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceLocator {
    /// A URI (or, for file-based fetchers, a path) to fetch directly.
    Uri(String),
    /// The identifier of a script element whose `src` attribute is the URI.
    Element(String),
}

impl SourceLocator {
    fn value(&self) -> &str {
        match self {
            SourceLocator::Uri(s) | SourceLocator::Element(s) => s,
        }
    }
}

impl std::fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceLocator::Uri(uri) => write!(f, "{uri}"),
            SourceLocator::Element(id) => write!(f, "#{id}"),
        }
    }
}

/// Everything the flow needs from its environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub surface_id: String,
    pub vertex_shader: SourceLocator,
    pub fragment_shader: SourceLocator,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            surface_id: DEFAULT_SURFACE_ID.to_owned(),
            vertex_shader: SourceLocator::Element(DEFAULT_VERTEX_ELEMENT.to_owned()),
            fragment_shader: SourceLocator::Element(DEFAULT_FRAGMENT_ELEMENT.to_owned()),
        }
    }
}

impl DemoConfig {
    /// A configuration with explicit shader URIs.
    pub fn with_uris(
        surface_id: impl Into<String>,
        vertex_uri: impl Into<String>,
        fragment_uri: impl Into<String>,
    ) -> Self {
        Self {
            surface_id: surface_id.into(),
            vertex_shader: SourceLocator::Uri(vertex_uri.into()),
            fragment_shader: SourceLocator::Uri(fragment_uri.into()),
        }
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// `ConfigError::Parse` for malformed JSON, `ConfigError::EmptyField` if
    /// any identifier or locator is empty.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: DemoConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that no identifier is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.surface_id.trim().is_empty() {
            return Err(ConfigError::EmptyField("surface_id"));
        }
        if self.vertex_shader.value().trim().is_empty() {
            return Err(ConfigError::EmptyField("vertex_shader"));
        }
        if self.fragment_shader.value().trim().is_empty() {
            return Err(ConfigError::EmptyField("fragment_shader"));
        }
        Ok(())
    }
}
