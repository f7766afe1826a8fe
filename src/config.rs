//! Client configuration parsed from environment variables.

use canvas::input::ToolState;
use frames::{ShapeColor, ShapeType};

pub const DEFAULT_BASE_URL: &str = "ws://localhost:8888";
pub const DEFAULT_SHAPE_TYPE: &str = "BIG_CIRCLE";
pub const DEFAULT_SHAPE_COLOR: &str = "BLUE";
pub const DEFAULT_SURFACE_WIDTH: u32 = 800;
pub const DEFAULT_SURFACE_HEIGHT: u32 = 600;

/// Path prefix of the session channel; the drawing id is appended.
pub const SESSION_PATH: &str = "/websockets";
/// Path prefix of the snapshot API; the drawing id is appended.
pub const SNAPSHOT_PATH: &str = "/api/drawings";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid base URL '{0}' (expected ws://, wss://, http:// or https://)")]
    InvalidBaseUrl(String),
    #[error("unsupported snapshot scheme '{0}' (expected 'http' or 'https')")]
    InvalidSnapshotScheme(String),
    #[error("invalid value for {var}: '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Normalized `ws://` or `wss://` base, without trailing slash.
    pub base_url: String,
    /// Scheme override for snapshot requests. `None` follows the base URL:
    /// `ws` maps to `http`, `wss` to `https`.
    pub snapshot_scheme: Option<String>,
    /// Initial tool state for new drawing views.
    pub tool: ToolState,
    pub surface_width: u32,
    pub surface_height: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            snapshot_scheme: None,
            tool: ToolState::new(
                ShapeType::from(DEFAULT_SHAPE_TYPE),
                ShapeColor::from(DEFAULT_SHAPE_COLOR),
            ),
            surface_width: DEFAULT_SURFACE_WIDTH,
            surface_height: DEFAULT_SURFACE_HEIGHT,
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `DRAWBOARD_BASE_URL`: default `ws://localhost:8888`
    /// - `DRAWBOARD_SNAPSHOT_SCHEME`: `http` or `https`; defaults to the
    ///   base URL's security (`ws` gives `http`, `wss` gives `https`)
    /// - `DRAWBOARD_SHAPE_TYPE`: default `BIG_CIRCLE`
    /// - `DRAWBOARD_SHAPE_COLOR`: default `BLUE`
    /// - `DRAWBOARD_SURFACE_WIDTH` / `DRAWBOARD_SURFACE_HEIGHT`: default 800 x 600
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var_os(key).map(|value| value.to_string_lossy().into_owned()))
    }

    /// Same as [`Self::from_env`] but reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is present but malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("DRAWBOARD_BASE_URL") {
            config.set_base_url(&raw)?;
        }
        if let Some(raw) = lookup("DRAWBOARD_SNAPSHOT_SCHEME") {
            config.set_snapshot_scheme(&raw)?;
        }
        if let Some(raw) = lookup("DRAWBOARD_SHAPE_TYPE") {
            config.tool.shape_type = ShapeType::from(raw.trim());
        }
        if let Some(raw) = lookup("DRAWBOARD_SHAPE_COLOR") {
            config.tool.shape_color = ShapeColor::from(raw.trim());
        }
        config.surface_width = parse_dimension(
            "DRAWBOARD_SURFACE_WIDTH",
            lookup("DRAWBOARD_SURFACE_WIDTH"),
            DEFAULT_SURFACE_WIDTH,
        )?;
        config.surface_height = parse_dimension(
            "DRAWBOARD_SURFACE_HEIGHT",
            lookup("DRAWBOARD_SURFACE_HEIGHT"),
            DEFAULT_SURFACE_HEIGHT,
        )?;

        Ok(config)
    }

    /// Replace the base URL, mapping `http(s)://` to `ws(s)://`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for any other scheme.
    pub fn set_base_url(&mut self, raw: &str) -> Result<(), ConfigError> {
        self.base_url = normalize_base_url(raw)?;
        Ok(())
    }

    /// Replace the snapshot scheme.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSnapshotScheme`] unless `http` or `https`.
    pub fn set_snapshot_scheme(&mut self, raw: &str) -> Result<(), ConfigError> {
        let scheme = raw.trim().to_ascii_lowercase();
        match scheme.as_str() {
            "http" | "https" => {
                self.snapshot_scheme = Some(scheme);
                Ok(())
            }
            _ => Err(ConfigError::InvalidSnapshotScheme(raw.to_owned())),
        }
    }

    /// Scheme used to reach the snapshot authority named by a relocation.
    #[must_use]
    pub fn snapshot_scheme(&self) -> &str {
        match &self.snapshot_scheme {
            Some(scheme) => scheme,
            None if self.base_url.starts_with("wss://") => "https",
            None => "http",
        }
    }

    /// Session channel URL for a drawing.
    #[must_use]
    pub fn endpoint_url(&self, drawing_id: &str) -> String {
        format!("{}{SESSION_PATH}/{drawing_id}", self.base_url)
    }

    /// Snapshot API URL at a relocated authority.
    #[must_use]
    pub fn snapshot_url(&self, authority: &str, drawing_id: &str) -> String {
        format!(
            "{}://{}{SNAPSHOT_PATH}/{drawing_id}",
            self.snapshot_scheme(),
            authority.trim_end_matches('/')
        )
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let (scheme, rest) = if let Some(rest) = trimmed.strip_prefix("ws://") {
        ("ws", rest)
    } else if let Some(rest) = trimmed.strip_prefix("wss://") {
        ("wss", rest)
    } else if let Some(rest) = trimmed.strip_prefix("http://") {
        ("ws", rest)
    } else if let Some(rest) = trimmed.strip_prefix("https://") {
        ("wss", rest)
    } else {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    };

    if rest.is_empty() {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(format!("{scheme}://{rest}"))
}

fn parse_dimension(var: &'static str, raw: Option<String>, default: u32) -> Result<u32, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::InvalidNumber { var, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
