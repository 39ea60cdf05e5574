//! Optional versioned TOML configuration.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use isomap_core::{GridSize, DEFAULT_GRID};
use isomap_projection::IsoProjection;
use serde::Deserialize;
use tracing::debug;

/// Only configuration layout understood by this binary.
pub(crate) const CONFIG_VERSION: u32 = 1;

/// File looked up in the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "isomap.toml";

/// Top-level configuration document.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub(crate) version: u32,
    pub(crate) grid: GridSection,
    pub(crate) projection: ProjectionSection,
    pub(crate) viewport: ViewportSection,
}

/// `[grid]` table.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GridSection {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

/// `[projection]` table.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ProjectionSection {
    pub(crate) tile_width: f32,
    pub(crate) tile_height: f32,
}

/// `[viewport]` table.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ViewportSection {
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) zoom: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            grid: GridSection::default(),
            projection: ProjectionSection::default(),
            viewport: ViewportSection::default(),
        }
    }
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID.width(),
            height: DEFAULT_GRID.height(),
        }
    }
}

impl Default for ProjectionSection {
    fn default() -> Self {
        Self {
            tile_width: IsoProjection::DEFAULT_TILE_WIDTH,
            tile_height: IsoProjection::DEFAULT_TILE_HEIGHT,
        }
    }
}

impl Default for ViewportSection {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            zoom: 1.0,
        }
    }
}

impl Config {
    /// Loads the configuration from `path`, or from [`DEFAULT_CONFIG_FILE`]
    /// when no path is given. A missing file yields the defaults.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
        if !path.exists() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid configuration {}", path.display()))
    }

    /// Parses and validates a configuration document.
    pub(crate) fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("malformed TOML")?;
        if config.version != CONFIG_VERSION {
            bail!(
                "unsupported configuration version {} (expected {CONFIG_VERSION})",
                config.version
            );
        }
        if config.grid.width == 0 || config.grid.height == 0 {
            bail!(
                "grid must have at least one tile (received {}x{})",
                config.grid.width,
                config.grid.height
            );
        }
        let _ = config.projection()?;
        Ok(config)
    }

    pub(crate) fn grid(&self) -> GridSize {
        GridSize::new(self.grid.width, self.grid.height)
    }

    pub(crate) fn projection(&self) -> Result<IsoProjection> {
        IsoProjection::new(self.projection.tile_width, self.projection.tile_height)
            .context("invalid [projection] table")
    }

    pub(crate) fn viewport_size(&self) -> Vec2 {
        Vec2::new(self.viewport.width, self.viewport.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::parse("").expect("defaults are valid");
        assert_eq!(config, Config::default());
        assert_eq!(config.grid(), DEFAULT_GRID);
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = Config::parse(
            r#"
            version = 1

            [grid]
            width = 12

            [viewport]
            zoom = 2.0
            "#,
        )
        .expect("valid");

        assert_eq!(config.grid(), GridSize::new(12, DEFAULT_GRID.height()));
        assert_eq!(config.viewport.zoom, 2.0);
        assert_eq!(config.viewport_size(), Vec2::new(1280.0, 720.0));
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let error = Config::parse("version = 2").expect_err("version 2 is unknown");
        assert!(error.to_string().contains("unsupported configuration version 2"));
    }

    #[test]
    fn degenerate_projection_is_rejected() {
        assert!(Config::parse("[projection]\ntile_width = 0.0").is_err());
        assert!(Config::parse("[grid]\nheight = 0").is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::parse("[grid]\ndepth = 3").is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("isomap-config-that-does-not-exist.toml");
        let config = Config::load(Some(&path)).expect("missing file is fine");
        assert_eq!(config, Config::default());
    }
}
