#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for isometric map adapters.
//!
//! Adapters never read the world directly while painting. They receive a
//! [`Scene`] captured from the map and interaction state, paint its passes in
//! order (regions, connectors, depth-sorted nodes, highlights) and overlay the
//! decorative [`FlowParticles`] pass, which only ever reads the scene.

mod particles;
mod scene;

use anyhow::Result as AnyResult;
use isomap_core::{NodeCategory, Rgba};
use isomap_system_interaction::Input;
use std::{error::Error, fmt, time::Duration};

pub use particles::{FlowParticles, Particle};
pub use scene::{
    ConnectorPresentation, Highlight, NodePresentation, RegionPresentation, Scene,
    TileGridPresentation,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Base color used for nodes of `category`.
    #[must_use]
    pub const fn for_category(category: NodeCategory) -> Self {
        match category {
            NodeCategory::Headquarters => Self::from_rgb_u8(0x63, 0x66, 0xf1),
            NodeCategory::Storefront => Self::from_rgb_u8(0x10, 0xb9, 0x81),
            NodeCategory::Marketplace => Self::from_rgb_u8(0x14, 0xb8, 0xa6),
            NodeCategory::Catalog => Self::from_rgb_u8(0x0e, 0xa5, 0xe9),
            NodeCategory::Marketing => Self::from_rgb_u8(0xec, 0x48, 0x99),
            NodeCategory::Customers => Self::from_rgb_u8(0xf5, 0x9e, 0x0b),
            NodeCategory::Warehouse => Self::from_rgb_u8(0x78, 0x71, 0x6c),
            NodeCategory::Fulfillment => Self::from_rgb_u8(0xf9, 0x73, 0x16),
            NodeCategory::Finance => Self::from_rgb_u8(0x22, 0xc5, 0x5e),
            NodeCategory::Support => Self::from_rgb_u8(0xa8, 0x55, 0xf7),
            NodeCategory::Subscriptions => Self::from_rgb_u8(0x8b, 0x5c, 0xf6),
            NodeCategory::Suppliers => Self::from_rgb_u8(0x64, 0x74, 0x8b),
            NodeCategory::Analytics => Self::from_rgb_u8(0x3b, 0x82, 0xf6),
        }
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Self {
            red: f32::from(color.red()) / 255.0,
            green: f32::from(color.green()) / 255.0,
            blue: f32::from(color.blue()) / 255.0,
            alpha: f32::from(color.alpha()) / 255.0,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Describes how the adapter should present the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used for the window or output heading.
    pub window_title: String,
    /// Color used to clear the background each frame.
    pub clear_color: Color,
    /// Scene contents to render.
    pub scene: Scene,
}

impl Presentation {
    /// Creates a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting scenes.
pub trait RenderingBackend {
    /// Runs the backend using the provided scene update callback.
    ///
    /// The callback receives the time since the previous frame and the raw
    /// input gathered during it, and must leave a freshly captured scene
    /// behind before the frame is painted.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &[Input], &mut Scene) + 'static;
}

/// Errors produced when configuring rendering helpers.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Particle spacing must be a positive finite number of route steps.
    InvalidParticleSpacing {
        /// Spacing that was provided.
        spacing: f32,
    },
    /// Particle speed must be a non-negative finite number.
    InvalidParticleSpeed {
        /// Speed that was provided.
        speed: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParticleSpacing { spacing } => {
                write!(f, "particle spacing must be positive (received {spacing})")
            }
            Self::InvalidParticleSpeed { speed } => {
                write!(f, "particle speed must be non-negative (received {speed})")
            }
        }
    }
}

impl Error for RenderingError {}
