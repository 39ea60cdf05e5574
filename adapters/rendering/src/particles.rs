//! Decorative flow particles travelling along routed connectors.

use std::time::Duration;

use glam::Vec2;
use isomap_core::ConnectorId;

use crate::{Color, RenderingError, Scene};

/// One particle to paint this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Connector the particle travels along.
    pub connector: ConnectorId,
    /// Screen-space position.
    pub position: Vec2,
    /// Fraction of the route already covered, in `0.0..=1.0`.
    pub progress: f32,
    /// Particle color.
    pub color: Color,
}

/// Read-only animation pass deriving particle positions from elapsed time.
///
/// Connectors without a flow rate are not animated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowParticles {
    spacing: f32,
    speed: f32,
}

impl FlowParticles {
    /// Route steps between consecutive particles on one connector.
    pub const DEFAULT_SPACING: f32 = 3.0;

    /// Route steps travelled per second at flow rate 1.
    pub const DEFAULT_SPEED: f32 = 1.5;

    /// Creates a particle pass with explicit spacing and speed.
    pub fn new(spacing: f32, speed: f32) -> Result<Self, RenderingError> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(RenderingError::InvalidParticleSpacing { spacing });
        }
        if !speed.is_finite() || speed < 0.0 {
            return Err(RenderingError::InvalidParticleSpeed { speed });
        }
        Ok(Self { spacing, speed })
    }

    /// Route steps between consecutive particles.
    #[must_use]
    pub const fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Route steps travelled per second at flow rate 1.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Positions of every particle `elapsed` after the animation started.
    #[must_use]
    pub fn sample(&self, scene: &Scene, elapsed: Duration) -> Vec<Particle> {
        let seconds = elapsed.as_secs_f32();
        let mut particles = Vec::new();

        for connector in &scene.connectors {
            let Some(rate) = connector.flow_rate.filter(|rate| rate.is_finite() && *rate > 0.0)
            else {
                continue;
            };
            if connector.points.len() < 2 {
                continue;
            }

            let steps = (connector.points.len() - 1) as f32;
            let color = connector.color.lighten(0.4);
            let mut travelled = (seconds * self.speed * rate).rem_euclid(self.spacing);
            while travelled <= steps {
                particles.push(Particle {
                    connector: connector.id,
                    position: point_along(&connector.points, travelled),
                    progress: travelled / steps,
                    color,
                });
                travelled += self.spacing;
            }
        }

        particles
    }
}

impl Default for FlowParticles {
    fn default() -> Self {
        Self {
            spacing: Self::DEFAULT_SPACING,
            speed: Self::DEFAULT_SPEED,
        }
    }
}

fn point_along(points: &[Vec2], distance: f32) -> Vec2 {
    let last_segment = points.len().saturating_sub(2);
    let index = (distance.floor().max(0.0) as usize).min(last_segment);
    let fraction = (distance - index as f32).clamp(0.0, 1.0);
    points[index].lerp(points[index + 1], fraction)
}
