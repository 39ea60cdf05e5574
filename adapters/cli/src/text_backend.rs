//! Rendering backend that prints a single frame as a character map.

use std::{
    collections::HashSet,
    io::{self, Write},
    time::Duration,
};

use anyhow::{Context, Result as AnyResult};
use isomap_core::{NodeCategory, TileCoord};
use isomap_rendering::{FlowParticles, Particle, Presentation, RenderingBackend, Scene};
use isomap_system_interaction::Input;

const EMPTY: char = '.';
const REGION: char = ':';
const ROUTE: char = '*';
const PARTICLE: char = 'o';

/// Writes one captured frame, with its flow particles, to any byte sink.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    out: W,
    particles: FlowParticles,
    elapsed: Duration,
}

impl<W: Write> TextBackend<W> {
    /// Prints the frame seen `elapsed` after the animation started.
    pub(crate) fn new(out: W, elapsed: Duration) -> Self {
        Self {
            out,
            particles: FlowParticles::default(),
            elapsed,
        }
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &[Input], &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            mut scene,
            ..
        } = presentation;
        update_scene(self.elapsed, &[], &mut scene);
        let particles = self.particles.sample(&scene, self.elapsed);
        draw(&window_title, &scene, &particles, &mut self.out)
            .context("failed to write text frame")?;
        self.out.flush().context("failed to flush text frame")
    }
}

/// Character standing for a node of `category`.
pub(crate) const fn glyph(category: NodeCategory) -> char {
    match category {
        NodeCategory::Headquarters => 'H',
        NodeCategory::Storefront => 'S',
        NodeCategory::Marketplace => 'M',
        NodeCategory::Catalog => 'C',
        NodeCategory::Marketing => 'K',
        NodeCategory::Customers => 'U',
        NodeCategory::Warehouse => 'W',
        NodeCategory::Fulfillment => 'F',
        NodeCategory::Finance => '$',
        NodeCategory::Support => '?',
        NodeCategory::Subscriptions => 'R',
        NodeCategory::Suppliers => 'P',
        NodeCategory::Analytics => 'A',
    }
}

/// Paints the scene top-down, one character per tile, followed by a legend.
pub(crate) fn draw(
    title: &str,
    scene: &Scene,
    particles: &[Particle],
    out: &mut dyn Write,
) -> io::Result<()> {
    let columns = scene.tile_grid.columns;
    let rows = scene.tile_grid.rows;
    writeln!(out, "{title}")?;
    writeln!(out, "{columns}x{rows} tiles")?;

    let grid = &scene.tile_grid;
    let particle_tiles: HashSet<TileCoord> = particles
        .iter()
        .filter_map(|particle| grid.projection.snap(particle.position, grid.viewport))
        .collect();

    for y in 0..rows {
        let line: String = (0..columns)
            .map(|x| tile_glyph(scene, &particle_tiles, TileCoord::new(x, y)))
            .collect();
        writeln!(out, "{line}")?;
    }

    writeln!(out)?;
    for node in &scene.nodes {
        writeln!(
            out,
            "{} {:<14} ({:>2},{:>2}) {}",
            glyph(node.category),
            node.label,
            node.tile.x(),
            node.tile.y(),
            node.alert_count
                .filter(|alerts| *alerts > 0)
                .map(|alerts| format!("[{alerts} alerts]"))
                .unwrap_or_default(),
        )?;
    }
    for region in &scene.regions {
        let (from, to) = (region.bounds.from(), region.bounds.to());
        writeln!(
            out,
            "# {} ({},{})-({},{})",
            region.label,
            from.x(),
            from.y(),
            to.x(),
            to.y()
        )?;
    }
    writeln!(
        out,
        "{} routed connectors, {} flow particles",
        scene.connectors.len(),
        particles.len()
    )
}

fn tile_glyph(scene: &Scene, particles: &HashSet<TileCoord>, tile: TileCoord) -> char {
    if let Some(node) = scene.node_at(tile) {
        return glyph(node.category);
    }
    if particles.contains(&tile) {
        return PARTICLE;
    }
    if scene
        .connectors
        .iter()
        .any(|connector| connector.route.contains(&tile))
    {
        return ROUTE;
    }
    if scene
        .regions
        .iter()
        .any(|region| region.bounds.contains(tile))
    {
        return REGION;
    }
    EMPTY
}
