#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Template-driven layout generation from business metrics.
//!
//! A layout is a pure function of a [`MetricsSnapshot`], a [`Stage`] and an
//! identifier source: nodes come from the stage's placement table and are
//! enriched with statistics derived from the snapshot, connectors come from
//! the stage's connection table, and regions wrap the nodes each region
//! template covers.

mod regions;
mod stats;
mod templates;

use std::collections::HashMap;

use isomap_core::{
    Command, Connector, GridSize, IdSource, MapLayout, MetricsSnapshot, Node, NodeCategory,
    NodeId, Stage, TileCoord, DEFAULT_GRID,
};
use tracing::{debug, info};

pub use stats::{insight_for, CategoryInsight};

/// Order count above which a business is considered to operate at scale.
pub const SCALE_ORDER_THRESHOLD: u32 = 100;

/// Order count above which a business is considered to be growing.
pub const GROWTH_ORDER_THRESHOLD: u32 = 30;

/// Maps a metrics snapshot to the stage it most likely belongs to.
///
/// Enterprise is never detected; it can only be selected explicitly.
#[must_use]
pub fn detect_stage(snapshot: &MetricsSnapshot) -> Stage {
    let orders = snapshot.orders.total;
    if orders > SCALE_ORDER_THRESHOLD {
        Stage::Scale
    } else if orders > GROWTH_ORDER_THRESHOLD || snapshot.subscribers.active > 0 {
        Stage::Growth
    } else if orders > 0 {
        Stage::FirstSales
    } else {
        Stage::Foundation
    }
}

/// Pure system that builds stage layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutGenerator {
    grid: GridSize,
}

impl LayoutGenerator {
    /// Creates a generator producing layouts on the provided grid.
    #[must_use]
    pub const fn new(grid: GridSize) -> Self {
        Self { grid }
    }

    /// Grid dimensions of generated layouts.
    #[must_use]
    pub const fn grid(&self) -> GridSize {
        self.grid
    }

    /// Emits a [`Command::ReplaceLayout`] for the requested stage, or for the
    /// detected stage when none is requested.
    pub fn handle(
        &self,
        snapshot: &MetricsSnapshot,
        stage: Option<Stage>,
        ids: &mut dyn IdSource,
        out: &mut Vec<Command>,
    ) {
        let stage = stage.unwrap_or_else(|| detect_stage(snapshot));
        out.push(Command::ReplaceLayout {
            layout: self.generate(snapshot, stage, ids),
        });
    }

    /// Generates the complete layout of `stage`.
    ///
    /// Template positions outside the grid are skipped, and so are connection
    /// templates whose categories were not placed.
    #[must_use]
    pub fn generate(
        &self,
        snapshot: &MetricsSnapshot,
        stage: Stage,
        ids: &mut dyn IdSource,
    ) -> MapLayout {
        let mut layout = MapLayout::empty(stage, self.grid);
        let mut placed: HashMap<NodeCategory, NodeId> = HashMap::new();

        for template in templates::nodes_for(stage) {
            let tile = TileCoord::new(template.x, template.y);
            if !self.grid.contains(tile) {
                debug!(category = template.category.name(), ?tile, "template position outside grid");
                continue;
            }

            let insight = insight_for(template.category, snapshot);
            let mut node = Node::new(ids.next_node_id(), template.category, tile);
            node.node_type = template.node_type;
            node.description = insight.description;
            node.stats = Some(insight.stats);
            node.activity = Some(insight.activity);
            node.alert_count = insight.alerts;

            let _ = placed.insert(template.category, node.id);
            layout.nodes.push(node);
        }

        for template in templates::connections_for(stage) {
            let (Some(&source), Some(&target)) =
                (placed.get(&template.from), placed.get(&template.to))
            else {
                continue;
            };
            let mut connector = Connector::new(ids.next_connector_id(), source, target);
            connector.label = Some(template.label.to_owned());
            connector.style = template.style;
            connector.flow_rate = template.flow_rate;
            layout.connectors.push(connector);
        }

        layout.regions = regions::derive_regions(self.grid, &layout.nodes, ids);

        info!(
            stage = stage.name(),
            nodes = layout.nodes.len(),
            connectors = layout.connectors.len(),
            regions = layout.regions.len(),
            "generated layout"
        );
        layout
    }
}

impl Default for LayoutGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_GRID)
    }
}
