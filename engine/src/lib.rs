#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Public facade of the isometric diagramming engine.
//!
//! [`Engine`] owns one independent map together with its interaction state and
//! the metrics snapshot it was generated from. Every mutation is expressed as
//! a [`Command`], applied to the world, and the resulting [`Event`] values are
//! fed back to the interaction controller before being returned to the caller.

use glam::Vec2;
use isomap_core::{
    Command, ConnectorId, Event, GridSize, IdSource, MetricsProvider, MetricsSnapshot,
    NodeCategory, NodeId, RegionId, Rgba, SequentialIds, Stage, TileCoord, TileRect,
    DEFAULT_GRID,
};
use isomap_projection::IsoProjection;
use isomap_system_interaction::{Input, InteractionController, Mode, UiState};
use isomap_system_layout::{detect_stage, LayoutGenerator};
use isomap_world::{apply, query, World};
use tracing::{debug, info};

/// Owns a map, its interaction controller and the metrics it was built from.
#[derive(Debug)]
pub struct Engine {
    world: World,
    controller: InteractionController,
    generator: LayoutGenerator,
    snapshot: MetricsSnapshot,
}

/// Construction parameters for an [`Engine`].
#[derive(Debug)]
pub struct EngineConfig {
    /// Grid the map is laid out on.
    pub grid: GridSize,
    /// Projection used for pointer input and rendering.
    pub projection: IsoProjection,
    /// Source of fresh identifiers for this map.
    pub ids: Box<dyn IdSource>,
    /// Stage to generate; detected from the snapshot when `None`.
    pub stage: Option<Stage>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid: DEFAULT_GRID,
            projection: IsoProjection::default(),
            ids: Box::new(SequentialIds::new()),
            stage: None,
        }
    }
}

impl Engine {
    /// Builds an engine on the default grid from the provided metrics.
    #[must_use]
    pub fn new(snapshot: MetricsSnapshot) -> Self {
        Self::with_config(snapshot, EngineConfig::default())
    }

    /// Builds an engine from whatever `provider` currently reports.
    #[must_use]
    pub fn from_provider(provider: &dyn MetricsProvider, config: EngineConfig) -> Self {
        Self::with_config(provider.snapshot(), config)
    }

    /// Builds an engine with explicit construction parameters.
    #[must_use]
    pub fn with_config(snapshot: MetricsSnapshot, config: EngineConfig) -> Self {
        let mut engine = Self {
            world: World::with_id_source(config.grid, config.ids),
            controller: InteractionController::new(config.projection),
            generator: LayoutGenerator::new(config.grid),
            snapshot,
        };
        let _ = engine.regenerate(config.stage);
        engine
    }

    /// Read-only view of the map.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only view of the interaction state.
    #[must_use]
    pub fn ui(&self) -> &UiState {
        self.controller.ui()
    }

    /// Projection used to interpret pointer positions.
    #[must_use]
    pub fn projection(&self) -> &IsoProjection {
        self.controller.projection()
    }

    /// Metrics the current layout was generated from.
    #[must_use]
    pub fn snapshot(&self) -> &MetricsSnapshot {
        &self.snapshot
    }

    /// Stage of the current layout.
    #[must_use]
    pub fn stage(&self) -> Stage {
        query::stage(&self.world)
    }

    /// Regenerates the map for `stage`, keeping every user-created region.
    pub fn set_stage(&mut self, stage: Stage) -> Vec<Event> {
        self.regenerate(Some(stage))
    }

    /// Replaces the metrics and regenerates the map.
    ///
    /// The stage is detected from the new snapshot unless `stage` is given.
    pub fn refresh_metrics(&mut self, snapshot: MetricsSnapshot, stage: Option<Stage>) -> Vec<Event> {
        self.snapshot = snapshot;
        self.regenerate(stage)
    }

    /// Stage the current snapshot would auto-detect to.
    #[must_use]
    pub fn detected_stage(&self) -> Stage {
        detect_stage(&self.snapshot)
    }

    /// Feeds one raw input event through the interaction controller.
    pub fn handle_input(&mut self, input: Input) -> Vec<Event> {
        let mut commands = Vec::new();
        self.controller.handle(input, &self.world, &mut commands);
        self.pump(commands)
    }

    /// Applies a single command and returns what the world reported.
    pub fn submit(&mut self, command: Command) -> Vec<Event> {
        self.pump(vec![command])
    }

    /// Places a node and returns its id, or `None` when the placement was
    /// ignored. Occupied tiles are refused here before reaching the world.
    pub fn add_node(
        &mut self,
        category: NodeCategory,
        tile: TileCoord,
        label: Option<String>,
    ) -> Option<NodeId> {
        if !query::is_tile_free(&self.world, tile) {
            debug!(?tile, "placement ignored: tile occupied");
            return None;
        }
        self.submit(Command::AddNode {
            category,
            tile,
            label,
        })
        .iter()
        .find_map(|event| match event {
            Event::NodeAdded { node, .. } => Some(*node),
            _ => None,
        })
    }

    /// Removes a node and its connectors. The protected hub is never removed.
    pub fn remove_node(&mut self, node: NodeId) -> Vec<Event> {
        self.submit(Command::RemoveNode { node })
    }

    /// Edits a node's caption and description.
    pub fn update_node(
        &mut self,
        node: NodeId,
        label: Option<String>,
        description: Option<String>,
    ) -> Vec<Event> {
        self.submit(Command::UpdateNode {
            node,
            label,
            description,
        })
    }

    /// Moves a node to `tile`.
    pub fn move_node(&mut self, node: NodeId, tile: TileCoord) -> Vec<Event> {
        self.submit(Command::MoveNode { node, tile })
    }

    /// Connects two nodes and returns the new connector's id, or `None` when
    /// the request was ignored.
    pub fn add_connector(&mut self, source: NodeId, target: NodeId) -> Option<ConnectorId> {
        self.submit(Command::AddConnector { source, target })
            .iter()
            .find_map(|event| match event {
                Event::ConnectorAdded { connector, .. } => Some(*connector),
                _ => None,
            })
    }

    /// Removes a connector.
    pub fn remove_connector(&mut self, connector: ConnectorId) -> Vec<Event> {
        self.submit(Command::RemoveConnector { connector })
    }

    /// Adds a region and returns its id.
    pub fn add_region(
        &mut self,
        label: impl Into<String>,
        bounds: TileRect,
        fill: Rgba,
        stroke: Rgba,
        user_created: bool,
    ) -> Option<RegionId> {
        self.submit(Command::AddRegion {
            label: label.into(),
            bounds,
            fill,
            stroke,
            user_created,
        })
        .iter()
        .find_map(|event| match event {
            Event::RegionAdded { region } => Some(*region),
            _ => None,
        })
    }

    /// Removes a region.
    pub fn remove_region(&mut self, region: RegionId) -> Vec<Event> {
        self.submit(Command::RemoveRegion { region })
    }

    /// Renames a region.
    pub fn update_region(&mut self, region: RegionId, label: impl Into<String>) -> Vec<Event> {
        self.submit(Command::UpdateRegion {
            region,
            label: label.into(),
        })
    }

    /// Translates a region together with the nodes inside it.
    pub fn move_region(&mut self, region: RegionId, dx: i32, dy: i32) -> Vec<Event> {
        self.submit(Command::MoveRegion { region, dx, dy })
    }

    /// Switches the interaction mode.
    pub fn set_mode(&mut self, mode: Mode) {
        self.controller.set_mode(mode);
    }

    /// Arms a category for placement.
    pub fn arm_placement(&mut self, category: NodeCategory) {
        self.controller.arm_placement(category);
    }

    /// Sets the zoom factor.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.controller.set_zoom(zoom);
    }

    /// Sets the pan offset.
    pub fn set_pan(&mut self, pan: Vec2) {
        self.controller.set_pan(pan);
    }

    /// Zooms while keeping the content under `cursor` fixed.
    pub fn zoom_at_point(&mut self, cursor: Vec2, zoom: f32) {
        self.controller.zoom_at_point(cursor, zoom);
    }

    /// Zooms and centers the grid inside a screen area of `viewport_size`.
    pub fn center_on_zoom(&mut self, viewport_size: Vec2, zoom: f32) {
        let grid = query::grid(&self.world);
        self.controller.center_on_zoom(grid, viewport_size, zoom);
    }

    /// Selects a node, or clears the selection.
    pub fn select_node(&mut self, node: Option<NodeId>) {
        self.controller.select_node(node);
    }

    /// Sets the hovered tile, or clears it.
    pub fn set_hovered_tile(&mut self, tile: Option<TileCoord>) {
        self.controller.set_hovered_tile(tile);
    }

    /// Selects a region, or clears the selection.
    pub fn select_region(&mut self, region: Option<RegionId>) {
        self.controller.select_region(region);
    }

    /// Marks a region as being edited, or clears the mark.
    pub fn edit_region(&mut self, region: Option<RegionId>) {
        self.controller.edit_region(region);
    }

    /// Returns every interaction and viewport field to its default.
    pub fn reset_ui(&mut self) {
        self.controller.reset();
    }

    fn regenerate(&mut self, stage: Option<Stage>) -> Vec<Event> {
        let mut commands = Vec::new();
        self.generator.handle(
            &self.snapshot,
            stage,
            self.world.id_source_mut(),
            &mut commands,
        );
        let events = self.pump(commands);
        info!(stage = ?self.stage(), "stage changed");
        events
    }

    fn pump(&mut self, commands: Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands {
            apply(&mut self.world, command, &mut events);
        }
        self.controller.observe(&events);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::with_config(
            MetricsSnapshot::default(),
            EngineConfig {
                stage: Some(Stage::Foundation),
                ..EngineConfig::default()
            },
        )
    }

    #[test]
    fn construction_generates_requested_stage() {
        let engine = engine();
        assert_eq!(engine.stage(), Stage::Foundation);
        assert_eq!(query::nodes(engine.world()).len(), 3);
    }

    #[test]
    fn construction_detects_stage_when_unspecified() {
        let mut snapshot = MetricsSnapshot::default();
        snapshot.orders.total = 12;
        let engine = Engine::new(snapshot);
        assert_eq!(engine.stage(), Stage::FirstSales);
        assert_eq!(engine.detected_stage(), Stage::FirstSales);
    }

    #[test]
    fn add_node_refuses_occupied_tile() {
        let mut engine = engine();
        let tile = TileCoord::new(2, 2);
        assert!(engine.add_node(NodeCategory::Support, tile, None).is_some());
        assert!(engine.add_node(NodeCategory::Support, tile, None).is_none());
    }

    #[test]
    fn removing_selected_node_clears_selection() {
        let mut engine = engine();
        let node = engine
            .add_node(NodeCategory::Support, TileCoord::new(2, 2), None)
            .expect("placed");
        engine.select_node(Some(node));

        let _ = engine.remove_node(node);

        assert_eq!(engine.ui().selected_node, None);
    }

    #[test]
    fn add_connector_reports_id_once() {
        let mut engine = engine();
        let a = engine
            .add_node(NodeCategory::Support, TileCoord::new(2, 2), None)
            .expect("placed");
        let b = engine
            .add_node(NodeCategory::Finance, TileCoord::new(6, 2), None)
            .expect("placed");

        let connector = engine.add_connector(a, b).expect("first connector");
        assert!(engine.add_connector(b, a).is_none());

        let stored = query::connector(engine.world(), connector).expect("stored");
        assert!(stored.connects(a, b));
        assert_eq!(stored.path.first(), Some(&TileCoord::new(2, 2)));
        assert_eq!(stored.path.last(), Some(&TileCoord::new(6, 2)));
    }

    #[test]
    fn center_on_zoom_uses_world_grid() {
        let mut engine = engine();
        engine.center_on_zoom(Vec2::new(800.0, 600.0), 1.0);
        let center = engine
            .projection()
            .tile_center(query::grid(engine.world()).center(), engine.ui().viewport);
        assert!((center - Vec2::new(400.0, 300.0)).length() < 1e-3);
    }
}
