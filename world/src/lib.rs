#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative map state for the isometric diagramming engine.
//!
//! The world owns nodes, connectors and regions. It is mutated exclusively
//! through [`apply`], which validates each [`Command`], performs the mutation
//! and reports what happened as [`Event`] values. Invalid requests never fail:
//! they leave the map untouched and report an informational rejection event.

mod routes;

use isomap_core::{
    Command, ConnectionError, Connector, Event, GridSize, IdSource, MapLayout, Node, NodeId,
    PlacementError, Region, RegionId, RemovalError, SequentialIds, Stage, TileCoord,
    DEFAULT_GRID,
};
use tracing::{debug, info};

pub use hit_test::HitBox;

/// Represents the authoritative map state.
#[derive(Debug)]
pub struct World {
    grid: GridSize,
    stage: Stage,
    nodes: Vec<Node>,
    connectors: Vec<Connector>,
    regions: Vec<Region>,
    ids: Box<dyn IdSource>,
}

impl World {
    /// Creates an empty map on the default grid with a fresh sequential id source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_id_source(DEFAULT_GRID, Box::new(SequentialIds::new()))
    }

    /// Creates an empty map on the provided grid using an injected id source.
    #[must_use]
    pub fn with_id_source(grid: GridSize, ids: Box<dyn IdSource>) -> Self {
        Self {
            grid,
            stage: Stage::default(),
            nodes: Vec::new(),
            connectors: Vec::new(),
            regions: Vec::new(),
            ids,
        }
    }

    /// Identifier source owned by this map.
    ///
    /// Layouts destined for [`Command::ReplaceLayout`] should draw their ids
    /// from here so that preserved regions never collide with generated items.
    pub fn id_source_mut(&mut self) -> &mut dyn IdSource {
        self.ids.as_mut()
    }

    fn node_index(&self, node: NodeId) -> Option<usize> {
        self.nodes.iter().position(|candidate| candidate.id == node)
    }

    fn region_index(&self, region: RegionId) -> Option<usize> {
        self.regions.iter().position(|candidate| candidate.id == region)
    }

    fn occupant(&self, tile: TileCoord) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|node| node.tile == tile)
            .map(|node| node.id)
    }

    fn recompute_routes(&mut self, out_events: &mut Vec<Event>) {
        let report = routes::recompute(self.grid, &self.nodes, &mut self.connectors);
        for connector in report.pruned {
            debug!(connector = connector.get(), "pruned dangling connector");
            out_events.push(Event::ConnectorRemoved { connector });
        }
        debug!(
            routed = report.routed,
            unroutable = report.unroutable,
            "recomputed connector routes"
        );
        out_events.push(Event::RoutesRecomputed {
            routed: report.routed,
            unroutable: report.unroutable,
        });
    }

    fn move_region(
        &mut self,
        region: RegionId,
        dx: i32,
        dy: i32,
    ) -> Result<Vec<NodeId>, PlacementError> {
        let index = self.region_index(region).ok_or(PlacementError::Missing)?;
        let bounds = self.regions[index].bounds;
        let translated = bounds
            .translated(dx, dy)
            .filter(|rect| rect.fits_within(self.grid))
            .ok_or(PlacementError::OutOfBounds)?;

        let mut moves = Vec::new();
        for node in self.nodes.iter().filter(|node| bounds.contains(node.tile)) {
            let destination = node
                .tile
                .offset(dx, dy)
                .filter(|tile| self.grid.contains(*tile))
                .ok_or(PlacementError::OutOfBounds)?;
            moves.push((node.id, destination));
        }

        let moving: Vec<NodeId> = moves.iter().map(|(id, _)| *id).collect();
        let collides = moves.iter().any(|(_, destination)| {
            self.nodes
                .iter()
                .any(|other| other.tile == *destination && !moving.contains(&other.id))
        });
        if collides {
            return Err(PlacementError::Occupied);
        }

        for (id, destination) in moves {
            if let Some(node) = self.nodes.iter_mut().find(|node| node.id == id) {
                node.tile = destination;
            }
        }
        self.regions[index].bounds = translated;
        Ok(moving)
    }

    fn replace_layout(&mut self, layout: MapLayout) -> usize {
        let MapLayout {
            stage,
            grid,
            nodes,
            connectors,
            regions,
        } = layout;

        let preserved: Vec<Region> = self
            .regions
            .drain(..)
            .filter(|region| region.user_created)
            .collect();

        self.grid = grid;
        self.stage = stage;
        self.nodes = nodes
            .into_iter()
            .filter(|node| {
                let inside = grid.contains(node.tile);
                if !inside {
                    debug!(node = node.id.get(), "dropped generated node outside grid");
                }
                inside
            })
            .collect();
        self.connectors = connectors;
        self.regions = regions;

        let mut carried = 0;
        for mut region in preserved {
            let Some(bounds) = grid.clamp_rect(region.bounds) else {
                continue;
            };
            region.bounds = bounds;
            if self.region_index(region.id).is_some() {
                region.id = self.ids.next_region_id();
            }
            self.regions.push(region);
            carried += 1;
        }
        carried
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::AddNode {
            category,
            tile,
            label,
        } => {
            if !world.grid.contains(tile) {
                debug!(?category, ?tile, "ignored node placement outside grid");
                out_events.push(Event::NodePlacementRejected {
                    category,
                    tile,
                    reason: PlacementError::OutOfBounds,
                });
                return;
            }

            let id = world.ids.next_node_id();
            let mut node = Node::new(id, category, tile);
            if let Some(label) = label {
                node.label = label;
            }
            world.nodes.push(node);
            out_events.push(Event::NodeAdded {
                node: id,
                category,
                tile,
            });
            world.recompute_routes(out_events);
        }
        Command::RemoveNode { node } => {
            let reason = match world.node_index(node) {
                None => Some(RemovalError::MissingNode),
                Some(index) if world.nodes[index].is_protected() => Some(RemovalError::Protected),
                Some(_) => None,
            };
            if let Some(reason) = reason {
                debug!(node = node.get(), %reason, "ignored node removal");
                out_events.push(Event::NodeRemovalRejected { node, reason });
                return;
            }

            world.nodes.retain(|candidate| candidate.id != node);
            let mut removed = Vec::new();
            world.connectors.retain(|connector| {
                let touches = connector.touches(node);
                if touches {
                    removed.push(connector.id);
                }
                !touches
            });
            out_events.push(Event::NodeRemoved {
                node,
                connectors: removed,
            });
            world.recompute_routes(out_events);
        }
        Command::UpdateNode {
            node,
            label,
            description,
        } => {
            let Some(index) = world.node_index(node) else {
                debug!(node = node.get(), "ignored update of missing node");
                return;
            };
            let target = &mut world.nodes[index];
            if let Some(label) = label {
                target.label = label;
            }
            if let Some(description) = description {
                target.description = description;
            }
            out_events.push(Event::NodeUpdated { node });
        }
        Command::MoveNode { node, tile } => {
            let Some(index) = world.node_index(node) else {
                out_events.push(Event::NodeMoveRejected {
                    node,
                    tile,
                    reason: PlacementError::Missing,
                });
                return;
            };
            let from = world.nodes[index].tile;
            if from == tile {
                return;
            }

            let rejection = if !world.grid.contains(tile) {
                Some(PlacementError::OutOfBounds)
            } else if world.occupant(tile).is_some() {
                Some(PlacementError::Occupied)
            } else {
                None
            };
            if let Some(reason) = rejection {
                debug!(node = node.get(), ?tile, %reason, "ignored node move");
                out_events.push(Event::NodeMoveRejected { node, tile, reason });
                return;
            }

            world.nodes[index].tile = tile;
            out_events.push(Event::NodeMoved {
                node,
                from,
                to: tile,
            });
            world.recompute_routes(out_events);
        }
        Command::AddConnector { source, target } => {
            let rejection = if source == target {
                Some(ConnectionError::SelfLoop)
            } else if world.node_index(source).is_none() || world.node_index(target).is_none() {
                Some(ConnectionError::MissingEndpoint)
            } else if world
                .connectors
                .iter()
                .any(|connector| connector.connects(source, target))
            {
                Some(ConnectionError::Duplicate)
            } else {
                None
            };
            if let Some(reason) = rejection {
                debug!(
                    source = source.get(),
                    target = target.get(),
                    %reason,
                    "ignored connector request"
                );
                out_events.push(Event::ConnectorRejected {
                    source,
                    target,
                    reason,
                });
                return;
            }

            let id = world.ids.next_connector_id();
            world.connectors.push(Connector::new(id, source, target));
            out_events.push(Event::ConnectorAdded {
                connector: id,
                source,
                target,
            });
            world.recompute_routes(out_events);
        }
        Command::RemoveConnector { connector } => {
            let Some(index) = world
                .connectors
                .iter()
                .position(|candidate| candidate.id == connector)
            else {
                debug!(connector = connector.get(), "ignored removal of missing connector");
                return;
            };
            let _ = world.connectors.remove(index);
            out_events.push(Event::ConnectorRemoved { connector });
            world.recompute_routes(out_events);
        }
        Command::AddRegion {
            label,
            bounds,
            fill,
            stroke,
            user_created,
        } => {
            let Some(bounds) = world.grid.clamp_rect(bounds) else {
                debug!(%label, "ignored region on a grid without area");
                return;
            };
            let id = world.ids.next_region_id();
            world.regions.push(Region {
                id,
                label,
                bounds,
                fill,
                stroke,
                user_created,
            });
            out_events.push(Event::RegionAdded { region: id });
        }
        Command::RemoveRegion { region } => {
            let Some(index) = world.region_index(region) else {
                debug!(region = region.get(), "ignored removal of missing region");
                return;
            };
            let _ = world.regions.remove(index);
            out_events.push(Event::RegionRemoved { region });
        }
        Command::UpdateRegion { region, label } => {
            let Some(index) = world.region_index(region) else {
                debug!(region = region.get(), "ignored update of missing region");
                return;
            };
            world.regions[index].label = label;
            out_events.push(Event::RegionUpdated { region });
        }
        Command::MoveRegion { region, dx, dy } => {
            if dx == 0 && dy == 0 {
                return;
            }
            match world.move_region(region, dx, dy) {
                Ok(nodes) => {
                    let carried_nodes = !nodes.is_empty();
                    out_events.push(Event::RegionMoved {
                        region,
                        dx,
                        dy,
                        nodes,
                    });
                    if carried_nodes {
                        world.recompute_routes(out_events);
                    }
                }
                Err(reason) => {
                    debug!(region = region.get(), dx, dy, %reason, "ignored region move");
                    out_events.push(Event::RegionMoveRejected { region, reason });
                }
            }
        }
        Command::ReplaceLayout { layout } => {
            let stage = layout.stage;
            let preserved_regions = world.replace_layout(layout);
            info!(
                stage = stage.name(),
                nodes = world.nodes.len(),
                connectors = world.connectors.len(),
                preserved_regions,
                "installed layout"
            );
            out_events.push(Event::LayoutReplaced {
                stage,
                preserved_regions,
            });
            world.recompute_routes(out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use isomap_core::{
        Connector, ConnectorId, GridSize, MapLayout, Node, NodeId, Region, RegionId, Stage,
        TileCoord,
    };
    use isomap_projection::{IsoProjection, Viewport};

    use super::{hit_test, World};

    /// Dimensions of the grid.
    #[must_use]
    pub fn grid(world: &World) -> GridSize {
        world.grid
    }

    /// Stage of the installed layout.
    #[must_use]
    pub fn stage(world: &World) -> Stage {
        world.stage
    }

    /// Every node in insertion order.
    #[must_use]
    pub fn nodes(world: &World) -> &[Node] {
        &world.nodes
    }

    /// Every connector in insertion order, with routes computed.
    #[must_use]
    pub fn connectors(world: &World) -> &[Connector] {
        &world.connectors
    }

    /// Every region. User-created regions carried across stage changes come last.
    #[must_use]
    pub fn regions(world: &World) -> &[Region] {
        &world.regions
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(world: &World, id: NodeId) -> Option<&Node> {
        world.nodes.iter().find(|node| node.id == id)
    }

    /// Looks up a connector by id.
    #[must_use]
    pub fn connector(world: &World, id: ConnectorId) -> Option<&Connector> {
        world.connectors.iter().find(|connector| connector.id == id)
    }

    /// Looks up a region by id.
    #[must_use]
    pub fn region(world: &World, id: RegionId) -> Option<&Region> {
        world.regions.iter().find(|region| region.id == id)
    }

    /// Node occupying exactly the provided tile, if any.
    #[must_use]
    pub fn node_at(world: &World, tile: TileCoord) -> Option<NodeId> {
        world.occupant(tile)
    }

    /// Reports whether the tile lies inside the grid and holds no node.
    #[must_use]
    pub fn is_tile_free(world: &World, tile: TileCoord) -> bool {
        world.grid.contains(tile) && world.occupant(tile).is_none()
    }

    /// Node whose generous selection box contains the screen point.
    ///
    /// This is deliberately looser than [`node_at`]: clicks on the drawn
    /// building select it even when they land on a neighbouring tile.
    #[must_use]
    pub fn hit_test(
        world: &World,
        screen: Vec2,
        viewport: Viewport,
        projection: &IsoProjection,
    ) -> Option<NodeId> {
        hit_test::topmost_at(&world.nodes, screen, viewport, projection)
    }

    /// Topmost region whose inclusive bounds contain the tile.
    #[must_use]
    pub fn region_at(world: &World, tile: TileCoord) -> Option<RegionId> {
        world
            .regions
            .iter()
            .rev()
            .find(|region| region.bounds.contains(tile))
            .map(|region| region.id)
    }

    /// Connectors with `node` as either endpoint.
    pub fn connectors_touching(world: &World, node: NodeId) -> impl Iterator<Item = &Connector> {
        world
            .connectors
            .iter()
            .filter(move |connector| connector.touches(node))
    }

    /// Captures the complete map as a layout value.
    #[must_use]
    pub fn layout(world: &World) -> MapLayout {
        MapLayout {
            stage: world.stage,
            grid: world.grid,
            nodes: world.nodes.clone(),
            connectors: world.connectors.clone(),
            regions: world.regions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isomap_core::{ConnectorId, NodeCategory, Rgba, TileRect};

    fn small_world() -> World {
        World::with_id_source(GridSize::new(10, 10), Box::new(SequentialIds::new()))
    }

    fn add_node(world: &mut World, category: NodeCategory, x: u32, y: u32) -> NodeId {
        let mut events = Vec::new();
        apply(
            world,
            Command::AddNode {
                category,
                tile: TileCoord::new(x, y),
                label: None,
            },
            &mut events,
        );
        events
            .iter()
            .find_map(|event| match event {
                Event::NodeAdded { node, .. } => Some(*node),
                _ => None,
            })
            .expect("node placed")
    }

    fn add_region(world: &mut World, from: (u32, u32), to: (u32, u32), user_created: bool) -> RegionId {
        let mut events = Vec::new();
        apply(
            world,
            Command::AddRegion {
                label: "Section".to_owned(),
                bounds: TileRect::new(TileCoord::new(from.0, from.1), TileCoord::new(to.0, to.1)),
                fill: Rgba::from_rgba(0, 0, 0, 40),
                stroke: Rgba::from_rgb(0, 0, 0),
                user_created,
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::RegionAdded { region }] => *region,
            other => panic!("unexpected events {other:?}"),
        }
    }

    #[test]
    fn add_node_outside_grid_is_rejected() {
        let mut world = small_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::AddNode {
                category: NodeCategory::Catalog,
                tile: TileCoord::new(10, 3),
                label: None,
            },
            &mut events,
        );
        assert!(query::nodes(&world).is_empty());
        assert_eq!(
            events,
            vec![Event::NodePlacementRejected {
                category: NodeCategory::Catalog,
                tile: TileCoord::new(10, 3),
                reason: PlacementError::OutOfBounds,
            }]
        );
    }

    #[test]
    fn add_node_uses_custom_label() {
        let mut world = small_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::AddNode {
                category: NodeCategory::Finance,
                tile: TileCoord::new(1, 1),
                label: Some("Ledger".to_owned()),
            },
            &mut events,
        );
        assert_eq!(query::nodes(&world)[0].label, "Ledger");
    }

    #[test]
    fn removing_node_cascades_connectors() {
        let mut world = small_world();
        let hub = add_node(&mut world, NodeCategory::Headquarters, 5, 5);
        let shop = add_node(&mut world, NodeCategory::Storefront, 1, 1);
        let depot = add_node(&mut world, NodeCategory::Warehouse, 8, 8);
        let mut events = Vec::new();
        apply(&mut world, Command::AddConnector { source: hub, target: shop }, &mut events);
        apply(&mut world, Command::AddConnector { source: shop, target: depot }, &mut events);
        apply(&mut world, Command::AddConnector { source: hub, target: depot }, &mut events);
        events.clear();

        apply(&mut world, Command::RemoveNode { node: shop }, &mut events);

        assert!(query::node(&world, shop).is_none());
        assert_eq!(query::connectors(&world).len(), 1);
        assert!(matches!(
            events.first(),
            Some(Event::NodeRemoved { connectors, .. }) if connectors.len() == 2
        ));
    }

    #[test]
    fn update_node_edits_fields_without_rerouting() {
        let mut world = small_world();
        let node = add_node(&mut world, NodeCategory::Support, 2, 2);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::UpdateNode {
                node,
                label: None,
                description: Some("Tickets and chat".to_owned()),
            },
            &mut events,
        );
        let stored = query::node(&world, node).expect("node exists");
        assert_eq!(stored.label, "Support");
        assert_eq!(stored.description, "Tickets and chat");
        assert_eq!(events, vec![Event::NodeUpdated { node }]);
    }

    #[test]
    fn move_node_refuses_occupied_and_outside_tiles() {
        let mut world = small_world();
        let first = add_node(&mut world, NodeCategory::Catalog, 2, 2);
        let _ = add_node(&mut world, NodeCategory::Finance, 3, 3);
        let mut events = Vec::new();

        apply(&mut world, Command::MoveNode { node: first, tile: TileCoord::new(3, 3) }, &mut events);
        apply(&mut world, Command::MoveNode { node: first, tile: TileCoord::new(0, 12) }, &mut events);

        assert_eq!(query::node(&world, first).map(|node| node.tile), Some(TileCoord::new(2, 2)));
        assert!(matches!(
            events.as_slice(),
            [
                Event::NodeMoveRejected { reason: PlacementError::Occupied, .. },
                Event::NodeMoveRejected { reason: PlacementError::OutOfBounds, .. },
            ]
        ));
    }

    #[test]
    fn connector_requests_reject_self_loops_and_missing_nodes() {
        let mut world = small_world();
        let node = add_node(&mut world, NodeCategory::Catalog, 2, 2);
        let mut events = Vec::new();

        apply(&mut world, Command::AddConnector { source: node, target: node }, &mut events);
        apply(
            &mut world,
            Command::AddConnector {
                source: node,
                target: NodeId::new(99),
            },
            &mut events,
        );

        assert!(query::connectors(&world).is_empty());
        assert!(matches!(
            events.as_slice(),
            [
                Event::ConnectorRejected { reason: ConnectionError::SelfLoop, .. },
                Event::ConnectorRejected { reason: ConnectionError::MissingEndpoint, .. },
            ]
        ));
    }

    #[test]
    fn remove_connector_drops_route() {
        let mut world = small_world();
        let a = add_node(&mut world, NodeCategory::Catalog, 1, 1);
        let b = add_node(&mut world, NodeCategory::Finance, 6, 1);
        let mut events = Vec::new();
        apply(&mut world, Command::AddConnector { source: a, target: b }, &mut events);
        let connector = query::connectors(&world)[0].id;
        events.clear();

        apply(&mut world, Command::RemoveConnector { connector }, &mut events);

        assert!(query::connectors(&world).is_empty());
        assert_eq!(events[0], Event::ConnectorRemoved { connector });
    }

    #[test]
    fn move_region_carries_nodes_inside_inclusive_bounds() {
        let mut world = small_world();
        let edge = add_node(&mut world, NodeCategory::Catalog, 4, 4);
        let outside = add_node(&mut world, NodeCategory::Finance, 5, 5);
        let region = add_region(&mut world, (2, 2), (4, 4), false);
        let mut events = Vec::new();

        apply(&mut world, Command::MoveRegion { region, dx: -2, dy: 1 }, &mut events);

        assert_eq!(query::node(&world, edge).map(|node| node.tile), Some(TileCoord::new(2, 5)));
        assert_eq!(query::node(&world, outside).map(|node| node.tile), Some(TileCoord::new(5, 5)));
        let bounds = query::region(&world, region).expect("region").bounds;
        assert_eq!(bounds, TileRect::new(TileCoord::new(0, 3), TileCoord::new(2, 5)));
        assert!(matches!(
            events.first(),
            Some(Event::RegionMoved { nodes, .. }) if nodes == &vec![edge]
        ));
    }

    #[test]
    fn move_region_is_all_or_nothing() {
        let mut world = small_world();
        let inside = add_node(&mut world, NodeCategory::Catalog, 2, 2);
        let _blocker = add_node(&mut world, NodeCategory::Finance, 5, 2);
        let region = add_region(&mut world, (1, 1), (3, 3), true);
        let mut events = Vec::new();

        apply(&mut world, Command::MoveRegion { region, dx: 3, dy: 0 }, &mut events);
        apply(&mut world, Command::MoveRegion { region, dx: -2, dy: 0 }, &mut events);

        assert_eq!(query::node(&world, inside).map(|node| node.tile), Some(TileCoord::new(2, 2)));
        assert_eq!(
            query::region(&world, region).map(|region| region.bounds.from()),
            Some(TileCoord::new(1, 1))
        );
        assert_eq!(
            events,
            vec![
                Event::RegionMoveRejected {
                    region,
                    reason: PlacementError::Occupied,
                },
                Event::RegionMoveRejected {
                    region,
                    reason: PlacementError::OutOfBounds,
                },
            ]
        );
    }

    #[test]
    fn region_edits_are_applied() {
        let mut world = small_world();
        let region = add_region(&mut world, (0, 0), (12, 3), true);
        assert_eq!(
            query::region(&world, region).map(|region| region.bounds.to()),
            Some(TileCoord::new(9, 3))
        );
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::UpdateRegion {
                region,
                label: "Returns".to_owned(),
            },
            &mut events,
        );
        assert_eq!(query::region(&world, region).map(|region| region.label.as_str()), Some("Returns"));
        assert_eq!(query::region_at(&world, TileCoord::new(9, 3)), Some(region));

        apply(&mut world, Command::RemoveRegion { region }, &mut events);
        assert!(query::regions(&world).is_empty());
        assert_eq!(
            events,
            vec![Event::RegionUpdated { region }, Event::RegionRemoved { region }]
        );
    }

    #[test]
    fn replace_layout_keeps_only_user_regions() {
        let mut world = small_world();
        let _template = add_region(&mut world, (0, 0), (2, 2), false);
        let user = add_region(&mut world, (6, 6), (8, 8), true);
        let kept = query::region(&world, user).cloned().expect("user region");
        let layout = MapLayout::empty(Stage::Growth, GridSize::new(10, 10));
        let mut events = Vec::new();

        apply(&mut world, Command::ReplaceLayout { layout }, &mut events);

        assert_eq!(query::regions(&world), &[kept]);
        assert_eq!(query::stage(&world), Stage::Growth);
        assert_eq!(
            events[0],
            Event::LayoutReplaced {
                stage: Stage::Growth,
                preserved_regions: 1,
            }
        );
    }

    #[test]
    fn replace_layout_prunes_dangling_connectors_and_routes_rest() {
        let mut world = small_world();
        let mut layout = MapLayout::empty(Stage::FirstSales, GridSize::new(10, 10));
        layout.nodes = vec![
            Node::new(NodeId::new(40), NodeCategory::Headquarters, TileCoord::new(5, 5)),
            Node::new(NodeId::new(41), NodeCategory::Catalog, TileCoord::new(1, 5)),
            Node::new(NodeId::new(42), NodeCategory::Catalog, TileCoord::new(1, 14)),
        ];
        layout.connectors = vec![
            Connector::new(ConnectorId::new(7), NodeId::new(40), NodeId::new(41)),
            Connector::new(ConnectorId::new(8), NodeId::new(40), NodeId::new(42)),
        ];
        let mut events = Vec::new();

        apply(&mut world, Command::ReplaceLayout { layout }, &mut events);

        assert_eq!(query::nodes(&world).len(), 2);
        assert_eq!(query::connectors(&world).len(), 1);
        assert!(!query::connectors(&world)[0].path.is_empty());
        assert!(events.contains(&Event::RoutesRecomputed {
            routed: 1,
            unroutable: 0,
        }));
    }

    #[test]
    fn tile_queries_distinguish_exact_occupancy() {
        let mut world = small_world();
        let node = add_node(&mut world, NodeCategory::Warehouse, 4, 6);
        assert_eq!(query::node_at(&world, TileCoord::new(4, 6)), Some(node));
        assert!(!query::is_tile_free(&world, TileCoord::new(4, 6)));
        assert!(query::is_tile_free(&world, TileCoord::new(4, 5)));
        assert!(!query::is_tile_free(&world, TileCoord::new(40, 5)));
    }

    #[test]
    fn hit_test_is_more_generous_than_tile_occupancy() {
        let mut world = small_world();
        let node = add_node(&mut world, NodeCategory::Headquarters, 4, 4);
        let projection = isomap_projection::IsoProjection::default();
        let viewport = isomap_projection::Viewport::default();
        let above = projection.tile_center(TileCoord::new(3, 3), viewport);

        assert_eq!(query::node_at(&world, TileCoord::new(3, 3)), None);
        assert_eq!(query::hit_test(&world, above, viewport, &projection), Some(node));
    }
}
