//! Scene capture: the paint-ready view of a map and its interaction state.

use glam::Vec2;
use isomap_core::{
    ActivityLevel, ConnectorId, ConnectorStyle, NodeCategory, NodeId, NodeType, RegionId,
    TileCoord, TileRect,
};
use isomap_projection::{IsoProjection, Viewport};
use isomap_system_interaction::{DragPreview, Mode, UiState};
use isomap_world::{query, World};

use crate::Color;

const GRID_LINE_COLOR: Color = Color::new(0.58, 0.64, 0.72, 0.35);
const CONNECTOR_COLOR: Color = Color::new(0.39, 0.45, 0.55, 0.9);

/// Grid geometry needed to draw the tile diamonds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGridPresentation {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Projection used to place tiles.
    pub projection: IsoProjection,
    /// Pan and zoom in effect.
    pub viewport: Viewport,
    /// Color used for tile outlines.
    pub line_color: Color,
}

impl TileGridPresentation {
    /// Screen-space corners of one tile: top, right, bottom, left.
    #[must_use]
    pub fn tile_corners(&self, tile: TileCoord) -> [Vec2; 4] {
        self.projection.tile_corners(tile, self.viewport)
    }

    /// Screen-space corners of an inclusive tile rectangle: top, right,
    /// bottom, left.
    #[must_use]
    pub fn rect_corners(&self, rect: TileRect) -> [Vec2; 4] {
        let from = rect.from();
        let to = rect.to();
        [
            self.tile_corners(from)[0],
            self.tile_corners(TileCoord::new(to.x(), from.y()))[1],
            self.tile_corners(to)[2],
            self.tile_corners(TileCoord::new(from.x(), to.y()))[3],
        ]
    }

    /// Screen-space corners of the whole grid.
    #[must_use]
    pub fn outline(&self) -> [Vec2; 4] {
        if self.columns == 0 || self.rows == 0 {
            return [self.viewport.pan; 4];
        }
        self.rect_corners(TileRect::new(
            TileCoord::new(0, 0),
            TileCoord::new(self.columns - 1, self.rows - 1),
        ))
    }
}

/// Region ready to be painted.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionPresentation {
    /// Region identifier.
    pub id: RegionId,
    /// Caption.
    pub label: String,
    /// Inclusive tile bounds.
    pub bounds: TileRect,
    /// Screen-space outline: top, right, bottom, left.
    pub corners: [Vec2; 4],
    /// Fill color.
    pub fill: Color,
    /// Outline color.
    pub stroke: Color,
    /// Whether the user drew the region.
    pub user_created: bool,
    /// Whether the region is selected.
    pub selected: bool,
}

/// Routed connector ready to be painted.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectorPresentation {
    /// Connector identifier.
    pub id: ConnectorId,
    /// Source node.
    pub source: NodeId,
    /// Target node.
    pub target: NodeId,
    /// Tile route.
    pub route: Vec<TileCoord>,
    /// Screen-space polyline through the route's tile centers.
    pub points: Vec<Vec2>,
    /// Line style.
    pub style: ConnectorStyle,
    /// Line color.
    pub color: Color,
    /// Optional caption.
    pub label: Option<String>,
    /// Relative particle speed, when animated.
    pub flow_rate: Option<f32>,
}

/// Node ready to be painted.
#[derive(Clone, Debug, PartialEq)]
pub struct NodePresentation {
    /// Node identifier.
    pub id: NodeId,
    /// Business function.
    pub category: NodeCategory,
    /// Visual archetype.
    pub node_type: NodeType,
    /// Caption.
    pub label: String,
    /// Tile occupied by the node.
    pub tile: TileCoord,
    /// Screen-space center of the node's tile.
    pub anchor: Vec2,
    /// Base color.
    pub color: Color,
    /// Busyness indicator.
    pub activity: Option<ActivityLevel>,
    /// Outstanding alerts.
    pub alert_count: Option<u32>,
    /// Whether the node is selected.
    pub selected: bool,
}

/// Transient overlay painted after every node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Highlight {
    /// Tile under the pointer.
    HoveredTile {
        /// Hovered tile.
        tile: TileCoord,
    },
    /// Tile of the selected node.
    SelectedNode {
        /// Selected node.
        node: NodeId,
        /// Tile it occupies.
        tile: TileCoord,
    },
    /// Node armed as the source of a pending connector.
    ConnectorSource {
        /// Pending source node.
        node: NodeId,
        /// Tile it occupies.
        tile: TileCoord,
    },
    /// Section being drawn.
    SectionPreview {
        /// Rectangle spanned so far.
        bounds: TileRect,
    },
    /// Destination of a node drag.
    NodeDrag {
        /// Node being dragged.
        node: NodeId,
        /// Tile it would land on.
        tile: TileCoord,
    },
    /// Destination of a region drag.
    RegionDrag {
        /// Region being dragged.
        region: RegionId,
        /// Bounds it would occupy.
        bounds: TileRect,
    },
}

/// Immutable snapshot of everything that is painted in a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Grid geometry.
    pub tile_grid: TileGridPresentation,
    /// Regions, template regions before user regions.
    pub regions: Vec<RegionPresentation>,
    /// Connectors with a non-empty route.
    pub connectors: Vec<ConnectorPresentation>,
    /// Nodes in painter's order: ascending `x + y`, ties by id.
    pub nodes: Vec<NodePresentation>,
    /// Overlays painted after the nodes.
    pub highlights: Vec<Highlight>,
    /// Interaction mode in effect.
    pub mode: Mode,
}

impl Scene {
    /// Captures the current map and interaction state.
    #[must_use]
    pub fn capture(world: &World, ui: &UiState, projection: &IsoProjection) -> Self {
        let grid = query::grid(world);
        let viewport = ui.viewport;
        let tile_grid = TileGridPresentation {
            columns: grid.width(),
            rows: grid.height(),
            projection: *projection,
            viewport,
            line_color: GRID_LINE_COLOR,
        };

        let mut regions: Vec<RegionPresentation> = query::regions(world)
            .iter()
            .map(|region| RegionPresentation {
                id: region.id,
                label: region.label.clone(),
                bounds: region.bounds,
                corners: tile_grid.rect_corners(region.bounds),
                fill: region.fill.into(),
                stroke: region.stroke.into(),
                user_created: region.user_created,
                selected: ui.selected_region == Some(region.id),
            })
            .collect();
        regions.sort_by_key(|region| region.user_created);

        let connectors = query::connectors(world)
            .iter()
            .filter(|connector| !connector.path.is_empty())
            .map(|connector| ConnectorPresentation {
                id: connector.id,
                source: connector.source,
                target: connector.target,
                route: connector.path.clone(),
                points: connector
                    .path
                    .iter()
                    .map(|tile| projection.tile_center(*tile, viewport))
                    .collect(),
                style: connector.style,
                color: CONNECTOR_COLOR,
                label: connector.label.clone(),
                flow_rate: connector.flow_rate,
            })
            .collect();

        let mut nodes: Vec<NodePresentation> = query::nodes(world)
            .iter()
            .map(|node| NodePresentation {
                id: node.id,
                category: node.category,
                node_type: node.node_type,
                label: node.label.clone(),
                tile: node.tile,
                anchor: projection.tile_center(node.tile, viewport),
                color: Color::for_category(node.category),
                activity: node.activity,
                alert_count: node.alert_count,
                selected: ui.selected_node == Some(node.id),
            })
            .collect();
        nodes.sort_by_key(|node| (node.tile.depth(), node.id));

        Self {
            tile_grid,
            regions,
            connectors,
            nodes,
            highlights: highlights(world, ui),
            mode: ui.mode,
        }
    }

    /// Node painted at `tile`, if any.
    #[must_use]
    pub fn node_at(&self, tile: TileCoord) -> Option<&NodePresentation> {
        self.nodes.iter().find(|node| node.tile == tile)
    }
}

fn highlights(world: &World, ui: &UiState) -> Vec<Highlight> {
    let node_tile = |node: NodeId| query::node(world, node).map(|node| node.tile);
    let mut highlights = Vec::new();

    if let Some(tile) = ui.hovered_tile {
        highlights.push(Highlight::HoveredTile { tile });
    }
    if let Some((node, tile)) = ui
        .selected_node
        .and_then(|node| node_tile(node).map(|tile| (node, tile)))
    {
        highlights.push(Highlight::SelectedNode { node, tile });
    }
    if let Some((node, tile)) = ui
        .connector_source
        .and_then(|node| node_tile(node).map(|tile| (node, tile)))
    {
        highlights.push(Highlight::ConnectorSource { node, tile });
    }
    if let Some(bounds) = ui.section_preview() {
        highlights.push(Highlight::SectionPreview { bounds });
    }
    match ui.drag_preview() {
        Some(DragPreview::Node { node, tile }) => {
            highlights.push(Highlight::NodeDrag { node, tile });
        }
        Some(DragPreview::Region { region, dx, dy }) => {
            let bounds = query::region(world, region)
                .and_then(|region| region.bounds.translated(dx, dy))
                .filter(|bounds| bounds.fits_within(query::grid(world)));
            if let Some(bounds) = bounds {
                highlights.push(Highlight::RegionDrag { region, bounds });
            }
        }
        None => {}
    }
    highlights
}

#[cfg(test)]
mod tests {
    use super::*;
    use isomap_core::{Command, GridSize, SequentialIds};
    use isomap_world::apply;

    fn world_with(commands: Vec<Command>) -> World {
        let mut world =
            World::with_id_source(GridSize::new(8, 8), Box::new(SequentialIds::new()));
        let mut events = Vec::new();
        for command in commands {
            apply(&mut world, command, &mut events);
        }
        world
    }

    fn add(category: NodeCategory, x: u32, y: u32) -> Command {
        Command::AddNode {
            category,
            tile: TileCoord::new(x, y),
            label: None,
        }
    }

    #[test]
    fn grid_outline_spans_every_tile() {
        let world = world_with(Vec::new());
        let scene = Scene::capture(&world, &UiState::default(), &IsoProjection::default());
        let outline = scene.tile_grid.outline();

        assert_eq!(outline[0], Vec2::new(0.0, -16.0));
        assert_eq!(outline[2], Vec2::new(0.0, 14.0 * 16.0 + 16.0));
    }

    #[test]
    fn hover_and_selection_are_separate_highlights() {
        let world = world_with(vec![add(NodeCategory::Support, 2, 3)]);
        let node = query::nodes(&world)[0].id;
        let ui = UiState {
            hovered_tile: Some(TileCoord::new(5, 5)),
            selected_node: Some(node),
            ..UiState::default()
        };

        let scene = Scene::capture(&world, &ui, &IsoProjection::default());

        assert_eq!(
            scene.highlights,
            vec![
                Highlight::HoveredTile {
                    tile: TileCoord::new(5, 5)
                },
                Highlight::SelectedNode {
                    node,
                    tile: TileCoord::new(2, 3)
                },
            ]
        );
        assert!(scene.nodes[0].selected);
    }

    #[test]
    fn stale_selection_produces_no_highlight() {
        let world = world_with(Vec::new());
        let ui = UiState {
            selected_node: Some(NodeId::new(42)),
            ..UiState::default()
        };
        let scene = Scene::capture(&world, &ui, &IsoProjection::default());
        assert!(scene.highlights.is_empty());
    }
}
