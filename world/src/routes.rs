use isomap_core::{Connector, ConnectorId, GridSize, Node, NodeId, TileCoord};
use isomap_system_pathfinding::{find_path, Obstacles};

/// Outcome of a full route recomputation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct RouteReport {
    pub(crate) routed: usize,
    pub(crate) unroutable: usize,
    pub(crate) pruned: Vec<ConnectorId>,
}

/// Drops connectors with a missing endpoint and re-plans every remaining route.
pub(crate) fn recompute(grid: GridSize, nodes: &[Node], connectors: &mut Vec<Connector>) -> RouteReport {
    let mut report = RouteReport::default();

    connectors.retain(|connector| {
        let intact = tile_of(nodes, connector.source).is_some()
            && tile_of(nodes, connector.target).is_some();
        if !intact {
            report.pruned.push(connector.id);
        }
        intact
    });

    for connector in connectors.iter_mut() {
        let (Some(start), Some(end)) = (
            tile_of(nodes, connector.source),
            tile_of(nodes, connector.target),
        ) else {
            continue;
        };

        let obstacles = Obstacles::from_nodes(grid, nodes, &[connector.source, connector.target]);
        connector.path = find_path(&obstacles, start, end);
        if connector.path.is_empty() {
            report.unroutable += 1;
        } else {
            report.routed += 1;
        }
    }

    report
}

fn tile_of(nodes: &[Node], id: NodeId) -> Option<TileCoord> {
    nodes.iter().find(|node| node.id == id).map(|node| node.tile)
}
