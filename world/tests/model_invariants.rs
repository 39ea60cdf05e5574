use isomap_core::{
    Command, ConnectionError, Event, GridSize, NodeCategory, NodeId, RemovalError, SequentialIds,
    TileCoord,
};
use isomap_world::{apply, query, World};

fn world_with_nodes(positions: &[(NodeCategory, u32, u32)]) -> (World, Vec<NodeId>) {
    let mut world = World::with_id_source(GridSize::new(12, 12), Box::new(SequentialIds::new()));
    let mut ids = Vec::new();
    for &(category, x, y) in positions {
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::AddNode {
                category,
                tile: TileCoord::new(x, y),
                label: None,
            },
            &mut events,
        );
        ids.extend(events.iter().filter_map(|event| match event {
            Event::NodeAdded { node, .. } => Some(*node),
            _ => None,
        }));
    }
    (world, ids)
}

#[test]
fn reverse_duplicate_connector_is_ignored() {
    let (mut world, ids) = world_with_nodes(&[
        (NodeCategory::Headquarters, 6, 6),
        (NodeCategory::Storefront, 2, 2),
    ]);
    let mut events = Vec::new();

    apply(
        &mut world,
        Command::AddConnector {
            source: ids[0],
            target: ids[1],
        },
        &mut events,
    );
    apply(
        &mut world,
        Command::AddConnector {
            source: ids[1],
            target: ids[0],
        },
        &mut events,
    );

    assert_eq!(query::connectors(&world).len(), 1);
    assert!(events.contains(&Event::ConnectorRejected {
        source: ids[1],
        target: ids[0],
        reason: ConnectionError::Duplicate,
    }));
}

#[test]
fn removing_hub_changes_nothing() {
    let (mut world, ids) = world_with_nodes(&[
        (NodeCategory::Headquarters, 6, 6),
        (NodeCategory::Storefront, 2, 2),
    ]);
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::AddConnector {
            source: ids[0],
            target: ids[1],
        },
        &mut events,
    );
    let nodes_before = query::nodes(&world).to_vec();
    let connectors_before = query::connectors(&world).to_vec();
    events.clear();

    apply(&mut world, Command::RemoveNode { node: ids[0] }, &mut events);

    assert_eq!(query::nodes(&world), nodes_before.as_slice());
    assert_eq!(query::connectors(&world), connectors_before.as_slice());
    assert_eq!(
        events,
        vec![Event::NodeRemovalRejected {
            node: ids[0],
            reason: RemovalError::Protected,
        }]
    );
}

#[test]
fn moved_node_becomes_route_endpoint() {
    let (mut world, ids) = world_with_nodes(&[
        (NodeCategory::Headquarters, 6, 6),
        (NodeCategory::Storefront, 2, 2),
        (NodeCategory::Warehouse, 10, 2),
        (NodeCategory::Catalog, 2, 10),
    ]);
    let mut events = Vec::new();
    for &other in &ids[1..] {
        apply(
            &mut world,
            Command::AddConnector {
                source: ids[0],
                target: other,
            },
            &mut events,
        );
    }
    apply(
        &mut world,
        Command::AddConnector {
            source: ids[2],
            target: ids[0],
        },
        &mut events,
    );

    let destination = TileCoord::new(7, 9);
    apply(
        &mut world,
        Command::MoveNode {
            node: ids[0],
            tile: destination,
        },
        &mut events,
    );

    let touching: Vec<_> = query::connectors_touching(&world, ids[0]).collect();
    assert_eq!(touching.len(), 3);
    for connector in touching {
        let first = connector.path.first().copied();
        let last = connector.path.last().copied();
        assert!(
            first == Some(destination) || last == Some(destination),
            "route {:?} does not touch the moved node",
            connector.path
        );
    }
}

#[test]
fn every_node_stays_inside_grid() {
    let (mut world, ids) = world_with_nodes(&[
        (NodeCategory::Headquarters, 0, 0),
        (NodeCategory::Storefront, 11, 11),
        (NodeCategory::Finance, 12, 0),
        (NodeCategory::Support, 0, 12),
    ]);
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::MoveNode {
            node: ids[1],
            tile: TileCoord::new(11, 40),
        },
        &mut events,
    );

    let grid = query::grid(&world);
    assert_eq!(query::nodes(&world).len(), 2);
    for node in query::nodes(&world) {
        assert!(node.tile.x() < grid.width() && node.tile.y() < grid.height());
    }
}

#[test]
fn routes_are_recomputed_idempotently() {
    let (mut world, ids) = world_with_nodes(&[
        (NodeCategory::Headquarters, 1, 1),
        (NodeCategory::Storefront, 9, 9),
        (NodeCategory::Catalog, 5, 5),
    ]);
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::AddConnector {
            source: ids[0],
            target: ids[1],
        },
        &mut events,
    );
    let first = query::connectors(&world).to_vec();

    apply(
        &mut world,
        Command::UpdateNode {
            node: ids[2],
            label: Some("Products".to_owned()),
            description: None,
        },
        &mut events,
    );
    apply(
        &mut world,
        Command::AddRegion {
            label: "Core".to_owned(),
            bounds: isomap_core::TileRect::new(TileCoord::new(0, 0), TileCoord::new(2, 2)),
            fill: isomap_core::Rgba::from_rgba(1, 2, 3, 4),
            stroke: isomap_core::Rgba::from_rgb(1, 2, 3),
            user_created: true,
        },
        &mut events,
    );

    assert_eq!(query::connectors(&world), first.as_slice());
    assert!(!first[0].path.contains(&TileCoord::new(5, 5)));
}
