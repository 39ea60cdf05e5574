use isomap_core::{GridSize, IdSource, Node, Region, TileCoord, TileRect};

use crate::templates::REGIONS;

/// Tiles of padding added around the nodes a region template covers.
pub(crate) const REGION_PADDING: u32 = 1;

/// Emits one padded region per template that covers at least one node.
pub(crate) fn derive_regions(grid: GridSize, nodes: &[Node], ids: &mut dyn IdSource) -> Vec<Region> {
    let mut regions = Vec::new();
    for template in &REGIONS {
        let mut tiles = nodes
            .iter()
            .filter(|node| template.categories.contains(&node.category))
            .map(|node| node.tile);
        let Some(first) = tiles.next() else {
            continue;
        };

        let (min, max) = tiles.fold((first, first), |(min, max), tile| {
            (
                TileCoord::new(min.x().min(tile.x()), min.y().min(tile.y())),
                TileCoord::new(max.x().max(tile.x()), max.y().max(tile.y())),
            )
        });
        let padded = TileRect::new(
            TileCoord::new(
                min.x().saturating_sub(REGION_PADDING),
                min.y().saturating_sub(REGION_PADDING),
            ),
            TileCoord::new(
                max.x().saturating_add(REGION_PADDING),
                max.y().saturating_add(REGION_PADDING),
            ),
        );
        let Some(bounds) = grid.clamp_rect(padded) else {
            continue;
        };

        regions.push(Region {
            id: ids.next_region_id(),
            label: template.label.to_owned(),
            bounds,
            fill: template.fill,
            stroke: template.stroke,
            user_created: false,
        });
    }
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use isomap_core::{NodeCategory, NodeId, SequentialIds};

    #[test]
    fn region_wraps_matching_nodes_with_padding() {
        let nodes = vec![
            Node::new(NodeId::new(0), NodeCategory::Warehouse, TileCoord::new(4, 6)),
            Node::new(NodeId::new(1), NodeCategory::Fulfillment, TileCoord::new(8, 3)),
        ];
        let mut ids = SequentialIds::new();

        let regions = derive_regions(GridSize::new(20, 20), &nodes, &mut ids);

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].label, "Supply Chain");
        assert_eq!(
            regions[0].bounds,
            TileRect::new(TileCoord::new(3, 2), TileCoord::new(9, 7))
        );
        assert!(!regions[0].user_created);
    }

    #[test]
    fn padding_is_clamped_at_grid_edges() {
        let nodes = vec![Node::new(
            NodeId::new(0),
            NodeCategory::Headquarters,
            TileCoord::new(0, 9),
        )];
        let mut ids = SequentialIds::new();

        let regions = derive_regions(GridSize::new(10, 10), &nodes, &mut ids);

        assert_eq!(
            regions[0].bounds,
            TileRect::new(TileCoord::new(0, 8), TileCoord::new(1, 9))
        );
    }
}
