//! Stage-indexed placement and connection tables.
//!
//! Each stage keeps every entry of the stages before it, so tables list the
//! stage an entry first appears in.

use isomap_core::ConnectorStyle::{self, Dashed, Dotted, Solid};
use isomap_core::NodeCategory;
use isomap_core::NodeCategory as C;
use isomap_core::Stage::{self, Enterprise, FirstSales, Foundation, Growth, Scale};
use isomap_core::{NodeType, Rgba};

/// Template for one node position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct NodeTemplate {
    pub(crate) category: NodeCategory,
    pub(crate) x: u32,
    pub(crate) y: u32,
    pub(crate) node_type: NodeType,
    pub(crate) since: Stage,
}

/// Template for one connector between two categories.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ConnectionTemplate {
    pub(crate) from: NodeCategory,
    pub(crate) to: NodeCategory,
    pub(crate) label: &'static str,
    pub(crate) style: ConnectorStyle,
    pub(crate) flow_rate: Option<f32>,
    pub(crate) since: Stage,
}

/// Template for one region grouping a set of categories.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RegionTemplate {
    pub(crate) label: &'static str,
    pub(crate) categories: &'static [NodeCategory],
    pub(crate) fill: Rgba,
    pub(crate) stroke: Rgba,
}

const fn node(
    category: NodeCategory,
    x: u32,
    y: u32,
    node_type: NodeType,
    since: Stage,
) -> NodeTemplate {
    NodeTemplate {
        category,
        x,
        y,
        node_type,
        since,
    }
}

const fn link(
    from: NodeCategory,
    to: NodeCategory,
    label: &'static str,
    style: ConnectorStyle,
    flow_rate: Option<f32>,
    since: Stage,
) -> ConnectionTemplate {
    ConnectionTemplate {
        from,
        to,
        label,
        style,
        flow_rate,
        since,
    }
}

pub(crate) const NODES: [NodeTemplate; 13] = [
    node(C::Headquarters, 20, 19, NodeType::Hub, Foundation),
    node(C::Catalog, 15, 15, NodeType::Office, Foundation),
    node(C::Storefront, 25, 15, NodeType::Shop, Foundation),
    node(C::Customers, 25, 23, NodeType::Office, FirstSales),
    node(C::Fulfillment, 15, 23, NodeType::Depot, FirstSales),
    node(C::Finance, 20, 26, NodeType::Office, FirstSales),
    node(C::Warehouse, 10, 19, NodeType::Depot, Growth),
    node(C::Marketing, 30, 11, NodeType::Tower, Growth),
    node(C::Subscriptions, 30, 19, NodeType::Kiosk, Growth),
    node(C::Support, 30, 26, NodeType::Kiosk, Growth),
    node(C::Suppliers, 5, 15, NodeType::Depot, Scale),
    node(C::Analytics, 20, 11, NodeType::Tower, Scale),
    node(C::Marketplace, 25, 8, NodeType::Shop, Enterprise),
];

pub(crate) const CONNECTIONS: [ConnectionTemplate; 19] = [
    link(C::Catalog, C::Storefront, "Listings", Solid, Some(0.6), Foundation),
    link(C::Headquarters, C::Catalog, "Products", Dashed, None, Foundation),
    link(C::Headquarters, C::Storefront, "Setup", Dashed, None, Foundation),
    link(C::Storefront, C::Customers, "Orders", Solid, Some(1.0), FirstSales),
    link(C::Storefront, C::Fulfillment, "Shipments", Solid, Some(0.8), FirstSales),
    link(C::Customers, C::Finance, "Payments", Dashed, Some(0.5), FirstSales),
    link(C::Headquarters, C::Finance, "Reports", Dotted, None, FirstSales),
    link(C::Warehouse, C::Fulfillment, "Stock", Solid, Some(0.9), Growth),
    link(C::Marketing, C::Storefront, "Traffic", Solid, Some(1.2), Growth),
    link(C::Subscriptions, C::Customers, "Renewals", Solid, Some(0.7), Growth),
    link(C::Customers, C::Support, "Tickets", Dotted, Some(0.4), Growth),
    link(C::Catalog, C::Warehouse, "SKUs", Dashed, None, Growth),
    link(C::Suppliers, C::Warehouse, "Purchase orders", Solid, Some(0.6), Scale),
    link(C::Analytics, C::Headquarters, "Insights", Dotted, None, Scale),
    link(C::Finance, C::Analytics, "Revenue data", Dashed, Some(0.3), Scale),
    link(C::Storefront, C::Analytics, "Sessions", Dotted, Some(0.5), Scale),
    link(C::Marketplace, C::Fulfillment, "Marketplace orders", Solid, Some(1.0), Enterprise),
    link(C::Catalog, C::Marketplace, "Syndication", Dashed, Some(0.5), Enterprise),
    link(C::Marketing, C::Marketplace, "Ads", Dotted, Some(0.6), Enterprise),
];

pub(crate) const REGIONS: [RegionTemplate; 4] = [
    RegionTemplate {
        label: "Operations",
        categories: &[C::Headquarters, C::Finance, C::Analytics],
        fill: Rgba::from_rgba(0x5b, 0x8d, 0xef, 0x2e),
        stroke: Rgba::from_rgb(0x5b, 0x8d, 0xef),
    },
    RegionTemplate {
        label: "Sales & Marketing",
        categories: &[C::Storefront, C::Marketplace, C::Marketing, C::Catalog],
        fill: Rgba::from_rgba(0xf5, 0x9e, 0x0b, 0x2e),
        stroke: Rgba::from_rgb(0xf5, 0x9e, 0x0b),
    },
    RegionTemplate {
        label: "Supply Chain",
        categories: &[C::Warehouse, C::Fulfillment, C::Suppliers],
        fill: Rgba::from_rgba(0x10, 0xb9, 0x81, 0x2e),
        stroke: Rgba::from_rgb(0x10, 0xb9, 0x81),
    },
    RegionTemplate {
        label: "Customer Care",
        categories: &[C::Customers, C::Support, C::Subscriptions],
        fill: Rgba::from_rgba(0xec, 0x48, 0x99, 0x2e),
        stroke: Rgba::from_rgb(0xec, 0x48, 0x99),
    },
];

/// Node templates active at `stage`, in table order.
pub(crate) fn nodes_for(stage: Stage) -> impl Iterator<Item = &'static NodeTemplate> {
    NODES.iter().filter(move |template| template.since <= stage)
}

/// Connection templates active at `stage`, in table order.
pub(crate) fn connections_for(stage: Stage) -> impl Iterator<Item = &'static ConnectionTemplate> {
    CONNECTIONS
        .iter()
        .filter(move |template| template.since <= stage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn template_tiles_are_unique() {
        let mut seen = HashSet::new();
        for template in &NODES {
            assert!(seen.insert((template.x, template.y)), "{template:?}");
        }
    }

    #[test]
    fn each_category_appears_once() {
        let categories: HashSet<_> = NODES.iter().map(|template| template.category).collect();
        assert_eq!(categories.len(), NodeCategory::ALL.len());
    }

    #[test]
    fn connections_only_reference_nodes_of_same_or_earlier_stage() {
        for connection in &CONNECTIONS {
            for category in [connection.from, connection.to] {
                let placed = NODES
                    .iter()
                    .find(|template| template.category == category)
                    .expect("category has a template");
                assert!(placed.since <= connection.since, "{connection:?}");
            }
        }
    }

    #[test]
    fn stages_grow_monotonically() {
        let counts: Vec<usize> = Stage::ALL.iter().map(|stage| nodes_for(*stage).count()).collect();
        assert_eq!(counts, vec![3, 6, 10, 12, 13]);
    }

    #[test]
    fn no_duplicate_connection_pairs() {
        let mut seen = HashSet::new();
        for connection in &CONNECTIONS {
            let pair = if connection.from < connection.to {
                (connection.from, connection.to)
            } else {
                (connection.to, connection.from)
            };
            assert!(seen.insert(pair), "{connection:?}");
        }
    }
}
