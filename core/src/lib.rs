#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the isometric map engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and the interaction
//! controller submit [`Command`] values describing desired mutations, the world
//! executes those commands via its `apply` entry point, and then broadcasts
//! [`Event`] values for systems to react to deterministically. Systems consume
//! event streams, query immutable snapshots, and respond exclusively with new
//! command batches.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Grid dimensions used when no explicit size is configured.
pub const DEFAULT_GRID: GridSize = GridSize::new(40, 38);

/// Location of a single tile expressed as integer `x`/`y` coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    x: u32,
    y: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the tile.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row of the tile.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Painter's-algorithm depth key. Tiles with a larger depth are drawn later.
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.x.saturating_add(self.y)
    }

    /// Offsets the coordinate by a signed delta, returning `None` on underflow or overflow.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Self::new(x, y))
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: TileCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Fixed dimensions of the tile grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    width: u32,
    height: u32,
}

impl GridSize {
    /// Creates a new grid size descriptor.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the tile lies inside the grid.
    #[must_use]
    pub const fn contains(&self, tile: TileCoord) -> bool {
        tile.x < self.width && tile.y < self.height
    }

    /// Total number of tiles in the grid.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        let count = u64::from(self.width) * u64::from(self.height);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Tile located at the center of the grid.
    #[must_use]
    pub const fn center(&self) -> TileCoord {
        TileCoord::new(self.width / 2, self.height / 2)
    }

    /// Row-major index of the tile, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, tile: TileCoord) -> Option<usize> {
        if !self.contains(tile) {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        let x = usize::try_from(tile.x).ok()?;
        let y = usize::try_from(tile.y).ok()?;
        y.checked_mul(width)?.checked_add(x)
    }

    /// Clamps a tile rectangle so it lies entirely inside the grid.
    ///
    /// Returns `None` when the grid has no area.
    #[must_use]
    pub fn clamp_rect(&self, rect: TileRect) -> Option<TileRect> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let max_x = self.width - 1;
        let max_y = self.height - 1;
        Some(TileRect::new(
            TileCoord::new(rect.from.x.min(max_x), rect.from.y.min(max_y)),
            TileCoord::new(rect.to.x.min(max_x), rect.to.y.min(max_y)),
        ))
    }
}

/// Axis-aligned rectangle in tile space with inclusive bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRect {
    from: TileCoord,
    to: TileCoord,
}

impl TileRect {
    /// Creates a rectangle spanning both corners. Corners may be given in any order.
    #[must_use]
    pub fn new(a: TileCoord, b: TileCoord) -> Self {
        Self {
            from: TileCoord::new(a.x.min(b.x), a.y.min(b.y)),
            to: TileCoord::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Upper-left (minimum) corner.
    #[must_use]
    pub const fn from(&self) -> TileCoord {
        self.from
    }

    /// Lower-right (maximum) corner, inclusive.
    #[must_use]
    pub const fn to(&self) -> TileCoord {
        self.to
    }

    /// Number of tile columns covered by the rectangle.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.to.x - self.from.x + 1
    }

    /// Number of tile rows covered by the rectangle.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.to.y - self.from.y + 1
    }

    /// Reports whether the tile lies within the inclusive bounds.
    #[must_use]
    pub const fn contains(&self, tile: TileCoord) -> bool {
        tile.x >= self.from.x && tile.x <= self.to.x && tile.y >= self.from.y && tile.y <= self.to.y
    }

    /// Translates both corners by the signed delta.
    #[must_use]
    pub fn translated(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            from: self.from.offset(dx, dy)?,
            to: self.to.offset(dx, dy)?,
        })
    }

    /// Reports whether the whole rectangle fits inside the grid.
    #[must_use]
    pub const fn fits_within(&self, grid: GridSize) -> bool {
        grid.contains(self.from) && grid.contains(self.to)
    }
}

/// Unique identifier assigned to a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates a new node identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a connector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectorId(u32);

impl ConnectorId {
    /// Creates a new connector identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(u32);

impl RegionId {
    /// Creates a new region identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Source of fresh identifiers injected into every independently owned map.
///
/// Each engine instance owns its own source, so no identifier state is shared
/// between maps.
pub trait IdSource: fmt::Debug {
    /// Allocates a node identifier that has not been handed out before.
    fn next_node_id(&mut self) -> NodeId;

    /// Allocates a connector identifier that has not been handed out before.
    fn next_connector_id(&mut self) -> ConnectorId;

    /// Allocates a region identifier that has not been handed out before.
    fn next_region_id(&mut self) -> RegionId;
}

/// Monotonic counters used as the default identifier source.
#[derive(Clone, Debug, Default)]
pub struct SequentialIds {
    next_node: u32,
    next_connector: u32,
    next_region: u32,
}

impl SequentialIds {
    /// Creates a source whose counters all start at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates a source whose counters all start at `value`.
    #[must_use]
    pub const fn starting_at(value: u32) -> Self {
        Self {
            next_node: value,
            next_connector: value,
            next_region: value,
        }
    }
}

impl IdSource for SequentialIds {
    fn next_node_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_node);
        self.next_node = self.next_node.wrapping_add(1);
        id
    }

    fn next_connector_id(&mut self) -> ConnectorId {
        let id = ConnectorId::new(self.next_connector);
        self.next_connector = self.next_connector.wrapping_add(1);
        id
    }

    fn next_region_id(&mut self) -> RegionId {
        let id = RegionId::new(self.next_region);
        self.next_region = self.next_region.wrapping_add(1);
        id
    }
}

/// Closed set of business functions a node can represent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeCategory {
    /// Administrative hub. The only category that can never be removed.
    Headquarters,
    /// Owned sales channel such as the online store.
    Storefront,
    /// Third-party sales channel.
    Marketplace,
    /// Product catalog management.
    Catalog,
    /// Campaigns and acquisition.
    Marketing,
    /// Customer relationship records.
    Customers,
    /// Inventory storage.
    Warehouse,
    /// Picking, packing and shipping.
    Fulfillment,
    /// Bookkeeping and payouts.
    Finance,
    /// Customer service desk.
    Support,
    /// Recurring subscription management.
    Subscriptions,
    /// Upstream vendors.
    Suppliers,
    /// Reporting and insights.
    Analytics,
}

impl NodeCategory {
    /// Every category in declaration order.
    pub const ALL: [NodeCategory; 13] = [
        Self::Headquarters,
        Self::Storefront,
        Self::Marketplace,
        Self::Catalog,
        Self::Marketing,
        Self::Customers,
        Self::Warehouse,
        Self::Fulfillment,
        Self::Finance,
        Self::Support,
        Self::Subscriptions,
        Self::Suppliers,
        Self::Analytics,
    ];

    /// Human readable name used as the default node label.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Headquarters => "Headquarters",
            Self::Storefront => "Storefront",
            Self::Marketplace => "Marketplace",
            Self::Catalog => "Catalog",
            Self::Marketing => "Marketing",
            Self::Customers => "Customers",
            Self::Warehouse => "Warehouse",
            Self::Fulfillment => "Fulfillment",
            Self::Finance => "Finance",
            Self::Support => "Support",
            Self::Subscriptions => "Subscriptions",
            Self::Suppliers => "Suppliers",
            Self::Analytics => "Analytics",
        }
    }

    /// Visual archetype used when a node of this category is placed by hand.
    #[must_use]
    pub const fn default_node_type(self) -> NodeType {
        match self {
            Self::Headquarters => NodeType::Hub,
            Self::Storefront | Self::Marketplace => NodeType::Shop,
            Self::Catalog | Self::Customers | Self::Finance => NodeType::Office,
            Self::Warehouse | Self::Fulfillment | Self::Suppliers => NodeType::Depot,
            Self::Marketing | Self::Analytics => NodeType::Tower,
            Self::Support | Self::Subscriptions => NodeType::Kiosk,
        }
    }

    /// Reports whether nodes of this category are protected from removal.
    #[must_use]
    pub const fn is_protected(self) -> bool {
        matches!(self, Self::Headquarters)
    }
}

/// Visual archetype of a node. Drives the generous selection hit box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeType {
    /// Large central building.
    Hub,
    /// Shop front.
    Shop,
    /// Office block.
    Office,
    /// Wide, low storage building.
    Depot,
    /// Tall, narrow building.
    Tower,
    /// Small stand.
    Kiosk,
}

/// Line style used when drawing a connector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConnectorStyle {
    /// Continuous line.
    #[default]
    Solid,
    /// Long dashes.
    Dashed,
    /// Short dots.
    Dotted,
}

/// Byte RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    red: u8,
    green: u8,
    blue: u8,
    alpha: u8,
}

impl Rgba {
    /// Creates a color from byte RGBA components.
    #[must_use]
    pub const fn from_rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::from_rgba(red, green, blue, 0xff)
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Alpha component of the color.
    #[must_use]
    pub const fn alpha(&self) -> u8 {
        self.alpha
    }
}

/// Direction a node's key figure moved compared with the previous period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Trend {
    /// The figure grew.
    Rising,
    /// The figure did not change meaningfully.
    #[default]
    Steady,
    /// The figure shrank.
    Falling,
}

/// Coarse busyness indicator shown on a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActivityLevel {
    /// Nothing is happening.
    Idle,
    /// Occasional activity.
    Low,
    /// Regular activity.
    Moderate,
    /// Busy.
    High,
}

/// Single labelled statistic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEntry {
    /// Caption of the statistic.
    pub label: String,
    /// Formatted value.
    pub value: String,
}

impl StatEntry {
    /// Creates a new statistic entry.
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Statistical payload derived from the metrics snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStats {
    /// Statistics shown in the node's inspector, in display order.
    pub entries: Vec<StatEntry>,
    /// Direction of the node's headline figure.
    pub trend: Trend,
}

/// Placed entity with a category, position, and descriptive payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Identifier allocated to the node.
    pub id: NodeId,
    /// Business function represented by the node.
    pub category: NodeCategory,
    /// Visual archetype of the node.
    pub node_type: NodeType,
    /// Short caption.
    pub label: String,
    /// Longer free-form description.
    pub description: String,
    /// Tile occupied by the node.
    pub tile: TileCoord,
    /// Busyness indicator, when known.
    pub activity: Option<ActivityLevel>,
    /// Statistics derived from business metrics, when known.
    pub stats: Option<NodeStats>,
    /// Number of outstanding alerts, when known.
    pub alert_count: Option<u32>,
}

impl Node {
    /// Creates a bare node of the provided category using its default type and label.
    #[must_use]
    pub fn new(id: NodeId, category: NodeCategory, tile: TileCoord) -> Self {
        Self {
            id,
            category,
            node_type: category.default_node_type(),
            label: category.name().to_owned(),
            description: String::new(),
            tile,
            activity: None,
            stats: None,
            alert_count: None,
        }
    }

    /// Reports whether the node is protected from removal.
    #[must_use]
    pub const fn is_protected(&self) -> bool {
        self.category.is_protected()
    }
}

/// Directed relationship between two nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    /// Identifier allocated to the connector.
    pub id: ConnectorId,
    /// Node the connector starts at.
    pub source: NodeId,
    /// Node the connector ends at.
    pub target: NodeId,
    /// Derived tile route between both endpoints. Empty when no route exists.
    pub path: Vec<TileCoord>,
    /// Relative particle speed along the route, when animated.
    pub flow_rate: Option<f32>,
    /// Line style.
    pub style: ConnectorStyle,
    /// Optional caption.
    pub label: Option<String>,
}

impl Connector {
    /// Creates an unlabelled, solid connector with an empty route.
    #[must_use]
    pub fn new(id: ConnectorId, source: NodeId, target: NodeId) -> Self {
        Self {
            id,
            source,
            target,
            path: Vec::new(),
            flow_rate: None,
            style: ConnectorStyle::Solid,
            label: None,
        }
    }

    /// Reports whether the connector joins `a` and `b` in either direction.
    #[must_use]
    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }

    /// Reports whether either endpoint is `node`.
    #[must_use]
    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }
}

/// Rectangular grouping of tiles with a label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Identifier allocated to the region.
    pub id: RegionId,
    /// Caption shown on the region.
    pub label: String,
    /// Inclusive tile bounds.
    pub bounds: TileRect,
    /// Fill color.
    pub fill: Rgba,
    /// Outline color.
    pub stroke: Rgba,
    /// Marks regions drawn by the user. Only these survive stage changes.
    pub user_created: bool,
}

/// Complete map contents for a single stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapLayout {
    /// Stage the layout was generated for.
    pub stage: Stage,
    /// Dimensions of the grid.
    pub grid: GridSize,
    /// Nodes placed on the grid.
    pub nodes: Vec<Node>,
    /// Connectors between nodes.
    pub connectors: Vec<Connector>,
    /// Regions grouping nodes.
    pub regions: Vec<Region>,
}

impl MapLayout {
    /// Creates an empty layout.
    #[must_use]
    pub fn empty(stage: Stage, grid: GridSize) -> Self {
        Self {
            stage,
            grid,
            nodes: Vec::new(),
            connectors: Vec::new(),
            regions: Vec::new(),
        }
    }
}

/// Discrete layout template representing increasing business complexity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Stage {
    /// Nothing sold yet.
    #[default]
    Foundation,
    /// The first orders arrived.
    FirstSales,
    /// Repeat business and subscriptions.
    Growth,
    /// High order volume.
    Scale,
    /// Multi-channel operation.
    Enterprise,
}

impl Stage {
    /// Every stage in ascending order.
    pub const ALL: [Stage; 5] = [
        Self::Foundation,
        Self::FirstSales,
        Self::Growth,
        Self::Scale,
        Self::Enterprise,
    ];

    /// Resolves a stage from its zero-based index.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Foundation),
            1 => Some(Self::FirstSales),
            2 => Some(Self::Growth),
            3 => Some(Self::Scale),
            4 => Some(Self::Enterprise),
            _ => None,
        }
    }

    /// Zero-based index of the stage.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Foundation => 0,
            Self::FirstSales => 1,
            Self::Growth => 2,
            Self::Scale => 3,
            Self::Enterprise => 4,
        }
    }

    /// Human readable name of the stage.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Foundation => "Foundation",
            Self::FirstSales => "First Sales",
            Self::Growth => "Growth",
            Self::Scale => "Scale",
            Self::Enterprise => "Enterprise",
        }
    }
}

/// Aggregate order figures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderMetrics {
    /// Orders placed in total.
    pub total: u32,
    /// Orders awaiting fulfillment.
    pub pending: u32,
    /// Orders shipped.
    pub fulfilled: u32,
    /// Orders refunded.
    pub refunded: u32,
}

/// Aggregate product catalog figures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductMetrics {
    /// Products listed.
    pub total: u32,
    /// Products running low on stock.
    pub low_stock: u32,
    /// Products without stock.
    pub out_of_stock: u32,
}

/// Aggregate customer figures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerMetrics {
    /// Customers on record.
    pub total: u32,
    /// Customers with more than one order.
    pub returning: u32,
}

/// Aggregate inventory figures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryMetrics {
    /// Units held across all locations.
    pub units_on_hand: u64,
    /// Number of stock locations.
    pub locations: u32,
}

/// Aggregate revenue figures, in minor currency units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueMetrics {
    /// Revenue in the current period.
    pub total_cents: u64,
    /// Revenue in the previous period.
    pub previous_period_cents: u64,
}

/// Aggregate subscription figures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriberMetrics {
    /// Active subscribers.
    pub active: u32,
    /// Subscribers lost in the current period.
    pub churned: u32,
}

/// Snapshot of business metrics produced by an external data provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSnapshot {
    /// Order figures.
    pub orders: OrderMetrics,
    /// Product figures.
    pub products: ProductMetrics,
    /// Customer figures.
    pub customers: CustomerMetrics,
    /// Inventory figures.
    pub inventory: InventoryMetrics,
    /// Revenue figures.
    pub revenue: RevenueMetrics,
    /// Subscription figures.
    pub subscribers: SubscriberMetrics,
}

/// Side-effect-free source of metrics snapshots.
pub trait MetricsProvider {
    /// Captures the current aggregate metrics.
    fn snapshot(&self) -> MetricsSnapshot;
}

impl MetricsProvider for MetricsSnapshot {
    fn snapshot(&self) -> MetricsSnapshot {
        *self
    }
}

/// Commands that express all permissible map mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Places a new node. Tile occupancy is the caller's responsibility.
    AddNode {
        /// Category of the new node.
        category: NodeCategory,
        /// Tile the node should occupy.
        tile: TileCoord,
        /// Caption overriding the category name.
        label: Option<String>,
    },
    /// Removes a node together with every connector touching it.
    RemoveNode {
        /// Node targeted for removal.
        node: NodeId,
    },
    /// Edits descriptive fields of a node in place.
    UpdateNode {
        /// Node to edit.
        node: NodeId,
        /// Replacement caption, if any.
        label: Option<String>,
        /// Replacement description, if any.
        description: Option<String>,
    },
    /// Moves a node to a new tile.
    MoveNode {
        /// Node to move.
        node: NodeId,
        /// Destination tile.
        tile: TileCoord,
    },
    /// Connects two nodes.
    AddConnector {
        /// Node the connector starts at.
        source: NodeId,
        /// Node the connector ends at.
        target: NodeId,
    },
    /// Removes a connector.
    RemoveConnector {
        /// Connector targeted for removal.
        connector: ConnectorId,
    },
    /// Adds a region.
    AddRegion {
        /// Caption of the region.
        label: String,
        /// Inclusive tile bounds.
        bounds: TileRect,
        /// Fill color.
        fill: Rgba,
        /// Outline color.
        stroke: Rgba,
        /// Whether the user drew the region.
        user_created: bool,
    },
    /// Removes a region.
    RemoveRegion {
        /// Region targeted for removal.
        region: RegionId,
    },
    /// Renames a region.
    UpdateRegion {
        /// Region to rename.
        region: RegionId,
        /// New caption.
        label: String,
    },
    /// Translates a region and every node inside it.
    MoveRegion {
        /// Region to move.
        region: RegionId,
        /// Column delta.
        dx: i32,
        /// Row delta.
        dy: i32,
    },
    /// Replaces the whole map with a freshly generated layout.
    ReplaceLayout {
        /// Layout to install.
        layout: MapLayout,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a node was placed.
    NodeAdded {
        /// Identifier assigned to the node.
        node: NodeId,
        /// Category of the node.
        category: NodeCategory,
        /// Tile occupied by the node.
        tile: TileCoord,
    },
    /// Confirms that a node's descriptive fields changed.
    NodeUpdated {
        /// Node that changed.
        node: NodeId,
    },
    /// Confirms that a node moved.
    NodeMoved {
        /// Node that moved.
        node: NodeId,
        /// Tile occupied before the move.
        from: TileCoord,
        /// Tile occupied after the move.
        to: TileCoord,
    },
    /// Confirms that a node and its connectors were removed.
    NodeRemoved {
        /// Node that was removed.
        node: NodeId,
        /// Connectors removed along with the node.
        connectors: Vec<ConnectorId>,
    },
    /// Confirms that a connector was added.
    ConnectorAdded {
        /// Identifier assigned to the connector.
        connector: ConnectorId,
        /// Node the connector starts at.
        source: NodeId,
        /// Node the connector ends at.
        target: NodeId,
    },
    /// Confirms that a connector was removed.
    ConnectorRemoved {
        /// Connector that was removed.
        connector: ConnectorId,
    },
    /// Confirms that a region was added.
    RegionAdded {
        /// Identifier assigned to the region.
        region: RegionId,
    },
    /// Confirms that a region was renamed.
    RegionUpdated {
        /// Region that changed.
        region: RegionId,
    },
    /// Confirms that a region and its nodes were translated.
    RegionMoved {
        /// Region that moved.
        region: RegionId,
        /// Column delta applied.
        dx: i32,
        /// Row delta applied.
        dy: i32,
        /// Nodes carried along with the region.
        nodes: Vec<NodeId>,
    },
    /// Confirms that a region was removed.
    RegionRemoved {
        /// Region that was removed.
        region: RegionId,
    },
    /// Announces that a generated layout replaced the map.
    LayoutReplaced {
        /// Stage of the installed layout.
        stage: Stage,
        /// Number of user-created regions carried over.
        preserved_regions: usize,
    },
    /// Reports the outcome of a full connector route recomputation.
    RoutesRecomputed {
        /// Connectors with a non-empty route.
        routed: usize,
        /// Connectors for which no route exists.
        unroutable: usize,
    },
    /// Reports that a node placement was ignored.
    NodePlacementRejected {
        /// Category requested for placement.
        category: NodeCategory,
        /// Tile requested for placement.
        tile: TileCoord,
        /// Reason the placement was ignored.
        reason: PlacementError,
    },
    /// Reports that a node move was ignored.
    NodeMoveRejected {
        /// Node requested to move.
        node: NodeId,
        /// Requested destination.
        tile: TileCoord,
        /// Reason the move was ignored.
        reason: PlacementError,
    },
    /// Reports that a node removal was ignored.
    NodeRemovalRejected {
        /// Node requested for removal.
        node: NodeId,
        /// Reason the removal was ignored.
        reason: RemovalError,
    },
    /// Reports that a connector request was ignored.
    ConnectorRejected {
        /// Requested source node.
        source: NodeId,
        /// Requested target node.
        target: NodeId,
        /// Reason the request was ignored.
        reason: ConnectionError,
    },
    /// Reports that a region move was ignored.
    RegionMoveRejected {
        /// Region requested to move.
        region: RegionId,
        /// Reason the move was ignored.
        reason: PlacementError,
    },
}

/// Reasons a placement or move request may be ignored by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The destination lies outside the grid.
    OutOfBounds,
    /// The destination tile already holds another node.
    Occupied,
    /// The referenced item does not exist.
    Missing,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "destination lies outside the grid"),
            Self::Occupied => write!(f, "destination tile is occupied"),
            Self::Missing => write!(f, "referenced item does not exist"),
        }
    }
}

/// Reasons a node removal request may be ignored by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalError {
    /// The node is the protected hub.
    Protected,
    /// No node with the provided identifier exists.
    MissingNode,
}

impl fmt::Display for RemovalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protected => write!(f, "the hub node cannot be removed"),
            Self::MissingNode => write!(f, "node does not exist"),
        }
    }
}

/// Reasons a connector request may be ignored by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionError {
    /// A connector between the two nodes already exists in either direction.
    Duplicate,
    /// Source and target are the same node.
    SelfLoop,
    /// One of the endpoints does not exist.
    MissingEndpoint,
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate => write!(f, "nodes are already connected"),
            Self::SelfLoop => write!(f, "a node cannot connect to itself"),
            Self::MissingEndpoint => write!(f, "connector endpoint does not exist"),
        }
    }
}
