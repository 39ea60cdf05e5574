//! Per-category statistics derived from a metrics snapshot.

use isomap_core::{ActivityLevel, MetricsSnapshot, NodeCategory, NodeStats, StatEntry, Trend};

/// Everything a generated node learns from the snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryInsight {
    /// Description shown in the node inspector.
    pub description: String,
    /// Labelled statistics and headline trend.
    pub stats: NodeStats,
    /// Busyness indicator.
    pub activity: ActivityLevel,
    /// Outstanding alerts, `None` when there is nothing to flag.
    pub alerts: Option<u32>,
}

/// Derives the statistics shown on a node of `category`.
#[must_use]
pub fn insight_for(category: NodeCategory, snapshot: &MetricsSnapshot) -> CategoryInsight {
    let orders = snapshot.orders;
    let products = snapshot.products;
    let customers = snapshot.customers;
    let inventory = snapshot.inventory;
    let revenue = snapshot.revenue;
    let subscribers = snapshot.subscribers;
    let revenue_trend = trend(revenue.total_cents, revenue.previous_period_cents);

    let (description, entries, trend, load, alerts) = match category {
        NodeCategory::Headquarters => (
            "Company headquarters and overall performance",
            vec![
                StatEntry::new("Revenue", format_cents(revenue.total_cents)),
                StatEntry::new("Orders", format_count(u64::from(orders.total))),
                StatEntry::new("Customers", format_count(u64::from(customers.total))),
            ],
            revenue_trend,
            u64::from(orders.total),
            0,
        ),
        NodeCategory::Storefront => (
            "Online store taking orders directly",
            vec![
                StatEntry::new("Orders", format_count(u64::from(orders.total))),
                StatEntry::new("Pending", format_count(u64::from(orders.pending))),
            ],
            revenue_trend,
            u64::from(orders.pending),
            0,
        ),
        NodeCategory::Marketplace => {
            let channel_orders = orders.total / 3;
            (
                "Third-party marketplace listings",
                vec![StatEntry::new(
                    "Channel orders",
                    format_count(u64::from(channel_orders)),
                )],
                revenue_trend,
                u64::from(channel_orders),
                0,
            )
        }
        NodeCategory::Catalog => (
            "Product listings and pricing",
            vec![
                StatEntry::new("Products", format_count(u64::from(products.total))),
                StatEntry::new("Low stock", format_count(u64::from(products.low_stock))),
                StatEntry::new("Out of stock", format_count(u64::from(products.out_of_stock))),
            ],
            if products.out_of_stock > 0 {
                Trend::Falling
            } else {
                Trend::Steady
            },
            u64::from(products.total),
            products.out_of_stock,
        ),
        NodeCategory::Marketing => (
            "Campaigns bringing visitors to the store",
            vec![
                StatEntry::new("Customers", format_count(u64::from(customers.total))),
                StatEntry::new("Returning", percent(customers.returning, customers.total)),
            ],
            revenue_trend,
            u64::from(customers.total),
            0,
        ),
        NodeCategory::Customers => (
            "Customer accounts and order history",
            vec![
                StatEntry::new("Customers", format_count(u64::from(customers.total))),
                StatEntry::new("Returning", format_count(u64::from(customers.returning))),
            ],
            trend(u64::from(customers.returning), u64::from(customers.total) / 2),
            u64::from(customers.total),
            0,
        ),
        NodeCategory::Warehouse => (
            "Stock held across locations",
            vec![
                StatEntry::new("Units on hand", format_count(inventory.units_on_hand)),
                StatEntry::new("Locations", format_count(u64::from(inventory.locations))),
            ],
            if products.low_stock > 0 {
                Trend::Falling
            } else {
                Trend::Steady
            },
            inventory.units_on_hand / 100,
            products.low_stock,
        ),
        NodeCategory::Fulfillment => (
            "Picking, packing and shipping",
            vec![
                StatEntry::new("Pending", format_count(u64::from(orders.pending))),
                StatEntry::new("Fulfilled", format_count(u64::from(orders.fulfilled))),
            ],
            trend(u64::from(orders.fulfilled), u64::from(orders.pending)),
            u64::from(orders.pending),
            if orders.pending > FULFILLMENT_BACKLOG {
                orders.pending - FULFILLMENT_BACKLOG
            } else {
                0
            },
        ),
        NodeCategory::Finance => (
            "Payments, payouts and bookkeeping",
            vec![
                StatEntry::new("Revenue", format_cents(revenue.total_cents)),
                StatEntry::new("Previous period", format_cents(revenue.previous_period_cents)),
                StatEntry::new("Refunds", format_count(u64::from(orders.refunded))),
            ],
            revenue_trend,
            u64::from(orders.total),
            orders.refunded,
        ),
        NodeCategory::Support => (
            "Customer service desk",
            vec![
                StatEntry::new("Refund requests", format_count(u64::from(orders.refunded))),
                StatEntry::new("Returning customers", format_count(u64::from(customers.returning))),
            ],
            if orders.refunded > 0 {
                Trend::Falling
            } else {
                Trend::Steady
            },
            u64::from(orders.refunded),
            orders.refunded,
        ),
        NodeCategory::Subscriptions => (
            "Recurring plans and renewals",
            vec![
                StatEntry::new("Active", format_count(u64::from(subscribers.active))),
                StatEntry::new("Churned", format_count(u64::from(subscribers.churned))),
            ],
            trend(u64::from(subscribers.active), u64::from(subscribers.churned)),
            u64::from(subscribers.active),
            subscribers.churned,
        ),
        NodeCategory::Suppliers => (
            "Upstream vendors restocking inventory",
            vec![
                StatEntry::new("Locations", format_count(u64::from(inventory.locations))),
                StatEntry::new("Reorders needed", format_count(u64::from(products.low_stock))),
            ],
            Trend::Steady,
            u64::from(products.low_stock),
            products.low_stock,
        ),
        NodeCategory::Analytics => (
            "Reports and insights across the business",
            vec![
                StatEntry::new("Revenue", format_cents(revenue.total_cents)),
                StatEntry::new("Average order", average_order(revenue.total_cents, orders.total)),
            ],
            revenue_trend,
            u64::from(orders.total),
            0,
        ),
    };

    CategoryInsight {
        description: description.to_owned(),
        stats: NodeStats { entries, trend },
        activity: activity(load),
        alerts: (alerts > 0).then_some(alerts),
    }
}

const FULFILLMENT_BACKLOG: u32 = 10;

fn trend(current: u64, previous: u64) -> Trend {
    let current = u128::from(current) * 100;
    let previous = u128::from(previous);
    if current > previous * 105 {
        Trend::Rising
    } else if current < previous * 95 {
        Trend::Falling
    } else {
        Trend::Steady
    }
}

fn activity(load: u64) -> ActivityLevel {
    match load {
        0 => ActivityLevel::Idle,
        1..=9 => ActivityLevel::Low,
        10..=49 => ActivityLevel::Moderate,
        _ => ActivityLevel::High,
    }
}

fn percent(part: u32, whole: u32) -> String {
    if whole == 0 {
        return "0%".to_owned();
    }
    format!("{}%", u64::from(part) * 100 / u64::from(whole))
}

fn average_order(total_cents: u64, orders: u32) -> String {
    if orders == 0 {
        return format_cents(0);
    }
    format_cents(total_cents / u64::from(orders))
}

/// Formats a count with thousands separators, e.g. `12,345`.
pub(crate) fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }
    formatted
}

/// Formats minor currency units as dollars, e.g. `$1,234.50`.
pub(crate) fn format_cents(cents: u64) -> String {
    format!("${}.{:02}", format_count(cents / 100), cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> MetricsSnapshot {
        let mut snapshot = MetricsSnapshot::default();
        snapshot.orders.total = 120;
        snapshot.orders.pending = 14;
        snapshot.orders.fulfilled = 100;
        snapshot.orders.refunded = 3;
        snapshot.products.total = 40;
        snapshot.products.low_stock = 2;
        snapshot.revenue.total_cents = 1_234_550;
        snapshot.revenue.previous_period_cents = 1_000_000;
        snapshot
    }

    #[test]
    fn counts_and_money_are_grouped() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
        assert_eq!(format_cents(1_234_550), "$12,345.50");
        assert_eq!(format_cents(7), "$0.07");
    }

    #[test]
    fn trend_uses_five_percent_band() {
        assert_eq!(trend(106, 100), Trend::Rising);
        assert_eq!(trend(104, 100), Trend::Steady);
        assert_eq!(trend(94, 100), Trend::Falling);
        assert_eq!(trend(0, 0), Trend::Steady);
    }

    #[test]
    fn headquarters_reports_revenue_trend() {
        let insight = insight_for(NodeCategory::Headquarters, &snapshot());
        assert_eq!(insight.stats.trend, Trend::Rising);
        assert_eq!(insight.stats.entries[0], StatEntry::new("Revenue", "$12,345.50"));
        assert_eq!(insight.activity, ActivityLevel::High);
        assert_eq!(insight.alerts, None);
    }

    #[test]
    fn fulfillment_flags_backlog_beyond_threshold() {
        let insight = insight_for(NodeCategory::Fulfillment, &snapshot());
        assert_eq!(insight.alerts, Some(4));
        assert_eq!(insight.activity, ActivityLevel::Moderate);
    }

    #[test]
    fn empty_snapshot_is_idle_everywhere() {
        let empty = MetricsSnapshot::default();
        for category in NodeCategory::ALL {
            let insight = insight_for(category, &empty);
            assert_eq!(insight.activity, ActivityLevel::Idle, "{category:?}");
            assert_eq!(insight.alerts, None, "{category:?}");
            assert!(!insight.description.is_empty());
        }
    }

    #[test]
    fn insight_is_a_pure_function_of_inputs() {
        let snapshot = snapshot();
        for category in NodeCategory::ALL {
            assert_eq!(insight_for(category, &snapshot), insight_for(category, &snapshot));
        }
    }
}
