//! Metrics snapshot providers: JSON files and a seeded mock store.

use std::{fs, io, path::PathBuf};

use isomap_core::{
    CustomerMetrics, InventoryMetrics, MetricsProvider, MetricsSnapshot, OrderMetrics,
    ProductMetrics, RevenueMetrics, SubscriberMetrics,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Failures while loading a metrics snapshot file.
#[derive(Debug, Error)]
pub(crate) enum MetricsSourceError {
    /// The file could not be read.
    #[error("could not read metrics file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file is not a valid snapshot document.
    #[error("could not parse metrics file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Snapshot decoded once from a JSON document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct FileMetrics {
    snapshot: MetricsSnapshot,
}

impl FileMetrics {
    /// Reads and decodes `path`. Missing sections default to zero.
    pub(crate) fn load(path: PathBuf) -> Result<Self, MetricsSourceError> {
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(source) => return Err(MetricsSourceError::Read { path, source }),
        };
        let snapshot = serde_json::from_str(&text)
            .map_err(|source| MetricsSourceError::Parse { path, source })?;
        Ok(Self { snapshot })
    }
}

impl MetricsProvider for FileMetrics {
    fn snapshot(&self) -> MetricsSnapshot {
        self.snapshot
    }
}

/// Deterministic stand-in for a live commerce backend.
///
/// Every call to [`MetricsProvider::snapshot`] reseeds the generator, so one
/// seed always describes the same store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MockMetrics {
    seed: u64,
}

impl MockMetrics {
    pub(crate) const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MetricsProvider for MockMetrics {
    fn snapshot(&self) -> MetricsSnapshot {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);

        let total_orders = rng.gen_range(0..=240);
        let refunded = rng.gen_range(0..=total_orders / 20);
        let pending = rng.gen_range(0..=(total_orders - refunded) / 5);
        let products = rng.gen_range(5..=120);
        let low_stock = rng.gen_range(0..=products / 8);
        let out_of_stock = rng.gen_range(0..=products / 20);
        let customers = total_orders * rng.gen_range(60..=90) / 100;
        let average_order_cents: u64 = rng.gen_range(2_500..=12_000);
        let revenue = u64::from(total_orders) * average_order_cents;
        let previous_revenue = revenue * rng.gen_range(70..=130) / 100;
        let has_subscriptions = rng.gen_bool(0.5);
        let active = if has_subscriptions {
            rng.gen_range(1..=60)
        } else {
            0
        };

        MetricsSnapshot {
            orders: OrderMetrics {
                total: total_orders,
                pending,
                fulfilled: total_orders - refunded - pending,
                refunded,
            },
            products: ProductMetrics {
                total: products,
                low_stock,
                out_of_stock,
            },
            customers: CustomerMetrics {
                total: customers,
                returning: customers / 3,
            },
            inventory: InventoryMetrics {
                units_on_hand: u64::from(products) * rng.gen_range(20..=400),
                locations: rng.gen_range(1..=4),
            },
            revenue: RevenueMetrics {
                total_cents: revenue,
                previous_period_cents: previous_revenue,
            },
            subscribers: SubscriberMetrics {
                active,
                churned: active / 10,
            },
        }
    }
}
