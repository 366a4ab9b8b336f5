//! Index statistics
//!
//! Every value is recomputed from the bucket lengths on each call; nothing is
//! counted incrementally.

use serde::Serialize;

/// Snapshot of bucket occupancy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStatistics {
    /// Live entries across all buckets
    #[serde(rename = "total_elementos")]
    pub total_entries: usize,
    /// Buckets holding two or more entries. A bucket of length 3 still
    /// counts once.
    #[serde(rename = "colisiones")]
    pub collisions: usize,
    /// `total_entries / table_size`
    #[serde(rename = "factor_carga")]
    pub load_factor: f64,
    /// Longest chain
    #[serde(rename = "longitud_maxima")]
    pub max_chain: usize,
    /// Mean chain length over occupied buckets only
    #[serde(rename = "longitud_promedio")]
    pub mean_chain: f64,
    /// Buckets holding at least one entry
    #[serde(rename = "posiciones_ocupadas")]
    pub occupied_buckets: usize,
}

impl IndexStatistics {
    /// Computes statistics from per-bucket chain lengths.
    pub fn from_chain_lengths<I>(table_size: usize, lengths: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut total_entries = 0;
        let mut collisions = 0;
        let mut max_chain = 0;
        let mut occupied_buckets = 0;

        for len in lengths.into_iter().filter(|len| *len > 0) {
            total_entries += len;
            occupied_buckets += 1;
            max_chain = max_chain.max(len);
            if len > 1 {
                collisions += 1;
            }
        }

        let load_factor = if table_size > 0 {
            total_entries as f64 / table_size as f64
        } else {
            0.0
        };
        let mean_chain = if occupied_buckets > 0 {
            total_entries as f64 / occupied_buckets as f64
        } else {
            0.0
        };

        Self {
            total_entries,
            collisions,
            load_factor,
            max_chain,
            mean_chain,
            occupied_buckets,
        }
    }
}
