//! One-dimensional clustering of normalized vertical positions.
//!
//! Two variants are provided:
//! - [`cluster_positions`]: fixed-threshold single-linkage chaining along the
//!   sorted axis, used by the general grouping API.
//! - [`AdaptiveClusterer`]: nearest-mean assignment whose per-cluster reach
//!   grows with the cluster's spread, used by the header/footer analysis.
//!
//! Both sort their input first, so the result does not depend on input order.

use crate::geometry::stats::{mean, sample_std_dev};
use crate::utils::safe_float_cmp;

/// Cluster positions whose consecutive sorted values are within `threshold`.
///
/// Clusters are returned in ascending order and never overlap. Small clusters
/// are kept; callers decide what size is meaningful.
///
/// # Examples
///
/// ```
/// use pdf_textflow::geometry::cluster_positions;
///
/// let clusters = cluster_positions(&[0.10, 0.11, 0.12, 0.50, 0.51], 0.05);
/// let sizes: Vec<usize> = clusters.iter().map(|c| c.len()).collect();
/// assert_eq!(sizes, vec![3, 2]);
/// ```
pub fn cluster_positions(positions: &[f64], threshold: f64) -> Vec<Vec<f64>> {
    if positions.is_empty() {
        return vec![];
    }

    let mut sorted = positions.to_vec();
    sorted.sort_by(|a, b| safe_float_cmp(*a, *b));

    let mut clusters: Vec<Vec<f64>> = Vec::new();
    for pos in sorted {
        match clusters.last_mut() {
            Some(last) if last.last().is_some_and(|&prev| pos - prev <= threshold) => {
                last.push(pos);
            },
            _ => clusters.push(vec![pos]),
        }
    }

    clusters
}

/// Clusterer whose tolerance adapts to page size and cluster spread.
///
/// The base reach is `min(base_threshold, 15pt / avg_page_height)`, so on
/// tall pages the reach shrinks to roughly fifteen points. A candidate joins
/// the nearest cluster whose mean lies within `reach + cluster_std_dev`.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveClusterer {
    base_threshold: f64,
    avg_page_height: f64,
    min_cluster_size: usize,
}

impl AdaptiveClusterer {
    /// Approximate vertical reach in points before normalization.
    const REACH_POINTS: f64 = 15.0;

    /// Create a clusterer for a document with the given average page height.
    pub fn new(base_threshold: f64, avg_page_height: f64, min_cluster_size: usize) -> Self {
        Self {
            base_threshold,
            avg_page_height,
            min_cluster_size,
        }
    }

    /// The reach used for every cluster before spread is added.
    pub fn dynamic_threshold(&self) -> f64 {
        if self.avg_page_height > 0.0 {
            self.base_threshold
                .min(Self::REACH_POINTS / self.avg_page_height)
        } else {
            self.base_threshold
        }
    }

    /// Partition positions, dropping clusters below the minimum size.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_textflow::geometry::AdaptiveClusterer;
    ///
    /// let clusterer = AdaptiveClusterer::new(0.02, 792.0, 2);
    /// let clusters = clusterer.cluster(&[0.950, 0.951, 0.949, 0.40]);
    /// assert_eq!(clusters.len(), 1);
    /// assert_eq!(clusters[0].len(), 3);
    /// ```
    pub fn cluster(&self, positions: &[f64]) -> Vec<Vec<f64>> {
        if positions.is_empty() {
            return vec![];
        }

        let mut sorted = positions.to_vec();
        sorted.sort_by(|a, b| safe_float_cmp(*a, *b));

        let reach = self.dynamic_threshold();
        let mut clusters: Vec<Vec<f64>> = vec![vec![sorted[0]]];
        // (mean, std_dev) per cluster
        let mut stats: Vec<(f64, f64)> = vec![(sorted[0], 0.0)];

        for &pos in &sorted[1..] {
            let mut best: Option<usize> = None;
            let mut min_distance = f64::INFINITY;

            for (idx, &(cluster_mean, cluster_std)) in stats.iter().enumerate() {
                let distance = (pos - cluster_mean).abs();
                if distance < min_distance && distance < reach + cluster_std {
                    min_distance = distance;
                    best = Some(idx);
                }
            }

            match best {
                Some(idx) => {
                    clusters[idx].push(pos);
                    let members = &clusters[idx];
                    stats[idx] = (mean(members).unwrap_or(pos), sample_std_dev(members));
                },
                None => {
                    clusters.push(vec![pos]);
                    stats.push((pos, 0.0));
                },
            }
        }

        clusters
            .into_iter()
            .filter(|c| c.len() >= self.min_cluster_size)
            .collect()
    }
}
