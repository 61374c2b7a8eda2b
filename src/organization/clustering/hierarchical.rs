//! Hierarchical agglomerative clustering over a distance matrix

use super::similarity::DistanceMatrix;
use crate::config::{ClusteringConfig, Linkage};
use tracing::{debug, trace};

/// A group of members, as ascending indices into the distance matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub members: Vec<usize>,
}

impl Cluster {
    pub fn singleton(member: usize) -> Self {
        Self {
            members: vec![member],
        }
    }

    pub fn merge_with(&mut self, other: Cluster) {
        self.members.extend(other.members);
        self.members.sort_unstable();
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, member: usize) -> bool {
        self.members.binary_search(&member).is_ok()
    }
}

/// Agglomerative clustering with a configurable linkage.
///
/// Starts from singletons and repeatedly merges the closest pair of
/// clusters. Without a target count, merging continues while the closest
/// pair is strictly nearer than the threshold; with a target count, it
/// continues until that many clusters remain. Ties go to the pair whose
/// members come first in declaration order, so results are reproducible.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchicalClustering {
    threshold: f64,
    linkage: Linkage,
    target_clusters: Option<usize>,
}

impl HierarchicalClustering {
    pub fn new(threshold: f64, linkage: Linkage) -> Self {
        Self {
            threshold,
            linkage,
            target_clusters: None,
        }
    }

    pub fn with_target_clusters(mut self, target: usize) -> Self {
        self.target_clusters = Some(target.max(1));
        self
    }

    pub fn from_config(config: &ClusteringConfig) -> Self {
        let clustering = Self::new(config.distance_threshold, config.linkage);
        match config.target_clusters {
            Some(target) => clustering.with_target_clusters(target),
            None => clustering,
        }
    }

    /// Clusters ordered by their first member
    pub fn cluster(&self, matrix: &DistanceMatrix) -> Vec<Cluster> {
        let size = matrix.len();
        if size == 0 {
            return vec![];
        }

        // Slot `i` holds the cluster whose smallest member is `i`
        let mut slots: Vec<Option<Cluster>> =
            (0..size).map(|i| Some(Cluster::singleton(i))).collect();
        let mut distances: Vec<Vec<f64>> = (0..size)
            .map(|i| (0..size).map(|j| matrix.get(i, j)).collect())
            .collect();
        let mut remaining = size;
        let mut merges = 0usize;

        loop {
            if self.target_clusters.is_some_and(|target| remaining <= target) {
                break;
            }

            let Some((i, j, distance)) = Self::closest_pair(&slots, &distances) else {
                break;
            };
            if self.target_clusters.is_none() && distance >= self.threshold {
                trace!(distance, threshold = self.threshold, "closest pair above threshold");
                break;
            }

            let left_size = slots[i].as_ref().map_or(0, Cluster::len);
            let Some(absorbed) = slots[j].take() else {
                break;
            };
            let right_size = absorbed.len();

            for k in 0..size {
                if k == i || k == j || slots[k].is_none() {
                    continue;
                }
                let updated = self.linkage_update(
                    distances[i][k],
                    distances[j][k],
                    left_size,
                    right_size,
                );
                distances[i][k] = updated;
                distances[k][i] = updated;
            }

            if let Some(target) = slots[i].as_mut() {
                target.merge_with(absorbed);
            }
            remaining -= 1;
            merges += 1;
            trace!(left = i, right = j, distance, "merged clusters");
        }

        debug!(
            members = size,
            clusters = remaining,
            merges,
            linkage = ?self.linkage,
            "Hierarchical clustering finished"
        );
        slots.into_iter().flatten().collect()
    }

    /// First live pair (in row-major order) with the smallest distance
    fn closest_pair(
        slots: &[Option<Cluster>],
        distances: &[Vec<f64>],
    ) -> Option<(usize, usize, f64)> {
        let live: Vec<usize> = slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| i))
            .collect();

        let mut best: Option<(usize, usize, f64)> = None;
        for (n, &i) in live.iter().enumerate() {
            for &j in &live[n + 1..] {
                let distance = distances[i][j];
                if best.map_or(true, |(_, _, current)| distance < current) {
                    best = Some((i, j, distance));
                }
            }
        }
        best
    }

    /// Lance-Williams update for the merged cluster against a third one
    fn linkage_update(&self, d_ik: f64, d_jk: f64, n_i: usize, n_j: usize) -> f64 {
        match self.linkage {
            Linkage::Single => d_ik.min(d_jk),
            Linkage::Complete => d_ik.max(d_jk),
            Linkage::Average => {
                (n_i as f64 * d_ik + n_j as f64 * d_jk) / (n_i + n_j) as f64
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn members(clusters: &[Cluster]) -> Vec<Vec<usize>> {
        clusters.iter().map(|c| c.members.clone()).collect()
    }

    /// Two tight pairs {0,1} and {2,3} with a bridge 1-2 at 0.5
    fn two_pairs() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 0.1, 0.9, 0.9],
            vec![0.1, 0.0, 0.5, 0.9],
            vec![0.9, 0.5, 0.0, 0.2],
            vec![0.9, 0.9, 0.2, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_matrix() {
        let clustering = HierarchicalClustering::new(0.75, Linkage::Complete);
        assert!(clustering.cluster(&DistanceMatrix::from_rows(vec![]).unwrap()).is_empty());
    }

    #[test]
    fn test_complete_linkage_keeps_pairs_apart() {
        let clusters = HierarchicalClustering::new(0.75, Linkage::Complete).cluster(&two_pairs());
        assert_eq!(members(&clusters), vec![vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn test_single_linkage_chains_through_bridge() {
        let clusters = HierarchicalClustering::new(0.75, Linkage::Single).cluster(&two_pairs());
        assert_eq!(members(&clusters), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn test_average_linkage() {
        // {0,1} to {2,3}: mean of 0.9, 0.9, 0.5, 0.9 = 0.8
        let below = HierarchicalClustering::new(0.85, Linkage::Average).cluster(&two_pairs());
        assert_eq!(below.len(), 1);
        let above = HierarchicalClustering::new(0.75, Linkage::Average).cluster(&two_pairs());
        assert_eq!(above.len(), 2);
    }

    #[test]
    fn test_threshold_is_strict() {
        let matrix = DistanceMatrix::from_rows(vec![vec![0.0, 0.5], vec![0.5, 0.0]]).unwrap();
        assert_eq!(HierarchicalClustering::new(0.5, Linkage::Complete).cluster(&matrix).len(), 2);
        assert_eq!(HierarchicalClustering::new(0.51, Linkage::Complete).cluster(&matrix).len(), 1);
    }

    #[test]
    fn test_target_clusters_overrides_threshold() {
        let clusters = HierarchicalClustering::new(0.05, Linkage::Complete)
            .with_target_clusters(2)
            .cluster(&two_pairs());
        assert_eq!(members(&clusters), vec![vec![0, 1], vec![2, 3]]);

        let one = HierarchicalClustering::new(0.05, Linkage::Complete)
            .with_target_clusters(1)
            .cluster(&two_pairs());
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn test_ties_break_in_declaration_order() {
        let matrix = DistanceMatrix::from_rows(vec![
            vec![0.0, 0.3, 0.3],
            vec![0.3, 0.0, 0.3],
            vec![0.3, 0.3, 0.0],
        ])
        .unwrap();
        let clusters = HierarchicalClustering::new(0.9, Linkage::Complete)
            .with_target_clusters(2)
            .cluster(&matrix);
        assert_eq!(members(&clusters), vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn test_deterministic_clustering() {
        let clustering = HierarchicalClustering::new(0.75, Linkage::Average);
        let first = clustering.cluster(&two_pairs());
        let second = clustering.cluster(&two_pairs());
        assert_eq!(first, second);
    }
}
