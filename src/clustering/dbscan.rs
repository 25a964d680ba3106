//! Density-based clustering of candidate places
//!
//! DBSCAN over haversine distance. Labels live in an index-addressed array
//! and expansion runs off an explicit work queue, so the pass is iterative
//! and every point is expanded at most once.

use std::collections::VecDeque;

use tracing::debug;

use super::{Cluster, ClusterBundle};
use crate::config::ClusteringConfig;
use crate::models::{Candidate, haversine_meters};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Unvisited,
    /// Provisional; a later core point may still reclaim it
    Noise,
    Clustered(usize),
}

/// Groups candidates by spatial density
#[derive(Debug, Clone, Copy)]
pub struct GeoClusterer {
    eps_meters: f64,
    min_pts: usize,
}

impl GeoClusterer {
    #[must_use]
    pub fn new(eps_meters: f64, min_pts: usize) -> Self {
        Self { eps_meters, min_pts }
    }

    #[must_use]
    pub fn from_config(config: &ClusteringConfig) -> Self {
        Self::new(config.eps_meters, config.min_pts)
    }

    /// Cluster `points`; the result partitions the input into clusters and noise
    #[must_use]
    pub fn cluster(&self, points: &[Candidate]) -> ClusterBundle {
        if points.is_empty() {
            return ClusterBundle::default();
        }

        let neighborhoods = self.neighborhoods(points);
        let mut labels = vec![Label::Unvisited; points.len()];
        let mut next_id = 0;

        for seed in 0..points.len() {
            if labels[seed] != Label::Unvisited {
                continue;
            }
            if !self.is_core(&neighborhoods[seed]) {
                labels[seed] = Label::Noise;
                continue;
            }

            let cluster_id = next_id;
            next_id += 1;
            labels[seed] = Label::Clustered(cluster_id);

            let mut queue: VecDeque<usize> = neighborhoods[seed].iter().copied().collect();
            while let Some(idx) = queue.pop_front() {
                match labels[idx] {
                    Label::Clustered(_) => {}
                    Label::Noise => {
                        // Already known not to be core: joins as a border point
                        labels[idx] = Label::Clustered(cluster_id);
                    }
                    Label::Unvisited => {
                        labels[idx] = Label::Clustered(cluster_id);
                        if self.is_core(&neighborhoods[idx]) {
                            queue.extend(
                                neighborhoods[idx]
                                    .iter()
                                    .copied()
                                    .filter(|&n| !matches!(labels[n], Label::Clustered(_))),
                            );
                        }
                    }
                }
            }
        }

        let bundle = Self::collect(points, &labels, next_id);
        debug!(
            "Clustered {} candidates into {} clusters with {} noise points (eps={}m, min_pts={})",
            points.len(),
            bundle.clusters.len(),
            bundle.noise.len(),
            self.eps_meters,
            self.min_pts
        );
        bundle
    }

    /// A point counts itself toward the density threshold
    fn is_core(&self, neighbors: &[usize]) -> bool {
        neighbors.len() + 1 >= self.min_pts
    }

    /// Indices of every other point within `eps_meters`, for each point
    fn neighborhoods(&self, points: &[Candidate]) -> Vec<Vec<usize>> {
        let mut neighborhoods = vec![Vec::new(); points.len()];
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                let d = haversine_meters(points[i].position(), points[j].position());
                if d <= self.eps_meters {
                    neighborhoods[i].push(j);
                    neighborhoods[j].push(i);
                }
            }
        }
        neighborhoods
    }

    fn collect(points: &[Candidate], labels: &[Label], cluster_count: usize) -> ClusterBundle {
        let mut members: Vec<Vec<Candidate>> = vec![Vec::new(); cluster_count];
        let mut noise = Vec::new();

        for (point, label) in points.iter().zip(labels) {
            match label {
                Label::Clustered(id) => members[*id].push(point.clone()),
                Label::Noise | Label::Unvisited => noise.push(point.clone()),
            }
        }

        ClusterBundle {
            clusters: members
                .into_iter()
                .enumerate()
                .map(|(id, members)| Cluster::new(id, members))
                .collect(),
            noise,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use rstest::rstest;
    use std::collections::BTreeSet;

    /// Roughly 0.0009 degrees of latitude per 100 m
    fn point(id: &str, lat: f64, lon: f64) -> Candidate {
        Candidate::new(id, lat, lon, Category::Spot, 1.0)
    }

    fn two_groups() -> Vec<Candidate> {
        vec![
            point("a1", 37.5700, 126.9800),
            point("a2", 37.5709, 126.9800),
            point("a3", 37.5700, 126.9810),
            // about 5 km north
            point("b1", 37.6150, 126.9800),
            point("b2", 37.6159, 126.9800),
            point("b3", 37.6150, 126.9810),
        ]
    }

    fn member_sets(bundle: &ClusterBundle) -> BTreeSet<BTreeSet<String>> {
        bundle
            .clusters
            .iter()
            .map(|c| c.members.iter().map(|m| m.id.clone()).collect())
            .collect()
    }

    #[test]
    fn test_two_dense_groups() {
        let bundle = GeoClusterer::new(800.0, 3).cluster(&two_groups());

        assert_eq!(bundle.cluster_count(), 2);
        assert!(bundle.noise.is_empty());
        assert!(bundle.clusters.iter().all(|c| c.len() == 3));

        let expected: BTreeSet<BTreeSet<String>> = [
            ["a1", "a2", "a3"].iter().map(|s| s.to_string()).collect(),
            ["b1", "b2", "b3"].iter().map(|s| s.to_string()).collect(),
        ]
        .into_iter()
        .collect();
        assert_eq!(member_sets(&bundle), expected);
    }

    #[test]
    fn test_membership_is_order_invariant() {
        let mut reversed = two_groups();
        reversed.reverse();

        let clusterer = GeoClusterer::new(800.0, 3);
        let forward = clusterer.cluster(&two_groups());
        let backward = clusterer.cluster(&reversed);
        assert_eq!(member_sets(&forward), member_sets(&backward));
    }

    #[test]
    fn test_empty_input() {
        let bundle = GeoClusterer::new(800.0, 3).cluster(&[]);
        assert!(bundle.is_empty());
        assert_eq!(bundle.cluster_count(), 0);
    }

    #[test]
    fn test_sparse_points_are_noise() {
        let points = vec![
            point("x", 37.0, 127.0),
            point("y", 37.5, 127.5),
            point("z", 36.5, 126.5),
        ];
        let bundle = GeoClusterer::new(800.0, 3).cluster(&points);
        assert_eq!(bundle.cluster_count(), 0);
        assert_eq!(bundle.noise.len(), 3);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn test_low_min_pts_leaves_no_noise(#[case] min_pts: usize) {
        let points = vec![
            point("x", 37.0, 127.0),
            point("y", 37.5, 127.5),
            point("z", 36.5, 126.5),
        ];
        let bundle = GeoClusterer::new(800.0, min_pts).cluster(&points);
        assert_eq!(bundle.cluster_count(), 3);
        assert!(bundle.noise.is_empty());
    }

    #[test]
    fn test_noise_is_reclaimed_as_border_point() {
        // "edge" is visited first and has only one neighbor, so it is
        // labelled noise before the dense group reaches it
        let points = vec![
            point("edge", 37.5770, 126.9800),
            point("c1", 37.5700, 126.9800),
            point("c2", 37.5709, 126.9800),
            point("c3", 37.5718, 126.9800),
            point("c4", 37.5727, 126.9800),
        ];
        // edge is ~480 m from c4 and further from the rest
        let bundle = GeoClusterer::new(500.0, 4).cluster(&points);

        assert_eq!(bundle.cluster_count(), 1);
        assert!(bundle.noise.is_empty());
        assert_eq!(bundle.clusters[0].len(), 5);
    }

    #[test]
    fn test_duplicate_candidates_are_not_collapsed() {
        let twin = point("same", 37.0, 127.0);
        let points = vec![twin.clone(), twin, point("far", 38.0, 128.0)];
        let bundle = GeoClusterer::new(100.0, 3).cluster(&points);

        // Equal values stay distinct entries, so the partition is complete
        assert_eq!(bundle.len(), 3);
        assert_eq!(bundle.noise.len(), 3);
    }
}
