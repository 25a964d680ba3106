//! Clustering output types

use crate::models::{Candidate, Category};
use serde::Serialize;

/// A group of spatially close candidates
#[derive(Debug, Clone, Serialize)]
pub struct Cluster {
    pub id: usize,
    pub members: Vec<Candidate>,
}

impl Cluster {
    #[must_use]
    pub fn new(id: usize, members: Vec<Candidate>) -> Self {
        Self { id, members }
    }

    /// Mean of the members' coordinates as `(lat, lon)`
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        if self.members.is_empty() {
            return (0.0, 0.0);
        }
        let n = self.members.len() as f64;
        let lat = self.members.iter().map(|c| c.latitude).sum::<f64>() / n;
        let lon = self.members.iter().map(|c| c.longitude).sum::<f64>() / n;
        (lat, lon)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn count_of(&self, category: Category) -> usize {
        self.members.iter().filter(|c| c.category == category).count()
    }
}

/// Complete clustering result: every input candidate is in exactly one
/// cluster or in `noise`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClusterBundle {
    pub clusters: Vec<Cluster>,
    pub noise: Vec<Candidate>,
}

impl ClusterBundle {
    /// Total number of candidates covered by the bundle
    #[must_use]
    pub fn len(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum::<usize>() + self.noise.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// All candidates, clustered members first, then noise
    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.clusters
            .iter()
            .flat_map(|c| c.members.iter())
            .chain(self.noise.iter())
    }
}
