//! Geographic clustering of candidate places

pub mod cluster;
pub mod dbscan;

pub use cluster::{Cluster, ClusterBundle};
pub use dbscan::GeoClusterer;
