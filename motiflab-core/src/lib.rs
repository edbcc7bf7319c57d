//! MotifLab Core — PIP extraction, pattern mining, clustering, scoring.
//!
//! This crate contains the mining engine:
//! - Greedy perceptually-important-point extraction over price windows
//! - Sliding-window unique-pattern collection with z-score normalization
//! - A pluggable clustering capability (k-means + silhouette search default)
//! - Martin ratio / Ulcer Index scoring of cluster occupancy
//! - Pure training into an immutable miner state, nearest-centroid predict
//! - Deterministic BLAKE3 seed derivation for reproducible randomness

pub mod cluster;
pub mod metrics;
pub mod miner;
pub mod patterns;
pub mod pips;
pub mod seeds;
