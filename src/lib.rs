//! # knnstore - An Embeddable Exact Vector Store
//!
//! knnstore keeps fixed-precision vectors under unique string ids in memory,
//! answers exact top-k queries by cosine similarity, and persists the whole
//! store to a single flat binary file.
//!
//! ## Example
//!
//! ```
//! use knnstore::VectorStore;
//!
//! let mut store = VectorStore::new();
//!
//! // Add vectors
//! store.add("vec1".to_string(), vec![1.0, 0.0, 0.0]).unwrap();
//! store.add("vec2".to_string(), vec![0.0, 1.0, 0.0]).unwrap();
//! store.add("vec3".to_string(), vec![0.7, 0.7, 0.0]).unwrap();
//!
//! // Search for similar vectors
//! let results = store.query(&[1.0, 0.0, 0.0], 2).unwrap();
//! assert_eq!(results[0].id, "vec1"); // Most similar vector
//! ```

pub mod error;
pub mod id;
pub mod persist;
pub mod search;
pub mod vector;
mod db;

// Re-export the store as the primary public API
pub use db::{VectorEntry, VectorStore};
pub use error::{Error, MetricError, Result};
pub use search::SearchHit;
