//! Exact top-k similarity search
//!
//! A single linear scan over the store keeps the `k` best candidates in a
//! bounded min-heap, O(n log k) time and O(k) extra space.

use crate::db::VectorStore;
use crate::error::{Error, Result};
use crate::vector::cosine;
use serde::Serialize;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use tracing::{debug, warn};

/// One ranked result of a query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: String,
    /// Cosine similarity to the query, higher is closer
    pub score: f32,
}

/// Heap element. Greater means better: higher score, then earlier position.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    score: f32,
    position: usize,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Adding 0.0 folds -0.0 into +0.0 so equal scores tie
        (self.score + 0.0)
            .total_cmp(&(other.score + 0.0))
            .then_with(|| other.position.cmp(&self.position))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Returns the `k` entries of `store` most similar to `query`, best first.
///
/// Entries that cannot be scored against the query (different dimension,
/// zero magnitude) are skipped with a warning and never fail the query. If
/// every entry is skipped the result is empty. Equal scores rank in storage
/// order, and at the eviction boundary the earlier entry is kept. NaN scores
/// are kept and ordered by `f32::total_cmp`.
///
/// # Errors
///
/// * `InvalidArgument` - `query` is empty or `k` is zero
/// * `EmptyStore` - the store has no entries
///
/// # Examples
///
/// ```
/// use knnstore::{VectorStore, search::knn};
///
/// let mut store = VectorStore::new();
/// store.add("a".to_string(), vec![1.0, 0.0]).unwrap();
/// store.add("z".to_string(), vec![0.0, 0.0]).unwrap();
///
/// let hits = knn(&store, &[1.0, 1.0], 5).unwrap();
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].id, "a");
/// ```
pub fn knn(store: &VectorStore, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
    if query.is_empty() {
        return Err(Error::InvalidArgument("query vector should not be empty".to_string()));
    }
    if k == 0 {
        return Err(Error::InvalidArgument("k should be greater than 0".to_string()));
    }
    if store.is_empty() {
        return Err(Error::EmptyStore);
    }

    let mut top_k: BinaryHeap<Reverse<Candidate>> = BinaryHeap::with_capacity(k);
    let mut skipped = 0usize;

    for (position, entry) in store.iter().enumerate() {
        let score = match cosine(query, &entry.values) {
            Ok(score) => score,
            Err(e) => {
                warn!(id = %entry.id, error = %e, "skipping vector");
                skipped += 1;
                continue;
            }
        };

        let candidate = Candidate { score, position };
        if top_k.len() < k {
            top_k.push(Reverse(candidate));
        } else if let Some(mut worst) = top_k.peek_mut() {
            if candidate > worst.0 {
                *worst = Reverse(candidate);
            }
        }
    }

    debug!(
        scanned = store.size(),
        skipped,
        k,
        returned = top_k.len(),
        "top-k scan finished"
    );

    // Ascending order of Reverse is descending order of Candidate
    let hits = top_k
        .into_sorted_vec()
        .into_iter()
        .map(|Reverse(candidate)| SearchHit {
            id: store.entries()[candidate.position].id.clone(),
            score: candidate.score,
        })
        .collect();

    Ok(hits)
}
