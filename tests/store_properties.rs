use knnstore::vector::magnitude;
use knnstore::{Error, VectorStore};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn arb_values(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-100.0f32..100.0, dim)
}

/// Unique ids mapped to vectors of one shared dimension
fn arb_entries() -> impl Strategy<Value = (usize, BTreeMap<String, Vec<f32>>)> {
    (1usize..6).prop_flat_map(|dim| {
        (
            Just(dim),
            prop::collection::btree_map("[a-zA-Z0-9]{1,12}", arb_values(dim), 1..30),
        )
    })
}

fn bits(values: &[f32]) -> Vec<u32> {
    values.iter().map(|v| v.to_bits()).collect()
}

proptest! {
    #[test]
    fn prop_add_then_get_returns_exact_values(id in "\\PC{0,20}", values in prop::collection::vec(any::<f32>(), 0..16)) {
        let mut store = VectorStore::new();
        store.add(id.clone(), values.clone()).unwrap();

        let entry = store.get(&id).unwrap();
        prop_assert_eq!(&entry.id, &id);
        prop_assert_eq!(bits(&entry.values), bits(&values));
    }

    #[test]
    fn prop_duplicate_add_is_rejected((_, entries) in arb_entries()) {
        let mut store = VectorStore::new();
        for (id, values) in &entries {
            store.add(id.clone(), values.clone()).unwrap();
        }

        for id in entries.keys() {
            let result = store.add(id.clone(), vec![0.0]);
            prop_assert!(matches!(result, Err(Error::DuplicateId(_))));
        }
        prop_assert_eq!(store.size(), entries.len());
        for (id, values) in &entries {
            prop_assert_eq!(&store.get(id).unwrap().values, values);
        }
    }

    #[test]
    fn prop_save_load_round_trip(values in prop::collection::vec(prop::collection::vec(any::<f32>(), 0..8), 0..20)) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prop.db");

        let mut store = VectorStore::with_seed(9);
        for v in &values {
            store.add_generated(v.clone()).unwrap();
        }
        store.save(&path).unwrap();

        let loaded = VectorStore::load(&path).unwrap();
        prop_assert_eq!(loaded.size(), store.size());
        for (before, after) in store.iter().zip(loaded.iter()) {
            prop_assert_eq!(&before.id, &after.id);
            prop_assert_eq!(bits(&before.values), bits(&after.values));
            prop_assert_eq!(bits(&loaded.get(&before.id).unwrap().values), bits(&before.values));
        }
    }

    #[test]
    fn prop_query_is_sorted_and_bounded((dim, entries) in arb_entries(), k in 1usize..40, seed in any::<u64>()) {
        let mut store = VectorStore::new();
        for (id, values) in &entries {
            store.add(id.clone(), values.clone()).unwrap();
        }
        // Entries the scan must skip
        store.add("zero_vec".to_string(), vec![0.0; dim]).unwrap();
        store.add("wrong_dim".to_string(), vec![1.0; dim + 1]).unwrap();

        let query: Vec<f32> = (0..dim).map(|i| ((seed >> (i * 8)) & 0xff) as f32 + 1.0).collect();
        let scorable = entries.values().filter(|v| magnitude(v) > 0.0).count();

        let hits = store.query(&query, k).unwrap();
        prop_assert_eq!(hits.len(), k.min(scorable));
        prop_assert!(hits.iter().all(|h| h.id != "zero_vec" && h.id != "wrong_dim"));
        for w in hits.windows(2) {
            prop_assert!(w[0].score >= w[1].score);
        }
    }

    #[test]
    fn prop_query_returns_the_best_scores((dim, entries) in arb_entries(), k in 1usize..10) {
        let mut store = VectorStore::new();
        for (id, values) in &entries {
            store.add(id.clone(), values.clone()).unwrap();
        }
        let query = vec![1.0f32; dim];

        let mut all: Vec<f32> = store
            .iter()
            .filter_map(|e| knnstore::vector::cosine(&query, &e.values).ok())
            .collect();
        all.sort_by(|a, b| b.total_cmp(a));
        all.truncate(k);

        let hits = store.query(&query, k).unwrap();
        let scores: Vec<f32> = hits.iter().map(|h| h.score).collect();
        prop_assert_eq!(bits(&scores), bits(&all));
    }
}

#[test]
fn test_concrete_scenario() {
    let mut store = VectorStore::new();
    store.add("a".to_string(), vec![1.0, 0.0]).unwrap();
    store.add("b".to_string(), vec![0.0, 1.0]).unwrap();
    store.add("c".to_string(), vec![1.0, 1.0]).unwrap();

    let hits = store.query(&[1.0, 0.0], 2).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, "a");
    assert_eq!(hits[0].score, 1.0);
    assert_eq!(hits[1].id, "c");
    assert!((hits[1].score - 0.7071).abs() < 1e-4);
}

#[test]
fn test_zero_vector_entry_is_excluded() {
    let mut store = VectorStore::new();
    store.add("z".to_string(), vec![0.0, 0.0]).unwrap();
    store.add("a".to_string(), vec![1.0, 0.0]).unwrap();
    store.add("b".to_string(), vec![0.0, 1.0]).unwrap();

    let hits = store.query(&[1.0, 1.0], 5).unwrap();
    let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids.len(), 2);
    assert!(!ids.contains(&"z"));
}

#[test]
fn test_query_argument_errors() {
    let mut store = VectorStore::new();
    assert!(matches!(store.query(&[1.0], 1), Err(Error::EmptyStore)));

    store.add("a".to_string(), vec![1.0]).unwrap();
    assert!(matches!(store.query(&[], 1), Err(Error::InvalidArgument(_))));
    assert!(matches!(store.query(&[1.0], 0), Err(Error::InvalidArgument(_))));
}
