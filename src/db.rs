//! The database module
//! Provide insert, lookup, query and persistence for the vector store

use crate::error::{Error, Result};
use crate::id::IdGenerator;
use crate::persist;
use crate::search::{self, SearchHit};
use serde::{Serialize, Deserialize};
use std::collections::HashMap;
use std::path::Path;
use std::slice;

/// A stored vector and the id it is addressed by
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorEntry {
    pub id: String,
    pub values: Vec<f32>,
}

/// Append-only collection of entries with an id index.
///
/// Entries keep insertion order. `index` maps every id to its position in
/// `entries` and the two always change together.
#[derive(Debug)]
pub struct VectorStore {
    entries: Vec<VectorEntry>,
    index: HashMap<String, usize>,
    ids: IdGenerator,
}

impl VectorStore {
    /// Creates a new empty store.
    ///
    /// The id generator is seeded from OS entropy once, here.
    ///
    /// # Examples
    ///
    /// ```
    /// use knnstore::VectorStore;
    ///
    /// let store = VectorStore::new();
    /// assert_eq!(store.size(), 0);
    /// ```
    pub fn new() -> VectorStore {
        VectorStore::with_generator(IdGenerator::new())
    }

    /// Creates a new empty store whose generated ids are reproducible.
    pub fn with_seed(seed: u64) -> VectorStore {
        VectorStore::with_generator(IdGenerator::with_seed(seed))
    }

    fn with_generator(ids: IdGenerator) -> VectorStore {
        VectorStore { entries: Vec::new(), index: HashMap::new(), ids }
    }

    /// Adds a vector under a new id.
    ///
    /// The store does not enforce a dimension, entries of different lengths
    /// may coexist.
    ///
    /// # Errors
    ///
    /// * `DuplicateId` - `id` is already stored; the store is left unchanged
    ///
    /// # Examples
    ///
    /// ```
    /// use knnstore::{Error, VectorStore};
    ///
    /// let mut store = VectorStore::new();
    /// store.add("vec1".to_string(), vec![3.0, 4.0]).unwrap();
    ///
    /// let result = store.add("vec1".to_string(), vec![1.0, 0.0]);
    /// assert!(matches!(result, Err(Error::DuplicateId(_))));
    /// ```
    pub fn add(&mut self, id: String, values: Vec<f32>) -> Result<()> {
        if self.index.contains_key(&id) {
            return Err(Error::DuplicateId(id));
        }

        let position = self.entries.len();
        self.index.insert(id.clone(), position);
        self.entries.push(VectorEntry { id, values });

        Ok(())
    }

    /// Adds a vector under a freshly generated id and returns that id.
    pub fn add_generated(&mut self, values: Vec<f32>) -> Result<String> {
        let id = self.generate_id();
        self.add(id.clone(), values)?;
        Ok(id)
    }

    /// Generates a 16 character alphanumeric id not currently in use.
    pub fn generate_id(&mut self) -> String {
        let index = &self.index;
        self.ids.generate(|candidate| index.contains_key(candidate))
    }

    /// Retrieves an entry by its id.
    ///
    /// The borrow ends before any further `add`, so the reference can never
    /// outlive a reallocation of the entry collection.
    ///
    /// # Errors
    ///
    /// * `NotFound` - no entry has this id
    ///
    /// # Examples
    ///
    /// ```
    /// use knnstore::VectorStore;
    ///
    /// let mut store = VectorStore::new();
    /// store.add("vec1".to_string(), vec![3.0, 4.0]).unwrap();
    ///
    /// assert_eq!(store.get("vec1").unwrap().values, vec![3.0, 4.0]);
    /// assert!(store.get("vec2").is_err());
    /// ```
    pub fn get(&self, id: &str) -> Result<&VectorEntry> {
        self.index
            .get(id)
            .map(|&position| &self.entries[position])
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Returns true if an entry has this id.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Returns the number of entries in the store.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates all entries in storage order.
    pub fn iter(&self) -> slice::Iter<'_, VectorEntry> {
        self.entries.iter()
    }

    /// Returns all entries in storage order.
    pub fn entries(&self) -> &[VectorEntry] {
        &self.entries
    }

    /// Finds the `k` entries most similar to `query`, best first.
    ///
    /// See [`search::knn`] for the scan and error policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use knnstore::VectorStore;
    ///
    /// let mut store = VectorStore::new();
    /// store.add("a".to_string(), vec![1.0, 0.0]).unwrap();
    /// store.add("b".to_string(), vec![0.0, 1.0]).unwrap();
    /// store.add("c".to_string(), vec![1.0, 1.0]).unwrap();
    ///
    /// let hits = store.query(&[1.0, 0.0], 2).unwrap();
    /// assert_eq!(hits[0].id, "a");
    /// assert_eq!(hits[1].id, "c");
    /// ```
    pub fn query(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        search::knn(self, query, k)
    }

    /// Saves every entry to `path`, replacing any existing file.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use knnstore::VectorStore;
    ///
    /// let mut store = VectorStore::new();
    /// store.add("vec1".to_string(), vec![1.0, 2.0, 3.0]).unwrap();
    /// store.save("my_store.db").unwrap();
    /// ```
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persist::save(&self.entries, path.as_ref())
    }

    /// Loads a store from a file previously written by [`save`](VectorStore::save).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use knnstore::VectorStore;
    ///
    /// let store = VectorStore::load("my_store.db").unwrap();
    /// println!("Loaded {} vectors", store.size());
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut store = VectorStore::new();
        store.reload(path)?;
        Ok(store)
    }

    /// Replaces the whole contents of this store with the file at `path`.
    ///
    /// The file is fully decoded before anything is swapped in; on error
    /// the store keeps its previous contents.
    pub fn reload<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let entries = persist::load(path)?;
        let index = build_index(&entries).map_err(|id| Error::CorruptFile {
            path: path.to_path_buf(),
            reason: format!("duplicate id '{}'", id),
        })?;

        self.entries = entries;
        self.index = index;
        Ok(())
    }
}

/// Maps each id to its position, or returns the first repeated id.
fn build_index(entries: &[VectorEntry]) -> std::result::Result<HashMap<String, usize>, String> {
    let mut index = HashMap::with_capacity(entries.len());
    for (position, entry) in entries.iter().enumerate() {
        if index.insert(entry.id.clone(), position).is_some() {
            return Err(entry.id.clone());
        }
    }
    Ok(index)
}

impl Default for VectorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a VectorStore {
    type Item = &'a VectorEntry;
    type IntoIter = slice::Iter<'a, VectorEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
