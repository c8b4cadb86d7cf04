//! A bidirectional multimap supporting many-to-many associations.
//!
//! The graph uses this to track "commutative condition depends on operand"
//! edges that are still outstanding; the `remove_key`/`remove_value` return
//! values are the cascade signal (entries left with zero remaining edges).

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct BiMultimap<K, V> {
    keys_to_values: HashMap<K, HashSet<V>>,
    values_to_keys: HashMap<V, HashSet<K>>,
}

impl<K, V> Default for BiMultimap<K, V> {
    fn default() -> Self {
        BiMultimap {
            keys_to_values: HashMap::new(),
            values_to_keys: HashMap::new(),
        }
    }
}

impl<K, V> BiMultimap<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    pub fn new() -> BiMultimap<K, V> {
        BiMultimap::default()
    }

    pub fn put(&mut self, key: K, value: V) {
        self.keys_to_values
            .entry(key.clone())
            .or_default()
            .insert(value.clone());
        self.values_to_keys.entry(value).or_default().insert(key);
    }

    pub fn put_all(&mut self, other: &BiMultimap<K, V>) {
        for (k, vs) in &other.keys_to_values {
            for v in vs {
                self.put(k.clone(), v.clone());
            }
        }
    }

    pub fn clear(&mut self) {
        self.keys_to_values.clear();
        self.values_to_keys.clear();
    }

    pub fn remove(&mut self, key: &K, value: &V) -> bool {
        let forward = match self.keys_to_values.get_mut(key) {
            Some(vs) => {
                let removed = vs.remove(value);
                if vs.is_empty() {
                    self.keys_to_values.remove(key);
                }
                removed
            }
            None => false,
        };
        let backward = match self.values_to_keys.get_mut(value) {
            Some(ks) => {
                let removed = ks.remove(key);
                if ks.is_empty() {
                    self.values_to_keys.remove(value);
                }
                removed
            }
            None => false,
        };
        forward && backward
    }

    /// Removes every edge from `key`. Returns the values that, as a result,
    /// no longer appear in the map at all.
    pub fn remove_key(&mut self, key: &K) -> HashSet<V> {
        let mut cleared = HashSet::new();
        if let Some(values) = self.keys_to_values.remove(key) {
            for v in values {
                if let Some(ks) = self.values_to_keys.get_mut(&v) {
                    ks.remove(key);
                    if ks.is_empty() {
                        self.values_to_keys.remove(&v);
                        cleared.insert(v);
                    }
                }
            }
        }
        cleared
    }

    /// Mirror of [`BiMultimap::remove_key`]: removes every edge to `value`
    /// and returns the keys left with no remaining values.
    pub fn remove_value(&mut self, value: &V) -> HashSet<K> {
        let mut cleared = HashSet::new();
        if let Some(keys) = self.values_to_keys.remove(value) {
            for k in keys {
                if let Some(vs) = self.keys_to_values.get_mut(&k) {
                    vs.remove(value);
                    if vs.is_empty() {
                        self.keys_to_values.remove(&k);
                        cleared.insert(k);
                    }
                }
            }
        }
        cleared
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.keys_to_values.contains_key(key)
    }

    pub fn contains_value(&self, value: &V) -> bool {
        self.values_to_keys.contains_key(value)
    }

    pub fn get_value(&self, key: &K) -> impl Iterator<Item = &V> {
        self.keys_to_values.get(key).into_iter().flatten()
    }

    pub fn get_key(&self, value: &V) -> impl Iterator<Item = &K> {
        self.values_to_keys.get(value).into_iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.keys_to_values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_and_lookup_both_directions() {
        let mut map: BiMultimap<&str, u32> = BiMultimap::new();
        map.put("a", 1);
        map.put("a", 2);
        map.put("b", 2);

        assert!(map.contains_key(&"a"));
        assert!(map.contains_value(&2));
        let mut vals: Vec<u32> = map.get_value(&"a").copied().collect();
        vals.sort_unstable();
        assert_eq!(vals, vec![1, 2]);
        let mut keys: Vec<&str> = map.get_key(&2).copied().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn remove_key_reports_orphaned_values() {
        let mut map: BiMultimap<&str, u32> = BiMultimap::new();
        map.put("a", 1);
        map.put("a", 2);
        map.put("b", 2);

        let cleared = map.remove_key(&"a");
        // 1 lost its only key; 2 is still held by "b".
        assert_eq!(cleared, HashSet::from([1]));
        assert!(!map.contains_key(&"a"));
        assert!(map.contains_value(&2));
    }

    #[test]
    fn remove_value_reports_orphaned_keys() {
        let mut map: BiMultimap<&str, u32> = BiMultimap::new();
        map.put("a", 1);
        map.put("b", 1);
        map.put("b", 2);

        let cleared = map.remove_value(&1);
        assert_eq!(cleared, HashSet::from(["a"]));
        assert!(map.contains_key(&"b"));
    }

    #[test]
    fn remove_single_edge() {
        let mut map: BiMultimap<&str, u32> = BiMultimap::new();
        map.put("a", 1);
        assert!(map.remove(&"a", &1));
        assert!(!map.remove(&"a", &1));
        assert!(map.is_empty());
    }
}
