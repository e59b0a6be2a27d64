//! Set algebra over pairs of maps.
//!
//! Both functions read their inputs only through the public
//! [`OrderedMap`] API and always build a fresh result map.

use crate::map::OrderedMap;

/// Merge two maps, dropping keys whose values disagree.
///
/// # Algorithm
/// 1. Walk `m1` in order. Keys absent from `m2` are copied; keys present
///    in both are copied only if the two values are equal.
/// 2. Walk `m2` in order, copying keys absent from `m1`.
///
/// # Returns
/// The merged map, and `false` if at least one shared key had conflicting
/// values. Conflicting keys are left out of the result either way.
///
/// # Complexity
/// O(len(m1) * len(m2))
///
/// # Examples
///
/// ```
/// use chain_map::{combine, OrderedMap};
///
/// let m1: OrderedMap<_, _> = [("a", 1), ("b", 2)].into_iter().collect();
/// let m2: OrderedMap<_, _> = [("b", 2), ("c", 3)].into_iter().collect();
///
/// let (merged, all_valid) = combine(&m1, &m2);
/// assert!(all_valid);
/// assert_eq!(merged.keys().copied().collect::<Vec<_>>(), ["a", "b", "c"]);
/// ```
pub fn combine<K, V>(m1: &OrderedMap<K, V>, m2: &OrderedMap<K, V>) -> (OrderedMap<K, V>, bool)
where
    K: PartialEq + Clone,
    V: PartialEq + Clone,
{
    let mut result = OrderedMap::with_capacity(m1.len() + m2.len());
    let mut all_valid = true;

    for (key, value) in m1 {
        match m2.get(key) {
            Some(other) if other != value => all_valid = false,
            _ => {
                result.insert(key.clone(), value.clone());
            }
        }
    }

    for (key, value) in m2 {
        if !m1.contains_key(key) {
            result.insert(key.clone(), value.clone());
        }
    }

    (result, all_valid)
}

/// Entries of `m1` whose key does not appear in `m2`, in `m1`'s order.
///
/// Values stored in `m2` are ignored.
///
/// # Complexity
/// O(len(m1) * len(m2))
pub fn subtract<K, V>(m1: &OrderedMap<K, V>, m2: &OrderedMap<K, V>) -> OrderedMap<K, V>
where
    K: PartialEq + Clone,
    V: Clone,
{
    let mut result = OrderedMap::with_capacity(m1.len());
    for (key, value) in m1 {
        if !m2.contains_key(key) {
            result.insert(key.clone(), value.clone());
        }
    }
    result
}
