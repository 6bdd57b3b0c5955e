//! # Channel Traversal Order
//!
//! The codec addresses the image as a flat sequence of channel slots:
//! slot `3 * pixel_index + channel`, pixels in row-major order, channels in
//! R, G, B order. A [`Traversal`] decides in which order those slots carry
//! payload bits.
//!
//! - [`Traversal::Raster`] visits slots `0, 1, 2, ...`. The secret key has
//!   no influence on where bits go. This is the default and the only order
//!   that interoperates with images produced by earlier versions.
//! - [`Traversal::Keyed`] visits slots in a pseudo-random permutation
//!   seeded from the secret key. Embedding and extraction must use the same
//!   key and the same traversal; the two orders are not interoperable.
//!
//! ## Keyed permutation
//!
//! The seed is the first four bytes (big-endian) of MD5(secret key). A
//! ChaCha20 PRNG drives a forward Fisher-Yates shuffle that is evaluated
//! lazily: only the swaps actually performed are stored, so producing the
//! first `k` slots costs `O(k)` memory regardless of image size. Ranges are
//! drawn as `u64` so the sequence is identical on 32- and 64-bit targets.
//!
//! A walk over the whole image (extraction with the wrong key, or a cover
//! with no message) displaces a large share of the slots. Once the sparse
//! table would outgrow a dense one it is converted to a `Vec<u32>` of
//! `slot_count` entries, which caps the footprint at 4 bytes per slot.

use md5::{Digest as _, Md5};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Channel visit order for embedding and extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Traversal {
    /// Row-major pixels, R/G/B channels; ignores the secret key
    #[default]
    Raster,
    /// Key-seeded permutation of all channel slots
    Keyed,
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Traversal::Raster => f.write_str("raster"),
            Traversal::Keyed => f.write_str("keyed"),
        }
    }
}

impl Traversal {
    /// Iterator over the `slot_count` channel slots in visit order.
    pub fn slots(self, secret_key: &str, slot_count: usize) -> SlotOrder {
        match self {
            Traversal::Raster => SlotOrder::Raster(0..slot_count),
            Traversal::Keyed => SlotOrder::Keyed(KeyedSlots::new(key_seed(secret_key), slot_count)),
        }
    }
}

/// 32-bit seed derived from the secret key.
pub fn key_seed(secret_key: &str) -> u32 {
    let hash = Md5::digest(secret_key.as_bytes());
    u32::from_be_bytes([hash[0], hash[1], hash[2], hash[3]])
}

pub enum SlotOrder {
    Raster(std::ops::Range<usize>),
    Keyed(KeyedSlots),
}

impl Iterator for SlotOrder {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match self {
            SlotOrder::Raster(range) => range.next(),
            SlotOrder::Keyed(keyed) => keyed.next(),
        }
    }
}

// A hash map entry costs about as much as eight dense `u32` slots.
const DENSE_RATIO: usize = 8;

/// Current contents of the shuffled array.
enum Displaced {
    // Absent index `i` holds value `i`.
    Sparse(HashMap<usize, usize>),
    Dense(Vec<u32>),
}

/// Lazily evaluated Fisher-Yates permutation of `0..len`.
pub struct KeyedSlots {
    rng: ChaCha20Rng,
    len: usize,
    position: usize,
    displaced: Displaced,
}

impl KeyedSlots {
    fn new(seed: u32, len: usize) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(u64::from(seed)),
            len,
            position: 0,
            displaced: Displaced::Sparse(HashMap::new()),
        }
    }

    fn value_at(&self, index: usize) -> usize {
        match &self.displaced {
            Displaced::Sparse(map) => map.get(&index).copied().unwrap_or(index),
            Displaced::Dense(values) => values[index] as usize,
        }
    }

    /// Move `value` into `index` and retire `consumed`, which is never read again.
    fn store(&mut self, index: usize, value: usize, consumed: usize) {
        match &mut self.displaced {
            Displaced::Sparse(map) => {
                map.insert(index, value);
                map.remove(&consumed);
            }
            Displaced::Dense(values) => values[index] = value as u32,
        }
    }

    fn densify_if_large(&mut self) {
        let dense = match &self.displaced {
            Displaced::Sparse(map)
                if map.len() * DENSE_RATIO > self.len && u32::try_from(self.len).is_ok() =>
            {
                let mut values: Vec<u32> = (0..self.len as u32).collect();
                for (&index, &value) in map {
                    values[index] = value as u32;
                }
                values
            }
            _ => return,
        };
        self.displaced = Displaced::Dense(dense);
    }
}

impl Iterator for KeyedSlots {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.position >= self.len {
            return None;
        }

        let i = self.position;
        let j = self.rng.gen_range(i as u64..self.len as u64) as usize;

        let chosen = self.value_at(j);
        let displaced = self.value_at(i);
        self.store(j, displaced, i);
        self.densify_if_large();

        self.position += 1;
        Some(chosen)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.position;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_order_ignores_key() {
        let a: Vec<usize> = Traversal::Raster.slots("alpha", 6).collect();
        let b: Vec<usize> = Traversal::Raster.slots("beta", 6).collect();
        assert_eq!(a, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_keyed_order_is_a_permutation() {
        let mut slots: Vec<usize> = Traversal::Keyed.slots("secret", 300).collect();
        assert_eq!(slots.len(), 300);
        slots.sort_unstable();
        assert_eq!(slots, (0..300).collect::<Vec<_>>());
    }

    #[test]
    fn test_keyed_order_depends_on_key() {
        let a: Vec<usize> = Traversal::Keyed.slots("secret", 300).collect();
        let again: Vec<usize> = Traversal::Keyed.slots("secret", 300).collect();
        let other: Vec<usize> = Traversal::Keyed.slots("Secret", 300).collect();
        assert_eq!(a, again);
        assert_ne!(a, other);
        assert_ne!(a, (0..300).collect::<Vec<_>>());
    }

    #[test]
    fn test_keyed_prefix_is_stable() {
        // Embedding consumes a prefix, extraction may consume more.
        let full: Vec<usize> = Traversal::Keyed.slots("k", 1000).collect();
        let prefix: Vec<usize> = Traversal::Keyed.slots("k", 1000).take(40).collect();
        assert_eq!(&full[..40], prefix.as_slice());
    }

    fn eager_shuffle(seed: u32, len: usize) -> Vec<usize> {
        let mut rng = ChaCha20Rng::seed_from_u64(u64::from(seed));
        let mut values: Vec<usize> = (0..len).collect();
        for i in 0..len {
            let j = rng.gen_range(i as u64..len as u64) as usize;
            values.swap(i, j);
        }
        values
    }

    #[test]
    fn test_lazy_order_matches_eager_shuffle() {
        for len in [1, 7, 64, 5000] {
            let lazy: Vec<usize> = KeyedSlots::new(42, len).collect();
            assert_eq!(lazy, eager_shuffle(42, len), "len {}", len);
        }
    }

    #[test]
    fn test_full_walk_switches_to_dense_table() {
        let mut slots = KeyedSlots::new(key_seed("wrong key"), 30_000);

        slots.by_ref().take(50).for_each(drop);
        assert!(matches!(slots.displaced, Displaced::Sparse(ref map) if map.len() <= 50));

        assert_eq!(slots.by_ref().count(), 30_000 - 50);
        match &slots.displaced {
            Displaced::Dense(values) => assert_eq!(values.len(), 30_000),
            Displaced::Sparse(_) => panic!("full walk kept the sparse table"),
        }
    }

    #[test]
    fn test_empty_image_has_no_slots() {
        assert_eq!(Traversal::Keyed.slots("k", 0).count(), 0);
        assert_eq!(Traversal::Raster.slots("k", 0).count(), 0);
    }

    #[test]
    fn test_key_seed_matches_md5_prefix() {
        // md5("") = d41d8cd9...
        assert_eq!(key_seed(""), 0xd41d8cd9);
    }

    #[test]
    fn test_traversal_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            traversal: Traversal,
        }
        let w: Wrapper = toml::from_str("traversal = \"keyed\"").unwrap();
        assert_eq!(w.traversal, Traversal::Keyed);
        assert_eq!(Traversal::Raster.to_string(), "raster");
    }
}
