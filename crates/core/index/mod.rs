//! Geohash prefix trie and the spatial index built on it.

pub mod spatial;
pub mod trie;

pub use spatial::{
    DEFAULT_GEOHASH_PRECISION, IndexEntry, IndexStats, NearestMatch, SearchArea, SpatialIndex,
};
pub use trie::PrefixTrie;
