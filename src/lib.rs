//! An in-memory IP routing table based on the Allotment Routing Table.
//!
//! The table stores IPv4 or IPv6 prefixes with caller-supplied metadata
//! and resolves an address to the most specific stored prefix covering it.
//! Every level of the trie keeps an allotment array, so a lookup costs one
//! array index per stride regardless of how many prefixes are stored.
//!
//! One [`ArtTable`] holds one address family; the table is single-writer,
//! with copy-on-write via [`Clone`] for concurrent readers.

mod art;
pub mod types;

pub use crate::art::ArtTable;
pub use crate::types::af::{AddressFamily, IPv4, IPv6};
pub use crate::types::errors::ArtStoreError;
pub use crate::types::route::{Meta, NoMeta, PrefixAs, PrefixId, RouteRecord};
pub use crate::types::stats::LevelStats;
