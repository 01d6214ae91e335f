use std::sync::Arc;

use inetnum::addr::Prefix;
use log::trace;

use crate::art::tree::ArtTree;
use crate::types::af::AddressFamily;
use crate::types::errors::ArtStoreError;
use crate::types::route::{Meta, PrefixId, RouteRecord};
use crate::types::stats::LevelStats;

//------------ ArtTable -----------------------------------------------------

/// A longest-prefix-match table for one address family, for use in
/// single-threaded contexts.
///
/// Readers that need a stable view while a writer mutates should clone the
/// table, mutate the clone and publish that: cloning is a deep structural
/// copy that shares only the (immutable) route values with the original.
///
/// The stride schedule fixes how many address bits each level of the trie
/// consumes; it is validated once at construction and immutable
/// afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtTable<AF, M>
where
    AF: AddressFamily,
    M: Meta,
{
    tree: ArtTree<AF, M>,
    len: usize,
}

impl<AF, M> ArtTable<AF, M>
where
    AF: AddressFamily,
    M: Meta,
{
    /// Creates an empty table with the given stride schedule.
    ///
    /// The schedule must add up to the family's address width, stay within
    /// 16 levels, keep every stride between 1 and 32 bits, and keep every
    /// stride but the last a multiple of 8.
    pub fn new(strides: Vec<u8>) -> Result<Self, ArtStoreError> {
        Ok(ArtTable {
            tree: ArtTree::new(strides)?,
            len: 0,
        })
    }

    /// Inserts a route for `prefix`. Returns false, leaving the table
    /// unchanged, if exactly this prefix is already present.
    ///
    /// # Panics
    ///
    /// Will panic if `prefix` belongs to the other address family.
    pub fn insert(&mut self, prefix: &Prefix, meta: M) -> bool {
        let inserted =
            self.tree.insert(RouteRecord::new_from_prefix(prefix, meta));
        if inserted {
            trace!("inserted {}", prefix);
            self.len += 1;
        }
        inserted
    }

    /// Removes and returns the route stored under exactly `prefix`, or
    /// None, leaving the table unchanged, if there is no such route.
    ///
    /// # Panics
    ///
    /// Will panic if `prefix` belongs to the other address family.
    pub fn delete(&mut self, prefix: &Prefix) -> Option<RouteRecord<AF, M>> {
        let deleted = self.tree.delete(PrefixId::from(*prefix))?;
        trace!("deleted {}", prefix);
        self.len -= 1;
        Some(Arc::try_unwrap(deleted).unwrap_or_else(|rc| (*rc).clone()))
    }

    /// The most specific route covering `addr`, or None if not even a
    /// default route does.
    ///
    /// # Panics
    ///
    /// Will panic if `addr` belongs to the other address family.
    pub fn lookup(
        &self,
        addr: std::net::IpAddr,
    ) -> Option<&RouteRecord<AF, M>> {
        self.tree.lookup(AF::from_ipaddr(addr))
    }

    /// The number of routes in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of allocated stride nodes, the empty root included.
    pub fn nodes_len(&self) -> usize {
        self.tree.nodes_len()
    }

    /// Iterates over all stored routes, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteRecord<AF, M>> {
        self.tree.records().into_iter()
    }

    /// Node and prefix counts per trie level.
    pub fn level_stats(&self) -> Vec<LevelStats> {
        self.tree.level_stats()
    }

    pub fn strides(&self) -> &[u8] {
        &self.tree.strides
    }
}
