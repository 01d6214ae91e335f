use std::sync::Arc;

use log::trace;

use crate::art::allot::base_index;
use crate::art::node::StrideNode;
use crate::types::af::AddressFamily;
use crate::types::errors::ArtStoreError;
use crate::types::route::{Meta, PrefixId, RouteRecord};
use crate::types::stats::LevelStats;

/// The deepest schedule the trie supports. An all-8-bit IPv6 schedule uses
/// exactly this many levels.
pub(crate) const MAX_STRIDE_LEVELS: usize = 16;

//------------ ArtTree ------------------------------------------------------

/// The trie proper: the stride schedule and the root node. Everything here
/// works on family-sized integers; prefix parsing and display live a layer
/// up in [`ArtTable`](crate::ArtTable).
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ArtTree<AF, M>
where
    AF: AddressFamily,
    M: Meta,
{
    pub(crate) strides: Vec<u8>,
    pub(crate) root: StrideNode<AF, M>,
}

impl<AF, M> ArtTree<AF, M>
where
    AF: AddressFamily,
    M: Meta,
{
    pub(crate) fn new(strides: Vec<u8>) -> Result<Self, ArtStoreError> {
        Self::validate_strides(&strides)?;
        let root = StrideNode::new(strides[0], strides.len() > 1);
        Ok(ArtTree { strides, root })
    }

    // Check that the stride schedule makes sense for this family.
    fn validate_strides(strides: &[u8]) -> Result<(), ArtStoreError> {
        if strides.len() > MAX_STRIDE_LEVELS {
            return Err(ArtStoreError::StrideLevelsExceeded);
        }
        for (level, &stride) in strides.iter().enumerate() {
            if stride == 0 || stride > 32 {
                return Err(ArtStoreError::StrideWidthInvalid);
            }
            if level != strides.len() - 1 && stride % 8 != 0 {
                return Err(ArtStoreError::StrideUnaligned);
            }
        }
        if strides.iter().map(|&s| s as u32).sum::<u32>() != AF::BITS as u32
        {
            return Err(ArtStoreError::StrideSumMismatch);
        }
        Ok(())
    }

    //--- Multi-level insert

    /// Walks down to the stride the prefix terminates in, allocating
    /// missing nodes on the way, and seats the route there. Returns false
    /// if the exact prefix is already present.
    pub(crate) fn insert(&mut self, record: RouteRecord<AF, M>) -> bool {
        let route = Arc::new(record);

        if route.len == 0 {
            // The default route lives in the root's own default slot and
            // is not reference-counted; the root is never freed.
            if self.root.routes[1].is_some() {
                return false;
            }
            self.root.routes[1] = Some(route);
            return true;
        }

        let strides = &self.strides;
        let mut x = &mut self.root;
        let mut level = 0;
        let mut covered = 0;
        loop {
            let stride = strides[level];
            covered += stride;
            let bits =
                AF::get_stride_bits(route.net, covered - stride, stride);
            if route.len <= covered {
                let stride_plen = route.len - (covered - stride);
                if x.insert_at(stride, bits, stride_plen, route) {
                    x.ref_count += 1;
                    return true;
                }
                return false;
            }
            // A child node always gets the width of the level below the
            // one being walked.
            let has_grandchildren = level + 2 < strides.len();
            x = x.child_or_insert(bits, strides[level + 1], has_grandchildren);
            level += 1;
        }
    }

    //--- Multi-level delete

    /// Removes the route stored under exactly this prefix, freeing any
    /// nodes left without routes and children on the way back up.
    pub(crate) fn delete(
        &mut self,
        pfx: PrefixId<AF>,
    ) -> Option<Arc<RouteRecord<AF, M>>> {
        if pfx.get_len() == 0 {
            return self.root.routes[1].take();
        }
        Self::delete_level(&mut self.root, &self.strides, 0, 0, pfx)
    }

    fn delete_level(
        x: &mut StrideNode<AF, M>,
        strides: &[u8],
        level: usize,
        covered: u8,
        pfx: PrefixId<AF>,
    ) -> Option<Arc<RouteRecord<AF, M>>> {
        let stride = strides[level];
        let covered = covered + stride;
        let bits =
            AF::get_stride_bits(pfx.get_net(), covered - stride, stride);

        if pfx.get_len() <= covered {
            let stride_plen = pfx.get_len() - (covered - stride);
            let deleted = x.delete_at(stride, bits, stride_plen, pfx)?;
            x.ref_count -= 1;
            return Some(deleted);
        }

        let deleted = {
            let child = x.children[bits as usize].as_mut()?;
            let deleted =
                Self::delete_level(child, strides, level + 1, covered, pfx)?;
            if child.ref_count > 0 {
                return Some(deleted);
            }
            deleted
        };

        // The child lost its last route or grandchild: detach it and give
        // back the reference its parent held.
        trace!("free empty {}-bit stride node", strides[level + 1]);
        x.children[bits as usize] = None;
        x.ref_count -= 1;
        Some(deleted)
    }

    //--- Structure walks

    pub(crate) fn nodes_len(&self) -> usize {
        let mut nodes = Vec::new();
        Self::collect_nodes(&self.root, 0, &mut nodes);
        nodes.len()
    }

    /// All route records seated in the trie, in no particular order.
    pub(crate) fn records(&self) -> Vec<&RouteRecord<AF, M>> {
        let mut nodes = Vec::new();
        Self::collect_nodes(&self.root, 0, &mut nodes);

        let mut records = Vec::new();
        for (level, node) in nodes {
            let covered: u8 = self.strides[..level].iter().sum();
            let width = self.strides[level];
            records.extend(
                Self::seated_records(node, width, covered)
                    .map(|route| &**route),
            );
        }
        records
    }

    pub(crate) fn level_stats(&self) -> Vec<LevelStats> {
        let mut nodes = Vec::new();
        Self::collect_nodes(&self.root, 0, &mut nodes);

        let mut stats: Vec<LevelStats> = (0..self.strides.len())
            .map(|level| LevelStats {
                level: level as u8,
                nodes_num: 0,
                prefixes_num: 0,
            })
            .collect();
        for (level, node) in nodes {
            let covered: u8 = self.strides[..level].iter().sum();
            let width = self.strides[level];
            stats[level].nodes_num += 1;
            stats[level].prefixes_num +=
                Self::seated_records(node, width, covered).count() as u32;
        }
        stats
    }

    fn collect_nodes<'a>(
        x: &'a StrideNode<AF, M>,
        level: usize,
        out: &mut Vec<(usize, &'a StrideNode<AF, M>)>,
    ) {
        out.push((level, x));
        for child in x.children.iter().flatten() {
            Self::collect_nodes(child, level + 1, out);
        }
    }

    // The routes seated in this node, as opposed to the copies `allot`
    // spread over covered slots: a route sits in the slot that is its own
    // base index at this level, and the default route sits in the root's
    // slot 1.
    fn seated_records<'a>(
        node: &'a StrideNode<AF, M>,
        width: u8,
        covered: u8,
    ) -> impl Iterator<Item = &'a Arc<RouteRecord<AF, M>>> {
        node.routes.iter().enumerate().filter_map(move |(b, slot)| {
            let route = slot.as_ref()?;
            if route.len == 0 {
                return (covered == 0 && b == 1).then_some(route);
            }
            if route.len <= covered || route.len > covered + width {
                return None;
            }
            let bits = AF::get_stride_bits(route.net, covered, width);
            (base_index(width, bits, route.len - covered) == b)
                .then_some(route)
        })
    }
}
