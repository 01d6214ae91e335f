use std::sync::Arc;

use log::trace;

use crate::art::allot::{allot, base_index, fringe_index};
use crate::types::af::AddressFamily;
use crate::types::route::{Meta, PrefixId, RouteRecord};

//------------ StrideNode ---------------------------------------------------

/// One level of the trie: the allotment array for one stride, plus a child
/// node per fringe slot.
///
/// The child array is half the size of the allotment array and indexed by
/// the plain stride bits; the corresponding fringe slot in `routes` is
/// `(1 << width) | bits`. Nodes on the last level of the schedule never
/// carry children and leave the array empty.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct StrideNode<AF, M>
where
    AF: AddressFamily,
    M: Meta,
{
    pub(crate) routes: Vec<Option<Arc<RouteRecord<AF, M>>>>,
    pub(crate) children: Vec<Option<Box<StrideNode<AF, M>>>>,
    /// Routes seated at this stride plus populated child slots. A non-root
    /// node that reaches zero is detached by its parent.
    pub(crate) ref_count: u32,
}

impl<AF, M> StrideNode<AF, M>
where
    AF: AddressFamily,
    M: Meta,
{
    pub(crate) fn new(width: u8, has_children: bool) -> Self {
        StrideNode {
            routes: vec![None; 1 << (width + 1)],
            children: if has_children {
                vec![None; 1 << width]
            } else {
                Vec::new()
            },
            ref_count: 0,
        }
    }

    //--- Single-level operations

    /// Seats `route` at the base index of the stride-local prefix
    /// `(bits, plen)` and allots it down through the slots it covers,
    /// leaving more specific routes shadowed in place.
    ///
    /// Returns false if exactly this prefix is already present; occupancy
    /// is decided on the full prefix carried by the seated record, not on
    /// the stride-local bits.
    pub(crate) fn insert_at(
        &mut self,
        width: u8,
        bits: u32,
        plen: u8,
        route: Arc<RouteRecord<AF, M>>,
    ) -> bool {
        let b = base_index(width, bits, plen);
        if let Some(prev) = &self.routes[b] {
            if prev.prefix_id() == route.prefix_id() {
                return false;
            }
        }
        trace!("seat {} at slot {}", route, b);
        let prev = self.routes[b].clone();
        allot(&mut self.routes, 1 << width, b, prev.as_ref(), Some(&route));
        true
    }

    /// Removes the route seated at the stride-local prefix `(bits, plen)`
    /// by allotting the covering route from the parent binary-tree slot
    /// back over it.
    ///
    /// `pfx` is the full prefix being deleted: a slot that is merely
    /// covered by a shorter prefix does not count as present, and the
    /// array is left untouched in that case.
    pub(crate) fn delete_at(
        &mut self,
        width: u8,
        bits: u32,
        plen: u8,
        pfx: PrefixId<AF>,
    ) -> Option<Arc<RouteRecord<AF, M>>> {
        let b = base_index(width, bits, plen);
        let prev = self.routes[b].clone()?;
        if prev.prefix_id() != pfx {
            return None;
        }
        trace!("unseat {} from slot {}", prev, b);
        let covering = self.routes[b >> 1].clone();
        allot(
            &mut self.routes,
            1 << width,
            b,
            Some(&prev),
            covering.as_ref(),
        );
        Some(prev)
    }

    /// The longest match within this stride for the host address `bits`:
    /// whatever the allotment left in the fringe slot.
    pub(crate) fn lookup_at(
        &self,
        width: u8,
        bits: u32,
    ) -> Option<&Arc<RouteRecord<AF, M>>> {
        self.routes[fringe_index(width, bits)].as_ref()
    }

    pub(crate) fn child(&self, bits: u32) -> Option<&StrideNode<AF, M>> {
        self.children.get(bits as usize)?.as_deref()
    }

    /// The child node for the fringe slot of `bits`, allocated on first
    /// use with the next level's stride width.
    pub(crate) fn child_or_insert(
        &mut self,
        bits: u32,
        width: u8,
        has_children: bool,
    ) -> &mut StrideNode<AF, M> {
        if self.children[bits as usize].is_none() {
            trace!("create {}-bit stride node", width);
            self.ref_count += 1;
        }
        self.children[bits as usize]
            .get_or_insert_with(|| Box::new(StrideNode::new(width, has_children)))
    }
}

//------------ Tests --------------------------------------------------------

// The single-level tests below replay the allotment figures from the ART
// paper on a 4-bit stride, checking the full array after every step.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::af::IPv4;
    use crate::types::route::NoMeta;

    fn r4(addr: u8, len: u8) -> Arc<RouteRecord<IPv4, NoMeta>> {
        Arc::new(RouteRecord::new(
            (addr as u32) << 28,
            len,
            NoMeta::Empty,
        ))
    }

    fn assert_slots(
        node: &StrideNode<IPv4, NoMeta>,
        want: &[(usize, &Arc<RouteRecord<IPv4, NoMeta>>)],
    ) {
        for b in 1..32 {
            let want_route =
                want.iter().find(|(slot, _)| *slot == b).map(|(_, r)| &***r);
            assert_eq!(
                node.routes[b].as_deref(),
                want_route,
                "slot {}",
                b
            );
        }
    }

    #[test]
    fn insert_figures() {
        let mut node = StrideNode::<IPv4, NoMeta>::new(4, false);

        // 12/2 covers slot 7 and everything below it.
        let r1 = r4(12, 2);
        assert!(node.insert_at(4, 12, 2, r1.clone()));
        let mut want = vec![
            (7, &r1),
            (14, &r1),
            (15, &r1),
            (28, &r1),
            (29, &r1),
            (30, &r1),
            (31, &r1),
        ];
        assert_slots(&node, &want);

        // 14/3 shadows the right half of 12/2.
        let r2 = r4(14, 3);
        assert!(node.insert_at(4, 14, 3, r2.clone()));
        want.retain(|(b, _)| ![15, 30, 31].contains(b));
        want.extend([(15, &r2), (30, &r2), (31, &r2)]);
        assert_slots(&node, &want);

        // 8/1 covers the slots 12/2 left empty.
        let r3 = r4(8, 1);
        assert!(node.insert_at(4, 8, 1, r3.clone()));
        want.extend([
            (3, &r3),
            (6, &r3),
            (12, &r3),
            (13, &r3),
            (24, &r3),
            (25, &r3),
            (26, &r3),
            (27, &r3),
        ]);
        assert_slots(&node, &want);
    }

    fn figures_node() -> StrideNode<IPv4, NoMeta> {
        let mut node = StrideNode::new(4, false);
        assert!(node.insert_at(4, 12, 2, r4(12, 2)));
        assert!(node.insert_at(4, 14, 3, r4(14, 3)));
        assert!(node.insert_at(4, 8, 1, r4(8, 1)));
        node
    }

    #[test]
    fn duplicate_insert() {
        let mut node = figures_node();
        let before = node.clone();
        assert!(!node.insert_at(4, 12, 2, r4(12, 2)));
        assert_eq!(node, before);
    }

    #[test]
    fn lookup_figures() {
        let node = figures_node();
        for addr in 0..8 {
            assert_eq!(node.lookup_at(4, addr), None, "addr {}", addr);
        }
        let r1 = r4(12, 2);
        let r2 = r4(14, 3);
        let r3 = r4(8, 1);
        for (addr, want) in [
            (8, &r3),
            (9, &r3),
            (10, &r3),
            (11, &r3),
            (12, &r1),
            (13, &r1),
            (14, &r2),
            (15, &r2),
        ] {
            assert_eq!(
                node.lookup_at(4, addr).map(|r| &**r),
                Some(&**want),
                "addr {}",
                addr
            );
        }
    }

    #[test]
    fn delete_restores_previous_figure() {
        let mut node = figures_node();

        let deleted =
            node.delete_at(4, 8, 1, r4(8, 1).prefix_id()).map(|r| (*r).clone());
        assert_eq!(deleted, Some((*r4(8, 1)).clone()));

        // Back to the state with only 12/2 and 14/3 in it.
        let mut want = StrideNode::new(4, false);
        assert!(want.insert_at(4, 12, 2, r4(12, 2)));
        assert!(want.insert_at(4, 14, 3, r4(14, 3)));
        assert_eq!(node, want);
    }

    #[test]
    fn delete_absent() {
        let mut node = figures_node();
        let before = node.clone();

        // Nothing was ever seated at 0/1.
        assert_eq!(node.delete_at(4, 0, 1, r4(0, 1).prefix_id()), None);
        // Slot 8/2 is covered by 8/1, but 8/2 itself is not present.
        assert_eq!(node.delete_at(4, 8, 2, r4(8, 2).prefix_id()), None);
        assert_eq!(node, before);
    }
}
