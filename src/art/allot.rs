use std::sync::Arc;

//------------ Base-index arithmetic ----------------------------------------

// An allotment array of stride width w embeds a binary tree of 2^(w+1)
// slots, heap-style: the children of slot b are 2b and 2b+1. Slot 1 is the
// stride-local default route, the upper half are the fringe slots, one per
// complete host address of the stride.

/// Maps a stride-local prefix `(bits, plen)` to its slot in the allotment
/// array of a stride of width `w`.
pub(crate) fn base_index(w: u8, bits: u32, plen: u8) -> usize {
    ((bits as usize) >> (w - plen)) | (1 << plen)
}

/// The slot of the complete host address `bits` within a stride of width
/// `w`. Fringe slots are the only ones that may carry a child node.
pub(crate) fn fringe_index(w: u8, bits: u32) -> usize {
    base_index(w, bits, w)
}

//------------ allot --------------------------------------------------------

// Route identity below is identity of the shared allocation: all copies of
// a route seated in one node are clones of one Arc, so a pointer comparison
// is both cheap and exact.
fn holds<M>(slot: &Option<Arc<M>>, route: Option<&Arc<M>>) -> bool {
    match (slot, route) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Allots `new` in place of `old`, starting at slot `b` and walking down
/// the embedded binary tree. Any slot that does not hold `old` is shadowed
/// by a more specific route and terminates that branch; fringe slots
/// (`b >= smallest_fringe_index`) have no children inside this stride.
///
/// Insert and delete both reduce to this one propagation: insert allots
/// the new route over whatever the base slot held, delete allots the
/// parent slot's route back over the removed one.
pub(crate) fn allot<M>(
    routes: &mut [Option<Arc<M>>],
    smallest_fringe_index: usize,
    b: usize,
    old: Option<&Arc<M>>,
    new: Option<&Arc<M>>,
) {
    if !holds(&routes[b], old) {
        return;
    }
    routes[b] = new.cloned();
    if b >= smallest_fringe_index {
        return;
    }
    let b = b << 1;
    allot(routes, smallest_fringe_index, b, old, new);
    allot(routes, smallest_fringe_index, b + 1, old, new);
}

//------------ Tests --------------------------------------------------------
