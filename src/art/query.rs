use crate::art::tree::ArtTree;
use crate::types::af::AddressFamily;
use crate::types::route::{Meta, RouteRecord};

//------------ Longest Matching Route ---------------------------------------

impl<AF, M> ArtTree<AF, M>
where
    AF: AddressFamily,
    M: Meta,
{
    /// The most specific route covering `addr`.
    ///
    /// Walks one fringe slot per stride. The walk carries the longest
    /// match seen so far: the root's default slot to begin with, then the
    /// fringe slot of every node it descends through. Whenever descending
    /// is impossible the answer is the current fringe slot, or failing
    /// that, the carried match.
    pub(crate) fn lookup(&self, addr: AF) -> Option<&RouteRecord<AF, M>> {
        let mut x = &self.root;
        let mut lmr = x.routes[1].as_ref();
        let mut covered = 0;

        for &stride in &self.strides {
            covered += stride;
            let bits = AF::get_stride_bits(addr, covered - stride, stride);
            match x.child(bits) {
                Some(child) => {
                    if let Some(route) = x.lookup_at(stride, bits) {
                        lmr = Some(route);
                    }
                    x = child;
                }
                None => {
                    return x
                        .lookup_at(stride, bits)
                        .or(lmr)
                        .map(|route| &**route)
                }
            }
        }
        // The last level never has children, so the loop always returns
        // out of its None arm.
        lmr.map(|route| &**route)
    }
}
