use std::fmt;

use inetnum::addr::Prefix;

use crate::types::af::AddressFamily;

//------------ Meta (trait) -------------------------------------------------

/// Trait for types that can be used as the metadata of a route.
///
/// Metadata takes part in route equality: two routes are the same route
/// only if both their prefix and their metadata compare equal.
pub trait Meta: fmt::Debug + fmt::Display + Clone + PartialEq {}

impl<T> Meta for T where T: fmt::Debug + fmt::Display + Clone + PartialEq {}

//------------ PrefixId -----------------------------------------------------

/// The bare identity of a prefix inside one address family.
#[derive(Hash, Eq, PartialEq, Debug, Copy, Clone)]
pub struct PrefixId<AF: AddressFamily> {
    net: AF,
    len: u8,
}

impl<AF: AddressFamily> PrefixId<AF> {
    pub fn new(net: AF, len: u8) -> Self {
        PrefixId { net, len }
    }

    pub fn get_net(&self) -> AF {
        self.net
    }

    pub fn get_len(&self) -> u8 {
        self.len
    }
}

impl<AF: AddressFamily> From<Prefix> for PrefixId<AF> {
    fn from(prefix: Prefix) -> Self {
        PrefixId {
            net: AF::from_ipaddr(prefix.addr()),
            len: prefix.len(),
        }
    }
}

impl<AF: AddressFamily> From<PrefixId<AF>> for Prefix {
    fn from(id: PrefixId<AF>) -> Self {
        Prefix::new(id.net.into_ipaddr(), id.len)
            .unwrap_or_else(|p| panic!("can't convert {:?} into a prefix", p))
    }
}

//------------ RouteRecord --------------------------------------------------

/// A routing table entry: a prefix in its family-sized representation,
/// together with the caller's metadata.
#[derive(Clone, PartialEq)]
pub struct RouteRecord<AF, M>
where
    AF: AddressFamily,
    M: Meta,
{
    pub net: AF,
    pub len: u8,
    pub meta: M,
}

impl<AF, M> RouteRecord<AF, M>
where
    AF: AddressFamily,
    M: Meta,
{
    pub fn new(net: AF, len: u8, meta: M) -> Self {
        Self { net, len, meta }
    }

    pub fn new_from_prefix(prefix: &Prefix, meta: M) -> Self {
        Self {
            net: AF::from_ipaddr(prefix.addr()),
            len: prefix.len(),
            meta,
        }
    }

    // This should never fail, since an invalid prefix can't have ended up
    // in this record in the first place.
    pub fn prefix(&self) -> Prefix {
        Prefix::new(self.net.into_ipaddr(), self.len)
            .unwrap_or_else(|p| panic!("can't convert {:?} into a prefix", p))
    }

    pub fn prefix_id(&self) -> PrefixId<AF> {
        PrefixId::new(self.net, self.len)
    }

    pub fn get_meta(&self) -> &M {
        &self.meta
    }
}

impl<AF, M> fmt::Display for RouteRecord<AF, M>
where
    AF: AddressFamily,
    M: Meta,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} {}",
            AddressFamily::fmt_net(self.net),
            self.len,
            self.meta
        )
    }
}

impl<AF, M> fmt::Debug for RouteRecord<AF, M>
where
    AF: AddressFamily,
    M: Meta,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "{}/{} with {:?}",
            AddressFamily::fmt_net(self.net),
            self.len,
            self.meta
        ))
    }
}

//------------ Metadata Types -----------------------------------------------

/// Example metadata: the originating AS of a prefix.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PrefixAs(pub u32);

impl fmt::Display for PrefixAs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AS{}", self.0)
    }
}

/// Metadata for tables that only care about the prefixes themselves.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum NoMeta {
    Empty,
}

impl fmt::Debug for NoMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("")
    }
}

impl fmt::Display for NoMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("")
    }
}
