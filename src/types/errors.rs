use std::fmt;

/// Possible errors returned when building a table. All of them point at an
/// invalid stride schedule; a schedule is checked once at construction and
/// is immutable afterwards, so none of these can occur later on.
#[derive(Debug, PartialEq, Eq)]
pub enum ArtStoreError {
    /// The schedule has more levels than the trie supports.
    StrideLevelsExceeded,
    /// A stride is zero bits wide, or wider than the 32 bits that fit one
    /// stride's address chunk.
    StrideWidthInvalid,
    /// A stride other than the last one is not a multiple of 8, so its
    /// address chunk would not start at a byte boundary.
    StrideUnaligned,
    /// The strides do not add up to the width of the address family.
    StrideSumMismatch,
}

impl std::error::Error for ArtStoreError {}

impl fmt::Display for ArtStoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ArtStoreError::StrideLevelsExceeded => {
                write!(f, "Error: The stride schedule has too many levels.")
            }
            ArtStoreError::StrideWidthInvalid => {
                write!(
                    f,
                    "Error: A stride must be between 1 and 32 bits wide."
                )
            }
            ArtStoreError::StrideUnaligned => {
                write!(
                    f,
                    "Error: All strides but the last must be a multiple \
                    of 8 bits."
                )
            }
            ArtStoreError::StrideSumMismatch => {
                write!(
                    f,
                    "Error: The strides must add up to the address-family \
                    width."
                )
            }
        }
    }
}
