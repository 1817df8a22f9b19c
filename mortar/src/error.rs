use thiserror::Error;

use crate::pdf::Reference;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MtError>;

#[derive(Debug, Error)]
pub enum MtError {
    /// The source trailer carries an encryption dictionary. Encrypted
    /// documents cannot be copied object-by-object.
    #[error("source document is encrypted")]
    EncryptedSource,

    /// The merge produced no pages at all.
    #[error("no pages were selected from any source document")]
    NoPages,

    /// The catalog reference handed to the flush was never written.
    #[error("catalog object {0} is not among the written objects")]
    MissingCatalog(Reference),

    /// The object numbers do not form a contiguous range, so no single
    /// cross-reference subsection can describe them.
    #[error("object numbers are not contiguous")]
    NonContiguousObjects,

    /// A write claimed a reservation number that was never handed out, or
    /// that was already bound.
    #[error("object number {0} is not reserved")]
    NumberNotReserved(u32),

    /// Reserved object numbers were never bound to a body.
    #[error("unbound reservations remain at flush")]
    UnboundReservation,

    /// The copier received a top-level `N G obj` wrapper instead of a plain
    /// token.
    #[error("indirect object wrapper inside a token graph")]
    NestedIndirectObject,

    /// Resolving a reference produced another reference; the scanner is
    /// expected to collapse chains.
    #[error("reference {0} resolves to another reference")]
    ReferenceChain(Reference),

    /// A reference points at no object in the source document.
    #[error("reference {0} does not resolve")]
    UnresolvedReference(Reference),

    /// Reading back from the output sink returned fewer bytes than expected.
    #[error("short read from the output sink")]
    ShortRead,

    /// The document catalog has no usable `Pages` entry.
    #[error("catalog has no page tree")]
    MissingPages,

    /// A 1-based page number beyond the end of the page tree.
    #[error("page {0} is out of range")]
    PageOutOfRange(usize),

    /// The page tree is structurally broken.
    #[error("invalid page tree: {0}")]
    InvalidPageTree(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_number() {
        let err = MtError::NumberNotReserved(17);
        assert_eq!(err.to_string(), "object number 17 is not reserved");
    }

    #[test]
    fn display_dangling_reference() {
        let err = MtError::UnresolvedReference(Reference::new(4, 0));
        assert_eq!(err.to_string(), "reference 4 0 R does not resolve");
    }
}
