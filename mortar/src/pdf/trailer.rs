use super::{Bytes, Dictionary, Object, Reference};

pub const TRAILER: &[u8] = b"trailer";
pub const K_SIZE: &[u8] = b"Size";
pub const K_ENCRYPT: &[u8] = b"Encrypt";
pub const K_ROOT: &[u8] = b"Root";
pub const K_INFO: &[u8] = b"Info";
pub const K_ID: &[u8] = b"ID";

/// Trailer of a PDF section.
///
/// On the input side only `root` and `encrypt` matter to the merger; on the
/// output side the flush builds one of these and lowers it to a dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct Trailer {
    /// Number of entries in the cross-reference table, the head free entry
    /// included.
    pub size: usize,

    /// Reference to the document catalog.
    pub root: Reference,

    /// Dictionary containing information for decryption. Sources carrying
    /// one are rejected; the output never has one.
    pub encrypt: Option<Dictionary>,

    /// Reference to the document information dictionary.
    pub info: Option<Reference>,

    /// Pair of file identifiers.
    pub id: Option<[Bytes; 2]>,
}

impl From<Trailer> for Dictionary {
    fn from(trailer: Trailer) -> Self {
        let mut dict = Dictionary::with_capacity(5);
        dict.insert(
            K_SIZE.into(),
            Object::Integer(trailer.size.try_into().unwrap_or(i32::MAX)),
        );

        dict.insert(K_ROOT.into(), Object::Reference(trailer.root));

        if let Some([id0, id1]) = trailer.id {
            dict.insert(
                K_ID.into(),
                Object::Array(vec![Object::HexString(id0), Object::HexString(id1)].into()),
            );
        }

        if let Some(info) = trailer.info {
            dict.insert(K_INFO.into(), Object::Reference(info));
        }

        if let Some(enc) = trailer.encrypt {
            dict.insert(K_ENCRYPT.into(), Object::Dictionary(enc));
        }

        dict
    }
}
