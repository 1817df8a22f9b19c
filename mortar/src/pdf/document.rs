use std::collections::HashMap;

pub use catalog::{Catalog, PageNode};

use crate::{
    error::{MtError, Result},
    pdf::{Dictionary, Object, Reference, Trailer},
};

pub mod catalog;

const K_TYPE: &[u8] = b"Type";

/// A parsed source document: the object table a scanner produced, plus the
/// trailer and the file version.
///
/// Parsing itself lives outside this crate; anything able to decode a PDF
/// into tokens can populate one of these.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub version: (u8, u8),
    pub objects: HashMap<Reference, Object>,
    pub trailer: Trailer,
}

impl Document {
    /// Look up the concrete token stored at `r`.
    ///
    /// A stored top-level wrapper is unwrapped to its payload. The result
    /// may itself be a reference token when the source contains a chain;
    /// callers that cannot accept chains check for that themselves.
    pub fn resolve(&self, r: &Reference) -> Result<&Object> {
        match self.objects.get(r) {
            Some(Object::Indirect(wrapper)) => Ok(&wrapper.object),
            Some(obj) => Ok(obj),
            None => Err(MtError::UnresolvedReference(*r)),
        }
    }

    /// True when the trailer carries an encryption dictionary.
    pub fn is_encrypted(&self) -> bool {
        self.trailer.encrypt.is_some()
    }

    /// Resolve the trailer's root reference into the document catalog.
    pub fn catalog(&self) -> Result<Catalog<'_>> {
        let dict = self
            .resolve(&self.trailer.root)?
            .dictionary()
            .ok_or(MtError::MissingPages)?;
        Catalog::new_with(self, dict)
    }
}

fn require_type(dict: &Dictionary, t: &[u8]) -> std::result::Result<(), ()> {
    if let Some(k) = dict.get(K_TYPE).and_then(Object::name) {
        if &k[..] != t {
            log::warn!("Wrong dictionary type `{}`", k);
            Err(())
        } else {
            Ok(())
        }
    } else {
        log::warn!("Missing dictionary type");
        Err(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::{IndirectObject, Name};

    fn empty_trailer(root: Reference) -> Trailer {
        Trailer {
            size: 0,
            root,
            encrypt: None,
            info: None,
            id: None,
        }
    }

    #[test]
    fn resolve_unwraps_top_level_objects() {
        let r = Reference::new(1, 0);
        let mut objects = HashMap::new();
        objects.insert(
            r,
            Object::Indirect(IndirectObject {
                number: 1,
                generation: 0,
                object: Box::new(Object::Integer(7)),
            }),
        );
        let doc = Document {
            version: (1, 4),
            objects,
            trailer: empty_trailer(r),
        };
        assert_eq!(doc.resolve(&r).unwrap(), &Object::Integer(7));
    }

    #[test]
    fn resolve_fails_on_dangling_reference() {
        let doc = Document {
            version: (1, 4),
            objects: HashMap::new(),
            trailer: empty_trailer(Reference::new(1, 0)),
        };
        let err = doc.resolve(&Reference::new(9, 0)).unwrap_err();
        assert!(matches!(err, MtError::UnresolvedReference(r) if r.number == 9));
    }

    #[test]
    fn encryption_is_detected() {
        let mut trailer = empty_trailer(Reference::new(1, 0));
        trailer.encrypt = Some(Dictionary::new());
        let doc = Document {
            version: (1, 4),
            objects: HashMap::new(),
            trailer,
        };
        assert!(doc.is_encrypted());
    }

    #[test]
    fn require_type_accepts_matching_name() {
        let mut dict = Dictionary::new();
        dict.insert(Name::from("Type"), Object::Name(Name::from("Pages")));
        assert!(require_type(&dict, b"Pages").is_ok());
        assert!(require_type(&dict, b"Page").is_err());
    }
}
