use std::ops::Deref;

use indexmap::IndexMap;

pub use self::{
    array::Array,
    document::{Catalog, Document, PageNode},
    indirect::{IndirectObject, Reference},
    name::Name,
    stream::Stream,
    string::MtString,
    trailer::Trailer,
};

pub mod array;
pub mod document;
pub mod indirect;
pub mod name;
pub mod stream;
pub mod string;
pub mod trailer;

/// A single PDF token.
///
/// This is the unit the whole crate operates on: source documents hold a
/// graph of these, the copier rewrites them, and the encoder lowers them to
/// bytes. `Indirect` is the `N G obj` wrapper a parser produces for
/// top-level objects; it never appears inside a token graph handed to the
/// copier.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Null,
    Bool(bool),
    Integer(i32),
    Float(f32),
    Name(Name),
    String(MtString),
    HexString(Bytes),
    Array(Array),
    Dictionary(Dictionary),
    Stream(Stream),
    Comment(Bytes),
    Reference(Reference),
    Indirect(IndirectObject),
}

impl Object {
    pub fn name(&self) -> Option<&Name> {
        if let Object::Name(n) = self {
            Some(n)
        } else {
            None
        }
    }

    pub fn dictionary(&self) -> Option<&Dictionary> {
        if let Object::Dictionary(d) = self {
            Some(d)
        } else {
            None
        }
    }

    pub fn array(&self) -> Option<&Array> {
        if let Object::Array(a) = self {
            Some(a)
        } else {
            None
        }
    }

    pub fn integer(&self) -> Option<i32> {
        if let Object::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn reference(&self) -> Option<&Reference> {
        if let Object::Reference(r) = self {
            Some(r)
        } else {
            None
        }
    }

}

impl From<bool> for Object {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Object {
    fn from(v: i32) -> Self {
        Self::Integer(v)
    }
}

impl From<f32> for Object {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<Name> for Object {
    fn from(n: Name) -> Self {
        Self::Name(n)
    }
}

impl From<MtString> for Object {
    fn from(s: MtString) -> Self {
        Self::String(s)
    }
}

impl From<Vec<Object>> for Object {
    fn from(a: Vec<Object>) -> Self {
        Self::Array(a.into())
    }
}

impl From<Array> for Object {
    fn from(a: Array) -> Self {
        Self::Array(a)
    }
}

impl From<Dictionary> for Object {
    fn from(d: Dictionary) -> Self {
        Self::Dictionary(d)
    }
}

impl From<Stream> for Object {
    fn from(s: Stream) -> Self {
        Self::Stream(s)
    }
}

impl From<Reference> for Object {
    fn from(r: Reference) -> Self {
        Self::Reference(r)
    }
}

/// Raw binary content (hex string bodies, stream payloads, comments).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Bytes(pub Vec<u8>);

impl std::fmt::Debug for Bytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Bytes").field(&hex::encode(&self.0[..])).finish()
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Self {
        Bytes(v)
    }
}

impl From<&[u8]> for Bytes {
    fn from(v: &[u8]) -> Self {
        Bytes(v.to_vec())
    }
}

impl Deref for Bytes {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::borrow::Borrow<[u8]> for Bytes {
    fn borrow(&self) -> &[u8] {
        &self.0[..]
    }
}

/// Dictionary token. Insertion order is part of the value: serialization
/// walks the entries in the order they were added, which keeps output byte
/// streams reproducible.
pub type Dictionary = IndexMap<Name, Object>;
