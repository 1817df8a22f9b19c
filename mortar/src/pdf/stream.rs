use super::{Bytes, Dictionary};

/// A stream token: a dictionary plus an opaque byte payload.
///
/// The payload is carried verbatim; filters are never applied or stripped.
/// The dictionary must already hold a `Length` entry matching the payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Stream {
    pub dictionary: Dictionary,
    pub data: Bytes,
}
