use std::ops::Deref;

/// A PDF text string token.
///
/// Holds decoded text. Whether the bytes on disk end up Latin-1 or UTF-16BE
/// is decided by the encoder from the characters present.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct MtString(String);

impl From<String> for MtString {
    fn from(s: String) -> Self {
        MtString(s)
    }
}

impl From<&str> for MtString {
    fn from(s: &str) -> Self {
        MtString(s.to_owned())
    }
}

impl Deref for MtString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Debug for MtString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MtString").field(&self.0).finish()
    }
}

impl std::fmt::Display for MtString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
