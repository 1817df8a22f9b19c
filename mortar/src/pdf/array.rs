use std::ops::{Deref, DerefMut};

use super::Object;

/// An ordered sequence of tokens.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array(Vec<Object>);

impl Array {
    pub fn new() -> Self {
        Self(Vec::new())
    }
}

impl Deref for Array {
    type Target = Vec<Object>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Array {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Object>> for Array {
    fn from(objects: Vec<Object>) -> Self {
        Self(objects)
    }
}

impl FromIterator<Object> for Array {
    fn from_iter<I: IntoIterator<Item = Object>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
