use indexmap::IndexMap;

use crate::{
    error::{MtError, Result},
    pdf::{document::require_type, Dictionary, Document, Name, Object},
};

const CATALOG: &[u8] = b"Catalog";
const PAGE: &[u8] = b"Page";
const PAGES: &[u8] = b"Pages";

const K_TYPE: &[u8] = b"Type";
const K_PAGES: &[u8] = b"Pages";
const K_KIDS: &[u8] = b"Kids";
const K_COUNT: &[u8] = b"Count";
const K_RESOURCES: &[u8] = b"Resources";

/// The document catalog: entry point into a source page tree.
#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    doc: &'a Document,
    pages: &'a Dictionary,
}

impl<'a> Catalog<'a> {
    pub(crate) fn new_with(doc: &'a Document, dict: &'a Dictionary) -> Result<Self> {
        let _ = require_type(dict, CATALOG);

        let pages = match dict.get(K_PAGES) {
            Some(Object::Dictionary(d)) => d,
            Some(Object::Reference(r)) => doc
                .resolve(r)?
                .dictionary()
                .ok_or(MtError::MissingPages)?,
            _ => return Err(MtError::MissingPages),
        };

        Ok(Self { doc, pages })
    }

    /// Number of page leaves, taken from the root `Count` entry.
    pub fn page_count(&self) -> Result<usize> {
        let count = match self.pages.get(K_COUNT) {
            Some(Object::Reference(r)) => self.doc.resolve(r)?.integer(),
            Some(obj) => obj.integer(),
            None => None,
        };
        count
            .and_then(|c| usize::try_from(c).ok())
            .ok_or(MtError::InvalidPageTree("page count is missing or negative"))
    }

    /// Walk the page tree to the `number`-th leaf (1-based).
    pub fn page_node(&self, number: usize) -> Result<PageNode<'a>> {
        if number == 0 {
            return Err(MtError::PageOutOfRange(number));
        }

        let mut remaining = number;
        let mut path = Vec::new();
        match find_leaf(self.doc, self.pages, &mut remaining, &mut path)? {
            Some(dict) => {
                // nearest ancestor first
                path.reverse();
                Ok(PageNode {
                    doc: self.doc,
                    dict,
                    ancestors: path,
                })
            }
            None => Err(MtError::PageOutOfRange(number)),
        }
    }
}

/// A page-tree leaf together with its ancestor chain (nearest parent
/// first).
#[derive(Debug, Clone)]
pub struct PageNode<'a> {
    doc: &'a Document,
    pub dict: &'a Dictionary,
    ancestors: Vec<&'a Dictionary>,
}

impl<'a> PageNode<'a> {
    pub fn ancestors(&self) -> &[&'a Dictionary] {
        &self.ancestors
    }

    /// Resources inherited from the ancestor chain, the nearest ancestor
    /// winning per name. The page's own `Resources` entry stays on the page
    /// and is not part of the result.
    pub fn inherited_resources(&self) -> Result<IndexMap<&'a Name, &'a Object>> {
        let mut merged = IndexMap::new();
        for ancestor in &self.ancestors {
            let resources = match ancestor.get(K_RESOURCES) {
                Some(Object::Dictionary(d)) => d,
                Some(Object::Reference(r)) => self
                    .doc
                    .resolve(r)?
                    .dictionary()
                    .ok_or(MtError::InvalidPageTree("resources entry is not a dictionary"))?,
                Some(_) => {
                    return Err(MtError::InvalidPageTree("resources entry is not a dictionary"))
                }
                None => continue,
            };
            for (name, value) in resources.iter() {
                merged.entry(name).or_insert(value);
            }
        }
        Ok(merged)
    }
}

fn is_leaf(dict: &Dictionary) -> bool {
    match dict.get(K_TYPE).and_then(Object::name) {
        Some(t) if &t[..] == PAGE => true,
        Some(t) if &t[..] == PAGES => false,
        _ => {
            // untyped nodes happen in the wild; treat anything without kids
            // as a page
            dict.get(K_KIDS).is_none()
        }
    }
}

fn find_leaf<'a>(
    doc: &'a Document,
    node: &'a Dictionary,
    remaining: &mut usize,
    path: &mut Vec<&'a Dictionary>,
) -> Result<Option<&'a Dictionary>> {
    let kids = match node.get(K_KIDS) {
        Some(Object::Array(a)) => a,
        Some(Object::Reference(r)) => doc
            .resolve(r)?
            .array()
            .ok_or(MtError::InvalidPageTree("kids entry is not an array"))?,
        Some(_) => return Err(MtError::InvalidPageTree("kids entry is not an array")),
        None => return Err(MtError::InvalidPageTree("pages node without kids")),
    };

    path.push(node);
    for kid in kids.iter() {
        let dict = match kid {
            Object::Reference(r) => doc
                .resolve(r)?
                .dictionary()
                .ok_or(MtError::InvalidPageTree("kid is not a dictionary"))?,
            Object::Dictionary(d) => d,
            _ => return Err(MtError::InvalidPageTree("kid is not a dictionary")),
        };

        if is_leaf(dict) {
            if *remaining == 1 {
                return Ok(Some(dict));
            }
            *remaining -= 1;
        } else if let Some(found) = find_leaf(doc, dict, remaining, path)? {
            return Ok(Some(found));
        }
    }
    path.pop();

    Ok(None)
}
