//! Page-tree assembly: walks selected pages of each source document,
//! copies them into the output writer and groups them under synthetic
//! intermediate page-tree nodes.

use crate::{
    copy::GraphCopier,
    error::{MtError, Result},
    pdf::{Dictionary, Document, Object, Reference},
    writer::{DedupWriter, Sink},
};

/// Fan-out cap: a synthetic intermediate node holds at most this many
/// pages.
pub const PAGES_PER_NODE: usize = 100;

/// Lowest version ever announced by the output.
const DEFAULT_VERSION: (u8, u8) = (1, 2);

const CATALOG: &[u8] = b"Catalog";
const PAGES: &[u8] = b"Pages";

const K_TYPE: &[u8] = b"Type";
const K_PAGES: &[u8] = b"Pages";
const K_KIDS: &[u8] = b"Kids";
const K_COUNT: &[u8] = b"Count";
const K_PARENT: &[u8] = b"Parent";
const K_RESOURCES: &[u8] = b"Resources";

/// A page group being filled: the pages copied so far, the resources their
/// ancestors contributed and the reserved reference of the intermediate
/// node that will own them.
struct Group {
    parent: Reference,
    kids: Vec<Reference>,
    resources: Dictionary,
}

impl Group {
    fn open(writer: &mut DedupWriter) -> Self {
        Self {
            parent: writer.reserve_reference(),
            kids: Vec::new(),
            resources: Dictionary::new(),
        }
    }
}

/// Builds one output document from the pages of many sources.
///
/// The writer lives for the whole merge; copier state is scoped per source
/// document. Pages of different documents never share an intermediate
/// node.
pub struct Merger {
    writer: DedupWriter,
    root: Reference,
    groups: Vec<Reference>,
    page_count: usize,
    version: (u8, u8),
}

impl Merger {
    pub fn new() -> Self {
        let mut writer = DedupWriter::new();
        // the root pages node takes the first reservation and is bound last
        let root = writer.reserve_reference();
        Self {
            writer,
            root,
            groups: Vec::new(),
            page_count: 0,
            version: DEFAULT_VERSION,
        }
    }

    /// Pages appended so far.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Copy the selected pages of `doc` into the output.
    ///
    /// `selection` lists 1-based page numbers in the order they should
    /// appear; `None` takes every page. A new group is started whenever the
    /// current one is full or an inherited resource name is already taken
    /// in it, and the open group is closed when the document ends.
    pub fn append(&mut self, doc: &Document, selection: Option<&[usize]>) -> Result<()> {
        if doc.is_encrypted() {
            return Err(MtError::EncryptedSource);
        }

        self.version = self.version.max(doc.version);

        let catalog = doc.catalog()?;
        let numbers: Vec<usize> = match selection {
            Some(numbers) => numbers.to_vec(),
            None => (1..=catalog.page_count()?).collect(),
        };
        log::debug!("append {} pages", numbers.len());

        let mut copier = GraphCopier::new(doc);
        let mut group: Option<Group> = None;

        for number in numbers {
            let node = catalog.page_node(number)?;
            let inherited = node.inherited_resources()?;

            let needs_split = group.as_ref().is_some_and(|open| {
                open.kids.len() >= PAGES_PER_NODE
                    || inherited
                        .keys()
                        .any(|name| open.resources.contains_key(&name[..]))
            });
            if needs_split {
                if let Some(open) = group.take() {
                    self.close_group(open)?;
                }
            }
            let open = group.get_or_insert_with(|| Group::open(&mut self.writer));

            for (name, value) in inherited {
                if !open.resources.contains_key(&name[..]) {
                    let copied = copier.copy(&mut self.writer, value)?;
                    open.resources.insert(name.clone(), copied);
                }
            }

            let mut page = Dictionary::with_capacity(node.dict.len() + 1);
            let mut had_parent = false;
            for (key, value) in node.dict.iter() {
                if &key[..] == K_PARENT {
                    had_parent = true;
                    page.insert(key.clone(), Object::Reference(open.parent));
                } else {
                    page.insert(key.clone(), copier.copy(&mut self.writer, value)?);
                }
            }
            if !had_parent {
                page.insert(K_PARENT.into(), Object::Reference(open.parent));
            }

            let page_ref = self.writer.write_object(&Object::Dictionary(page));
            open.kids.push(page_ref);
        }

        if let Some(open) = group.take() {
            self.close_group(open)?;
        }
        Ok(())
    }

    /// Bind the intermediate node for a finished group.
    fn close_group(&mut self, group: Group) -> Result<()> {
        let pages = group.kids.len();
        log::debug!("close group {} with {} pages", group.parent, pages);

        let mut dict = Dictionary::with_capacity(5);
        dict.insert(K_TYPE.into(), Object::Name(PAGES.into()));
        dict.insert(
            K_KIDS.into(),
            Object::Array(group.kids.into_iter().map(Object::Reference).collect()),
        );
        dict.insert(K_COUNT.into(), Object::Integer(pages as i32));
        dict.insert(K_PARENT.into(), Object::Reference(self.root));
        if !group.resources.is_empty() {
            dict.insert(K_RESOURCES.into(), Object::Dictionary(group.resources));
        }

        let bound = self
            .writer
            .write_reserved(group.parent.number, &Object::Dictionary(dict))?;
        self.groups.push(bound);
        self.page_count += pages;
        Ok(())
    }

    /// Bind the root pages node, write the catalog and flush the file.
    pub fn finish<S: Sink>(mut self, sink: &mut S) -> Result<()> {
        if self.groups.is_empty() {
            return Err(MtError::NoPages);
        }

        let mut root = Dictionary::with_capacity(3);
        root.insert(K_TYPE.into(), Object::Name(PAGES.into()));
        root.insert(
            K_KIDS.into(),
            Object::Array(self.groups.iter().copied().map(Object::Reference).collect()),
        );
        root.insert(K_COUNT.into(), Object::Integer(self.page_count as i32));
        self.writer
            .write_reserved(self.root.number, &Object::Dictionary(root))?;

        let mut catalog = Dictionary::with_capacity(2);
        catalog.insert(K_TYPE.into(), Object::Name(CATALOG.into()));
        catalog.insert(K_PAGES.into(), Object::Reference(self.root));
        let catalog_ref = self.writer.write_object(&Object::Dictionary(catalog));

        self.writer.flush(self.version, catalog_ref, None, sink)
    }
}

impl Default for Merger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::pdf::{Name, Trailer};

    fn dict(entries: Vec<(&str, Object)>) -> Dictionary {
        entries
            .into_iter()
            .map(|(k, v)| (Name::from(k), v))
            .collect()
    }

    fn media_box() -> Object {
        Object::from(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ])
    }

    struct DocBuilder {
        objects: HashMap<Reference, Object>,
        next: u32,
        version: (u8, u8),
    }

    impl DocBuilder {
        fn new() -> Self {
            Self {
                objects: HashMap::new(),
                next: 1,
                version: (1, 4),
            }
        }

        fn add(&mut self, obj: Object) -> Reference {
            let r = Reference::new(self.next, 0);
            self.next += 1;
            self.objects.insert(r, obj);
            r
        }

        /// Catalog plus a flat pages root over `kids`.
        fn finish(mut self, kids: Vec<Reference>, root_extra: Vec<(&str, Object)>) -> Document {
            let count = kids.len() as i32;
            let mut root_dict = dict(vec![
                ("Type", Object::Name(Name::from("Pages"))),
                (
                    "Kids",
                    Object::Array(kids.into_iter().map(Object::Reference).collect()),
                ),
                ("Count", Object::Integer(count)),
            ]);
            for (k, v) in root_extra {
                root_dict.insert(Name::from(k), v);
            }
            let root = self.add(Object::Dictionary(root_dict));
            let catalog = self.add(Object::Dictionary(dict(vec![
                ("Type", Object::Name(Name::from("Catalog"))),
                ("Pages", Object::Reference(root)),
            ])));
            Document {
                version: self.version,
                objects: self.objects,
                trailer: Trailer {
                    size: self.next as usize,
                    root: catalog,
                    encrypt: None,
                    info: None,
                    id: None,
                },
            }
        }
    }

    /// `pages` MediaBox-only pages under one flat root.
    fn simple_doc(pages: usize) -> Document {
        let mut builder = DocBuilder::new();
        let kids = (0..pages)
            .map(|_| {
                builder.add(Object::Dictionary(dict(vec![
                    ("Type", Object::Name(Name::from("Page"))),
                    ("MediaBox", media_box()),
                ])))
            })
            .collect();
        builder.finish(kids, vec![])
    }

    fn merged(docs: &[Document]) -> String {
        let mut merger = Merger::new();
        for doc in docs {
            merger.append(doc, None).unwrap();
        }
        let mut out = Vec::new();
        merger.finish(&mut out).unwrap();
        String::from_utf8_lossy(&out).into_owned()
    }

    fn count_matches(haystack: &str, needle: &str) -> usize {
        haystack.match_indices(needle).count()
    }

    #[test]
    fn two_single_page_documents() {
        let out = merged(&[simple_doc(1), simple_doc(1)]);

        // catalog, root pages, one intermediate node and one leaf per
        // document
        assert_eq!(count_matches(&out, " 0 obj\n"), 6);
        assert_eq!(count_matches(&out, "/Type /Pages "), 3);
        assert_eq!(count_matches(&out, "/Type /Catalog "), 1);

        // the identical pages stay distinct because their parents differ
        assert_eq!(count_matches(&out, "/MediaBox "), 2);
        assert_eq!(count_matches(&out, "/Parent 2 0 R "), 1);
        assert_eq!(count_matches(&out, "/Parent 4 0 R "), 1);
    }

    #[test]
    fn fan_out_cap_splits_every_hundred_pages() {
        let out = merged(&[simple_doc(250)]);

        // three intermediate nodes plus the root
        assert_eq!(count_matches(&out, "/Type /Pages "), 4);
        assert_eq!(count_matches(&out, "/Count 100 "), 2);
        assert_eq!(count_matches(&out, "/Count 50 "), 1);
        assert_eq!(count_matches(&out, "/Count 250 "), 1);
    }

    #[test]
    fn page_count_sums_over_documents() {
        let mut merger = Merger::new();
        merger.append(&simple_doc(2), None).unwrap();
        merger.append(&simple_doc(3), None).unwrap();
        assert_eq!(merger.page_count(), 5);

        let mut out = Vec::new();
        merger.finish(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(count_matches(&text, "/Count 5 "), 1);
    }

    /// Two inner pages nodes carrying `/Font` resources with different
    /// values; grouping both pages would lose one of them.
    fn colliding_font_doc() -> Document {
        let mut builder = DocBuilder::new();
        let page_a = builder.add(Object::Dictionary(dict(vec![(
            "Type",
            Object::Name(Name::from("Page")),
        )])));
        let page_b = builder.add(Object::Dictionary(dict(vec![(
            "Type",
            Object::Name(Name::from("Page")),
        )])));
        let inner_a = builder.add(Object::Dictionary(dict(vec![
            ("Type", Object::Name(Name::from("Pages"))),
            ("Kids", Object::from(vec![Object::Reference(page_a)])),
            ("Count", Object::Integer(1)),
            (
                "Resources",
                Object::Dictionary(dict(vec![(
                    "Font",
                    Object::Dictionary(dict(vec![("F1", Object::Null)])),
                )])),
            ),
        ])));
        let inner_b = builder.add(Object::Dictionary(dict(vec![
            ("Type", Object::Name(Name::from("Pages"))),
            ("Kids", Object::from(vec![Object::Reference(page_b)])),
            ("Count", Object::Integer(1)),
            (
                "Resources",
                Object::Dictionary(dict(vec![(
                    "Font",
                    Object::Dictionary(dict(vec![("F2", Object::Null)])),
                )])),
            ),
        ])));
        builder.finish(vec![inner_a, inner_b], vec![])
    }

    #[test]
    fn resource_name_collision_starts_a_new_group() {
        let out = merged(&[colliding_font_doc()]);

        // two groups plus the root; both font sets survive
        assert_eq!(count_matches(&out, "/Type /Pages "), 3);
        assert_eq!(count_matches(&out, "/F1 "), 1);
        assert_eq!(count_matches(&out, "/F2 "), 1);
        assert_eq!(count_matches(&out, "/Resources "), 2);
    }

    #[test]
    fn identical_inherited_names_also_split() {
        // both pages inherit Font from the same root; the name check does
        // not look at values
        let mut builder = DocBuilder::new();
        let kids = (0..2)
            .map(|_| {
                builder.add(Object::Dictionary(dict(vec![(
                    "Type",
                    Object::Name(Name::from("Page")),
                )])))
            })
            .collect();
        let doc = builder.finish(
            kids,
            vec![(
                "Resources",
                Object::Dictionary(dict(vec![("Font", Object::Null)])),
            )],
        );
        let out = merged(&[doc]);
        assert_eq!(count_matches(&out, "/Type /Pages "), 3);
    }

    #[test]
    fn shared_indirect_objects_are_written_once() {
        let mut builder = DocBuilder::new();
        let font = builder.add(Object::Dictionary(dict(vec![
            ("Type", Object::Name(Name::from("Font"))),
            ("BaseFont", Object::Name(Name::from("Helvetica"))),
        ])));
        let kids = (0..2)
            .map(|_| {
                builder.add(Object::Dictionary(dict(vec![
                    ("Type", Object::Name(Name::from("Page"))),
                    (
                        "Resources",
                        Object::Dictionary(dict(vec![(
                            "Font",
                            Object::Dictionary(dict(vec![("F1", Object::Reference(font))])),
                        )])),
                    ),
                ])))
            })
            .collect();
        let doc = builder.finish(kids, vec![]);

        let out = merged(&[doc]);
        assert_eq!(count_matches(&out, "/BaseFont "), 1);
    }

    #[test]
    fn page_selection_is_honored() {
        let mut builder = DocBuilder::new();
        let kids = (0..3)
            .map(|i| {
                builder.add(Object::Dictionary(dict(vec![
                    ("Type", Object::Name(Name::from("Page"))),
                    ("Marker", Object::Integer(i + 1)),
                ])))
            })
            .collect();
        let doc = builder.finish(kids, vec![]);

        let mut merger = Merger::new();
        merger.append(&doc, Some(&[3, 1])).unwrap();
        assert_eq!(merger.page_count(), 2);

        let mut out = Vec::new();
        merger.finish(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(count_matches(&text, "/Marker 3 "), 1);
        assert_eq!(count_matches(&text, "/Marker 1 "), 1);
        assert_eq!(count_matches(&text, "/Marker 2 "), 0);
    }

    #[test]
    fn source_parent_entries_are_replaced_in_place() {
        let mut builder = DocBuilder::new();
        let page = builder.add(Object::Dictionary(dict(vec![
            ("Type", Object::Name(Name::from("Page"))),
            // stale reference into the source document
            ("Parent", Object::Reference(Reference::new(90, 0))),
            ("MediaBox", media_box()),
        ])));
        let doc = builder.finish(vec![page], vec![]);

        let out = merged(&[doc]);
        assert_eq!(count_matches(&out, "/Parent "), 2); // page + group node
        assert_eq!(count_matches(&out, "90 0 R "), 0);
        assert!(out.contains("/Parent 2 0 R /MediaBox "));
    }

    #[test]
    fn no_pages_is_an_error() {
        let merger = Merger::new();
        let mut out = Vec::new();
        assert!(matches!(merger.finish(&mut out), Err(MtError::NoPages)));
    }

    #[test]
    fn a_document_without_selected_pages_leaves_no_reservation_behind() {
        let mut merger = Merger::new();
        merger.append(&simple_doc(2), None).unwrap();
        merger.append(&simple_doc(3), Some(&[])).unwrap();

        let mut out = Vec::new();
        merger.finish(&mut out).unwrap();
        assert!(String::from_utf8_lossy(&out).contains("/Count 2 "));
    }

    #[test]
    fn encrypted_sources_are_rejected() {
        let mut doc = simple_doc(1);
        doc.trailer.encrypt = Some(Dictionary::new());
        let mut merger = Merger::new();
        assert!(matches!(
            merger.append(&doc, None),
            Err(MtError::EncryptedSource)
        ));
    }

    #[test]
    fn version_is_the_maximum_with_a_floor() {
        let mut old = simple_doc(1);
        old.version = (1, 0);
        let out = merged(&[old]);
        assert!(out.starts_with("%PDF-1.2\n"));

        let mut new = simple_doc(1);
        new.version = (1, 7);
        let out = merged(&[simple_doc(1), new]);
        assert!(out.starts_with("%PDF-1.7\n"));
    }

    #[test]
    fn output_ends_after_eof() {
        let out = merged(&[simple_doc(1)]);
        assert!(out.ends_with("%%EOF"));
        assert!(out.contains("startxref\n"));
    }
}
