//! Build two tiny in-memory documents, merge them and write the result.

use std::collections::HashMap;
use std::{fs::File, io::Write};

use mortar::pdf::{Bytes, Dictionary, Document, Name, Object, Reference, Stream, Trailer};

/// A one-page document whose content stream draws nothing but carries a
/// recognizable marker.
fn sample_doc(marker: &str) -> Document {
    let content_ref = Reference::new(1, 0);
    let page_ref = Reference::new(2, 0);
    let pages_ref = Reference::new(3, 0);
    let catalog_ref = Reference::new(4, 0);

    let data = format!("% {marker}\n").into_bytes();
    let mut content_dict = Dictionary::new();
    content_dict.insert(Name::from("Length"), Object::Integer(data.len() as i32));

    let mut page = Dictionary::new();
    page.insert(Name::from("Type"), Object::Name(Name::from("Page")));
    page.insert(Name::from("Parent"), Object::Reference(pages_ref));
    page.insert(
        Name::from("MediaBox"),
        Object::from(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ]),
    );
    page.insert(Name::from("Contents"), Object::Reference(content_ref));

    let mut pages = Dictionary::new();
    pages.insert(Name::from("Type"), Object::Name(Name::from("Pages")));
    pages.insert(
        Name::from("Kids"),
        Object::from(vec![Object::Reference(page_ref)]),
    );
    pages.insert(Name::from("Count"), Object::Integer(1));

    let mut catalog = Dictionary::new();
    catalog.insert(Name::from("Type"), Object::Name(Name::from("Catalog")));
    catalog.insert(Name::from("Pages"), Object::Reference(pages_ref));

    let mut objects = HashMap::new();
    objects.insert(
        content_ref,
        Object::Stream(Stream {
            dictionary: content_dict,
            data: Bytes::from(data),
        }),
    );
    objects.insert(page_ref, Object::Dictionary(page));
    objects.insert(pages_ref, Object::Dictionary(pages));
    objects.insert(catalog_ref, Object::Dictionary(catalog));

    Document {
        version: (1, 4),
        objects,
        trailer: Trailer {
            size: 5,
            root: catalog_ref,
            encrypt: None,
            info: None,
            id: None,
        },
    }
}

pub fn main() {
    env_logger::init();

    let first = sample_doc("first document");
    let second = sample_doc("second document");

    log::debug!("merge documents");
    let bytes = match mortar::merge([&first, &second]) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("Error while merging: {:?}", e);
            return;
        }
    };

    log::debug!("write to file");
    let mut buffer = File::create("merged.pdf").expect("Could not create out file");
    buffer.write_all(&bytes).expect("Could not write out file");
}
