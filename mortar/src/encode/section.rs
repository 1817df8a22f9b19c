//! File-level emission: header, object records, cross-reference table and
//! trailer.

use crate::{
    encode::TokenEncoder,
    error::{MtError, Result},
    pdf::{trailer::TRAILER, Bytes, Dictionary, IndirectObject, Reference, Trailer},
    writer::{Encoder, Writer},
};

/// `%PDF-V.V` plus the binary-marker comment that tells transport layers
/// this file is not plain text.
pub fn write_file_header(version: (u8, u8), writer: &mut dyn Writer) {
    log::trace!("write file header for version {}.{}", version.0, version.1);
    writer.write(format!("%PDF-{}.{}\n", version.0, version.1).as_bytes());
    writer.write(b"%\xA9\xCD\xC4\xD2\n");
}

/// One `N G obj ... endobj` record around an already serialized body.
pub fn write_object_record(reference: Reference, body: &[u8], writer: &mut dyn Writer) {
    writer.write(reference.number.to_string().as_bytes());
    writer.write(b" ");
    writer.write(reference.generation.to_string().as_bytes());
    writer.write(b" obj\n");
    writer.write(body);
    writer.write(b"\nendobj\n");
}

impl Encoder<IndirectObject> for TokenEncoder {
    fn write_to(o: &IndirectObject, writer: &mut dyn Writer) {
        let mut body = Vec::new();
        Self::write_to(&*o.object, &mut body);
        write_object_record(Reference::new(o.number, o.generation), &body, writer);
    }
}

/// Emit the cross-reference table and trailer for `offsets`.
///
/// `offsets` pairs every written object with the byte position of its
/// record. The object numbers must be `1..=len` with no gaps; a single
/// subsection starting at the head free entry describes them all.
pub fn write_xref(
    offsets: &[(Reference, usize)],
    catalog: Reference,
    info: Option<Reference>,
    writer: &mut dyn Writer,
) -> Result<()> {
    log::trace!("write xref table for {} objects", offsets.len());

    let mut entries: Vec<(Reference, usize)> = offsets.to_vec();
    entries.sort_unstable_by_key(|(r, _)| r.number);
    for (index, (r, _)) in entries.iter().enumerate() {
        if r.number as usize != index + 1 {
            return Err(MtError::NonContiguousObjects);
        }
    }

    writer.write(b"\n");
    let start_xref = writer.position();

    writer.write(b"xref\n");
    writer.write(format!("0 {}\n", entries.len() + 1).as_bytes());
    // head of the free list; 20 bytes like every record below
    writer.write(b"0000000000 65535 f \n");
    for (r, offset) in &entries {
        writer.write(format!("{:010} {:05} n \n", offset, r.generation).as_bytes());
    }

    writer.write(TRAILER);
    writer.write(b"\n");
    let trailer = Trailer {
        size: entries.len() + 1,
        root: catalog,
        encrypt: None,
        info,
        id: Some([file_identifier(), file_identifier()]),
    };
    TokenEncoder::write_to(&Dictionary::from(trailer), writer);
    writer.write(b"\n");

    writer.write(b"startxref\n");
    writer.write(start_xref.to_string().as_bytes());
    writer.write(b"\n%%EOF");

    Ok(())
}

fn file_identifier() -> Bytes {
    rand::random::<[u8; 16]>().to_vec().into()
}
