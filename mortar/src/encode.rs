//! Canonical byte emission for PDF tokens.
//!
//! Every atom (number, name, reference, boolean, null) is terminated by a
//! single ASCII space, which keeps token boundaries safe without tracking
//! context. Containers rely on the whitespace their elements emit and add
//! none of their own.

use crate::{
    pdf::{Array, Dictionary, Object},
    writer::{Encoder, Writer},
};

mod name;
pub mod section;
mod string;

const TRUE_OBJECT: &str = "true";
const FALSE_OBJECT: &str = "false";
const NULL_OBJECT: &str = "null";

pub(crate) fn is_delimiter(chr: u8) -> bool {
    matches!(chr, b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%')
}

pub(crate) fn is_regular(chr: u8) -> bool {
    (0x21..=0x7E).contains(&chr) && !is_delimiter(chr)
}

/// Deterministic encoder producing canonical PDF syntax.
pub struct TokenEncoder;

impl Encoder<Object> for TokenEncoder {
    fn write_to(obj: &Object, writer: &mut dyn Writer) {
        match obj {
            Object::Null => {
                writer.write(NULL_OBJECT.as_bytes());
                writer.write(b" ");
            }
            Object::Bool(true) => {
                writer.write(TRUE_OBJECT.as_bytes());
                writer.write(b" ");
            }
            Object::Bool(false) => {
                writer.write(FALSE_OBJECT.as_bytes());
                writer.write(b" ");
            }
            Object::Integer(i) => {
                writer.write(i.to_string().as_bytes());
                writer.write(b" ");
            }
            Object::Float(f) => {
                writer.write(f.to_string().as_bytes());
                writer.write(b" ");
            }
            Object::Name(n) => Self::write_to(n, writer),
            Object::String(s) => Self::write_to(s, writer),
            Object::HexString(bytes) => {
                writer.write(b"<");
                writer.write(hex::encode_upper(&bytes[..]).as_bytes());
                writer.write(b">");
            }
            Object::Array(a) => Self::write_to(a, writer),
            Object::Dictionary(d) => Self::write_to(d, writer),
            Object::Stream(s) => {
                Self::write_to(&s.dictionary, writer);
                writer.write(b"\nstream\n");
                writer.write(&s.data);
                writer.write(b"\nendstream");
            }
            Object::Comment(bytes) => {
                writer.write(b"%");
                writer.write(bytes);
                writer.write(b"\n");
            }
            Object::Reference(r) => {
                writer.write(r.number.to_string().as_bytes());
                writer.write(b" ");
                writer.write(r.generation.to_string().as_bytes());
                writer.write(b" R ");
            }
            Object::Indirect(wrapper) => Self::write_to(wrapper, writer),
        }
    }
}

impl Encoder<Array> for TokenEncoder {
    fn write_to(array: &Array, writer: &mut dyn Writer) {
        writer.write(b"[");
        for item in array.iter() {
            Self::write_to(item, writer);
        }
        writer.write(b"]");
    }
}

impl Encoder<Dictionary> for TokenEncoder {
    fn write_to(dict: &Dictionary, writer: &mut dyn Writer) {
        writer.write(b"<<");
        for (key, value) in dict.iter() {
            Self::write_to(key, writer);
            Self::write_to(value, writer);
        }
        writer.write(b">>");
    }
}
