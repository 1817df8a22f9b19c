use crate::{
    encode::TokenEncoder,
    pdf::MtString,
    writer::{Encoder, Writer},
};

/// Highest code unit that is still emitted as Latin-1. Anything above
/// forces the whole string into UTF-16BE.
const LATIN_1_LIMIT: u32 = 250;

impl Encoder<MtString> for TokenEncoder {
    fn write_to(s: &MtString, writer: &mut dyn Writer) {
        writer.write(b"(");
        if s.chars().any(|c| c as u32 > LATIN_1_LIMIT) {
            // UTF-16BE with a byte order mark; the escape scan is skipped
            // for this form.
            writer.write(&[0xFE, 0xFF]);
            for unit in s.encode_utf16() {
                writer.write(&unit.to_be_bytes());
            }
        } else {
            for c in s.chars() {
                let byte = c as u8;
                if matches!(byte, b'(' | b')' | b'\\') {
                    writer.write(b"\\");
                }
                writer.write(&[byte]);
            }
        }
        writer.write(b")");
    }
}
