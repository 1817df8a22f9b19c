//! Merge pages from parsed PDF documents into a single output file.
//!
//! The input side of this crate is a [`pdf::Document`]: an object table a
//! parser has already decoded into tokens, with resolvable indirect
//! references. The output side is a deduplicating object writer that
//! serializes every copied object once, assigns fresh object numbers and
//! finishes the file with a classic cross-reference table.

use error::Result;
use merge::Merger;
use pdf::Document;

pub mod copy;
pub mod encode;
pub mod error;
pub mod merge;
pub mod pdf;
pub mod writer;

pub use error::MtError;

/// Merge every page of `documents`, in order, into one PDF byte stream.
///
/// Thin wrapper around [`merge::Merger`] for the common case; use the
/// merger directly to select pages per document or to target another sink.
pub fn merge<'a, I>(documents: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut merger = Merger::new();
    for document in documents {
        merger.append(document, None)?;
    }
    let mut out = Vec::new();
    merger.finish(&mut out)?;
    Ok(out)
}
