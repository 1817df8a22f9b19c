//! Deduplicating, lazily flushed object writer.
//!
//! Object numbers are handed out the moment content is written or a
//! reservation is made, and never change afterwards. Bodies are kept in
//! memory and only lowered to the final byte stream at flush time, where
//! their offsets become ground truth for the cross-reference table.

use std::collections::{HashMap, HashSet};
use std::hash::{BuildHasherDefault, Hasher};

use indexmap::IndexMap;

use crate::{
    encode::{section, TokenEncoder},
    error::{MtError, Result},
    pdf::{Object, Reference},
    writer::{Encoder, Sink},
};

/// 32-bit FNV-1a. Deterministic over the body bytes; the map's equality
/// check covers the collision case.
#[derive(Debug)]
struct Fnv1a {
    state: u32,
}

const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

impl Default for Fnv1a {
    fn default() -> Self {
        Self {
            state: FNV_OFFSET_BASIS,
        }
    }
}

impl Hasher for Fnv1a {
    fn finish(&self) -> u64 {
        self.state as u64
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u32;
            self.state = self.state.wrapping_mul(FNV_PRIME);
        }
    }
}

type ContentMap = HashMap<Vec<u8>, Reference, BuildHasherDefault<Fnv1a>>;

/// Assigns output object numbers, interns serialized bodies by content and
/// writes the final file in one pass.
pub struct DedupWriter {
    next_number: u32,
    reserved: HashSet<u32>,
    /// Serialized body per object, in insertion order.
    bodies: IndexMap<Reference, Vec<u8>>,
    // TODO: key large stream bodies by a digest instead of the full bytes
    // once memory use on big merges becomes a problem
    by_content: ContentMap,
    scratch: Vec<u8>,
}

impl DedupWriter {
    pub fn new() -> Self {
        Self {
            next_number: 1,
            reserved: HashSet::new(),
            bodies: IndexMap::new(),
            by_content: ContentMap::default(),
            scratch: Vec::new(),
        }
    }

    /// Hand out the next object number for later binding.
    pub fn reserve_number(&mut self) -> u32 {
        let number = self.next_number;
        self.next_number += 1;
        self.reserved.insert(number);
        log::trace!("reserved object number {}", number);
        number
    }

    /// `reserve_number` wrapped as a generation-0 reference token.
    pub fn reserve_reference(&mut self) -> Reference {
        Reference::new(self.reserve_number(), 0)
    }

    /// Serialize `token` and store it, coalescing byte-identical bodies
    /// into the first object that produced them.
    pub fn write_object(&mut self, token: &Object) -> Reference {
        self.scratch.clear();
        TokenEncoder::write_to(token, &mut self.scratch);

        if let Some(existing) = self.by_content.get(&self.scratch[..]) {
            return *existing;
        }

        let number = self.next_number;
        self.next_number += 1;
        let reference = Reference::new(number, 0);
        self.bodies.insert(reference, self.scratch.clone());
        self.by_content.insert(self.scratch.clone(), reference);
        reference
    }

    /// Bind `token` to a previously reserved number.
    ///
    /// The body occupies its pre-assigned number even when identical bytes
    /// already exist; references captured before serialization must keep
    /// pointing at this number. The content index learns the body only if
    /// the bytes are new, so plain writes keep returning the first object.
    pub fn write_reserved(&mut self, number: u32, token: &Object) -> Result<Reference> {
        if !self.reserved.remove(&number) {
            return Err(MtError::NumberNotReserved(number));
        }

        self.scratch.clear();
        TokenEncoder::write_to(token, &mut self.scratch);

        let reference = Reference::new(number, 0);
        self.bodies.insert(reference, self.scratch.clone());
        self.by_content
            .entry(self.scratch.clone())
            .or_insert(reference);
        Ok(reference)
    }

    /// Number of stored bodies.
    pub fn object_count(&self) -> usize {
        self.bodies.len()
    }

    /// Serialized body of `reference`, if it was written.
    pub fn body(&self, reference: &Reference) -> Option<&[u8]> {
        self.bodies.get(reference).map(|b| &b[..])
    }

    /// Write header, every stored object and the cross-reference table to
    /// `sink`. Consumes the writer; its buffers are released on any exit.
    pub fn flush<S: Sink>(
        self,
        version: (u8, u8),
        catalog: Reference,
        info: Option<Reference>,
        sink: &mut S,
    ) -> Result<()> {
        if !self.reserved.is_empty() {
            return Err(MtError::UnboundReservation);
        }
        if !self.bodies.contains_key(&catalog) {
            return Err(MtError::MissingCatalog(catalog));
        }

        log::debug!("flush {} objects", self.bodies.len());
        section::write_file_header(version, sink);

        let mut offsets = Vec::with_capacity(self.bodies.len());
        for (reference, body) in &self.bodies {
            offsets.push((*reference, sink.position()));
            section::write_object_record(*reference, body, sink);
        }

        section::write_xref(&offsets, catalog, info, sink)
    }
}

impl Default for DedupWriter {
    fn default() -> Self {
        Self::new()
    }
}
