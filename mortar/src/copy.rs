//! Deep copy of token graphs across document boundaries.
//!
//! Every indirect reference reachable from the copied root is rewritten to
//! an output reference exactly once. Cycles are closed by reserving an
//! output number the second time a reference is seen on the recursion
//! stack, so acyclic paths never pay for a reservation and stay eligible
//! for deduplication.

use std::collections::HashMap;

use crate::{
    error::{MtError, Result},
    pdf::{Dictionary, Document, Object, Reference, Stream},
    writer::DedupWriter,
};

/// Translation state for one source document.
pub struct GraphCopier<'a> {
    source: &'a Document,
    /// Finalized source-to-output translations.
    translated: HashMap<Reference, Reference>,
}

/// References currently being materialized by one top-level copy. `None`
/// marks a reference whose body is still being built further up the stack.
type Pending = HashMap<Reference, Option<Reference>>;

impl<'a> GraphCopier<'a> {
    pub fn new(source: &'a Document) -> Self {
        Self {
            source,
            translated: HashMap::new(),
        }
    }

    /// Copy `token` into `writer`, rewriting every source reference.
    ///
    /// The returned token contains only output references; serializing it
    /// later cannot leak a source object number.
    pub fn copy(&mut self, writer: &mut DedupWriter, token: &Object) -> Result<Object> {
        let mut pending = Pending::new();
        self.copy_token(writer, &mut pending, token)
    }

    fn copy_token(
        &mut self,
        writer: &mut DedupWriter,
        pending: &mut Pending,
        token: &Object,
    ) -> Result<Object> {
        match token {
            Object::Array(a) => {
                let mut out = Vec::with_capacity(a.len());
                for item in a.iter() {
                    out.push(self.copy_token(writer, pending, item)?);
                }
                Ok(Object::from(out))
            }
            Object::Dictionary(d) => Ok(Object::Dictionary(
                self.copy_dictionary(writer, pending, d)?,
            )),
            Object::Stream(s) => Ok(Object::Stream(Stream {
                dictionary: self.copy_dictionary(writer, pending, &s.dictionary)?,
                data: s.data.clone(),
            })),
            Object::Reference(r) => Ok(Object::Reference(
                self.translate_reference(writer, pending, *r)?,
            )),
            Object::Indirect(_) => Err(MtError::NestedIndirectObject),
            scalar => Ok(scalar.clone()),
        }
    }

    fn copy_dictionary(
        &mut self,
        writer: &mut DedupWriter,
        pending: &mut Pending,
        dict: &Dictionary,
    ) -> Result<Dictionary> {
        let mut out = Dictionary::with_capacity(dict.len());
        for (key, value) in dict.iter() {
            out.insert(key.clone(), self.copy_token(writer, pending, value)?);
        }
        Ok(out)
    }

    fn translate_reference(
        &mut self,
        writer: &mut DedupWriter,
        pending: &mut Pending,
        reference: Reference,
    ) -> Result<Reference> {
        if let Some(done) = self.translated.get(&reference) {
            return Ok(*done);
        }

        match pending.get(&reference) {
            // second visit while the body is still being built above us:
            // mint the output number now so the cycle can close
            Some(None) => {
                let reserved = writer.reserve_reference();
                log::trace!("cycle through {}, reserved {}", reference, reserved);
                pending.insert(reference, Some(reserved));
                self.translated.insert(reference, reserved);
                return Ok(reserved);
            }
            Some(Some(reserved)) => return Ok(*reserved),
            None => {}
        }

        pending.insert(reference, None);

        let source = self.source;
        let target = source.resolve(&reference)?;
        if target.reference().is_some() {
            return Err(MtError::ReferenceChain(reference));
        }

        let copied = self.copy_token(writer, pending, target)?;

        let translated = match pending.get(&reference) {
            // a descendant closed a cycle through us; bind its number
            Some(Some(reserved)) => {
                let reserved = *reserved;
                writer.write_reserved(reserved.number, &copied)?;
                reserved
            }
            _ => writer.write_object(&copied),
        };
        self.translated.insert(reference, translated);
        Ok(translated)
    }
}
