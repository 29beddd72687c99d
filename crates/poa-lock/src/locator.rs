//! # Cell Locator
//!
//! Finds the single cell of a transaction section whose reference hash (the
//! hash of its type script) equals a given value. Sections are probed index
//! by index until the source reports the end; the section length is never
//! needed up front.

use crate::domain::errors::{EncodingError, LockResult};
use crate::hashing::Hash;
use crate::ports::outbound::{Source, SysError, TransactionSource};
use std::iter::FusedIterator;
use tracing::debug;

/// Lazy scan over the reference hashes of one section.
pub struct CellHashes<'t, T: ?Sized> {
    tx: &'t T,
    source: Source,
    index: usize,
    done: bool,
}

impl<'t, T: TransactionSource + ?Sized> CellHashes<'t, T> {
    pub fn new(tx: &'t T, source: Source) -> Self {
        Self {
            tx,
            source,
            index: 0,
            done: false,
        }
    }
}

impl<T: TransactionSource + ?Sized> Iterator for CellHashes<'_, T> {
    type Item = Result<(usize, Option<Hash>), SysError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.tx.load_cell_type_hash(self.index, self.source) {
            Ok(hash) => {
                let index = self.index;
                self.index += 1;
                Some(Ok((index, hash)))
            }
            Err(SysError::IndexOutOfBound) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<T: TransactionSource + ?Sized> FusedIterator for CellHashes<'_, T> {}

/// Index of the unique cell in `source` matching `reference`.
///
/// `Ok(None)` when nothing matches; a second match aborts the scan.
pub fn locate_cell<T: TransactionSource + ?Sized>(
    tx: &T,
    reference: &Hash,
    source: Source,
) -> LockResult<Option<usize>> {
    let mut found = None;
    for entry in CellHashes::new(tx, source) {
        let (index, hash) = entry?;
        if hash.as_ref() != Some(reference) {
            continue;
        }
        if found.is_some() {
            debug!(%source, index, "ambiguous cell match");
            return Err(EncodingError::AmbiguousCell(source).into());
        }
        found = Some(index);
    }
    Ok(found)
}

/// Like [`locate_cell`], but a missing cell is an error.
pub fn require_cell<T: TransactionSource + ?Sized>(
    tx: &T,
    reference: &Hash,
    source: Source,
) -> LockResult<usize> {
    locate_cell(tx, reference, source)?.ok_or_else(|| {
        debug!(%source, "required cell not found");
        EncodingError::MissingCell(source).into()
    })
}
