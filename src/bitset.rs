//! Read-only visibility filter over base ids.
//!
//! A [`BitsetView`] marks base ids that must never be returned from a search
//! — typically soft-deleted or not-yet-visible documents. `empty()` is a fast
//! path meaning "nothing is excluded"; otherwise `test(id)` answers whether
//! `id` is excluded.

use roaring::RoaringBitmap;

/// A read-only deletion/visibility filter over base ids.
///
/// `BitsetView::pass_all()` excludes nothing. Otherwise, `test(id) == true`
/// means `id` must not appear in any emitted result.
#[derive(Debug, Clone, Default)]
pub struct BitsetView {
    excluded: Option<RoaringBitmap>,
}

impl BitsetView {
    /// A view that excludes nothing.
    pub fn pass_all() -> Self {
        Self { excluded: None }
    }

    /// Build a view from an explicit set of excluded ids.
    pub fn from_excluded_ids(ids: impl IntoIterator<Item = u32>) -> Self {
        let bitmap: RoaringBitmap = ids.into_iter().collect();
        if bitmap.is_empty() {
            Self::pass_all()
        } else {
            Self { excluded: Some(bitmap) }
        }
    }

    /// `true` iff this view excludes nothing, i.e. every id passes.
    pub fn empty(&self) -> bool {
        self.excluded.is_none()
    }

    /// `true` iff `id` is excluded and must not be emitted.
    pub fn test(&self, id: u32) -> bool {
        match &self.excluded {
            None => false,
            Some(bitmap) => bitmap.contains(id),
        }
    }

    /// Restrict this view to the id range `[offset, offset + len)`, shifting
    /// ids down to be local to that chunk. Mirrors how a segment-wide
    /// deletion bitset is sliced per chunk before being handed to the
    /// searcher.
    pub fn slice(&self, offset: u32, len: u32) -> BitsetView {
        match &self.excluded {
            None => BitsetView::pass_all(),
            Some(bitmap) => {
                let sliced: RoaringBitmap = bitmap
                    .range(offset..offset.saturating_add(len))
                    .map(|id| id - offset)
                    .collect();
                if sliced.is_empty() {
                    BitsetView::pass_all()
                } else {
                    BitsetView { excluded: Some(sliced) }
                }
            }
        }
    }
}
