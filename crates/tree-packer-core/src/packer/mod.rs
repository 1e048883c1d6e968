use crate::model::Rect;

pub mod tree;

/// A packer reserves room for rectangles on a fixed-size canvas.
///
/// Implementations must ensure no overlaps. Only the size of `rect` is used;
/// `pack` returns the reserved rectangle, or `None` when nothing fits.
pub trait Packer<K> {
    fn can_pack(&self, rect: &Rect) -> bool;
    fn pack(&mut self, key: K, rect: &Rect) -> Option<Rect>;
}
