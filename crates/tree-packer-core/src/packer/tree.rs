//! Guillotine partition tree.
//!
//! The root covers the whole canvas. Inserting into a free leaf that is larger
//! than the request cuts it in two with one straight cut along the axis with
//! more slack: the first child matches the request on that axis, the second
//! takes the rest. Nodes are never merged, moved or removed.

use super::Packer;
use crate::model::Rect;

#[derive(Debug, Clone)]
pub enum Node<K> {
    /// Free (`occupant == None`) or holding exactly one item.
    Leaf { rect: Rect, occupant: Option<K> },
    /// Two children that tile `rect` exactly.
    Split { rect: Rect, children: Box<[Node<K>; 2]> },
}

impl<K> Node<K> {
    pub fn leaf(rect: Rect) -> Self {
        Node::Leaf {
            rect,
            occupant: None,
        }
    }

    pub fn rect(&self) -> Rect {
        match self {
            Node::Leaf { rect, .. } | Node::Split { rect, .. } => *rect,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    pub fn children(&self) -> Option<&[Node<K>; 2]> {
        match self {
            Node::Split { children, .. } => Some(&**children),
            Node::Leaf { .. } => None,
        }
    }

    pub fn occupant(&self) -> Option<&K> {
        match self {
            Node::Leaf { occupant, .. } => occupant.as_ref(),
            Node::Split { .. } => None,
        }
    }

    /// First-fit insert of a `w`x`h` footprint. Hands `key` back on failure so
    /// the caller can try the next subtree.
    fn insert(&mut self, key: K, w: u32, h: u32) -> Result<Rect, K> {
        match self {
            Node::Split { children, .. } => {
                let [first, second] = &mut **children;
                match first.insert(key, w, h) {
                    Ok(rect) => Ok(rect),
                    Err(key) => second.insert(key, w, h),
                }
            }
            Node::Leaf { rect, occupant } => {
                if occupant.is_some() || rect.w < w || rect.h < h {
                    return Err(key);
                }
                if rect.w == w && rect.h == h {
                    *occupant = Some(key);
                    return Ok(*rect);
                }
                let rect = *rect;
                let (a, b) = split(rect, w, h);
                let mut first = Node::leaf(a);
                // `a` matches the request on the cut axis, so this cannot fail.
                let placed = first.insert(key, w, h);
                *self = Node::Split {
                    rect,
                    children: Box::new([first, Node::leaf(b)]),
                };
                placed
            }
        }
    }

    fn fits(&self, w: u32, h: u32) -> bool {
        match self {
            Node::Split { children, .. } => children.iter().any(|c| c.fits(w, h)),
            Node::Leaf { rect, occupant } => occupant.is_none() && rect.w >= w && rect.h >= h,
        }
    }

    fn visit_leaves<'a>(&'a self, out: &mut Vec<(Rect, Option<&'a K>)>) {
        match self {
            Node::Split { children, .. } => {
                for child in children.iter() {
                    child.visit_leaves(out);
                }
            }
            Node::Leaf { rect, occupant } => out.push((*rect, occupant.as_ref())),
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Split { children, .. } => 1 + children[0].depth().max(children[1].depth()),
            Node::Leaf { .. } => 1,
        }
    }
}

/// Cuts `rect` for a `w`x`h` request. The axis with more leftover is cut;
/// ties cut horizontally (top/bottom).
fn split(rect: Rect, w: u32, h: u32) -> (Rect, Rect) {
    let dw = rect.w - w;
    let dh = rect.h - h;
    if dw > dh {
        (
            Rect::new(rect.x, rect.y, w, rect.h),
            Rect::new(rect.x + w, rect.y, rect.w - w, rect.h),
        )
    } else {
        (
            Rect::new(rect.x, rect.y, rect.w, h),
            Rect::new(rect.x, rect.y + h, rect.w, rect.h - h),
        )
    }
}

/// Partition tree over one canvas. Lives for a single packing run.
#[derive(Debug, Clone)]
pub struct PartitionTree<K> {
    root: Node<K>,
}

impl<K> PartitionTree<K> {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            root: Node::leaf(Rect::new(0, 0, width, height)),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.root.rect()
    }

    pub fn root(&self) -> &Node<K> {
        &self.root
    }

    /// Reserves a `w`x`h` region for `key`, returning the occupied leaf's rect.
    pub fn insert(&mut self, key: K, w: u32, h: u32) -> Option<Rect> {
        self.root.insert(key, w, h).ok()
    }

    /// True if some free leaf could take a `w`x`h` footprint.
    pub fn fits(&self, w: u32, h: u32) -> bool {
        self.root.fits(w, h)
    }

    /// All leaves in depth-first order (first child before second).
    pub fn leaves(&self) -> Vec<(Rect, Option<&K>)> {
        let mut out = Vec::new();
        self.root.visit_leaves(&mut out);
        out
    }

    pub fn occupied(&self) -> Vec<(Rect, &K)> {
        self.leaves()
            .into_iter()
            .filter_map(|(rect, key)| key.map(|k| (rect, k)))
            .collect()
    }

    /// Total area of occupied leaves.
    pub fn used_area(&self) -> u64 {
        self.occupied().iter().map(|(r, _)| r.area()).sum()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

impl<K> Packer<K> for PartitionTree<K> {
    fn can_pack(&self, rect: &Rect) -> bool {
        self.fits(rect.w, rect.h)
    }

    fn pack(&mut self, key: K, rect: &Rect) -> Option<Rect> {
        self.insert(key, rect.w, rect.h)
    }
}
