//! Pre-order node array construction with forward-patched slots.

use witbridge_core::{Error, Result};

use crate::node::NodeIndex;

/// Collects nodes in pre-order.
///
/// A composite reserves its slot, emits its children, then fills the slot with the
/// child indices it collected. Every reserved slot must be filled before `finish`.
pub(crate) struct SlotBuilder<N> {
    slots: Vec<Option<N>>,
}

impl<N> SlotBuilder<N> {
    pub(crate) fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub(crate) fn reserve(&mut self) -> Result<NodeIndex> {
        let idx = NodeIndex::try_from(self.slots.len()).map_err(|_| {
            Error::InternalInconsistency("node array exceeds the index range".to_owned())
        })?;
        self.slots.push(None);
        Ok(idx)
    }

    pub(crate) fn fill(&mut self, idx: NodeIndex, node: N) -> Result<()> {
        let slot = usize::try_from(idx)
            .ok()
            .and_then(|i| self.slots.get_mut(i))
            .ok_or_else(|| {
                Error::InternalInconsistency(format!("slot {idx} was never reserved"))
            })?;
        if slot.is_some() {
            return Err(Error::InternalInconsistency(format!(
                "slot {idx} filled twice"
            )));
        }
        *slot = Some(node);
        Ok(())
    }

    /// Reserve and fill in one step, for leaves.
    pub(crate) fn push(&mut self, node: N) -> Result<NodeIndex> {
        let idx = self.reserve()?;
        self.fill(idx, node)?;
        Ok(idx)
    }

    pub(crate) fn finish(self) -> Result<Vec<N>> {
        self.slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| {
                slot.ok_or_else(|| {
                    Error::InternalInconsistency(format!("slot {i} reserved but never filled"))
                })
            })
            .collect()
    }
}

/// Deepest composite nesting accepted when decoding a node array.
pub(crate) const MAX_DEPTH: usize = 128;

/// Walks a decoded node array in the same pre-order `SlotBuilder` lays it out in.
///
/// Each child index must be the next unvisited slot, so every node is visited exactly
/// once and the array has a single valid reading.
pub(crate) struct Cursor {
    next: usize,
    len: usize,
    depth: usize,
}

impl Cursor {
    pub(crate) fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(Error::InternalInconsistency("empty node array".to_owned()));
        }
        Ok(Self {
            next: 1,
            len,
            depth: 0,
        })
    }

    /// Claim `child` of `parent` as the next slot in pre-order.
    pub(crate) fn child(&mut self, parent: NodeIndex, child: NodeIndex) -> Result<()> {
        let idx = check_child(parent, child, self.len)?;
        if idx != self.next {
            return Err(Error::InternalInconsistency(format!(
                "node {parent} refers to node {child}, expected node {}",
                self.next
            )));
        }
        self.next += 1;
        Ok(())
    }

    pub(crate) fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::InternalInconsistency(format!(
                "nesting deeper than {MAX_DEPTH} levels"
            )));
        }
        Ok(())
    }

    pub(crate) fn ascend(&mut self) {
        self.depth -= 1;
    }

    /// Every slot must have been reached from the root.
    pub(crate) fn finish(&self) -> Result<()> {
        if self.next != self.len {
            return Err(Error::InternalInconsistency(format!(
                "node {} is not reachable from the root",
                self.next
            )));
        }
        Ok(())
    }
}

/// Check that `child` is a forward reference from `parent` into an array of `len` nodes.
fn check_child(parent: NodeIndex, child: NodeIndex, len: usize) -> Result<usize> {
    if child <= parent {
        return Err(Error::InternalInconsistency(format!(
            "node {parent} refers back to node {child}"
        )));
    }
    let idx = usize::try_from(child).map_err(|_| {
        Error::InternalInconsistency(format!("negative node index {child}"))
    })?;
    if idx >= len {
        return Err(Error::InternalInconsistency(format!(
            "node index {child} out of range (len {len})"
        )));
    }
    Ok(idx)
}
