//! Block decoding with a cursor that survives block boundaries.
//!
//! Block records are not required to end on codeword boundaries. The
//! decoder therefore keeps its position in the tree between calls: when a
//! block runs out in the middle of a codeword, the walk resumes from the
//! same node on the next block.

use crate::tree::{HuffmanTree, Node, NodeId};
use oxihuff_core::{BitBuffer, HuffError, Result};

/// Stateful tree walker turning packed codewords back into bytes.
#[derive(Debug, Clone)]
pub struct BlockDecoder {
    tree: HuffmanTree,
    /// Current position; never rests on a leaf.
    cursor: NodeId,
    /// Bits consumed since the cursor last left the root.
    pending_bits: usize,
}

impl BlockDecoder {
    /// Create a decoder with its cursor at the root of `tree`.
    pub fn new(tree: HuffmanTree) -> Self {
        let cursor = tree.root();
        Self {
            tree,
            cursor,
            pending_bits: 0,
        }
    }

    /// The tree being walked.
    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    /// Consume the decoder and return its tree.
    pub fn into_tree(self) -> HuffmanTree {
        self.tree
    }

    /// Whether the cursor sits at the root (no partial codeword pending).
    pub fn is_at_root(&self) -> bool {
        self.cursor == self.tree.root()
    }

    /// Number of bits of the pending partial codeword.
    pub fn pending_bits(&self) -> usize {
        self.pending_bits
    }

    /// Move the cursor back to the root, discarding any partial codeword.
    pub fn reset(&mut self) {
        self.cursor = self.tree.root();
        self.pending_bits = 0;
    }

    /// Decode one block, returning only the bytes completed by this call.
    pub fn decode(&mut self, bits: &BitBuffer) -> Vec<u8> {
        let mut out = Vec::with_capacity(bits.len() / 4);
        self.decode_into(bits, &mut out);
        out
    }

    /// Decode one block, appending completed bytes to `out`.
    ///
    /// Bit 0 moves the cursor to the left child and bit 1 to the right.
    /// Reaching a leaf emits its symbol and returns the cursor to the root.
    /// If the bits run out mid-codeword the cursor stays where it is and
    /// nothing partial is emitted.
    pub fn decode_into(&mut self, bits: &BitBuffer, out: &mut Vec<u8>) {
        let root = self.tree.root();
        let mut cursor = self.cursor;
        let mut pending = self.pending_bits;

        for bit in bits {
            let Node::Internal { left, right } = self.tree.node(cursor) else {
                // The root is internal and leaves reset the cursor, so this
                // only guards against a hand-built degenerate tree.
                cursor = root;
                continue;
            };

            cursor = if bit { right } else { left };
            pending += 1;

            if let Node::Leaf { symbol } = self.tree.node(cursor) {
                out.push(symbol);
                cursor = root;
                pending = 0;
            }
        }

        self.cursor = cursor;
        self.pending_bits = pending;
    }

    /// Check that the stream ended on a codeword boundary.
    ///
    /// A well-formed stream always does; a partial codeword at the end means
    /// the final block was cut short, reported as a stream that is missing
    /// at least one more byte.
    pub fn finish(&self) -> Result<()> {
        if self.is_at_root() {
            Ok(())
        } else {
            Err(HuffError::truncated(1, 0))
        }
    }
}
