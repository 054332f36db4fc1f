//! Huffman tree over the byte alphabet.
//!
//! Nodes live in an arena owned by the tree and refer to each other through
//! [`NodeId`] indices. Dropping the tree releases every node at once, and a
//! decoder can hold a `NodeId` as its cursor without owning anything.
//!
//! # Construction
//!
//! [`HuffmanTree::build`] uses the two-queue method: present symbols are
//! sorted once by frequency, and every merge appends to a second queue whose
//! totals are nondecreasing by construction. Each step takes the cheapest of
//! leaf+leaf, leaf+sum and sum+sum, so after the initial O(k log k) sort
//! the construction is linear.
//!
//! # Serialized shape
//!
//! ```text
//! internal node: 0 <left> <right>
//! leaf:          1                  (symbol goes to the alphabet sequence)
//! ```
//!
//! For `k` leaves the shape is exactly `2k - 1` bits long.

use crate::codebook::Codebook;
use crate::frequency::{ALPHABET_SIZE, FrequencyTable};
use oxihuff_core::{BitBuffer, HuffError, Result};
use tracing::debug;

/// Symbol carried by the synthetic sibling of a lone real symbol.
pub const FILLER_SYMBOL: u8 = 0;

/// Index of a node in a [`HuffmanTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Arena index of this node.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A tree node: either a leaf carrying one symbol or an internal node with
/// exactly two children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// Leaf for one byte value.
    Leaf {
        /// The byte this leaf decodes to.
        symbol: u8,
    },
    /// Internal node; bit 0 selects `left`, bit 1 selects `right`.
    Internal {
        /// Child reached by bit 0.
        left: NodeId,
        /// Child reached by bit 1.
        right: NodeId,
    },
}

/// Which queue fronts a merge step combines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Merge {
    Leaves,
    Mixed,
    Sums,
}

/// A binary prefix-code tree over the byte alphabet.
///
/// The root is always an internal node, so every leaf has a codeword of at
/// least one bit. Two trees are equal when they have the same shape and
/// leaf symbols, regardless of arena layout.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build a tree from a 256-entry frequency table.
    ///
    /// Fails with [`HuffError::NoData`] when every frequency is zero. A
    /// single present symbol gets a synthetic [`FILLER_SYMBOL`] sibling so
    /// its codeword is one bit long.
    pub fn build(freqs: &[u64; ALPHABET_SIZE]) -> Result<Self> {
        let mut present: Vec<(u64, u8)> = freqs
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| (count, symbol as u8))
            .collect();

        if present.is_empty() {
            return Err(HuffError::NoData);
        }

        // (count, symbol) is a total order, so the result is deterministic.
        present.sort_unstable();

        let mut nodes = Vec::with_capacity(2 * present.len() + 1);

        if let &[(_, symbol)] = present.as_slice() {
            let real = push_node(&mut nodes, Node::Leaf { symbol });
            let filler = push_node(
                &mut nodes,
                Node::Leaf {
                    symbol: FILLER_SYMBOL,
                },
            );
            let root = push_node(
                &mut nodes,
                Node::Internal {
                    left: real,
                    right: filler,
                },
            );
            debug!(symbol, "built single-symbol tree with filler leaf");
            return Ok(Self { nodes, root });
        }

        let leaves: Vec<(u64, NodeId)> = present
            .iter()
            .map(|&(count, symbol)| (count, push_node(&mut nodes, Node::Leaf { symbol })))
            .collect();
        let mut sums: Vec<(u64, NodeId)> = Vec::with_capacity(leaves.len() - 1);
        let (mut leaf_front, mut sum_front) = (0usize, 0usize);

        while (leaves.len() - leaf_front) + (sums.len() - sum_front) > 1 {
            let pair = |a: Option<&(u64, NodeId)>, b: Option<&(u64, NodeId)>| {
                Some(a?.0.saturating_add(b?.0))
            };

            // Ties resolve in listed order: leaf+leaf, then leaf+sum, then sum+sum.
            let candidates = [
                (
                    Merge::Leaves,
                    pair(leaves.get(leaf_front), leaves.get(leaf_front + 1)),
                ),
                (
                    Merge::Mixed,
                    pair(leaves.get(leaf_front), sums.get(sum_front)),
                ),
                (
                    Merge::Sums,
                    pair(sums.get(sum_front), sums.get(sum_front + 1)),
                ),
            ];
            let Some((merge, total)) = candidates
                .into_iter()
                .filter_map(|(merge, total)| Some((merge, total?)))
                .min_by_key(|&(_, total)| total)
            else {
                break;
            };

            let (left, right) = match merge {
                Merge::Leaves => {
                    let ids = (leaves[leaf_front].1, leaves[leaf_front + 1].1);
                    leaf_front += 2;
                    ids
                }
                Merge::Mixed => {
                    let ids = (leaves[leaf_front].1, sums[sum_front].1);
                    leaf_front += 1;
                    sum_front += 1;
                    ids
                }
                Merge::Sums => {
                    let ids = (sums[sum_front].1, sums[sum_front + 1].1);
                    sum_front += 2;
                    ids
                }
            };

            let id = push_node(&mut nodes, Node::Internal { left, right });
            sums.push((total, id));
        }

        let root = match sums.last() {
            Some(&(_, id)) => id,
            None => return Err(HuffError::NoData),
        };

        let tree = Self { nodes, root };
        debug!(
            symbols = leaves.len(),
            nodes = tree.node_count(),
            depth = tree.depth(),
            "built huffman tree"
        );
        Ok(tree)
    }

    /// Build a tree from a [`FrequencyTable`].
    pub fn from_frequencies(freqs: &FrequencyTable) -> Result<Self> {
        Self::build(freqs.counts())
    }

    /// Rebuild a tree from its serialized shape and alphabet.
    ///
    /// Shape bits and alphabet bytes are consumed in lockstep. Fails with
    /// [`HuffError::CorruptTree`] when the shape runs out before the tree is
    /// closed, a leaf finds the alphabet exhausted, input remains after the
    /// tree is closed, or the root is a bare leaf.
    pub fn deserialize(shape: &BitBuffer, alphabet: &[u8]) -> Result<Self> {
        if shape.len() > u32::MAX as usize {
            return Err(HuffError::corrupt_tree("tree shape too long"));
        }

        let mut nodes = Vec::with_capacity(2 * alphabet.len());
        // One frame per open internal node, holding its left child once built.
        let mut open: Vec<Option<NodeId>> = Vec::new();
        let mut bits = shape.iter();
        let mut symbols = alphabet.iter();

        let root = 'walk: loop {
            let Some(bit) = bits.next() else {
                return Err(HuffError::corrupt_tree(
                    "shape sequence ended before the tree was closed",
                ));
            };

            if !bit {
                open.push(None);
                continue;
            }

            let Some(&symbol) = symbols.next() else {
                return Err(HuffError::corrupt_tree(
                    "leaf encountered with the alphabet exhausted",
                ));
            };

            let mut finished = push_node(&mut nodes, Node::Leaf { symbol });
            while let Some(frame) = open.last_mut() {
                match *frame {
                    None => {
                        *frame = Some(finished);
                        continue 'walk;
                    }
                    Some(left) => {
                        open.pop();
                        finished = push_node(
                            &mut nodes,
                            Node::Internal {
                                left,
                                right: finished,
                            },
                        );
                    }
                }
            }
            break finished;
        };

        if bits.len() > 0 {
            return Err(HuffError::corrupt_tree(format!(
                "{} shape bits left after the tree was closed",
                bits.len()
            )));
        }
        if symbols.len() > 0 {
            return Err(HuffError::corrupt_tree(format!(
                "{} alphabet bytes left after the tree was closed",
                symbols.len()
            )));
        }
        if matches!(nodes[root.index()], Node::Leaf { .. }) {
            return Err(HuffError::corrupt_tree("root must be an internal node"));
        }

        Ok(Self { nodes, root })
    }

    /// Serialize the tree into its preorder shape bits and leaf alphabet.
    ///
    /// The i-th `1` bit in the shape corresponds to the i-th alphabet byte.
    pub fn serialize(&self) -> (BitBuffer, Vec<u8>) {
        let mut shape = BitBuffer::with_capacity(self.nodes.len());
        let mut alphabet = Vec::with_capacity(self.leaf_count());
        let mut stack = vec![self.root];

        while let Some(id) = stack.pop() {
            match self.node(id) {
                Node::Leaf { symbol } => {
                    shape.push(true);
                    alphabet.push(symbol);
                }
                Node::Internal { left, right } => {
                    shape.push(false);
                    stack.push(right);
                    stack.push(left);
                }
            }
        }

        (shape, alphabet)
    }

    /// Derive the symbol to codeword table.
    ///
    /// Walks the tree depth-first with one shared path buffer: bit 0 is
    /// pushed when descending left, bit 1 when descending right, and the
    /// path is popped back to the parent's depth before each visit.
    pub fn codebook(&self) -> Codebook {
        let mut codebook = Codebook::new();
        let mut path = BitBuffer::new();
        // (node, depth, edge bit from the parent)
        let mut stack = vec![(self.root, 0usize, false)];

        while let Some((id, depth, bit)) = stack.pop() {
            let parent_depth = depth.saturating_sub(1);
            while path.len() > parent_depth {
                path.pop();
            }
            if depth > 0 {
                path.push(bit);
            }

            match self.node(id) {
                Node::Leaf { symbol } => codebook.insert(symbol, &path),
                Node::Internal { left, right } => {
                    stack.push((right, depth + 1, true));
                    stack.push((left, depth + 1, false));
                }
            }
        }

        codebook
    }

    /// The root node id.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node.
    #[inline]
    pub fn node(&self, id: NodeId) -> Node {
        self.nodes[id.index()]
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves, including any filler leaf.
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.node(id) {
                Node::Leaf { .. } => deepest = deepest.max(depth),
                Node::Internal { left, right } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        deepest
    }
}

impl PartialEq for HuffmanTree {
    fn eq(&self, other: &Self) -> bool {
        self.serialize() == other.serialize()
    }
}

impl Eq for HuffmanTree {}

/// Append a node to the arena and return its id.
fn push_node(nodes: &mut Vec<Node>, node: Node) -> NodeId {
    let id = NodeId(nodes.len() as u32);
    nodes.push(node);
    id
}
