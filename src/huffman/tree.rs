//! Frequency counting and Huffman tree construction
//!
//! Trees are built bottom-up from a min-priority queue. Ties between equal
//! weights are broken by a sequence number: a leaf's sequence is its symbol
//! value, an internal node's sequence is `256 + n` where `n` counts the merges
//! performed so far. The first node popped becomes the left child.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Number of distinct byte values
pub const SYMBOL_COUNT: usize = 256;

/// Occurrence count of every byte value in one buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; SYMBOL_COUNT],
}

impl FrequencyTable {
    /// Count every byte of `data`
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; SYMBOL_COUNT];
        for &byte in data {
            counts[byte as usize] += 1;
        }
        Self { counts }
    }

    /// Occurrences of `symbol`
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Number of symbols that occur at least once
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Iterate `(symbol, count)` for occurring symbols in ascending symbol order
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .map(|(s, &c)| (s as u8, c))
    }
}

/// Node of a Huffman tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    /// A symbol and its frequency
    Leaf {
        /// Byte value
        symbol: u8,
        /// Occurrence count
        weight: u64,
    },
    /// Merge of two subtrees
    Internal {
        /// Sum of the children's weights
        weight: u64,
        /// Subtree reached through a `0` edge
        left: Box<HuffmanNode>,
        /// Subtree reached through a `1` edge
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    /// Weight of this subtree
    pub fn weight(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { weight, .. } | HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    /// Whether this node is a leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    /// Number of leaves in this subtree
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                HuffmanNode::Leaf { .. } => count += 1,
                HuffmanNode::Internal { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        count
    }

    /// Length of the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            match node {
                HuffmanNode::Leaf { .. } => max_depth = max_depth.max(depth),
                HuffmanNode::Internal { left, right, .. } => {
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
            }
        }
        max_depth
    }
}

/// Queue element ordered by `(weight, sequence)` only
#[derive(Debug)]
struct QueueItem {
    weight: u64,
    sequence: u32,
    node: HuffmanNode,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueItem {}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.weight, self.sequence).cmp(&(other.weight, other.sequence))
    }
}

/// Build a Huffman tree for `data`, or `None` if `data` is empty
pub fn build_tree(data: &[u8]) -> Option<HuffmanNode> {
    build_tree_from_frequencies(&FrequencyTable::from_bytes(data))
}

/// Build a Huffman tree from precomputed frequencies
pub fn build_tree_from_frequencies(frequencies: &FrequencyTable) -> Option<HuffmanNode> {
    let mut heap: BinaryHeap<Reverse<QueueItem>> = frequencies
        .iter()
        .map(|(symbol, weight)| {
            Reverse(QueueItem {
                weight,
                sequence: symbol as u32,
                node: HuffmanNode::Leaf { symbol, weight },
            })
        })
        .collect();

    let mut next_sequence = SYMBOL_COUNT as u32;
    while heap.len() > 1 {
        let (Some(Reverse(left)), Some(Reverse(right))) = (heap.pop(), heap.pop()) else {
            break;
        };
        let weight = left.weight + right.weight;
        heap.push(Reverse(QueueItem {
            weight,
            sequence: next_sequence,
            node: HuffmanNode::Internal {
                weight,
                left: Box::new(left.node),
                right: Box::new(right.node),
            },
        }));
        next_sequence += 1;
    }

    heap.pop().map(|Reverse(item)| item.node)
}
