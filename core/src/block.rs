//! Basic blocks and the block arena.
//!
//! A control-flow graph over guest code is inherently cyclic (a
//! tight loop's `branch` edge points at its own block), so blocks
//! live in an indexable arena and edges are optional indices into
//! it. Splitting mutates a block in place; every edge that named it
//! keeps naming it.

use crate::opcode::DecodedOp;

/// Arena index of a [`Block`] inside its [`BlockGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(pub u32);

/// One basic block: the guest range `[position, end_position)` and
/// the decoded opcodes exactly filling it.
#[derive(Debug)]
pub struct Block {
    /// Guest address of the first opcode.
    pub position: u64,
    /// Guest address one past the terminator.
    pub end_position: u64,
    /// Decoded opcodes, in address order. Never empty once filling
    /// completes.
    pub opcodes: Vec<DecodedOp>,
    /// Block entered when the terminating transfer is taken. The
    /// block itself for a tight self-loop.
    pub branch: Option<BlockId>,
    /// Block entered by falling through. Absent after unconditional
    /// non-call terminators.
    pub next: Option<BlockId>,
}

impl Block {
    pub fn new(position: u64) -> Self {
        Self {
            position,
            end_position: position,
            opcodes: Vec::new(),
            branch: None,
            next: None,
        }
    }

    /// The terminator. Filling guarantees at least one opcode.
    pub fn last_op(&self) -> &DecodedOp {
        self.opcodes.last().expect("block not filled")
    }

    /// Byte size of the covered guest range.
    pub fn size(&self) -> u64 {
        self.end_position - self.position
    }

    /// Whether `addr` falls inside `[position, end_position)`.
    pub fn contains(&self, addr: u64) -> bool {
        addr >= self.position && addr < self.end_position
    }

    /// Whether this block's range overlaps `other`'s.
    pub fn overlaps(&self, other: &Block) -> bool {
        self.position < other.end_position && other.position < self.end_position
    }
}

/// Arena of blocks forming one decoded region or subroutine.
///
/// The entry block is always index 0 (the first allocation a builder
/// makes is its entry). Consumers traverse `branch`/`next` read-only.
#[derive(Debug, Default)]
pub struct BlockGraph {
    blocks: Vec<Block>,
}

impl BlockGraph {
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Allocate an empty block starting at `position`.
    pub fn alloc(&mut self, position: u64) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(Block::new(position));
        id
    }

    /// The entry block of this graph.
    pub fn entry(&self) -> BlockId {
        assert!(!self.blocks.is_empty(), "empty graph");
        BlockId(0)
    }

    pub fn get(&self, id: BlockId) -> &Block {
        &self.blocks[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(i, b)| (BlockId(i as u32), b))
    }
}
