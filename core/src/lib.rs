//! Front-end data model: guest memory access, decoded opcodes and
//! the basic-block arena.

pub mod block;
pub mod mem;
pub mod opcode;

pub use block::{Block, BlockGraph, BlockId};
pub use mem::{FlatMemory, GuestMemory};
pub use opcode::{Cond, DecodedOp, OpKind, PC_REG};
