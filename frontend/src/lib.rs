//! Translator front end — instruction decoding and control-flow
//! graph construction.
//!
//! The pipeline, leaves first: the factory builds typed opcodes per
//! decoder shape; the decoder turns a word at a guest address into a
//! [`dbt_core::DecodedOp`]; the block filler decodes until a
//! terminator; the graph builders assemble single blocks or whole
//! subroutines, resolving overlapping blocks by splitting. The
//! resulting [`dbt_core::BlockGraph`] is handed to the JIT backend,
//! which traverses it read-only.

pub mod classify;
pub mod decode;
pub mod factory;
pub mod graph;

pub use decode::decode_op;
pub use graph::{decode_basic_block, decode_subroutine, fill_block};
