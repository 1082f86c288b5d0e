//! Opcode decoder — one guest word to one typed opcode.
//!
//! Decoding is a total function over the 32-bit encoding space:
//! words with no descriptor (or a descriptor without a shape) become
//! the Undefined sentinel rather than an error, because guest code
//! may legitimately branch into out-of-spec words.

use tracing::trace;

use dbt_core::{DecodedOp, GuestMemory};
use dbt_isa::{a32, a64, t16, ExecMode};

use crate::factory;

/// Decode the instruction word at `addr` under `mode`.
pub fn decode_op<M: GuestMemory>(mem: &M, addr: u64, mode: ExecMode) -> DecodedOp {
    let raw = mem.read_u32(addr);
    let desc = match mode {
        ExecMode::A64 => a64::lookup(raw),
        ExecMode::A32 => a32::lookup(raw),
        ExecMode::T16 => t16::lookup(raw as u16),
    };

    let op = match desc.and_then(|d| d.shape.map(|s| (d, s))) {
        Some((d, shape)) => factory::builder(shape)(d, addr, raw),
        None => DecodedOp::undefined(addr, raw),
    };
    trace!(
        "decode {:#x}: raw={:#010x} {:?} size={}",
        addr,
        raw,
        op.emit,
        op.size
    );
    op
}
