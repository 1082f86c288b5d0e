//! Opcode factory — shape-indexed construction of decoded opcodes.
//!
//! Resolving a shape to its builder happens at most once per shape;
//! the result is published through a per-shape `OnceLock` and every
//! later decode is a table hit. Racing initializers are harmless:
//! resolution is a pure function of the shape, so last-writer-wins
//! semantics (here, first-writer-wins) cannot disagree.

use std::sync::OnceLock;

use dbt_core::{Cond, DecodedOp, OpKind};
use dbt_isa::{InsnDesc, Shape};

/// Builds a decoded opcode of one concrete shape from the
/// descriptor, the guest address and the raw word.
pub type OpBuilder = fn(&InsnDesc, u64, u32) -> DecodedOp;

const UNSET: OnceLock<OpBuilder> = OnceLock::new();
static BUILDERS: [OnceLock<OpBuilder>; Shape::COUNT] = [UNSET; Shape::COUNT];

/// Fetch the builder for `shape`, resolving and caching it on first
/// use. Safe to call from any number of threads.
pub fn builder(shape: Shape) -> OpBuilder {
    *BUILDERS[shape.index()].get_or_init(|| resolve(shape))
}

/// The construction path per shape. The match is total over the
/// closed `Shape` enum, so a recognized shape can never lack a
/// builder.
fn resolve(shape: Shape) -> OpBuilder {
    match shape {
        Shape::BImm => build_b_imm,
        Shape::BCondImm => build_b_cond_imm,
        Shape::BReg => build_b_reg,
        Shape::CmpBranch => build_cmp_branch,
        Shape::TestBranch => build_test_branch,
        Shape::ExcA64 => build_exc_a64,
        Shape::AluImm => build_alu_imm,
        Shape::Movx => build_movx,
        Shape::Adr => build_adr,
        Shape::MemImm => build_mem_imm,
        Shape::Hint => build_hint,
        Shape::BImmA32 => build_b_imm_a32,
        Shape::BRegA32 => build_b_reg_a32,
        Shape::AluA32 => build_alu_a32,
        Shape::SvcA32 => build_svc_a32,
        Shape::BkptA32 => build_bkpt_a32,
        Shape::MemA32 => build_mem_a32,
        Shape::BImmT16 => build_b_imm_t16,
        Shape::BCondT16 => build_b_cond_t16,
        Shape::BRegT16 => build_b_reg_t16,
        Shape::AluHiT16 => build_alu_hi_t16,
        Shape::DataImmT16 => build_data_imm_t16,
        Shape::DataRegT16 => build_data_reg_t16,
        Shape::MemT16 => build_mem_t16,
        Shape::ExcT16 => build_exc_t16,
    }
}

// ── Field extraction helpers ──────────────────────────────────

/// Bits `hi..=lo` of `word`, shifted down.
#[inline]
fn bits(word: u32, hi: u32, lo: u32) -> u32 {
    (word >> lo) & ((1 << (hi - lo + 1)) - 1)
}

/// Sign-extend the low `n` bits of `value`.
#[inline]
fn sext(value: u32, n: u32) -> i64 {
    let shift = 64 - n;
    (((value as u64) << shift) as i64) >> shift
}

#[inline]
fn rel(addr: u64, offset: i64) -> u64 {
    addr.wrapping_add(offset as u64)
}

// ── A64 builders ──────────────────────────────────────────────

fn build_b_imm(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let target = rel(addr, sext(bits(raw, 25, 0), 26) << 2);
    DecodedOp::new(addr, raw, 4, d.emit, OpKind::BImm { target })
}

fn build_b_cond_imm(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let target = rel(addr, sext(bits(raw, 23, 5), 19) << 2);
    let cond = Cond::from_bits(bits(raw, 3, 0));
    DecodedOp::new(addr, raw, 4, d.emit, OpKind::BCondImm { target, cond })
}

fn build_b_reg(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let rn = bits(raw, 9, 5);
    DecodedOp::new(addr, raw, 4, d.emit, OpKind::BReg { rn })
}

fn build_cmp_branch(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let target = rel(addr, sext(bits(raw, 23, 5), 19) << 2);
    let kind = OpKind::CmpBranch {
        target,
        rt: bits(raw, 4, 0),
        wide: raw >> 31 != 0,
    };
    DecodedOp::new(addr, raw, 4, d.emit, kind)
}

fn build_test_branch(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let target = rel(addr, sext(bits(raw, 18, 5), 14) << 2);
    let kind = OpKind::TestBranch {
        target,
        rt: bits(raw, 4, 0),
        bit: (bits(raw, 31, 31) << 5) | bits(raw, 23, 19),
    };
    DecodedOp::new(addr, raw, 4, d.emit, kind)
}

fn build_exc_a64(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let imm = bits(raw, 20, 5);
    DecodedOp::new(addr, raw, 4, d.emit, OpKind::Exc { imm })
}

fn build_alu_imm(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let imm12 = bits(raw, 21, 10) as u64;
    let kind = OpKind::AluImm {
        rd: bits(raw, 4, 0),
        rn: bits(raw, 9, 5),
        imm: imm12 << (12 * bits(raw, 22, 22)),
        wide: raw >> 31 != 0,
    };
    DecodedOp::new(addr, raw, 4, d.emit, kind)
}

fn build_movx(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let kind = OpKind::Movx {
        rd: bits(raw, 4, 0),
        imm: bits(raw, 20, 5) as u64,
        hw: bits(raw, 22, 21),
        wide: raw >> 31 != 0,
    };
    DecodedOp::new(addr, raw, 4, d.emit, kind)
}

fn build_adr(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let imm = (sext(bits(raw, 23, 5), 19) << 2) | bits(raw, 30, 29) as i64;
    let page = raw >> 31 != 0;
    let target = if page {
        rel(addr & !0xFFF, imm << 12)
    } else {
        rel(addr, imm)
    };
    let kind = OpKind::Adr {
        rd: bits(raw, 4, 0),
        target,
    };
    DecodedOp::new(addr, raw, 4, d.emit, kind)
}

fn build_mem_imm(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let size = bits(raw, 31, 30);
    let kind = OpKind::MemImm {
        rt: bits(raw, 4, 0),
        rn: bits(raw, 9, 5),
        offset: (bits(raw, 21, 10) as u64) << size,
    };
    DecodedOp::new(addr, raw, 4, d.emit, kind)
}

fn build_hint(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    DecodedOp::new(addr, raw, 4, d.emit, OpKind::Hint)
}

// ── A32 builders ──────────────────────────────────────────────

// Legacy reads of the PC see the fetch address plus 8 (two words of
// pipeline); immediate branch targets bake that in.
const A32_PIPELINE: i64 = 8;

#[inline]
fn a32_cond(raw: u32) -> Cond {
    Cond::from_bits(bits(raw, 31, 28))
}

fn build_b_imm_a32(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let target = rel(addr, A32_PIPELINE + (sext(bits(raw, 23, 0), 24) << 2));
    let kind = OpKind::BImmA32 {
        target,
        cond: a32_cond(raw),
        link: bits(raw, 24, 24) != 0,
    };
    DecodedOp::new(addr, raw, 4, d.emit, kind)
}

fn build_b_reg_a32(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let kind = OpKind::BRegA32 {
        rm: bits(raw, 3, 0),
        cond: a32_cond(raw),
    };
    DecodedOp::new(addr, raw, 4, d.emit, kind)
}

fn build_alu_a32(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let kind = OpKind::AluA32 {
        rd: bits(raw, 15, 12),
        rn: bits(raw, 19, 16),
        opc: bits(raw, 24, 21),
        cond: a32_cond(raw),
    };
    DecodedOp::new(addr, raw, 4, d.emit, kind)
}

fn build_svc_a32(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let kind = OpKind::ExcA32 {
        imm: bits(raw, 23, 0),
        cond: a32_cond(raw),
    };
    DecodedOp::new(addr, raw, 4, d.emit, kind)
}

fn build_bkpt_a32(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let kind = OpKind::ExcA32 {
        imm: (bits(raw, 19, 8) << 4) | bits(raw, 3, 0),
        cond: a32_cond(raw),
    };
    DecodedOp::new(addr, raw, 4, d.emit, kind)
}

fn build_mem_a32(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let kind = OpKind::MemA32 {
        rt: bits(raw, 15, 12),
        rn: bits(raw, 19, 16),
        cond: a32_cond(raw),
        load: bits(raw, 20, 20) != 0,
    };
    DecodedOp::new(addr, raw, 4, d.emit, kind)
}

// ── T16 builders ──────────────────────────────────────────────

// Compact-mode PC reads see the fetch address plus 4.
const T16_PIPELINE: i64 = 4;

fn build_b_imm_t16(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let target = rel(addr, T16_PIPELINE + (sext(bits(raw, 10, 0), 11) << 1));
    DecodedOp::new(addr, raw, 2, d.emit, OpKind::BImmT16 { target })
}

fn build_b_cond_t16(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let target = rel(addr, T16_PIPELINE + (sext(bits(raw, 7, 0), 8) << 1));
    let kind = OpKind::BCondT16 {
        target,
        cond: Cond::from_bits(bits(raw, 11, 8)),
    };
    DecodedOp::new(addr, raw, 2, d.emit, kind)
}

fn build_b_reg_t16(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let kind = OpKind::BRegT16 {
        rm: bits(raw, 6, 3),
    };
    DecodedOp::new(addr, raw, 2, d.emit, kind)
}

fn build_alu_hi_t16(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let kind = OpKind::AluHiT16 {
        rd: (bits(raw, 7, 7) << 3) | bits(raw, 2, 0),
        rm: bits(raw, 6, 3),
    };
    DecodedOp::new(addr, raw, 2, d.emit, kind)
}

fn build_data_imm_t16(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let kind = OpKind::DataImmT16 {
        rd: bits(raw, 10, 8),
        imm: bits(raw, 7, 0),
    };
    DecodedOp::new(addr, raw, 2, d.emit, kind)
}

fn build_data_reg_t16(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let kind = OpKind::DataRegT16 {
        rd: bits(raw, 2, 0),
        rm: bits(raw, 5, 3),
    };
    DecodedOp::new(addr, raw, 2, d.emit, kind)
}

fn build_mem_t16(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let kind = OpKind::MemT16 {
        rt: bits(raw, 2, 0),
        rn: bits(raw, 5, 3),
    };
    DecodedOp::new(addr, raw, 2, d.emit, kind)
}

fn build_exc_t16(d: &InsnDesc, addr: u64, raw: u32) -> DecodedOp {
    let kind = OpKind::ExcT16 {
        imm: bits(raw, 7, 0),
    };
    DecodedOp::new(addr, raw, 2, d.emit, kind)
}
