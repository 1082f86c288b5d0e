//! Decoded opcodes — the typed result of decoding one guest
//! instruction word.
//!
//! `OpKind` is a closed sum of decoder shapes; each variant carries
//! the statically-extracted operand fields for its encoding class.
//! The three capability accessors (`imm_branch_target`,
//! `reg_branch_target`, `alu_dest`) are what block construction and
//! classification consume; nothing downstream re-inspects raw bits.

use dbt_isa::InstEmit;

/// Register number of the program counter in the legacy encodings.
pub const PC_REG: u32 = 15;

/// Condition code as encoded in the 4-bit condition fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
    Eq = 0,
    Ne = 1,
    Cs = 2,
    Cc = 3,
    Mi = 4,
    Pl = 5,
    Vs = 6,
    Vc = 7,
    Hi = 8,
    Ls = 9,
    Ge = 10,
    Lt = 11,
    Gt = 12,
    Le = 13,
    /// Always. Unconditionality in the legacy encodings is this
    /// condition value, not a distinct opcode.
    Al = 14,
    Nv = 15,
}

impl Cond {
    pub fn from_bits(bits: u32) -> Self {
        match bits & 0xF {
            0 => Cond::Eq,
            1 => Cond::Ne,
            2 => Cond::Cs,
            3 => Cond::Cc,
            4 => Cond::Mi,
            5 => Cond::Pl,
            6 => Cond::Vs,
            7 => Cond::Vc,
            8 => Cond::Hi,
            9 => Cond::Ls,
            10 => Cond::Ge,
            11 => Cond::Lt,
            12 => Cond::Gt,
            13 => Cond::Le,
            14 => Cond::Al,
            _ => Cond::Nv,
        }
    }
}

/// Operand payload per decoder shape.
///
/// Branch targets are absolute guest addresses; the legacy pipeline
/// offset (+8 for A32, +4 for T16) is already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpKind {
    /// Sentinel for words with no (or no valid) descriptor.
    Undefined,

    // -- A64 --
    BImm { target: u64 },
    BCondImm { target: u64, cond: Cond },
    BReg { rn: u32 },
    CmpBranch { target: u64, rt: u32, wide: bool },
    TestBranch { target: u64, rt: u32, bit: u32 },
    Exc { imm: u32 },
    AluImm { rd: u32, rn: u32, imm: u64, wide: bool },
    Movx { rd: u32, imm: u64, hw: u32, wide: bool },
    Adr { rd: u32, target: u64 },
    MemImm { rt: u32, rn: u32, offset: u64 },
    Hint,

    // -- A32 --
    BImmA32 { target: u64, cond: Cond, link: bool },
    BRegA32 { rm: u32, cond: Cond },
    AluA32 { rd: u32, rn: u32, opc: u32, cond: Cond },
    ExcA32 { imm: u32, cond: Cond },
    MemA32 { rt: u32, rn: u32, cond: Cond, load: bool },

    // -- T16 --
    BImmT16 { target: u64 },
    BCondT16 { target: u64, cond: Cond },
    BRegT16 { rm: u32 },
    AluHiT16 { rd: u32, rm: u32 },
    DataImmT16 { rd: u32, imm: u32 },
    DataRegT16 { rd: u32, rm: u32 },
    MemT16 { rt: u32, rn: u32 },
    ExcT16 { imm: u32 },
}

/// One decoded guest instruction. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedOp {
    /// Guest address the word was fetched from.
    pub address: u64,
    /// Raw instruction word (low halfword significant for T16).
    pub raw: u32,
    /// Byte size: 4, or 2 for the compact encoding.
    pub size: u8,
    /// Emitter identity token from the descriptor.
    pub emit: InstEmit,
    /// Shape payload.
    pub kind: OpKind,
}

impl DecodedOp {
    pub fn new(address: u64, raw: u32, size: u8, emit: InstEmit, kind: OpKind) -> Self {
        Self {
            address,
            raw,
            size,
            emit,
            kind,
        }
    }

    /// The Undefined sentinel: decoding is total, unknown words
    /// become ordinary 4-byte block members with no capabilities.
    pub fn undefined(address: u64, raw: u32) -> Self {
        Self {
            address,
            raw,
            size: 4,
            emit: InstEmit::Und,
            kind: OpKind::Undefined,
        }
    }

    /// Immediate branch target, if this shape transfers control to a
    /// statically-known address.
    pub fn imm_branch_target(&self) -> Option<u64> {
        match self.kind {
            OpKind::BImm { target }
            | OpKind::BCondImm { target, .. }
            | OpKind::CmpBranch { target, .. }
            | OpKind::TestBranch { target, .. }
            | OpKind::BImmA32 { target, .. }
            | OpKind::BImmT16 { target }
            | OpKind::BCondT16 { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Source register of a register-indirect branch.
    pub fn reg_branch_target(&self) -> Option<u32> {
        match self.kind {
            OpKind::BReg { rn } => Some(rn),
            OpKind::BRegA32 { rm, .. } | OpKind::BRegT16 { rm } => Some(rm),
            _ => None,
        }
    }

    /// Destination register of an arithmetic shape. In the legacy
    /// encodings a destination of [`PC_REG`] makes the instruction a
    /// control transfer.
    pub fn alu_dest(&self) -> Option<u32> {
        match self.kind {
            OpKind::AluImm { rd, .. }
            | OpKind::Movx { rd, .. }
            | OpKind::Adr { rd, .. }
            | OpKind::AluA32 { rd, .. }
            | OpKind::AluHiT16 { rd, .. }
            | OpKind::DataImmT16 { rd, .. }
            | OpKind::DataRegT16 { rd, .. } => Some(rd),
            _ => None,
        }
    }

    /// Condition field, for shapes that carry one. `None` means the
    /// shape has no condition field (and so executes always).
    pub fn condition(&self) -> Option<Cond> {
        match self.kind {
            OpKind::BCondImm { cond, .. }
            | OpKind::BImmA32 { cond, .. }
            | OpKind::BRegA32 { cond, .. }
            | OpKind::AluA32 { cond, .. }
            | OpKind::ExcA32 { cond, .. }
            | OpKind::MemA32 { cond, .. }
            | OpKind::BCondT16 { cond, .. } => Some(cond),
            _ => None,
        }
    }
}
