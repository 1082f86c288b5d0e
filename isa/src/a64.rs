//! A64 descriptor table — primary 64-bit encoding.

use crate::desc::{ent, ent_undef, scan, InsnDesc, Pattern};
use crate::emit::InstEmit;
use crate::shape::Shape;

/// Ordered most-specific-first; fixed-register forms before their
/// instruction-class entries.
static TABLE: &[Pattern] = &[
    // Unconditional register branches.
    ent(0xFFFF_FC1F, 0xD61F_0000, InstEmit::Br, Shape::BReg),
    ent(0xFFFF_FC1F, 0xD63F_0000, InstEmit::Blr, Shape::BReg),
    ent(0xFFFF_FC1F, 0xD65F_0000, InstEmit::Ret, Shape::BReg),
    // Exception generation.
    ent(0xFFE0_001F, 0xD400_0001, InstEmit::Svc, Shape::ExcA64),
    ent(0xFFE0_001F, 0xD420_0000, InstEmit::Brk, Shape::ExcA64),
    // Hints (NOP, YIELD, WFE, WFI, SEV...).
    ent(0xFFFF_F01F, 0xD503_201F, InstEmit::Hint, Shape::Hint),
    // UDF #imm16 — recognized, no decoded shape.
    ent_undef(0xFFFF_0000, 0x0000_0000, InstEmit::Udf),
    // Conditional branch (immediate).
    ent(0xFF00_0010, 0x5400_0000, InstEmit::BCond, Shape::BCondImm),
    // Unconditional branch (immediate), with and without link.
    ent(0xFC00_0000, 0x1400_0000, InstEmit::B, Shape::BImm),
    ent(0xFC00_0000, 0x9400_0000, InstEmit::Bl, Shape::BImm),
    // Compare-and-branch.
    ent(0x7F00_0000, 0x3400_0000, InstEmit::Cbz, Shape::CmpBranch),
    ent(0x7F00_0000, 0x3500_0000, InstEmit::Cbnz, Shape::CmpBranch),
    // Test-bit-and-branch.
    ent(0x7F00_0000, 0x3600_0000, InstEmit::Tbz, Shape::TestBranch),
    ent(0x7F00_0000, 0x3700_0000, InstEmit::Tbnz, Shape::TestBranch),
    // Move wide (MOVN/MOVZ/MOVK).
    ent(0x1F80_0000, 0x1280_0000, InstEmit::Movx, Shape::Movx),
    // Add/subtract immediate.
    ent(0x1F00_0000, 0x1100_0000, InstEmit::AddSub, Shape::AluImm),
    // ADR/ADRP.
    ent(0x1F00_0000, 0x1000_0000, InstEmit::Adr, Shape::Adr),
    // Load/store register, unsigned immediate offset.
    ent(0x3B00_0000, 0x3900_0000, InstEmit::Mem, Shape::MemImm),
];

/// Look up the descriptor for an A64 instruction word.
pub fn lookup(word: u32) -> Option<&'static InsnDesc> {
    scan(TABLE, word)
}
