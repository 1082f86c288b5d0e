//! T16 descriptor table — legacy compact 2-byte encoding.
//!
//! Masks and values are 16-bit; the decoder passes the low halfword
//! of the fetched guest word. Halfwords that prefix a 32-bit wide
//! encoding match nothing here and fall through to the Undefined
//! sentinel.

use crate::desc::{ent, scan, InsnDesc, Pattern};
use crate::emit::InstEmit;
use crate::shape::Shape;

static TABLE: &[Pattern] = &[
    // Register branch / branch-with-link (exchange).
    ent(0xFF87, 0x4700, InstEmit::Bx, Shape::BRegT16),
    ent(0xFF87, 0x4780, InstEmit::Blx, Shape::BRegT16),
    // Breakpoint.
    ent(0xFF00, 0xBE00, InstEmit::Brk, Shape::ExcT16),
    // SVC and the permanently-undefined encoding occupy the two
    // reserved condition values of the conditional-branch format;
    // they must precede the BCond entry.
    ent(0xFF00, 0xDF00, InstEmit::Svc, Shape::ExcT16),
    ent(0xFF00, 0xDE00, InstEmit::Udf, Shape::ExcT16),
    // High-register ADD/MOV — may name the PC as destination.
    ent(0xFF00, 0x4400, InstEmit::Alu, Shape::AluHiT16),
    ent(0xFF00, 0x4600, InstEmit::Alu, Shape::AluHiT16),
    // High-register CMP — reads only, plain data shape.
    ent(0xFF00, 0x4500, InstEmit::Alu, Shape::DataRegT16),
    // Conditional branch.
    ent(0xF000, 0xD000, InstEmit::BCond, Shape::BCondT16),
    // Unconditional branch.
    ent(0xF800, 0xE000, InstEmit::B, Shape::BImmT16),
    // ALU operations (AND..MVN).
    ent(0xFC00, 0x4000, InstEmit::Alu, Shape::DataRegT16),
    // Load/store families.
    ent(0xF000, 0x5000, InstEmit::Mem, Shape::MemT16),
    ent(0xE000, 0x6000, InstEmit::Mem, Shape::MemT16),
    ent(0xF000, 0x8000, InstEmit::Mem, Shape::MemT16),
    ent(0xF000, 0x9000, InstEmit::Mem, Shape::MemT16),
    // Shift immediate / add-subtract register.
    ent(0xE000, 0x0000, InstEmit::Alu, Shape::DataRegT16),
    // Move/compare/add/subtract immediate.
    ent(0xE000, 0x2000, InstEmit::Alu, Shape::DataImmT16),
];

/// Look up the descriptor for a T16 instruction halfword.
pub fn lookup(half: u16) -> Option<&'static InsnDesc> {
    scan(TABLE, half as u32)
}
