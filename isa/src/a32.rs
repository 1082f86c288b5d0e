//! A32 descriptor table — legacy 32-bit encoding.
//!
//! Every entry leaves the condition field (bits 31:28) unmasked; the
//! shape extracts it and classification decides what "always" means.

use crate::desc::{ent, scan, InsnDesc, Pattern};
use crate::emit::InstEmit;
use crate::shape::Shape;

static TABLE: &[Pattern] = &[
    // BX — sits inside the data-processing space, must come first.
    ent(0x0FFF_FFF0, 0x012F_FF10, InstEmit::Bx, Shape::BRegA32),
    // BKPT and the permanently-undefined encoding share field layout.
    ent(0x0FF0_00F0, 0x0120_0070, InstEmit::Brk, Shape::BkptA32),
    ent(0x0FF0_00F0, 0x07F0_00F0, InstEmit::Udf, Shape::BkptA32),
    // SVC.
    ent(0x0F00_0000, 0x0F00_0000, InstEmit::Svc, Shape::SvcA32),
    // Branch, with and without link.
    ent(0x0F00_0000, 0x0A00_0000, InstEmit::B, Shape::BImmA32),
    ent(0x0F00_0000, 0x0B00_0000, InstEmit::Bl32, Shape::BImmA32),
    // Load/store word/byte immediate.
    ent(0x0C00_0000, 0x0400_0000, InstEmit::Mem, Shape::MemA32),
    // Data processing, register and immediate forms.
    ent(0x0C00_0000, 0x0000_0000, InstEmit::Alu, Shape::AluA32),
];

/// Look up the descriptor for an A32 instruction word.
pub fn lookup(word: u32) -> Option<&'static InsnDesc> {
    scan(TABLE, word)
}
