//! Terminator classification predicates.
//!
//! Pure functions of a decoded opcode's emitter identity and, for
//! the legacy encodings, its operand shape: legacy data processing
//! that names the PC as destination is a control transfer even
//! though its emitter is ordinary arithmetic. The mode never needs
//! to be passed in — shapes are per-encoding, so the legacy rules
//! key off the shape itself.

use dbt_core::{Cond, DecodedOp, OpKind, PC_REG};
use dbt_isa::InstEmit;

fn is_branch_emit(emit: InstEmit) -> bool {
    matches!(
        emit,
        InstEmit::B
            | InstEmit::BCond
            | InstEmit::Bl
            | InstEmit::Blr
            | InstEmit::Br
            | InstEmit::Ret
            | InstEmit::Cbz
            | InstEmit::Cbnz
            | InstEmit::Tbz
            | InstEmit::Tbnz
            | InstEmit::Bl32
            | InstEmit::Bx
            | InstEmit::Blx
    )
}

/// Legacy arithmetic with the PC as destination. Compare/test forms
/// (opc 8..=11) set flags only and never write their rd field.
fn writes_pc(op: &DecodedOp) -> bool {
    match op.kind {
        OpKind::AluA32 { rd, opc, .. } => rd == PC_REG && !(8..=11).contains(&opc),
        OpKind::AluHiT16 { rd, .. } => rd == PC_REG,
        _ => false,
    }
}

/// True for any control transfer: immediate- and register-target
/// branches in every mode, and legacy arithmetic targeting the PC.
pub fn is_branch(op: &DecodedOp) -> bool {
    is_branch_emit(op.emit) || writes_pc(op)
}

/// True when the transfer is always taken. A missing condition field
/// means always; in the legacy encodings unconditionality is the
/// literal "always" condition value, not a distinct opcode.
pub fn is_unconditional_branch(op: &DecodedOp) -> bool {
    match op.emit {
        // Conditional by construction, whatever their fields say.
        InstEmit::Cbz | InstEmit::Cbnz | InstEmit::Tbz | InstEmit::Tbnz => false,
        _ if is_branch(op) => matches!(op.condition(), None | Some(Cond::Al)),
        _ => false,
    }
}

/// True only for the two designated subroutine-call identities.
/// Legacy-mode call detection is out of scope.
pub fn is_call(op: &DecodedOp) -> bool {
    matches!(op.emit, InstEmit::Bl | InstEmit::Blr)
}

/// True for the breakpoint, system-call and undefined-instruction
/// trap identities. The Undefined sentinel is not among them: a word
/// that matched nothing is an ordinary block member.
pub fn is_exception(op: &DecodedOp) -> bool {
    matches!(op.emit, InstEmit::Svc | InstEmit::Brk | InstEmit::Udf)
}
