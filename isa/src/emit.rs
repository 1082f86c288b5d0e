/// Identity token for the semantic emitter of an instruction kind.
///
/// The front end never invokes an emitter; it only compares these
/// tokens to classify terminators (branch / call / exception). The
/// JIT backend maps each token to the code that lowers the
/// instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstEmit {
    // -- A64 control flow --
    /// Unconditional immediate branch.
    B,
    /// Conditional immediate branch.
    BCond,
    /// Immediate subroutine call.
    Bl,
    /// Register subroutine call.
    Blr,
    /// Register branch.
    Br,
    /// Subroutine return (register branch).
    Ret,
    /// Compare-and-branch on zero.
    Cbz,
    /// Compare-and-branch on non-zero.
    Cbnz,
    /// Test-bit-and-branch on zero.
    Tbz,
    /// Test-bit-and-branch on non-zero.
    Tbnz,

    // -- Legacy control flow --
    /// A32 branch-and-link. Not a call for classification purposes;
    /// legacy call detection is out of scope.
    Bl32,
    /// Legacy register branch (exchange).
    Bx,
    /// Legacy register branch-and-link (exchange).
    Blx,

    // -- Exceptions --
    /// Supervisor (system) call.
    Svc,
    /// Breakpoint.
    Brk,
    /// Architectural undefined-instruction trap.
    Udf,

    // -- Straight-line --
    /// A64 add/subtract immediate.
    AddSub,
    /// A64 move wide (MOVN/MOVZ/MOVK).
    Movx,
    /// PC-relative address computation (ADR/ADRP).
    Adr,
    /// Load/store.
    Mem,
    /// Hint (NOP and friends).
    Hint,
    /// Legacy data processing.
    Alu,

    /// Sentinel: the word matched no descriptor, or its descriptor
    /// carries no shape. Classifies as nothing at all.
    Und,
}
