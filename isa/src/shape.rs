/// Decoder shape identifier — selects which operand-extraction
/// routine builds the decoded opcode for a descriptor.
///
/// The set is closed: every shape has exactly one construction path
/// in the frontend's factory, so a recognized descriptor can never
/// lack a builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    // -- A64 --
    BImm,
    BCondImm,
    BReg,
    CmpBranch,
    TestBranch,
    ExcA64,
    AluImm,
    Movx,
    Adr,
    MemImm,
    Hint,

    // -- A32 --
    BImmA32,
    BRegA32,
    AluA32,
    SvcA32,
    BkptA32,
    MemA32,

    // -- T16 --
    BImmT16,
    BCondT16,
    BRegT16,
    AluHiT16,
    DataImmT16,
    DataRegT16,
    MemT16,
    ExcT16,
}

impl Shape {
    /// Number of shapes; sizes the factory's builder table.
    pub const COUNT: usize = Shape::ExcT16 as usize + 1;

    /// Dense index into the factory's builder table.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}
