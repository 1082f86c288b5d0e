use crate::emit::InstEmit;
use crate::shape::Shape;

/// Instruction descriptor: what an encoding pattern decodes as.
///
/// `shape == None` marks a recognized but undefined/illegal
/// encoding; the decoder maps it to the Undefined sentinel opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsnDesc {
    pub emit: InstEmit,
    pub shape: Option<Shape>,
}

/// One masked pattern-table entry: `word & mask == value` selects
/// `desc`. Tables are ordered most-specific-first and scanned
/// linearly; the first match wins.
#[derive(Debug, Clone, Copy)]
pub struct Pattern {
    pub mask: u32,
    pub value: u32,
    pub desc: InsnDesc,
}

pub(crate) const fn ent(mask: u32, value: u32, emit: InstEmit, shape: Shape) -> Pattern {
    Pattern {
        mask,
        value,
        desc: InsnDesc {
            emit,
            shape: Some(shape),
        },
    }
}

pub(crate) const fn ent_undef(mask: u32, value: u32, emit: InstEmit) -> Pattern {
    Pattern {
        mask,
        value,
        desc: InsnDesc { emit, shape: None },
    }
}

pub(crate) fn scan(table: &'static [Pattern], word: u32) -> Option<&'static InsnDesc> {
    table
        .iter()
        .find(|p| word & p.mask == p.value)
        .map(|p| &p.desc)
}
