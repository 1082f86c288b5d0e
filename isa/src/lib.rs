//! Guest instruction set tables — descriptors for the A64, A32 and
//! T16 encodings.
//!
//! Each encoding has one lookup entry point mapping a raw instruction
//! word to an [`InsnDesc`]: the emitter identity of the instruction
//! kind plus the decoder shape that knows how to extract its operands.
//! Lookup is total in the sense that an unmatched word yields `None`,
//! which the decoder turns into the Undefined sentinel opcode.

pub mod a32;
pub mod a64;
pub mod desc;
pub mod emit;
pub mod mode;
pub mod shape;
pub mod t16;

pub use desc::{InsnDesc, Pattern};
pub use emit::InstEmit;
pub use mode::ExecMode;
pub use shape::Shape;
