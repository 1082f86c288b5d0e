/// Which guest instruction-word encoding is being decoded.
///
/// Every decode entry point takes the mode as an explicit parameter;
/// no mode state is kept anywhere in the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecMode {
    /// Primary 64-bit encoding, fixed 4-byte words.
    A64,
    /// Legacy 32-bit encoding, fixed 4-byte words, per-instruction
    /// condition field.
    A32,
    /// Legacy compact encoding, 2-byte words.
    T16,
}
