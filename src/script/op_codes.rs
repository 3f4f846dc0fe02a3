//! Script opcodes needed to build and classify standard Bitcoin SV scripts.
//!
//! # Examples
//! ```
//! use txcomposer::script::op_codes::*;
//! assert_eq!(OP_CHECKSIG, 172);
//! ```

// Pushdata and Constants
/// Pushes empty array (0/false) onto the stack.
pub const OP_0: u8 = 0;
/// Alias of `OP_0`.
pub const OP_FALSE: u8 = 0;
/// Base for direct pushes: `OP_PUSH + n` pushes the next n bytes (n: 1-75).
pub const OP_PUSH: u8 = 0;

/// Next byte is push length (up to 255 bytes).
pub const OP_PUSHDATA1: u8 = 76;
/// Next two bytes are push length (up to 65535 bytes).
pub const OP_PUSHDATA2: u8 = 77;
/// Next four bytes are push length (up to 4GB).
pub const OP_PUSHDATA4: u8 = 78;

/// Pushes 1 (true) onto the stack.
pub const OP_1: u8 = 81;

// Flow Control
/// Ends execution; marks data-carrier outputs.
pub const OP_RETURN: u8 = 106;

// Stack Operations
/// Duplicates top.
pub const OP_DUP: u8 = 118;

// Bitwise Logic
/// Equals + VERIFY.
pub const OP_EQUALVERIFY: u8 = 136;

// Crypto
/// RIPEMD160(SHA256(top)).
pub const OP_HASH160: u8 = 169;
/// Starts sig matching from here.
pub const OP_CODESEPARATOR: u8 = 171;
/// Verifies sig for pubkey/tx (1/0).
pub const OP_CHECKSIG: u8 = 172;
