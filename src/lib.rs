//! # Z80 Machine Backend
//!
//! A Zilog Z80 backend for a multi-architecture machine harness: a
//! register/memory model, a table-driven fetch-decode-execute engine, and
//! the mirror-image instruction encoder that turns resolved assembly
//! tokens into the exact bytes the decoder consumes.
//!
//! ## Quick Start
//!
//! ```rust
//! use libz80::{Machine, RegisterId};
//!
//! let mut machine = Machine::new();
//!
//! // LD A,0x2A ; LD B,A ; HALT
//! machine.load_program(&[0x3E, 0x2A, 0x47, 0x76]).unwrap();
//!
//! machine.step().unwrap();
//! machine.step().unwrap();
//! assert_eq!(machine.register(RegisterId::B.id()).unwrap(), 0x2A);
//!
//! // HALT raises the reserved trap descriptor
//! assert!(machine.step().unwrap().is_some());
//! ```
//!
//! ## Architecture
//!
//! - **Single source of truth**: the operand bit-field tables in
//!   [`opcodes`] are shared between decoder and encoder, so the two
//!   cannot drift apart.
//! - **Stable numbering**: the 30 register ids in [`RegisterId`] are a
//!   versioned contract consumed by hosts; the name list the descriptor
//!   exposes is derived from the same enum.
//! - **Value errors everywhere**: every fallible operation returns
//!   [`Error`]; a user-triggered failure never panics the process.
//!
//! ## Modules
//!
//! - `registers` - register ids, pairs, and the register file
//! - `memory` - flat 64 KiB bounds-checked memory
//! - `opcodes` - shared operand-selection tables and prefix constants
//! - `cpu` - the machine instance and decode/execute engine
//! - `assembler` - resolved-token boundary and instruction encoder
//! - `arch` - static architecture descriptor

pub mod arch;
pub mod assembler;
pub mod cpu;
pub mod memory;
pub mod opcodes;
pub mod registers;

// Re-export public API
pub use arch::{architecture_info, ArchitectureInfo};
pub use assembler::{encode_program, DebuggerToken, OperandToken, ResolvedToken};
pub use cpu::{Call, Machine, LOAD_ADDRESS, SYS_HALT};
pub use memory::{Memory, MAX_ADDRESS, MEMORY_SIZE};
pub use opcodes::{PairSelect, RegSelect, PREFIX_EXTENDED, PREFIX_IX, PREFIX_IY};
pub use registers::{RegisterFile, RegisterId, RegisterPair};

use thiserror::Error as ThisError;

/// Errors returned by the machine, decoder, and encoder.
///
/// All failures are ordinary values handed back to the caller; the
/// engine never retries internally and never terminates the process. The
/// host decides whether to halt, report, or keep stepping.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// An address or the end of an address range fell outside the 64 KiB
    /// space.
    #[error("address 0x{address:05X} is outside the 64 KiB address space")]
    AddressOutOfRange {
        /// The offending address. Wider than the bus so that the end
        /// address of an oversized chunk request is always representable.
        address: u64,
    },

    /// A numeric register id outside `0..=29`, or a name missing from
    /// the canonical table.
    #[error("unknown register {0:?}")]
    UnknownRegister(String),

    /// The decoder met a base-table opcode outside the implemented
    /// subset.
    #[error("opcode 0x{0:02X} is not implemented")]
    UnimplementedOpcode(u8),

    /// The decoder met an unimplemented opcode inside a prefix subtable.
    #[error("opcode 0x{prefix:02X} 0x{opcode:02X} is not implemented")]
    UnimplementedPrefixedOpcode {
        /// The escape byte that selected the subtable.
        prefix: u8,
        /// The byte that failed to decode within it.
        opcode: u8,
    },

    /// The encoder received the wrong number of operands for a mnemonic.
    #[error("{mnemonic} expects {expected} operand(s), found {found}")]
    WrongOperandCount {
        /// The mnemonic being encoded.
        mnemonic: String,
        /// How many operands it takes.
        expected: usize,
        /// How many the token carried.
        found: usize,
    },

    /// The encoder received a mnemonic outside its table.
    #[error("unknown mnemonic {0:?}")]
    UnknownMnemonic(String),

    /// An immediate operand does not fit the width of the encoded field
    /// (e.g. `LD C,0x1FF`). Truncating silently would desynchronize the
    /// encoder from the decoder.
    #[error("{mnemonic} immediate 0x{value:X} does not fit in {width} bits")]
    ImmediateOutOfRange {
        /// The mnemonic being encoded.
        mnemonic: String,
        /// The oversized immediate.
        value: u16,
        /// Width of the field it must fit, in bits.
        width: u8,
    },

    /// The operand shapes are valid tokens but the instruction set has
    /// no encoding for the combination (e.g. `LD BC,DE`).
    #[error("{mnemonic} does not accept this operand combination")]
    UnsupportedOperands {
        /// The mnemonic being encoded.
        mnemonic: String,
    },

    /// A failure during program encoding, tagged with the source line it
    /// came from.
    #[error("line {line}: {source}")]
    Encode {
        /// Source line of the instruction that failed (1-indexed).
        line: usize,
        /// The underlying failure.
        source: Box<Error>,
    },
}
