//! # Architecture Descriptor
//!
//! Static metadata the host uses to display and address this backend.

use crate::registers::RegisterId;

/// Static description of the architecture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchitectureInfo {
    /// Human-readable architecture name.
    pub name: &'static str,

    /// Word width exposed to the host. 16 is the address width; the CPU
    /// is 8-bit internally. This is deliberate, not a typo.
    pub word_width: u8,

    /// Canonical register names in numeric-id order.
    pub register_names: [&'static str; RegisterId::COUNT],
}

/// Returns the descriptor for this backend.
///
/// The name list is derived from [`RegisterId::ALL`], so it can never
/// drift from the numbering contract.
pub fn architecture_info() -> ArchitectureInfo {
    ArchitectureInfo {
        name: "Zilog Z80",
        word_width: 16,
        register_names: RegisterId::ALL.map(RegisterId::name),
    }
}
