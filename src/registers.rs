//! # Register File
//!
//! This module contains the Z80 register set: the four primary register
//! pairs (AF, BC, DE, HL), their shadow counterparts (AF', BC', DE', HL'),
//! the interrupt vector and refresh registers (I, R), the index registers
//! (IX, IY), and the stack pointer and program counter.
//!
//! ## Register Numbering
//!
//! Every addressable register carries a fixed numeric id in `0..=29` and a
//! canonical name. The numbering is a stable contract shared by the host,
//! the decoder's operand-selection bit fields, and the encoder; see
//! [`RegisterId`]. Renumbering is a breaking change for all three.
//!
//! ## Pairs and Halves
//!
//! A [`RegisterPair`] is two 8-bit halves that are also addressable as one
//! 16-bit value. The halves are the source of truth: the combined view is
//! always `(high << 8) | low`, and writing either half is immediately
//! visible through the combined view.

use crate::Error;

/// One of the 30 addressable Z80 registers.
///
/// The discriminant is the register's external numeric id, a stable
/// contract consumed by hosts and debuggers. Ids run `0..=29` in the order
/// A, F, AF, B, C, BC, D, E, DE, H, L, HL, then the shadow set in the same
/// order, then I, R, IX, IY, SP, PC.
///
/// # Examples
///
/// ```
/// use libz80::RegisterId;
///
/// assert_eq!(RegisterId::A.id(), 0);
/// assert_eq!(RegisterId::HL.name(), "HL");
/// assert_eq!(RegisterId::from_name("BC'").unwrap(), RegisterId::BcAlt);
/// assert_eq!(RegisterId::PC.id(), 29);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RegisterId {
    A = 0,
    F = 1,
    AF = 2,
    B = 3,
    C = 4,
    BC = 5,
    D = 6,
    E = 7,
    DE = 8,
    H = 9,
    L = 10,
    HL = 11,
    AAlt = 12,
    FAlt = 13,
    AfAlt = 14,
    BAlt = 15,
    CAlt = 16,
    BcAlt = 17,
    DAlt = 18,
    EAlt = 19,
    DeAlt = 20,
    HAlt = 21,
    LAlt = 22,
    HlAlt = 23,
    I = 24,
    R = 25,
    IX = 26,
    IY = 27,
    SP = 28,
    PC = 29,
}

impl RegisterId {
    /// Number of addressable registers.
    pub const COUNT: usize = 30;

    /// All register ids in numeric order. Index `n` holds the register
    /// with id `n`.
    pub const ALL: [RegisterId; Self::COUNT] = [
        RegisterId::A,
        RegisterId::F,
        RegisterId::AF,
        RegisterId::B,
        RegisterId::C,
        RegisterId::BC,
        RegisterId::D,
        RegisterId::E,
        RegisterId::DE,
        RegisterId::H,
        RegisterId::L,
        RegisterId::HL,
        RegisterId::AAlt,
        RegisterId::FAlt,
        RegisterId::AfAlt,
        RegisterId::BAlt,
        RegisterId::CAlt,
        RegisterId::BcAlt,
        RegisterId::DAlt,
        RegisterId::EAlt,
        RegisterId::DeAlt,
        RegisterId::HAlt,
        RegisterId::LAlt,
        RegisterId::HlAlt,
        RegisterId::I,
        RegisterId::R,
        RegisterId::IX,
        RegisterId::IY,
        RegisterId::SP,
        RegisterId::PC,
    ];

    /// Looks up a register by its numeric id.
    ///
    /// Fails with [`Error::UnknownRegister`] for ids outside `0..=29`.
    pub fn from_id(id: u8) -> Result<Self, Error> {
        Self::ALL
            .get(id as usize)
            .copied()
            .ok_or_else(|| Error::UnknownRegister(id.to_string()))
    }

    /// Looks up a register by its canonical name.
    ///
    /// Matching is exact and case-sensitive; shadow registers carry the
    /// trailing `'` (e.g. `"HL'"`). Fails with [`Error::UnknownRegister`]
    /// for anything else.
    pub fn from_name(name: &str) -> Result<Self, Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|reg| reg.name() == name)
            .ok_or_else(|| Error::UnknownRegister(name.to_string()))
    }

    /// The register's external numeric id.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// The register's canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            RegisterId::A => "A",
            RegisterId::F => "F",
            RegisterId::AF => "AF",
            RegisterId::B => "B",
            RegisterId::C => "C",
            RegisterId::BC => "BC",
            RegisterId::D => "D",
            RegisterId::E => "E",
            RegisterId::DE => "DE",
            RegisterId::H => "H",
            RegisterId::L => "L",
            RegisterId::HL => "HL",
            RegisterId::AAlt => "A'",
            RegisterId::FAlt => "F'",
            RegisterId::AfAlt => "AF'",
            RegisterId::BAlt => "B'",
            RegisterId::CAlt => "C'",
            RegisterId::BcAlt => "BC'",
            RegisterId::DAlt => "D'",
            RegisterId::EAlt => "E'",
            RegisterId::DeAlt => "DE'",
            RegisterId::HAlt => "H'",
            RegisterId::LAlt => "L'",
            RegisterId::HlAlt => "HL'",
            RegisterId::I => "I",
            RegisterId::R => "R",
            RegisterId::IX => "IX",
            RegisterId::IY => "IY",
            RegisterId::SP => "SP",
            RegisterId::PC => "PC",
        }
    }

    /// Bit width of the register: 8 for pair halves and I/R, 16 for
    /// pairs, index registers, SP, and PC.
    pub fn width(self) -> u8 {
        match self {
            RegisterId::A
            | RegisterId::F
            | RegisterId::B
            | RegisterId::C
            | RegisterId::D
            | RegisterId::E
            | RegisterId::H
            | RegisterId::L
            | RegisterId::AAlt
            | RegisterId::FAlt
            | RegisterId::BAlt
            | RegisterId::CAlt
            | RegisterId::DAlt
            | RegisterId::EAlt
            | RegisterId::HAlt
            | RegisterId::LAlt
            | RegisterId::I
            | RegisterId::R => 8,
            _ => 16,
        }
    }
}

/// A 16-bit register pair stored as its two 8-bit halves.
///
/// The halves are the only stored representation. The 16-bit view is
/// computed as `(high << 8) | low` on every read, so a write to either
/// half is immediately reflected in the combined value.
///
/// # Examples
///
/// ```
/// use libz80::RegisterPair;
///
/// let mut bc = RegisterPair::default();
/// bc.set_value(0x1234);
/// assert_eq!(bc.high(), 0x12);
/// assert_eq!(bc.low(), 0x34);
///
/// bc.set_low(0xFF);
/// assert_eq!(bc.value(), 0x12FF);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterPair {
    high: u8,
    low: u8,
}

impl RegisterPair {
    /// Returns the high half.
    pub fn high(self) -> u8 {
        self.high
    }

    /// Returns the low half.
    pub fn low(self) -> u8 {
        self.low
    }

    /// Returns the combined 16-bit value.
    pub fn value(self) -> u16 {
        (u16::from(self.high) << 8) | u16::from(self.low)
    }

    /// Sets the high half.
    pub fn set_high(&mut self, value: u8) {
        self.high = value;
    }

    /// Sets the low half.
    pub fn set_low(&mut self, value: u8) {
        self.low = value;
    }

    /// Sets both halves from a combined 16-bit value.
    pub fn set_value(&mut self, value: u16) {
        self.high = (value >> 8) as u8;
        self.low = (value & 0xFF) as u8;
    }
}

/// The complete Z80 register set.
///
/// All registers are zeroed on creation. Access goes through
/// [`RegisterFile::get`] and [`RegisterFile::set`] keyed by
/// [`RegisterId`]; 8-bit registers narrow written values to their low
/// byte, 16-bit pair ids read and write the combined pair view.
#[derive(Debug, Clone, Default)]
pub struct RegisterFile {
    af: RegisterPair,
    bc: RegisterPair,
    de: RegisterPair,
    hl: RegisterPair,
    af_alt: RegisterPair,
    bc_alt: RegisterPair,
    de_alt: RegisterPair,
    hl_alt: RegisterPair,
    i: u8,
    r: u8,
    ix: u16,
    iy: u16,
    sp: u16,
    pc: u16,
}

impl RegisterFile {
    /// Creates a register file with every register zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a register.
    ///
    /// 8-bit registers are returned in the low byte of the result.
    pub fn get(&self, id: RegisterId) -> u16 {
        match id {
            RegisterId::A => u16::from(self.af.high()),
            RegisterId::F => u16::from(self.af.low()),
            RegisterId::AF => self.af.value(),
            RegisterId::B => u16::from(self.bc.high()),
            RegisterId::C => u16::from(self.bc.low()),
            RegisterId::BC => self.bc.value(),
            RegisterId::D => u16::from(self.de.high()),
            RegisterId::E => u16::from(self.de.low()),
            RegisterId::DE => self.de.value(),
            RegisterId::H => u16::from(self.hl.high()),
            RegisterId::L => u16::from(self.hl.low()),
            RegisterId::HL => self.hl.value(),
            RegisterId::AAlt => u16::from(self.af_alt.high()),
            RegisterId::FAlt => u16::from(self.af_alt.low()),
            RegisterId::AfAlt => self.af_alt.value(),
            RegisterId::BAlt => u16::from(self.bc_alt.high()),
            RegisterId::CAlt => u16::from(self.bc_alt.low()),
            RegisterId::BcAlt => self.bc_alt.value(),
            RegisterId::DAlt => u16::from(self.de_alt.high()),
            RegisterId::EAlt => u16::from(self.de_alt.low()),
            RegisterId::DeAlt => self.de_alt.value(),
            RegisterId::HAlt => u16::from(self.hl_alt.high()),
            RegisterId::LAlt => u16::from(self.hl_alt.low()),
            RegisterId::HlAlt => self.hl_alt.value(),
            RegisterId::I => u16::from(self.i),
            RegisterId::R => u16::from(self.r),
            RegisterId::IX => self.ix,
            RegisterId::IY => self.iy,
            RegisterId::SP => self.sp,
            RegisterId::PC => self.pc,
        }
    }

    /// Writes a register.
    ///
    /// Writes to 8-bit registers keep only the low byte of `value`.
    pub fn set(&mut self, id: RegisterId, value: u16) {
        let byte = (value & 0xFF) as u8;
        match id {
            RegisterId::A => self.af.set_high(byte),
            RegisterId::F => self.af.set_low(byte),
            RegisterId::AF => self.af.set_value(value),
            RegisterId::B => self.bc.set_high(byte),
            RegisterId::C => self.bc.set_low(byte),
            RegisterId::BC => self.bc.set_value(value),
            RegisterId::D => self.de.set_high(byte),
            RegisterId::E => self.de.set_low(byte),
            RegisterId::DE => self.de.set_value(value),
            RegisterId::H => self.hl.set_high(byte),
            RegisterId::L => self.hl.set_low(byte),
            RegisterId::HL => self.hl.set_value(value),
            RegisterId::AAlt => self.af_alt.set_high(byte),
            RegisterId::FAlt => self.af_alt.set_low(byte),
            RegisterId::AfAlt => self.af_alt.set_value(value),
            RegisterId::BAlt => self.bc_alt.set_high(byte),
            RegisterId::CAlt => self.bc_alt.set_low(byte),
            RegisterId::BcAlt => self.bc_alt.set_value(value),
            RegisterId::DAlt => self.de_alt.set_high(byte),
            RegisterId::EAlt => self.de_alt.set_low(byte),
            RegisterId::DeAlt => self.de_alt.set_value(value),
            RegisterId::HAlt => self.hl_alt.set_high(byte),
            RegisterId::LAlt => self.hl_alt.set_low(byte),
            RegisterId::HlAlt => self.hl_alt.set_value(value),
            RegisterId::I => self.i = byte,
            RegisterId::R => self.r = byte,
            RegisterId::IX => self.ix = value,
            RegisterId::IY => self.iy = value,
            RegisterId::SP => self.sp = value,
            RegisterId::PC => self.pc = value,
        }
    }

    /// Returns the program counter.
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// Sets the program counter.
    pub fn set_pc(&mut self, addr: u16) {
        self.pc = addr;
    }
}
