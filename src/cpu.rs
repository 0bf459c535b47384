//! # Machine State and Execution
//!
//! This module contains the [`Machine`] struct (one Z80 register file
//! plus one flat 64 KiB memory) and the fetch-decode-execute engine.
//!
//! ## Execution Model
//!
//! The host drives execution by calling [`Machine::step`] repeatedly.
//! Each call performs exactly one instruction:
//!
//! 1. Fetch the byte at PC and advance PC.
//! 2. If the byte is one of the three prefix escapes (`0xDD`, `0xED`,
//!    `0xFD`), fetch and decode the next byte against that prefix's
//!    private subtable. Prefix dispatch is one synchronous extra decode
//!    level inside the same step, never a mode flag that survives the
//!    call, so a malformed stream cannot leak state into the next step.
//! 3. Otherwise classify the byte against the base table by bit pattern
//!    and apply its effect to the registers and/or memory.
//!
//! The decoder holds no state of its own between steps; everything lives
//! in the register file (principally PC).
//!
//! ## Non-Atomic Steps
//!
//! Steps are not transactions. When classification fails partway through
//! (an opcode outside the implemented subset), PC has already advanced
//! past every byte fetched so far and stays there. This mirrors the
//! reference behavior and is pinned by tests rather than silently
//! changed.
//!
//! Load-class instructions never modify the flag register.

use log::warn;

use crate::arch::{architecture_info, ArchitectureInfo};
use crate::assembler::{encode_program, DebuggerToken, ResolvedToken};
use crate::memory::Memory;
use crate::opcodes::{PairSelect, RegSelect, PREFIX_EXTENDED, PREFIX_IX, PREFIX_IY};
use crate::registers::{RegisterFile, RegisterId};
use crate::Error;

/// Address where program images are placed, and where PC points after
/// [`Machine::load_program`]. The two always agree: the first byte
/// fetched is the first byte of the image.
pub const LOAD_ADDRESS: u16 = 0x8000;

/// System-call number carried by the halt trap.
pub const SYS_HALT: u16 = 0;

/// A trap/call descriptor returned from a decode step.
///
/// This is the single reserved hook for a system-call convention: the
/// halt-class opcode (`0x76`) yields one, and a host may interpret the
/// number and arguments however its convention dictates. The covered
/// instruction subset raises only [`Call::halt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Call {
    /// System-call number.
    pub number: u16,

    /// First argument word.
    pub arg1: u16,

    /// Second argument word.
    pub arg2: u16,
}

impl Call {
    /// The descriptor produced by the HALT opcode.
    pub fn halt() -> Self {
        Self {
            number: SYS_HALT,
            arg1: 0,
            arg2: 0,
        }
    }
}

/// A Z80 machine instance: register file plus 64 KiB memory.
///
/// Instances are fully independent, with no shared or global state, and
/// provide no internal synchronization; a host wanting parallelism gives
/// each thread its own instance.
///
/// # Examples
///
/// ```
/// use libz80::{Machine, RegisterId, LOAD_ADDRESS};
///
/// let mut machine = Machine::new();
///
/// // LD BC,0x1234 followed by HALT
/// machine.load_program(&[0x01, 0x34, 0x12, 0x76]).unwrap();
/// assert_eq!(machine.current_instruction_address(), LOAD_ADDRESS);
///
/// assert_eq!(machine.step().unwrap(), None);
/// assert_eq!(machine.register(RegisterId::BC.id()).unwrap(), 0x1234);
///
/// // The halt opcode raises the reserved trap
/// assert!(machine.step().unwrap().is_some());
/// ```
pub struct Machine {
    regs: RegisterFile,
    memory: Memory,
}

impl Machine {
    /// Creates a machine with zeroed registers and memory.
    pub fn new() -> Self {
        Self {
            regs: RegisterFile::new(),
            memory: Memory::new(),
        }
    }

    /// Copies a raw program image into memory at [`LOAD_ADDRESS`] and
    /// resets PC to the same address.
    ///
    /// The image has no header; it is machine code placed verbatim.
    /// Fails with [`Error::AddressOutOfRange`] if the image does not fit
    /// above the load address, in which case memory is unchanged.
    pub fn load_program(&mut self, image: &[u8]) -> Result<(), Error> {
        self.memory.write_chunk(u32::from(LOAD_ADDRESS), image)?;
        self.regs.set_pc(LOAD_ADDRESS);
        Ok(())
    }

    /// Executes one instruction.
    ///
    /// Returns `Ok(None)` for ordinary instructions and `Ok(Some(call))`
    /// when the instruction raises a trap (HALT). Opcodes outside the
    /// implemented subset fail with [`Error::UnimplementedOpcode`] or
    /// [`Error::UnimplementedPrefixedOpcode`]; PC is already past the
    /// fetched bytes when that happens.
    pub fn step(&mut self) -> Result<Option<Call>, Error> {
        let opcode = self.fetch_byte();
        match opcode {
            PREFIX_IX => self.step_indexed(RegisterId::IX),
            PREFIX_IY => self.step_indexed(RegisterId::IY),
            PREFIX_EXTENDED => self.step_extended(),
            _ => self.step_base(opcode),
        }
    }

    // ========== Host register/memory contract ==========

    /// Reads a register by numeric id (`0..=29`).
    ///
    /// 8-bit registers are returned in the low byte. Fails with
    /// [`Error::UnknownRegister`] for ids outside the table.
    pub fn register(&self, id: u8) -> Result<u16, Error> {
        Ok(self.regs.get(RegisterId::from_id(id)?))
    }

    /// Writes a register by numeric id (`0..=29`).
    ///
    /// Writes to 8-bit registers keep only the low byte of `value`.
    pub fn set_register(&mut self, id: u8, value: u16) -> Result<(), Error> {
        let reg = RegisterId::from_id(id)?;
        self.regs.set(reg, value);
        Ok(())
    }

    /// Resolves a canonical register name (`"A"`, `"HL'"`, `"IX"`, …) to
    /// its numeric id.
    pub fn register_number(&self, name: &str) -> Result<u8, Error> {
        Ok(RegisterId::from_name(name)?.id())
    }

    /// Reads the byte at `addr`.
    pub fn read_byte(&self, addr: u32) -> Result<u8, Error> {
        self.memory.read_byte(addr)
    }

    /// Writes one byte at `addr`.
    pub fn write_byte(&mut self, addr: u32, value: u8) -> Result<(), Error> {
        self.memory.write_byte(addr, value)
    }

    /// Reads `len` bytes starting at `addr`.
    pub fn read_chunk(&self, addr: u32, len: u32) -> Result<Vec<u8>, Error> {
        self.memory.read_chunk(addr, len)
    }

    /// Writes a chunk of bytes starting at `addr`.
    pub fn write_chunk(&mut self, addr: u32, bytes: &[u8]) -> Result<(), Error> {
        self.memory.write_chunk(addr, bytes)
    }

    /// Encodes an externally tokenized and resolved instruction stream
    /// into a program image, with one debugger token per instruction
    /// mapping the emitted address back to its source line.
    ///
    /// The image is laid out for [`LOAD_ADDRESS`], ready for
    /// [`Machine::load_program`].
    pub fn assemble(
        &self,
        tokens: &[ResolvedToken],
    ) -> Result<(Vec<u8>, Vec<DebuggerToken>), Error> {
        encode_program(tokens, LOAD_ADDRESS)
    }

    /// The address of the next instruction to execute (PC).
    pub fn current_instruction_address(&self) -> u16 {
        self.regs.pc()
    }

    /// Static description of this architecture for the host: name, word
    /// width, and the ordered register-name list.
    pub fn architecture_info(&self) -> ArchitectureInfo {
        architecture_info()
    }

    /// Borrows the register file.
    pub fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    /// Mutably borrows the register file.
    pub fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.regs
    }

    /// Borrows the memory.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Mutably borrows the memory.
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    // ========== Fetch helpers ==========

    fn fetch_byte(&mut self) -> u8 {
        let pc = self.regs.pc();
        let byte = self.memory.fetch(pc);
        self.regs.set_pc(pc.wrapping_add(1));
        byte
    }

    /// Fetches a 16-bit immediate, low byte first.
    fn fetch_word(&mut self) -> u16 {
        let lo = u16::from(self.fetch_byte());
        let hi = u16::from(self.fetch_byte());
        (hi << 8) | lo
    }

    /// Fetches the displacement byte and forms the effective address for
    /// an indexed operand. The displacement is signed: `0xFF` reaches one
    /// byte below the index register, not 255 above it.
    fn fetch_indexed_address(&mut self, index: RegisterId) -> u16 {
        let displacement = self.fetch_byte() as i8;
        self.regs.get(index).wrapping_add(displacement as u16)
    }

    // ========== Base table ==========

    fn step_base(&mut self, opcode: u8) -> Result<Option<Call>, Error> {
        // 0x00: NOP
        if opcode == 0x00 {
            return Ok(None);
        }

        // 0x76 sits in the hole of the LD r,r' pattern (both operand
        // fields indirect) and is HALT, the trap point.
        if opcode == 0x76 {
            return Ok(Some(Call::halt()));
        }

        // 01 ddd sss: LD r,r' / LD r,(HL) / LD (HL),r
        if opcode & 0xC0 == 0x40 {
            let dst = RegSelect::from_code(opcode >> 3);
            let src = RegSelect::from_code(opcode);

            let value = match src.register() {
                Some(reg) => self.regs.get(reg) as u8,
                None => self.memory.fetch(self.regs.get(RegisterId::HL)),
            };
            match dst.register() {
                Some(reg) => self.regs.set(reg, u16::from(value)),
                None => self.memory.store(self.regs.get(RegisterId::HL), value),
            }
            return Ok(None);
        }

        // 00 ddd 110: LD r,n / LD (HL),n
        if opcode & 0xC7 == 0x06 {
            let dst = RegSelect::from_code(opcode >> 3);
            let value = self.fetch_byte();

            match dst.register() {
                Some(reg) => self.regs.set(reg, u16::from(value)),
                None => self.memory.store(self.regs.get(RegisterId::HL), value),
            }
            return Ok(None);
        }

        // 00 dd 0001: LD dd,nn
        if opcode & 0xCF == 0x01 {
            let pair = PairSelect::from_code(opcode >> 4);
            let value = self.fetch_word();
            self.regs.set(pair.register(), value);
            return Ok(None);
        }

        warn!("opcode 0x{:02X} is outside the implemented subset", opcode);
        Err(Error::UnimplementedOpcode(opcode))
    }

    // ========== 0xDD / 0xFD subtable ==========

    /// Decodes the byte after an index prefix. `index` is IX for `0xDD`
    /// and IY for `0xFD`. The subtable is one level deep: chained
    /// prefixes are not part of the covered subset.
    fn step_indexed(&mut self, index: RegisterId) -> Result<Option<Call>, Error> {
        let opcode = self.fetch_byte();

        // DD 21: LD IX,nn (FD 21: LD IY,nn)
        if opcode == 0x21 {
            let value = self.fetch_word();
            self.regs.set(index, value);
            return Ok(None);
        }

        // DD 36 d n: LD (IX+d),n, displacement before the immediate
        if opcode == 0x36 {
            let addr = self.fetch_indexed_address(index);
            let value = self.fetch_byte();
            self.memory.store(addr, value);
            return Ok(None);
        }

        // 01 ddd sss with exactly one indirect operand becomes the
        // displaced form: LD r,(IX+d) / LD (IX+d),r
        if opcode & 0xC0 == 0x40 && opcode != 0x76 {
            let dst = RegSelect::from_code(opcode >> 3);
            let src = RegSelect::from_code(opcode);

            match (dst.register(), src.register()) {
                (Some(reg), None) => {
                    let addr = self.fetch_indexed_address(index);
                    let value = self.memory.fetch(addr);
                    self.regs.set(reg, u16::from(value));
                    return Ok(None);
                }
                (None, Some(reg)) => {
                    let addr = self.fetch_indexed_address(index);
                    let value = self.regs.get(reg) as u8;
                    self.memory.store(addr, value);
                    return Ok(None);
                }
                // Register-to-register forms under a prefix address the
                // index-register halves; not part of the covered subset.
                _ => {}
            }
        }

        let prefix = if index == RegisterId::IX {
            PREFIX_IX
        } else {
            PREFIX_IY
        };
        warn!(
            "opcode 0x{:02X} 0x{:02X} is outside the implemented subset",
            prefix, opcode
        );
        Err(Error::UnimplementedPrefixedOpcode { prefix, opcode })
    }

    // ========== 0xED subtable ==========

    fn step_extended(&mut self) -> Result<Option<Call>, Error> {
        let opcode = self.fetch_byte();
        match opcode {
            // LD I,A / LD R,A / LD A,I / LD A,R. Flags are untouched
            // here like every other load.
            0x47 => {
                let a = self.regs.get(RegisterId::A);
                self.regs.set(RegisterId::I, a);
                Ok(None)
            }
            0x4F => {
                let a = self.regs.get(RegisterId::A);
                self.regs.set(RegisterId::R, a);
                Ok(None)
            }
            0x57 => {
                let i = self.regs.get(RegisterId::I);
                self.regs.set(RegisterId::A, i);
                Ok(None)
            }
            0x5F => {
                let r = self.regs.get(RegisterId::R);
                self.regs.set(RegisterId::A, r);
                Ok(None)
            }
            // LDI: one block-load step
            0xA0 => {
                self.block_load_step();
                Ok(None)
            }
            // LDIR: as LDI, but while BC is non-zero the PC rewinds over
            // the two instruction bytes so the next step repeats it.
            0xB0 => {
                self.block_load_step();
                if self.regs.get(RegisterId::BC) != 0 {
                    let pc = self.regs.pc();
                    self.regs.set_pc(pc.wrapping_sub(2));
                }
                Ok(None)
            }
            _ => {
                warn!(
                    "opcode 0x{:02X} 0x{:02X} is outside the implemented subset",
                    PREFIX_EXTENDED, opcode
                );
                Err(Error::UnimplementedPrefixedOpcode {
                    prefix: PREFIX_EXTENDED,
                    opcode,
                })
            }
        }
    }

    /// (DE) ← (HL), then HL += 1, DE += 1, BC -= 1.
    fn block_load_step(&mut self) {
        let hl = self.regs.get(RegisterId::HL);
        let de = self.regs.get(RegisterId::DE);
        let value = self.memory.fetch(hl);
        self.memory.store(de, value);
        self.regs.set(RegisterId::HL, hl.wrapping_add(1));
        self.regs.set(RegisterId::DE, de.wrapping_add(1));
        let bc = self.regs.get(RegisterId::BC);
        self.regs.set(RegisterId::BC, bc.wrapping_sub(1));
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
