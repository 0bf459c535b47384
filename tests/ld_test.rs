//! Decode tests for the base-table load group: LD r,r', LD r,n,
//! LD r,(HL), LD (HL),r, LD (HL),n, and LD dd,nn, plus NOP and the
//! halt trap.

use libz80::{Machine, RegisterId, LOAD_ADDRESS};

fn machine_with(program: &[u8]) -> Machine {
    let mut machine = Machine::new();
    machine.load_program(program).unwrap();
    machine
}

fn get(machine: &Machine, reg: RegisterId) -> u16 {
    machine.register(reg.id()).unwrap()
}

fn set(machine: &mut Machine, reg: RegisterId, value: u16) {
    machine.set_register(reg.id(), value).unwrap();
}

#[test]
fn test_nop_advances_pc_by_one_and_nothing_else() {
    let mut machine = machine_with(&[0x00]);
    set(&mut machine, RegisterId::AF, 0x55AA);

    assert_eq!(machine.step().unwrap(), None);

    assert_eq!(machine.current_instruction_address(), LOAD_ADDRESS + 1);
    assert_eq!(get(&machine, RegisterId::AF), 0x55AA);
    assert_eq!(machine.read_byte(0x0000).unwrap(), 0x00);
}

#[test]
fn test_ld_register_to_register() {
    // LD B,A (0x47)
    let mut machine = machine_with(&[0x47]);
    set(&mut machine, RegisterId::A, 0x2A);

    machine.step().unwrap();

    assert_eq!(get(&machine, RegisterId::B), 0x2A);
    assert_eq!(get(&machine, RegisterId::A), 0x2A); // source unchanged
    assert_eq!(machine.current_instruction_address(), LOAD_ADDRESS + 1);
}

#[test]
fn test_ld_covers_every_register_pairing() {
    // LD d,s for all 7x7 register operand pairings: 01 ddd sss
    let regs = [
        RegisterId::B,
        RegisterId::C,
        RegisterId::D,
        RegisterId::E,
        RegisterId::H,
        RegisterId::L,
        RegisterId::A,
    ];
    let codes = [0u8, 1, 2, 3, 4, 5, 7];

    for (dst, dcode) in regs.iter().zip(codes) {
        for (src, scode) in regs.iter().zip(codes) {
            let opcode = 0x40 | (dcode << 3) | scode;
            let mut machine = machine_with(&[opcode]);
            set(&mut machine, *src, 0x99);

            machine.step().unwrap();

            assert_eq!(
                get(&machine, *dst),
                0x99,
                "LD {},{} (0x{:02X})",
                dst.name(),
                src.name(),
                opcode
            );
        }
    }
}

#[test]
fn test_ld_register_immediate() {
    // LD E,0x7B (0x1E 0x7B)
    let mut machine = machine_with(&[0x1E, 0x7B]);

    machine.step().unwrap();

    assert_eq!(get(&machine, RegisterId::E), 0x7B);
    assert_eq!(machine.current_instruction_address(), LOAD_ADDRESS + 2);
}

#[test]
fn test_ld_register_from_hl_indirect() {
    // LD C,(HL) (0x4E)
    let mut machine = machine_with(&[0x4E]);
    machine.write_byte(0x4321, 0x5C).unwrap();
    set(&mut machine, RegisterId::HL, 0x4321);

    machine.step().unwrap();

    assert_eq!(get(&machine, RegisterId::C), 0x5C);
}

#[test]
fn test_ld_hl_indirect_from_register() {
    // LD (HL),D (0x72)
    let mut machine = machine_with(&[0x72]);
    set(&mut machine, RegisterId::D, 0xE7);
    set(&mut machine, RegisterId::HL, 0x2000);

    machine.step().unwrap();

    assert_eq!(machine.read_byte(0x2000).unwrap(), 0xE7);
}

#[test]
fn test_ld_hl_indirect_immediate() {
    // LD (HL),0x42 (0x36 0x42)
    let mut machine = machine_with(&[0x36, 0x42]);
    set(&mut machine, RegisterId::HL, 0x3000);

    machine.step().unwrap();

    assert_eq!(machine.read_byte(0x3000).unwrap(), 0x42);
    assert_eq!(machine.current_instruction_address(), LOAD_ADDRESS + 2);
}

#[test]
fn test_ld_pair_immediate_is_little_endian() {
    // LD BC,0x1234 (0x01 0x34 0x12): low byte first
    let mut machine = machine_with(&[0x01, 0x34, 0x12]);

    machine.step().unwrap();

    assert_eq!(get(&machine, RegisterId::BC), 0x1234);
    assert_eq!(machine.current_instruction_address(), LOAD_ADDRESS + 3);
}

#[test]
fn test_ld_pair_immediate_all_pairs() {
    let cases = [
        (0x01u8, RegisterId::BC),
        (0x11, RegisterId::DE),
        (0x21, RegisterId::HL),
        (0x31, RegisterId::SP),
    ];

    for (opcode, pair) in cases {
        let mut machine = machine_with(&[opcode, 0xEF, 0xBE]);
        machine.step().unwrap();
        assert_eq!(get(&machine, pair), 0xBEEF, "opcode 0x{:02X}", opcode);
    }
}

#[test]
fn test_loads_leave_flags_alone() {
    // LD A,0x00 must not touch F even though the value is zero
    let mut machine = machine_with(&[0x3E, 0x00]);
    set(&mut machine, RegisterId::F, 0xD7);

    machine.step().unwrap();

    assert_eq!(get(&machine, RegisterId::A), 0x00);
    assert_eq!(get(&machine, RegisterId::F), 0xD7);
}

#[test]
fn test_halt_traps_after_consuming_one_byte() {
    let mut machine = machine_with(&[0x76]);

    let call = machine.step().unwrap();

    assert!(call.is_some());
    assert_eq!(machine.current_instruction_address(), LOAD_ADDRESS + 1);
}

#[test]
fn test_sequential_program() {
    // LD HL,0x9000 ; LD (HL),0x11 ; LD A,(HL) ; LD B,A
    let mut machine = machine_with(&[0x21, 0x00, 0x90, 0x36, 0x11, 0x7E, 0x47]);

    for _ in 0..4 {
        assert_eq!(machine.step().unwrap(), None);
    }

    assert_eq!(get(&machine, RegisterId::B), 0x11);
    assert_eq!(machine.read_byte(0x9000).unwrap(), 0x11);
}
