//! Property-based tests for the machine invariants: register round
//! trips, pair decomposition, memory round trips, immediate byte order,
//! and signed displacement addressing across all possible values.

use libz80::{Machine, OperandToken, RegisterId, ResolvedToken, LOAD_ADDRESS};
use proptest::prelude::*;

fn pair_ids() -> Vec<(RegisterId, RegisterId, RegisterId)> {
    vec![
        (RegisterId::AF, RegisterId::A, RegisterId::F),
        (RegisterId::BC, RegisterId::B, RegisterId::C),
        (RegisterId::DE, RegisterId::D, RegisterId::E),
        (RegisterId::HL, RegisterId::H, RegisterId::L),
        (RegisterId::AfAlt, RegisterId::AAlt, RegisterId::FAlt),
        (RegisterId::BcAlt, RegisterId::BAlt, RegisterId::CAlt),
        (RegisterId::DeAlt, RegisterId::DAlt, RegisterId::EAlt),
        (RegisterId::HlAlt, RegisterId::HAlt, RegisterId::LAlt),
    ]
}

proptest! {
    #[test]
    fn prop_register_set_get_round_trips(id in 0u8..30, value: u16) {
        let mut machine = Machine::new();
        machine.set_register(id, value).unwrap();

        let reg = RegisterId::from_id(id).unwrap();
        let expected = if reg.width() == 8 { value & 0xFF } else { value };
        prop_assert_eq!(machine.register(id).unwrap(), expected);
    }

    #[test]
    fn prop_pair_view_matches_halves(value: u16) {
        let mut machine = Machine::new();
        for (pair, high, low) in pair_ids() {
            machine.set_register(pair.id(), value).unwrap();
            prop_assert_eq!(machine.register(high.id()).unwrap(), value >> 8);
            prop_assert_eq!(machine.register(low.id()).unwrap(), value & 0xFF);
        }
    }

    #[test]
    fn prop_halves_compose_into_pair(high: u8, low: u8) {
        let mut machine = Machine::new();
        for (pair, high_id, low_id) in pair_ids() {
            machine.set_register(high_id.id(), u16::from(high)).unwrap();
            machine.set_register(low_id.id(), u16::from(low)).unwrap();
            prop_assert_eq!(
                machine.register(pair.id()).unwrap(),
                (u16::from(high) << 8) | u16::from(low)
            );
        }
    }

    #[test]
    fn prop_memory_byte_round_trips(addr in 0u32..=0xFFFF, value: u8) {
        let mut machine = Machine::new();
        machine.write_byte(addr, value).unwrap();
        prop_assert_eq!(machine.read_byte(addr).unwrap(), value);
    }

    #[test]
    fn prop_memory_rejects_out_of_range(addr in 0x10000u32..) {
        let mut machine = Machine::new();
        prop_assert!(machine.read_byte(addr).is_err());
        prop_assert!(machine.write_byte(addr, 0).is_err());
    }

    #[test]
    fn prop_pair_immediate_load_round_trips(value: u16) {
        // LD BC,nn through the encoder, then decoded
        let mut machine = Machine::new();
        let tokens = [ResolvedToken {
            mnemonic: "LD".to_string(),
            operands: vec![
                OperandToken::Register("BC".to_string()),
                OperandToken::Immediate(value),
            ],
            line: 1,
        }];

        let (image, _) = machine.assemble(&tokens).unwrap();
        machine.load_program(&image).unwrap();
        machine.step().unwrap();

        prop_assert_eq!(machine.register(RegisterId::BC.id()).unwrap(), value);
        prop_assert_eq!(machine.current_instruction_address(), LOAD_ADDRESS + 3);
    }

    #[test]
    fn prop_displaced_load_sign_extends(displacement: i8) {
        // LD A,(IX+d) with IX centered so the effective address stays in
        // range for every displacement
        let mut machine = Machine::new();
        machine.load_program(&[0xDD, 0x7E, displacement as u8]).unwrap();

        let ix = 0x4000u16;
        machine.set_register(RegisterId::IX.id(), ix).unwrap();
        let effective = ix.wrapping_add(displacement as u16);
        machine.write_byte(u32::from(effective), 0x5E).unwrap();

        machine.step().unwrap();

        prop_assert_eq!(machine.register(RegisterId::A.id()).unwrap(), 0x5E);
    }

    #[test]
    fn prop_immediate_byte_load_round_trips(value: u8) {
        let mut machine = Machine::new();
        let tokens = [ResolvedToken {
            mnemonic: "LD".to_string(),
            operands: vec![
                OperandToken::Register("D".to_string()),
                OperandToken::Immediate(u16::from(value)),
            ],
            line: 1,
        }];

        let (image, _) = machine.assemble(&tokens).unwrap();
        machine.load_program(&image).unwrap();
        machine.step().unwrap();

        prop_assert_eq!(machine.register(RegisterId::D.id()).unwrap(), u16::from(value));
    }
}
