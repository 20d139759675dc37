// build.rs
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::{env, fs, path::Path};

#[derive(Deserialize)]
struct FullJson {
    unprefixed: BTreeMap<String, RawOpcode>,
    cbprefixed: BTreeMap<String, RawOpcode>,
}

#[derive(Deserialize)]
struct RawOpcode {
    mnemonic: String,
    bytes: u8,
    cycles: Vec<u8>,
    operands: Vec<RawOperand>,
    flags: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct RawOperand {
    name: String,
    decrement: Option<bool>,
    increment: Option<bool>,
    immediate: bool,
}

fn map_target(operand: &RawOperand, op_code: u8, prefixed: bool) -> String {
    // Bit indices for BIT/RES/SET
    if let Ok(bit) = operand.name.parse::<u8>() {
        return format!("Target::Bit({})", bit);
    }

    // RST vectors are written as $00, $08, ...
    if let Some(hex) = operand.name.strip_prefix('$') {
        let val = u8::from_str_radix(hex, 16)
            .unwrap_or_else(|_| panic!("Bad RST vector '{}'", operand.name));
        return format!("Target::Vector(0x{:02X})", val);
    }

    let name = operand.name.as_str();
    // Only these opcodes use NZ/Z/NC/C as a condition, everywhere else "C" is the register.
    let is_branch_opcode = !prefixed
        && matches!(
            op_code,
            0x20 | 0x28 | 0x30 | 0x38 // JR cc
            | 0xC0 | 0xC8 | 0xD0 | 0xD8 // RET cc
            | 0xC2 | 0xCA | 0xD2 | 0xDA // JP cc
            | 0xC4 | 0xCC | 0xD4 | 0xDC // CALL cc
        );

    if is_branch_opcode {
        match name {
            "NZ" => return "Target::Condition(Condition::NotZero)".into(),
            "Z" => return "Target::Condition(Condition::Zero)".into(),
            "NC" => return "Target::Condition(Condition::NotCarry)".into(),
            "C" => return "Target::Condition(Condition::Carry)".into(),
            _ => {}
        }
    }

    match (
        name,
        operand.immediate,
        operand.increment.unwrap_or(false),
        operand.decrement.unwrap_or(false),
    ) {
        ("A", true, _, _) => "Target::Register8(Reg8::A)".into(),
        ("B", true, _, _) => "Target::Register8(Reg8::B)".into(),
        ("C", true, _, _) => "Target::Register8(Reg8::C)".into(),
        ("D", true, _, _) => "Target::Register8(Reg8::D)".into(),
        ("E", true, _, _) => "Target::Register8(Reg8::E)".into(),
        ("H", true, _, _) => "Target::Register8(Reg8::H)".into(),
        ("L", true, _, _) => "Target::Register8(Reg8::L)".into(),

        // [HL+] / [HL-]
        ("HL", false, true, false) => "Target::AddrRegister16Increment(Reg16::HL)".into(),
        ("HL", false, false, true) => "Target::AddrRegister16Decrement(Reg16::HL)".into(),

        // Indirect addressing, [HL], [BC], [DE] and [C] for LDH
        ("HL", false, false, false) => "Target::AddrRegister16(Reg16::HL)".into(),
        ("BC", false, _, _) => "Target::AddrRegister16(Reg16::BC)".into(),
        ("DE", false, _, _) => "Target::AddrRegister16(Reg16::DE)".into(),
        ("C", false, _, _) => "Target::AddrRegister8(Reg8::C)".into(),

        ("AF", true, _, _) => "Target::Register16(Reg16::AF)".into(),
        ("BC", true, _, _) => "Target::Register16(Reg16::BC)".into(),
        ("DE", true, _, _) => "Target::Register16(Reg16::DE)".into(),
        ("HL", true, _, _) => "Target::Register16(Reg16::HL)".into(),

        // SP+e8 in LD HL, SP+e8
        ("SP", true, true, _) => "Target::StackPointerOffset".into(),
        ("SP", _, _, _) => "Target::Register16(Reg16::SP)".into(),

        ("n8", _, _, _) => "Target::Immediate8".into(),
        ("n16", _, _, _) => "Target::Immediate16".into(),
        ("a16", true, _, _) => "Target::Immediate16".into(),
        ("a16", false, _, _) => "Target::AddrImmediate16".into(),
        ("a8", false, _, _) => "Target::AddrImmediate8".into(),
        ("e8", _, _, _) => "Target::Relative8".into(),

        _ => panic!(
            "Unknown target combo for opcode 0x{:02X}: name={}, imm={}, inc={:?}, dec={:?}",
            op_code, operand.name, operand.immediate, operand.increment, operand.decrement
        ),
    }
}

fn produce_mnemonics_enum(mnemonics: &BTreeSet<String>) -> String {
    let mut code = String::new();
    code.push_str("\n#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]\n#[allow(non_camel_case_types)]\npub enum Mnemonic {\n");
    for item in mnemonics {
        code.push_str(&format!("    {item},\n"));
    }
    code.push_str("}\n");
    code
}

fn produce_dispatcher_fn(mnemonics: &BTreeSet<String>) -> String {
    let mut code = String::new();
    code.push_str("\nimpl Cpu {\n");
    code.push_str(
        "    pub fn dispatch(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult {\n",
    );
    code.push_str("        match instr.info.mnemonic {\n");

    for mnemonic in mnemonics {
        code.push_str(&format!(
            "            Mnemonic::{} => self.{}(instr, bus),\n",
            mnemonic,
            mnemonic.to_lowercase(),
        ));
    }
    code.push_str("        }\n    }\n}\n");
    code
}

fn produce_mnemonics_coverage_trait(mnemonics: &BTreeSet<String>) -> String {
    let mut code = String::new();
    code.push_str("\npub trait InstructionSet {\n");

    for mnemonic in mnemonics {
        code.push_str(&format!(
            "    fn {}(&mut self, instr: Instruction, bus: &mut impl Memory) -> InstructionResult;\n",
            mnemonic.to_lowercase()
        ));
    }
    code.push_str("}\n");
    code
}

fn map_flag_action(mnemonic: &str, flag: &str, action: &str) -> String {
    match action {
        // CCF is the only instruction that flips a flag instead of computing it.
        "C" if mnemonic == "CCF" => "FlagAction::Invert".to_string(),
        a if a == flag => "FlagAction::Calculate".to_string(),
        "0" => "FlagAction::Reset".to_string(),
        "1" => "FlagAction::Set".to_string(),
        "-" => "FlagAction::None".to_string(),
        _ => panic!("Unknown flag action '{}' for {} flag {}", action, mnemonic, flag),
    }
}

fn produce_table(
    name: &str,
    table: &BTreeMap<String, RawOpcode>,
    prefixed: bool,
    mnemonics: &mut BTreeSet<String>,
) -> String {
    let mut code = String::new();
    code.push_str(&format!(
        "pub const {}: [Option<OpcodeInfo>; 256] = [\n",
        name
    ));
    for i in 0..=255u8 {
        let key = format!("0x{:02X}", i);
        let Some(op) = table.get(&key) else {
            code.push_str("    None,\n");
            continue;
        };
        if op.mnemonic == "PREFIX" || op.mnemonic.starts_with("ILLEGAL") {
            code.push_str("    None,\n");
            continue;
        }
        if op.cycles.is_empty() || op.cycles.len() > 2 {
            panic!("{} 0x{:02X} must list one or two cycle counts", name, i);
        }

        let mut flag_str = String::new();
        for flag in ["Z", "N", "H", "C"] {
            let action = op
                .flags
                .get(flag)
                .unwrap_or_else(|| panic!("{} 0x{:02X} is missing flag {}", name, i, flag));
            flag_str.push_str(&format!(
                "{}: {}, ",
                flag.to_ascii_lowercase(),
                map_flag_action(&op.mnemonic, flag, action)
            ));
        }

        let mut ops_str = String::new();
        for o in &op.operands {
            ops_str.push_str(&format!(
                "({}, {}), ",
                map_target(o, i, prefixed),
                o.immediate
            ));
        }

        mnemonics.insert(op.mnemonic.clone());
        code.push_str(&format!(
            "    Some(OpcodeInfo {{ mnemonic: Mnemonic::{}, bytes: {}, cycles: &{:?}, operands: &[{}], prefixed: {}, flags: FlagSpec {{ {}}} }}),\n",
            op.mnemonic, op.bytes, op.cycles, ops_str, prefixed, flag_str
        ));
    }
    code.push_str("];\n\n");
    code
}

fn main() {
    let json_str =
        fs::read_to_string("src/opcodes/data/opcodes.json").expect("Missing opcodes.json");
    let data: FullJson = serde_json::from_str(&json_str).expect("JSON parse error");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let dest_path = Path::new(&out_dir).join("opcodes_generated.rs");
    let mut code = String::new();
    let mut unique_mnemonics = BTreeSet::new();

    code.push_str(&produce_table(
        "OPCODES",
        &data.unprefixed,
        false,
        &mut unique_mnemonics,
    ));
    code.push_str(&produce_table(
        "CB_OPCODES",
        &data.cbprefixed,
        true,
        &mut unique_mnemonics,
    ));

    code.push_str(&produce_mnemonics_enum(&unique_mnemonics));
    code.push_str(&produce_mnemonics_coverage_trait(&unique_mnemonics));
    code.push_str(&produce_dispatcher_fn(&unique_mnemonics));

    fs::write(&dest_path, code).expect("Failed to write generated opcodes");

    println!("cargo:rerun-if-changed=src/opcodes/data/opcodes.json");
    println!("cargo:rerun-if-changed=build.rs");
}
