use crate::bytecode::compile::Bytecode;
use crate::bytecode::op::{read_operands, Definition, Op};
use crate::lang::value::Value;

/// Renders an instruction stream as text, one instruction per line:
/// a 4-digit decimal offset, the opcode name, then the operands.
pub fn disassemble(ins: &[u8]) -> String {
    let mut out = String::new();

    let mut offset = 0;
    while offset < ins.len() {
        let Some(op) = Op::from_byte(ins[offset]) else {
            out.push_str(&format!(
                "{:04} ERROR: undefined opcode {}\n",
                offset, ins[offset]
            ));
            offset += 1;
            continue;
        };

        let def = op.definition();
        let (operands, read) = read_operands(def, &ins[offset + 1..]);

        out.push_str(&format!("{:04} {}\n", offset, fmt_instruction(def, &operands)));

        offset += 1 + read;
    }

    out
}

fn fmt_instruction(def: &Definition, operands: &[usize]) -> String {
    if operands.len() != def.operand_widths.len() {
        return format!(
            "ERROR: operand len {} does not match defined {}",
            operands.len(),
            def.operand_widths.len()
        );
    }

    let mut line = def.name.to_string();
    for operand in operands {
        line.push(' ');
        line.push_str(&operand.to_string());
    }
    line
}

// =============================================================================
// Whole-program dump (for the --bytecode flag)
// =============================================================================

/// Renders the main instruction stream plus the constant pool, expanding
/// compiled function constants into nested disassembly.
pub fn dump_bytecode(bytecode: &Bytecode) -> String {
    let mut out = String::new();

    out.push_str("════════════════════════════════════════\n");
    out.push_str(" main\n");
    out.push_str("════════════════════════════════════════\n");
    out.push_str(&disassemble(&bytecode.instructions));

    if !bytecode.constants.is_empty() {
        out.push_str("\nconstants:\n");
        for (i, constant) in bytecode.constants.iter().enumerate() {
            match constant {
                Value::Function(func) => {
                    out.push_str(&format!(
                        "  {:04} fn ({} params, {} locals)\n",
                        i, func.num_parameters, func.num_locals
                    ));
                    for line in disassemble(&func.instructions).lines() {
                        out.push_str(&format!("       {}\n", line));
                    }
                }
                other => {
                    out.push_str(&format!("  {:04} {} {}\n", i, other.type_name(), other));
                }
            }
        }
    }

    out
}
