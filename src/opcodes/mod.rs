mod condition;
mod flag_action;
mod flagspec;
mod instruction;
mod instruction_result;
mod opcode_info;
mod operand_value;
mod reg16;
mod reg8;
mod target;

pub use condition::Condition;
pub use flag_action::FlagAction;
pub use flagspec::FlagSpec;
pub use instruction::*; // Generated code is included here.
pub use instruction_result::InstructionResult;
pub use opcode_info::OpcodeInfo;
pub use operand_value::OperandValue;
pub use reg8::Reg8;
pub use reg16::Reg16;
pub use target::Target;
