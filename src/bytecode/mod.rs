pub mod compile;
pub mod compile_error;
pub mod disasm;
pub mod op;
pub mod symbols;

pub use compile::{Bytecode, Compiler};
pub use op::Op;
