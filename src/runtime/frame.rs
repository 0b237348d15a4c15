use std::rc::Rc;

use crate::lang::value::Closure;

/// A call frame: one activation of a closure.
#[derive(Debug)]
pub struct Frame {
    pub closure: Rc<Closure>,

    /// Instruction pointer into the closure's instructions. Starts at −1;
    /// the run loop pre-increments before every fetch.
    pub ip: i64,

    /// Base pointer: the value-stack index of the frame's first argument
    /// slot. Locals live at `bp + i`.
    pub bp: usize,
}

impl Frame {
    pub fn new(closure: Rc<Closure>, bp: usize) -> Self {
        Frame {
            closure,
            ip: -1,
            bp,
        }
    }

    pub fn instructions_len(&self) -> usize {
        self.closure.func.instructions.len()
    }
}
