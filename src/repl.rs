use rustyline::history::MemHistory;
use rustyline::Config;
use yansi::Paint;

use crate::bytecode::compile::Compiler;
use crate::bytecode::symbols::SymbolTable;
use crate::frontend::lexer::Lexer;
use crate::frontend::parser::Parser;
use crate::lang::builtins::BUILTINS;
use crate::lang::value::Value;
use crate::runtime::vm::{GLOBAL_SIZE, VM};

const PROMPT: &str = ">> ";

/// The interactive session.
///
/// The symbol table, constant pool, and globals store survive across lines,
/// so definitions from earlier turns stay usable. A failed turn keeps
/// whatever state it reached before the error; nothing is rolled back.
pub fn start() -> rustyline::Result<()> {
    let mut readline =
        rustyline::Editor::<(), _>::with_history(Config::default(), MemHistory::new())?;

    let mut symbols = SymbolTable::new();
    for (i, builtin) in BUILTINS.iter().enumerate() {
        symbols.define_builtin(i, builtin.name);
    }
    let mut constants: Vec<Value> = Vec::new();
    let mut globals: Vec<Value> = vec![Value::Nil; GLOBAL_SIZE];

    while let Ok(line) = readline.readline(PROMPT) {
        readline.add_history_entry(line.as_str())?;

        let tokens = match Lexer::new(&line).tokenize() {
            Ok(tokens) => tokens,
            Err(err) => {
                eprintln!("{}", format!("lexer error: {}", err).red());
                continue;
            }
        };

        let mut parser = Parser::new(tokens);
        let program = parser.parse_program();
        if !parser.errors().is_empty() {
            for err in parser.errors() {
                eprintln!("{}", format!("parse error: {}", err).red());
            }
            continue;
        }

        let mut compiler = Compiler::new_with_state(symbols, constants);
        let compiled = compiler.compile(&program);
        let bytecode = compiler.bytecode();
        (symbols, constants) = compiler.into_state();

        if let Err(err) = compiled {
            eprintln!("{}", format!("compile error: {}", err).red());
            continue;
        }

        let mut machine = VM::new_with_global_store(bytecode, globals);
        let result = machine.run();
        let last_popped = machine.last_popped_stack_elem();
        globals = machine.into_globals();

        match result {
            Ok(()) => println!("{}", last_popped),
            Err(err) => eprintln!("{}", format!("runtime error: {}", err).red()),
        }
    }

    Ok(())
}
