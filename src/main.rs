mod bytecode;
mod frontend;
mod lang;
mod repl;
mod runtime;

use std::{env, fs, process};

use yansi::Paint;

use crate::bytecode::compile::Compiler;
use crate::bytecode::disasm;
use crate::frontend::lexer::Lexer;
use crate::frontend::parser::Parser;
use crate::runtime::vm::VM;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let dump_bytecode = args.iter().any(|a| a == "--bytecode" || a == "--bc");

    // The first non-flag argument is the script to run.
    let filename = args.iter().skip(1).find(|a| !a.starts_with('-'));

    match filename {
        Some(filename) => run_file(filename, dump_bytecode),
        None => {
            println!("Monkey programming language");
            println!("Type in commands; Ctrl-D exits.");
            if let Err(err) = repl::start() {
                eprintln!("repl error: {}", err);
                process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!("MONKEY - bytecode compiler and virtual machine");
    println!();
    println!("Usage:");
    println!("  monkey                    Start the interactive REPL");
    println!("  monkey <file>             Run a script");
    println!("  monkey --bytecode <file>  Dump disassembly before running");
    println!("  monkey --help, -h         Show this help");
}

fn run_file(filename: &str, dump_bytecode: bool) {
    let source = match fs::read_to_string(filename) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("failed to read '{}': {}", filename, err);
            process::exit(1);
        }
    };

    let tokens = match Lexer::new(&source).tokenize() {
        Ok(tokens) => tokens,
        Err(err) => {
            eprintln!("{}", format!("lexer error: {}", err).red());
            process::exit(1);
        }
    };

    let mut parser = Parser::new(tokens);
    let program = parser.parse_program();
    if !parser.errors().is_empty() {
        for err in parser.errors() {
            eprintln!("{}", format!("parse error: {}", err).red());
        }
        process::exit(1);
    }

    let mut compiler = Compiler::new();
    if let Err(err) = compiler.compile(&program) {
        eprintln!("{}", format!("compile error: {}", err).red());
        process::exit(1);
    }

    let bytecode = compiler.bytecode();
    if dump_bytecode {
        print!("{}", disasm::dump_bytecode(&bytecode));
    }

    let mut machine = VM::new(bytecode);
    if let Err(err) = machine.run() {
        eprintln!("{}", format!("runtime error: {}", err).red());
        process::exit(1);
    }
}
