pub mod ast;
pub mod ast_printer;
pub mod builtins;
pub mod class;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod source;
pub mod stack;
pub mod token;
pub mod value;
