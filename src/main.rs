use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use heartlisp::ast::Expr;
use heartlisp::ast_printer::Ast;
use heartlisp::error::LangError;
use heartlisp::interpreter::{Interpreter, InterpreterConfig};
use heartlisp::parser::Parser;
use heartlisp::scanner::{stream_tokens, tokenize};
use heartlisp::source;
use heartlisp::token::Token;
use heartlisp::value::Value;

/// Bound of the queue between the scanner thread and the token printer.
const TOKEN_QUEUE_CAPACITY: usize = 64;

#[derive(ClapParser, Debug)]
#[command(version, about = "heartlisp language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,

    /// Deepest allowed nesting of user function calls
    #[arg(long, global = true, default_value_t = InterpreterConfig::default().max_call_depth)]
    max_depth: usize,

    /// Start with an empty global scope (no print, +, get, ...)
    #[arg(long, global = true)]
    no_prelude: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: Option<PathBuf>,

        /// Print the tokens as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file and prints every top-level form
    Parse {
        filename: Option<PathBuf>,

        /// Print the AST as JSON instead of source text
        #[arg(long)]
        json: bool,
    },

    /// Runs input from a file as a heartlisp program
    Run { filename: Option<PathBuf> },
}

/// Reads the contents of a UTF-8 source file.
fn read_source(filename: &Path) -> Result<String> {
    source::read_source(filename).context(format!("Failed to read file {:?}", filename))
}

fn init_logger() -> Result<()> {
    // Create or open the log file
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("heartlisp::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{} {}:{}] - {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn no_input() -> ! {
    println!("No input filepath was provided. Exiting...");
    std::process::exit(0);
}

fn exit_code(error: &LangError) -> i32 {
    match error {
        LangError::Parse { .. } => 65,
        _ => 70,
    }
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    let config = InterpreterConfig {
        max_call_depth: args.max_depth,
        install_prelude: !args.no_prelude,
    };

    match args.commands {
        Commands::Tokenize { filename, json } => {
            let Some(filename) = filename else { no_input() };
            info!("Running Tokenize subcommand");
            let source: String = read_source(&filename)?;

            if json {
                let tokens: Vec<Token<'_>> = tokenize(&source);
                println!("{}", serde_json::to_string_pretty(&tokens)?);
            } else {
                stream_tokens(&source, TOKEN_QUEUE_CAPACITY, |rx| {
                    for token in rx.iter() {
                        println!("{}", token);
                    }
                });
            }

            info!("Tokenization completed successfully");
        }

        Commands::Parse { filename, json } => {
            let Some(filename) = filename else { no_input() };
            info!("Running Parse subcommand");
            let source: String = read_source(&filename)?;

            let forms: Vec<Expr> = match Parser::new(tokenize(&source)).parse() {
                Ok(forms) => forms,
                Err(e) => {
                    debug!("Parse debug: {}", e);
                    eprintln!("{}", e);
                    std::process::exit(65);
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&forms)?);
            } else {
                let printer = Ast;
                for form in &forms {
                    println!("{}", printer.print(form));
                }
            }

            info!("Parse subcommand completed");
        }

        Commands::Run { filename } => {
            let Some(filename) = filename else { no_input() };
            info!("Running Run subcommand");
            let source: String = read_source(&filename)?;

            let interpreter = Interpreter::new(config);

            match interpreter.run_source(&source) {
                Ok(Value::Nil) => info!("Program executed successfully"),

                Ok(value) => {
                    info!("Program executed successfully");
                    println!("{}", value);
                }

                Err(e) => {
                    debug!("Runtime debug: {} (internal: {})", e, e.is_internal());
                    eprintln!("{}", e);
                    std::process::exit(exit_code(&e));
                }
            }
        }
    }

    Ok(())
}
