extern crate clap;

use clap::{App, Arg};

mod diagnostics;
mod driver;
mod error_formatting;
mod expr;
mod input;
mod line_reader;
mod parser;
mod repl;
mod scanner;

static INPUT_STR: &str = "INPUT";
static SHOW_TOKENS_STR: &str = "tokens";
static SHOW_AST_STR: &str = "ast";

// status for a file that failed to scan or parse
const EXIT_DATA_ERR: i32 = 65;

fn main() {
    let matches = App::new("lispi")
        .version("0.1.0")
        .about("scanner and parser for a small lisp-flavoured language")
        .author("Thomas Peters")
        .arg(
            Arg::with_name(INPUT_STR)
                .help("sets input file to use; starts a prompt when omitted")
                .required(false)
                .index(1),
        )
        .arg(
            Arg::with_name(SHOW_TOKENS_STR)
                .long("show-tokens")
                .takes_value(false)
                .help("show the token stream"),
        )
        .arg(
            Arg::with_name(SHOW_AST_STR)
                .long("show-ast")
                .takes_value(false)
                .help("show the AST"),
        )
        .get_matches();

    let options = driver::Options {
        show_tokens: matches.is_present(SHOW_TOKENS_STR),
        show_ast: matches.is_present(SHOW_AST_STR),
    };

    match matches.value_of(INPUT_STR) {
        Some(input_file) => match input::Input::from_file(input_file) {
            Ok(input) => {
                let outcome = driver::run(&input, &options);
                if !driver::report(&outcome, &input, &options) {
                    std::process::exit(EXIT_DATA_ERR);
                }
            }
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(-1);
            }
        },
        None => repl::run(&options),
    }
}
