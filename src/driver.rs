use crate::diagnostics;
use crate::error_formatting;
use crate::expr;
use crate::input;
use crate::parser;
use crate::scanner;

#[derive(Default, Copy, Clone)]
pub struct Options {
    pub show_tokens: bool,
    pub show_ast: bool,
}

pub enum Outcome {
    Tokens(Vec<scanner::Token>),
    Parsed(Vec<expr::Stmt>),
    Failed(diagnostics::Diagnostics),
}

/*
One independent run: fresh scanner, parser and diagnostics. When anything
was reported the statements are dropped and only the diagnostics come back.
*/
pub fn run(input: &input::Input, options: &Options) -> Outcome {
    let mut diagnostics = diagnostics::Diagnostics::default();

    let tokens = scanner::scan_tokens(&input.content, &mut diagnostics);

    if options.show_tokens {
        if diagnostics.has_errors() {
            return Outcome::Failed(diagnostics);
        }
        return Outcome::Tokens(tokens);
    }

    let stmts = parser::parse(tokens, &mut diagnostics);

    if diagnostics.has_errors() {
        return Outcome::Failed(diagnostics);
    }

    Outcome::Parsed(stmts)
}

// Prints an outcome; returns false when the run failed.
pub fn report(outcome: &Outcome, input: &input::Input, options: &Options) -> bool {
    match outcome {
        Outcome::Tokens(tokens) => {
            println!("tokens: {:#?}", tokens);
            true
        }
        Outcome::Parsed(stmts) => {
            if options.show_ast {
                println!("AST: {:#?}", stmts);
            }
            true
        }
        Outcome::Failed(diagnostics) => {
            error_formatting::format_diagnostics(diagnostics, input);
            false
        }
    }
}
