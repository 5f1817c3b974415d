use crate::diagnostics;
use crate::input;

use colored::*;

fn source_line(input: &input::Input, line: usize) -> Option<&str> {
    if line == 0 {
        return None;
    }
    input.content.lines().nth(line - 1)
}

fn format_input(input: &input::Input, line: usize, col: i64) {
    eprintln!(
        "in {}, at line {}, column {}:",
        input.name(),
        line,
        col
    );

    // the end-of-input token may sit past the last line of text
    if let Some(text) = source_line(input, line) {
        eprintln!("{}", text);
        eprint!("{:~<1$}", "".blue().bold(), col.max(0) as usize);
        eprintln!("{}", "^".blue().bold());
    }
}

fn kind_header(kind: diagnostics::Kind) -> &'static str {
    match kind {
        diagnostics::Kind::Lexical => "lexical error",
        diagnostics::Kind::Syntax => "parse error",
    }
}

pub fn format_diagnostic(diag: &diagnostics::Diagnostic, input: &input::Input) {
    eprintln!(
        "lispi: {}: {}",
        kind_header(diag.kind).red().bold(),
        diag.to_string().white().bold(),
    );

    format_input(input, diag.line, diag.col);
}

pub fn format_diagnostics(diagnostics: &diagnostics::Diagnostics, input: &input::Input) {
    for diag in diagnostics.iter() {
        format_diagnostic(diag, input);
    }

    eprintln!(
        "lispi: {}",
        format!(
            "{} error{} in {}",
            diagnostics.len(),
            if diagnostics.len() == 1 { "" } else { "s" },
            input.name()
        )
        .red()
    );
}
