use crate::diagnostics;
use crate::scanner;

use rustyline::error::ReadlineError;

pub enum ReadStatus {
    Entry(String),
    Interrupted,
    Done,
}

/*
Reads whole entries from the terminal. A definition usually spans several
lines, so an entry keeps reading continuation lines while it leaves a paren
or a string open. A blank continuation line submits the entry as typed.
*/
pub struct EntryReader {
    rl: rustyline::Editor<()>,
    history_file: String,
    prompt: String,
    continuation_prompt: String,
}

impl Drop for EntryReader {
    fn drop(&mut self) {
        self.rl.save_history(&self.history_file).ok();
    }
}

impl EntryReader {
    pub fn new(history_file: &str, prompt: &str, continuation_prompt: &str) -> EntryReader {
        let mut rl = rustyline::Editor::<()>::new();
        rl.load_history(history_file).ok();
        EntryReader {
            rl,
            history_file: history_file.into(),
            prompt: prompt.into(),
            continuation_prompt: continuation_prompt.into(),
        }
    }

    pub fn read_entry(&mut self) -> ReadStatus {
        let mut entry = String::new();

        loop {
            let prompt = if entry.is_empty() {
                &self.prompt
            } else {
                &self.continuation_prompt
            };

            match self.rl.readline(prompt) {
                Ok(line) => {
                    let blank = line.trim().is_empty();
                    if !entry.is_empty() {
                        entry.push('\n');
                    }
                    entry.push_str(&line);

                    if blank || !is_incomplete(&entry) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => return ReadStatus::Interrupted,
                Err(_) if entry.is_empty() => return ReadStatus::Done,
                Err(_) => break,
            }
        }

        if !entry.trim().is_empty() {
            self.rl.add_history_entry(entry.as_str());
        }
        ReadStatus::Entry(entry)
    }
}

// Whether more input could still close what the entry has opened.
fn is_incomplete(entry: &str) -> bool {
    let mut diagnostics = diagnostics::Diagnostics::default();
    let tokens = scanner::scan_tokens(entry, &mut diagnostics);

    if diagnostics
        .iter()
        .any(|d| d.message == scanner::UNTERMINATED_STRING)
    {
        return true;
    }

    let depth = tokens.iter().fold(0i64, |depth, tok| match tok.ty {
        scanner::TokenType::LeftParen => depth + 1,
        scanner::TokenType::RightParen => depth - 1,
        _ => depth,
    });
    depth > 0
}
