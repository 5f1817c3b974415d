use crate::driver;
use crate::input;
use crate::line_reader;

static HISTORY_FILE: &str = ".lispi-history.txt";

pub fn run(options: &driver::Options) {
    println!(
        "===========================================\n\
         Welcome to lispi! Each entry is scanned and\n\
         parsed on its own; an open paren continues\n\
         on the next line. Ctrl-D quits.\n\
         ===========================================\n"
    );

    // nothing evaluates the statements, so always show them
    let options = driver::Options {
        show_ast: true,
        ..*options
    };

    let mut reader = line_reader::EntryReader::new(HISTORY_FILE, "> ", "... ");

    loop {
        match reader.read_entry() {
            line_reader::ReadStatus::Entry(entry) => {
                if entry.trim().is_empty() {
                    continue;
                }

                let input = input::Input {
                    source: input::Source::Prompt,
                    content: entry,
                };

                let outcome = driver::run(&input, &options);
                driver::report(&outcome, &input, &options);
            }
            line_reader::ReadStatus::Interrupted => {
                println!("^C");
            }
            line_reader::ReadStatus::Done => break,
        }
    }
}
