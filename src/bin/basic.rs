/// Interactive BASIC console

use retrobasic::{Interpreter, PROGRAM_CAPACITY};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

/// Keyword completer for the REPL
struct KeywordCompleter {
    keywords: Vec<&'static str>,
}

impl KeywordCompleter {
    fn new() -> Self {
        Self {
            keywords: vec![
                "CLEAR", "CONT", "DATA", "DEF", "DIM", "END", "FOR", "GET", "GOSUB",
                "GOTO", "IF", "INPUT", "LET", "LIST", "LOAD", "NEW", "NEXT", "ON",
                "POKE", "PRINT", "READ", "REM", "RESTORE", "RETURN", "RUN", "SAVE",
                "STEP", "STOP", "THEN", "WAIT",
            ],
        }
    }
}

impl Completer for KeywordCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Complete the keyword being typed under the cursor
        let line_to_cursor = &line[..pos];
        let start = line_to_cursor
            .rfind(|c: char| !c.is_ascii_alphabetic())
            .map(|i| i + 1)
            .unwrap_or(0);
        let prefix = line_to_cursor[start..].to_uppercase();
        if prefix.is_empty() {
            return Ok((pos, vec![]));
        }

        let matches: Vec<Pair> = self
            .keywords
            .iter()
            .filter(|kw| kw.starts_with(&prefix))
            .map(|kw| Pair {
                display: kw.to_string(),
                replacement: kw.to_string(),
            })
            .collect();

        Ok((start, matches))
    }
}

impl Hinter for KeywordCompleter {
    type Hint = String;
}

impl Highlighter for KeywordCompleter {}
impl Validator for KeywordCompleter {}
impl Helper for KeywordCompleter {}

/// Get the path to the history file
fn history_path() -> Option<std::path::PathBuf> {
    dirs::home_dir().map(|mut p| {
        p.push(".retrobasic_history");
        p
    })
}

fn main() {
    let mut basic = match Interpreter::try_new() {
        Ok(basic) => basic,
        Err(_) => {
            eprintln!("Out of memory");
            std::process::exit(1);
        }
    };

    println!("=== RETRO BASIC ===");
    println!("A 6502-era Microsoft BASIC dialect.");
    println!("{} BYTES FREE\n", PROGRAM_CAPACITY);

    let mut rl = Editor::new().expect("Failed to create editor");
    rl.set_helper(Some(KeywordCompleter::new()));

    // Load history if available
    if let Some(history) = history_path() {
        let _ = rl.load_history(&history);
    }

    // Auto-LOAD a program named on the command line
    if let Some(filename) = std::env::args().nth(1) {
        match basic.load_file(&filename) {
            Ok(()) => println!("LOADED {}", filename),
            Err(_) => println!("?FILE NOT FOUND"),
        }
    }

    loop {
        println!("READY.");
        let line = match rl.readline("") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line.as_str());

        basic.process_line(&line);
    }

    // Save history before exiting
    if let Some(history) = history_path() {
        let _ = rl.save_history(&history);
    }
}
