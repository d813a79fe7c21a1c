//! The REPL surface: line classification, direct-mode execution and
//! program file load/save.

use std::fs;

use crate::error::{BasicError, Result};
use crate::interpreter::{Cursor, Interpreter, Source};
use crate::program::MAX_LINE_NUMBER;
use crate::tokenizer::{detokenize, tokenize};

/// Split a numbered source line into its line number and statement
/// text. `None` when the number is missing or out of range.
fn split_line_number(line: &str) -> Option<(u16, &str)> {
    let digits_end = line
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(line.len());
    let number: u32 = line[..digits_end].parse().ok()?;
    if number == 0 || number > MAX_LINE_NUMBER as u32 {
        return None;
    }
    Some((number as u16, line[digits_end..].trim_start_matches([' ', '\t'])))
}

impl Interpreter {
    /// Feed one complete source line to the interpreter.
    ///
    /// A leading line number stores (or, with empty text, deletes) a
    /// program line; anything else executes immediately in direct
    /// mode. Errors are reported on the interpreter's output and never
    /// escape.
    pub fn process_line(&mut self, line: &str) {
        let line = line.trim_end_matches(['\n', '\r']);
        let line = line.trim_start_matches([' ', '\t']);
        if line.is_empty() {
            return;
        }

        if line.starts_with(|c: char| c.is_ascii_digit()) {
            self.enter_numbered_line(line);
        } else {
            self.execute_direct(line);
        }
    }

    fn enter_numbered_line(&mut self, line: &str) {
        let Some((number, text)) = split_line_number(line) else {
            self.print_error(BasicError::Syntax);
            return;
        };

        if text.is_empty() {
            self.program.delete(number);
        } else if let Err(err) = self.program.insert(number, &tokenize(text)) {
            self.print_error(err);
            return;
        }
        self.note_program_edit();
    }

    /// Tokenize and execute a direct-mode command line
    fn execute_direct(&mut self, line: &str) {
        self.direct = tokenize(line);
        self.direct.push(0);
        self.cursor = Cursor {
            src: Source::Direct,
            pos: 0,
        };
        self.current_line = -1;
        self.running = false;

        if let Err(err) = self.direct_statements() {
            self.print_error(err);
        }
        self.current_line = -1;
    }

    /// Run the statements of the direct line until it ends or one of
    /// them moves the cursor into the program (RUN, CONT, GOTO)
    fn direct_statements(&mut self) -> Result<()> {
        loop {
            self.skip_spaces();
            if self.peek() == 0 {
                return Ok(());
            }
            self.execute_statement()?;
            if self.cursor.src != Source::Direct {
                return Ok(());
            }
            self.skip_spaces();
            if self.peek() == b':' {
                self.next_byte();
            } else {
                return Ok(());
            }
        }
    }

    /// Report an error on the interpreter output: `?<CODE> ERROR`,
    /// with ` IN <line>` when a stored line was executing
    pub(crate) fn print_error(&mut self, err: BasicError) {
        let text = if self.current_line >= 0 {
            format!("?{} IN {}", err, self.current_line)
        } else {
            format!("?{}", err)
        };
        self.emit_str(&text);
        self.emit_newline();
    }

    /// Load a program from a text file, replacing the current program.
    /// Lines without a line number are ignored.
    pub fn load_file(&mut self, path: &str) -> std::io::Result<()> {
        let contents = fs::read_to_string(path)?;
        self.new_program();

        for line in contents.lines() {
            let line = line.trim_end_matches('\r');
            let line = line.trim_start_matches([' ', '\t']);
            if line.is_empty() {
                continue;
            }
            if let Some((number, text)) = split_line_number(line) {
                if !text.is_empty() {
                    let _ = self.program.insert(number, &tokenize(text));
                }
            }
        }

        self.note_program_edit();
        Ok(())
    }

    /// Save the program as detokenized text, one line per source line
    pub fn save_file(&mut self, path: &str) -> std::io::Result<()> {
        let mut out = String::new();
        for (number, tokens) in self.program.lines() {
            out.push_str(&format!("{} {}\n", number, detokenize(tokens)));
        }
        fs::write(path, out)
    }
}
