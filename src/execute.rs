//! Statement dispatch and the fetch-execute-advance driver.

use crate::error::{BasicError, Result};
use crate::interpreter::{Interpreter, Snapshot};
use crate::token::*;

impl Interpreter {
    /// Execute the single statement at the cursor
    pub(crate) fn execute_statement(&mut self) -> Result<()> {
        self.skip_spaces();
        let mut c = self.peek();
        if c == b':' {
            self.next_byte();
            self.skip_spaces();
            c = self.peek();
        }
        if c == 0 {
            return Ok(());
        }

        if is_opcode(c) {
            self.next_byte();
            match c {
                TOK_PRINT => self.do_print(),
                TOK_INPUT => self.do_input(),
                TOK_LET => self.do_let(),
                TOK_IF => self.do_if(),
                TOK_GOTO => self.do_goto(),
                TOK_GOSUB => self.do_gosub(),
                TOK_RETURN => self.do_return(),
                TOK_FOR => self.do_for(),
                TOK_NEXT => self.do_next(),
                TOK_DIM => self.do_dim(),
                TOK_DATA => self.do_data(),
                TOK_READ => self.do_read(),
                TOK_RESTORE => self.do_restore(),
                TOK_END => self.do_end(),
                TOK_STOP => self.do_stop(),
                TOK_CONT => self.do_cont(),
                TOK_NEW => self.do_new(),
                TOK_LIST => self.do_list(),
                TOK_RUN => self.do_run(),
                TOK_LOAD => self.do_load(),
                TOK_SAVE => self.do_save(),
                TOK_POKE | TOK_WAIT => self.do_poke(),
                TOK_ON => self.do_on(),
                TOK_DEF => self.do_def(),
                TOK_CLEAR => self.do_clear(),
                TOK_GET => self.do_get(),
                TOK_REM => {
                    self.skip_to_end_of_line();
                    Ok(())
                }
                _ => Err(BasicError::Syntax),
            }
        } else if c.is_ascii_alphabetic() {
            // Implicit LET
            self.do_let()
        } else {
            Err(BasicError::Syntax)
        }
    }

    /// RUN entry: locate the starting line and enter the driver.
    /// `None` or line 0 starts from the first stored line.
    pub(crate) fn run_program(&mut self, start: Option<u16>) -> Result<()> {
        let offset = match start {
            None | Some(0) => match self.program.first() {
                Some(offset) => offset,
                None => {
                    self.running = false;
                    return Ok(());
                }
            },
            Some(number) => self.find_target(number)?,
        };
        self.jump_to_line(offset);
        self.run_loop()
    }

    /// The driver: execute statements along the current line, then
    /// advance to the next record unless a statement rewrote the
    /// cursor. A failing statement stops the run with a CONT snapshot
    /// at the point of failure.
    pub(crate) fn run_loop(&mut self) -> Result<()> {
        self.running = true;

        while self.running {
            let line_before = self.current_line;

            loop {
                if !self.running {
                    break;
                }
                self.skip_spaces();
                if self.peek() == 0 {
                    break;
                }

                if let Err(err) = self.execute_statement() {
                    if self.current_line >= 0 {
                        self.resume = Some(Snapshot {
                            line: self.current_line as u16,
                            pos: self.cursor.pos,
                            line_offset: self.line_offset,
                        });
                    }
                    self.running = false;
                    return Err(err);
                }

                // A changed line number means a jump rewrote the cursor
                if self.current_line != line_before {
                    break;
                }
                self.skip_spaces();
                if self.peek() == b':' {
                    self.next_byte();
                } else {
                    break;
                }
            }

            if self.running && self.current_line == line_before {
                match self.program.next_after(self.line_offset) {
                    Some(next) => self.jump_to_line(next),
                    None => self.running = false,
                }
            }
        }
        Ok(())
    }
}
