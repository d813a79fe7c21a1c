//! Statement executors, one per statement opcode.

use crate::error::{BasicError, Result};
use crate::interpreter::{
    Cursor, DataCursor, ForFrame, GosubFrame, Interpreter, Snapshot, Source, MAX_STACK_DEPTH,
};
use crate::program::MAX_LINE_NUMBER;
use crate::token::{
    TOK_CHR, TOK_DATA, TOK_EQ, TOK_GOSUB, TOK_GOTO, TOK_LEFT, TOK_MID, TOK_RIGHT, TOK_SPC,
    TOK_STEP, TOK_STR, TOK_TAB, TOK_THEN, TOK_TO,
};
use crate::tokenizer::detokenize;
use crate::value::{format_number, parse_number_prefix, BasicString, ValueType};

/// Width of the print zones selected by the comma separator
const PRINT_ZONE_WIDTH: usize = 14;

impl Interpreter {
    /// PRINT: values joined by `;` (tight) or `,` (next zone), with TAB
    /// and SPC spacing functions. A trailing separator suppresses the
    /// newline.
    pub(crate) fn do_print(&mut self) -> Result<()> {
        let mut newline = true;

        loop {
            self.skip_spaces();
            let c = self.peek();

            if c == 0 || c == b':' {
                break;
            }

            if c == b';' {
                self.next_byte();
                newline = false;
                continue;
            }

            if c == b',' {
                self.next_byte();
                let stop = ((self.column / PRINT_ZONE_WIDTH) + 1) * PRINT_ZONE_WIDTH;
                while self.column < stop {
                    self.emit_str(" ");
                }
                newline = false;
                continue;
            }

            if c == TOK_TAB {
                self.next_byte();
                self.accept(b'(');
                let n = self.eval_integer()?;
                self.accept(b')');
                while (self.column as i32) < n - 1 {
                    self.emit_str(" ");
                }
                newline = false;
                continue;
            }

            if c == TOK_SPC {
                self.next_byte();
                self.accept(b'(');
                let n = self.eval_integer()?;
                self.accept(b')');
                for _ in 0..n.max(0) {
                    self.emit_str(" ");
                }
                newline = false;
                continue;
            }

            // String-valued element: literal, string function, or a
            // variable whose name carries the $ sigil
            let string_ahead = c == b'"'
                || matches!(c, TOK_CHR | TOK_STR | TOK_LEFT | TOK_RIGHT | TOK_MID)
                || (c.is_ascii_alphabetic() && {
                    let save = self.cursor;
                    let name = self.parse_var_name();
                    self.cursor = save;
                    name.ty == ValueType::Str
                });

            if string_ahead {
                let s = self.eval_string()?;
                self.emit_bytes(s.bytes());
                newline = true;
                continue;
            }

            let value = self.eval_expr()?;
            let text = format_number(value);
            self.emit_str(&text);
            newline = true;
        }

        if newline {
            self.emit_newline();
        }
        Ok(())
    }

    /// INPUT: optional prompt literal, then one line of input split on
    /// commas across the listed variables
    pub(crate) fn do_input(&mut self) -> Result<()> {
        self.skip_spaces();
        if self.peek() == b'"' {
            let prompt = self.parse_string_literal();
            self.emit_bytes(prompt.bytes());
            self.accept(b';');
        } else {
            self.emit_str("? ");
        }
        self.flush_output();

        let line = match self.read_input_line() {
            Some(line) => line,
            None => return Ok(()),
        };
        let mut field = line.as_str();

        loop {
            self.skip_spaces();
            if !self.peek().is_ascii_alphabetic() {
                break;
            }
            let name = self.parse_var_name();

            if name.ty == ValueType::Str {
                let trimmed = field.trim_start_matches([' ', '\t']);
                match trimmed.split_once(',') {
                    Some((head, tail)) => {
                        self.variables
                            .set_string(name, BasicString::from_text(head));
                        field = tail;
                    }
                    None => {
                        self.variables
                            .set_string(name, BasicString::from_text(trimmed));
                        field = "";
                    }
                }
            } else {
                let value = parse_number_prefix(field);
                self.variables.set_number(name, value);
                field = field.split_once(',').map(|(_, tail)| tail).unwrap_or("");
            }

            if !self.accept(b',') {
                break;
            }
        }
        Ok(())
    }

    /// LET (explicit or implicit): variable or array element assignment
    pub(crate) fn do_let(&mut self) -> Result<()> {
        let name = self.parse_var_name();
        if name.name.is_empty() {
            return Err(BasicError::Syntax);
        }

        self.skip_spaces();
        if self.peek() == b'(' {
            let indices = self.parse_subscripts()?;
            self.expect_either(b'=', TOK_EQ)?;
            if name.ty == ValueType::Str {
                let value = self.eval_string()?;
                self.arrays.set_string(&name, &indices, value)?;
            } else {
                let value = self.eval_expr()?;
                if self.value_type == ValueType::Str {
                    return Err(BasicError::TypeMismatch);
                }
                self.arrays.set_number(&name, &indices, value)?;
            }
        } else {
            self.expect_either(b'=', TOK_EQ)?;
            if name.ty == ValueType::Str {
                let value = self.eval_string()?;
                self.variables.set_string(name, value);
            } else {
                let value = self.eval_expr()?;
                if self.value_type == ValueType::Str {
                    return Err(BasicError::TypeMismatch);
                }
                self.variables.set_number(name, value);
            }
        }
        Ok(())
    }

    /// IF: on a true condition either GOTO a line number or run the
    /// trailing statements; on false discard the rest of the line
    pub(crate) fn do_if(&mut self) -> Result<()> {
        let condition = self.eval_expr()?;

        self.skip_spaces();
        if self.peek() == TOK_THEN {
            self.next_byte();
        }

        if condition == 0.0 {
            self.skip_to_end_of_line();
            return Ok(());
        }

        self.skip_spaces();
        if self.peek().is_ascii_digit() {
            return self.do_goto();
        }

        loop {
            let before = self.current_line;
            self.execute_statement()?;
            if self.current_line != before {
                break;
            }
            self.skip_spaces();
            if self.peek() == b':' {
                self.next_byte();
            } else {
                break;
            }
        }
        Ok(())
    }

    /// Parse a jump target line number
    fn line_number_arg(&mut self) -> Result<u16> {
        let number = self.eval_integer()?;
        if !(0..=MAX_LINE_NUMBER as i32).contains(&number) {
            return Err(BasicError::UndefinedStatement);
        }
        Ok(number as u16)
    }

    /// Read a literal run of digits (no expression evaluation)
    fn digit_run(&mut self) -> Option<u16> {
        self.skip_spaces();
        if !self.peek().is_ascii_digit() {
            return None;
        }
        let mut n: u32 = 0;
        while self.peek().is_ascii_digit() {
            n = n * 10 + (self.next_byte() - b'0') as u32;
            if n > MAX_LINE_NUMBER as u32 {
                n = MAX_LINE_NUMBER as u32;
            }
        }
        Some(n as u16)
    }

    /// GOTO
    pub(crate) fn do_goto(&mut self) -> Result<()> {
        let number = self.line_number_arg()?;
        let target = self.find_target(number)?;
        self.jump_to_line(target);
        Ok(())
    }

    /// GOSUB: push the return point, then jump
    pub(crate) fn do_gosub(&mut self) -> Result<()> {
        if self.gosub_stack.len() >= MAX_STACK_DEPTH {
            return Err(BasicError::OutOfMemory);
        }
        let number = self.line_number_arg()?;
        let target = self.find_target(number)?;

        self.gosub_stack.push(GosubFrame {
            line: self.current_line,
            line_offset: self.line_offset,
            cursor: self.cursor,
        });
        self.jump_to_line(target);
        Ok(())
    }

    /// RETURN
    pub(crate) fn do_return(&mut self) -> Result<()> {
        let frame = self
            .gosub_stack
            .pop()
            .ok_or(BasicError::ReturnWithoutGosub)?;
        self.current_line = frame.line;
        self.line_offset = frame.line_offset;
        self.cursor = frame.cursor;
        Ok(())
    }

    /// FOR: assign the start value and push a loop frame whose cursor
    /// points just past this statement
    pub(crate) fn do_for(&mut self) -> Result<()> {
        if self.for_stack.len() >= MAX_STACK_DEPTH {
            return Err(BasicError::OutOfMemory);
        }

        let name = self.parse_var_name();
        if name.name.is_empty() || name.ty != ValueType::Number {
            return Err(BasicError::Syntax);
        }
        self.expect_either(b'=', TOK_EQ)?;

        let start = self.eval_expr()?;
        self.variables.set_number(name.clone(), start);

        if !self.accept(TOK_TO) {
            return Err(BasicError::Syntax);
        }
        let limit = self.eval_expr()?;
        let step = if self.accept(TOK_STEP) {
            self.eval_expr()?
        } else {
            1.0
        };

        self.for_stack.push(ForFrame {
            line: self.current_line,
            line_offset: self.line_offset,
            cursor: self.cursor,
            var: name,
            limit,
            step,
        });
        Ok(())
    }

    /// NEXT: step the loop variable; loop back or pop the frame
    pub(crate) fn do_next(&mut self) -> Result<()> {
        self.skip_spaces();
        let name = if self.peek().is_ascii_alphabetic() {
            self.parse_var_name()
        } else {
            match self.for_stack.last() {
                Some(frame) => frame.var.clone(),
                None => return Err(BasicError::NextWithoutFor),
            }
        };

        let frame = match self.for_stack.last() {
            Some(frame) => frame.clone(),
            None => return Err(BasicError::NextWithoutFor),
        };

        let current = self.variables.get_number(&name) + frame.step;
        self.variables.set_number(name, current);

        let done = if frame.step >= 0.0 {
            current > frame.limit
        } else {
            current < frame.limit
        };

        if done {
            self.for_stack.pop();
        } else {
            self.current_line = frame.line;
            self.line_offset = frame.line_offset;
            self.cursor = frame.cursor;
        }
        Ok(())
    }

    /// DIM: declare one or more arrays; the subscripts are maximum
    /// indices, so each dimension holds one more element
    pub(crate) fn do_dim(&mut self) -> Result<()> {
        loop {
            let name = self.parse_var_name();
            if name.name.is_empty() {
                return Err(BasicError::Syntax);
            }

            self.skip_spaces();
            if self.peek() != b'(' {
                return Err(BasicError::Syntax);
            }
            self.next_byte();

            let mut dims = Vec::new();
            loop {
                let n = self.eval_integer()?;
                dims.push((n + 1).max(0) as usize);
                if dims.len() >= crate::arrays::MAX_DIMENSIONS || !self.accept(b',') {
                    break;
                }
            }

            self.skip_spaces();
            if self.peek() != b')' {
                return Err(BasicError::Syntax);
            }
            self.next_byte();

            self.arrays.dimension(name, &dims)?;

            if !self.accept(b',') {
                break;
            }
        }
        Ok(())
    }

    /// DATA: a marker only; the payload is read by READ
    pub(crate) fn do_data(&mut self) -> Result<()> {
        self.skip_to_end_of_line();
        Ok(())
    }

    /// Advance the DATA cursor to the next unread datum
    fn find_next_data(&mut self) -> Option<usize> {
        // Continue inside the DATA statement being consumed
        if let Some(mut pos) = self.data_cursor.pos {
            let bytes = self.program.bytes();
            while matches!(bytes.get(pos), Some(&b' ') | Some(&b'\t')) {
                pos += 1;
            }
            if bytes.get(pos) == Some(&b',') {
                pos += 1;
                while matches!(bytes.get(pos), Some(&b' ') | Some(&b'\t')) {
                    pos += 1;
                }
                self.data_cursor.pos = Some(pos);
                return Some(pos);
            }
            // Statement exhausted: search beyond its line
            self.data_cursor.line = self.data_cursor.line.saturating_add(1);
            self.data_cursor.pos = None;
        }

        // Scan for the next line at or after the cursor line that
        // carries a DATA opcode
        let mut offset = self.program.first();
        while let Some(off) = offset {
            let number = self.program.line_number(off);
            if number >= self.data_cursor.line {
                let bytes = self.program.bytes();
                let mut p = self.program.text_start(off);
                while bytes[p] != 0 {
                    if bytes[p] == TOK_DATA {
                        let mut pos = p + 1;
                        while matches!(bytes[pos], b' ' | b'\t') {
                            pos += 1;
                        }
                        self.data_cursor.line = number;
                        self.data_cursor.pos = Some(pos);
                        return Some(pos);
                    }
                    p += 1;
                }
            }
            offset = self.program.next_after(off);
        }
        None
    }

    /// READ: assign the next DATA items to the listed variables
    pub(crate) fn do_read(&mut self) -> Result<()> {
        loop {
            self.skip_spaces();
            if !self.peek().is_ascii_alphabetic() {
                break;
            }
            let name = self.parse_var_name();

            let pos = self.find_next_data().ok_or(BasicError::OutOfData)?;

            if name.ty == ValueType::Str {
                let (value, end) = {
                    let bytes = self.program.bytes();
                    let mut p = pos;
                    let mut field = Vec::new();
                    if bytes[p] == b'"' {
                        p += 1;
                        while bytes[p] != b'"' && bytes[p] != 0 {
                            field.push(bytes[p]);
                            p += 1;
                        }
                        if bytes[p] == b'"' {
                            p += 1;
                        }
                    } else {
                        while bytes[p] != b',' && bytes[p] != 0 {
                            field.push(bytes[p]);
                            p += 1;
                        }
                    }
                    (BasicString::from_bytes(&field), p)
                };
                self.data_cursor.pos = Some(end);
                self.variables.set_string(name, value);
            } else {
                let (value, end) = {
                    let bytes = self.program.bytes();
                    let mut p = pos;
                    let mut field = String::new();
                    while !matches!(bytes[p], b',' | b' ' | b'\t' | 0) {
                        field.push(bytes[p] as char);
                        p += 1;
                    }
                    (parse_number_prefix(&field), p)
                };
                self.data_cursor.pos = Some(end);
                self.variables.set_number(name, value);
            }

            if !self.accept(b',') {
                break;
            }
        }
        Ok(())
    }

    /// RESTORE: rewind the DATA cursor to the top of the program
    pub(crate) fn do_restore(&mut self) -> Result<()> {
        self.data_cursor = DataCursor::reset();
        Ok(())
    }

    /// END
    pub(crate) fn do_end(&mut self) -> Result<()> {
        self.running = false;
        self.current_line = -1;
        Ok(())
    }

    /// STOP: suspend execution, remembering where for CONT
    pub(crate) fn do_stop(&mut self) -> Result<()> {
        self.running = false;
        if self.current_line >= 0 {
            self.resume = Some(Snapshot {
                line: self.current_line as u16,
                pos: self.cursor.pos,
                line_offset: self.line_offset,
            });
            let text = format!("BREAK IN {}", self.current_line);
            self.emit_str(&text);
        } else {
            self.emit_str("BREAK");
        }
        self.emit_newline();
        Ok(())
    }

    /// CONT: resume at the snapshot taken by the last STOP
    pub(crate) fn do_cont(&mut self) -> Result<()> {
        let snapshot = self.resume.take().ok_or(BasicError::CantContinue)?;
        if self.program.find(snapshot.line).is_none() {
            return Err(BasicError::CantContinue);
        }
        self.current_line = snapshot.line as i32;
        self.line_offset = snapshot.line_offset;
        self.cursor = Cursor {
            src: Source::Program,
            pos: snapshot.pos,
        };
        self.run_loop()
    }

    /// ON expr GOTO/GOSUB: jump through the expr-th target; an index
    /// outside the list falls through to the next statement
    pub(crate) fn do_on(&mut self) -> Result<()> {
        let index = self.eval_integer()?;

        let is_gosub = if self.accept(TOK_GOTO) {
            false
        } else if self.accept(TOK_GOSUB) {
            true
        } else {
            return Err(BasicError::Syntax);
        };

        // Step over the targets before the selected one
        let mut in_range = index >= 1;
        for _ in 1..index.max(1) {
            self.skip_spaces();
            while self.peek().is_ascii_digit() {
                self.next_byte();
            }
            if !self.accept(b',') {
                in_range = false;
                break;
            }
        }

        self.skip_spaces();
        if !in_range || !self.peek().is_ascii_digit() {
            // Fall through: consume the rest of the target list
            loop {
                self.skip_spaces();
                while self.peek().is_ascii_digit() {
                    self.next_byte();
                }
                if !self.accept(b',') {
                    break;
                }
            }
            return Ok(());
        }

        let number = self.digit_run().ok_or(BasicError::Syntax)?;
        let target = self.find_target(number)?;

        if is_gosub {
            if self.gosub_stack.len() >= MAX_STACK_DEPTH {
                return Err(BasicError::OutOfMemory);
            }
            self.gosub_stack.push(GosubFrame {
                line: self.current_line,
                line_offset: self.line_offset,
                cursor: self.cursor,
            });
        }
        self.jump_to_line(target);
        Ok(())
    }

    /// LIST with an optional `n`, `n-` or `n-m` range
    pub(crate) fn do_list(&mut self) -> Result<()> {
        let mut start = 0u16;
        let mut end = MAX_LINE_NUMBER;

        if let Some(n) = self.digit_run() {
            start = n;
            end = n;
            if self.accept(b'-') {
                end = self.digit_run().unwrap_or(MAX_LINE_NUMBER);
            }
        }

        let lines: Vec<(u16, String)> = self
            .program
            .lines()
            .filter(|(n, _)| *n >= start && *n <= end)
            .map(|(n, tokens)| (n, detokenize(tokens)))
            .collect();

        for (number, text) in lines {
            let rendered = format!("{} {}", number, text);
            self.emit_str(&rendered);
            self.emit_newline();
        }
        Ok(())
    }

    /// RUN: reset runtime state, then drive from the first (or given)
    /// line
    pub(crate) fn do_run(&mut self) -> Result<()> {
        let start = self.digit_run();
        self.clear_runtime();
        self.resume = None;
        self.run_program(start)
    }

    /// NEW
    pub(crate) fn do_new(&mut self) -> Result<()> {
        self.new_program();
        Ok(())
    }

    /// CLEAR: drop variables, arrays and control stacks
    pub(crate) fn do_clear(&mut self) -> Result<()> {
        self.clear_runtime();
        Ok(())
    }

    /// LOAD "file"
    pub(crate) fn do_load(&mut self) -> Result<()> {
        let filename = self.eval_string()?.to_string();
        if self.load_file(&filename).is_err() {
            self.emit_str("?FILE NOT FOUND");
            self.emit_newline();
        }
        Ok(())
    }

    /// SAVE "file"
    pub(crate) fn do_save(&mut self) -> Result<()> {
        let filename = self.eval_string()?.to_string();
        if self.save_file(&filename).is_err() {
            self.emit_str("?FILE ERROR");
            self.emit_newline();
        }
        Ok(())
    }

    /// POKE and WAIT parse an address/value pair and do nothing
    pub(crate) fn do_poke(&mut self) -> Result<()> {
        self.eval_integer()?;
        self.accept(b',');
        self.eval_integer()?;
        Ok(())
    }

    /// GET parses its variable name and does nothing
    pub(crate) fn do_get(&mut self) -> Result<()> {
        self.skip_spaces();
        while self.peek().is_ascii_alphanumeric() || self.peek() == b'$' {
            self.next_byte();
        }
        Ok(())
    }

    /// DEF FN: parsed and ignored
    pub(crate) fn do_def(&mut self) -> Result<()> {
        self.skip_to_end_of_line();
        Ok(())
    }
}
