/// Integration tests for retrobasic

use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

use retrobasic::Interpreter;

/// Output sink whose contents can be read back after the run
#[derive(Clone, Default)]
struct Capture(Rc<RefCell<Vec<u8>>>);

impl Capture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl std::io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Feed the session lines to a fresh interpreter and collect its output
fn session_with_input(lines: &[&str], input: &str) -> String {
    let capture = Capture::default();
    let mut basic = Interpreter::with_io(
        Box::new(Cursor::new(input.as_bytes().to_vec())),
        Box::new(capture.clone()),
    );
    for line in lines {
        basic.process_line(line);
    }
    capture.contents()
}

fn session(lines: &[&str]) -> String {
    session_with_input(lines, "")
}

#[test]
fn test_hello_world() {
    let out = session(&["10 PRINT \"HELLO, WORLD\"", "RUN"]);
    assert_eq!(out, "HELLO, WORLD\n");
}

#[test]
fn test_for_next_summation() {
    let out = session(&[
        "10 S=0",
        "20 FOR I=1 TO 10",
        "30 S=S+I",
        "40 NEXT I",
        "50 PRINT S",
        "RUN",
    ]);
    assert_eq!(out, "55\n");
}

#[test]
fn test_gosub_return() {
    let out = session(&[
        "10 GOSUB 100",
        "20 PRINT \"BACK\"",
        "30 END",
        "100 PRINT \"SUB\"",
        "110 RETURN",
        "RUN",
    ]);
    assert_eq!(out, "SUB\nBACK\n");
}

#[test]
fn test_read_data_restore() {
    let out = session(&[
        "10 READ A,B,C",
        "20 PRINT A+B+C",
        "30 RESTORE",
        "40 READ X",
        "50 PRINT X",
        "60 DATA 1,2,3",
        "RUN",
    ]);
    assert_eq!(out, "6\n1\n");
}

#[test]
fn test_array_and_if() {
    let out = session(&[
        "10 DIM A(5)",
        "20 FOR I=0 TO 5: A(I)=I*I: NEXT I",
        "30 IF A(3)=9 THEN PRINT \"OK\"",
        "RUN",
    ]);
    assert_eq!(out, "OK\n");
}

#[test]
fn test_stop_and_cont() {
    let out = session(&[
        "10 PRINT \"A\"",
        "20 STOP",
        "30 PRINT \"B\"",
        "RUN",
        "CONT",
    ]);
    assert_eq!(out, "A\nBREAK IN 20\nB\n");
}

#[test]
fn test_cont_without_stop() {
    let out = session(&["CONT"]);
    assert_eq!(out, "?CN ERROR\n");
}

#[test]
fn test_cont_used_once() {
    let out = session(&[
        "10 STOP",
        "RUN",
        "CONT",
        "CONT",
    ]);
    assert_eq!(out, "BREAK IN 10\n?CN ERROR\n");
}

#[test]
fn test_stop_in_direct_mode() {
    let out = session(&["STOP"]);
    assert_eq!(out, "BREAK\n");
}

#[test]
fn test_input_splits_on_commas() {
    let out = session_with_input(&["INPUT A,B", "PRINT A+B"], "3,4\n");
    assert_eq!(out, "? 7\n");
}

#[test]
fn test_input_prompt_and_string() {
    let out = session_with_input(&["INPUT \"NAME\"; N$", "PRINT N$"], "BOB\n");
    assert_eq!(out, "NAMEBOB\n");
}

#[test]
fn test_input_inside_program() {
    let out = session_with_input(
        &["10 INPUT X", "20 PRINT X*2", "RUN"],
        "21\n",
    );
    assert_eq!(out, "? 42\n");
}

#[test]
fn test_print_zones() {
    let out = session(&["PRINT \"A\",\"B\""]);
    assert_eq!(out, format!("A{}B\n", " ".repeat(13)));
}

#[test]
fn test_print_tab_and_spc() {
    assert_eq!(session(&["PRINT TAB(5);\"X\""]), "    X\n");
    assert_eq!(session(&["PRINT SPC(3);\"Y\""]), "   Y\n");
}

#[test]
fn test_print_semicolons_run_tight() {
    assert_eq!(session(&["PRINT 1;2;3"]), "123\n");
}

#[test]
fn test_trailing_semicolon_suppresses_newline() {
    let out = session(&["10 PRINT \"A\";", "20 PRINT \"B\"", "RUN"]);
    assert_eq!(out, "AB\n");
}

#[test]
fn test_question_mark_shorthand() {
    assert_eq!(session(&["? 6*7"]), "42\n");
}

#[test]
fn test_if_false_skips_line_tail() {
    let out = session(&[
        "10 IF 0 THEN PRINT \"NO\": PRINT \"NEVER\"",
        "20 PRINT \"YES\"",
        "RUN",
    ]);
    assert_eq!(out, "YES\n");
}

#[test]
fn test_if_with_line_number_target() {
    let out = session(&[
        "10 IF 1 THEN 40",
        "20 PRINT \"SKIPPED\"",
        "30 END",
        "40 PRINT \"JUMPED\"",
        "RUN",
    ]);
    assert_eq!(out, "JUMPED\n");
}

#[test]
fn test_if_true_runs_statement_chain() {
    let out = session(&[
        "10 IF 1 THEN PRINT \"ONE\": PRINT \"TWO\"",
        "RUN",
    ]);
    assert_eq!(out, "ONE\nTWO\n");
}

#[test]
fn test_on_goto_picks_target() {
    let out = session(&[
        "10 ON 2 GOTO 100,200,300",
        "100 PRINT \"FIRST\": END",
        "200 PRINT \"SECOND\": END",
        "300 PRINT \"THIRD\": END",
        "RUN",
    ]);
    assert_eq!(out, "SECOND\n");
}

#[test]
fn test_on_gosub_returns_past_list() {
    let out = session(&[
        "10 ON 1 GOSUB 100",
        "20 PRINT \"AFTER\"",
        "30 END",
        "100 PRINT \"IN\"",
        "110 RETURN",
        "RUN",
    ]);
    assert_eq!(out, "IN\nAFTER\n");
}

#[test]
fn test_on_out_of_range_falls_through() {
    let out = session(&[
        "10 ON 5 GOTO 100,200: PRINT \"FELL\"",
        "20 END",
        "100 PRINT \"WRONG\"",
        "RUN",
    ]);
    assert_eq!(out, "FELL\n");
}

#[test]
fn test_nested_for_loops() {
    let out = session(&[
        "10 FOR I=1 TO 2",
        "20 FOR J=1 TO 2",
        "30 PRINT I*10+J",
        "40 NEXT J",
        "50 NEXT I",
        "RUN",
    ]);
    assert_eq!(out, "11\n12\n21\n22\n");
}

#[test]
fn test_for_negative_step() {
    let out = session(&[
        "10 FOR I=3 TO 1 STEP 0-1",
        "20 PRINT I",
        "30 NEXT",
        "RUN",
    ]);
    assert_eq!(out, "3\n2\n1\n");
}

#[test]
fn test_string_variables_and_functions() {
    let out = session(&[
        "10 A$=\"HELLO\"+\", \"",
        "20 B$=A$+\"WORLD\"",
        "30 PRINT B$",
        "40 PRINT LEN(B$)",
        "50 PRINT MID$(B$,8,3)",
        "RUN",
    ]);
    assert_eq!(out, "HELLO, WORLD\n12\nWOR\n");
}

#[test]
fn test_string_array_elements() {
    let out = session(&[
        "10 DIM W$(2)",
        "20 W$(0)=\"GO\"",
        "30 W$(1)=W$(0)+\"NE\"",
        "40 PRINT W$(1)",
        "RUN",
    ]);
    assert_eq!(out, "GONE\n");
}

#[test]
fn test_string_too_long() {
    let long = format!("10 A$=\"{}\"", "X".repeat(200));
    let out = session(&[
        long.as_str(),
        "20 B$=A$+A$",
        "RUN",
    ]);
    assert_eq!(out, "?ST ERROR IN 20\n");
}

#[test]
fn test_division_by_zero_reports_line() {
    let out = session(&["10 X=1/0", "RUN"]);
    assert_eq!(out, "?/0 ERROR IN 10\n");
}

#[test]
fn test_next_without_for() {
    assert_eq!(session(&["NEXT"]), "?NF ERROR\n");
}

#[test]
fn test_return_without_gosub() {
    let out = session(&["10 RETURN", "RUN"]);
    assert_eq!(out, "?RG ERROR IN 10\n");
}

#[test]
fn test_goto_missing_line() {
    let out = session(&["10 GOTO 99", "RUN"]);
    assert_eq!(out, "?US ERROR IN 10\n");
}

#[test]
fn test_bad_subscript() {
    let out = session(&["10 DIM A(5)", "20 X=A(6)", "RUN"]);
    assert_eq!(out, "?BS ERROR IN 20\n");
}

#[test]
fn test_redimension() {
    let out = session(&["10 DIM A(5)", "20 DIM A(5)", "RUN"]);
    assert_eq!(out, "?DD ERROR IN 20\n");
}

#[test]
fn test_type_mismatch_on_assignment() {
    let out = session(&["10 X=Y$", "RUN"]);
    assert_eq!(out, "?TM ERROR IN 10\n");
}

#[test]
fn test_out_of_data() {
    let out = session(&["10 DATA 1", "20 READ A,B", "RUN"]);
    assert_eq!(out, "?OD ERROR IN 20\n");
}

#[test]
fn test_read_string_data() {
    let out = session(&[
        "10 READ A$,B$",
        "20 PRINT A$;B$",
        "30 DATA \"HI, THERE\",WORLD",
        "RUN",
    ]);
    assert_eq!(out, "HI, THEREWORLD\n");
}

#[test]
fn test_rem_and_tick_are_ignored() {
    let out = session(&[
        "10 REM this: is a comment",
        "20 PRINT \"DONE\" ' trailing words",
        "RUN",
    ]);
    assert_eq!(out, "DONE\n");
}

#[test]
fn test_run_resets_variables() {
    let out = session(&["10 X=X+1", "20 PRINT X", "RUN", "RUN"]);
    assert_eq!(out, "1\n1\n");
}

#[test]
fn test_run_rewinds_data() {
    let out = session(&["10 READ A", "20 PRINT A", "30 DATA 9", "RUN", "RUN"]);
    assert_eq!(out, "9\n9\n");
}

#[test]
fn test_new_erases_program() {
    let out = session(&["10 PRINT 1", "NEW", "LIST", "RUN"]);
    assert_eq!(out, "");
}

#[test]
fn test_clear_resets_variables_midway() {
    let out = session(&["X=7", "PRINT X", "CLEAR", "PRINT X"]);
    assert_eq!(out, "7\n0\n");
}

#[test]
fn test_replacing_a_line() {
    let out = session(&[
        "10 PRINT \"OLD\"",
        "10 PRINT \"NEW\"",
        "RUN",
        "LIST",
    ]);
    assert_eq!(out, "NEW\n10 PRINT \"NEW\"\n");
}

#[test]
fn test_list_detokenizes_keywords() {
    let out = session(&["10 for i=1 to 3 step 2", "LIST"]);
    assert_eq!(out, "10 FOR i=1TO 3STEP 2\n");
}

#[test]
fn test_poke_wait_are_noops() {
    let out = session(&["10 POKE 53280,0", "20 WAIT 1,2", "30 PRINT \"OK\"", "RUN"]);
    assert_eq!(out, "OK\n");
}

#[test]
fn test_def_is_parsed_and_ignored() {
    let out = session(&["10 DEF FN A(X)=X*2", "20 PRINT \"OK\"", "RUN"]);
    assert_eq!(out, "OK\n");
}

#[test]
fn test_mid_boundary_cases() {
    assert_eq!(session(&["PRINT MID$(\"ABCDE\", 3)"]), "CDE\n");
    assert_eq!(session(&["PRINT MID$(\"ABCDE\", 3, 1)"]), "C\n");
    assert_eq!(session(&["PRINT MID$(\"ABC\", 5)"]), "\n");
    assert_eq!(session(&["PRINT LEFT$(\"A\", 10)"]), "A\n");
    assert_eq!(session(&["PRINT LEFT$(\"ABC\", 0)"]), "\n");
}

#[test]
fn test_auto_created_array_has_eleven_cells() {
    let out = session(&["10 PRINT B(5)", "20 PRINT B(10)", "RUN"]);
    assert_eq!(out, "0\n0\n");
}

#[test]
fn test_dim_zero_is_single_cell() {
    let out = session(&["10 DIM A(0)", "20 A(0)=5", "30 PRINT A(0)", "RUN"]);
    assert_eq!(out, "5\n");
}

#[test]
fn test_edit_invalidates_cont() {
    let out = session(&[
        "10 STOP",
        "20 PRINT \"X\"",
        "RUN",
        "30 PRINT \"Y\"",
        "CONT",
    ]);
    assert_eq!(out, "BREAK IN 10\n?CN ERROR\n");
}

#[test]
fn test_multidimensional_array() {
    let out = session(&[
        "10 DIM M(2,2)",
        "20 M(1,2)=7",
        "30 PRINT M(1,2);M(2,1)",
        "RUN",
    ]);
    assert_eq!(out, "70\n");
}

#[test]
fn test_run_from_line() {
    let out = session(&[
        "10 PRINT \"TEN\"",
        "20 PRINT \"TWENTY\"",
        "RUN 20",
    ]);
    assert_eq!(out, "TWENTY\n");
}

#[test]
fn test_implicit_and_explicit_let() {
    let out = session(&["10 LET A=3", "20 B=4", "30 PRINT A*B", "RUN"]);
    assert_eq!(out, "12\n");
}

#[test]
fn test_direct_for_loop() {
    let out = session(&["FOR I=1 TO 3: PRINT I: NEXT I"]);
    assert_eq!(out, "1\n2\n3\n");
}

#[test]
fn test_goto_in_direct_mode_does_not_run() {
    let out = session(&["10 PRINT \"X\"", "GOTO 10"]);
    assert_eq!(out, "");
}
