use vex::vex::{CompileError, VexError};
use vex::Vex;

fn run(source: &str) -> (Result<(), VexError>, String) {
    let mut output = Vec::new();
    let result = {
        let mut vex = Vex::new(&mut output);
        vex.run(source, false)
    };
    (result, String::from_utf8(output).expect("output not utf-8"))
}

fn assert_prints(source: &str, expected: &str) {
    let (result, output) = run(source);
    assert!(result.is_ok(), "{:?} failed: {:?}", source, result.err());
    assert_eq!(output, expected, "for {:?}", source);
}

fn assert_compile_errors(source: &str, expected_count: usize) -> Vec<CompileError> {
    let (result, output) = run(source);
    assert_eq!(output, "", "compile errors must suppress execution");
    match result {
        Err(VexError::Compile(diagnostics)) => {
            assert_eq!(
                diagnostics.len(),
                expected_count,
                "for {:?}: {:?}",
                source,
                diagnostics
            );
            diagnostics
        }
        other => panic!("expected compile errors for {:?}, got {:?}", source, other),
    }
}

fn assert_runtime_error(source: &str, expected_output: &str, message_fragment: &str) {
    let (result, output) = run(source);
    assert_eq!(output, expected_output, "for {:?}", source);
    match result {
        Err(VexError::Runtime(err)) => {
            let rendered = err.to_string();
            assert!(
                rendered.contains(message_fragment),
                "expected {:?} in {:?}",
                message_fragment,
                rendered
            );
        }
        other => panic!("expected a runtime error for {:?}, got {:?}", source, other),
    }
}

#[test]
fn arithmetic_prints_ieee_results_without_trailing_zero() {
    assert_prints("print 1 + 1;", "2\n");
    assert_prints("print 5 / 2;", "2.5\n");
    assert_prints("print 7 - 2 * 3;", "1\n");
    assert_prints("print (7 - 2) * 3;", "15\n");
}

#[test]
fn string_concatenation_round_trip() {
    assert_prints("print \"a\" + \"b\";", "ab\n");
}

#[test]
fn mixed_concatenation_is_a_type_error() {
    assert_runtime_error(
        "print \"a\" + 1;",
        "",
        "Operands must be two numbers or two strings.",
    );
}

#[test]
fn variable_lifecycle() {
    assert_prints("var x = 1; x = 2; print x;", "2\n");
}

#[test]
fn undefined_variable_reports_its_line() {
    assert_runtime_error("print y;", "", "[line 1] Undefined variable 'y'.");
}

#[test]
fn redeclaration_shadows_without_error() {
    assert_prints("var x = 1; var x = 2; print x;", "2\n");
}

#[test]
fn truthiness_and_equality() {
    assert_prints("print !nil;", "true\n");
    assert_prints("print nil == nil;", "true\n");
    assert_prints("print nil == false;", "false\n");
}

#[test]
fn line_comment_is_ignored() {
    assert_prints("// comment\nprint 1;", "1\n");
}

#[test]
fn block_comment_keeps_line_numbers_honest() {
    // The comment spans two lines, so the bad statement after it is on line 2
    assert_runtime_error("/* a \n b */ print y;", "", "[line 2]");
}

#[test]
fn two_bad_statements_yield_two_diagnostics_and_no_output() {
    assert_compile_errors("print ;\nvar = 1;\nprint 1;", 2);
}

#[test]
fn lexical_and_syntax_errors_surface_in_one_pass() {
    let diagnostics = assert_compile_errors("@\nprint ;", 2);
    assert!(matches!(diagnostics[0], CompileError::Scan(_)));
    assert!(matches!(diagnostics[1], CompileError::Parse(_)));
}

#[test]
fn compile_error_suppresses_every_statement() {
    // The first statement is fine on its own, but the later syntax error
    // must keep it from running
    assert_compile_errors("print 1;\nprint ;", 1);
}

#[test]
fn runtime_error_leaves_partial_output() {
    assert_runtime_error("print 1; print y; print 2;", "1\n", "Undefined variable");
}

#[test]
fn repl_session_keeps_bindings_across_runs() {
    let mut output = Vec::new();
    {
        let mut vex = Vex::new(&mut output);
        assert!(vex.run("var x = 1;", true).is_ok());
        // Bare expressions echo their value
        assert!(vex.run("x + 1", true).is_ok());
        // A runtime error does not reset the environment
        assert!(matches!(
            vex.run("print missing;", true),
            Err(VexError::Runtime(_))
        ));
        // Neither does a compile error
        assert!(matches!(
            vex.run("var y = ;", true),
            Err(VexError::Compile(_))
        ));
        assert!(vex.run("print x;", true).is_ok());
    }
    assert_eq!(String::from_utf8(output).unwrap(), "2\n1\n");
}

#[test]
fn assignment_evaluates_to_the_assigned_value() {
    assert_prints("var x = 1; print x = 5;", "5\n");
}

#[test]
fn unterminated_string_is_a_compile_error() {
    let diagnostics = assert_compile_errors("print \"oops;", 2);
    // The scan error comes first, then the parser trips over the missing
    // expression
    assert!(matches!(diagnostics[0], CompileError::Scan(_)));
}
