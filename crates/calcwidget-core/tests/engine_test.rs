use calcwidget_core::*;
use proptest::prelude::*;

const ID: InstanceId = InstanceId(1);

fn press_all(engine: &mut CalculatorEngine, id: InstanceId, buttons: &str) -> Vec<PressOutcome> {
    buttons
        .chars()
        .map(|glyph| engine.press_glyph(id, glyph).expect("keypad glyph"))
        .collect()
}

fn run(buttons: &str) -> String {
    let mut engine = CalculatorEngine::new();
    press_all(&mut engine, ID, buttons);
    engine.display(ID)
}

const DELETE: char = '\u{007F}';
const CLEAR: char = '\u{239A}';
const COPY: char = '\u{2402}';

#[test]
fn digits_display_verbatim() {
    assert_eq!(run("0012.50"), "0012.50");
}

#[test]
fn two_plus_three() {
    assert_eq!(run("2+3="), "5");
}

#[test]
fn evaluation_is_left_to_right() {
    assert_eq!(run("2+3×4="), "20");
}

#[test]
fn division_by_zero_shows_undefined() {
    let mut engine = CalculatorEngine::new();
    let outcomes = press_all(&mut engine, ID, "6÷0=");
    assert!(matches!(
        outcomes.last(),
        Some(PressOutcome::Failed { error: EvalError::DivisionByZero, .. })
    ));
    assert_eq!(engine.display(ID), "undefined");
}

#[test]
fn consecutive_operator_is_a_no_op() {
    let mut engine = CalculatorEngine::new();
    let outcomes = press_all(&mut engine, ID, "2+×");
    assert_eq!(
        outcomes[2],
        PressOutcome::Ignored { reason: IgnoreReason::ConsecutiveOperator }
    );
    assert_eq!(engine.display(ID), "2+");
}

#[test]
fn operator_on_empty_instance_is_a_no_op() {
    let mut engine = CalculatorEngine::new();
    let outcomes = press_all(&mut engine, ID, "×");
    assert_eq!(
        outcomes[0],
        PressOutcome::Ignored { reason: IgnoreReason::OperatorWithoutOperand }
    );
    assert_eq!(engine.display(ID), "");
}

#[test]
fn continue_from_previous_result() {
    assert_eq!(run("5=+3="), "8");
}

#[test]
fn continued_result_is_shown_verbatim_while_typing() {
    assert_eq!(run("1÷4=×"), "0.25×");
}

#[test]
fn digit_after_result_starts_fresh_expression() {
    let mut engine = CalculatorEngine::new();
    press_all(&mut engine, ID, "5=7");
    assert_eq!(engine.display(ID), "7");
    assert_eq!(engine.state(ID).and_then(InstanceState::last_result), Some("5"));

    press_all(&mut engine, ID, "=");
    assert_eq!(engine.display(ID), "7");
}

#[test]
fn operator_continuation_only_applies_to_an_empty_buffer() {
    // "5=" leaves a result; "7+" extends the new expression, not the old result
    assert_eq!(run("5=7+1="), "8");
}

#[test]
fn clear_resets_display_and_result() {
    let mut engine = CalculatorEngine::new();
    press_all(&mut engine, ID, "9×9=");
    assert_eq!(engine.display(ID), "81");

    press_all(&mut engine, ID, &CLEAR.to_string());
    assert_eq!(engine.display(ID), "");
    assert_eq!(engine.state(ID).and_then(InstanceState::last_result), None);

    let outcomes = press_all(&mut engine, ID, "+");
    assert_eq!(
        outcomes[0],
        PressOutcome::Ignored { reason: IgnoreReason::OperatorWithoutOperand }
    );
}

#[test]
fn delete_on_empty_is_a_no_op() {
    let mut engine = CalculatorEngine::new();
    let outcomes = press_all(&mut engine, ID, &DELETE.to_string());
    assert_eq!(outcomes[0], PressOutcome::Ignored { reason: IgnoreReason::NothingToDelete });
}

#[test]
fn delete_removes_one_token_at_a_time() {
    let mut engine = CalculatorEngine::new();
    press_all(&mut engine, ID, "12+3");
    let expected = ["12+", "12", "1", ""];
    for shown in expected {
        press_all(&mut engine, ID, &DELETE.to_string());
        assert_eq!(engine.display(ID), shown);
    }
}

#[test]
fn delete_can_reopen_a_decimal_point() {
    assert_eq!(run(&format!("1.{DELETE}.5")), "1.5");
}

#[test]
fn result_formatting() {
    assert_eq!(run("8÷2="), "4");
    assert_eq!(run("33÷8="), "4.125");
    assert_eq!(run("1÷3="), "0.33333333");
    assert_eq!(run("2÷3="), "0.66666667");
}

#[test]
fn negative_results_continue() {
    assert_eq!(run("2−5="), "-3");
    assert_eq!(run("2−5=×2="), "-6");
}

#[test]
fn trailing_operator_fails_without_panicking() {
    assert_eq!(run("2+="), "undefined");
}

#[test]
fn lone_dot_fails_without_panicking() {
    assert_eq!(run(".="), "undefined");
}

#[test]
fn copy_without_result_is_a_no_op() {
    let mut engine = CalculatorEngine::new();
    let outcomes = press_all(&mut engine, ID, &format!("12{COPY}"));
    assert_eq!(outcomes[2], PressOutcome::Ignored { reason: IgnoreReason::NoResultToCopy });
}

#[test]
fn copy_after_result_requests_clipboard() {
    let mut engine = CalculatorEngine::new();
    let outcomes = press_all(&mut engine, ID, &format!("4×4={COPY}"));
    assert_eq!(
        outcomes.last(),
        Some(&PressOutcome::CopyRequested(CopyRequest {
            label: "result".to_string(),
            text: "16".to_string(),
            confirmation: "Copied 16".to_string(),
        }))
    );
    assert_eq!(engine.display(ID), "16");
}

#[test]
fn instances_are_independent() {
    let mut engine = CalculatorEngine::new();
    let other = InstanceId(2);
    press_all(&mut engine, ID, "1+");
    press_all(&mut engine, other, "9=");
    press_all(&mut engine, ID, "1=");

    assert_eq!(engine.display(ID), "2");
    assert_eq!(engine.display(other), "9");
    assert_eq!(engine.instance_ids(), vec![ID, other]);
}

#[test]
fn removing_an_instance_purges_its_state() {
    let mut engine = CalculatorEngine::new();
    press_all(&mut engine, ID, "7=");
    assert!(engine.remove_instance(ID));
    assert!(!engine.remove_instance(ID));
    assert_eq!(engine.display(ID), "");
    assert_eq!(engine.instance_count(), 0);
}

#[test]
fn unknown_glyph_is_a_button_error() {
    let mut engine = CalculatorEngine::new();
    let err = engine.press_glyph(ID, '%').unwrap_err();
    assert_eq!(err.category(), "button");
    assert_eq!(engine.instance_count(), 0);
}

#[test]
fn custom_configuration_changes_labels_and_precision() {
    let config = EngineConfig {
        max_fraction_digits: 3,
        error_label: "Error".to_string(),
        ..EngineConfig::default()
    };
    let mut engine = CalculatorEngine::with_config(config).unwrap();
    press_all(&mut engine, ID, "1÷3=");
    assert_eq!(engine.display(ID), "0.333");
    press_all(&mut engine, InstanceId(2), "1÷0=");
    assert_eq!(engine.display(InstanceId(2)), "Error");
}

#[test]
fn operator_error_label_is_refused_by_the_engine() {
    let config = EngineConfig { error_label: "+".to_string(), ..EngineConfig::default() };
    assert!(CalculatorEngine::with_config(config).is_err());
}

#[test]
fn failure_then_operator_keeps_operators_apart() {
    let config = EngineConfig { error_label: "Error".to_string(), ..EngineConfig::default() };
    let mut engine = CalculatorEngine::with_config(config).unwrap();
    press_all(&mut engine, ID, "6÷0=×");
    let buffer = engine.state(ID).map(|state| state.buffer().to_vec()).unwrap_or_default();
    assert_eq!(buffer, vec!["Error", "×"]);
    assert!(!calcwidget_types::is_operator(&buffer[0]));
}

#[test]
fn out_of_range_digit_leaves_the_instance_untouched() {
    let mut engine = CalculatorEngine::new();
    let outcome = engine.press(ID, ButtonToken::Digit(12));
    assert_eq!(outcome, PressOutcome::Ignored { reason: IgnoreReason::DigitOutOfRange });
    assert_eq!(engine.display(ID), "");

    let token: ButtonToken = serde_json::from_str(r#"{"digit":12}"#).unwrap();
    press_all(&mut engine, ID, "7");
    assert!(!engine.press(ID, token).changed_state());
    assert_eq!(engine.display(ID), "7");
}

#[test]
fn snapshot_reports_phase_and_display() {
    let mut engine = CalculatorEngine::new();
    press_all(&mut engine, ID, "3+");
    let snapshot = engine.snapshot(ID);
    assert_eq!(snapshot.phase, Phase::Accumulating);
    assert_eq!(snapshot.buffer, vec!["3", "+"]);
    assert_eq!(snapshot.display, "3+");

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["phase"], "accumulating");
    assert_eq!(json["id"], 1);
}

fn operand_glyph() -> impl Strategy<Value = char> {
    prop_oneof![9 => proptest::char::range('0', '9'), 1 => Just('.')]
}

fn any_keypad_glyph() -> impl Strategy<Value = char> {
    proptest::sample::select(vec![
        '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '.', '÷', '×', '\u{2212}', '+', '=',
        DELETE, CLEAR, COPY,
    ])
}

proptest! {
    #[test]
    fn single_dot_digit_runs_display_verbatim(digits in proptest::collection::vec(operand_glyph(), 1..20)) {
        let mut engine = CalculatorEngine::new();
        let mut expected = String::new();
        let mut seen_dot = false;
        for glyph in digits {
            if glyph == '.' {
                if seen_dot { continue; }
                seen_dot = true;
            }
            expected.push(glyph);
            engine.press_glyph(ID, glyph).unwrap();
        }
        prop_assert_eq!(engine.display(ID), expected);
    }

    #[test]
    fn buffer_invariants_hold_for_any_press_sequence(glyphs in proptest::collection::vec(any_keypad_glyph(), 0..60)) {
        let mut engine = CalculatorEngine::new();
        for glyph in glyphs {
            engine.press_glyph(ID, glyph).unwrap();

            let buffer = engine.state(ID).map(|state| state.buffer().to_vec()).unwrap_or_default();
            let is_op = |token: &String| calcwidget_types::is_operator(token);
            for pair in buffer.windows(2) {
                prop_assert!(!(is_op(&pair[0]) && is_op(&pair[1])));
            }
            for run in buffer.split(|token| is_op(token)) {
                let dots: usize = run.iter().map(|token| token.matches('.').count()).sum();
                prop_assert!(dots <= 1);
            }
        }
    }
}
