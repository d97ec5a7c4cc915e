use pdfbug_common::{
    types::{OperationRecord, OperatorList},
    OpcodeTable, BUILTIN_OPS,
};
use pdfbug_engine::{OperatorStepper, ResumeCommand, RowArgs, StepperStatus};
use serde_json::json;
use tracing::info;

fn code(name: &str) -> u32 {
    BUILTIN_OPS.iter().find(|(n, _)| *n == name).map(|(_, c)| *c).unwrap()
}

fn list_of(names: &[&str]) -> OperatorList {
    names.iter().map(|name| OperationRecord::new(code(name), vec![])).collect()
}

/// Runs the hook over `0..len` and collects every index the stepper paused at,
/// answering each pause with `command`.
fn pauses(stepper: &mut OperatorStepper, len: usize, command: ResumeCommand) -> Vec<usize> {
    let mut hits = Vec::new();
    stepper.begin_render();
    for index in 0..len {
        if stepper.on_before_execute(index) {
            hits.push(index);
            stepper.resume(command);
        }
    }
    hits
}

#[test]
fn test_continue_visits_every_breakpoint_in_order() {
    pdfbug_common::logging::ensure_test_logging(None);
    info!("Running test");

    let cases: &[&[usize]] = &[&[], &[0], &[3], &[1, 2, 3], &[0, 9], &[4, 7, 8]];
    for &breakpoints in cases {
        let mut stepper = OperatorStepper::new(0, breakpoints.to_vec());
        assert_eq!(pauses(&mut stepper, 10, ResumeCommand::Continue), breakpoints.to_vec());
        assert_eq!(
            stepper.status(),
            if breakpoints.is_empty() { StepperStatus::Rendering } else { StepperStatus::Finished }
        );
    }
}

#[test]
fn test_continue_targets_next_breakpoint_after_cursor() {
    pdfbug_common::logging::ensure_test_logging(None);
    info!("Running test");

    let breakpoints = vec![2, 5, 11];
    for cursor in 0..15 {
        let mut stepper = OperatorStepper::new(0, breakpoints.clone());
        stepper.begin_render();
        stepper.on_before_execute(cursor);
        stepper.resume(ResumeCommand::Continue);

        let expected = breakpoints.iter().copied().find(|&b| b > cursor);
        assert_eq!(stepper.pending_target(), expected, "cursor {cursor}");
        if expected.is_none() {
            assert_eq!(stepper.status(), StepperStatus::Finished);
        }
    }
}

#[test]
fn test_stepping_pauses_on_every_operation() {
    pdfbug_common::logging::ensure_test_logging(None);
    info!("Running test");

    let mut stepper = OperatorStepper::new(0, vec![3]);
    assert_eq!(pauses(&mut stepper, 8, ResumeCommand::Step), vec![3, 4, 5, 6, 7]);
}

#[test]
fn test_scope_depth_never_negative() {
    pdfbug_common::logging::ensure_test_logging(None);
    info!("Running test");

    let opcodes = OpcodeTable::builtin();
    let list = list_of(&["restore", "save", "save", "restore", "restore", "restore", "fill"]);
    let mut stepper = OperatorStepper::new(0, vec![]);
    stepper.attach(&list, &opcodes);

    let depths: Vec<_> = stepper.rows().iter().map(|row| row.depth).collect();
    assert_eq!(depths, vec![0, 0, 1, 1, 0, 0, 0]);
    assert_eq!(stepper.scope_depth(), 0);
}

#[test]
fn test_progressive_attach_matches_single_attach() {
    pdfbug_common::logging::ensure_test_logging(None);
    info!("Running test");

    let opcodes = OpcodeTable::builtin();
    let names = ["save", "transform", "save", "fill", "restore", "showText", "restore"];
    let full: OperatorList = names
        .iter()
        .map(|name| OperationRecord::new(code(name), vec![json!([{"unicode": "a"}])]))
        .collect();

    let mut at_once = OperatorStepper::new(0, vec![]);
    at_once.attach(&full, &opcodes);

    let mut progressive = OperatorStepper::new(0, vec![]);
    let mut partial = OperatorList::new();
    for chunk in full.as_slice().chunks(2) {
        partial.extend_from_slice(chunk);
        progressive.attach(&partial, &opcodes);
        progressive.attach(&partial, &opcodes);
    }

    assert_eq!(progressive.rows(), at_once.rows());
    assert_eq!(at_once.rows()[3].label, "    fill");
    assert!(matches!(at_once.rows()[5].args, RowArgs::Glyphs(_)));
}

#[test]
fn test_long_arguments_are_summarized() {
    pdfbug_common::logging::ensure_test_logging(None);
    info!("Running test");

    let opcodes = OpcodeTable::builtin();
    let long = "z".repeat(200);
    let numbers: Vec<u32> = (0..20).collect();
    let list: OperatorList =
        vec![OperationRecord::new(code("setGState"), vec![json!(long), json!(numbers)])]
            .into_iter()
            .collect();

    let mut stepper = OperatorStepper::new(0, vec![]);
    stepper.attach(&list, &opcodes);

    let expected = format!(r#"["{}...",[0,1,2,3,4,5,6,7,8,9,"..."]]"#, "z".repeat(75));
    assert_eq!(stepper.rows()[0].args, RowArgs::Summary(expected));
}
