// vim: tw=80
//! The exact rendering of expectation-failure diagnostics.

use remock::{ExpectationError, MockControl, MockId};

mod common;
use common::{invoke, record, Methods};

fn unexpected(err: remock::MockError) -> String {
    match err.as_expectation().unwrap() {
        ExpectationError::UnexpectedCall(msg) => msg.clone(),
        other => panic!("wrong error: {:?}", other),
    }
}

fn unmet(err: remock::MockError) -> String {
    match err.as_expectation().unwrap() {
        ExpectationError::ExpectationsUnmet(msg) => msg.clone(),
        other => panic!("wrong error: {:?}", other),
    }
}

#[test]
fn unexpected_call_with_empty_registry() {
    let methods = Methods::new();
    let mut ctrl = MockControl::new();
    let mock = MockId::new();
    ctrl.replay().unwrap();

    let err =
        invoke(&mut ctrl, mock, &methods.do_something, vec![]).err().unwrap();
    assert_eq!(
        unexpected(err),
        "\n  Unexpected method call doSomething(). \
         List of all expectations:\n    <empty>\n"
    );
}

#[test]
fn arguments_render_with_debug_formatting() {
    let methods = Methods::new();
    let mut ctrl = MockControl::new();
    let mock = MockId::new();
    ctrl.replay().unwrap();

    let err = invoke(
        &mut ctrl,
        mock,
        &methods.throws_something,
        vec![remock::arg(5i32), remock::arg("abc".to_string())],
    )
    .err()
    .unwrap();
    assert_eq!(
        unexpected(err),
        "\n  Unexpected method call throwsSomething(5, \"abc\"). \
         List of all expectations:\n    <empty>\n"
    );
}

#[test]
fn unexpected_call_lists_every_expectation() {
    let methods = Methods::new();
    let mut ctrl = MockControl::new();
    let mock = MockId::new();

    record(
        &mut ctrl,
        mock,
        &methods.add,
        vec![remock::arg(1i32), remock::arg(2i32)],
    )
    .unwrap();
    ctrl.expect_last_call().unwrap().and_return(3i32).unwrap();
    record(&mut ctrl, mock, &methods.do_something, vec![]).unwrap();
    ctrl.expect_last_call().unwrap().times(2).unwrap();
    ctrl.replay().unwrap();

    invoke(&mut ctrl, mock, &methods.do_something, vec![]).unwrap().unwrap();
    let err = invoke(&mut ctrl, mock, &methods.return_string, vec![])
        .err()
        .unwrap();
    assert_eq!(
        unexpected(err),
        "\n  Unexpected method call returnString(). \
         List of all expectations:\
         \n  Potential matches are marked with (+1).\
         \n    --> add(1, 2): expected 1, actual 0\
         \n    --> doSomething(): expected 2, actual 1\n"
    );
}

#[test]
fn structural_matches_are_annotated() {
    let methods = Methods::new();
    let mut ctrl = MockControl::new();
    let mock = MockId::new();

    record(&mut ctrl, mock, &methods.do_something, vec![]).unwrap();
    ctrl.expect_last_call().unwrap().times(1).unwrap();
    ctrl.replay().unwrap();

    invoke(&mut ctrl, mock, &methods.do_something, vec![]).unwrap().unwrap();
    // The expectation is exhausted, so the call fails, but it still counts
    // as a potential match.
    let err =
        invoke(&mut ctrl, mock, &methods.do_something, vec![]).err().unwrap();
    assert_eq!(
        unexpected(err),
        "\n  Unexpected method call doSomething(). \
         List of all expectations:\
         \n  Potential matches are marked with (+1).\
         \n        doSomething(): expected 1, actual 1 (+1)\n"
    );
}

#[test]
fn verify_failure_lists_met_and_unmet_entries() {
    let methods = Methods::new();
    let mut ctrl = MockControl::new();
    let mock = MockId::new();

    record(&mut ctrl, mock, &methods.return_string, vec![]).unwrap();
    ctrl.expect_last_call()
        .unwrap()
        .and_return("x".to_string())
        .unwrap();
    record(&mut ctrl, mock, &methods.do_something, vec![]).unwrap();
    ctrl.expect_last_call().unwrap().times(2).unwrap();
    ctrl.replay().unwrap();

    invoke(&mut ctrl, mock, &methods.return_string, vec![]).unwrap().unwrap();
    invoke(&mut ctrl, mock, &methods.do_something, vec![]).unwrap().unwrap();

    let err = ctrl.verify().err().unwrap();
    assert_eq!(
        unmet(err),
        "\n  Expectation failure on verify. \
         List of all expectations:\
         \n        returnString(): expected 1, actual 1\
         \n    --> doSomething(): expected 2, actual 1\n"
    );
}

#[test]
fn open_ended_ranges_render_as_at_least() {
    let methods = Methods::new();
    let mut ctrl = MockControl::new();
    let mock = MockId::new();

    record(&mut ctrl, mock, &methods.do_something, vec![]).unwrap();
    ctrl.expect_last_call().unwrap().at_least_once().unwrap();
    ctrl.replay().unwrap();

    let err = ctrl.verify().err().unwrap();
    assert_eq!(
        unmet(err),
        "\n  Expectation failure on verify. \
         List of all expectations:\
         \n    --> doSomething(): expected at least 1, actual 0\n"
    );
}

#[test]
fn bounded_ranges_render_as_between() {
    let methods = Methods::new();
    let mut ctrl = MockControl::new();
    let mock = MockId::new();

    record(&mut ctrl, mock, &methods.do_something, vec![]).unwrap();
    ctrl.expect_last_call().unwrap().times_range(2, 3).unwrap();
    ctrl.replay().unwrap();

    invoke(&mut ctrl, mock, &methods.do_something, vec![]).unwrap().unwrap();
    let err = ctrl.verify().err().unwrap();
    assert_eq!(
        unmet(err),
        "\n  Expectation failure on verify. \
         List of all expectations:\
         \n    --> doSomething(): expected between 2 and 3, actual 1\n"
    );
}

#[test]
fn explicit_matchers_render_their_descriptions() {
    let methods = Methods::new();
    let mut ctrl = MockControl::new();
    let mock = MockId::new();

    ctrl.report_matcher(remock::matcher::any()).unwrap();
    ctrl.report_matcher(remock::matcher::eq(2i32)).unwrap();
    record(
        &mut ctrl,
        mock,
        &methods.add,
        vec![remock::arg(0i32), remock::arg(0i32)],
    )
    .unwrap();
    ctrl.expect_last_call().unwrap().and_return(0i32).unwrap();
    ctrl.replay().unwrap();

    let err = ctrl.verify().err().unwrap();
    assert_eq!(
        unmet(err),
        "\n  Expectation failure on verify. \
         List of all expectations:\
         \n    --> add(<any>, 2): expected 1, actual 0\n"
    );
}
