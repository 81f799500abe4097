// vim: tw=80
//! Shared harness for the integration tests: the method signatures of a small
//! mocked interface, a recording callback argument, and the glue a generated
//! proxy would provide around the engine.
#![allow(dead_code)]

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use remock::{
    ArgType, ArgValue, Call, Method, MockCallback, MockControl, MockError,
    MockId, ReturnKind, ReturnValue, Throwable, Value,
};

/// The signatures of the mocked interface the tests share.
pub struct Methods {
    pub return_string: Rc<Method>,
    pub add: Rc<Method>,
    pub do_something: Rc<Method>,
    pub throws_something: Rc<Method>,
    pub call_me: Rc<Method>,
}

impl Methods {
    pub fn new() -> Self {
        Methods {
            return_string: Method::new(
                "returnString",
                ReturnKind::Reference,
                vec![],
                vec![],
            ),
            add: Method::new(
                "add",
                ReturnKind::I32,
                vec![ArgType::new("int"), ArgType::new("int")],
                vec![],
            ),
            do_something: Method::new(
                "doSomething",
                ReturnKind::Void,
                vec![],
                vec![],
            ),
            throws_something: Method::new(
                "throwsSomething",
                ReturnKind::Void,
                vec![ArgType::new("int"), ArgType::new("String")],
                vec!["MyDeclaredException".to_string()],
            ),
            call_me: Method::new(
                "callMe",
                ReturnKind::Void,
                vec![ArgType::callback("AsyncCallback")],
                vec![],
            ),
        }
    }
}

/// Record one invocation while the control is in recording state, discarding
/// the provisional answer the way fluent recording code does.
pub fn record(
    ctrl: &mut MockControl,
    mock: MockId,
    method: &Rc<Method>,
    args: Vec<Value>,
) -> Result<(), MockError> {
    ctrl.invoke(Call::new(mock, Rc::clone(method), args)).map(drop)
}

/// Route one replay invocation through the engine and apply the answer with
/// the invocation's arguments, exactly as a generated proxy would.
///
/// The outer `Result` is the engine verdict; the inner one is the mocked
/// method's own outcome (return value or throwable).
pub fn invoke(
    ctrl: &mut MockControl,
    mock: MockId,
    method: &Rc<Method>,
    args: Vec<Value>,
) -> Result<Result<ReturnValue, Throwable>, MockError> {
    let call_args = args.iter().map(|a| a.clone_arg()).collect();
    let answer = ctrl.invoke(Call::new(mock, Rc::clone(method), call_args))?;
    Ok(answer.resolve(&args))
}

pub fn as_string(value: ReturnValue) -> String {
    value.unwrap().downcast_ref::<String>().unwrap().clone()
}

pub fn as_i32(value: ReturnValue) -> i32 {
    *value.unwrap().downcast_ref::<i32>().unwrap()
}

/// What a [`TestCallback`] was handed, in delivery order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackOutcome {
    Success(Option<String>),
    Failure(String),
}

/// A recording callback argument, standing in for the asynchronous callbacks
/// of the mocked platform.  Clones share one outcome log.
pub struct TestCallback {
    outcomes: Rc<RefCell<Vec<CallbackOutcome>>>,
}

impl TestCallback {
    pub fn new() -> Self {
        TestCallback { outcomes: Rc::new(RefCell::new(Vec::new())) }
    }

    pub fn outcomes(&self) -> Vec<CallbackOutcome> {
        self.outcomes.borrow().clone()
    }
}

impl Clone for TestCallback {
    fn clone(&self) -> Self {
        TestCallback { outcomes: Rc::clone(&self.outcomes) }
    }
}

impl fmt::Debug for TestCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<callback>")
    }
}

impl ArgValue for TestCallback {
    fn eq_value(&self, other: &dyn ArgValue) -> bool {
        other
            .downcast_ref::<TestCallback>()
            .map(|o| Rc::ptr_eq(&self.outcomes, &o.outcomes))
            .unwrap_or(false)
    }

    fn clone_arg(&self) -> Box<dyn ArgValue> {
        Box::new(self.clone())
    }

    fn as_callback(&self) -> Option<&dyn MockCallback> {
        Some(self)
    }
}

impl MockCallback for TestCallback {
    fn on_success(&self, value: Option<&dyn ArgValue>) {
        let value =
            value.and_then(|v| v.downcast_ref::<String>().ok()).cloned();
        self.outcomes.borrow_mut().push(CallbackOutcome::Success(value));
    }

    fn on_failure(&self, error: &Throwable) {
        self.outcomes
            .borrow_mut()
            .push(CallbackOutcome::Failure(error.to_string()));
    }
}
