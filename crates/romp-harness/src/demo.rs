//! The demo object roster used by the §8 end-to-end scenarios:
//! `{1 => Echo, 2 => Adder, 3 => Counter, 4 => Yielder, 5 => Thrower}`.
//!
//! Grounded on `romp-server`'s own `main.rs` demo (`DemoTarget`/
//! `DemoResolver`/`DemoInvoker`, Echo and Adder only) extended with the
//! three objects the binary doesn't need but the test suite does: a
//! `Counter` with mutable state shared across calls (exercises that a
//! target may carry interior mutability), a `Yielder` (exercises
//! `invoke_with_yield`), and a `Thrower` (exercises the `EXCEPTION` path
//! end to end).

use std::sync::{Arc, Mutex};

use romp_proto::Value;
use romp_server::{InvokeError, Invoker, Resolver};

/// One of the five demo objects, resolved by object id.
#[derive(Clone)]
pub enum DemoObject {
    /// `("echo", value)` returns `value` unchanged.
    Echo,
    /// `("add", a, b)` returns `a + b`.
    Adder,
    /// `("bump")` increments shared state and returns the new total;
    /// `("read")` returns the current total without changing it.
    Counter(Arc<Mutex<i64>>),
    /// `("each")` yields `1, 2, 3` in order before returning `nil`.
    Yielder,
    /// Any call raises a `RuntimeError` with a two-frame backtrace, to
    /// exercise backtrace propagation end to end.
    Thrower,
}

/// Resolves the five demo objects above by their fixed ids.
#[derive(Default)]
pub struct DemoResolver {
    counter: Arc<Mutex<i64>>,
}

impl DemoResolver {
    /// Builds a resolver with its `Counter` starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Resolver for DemoResolver {
    type Target = DemoObject;

    fn resolve(&self, object_id: u16) -> Option<Self::Target> {
        match object_id {
            1 => Some(DemoObject::Echo),
            2 => Some(DemoObject::Adder),
            3 => Some(DemoObject::Counter(Arc::clone(&self.counter))),
            4 => Some(DemoObject::Yielder),
            5 => Some(DemoObject::Thrower),
            _ => None,
        }
    }
}

/// Invokes methods on the five demo objects.
pub struct DemoInvoker;

impl Invoker for DemoInvoker {
    type Target = DemoObject;

    fn invoke(&self, target: &Self::Target, message: &Value) -> Result<Value, InvokeError> {
        let Value::Array(args) = message else {
            return Err(InvokeError::application("TypeError", "expected an array payload"));
        };
        let Some(Value::Text(method)) = args.first() else {
            return Err(InvokeError::application("TypeError", "missing method name"));
        };

        match target {
            DemoObject::Echo => Ok(args.get(1).cloned().unwrap_or(Value::Null)),
            DemoObject::Adder => {
                let a = args.get(1).and_then(as_i64);
                let b = args.get(2).and_then(as_i64);
                match (a, b) {
                    (Some(a), Some(b)) => Ok(Value::Integer((a + b).into())),
                    _ => Err(InvokeError::application("TypeError", "add expects two integers")),
                }
            },
            DemoObject::Counter(total) => match method.as_str() {
                "bump" => {
                    let Ok(mut total) = total.lock() else {
                        return Err(InvokeError::Internal("counter mutex poisoned".to_string()));
                    };
                    *total += 1;
                    Ok(Value::Integer((*total).into()))
                },
                "read" => {
                    let Ok(total) = total.lock() else {
                        return Err(InvokeError::Internal("counter mutex poisoned".to_string()));
                    };
                    Ok(Value::Integer((*total).into()))
                },
                other => Err(InvokeError::application("NoMethodError", format!("unknown method {other}"))),
            },
            DemoObject::Yielder => {
                let mut on_yield = |_| {};
                self.invoke_with_yield(target, message, &mut on_yield)
            },
            DemoObject::Thrower => Err(InvokeError::application_with_backtrace(
                "RuntimeError",
                "thrower always raises",
                vec!["demo.rs:thrower:inner".to_string(), "demo.rs:thrower:outer".to_string()],
            )),
        }
    }

    fn invoke_with_yield(
        &self,
        target: &Self::Target,
        message: &Value,
        on_yield: &mut dyn FnMut(Value),
    ) -> Result<Value, InvokeError> {
        let DemoObject::Yielder = target else {
            return self.invoke(target, message);
        };
        for value in 1..=3 {
            on_yield(Value::Integer(value.into()));
        }
        Ok(Value::Null)
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    let Value::Integer(integer) = value else { return None };
    i64::try_from(*integer).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn call(target: &DemoObject, method: &str, args: Vec<Value>) -> Result<Value, InvokeError> {
        let mut payload = vec![Value::Text(method.to_string())];
        payload.extend(args);
        DemoInvoker.invoke(target, &Value::Array(payload))
    }

    #[test]
    fn echo_returns_its_argument() {
        let result = call(&DemoObject::Echo, "echo", vec![Value::Text("hi".into())]).unwrap();
        assert_eq!(result, Value::Text("hi".into()));
    }

    #[test]
    fn adder_adds_two_integers() {
        let result =
            call(&DemoObject::Adder, "add", vec![Value::Integer(2.into()), Value::Integer(3.into())]).unwrap();
        assert_eq!(result, Value::Integer(5.into()));
    }

    #[test]
    fn counter_state_persists_across_calls_through_the_resolver() {
        let resolver = DemoResolver::new();
        let first = resolver.resolve(3).unwrap();
        let second = resolver.resolve(3).unwrap();
        assert_eq!(call(&first, "bump", vec![]).unwrap(), Value::Integer(1.into()));
        assert_eq!(call(&second, "bump", vec![]).unwrap(), Value::Integer(2.into()));
        assert_eq!(call(&first, "read", vec![]).unwrap(), Value::Integer(2.into()));
    }

    #[test]
    fn yielder_yields_one_two_three_then_returns_nil() {
        let mut seen = Vec::new();
        let mut on_yield = |value| seen.push(value);
        let result = DemoInvoker
            .invoke_with_yield(&DemoObject::Yielder, &Value::Array(vec![Value::Text("each".into())]), &mut on_yield)
            .unwrap();
        assert_eq!(seen, vec![Value::Integer(1.into()), Value::Integer(2.into()), Value::Integer(3.into())]);
        assert_eq!(result, Value::Null);
    }

    #[test]
    fn thrower_always_raises_with_a_two_frame_backtrace() {
        let err = call(&DemoObject::Thrower, "anything", vec![]).unwrap_err();
        match err {
            InvokeError::Application { class, backtrace, .. } => {
                assert_eq!(class, "RuntimeError");
                assert_eq!(backtrace.len(), 2);
            },
            other => panic!("expected Application, got {other:?}"),
        }
    }
}
