//! Transform hooks
//!
//! An encoder runs once on the whole value before it is serialized, and a
//! decoder runs once on the whole value after it is rebuilt. Neither is
//! applied recursively; a hook that wants to rewrite nested values walks them
//! itself. Hooks should return values they do not recognize unchanged.

use std::fmt;
use std::sync::Arc;

use tinypack_format::{Result, Value};

type TransformFn = dyn Fn(Value) -> Result<Value> + Send + Sync;

/// A top-level value transform
#[derive(Clone)]
pub struct Hook(Arc<TransformFn>);

impl Hook {
    /// Wrap a transform function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Hook that returns its input
    pub fn identity() -> Self {
        Self::new(Ok)
    }

    /// Run the transform
    pub fn apply(&self, value: Value) -> Result<Value> {
        (self.0)(value)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Hook(..)")
    }
}

/// Apply `hook` if present; absent hooks are the identity
pub fn apply_hook(hook: Option<&Hook>, value: Value) -> Result<Value> {
    match hook {
        Some(hook) => hook.apply(value),
        None => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinypack_format::PackError;

    #[test]
    fn test_absent_hook_is_identity() {
        let value = Value::array([1, 2]);
        assert_eq!(apply_hook(None, value.clone()).unwrap(), value);
        assert_eq!(
            apply_hook(Some(&Hook::identity()), value.clone()).unwrap(),
            value
        );
    }

    #[test]
    fn test_hook_runs_once_on_top_level() {
        let wrap = Hook::new(|v| Ok(Value::array([v])));
        let out = wrap.apply(Value::array([1])).unwrap();
        assert_eq!(out, Value::array([Value::array([1])]));
    }

    #[test]
    fn test_hook_error_propagates() {
        let fail = Hook::new(|_| Err(PackError::Hook("boom".to_string())));
        assert!(matches!(
            apply_hook(Some(&fail), Value::Null),
            Err(PackError::Hook(msg)) if msg == "boom"
        ));
    }
}
