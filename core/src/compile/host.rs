//! The host environment visible to compiled trees.
//!
//! Free identifiers (a `Member` or `Call` with no receiver) and `New`
//! nodes resolve against this environment at run time. It is built once,
//! through an init closure, and shared read-only by every lambda the
//! owning compiler produces.

use crate::compile::value::{NativeFn, Value};
use hashbrown::HashMap;

/// Globals and constructors registered by the host.
#[derive(Clone, Default, Debug)]
pub struct HostEnv<'a> {
    globals: HashMap<&'a str, Value<'a>>,
    constructors: HashMap<&'a str, &'a NativeFn<'a>>,
}

impl<'a> HostEnv<'a> {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a global value (a constant, record, or function).
    pub fn register(&mut self, name: &'a str, value: Value<'a>) {
        self.globals.insert(name, value);
    }

    /// Register a constructor for `New` nodes naming `type_name`.
    pub fn register_constructor(&mut self, type_name: &'a str, ctor: &'a NativeFn<'a>) {
        self.constructors.insert(type_name, ctor);
    }

    /// Look up a global by name.
    pub fn global(&self, name: &str) -> Option<Value<'a>> {
        self.globals.get(name).copied()
    }

    /// Look up a constructor by type name.
    pub fn constructor(&self, type_name: &str) -> Option<&'a NativeFn<'a>> {
        self.constructors.get(type_name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;

    #[test]
    fn test_register_and_lookup() {
        let arena = Bump::new();
        let mut env = HostEnv::new();
        env.register("pi", Value::Float(3.14159));
        let ctor = NativeFn::new(&arena, "Point", |_, _| Ok(Value::Absent));
        env.register_constructor("Point", ctor);

        assert_eq!(env.global("pi"), Some(Value::Float(3.14159)));
        assert_eq!(env.global("tau"), None);
        assert!(env.constructor("Point").is_some());
        assert!(env.constructor("Circle").is_none());
    }
}
