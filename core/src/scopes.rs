//! Identity-keyed parameter scopes.
//!
//! Used by both the evaluator (binds values) and the reifier (binds
//! synthesized binder names). Frames are keyed by parameter *identity*,
//! never by name: two parameters spelled `x` are unrelated binders unless
//! they are the same node, so a name-keyed stack would conflate them.
//!
//! Lookup searches frames from innermost to outermost; within a frame,
//! entries are scanned in push order. Frames are small (a lambda's
//! parameter list), so a linear scan beats any map here.

use crate::Vec;
use crate::tree::Expr;
use core::ptr;

/// One scope frame: parameter identities paired with bound data.
pub type ScopeFrame<'a, T> = Vec<(&'a Expr<'a>, T)>;

/// A stack of parameter scopes.
pub struct ParamScopes<'a, T> {
    frames: Vec<ScopeFrame<'a, T>>,
}

impl<'a, T> ParamScopes<'a, T> {
    /// Create an empty scope stack.
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Number of frames currently pushed.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Push a frame. An empty frame still counts toward `depth`: a
    /// zero-parameter scope is a scope.
    pub fn push(&mut self, frame: ScopeFrame<'a, T>) {
        self.frames.push(frame);
    }

    /// Pop the innermost frame.
    pub fn pop(&mut self) {
        let popped = self.frames.pop();
        debug_assert!(popped.is_some(), "scope stack underflow");
    }

    /// Look up a parameter identity, innermost frame first.
    pub fn lookup(&self, param: &'a Expr<'a>) -> Option<&T> {
        for frame in self.frames.iter().rev() {
            for (bound, value) in frame {
                if ptr::eq(*bound, param) {
                    return Some(value);
                }
            }
        }
        None
    }

    /// Replace the innermost binding of a parameter identity.
    ///
    /// Returns `false` when the identity is bound in no frame.
    pub fn assign(&mut self, param: &'a Expr<'a>, value: T) -> bool {
        for frame in self.frames.iter_mut().rev() {
            for (bound, slot) in frame {
                if ptr::eq(*bound, param) {
                    *slot = value;
                    return true;
                }
            }
        }
        false
    }
}

impl<'a, T: Copy> ParamScopes<'a, T> {
    /// Snapshot every binding, innermost first, as one flat frame.
    ///
    /// Closures capture with this: the innermost-first order preserves
    /// shadowing once the snapshot is scanned in push order.
    pub fn flatten(&self) -> ScopeFrame<'a, T> {
        let mut flat = Vec::new();
        for frame in self.frames.iter().rev() {
            flat.extend(frame.iter().copied());
        }
        flat
    }
}

impl<'a, T> Default for ParamScopes<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ExprBuilder;
    use crate::vec;
    use bumpalo::Bump;

    #[test]
    fn test_lookup_is_identity_based() {
        let arena = Bump::new();
        let b = ExprBuilder::new(&arena);
        let x1 = b.parameter("x");
        let x2 = b.parameter("x");

        let mut scopes = ParamScopes::new();
        scopes.push(vec![(x1, 1)]);

        // Same name, different identity: no binding.
        assert_eq!(scopes.lookup(x1), Some(&1));
        assert_eq!(scopes.lookup(x2), None);
    }

    #[test]
    fn test_innermost_frame_wins() {
        let arena = Bump::new();
        let b = ExprBuilder::new(&arena);
        let x = b.parameter("x");

        let mut scopes = ParamScopes::new();
        scopes.push(vec![(x, 1)]);
        scopes.push(vec![(x, 2)]);
        assert_eq!(scopes.lookup(x), Some(&2));

        scopes.pop();
        assert_eq!(scopes.lookup(x), Some(&1));
    }

    #[test]
    fn test_assign_hits_innermost_binding() {
        let arena = Bump::new();
        let b = ExprBuilder::new(&arena);
        let x = b.parameter("x");
        let y = b.parameter("y");

        let mut scopes = ParamScopes::new();
        scopes.push(vec![(x, 1)]);
        scopes.push(vec![(x, 2)]);

        assert!(scopes.assign(x, 20));
        assert_eq!(scopes.lookup(x), Some(&20));
        assert!(!scopes.assign(y, 5));

        scopes.pop();
        // The outer binding was untouched.
        assert_eq!(scopes.lookup(x), Some(&1));
    }

    #[test]
    fn test_empty_frame_counts_toward_depth() {
        let arena = Bump::new();
        let b = ExprBuilder::new(&arena);
        let _ = b;

        let mut scopes: ParamScopes<'_, i64> = ParamScopes::new();
        assert_eq!(scopes.depth(), 0);
        scopes.push(Vec::new());
        assert_eq!(scopes.depth(), 1);
    }

    #[test]
    fn test_flatten_preserves_shadowing() {
        let arena = Bump::new();
        let b = ExprBuilder::new(&arena);
        let x = b.parameter("x");
        let y = b.parameter("y");

        let mut scopes = ParamScopes::new();
        scopes.push(vec![(x, 1), (y, 10)]);
        scopes.push(vec![(x, 2)]);

        let flat = scopes.flatten();
        // Scanning in push order must find the inner `x` first.
        let first_x = flat
            .iter()
            .find(|(p, _)| core::ptr::eq(*p, x))
            .map(|(_, v)| *v);
        assert_eq!(first_x, Some(2));
        assert_eq!(flat.len(), 3);
    }
}
