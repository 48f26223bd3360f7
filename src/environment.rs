//! Scope chain.
//!
//! Two pieces cooperate here:
//!
//! * [`GlobalScope`] is the one global symbol table of a running program.
//!   Function and class definitions always land in it, whatever the nesting
//!   depth of the definition.  There is no module isolation: redefining a name
//!   silently replaces the old binding for every later lookup.
//! * [`Environment`] is a lexical scope.  A local scope owns its bindings and
//!   borrows its parent, so it cannot outlive the call or `let` that created
//!   it.  The root environment has no bindings of its own and resolves
//!   straight against the [`GlobalScope`].
//!
//! The global scope also carries the call‑depth counter that turns runaway
//! recursion into [`LangError::DepthExceeded`].  Nothing here is process‑wide:
//! independent interpreters use independent global scopes.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use log::{debug, info};

use crate::error::{LangError, Result};
use crate::value::Value;

pub struct GlobalScope {
    bindings: RefCell<HashMap<String, Value>>,
    depth: Cell<usize>,
    max_call_depth: usize,
}

impl GlobalScope {
    pub fn new(max_call_depth: usize) -> Self {
        info!("Global scope created (max call depth {})", max_call_depth);

        Self {
            bindings: RefCell::new(HashMap::new()),
            depth: Cell::new(0),
            max_call_depth,
        }
    }

    /// Bind `name`, replacing any previous global binding.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        let name: String = name.into();

        debug!("Defining global '{}' = {}", name, value);

        if self.bindings.borrow_mut().insert(name, value).is_some() {
            debug!("Previous global binding overwritten");
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.bindings.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }

    /// Current user‑function call depth.
    pub fn call_depth(&self) -> usize {
        self.depth.get()
    }

    pub fn max_call_depth(&self) -> usize {
        self.max_call_depth
    }

    /// Account for one more nested user‑function call.  The returned guard
    /// gives the slot back when dropped, on success and error paths alike.
    pub(crate) fn enter_call(&self) -> Result<CallGuard<'_>> {
        let depth: usize = self.depth.get();

        if depth >= self.max_call_depth {
            debug!("Call depth limit {} reached", self.max_call_depth);

            return Err(LangError::DepthExceeded {
                limit: self.max_call_depth,
            });
        }

        self.depth.set(depth + 1);

        Ok(CallGuard { globals: self })
    }
}

pub(crate) struct CallGuard<'g> {
    globals: &'g GlobalScope,
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        let depth: usize = self.globals.depth.get();
        self.globals.depth.set(depth.saturating_sub(1));
    }
}

enum Frame<'a> {
    Global,
    Local {
        values: HashMap<String, Value>,
        parent: &'a Environment<'a>,
    },
}

/// One lexical scope in the chain.
pub struct Environment<'a> {
    frame: Frame<'a>,
    globals: &'a GlobalScope,
}

impl<'a> Environment<'a> {
    /// The root of every chain.
    pub fn global(globals: &'a GlobalScope) -> Self {
        Self {
            frame: Frame::Global,
            globals,
        }
    }

    /// A fresh, empty scope whose parent is `self`.
    pub fn new_scope(&self) -> Environment<'_> {
        Environment {
            frame: Frame::Local {
                values: HashMap::new(),
                parent: self,
            },
            globals: self.globals,
        }
    }

    pub fn globals(&self) -> &'a GlobalScope {
        self.globals
    }

    /// Resolve `name` from the innermost scope outwards; the first match wins.
    pub fn get(&self, name: &str) -> Result<Value> {
        let mut scope: &Environment<'_> = self;

        loop {
            match &scope.frame {
                Frame::Local { values, parent } => {
                    if let Some(value) = values.get(name) {
                        return Ok(value.clone());
                    }
                    scope = *parent;
                }

                Frame::Global => {
                    return self
                        .globals
                        .lookup(name)
                        .ok_or_else(|| LangError::unbound(name));
                }
            }
        }
    }

    /// Bind `name` in the current scope only.  On the root environment the
    /// current scope is the global one.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        match &mut self.frame {
            Frame::Local { values, .. } => {
                values.insert(name.into(), value);
            }
            Frame::Global => self.globals.define(name, value),
        }
    }

    /// Bind `name` in the global scope regardless of the current depth.
    pub fn define_global(&self, name: impl Into<String>, value: Value) {
        self.globals.define(name, value);
    }

    /// Evaluate `body` in a child scope where `name` is bound to the
    /// already evaluated `value`.  The child scope is gone once this returns.
    pub fn let_in<F>(&self, name: &str, value: Value, body: F) -> Result<Value>
    where
        F: for<'s> FnOnce(&'s Environment<'s>) -> Result<Value>,
    {
        let mut scope: Environment<'_> = self.new_scope();
        scope.set(name, value);

        body(&scope)
    }
}
