//! Variable scopes at run time.

use crate::value::{Namespace, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// A mutable namespace with an optional enclosing scope. Functions capture
/// the scope they were defined in, so nested functions can read the locals
/// of the function around them.
pub(crate) struct Scope<'a> {
    vars: RefCell<Namespace<'a>>,
    parent: Option<Rc<Scope<'a>>>,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(parent: Option<Rc<Scope<'a>>>) -> Rc<Self> {
        Rc::new(Self {
            vars: RefCell::new(Namespace::default()),
            parent,
        })
    }

    pub(crate) fn get(&self, name: &str) -> Option<Value<'a>> {
        self.vars.borrow().get(name).cloned()
    }

    /// Search this scope, then each enclosing one.
    pub(crate) fn lookup(&self, name: &str) -> Option<Value<'a>> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some(value) = current.get(name) {
                return Some(value);
            }
            scope = current.parent.as_deref();
        }
        None
    }

    pub(crate) fn set(&self, name: &'a str, value: Value<'a>) {
        self.vars.borrow_mut().insert(name, value);
    }

    pub(crate) fn take_vars(&self) -> Namespace<'a> {
        std::mem::take(&mut *self.vars.borrow_mut())
    }
}
