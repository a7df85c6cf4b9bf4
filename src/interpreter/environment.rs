use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use crate::interpreter::object::Object;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecursionToParent {
    Always,
    Never,
}

impl RecursionToParent {
    pub fn should_recurse(&self) -> bool {
        match self {
            RecursionToParent::Always => true,
            RecursionToParent::Never => false,
        }
    }
}

/// One lexical scope. Lookups walk the `outer` chain towards the root,
/// writes always land in the scope they are made on.
#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new_global() -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment::default()))
    }

    pub fn new_enclosed(outer: Rc<RefCell<Environment>>) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment {
            store: HashMap::new(),
            outer: Some(outer),
        }))
    }

    pub fn find_variable(&self, name: &str, recursion: RecursionToParent) -> Option<Object> {
        let found = self.store.get(name).cloned();

        if recursion.should_recurse() {
            found.or_else(|| self.outer.as_ref()
                .and_then(|outer| outer.borrow().find_variable(name, recursion)))
        } else {
            found
        }
    }

    pub fn has_variable(&self, name: &str, recursion: RecursionToParent) -> bool {
        let found = self.store.contains_key(name);

        if !found && recursion.should_recurse() {
            self.outer.as_ref()
                .map(|outer| outer.borrow().has_variable(name, recursion))
                .unwrap_or(false)
        } else {
            found
        }
    }

    /// Binds `name` in this scope, shadowing any outer binding, and returns the value.
    pub fn set(&mut self, name: impl Into<String>, value: Object) -> Object {
        self.store.insert(name.into(), value.clone());
        value
    }
}
