//! Lexical environments
//!
//! A scope chain is a list of frames linked to their parents. Frames are
//! shared (`Rc<RefCell<..>>`): closures keep the frame they were created in
//! alive, and every closure holding a frame sees assignments made through
//! any other holder.
//!
//! `this` and `arguments` are ordinary entries in function frames. Arrow
//! call frames never get them, so lookups fall through to the nearest
//! enclosing function (or the global frame).
//!
//! Object-backed frames (`with` bodies and the global frame) consult an
//! object's properties after their own declarative bindings.

use crate::interpreter::object::{self, ObjectRef, PropertyKey};
use crate::interpreter::value::Value;
use crate::parser::ast::VariableKind;
use crate::parser::interner::{sym, Symbol};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a frame.
pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// Function-scoped and re-declarable
    Var,
    /// Block-scoped
    Let,
    /// Block-scoped and immutable once initialized
    Const,
}

impl BindingKind {
    pub fn is_lexical(self) -> bool {
        !matches!(self, BindingKind::Var)
    }
}

impl From<VariableKind> for BindingKind {
    fn from(kind: VariableKind) -> Self {
        match kind {
            VariableKind::Var => BindingKind::Var,
            VariableKind::Let => BindingKind::Let,
            VariableKind::Const => BindingKind::Const,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub value: Value,
    pub kind: BindingKind,
    /// `false` between block entry and the `let`/`const` declaration
    pub initialized: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Top-level frame, backed by the global object
    Global,
    /// Invocation of a function or arrow
    Function,
    /// Direct eval code
    Eval,
    /// Block with `let`/`const`/function declarations, or a catch clause
    Block,
    /// `with` body, backed by the `with` object
    With,
}

impl ScopeKind {
    /// Frames that receive hoisted `var` declarations.
    pub fn is_var_scope(self) -> bool {
        matches!(self, ScopeKind::Global | ScopeKind::Function | ScopeKind::Eval)
    }
}

/// Why a binding operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingError {
    Unresolved(Symbol),
    Uninitialized(Symbol),
    Immutable(Symbol),
    Duplicate(Symbol),
    /// Assignment refused by a read-only object property
    ReadOnly(Symbol),
}

/// A resolved identifier: its value, plus the object it was found on when
/// that was a `with` object (the receiver for a call).
#[derive(Debug, Clone)]
pub struct Resolved {
    pub value: Value,
    pub base: Option<ObjectRef>,
}

#[derive(Debug)]
pub struct Environment {
    bindings: IndexMap<Symbol, Binding, FxBuildHasher>,
    object: Option<ObjectRef>,
    parent: Option<EnvRef>,
    kind: ScopeKind,
}

impl Environment {
    /// The global frame. `this` at top level is the global object.
    pub fn new_global(global_object: ObjectRef) -> EnvRef {
        let mut env = Environment {
            bindings: IndexMap::default(),
            object: Some(global_object.clone()),
            parent: None,
            kind: ScopeKind::Global,
        };
        env.bindings.insert(
            sym::THIS,
            Binding {
                value: Value::Object(global_object),
                kind: BindingKind::Var,
                initialized: true,
            },
        );
        Rc::new(RefCell::new(env))
    }

    /// A declarative frame chained to `parent`.
    pub fn new_frame(parent: &EnvRef, kind: ScopeKind) -> EnvRef {
        Rc::new(RefCell::new(Environment {
            bindings: IndexMap::default(),
            object: None,
            parent: Some(parent.clone()),
            kind,
        }))
    }

    /// A `with` frame over `object`.
    pub fn new_with(parent: &EnvRef, object: ObjectRef) -> EnvRef {
        Rc::new(RefCell::new(Environment {
            bindings: IndexMap::default(),
            object: Some(object),
            parent: Some(parent.clone()),
            kind: ScopeKind::With,
        }))
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<&EnvRef> {
        self.parent.as_ref()
    }

    /// Whether this frame itself binds `name`.
    pub fn has_own_binding(&self, name: Symbol) -> bool {
        self.bindings.contains_key(&name)
    }

    /// Create a binding in this frame.
    ///
    /// `var` bindings start out as `undefined` and may be declared again; a
    /// lexical binding starts uninitialized and may not share its frame with
    /// any other binding of the same name. In the global frame, `var`
    /// declarations become properties of the global object.
    pub fn declare(&mut self, name: Symbol, kind: BindingKind) -> Result<(), BindingError> {
        if let Some(existing) = self.bindings.get(&name) {
            if kind.is_lexical() || existing.kind.is_lexical() {
                return Err(BindingError::Duplicate(name));
            }
            return Ok(());
        }

        if let (ScopeKind::Global, BindingKind::Var, Some(global)) = (self.kind, kind, &self.object) {
            let key = PropertyKey::Name(name);
            if !global.borrow().has_own(key) {
                global.borrow_mut().set_own(key, Value::Undefined);
            }
            return Ok(());
        }

        self.bindings.insert(
            name,
            Binding {
                value: Value::Undefined,
                kind,
                initialized: !kind.is_lexical(),
            },
        );
        Ok(())
    }

    /// Set a binding of this frame, initializing it if needed.
    ///
    /// Used for parameters, declarations and hoisted functions, where the
    /// binding is known to live in this frame; `const` is writable here.
    pub fn initialize(&mut self, name: Symbol, value: Value) {
        if let Some(binding) = self.bindings.get_mut(&name) {
            binding.value = value;
            binding.initialized = true;
            return;
        }

        match (self.kind, &self.object) {
            (ScopeKind::Global, Some(global)) => {
                global.borrow_mut().set_own(PropertyKey::Name(name), value);
            }
            _ => {
                self.bindings.insert(
                    name,
                    Binding {
                        value,
                        kind: BindingKind::Var,
                        initialized: true,
                    },
                );
            }
        }
    }

    /// Declare and initialize in one step.
    pub fn define(&mut self, name: Symbol, kind: BindingKind, value: Value) -> Result<(), BindingError> {
        self.declare(name, kind)?;
        self.initialize(name, value);
        Ok(())
    }

    /// Look in this frame only.
    fn lookup_here(&self, name: Symbol) -> Option<Result<Resolved, BindingError>> {
        if let Some(binding) = self.bindings.get(&name) {
            if !binding.initialized {
                return Some(Err(BindingError::Uninitialized(name)));
            }
            return Some(Ok(Resolved {
                value: binding.value.clone(),
                base: None,
            }));
        }

        // `this` is never looked up on an object
        if name == sym::THIS {
            return None;
        }

        let object = self.object.as_ref()?;
        let key = PropertyKey::Name(name);
        if !object::has_property(object, key) {
            return None;
        }
        let base = (self.kind == ScopeKind::With).then(|| object.clone());
        Some(Ok(Resolved {
            value: object::get(object, key),
            base,
        }))
    }

    /// Try to assign in this frame only. `None` means not bound here.
    fn assign_here(&mut self, name: Symbol, value: Value) -> Option<Result<(), BindingError>> {
        if let Some(binding) = self.bindings.get_mut(&name) {
            if !binding.initialized {
                return Some(Err(BindingError::Uninitialized(name)));
            }
            if binding.kind == BindingKind::Const {
                return Some(Err(BindingError::Immutable(name)));
            }
            binding.value = value;
            return Some(Ok(()));
        }

        if name == sym::THIS {
            return None;
        }

        let object = self.object.as_ref()?;
        let key = PropertyKey::Name(name);
        if !object::has_property(object, key) {
            return None;
        }
        if object::set(object, key, value) {
            Some(Ok(()))
        } else {
            Some(Err(BindingError::ReadOnly(name)))
        }
    }
}

/// Resolve `name` by walking the chain outward from `env`.
pub fn resolve(env: &EnvRef, name: Symbol) -> Result<Resolved, BindingError> {
    let mut current = env.clone();
    loop {
        let parent = {
            let frame = current.borrow();
            if let Some(found) = frame.lookup_here(name) {
                return found;
            }
            frame.parent.clone()
        };
        match parent {
            Some(parent) => current = parent,
            None => return Err(BindingError::Unresolved(name)),
        }
    }
}

/// Whether `name` resolves anywhere on the chain (for `typeof x`).
pub fn is_bound(env: &EnvRef, name: Symbol) -> bool {
    !matches!(resolve(env, name), Err(BindingError::Unresolved(_)))
}

/// Assign to the nearest binding of `name`.
///
/// An unbound name is an error here; sloppy code's implicit globals are the
/// evaluator's business.
pub fn assign(env: &EnvRef, name: Symbol, value: Value) -> Result<(), BindingError> {
    let mut current = env.clone();
    loop {
        let parent = {
            let mut frame = current.borrow_mut();
            if let Some(result) = frame.assign_here(name, value.clone()) {
                return result;
            }
            frame.parent.clone()
        };
        match parent {
            Some(parent) => current = parent,
            None => return Err(BindingError::Unresolved(name)),
        }
    }
}

/// The nearest frame that takes `var` declarations.
pub fn var_scope(env: &EnvRef) -> EnvRef {
    let mut current = env.clone();
    loop {
        let parent = {
            let frame = current.borrow();
            if frame.kind.is_var_scope() {
                None
            } else {
                frame.parent.clone()
            }
        };
        match parent {
            Some(parent) => current = parent,
            None => return current,
        }
    }
}

/// The global frame at the root of the chain.
pub fn global_scope(env: &EnvRef) -> EnvRef {
    let mut current = env.clone();
    loop {
        let parent = current.borrow().parent.clone();
        match parent {
            Some(parent) => current = parent,
            None => return current,
        }
    }
}
