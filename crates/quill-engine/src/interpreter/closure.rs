//! Closure values and the invocation protocol
//!
//! Both arrow closures and ordinary `function` closures are [`Closure`]s;
//! they differ only in [`ThisMode`]. An arrow captures its environment and
//! nothing else: its call frame binds the parameters and never `this` or
//! `arguments`, so both resolve through the captured chain. A receiver
//! passed to an arrow (method call, `call`, `apply`, `bind`) is dropped.

use crate::interpreter::environment::{BindingKind, EnvRef, Environment, ScopeKind};
use crate::interpreter::error::{EvalResult, RuntimeError};
use crate::interpreter::object::{self, Attributes, Callable, NativeFn, Object, ObjectKind, ObjectRef, PropertyKey};
use crate::interpreter::value::Value;
use crate::interpreter::{Completion, Interpreter};
use crate::parser::ast::{ArrowBody, ArrowFunction, BlockStatement, Expression, FunctionExpression, Identifier};
use crate::parser::interner::{sym, Symbol};
use std::rc::Rc;
use tracing::{debug, trace};

/// How a closure gets its `this`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThisMode {
    /// Inherited from the defining scope; never rebound
    Lexical,
    /// Bound per call from the receiver
    Dynamic,
}

#[derive(Debug, Clone)]
pub enum ClosureBody {
    /// Concise arrow body; its value is the result
    Expression(Rc<Expression>),
    /// Statement body; the result comes from `return`
    Block(Rc<BlockStatement>),
}

impl ClosureBody {
    pub fn is_block(&self) -> bool {
        matches!(self, ClosureBody::Block(_))
    }
}

/// A callable created from a function or arrow literal.
///
/// Immutable once created. The AST pieces are shared with the tree, so
/// creating a closure copies no syntax.
pub struct Closure {
    /// Environment current at the point of definition
    pub env: EnvRef,
    pub params: Rc<[Identifier]>,
    pub body: ClosureBody,
    pub this_mode: ThisMode,
    /// Whether calls create an own `arguments` object
    pub arguments_visible: bool,
    pub strict: bool,
    pub name: Option<Symbol>,
    /// Exact source text of the literal
    pub source: Rc<str>,
}

impl Closure {
    pub fn from_arrow(arrow: &ArrowFunction, env: &EnvRef, name: Option<Symbol>) -> Self {
        let body = match &arrow.body {
            ArrowBody::Expression(expr) => ClosureBody::Expression(expr.clone()),
            ArrowBody::Block(block) => ClosureBody::Block(block.clone()),
        };
        Self {
            env: env.clone(),
            params: arrow.params.clone(),
            body,
            this_mode: ThisMode::Lexical,
            arguments_visible: false,
            strict: arrow.strict,
            name,
            source: arrow.source.clone(),
        }
    }

    pub fn from_function(function: &FunctionExpression, env: &EnvRef, name: Option<Symbol>) -> Self {
        Self {
            env: env.clone(),
            params: function.params.clone(),
            body: ClosureBody::Block(function.body.clone()),
            this_mode: ThisMode::Dynamic,
            arguments_visible: true,
            strict: function.strict,
            name: function.name.map(|id| id.name).or(name),
            source: function.source.clone(),
        }
    }

    /// Parameters before the first default or rest parameter; with neither
    /// supported, that is all of them.
    pub fn length(&self) -> u32 {
        self.params.len() as u32
    }

    pub fn is_constructor(&self) -> bool {
        self.this_mode == ThisMode::Dynamic
    }
}

/// What a function object does when called, detached from the object borrow.
enum CallTarget {
    Closure(Rc<Closure>),
    Native(NativeFn, bool),
    Bound(ObjectRef, Value, Vec<Value>),
}

impl Interpreter {
    /// Wrap a closure in a function object.
    ///
    /// Ordinary functions get an own `prototype` object; arrows never do.
    pub(crate) fn make_function(&mut self, closure: Closure) -> ObjectRef {
        debug!(
            params = closure.params.len(),
            arrow = closure.this_mode == ThisMode::Lexical,
            block_body = closure.body.is_block(),
            "created closure"
        );

        let name = closure.name.unwrap_or(sym::EMPTY);
        let constructor = closure.is_constructor();
        let function = Object::new_ref(
            ObjectKind::Function(Callable::Closure(Rc::new(closure))),
            Some(self.realm.function_prototype.clone()),
        );
        let name = Value::string(self.interner.resolve(name));
        function.borrow_mut().define(PropertyKey::Name(sym::NAME), name, Attributes::HIDDEN);

        if constructor {
            let prototype = Object::new_ref(ObjectKind::Ordinary, Some(self.realm.object_prototype.clone()));
            prototype.borrow_mut().define(
                PropertyKey::Name(sym::CONSTRUCTOR),
                Value::Object(function.clone()),
                Attributes::HIDDEN,
            );
            function
                .borrow_mut()
                .define(PropertyKey::Name(sym::PROTOTYPE), Value::Object(prototype), Attributes::HIDDEN);
        }

        function
    }

    /// Call any value.
    pub fn call(&mut self, callee: &Value, this: Value, args: &[Value]) -> EvalResult<Value> {
        match callee {
            Value::Object(function) if callee.is_callable() => self.call_function(function, this, args),
            _ => Err(RuntimeError::type_error(format!(
                "{} is not a function",
                self.inspect(callee)
            ))),
        }
    }

    /// Call a function object.
    pub(crate) fn call_function(&mut self, function: &ObjectRef, this: Value, args: &[Value]) -> EvalResult<Value> {
        match Self::call_target(function)? {
            CallTarget::Closure(closure) => self.invoke(function, &closure, this, args),
            CallTarget::Native(call, _) => self.call_native(call, &this, args),
            CallTarget::Bound(target, bound_this, mut bound_args) => {
                bound_args.extend_from_slice(args);
                self.call_function(&target, bound_this, &bound_args)
            }
        }
    }

    /// `new callee(...args)`
    pub fn construct(&mut self, callee: &Value, args: &[Value]) -> EvalResult<Value> {
        let function = match callee {
            Value::Object(function) if callee.is_callable() => function.clone(),
            _ => {
                return Err(RuntimeError::NotConstructible {
                    callee: self.inspect(callee),
                })
            }
        };

        match Self::call_target(&function)? {
            CallTarget::Closure(closure) if closure.is_constructor() => {
                let prototype = match object::get(&function, PropertyKey::Name(sym::PROTOTYPE)) {
                    Value::Object(proto) => proto,
                    _ => self.realm.object_prototype.clone(),
                };
                let instance = Object::new_ref(ObjectKind::Ordinary, Some(prototype));
                let result = self.invoke(&function, &closure, Value::Object(instance.clone()), args)?;
                Ok(match result {
                    Value::Object(_) => result,
                    _ => Value::Object(instance),
                })
            }
            CallTarget::Native(call, true) => self.call_native(call, &Value::Undefined, args),
            CallTarget::Bound(target, _, mut bound_args) => {
                bound_args.extend_from_slice(args);
                self.construct(&Value::Object(target), &bound_args)
            }
            _ => Err(RuntimeError::NotConstructible {
                callee: self.function_label(&function),
            }),
        }
    }

    fn call_target(function: &ObjectRef) -> EvalResult<CallTarget> {
        let object = function.borrow();
        match object.callable() {
            Some(Callable::Closure(closure)) => Ok(CallTarget::Closure(closure.clone())),
            Some(Callable::Native(native)) => Ok(CallTarget::Native(native.call, native.constructor)),
            Some(Callable::Bound(bound)) => Ok(CallTarget::Bound(
                bound.target.clone(),
                bound.this.clone(),
                bound.args.clone(),
            )),
            None => Err(RuntimeError::type_error("value is not a function")),
        }
    }

    /// Host functions count toward the call depth too, so re-entrant
    /// conversions such as a self-containing array's `toString` stay bounded.
    fn call_native(&mut self, call: NativeFn, this: &Value, args: &[Value]) -> EvalResult<Value> {
        if self.call_depth >= self.options.max_call_depth {
            return Err(RuntimeError::range_error("Maximum call stack size exceeded"));
        }
        self.call_depth += 1;
        let result = call(self, this, args);
        self.call_depth -= 1;
        result
    }

    /// The invocation protocol for source-defined closures.
    fn invoke(&mut self, function: &ObjectRef, closure: &Closure, this: Value, args: &[Value]) -> EvalResult<Value> {
        if self.call_depth >= self.options.max_call_depth {
            return Err(RuntimeError::range_error("Maximum call stack size exceeded"));
        }

        if self.options.trace_calls {
            debug!(
                name = self.interner.resolve(closure.name.unwrap_or(sym::EMPTY)),
                args = args.len(),
                depth = self.call_depth,
                "call"
            );
        } else {
            trace!(args = args.len(), depth = self.call_depth, "invoking closure");
        }

        let frame = Environment::new_frame(&closure.env, ScopeKind::Function);
        self.bind_call_frame(&frame, function, closure, this, args)?;

        self.call_depth += 1;
        let saved_strict = std::mem::replace(&mut self.strict, closure.strict);
        let result = self.run_body(closure, &frame);
        self.strict = saved_strict;
        self.call_depth -= 1;

        result
    }

    fn bind_call_frame(
        &mut self,
        frame: &EnvRef,
        function: &ObjectRef,
        closure: &Closure,
        this: Value,
        args: &[Value],
    ) -> EvalResult<()> {
        let mut env = frame.borrow_mut();

        if closure.this_mode == ThisMode::Dynamic {
            let this = if !closure.strict && this.is_nullish() {
                Value::Object(self.realm.global_object.clone())
            } else {
                this
            };
            env.initialize(sym::THIS, this);
        }

        if closure.arguments_visible {
            let arguments = Object::new_ref(
                ObjectKind::Arguments(args.to_vec()),
                Some(self.realm.object_prototype.clone()),
            );
            arguments.borrow_mut().define(
                PropertyKey::Name(sym::CALLEE),
                Value::Object(function.clone()),
                Attributes::HIDDEN,
            );
            env.initialize(sym::ARGUMENTS, Value::Object(arguments));
        }

        // Missing arguments are undefined; a repeated name takes the later one
        for (index, param) in closure.params.iter().enumerate() {
            let value = args.get(index).cloned().unwrap_or(Value::Undefined);
            env.declare(param.name, BindingKind::Var)
                .map_err(|err| self.binding_error(err))?;
            env.initialize(param.name, value);
        }

        Ok(())
    }

    fn run_body(&mut self, closure: &Closure, frame: &EnvRef) -> EvalResult<Value> {
        match &closure.body {
            ClosureBody::Expression(expr) => self.eval_expression(expr, frame),
            ClosureBody::Block(block) => {
                self.instantiate_var_scope(&block.statements, frame)?;
                self.instantiate_block(&block.statements, frame)?;
                match self.exec_statements(&block.statements, frame)? {
                    Completion::Return(value) => Ok(value),
                    // Falling off the end; stray jumps are rejected by the parser
                    _ => Ok(Value::Undefined),
                }
            }
        }
    }

    /// A function's name for messages, or its source text if it has none.
    pub(crate) fn function_label(&self, function: &ObjectRef) -> String {
        match object::get(function, PropertyKey::Name(sym::NAME)) {
            Value::String(name) if !name.is_empty() => name.to_string(),
            _ => self.inspect(&Value::Object(function.clone())),
        }
    }
}
