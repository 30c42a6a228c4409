//! Expression evaluation

use crate::interpreter::closure::Closure;
use crate::interpreter::convert::Hint;
use crate::interpreter::environment::{self, BindingError, EnvRef, Environment, ScopeKind};
use crate::interpreter::error::{EvalResult, RuntimeError};
use crate::interpreter::object::{self, Callable, PropertyKey};
use crate::interpreter::value::{string_to_number, to_int32, to_uint32, Value};
use crate::interpreter::Interpreter;
use crate::parser::ast::{self, BinaryOperator, Expression, LogicalOperator, UnaryOperator, UpdateOperator};
use crate::parser::interner::{sym, Symbol};
use std::cmp::Ordering;
use std::rc::Rc;

/// A place an assignment can write to.
pub(crate) enum Reference {
    Binding(Symbol),
    Property(Value, PropertyKey),
}

fn strip_parens(mut expr: &Expression) -> &Expression {
    while let Expression::Parenthesized(inner) = expr {
        expr = &inner.expression;
    }
    expr
}

impl Interpreter {
    pub(crate) fn eval_expression(&mut self, expr: &Expression, env: &EnvRef) -> EvalResult<Value> {
        match expr {
            Expression::NumberLiteral(lit) => Ok(Value::Number(lit.value)),
            Expression::StringLiteral(lit) => Ok(Value::string(self.interner.resolve(lit.value))),
            Expression::BooleanLiteral(lit) => Ok(Value::Boolean(lit.value)),
            Expression::NullLiteral(_) => Ok(Value::Null),
            Expression::Identifier(id) => self.resolve_identifier(id.name, env),
            Expression::This(_) => Ok(self.resolve_this(env)),
            Expression::Array(array) => {
                let mut elements = Vec::with_capacity(array.elements.len());
                for element in &array.elements {
                    elements.push(match element {
                        Some(expr) => self.eval_expression(expr, env)?,
                        // Holes read as undefined
                        None => Value::Undefined,
                    });
                }
                Ok(Value::Object(self.new_array(elements)))
            }
            Expression::Object(literal) => self.eval_object_literal(literal, env),
            Expression::Function(function) => Ok(self.eval_function(function, env, None)),
            Expression::Arrow(arrow) => Ok(Value::Object(self.make_function(Closure::from_arrow(arrow, env, None)))),
            Expression::Unary(unary) => self.eval_unary(unary, env),
            Expression::Update(update) => self.eval_update(update, env),
            Expression::Binary(binary) => {
                let left = self.eval_expression(&binary.left, env)?;
                let right = self.eval_expression(&binary.right, env)?;
                self.binary_operation(binary.operator, &left, &right)
            }
            Expression::Logical(logical) => {
                let left = self.eval_expression(&logical.left, env)?;
                let short_circuit = match logical.operator {
                    LogicalOperator::And => !left.to_boolean(),
                    LogicalOperator::Or => left.to_boolean(),
                    LogicalOperator::NullishCoalescing => !left.is_nullish(),
                };
                if short_circuit {
                    Ok(left)
                } else {
                    self.eval_expression(&logical.right, env)
                }
            }
            Expression::Assignment(assign) => self.eval_assignment(assign, env),
            Expression::Conditional(cond) => {
                if self.eval_expression(&cond.test, env)?.to_boolean() {
                    self.eval_expression(&cond.consequent, env)
                } else {
                    self.eval_expression(&cond.alternate, env)
                }
            }
            Expression::Call(call) => self.eval_call(call, env),
            Expression::Member(member) => {
                let base = self.eval_expression(&member.object, env)?;
                self.get_property(&base, PropertyKey::Name(member.property.name))
            }
            Expression::Index(index) => {
                let base = self.eval_expression(&index.object, env)?;
                let key = self.eval_expression(&index.index, env)?;
                self.require_object_coercible(&base, &key)?;
                let key = self.to_property_key(&key)?;
                self.get_property(&base, key)
            }
            Expression::New(new) => {
                let callee = self.eval_expression(&new.callee, env)?;
                let args = self.eval_arguments(&new.arguments, env)?;
                if !self.is_constructor(&callee) {
                    return Err(RuntimeError::NotConstructible {
                        callee: self.describe(&new.callee),
                    });
                }
                self.construct(&callee, &args)
            }
            Expression::Sequence(sequence) => {
                let mut value = Value::Undefined;
                for expr in &sequence.expressions {
                    value = self.eval_expression(expr, env)?;
                }
                Ok(value)
            }
            Expression::Parenthesized(paren) => self.eval_expression(&paren.expression, env),
        }
    }

    /// Evaluate an initializer, naming an anonymous function or arrow after
    /// the binding or property it is assigned to.
    pub(crate) fn eval_named(&mut self, expr: &Expression, env: &EnvRef, name: Symbol) -> EvalResult<Value> {
        match expr {
            Expression::Arrow(arrow) => Ok(Value::Object(
                self.make_function(Closure::from_arrow(arrow, env, Some(name))),
            )),
            Expression::Function(function) if function.name.is_none() => {
                Ok(self.eval_function(function, env, Some(name)))
            }
            _ => self.eval_expression(expr, env),
        }
    }

    /// A named function expression sees its own name in an extra frame.
    fn eval_function(&mut self, function: &ast::FunctionExpression, env: &EnvRef, inferred: Option<Symbol>) -> Value {
        match function.name {
            Some(id) => {
                let scope = Environment::new_frame(env, ScopeKind::Block);
                let closure = Closure::from_function(function, &scope, None);
                let object = self.make_function(closure);
                scope.borrow_mut().initialize(id.name, Value::Object(object.clone()));
                Value::Object(object)
            }
            None => Value::Object(self.make_function(Closure::from_function(function, env, inferred))),
        }
    }

    fn eval_object_literal(&mut self, literal: &ast::ObjectExpression, env: &EnvRef) -> EvalResult<Value> {
        let object = self.new_object();
        for property in &literal.properties {
            let key = match &property.key {
                ast::PropertyKey::Identifier(id) => PropertyKey::from_symbol(&self.interner, id.name),
                ast::PropertyKey::StringLiteral(lit) => PropertyKey::from_symbol(&self.interner, lit.value),
                ast::PropertyKey::NumberLiteral(lit) => PropertyKey::from_number(&mut self.interner, lit.value),
            };
            let value = match key {
                PropertyKey::Name(name) => self.eval_named(&property.value, env, name)?,
                PropertyKey::Index(_) => self.eval_expression(&property.value, env)?,
            };
            object.borrow_mut().define(key, value, object::Attributes::DATA);
        }
        Ok(Value::Object(object))
    }

    fn resolve_identifier(&mut self, name: Symbol, env: &EnvRef) -> EvalResult<Value> {
        environment::resolve(env, name)
            .map(|resolved| resolved.value)
            .map_err(|err| self.binding_error(err))
    }

    /// `this` resolves through the chain like a name; arrow frames never bind it.
    pub(crate) fn resolve_this(&self, env: &EnvRef) -> Value {
        environment::resolve(env, sym::THIS)
            .map(|resolved| resolved.value)
            .unwrap_or(Value::Undefined)
    }

    /// Write to a name, creating a global for an unbound name in sloppy code.
    pub(crate) fn assign_identifier(&mut self, name: Symbol, value: Value, env: &EnvRef) -> EvalResult<()> {
        match environment::assign(env, name, value.clone()) {
            Ok(()) => Ok(()),
            Err(BindingError::Unresolved(_)) if !self.strict => {
                self.realm
                    .global_object
                    .borrow_mut()
                    .set_own(PropertyKey::Name(name), value);
                Ok(())
            }
            Err(BindingError::ReadOnly(_)) if !self.strict => Ok(()),
            Err(err) => Err(self.binding_error(err)),
        }
    }

    fn require_object_coercible(&self, base: &Value, key: &Value) -> EvalResult<()> {
        if base.is_nullish() {
            return Err(RuntimeError::type_error(format!(
                "cannot read property '{}' of {}",
                self.render(key),
                self.render(base)
            )));
        }
        Ok(())
    }

    /// Property read on any value. Primitives read through `Object.prototype`,
    /// except for string `length` and indices.
    pub(crate) fn get_property(&mut self, base: &Value, key: PropertyKey) -> EvalResult<Value> {
        match base {
            Value::Object(object) => Ok(object::get(object, key)),
            Value::Undefined | Value::Null => Err(RuntimeError::type_error(format!(
                "cannot read property '{}' of {}",
                key.to_text(&self.interner),
                self.render(base)
            ))),
            Value::String(s) => match key {
                PropertyKey::Name(name) if name == sym::LENGTH => Ok(Value::Number(s.encode_utf16().count() as f64)),
                PropertyKey::Index(index) => Ok(s
                    .chars()
                    .nth(index as usize)
                    .map(|c| Value::string(c.to_string()))
                    .unwrap_or(Value::Undefined)),
                _ => Ok(object::get(&self.realm.object_prototype, key)),
            },
            _ => Ok(object::get(&self.realm.object_prototype, key)),
        }
    }

    pub(crate) fn set_property(&mut self, base: &Value, key: PropertyKey, value: Value) -> EvalResult<()> {
        match base {
            Value::Object(object) => {
                if !object::set(object, key, value) && self.strict {
                    return Err(RuntimeError::type_error(format!(
                        "cannot assign to read-only property '{}'",
                        key.to_text(&self.interner)
                    )));
                }
                Ok(())
            }
            Value::Undefined | Value::Null => Err(RuntimeError::type_error(format!(
                "cannot set property '{}' of {}",
                key.to_text(&self.interner),
                self.render(base)
            ))),
            // Writes to primitives go nowhere
            _ => Ok(()),
        }
    }

    pub(crate) fn eval_reference(&mut self, expr: &Expression, env: &EnvRef) -> EvalResult<Reference> {
        match strip_parens(expr) {
            Expression::Identifier(id) => Ok(Reference::Binding(id.name)),
            Expression::Member(member) => {
                let base = self.eval_expression(&member.object, env)?;
                Ok(Reference::Property(base, PropertyKey::Name(member.property.name)))
            }
            Expression::Index(index) => {
                let base = self.eval_expression(&index.object, env)?;
                let key = self.eval_expression(&index.index, env)?;
                self.require_object_coercible(&base, &key)?;
                let key = self.to_property_key(&key)?;
                Ok(Reference::Property(base, key))
            }
            _ => Err(RuntimeError::Syntax {
                message: "invalid assignment target".to_string(),
                span: Some(expr.span()),
            }),
        }
    }

    fn get_reference(&mut self, reference: &Reference, env: &EnvRef) -> EvalResult<Value> {
        match reference {
            Reference::Binding(name) => self.resolve_identifier(*name, env),
            Reference::Property(base, key) => self.get_property(base, *key),
        }
    }

    pub(crate) fn put_reference(&mut self, reference: &Reference, value: Value, env: &EnvRef) -> EvalResult<()> {
        match reference {
            Reference::Binding(name) => self.assign_identifier(*name, value, env),
            Reference::Property(base, key) => self.set_property(base, *key, value),
        }
    }

    fn eval_assignment(&mut self, assign: &ast::AssignmentExpression, env: &EnvRef) -> EvalResult<Value> {
        let reference = self.eval_reference(&assign.left, env)?;
        let value = match assign.operator {
            None => match &reference {
                Reference::Binding(name) => self.eval_named(&assign.right, env, *name)?,
                Reference::Property(..) => self.eval_expression(&assign.right, env)?,
            },
            Some(operator) => {
                let current = self.get_reference(&reference, env)?;
                let right = self.eval_expression(&assign.right, env)?;
                self.binary_operation(operator, &current, &right)?
            }
        };
        self.put_reference(&reference, value.clone(), env)?;
        Ok(value)
    }

    fn eval_update(&mut self, update: &ast::UpdateExpression, env: &EnvRef) -> EvalResult<Value> {
        let reference = self.eval_reference(&update.argument, env)?;
        let current = self.get_reference(&reference, env)?;
        let old = self.to_number(&current)?;
        let new = match update.operator {
            UpdateOperator::Increment => old + 1.0,
            UpdateOperator::Decrement => old - 1.0,
        };
        self.put_reference(&reference, Value::Number(new), env)?;
        Ok(Value::Number(if update.prefix { new } else { old }))
    }

    fn eval_unary(&mut self, unary: &ast::UnaryExpression, env: &EnvRef) -> EvalResult<Value> {
        match unary.operator {
            UnaryOperator::Typeof => {
                // An unbound name is not an error here
                if let Expression::Identifier(id) = strip_parens(&unary.operand) {
                    return match environment::resolve(env, id.name) {
                        Ok(resolved) => Ok(Value::string(resolved.value.type_of())),
                        Err(BindingError::Unresolved(_)) => Ok(Value::string("undefined")),
                        Err(err) => Err(self.binding_error(err)),
                    };
                }
                let value = self.eval_expression(&unary.operand, env)?;
                Ok(Value::string(value.type_of()))
            }
            UnaryOperator::Delete => self.eval_delete(&unary.operand, env),
            UnaryOperator::Void => {
                self.eval_expression(&unary.operand, env)?;
                Ok(Value::Undefined)
            }
            UnaryOperator::Not => Ok(Value::Boolean(!self.eval_expression(&unary.operand, env)?.to_boolean())),
            UnaryOperator::Minus => {
                let value = self.eval_expression(&unary.operand, env)?;
                Ok(Value::Number(-self.to_number(&value)?))
            }
            UnaryOperator::Plus => {
                let value = self.eval_expression(&unary.operand, env)?;
                Ok(Value::Number(self.to_number(&value)?))
            }
            UnaryOperator::BitwiseNot => {
                let value = self.eval_expression(&unary.operand, env)?;
                Ok(Value::Number(f64::from(!to_int32(self.to_number(&value)?))))
            }
        }
    }

    fn eval_delete(&mut self, operand: &Expression, env: &EnvRef) -> EvalResult<Value> {
        match strip_parens(operand) {
            Expression::Member(_) | Expression::Index(_) => {
                let Reference::Property(base, key) = self.eval_reference(operand, env)? else {
                    return Ok(Value::Boolean(true));
                };
                match base {
                    Value::Object(object) => {
                        let deleted = object.borrow_mut().delete(key);
                        if !deleted && self.strict {
                            return Err(RuntimeError::type_error(format!(
                                "cannot delete property '{}'",
                                key.to_text(&self.interner)
                            )));
                        }
                        Ok(Value::Boolean(deleted))
                    }
                    _ => Ok(Value::Boolean(true)),
                }
            }
            // Declared bindings cannot be deleted
            Expression::Identifier(_) => Ok(Value::Boolean(false)),
            other => {
                self.eval_expression(other, env)?;
                Ok(Value::Boolean(true))
            }
        }
    }

    fn eval_arguments(&mut self, arguments: &[Expression], env: &EnvRef) -> EvalResult<Vec<Value>> {
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(self.eval_expression(argument, env)?);
        }
        Ok(values)
    }

    fn eval_call(&mut self, call: &ast::CallExpression, env: &EnvRef) -> EvalResult<Value> {
        let (callee, this) = self.eval_callee(&call.callee, env)?;
        let args = self.eval_arguments(&call.arguments, env)?;

        // Only a plain `eval(...)` that reaches the real eval runs in the caller's scope
        if call.is_direct_eval_candidate() && self.is_eval_intrinsic(&callee) {
            return self.eval_direct(args.first(), env);
        }

        if !callee.is_callable() {
            return Err(RuntimeError::type_error(format!(
                "{} is not a function",
                self.describe(&call.callee)
            )));
        }
        self.call(&callee, this, &args)
    }

    /// The function to call and its receiver.
    fn eval_callee(&mut self, callee: &Expression, env: &EnvRef) -> EvalResult<(Value, Value)> {
        match strip_parens(callee) {
            Expression::Member(member) => {
                let base = self.eval_expression(&member.object, env)?;
                let function = self.get_property(&base, PropertyKey::Name(member.property.name))?;
                Ok((function, base))
            }
            Expression::Index(index) => {
                let base = self.eval_expression(&index.object, env)?;
                let key = self.eval_expression(&index.index, env)?;
                self.require_object_coercible(&base, &key)?;
                let key = self.to_property_key(&key)?;
                let function = self.get_property(&base, key)?;
                Ok((function, base))
            }
            Expression::Identifier(id) => {
                let resolved = environment::resolve(env, id.name).map_err(|err| self.binding_error(err))?;
                // Names found on a `with` object are called as its methods
                let this = resolved.base.map(Value::Object).unwrap_or(Value::Undefined);
                Ok((resolved.value, this))
            }
            other => Ok((self.eval_expression(other, env)?, Value::Undefined)),
        }
    }

    /// Source-shaped description of a callee for error messages.
    fn describe(&self, expr: &Expression) -> String {
        match expr {
            Expression::Identifier(id) => self.interner.resolve(id.name).to_string(),
            Expression::This(_) => "this".to_string(),
            Expression::Member(member) => format!(
                "{}.{}",
                self.describe(&member.object),
                self.interner.resolve(member.property.name)
            ),
            Expression::Index(index) => format!("{}[...]", self.describe(&index.object)),
            Expression::Call(call) => format!("{}(...)", self.describe(&call.callee)),
            Expression::Parenthesized(paren) => self.describe(&paren.expression),
            Expression::Arrow(arrow) => arrow.source.to_string(),
            Expression::Function(function) => function.source.to_string(),
            _ => "expression".to_string(),
        }
    }

    pub(crate) fn is_constructor(&self, value: &Value) -> bool {
        let Value::Object(object) = value else {
            return false;
        };
        let target = match object.borrow().callable() {
            Some(Callable::Closure(closure)) => return closure.is_constructor(),
            Some(Callable::Native(native)) => return native.constructor,
            Some(Callable::Bound(bound)) => bound.target.clone(),
            None => return false,
        };
        self.is_constructor(&Value::Object(target))
    }

    pub(crate) fn binary_operation(&mut self, operator: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
        let number = |n: f64| Ok(Value::Number(n));
        match operator {
            BinaryOperator::Add => {
                let left = self.to_primitive(left, Hint::Default)?;
                let right = self.to_primitive(right, Hint::Default)?;
                if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
                    let mut text = left.primitive_to_string().to_string();
                    text.push_str(&right.primitive_to_string());
                    Ok(Value::String(Rc::from(text)))
                } else {
                    number(left.primitive_to_number() + right.primitive_to_number())
                }
            }
            BinaryOperator::Subtract => number(self.to_number(left)? - self.to_number(right)?),
            BinaryOperator::Multiply => number(self.to_number(left)? * self.to_number(right)?),
            BinaryOperator::Divide => number(self.to_number(left)? / self.to_number(right)?),
            BinaryOperator::Modulo => number(self.to_number(left)? % self.to_number(right)?),
            BinaryOperator::Exponent => {
                let base = self.to_number(left)?;
                let exponent = self.to_number(right)?;
                if base.abs() == 1.0 && exponent.is_infinite() {
                    return number(f64::NAN);
                }
                number(base.powf(exponent))
            }
            BinaryOperator::Equal => Ok(Value::Boolean(self.loose_equals(left, right)?)),
            BinaryOperator::NotEqual => Ok(Value::Boolean(!self.loose_equals(left, right)?)),
            BinaryOperator::StrictEqual => Ok(Value::Boolean(left.strict_equals(right))),
            BinaryOperator::StrictNotEqual => Ok(Value::Boolean(!left.strict_equals(right))),
            BinaryOperator::LessThan => {
                let ordering = self.compare(left, right)?;
                Ok(Value::Boolean(ordering == Some(Ordering::Less)))
            }
            BinaryOperator::LessEqual => {
                let ordering = self.compare(left, right)?;
                Ok(Value::Boolean(matches!(ordering, Some(Ordering::Less | Ordering::Equal))))
            }
            BinaryOperator::GreaterThan => {
                let ordering = self.compare(left, right)?;
                Ok(Value::Boolean(ordering == Some(Ordering::Greater)))
            }
            BinaryOperator::GreaterEqual => {
                let ordering = self.compare(left, right)?;
                Ok(Value::Boolean(matches!(ordering, Some(Ordering::Greater | Ordering::Equal))))
            }
            BinaryOperator::In => match right {
                Value::Object(object) => {
                    let key = self.to_property_key(left)?;
                    Ok(Value::Boolean(object::has_property(object, key)))
                }
                _ => Err(RuntimeError::type_error(format!(
                    "cannot use 'in' operator to search for '{}' in {}",
                    self.render(left),
                    self.inspect(right)
                ))),
            },
            BinaryOperator::InstanceOf => self.instance_of(left, right),
            BinaryOperator::BitwiseAnd => number(f64::from(self.to_int32(left)? & self.to_int32(right)?)),
            BinaryOperator::BitwiseOr => number(f64::from(self.to_int32(left)? | self.to_int32(right)?)),
            BinaryOperator::BitwiseXor => number(f64::from(self.to_int32(left)? ^ self.to_int32(right)?)),
            BinaryOperator::LeftShift => {
                let value = self.to_int32(left)?;
                let shift = to_uint32(self.to_number(right)?) & 31;
                number(f64::from(value.wrapping_shl(shift)))
            }
            BinaryOperator::RightShift => {
                let value = self.to_int32(left)?;
                let shift = to_uint32(self.to_number(right)?) & 31;
                number(f64::from(value >> shift))
            }
            BinaryOperator::UnsignedRightShift => {
                let value = to_uint32(self.to_number(left)?);
                let shift = to_uint32(self.to_number(right)?) & 31;
                number(f64::from(value >> shift))
            }
        }
    }

    fn to_int32(&mut self, value: &Value) -> EvalResult<i32> {
        Ok(to_int32(self.to_number(value)?))
    }

    /// Abstract relational comparison; `None` when either side is NaN.
    fn compare(&mut self, left: &Value, right: &Value) -> EvalResult<Option<Ordering>> {
        let left = self.to_primitive(left, Hint::Number)?;
        let right = self.to_primitive(right, Hint::Number)?;
        if let (Value::String(a), Value::String(b)) = (&left, &right) {
            return Ok(Some(a.encode_utf16().cmp(b.encode_utf16())));
        }
        Ok(left.primitive_to_number().partial_cmp(&right.primitive_to_number()))
    }

    /// Abstract equality (`==`).
    fn loose_equals(&mut self, left: &Value, right: &Value) -> EvalResult<bool> {
        match (left, right) {
            (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => Ok(true),
            (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => Ok(false),
            (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
                Ok(*n == string_to_number(s))
            }
            (Value::Boolean(b), other) | (other, Value::Boolean(b)) => {
                let number = Value::Number(if *b { 1.0 } else { 0.0 });
                self.loose_equals(&number, other)
            }
            (Value::Object(a), Value::Object(b)) => Ok(Rc::ptr_eq(a, b)),
            (Value::Object(_), primitive) | (primitive, Value::Object(_)) => {
                let object = if matches!(left, Value::Object(_)) { left } else { right };
                let converted = self.to_primitive(object, Hint::Default)?;
                self.loose_equals(&converted, primitive)
            }
            _ => Ok(left.strict_equals(right)),
        }
    }

    fn instance_of(&mut self, left: &Value, right: &Value) -> EvalResult<Value> {
        let function = match right {
            Value::Object(function) if right.is_callable() => function.clone(),
            _ => {
                return Err(RuntimeError::type_error(format!(
                    "right-hand side of 'instanceof' is not callable: {}",
                    self.inspect(right)
                )))
            }
        };

        // Bound functions test against their target
        let mut target = function;
        loop {
            let next = match target.borrow().callable() {
                Some(Callable::Bound(bound)) => bound.target.clone(),
                _ => break,
            };
            target = next;
        }

        let Value::Object(object) = left else {
            return Ok(Value::Boolean(false));
        };
        match object::get(&target, PropertyKey::Name(sym::PROTOTYPE)) {
            Value::Object(prototype) => Ok(Value::Boolean(object::inherits_from(object, &prototype))),
            _ => Err(RuntimeError::type_error(format!(
                "function has non-object prototype in instanceof check: {}",
                self.function_label(&target)
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::{Interpreter, InterpreterOptions};

    fn eval(source: &str) -> String {
        let mut interp = Interpreter::new(InterpreterOptions::default());
        match interp.evaluate_program(source) {
            Ok(value) => interp.render(&value),
            Err(err) => err.report(),
        }
    }

    #[test]
    fn test_arithmetic_and_concatenation() {
        assert_eq!(eval("1 + 2 * 3"), "7");
        assert_eq!(eval("'a' + 1 + 2"), "a12");
        assert_eq!(eval("1 + 2 + 'a'"), "3a");
        assert_eq!(eval("7 % 3"), "1");
        assert_eq!(eval("2 ** 10"), "1024");
    }

    #[test]
    fn test_loose_equality() {
        assert_eq!(eval("null == undefined"), "true");
        assert_eq!(eval("'1' == 1"), "true");
        assert_eq!(eval("true == 1"), "true");
        assert_eq!(eval("null == 0"), "false");
        assert_eq!(eval("NaN == NaN"), "false");
    }

    #[test]
    fn test_bitwise_operators() {
        assert_eq!(eval("5 & 3"), "1");
        assert_eq!(eval("-1 >>> 28"), "15");
        assert_eq!(eval("1 << 31"), "-2147483648");
        assert_eq!(eval("~5"), "-6");
    }

    #[test]
    fn test_typeof_unbound_name() {
        assert_eq!(eval("typeof nothingHere"), "undefined");
        assert_eq!(eval("typeof (x => x)"), "function");
    }

    #[test]
    fn test_compound_assignment_and_update() {
        assert_eq!(eval("var a = 1; a += 2; a"), "3");
        assert_eq!(eval("var o = { n: 1 }; o.n++; o.n"), "2");
        assert_eq!(eval("var i = 5; var j = i--; j + ',' + i"), "5,4");
    }

    #[test]
    fn test_implicit_global_in_sloppy_code() {
        assert_eq!(eval("(() => { leaked = 3; })(); leaked"), "3");
        assert_eq!(
            eval("'use strict'; (() => { leaked = 3; })();"),
            "ReferenceError: leaked is not defined"
        );
    }

    #[test]
    fn test_calling_non_function_names_callee() {
        assert_eq!(eval("var o = {}; o.missing()"), "TypeError: o.missing is not a function");
    }

    #[test]
    fn test_member_call_passes_receiver() {
        assert_eq!(eval("var o = { v: 4, f: function () { return this.v; } }; o.f()"), "4");
    }
}
