//! Host collaborators installed on the global object
//!
//! Only what scripts exercising closures lean on: the assertion helpers,
//! `print`, `eval`, `Function`, and a thin slice of the `Object`,
//! `Function.prototype`, `Array.prototype`, error and `Math` surface.

use crate::interpreter::error::{ErrorKind, EvalResult, RuntimeError};
use crate::interpreter::object::{
    self, Attributes, BoundFunction, Callable, NativeFn, NativeFunction, Object, ObjectKind, ObjectRef, PropertyKey,
};
use crate::interpreter::value::Value;
use crate::interpreter::Interpreter;
use crate::parser::interner::{sym, Interner};
use std::rc::Rc;

/// Longest array `Array(n)` will allocate.
const MAX_ARRAY_LENGTH: u32 = 1 << 24;

#[derive(Debug)]
struct ErrorIntrinsics {
    kind: ErrorKind,
    constructor: ObjectRef,
    prototype: ObjectRef,
}

/// The intrinsic objects of one interpreter.
#[derive(Debug)]
pub struct Realm {
    pub global_object: ObjectRef,
    pub object_prototype: ObjectRef,
    pub function_prototype: ObjectRef,
    pub array_prototype: ObjectRef,
    /// The global `eval`; calls reaching this object by plain name are direct
    pub eval: ObjectRef,
    errors: Vec<ErrorIntrinsics>,
}

impl Realm {
    /// Prototype for error objects of `kind`; `Error.prototype` for values
    /// that are not errors.
    pub fn error_prototype(&self, kind: ErrorKind) -> ObjectRef {
        self.errors
            .iter()
            .find(|error| error.kind == kind)
            .or_else(|| self.errors.first())
            .map(|error| error.prototype.clone())
            .unwrap_or_else(|| self.object_prototype.clone())
    }

    /// The error kind an error constructor creates.
    pub fn error_kind_of(&self, constructor: &ObjectRef) -> Option<ErrorKind> {
        self.errors
            .iter()
            .find(|error| Rc::ptr_eq(&error.constructor, constructor))
            .map(|error| error.kind)
    }
}

type Method = (&'static str, u32, NativeFn);

const GLOBAL_FUNCTIONS: &[Method] = &[
    ("assertEquals", 2, assert_equals),
    ("assertThrows", 2, assert_throws),
    ("print", 0, print),
    ("String", 1, string_function),
    ("Number", 1, number_function),
];

const OBJECT_STATICS: &[Method] = &[("getPrototypeOf", 1, object_get_prototype_of), ("keys", 1, object_keys)];

const OBJECT_PROTOTYPE: &[Method] = &[
    ("hasOwnProperty", 1, object_has_own_property),
    ("toString", 0, object_to_string),
    ("valueOf", 0, object_value_of),
];

const FUNCTION_PROTOTYPE: &[Method] = &[
    ("call", 1, function_call),
    ("apply", 2, function_apply),
    ("bind", 1, function_bind),
    ("toString", 0, function_to_string),
];

const ARRAY_PROTOTYPE: &[Method] = &[
    ("map", 1, array_map),
    ("forEach", 1, array_for_each),
    ("reduce", 1, array_reduce),
    ("join", 1, array_join),
    ("push", 1, array_push),
    ("toString", 0, array_to_string),
];

const MATH: &[Method] = &[
    ("atan2", 2, math_atan2),
    ("floor", 1, math_floor),
    ("abs", 1, math_abs),
    ("sqrt", 1, math_sqrt),
    ("max", 2, math_max),
    ("min", 2, math_min),
];

const ERROR_CONSTRUCTORS: [(ErrorKind, NativeFn); 5] = [
    (ErrorKind::Error, error_constructor),
    (ErrorKind::SyntaxError, syntax_error_constructor),
    (ErrorKind::ReferenceError, reference_error_constructor),
    (ErrorKind::TypeError, type_error_constructor),
    (ErrorKind::RangeError, range_error_constructor),
];

struct RealmBuilder<'a> {
    interner: &'a mut Interner,
    function_prototype: ObjectRef,
}

impl RealmBuilder<'_> {
    fn native(&mut self, name: &str, length: u32, call: NativeFn, constructor: bool) -> ObjectRef {
        let function = Object::new_ref(
            ObjectKind::Function(Callable::Native(NativeFunction {
                name: self.interner.intern(name),
                length,
                call,
                constructor,
            })),
            Some(self.function_prototype.clone()),
        );
        function
            .borrow_mut()
            .define(PropertyKey::Name(sym::NAME), Value::string(name), Attributes::HIDDEN);
        function
    }

    fn value(&mut self, target: &ObjectRef, name: &str, value: Value, attributes: Attributes) {
        let key = PropertyKey::from_text(self.interner, name);
        target.borrow_mut().define(key, value, attributes);
    }

    fn methods(&mut self, target: &ObjectRef, methods: &[Method]) {
        for &(name, length, call) in methods {
            let function = self.native(name, length, call, false);
            self.value(target, name, Value::Object(function), Attributes::HIDDEN);
        }
    }

    /// A global constructor linked both ways with its prototype object.
    fn constructor(
        &mut self,
        global: &ObjectRef,
        name: &str,
        length: u32,
        call: NativeFn,
        prototype: &ObjectRef,
    ) -> ObjectRef {
        let constructor = self.native(name, length, call, true);
        constructor.borrow_mut().define(
            PropertyKey::Name(sym::PROTOTYPE),
            Value::Object(prototype.clone()),
            Attributes::READ_ONLY,
        );
        prototype.borrow_mut().define(
            PropertyKey::Name(sym::CONSTRUCTOR),
            Value::Object(constructor.clone()),
            Attributes::HIDDEN,
        );
        self.value(global, name, Value::Object(constructor.clone()), Attributes::HIDDEN);
        constructor
    }
}

/// Build the intrinsics and the populated global object.
pub fn create_realm(interner: &mut Interner) -> Realm {
    let object_prototype = Object::new_ref(ObjectKind::Ordinary, None);
    let function_prototype = Object::new_ref(ObjectKind::Ordinary, Some(object_prototype.clone()));
    let array_prototype = Object::new_ref(ObjectKind::Ordinary, Some(object_prototype.clone()));
    let global_object = Object::new_ref(ObjectKind::Ordinary, Some(object_prototype.clone()));

    let mut builder = RealmBuilder {
        interner,
        function_prototype: function_prototype.clone(),
    };

    builder.methods(&object_prototype, OBJECT_PROTOTYPE);
    builder.methods(&function_prototype, FUNCTION_PROTOTYPE);
    builder.methods(&array_prototype, ARRAY_PROTOTYPE);
    builder.methods(&global_object, GLOBAL_FUNCTIONS);

    let object_constructor = builder.constructor(&global_object, "Object", 1, object_constructor, &object_prototype);
    builder.methods(&object_constructor, OBJECT_STATICS);
    builder.constructor(&global_object, "Function", 1, function_constructor, &function_prototype);
    builder.constructor(&global_object, "Array", 1, array_constructor, &array_prototype);

    let mut errors = Vec::with_capacity(ERROR_CONSTRUCTORS.len());
    for (kind, call) in ERROR_CONSTRUCTORS {
        // Every error prototype but Error's own inherits from Error.prototype
        let parent = errors
            .first()
            .map(|error: &ErrorIntrinsics| error.prototype.clone())
            .unwrap_or_else(|| object_prototype.clone());
        let prototype = Object::new_ref(ObjectKind::Ordinary, Some(parent));
        builder.value(&prototype, "name", Value::string(kind.name()), Attributes::HIDDEN);
        if kind == ErrorKind::Error {
            builder.value(&prototype, "message", Value::string(""), Attributes::HIDDEN);
            let to_string = builder.native("toString", 0, error_to_string, false);
            builder.value(&prototype, "toString", Value::Object(to_string), Attributes::HIDDEN);
        }
        let constructor = builder.constructor(&global_object, kind.name(), 1, call, &prototype);
        errors.push(ErrorIntrinsics {
            kind,
            constructor,
            prototype,
        });
    }

    let math = Object::new_ref(ObjectKind::Ordinary, Some(object_prototype.clone()));
    builder.methods(&math, MATH);
    builder.value(&math, "PI", Value::Number(std::f64::consts::PI), Attributes::READ_ONLY);
    builder.value(&global_object, "Math", Value::Object(math), Attributes::HIDDEN);

    let eval = builder.native("eval", 1, global_eval, false);
    builder.value(&global_object, "eval", Value::Object(eval.clone()), Attributes::HIDDEN);

    builder.value(&global_object, "undefined", Value::Undefined, Attributes::READ_ONLY);
    builder.value(&global_object, "NaN", Value::Number(f64::NAN), Attributes::READ_ONLY);
    builder.value(&global_object, "Infinity", Value::Number(f64::INFINITY), Attributes::READ_ONLY);
    builder.value(
        &global_object,
        "globalThis",
        Value::Object(global_object.clone()),
        Attributes::HIDDEN,
    );

    Realm {
        global_object,
        object_prototype,
        function_prototype,
        array_prototype,
        eval,
        errors,
    }
}

impl Interpreter {
    pub(crate) fn new_object(&self) -> ObjectRef {
        Object::new_ref(ObjectKind::Ordinary, Some(self.realm.object_prototype.clone()))
    }

    pub(crate) fn new_array(&self, elements: Vec<Value>) -> ObjectRef {
        Object::new_ref(ObjectKind::Array(elements), Some(self.realm.array_prototype.clone()))
    }
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Undefined)
}

fn rest(args: &[Value], from: usize) -> &[Value] {
    args.get(from..).unwrap_or(&[])
}

// ============================================================================
// Host functions
// ============================================================================

fn assert_equals(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    let actual = arg(args, 0);
    let expected = arg(args, 1);
    if actual.same_value(&expected) {
        return Ok(Value::Undefined);
    }
    Err(RuntimeError::error(format!(
        "assertEquals: expected {}, got {}",
        interp.inspect(&expected),
        interp.inspect(&actual)
    )))
}

fn assert_throws(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    let expected = match &arg(args, 1) {
        Value::Object(constructor) => interp.realm.error_kind_of(constructor),
        _ => None,
    }
    .ok_or_else(|| RuntimeError::type_error("assertThrows: second argument must be an error constructor"))?;

    match interp.call(&arg(args, 0), Value::Undefined, &[]) {
        Ok(_) => Err(RuntimeError::error(format!(
            "assertThrows: expected {} but nothing was thrown",
            expected
        ))),
        Err(err) if err.kind() == expected => Ok(Value::Undefined),
        Err(err) => Err(RuntimeError::error(format!(
            "assertThrows: expected {}, got {}",
            expected,
            err.report()
        ))),
    }
}

fn print(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    let mut parts = Vec::with_capacity(args.len());
    for value in args {
        parts.push(interp.to_string(value)?.to_string());
    }
    interp.print(&parts.join(" "));
    Ok(Value::Undefined)
}

fn global_eval(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    interp.eval_indirect(&arg(args, 0))
}

fn string_function(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    match args.first() {
        Some(value) => Ok(Value::String(interp.to_string(value)?)),
        None => Ok(Value::string("")),
    }
}

fn number_function(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    match args.first() {
        Some(value) => Ok(Value::Number(interp.to_number(value)?)),
        None => Ok(Value::Number(0.0)),
    }
}

// ============================================================================
// Constructors
// ============================================================================

fn object_constructor(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    match arg(args, 0) {
        Value::Object(object) => Ok(Value::Object(object)),
        _ => Ok(Value::Object(interp.new_object())),
    }
}

fn function_constructor(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    interp.create_dynamic_function(args)
}

fn array_constructor(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    let elements = match args {
        [Value::Number(n)] => {
            let length = *n as u32;
            if f64::from(length) != *n || length > MAX_ARRAY_LENGTH {
                return Err(RuntimeError::range_error("invalid array length"));
            }
            vec![Value::Undefined; length as usize]
        }
        _ => args.to_vec(),
    };
    Ok(Value::Object(interp.new_array(elements)))
}

fn construct_error(interp: &mut Interpreter, kind: ErrorKind, args: &[Value]) -> EvalResult<Value> {
    let error = Object::new_ref(ObjectKind::Error(kind), Some(interp.realm.error_prototype(kind)));
    if let Some(message) = args.first().filter(|message| !message.is_undefined()) {
        let message = interp.to_string(message)?;
        error
            .borrow_mut()
            .define(PropertyKey::Name(sym::MESSAGE), Value::String(message), Attributes::HIDDEN);
    }
    Ok(Value::Object(error))
}

fn error_constructor(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    construct_error(interp, ErrorKind::Error, args)
}

fn syntax_error_constructor(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    construct_error(interp, ErrorKind::SyntaxError, args)
}

fn reference_error_constructor(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    construct_error(interp, ErrorKind::ReferenceError, args)
}

fn type_error_constructor(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    construct_error(interp, ErrorKind::TypeError, args)
}

fn range_error_constructor(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    construct_error(interp, ErrorKind::RangeError, args)
}

// ============================================================================
// Object
// ============================================================================

fn object_get_prototype_of(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    match arg(args, 0) {
        Value::Object(object) => {
            let prototype = object.borrow().prototype.clone();
            Ok(prototype.map(Value::Object).unwrap_or(Value::Null))
        }
        value if value.is_nullish() => Err(RuntimeError::type_error(format!(
            "cannot convert {} to object",
            interp.render(&value)
        ))),
        _ => Ok(Value::Object(interp.realm.object_prototype.clone())),
    }
}

fn object_keys(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    match arg(args, 0) {
        Value::Object(object) => {
            let keys = object.borrow().own_enumerable_keys();
            let names = keys
                .into_iter()
                .map(|key| Value::String(key.to_text(&interp.interner)))
                .collect();
            Ok(Value::Object(interp.new_array(names)))
        }
        value if value.is_nullish() => Err(RuntimeError::type_error(format!(
            "cannot convert {} to object",
            interp.render(&value)
        ))),
        _ => Ok(Value::Object(interp.new_array(Vec::new()))),
    }
}

fn object_has_own_property(interp: &mut Interpreter, this: &Value, args: &[Value]) -> EvalResult<Value> {
    let key = interp.to_property_key(&arg(args, 0))?;
    let found = match this {
        Value::Object(object) => object.borrow().has_own(key),
        Value::String(s) => match key {
            PropertyKey::Name(name) => name == sym::LENGTH,
            PropertyKey::Index(index) => (index as usize) < s.chars().count(),
        },
        _ => false,
    };
    Ok(Value::Boolean(found))
}

fn object_to_string(_interp: &mut Interpreter, this: &Value, _args: &[Value]) -> EvalResult<Value> {
    let tag = match this {
        Value::Undefined => "Undefined",
        Value::Null => "Null",
        Value::Boolean(_) => "Boolean",
        Value::Number(_) => "Number",
        Value::String(_) => "String",
        Value::Object(object) => object.borrow().class_name(),
    };
    Ok(Value::string(format!("[object {}]", tag)))
}

fn object_value_of(_interp: &mut Interpreter, this: &Value, _args: &[Value]) -> EvalResult<Value> {
    Ok(this.clone())
}

// ============================================================================
// Function.prototype
// ============================================================================

fn function_call(interp: &mut Interpreter, this: &Value, args: &[Value]) -> EvalResult<Value> {
    interp.call(this, arg(args, 0), rest(args, 1))
}

fn function_apply(interp: &mut Interpreter, this: &Value, args: &[Value]) -> EvalResult<Value> {
    let list = match arg(args, 1) {
        Value::Undefined | Value::Null => Vec::new(),
        Value::Object(object) => array_like_to_vec(interp, &object)?,
        other => {
            return Err(RuntimeError::type_error(format!(
                "Function.prototype.apply: argument list {} is not an object",
                interp.inspect(&other)
            )))
        }
    };
    interp.call(this, arg(args, 0), &list)
}

fn function_bind(interp: &mut Interpreter, this: &Value, args: &[Value]) -> EvalResult<Value> {
    let target = match this {
        Value::Object(target) if this.is_callable() => target.clone(),
        _ => return Err(RuntimeError::type_error("Function.prototype.bind called on a non-function")),
    };
    let name = match object::get(&target, PropertyKey::Name(sym::NAME)) {
        Value::String(name) => name,
        _ => Rc::from(""),
    };

    let bound = Object::new_ref(
        ObjectKind::Function(Callable::Bound(BoundFunction {
            target,
            this: arg(args, 0),
            args: rest(args, 1).to_vec(),
        })),
        Some(interp.realm.function_prototype.clone()),
    );
    bound.borrow_mut().define(
        PropertyKey::Name(sym::NAME),
        Value::string(format!("bound {}", name)),
        Attributes::HIDDEN,
    );
    Ok(Value::Object(bound))
}

fn function_to_string(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> EvalResult<Value> {
    if !this.is_callable() {
        return Err(RuntimeError::type_error("Function.prototype.toString called on a non-function"));
    }
    Ok(Value::string(interp.render(this)))
}

// ============================================================================
// Array.prototype
// ============================================================================

/// Snapshot the elements of an array or array-like object.
fn array_like_to_vec(interp: &mut Interpreter, object: &ObjectRef) -> EvalResult<Vec<Value>> {
    if let Some(elements) = object.borrow().elements() {
        return Ok(elements.clone());
    }
    let length = object::get(object, PropertyKey::Name(sym::LENGTH));
    let length = interp.to_number(&length)?;
    let length = if length.is_finite() && length > 0.0 {
        (length as u32).min(MAX_ARRAY_LENGTH)
    } else {
        0
    };
    Ok((0..length).map(|index| object::get(object, PropertyKey::Index(index))).collect())
}

fn elements_of(interp: &mut Interpreter, this: &Value, method: &str) -> EvalResult<Vec<Value>> {
    match this {
        Value::Object(object) => array_like_to_vec(interp, object),
        _ => Err(RuntimeError::type_error(format!(
            "Array.prototype.{} called on {}",
            method,
            interp.inspect(this)
        ))),
    }
}

fn callback(interp: &Interpreter, value: Value, method: &str) -> EvalResult<Value> {
    if value.is_callable() {
        Ok(value)
    } else {
        Err(RuntimeError::type_error(format!(
            "Array.prototype.{}: {} is not a function",
            method,
            interp.inspect(&value)
        )))
    }
}

fn array_map(interp: &mut Interpreter, this: &Value, args: &[Value]) -> EvalResult<Value> {
    let elements = elements_of(interp, this, "map")?;
    let function = callback(interp, arg(args, 0), "map")?;
    let receiver = arg(args, 1);

    let mut mapped = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        mapped.push(interp.call(
            &function,
            receiver.clone(),
            &[element, Value::Number(index as f64), this.clone()],
        )?);
    }
    Ok(Value::Object(interp.new_array(mapped)))
}

fn array_for_each(interp: &mut Interpreter, this: &Value, args: &[Value]) -> EvalResult<Value> {
    let elements = elements_of(interp, this, "forEach")?;
    let function = callback(interp, arg(args, 0), "forEach")?;
    let receiver = arg(args, 1);

    for (index, element) in elements.into_iter().enumerate() {
        interp.call(
            &function,
            receiver.clone(),
            &[element, Value::Number(index as f64), this.clone()],
        )?;
    }
    Ok(Value::Undefined)
}

fn array_reduce(interp: &mut Interpreter, this: &Value, args: &[Value]) -> EvalResult<Value> {
    let elements = elements_of(interp, this, "reduce")?;
    let function = callback(interp, arg(args, 0), "reduce")?;

    let mut items = elements.into_iter().enumerate();
    let mut accumulator = match args.get(1) {
        Some(initial) => initial.clone(),
        None => match items.next() {
            Some((_, first)) => first,
            None => return Err(RuntimeError::type_error("reduce of empty array with no initial value")),
        },
    };
    for (index, element) in items {
        accumulator = interp.call(
            &function,
            Value::Undefined,
            &[accumulator, element, Value::Number(index as f64), this.clone()],
        )?;
    }
    Ok(accumulator)
}

fn array_join(interp: &mut Interpreter, this: &Value, args: &[Value]) -> EvalResult<Value> {
    let separator = match args.first() {
        None | Some(Value::Undefined) => Rc::from(","),
        Some(separator) => interp.to_string(separator)?,
    };
    let elements = elements_of(interp, this, "join")?;

    let mut parts = Vec::with_capacity(elements.len());
    for element in &elements {
        if element.is_nullish() {
            parts.push(String::new());
        } else {
            parts.push(interp.to_string(element)?.to_string());
        }
    }
    Ok(Value::string(parts.join(&separator)))
}

fn array_push(_interp: &mut Interpreter, this: &Value, args: &[Value]) -> EvalResult<Value> {
    let Value::Object(object) = this else {
        return Err(RuntimeError::type_error("Array.prototype.push called on a non-object"));
    };
    let mut object = object.borrow_mut();
    match object.elements_mut() {
        Some(elements) => {
            elements.extend_from_slice(args);
            Ok(Value::Number(elements.len() as f64))
        }
        None => Err(RuntimeError::type_error("Array.prototype.push called on a non-array")),
    }
}

fn array_to_string(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> EvalResult<Value> {
    array_join(interp, this, &[])
}

// ============================================================================
// Error.prototype
// ============================================================================

fn error_to_string(interp: &mut Interpreter, this: &Value, _args: &[Value]) -> EvalResult<Value> {
    let Value::Object(error) = this else {
        return Err(RuntimeError::type_error("Error.prototype.toString called on a non-object"));
    };
    let name = match object::get(error, PropertyKey::Name(sym::NAME)) {
        Value::Undefined => Rc::from("Error"),
        name => interp.to_string(&name)?,
    };
    let message = match object::get(error, PropertyKey::Name(sym::MESSAGE)) {
        Value::Undefined => Rc::from(""),
        message => interp.to_string(&message)?,
    };
    Ok(match (name.is_empty(), message.is_empty()) {
        (_, true) => Value::String(name),
        (true, false) => Value::String(message),
        (false, false) => Value::string(format!("{}: {}", name, message)),
    })
}

// ============================================================================
// Math
// ============================================================================

fn math_unary(interp: &mut Interpreter, args: &[Value], op: fn(f64) -> f64) -> EvalResult<Value> {
    Ok(Value::Number(op(interp.to_number(&arg(args, 0))?)))
}

fn math_floor(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    math_unary(interp, args, f64::floor)
}

fn math_abs(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    math_unary(interp, args, f64::abs)
}

fn math_sqrt(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    math_unary(interp, args, f64::sqrt)
}

fn math_atan2(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    let y = interp.to_number(&arg(args, 0))?;
    let x = interp.to_number(&arg(args, 1))?;
    Ok(Value::Number(y.atan2(x)))
}

/// Fold for `max`/`min`; NaN anywhere wins, but every argument is converted.
fn math_extremum(interp: &mut Interpreter, args: &[Value], start: f64, pick: fn(f64, f64) -> f64) -> EvalResult<Value> {
    let mut result = start;
    for value in args {
        let n = interp.to_number(value)?;
        result = if n.is_nan() || result.is_nan() {
            f64::NAN
        } else {
            pick(result, n)
        };
    }
    Ok(Value::Number(result))
}

fn math_max(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    math_extremum(interp, args, f64::NEG_INFINITY, f64::max)
}

fn math_min(interp: &mut Interpreter, _this: &Value, args: &[Value]) -> EvalResult<Value> {
    math_extremum(interp, args, f64::INFINITY, f64::min)
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
    fn test_assert_equals_reports_both_values() {
        assert_eq!(eval("assertEquals(1, 1); 'ok'"), "ok");
        assert_eq!(eval("assertEquals(NaN, NaN); 'ok'"), "ok");
        assert_eq!(eval("assertEquals('a', 1)"), "Error: assertEquals: expected 1, got \"a\"");
    }

    #[test]
    fn test_assert_throws_matches_kind() {
        assert_eq!(eval("assertThrows(() => undefinedName, ReferenceError); 'ok'"), "ok");
        assert_eq!(
            eval("assertThrows(() => 1, TypeError)"),
            "Error: assertThrows: expected TypeError but nothing was thrown"
        );
        assert_eq!(
            eval("assertThrows(() => { throw new RangeError('r'); }, TypeError)"),
            "Error: assertThrows: expected TypeError, got RangeError: r"
        );
    }

    #[test]
    fn test_error_objects() {
        assert_eq!(eval("String(new TypeError('bad'))"), "TypeError: bad");
        assert_eq!(eval("new SyntaxError() instanceof Error"), "true");
        assert_eq!(eval("var e; try { null.x; } catch (err) { e = err; } e instanceof TypeError"), "true");
    }

    #[test]
    fn test_array_methods() {
        assert_eq!(eval("[1, 2, 3].map(x => x * 2).join('-')"), "2-4-6");
        assert_eq!(eval("[1, 2, 3].reduce((a, b) => a + b)"), "6");
        assert_eq!(eval("var a = [1]; a.push(2, 3); a.length"), "3");
        assert_eq!(eval("var s = 0; [4, 5].forEach(x => { s += x; }); s"), "9");
    }

    #[test]
    fn test_bind_call_apply() {
        assert_eq!(eval("function f(a, b) { return this.v + a + b; } f.call({ v: 1 }, 2, 3)"), "6");
        assert_eq!(eval("function f(a, b) { return this.v + a + b; } f.apply({ v: 1 }, [2, 3])"), "6");
        assert_eq!(eval("function f(a) { return this.v + a; } f.bind({ v: 10 }, 5)()"), "15");
        assert_eq!(eval("function f(a, b) {} f.bind(null, 1).length"), "1");
    }

    #[test]
    fn test_math() {
        assert_eq!(eval("Math.max(1, 5, 3)"), "5");
        assert_eq!(eval("Math.min()"), "Infinity");
        assert_eq!(eval("Math.floor(2.7)"), "2");
        assert_eq!(eval("Math.atan2(0, 1)"), "0");
    }

    #[test]
    fn test_object_statics() {
        assert_eq!(eval("Object.keys({ a: 1, b: 2 }).join()"), "a,b");
        assert_eq!(eval("Object.getPrototypeOf(x => x) === Function.prototype"), "true");
        assert_eq!(eval("({}).hasOwnProperty('a')"), "false");
    }
}
