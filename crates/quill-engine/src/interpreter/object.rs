//! Objects and property tables
//!
//! An object is an insertion-ordered property table, an optional prototype
//! and a kind. Arrays and `arguments` objects keep their indexed elements in
//! a dense vector; a function's `length` is derived from the callable rather
//! than stored. There are no accessors, so reading a property never runs
//! script code and the helpers here need no interpreter.

use crate::interpreter::closure::Closure;
use crate::interpreter::error::{ErrorKind, EvalResult};
use crate::interpreter::value::{number_to_string, Value};
use crate::interpreter::Interpreter;
use crate::parser::interner::{sym, Interner, Symbol};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared, interior-mutable object handle.
pub type ObjectRef = Rc<RefCell<Object>>;

/// A property name, with array indices kept apart from named keys.
///
/// Keys that are canonical array indices (`"0"`, `"17"`, but not `"01"`)
/// always become `Index`, whichever way they were written in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    Index(u32),
    Name(Symbol),
}

impl PropertyKey {
    /// Key for a property name given as text.
    pub fn from_text(interner: &mut Interner, name: &str) -> Self {
        match canonical_index(name) {
            Some(index) => PropertyKey::Index(index),
            None => PropertyKey::Name(interner.intern(name)),
        }
    }

    /// Key for an interned name, checking whether it spells an index.
    pub fn from_symbol(interner: &Interner, name: Symbol) -> Self {
        match canonical_index(interner.resolve(name)) {
            Some(index) => PropertyKey::Index(index),
            None => PropertyKey::Name(name),
        }
    }

    /// Key for a number (`arr[2]`, `{1.5: x}`).
    pub fn from_number(interner: &mut Interner, n: f64) -> Self {
        if n >= 0.0 && n < u32::MAX as f64 && n.fract() == 0.0 {
            PropertyKey::Index(n as u32)
        } else {
            PropertyKey::from_text(interner, &number_to_string(n))
        }
    }

    /// The key as the string a script observes (for-in, `Object.keys`).
    pub fn to_text(self, interner: &Interner) -> Rc<str> {
        match self {
            PropertyKey::Index(index) => Rc::from(index.to_string()),
            PropertyKey::Name(name) => Rc::from(interner.resolve(name)),
        }
    }
}

impl From<Symbol> for PropertyKey {
    /// For names known not to be indices (identifiers, builtin names).
    fn from(name: Symbol) -> Self {
        PropertyKey::Name(name)
    }
}

/// `"0"` and `"42"` are indices; `"042"`, `"-1"` and `"4294967295"` are not.
pub fn canonical_index(text: &str) -> Option<u32> {
    let bytes = text.as_bytes();
    if bytes.is_empty() || bytes.len() > 10 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return None;
    }
    text.parse::<u32>().ok().filter(|&index| index != u32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attributes {
    pub writable: bool,
    pub enumerable: bool,
}

impl Attributes {
    /// Ordinary assignment-created property
    pub const DATA: Attributes = Attributes { writable: true, enumerable: true };
    /// Builtin methods, `constructor`, `callee`
    pub const HIDDEN: Attributes = Attributes { writable: true, enumerable: false };
    /// `undefined`, `NaN`, derived `length`
    pub const READ_ONLY: Attributes = Attributes { writable: false, enumerable: false };
}

#[derive(Debug, Clone)]
pub struct Property {
    pub value: Value,
    pub attributes: Attributes,
}

/// Signature of a host function: `(interpreter, this, arguments)`.
pub type NativeFn = fn(&mut Interpreter, &Value, &[Value]) -> EvalResult<Value>;

pub struct NativeFunction {
    pub name: Symbol,
    pub length: u32,
    pub call: NativeFn,
    /// Accepts `new`
    pub constructor: bool,
}

/// Result of `Function.prototype.bind`.
pub struct BoundFunction {
    pub target: ObjectRef,
    pub this: Value,
    pub args: Vec<Value>,
}

pub enum Callable {
    Closure(Rc<Closure>),
    Native(NativeFunction),
    Bound(BoundFunction),
}

pub enum ObjectKind {
    Ordinary,
    Array(Vec<Value>),
    Arguments(Vec<Value>),
    Function(Callable),
    Error(ErrorKind),
}

pub struct Object {
    pub kind: ObjectKind,
    pub prototype: Option<ObjectRef>,
    properties: IndexMap<PropertyKey, Property, FxBuildHasher>,
}

impl Object {
    pub fn new(kind: ObjectKind, prototype: Option<ObjectRef>) -> Self {
        Self {
            kind,
            prototype,
            properties: IndexMap::default(),
        }
    }

    /// Allocate a shared object.
    pub fn new_ref(kind: ObjectKind, prototype: Option<ObjectRef>) -> ObjectRef {
        Rc::new(RefCell::new(Self::new(kind, prototype)))
    }

    /// The `[object X]` tag.
    pub fn class_name(&self) -> &'static str {
        match &self.kind {
            ObjectKind::Ordinary => "Object",
            ObjectKind::Array(_) => "Array",
            ObjectKind::Arguments(_) => "Arguments",
            ObjectKind::Function(_) => "Function",
            ObjectKind::Error(_) => "Error",
        }
    }

    pub fn callable(&self) -> Option<&Callable> {
        match &self.kind {
            ObjectKind::Function(callable) => Some(callable),
            _ => None,
        }
    }

    pub fn elements(&self) -> Option<&Vec<Value>> {
        match &self.kind {
            ObjectKind::Array(elements) | ObjectKind::Arguments(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn elements_mut(&mut self) -> Option<&mut Vec<Value>> {
        match &mut self.kind {
            ObjectKind::Array(elements) | ObjectKind::Arguments(elements) => Some(elements),
            _ => None,
        }
    }

    /// Number of declared parameters, for functions.
    pub fn function_length(&self) -> Option<u32> {
        match self.callable()? {
            Callable::Closure(closure) => Some(closure.length()),
            Callable::Native(native) => Some(native.length),
            Callable::Bound(bound) => {
                let target = bound.target.borrow().function_length().unwrap_or(0);
                Some(target.saturating_sub(bound.args.len() as u32))
            }
        }
    }

    /// Read an own property.
    pub fn get_own(&self, key: PropertyKey) -> Option<Value> {
        match (key, &self.kind) {
            (PropertyKey::Index(index), ObjectKind::Array(elements) | ObjectKind::Arguments(elements)) => {
                elements.get(index as usize).cloned()
            }
            (PropertyKey::Name(name), ObjectKind::Array(elements) | ObjectKind::Arguments(elements)) if name == sym::LENGTH => {
                Some(Value::Number(elements.len() as f64))
            }
            (PropertyKey::Name(name), ObjectKind::Function(_)) if name == sym::LENGTH => {
                self.function_length().map(|len| Value::Number(len as f64))
            }
            _ => self.properties.get(&key).map(|prop| prop.value.clone()),
        }
    }

    /// Attributes of an own property, if there is one.
    pub fn own_attributes(&self, key: PropertyKey) -> Option<Attributes> {
        match (key, &self.kind) {
            (PropertyKey::Index(index), ObjectKind::Array(elements) | ObjectKind::Arguments(elements))
                if (index as usize) < elements.len() =>
            {
                Some(Attributes::DATA)
            }
            (PropertyKey::Name(name), ObjectKind::Array(_) | ObjectKind::Arguments(_)) if name == sym::LENGTH => {
                Some(Attributes::HIDDEN)
            }
            (PropertyKey::Name(name), ObjectKind::Function(_)) if name == sym::LENGTH => Some(Attributes::READ_ONLY),
            _ => self.properties.get(&key).map(|prop| prop.attributes),
        }
    }

    pub fn has_own(&self, key: PropertyKey) -> bool {
        self.own_attributes(key).is_some()
    }

    /// Assign an own property, creating it if needed.
    ///
    /// Returns `false` when the property is read-only.
    pub fn set_own(&mut self, key: PropertyKey, value: Value) -> bool {
        match (key, &mut self.kind) {
            (PropertyKey::Index(index), ObjectKind::Array(elements) | ObjectKind::Arguments(elements)) => {
                let index = index as usize;
                if index >= elements.len() {
                    elements.resize(index + 1, Value::Undefined);
                }
                elements[index] = value;
                true
            }
            (PropertyKey::Name(name), ObjectKind::Array(elements) | ObjectKind::Arguments(elements)) if name == sym::LENGTH => {
                let len = value.primitive_to_number();
                if len >= 0.0 && len.fract() == 0.0 && len < u32::MAX as f64 {
                    elements.resize(len as usize, Value::Undefined);
                    true
                } else {
                    false
                }
            }
            (PropertyKey::Name(name), ObjectKind::Function(_)) if name == sym::LENGTH => false,
            _ => match self.properties.get_mut(&key) {
                Some(prop) if !prop.attributes.writable => false,
                Some(prop) => {
                    prop.value = value;
                    true
                }
                None => {
                    self.properties.insert(key, Property { value, attributes: Attributes::DATA });
                    true
                }
            },
        }
    }

    /// Create or replace an own property with explicit attributes.
    pub fn define(&mut self, key: PropertyKey, value: Value, attributes: Attributes) {
        if self.elements().is_some() && matches!(key, PropertyKey::Index(_)) {
            self.set_own(key, value);
        } else {
            self.properties.insert(key, Property { value, attributes });
        }
    }

    /// Remove an own property. Returns `false` for read-only properties.
    pub fn delete(&mut self, key: PropertyKey) -> bool {
        if let (PropertyKey::Index(index), Some(elements)) = (key, self.elements_mut()) {
            // Elements are dense; a deleted slot reads as undefined
            if let Some(slot) = elements.get_mut(index as usize) {
                *slot = Value::Undefined;
            }
            return true;
        }
        match self.own_attributes(key) {
            Some(attributes) if !attributes.writable => false,
            _ => {
                self.properties.shift_remove(&key);
                true
            }
        }
    }

    /// Own enumerable keys: indices first, then named keys in insertion order.
    pub fn own_enumerable_keys(&self) -> Vec<PropertyKey> {
        let indices = self
            .elements()
            .map(|elements| (0..elements.len() as u32).map(PropertyKey::Index).collect::<Vec<_>>())
            .unwrap_or_default();

        indices
            .into_iter()
            .chain(
                self.properties
                    .iter()
                    .filter(|(_, prop)| prop.attributes.enumerable)
                    .map(|(key, _)| *key),
            )
            .collect()
    }
}

impl std::fmt::Debug for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Prototype chains and closures are cyclic
        write!(f, "[object {}]", self.class_name())
    }
}

/// Read a property, walking the prototype chain.
pub fn get(object: &ObjectRef, key: PropertyKey) -> Value {
    let mut current = object.clone();
    loop {
        let next = {
            let obj = current.borrow();
            if let Some(value) = obj.get_own(key) {
                return value;
            }
            obj.prototype.clone()
        };
        match next {
            Some(proto) => current = proto,
            None => return Value::Undefined,
        }
    }
}

/// The `in` operator.
pub fn has_property(object: &ObjectRef, key: PropertyKey) -> bool {
    let mut current = object.clone();
    loop {
        let next = {
            let obj = current.borrow();
            if obj.has_own(key) {
                return true;
            }
            obj.prototype.clone()
        };
        match next {
            Some(proto) => current = proto,
            None => return false,
        }
    }
}

/// Assign a property. An inherited read-only property blocks creation of an
/// own one. Returns `false` when the assignment was refused.
pub fn set(object: &ObjectRef, key: PropertyKey, value: Value) -> bool {
    if object.borrow().has_own(key) {
        return object.borrow_mut().set_own(key, value);
    }

    let mut proto = object.borrow().prototype.clone();
    while let Some(current) = proto {
        let obj = current.borrow();
        if let Some(attributes) = obj.own_attributes(key) {
            if !attributes.writable {
                return false;
            }
            break;
        }
        proto = obj.prototype.clone();
    }

    object.borrow_mut().set_own(key, value)
}

/// Keys visited by `for-in`: own enumerable keys, then inherited ones not
/// already seen.
pub fn enumerable_keys(object: &ObjectRef) -> Vec<PropertyKey> {
    let mut keys: IndexSet<PropertyKey, FxBuildHasher> = IndexSet::default();
    let mut current = Some(object.clone());
    while let Some(obj) = current {
        let obj = obj.borrow();
        keys.extend(obj.own_enumerable_keys());
        current = obj.prototype.clone();
    }
    keys.into_iter().collect()
}

/// Whether `target` appears on `object`'s prototype chain.
pub fn inherits_from(object: &ObjectRef, target: &ObjectRef) -> bool {
    let mut proto = object.borrow().prototype.clone();
    while let Some(current) = proto {
        if Rc::ptr_eq(&current, target) {
            return true;
        }
        proto = current.borrow().prototype.clone();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_index() {
        assert_eq!(canonical_index("0"), Some(0));
        assert_eq!(canonical_index("42"), Some(42));
        assert_eq!(canonical_index("042"), None);
        assert_eq!(canonical_index("-1"), None);
        assert_eq!(canonical_index("1.5"), None);
        assert_eq!(canonical_index("4294967295"), None);
    }

    #[test]
    fn test_string_and_number_keys_agree() {
        let mut interner = Interner::new();
        assert_eq!(PropertyKey::from_text(&mut interner, "3"), PropertyKey::from_number(&mut interner, 3.0));
        assert!(matches!(PropertyKey::from_number(&mut interner, 1.5), PropertyKey::Name(_)));
    }

    #[test]
    fn test_prototype_lookup() {
        let mut interner = Interner::new();
        let key = PropertyKey::from_text(&mut interner, "greeting");

        let proto = Object::new_ref(ObjectKind::Ordinary, None);
        proto.borrow_mut().set_own(key, Value::string("hi"));
        let child = Object::new_ref(ObjectKind::Ordinary, Some(proto.clone()));

        assert!(get(&child, key).strict_equals(&Value::string("hi")));
        assert!(has_property(&child, key));
        assert!(!child.borrow().has_own(key));
        assert!(inherits_from(&child, &proto));
    }

    #[test]
    fn test_inherited_read_only_blocks_assignment() {
        let mut interner = Interner::new();
        let key = PropertyKey::from_text(&mut interner, "fixed");

        let proto = Object::new_ref(ObjectKind::Ordinary, None);
        proto.borrow_mut().define(key, Value::Number(1.0), Attributes::READ_ONLY);
        let child = Object::new_ref(ObjectKind::Ordinary, Some(proto));

        assert!(!set(&child, key, Value::Number(2.0)));
        assert!(!child.borrow().has_own(key));
    }

    #[test]
    fn test_array_elements_and_length() {
        let array = Object::new_ref(ObjectKind::Array(vec![Value::Number(1.0)]), None);
        assert!(set(&array, PropertyKey::Index(2), Value::Number(3.0)));

        let length = get(&array, PropertyKey::Name(sym::LENGTH));
        assert!(length.strict_equals(&Value::Number(3.0)));
        assert!(get(&array, PropertyKey::Index(1)).is_undefined());
        assert_eq!(
            array.borrow().own_enumerable_keys(),
            vec![PropertyKey::Index(0), PropertyKey::Index(1), PropertyKey::Index(2)]
        );
    }

    #[test]
    fn test_enumeration_order_and_hidden_properties() {
        let mut interner = Interner::new();
        let a = PropertyKey::from_text(&mut interner, "a");
        let b = PropertyKey::from_text(&mut interner, "b");
        let hidden = PropertyKey::from_text(&mut interner, "hidden");

        let proto = Object::new_ref(ObjectKind::Ordinary, None);
        proto.borrow_mut().set_own(b, Value::Null);
        proto.borrow_mut().define(hidden, Value::Null, Attributes::HIDDEN);
        let obj = Object::new_ref(ObjectKind::Ordinary, Some(proto));
        obj.borrow_mut().set_own(a, Value::Null);
        obj.borrow_mut().set_own(b, Value::Null);

        assert_eq!(enumerable_keys(&obj), vec![a, b]);
    }
}
