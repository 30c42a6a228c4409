//! String interning.
//!
//! Identifiers, string literals and runtime property keys all go through
//! one interner owned by the interpreter, so scopes and property tables key
//! on a 4-byte [`Symbol`] instead of owned strings. Names the evaluator
//! needs by value are interned first, at fixed indices (see [`sym`]).

use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use std::num::NonZeroU32;

/// Handle to an interned string. Only meaningful for the interner that
/// produced it, or for the predefined names in [`sym`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(NonZeroU32);

impl Symbol {
    const fn from_index(index: u32) -> Self {
        match NonZeroU32::new(index + 1) {
            Some(n) => Symbol(n),
            None => panic!("symbol index overflow"),
        }
    }

    fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

macro_rules! predefined {
    ($($name:ident = $text:literal,)*) => {
        const PREDEFINED: &[&str] = &[$($text,)*];

        /// Symbols every [`Interner`] starts with.
        pub mod sym {
            use super::Symbol;

            #[allow(non_camel_case_types, clippy::upper_case_acronyms)]
            #[repr(u32)]
            enum Index {
                $($name,)*
            }

            $(pub const $name: Symbol = Symbol::from_index(Index::$name as u32);)*
        }
    };
}

predefined! {
    EMPTY = "",
    THIS = "this",
    ARGUMENTS = "arguments",
    EVAL = "eval",
    LENGTH = "length",
    PROTOTYPE = "prototype",
    CALLEE = "callee",
    NAME = "name",
    MESSAGE = "message",
    CONSTRUCTOR = "constructor",
    USE_STRICT = "use strict",
    IMPLEMENTS = "implements",
    INTERFACE = "interface",
    LET = "let",
    PACKAGE = "package",
    PRIVATE = "private",
    PROTECTED = "protected",
    PUBLIC = "public",
    STATIC = "static",
    YIELD = "yield",
    UNDEFINED = "undefined",
    NAN = "NaN",
    INFINITY = "Infinity",
    TO_STRING = "toString",
    VALUE_OF = "valueOf",
}

/// Words that are reserved only in strict-mode code.
pub const STRICT_RESERVED: &[Symbol] = &[
    sym::IMPLEMENTS,
    sym::INTERFACE,
    sym::LET,
    sym::PACKAGE,
    sym::PRIVATE,
    sym::PROTECTED,
    sym::PUBLIC,
    sym::STATIC,
    sym::YIELD,
];

/// Insertion-ordered set of strings; a symbol is its string's position.
#[derive(Clone)]
pub struct Interner {
    strings: IndexSet<Box<str>, FxBuildHasher>,
}

impl Interner {
    pub fn new() -> Self {
        let mut strings = IndexSet::with_capacity_and_hasher(PREDEFINED.len(), FxBuildHasher);
        strings.extend(PREDEFINED.iter().map(|&name| Box::from(name)));
        Self { strings }
    }

    /// The symbol for `s`, interning it on first sight.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(symbol) = self.get(s) {
            return symbol;
        }
        let (index, _) = self.strings.insert_full(Box::from(s));
        Symbol::from_index(index as u32)
    }

    /// Look up a string without interning it.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.strings.get_index_of(s).map(|index| Symbol::from_index(index as u32))
    }

    /// Panics if `symbol` came from a different interner.
    #[inline]
    pub fn resolve(&self, symbol: Symbol) -> &str {
        &self.strings[symbol.index()]
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_returns_the_same_symbol() {
        let mut interner = Interner::new();
        let before = interner.len();
        let a = interner.intern("alpha");
        let b = interner.intern("beta");
        assert_eq!(interner.intern("alpha"), a);
        assert_ne!(a, b);
        assert_eq!(interner.len(), before + 2);
        assert_eq!(interner.resolve(b), "beta");
    }

    #[test]
    fn test_predefined_names_have_fixed_symbols() {
        let mut interner = Interner::new();
        assert_eq!(interner.intern("arguments"), sym::ARGUMENTS);
        assert_eq!(interner.intern("valueOf"), sym::VALUE_OF);
        assert_eq!(interner.resolve(sym::USE_STRICT), "use strict");
        assert_eq!(interner.resolve(sym::EMPTY), "");
        assert_eq!(interner.len(), PREDEFINED.len());
    }

    #[test]
    fn test_get_does_not_intern() {
        let interner = Interner::new();
        assert_eq!(interner.get("length"), Some(sym::LENGTH));
        assert_eq!(interner.get("missing"), None);
        assert_eq!(interner.len(), PREDEFINED.len());
    }
}
