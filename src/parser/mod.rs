//! Safe parser for the literal subset module manifests are written in.
//!
//! Accepts mappings, lists, tuples, sets, strings (prefixes, escapes, triple quotes and
//! implicit concatenation), integers, floats, `True`, `False` and `None`, with `#` comments
//! anywhere whitespace is allowed. Names, calls and operators are rejected: nothing in a
//! manifest is ever evaluated. Containers nested deeper than [`MAX_NESTING`] are rejected.
use crate::errors::ParseError;

mod grammar;

/// Default limit on nested containers.
pub const MAX_NESTING: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Set(Vec<Value>),
    /// Entries in source order. Duplicate keys are kept; lookups see the last one.
    Dict(Vec<(Value, Value)>),
}

impl Value {
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "None",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Set(_) => "set",
            Value::Dict(_) => "dict",
        }
    }

    /// Look up a string key in a mapping. Returns `None` for non-mappings.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Dict(entries) => entries
                .iter()
                .rev()
                .find(|(k, _)| matches!(k, Value::Str(s) if s == key))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Lists and tuples both count as sequences.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    fn is_hashable(&self) -> bool {
        match self {
            Value::List(_) | Value::Set(_) | Value::Dict(_) => false,
            Value::Tuple(items) => items.iter().all(Value::is_hashable),
            _ => true,
        }
    }
}

/// Parse `src` as a single literal value.
///
/// # Errors
/// Returns a `ParseError` describing the first offending position.
pub fn parse_literal(src: &str) -> Result<Value, ParseError> {
    LiteralParser::new(src).parse()
}

#[derive(Debug, Clone)]
pub struct LiteralParser<'a> {
    src: &'a str,
    max_depth: usize,
}

impl<'a> LiteralParser<'a> {
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self { src, max_depth: MAX_NESTING }
    }

    #[must_use]
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    /// Parse the whole input as exactly one literal, surrounded by optional trivia.
    ///
    /// # Errors
    /// Returns a `ParseError` on malformed input, non-literal syntax, trailing content or
    /// nesting beyond the configured depth.
    pub fn parse(self) -> Result<Value, ParseError> {
        let mut input = self.src.strip_prefix('\u{feff}').unwrap_or(self.src);
        let result = grammar::document(&mut input, self.max_depth);
        let offset = self.src.len() - input.len();
        result.map_err(|err| grammar::describe(err, offset))
    }
}
