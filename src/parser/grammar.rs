//! winnow grammar for the manifest literal subset.
//!
//! Parsers take `&mut &str`. On failure the input is left at the offending position, so the
//! caller can turn the remaining length into an offset. Failures with a meaning of their own
//! travel as the error's cause.
use super::Value;
use crate::errors::ParseError;
use thiserror::Error;
use winnow::combinator::{alt, opt, repeat};
use winnow::error::{ContextError, ErrMode, FromExternalError};
use winnow::token::{any, one_of, take, take_till, take_while};
use winnow::{ModalResult, Parser};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
enum Fault {
    #[error("expected {0}")]
    Expected(&'static str),
    #[error("unterminated string")]
    UnterminatedString,
    #[error("invalid escape")]
    InvalidEscape,
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
    #[error("trailing input")]
    TrailingInput,
    #[error("name {0:?} is not a literal")]
    UnsupportedName(String),
    #[error("bytes and str mixed")]
    MixedStringKinds,
    #[error("non-ASCII bytes")]
    NonAsciiBytes,
    #[error("unhashable {0}")]
    Unhashable(&'static str),
    #[error("nested deeper than {0}")]
    TooDeep(usize),
}

impl Fault {
    fn at(self, offset: usize) -> ParseError {
        match self {
            Fault::Expected(expected) => ParseError::Expected { expected, offset },
            Fault::UnterminatedString => ParseError::UnterminatedString { offset },
            Fault::InvalidEscape => ParseError::InvalidEscape { offset },
            Fault::InvalidNumber(text) => ParseError::InvalidNumber { text, offset },
            Fault::TrailingInput => ParseError::TrailingInput { offset },
            Fault::UnsupportedName(name) => ParseError::UnsupportedName { name, offset },
            Fault::MixedStringKinds => ParseError::MixedStringKinds { offset },
            Fault::NonAsciiBytes => ParseError::NonAsciiBytes { offset },
            Fault::Unhashable(kind) => ParseError::Unhashable { kind, offset },
            Fault::TooDeep(limit) => ParseError::TooDeep { limit, offset },
        }
    }
}

/// Convert a grammar error into a `ParseError` located at `offset`.
pub(crate) fn describe(err: ErrMode<ContextError>, offset: usize) -> ParseError {
    let ctx = match err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
        ErrMode::Incomplete(_) => {
            return ParseError::Syntax { message: "incomplete input".to_string(), offset };
        }
    };
    if let Some(fault) = ctx.cause().and_then(|cause| cause.downcast_ref::<Fault>()) {
        return fault.clone().at(offset);
    }
    let message = ctx.to_string();
    ParseError::Syntax {
        message: if message.is_empty() { "unexpected input".to_string() } else { message },
        offset,
    }
}

/// Rewind `input` to `at` and fail there without backtracking.
fn fail_at<'i>(input: &mut &'i str, at: &'i str, fault: Fault) -> ErrMode<ContextError> {
    *input = at;
    ErrMode::Cut(ContextError::from_external_error(&*input, fault))
}

/// Container nesting budget.
#[derive(Debug, Clone, Copy)]
struct Nesting {
    depth: usize,
    limit: usize,
}

impl Nesting {
    fn enter(self, input: &mut &str) -> ModalResult<Self> {
        if self.depth >= self.limit {
            let at = *input;
            return Err(fail_at(input, at, Fault::TooDeep(self.limit)));
        }
        Ok(Self { depth: self.depth + 1, ..self })
    }
}

/// Exactly one literal, surrounded by optional trivia.
pub(crate) fn document(input: &mut &str, max_depth: usize) -> ModalResult<Value> {
    ws(input)?;
    let literal = value(input, Nesting { depth: 0, limit: max_depth })?;
    ws(input)?;
    if !input.is_empty() {
        let at = *input;
        return Err(fail_at(input, at, Fault::TrailingInput));
    }
    Ok(literal)
}

fn ws(input: &mut &str) -> ModalResult<()> {
    repeat::<_, _, (), _, _>(0.., alt((whitespace, comment, line_continuation))).parse_next(input)?;
    Ok(())
}

fn whitespace(input: &mut &str) -> ModalResult<()> {
    take_while(1.., char::is_whitespace).void().parse_next(input)
}

fn comment(input: &mut &str) -> ModalResult<()> {
    ('#', take_till(0.., |c: char| c == '\n')).void().parse_next(input)
}

fn line_continuation(input: &mut &str) -> ModalResult<()> {
    alt(("\\\n", "\\\r\n")).void().parse_next(input)
}

fn value(input: &mut &str, nest: Nesting) -> ModalResult<Value> {
    let ahead = *input;
    let mut chars = ahead.chars();
    match (chars.next(), chars.next()) {
        (Some('{'), _) => {
            let inner = nest.enter(input)?;
            brace(input, inner)
        }
        (Some('['), _) => {
            let inner = nest.enter(input)?;
            '['.parse_next(input)?;
            let (items, _) = elements(input, inner, ']', "',' or ']'")?;
            Ok(Value::List(items))
        }
        (Some('('), _) => {
            let inner = nest.enter(input)?;
            '('.parse_next(input)?;
            let (mut items, comma) = elements(input, inner, ')', "',' or ')'")?;
            if !comma && items.len() == 1 {
                if let Some(grouped) = items.pop() {
                    return Ok(grouped);
                }
            }
            Ok(Value::Tuple(items))
        }
        (Some('-' | '+'), _) => signed(input),
        (Some('0'..='9'), _) | (Some('.'), Some('0'..='9')) => number(input, false),
        (Some(c), _) if c == '\'' || c == '"' || is_ident_start(c) => word(input),
        _ => Err(fail_at(input, ahead, Fault::Expected("a literal"))),
    }
}

fn expect<'i>(input: &mut &'i str, token: char, what: &'static str) -> ModalResult<()> {
    let at = *input;
    match opt(token).parse_next(input)? {
        Some(_) => Ok(()),
        None => Err(fail_at(input, at, Fault::Expected(what))),
    }
}

fn hashable<'i>(input: &mut &'i str, value: &Value, at: &'i str) -> ModalResult<()> {
    if value.is_hashable() {
        Ok(())
    } else {
        Err(fail_at(input, at, Fault::Unhashable(value.type_name())))
    }
}

/// Comma separated items up to `close`, trailing comma allowed. The opener is already consumed.
/// Also reports whether any comma was seen, which tells `(x)` from `(x,)`.
fn elements(
    input: &mut &str,
    nest: Nesting,
    close: char,
    expected: &'static str,
) -> ModalResult<(Vec<Value>, bool)> {
    let mut items = Vec::new();
    let mut comma = false;
    ws(input)?;
    if opt(close).parse_next(input)?.is_some() {
        return Ok((items, comma));
    }
    loop {
        items.push(value(input, nest)?);
        ws(input)?;
        if opt(',').parse_next(input)?.is_none() {
            expect(input, close, expected)?;
            return Ok((items, comma));
        }
        comma = true;
        ws(input)?;
        if opt(close).parse_next(input)?.is_some() {
            return Ok((items, comma));
        }
    }
}

/// `{}` is an empty mapping; the first entry decides between mapping and set.
fn brace(input: &mut &str, nest: Nesting) -> ModalResult<Value> {
    '{'.parse_next(input)?;
    ws(input)?;
    if opt('}').parse_next(input)?.is_some() {
        return Ok(Value::Dict(Vec::new()));
    }
    let first_at = *input;
    let first = value(input, nest)?;
    hashable(input, &first, first_at)?;
    ws(input)?;
    if opt(':').parse_next(input)?.is_some() {
        dict_entries(input, nest, first)
    } else {
        set_items(input, nest, first)
    }
}

fn dict_entries(input: &mut &str, nest: Nesting, first_key: Value) -> ModalResult<Value> {
    let mut entries = Vec::new();
    let mut key = first_key;
    loop {
        ws(input)?;
        let entry = value(input, nest)?;
        entries.push((key, entry));
        ws(input)?;
        let comma = opt(',').parse_next(input)?.is_some();
        ws(input)?;
        if opt('}').parse_next(input)?.is_some() {
            return Ok(Value::Dict(entries));
        }
        if !comma {
            let at = *input;
            return Err(fail_at(input, at, Fault::Expected("',' or '}'")));
        }
        let key_at = *input;
        key = value(input, nest)?;
        hashable(input, &key, key_at)?;
        ws(input)?;
        expect(input, ':', "':'")?;
    }
}

fn set_items(input: &mut &str, nest: Nesting, first: Value) -> ModalResult<Value> {
    let mut items = vec![first];
    loop {
        let comma = opt(',').parse_next(input)?.is_some();
        ws(input)?;
        if opt('}').parse_next(input)?.is_some() {
            return Ok(Value::Set(items));
        }
        if !comma {
            let at = *input;
            return Err(fail_at(input, at, Fault::Expected("',' or '}'")));
        }
        let item_at = *input;
        let item = value(input, nest)?;
        hashable(input, &item, item_at)?;
        items.push(item);
        ws(input)?;
    }
}

fn signed(input: &mut &str) -> ModalResult<Value> {
    let sign = any.parse_next(input)?;
    ws(input)?;
    let ahead = *input;
    let mut chars = ahead.chars();
    match (chars.next(), chars.next()) {
        (Some('0'..='9'), _) | (Some('.'), Some('0'..='9')) => number(input, sign == '-'),
        _ => Err(fail_at(input, ahead, Fault::Expected("a number after the sign"))),
    }
}

fn decimal_digits(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_ascii_digit() || c == '_').void().parse_next(input)
}

fn number(input: &mut &str, negative: bool) -> ModalResult<Value> {
    let start = *input;
    let radix = match start.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };

    let text = match radix {
        Some(radix) => (take(2usize), take_while(0.., move |c: char| c.is_digit(radix) || c == '_'))
            .take()
            .parse_next(input)?,
        None => (
            decimal_digits,
            opt(('.', decimal_digits)),
            opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), decimal_digits)),
        )
            .take()
            .parse_next(input)?,
    };

    // Suffixes such as `j` (complex) or `L` are not supported literals here.
    if input.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
        let suffix: &str = take_while(0.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)?;
        let invalid = format!("{text}{suffix}");
        return Err(fail_at(input, start, Fault::InvalidNumber(invalid)));
    }
    let invalid = Fault::InvalidNumber(text.to_string());
    if text.ends_with('_') || text.contains("__") {
        return Err(fail_at(input, start, invalid));
    }

    let sign = if negative { "-" } else { "" };
    let parsed = match radix {
        Some(radix) => {
            let digits: String = text[2..].chars().filter(|&c| c != '_').collect();
            i64::from_str_radix(&format!("{sign}{digits}"), radix).ok().map(Value::Int)
        }
        None => {
            let digits: String = text.chars().filter(|&c| c != '_').collect();
            if text.contains(['.', 'e', 'E']) {
                format!("{sign}{digits}").parse::<f64>().ok().map(Value::Float)
            } else {
                format!("{sign}{digits}").parse::<i64>().ok().map(Value::Int)
            }
        }
    };
    parsed.ok_or_else(|| fail_at(input, start, invalid))
}

/// A string literal run, or one of the names `True`, `False` and `None`.
fn word(input: &mut &str) -> ModalResult<Value> {
    if string_prefix(*input).is_some() {
        return strings(input);
    }
    let start = *input;
    let name = (take_while(1.., is_ident_start), take_while(0.., is_ident_continue))
        .take()
        .parse_next(input)?;
    match name {
        "True" => Ok(Value::Bool(true)),
        "False" => Ok(Value::Bool(false)),
        "None" => Ok(Value::None),
        other => Err(fail_at(input, start, Fault::UnsupportedName(other.to_string()))),
    }
}

/// Recognise an optional string prefix followed by a quote.
/// Returns `(prefix_len, raw, bytes)`.
fn string_prefix(input: &str) -> Option<(usize, bool, bool)> {
    let prefix: String = input.chars().take_while(char::is_ascii_alphabetic).take(3).collect();
    if !input[prefix.len()..].starts_with(['\'', '"']) {
        return None;
    }
    match prefix.to_ascii_lowercase().as_str() {
        "" | "u" => Some((prefix.len(), false, false)),
        "r" => Some((1, true, false)),
        "b" => Some((1, false, true)),
        "rb" | "br" => Some((2, true, true)),
        _ => None,
    }
}

/// Adjacent string literals, concatenated.
fn strings(input: &mut &str) -> ModalResult<Value> {
    let first = *input;
    let mut text = String::new();
    let mut kind: Option<bool> = None;
    while let Some((prefix_len, raw, bytes)) = string_prefix(*input) {
        let start = *input;
        if kind.is_some_and(|was_bytes| was_bytes != bytes) {
            return Err(fail_at(input, start, Fault::MixedStringKinds));
        }
        kind = Some(bytes);
        *input = &start[prefix_len..];
        text.push_str(&quoted(input, raw, bytes)?);
        ws(input)?;
    }

    if kind == Some(true) {
        return match text.chars().map(|c| u8::try_from(u32::from(c))).collect::<Result<Vec<u8>, _>>() {
            Ok(bytes) => Ok(Value::Bytes(bytes)),
            Err(_) => Err(fail_at(input, first, Fault::InvalidEscape)),
        };
    }
    Ok(Value::Str(text))
}

/// The body of one quoted literal, escapes decoded unless `raw`. The prefix is already consumed.
fn quoted(input: &mut &str, raw: bool, bytes: bool) -> ModalResult<String> {
    let start = *input;
    let quote = any.parse_next(input)?;
    let triple = if quote == '"' { "\"\"\"" } else { "'''" };
    let is_triple = start.starts_with(triple);
    if is_triple {
        *input = &start[triple.len()..];
    }

    let mut out = String::new();
    loop {
        if is_triple && input.starts_with(triple) {
            *input = &input[triple.len()..];
            return Ok(out);
        }
        let here = *input;
        let Some(c) = opt(any).parse_next(input)? else {
            return Err(fail_at(input, start, Fault::UnterminatedString));
        };
        match c {
            c if c == quote && !is_triple => return Ok(out),
            '\n' if !is_triple => return Err(fail_at(input, start, Fault::UnterminatedString)),
            '\\' if raw => {
                out.push('\\');
                // A raw backslash still keeps the next character from closing the string.
                let next_at = *input;
                match opt(any).parse_next(input)? {
                    Some(next) if bytes && !next.is_ascii() => {
                        return Err(fail_at(input, next_at, Fault::NonAsciiBytes));
                    }
                    Some(next) => out.push(next),
                    None => return Err(fail_at(input, start, Fault::UnterminatedString)),
                }
            }
            '\\' => escape(input, &mut out, bytes, here, start)?,
            c if bytes && !c.is_ascii() => return Err(fail_at(input, here, Fault::NonAsciiBytes)),
            c => out.push(c),
        }
    }
}

fn escape<'i>(
    input: &mut &'i str,
    out: &mut String,
    bytes: bool,
    at: &'i str,
    start: &'i str,
) -> ModalResult<()> {
    let Some(c) = opt(any).parse_next(input)? else {
        return Err(fail_at(input, start, Fault::UnterminatedString));
    };
    match c {
        '\n' => {}
        '\r' => {
            opt('\n').parse_next(input)?;
        }
        '\\' | '\'' | '"' => out.push(c),
        'n' => out.push('\n'),
        't' => out.push('\t'),
        'r' => out.push('\r'),
        'a' => out.push('\u{07}'),
        'b' => out.push('\u{08}'),
        'f' => out.push('\u{0c}'),
        'v' => out.push('\u{0b}'),
        '0'..='7' => {
            let rest: &str = take_while(0..=2, |d: char| d.is_digit(8)).parse_next(input)?;
            let code = rest.chars().filter_map(|d| d.to_digit(8)).fold(u32::from(c) - u32::from('0'), |acc, d| acc * 8 + d);
            push_code(input, out, code, bytes, at)?;
        }
        'x' => hex_escape(input, out, 2, bytes, at)?,
        'u' if !bytes => hex_escape(input, out, 4, bytes, at)?,
        'U' if !bytes => hex_escape(input, out, 8, bytes, at)?,
        'N' if !bytes => return Err(fail_at(input, at, Fault::InvalidEscape)),
        other if bytes && !other.is_ascii() => return Err(fail_at(input, at, Fault::NonAsciiBytes)),
        // Unknown escapes are kept verbatim.
        other => {
            out.push('\\');
            out.push(other);
        }
    }
    Ok(())
}

fn hex_escape<'i>(
    input: &mut &'i str,
    out: &mut String,
    len: usize,
    bytes: bool,
    at: &'i str,
) -> ModalResult<()> {
    let digits: ModalResult<&str> = take_while(len..=len, |c: char| c.is_ascii_hexdigit()).parse_next(input);
    let code = match digits.map(|d| u32::from_str_radix(d, 16)) {
        Ok(Ok(code)) => code,
        _ => return Err(fail_at(input, at, Fault::InvalidEscape)),
    };
    push_code(input, out, code, bytes, at)
}

fn push_code<'i>(
    input: &mut &'i str,
    out: &mut String,
    code: u32,
    bytes: bool,
    at: &'i str,
) -> ModalResult<()> {
    match char::from_u32(code) {
        Some(c) if !bytes || code <= 0xff => {
            out.push(c);
            Ok(())
        }
        _ => Err(fail_at(input, at, Fault::InvalidEscape)),
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
