//! Escaping rules for cookie names and values.
//!
//! Two schemes exist, and neither is universally "correct":
//!
//! - [`EncodingScheme::Minimal`] only escapes what would otherwise break the
//!   `name=value; ...` grammar: `;` everywhere and `=` in the name. Everything
//!   else, including `%`, spaces and multibyte UTF-8, is written literally.
//! - [`EncodingScheme::UriComponent`] percent-encodes like `encodeURIComponent`
//!   and then keeps a fixed allow-list of punctuation literal for readability.
//!   Names and values have different allow-lists; parentheses are always
//!   escaped in names.
//!
//! Cookies written with one scheme should be read with the same scheme.
use std::borrow::Cow;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::errors::DecodeError;

/// Everything `encodeURIComponent` escapes.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const NAME: &AsciiSet = &URI_COMPONENT
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'^')
    .remove(b'`')
    .remove(b'|')
    .add(b'(')
    .add(b')');

const VALUE: &AsciiSet = &URI_COMPONENT
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'/')
    .remove(b':')
    .remove(b'<')
    .remove(b'=')
    .remove(b'>')
    .remove(b'?')
    .remove(b'@')
    .remove(b'[')
    .remove(b']')
    .remove(b'^')
    .remove(b'`')
    .remove(b'{')
    .remove(b'|')
    .remove(b'}');

const MINIMAL_NAME: &[(char, &str)] = &[(';', "%3B"), ('=', "%3D")];
const MINIMAL_VALUE: &[(char, &str)] = &[(';', "%3B")];

/// How cookie names and values are escaped on write and unescaped on read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingScheme {
    /// Escape only `;` (and `=` in names).
    #[default]
    Minimal,
    /// `encodeURIComponent` with a per-position allow-list of literal characters.
    UriComponent,
}

impl EncodingScheme {
    pub fn escape_name(self, name: &str) -> Cow<'_, str> {
        match self {
            EncodingScheme::Minimal => escape_chars(name, MINIMAL_NAME),
            EncodingScheme::UriComponent => utf8_percent_encode(name, NAME).into(),
        }
    }

    pub fn escape_value(self, value: &str) -> Cow<'_, str> {
        match self {
            EncodingScheme::Minimal => escape_chars(value, MINIMAL_VALUE),
            EncodingScheme::UriComponent => utf8_percent_encode(value, VALUE).into(),
        }
    }

    /// Reverses [`escape_name`](Self::escape_name).
    ///
    /// Under `UriComponent` every `%` must start a valid escape and the
    /// decoded bytes must be UTF-8.
    pub fn unescape_name(self, name: &str) -> Result<String, DecodeError> {
        match self {
            EncodingScheme::Minimal => Ok(unescape_triples(name, MINIMAL_NAME)),
            EncodingScheme::UriComponent => decode_strict(name),
        }
    }

    /// Reverses [`escape_value`](Self::escape_value).
    ///
    /// Under `UriComponent` only runs of well-formed `%XX` escapes are
    /// decoded; a stray `%` is kept as a literal character.
    pub fn unescape_value(self, value: &str) -> Result<String, DecodeError> {
        match self {
            EncodingScheme::Minimal => Ok(unescape_triples(value, MINIMAL_VALUE)),
            EncodingScheme::UriComponent => decode_runs(value),
        }
    }
}

fn escape_chars<'a>(input: &'a str, table: &[(char, &str)]) -> Cow<'a, str> {
    if !input.contains(|c: char| table.iter().any(|(from, _)| *from == c)) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 4);
    for c in input.chars() {
        match table.iter().find(|(from, _)| *from == c) {
            Some((_, escaped)) => out.push_str(escaped),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Single pass, so an unescaped character never takes part in another match.
fn unescape_triples(input: &str, table: &[(char, &str)]) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match table.iter().find(|(_, escaped)| tail.starts_with(*escaped)) {
            Some((c, escaped)) => {
                out.push(*c);
                rest = &tail[escaped.len()..];
            }
            None => {
                out.push('%');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn is_escape(bytes: &[u8], at: usize) -> bool {
    bytes.len() >= at + 3
        && bytes[at] == b'%'
        && bytes[at + 1].is_ascii_hexdigit()
        && bytes[at + 2].is_ascii_hexdigit()
}

fn decode_utf8(input: &str) -> Result<String, DecodeError> {
    percent_decode_str(input)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| DecodeError::InvalidUtf8 { input: input.to_string() })
}

fn decode_strict(input: &str) -> Result<String, DecodeError> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while let Some(offset) = bytes[i..].iter().position(|&b| b == b'%') {
        let at = i + offset;
        if !is_escape(bytes, at) {
            return Err(DecodeError::MalformedEscape { input: input.to_string() });
        }
        i = at + 3;
    }

    decode_utf8(input)
}

fn decode_runs(input: &str) -> Result<String, DecodeError> {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if !is_escape(bytes, i) {
            i += 1;
            continue;
        }

        let start = i;
        while is_escape(bytes, i) {
            i += 3;
        }

        out.push_str(&input[copied..start]);
        out.push_str(&decode_utf8(&input[start..i])?);
        copied = i;
    }

    out.push_str(&input[copied..]);
    Ok(out)
}
