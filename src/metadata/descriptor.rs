//! Method descriptor parsing.
//!
//! Descriptors follow the class file grammar: `(` parameter types `)` return type, with
//! `B C D F I J S Z` for primitives, `L`*classname*`;` for references, and `[` prefixes for
//! arrays. Two sizes matter to the optimizer and they differ:
//!
//! - the **logical slot count** - one slot per declared parameter, used to index parameter
//!   value facts; `long` and `double` still count as one slot here
//! - the **storage word count** - `long` and `double` occupy two words in the local variable
//!   and operand stack conventions; everything else occupies one

use crate::{Error, Result};

/// Returns the number of logical parameter slots declared by a method descriptor.
///
/// Wide types (`J`, `D`) occupy one logical slot despite using two storage words.
/// The implicit receiver of instance methods is not part of the descriptor and is
/// not counted here.
///
/// # Arguments
///
/// * `descriptor` - A method descriptor such as `(ILjava/lang/String;)V`
///
/// # Errors
///
/// Returns [`Error::Descriptor`] if the descriptor is malformed.
pub fn parameter_count(descriptor: &str) -> Result<usize> {
    parse(descriptor).map(|(count, _)| count)
}

/// Returns the number of storage words the declared parameters occupy.
///
/// `long` and `double` parameters contribute two words each; every other type,
/// including arrays of wide types, contributes one.
///
/// # Arguments
///
/// * `descriptor` - A method descriptor such as `(JD)V`
///
/// # Errors
///
/// Returns [`Error::Descriptor`] if the descriptor is malformed.
pub fn parameter_words(descriptor: &str) -> Result<usize> {
    parse(descriptor).map(|(_, words)| words)
}

fn malformed(descriptor: &str, message: &str) -> Error {
    Error::Descriptor {
        descriptor: descriptor.to_string(),
        message: message.to_string(),
    }
}

/// Walks the full descriptor once, returning `(logical slots, storage words)`.
fn parse(descriptor: &str) -> Result<(usize, usize)> {
    let bytes = descriptor.as_bytes();
    if bytes.first() != Some(&b'(') {
        return Err(malformed(descriptor, "expected '('"));
    }

    let mut pos = 1;
    let mut count = 0;
    let mut words = 0;
    while pos < bytes.len() && bytes[pos] != b')' {
        let (next, wide) = skip_field_type(descriptor, pos)?;
        pos = next;
        count += 1;
        words += if wide { 2 } else { 1 };
    }
    if pos >= bytes.len() {
        return Err(malformed(descriptor, "missing ')'"));
    }
    pos += 1;

    match bytes.get(pos) {
        None => return Err(malformed(descriptor, "missing return type")),
        Some(b'V') => pos += 1,
        Some(_) => {
            let (next, _) = skip_field_type(descriptor, pos)?;
            pos = next;
        }
    }
    if pos != bytes.len() {
        return Err(malformed(descriptor, "trailing characters after return type"));
    }

    Ok((count, words))
}

/// Skips one field type starting at `pos`, returning the position after it and
/// whether the type is wide (`J` or `D`, outside an array).
fn skip_field_type(descriptor: &str, mut pos: usize) -> Result<(usize, bool)> {
    let bytes = descriptor.as_bytes();

    let mut array = false;
    while pos < bytes.len() && bytes[pos] == b'[' {
        array = true;
        pos += 1;
    }

    match bytes.get(pos) {
        Some(b'B' | b'C' | b'F' | b'I' | b'S' | b'Z') => Ok((pos + 1, false)),
        // An array of a wide type is a reference and occupies one word
        Some(b'J' | b'D') => Ok((pos + 1, !array)),
        Some(b'L') => {
            let semicolon = bytes[pos..]
                .iter()
                .position(|&b| b == b';')
                .ok_or_else(|| malformed(descriptor, "unterminated class type"))?;
            if semicolon < 2 {
                return Err(malformed(descriptor, "empty class name"));
            }
            Ok((pos + semicolon + 1, false))
        }
        _ => Err(malformed(descriptor, "invalid type character")),
    }
}
