//! Escaping and unescaping of `"`-quoted parameter literals.
//!
//! Only the quote character is ever escaped. A backslash that is not
//! directly in front of a `"` is ordinary text and survives both directions
//! untouched.

use crate::FormatError;
use crate::FormatResult;

const QUOTE: char = '"';
const ESCAPED_QUOTE: &str = "\\\"";

/// Turn a quoted literal such as `"say \"hi\""` into its logical value
/// (`say "hi"`).
///
/// The literal must start and end with `"`, and every `"` between them must
/// directly follow a `\`. Each `\"` pair loses exactly one backslash, so a
/// run of four backslashes followed by `\"` unescapes to four backslashes
/// and a quote.
pub fn unescape(literal: &str) -> FormatResult<String> {
	let inner = literal
		.strip_prefix(QUOTE)
		.and_then(|rest| rest.strip_suffix(QUOTE))
		.ok_or_else(|| FormatError::NotQuoted(literal.to_string()))?;

	let mut previous = None;
	for ch in inner.chars() {
		if ch == QUOTE && previous != Some('\\') {
			return Err(FormatError::NotQuoted(literal.to_string()));
		}
		previous = Some(ch);
	}

	Ok(inner.replace(ESCAPED_QUOTE, "\""))
}

/// Put a `\` in front of every `"` in `value`. Nothing else changes.
pub fn escape(value: &str) -> String {
	value.replace(QUOTE, ESCAPED_QUOTE)
}

/// Escape `value` and wrap it in quotes, ready to be written as a parameter.
pub fn quote(value: &str) -> String {
	let mut quoted = String::with_capacity(value.len() + 2);
	quoted.push(QUOTE);
	quoted.push_str(&escape(value));
	quoted.push(QUOTE);
	quoted
}
