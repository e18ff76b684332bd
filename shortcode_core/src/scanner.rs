//! Locate shortcodes inside arbitrary documents.
//!
//! The scanner walks every `{{<` / `{{%` opener in the document and follows
//! it to its closing delimiter with a small state machine that treats quoted
//! regions as opaque. Whole spans of other shortcodes are skipped, so
//! shortcode syntax hidden inside their quoted values is never reported.
//!
//! ```rust
//! use shortcode_core::Delimiter;
//! use shortcode_core::scanner;
//!
//! let matcher = scanner::build("resource", Delimiter::Angle);
//! let document = r#"a {{< resource "x" >}} b {{< other "{{< resource y >}}" >}}"#;
//! let matches = matcher.find_all(document);
//!
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].as_str(), r#"{{< resource "x" >}}"#);
//! ```

use std::ops::Range;

use derive_more::Deref;

use crate::Delimiter;
use crate::FormatResult;
use crate::Shortcode;
use crate::shortcode::is_name_char;

const OPEN_BRACES: &str = "{{";

/// The names a [`ShortcodeMatcher`] looks for. Any one of them matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct NameSet(Vec<String>);

impl NameSet {
	pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
		Self(names.into_iter().map(Into::into).collect())
	}

	pub fn contains_name(&self, name: &str) -> bool {
		self.0.iter().any(|candidate| candidate == name)
	}
}

impl From<&str> for NameSet {
	fn from(name: &str) -> Self {
		Self(vec![name.to_string()])
	}
}

impl From<String> for NameSet {
	fn from(name: String) -> Self {
		Self(vec![name])
	}
}

impl From<&String> for NameSet {
	fn from(name: &String) -> Self {
		Self(vec![name.clone()])
	}
}

impl From<Vec<String>> for NameSet {
	fn from(names: Vec<String>) -> Self {
		Self(names)
	}
}

impl From<&[&str]> for NameSet {
	fn from(names: &[&str]) -> Self {
		Self::new(names.iter().copied())
	}
}

impl From<&[String]> for NameSet {
	fn from(names: &[String]) -> Self {
		Self::new(names.iter().cloned())
	}
}

impl<const N: usize> From<[&str; N]> for NameSet {
	fn from(names: [&str; N]) -> Self {
		Self::new(names)
	}
}

/// Build a matcher for `names` wrapped in `delimiter`.
pub fn build(names: impl Into<NameSet>, delimiter: Delimiter) -> ShortcodeMatcher {
	ShortcodeMatcher::new(names, delimiter)
}

/// A reusable, quote-aware search for shortcodes with particular names.
///
/// Opening (`{{< name ... >}}`), closing (`{{< /name >}}`) and self-closing
/// (`{{< name ... />}}`) forms all match. Matching never fails; only
/// [`ShortcodeMatch::parse`] is strict about the matched text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcodeMatcher {
	names: NameSet,
	delimiter: Delimiter,
}

impl ShortcodeMatcher {
	pub fn new(names: impl Into<NameSet>, delimiter: Delimiter) -> Self {
		Self {
			names: names.into(),
			delimiter,
		}
	}

	pub fn names(&self) -> &NameSet {
		&self.names
	}

	pub fn delimiter(&self) -> Delimiter {
		self.delimiter
	}

	/// Iterate over all matches in `document`, left to right.
	pub fn find_iter<'m, 'd>(&'m self, document: &'d str) -> Matches<'m, 'd> {
		Matches {
			matcher: self,
			document,
			cursor: 0,
		}
	}

	pub fn find_all<'d>(&self, document: &'d str) -> Vec<ShortcodeMatch<'d>> {
		self.find_iter(document).collect()
	}

	pub fn is_match(&self, document: &str) -> bool {
		self.find_iter(document).next().is_some()
	}

	/// Replace every match with the output of `replacer`. Text between
	/// matches is copied unchanged.
	pub fn replace_all<F>(&self, document: &str, mut replacer: F) -> String
	where
		F: FnMut(&ShortcodeMatch<'_>) -> String,
	{
		let result: Result<String, std::convert::Infallible> =
			self.try_replace_all(document, |found| Ok(replacer(found)));

		match result {
			Ok(replaced) => replaced,
			Err(never) => match never {},
		}
	}

	/// Like [`ShortcodeMatcher::replace_all`] but stops at the first error
	/// returned by `replacer`.
	pub fn try_replace_all<F, E>(&self, document: &str, mut replacer: F) -> Result<String, E>
	where
		F: FnMut(&ShortcodeMatch<'_>) -> Result<String, E>,
	{
		let mut output = String::with_capacity(document.len());
		let mut last_end = 0;

		for found in self.find_iter(document) {
			output.push_str(&document[last_end..found.start()]);
			output.push_str(&replacer(&found)?);
			last_end = found.end();
		}

		output.push_str(&document[last_end..]);

		Ok(output)
	}
}

/// A complete shortcode span found by a [`ShortcodeMatcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcodeMatch<'d> {
	text: &'d str,
	name: &'d str,
	range: Range<usize>,
}

impl<'d> ShortcodeMatch<'d> {
	/// The matched text, delimiters included.
	pub fn as_str(&self) -> &'d str {
		self.text
	}

	/// The shortcode name as written in the document.
	pub fn name(&self) -> &'d str {
		self.name
	}

	/// Byte offset of the opening delimiter.
	pub fn start(&self) -> usize {
		self.range.start
	}

	/// Byte offset just past the closing delimiter.
	pub fn end(&self) -> usize {
		self.range.end
	}

	pub fn range(&self) -> Range<usize> {
		self.range.clone()
	}

	pub fn parse(&self) -> FormatResult<Shortcode> {
		Shortcode::parse(self.text)
	}
}

/// Iterator returned by [`ShortcodeMatcher::find_iter`].
#[derive(Debug, Clone)]
pub struct Matches<'m, 'd> {
	matcher: &'m ShortcodeMatcher,
	document: &'d str,
	cursor: usize,
}

impl<'d> Iterator for Matches<'_, 'd> {
	type Item = ShortcodeMatch<'d>;

	fn next(&mut self) -> Option<Self::Item> {
		while self.cursor < self.document.len() {
			let offset = self.document[self.cursor..].find(OPEN_BRACES)?;
			let start = self.cursor + offset;

			let Some(delimiter) = delimiter_at(self.document, start) else {
				self.cursor = start + 1;
				continue;
			};

			let Some(span) = scan_span(self.document, start, delimiter, false)
				.or_else(|| scan_span(self.document, start, delimiter, true))
			else {
				tracing::trace!(offset = start, "skipping unterminated shortcode");
				self.cursor = start + delimiter.opener().len();
				continue;
			};

			// Without a name the opener is just text; a real shortcode may follow
			// before the closer.
			let Some(name) = span.name else {
				self.cursor = start + delimiter.opener().len();
				continue;
			};

			self.cursor = span.end;

			if delimiter != self.matcher.delimiter {
				continue;
			}

			let name = &self.document[name];
			if self.matcher.names.contains_name(name) {
				return Some(ShortcodeMatch {
					text: &self.document[start..span.end],
					name,
					range: start..span.end,
				});
			}
		}

		None
	}
}

/// The extent of one shortcode in a document.
struct Span {
	/// Byte range of the name, when the name is followed by whitespace, a
	/// `/`, or the closing delimiter.
	name: Option<Range<usize>>,
	/// Byte offset just past the closing delimiter.
	end: usize,
}

fn delimiter_at(document: &str, start: usize) -> Option<Delimiter> {
	let rest = &document[start..];
	Delimiter::ALL
		.into_iter()
		.find(|delimiter| rest.starts_with(delimiter.opener()))
}

/// Quote state while looking for the closing delimiter.
#[derive(Clone, Copy, PartialEq, Eq)]
enum ScanState {
	/// Outside of any quoted value. The closing delimiter ends the span here.
	Outside,
	/// Inside a `"`-quoted value. Delimiters are plain text here.
	Quoted,
}

/// Follow the opener at `start` to its closing delimiter.
///
/// A `"` toggles the quote state unless it directly follows a `\`, which
/// keeps escaped quotes from derailing the scan even when they are
/// unbalanced. With `lenient` set, a `\"` inside a quoted value also closes
/// it when whitespace or the closing delimiter follows, matching how the
/// parser reads values that end in a backslash. Returns `None` when the
/// document ends first.
fn scan_span(document: &str, start: usize, delimiter: Delimiter, lenient: bool) -> Option<Span> {
	let bytes = document.as_bytes();
	let closer = delimiter.closer().as_bytes();
	let mut cursor = skip_whitespace(document, start + delimiter.opener().len());

	if bytes.get(cursor) == Some(&b'/') {
		cursor = skip_whitespace(document, cursor + 1);
	}

	let name_start = cursor;
	let name_end = document[name_start..]
		.char_indices()
		.find(|(_, ch)| !is_name_char(*ch))
		.map_or(document.len(), |(index, _)| name_start + index);

	let after_name = &bytes[name_end..];
	let name = (name_end > name_start
		&& (after_name.first().is_some_and(u8::is_ascii_whitespace)
			|| after_name.starts_with(b"/")
			|| after_name.starts_with(closer)))
	.then_some(name_start..name_end);

	let mut state = ScanState::Outside;
	let mut escaped = false;
	let mut index = name_end;

	while index < bytes.len() {
		let byte = bytes[index];

		match state {
			ScanState::Outside if bytes[index..].starts_with(closer) => {
				return Some(Span {
					name,
					end: index + closer.len(),
				});
			}
			ScanState::Outside if byte == b'"' && !escaped => state = ScanState::Quoted,
			ScanState::Quoted
				if byte == b'"' && (!escaped || (lenient && ends_value(bytes, index + 1, closer))) =>
			{
				state = ScanState::Outside;
			}
			_ => {}
		}

		escaped = byte == b'\\';
		index += 1;
	}

	None
}

/// `true` when the bytes from `index` start with whitespace, the closer, or
/// a self-closing `/` and the closer.
fn ends_value(bytes: &[u8], index: usize, closer: &[u8]) -> bool {
	let rest = &bytes[index..];

	rest.first().is_some_and(u8::is_ascii_whitespace)
		|| rest.starts_with(closer)
		|| rest.strip_prefix(b"/").is_some_and(|rest| rest.starts_with(closer))
}

fn skip_whitespace(document: &str, from: usize) -> usize {
	document[from..]
		.char_indices()
		.find(|(_, ch)| !ch.is_whitespace())
		.map_or(document.len(), |(index, _)| from + index)
}
