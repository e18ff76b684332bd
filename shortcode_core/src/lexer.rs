use std::ops::Range;

use logos::Logos;

/// Raw tokens produced by logos for the text between a shortcode's
/// delimiters. Whitespace only separates tokens and is skipped.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"\s+")]
pub(crate) enum RawToken {
	/// A `"`-quoted literal. The closing quote is the first `"` that does not
	/// directly follow a `\`.
	#[regex(r#""([^"\\]|\\+[^\\])*""#)]
	Quoted,
	/// A run of characters that are neither whitespace nor quotes.
	#[regex(r#"[^\s"]+"#)]
	Bare,
}

/// One piece of a [`Word`]: the token kind and its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Piece<'a> {
	pub kind: RawToken,
	pub text: &'a str,
}

/// A whitespace-separated unit of the shortcode body, e.g. `key="a b"` is a
/// single word made of a bare piece and a quoted piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Word<'a> {
	/// The full source text of the word.
	pub text: &'a str,
	pub pieces: Vec<Piece<'a>>,
}

/// Returned when the body ends inside a quoted literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UnterminatedQuote;

/// Split the body of a shortcode into words. Adjacent tokens with no
/// whitespace between them are glued into the same word.
pub(crate) fn split_words(body: &str) -> Result<Vec<Word<'_>>, UnterminatedQuote> {
	let mut words = WordBuilder::new(body);
	let mut offset = 0;

	'lex: loop {
		for (result, span) in RawToken::lexer(&body[offset..]).spanned() {
			let span = offset + span.start..offset + span.end;

			// Every byte is either whitespace, a bare character, or a quote. Logos
			// can only fail on a quote that never closes.
			let Ok(kind) = result else {
				let end = backslash_terminated_end(body, span.start).ok_or(UnterminatedQuote)?;
				words.push(RawToken::Quoted, span.start..end);
				offset = end;
				continue 'lex;
			};

			words.push(kind, span);
		}

		break;
	}

	Ok(words.finish())
}

/// End of a quoted literal whose value itself ends in `\`, such as
/// `"C:\dir\"` written by the serializer for the value `C:\dir\`.
///
/// Known divergence: the closing quote here directly follows a backslash,
/// which the upstream template engine rejects. It is still accepted when it
/// is the first `\"` followed by whitespace or the end of the body, so that
/// serialized values ending in a backslash parse back. A later quoted value
/// in the same directive can still be misread.
fn backslash_terminated_end(body: &str, start: usize) -> Option<usize> {
	let bytes = body.as_bytes();

	(start + 1..bytes.len().saturating_sub(1))
		.find(|&index| {
			bytes[index] == b'\\'
				&& bytes[index + 1] == b'"'
				&& bytes.get(index + 2).is_none_or(u8::is_ascii_whitespace)
		})
		.map(|index| index + 2)
}

/// Collects pieces into words, gluing pieces whose spans touch.
struct WordBuilder<'a> {
	body: &'a str,
	words: Vec<Word<'a>>,
	current: Option<(Range<usize>, Vec<Piece<'a>>)>,
}

impl<'a> WordBuilder<'a> {
	fn new(body: &'a str) -> Self {
		Self {
			body,
			words: vec![],
			current: None,
		}
	}

	fn push(&mut self, kind: RawToken, span: Range<usize>) {
		let piece = Piece {
			kind,
			text: &self.body[span.clone()],
		};

		match self.current.as_mut() {
			Some((range, pieces)) if range.end == span.start => {
				range.end = span.end;
				pieces.push(piece);
			}
			_ => {
				self.flush();
				self.current = Some((span, vec![piece]));
			}
		}
	}

	fn flush(&mut self) {
		if let Some((range, pieces)) = self.current.take() {
			self.words.push(Word {
				text: &self.body[range],
				pieces,
			});
		}
	}

	fn finish(mut self) -> Vec<Word<'a>> {
		self.flush();
		self.words
	}
}
