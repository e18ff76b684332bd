use std::fmt::Display;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::FormatError;
use crate::FormatResult;
use crate::codec::unescape;
use crate::lexer::Piece;
use crate::lexer::RawToken;
use crate::lexer::Word;
use crate::lexer::split_words;
use crate::param::ParamKey;
use crate::param::ShortcodeParam;
use crate::param::is_param_name;

/// The bracket pair wrapping a shortcode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
	/// `{{< name >}}`
	#[default]
	Angle,
	/// `{{% name %}}`
	Percent,
}

impl Delimiter {
	pub const ALL: [Delimiter; 2] = [Delimiter::Angle, Delimiter::Percent];

	/// `Percent` when `is_percent` is set, otherwise `Angle`.
	pub fn from_percent(is_percent: bool) -> Self {
		if is_percent { Self::Percent } else { Self::Angle }
	}

	pub fn is_percent(self) -> bool {
		matches!(self, Self::Percent)
	}

	pub fn opener(self) -> &'static str {
		match self {
			Self::Angle => "{{<",
			Self::Percent => "{{%",
		}
	}

	pub fn closer(self) -> &'static str {
		match self {
			Self::Angle => ">}}",
			Self::Percent => "%}}",
		}
	}
}

impl Display for Delimiter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Angle => write!(f, "angle"),
			Self::Percent => write!(f, "percent"),
		}
	}
}

/// Options for [`Shortcode::resource`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceOptions {
	/// Link the embedded resource to an arbitrary URL.
	pub href: Option<String>,
	/// Link the embedded resource to another resource.
	pub href_uuid: Option<String>,
}

/// A parsed shortcode directive such as `{{< resource uuid="123" >}}`.
///
/// Parse one with [`Shortcode::parse`] (or `str::parse`), read parameters
/// with [`Shortcode::get`] and write it back with [`Shortcode::serialize`].
/// Parsing and serializing a well-formed directive round-trips to an equal
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shortcode {
	/// Letters, digits and underscores only.
	pub name: String,
	/// Either all named or all positional, in source order.
	pub params: Vec<ShortcodeParam>,
	pub delimiter: Delimiter,
	/// A bare closer: `{{< /name >}}`. Closers carry no parameters.
	pub closing: bool,
	/// Closes itself: `{{< name />}}`.
	pub self_closing: bool,
}

impl Shortcode {
	/// Build an opening `{{< name ... >}}` shortcode.
	pub fn new(name: impl Into<String>, params: Vec<ShortcodeParam>) -> Self {
		Self {
			name: name.into(),
			params,
			delimiter: Delimiter::Angle,
			closing: false,
			self_closing: false,
		}
	}

	/// Build the closer for `name`, e.g. `{{% /name %}}`.
	pub fn closing_tag(name: impl Into<String>, delimiter: Delimiter) -> Self {
		Self {
			name: name.into(),
			params: vec![],
			delimiter,
			closing: true,
			self_closing: false,
		}
	}

	/// `{{< resource uuid="..." >}}`, optionally linked through `href` or
	/// `href_uuid`. Empty options count as absent.
	pub fn resource(uuid: impl Into<String>, options: ResourceOptions) -> FormatResult<Self> {
		let href = options.href.filter(|href| !href.is_empty());
		let href_uuid = options.href_uuid.filter(|href_uuid| !href_uuid.is_empty());

		let mut params = vec![ShortcodeParam::named("uuid", uuid)];
		match (href, href_uuid) {
			(Some(_), Some(_)) => return Err(FormatError::ConflictingResourceOptions),
			(Some(href), None) => params.push(ShortcodeParam::named("href", href)),
			(None, Some(href_uuid)) => params.push(ShortcodeParam::named("href_uuid", href_uuid)),
			(None, None) => {}
		}

		Ok(Self::new("resource", params))
	}

	/// `{{% resource_link "uuid" "text" %}}` with an optional trailing suffix
	/// parameter that is only written when non-empty.
	pub fn resource_link(
		uuid: impl Into<String>,
		text: impl Into<String>,
		suffix: Option<&str>,
	) -> Self {
		let mut params = vec![
			ShortcodeParam::positional(uuid),
			ShortcodeParam::positional(text),
		];

		if let Some(suffix) = suffix.filter(|suffix| !suffix.is_empty()) {
			params.push(ShortcodeParam::positional(suffix));
		}

		Self {
			delimiter: Delimiter::Percent,
			..Self::new("resource_link", params)
		}
	}

	/// Parse the text of a single directive. Whitespace around the directive
	/// is ignored.
	pub fn parse(text: &str) -> FormatResult<Self> {
		let result = parse_directive(text);

		if let Err(error) = &result {
			tracing::debug!(%error, "failed to parse shortcode");
		}

		result
	}

	/// Write the shortcode back to directive text. Every value is quoted.
	pub fn serialize(&self) -> String {
		self.to_string()
	}

	/// The value of the parameter at a position (`usize`) or with a name
	/// (`&str`). Named parameters can still be addressed by position.
	pub fn get(&self, key: impl ParamKey) -> Option<&str> {
		self.param(key).map(ShortcodeParam::value)
	}

	pub fn param(&self, key: impl ParamKey) -> Option<&ShortcodeParam> {
		key.find_in(&self.params)
	}

	/// `true` when the shortcode is wrapped in `{{% ... %}}`.
	pub fn is_percent_delimited(&self) -> bool {
		self.delimiter.is_percent()
	}

	/// Check the invariants the parser guarantees, for values that were
	/// built or mutated by hand.
	pub fn validate(&self) -> FormatResult<()> {
		if !is_shortcode_name(&self.name) {
			return Err(FormatError::InvalidName {
				name: self.name.clone(),
				shortcode: self.to_string(),
			});
		}

		if self.closing && self.self_closing {
			return Err(FormatError::ClosingAndSelfClosing(self.to_string()));
		}

		if self.closing && !self.params.is_empty() {
			return Err(FormatError::ClosingWithParameters(self.to_string()));
		}

		if has_mixed_params(&self.params) {
			return Err(FormatError::MixedParameters(self.to_string()));
		}

		Ok(())
	}
}

impl Display for Shortcode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} ", self.delimiter.opener())?;

		if self.closing {
			write!(f, "/")?;
		}

		write!(f, "{}", self.name)?;

		for param in &self.params {
			write!(f, " {param}")?;
		}

		if self.self_closing {
			write!(f, " /{}", self.delimiter.closer())
		} else {
			write!(f, " {}", self.delimiter.closer())
		}
	}
}

impl FromStr for Shortcode {
	type Err = FormatError;

	fn from_str(text: &str) -> Result<Self, Self::Err> {
		Self::parse(text)
	}
}

/// Returns `true` for a non-empty run of letters, digits and underscores.
pub(crate) fn is_shortcode_name(name: &str) -> bool {
	!name.is_empty() && name.chars().all(is_name_char)
}

pub(crate) fn is_name_char(ch: char) -> bool {
	ch.is_alphanumeric() || ch == '_'
}

fn has_mixed_params(params: &[ShortcodeParam]) -> bool {
	let named = params.iter().filter(|param| param.is_named()).count();
	named != 0 && named != params.len()
}

fn parse_directive(text: &str) -> FormatResult<Shortcode> {
	let trimmed = text.trim();

	let delimiter = Delimiter::ALL
		.into_iter()
		.find(|delimiter| trimmed.starts_with(delimiter.opener()))
		.filter(|delimiter| {
			trimmed.len() >= delimiter.opener().len() + delimiter.closer().len()
				&& trimmed.ends_with(delimiter.closer())
		})
		.ok_or_else(|| FormatError::UnmatchedDelimiters(trimmed.to_string()))?;

	let mut inner = &trimmed[delimiter.opener().len()..trimmed.len() - delimiter.closer().len()];

	// A `/` glued to the closing delimiter. With whitespace in between it is
	// an ordinary parameter.
	let self_closing = inner.ends_with('/');
	if self_closing {
		inner = &inner[..inner.len() - 1];
	}

	let mut body = inner.trim_start();
	let closing = body.starts_with('/');
	if closing {
		body = &body[1..];
	}

	if closing && self_closing {
		return Err(FormatError::ClosingAndSelfClosing(trimmed.to_string()));
	}

	let words =
		split_words(body).map_err(|_| FormatError::UnbalancedQuotes(trimmed.to_string()))?;
	let mut words = words.into_iter();

	let name = match words.next() {
		Some(word) if is_shortcode_name(word.text) => word.text.to_string(),
		other => {
			return Err(FormatError::InvalidName {
				name: other.map(|word| word.text.to_string()).unwrap_or_default(),
				shortcode: trimmed.to_string(),
			});
		}
	};

	let params = words.map(parse_param).collect::<FormatResult<Vec<_>>>()?;

	if has_mixed_params(&params) {
		return Err(FormatError::MixedParameters(trimmed.to_string()));
	}

	if closing && !params.is_empty() {
		return Err(FormatError::ClosingWithParameters(trimmed.to_string()));
	}

	Ok(Shortcode {
		name,
		params,
		delimiter,
		closing,
		self_closing,
	})
}

/// Turn one word into a parameter:
///
/// - `"quoted"` and `bare` are positional;
/// - `key="quoted"` and `key=bare` are named.
fn parse_param(word: Word<'_>) -> FormatResult<ShortcodeParam> {
	match word.pieces.as_slice() {
		[
			Piece {
				kind: RawToken::Quoted,
				text,
			},
		] => Ok(ShortcodeParam::positional(unescape(text)?)),
		[
			Piece {
				kind: RawToken::Bare,
				text,
			},
		] => {
			let param = match text.split_once('=') {
				Some((name, value)) if is_param_name(name) => ShortcodeParam::named(name, value),
				_ => ShortcodeParam::positional(*text),
			};
			Ok(param)
		}
		[
			Piece {
				kind: RawToken::Bare,
				text: key,
			},
			Piece {
				kind: RawToken::Quoted,
				text: value,
			},
		] => {
			match key.strip_suffix('=') {
				Some(name) if is_param_name(name) => {
					Ok(ShortcodeParam::named(name, unescape(value)?))
				}
				_ => Err(FormatError::InvalidParameter(word.text.to_string())),
			}
		}
		_ => Err(FormatError::InvalidParameter(word.text.to_string())),
	}
}
