use miette::Diagnostic;
use thiserror::Error;

/// Every way a directive, a quoted literal, or a factory call can be
/// malformed.
///
/// The display text of each variant carries a stable phrase (for example
/// `odd number of unescaped quotes`) that callers can match on.
#[derive(Debug, Clone, PartialEq, Eq, Diagnostic, Error)]
#[non_exhaustive]
pub enum FormatError {
	#[error("`{0}` is not a `\"`-quoted string")]
	#[diagnostic(
		code(shortcode::not_quoted),
		help("wrap the value in `\"` and escape interior quotes as `\\\"`")
	)]
	NotQuoted(String),

	#[error("shortcode `{0}` does not start and end with matching delimiters")]
	#[diagnostic(
		code(shortcode::unmatched_delimiters),
		help("use `{{{{< ... >}}}}` or `{{{{% ... %}}}}`, not a mix of both")
	)]
	UnmatchedDelimiters(String),

	#[error("Shortcode can't be both closing and self-closing: `{0}`")]
	#[diagnostic(
		code(shortcode::closing_and_self_closing),
		help("remove either the leading `/` or the `/` before the closing delimiter")
	)]
	ClosingAndSelfClosing(String),

	#[error("Cannot mix named and positional parameters: `{0}`")]
	#[diagnostic(
		code(shortcode::mixed_parameters),
		help("either name every parameter (`key=value`) or none of them")
	)]
	MixedParameters(String),

	#[error("shortcode `{0}` has an odd number of unescaped quotes")]
	#[diagnostic(
		code(shortcode::unbalanced_quotes),
		help("close every quoted value and escape interior quotes as `\\\"`")
	)]
	UnbalancedQuotes(String),

	#[error("invalid parameter `{0}`")]
	#[diagnostic(
		code(shortcode::invalid_parameter),
		help("parameters are `value`, `\"quoted value\"`, `key=value` or `key=\"quoted value\"`")
	)]
	InvalidParameter(String),

	#[error("invalid shortcode name `{name}` in `{shortcode}`")]
	#[diagnostic(
		code(shortcode::invalid_name),
		help("shortcode names may only contain letters, digits and underscores")
	)]
	InvalidName { name: String, shortcode: String },

	#[error("closing shortcode `{0}` cannot have parameters")]
	#[diagnostic(code(shortcode::closing_with_parameters))]
	ClosingWithParameters(String),

	#[error("At most one of href, href_uuid must be provided")]
	#[diagnostic(code(shortcode::conflicting_resource_options))]
	ConflictingResourceOptions,
}

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum ShortcodeError {
	#[error(transparent)]
	#[diagnostic(transparent)]
	Format(#[from] FormatError),

	#[error(transparent)]
	#[diagnostic(code(shortcode::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(shortcode::config_parse),
		help("check that shortcode.toml is valid TOML with an optional [scan] section")
	)]
	ConfigParse(String),
}

pub type FormatResult<T> = Result<T, FormatError>;
pub type ShortcodeResult<T> = Result<T, ShortcodeError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
