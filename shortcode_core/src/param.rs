use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;

use crate::codec::quote;

/// A single argument of a [`Shortcode`](crate::Shortcode).
///
/// Values are always stored unescaped. Once built a parameter can't be
/// changed; replace it in [`Shortcode::params`](crate::Shortcode::params)
/// instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShortcodeParam {
	/// `{{< name key="value" >}}`
	Named { name: String, value: String },
	/// `{{< name "value" >}}`
	Positional(String),
}

impl ShortcodeParam {
	pub fn named(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self::Named {
			name: name.into(),
			value: value.into(),
		}
	}

	pub fn positional(value: impl Into<String>) -> Self {
		Self::Positional(value.into())
	}

	pub fn value(&self) -> &str {
		match self {
			Self::Named { value, .. } | Self::Positional(value) => value,
		}
	}

	/// The parameter name, or `None` for positional parameters.
	pub fn name(&self) -> Option<&str> {
		match self {
			Self::Named { name, .. } => Some(name),
			Self::Positional(_) => None,
		}
	}

	pub fn is_named(&self) -> bool {
		matches!(self, Self::Named { .. })
	}
}

impl Display for ShortcodeParam {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Named { name, value } => write!(f, "{name}={}", quote(value)),
			Self::Positional(value) => write!(f, "{}", quote(value)),
		}
	}
}

/// Returns `true` when `name` can be used as a parameter name: one or more
/// letters, digits, `_` or `-`.
pub(crate) fn is_param_name(name: &str) -> bool {
	!name.is_empty()
		&& name
			.chars()
			.all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '-')
}

/// Lookup keys accepted by [`Shortcode::get`](crate::Shortcode::get).
///
/// Integers address parameters by position (named parameters included),
/// strings address them by name.
pub trait ParamKey {
	fn find_in<'a>(&self, params: &'a [ShortcodeParam]) -> Option<&'a ShortcodeParam>;
}

macro_rules! impl_positional_key {
	($($int:ty),*) => {
		$(
			impl ParamKey for $int {
				fn find_in<'a>(&self, params: &'a [ShortcodeParam]) -> Option<&'a ShortcodeParam> {
					usize::try_from(*self).ok().and_then(|index| params.get(index))
				}
			}

			impl ParamKey for &$int {
				fn find_in<'a>(&self, params: &'a [ShortcodeParam]) -> Option<&'a ShortcodeParam> {
					(**self).find_in(params)
				}
			}
		)*
	};
}

impl_positional_key!(usize, u8, u16, u32, u64, isize, i8, i16, i32, i64);

impl ParamKey for str {
	fn find_in<'a>(&self, params: &'a [ShortcodeParam]) -> Option<&'a ShortcodeParam> {
		params.iter().find(|param| param.name() == Some(self))
	}
}

impl ParamKey for &str {
	fn find_in<'a>(&self, params: &'a [ShortcodeParam]) -> Option<&'a ShortcodeParam> {
		(**self).find_in(params)
	}
}

impl ParamKey for String {
	fn find_in<'a>(&self, params: &'a [ShortcodeParam]) -> Option<&'a ShortcodeParam> {
		self.as_str().find_in(params)
	}
}

impl ParamKey for &String {
	fn find_in<'a>(&self, params: &'a [ShortcodeParam]) -> Option<&'a ShortcodeParam> {
		self.as_str().find_in(params)
	}
}
