//! `shortcode_core` reads, writes, and locates shortcode directives such as
//! `{{< resource uuid="123" >}}` or `{{% resource_link "123" "text" %}}`
//! embedded in markdown documents.
//!
//! ## Directive Syntax
//!
//! ```text
//! {{< name "positional" bare >}}      opening, positional parameters
//! {{% name key="value" other=bare %}} opening, named parameters
//! {{< /name >}}                       closing
//! {{< name />}}                       self-closing
//! ```
//!
//! Quoted values escape interior quotes as `\"`. A directive uses either
//! named or positional parameters, never both.
//!
//! ## Modules
//!
//! - [`codec`]: Escaping and unescaping of `"`-quoted values.
//! - [`scanner`]: Quote-aware search for shortcodes inside whole documents.
//! - [`config`]: Scan defaults loaded from `shortcode.toml`.
//! - [`position`]: Byte offset to line/column conversion.
//!
//! ## Key Types
//!
//! - [`Shortcode`]: A parsed directive with its name, parameters, and
//!   delimiter.
//! - [`ShortcodeParam`]: A named or positional parameter.
//! - [`ShortcodeMatcher`]: A reusable matcher returned by
//!   [`scanner::build`].
//! - [`FormatError`]: Everything that can be wrong with directive text.
//!
//! ## Quick Start
//!
//! ```rust
//! use shortcode_core::Delimiter;
//! use shortcode_core::Shortcode;
//! use shortcode_core::scanner;
//!
//! let document = r#"See {{< resource uuid="abc" href="/notes" >}} for details."#;
//! let matcher = scanner::build("resource", Delimiter::Angle);
//!
//! for found in matcher.find_iter(document) {
//! 	let shortcode = found.parse().unwrap();
//! 	assert_eq!(shortcode.get("uuid"), Some("abc"));
//! 	assert_eq!(shortcode.get(1), Some("/notes"));
//! }
//!
//! let link = Shortcode::resource_link("abc", "lecture notes", None);
//! assert_eq!(link.serialize(), r#"{{% resource_link "abc" "lecture notes" %}}"#);
//! ```

pub use error::*;
pub use param::*;
pub use position::*;
pub use scanner::NameSet;
pub use scanner::ShortcodeMatch;
pub use scanner::ShortcodeMatcher;
pub use shortcode::*;

pub mod codec;
pub mod config;
mod error;
pub(crate) mod lexer;
mod param;
pub mod position;
pub mod scanner;
mod shortcode;
