use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Parse, scan and escape markdown shortcode directives.",
	long_about = "shortcode reads and writes directives such as `{{< resource uuid=\"123\" >}}` \
	              and `{{% resource_link \"123\" \"notes\" %}}` embedded in markdown \
	              documents.\n\nQuick start:\n  shortcode parse '{{< resource uuid=abc >}}'\n  \
	              shortcode scan notes.md --name resource\n  shortcode escape 'say \"hi\"'"
)]
pub struct ShortcodeCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Directory searched for `shortcode.toml`. Defaults to the current
	/// directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Parse a single shortcode directive.
	///
	/// Prints the normalized form of the directive, or its structure with
	/// `--format json`. Exits with a non-zero status code when the directive
	/// is malformed.
	Parse {
		/// The directive text, delimiters included.
		directive: String,

		/// Output format. Use `text` for the normalized directive or `json`
		/// for its name, parameters and flags.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Find shortcodes inside a document.
	///
	/// Reads the file (or stdin when no file is given) and prints every
	/// matching shortcode with its `line:column` position. Names and the
	/// delimiter default to the `[scan]` table of `shortcode.toml`.
	///
	/// With `--parse` every match is also parsed, and the command exits with
	/// status 1 when any of them is malformed.
	Scan {
		/// The document to scan. Reads stdin when omitted.
		file: Option<PathBuf>,

		/// Shortcode name to look for. Repeat to look for several names.
		#[arg(long = "name", short = 'n')]
		names: Vec<String>,

		/// Look for `{{% ... %}}` shortcodes instead of `{{< ... >}}`.
		#[arg(long, default_value_t = false)]
		percent: bool,

		/// Parse every match and report the ones that are malformed.
		#[arg(long, default_value_t = false)]
		parse: bool,

		/// Output format. Use `text` for human-readable output or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Escape a value for use inside a `"`-quoted parameter.
	Escape {
		/// The raw value.
		value: String,

		/// Wrap the escaped value in quotes.
		#[arg(long, short, default_value_t = false)]
		quote: bool,
	},
	/// Unescape a `"`-quoted parameter literal.
	Unescape {
		/// The quoted literal, surrounding quotes included.
		literal: String,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
