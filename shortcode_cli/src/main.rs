use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use serde::Serialize;
use shortcode_cli::Commands;
use shortcode_cli::OutputFormat;
use shortcode_cli::ShortcodeCli;
use shortcode_core::AnyResult;
use shortcode_core::Delimiter;
use shortcode_core::LineTable;
use shortcode_core::Point;
use shortcode_core::Shortcode;
use shortcode_core::ShortcodeError;
use shortcode_core::ShortcodeMatcher;
use shortcode_core::codec;
use shortcode_core::config::ShortcodeConfig;
use shortcode_core::scanner;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = ShortcodeCli::parse();

	// Respect NO_COLOR env var, --no-color flag, and non-terminal output.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Parse { directive, format }) => run_parse(directive, *format).map(|()| true),
		Some(Commands::Scan {
			file,
			names,
			percent,
			parse,
			format,
		}) => {
			let request = ScanRequest {
				file: file.as_deref(),
				names,
				percent: *percent,
				parse: *parse,
				format: *format,
			};
			run_scan(&args, &request)
		}
		Some(Commands::Escape { value, quote }) => {
			run_escape(value, *quote);
			Ok(true)
		}
		Some(Commands::Unescape { literal }) => run_unescape(literal).map(|()| true),
		None => {
			eprintln!("No subcommand specified. Run `shortcode --help` for usage.");
			process::exit(1);
		}
	};

	match result {
		Ok(true) => {}
		Ok(false) => process::exit(1),
		Err(e) => {
			// Try to render through miette for rich diagnostics with help text
			// and error codes.
			match e.downcast::<ShortcodeError>() {
				Ok(shortcode_err) => {
					let report: miette::Report = (*shortcode_err).into();
					eprintln!("{report:?}");
				}
				Err(e) => {
					eprintln!("{} {e}", colored!("error:", red));
				}
			}
			process::exit(2);
		}
	}
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_directive = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.without_time()
		.init();
}

fn resolve_root(args: &ShortcodeCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn run_parse(directive: &str, format: OutputFormat) -> AnyResult<()> {
	let shortcode = Shortcode::parse(directive).map_err(ShortcodeError::from)?;

	match format {
		OutputFormat::Text => println!("{}", shortcode.serialize()),
		OutputFormat::Json => println!("{}", serde_json::to_string(&shortcode)?),
	}

	Ok(())
}

fn run_escape(value: &str, quote: bool) {
	if quote {
		println!("{}", codec::quote(value));
	} else {
		println!("{}", codec::escape(value));
	}
}

fn run_unescape(literal: &str) -> AnyResult<()> {
	let value = codec::unescape(literal).map_err(ShortcodeError::from)?;
	println!("{value}");

	Ok(())
}

struct ScanRequest<'a> {
	file: Option<&'a Path>,
	names: &'a [String],
	percent: bool,
	parse: bool,
	format: OutputFormat,
}

/// One reported match. `shortcode` and `error` are only filled in when the
/// match was parsed.
#[derive(Serialize)]
struct ScanEntry<'d> {
	name: &'d str,
	text: &'d str,
	line: usize,
	column: usize,
	offset: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	shortcode: Option<Shortcode>,
	#[serde(skip_serializing_if = "Option::is_none")]
	error: Option<String>,
}

impl ScanEntry<'_> {
	fn point(&self) -> Point {
		Point {
			line: self.line,
			column: self.column,
			offset: self.offset,
		}
	}
}

/// Returns `Ok(false)` when `--parse` found malformed shortcodes.
fn run_scan(args: &ShortcodeCli, request: &ScanRequest<'_>) -> AnyResult<bool> {
	let root = resolve_root(args);
	let config = ShortcodeConfig::load(&root)?.unwrap_or_default();
	let matcher = scan_matcher(&config, request)?;
	let document = read_document(request.file)?;
	let table = LineTable::new(&document);

	tracing::debug!(
		names = ?matcher.names().as_slice(),
		delimiter = %matcher.delimiter(),
		"scanning document"
	);

	let entries: Vec<ScanEntry<'_>> = matcher
		.find_iter(&document)
		.map(|found| {
			let point = table.offset_to_point(found.start());
			let (shortcode, error) = if request.parse {
				match found.parse() {
					Ok(shortcode) => (Some(shortcode), None),
					Err(e) => (None, Some(e.to_string())),
				}
			} else {
				(None, None)
			};

			ScanEntry {
				name: found.name(),
				text: found.as_str(),
				line: point.line,
				column: point.column,
				offset: point.offset,
				shortcode,
				error,
			}
		})
		.collect();

	let failures = entries.iter().filter(|entry| entry.error.is_some()).count();

	match request.format {
		OutputFormat::Json => {
			let output = serde_json::json!({
				"ok": failures == 0,
				"matches": entries,
			});
			println!("{output}");
		}
		OutputFormat::Text => print_scan_text(&entries, failures),
	}

	Ok(failures == 0)
}

fn scan_matcher(config: &ShortcodeConfig, request: &ScanRequest<'_>) -> AnyResult<ShortcodeMatcher> {
	let names = if request.names.is_empty() {
		config.scan.names.clone()
	} else {
		request.names.to_vec()
	};

	if names.is_empty() {
		return Err("no shortcode names to scan for; pass `--name` or set `names` under `[scan]` \
		            in shortcode.toml"
			.into());
	}

	let delimiter = if request.percent {
		Delimiter::Percent
	} else {
		config.scan.delimiter
	};

	Ok(scanner::build(names, delimiter))
}

fn read_document(file: Option<&Path>) -> AnyResult<String> {
	let Some(file) = file else {
		let mut document = String::new();
		std::io::stdin()
			.read_to_string(&mut document)
			.map_err(ShortcodeError::from)?;
		return Ok(document);
	};

	tracing::debug!(path = %file.display(), "reading document");
	let document = std::fs::read_to_string(file).map_err(ShortcodeError::from)?;

	Ok(document)
}

fn print_scan_text(entries: &[ScanEntry<'_>], failures: usize) {
	if entries.is_empty() {
		println!("No shortcodes found.");
		return;
	}

	for entry in entries {
		println!("{}  {}", colored!(entry.point(), bold), entry.text);
		if let Some(error) = &entry.error {
			println!("  {} {error}", colored!("error:", red));
		}
	}

	println!();
	let noun = if entries.len() == 1 {
		"shortcode"
	} else {
		"shortcodes"
	};

	if failures == 0 {
		println!(
			"{}",
			colored!(format!("Found {} {noun}.", entries.len()), green)
		);
	} else {
		println!(
			"{}",
			colored!(
				format!("Found {} {noun}, {failures} failed to parse.", entries.len()),
				red
			)
		);
	}
}
