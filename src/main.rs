//! Purpose: `dbf2sql` CLI entry point.
//! Role: Binary crate root; parses flags, runs one conversion, reports failures.
//! Invariants: SQL goes to stdout or the `-o` file; diagnostics only go to stderr.
//! Invariants: Every failure is a single stderr line and exit status 1.
//! Invariants: Usage errors also print the flag summary to stderr.
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{CommandFactory, Parser, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use std::error::Error as StdError;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use dbf2sql::convert::{Conversion, convert};
use dbf2sql::core::dbf::DEFAULT_ENCODING;
use dbf2sql::core::error::{Error, ErrorKind, to_exit_code};
use dbf2sql::output::{OutputTarget, STDOUT_SENTINEL};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Write)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                return Ok(RunOutcome::ok());
            }
            _ => {
                let usage = Error::new(ErrorKind::Usage).with_message(clap_error_summary(&err));
                emit_error(&usage, ColorMode::Auto);
                eprintln!("\n{}", Cli::command().render_help());
                return Ok(RunOutcome::with_code(to_exit_code(ErrorKind::Usage)));
            }
        },
    };

    init_tracing();
    let color_mode = cli.color;

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        clap_complete::aot::generate(shell, &mut cmd, "dbf2sql", &mut io::stdout());
        return Ok(RunOutcome::ok());
    }

    let conversion = cli.into_conversion().map_err(|err| (err, color_mode))?;
    convert(&conversion, OffsetDateTime::now_utc()).map_err(|err| (err, color_mode))?;
    Ok(RunOutcome::ok())
}

#[derive(Parser)]
#[command(
    name = "dbf2sql",
    version,
    about = "Convert a dBase DBF table into a SQL script",
    help_template = r#"{about-with-newline}
USAGE
  {usage}

OPTIONS
{options}

{after-help}
"#,
    long_about = None,
    after_help = r#"EXAMPLES
  $ dbf2sql -f customers.dbf -t customers                 # script on stdout
  $ dbf2sql -f customers.dbf -t customers -o customers.sql
  $ dbf2sql -f legacy.dbf -t legacy -e windows-1252 --skip-deleted

Set RUST_LOG=debug for load and output diagnostics on stderr."#
)]
struct Cli {
    #[arg(
        short = 'f',
        long = "file",
        value_name = "DBF",
        help = "dBase DBF file to read (required)",
        required_unless_present = "completions",
        value_hint = ValueHint::FilePath
    )]
    file: Option<PathBuf>,
    #[arg(
        short = 'o',
        long = "output",
        value_name = "SQL",
        default_value = STDOUT_SENTINEL,
        help = "Output SQL file ('-' for stdout)",
        value_hint = ValueHint::FilePath
    )]
    output: String,
    #[arg(
        short = 't',
        long = "table",
        value_name = "NAME",
        help = "Table name used in the generated SQL (required)",
        required_unless_present = "completions",
        value_parser = clap::builder::NonEmptyStringValueParser::new()
    )]
    table: Option<String>,
    #[arg(
        short = 'e',
        long = "encoding",
        value_name = "LABEL",
        default_value = DEFAULT_ENCODING,
        help = "Character encoding of the DBF text (e.g. UTF8, latin1, windows-1252)"
    )]
    encoding: String,
    #[arg(long, help = "Omit records flagged as deleted in the DBF file")]
    skip_deleted: bool,
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics: auto|always|never"
    )]
    color: ColorMode,
    #[arg(
        long,
        value_name = "SHELL",
        exclusive = true,
        help = "Print a shell completion script to stdout and exit"
    )]
    completions: Option<Shell>,
}

impl Cli {
    fn into_conversion(self) -> Result<Conversion, Error> {
        let (Some(input), Some(table_name)) = (self.file, self.table) else {
            return Err(Error::new(ErrorKind::Usage).with_message("both -f and -t are required"));
        };
        Ok(Conversion {
            input,
            output: OutputTarget::from_arg(&self.output),
            table_name,
            encoding: self.encoding,
            skip_deleted: self.skip_deleted,
        })
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let use_color = color_mode.use_color(io::stderr().is_terminal());
    eprintln!("{}", error_text(err, use_color));
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::Load => "failed to load table".to_string(),
        ErrorKind::OutputOpen => "failed to open output".to_string(),
        ErrorKind::Write => "failed to write output".to_string(),
    }
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut line = format!(
        "{} {}",
        colorize_label("error:", use_color),
        error_message(err)
    );
    if let Some(field) = err.field() {
        line.push_str(&format!(" (field: {field})"));
    }
    if let Some(path) = err.path() {
        line.push_str(&format!(" (path: {})", path.display()));
    }
    if let Some(cause) = err.source() {
        line.push_str(&format!(": {cause}"));
    }
    line
}

fn colorize_label(label: &str, enabled: bool) -> String {
    if !enabled {
        return label.to_string();
    }
    format!("\u{1b}[31m{label}\u{1b}[0m")
}

fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let mut lines = rendered.lines().map(str::trim).skip_while(|line| line.is_empty());
    let Some(first) = lines.next() else {
        return "invalid arguments".to_string();
    };
    let mut summary = first.strip_prefix("error:").unwrap_or(first).trim().to_string();
    // "the following required arguments were not provided:" lists them on indented lines.
    if summary.ends_with(':') {
        let details: Vec<&str> = lines.take_while(|line| !line.is_empty()).collect();
        if !details.is_empty() {
            summary.push(' ');
            summary.push_str(&details.join(", "));
        }
    }
    summary
}
