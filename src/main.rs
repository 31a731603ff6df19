//! Purpose: `schemite` CLI entry point and command parsing.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Command results go to stdout; diagnostics go to stderr.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
#![allow(clippy::result_large_err)]
use std::error::Error as StdError;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::error::ErrorKind as ClapErrorKind;
use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

mod command_dispatch;
mod schema_paths;

use schema_paths::{SchemaNameResolveError, default_schema_dir, resolve_named_schema_path};
use schemite::api::{Error, ErrorKind, Representation, to_exit_code};

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
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Internal)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err(Error::new(ErrorKind::InvalidParam)
                    .with_message(clap_error_summary(&err))
                    .with_hint(clap_error_hint(&err)));
            }
        },
    };

    init_tracing();
    let schema_dir = cli.dir.unwrap_or_else(default_schema_dir);
    command_dispatch::dispatch_command(cli.command, schema_dir)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "schemite",
    version,
    about = "Schema-bound conversion between JSON documents and data objects",
    help_template = r#"{about-with-newline}
{before-help}USAGE
  {usage}

COMMANDS
{subcommands}

OPTIONS
{options}

{after-help}
"#,
    long_about = None,
    before_help = r#"A schema declares an id and record templates. A representation bound to
that schema converts between structured data objects and their canonical
JSON document form, validating strictly in both directions.

Mental model:
  - `check` validates a document against a schema
  - `canon` re-emits a document in canonical form
  - `config` prints the empty skeleton a device would fill in
"#,
    after_help = r#"EXAMPLES
  $ schemite id robot_arm
  $ schemite config robot_arm
  $ schemite check robot_arm '{"format":1,"meta":{...},"data":{...}}'
  $ cat reading.json | schemite canon robot_arm

LEARN MORE
  Named schemas live under ~/.schemite/schemas (override with --dir).
  Refs containing `/` are used as file paths directly.

  $ schemite <command> --help"#,
    arg_required_else_help = true,
    disable_help_subcommand = false
)]
struct Cli {
    #[arg(
        long,
        help = "Schema directory for named schemas (default: ~/.schemite/schemas)",
        value_hint = ValueHint::DirPath
    )]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(
        about = "Print the representation id of a schema",
        after_help = r#"EXAMPLES
  $ schemite id robot_arm
  $ schemite id ./schemas/robot_arm.schema.json"#
    )]
    Id {
        #[arg(help = "Schema name or path")]
        schema: String,
    },
    #[command(
        about = "Print the configuration skeleton document for a schema",
        long_about = r#"Print the configuration skeleton document for a schema.

The skeleton carries every record the schema declares with empty
placeholder values, ready for a producer to fill in."#,
        after_help = r#"EXAMPLES
  $ schemite config robot_arm
  $ schemite config robot_arm > skeleton.json"#
    )]
    Config {
        #[arg(help = "Schema name or path")]
        schema: String,
    },
    #[command(
        about = "Validate a document against a schema",
        long_about = r#"Validate a document against a schema.

Reads the document from the DOC argument, --file, or stdin. Prints a
summary on success; failures report the offending record, field, or
kind and exit non-zero."#,
        after_help = r#"EXAMPLES
  $ schemite check robot_arm -f reading.json
  $ curl -s https://device.local/reading | schemite check robot_arm"#
    )]
    Check {
        #[arg(help = "Schema name or path")]
        schema: String,
        #[arg(help = "Document text (omit or use '-' for stdin)")]
        doc: Option<String>,
        #[arg(short, long, help = "Read the document from a file", value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },
    #[command(
        about = "Re-emit a document in canonical form",
        long_about = r#"Re-emit a document in canonical form.

Decodes the document under the schema and encodes it again, yielding
the compact canonical envelope with sorted keys."#,
        after_help = r#"EXAMPLES
  $ schemite canon robot_arm -f reading.json
  $ schemite canon robot_arm '{"format":1,...}' > canonical.json"#
    )]
    Canon {
        #[arg(help = "Schema name or path")]
        schema: String,
        #[arg(help = "Document text (omit or use '-' for stdin)")]
        doc: Option<String>,
        #[arg(short, long, help = "Read the document from a file", value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },
    #[command(
        about = "Generate shell completion scripts",
        long_about = r#"Generate shell completion scripts.

Prints a completion script for the given shell to stdout.
Install the generated file in your shell's completion directory (or
source it) to enable tab completion."#,
        after_help = r#"EXAMPLES
  $ schemite completion bash > ~/.local/share/bash-completion/completions/schemite
  $ schemite completion zsh > ~/.zfunc/_schemite"#
    )]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

fn resolve_schema_ref(schema_ref: &str, schema_dir: &Path) -> Result<PathBuf, Error> {
    if schema_ref.contains('/') {
        return Ok(PathBuf::from(schema_ref));
    }
    resolve_named_schema_path(schema_ref, schema_dir).map_err(|err| match err {
        SchemaNameResolveError::ContainsPathSeparator => Error::new(ErrorKind::InvalidParam)
            .with_message("schema name must not contain path separators")
            .with_hint("Use a plain name, or a path containing `/`."),
    })
}

fn load_representation(schema_ref: &str, schema_dir: &Path) -> Result<Representation, Error> {
    let path = resolve_schema_ref(schema_ref, schema_dir)?;
    let rep = Representation::from_file(&path).map_err(|err| {
        if err.kind() == ErrorKind::InvalidFilePath && !schema_ref.contains('/') {
            err.with_hint("Install the schema under the schema directory or pass a path.")
        } else {
            err
        }
    })?;
    tracing::debug!(schema = %path.display(), id = rep.id(), "schema loaded");
    Ok(rep)
}

fn read_doc_input(doc: Option<&str>, file: Option<&Path>) -> Result<String, Error> {
    if doc.is_some() && file.is_some() {
        return Err(Error::new(ErrorKind::InvalidParam)
            .with_message("multiple document inputs provided")
            .with_hint("Use only one of DOC, --file, or stdin."));
    }
    if let Some(path) = file {
        return fs::read_to_string(path).map_err(|err| {
            Error::new(ErrorKind::InvalidFilePath)
                .with_message("failed to read document file")
                .with_path(path)
                .with_source(err)
        });
    }
    match doc {
        Some("-") | None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).map_err(|err| {
                Error::new(ErrorKind::InvalidParam)
                    .with_message("failed to read document from stdin")
                    .with_source(err)
            })?;
            Ok(text)
        }
        Some(inline) => Ok(inline.to_string()),
    }
}

fn emit_json(value: Value) {
    if io::stdout().is_terminal() {
        let pretty = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
        println!("{pretty}");
        return;
    }
    println!("{value}");
}

// Documents are already canonical JSON text; print them verbatim for
// pipes and pretty only for humans.
fn emit_doc(doc: &str) {
    if io::stdout().is_terminal() {
        if let Ok(value) = serde_json::from_str::<Value>(doc) {
            emit_json(value);
            return;
        }
    }
    println!("{doc}");
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("{}", error_text(err));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::InvalidParam => "invalid parameter".to_string(),
        ErrorKind::InvalidFilePath => "invalid file path".to_string(),
        ErrorKind::InvalidSchema => "invalid schema".to_string(),
        ErrorKind::InvalidDoc => "invalid document".to_string(),
        ErrorKind::InvalidRecordName => "invalid record name".to_string(),
        ErrorKind::InvalidDataType => "invalid data type".to_string(),
        ErrorKind::NoMemory => "out of memory".to_string(),
        ErrorKind::KeyNotExist => "key does not exist".to_string(),
        ErrorKind::KeyAlreadyExist => "key already exists".to_string(),
        ErrorKind::KeyValueMismatch => "key/value mismatch".to_string(),
        ErrorKind::NotImplemented => "not implemented".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    if let Some(key) = err.key() {
        inner.insert("key".to_string(), json!(key));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error) -> String {
    let mut lines = Vec::new();
    lines.push(format!("error: {}", error_message(err)));
    if let Some(hint) = err.hint() {
        lines.push(format!("hint: {hint}"));
    }
    if let Some(path) = err.path() {
        lines.push(format!("path: {}", path.display()));
    }
    if let Some(key) = err.key() {
        lines.push(format!("key: {key}"));
    }
    for cause in error_causes(err) {
        lines.push(format!("cause: {cause}"));
    }
    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}

fn clap_error_hint(err: &clap::Error) -> String {
    err.to_string()
        .lines()
        .find_map(|line| line.trim().strip_prefix("Usage: "))
        .map(|usage| format!("Usage: {}", usage.trim()))
        .unwrap_or_else(|| "Try `schemite --help`.".to_string())
}
