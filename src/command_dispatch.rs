//! Purpose: Hold top-level CLI command dispatch for `schemite`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Output envelopes and exit code semantics stay stable.
//! Invariants: Helpers in `main.rs` remain the source of command business logic.

use super::*;

pub(super) fn dispatch_command(
    command: Command,
    schema_dir: PathBuf,
) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "schemite", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Id { schema } => {
            let rep = load_representation(&schema, &schema_dir)?;
            emit_json(json!({ "id": rep.id() }));
            Ok(RunOutcome::ok())
        }
        Command::Config { schema } => {
            let rep = load_representation(&schema, &schema_dir)?;
            let config = rep.config_info()?;
            let doc = rep.encode(&config)?;
            emit_doc(&doc);
            Ok(RunOutcome::ok())
        }
        Command::Check { schema, doc, file } => {
            let rep = load_representation(&schema, &schema_dir)?;
            let text = read_doc_input(doc.as_deref(), file.as_deref())?;
            let object = rep.decode(&text)?;
            tracing::debug!(ident = object.ident(), "document decoded");
            let records: Vec<&str> = object.record_names().collect();
            emit_json(json!({
                "valid": true,
                "id": rep.id(),
                "ident": object.ident(),
                "records": records,
            }));
            Ok(RunOutcome::ok())
        }
        Command::Canon { schema, doc, file } => {
            let rep = load_representation(&schema, &schema_dir)?;
            let text = read_doc_input(doc.as_deref(), file.as_deref())?;
            let object = rep.decode(&text)?;
            tracing::debug!(ident = object.ident(), "document decoded");
            let canonical = rep.encode(&object)?;
            emit_doc(&canonical);
            Ok(RunOutcome::ok())
        }
    }
}
