//! omw edit
//!
//! Reopens the editor after retryable failures (editor crashed, edited text
//! no longer parses) up to `editor.max_attempts` times.

use crate::editor::ExternalEditor;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};

use super::Context;

pub fn run(ctx: &Context) -> Result<()> {
    let editor = ExternalEditor::from_config(&ctx.config.editor);
    let max_attempts = ctx.config.editor.max_attempts.max(1);

    let mut attempt = 1;
    let summary = loop {
        match ctx.store.edit(&editor) {
            Ok(summary) => break summary,
            Err(failure) if failure.retry && attempt < max_attempts => {
                if !ctx.output.quiet {
                    eprintln!("error: {}", failure.error);
                    eprintln!("please retry editing ({attempt}/{max_attempts})");
                }
                attempt += 1;
            }
            Err(failure) => return Err(failure.error),
        }
    };

    let mut human = HumanOutput::new(format!("omw edit: saved {} entries", summary.entries));
    human.push_summary("file", ctx.store.path().display().to_string());
    human.push_summary("backup", summary.backup.display().to_string());
    for repair in &summary.repaired {
        human.push_detail(format!(
            "duplicate id {} at entry {} replaced with {}",
            repair.old, repair.index, repair.new
        ));
    }
    emit_success(ctx.output, "edit", &summary, &human)
}
