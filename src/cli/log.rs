//! omw add / hello / stretch

use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::store::LogEntry;

use super::Context;

pub fn run_add(ctx: &Context, task: &str) -> Result<()> {
    let entry = ctx.store.append(task)?;
    emit_logged(ctx, "add", &entry)
}

pub fn run_hello(ctx: &Context) -> Result<()> {
    let entry = ctx.store.hello()?;
    emit_logged(ctx, "hello", &entry)
}

pub fn run_stretch(ctx: &Context) -> Result<()> {
    let entry = ctx.store.stretch()?;
    emit_logged(ctx, "stretch", &entry)
}

fn emit_logged(ctx: &Context, command: &str, entry: &LogEntry) -> Result<()> {
    let mut human = HumanOutput::new(format!("omw {command}: logged \"{}\"", entry.task));
    human.push_summary("at", entry.end.format("%Y-%m-%d %H:%M:%S").to_string());
    human.push_summary("file", ctx.store.path().display().to_string());
    if crate::codec::decode(&entry.task).is_err() {
        human.push_warning("task text has no title characters and won't be counted in reports");
    }
    emit_success(ctx.output, command, entry, &human)
}
