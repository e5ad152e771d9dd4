//! omw report

use chrono::Local;

use crate::error::Result;
use crate::render::{self, ReportFormat};
use crate::report;

use super::Context;

pub struct ReportOptions {
    pub from: Option<String>,
    pub to: Option<String>,
    pub format: ReportFormat,
}

pub fn run(ctx: &Context, opts: ReportOptions) -> Result<()> {
    let from = opts
        .from
        .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string());
    let to = opts.to.unwrap_or_else(|| from.clone());

    let format = if ctx.output.json && opts.format == ReportFormat::Text {
        ReportFormat::Json
    } else {
        opts.format
    };

    let report = report::compute_report(&ctx.store, &from, &to)?;
    let rendered = render::render(&report, format)?;
    if format == ReportFormat::Text {
        print!("{rendered}");
    } else {
        println!("{rendered}");
    }
    Ok(())
}
