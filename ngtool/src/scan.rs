//! `scan` and `update` commands: derive menu records from source documents.

use std::path::Path;

use anyhow::{Context, bail};
use colored::Colorize;
use nglib::{Document, derive_document};

use crate::ctx::AppContext;

/// Derive and persist the record for one source document.
pub fn scan_file(ctx: &AppContext, path: &Path) -> anyhow::Result<()> {
    let canonical = path
        .canonicalize()
        .with_context(|| format!("resolving {}", path.display()))?;
    let doc = Document::load(&canonical)?;
    let record = derive_document(&canonical, &doc)?;

    let main_name = canonical
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let out = ctx.store().write(&main_name, &record)?;

    println!("{} {}", "scanned".green().bold(), canonical.display());
    for (kind, config) in &record.configs {
        println!(
            "  {kind}: {} menus, {} nodegroups",
            config.menus.len(),
            config.nodegroups.len()
        );
    }
    if record.configs.is_empty() {
        println!("  {}", "no menu structure found".yellow());
    }
    debug!("record written to {}", out.display());
    Ok(())
}

/// Rescan every enabled library entry. Failures are per-file.
pub fn update_all(ctx: &AppContext) -> anyhow::Result<()> {
    let library = ctx.load_library()?;
    let mut failures = 0usize;

    for entry in library.enabled() {
        match scan_file(ctx, &entry.filepath) {
            Ok(()) => {}
            Err(e) => {
                failures += 1;
                eprintln!("{} {}: {e:#}", "failed".red().bold(), entry.name);
            }
        }
    }

    if failures > 0 {
        bail!("{failures} library entries failed to update");
    }
    println!("{}", "all library entries up to date".green());
    Ok(())
}
