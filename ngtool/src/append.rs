//! `append` command: activate a library group into a working document.

use std::path::Path;

use colored::Colorize;
use nglib::{Document, TreeKind, append_group};

/// Append `group` from `source` into the document at `target` and save it.
pub fn run(
    source: &Path,
    group: &str,
    target: &Path,
    kind: Option<TreeKind>,
    width: Option<f32>,
) -> anyhow::Result<()> {
    let mut doc = Document::load(target)?;
    let outcome = append_group(source, group, &mut doc, kind, width)?;
    doc.save(target)?;

    let how = if outcome.reused {
        "bound existing".yellow()
    } else {
        "imported".green()
    };
    println!(
        "{} '{}' as node '{}' in {}",
        how.bold(),
        outcome.group,
        outcome.node,
        target.display()
    );
    Ok(())
}
