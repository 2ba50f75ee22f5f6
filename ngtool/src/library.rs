//! `library` subcommands: entry list CRUD.

use std::path::PathBuf;

use anyhow::bail;
use colored::Colorize;
use nglib::library::LibraryEntry;

use crate::ctx::AppContext;

pub fn list(ctx: &AppContext) -> anyhow::Result<()> {
    let library = ctx.load_library()?;
    if library.entries.is_empty() {
        println!("no library entries");
        return Ok(());
    }
    for entry in &library.entries {
        let flag = if entry.is_enabled {
            "enabled ".green()
        } else {
            "disabled".dimmed()
        };
        let prefix = if entry.prefix.is_empty() {
            String::new()
        } else {
            format!(" [{}]", entry.prefix)
        };
        println!(
            "{flag} {}{prefix}  {}",
            entry.name.bold(),
            entry.filepath.display()
        );
    }
    Ok(())
}

pub fn add(ctx: &AppContext, name: String, filepath: PathBuf, prefix: String) -> anyhow::Result<()> {
    let mut library = ctx.load_library()?;
    library.add(LibraryEntry {
        name: name.clone(),
        filepath,
        prefix,
        is_enabled: true,
    })?;
    ctx.save_library(&library)?;
    println!("{} {name}", "added".green().bold());
    Ok(())
}

pub fn remove(ctx: &AppContext, name: &str) -> anyhow::Result<()> {
    let mut library = ctx.load_library()?;
    if library.remove(name).is_none() {
        bail!("no library entry named '{name}'");
    }
    ctx.save_library(&library)?;
    println!("{} {name}", "removed".green().bold());
    Ok(())
}

pub fn set_enabled(ctx: &AppContext, name: &str, enabled: bool) -> anyhow::Result<()> {
    let mut library = ctx.load_library()?;
    if !library.set_enabled(name, enabled) {
        bail!("no library entry named '{name}'");
    }
    ctx.save_library(&library)?;
    let verb = if enabled { "enabled" } else { "disabled" };
    println!("{} {name}", verb.green().bold());
    Ok(())
}
