use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use nglib::TreeKind;
use ngtool::{append, browse, ctx::AppContext, library, scan};

#[derive(Parser)]
#[command(name = "ngtool", version, about = "Node group library menu toolkit")]
struct Cli {
    /// Workspace root: entry list and derived records live here.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive and persist the menu record for one source document.
    Scan {
        /// Source document path.
        file: PathBuf,
    },
    /// Rescan every enabled library entry.
    Update,
    /// Manage the registered source file list.
    Library {
        #[command(subcommand)]
        cmd: LibraryCmd,
    },
    /// Append a group from a library document into a working document.
    Append {
        /// Source library document.
        #[arg(long)]
        from: PathBuf,
        /// Name of the group to activate.
        #[arg(long)]
        group: String,
        /// Working document to modify.
        #[arg(long)]
        target: PathBuf,
        /// Display width for the instance node.
        #[arg(long)]
        width: Option<f32>,
        /// Tree kind to instance into (defaults to the document's first tree).
        #[arg(long, value_enum)]
        tree: Option<TreeKindArg>,
    },
    /// Browse the materialized menus interactively.
    Browse {
        /// Working document that leaf activation appends into.
        #[arg(long)]
        target: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum LibraryCmd {
    /// List all entries.
    List,
    /// Register a source document.
    Add {
        /// Unique entry name.
        name: String,
        /// Source document path.
        filepath: PathBuf,
        /// Prefix shown before the file's root menu label.
        #[arg(long, default_value = "")]
        prefix: String,
    },
    /// Remove an entry by name.
    Remove { name: String },
    /// Show an entry's menus again.
    Enable { name: String },
    /// Hide an entry's menus without deleting its record.
    Disable { name: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TreeKindArg {
    Geometry,
    Shader,
    Compositor,
    Texture,
}

impl From<TreeKindArg> for TreeKind {
    fn from(value: TreeKindArg) -> Self {
        match value {
            TreeKindArg::Geometry => TreeKind::Geometry,
            TreeKindArg::Shader => TreeKind::Shader,
            TreeKindArg::Compositor => TreeKind::Compositor,
            TreeKindArg::Texture => TreeKind::Texture,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let ctx = AppContext::new(&cli.root);

    match cli.cmd {
        Commands::Scan { file } => scan::scan_file(&ctx, &file),
        Commands::Update => scan::update_all(&ctx),
        Commands::Library { cmd } => match cmd {
            LibraryCmd::List => library::list(&ctx),
            LibraryCmd::Add {
                name,
                filepath,
                prefix,
            } => library::add(&ctx, name, filepath, prefix),
            LibraryCmd::Remove { name } => library::remove(&ctx, &name),
            LibraryCmd::Enable { name } => library::set_enabled(&ctx, &name, true),
            LibraryCmd::Disable { name } => library::set_enabled(&ctx, &name, false),
        },
        Commands::Append {
            from,
            group,
            target,
            width,
            tree,
        } => append::run(&from, &group, &target, tree.map(Into::into), width),
        Commands::Browse { target } => browse::run(&ctx, target.as_deref()),
    }
}
