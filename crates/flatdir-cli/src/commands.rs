use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "flatdir")]
#[command(about = "Flatten a directory tree, renaming files whose names collide", long_about = None)]
pub struct Cli {
    /// Directory to read files from
    pub input_dir: PathBuf,

    /// Directory to copy files into (created if missing)
    pub output_dir: PathBuf,

    /// Keep at most this many trailing directory levels; 0 flattens completely
    #[arg(long, alias = "max_depth", value_name = "N")]
    pub max_depth: Option<usize>,

    /// Print the planned copies without writing anything
    #[arg(long)]
    pub dry_run: bool,
}
