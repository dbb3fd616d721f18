//! vcs CLI - minimal local version control command line interface

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vcs::ops::{commit, diff, fsck, log, stage, stage_all, unstage};
use vcs::{read_commit, resolve, DiffResult, Index, Repo};

#[derive(Parser)]
#[command(name = "vcs")]
#[command(about = "minimal local version control - content-addressed snapshots")]
#[command(version)]
struct Cli {
    /// repository root
    #[arg(short, long, default_value = ".", env = "VCS_REPO")]
    repo: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// initialize a new repository
    Init {
        /// directory to initialize
        #[arg(default_value = ".")]
        path: PathBuf,

        /// create this subdirectory of PATH and initialize it instead
        #[arg(long)]
        name: Option<String>,
    },

    /// stage files for the next commit
    Add {
        /// files to stage
        #[arg(required_unless_present = "all")]
        paths: Vec<PathBuf>,

        /// stage every file in the working tree
        #[arg(short = 'A', long, conflicts_with = "paths")]
        all: bool,
    },

    /// remove files from the staging index
    Unstage {
        /// files to unstage
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// record the staged files as a new commit
    Commit {
        /// commit message
        #[arg(short, long)]
        message: String,
    },

    /// compare working files against the last commit
    Diff {
        /// files to compare
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// show commit history
    Log {
        /// maximum number of commits to show
        #[arg(short = 'n', long)]
        max_count: Option<usize>,
    },

    /// show a commit (defaults to HEAD)
    Show {
        /// commit hash or HEAD
        #[arg(default_value = "HEAD")]
        rev: String,
    },

    /// write raw object bytes to stdout
    CatFile {
        /// object hash
        object: String,
    },

    /// list staged files
    LsFiles,

    /// verify repository integrity
    Fsck,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> vcs::Result<()> {
    match cli.command {
        Commands::Init { path, name } => {
            let outcome = match name {
                Some(name) => Repo::init_named(&path, &name)?,
                None => Repo::init(&path)?,
            };
            println!("{}", outcome.message);
        }

        Commands::Add { paths, all } => {
            let repo = Repo::open(&cli.repo)?;

            if all {
                let staged = stage_all(&repo)?;
                for (path, hash) in &staged {
                    println!("added {} {}", hash.short(), path);
                }
            } else {
                for path in paths {
                    let hash = stage(&repo, &from_cwd(&path)?)?;
                    println!("added {} {}", hash.short(), path.display());
                }
            }
        }

        Commands::Unstage { paths } => {
            let repo = Repo::open(&cli.repo)?;
            for path in paths {
                unstage(&repo, &from_cwd(&path)?)?;
                println!("unstaged {}", path.display());
            }
        }

        Commands::Commit { message } => {
            let repo = Repo::open(&cli.repo)?;
            let hash = commit(&repo, &message)?;
            println!("{}", hash);
        }

        Commands::Diff { paths } => {
            let repo = Repo::open(&cli.repo)?;
            for path in paths {
                let line = match diff(&repo, &from_cwd(&path)?)? {
                    DiffResult::NoPriorCommit => "no previous commit".to_string(),
                    DiffResult::FileNotInCommit => "not in last commit".to_string(),
                    DiffResult::Unchanged => "unchanged".to_string(),
                    DiffResult::Changed { previous, current } => {
                        format!("changed {} -> {}", previous.short(), current.short())
                    }
                };
                println!("{}: {}", path.display(), line);
            }
        }

        Commands::Log { max_count } => {
            let repo = Repo::open(&cli.repo)?;
            for entry in log(&repo, max_count)? {
                println!("commit {}", entry.hash);
                println!("Date:   {}", entry.commit.timestamp.to_rfc3339());
                println!("Files:  {}", entry.commit.files.len());
                println!();
                for line in entry.commit.message.lines() {
                    println!("    {}", line);
                }
                println!();
            }
        }

        Commands::Show { rev } => {
            let repo = Repo::open(&cli.repo)?;
            let hash = resolve(&repo, &rev)?;
            let record = read_commit(&repo, &hash)?;

            println!("commit {}", hash);
            if let Some(parent) = record.parent {
                println!("parent {}", parent);
            }
            println!("timestamp {}", record.timestamp.to_rfc3339());
            println!();
            println!("{}", record.message);
            println!();
            for (path, file_hash) in &record.files {
                println!("{} {}", file_hash, path);
            }
        }

        Commands::CatFile { object } => {
            let repo = Repo::open(&cli.repo)?;
            let hash = resolve(&repo, &object)?;
            let data = repo.store().get(&hash)?;
            io::stdout()
                .write_all(&data)
                .map_err(|e| vcs::Error::Io {
                    path: "stdout".into(),
                    source: e,
                })?;
        }

        Commands::LsFiles => {
            let repo = Repo::open(&cli.repo)?;
            let index = Index::load(&repo)?;
            for (path, hash) in index.entries() {
                println!("{} {}", hash, path);
            }
        }

        Commands::Fsck => {
            let repo = Repo::open(&cli.repo)?;
            let report = fsck(&repo)?;

            println!("objects checked: {}", report.objects_checked);

            if !report.corrupt_objects.is_empty() {
                println!("\ncorrupt objects:");
                for obj in &report.corrupt_objects {
                    println!("  {}: {}", obj.hash, obj.message);
                }
            }

            if !report.missing_objects.is_empty() {
                println!("\nmissing objects:");
                for obj in &report.missing_objects {
                    println!("  {} (referenced by {})", obj.hash, obj.referenced_by);
                }
            }

            if let Some(error) = &report.index_error {
                println!("\nindex: {}", error);
            }

            if !report.dangling_objects.is_empty() {
                println!("\ndangling objects: {}", report.dangling_objects.len());
            }

            if report.is_ok() {
                println!("\nrepository is healthy");
            } else {
                println!("\nrepository has issues");
                return Err(vcs::Error::IntegrityCheckFailed);
            }
        }
    }

    Ok(())
}

/// command-line paths are relative to the current directory, not the repo root
fn from_cwd(path: &Path) -> vcs::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| vcs::Error::Io {
        path: ".".into(),
        source: e,
    })?;
    Ok(cwd.join(path))
}
