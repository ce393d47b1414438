use clap::{Parser, Subcommand};
use knnstore::VectorStore;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Command-line interface of the store
#[derive(Parser, Debug)]
#[command(name = "knnstore", version)]
#[command(about = "Exact cosine-similarity vector store")]
pub struct Cli {
    /// Store file, loaded on start. Single-command mode saves it back after a
    /// mutating command; the interactive session only writes it on `save`
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Command to run once; starts an interactive session when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// One line typed into the interactive session
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_flag = true, disable_version_flag = true)]
#[command(disable_help_subcommand = true)]
struct ReplLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Add a vector under an id
    Add {
        id: String,
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        values: Vec<f32>,
    },

    /// Add a vector under a generated id
    Gen {
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        values: Vec<f32>,
    },

    /// Retrieve a vector by id
    Get { id: String },

    /// Find the k most similar vectors
    Search {
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        values: Vec<f32>,

        /// Number of results to return
        #[arg(short, long, default_value_t = 5)]
        k: usize,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all vectors in storage order
    List,

    /// Show vector count
    Count,

    /// Save the store to a file
    Save { path: PathBuf },

    /// Replace the store with the contents of a file
    Load { path: PathBuf },
}

impl Command {
    /// True if the command changes the store contents
    fn mutates(&self) -> bool {
        matches!(self, Command::Add { .. } | Command::Gen { .. } | Command::Load { .. })
    }
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] knnstore::Error),

    #[error("cannot encode results: {0}")]
    Json(#[from] serde_json::Error),

    #[error("terminal i/o failed: {0}")]
    Terminal(#[from] io::Error),
}

/// Opens `path` if it exists, otherwise starts an empty store
fn open_store(path: Option<&Path>) -> Result<VectorStore, CliError> {
    match path {
        Some(path) if path.exists() => {
            let store = VectorStore::load(path)?;
            info!(path = %path.display(), entries = store.size(), "opened store");
            Ok(store)
        }
        _ => Ok(VectorStore::new()),
    }
}

/// Single-command mode - load store from --db, execute command, save back
/// Usage: knnstore --db <path> <command> [args...]
pub fn run_single_command(db: Option<PathBuf>, command: Command) -> Result<(), CliError> {
    let mut store = open_store(db.as_deref())?;
    let mutates = command.mutates();

    execute_command(&mut store, command, &mut io::stdout())?;

    if let (Some(path), true) = (db, mutates) {
        store.save(&path)?;
    }
    Ok(())
}

/// REPL mode - interactive session, --db is loaded but never saved implicitly
pub fn run_repl(db: Option<PathBuf>) -> Result<(), CliError> {
    let mut store = open_store(db.as_deref())?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    writeln!(stdout, "knnstore - Vector Store")?;
    writeln!(stdout, "Type 'help' for commands, 'exit' or 'quit' to quit\n")?;

    loop {
        write!(stdout, "knnstore> ")?;
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if input == "exit" || input == "quit" {
            writeln!(stdout, "Goodbye!")?;
            break;
        }

        if input == "help" {
            print_help(&mut stdout)?;
            continue;
        }

        let command = match parse_line(input) {
            Ok(cmd) => cmd,
            Err(error) => {
                eprint!("{}", error);
                continue;
            }
        };

        if let Err(error) = execute_command(&mut store, command, &mut stdout) {
            eprintln!("Error: {}", error);
        }
    }

    Ok(())
}

/// Parse one REPL line with the same grammar as the command line
fn parse_line(input: &str) -> Result<Command, clap::Error> {
    ReplLine::try_parse_from(input.split_whitespace()).map(|line| line.command)
}

fn execute_command(
    store: &mut VectorStore,
    command: Command,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        Command::Add { id, values } => {
            store.add(id.clone(), values)?;
            writeln!(out, "Added vector '{}'", id)?;
        }

        Command::Gen { values } => {
            let id = store.add_generated(values)?;
            writeln!(out, "Added vector '{}'", id)?;
        }

        Command::Get { id } => {
            let entry = store.get(&id)?;
            writeln!(out, "Vector '{}': {:?}", entry.id, entry.values)?;
        }

        Command::Search { values, k, json } => {
            let hits = store.query(&values, k)?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&hits)?)?;
            } else if hits.is_empty() {
                writeln!(out, "No results found")?;
            } else {
                writeln!(out, "Top {} results:", hits.len())?;
                for (rank, hit) in hits.iter().enumerate() {
                    writeln!(out, "{}. ID: {}, Score: {:.4}", rank + 1, hit.id, hit.score)?;
                }
            }
        }

        Command::List => {
            if store.is_empty() {
                writeln!(out, "Store is empty")?;
            } else {
                writeln!(out, "Stored vectors:")?;
                for entry in store.iter() {
                    writeln!(out, "  {}: {:?}", entry.id, entry.values)?;
                }
                writeln!(out, "Total: {} vectors", store.size())?;
            }
        }

        Command::Count => writeln!(out, "{}", store.size())?,

        Command::Save { path } => {
            store.save(&path)?;
            writeln!(out, "Store saved to '{}'", path.display())?;
        }

        Command::Load { path } => {
            store.reload(&path)?;
            writeln!(out, "Store loaded from '{}' ({} vectors)", path.display(), store.size())?;
        }
    }

    Ok(())
}

fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Available commands:")?;
    writeln!(out, "  add <id> <v1> <v2> ...             - Add a vector")?;
    writeln!(out, "  gen <v1> <v2> ...                  - Add a vector under a generated id")?;
    writeln!(out, "  search <v1> <v2> ... [-k N] [--json] - Search for similar vectors (default k=5)")?;
    writeln!(out, "  get <id>                           - Retrieve a vector by ID")?;
    writeln!(out, "  list                               - List all vectors")?;
    writeln!(out, "  count                              - Show vector count")?;
    writeln!(out, "  save <path>                        - Save store to file")?;
    writeln!(out, "  load <path>                        - Load store from file")?;
    writeln!(out, "  help                               - Show this help")?;
    writeln!(out, "  exit, quit                         - Exit the program")
}
