mod error_formatter;
mod formatter;
mod interactive;
mod server;

use anyhow::Result;
use bayan::{BayanError, Engine, ResourceLimits, Response, Vocabulary};
use clap::{Parser, Subcommand};
use formatter::Formatter;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "bayan")]
#[command(about = "Logic programming in Latin and Arabic script.")]
#[command(
    long_about = "Bayan is a logic programming language whose keywords can be written in Latin or Arabic script.\nThe CLI runs .bayan programs, answers queries against them, and serves them over HTTP."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run programs and print the answers to their queries
    ///
    /// Loads a .bayan file, or every .bayan file under a directory in path
    /// order, and executes its statements: facts and rules are stored,
    /// queries are answered and top-level assert/retract are applied.
    Run {
        /// A .bayan file or a directory containing .bayan files
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Print the responses as JSON
        #[arg(long)]
        json: bool,
        /// Stop any single query after this many resolution steps
        #[arg(long)]
        max_inferences: Option<u64>,
    },
    /// Answer a query against the loaded programs
    ///
    /// Examples:
    ///   bayan query 'grandparent("Ahmed", ?Who)'
    ///   bayan query 'جد("أحمد"، ?حفيد)' --limit 1
    Query {
        /// Goals to prove, with or without a leading `query` keyword
        goals: String,
        /// Directory containing .bayan files
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
        /// Stop after this many solutions
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Print the solutions as JSON
        #[arg(long)]
        json: bool,
        /// Stop the query after this many resolution steps
        #[arg(long)]
        max_inferences: Option<u64>,
    },
    /// List every predicate with its fact and rule counts
    List {
        /// Directory containing .bayan files
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
    },
    /// Show the clauses of a predicate
    Show {
        /// Predicate name (every arity is shown)
        name: String,
        /// Directory containing .bayan files
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
        /// Render keywords in Arabic script
        #[arg(long)]
        arabic: bool,
    },
    /// Print the keyword table with every accepted spelling
    Keywords,
    /// Start an interactive query loop
    ///
    /// Solutions are produced one at a time; after each one you choose
    /// whether to backtrack for the next.
    Repl {
        /// Directory containing .bayan files
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
    },
    /// Start HTTP REST API server (default: localhost:3000)
    ///
    /// Serves the programs in the workspace. Every request is answered by a
    /// fresh engine built from the stored programs, with sandboxed limits.
    /// API: POST /query with {code?, query, limit?}, POST /run with {code},
    /// POST /facts with {code}
    Server {
        /// Directory containing .bayan files
        #[arg(short = 'd', long = "dir", default_value = ".")]
        workdir: PathBuf,
        /// Host address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port number to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = match &cli.command {
        Commands::Run {
            path,
            json,
            max_inferences,
        } => run_command(path, *json, *max_inferences),
        Commands::Query {
            goals,
            workdir,
            limit,
            json,
            max_inferences,
        } => query_command(workdir, goals, *limit, *json, *max_inferences),
        Commands::List { workdir } => list_command(workdir),
        Commands::Show {
            name,
            workdir,
            arabic,
        } => show_command(workdir, name, *arabic),
        Commands::Keywords => keywords_command(),
        Commands::Repl { workdir } => repl_command(workdir),
        Commands::Server {
            workdir,
            host,
            port,
        } => server_command(workdir, host, *port),
    };

    if let Err(e) = result {
        // Render engine errors against their source, anything else as plain text
        if let Some(bayan_err) = e.downcast_ref::<BayanError>() {
            eprintln!("{}", error_formatter::format_error(bayan_err));
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bayan=info,tower_http=info".into()),
        )
        .init();
}

fn limits_with(max_inferences: Option<u64>) -> ResourceLimits {
    ResourceLimits {
        max_inferences,
        ..ResourceLimits::default()
    }
}

fn run_command(path: &Path, json: bool, max_inferences: Option<u64>) -> Result<()> {
    let sources = read_sources(path)?;
    if sources.is_empty() {
        anyhow::bail!("No .bayan files found in {}", path.display());
    }

    let mut engine = Engine::with_limits(limits_with(max_inferences));
    let responses = load_sources(&mut engine, &sources)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&responses)?);
        return Ok(());
    }

    let formatter = Formatter::default();
    for response in &responses {
        print!("{}", formatter.format_response(response));
    }
    Ok(())
}

fn query_command(
    workdir: &Path,
    goals: &str,
    limit: Option<usize>,
    json: bool,
    max_inferences: Option<u64>,
) -> Result<()> {
    let mut engine = Engine::with_limits(limits_with(max_inferences));
    load_workspace(&mut engine, workdir)?;

    let mut solutions = engine.run_query(goals)?;
    let variables = solutions.variables().to_vec();
    let found: Vec<_> = match limit {
        Some(limit) => solutions.by_ref().take(limit).collect(),
        None => solutions.by_ref().collect(),
    };
    if let Some(err) = solutions.error() {
        return Err(err.clone().into());
    }

    if json {
        let value = bayan::serializers::solutions_to_json(&found)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        let formatter = Formatter::default();
        print!("{}", formatter.format_solutions(&variables, &found));
    }
    Ok(())
}

fn list_command(workdir: &Path) -> Result<()> {
    let sources = read_sources(workdir)?;
    let mut engine = Engine::new();
    load_sources(&mut engine, &sources)?;

    let formatter = Formatter::default();
    print!(
        "{}",
        formatter.format_workspace_summary(sources.len(), &engine.summary())
    );
    Ok(())
}

fn show_command(workdir: &Path, name: &str, arabic: bool) -> Result<()> {
    let mut engine = Engine::new();
    load_workspace(&mut engine, workdir)?;

    let clauses = engine.clauses_named(name);
    if clauses.is_empty() {
        anyhow::bail!("Predicate '{}' not found", name);
    }

    let vocabulary = if arabic {
        Vocabulary::Arabic
    } else {
        Vocabulary::Latin
    };
    let formatter = Formatter::default();
    print!("{}", formatter.format_clauses(name, &clauses, vocabulary));
    Ok(())
}

fn keywords_command() -> Result<()> {
    let formatter = Formatter::default();
    print!("{}", formatter.format_keywords());
    Ok(())
}

fn repl_command(workdir: &Path) -> Result<()> {
    let mut engine = Engine::new();
    load_workspace(&mut engine, workdir)?;
    interactive::run_repl(&mut engine)
}

fn server_command(workdir: &Path, host: &str, port: u16) -> Result<()> {
    #[cfg(feature = "server")]
    {
        use tokio::runtime::Runtime;

        let sources = read_sources(workdir)?;
        // Reject a broken workspace before serving it
        let mut engine = Engine::with_limits(ResourceLimits::sandboxed());
        load_sources(&mut engine, &sources)?;
        println!(
            "Starting HTTP server with {} file(s), {} clause(s) loaded",
            sources.len(),
            engine.knowledge_base().len()
        );
        drop(engine);

        let rt = Runtime::new()?;
        rt.block_on(server::http::start_server(sources, host, port))?;
    }

    #[cfg(not(feature = "server"))]
    {
        let _ = (workdir, host, port);
        eprintln!("Error: Server feature not enabled");
        eprintln!("Recompile with: cargo build --features server");
        std::process::exit(1);
    }

    Ok(())
}

/// Source id and text of every .bayan file at `path`, in path order
fn read_sources(path: &Path) -> Result<Vec<(String, String)>> {
    let mut sources = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|s| s.to_str()) == Some("bayan")
        {
            let source_id = entry.path().to_string_lossy().to_string();
            sources.push((source_id, fs::read_to_string(entry.path())?));
        }
    }
    Ok(sources)
}

fn load_sources(engine: &mut Engine, sources: &[(String, String)]) -> Result<Vec<Response>> {
    let mut responses = Vec::with_capacity(sources.len());
    for (source_id, code) in sources {
        responses.push(engine.load(code, source_id)?);
    }
    Ok(responses)
}

/// Load all .bayan files from the workspace directory
fn load_workspace(engine: &mut Engine, workdir: &Path) -> Result<()> {
    let sources = read_sources(workdir)?;
    load_sources(engine, &sources)?;
    Ok(())
}
