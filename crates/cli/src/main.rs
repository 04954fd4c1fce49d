use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

// Helper to convert LuaError to anyhow::Error (works around mlua not being Send+Sync)
fn map_lua_err<T>(result: bld_lua::Result<T>) -> Result<T> {
    result.map_err(|e| anyhow::anyhow!("{}", e))
}

/// bld - build-description configurator
#[derive(Parser)]
#[command(name = "bld")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure a source tree into a build graph
    Configure {
        /// Source directory (default: current directory)
        #[arg(default_value = ".")]
        source: PathBuf,

        /// Binary (output) directory (default: <source>/build)
        #[arg(short = 'B', long)]
        binary: Option<PathBuf>,

        /// Externally supplied defines, NAME=VALUE
        #[arg(short = 'D', value_name = "NAME=VALUE")]
        define: Vec<String>,
    },

    /// Configure and list the registered targets
    Targets {
        /// Source directory (default: current directory)
        #[arg(default_value = ".")]
        source: PathBuf,

        /// Binary (output) directory (default: <source>/build)
        #[arg(short = 'B', long)]
        binary: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .init();

    match cli.command {
        Commands::Configure {
            source,
            binary,
            define,
        } => cmd_configure(&source, binary, &define),
        Commands::Targets {
            source,
            binary,
            json,
        } => cmd_targets(&source, binary, json),
    }
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn resolve_dirs(source: &Path, binary: Option<PathBuf>) -> Result<(PathBuf, PathBuf)> {
    let source = absolutize(source)?;
    if !source.is_dir() {
        bail!("source directory not found: {}", source.display());
    }

    let binary = match binary {
        Some(binary) => absolutize(&binary)?,
        None => source.join("build"),
    };
    std::fs::create_dir_all(&binary)?;

    Ok((source, binary))
}

fn parse_defines(defines: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for define in defines {
        let Some((name, value)) = define.split_once('=') else {
            bail!("invalid define '{define}', expected NAME=VALUE");
        };
        map.insert(name.to_string(), value.to_string());
    }
    Ok(map)
}

fn cmd_configure(source: &Path, binary: Option<PathBuf>, defines: &[String]) -> Result<()> {
    let (source, binary) = resolve_dirs(source, binary)?;
    let defines = parse_defines(defines)?;
    info!(source = %source.display(), binary = %binary.display(), "configuring");

    let (status, graph) = map_lua_err(bld_lua::configure_tree(&source, &binary, defines))?;

    {
        let graph = graph.borrow();
        println!(
            "configured {} target(s), {} test(s), {} install rule(s)",
            graph.targets().count(),
            graph.test_count(),
            graph.install_rules().len()
        );
    }

    if status != 0 {
        std::process::exit(status);
    }
    Ok(())
}

fn cmd_targets(source: &Path, binary: Option<PathBuf>, json: bool) -> Result<()> {
    let (source, binary) = resolve_dirs(source, binary)?;

    let (status, graph) = map_lua_err(bld_lua::configure_tree(&source, &binary, HashMap::new()))?;
    if status != 0 {
        std::process::exit(status);
    }

    let graph = graph.borrow();
    if json {
        let targets: Vec<_> = graph.targets().collect();
        println!("{}", serde_json::to_string_pretty(&targets)?);
    } else {
        for target in graph.targets() {
            println!("{} ({})", target.name(), target.kind().as_str());
        }
    }
    Ok(())
}
