// skumap CLI - remap catalog SKUs into the fixed import table

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;

use skumap_cli::exit_codes::{
    export_exit_code, load_exit_code, map_exit_code, EXIT_CONFIG, EXIT_DUPLICATE, EXIT_EMPTY_EXPORT,
    EXIT_ERROR, EXIT_NOT_FOUND, EXIT_SUCCESS, EXIT_USAGE,
};
use skumap_cli::shell::Shell;
use skumap_cli::{asset_paths, load_options, origin_sources};
use skumap_config::{ConfigError, MapperSettings};
use skumap_engine::{Field, MapError, Session, Severity};
use skumap_io::{empty_template, export_session, load_catalog, LoadError, LoadedCatalog, DEFAULT_DELIMITER};

#[derive(Parser)]
#[command(name = "skumap")]
#[command(about = "Remap catalog SKUs from an origin export into the fixed import table")]
#[command(version, long_version = env!("SKUMAP_LONG_VERSION"))]
#[command(after_help = "\
Examples:
  skumap inspect
  skumap map A1 B7 --output modello_finale.csv
  skumap --source origin.csv map A1-V2 --json
  skumap template --output modello_vuoto.csv
  skumap session

Logging: set SKUMAP_LOG (e.g. SKUMAP_LOG=debug) to see source and column resolution.")]
struct Cli {
    /// Settings file (default: <config dir>/skumap/settings.toml)
    #[arg(long, global = true, env = "SKUMAP_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Origin file to load instead of the configured sources (repeatable, tried in order)
    #[arg(long = "source", global = true, value_name = "PATH")]
    sources: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the origin and report its source, size and resolved columns
    Inspect {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Map codes into a fresh table and export it
    #[command(after_help = "\
Each code is added in order. Per-code feedback goes to stderr.

Exit codes:
  0  every code mapped
  3  at least one code could not be mapped (others are still exported)
  4  at least one code was already in the table
  7  nothing to export")]
    Map {
        /// SKUs to map (main or variant)
        #[arg(required = true, value_name = "CODE")]
        codes: Vec<String>,

        /// Write the table here instead of stdout
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,

        /// Emit rows as JSON objects keyed by column name
        #[arg(long)]
        json: bool,
    },

    /// Write an empty table (header only)
    Template {
        /// Write here instead of stdout
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Interactive session on stdin (`help` lists the commands)
    Session {
        /// Default path for `export` (default: export.file_name from settings)
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Settings file helpers
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the settings file path
    Path,

    /// Print the effective settings as TOML
    Show,

    /// Write a commented default settings file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect { json } => cmd_inspect(cli.config, cli.sources, json),
        Commands::Map { codes, output, json } => cmd_map(cli.config, cli.sources, codes, output, json),
        Commands::Template { output } => cmd_template(output),
        Commands::Session { output } => cmd_session(cli.config, cli.sources, output),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Path => cmd_config_path(cli.config),
            ConfigCommands::Show => cmd_config_show(cli.config),
            ConfigCommands::Init { force } => cmd_config_init(cli.config, force),
        },
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("SKUMAP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    // Also installs the `log` bridge, so library records reach the same writer.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Exit with `code` and no message (feedback was already printed).
    pub fn silent(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    pub fn config(err: ConfigError) -> Self {
        Self { code: EXIT_CONFIG, message: err.to_string(), hint: None }
            .with_hint("run `skumap config init --force` to rewrite a default settings file")
    }

    pub fn load(err: LoadError) -> Self {
        let code = load_exit_code(&err);
        let hint = match &err {
            LoadError::NoSources | LoadError::AllSourcesFailed(_) => {
                Some("pass --source PATH or check [source] in the settings file".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    pub fn map(err: MapError) -> Self {
        let hint = match &err {
            MapError::MissingColumns(_) | MapError::MissingSkuColumn => {
                Some("run `skumap inspect` to see how the origin header was resolved".to_string())
            }
            _ => None,
        };
        Self { code: map_exit_code(&err), message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// shared
// ============================================================================

fn load_settings(path: Option<&Path>) -> Result<MapperSettings, CliError> {
    match path {
        Some(path) => MapperSettings::load_from(path),
        None => MapperSettings::load(),
    }
    .map_err(CliError::config)
}

fn load_origin(settings: &MapperSettings, overrides: &[PathBuf]) -> Result<LoadedCatalog, CliError> {
    let sources = origin_sources(&settings.source, overrides);
    load_catalog(&sources, &load_options(&settings.source)).map_err(CliError::load)
}

fn write_output(output: Option<&Path>, text: &str) -> Result<(), CliError> {
    match output {
        Some(path) => fs::write(path, text)
            .map_err(|e| CliError::io(format!("cannot write {}: {}", path.display(), e))),
        None => io::stdout()
            .lock()
            .write_all(text.as_bytes())
            .map_err(|e| CliError::io(e.to_string())),
    }
}

// ============================================================================
// inspect
// ============================================================================

fn cmd_inspect(config: Option<PathBuf>, sources: Vec<PathBuf>, json: bool) -> Result<(), CliError> {
    let settings = load_settings(config.as_deref())?;
    let loaded = load_origin(&settings, &sources)?;
    let catalog = &loaded.catalog;
    let missing: Vec<&str> = catalog.missing_required().iter().map(Field::key).collect();

    if json {
        let report = json!({
            "source": loaded.source_label,
            "loaded_at": loaded.loaded_at.to_rfc3339(),
            "rows": catalog.len(),
            "headers": catalog.headers(),
            "columns": catalog.columns(),
            "missing": missing,
        });
        let text = serde_json::to_string_pretty(&report).map_err(|e| CliError::io(e.to_string()))?;
        return write_output(None, &format!("{text}\n"));
    }

    let mut out = String::new();
    out.push_str(&format!("source:    {}\n", loaded.source_label));
    out.push_str(&format!("loaded at: {}\n", loaded.loaded_at_display()));
    out.push_str(&format!("rows:      {}\n", catalog.len()));
    out.push_str("columns:\n");
    for field in Field::ALL {
        let header = catalog.columns().get(field).unwrap_or("-");
        out.push_str(&format!("  {:<6} {}\n", field.key(), header));
    }
    if !missing.is_empty() {
        out.push_str(&format!("missing:   {}\n", missing.join(", ")));
    }
    write_output(None, &out)
}

// ============================================================================
// map
// ============================================================================

fn cmd_map(
    config: Option<PathBuf>,
    sources: Vec<PathBuf>,
    codes: Vec<String>,
    output: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let settings = load_settings(config.as_deref())?;
    let loaded = load_origin(&settings, &sources)?;
    loaded.catalog.ensure_usable().map_err(CliError::map)?;

    let mut session = Session::with_assets(asset_paths(&settings.assets));
    let mut failed = false;
    let mut duplicated = false;

    for code in &codes {
        match session.add_by_code(code, &loaded.catalog) {
            Ok(added) => {
                eprintln!("added {}", added.codice);
                if let Some(warning) = added.warning() {
                    eprintln!("warning: {}", warning);
                }
            }
            Err(err) => {
                eprintln!("{}: {}", err.severity(), err);
                match err.severity() {
                    Severity::Warning => duplicated = true,
                    Severity::Error => failed = true,
                }
            }
        }
    }

    if session.is_empty() {
        let code = if failed { EXIT_NOT_FOUND } else { EXIT_EMPTY_EXPORT };
        return Err(CliError { code, message: "no rows to export".into(), hint: None });
    }

    let text = if json {
        let rows = session.export_rows().map_err(CliError::map)?;
        let mut text = serde_json::to_string_pretty(rows).map_err(|e| CliError::io(e.to_string()))?;
        text.push('\n');
        text
    } else {
        export_session(&session, DEFAULT_DELIMITER).map_err(|e| CliError {
            code: export_exit_code(&e),
            message: e.to_string(),
            hint: None,
        })?
    };
    write_output(output.as_deref(), &text)?;

    if let Some(path) = &output {
        eprintln!("exported {} rows to {}", session.len(), path.display());
    }

    if failed {
        Err(CliError::silent(EXIT_NOT_FOUND))
    } else if duplicated {
        Err(CliError::silent(EXIT_DUPLICATE))
    } else {
        Ok(())
    }
}

// ============================================================================
// template
// ============================================================================

fn cmd_template(output: Option<PathBuf>) -> Result<(), CliError> {
    write_output(output.as_deref(), &empty_template(DEFAULT_DELIMITER))
}

// ============================================================================
// session
// ============================================================================

fn cmd_session(
    config: Option<PathBuf>,
    sources: Vec<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let settings = load_settings(config.as_deref())?;
    let loaded = load_origin(&settings, &sources)?;
    loaded.catalog.ensure_usable().map_err(CliError::map)?;

    let export_path = output.unwrap_or_else(|| PathBuf::from(&settings.export.file_name));
    let template_path = PathBuf::from(&settings.export.template_name);
    let session = Session::with_assets(asset_paths(&settings.assets));

    let mut shell = Shell::new(loaded, session, DEFAULT_DELIMITER)
        .with_paths(export_path, template_path)
        .with_prompt(atty::is(atty::Stream::Stdin));

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    shell
        .run(stdin.lock(), &mut out)
        .map_err(|e| CliError::io(e.to_string()))
}

// ============================================================================
// config
// ============================================================================

fn settings_path(config: Option<PathBuf>) -> PathBuf {
    config.unwrap_or_else(MapperSettings::config_path)
}

fn cmd_config_path(config: Option<PathBuf>) -> Result<(), CliError> {
    println!("{}", settings_path(config).display());
    Ok(())
}

fn cmd_config_show(config: Option<PathBuf>) -> Result<(), CliError> {
    let settings = load_settings(config.as_deref())?;
    let text = settings.to_toml().map_err(CliError::config)?;
    write_output(None, &text)
}

fn cmd_config_init(config: Option<PathBuf>, force: bool) -> Result<(), CliError> {
    let path = settings_path(config);
    if path.exists() && !force {
        return Err(CliError::args(format!("{} already exists", path.display()))
            .with_hint("pass --force to overwrite it"));
    }
    MapperSettings::write_default(&path).map_err(CliError::config)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
