//! Line-driven interactive session.
//!
//! One command per line. Feedback is written to the same writer as listings
//! so the whole exchange can be replayed from a script or a test.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use skumap_engine::{MapError, Session, Severity};
use skumap_io::{empty_template, export_session, LoadedCatalog};

pub const HELP: &str = "\
commands:
  add CODE        map the product group for CODE and append it
  remove N        remove row N (as numbered by `list`)
  clear           remove every row
  list            show the accumulated rows
  export [PATH]   write the table
  template [PATH] write an empty table (header only)
  help            show this help
  quit            leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Remove(usize),
    Clear,
    List,
    Export(Option<PathBuf>),
    Template(Option<PathBuf>),
    Help,
    Quit,
}

/// Parse one input line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let path = |rest: &str| (!rest.is_empty()).then(|| PathBuf::from(rest));

    let cmd = match verb.to_ascii_lowercase().as_str() {
        "add" | "a" => {
            if rest.is_empty() {
                return Err("usage: add CODE".into());
            }
            Command::Add(rest.to_string())
        }
        "remove" | "rm" => match rest.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Remove(n),
            _ => return Err("usage: remove N (rows are numbered from 1)".into()),
        },
        "clear" => Command::Clear,
        "list" | "ls" => Command::List,
        "export" => Command::Export(path(rest)),
        "template" => Command::Template(path(rest)),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{other}' (try `help`)")),
    };
    Ok(Some(cmd))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    loaded: LoadedCatalog,
    session: Session,
    delimiter: u8,
    export_path: PathBuf,
    template_path: PathBuf,
    prompt: bool,
}

impl Shell {
    pub fn new(loaded: LoadedCatalog, session: Session, delimiter: u8) -> Self {
        Self {
            loaded,
            session,
            delimiter,
            export_path: PathBuf::from("modello_finale.csv"),
            template_path: PathBuf::from("modello_vuoto.csv"),
            prompt: false,
        }
    }

    pub fn with_paths(mut self, export_path: PathBuf, template_path: PathBuf) -> Self {
        self.export_path = export_path;
        self.template_path = template_path;
        self
    }

    /// Print `> ` before reading each line.
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Read commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "origin: {} rows from {} at {}",
            self.loaded.catalog.len(),
            self.loaded.source_label,
            self.loaded.loaded_at_display()
        )?;

        let mut lines = input.lines();
        loop {
            if self.prompt {
                write!(out, "> ")?;
                out.flush()?;
            }
            let Some(line) = lines.next() else { break };
            let line = line?;

            let cmd = match parse_command(&line) {
                Ok(Some(cmd)) => cmd,
                Ok(None) => continue,
                Err(usage) => {
                    writeln!(out, "error: {usage}")?;
                    continue;
                }
            };
            if self.execute(cmd, out)? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    pub fn execute<W: Write>(&mut self, cmd: Command, out: &mut W) -> io::Result<Flow> {
        match cmd {
            Command::Add(code) => match self.session.add_by_code(&code, &self.loaded.catalog) {
                Ok(added) => {
                    writeln!(out, "added {} (row {})", added.codice, self.session.len())?;
                    if let Some(warning) = added.warning() {
                        writeln!(out, "warning: {warning}")?;
                    }
                }
                Err(err) => report(out, &err)?,
            },
            Command::Remove(n) => match self.session.remove(n - 1) {
                Ok(row) => writeln!(out, "removed {}", row.codice_articolo())?,
                Err(MapError::RowOutOfRange { len, .. }) => {
                    writeln!(out, "error: no row {n} (table has {len} rows)")?
                }
                Err(err) => report(out, &err)?,
            },
            Command::Clear => {
                let n = self.session.clear();
                writeln!(out, "cleared {n} rows")?;
            }
            Command::List => self.list(out)?,
            Command::Export(path) => {
                let path = path.unwrap_or_else(|| self.export_path.clone());
                match export_session(&self.session, self.delimiter) {
                    Ok(text) => {
                        if write_file(out, &path, &text)? {
                            writeln!(out, "exported {} rows to {}", self.session.len(), path.display())?;
                        }
                    }
                    Err(err) => writeln!(out, "error: {err}")?,
                }
            }
            Command::Template(path) => {
                let path = path.unwrap_or_else(|| self.template_path.clone());
                if write_file(out, &path, &empty_template(self.delimiter))? {
                    writeln!(out, "wrote template to {}", path.display())?;
                }
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn list<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.session.is_empty() {
            return writeln!(out, "table is empty");
        }
        for (i, row) in self.session.rows().iter().enumerate() {
            writeln!(
                out,
                "{:>3}. {}  {}  ({} variants)",
                i + 1,
                row.codice_articolo(),
                row.get("Nome Articolo").unwrap_or(""),
                row.filled_slots()
            )?;
        }
        Ok(())
    }
}

fn report<W: Write>(out: &mut W, err: &MapError) -> io::Result<()> {
    match err.severity() {
        Severity::Warning => writeln!(out, "warning: {err}"),
        Severity::Error => writeln!(out, "error: {err}"),
    }
}

// A failed write is reported to the user, not fatal to the session.
fn write_file<W: Write>(out: &mut W, path: &Path, text: &str) -> io::Result<bool> {
    match fs::write(path, text) {
        Ok(()) => Ok(true),
        Err(e) => {
            log::warn!("write {} failed: {e}", path.display());
            writeln!(out, "error: cannot write {}: {e}", path.display())?;
            Ok(false)
        }
    }
}
