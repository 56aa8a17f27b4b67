use std::fmt::Write as FmtWrite;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use formctl::{
    FormUI, UiOptions,
    domain::parse_date,
    io::{
        DocumentFormat,
        input::parse_document_str,
        output::{OutputDestination, OutputOptions},
    },
};

const LOG_ENV: &str = "FORMCTL_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "formctl",
    version,
    about = "Run a form definition as an interactive terminal form"
)]
struct Cli {
    /// Form definition: file path, inline payload, or "-" for stdin
    #[arg(long = "form", value_name = "SPEC")]
    form: String,

    /// Format of the form definition; inferred from the file extension when omitted
    #[arg(long = "format", value_name = "FORMAT")]
    format: Option<DocumentFormat>,

    /// Title shown at the top of the UI, overriding the definition's
    #[arg(long = "title", value_name = "TEXT")]
    title: Option<String>,

    /// Output destinations ("-" writes to stdout). Defaults to stdout.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Overwrite output files even if they already exist
    #[arg(short = 'f', long = "force", short_alias = 'y', alias = "yes")]
    force: bool,

    /// Reference date (YYYY-MM-DD) for age/expiry badges and the calendar
    #[arg(long = "today", value_name = "DATE")]
    today: Option<String>,

    /// Rows between a field and its dropdown or calendar
    #[arg(long = "overlay-gap", value_name = "ROWS", default_value_t = 0)]
    overlay_gap: u16,

    /// Leave mouse reporting off; overlays then close with Esc or Tab only
    #[arg(long = "no-mouse")]
    no_mouse: bool,

    /// Hide the key help line in the footer
    #[arg(long = "no-help")]
    no_help: bool,

    /// Write tracing output to this file; filter with FORMCTL_LOG
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let mut diagnostics = DiagnosticCollector::default();

    let format = cli
        .format
        .or_else(|| path_format(&cli.form))
        .unwrap_or_default();
    let definition = match load_value(&cli.form, format) {
        Ok(value) => Some(value),
        Err(err) => {
            diagnostics.push_input("form", format!("{err:#}"));
            None
        }
    };

    let today = match cli.today.as_deref() {
        Some(raw) => match parse_date(raw) {
            Some(date) => Some(date),
            None => {
                diagnostics.push_input("today", format!("`{raw}` is not a YYYY-MM-DD date"));
                None
            }
        },
        None => None,
    };

    let (output_settings, output_paths) = build_output_options(&cli, format, &mut diagnostics);
    ensure_output_paths_available(&output_paths, cli.force, &mut diagnostics);

    diagnostics.into_result()?;
    let Some(definition) = definition else {
        return Err(eyre!("no form definition loaded"));
    };

    let mut options = UiOptions::default()
        .with_help(!cli.no_help)
        .with_overlay_gap(cli.overlay_gap)
        .with_mouse_capture(!cli.no_mouse);
    if let Some(today) = today {
        options = options.with_today(today);
    }

    let mut ui = FormUI::new(definition).with_options(options);
    if let Some(title) = cli.title.as_ref() {
        ui = ui.with_title(title.clone());
    }
    // Fail on a bad definition before the terminal switches screens.
    ui.definition().map_err(|err| eyre!("{err:#}"))?;
    if let Some(output) = output_settings {
        ui = ui.with_output(output);
    }

    tracing::info!(form = %cli.form, "running form");
    let _ = ui.run().map_err(Report::msg)?;

    Ok(())
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("formctl=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| eyre!("failed to install log subscriber: {err}"))
}

fn path_format(spec: &str) -> Option<DocumentFormat> {
    if spec == "-" {
        return None;
    }
    DocumentFormat::from_path(Path::new(spec))
}

fn load_value(spec: &str, format: DocumentFormat) -> Result<Value> {
    if spec == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .wrap_err("failed to read from stdin")?;
        return parse_contents(&buffer, format, "form");
    }

    let path = PathBuf::from(spec);
    match fs::read_to_string(&path) {
        Ok(contents) => parse_contents(&contents, format, "form"),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            parse_contents(spec, format, "inline form")
        }
        Err(err) => {
            Err(Report::new(err).wrap_err(format!("failed to read form from {}", path.display())))
        }
    }
}

fn parse_contents(contents: &str, format: DocumentFormat, label: &str) -> Result<Value> {
    match parse_document_str(contents, format) {
        Ok(value) => Ok(value),
        Err(primary) => {
            for candidate in DocumentFormat::available() {
                if *candidate == format {
                    continue;
                }
                if let Ok(value) = parse_document_str(contents, *candidate) {
                    return Ok(value);
                }
            }
            Err(eyre!(
                "failed to parse {label}: tried {} (first error: {primary:#})",
                format_list()
            ))
        }
    }
}

fn format_list() -> String {
    DocumentFormat::available()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Default)]
struct DiagnosticCollector {
    messages: Vec<String>,
}

impl DiagnosticCollector {
    fn push_input(&mut self, label: &str, message: impl Into<String>) {
        self.messages
            .push(format!("input ({label}): {}", message.into()));
    }

    fn push_output(&mut self, message: impl Into<String>) {
        self.messages.push(format!("output: {}", message.into()));
    }

    fn len(&self) -> usize {
        self.messages.len()
    }

    fn into_result(self) -> Result<()> {
        if self.messages.is_empty() {
            return Ok(());
        }
        let mut body = String::from("encountered input/output issues:\n");
        for (idx, msg) in self.messages.iter().enumerate() {
            let _ = writeln!(body, "  {}. {}", idx + 1, msg);
        }
        Err(eyre!(body))
    }
}

fn build_output_options(
    cli: &Cli,
    input_format: DocumentFormat,
    diagnostics: &mut DiagnosticCollector,
) -> (Option<OutputOptions>, Vec<PathBuf>) {
    let mut destinations = Vec::new();
    for raw in &cli.outputs {
        if raw.trim().is_empty() {
            diagnostics.push_output("output destination cannot be empty");
            continue;
        }
        if raw == "-" {
            destinations.push(OutputDestination::Stdout);
        } else {
            destinations.push(OutputDestination::file(raw));
        }
    }
    if cli.outputs.is_empty() {
        destinations.push(OutputDestination::Stdout);
    }

    let file_paths: Vec<PathBuf> = destinations
        .iter()
        .filter_map(|dest| match dest {
            OutputDestination::File(path) => Some(path.clone()),
            OutputDestination::Stdout => None,
        })
        .collect();

    let start = diagnostics.len();
    let format = if file_paths.is_empty() {
        input_format
    } else {
        infer_format_from_files(&file_paths, diagnostics).unwrap_or_default()
    };
    if diagnostics.len() > start || destinations.is_empty() {
        return (None, file_paths);
    }

    (
        Some(
            OutputOptions::new(format)
                .with_pretty(!cli.no_pretty)
                .with_destinations(destinations),
        ),
        file_paths,
    )
}

fn infer_format_from_files(
    file_paths: &[PathBuf],
    diagnostics: &mut DiagnosticCollector,
) -> Option<DocumentFormat> {
    let mut detected: Option<DocumentFormat> = None;
    for path in file_paths {
        match DocumentFormat::from_path(path) {
            Some(format) => match detected {
                Some(existing) if existing != format => diagnostics.push_output(format!(
                    "output file {} uses {format} but other destinations use {existing}; align extensions",
                    path.display()
                )),
                Some(_) => {}
                None => detected = Some(format),
            },
            None => diagnostics.push_output(format!(
                "cannot infer format from output file {}; use one of: {}",
                path.display(),
                format_list()
            )),
        }
    }
    detected
}

fn ensure_output_paths_available(
    paths: &[PathBuf],
    force: bool,
    diagnostics: &mut DiagnosticCollector,
) {
    if force {
        return;
    }
    for path in paths {
        if path.exists() {
            diagnostics.push_output(format!(
                "file {} already exists (pass --force to overwrite)",
                path.display()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_definitions_are_accepted() {
        let value = load_value(r#"{"fields": []}"#, DocumentFormat::Json).unwrap();
        assert_eq!(value["fields"], serde_json::json!([]));
    }

    #[test]
    fn mismatched_output_extensions_are_reported() {
        let mut diagnostics = DiagnosticCollector::default();
        let paths = [PathBuf::from("a.json"), PathBuf::from("b.txt")];
        let detected = infer_format_from_files(&paths, &mut diagnostics);
        assert_eq!(detected, Some(DocumentFormat::Json));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics.into_result().is_err());
    }
}
