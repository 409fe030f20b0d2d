use clap::{ArgGroup, Args, Subcommand};
use std::path::{Path, PathBuf};

use binpack_codec::Format;
use binpack_layout::{Layout, LayoutConfig, LayoutRegistry};

use crate::exit::{io_error, layout_error, pack_error, CliError, CliResult, DATA_INVALID, USAGE};
use crate::output::OutputFormat;

pub mod layouts;
pub mod pack;
pub mod size;
pub mod unpack;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pack JSON values into a binary record.
    Pack(PackArgs),
    /// Unpack a binary record into values.
    Unpack(UnpackArgs),
    /// Print the encoded size of a format or layout.
    Size(SizeArgs),
    /// List the layouts in a directory.
    Layouts(LayoutsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Pack(args) => pack::run(args, format),
        Command::Unpack(args) => unpack::run(args, format),
        Command::Size(args) => size::run(args, format),
        Command::Layouts(args) => layouts::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Where the record format comes from: inline tokens or a named layout.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["tokens", "layout"])))]
pub struct FormatSource {
    /// Comma separated format tokens (e.g. "I,?,d,6s").
    #[arg(long, short = 't')]
    pub tokens: Option<String>,
    /// Layout name to use instead of tokens.
    #[arg(long, short = 'l', requires = "layouts")]
    pub layout: Option<String>,
    /// Directory of *.layout.json files.
    #[arg(long, value_name = "DIR")]
    pub layouts: Option<PathBuf>,
    /// Require identifier field names when loading layouts.
    #[arg(long)]
    pub strict: bool,
}

/// A resolved record format.
pub enum Target {
    Tokens(Format),
    Layout(Layout),
}

impl Target {
    pub fn format(&self) -> &Format {
        match self {
            Target::Tokens(format) => format,
            Target::Layout(layout) => layout.format(),
        }
    }

    /// Display name of field `index`: the layout field name, or its position.
    pub fn field_name(&self, index: usize) -> String {
        match self {
            Target::Tokens(_) => index.to_string(),
            Target::Layout(layout) => layout
                .fields()
                .get(index)
                .map(|field| field.name.clone())
                .unwrap_or_else(|| index.to_string()),
        }
    }
}

impl FormatSource {
    pub fn resolve(&self) -> CliResult<Target> {
        if let Some(tokens) = &self.tokens {
            let format: Format = tokens
                .parse()
                .map_err(|err| pack_error("invalid format", err))?;
            return Ok(Target::Tokens(format));
        }

        let name = self
            .layout
            .as_deref()
            .ok_or_else(|| CliError::new(USAGE, "either --tokens or --layout is required"))?;
        let dir = self
            .layouts
            .as_deref()
            .ok_or_else(|| CliError::new(USAGE, "--layout requires --layouts"))?;
        let registry = load_registry(dir, self.strict)?;
        let layout = registry
            .get(name)
            .map_err(|err| layout_error("layout lookup failed", err))?;
        Ok(Target::Layout(layout.clone()))
    }
}

pub fn load_registry(dir: &Path, strict: bool) -> CliResult<LayoutRegistry> {
    let config = LayoutConfig {
        strict_field_names: strict,
        ..LayoutConfig::default()
    };
    LayoutRegistry::from_directory_with_config(dir, config)
        .map_err(|err| layout_error("failed loading layouts", err))
}

/// Read `path` as UTF-8 text.
pub fn read_text(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path)
        .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))
}

/// Parse JSON supplied on the command line or from a file.
pub fn parse_json(text: &str, what: &str) -> CliResult<serde_json::Value> {
    serde_json::from_str(text)
        .map_err(|err| CliError::new(DATA_INVALID, format!("{what} is not valid JSON: {err}")))
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["values", "values_file"])))]
pub struct PackArgs {
    #[command(flatten)]
    pub source: FormatSource,
    /// Values as JSON: an array in format order, or an object keyed by layout field.
    #[arg(long, short = 'v')]
    pub values: Option<String>,
    /// Read the values JSON from a file.
    #[arg(long, value_name = "FILE")]
    pub values_file: Option<PathBuf>,
    /// Write the packed bytes to a file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("bytes").required(true).args(["hex", "file"])))]
pub struct UnpackArgs {
    #[command(flatten)]
    pub source: FormatSource,
    /// Record bytes as hex (whitespace and a leading 0x are ignored).
    #[arg(long, short = 'x')]
    pub hex: Option<String>,
    /// Read the record bytes from a file.
    #[arg(long, short = 'f', value_name = "FILE")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SizeArgs {
    #[command(flatten)]
    pub source: FormatSource,
}

#[derive(Args, Debug)]
pub struct LayoutsArgs {
    /// Directory of *.layout.json files.
    pub dir: PathBuf,
    /// Require identifier field names.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
