//! ptxt CLI - plain text to PDF converter

use std::fs::{self, File};
use std::io::{self, BufWriter, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use ptxt::options::{DEFAULT_COLUMNS, DEFAULT_ROWS, DEFAULT_TAB_STOP};
use ptxt::{ConversionStats, Font, LayoutOptions, BUFFER_SIZE};

#[derive(Parser)]
#[command(name = "ptxt")]
#[command(version)]
#[command(about = "Convert plain text to PDF", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Input text file (stdin if omitted or "-")
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PDF file (stdout if omitted or "-")
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Characters per row
    #[arg(short, long, env = "PTXT_COLUMNS", default_value_t = DEFAULT_COLUMNS, value_parser = parse_natural)]
    columns: usize,

    /// Rows per page
    #[arg(short, long, env = "PTXT_ROWS", default_value_t = DEFAULT_ROWS, value_parser = parse_natural)]
    rows: usize,

    /// Tab stop width
    #[arg(short, long = "tab-stop", env = "PTXT_TAB_STOP", default_value_t = DEFAULT_TAB_STOP, value_parser = parse_natural)]
    tab_stop: usize,

    /// Left text offset (e.g. "72pt", "1in", "2.5cm", "25mm")
    #[arg(short = 'x', long = "offx", env = "PTXT_OFFX", default_value = "72pt", value_parser = parse_size_arg)]
    offset_x: u32,

    /// Top text offset
    #[arg(short = 'y', long = "offy", env = "PTXT_OFFY", default_value = "72pt", value_parser = parse_size_arg)]
    offset_y: u32,

    /// Font size
    #[arg(short = 's', long = "font-size", env = "PTXT_FONT_SIZE", default_value = "10pt", value_parser = parse_size_arg)]
    font_size: u32,

    /// Font family
    #[arg(short, long, value_enum, env = "PTXT_FONT", default_value = "mono")]
    font: FontFamily,

    /// Print a JSON conversion report to stderr
    #[arg(long)]
    stats: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a generated PDF and show its structure
    Info {
        /// PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
enum FontFamily {
    /// Helvetica
    Sans,
    /// Times-Roman
    Serif,
    /// Courier
    Mono,
}

impl From<FontFamily> for Font {
    fn from(family: FontFamily) -> Self {
        match family {
            FontFamily::Sans => Font::Sans,
            FontFamily::Serif => Font::Serif,
            FontFamily::Mono => Font::Mono,
        }
    }
}

impl Cli {
    fn layout_options(&self) -> LayoutOptions {
        LayoutOptions::new()
            .with_columns(self.columns)
            .with_rows(self.rows)
            .with_tab_stop(self.tab_stop)
            .with_offsets(self.offset_x, self.offset_y)
            .with_font_size(self.font_size)
            .with_font(self.font.into())
    }
}

fn parse_natural(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("must be a positive number".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("\"{}\" is not a valid integer", s)),
    }
}

fn parse_size_arg(s: &str) -> Result<u32, String> {
    ptxt::parse_size(s).map_err(|e| e.to_string())
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Info { input, json }) => cmd_info(input, *json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => cmd_convert(&cli),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn is_std_stream(path: Option<&Path>) -> bool {
    path.map_or(true, |p| p == Path::new("-"))
}

fn cmd_convert(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = cli.layout_options();
    log::debug!("layout options: {:?}", options);

    let input: Box<dyn Read> = match cli.input.as_deref() {
        Some(path) if !is_std_stream(Some(path)) => Box::new(
            File::open(path)
                .map_err(|e| format!("Failed to open \"{}\" for input: {}", path.display(), e))?,
        ),
        _ => Box::new(io::stdin().lock()),
    };

    let stats = match cli.output.as_deref() {
        Some(path) if !is_std_stream(Some(path)) => convert_to_file(input, path, &options)?,
        _ => {
            let writer = BufWriter::with_capacity(BUFFER_SIZE, io::stdout().lock());
            ptxt::convert(input, writer, &options)?
        }
    };

    if cli.stats {
        let report = serde_json::json!({
            "options": options,
            "stats": stats,
        });
        eprintln!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

fn convert_to_file(
    input: Box<dyn Read>,
    path: &Path,
    options: &LayoutOptions,
) -> Result<ConversionStats, Box<dyn std::error::Error>> {
    let file = File::create(path)
        .map_err(|e| format!("Failed to open \"{}\" for output: {}", path.display(), e))?;
    let writer = BufWriter::with_capacity(BUFFER_SIZE, file);

    match ptxt::convert(input, writer, options) {
        Ok(stats) => Ok(stats),
        Err(e) => {
            // A partial document has no xref table; don't leave it behind.
            ptxt::discard_output(path);
            Err(e.into())
        }
    }
}

fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let summary = ptxt::verify(&data)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), summary.version);
    println!("{}: {} bytes", "Size".bold(), data.len());
    println!("{}: {}", "Pages".bold(), summary.page_count);
    println!("{}: {}", "Objects".bold(), summary.object_total());
    println!("{}: {}", "Trailer size".bold(), summary.object_count);
    println!("{}: {}", "Xref offset".bold(), summary.xref_offset);
    println!("{}: {}", "Offsets".bold(), "verified".green());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "ptxt".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Plain text to PDF converter");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["ptxt"]).unwrap();
        let options = cli.layout_options();
        assert_eq!(options, LayoutOptions::default());
        assert!(cli.input.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_layout_flags() {
        let cli = Cli::try_parse_from([
            "ptxt", "-c", "100", "-r", "50", "-t", "4", "-x", "1in", "-y", "2.54cm", "-s",
            "12", "-f", "serif", "notes.txt",
        ])
        .unwrap();
        let options = cli.layout_options();
        assert_eq!(options.columns, 100);
        assert_eq!(options.rows, 50);
        assert_eq!(options.tab_stop, 4);
        assert_eq!(options.offset_x, 72);
        assert_eq!(options.offset_y, 72);
        assert_eq!(options.font_size, 12);
        assert_eq!(options.font, Font::Serif);
        assert_eq!(cli.input, Some(PathBuf::from("notes.txt")));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["ptxt", "-c", "0"]).is_err());
        assert!(Cli::try_parse_from(["ptxt", "-r", "abc"]).is_err());
        assert!(Cli::try_parse_from(["ptxt", "-s", "10px"]).is_err());
        assert!(Cli::try_parse_from(["ptxt", "-f", "fantasy"]).is_err());
    }

    #[test]
    fn test_info_subcommand() {
        let cli = Cli::try_parse_from(["ptxt", "info", "out.pdf", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Info { json: true, .. })
        ));
    }

    #[test]
    fn test_dash_means_std_stream() {
        assert!(is_std_stream(None));
        assert!(is_std_stream(Some(Path::new("-"))));
        assert!(!is_std_stream(Some(Path::new("out.pdf"))));
    }

    #[test]
    fn test_convert_to_file_and_verify() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let input: Box<dyn Read> = Box::new(&b"hello\nworld\n"[..]);

        let stats = convert_to_file(input, &path, &LayoutOptions::default()).unwrap();
        assert_eq!(stats.pages, 1);

        let data = fs::read(&path).unwrap();
        assert_eq!(ptxt::verify(&data).unwrap().page_count, 1);
    }

    #[test]
    fn test_failed_conversion_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let input: Box<dyn Read> = Box::new(&b"1\n2\n3\n"[..]);
        let options = LayoutOptions::new().with_rows(1).with_max_pages(1);

        assert!(convert_to_file(input, &path, &options).is_err());
        assert!(!path.exists());
    }
}
