//! pdfsift CLI - PDF structural extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfsift::export::{self, DirSink, ExportOptions, Reconstruction};
use pdfsift::{
    analyze_file_with_options, Analysis, ExtractOptions, JsonFormat, NoticeLevel, PageSelection,
    Threshold, ThresholdPreset, TocMode,
};

#[derive(Parser)]
#[command(name = "pdfsift")]
#[command(version)]
#[command(
    about = "Extract headers, footers, table of contents, tables and images from PDF",
    long_about = None
)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    extract: ExtractArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write every artifact (report, JSON, TOC CSV, images ZIP, rebuilt PDF)
    Export {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Show document and per-page metadata
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Print the text report (text, links, headers & footers, TOC, tables, images)
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Detect the table of contents
    Toc {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Detection mode: "structured" (default) parses title/page entries
        /// from contents pages; "pattern" lists every dot-leader line of
        /// every page, uncapped unless --page-cap is given
        #[arg(long, value_enum, default_value = "structured")]
        mode: TocModeArg,

        /// Only scan pages up to this number
        #[arg(long, value_name = "N")]
        page_cap: Option<u32>,

        /// Also write the entries as CSV
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Bundle unique embedded images into a ZIP archive
    Images {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output ZIP file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Rebuild a PDF from the header/body/footer partition
    Rebuild {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Print the analysis as JSON
    Json {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Show version information
    Version,
}

/// Options shared by every command that analyses a document.
#[derive(Args, Clone, Default)]
struct ExtractArgs {
    /// Header/footer band height in points, or a preset name
    #[arg(long, env = "PDFSIFT_THRESHOLD", value_name = "POINTS")]
    threshold: Option<String>,

    /// Header/footer band preset
    #[arg(long, value_enum, conflicts_with = "threshold")]
    preset: Option<PresetArg>,

    /// Skip table extraction
    #[arg(long)]
    no_tables: bool,

    /// Fail on the first page that cannot be decoded
    #[arg(long)]
    strict: bool,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,
}

impl ExtractArgs {
    fn to_options(&self) -> Result<ExtractOptions, Box<dyn std::error::Error>> {
        // Lenient unless asked otherwise, so one bad page does not hide the rest
        let mut options = ExtractOptions::new().with_tables(!self.no_tables);
        if !self.strict {
            options = options.lenient();
        }

        if let Some(preset) = self.preset {
            options = options.with_preset(preset.into());
        }
        if let Some(ref threshold) = self.threshold {
            options = options.with_threshold(threshold.parse::<Threshold>()?);
        }
        if let Some(ref pages) = self.pages {
            options = options.with_pages(PageSelection::parse(pages)?);
        }

        Ok(options)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PresetArg {
    /// 80pt bands
    Tight,
    /// 90pt bands
    Standard,
    /// 95pt bands (default)
    Loose,
}

impl From<PresetArg> for ThresholdPreset {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Tight => ThresholdPreset::Tight,
            PresetArg::Standard => ThresholdPreset::Standard,
            PresetArg::Loose => ThresholdPreset::Loose,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TocModeArg {
    /// Every line ending in a dot leader and a number, verbatim
    Pattern,
    /// Parsed title/page entries from pages that mention "Contents"
    Structured,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Export {
            input,
            output,
            compact,
            extract,
        }) => cmd_export(&input, output.as_deref(), compact, &extract),
        Some(Commands::Info { input, extract }) => cmd_info(&input, &extract),
        Some(Commands::Text {
            input,
            output,
            extract,
        }) => cmd_text(&input, output.as_deref(), &extract),
        Some(Commands::Toc {
            input,
            mode,
            page_cap,
            csv,
            extract,
        }) => cmd_toc(&input, mode, page_cap, csv.as_deref(), &extract),
        Some(Commands::Images {
            input,
            output,
            extract,
        }) => cmd_images(&input, output.as_deref(), &extract),
        Some(Commands::Rebuild {
            input,
            output,
            extract,
        }) => cmd_rebuild(&input, output.as_deref(), &extract),
        Some(Commands::Json {
            input,
            output,
            compact,
            extract,
        }) => cmd_json(&input, output.as_deref(), compact, &extract),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: export if input is provided
            if let Some(input) = cli.input {
                cmd_export(&input, cli.output.as_deref(), false, &cli.extract)
            } else {
                println!("{}", "Usage: pdfsift <FILE> [OUTPUT]".yellow());
                println!("       pdfsift --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn analyze(
    input: &Path,
    options: ExtractOptions,
) -> Result<Analysis, Box<dyn std::error::Error>> {
    let analysis = analyze_file_with_options(input, options)?;
    print_problems(&analysis);
    Ok(analysis)
}

/// Warnings and errors go to stderr so stdout stays clean for piping.
fn print_problems(analysis: &Analysis) {
    for notice in &analysis.notices {
        match notice.level {
            NoticeLevel::Warning => eprintln!("{} {}", "⚠".yellow(), notice),
            NoticeLevel::Error => eprintln!("{} {}", "✗".red(), notice),
            NoticeLevel::Info => log::info!("{}", notice),
        }
    }
}

fn default_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    PathBuf::from(format!("{}{}", stem, suffix))
}

fn cmd_export(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    extract: &ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| default_path(input, "_output"));

    let pb = ProgressBar::new(2);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    pb.set_message("Analyzing PDF...");
    let analysis = analyze(input, extract.to_options()?)?;
    pb.inc(1);

    pb.set_message("Writing artifacts...");
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let mut sink = DirSink::new(&output_dir);
    let written = export::export_all(
        &analysis,
        &ExportOptions::new().with_json_format(format),
        &mut sink,
    )?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!(
        "\n{} {}",
        "Output files:".green().bold(),
        output_dir.display()
    );
    for (i, name) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), name);
    }

    Ok(())
}

fn cmd_info(input: &Path, extract: &ExtractArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = extract.to_options()?.with_tables(false).with_images(false);
    let analysis = analyze(input, options)?;
    let info = &analysis.info;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), info.pdf_version);
    println!("{}: {}", "Pages".bold(), info.page_count);
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if info.encrypted { "Yes" } else { "No" }
    );

    if let Some(ref title) = info.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = info.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref creator) = info.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref producer) = info.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(ref created) = info.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = info.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    println!();
    println!("{}", "Pages".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for summary in &analysis.summaries {
        println!(
            "{} {:>4}  {}  rot {:>3}  {} chars  {} links  {} images",
            "Page".bold(),
            summary.number,
            summary.size_label(),
            summary.rotation,
            summary.text_length,
            summary.link_count,
            summary.image_count
        );
    }

    Ok(())
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    extract: &ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let analysis = analyze(input, extract.to_options()?)?;
    let text = export::to_text(&analysis);

    if let Some(path) = output {
        fs::write(path, &text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", text);
    }

    Ok(())
}

fn cmd_toc(
    input: &Path,
    mode: TocModeArg,
    page_cap: Option<u32>,
    csv: Option<&Path>,
    extract: &ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut toc_mode = match mode {
        TocModeArg::Pattern => TocMode::pattern(),
        TocModeArg::Structured => TocMode::structured(),
    };
    if let Some(cap) = page_cap {
        toc_mode = toc_mode.with_page_cap(cap);
    }

    let options = extract
        .to_options()?
        .with_toc_mode(toc_mode)
        .with_tables(false)
        .with_images(false);
    let analysis = analyze(input, options)?;

    println!("{}", "Detected Table of Contents".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    if analysis.toc.is_empty() {
        println!("{}", "No Table of Contents entries detected.".yellow());
    }
    for line in analysis.toc.display_lines() {
        println!("  {} {}", "•".dimmed(), line);
    }

    if let Some(path) = csv {
        fs::write(path, export::toc_csv(&analysis.toc))?;
        println!("\n{} {}", "Saved to".green(), path.display());
    }

    Ok(())
}

fn cmd_images(
    input: &Path,
    output: Option<&Path>,
    extract: &ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = extract.to_options()?.with_tables(false).with_images(true);
    let analysis = analyze(input, options)?;

    if analysis.images.is_empty() {
        println!("{}", "No embedded images found in the entire PDF.".yellow());
        return Ok(());
    }

    for (name, record) in analysis.images.file_names() {
        println!(
            "{} {} ({}x{}, first seen on page {})",
            "Extracted".green(),
            name,
            record.width,
            record.height,
            record.first_page
        );
    }

    let path = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| default_path(input, "_images.zip"));
    fs::write(&path, export::image_archive(&analysis.images)?)?;

    println!(
        "\n{} {} images written to {}",
        "Done!".green().bold(),
        analysis.images.len(),
        path.display()
    );

    Ok(())
}

fn cmd_rebuild(
    input: &Path,
    output: Option<&Path>,
    extract: &ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = extract.to_options()?.with_tables(false).with_images(false);
    let analysis = analyze(input, options)?;

    let path = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| default_path(input, "_rebuilt.pdf"));
    let pdf = Reconstruction::from_classifications(&analysis.classifications).to_pdf()?;
    fs::write(&path, pdf)?;

    println!("{} {}", "Saved to".green(), path.display());
    Ok(())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    extract: &ExtractArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let analysis = analyze(input, extract.to_options()?)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = export::to_json(&analysis, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfsift".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF structural extraction tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfsift::ErrorMode;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_extract_args_defaults_to_lenient() {
        let options = ExtractArgs::default().to_options().unwrap();
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(options.extract_tables);
        assert_eq!(options.threshold, Threshold::LOOSE);
    }

    #[test]
    fn test_extract_args_mapping() {
        let args = ExtractArgs {
            threshold: Some("82.5".to_string()),
            preset: None,
            no_tables: true,
            strict: true,
            pages: Some("2-4".to_string()),
        };
        let options = args.to_options().unwrap();
        assert_eq!(options.threshold.points(), 82.5);
        assert!(!options.extract_tables);
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.pages.includes(3));
        assert!(!options.pages.includes(5));
    }

    #[test]
    fn test_extract_args_rejects_bad_values() {
        let bad_threshold = ExtractArgs {
            threshold: Some("-4".to_string()),
            ..Default::default()
        };
        assert!(bad_threshold.to_options().is_err());

        let bad_pages = ExtractArgs {
            pages: Some("5-2".to_string()),
            ..Default::default()
        };
        assert!(bad_pages.to_options().is_err());
    }

    #[test]
    fn test_preset_mapping() {
        let args = ExtractArgs {
            preset: Some(PresetArg::Standard),
            ..Default::default()
        };
        assert_eq!(args.to_options().unwrap().threshold, Threshold::STANDARD);
    }

    #[test]
    fn test_toc_mode_default_and_help() {
        let cli = Cli::try_parse_from(["pdfsift", "toc", "report.pdf"]).unwrap();
        match cli.command {
            Some(Commands::Toc { mode, page_cap, .. }) => {
                assert!(mode == TocModeArg::Structured);
                assert_eq!(page_cap, None);
            }
            _ => panic!("expected toc command"),
        }

        let cli =
            Cli::try_parse_from(["pdfsift", "toc", "report.pdf", "--mode", "pattern"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Toc {
                mode: TocModeArg::Pattern,
                ..
            })
        ));

        use clap::CommandFactory;
        let command = Cli::command();
        let help = command
            .find_subcommand("toc")
            .and_then(|toc| toc.get_arguments().find(|arg| arg.get_id() == "mode"))
            .and_then(|arg| arg.get_help())
            .map(|help| help.to_string())
            .unwrap_or_default();
        assert!(help.contains("\"structured\" (default)"));
        assert!(help.contains("every dot-leader line"));
    }

    #[test]
    fn test_default_paths() {
        assert_eq!(
            default_path(Path::new("/tmp/report.pdf"), "_output"),
            PathBuf::from("report_output")
        );
    }
}
