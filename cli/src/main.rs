//! pdfmd CLI - PDF to Markdown converter

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use pdfmd::{
    collect_document, convert_file, pdf_version_from_path, ConvertOptions, JsonFormat, Labels,
    PageSelection, PageSource, PdfExtractor, RenderOptions,
};

#[derive(Parser)]
#[command(name = "pdfmd")]
#[command(version)]
#[command(about = "Convert PDF documents to Markdown", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output Markdown file (defaults to the input name with .md)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    flags: ConvertFlags,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a PDF to a Markdown file
    Convert {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output Markdown file (defaults to the input name with .md)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        #[command(flatten)]
        flags: ConvertFlags,
    },

    /// Dump the extracted pages and tables as JSON
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
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args, Default)]
struct ConvertFlags {
    /// Document title (defaults to the PDF title, then the file name)
    #[arg(long)]
    title: Option<String>,

    /// Language of generated headings
    #[arg(long, value_enum)]
    labels: Option<LabelSet>,

    /// Maximum length of an all-caps line treated as a heading
    #[arg(long, value_name = "N")]
    heading_max_len: Option<usize>,

    /// JSON file with render options (labels, heading rules)
    #[arg(long, value_name = "FILE", env = "PDFMD_CONFIG")]
    config: Option<PathBuf>,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Suffix of the default output file
    #[arg(long, value_name = "SUFFIX")]
    suffix: Option<String>,

    /// Skip table detection and rendering
    #[arg(long)]
    no_tables: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum LabelSet {
    /// "Page 1", "Table 1"
    En,
    /// "第 1 页", "表格 1"
    Zh,
}

impl From<LabelSet> for Labels {
    fn from(set: LabelSet) -> Self {
        match set {
            LabelSet::En => Labels::english(),
            LabelSet::Zh => Labels::chinese(),
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    std::process::exit(run(cli));
}

/// Run the parsed command and return the process exit code.
fn run(cli: Cli) -> i32 {
    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            flags,
        }) => cmd_convert(&input, output.as_deref(), &flags),
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&input, output.as_deref(), compact),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => match cli.input {
            Some(input) => cmd_convert(&input, cli.output.as_deref(), &cli.flags),
            None => {
                println!("{}", "Usage: pdfmd <input.pdf> [output.md]".yellow());
                println!("       pdfmd --help for more information");
                return 1;
            }
        },
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            println!("{}: {}", "Error".red().bold(), e);
            1
        }
    }
}

fn build_options(flags: &ConvertFlags) -> pdfmd::Result<ConvertOptions> {
    let mut render = match &flags.config {
        Some(path) => {
            log::debug!("loading render options from {}", path.display());
            RenderOptions::from_json_file(path)?
        }
        None => RenderOptions::default(),
    };

    if let Some(set) = flags.labels {
        render = render.with_labels(set.into());
    }
    if let Some(len) = flags.heading_max_len {
        let rules = render.heading_rules.clone().with_max_caps_len(len);
        render = render.with_heading_rules(rules);
    }
    if let Some(pages) = &flags.pages {
        render = render.with_pages(PageSelection::parse(pages)?);
    }

    let mut options = ConvertOptions::new().with_render_options(render);
    if flags.no_tables {
        options = options.with_tables(false);
    }
    if let Some(title) = &flags.title {
        options = options.with_title(title);
    }
    if let Some(suffix) = &flags.suffix {
        options = options.with_suffix(suffix);
    }
    Ok(options)
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    flags: &ConvertFlags,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = build_options(flags)?;
    let outcome = convert_file(input, output, &options)?;

    println!(
        "{} {} {} {}",
        "Converted".green().bold(),
        input.display(),
        "->".dimmed(),
        outcome.output.display()
    );
    println!(
        "  {} {} of {} pages, {} tables",
        "└─".dimmed(),
        outcome.pages_rendered,
        outcome.page_count,
        outcome.stats.table_count
    );

    Ok(())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = pdfmd::to_json(input, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = PdfExtractor::open(input)?;
    let version = pdf_version_from_path(input)?;
    let title = extractor.title();
    let doc = collect_document(&extractor, title.as_deref().unwrap_or(""), &PageSelection::All)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), version);
    println!("{}: {}", "Pages".bold(), extractor.page_count());
    if let Some(title) = &title {
        println!("{}: {}", "Title".bold(), title);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let text: String = doc
        .pages
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect::<Vec<_>>()
        .join("\n");
    let empty_pages = doc.pages.iter().filter(|p| p.is_empty()).count();

    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Characters".bold(), text.chars().count());
    println!("{}: {}", "Tables".bold(), doc.table_count());
    println!("{}: {}", "Pages without text".bold(), empty_pages);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfmd".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF to Markdown converter");
    println!();
    println!("License: MIT");
}
