use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, WrapErr};

use mathblock_editor_core::parse;
use mathblock_renderer::{CheckReport, MathCache, PreviewPage, check_math, render_preview_cached};

mod config;

use config::RenderSettings;

#[derive(Parser)]
#[command(version, about = "mathblock - inspect, check and render text + $$math$$ content", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to KDL config file
    #[arg(long, global = true, env = "MATHBLOCK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the parsed block list as JSON
    Parse {
        /// Input file, or `-` for stdin
        input: PathBuf,
    },
    /// Render a read-only HTML preview
    Render {
        /// Input file, or `-` for stdin
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit a complete HTML page
        #[arg(long)]
        standalone: bool,

        /// Page title (standalone only)
        #[arg(long)]
        title: Option<String>,
    },
    /// Report math that fails to render
    Check {
        /// Input file, or `-` for stdin
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    init_miette();
    init_tracing();

    let cli = Cli::parse();
    let settings = RenderSettings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse { input } => {
            let (_, content) = read_input(&input)?;
            let blocks = parse(&content);
            let json = serde_json::to_string_pretty(&blocks).into_diagnostic()?;
            println!("{json}");
        }
        Commands::Render {
            input,
            output,
            standalone,
            title,
        } => {
            let (name, content) = read_input(&input)?;
            let cache = MathCache::default();
            let mut html = render_preview_cached(&content, &cache);

            if standalone || settings.standalone {
                let page = PreviewPage {
                    title: title.or(settings.title).or(Some(name)),
                    stylesheet: settings.stylesheet,
                };
                html = page.wrap(&html);
            }

            match output {
                Some(path) => {
                    std::fs::write(&path, html)
                        .into_diagnostic()
                        .wrap_err_with(|| format!("writing {}", path.display()))?;
                    tracing::info!(path = %path.display(), "preview written");
                }
                None => println!("{html}"),
            }
        }
        Commands::Check { input } => {
            let (name, content) = read_input(&input)?;
            let problems = check_math(&content, &name);
            if let Some(report) = CheckReport::from_problems(name.clone(), problems) {
                return Err(report.into());
            }
            println!("{name}: ok");
        }
    }

    Ok(())
}

/// Read a file, or stdin for `-`. Returns a display name and the content.
fn read_input(input: &Path) -> Result<(String, String)> {
    if input.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .into_diagnostic()
            .wrap_err("reading stdin")?;
        return Ok(("<stdin>".to_owned(), content));
    }

    let content = std::fs::read_to_string(input)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {}", input.display()))?;
    Ok((input.display().to_string(), content))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn init_miette() {
    let _ = miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(2)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }));
}
