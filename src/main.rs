use clap::{Parser, Subcommand};
use folio::config::{self, ProjectConfig};
use folio::index::SiteIndex;
use folio::{output, site, style, tidy};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Static site generator for hand-written HTML and Markdown pages")]
#[command(long_about = "\
Static site generator for hand-written HTML and Markdown pages

Each page file holds only the page's own content. folio wraps every page in
the same document: head, site navigation, prev/next links and fine print.

Project structure:

  folio.toml                 # Project config (optional)
  ready/                     # Page sources
  ├── index.html             # Home page (or index.md), required
  ├── index.json             # Default options for every page (optional)
  ├── pages.txt              # Page order, one path per line (optional)
  ├── about.md
  ├── about.json             # Options for about.md (optional)
  └── guide/
      └── setup.html
  styles/
  └── plain/                 # A style: its .css files become style.css
      └── main.css

Run 'folio gen-config' to generate a documented folio.toml.")]
#[command(version)]
struct Cli {
    /// Project directory holding folio.toml
    #[arg(long, default_value = ".", global = true)]
    project: PathBuf,

    /// Page source directory (overrides folio.toml)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Output directory (overrides folio.toml)
    #[arg(long, global = true)]
    target: Option<PathBuf>,

    /// Styles directory (overrides folio.toml)
    #[arg(long, global = true)]
    styles: Option<PathBuf>,

    /// More log output: -v for progress, -vv for discovery detail
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every page into the target directory
    Build {
        /// Remove old .html files from the target first
        #[arg(long)]
        clean: bool,
        /// Also apply this style (overrides folio.toml)
        #[arg(long)]
        style: Option<String>,
    },
    /// Concatenate a style's CSS files into <target>/style.css
    Style {
        /// Style folder name under the styles directory
        name: String,
    },
    /// Remove files with a suffix from the target directory
    Delete {
        /// File suffix, e.g. html or .css
        suffix: String,
    },
    /// Clean raw HTML files with HTML Tidy into a source directory
    Tidy {
        /// Directory of raw HTML files
        dirty: PathBuf,
        /// Directory for the cleaned page bodies
        clean: PathBuf,
    },
    /// Validate the built HTML
    Check,
    /// Import content from another format
    Import {
        /// Content to import
        from: PathBuf,
    },
    /// Print a stock folio.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    let overrides = Overrides {
        source: cli.source,
        target: cli.target,
        styles: cli.styles,
    };
    let load = || resolve_config(&cli.project, &overrides);

    match cli.command {
        Command::Build { clean, style } => {
            let config = load()?;
            let index = SiteIndex::load_with_manifest(&config.source, &config.manifest)?;
            let report = site::build(&index, &config.target, clean)?;
            output::print_build_output(&index, &report, &config.target);
            if let Some(name) = style.or(config.style.clone()) {
                apply_style(&config, &name)?;
            }
        }
        Command::Style { name } => apply_style(&load()?, &name)?,
        Command::Delete { suffix } => {
            let config = load()?;
            let removed = site::delete_suffix(&config.target, &suffix)?;
            output::print_delete_output(&removed, &config.target);
        }
        Command::Tidy { dirty, clean } => {
            let files = tidy::tidy_tree(&dirty, &clean)?;
            output::print_tidy_output(&files, &clean);
        }
        Command::Check => site::check(&load()?.target)?,
        Command::Import { from } => site::import(&from)?,
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Folders given on the command line.
struct Overrides {
    source: Option<PathBuf>,
    target: Option<PathBuf>,
    styles: Option<PathBuf>,
}

/// `folio.toml` from the project directory, with command-line overrides applied.
fn resolve_config(project: &Path, overrides: &Overrides) -> Result<ProjectConfig, config::ConfigError> {
    let mut config = config::load_config(project)?.rooted(project);
    if let Some(source) = &overrides.source {
        config.source = source.clone();
    }
    if let Some(target) = &overrides.target {
        config.target = target.clone();
    }
    if let Some(styles) = &overrides.styles {
        config.styles = styles.clone();
    }
    config.validate()?;
    Ok(config)
}

fn apply_style(config: &ProjectConfig, name: &str) -> Result<(), style::StyleError> {
    let applied = style::apply_style(&config.styles, name, &config.target)?;
    output::print_style_output(name, &applied, &config.styles);
    Ok(())
}

/// Warnings only by default; each `-v` raises the level one step.
fn init_logging(verbose: u8) -> Result<(), log::SetLoggerError> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    SimpleLogger::new().with_level(level).init()
}
