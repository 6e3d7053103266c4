use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arcdex::{
    assets,
    config::ArchiveDef,
    logger,
    meta::MetaRules,
    refs::{kinds_label, RefExtractor},
    results::{self, Indexer},
};
use clap::{Parser, Subcommand};
use log::info;
use report::Summary;
use scraper::Html;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// archive definition, defaults to `arcdex.toml` when present
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// directory holding the mirrored site
    #[arg(long, global = true, value_name = "DIR")]
    archive_root: Option<PathBuf>,

    /// file name of the navigation page inside the archive root
    #[arg(long, global = true, value_name = "NAME")]
    nav_page: Option<String>,

    /// where the CSV and JSON indexes are written
    #[arg(long, global = true, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// more output, repeat for trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// warnings and errors only
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// index every result page and flag the ones the navigation page misses
    Results,
    /// inventory every file in the archive against the navigation page
    Assets {
        /// results index to cross-reference, defaults to the one in the output dir
        #[arg(long, value_name = "FILE")]
        results_csv: Option<PathBuf>,
    },
    /// `results` followed by `assets`
    All,
    /// show what would be extracted from a single page
    Inspect {
        #[arg(name = "HTML_FILE")]
        file: PathBuf,
    },
}

fn load_def(cli: &Cli) -> Result<ArchiveDef> {
    let mut def = ArchiveDef::load(cli.config.as_deref())?;
    let overridden =
        cli.archive_root.is_some() || cli.nav_page.is_some() || cli.output_dir.is_some();
    if let Some(root) = &cli.archive_root {
        def.archive_root.clone_from(root);
    }
    if let Some(nav) = &cli.nav_page {
        def.nav_page.clone_from(nav);
    }
    if let Some(out) = &cli.output_dir {
        def.output_dir.clone_from(out);
    }
    if overridden {
        def.validate()?;
    }
    Ok(def)
}

fn run_results(def: &ArchiveDef) -> Result<Vec<results::ResultRecord>> {
    let records = Indexer::new(def).build().context("failed to build results index")?;
    results::write(def, &records)?;
    info!(
        "wrote {} records to {} and {}",
        records.len(),
        def.results_csv().display(),
        def.results_json().display()
    );
    print!("{}", results::summary(def, &records));
    Ok(records)
}

fn run_assets(def: &ArchiveDef, results_names: &ahash::HashSet<String>) -> Result<()> {
    let refs = assets::nav_references(def)?;
    let records =
        assets::build(def, &refs, results_names).context("failed to build asset inventory")?;
    assets::write(def, &records)?;
    info!("wrote {} records to {}", records.len(), def.assets_csv().display());
    print!("{}", assets::summary(def, &records));
    Ok(())
}

fn inspect(def: &ArchiveDef, file: &Path) -> Result<()> {
    let bytes =
        std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let html = Html::parse_document(&String::from_utf8_lossy(&bytes));
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let meta = MetaRules::new(&def.sources).extract(&html, &name);
    let refs = RefExtractor::new().references(&html);

    let mut s = Summary::new(file.display().to_string(), 50);
    s.field("meet_name", &meta.meet_name)
        .field("date_raw", &meta.date.raw)
        .field("date_start", &meta.date.start)
        .field("date_end", &meta.date.end)
        .field("location", &meta.location)
        .field("source", &meta.source)
        .list(
            format!("REFERENCES ({})", refs.len()),
            refs.iter().map(|(path, kinds)| format!("{path} [{}]", kinds_label(kinds))),
        );
    print!("{s}");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(logger::level_for(cli.verbose, cli.quiet)).context("failed to set logger")?;
    let def = load_def(&cli)?;

    match &cli.command {
        Command::Results => {
            run_results(&def)?;
        }
        Command::Assets { results_csv } => {
            let csv = results_csv.clone().unwrap_or_else(|| def.results_csv());
            let names = assets::results_filenames(&csv)?;
            run_assets(&def, &names)?;
        }
        Command::All => {
            let records = run_results(&def)?;
            println!();
            let names: ahash::HashSet<String> =
                records.iter().map(|r| r.filename.to_lowercase()).collect();
            run_assets(&def, &names)?;
        }
        Command::Inspect { file } => inspect(&def, file)?,
    }
    Ok(())
}
