use clap::Parser;
use csscleaner_lib::format::QuoteStyle;
use csscleaner_lib::{CleanerOptions, CleaningStats, CssCleaner};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

const CSSCLEANER_INTRO: &str = r#"
      ___________ ____     ________
     / ____/ ___// ___/   / ____/ /__  ____ _____  ___  _____
    / /    \__ \ \__ \   / /   / / _ \/ __ `/ __ \/ _ \/ ___/
   / /___ ___/ /___/ /  / /___/ /  __/ /_/ / / / /  __/ /
   \____//____//____/   \____/_/\___/\__,_/_/ /_/\___/_/

    Merge duplicate selectors, drop redundant declarations.
"#;

#[derive(Parser)]
#[command(name = "csscleaner")]
#[command(about = "Deduplicate and normalize CSS files")]
struct Args {
    /// CSS files to clean.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Replace each input file with its cleaned CSS.
    #[arg(short, long)]
    write: bool,

    /// Write the cleaned CSS of a single input to this file instead of stdout.
    #[arg(short, long, conflicts_with = "write")]
    output: Option<PathBuf>,

    /// Options file. Defaults to csscleaner.config.json in the working directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Order declarations by category, then alphabetically.
    #[arg(long)]
    sort: bool,

    /// Skip the pretty formatter.
    #[arg(long)]
    no_prettify: bool,

    /// Minify the output with LightningCSS.
    #[arg(long)]
    minify: bool,

    /// Keep repeated properties with different values.
    #[arg(long)]
    keep_duplicated_properties: bool,

    /// Keep repeated properties even when their values are identical.
    #[arg(long)]
    keep_duplicated_values: bool,

    #[arg(long)]
    print_width: Option<usize>,

    #[arg(long)]
    indent_width: Option<usize>,

    /// Prefer single quotes in values.
    #[arg(long)]
    single_quote: bool,

    /// Report statistics as JSON.
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();

    // parse the args given in terminal
    let args: Args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), String> {
    if args.inputs.len() > 1 && !args.write {
        return Err("several inputs can only be cleaned in place, pass --write".to_string());
    }

    let options = load_options(args)?;
    let to_stdout = !args.write && args.output.is_none();
    if !to_stdout {
        println!("{}", CSSCLEANER_INTRO);
    }

    let cleaner = CssCleaner::new(options);
    log::info!("cleaning {} file(s)", args.inputs.len());
    let outcomes: Vec<_> = args
        .inputs
        .par_iter()
        .map(|path| (path, clean_file(&cleaner, path)))
        .collect();

    let mut failures = 0;
    for (path, outcome) in outcomes {
        let result = outcome.and_then(|(cleaned, stats)| {
            let destination = if args.write {
                Some(path.as_path())
            } else {
                args.output.as_deref()
            };
            match destination {
                Some(target) => fs::write(target, &cleaned)
                    .map_err(|e| format!("Error writing {}: {}", target.display(), e))?,
                None => print!("{}", cleaned),
            }
            report(path, &stats, args.json, to_stdout);
            Ok(())
        });

        if let Err(message) = result {
            eprintln!("{}: {}", path.display(), message);
            failures += 1;
        }
    }

    if failures > 0 {
        return Err(format!("{} of {} file(s) failed", failures, args.inputs.len()));
    }
    Ok(())
}

fn load_options(args: &Args) -> Result<CleanerOptions, String> {
    let mut options = match &args.config {
        Some(path) => CleanerOptions::load(path),
        None => {
            let cwd = std::env::current_dir().map_err(|e| e.to_string())?;
            CleanerOptions::discover(&cwd)
        }
    }
    .map_err(|e| format!("Error loading config: {}", e))?;

    apply_overrides(&mut options, args);
    Ok(options)
}

fn apply_overrides(options: &mut CleanerOptions, args: &Args) {
    if args.sort {
        options.sort_properties = true;
    }
    if args.no_prettify {
        options.prettify = false;
    }
    if args.minify {
        options.minify = true;
    }
    if args.keep_duplicated_properties {
        options.remove_duplicated_properties = false;
    }
    if args.keep_duplicated_values {
        options.remove_duplicated_values = false;
    }
    if let Some(width) = args.print_width {
        options.format.print_width = width;
    }
    if let Some(width) = args.indent_width {
        options.format.indent_width = width;
    }
    if args.single_quote {
        options.format.quote_style = QuoteStyle::Single;
    }
}

fn clean_file(cleaner: &CssCleaner, path: &Path) -> Result<(String, CleaningStats), String> {
    if !is_css_file(path) {
        return Err("not a CSS file".to_string());
    }
    let css = fs::read_to_string(path).map_err(|e| format!("Error reading CSS file: {}", e))?;
    cleaner.clean_with_stats(&css).map_err(|e| e.to_string())
}

fn is_css_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("css"))
}

/// Summary goes to stderr when stdout carries the CSS itself.
fn report(path: &Path, stats: &CleaningStats, json: bool, to_stdout: bool) {
    let line = if json {
        serde_json::to_string(stats).unwrap_or_default()
    } else {
        format!("{}: {}", path.display(), stats.summary())
    };
    if to_stdout {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}
