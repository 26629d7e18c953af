//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - reads settings (environment + global flags)
//! - parses CLI arguments and dispatches
//! - prints reports and persists catalog/job edits

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::calc::parse_measurement;
use crate::catalog::CatalogEntry;
use crate::cli::{BushingArgs, CalcOptions, CatalogCommand, Command, JobsCommand, LayInArgs, StandardArgs};
use crate::error::{AppError, CutError};
use crate::io::{load_catalog, read_job_book, write_catalog, write_job_book};
use crate::report::{format_calculation, format_job, format_job_list, format_sizes};

pub mod pipeline;
pub mod settings;

use pipeline::{CalcInput, job_entry, load_workspace, run_calculation};
use settings::Settings;

/// Entry point for the `cut` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    let settings = Settings::from_env().with_paths(cli.catalog, cli.jobs, cli.overrides);

    match cli.command {
        Command::Standard(args) => handle_standard(&settings, args),
        Command::LayIn(args) => handle_lay_in(&settings, args),
        Command::Bushing(args) => handle_bushing(&settings, args),
        Command::Sizes => handle_sizes(&settings),
        Command::Catalog(cmd) => handle_catalog(&settings, cmd),
        Command::Jobs(cmd) => handle_jobs(&settings, cmd),
        Command::Tui => handle_tui(&settings),
    }
}

/// Log to stderr so stdout stays a clean report. `RUST_LOG` overrides the
/// default `warn` level.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_standard(settings: &Settings, args: StandardArgs) -> Result<(), AppError> {
    let input = CalcInput::Standard {
        a: args.ends.a(),
        b: args.ends.b(),
        c2c: parse_measurement("center-to-center", &args.c2c)?,
    };
    calculate(settings, &input, &args.options)
}

fn handle_lay_in(settings: &Settings, args: LayInArgs) -> Result<(), AppError> {
    let input = CalcInput::LayIn {
        a: args.ends.a(),
        lay_in: args.lay_in(),
        b: args.ends.b(),
        c2c_overall: parse_measurement("overall center-to-center", &args.overall)?,
        c2c_lay_in: parse_measurement("lay-in center-to-center", &args.layin)?,
    };
    calculate(settings, &input, &args.options)
}

fn handle_bushing(settings: &Settings, args: BushingArgs) -> Result<(), AppError> {
    let thickness = args
        .thickness
        .as_deref()
        .map(|raw| parse_measurement("bushing thickness", raw))
        .transpose()?;
    let input = CalcInput::Bushing {
        a: args.ends.a(),
        bushing: args.bushing(),
        b: args.ends.b(),
        c2c: parse_measurement("center-to-center", &args.c2c)?,
        thickness,
    };
    calculate(settings, &input, &args.options)
}

fn calculate(settings: &Settings, input: &CalcInput, options: &CalcOptions) -> Result<(), AppError> {
    let workspace = load_workspace(settings)?;
    let output = run_calculation(&workspace.resolver(), input, options.shave)?;

    println!("{}", format_calculation(&output.request, &output.result, output.shaved));

    if let Some(name) = options.job.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        let mut book = read_job_book(&settings.jobs_path)?;
        let count = book.record(name, job_entry(&output)).entries.len();
        write_job_book(&settings.jobs_path, &book)?;
        println!("Recorded in job '{name}' ({count} entries).");
    }
    Ok(())
}

fn handle_sizes(settings: &Settings) -> Result<(), AppError> {
    let loaded = load_catalog(&settings.catalog_path, &settings.catalog)?;
    print!("{}", format_sizes(&loaded.catalog, &settings.catalog));
    if !loaded.row_errors.is_empty() {
        println!("\nSkipped rows:");
        for err in &loaded.row_errors {
            println!("- line {}: {}", err.line, err.message);
        }
    }
    Ok(())
}

fn handle_catalog(settings: &Settings, cmd: CatalogCommand) -> Result<(), AppError> {
    let mut catalog = load_catalog(&settings.catalog_path, &settings.catalog)?.catalog;

    match cmd {
        CatalogCommand::Add {
            fitting_type,
            size,
            offset,
            alt_offset,
        } => {
            let entry = CatalogEntry::new(
                fitting_type.trim(),
                size.trim(),
                Some(offset.trim().to_string()),
                alt_offset.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()),
            );
            catalog.add_entry(entry)?;
            write_catalog(&settings.catalog_path, &catalog, &settings.catalog)?;
            println!("Added {} size {}.", fitting_type.trim(), size.trim());
        }
        CatalogCommand::Remove { fitting_type, size } => {
            let removed = catalog.remove_entry(&fitting_type, &size).ok_or_else(|| CutError::SizeNotFound {
                fitting_type: fitting_type.clone(),
                size: size.clone(),
                available: catalog.sizes(&fitting_type),
            })?;
            write_catalog(&settings.catalog_path, &catalog, &settings.catalog)?;
            println!("Removed {} size {}.", removed.fitting_type, removed.size);
        }
    }
    Ok(())
}

fn handle_jobs(settings: &Settings, cmd: JobsCommand) -> Result<(), AppError> {
    let mut book = read_job_book(&settings.jobs_path)?;
    match cmd {
        JobsCommand::List => print!("{}", format_job_list(&book)),
        JobsCommand::Show { name } => {
            let job = book
                .get(&name)
                .ok_or_else(|| AppError::new(2, format!("No job named '{name}'.")))?;
            print!("{}", format_job(job));
        }
        JobsCommand::Remove { name } => {
            book.remove(&name)
                .ok_or_else(|| AppError::new(2, format!("No job named '{name}'.")))?;
            write_job_book(&settings.jobs_path, &book)?;
            println!("Removed job '{name}'.");
        }
    }
    Ok(())
}

fn handle_tui(settings: &Settings) -> Result<(), AppError> {
    let workspace = load_workspace(settings)?;
    crate::tui::run(workspace, settings.jobs_path.clone())
}

/// Rewrite argv so `cut` defaults to `cut tui`.
///
/// Rules:
/// - `cut`                          -> `cut tui`
/// - `cut --catalog shop.csv`       -> `cut tui --catalog shop.csv`
/// - `cut --help/--version/-h`      -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    // Global flags only (no subcommand anywhere) means "tui with these paths".
    let has_subcommand = argv[1..].iter().any(|a| {
        matches!(
            a.as_str(),
            "standard" | "lay-in" | "bushing" | "sizes" | "catalog" | "jobs" | "tui"
        )
    });
    if arg1.starts_with('-') && !has_subcommand {
        argv.insert(1, "tui".to_string());
    }
    argv
}
