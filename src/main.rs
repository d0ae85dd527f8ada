mod allocator;
mod cohort;
mod error;
mod models;
mod outcome;
mod report;
mod scoring;
mod sources;

use allocator::AllocationPolicy;
use anyhow::{Context, Result};
use clap::{value_parser, Arg, Command};
use models::{Config, Institution, InstitutionSourceMode, Mapping, Outcome, Student, StudentSourceMode};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use sources::InstitutionReader;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Artifacts written by a run; removed before the next one.
const OUTPUT_FILES: [&str; 3] = ["students.csv", "mappings.csv", "allocation_summary.txt"];

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("placement-allocator")
        .version("0.1")
        .about("Generates a student cohort and allocates it across ranked institutions")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("seed")
                .short('s')
                .long("seed")
                .value_name("SEED")
                .help("Seed for reproducible cohorts (overrides the config)")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory (overrides the config)"),
        )
        .get_matches();

    let config_file = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("config.toml");

    // Load or create configuration
    let mut config = if Path::new(config_file).exists() {
        println!("📋 Loading configuration from: {}", config_file);
        Config::load_from_file(config_file)
            .with_context(|| format!("Failed to load configuration from {}", config_file))?
    } else {
        println!("📝 Creating default configuration file: {}", config_file);
        Config::default().save_to_file(config_file)?;
        println!(
            "⚠️  Please edit {} and point institutions_file at your ranking data, then run the program again.",
            config_file
        );
        return Ok(());
    };

    if let Some(seed) = matches.get_one::<u64>("seed") {
        config.seed = Some(*seed);
    }
    if let Some(output) = matches.get_one::<String>("output") {
        config.output_directory = Some(output.clone());
    }

    let mappings = run(&config)?;
    println!("\n✅ Allocation complete! {} students mapped.", mappings.len());
    Ok(())
}

/// One full run: load inputs, allocate, and rewrite every output file.
/// Previous outputs are only removed once allocation has succeeded.
fn run(config: &Config) -> Result<Vec<Mapping>> {
    let output_dir = config.output_directory.as_deref().unwrap_or("output");

    let students = load_students(config)?;
    println!("🎓 Cohort ready: {} students", students.len());

    let institutions = load_institutions(config)?;
    println!("🏛️  Institutions loaded: {}", institutions.len());

    let scored = scoring::score_all(&students);
    let mappings = if config.tail_start == 0 {
        allocator::allocate(&scored, &institutions)?
    } else {
        let policy = AllocationPolicy {
            tail_start: config.tail_start,
        };
        allocator::allocate_with_policy(&scored, &institutions, policy)?
    };

    fs::create_dir_all(output_dir)?;
    clean_output_directory(output_dir)?;

    let records = report::to_output_records(&mappings);
    let loads = report::institution_loads(&mappings, &institutions);
    let outcomes = cohort::count_outcomes(&students);

    report::write_students_csv(&students, output_dir)?;
    report::write_mappings_csv(&records, output_dir)?;
    report::write_summary(&report::render_summary(&loads, &outcomes), output_dir)?;

    if config.print_mappings {
        println!("\nStudent-to-Institution Mappings:\n");
        for record in &records {
            println!("{}", record);
        }
    }

    print_summary(&loads, &outcomes);
    println!("📂 Results written to: {}", output_dir);

    Ok(mappings)
}

fn load_students(config: &Config) -> Result<Vec<Student>> {
    match config.student_source_mode {
        StudentSourceMode::Generated => {
            let roster = match &config.names_file {
                Some(path) => {
                    println!("📄 Reading names from: {}", path);
                    sources::load_names(path)?
                }
                None => cohort::DEFAULT_ROSTER.iter().map(|name| name.to_string()).collect(),
            };
            let names = cohort::extend_roster(&roster, config.cohort_size);

            let mut rng = match config.seed {
                Some(seed) => {
                    println!("🎲 Generating cohort with seed {}", seed);
                    SmallRng::seed_from_u64(seed)
                }
                None => SmallRng::from_entropy(),
            };

            Ok(cohort::generate(&names, &config.departments, &mut rng)?)
        }
        StudentSourceMode::Csv => {
            let path = config
                .students_file
                .as_deref()
                .context("students_file must be set when student_source_mode is csv")?;
            println!("📄 Reading students from: {}", path);
            sources::load_students_csv(path)
        }
    }
}

fn load_institutions(config: &Config) -> Result<Vec<Institution>> {
    let reader = InstitutionReader::new()?;
    let path = config.institutions_file.as_str();

    println!("📄 Reading institutions from: {}", path);
    match config.institution_source_mode {
        InstitutionSourceMode::Csv => reader.read_csv(path),
        InstitutionSourceMode::RankingPage => reader.read_ranking_page(path),
    }
}

fn print_summary(loads: &[(String, u32, usize)], outcomes: &[(Outcome, usize)]) {
    println!("\n📊 SUMMARY");
    println!("==========\n");

    println!("🏛️  Students per institution (best rank first):");
    for (name, rank, count) in loads {
        println!("   {}. {} - {} students", rank, name, count);
    }

    println!("\n🎯 Outcome counts:");
    for (outcome, count) in outcomes {
        println!("   {}: {}", outcome, count);
    }
}

// Clean up previous results from output directory
fn clean_output_directory(output_dir: &str) -> Result<()> {
    let output_path = Path::new(output_dir);

    if !output_path.exists() {
        return Ok(());
    }

    println!("🧹 Cleaning previous results...");

    for item in &OUTPUT_FILES {
        let item_path = output_path.join(item);

        if item_path.is_file() {
            fs::remove_file(&item_path)?;
            println!("   🗑️  Removed file: {}", item);
        }
    }

    Ok(())
}
