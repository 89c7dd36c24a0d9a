//! WMM Catch2 Test Generator
//!
//! Converts World Magnetic Model reference vectors into a C++ Catch2 test file
//! for the header-only field library. Without `--vectors` the WMM2020
//! reference points are used.
//!
//! Usage:
//!   cargo run --bin wmmtestgen -- [--vectors vectors.json] [--header geomag.h]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use geomag_testgen::{CheckStyle, Generator, SuiteOverrides, TestSuite};

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// WMM Catch2 Test Generator
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generates Catch2 tests for a World Magnetic Model C header",
    long_about = None
)]
struct Args {
    /// JSON file with test vectors (parallel arrays); defaults to WMM2020
    #[arg(short, long)]
    vectors: Option<PathBuf>,

    /// C header with the model and coefficients
    #[arg(long)]
    header: Option<PathBuf>,

    /// Output file; defaults to <header stem>_test.cpp next to the header
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Acceptable error in each field component (nT)
    #[arg(short, long)]
    margin: Option<f64>,

    /// C routine computing the field
    #[arg(long)]
    routine: Option<String>,

    /// Model label used in test case names
    #[arg(long)]
    model: Option<String>,

    /// Catch2 tag attached to every test case
    #[arg(long)]
    tag: Option<String>,

    /// Assertion style of the generated checks
    #[arg(long, value_enum)]
    check: Option<CheckStyle>,

    /// Directory prefix for the header include
    #[arg(long, default_value = "../")]
    include_prefix: String,

    /// Print the generated source instead of writing a file
    #[arg(long)]
    stdout: bool,

    /// Print the active vectors as JSON and exit
    #[arg(long)]
    dump_vectors: bool,
}

impl Args {
    /// Metadata given on the command line, which wins over the vectors file
    fn overrides(&self) -> SuiteOverrides {
        SuiteOverrides {
            header: self.header.clone(),
            model: self.model.clone(),
            routine: self.routine.clone(),
            tag: self.tag.clone(),
            margin: self.margin,
            check: self.check,
        }
    }
}

/// Loads the vector set and applies command-line overrides
fn build_suite(args: &Args) -> Result<TestSuite> {
    let mut suite = match &args.vectors {
        Some(path) => TestSuite::from_json_file(path)?,
        None => TestSuite::wmm2020(),
    };
    suite.apply_overrides(args.overrides());
    Ok(suite)
}

/// Output of `--dump-vectors`
fn dump_vectors(suite: &TestSuite) -> Result<String> {
    Ok(suite.to_json_string()?)
}

fn run(args: Args) -> Result<()> {
    let suite = build_suite(&args)?;

    if args.dump_vectors {
        println!("{}", dump_vectors(&suite)?);
        return Ok(());
    }

    let generator = Generator::new(suite).with_include_prefix(args.include_prefix.clone());

    if args.stdout {
        print!("{}", generator.render()?);
        return Ok(());
    }

    let path = args.output.unwrap_or_else(|| generator.output_path());
    let count = generator.write_to(&path)?;
    println!("Generated {} test cases in {}", count, path.display());
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_vectors(dir: &std::path::Path, margin: f64, routine: &str) -> PathBuf {
        let suite = TestSuite {
            margin,
            routine: routine.to_string(),
            ..TestSuite::wmm2020()
        };
        let path = dir.join("vectors.json");
        fs::write(&path, suite.to_json_string().unwrap()).unwrap();
        path
    }

    #[test]
    fn test_cli_margin_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let path = write_vectors(temp_dir.path(), 1.5, "geomag");

        let args = Args::try_parse_from([
            "wmmtestgen",
            "--vectors",
            path.to_str().unwrap(),
            "--margin",
            "0.2",
        ])
        .unwrap();
        let suite = build_suite(&args).unwrap();
        assert_eq!(suite.margin, 0.2);
    }

    #[test]
    fn test_file_values_kept_without_flags() {
        let temp_dir = tempdir().unwrap();
        let path = write_vectors(temp_dir.path(), 1.5, "geomag");

        let args =
            Args::try_parse_from(["wmmtestgen", "--vectors", path.to_str().unwrap()]).unwrap();
        let suite = build_suite(&args).unwrap();
        assert_eq!(suite.routine, "geomag");
        assert_eq!(suite.margin, 1.5);
    }

    #[test]
    fn test_defaults_without_vectors_file() {
        let args = Args::try_parse_from(["wmmtestgen", "--check", "abs"]).unwrap();
        let suite = build_suite(&args).unwrap();
        assert_eq!(suite.vectors.len(), 12);
        assert_eq!(suite.check, CheckStyle::Abs);
        assert_eq!(suite.routine, "geoMag");
    }

    #[test]
    fn test_dump_vectors_reloads() {
        let args = Args::try_parse_from([
            "wmmtestgen",
            "--dump-vectors",
            "--model",
            "WMM2020b",
            "--margin",
            "0.5",
        ])
        .unwrap();
        assert!(args.dump_vectors);

        let suite = build_suite(&args).unwrap();
        let json = dump_vectors(&suite).unwrap();
        let reloaded = TestSuite::from_json_str(&json).unwrap();
        assert_eq!(reloaded, suite);
        assert_eq!(reloaded.model, "WMM2020b");
        assert_eq!(reloaded.margin, 0.5);
    }
}
