use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;

use redeem_matrix::config::{load_print_config, PrintConfig};
use redeem_matrix::io::read_matrix_file;
use redeem_matrix::report::write_matrix;
use redeem_matrix::Matrix;

fn matrix_file_arg(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .help(help)
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn index_arg(id: &'static str, long: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(long)
        .help(help)
        .required(true)
        .value_parser(clap::value_parser!(usize))
}

fn build_cli() -> Command {
    Command::new("matrix")
        .version(clap::crate_version!())
        .about("Parse, combine, slice and print dense matrices")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a JSON print configuration file")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .subcommand(
            Command::new("print")
                .about("Print a matrix file")
                .arg(matrix_file_arg("file", "Whitespace-separated matrix file"))
                .arg(
                    Arg::new("name")
                        .short('n')
                        .long("name")
                        .help("Label printed in front of the matrix")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                ),
        )
        .subcommand(
            Command::new("add")
                .about("Elementwise sum of two matrices")
                .arg(matrix_file_arg("left", "Left operand"))
                .arg(matrix_file_arg("right", "Right operand")),
        )
        .subcommand(
            Command::new("sub")
                .about("Elementwise difference of two matrices")
                .arg(matrix_file_arg("left", "Left operand"))
                .arg(matrix_file_arg("right", "Right operand")),
        )
        .subcommand(
            Command::new("mul")
                .about("Matrix product of two matrices")
                .arg(matrix_file_arg("left", "Left operand (m x n)"))
                .arg(matrix_file_arg("right", "Right operand (n x p)")),
        )
        .subcommand(
            Command::new("slice")
                .about("Extract an inclusive rectangular region of a matrix")
                .arg(matrix_file_arg("file", "Whitespace-separated matrix file"))
                .arg(index_arg("start_row", "start-row", "First row of the region"))
                .arg(index_arg("start_col", "start-col", "First column of the region"))
                .arg(index_arg("end_row", "end-row", "Last row of the region"))
                .arg(index_arg("end_col", "end-col", "Last column of the region")),
        )
        .subcommand(
            Command::new("random")
                .about("Print a matrix of uniform samples from [min, max)")
                .arg(index_arg("rows", "rows", "Number of rows"))
                .arg(index_arg("cols", "cols", "Number of columns"))
                .arg(
                    Arg::new("min")
                        .long("min")
                        .default_value("0")
                        .allow_negative_numbers(true)
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("max")
                        .long("max")
                        .default_value("1")
                        .allow_negative_numbers(true)
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed for reproducible output")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("MATRIX_LOG", "error,redeem_matrix=info"))
        .init();

    let matches = build_cli().get_matches();

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            log::info!("Using print config: {:?}", path);
            load_print_config(path)?
        }
        None => PrintConfig::default(),
    };

    match matches.subcommand() {
        Some(("print", sub_m)) => {
            let m = load(sub_m, "file")?;
            let name = sub_m.get_one::<String>("name").map(String::as_str);
            emit(&m, name, &config)
        }
        Some(("add", sub_m)) => {
            let (left, right) = (load(sub_m, "left")?, load(sub_m, "right")?);
            let out = left.checked_add(&right).context("Failed to add matrices")?;
            emit(&out, Some("sum"), &config)
        }
        Some(("sub", sub_m)) => {
            let (left, right) = (load(sub_m, "left")?, load(sub_m, "right")?);
            let out = left.checked_sub(&right).context("Failed to subtract matrices")?;
            emit(&out, Some("difference"), &config)
        }
        Some(("mul", sub_m)) => {
            let (left, right) = (load(sub_m, "left")?, load(sub_m, "right")?);
            let out = left.matmul(&right).context("Failed to multiply matrices")?;
            emit(&out, Some("product"), &config)
        }
        Some(("slice", sub_m)) => handle_slice(sub_m, &config),
        Some(("random", sub_m)) => handle_random(sub_m, &config),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn required<'a, T>(matches: &'a ArgMatches, id: &str) -> Result<&'a T>
where
    T: Clone + Send + Sync + 'static,
{
    matches
        .get_one::<T>(id)
        .ok_or_else(|| anyhow!("Missing required argument '{}'", id))
}

fn load(matches: &ArgMatches, id: &str) -> Result<Matrix> {
    let path: &PathBuf = required(matches, id)?;
    log::debug!("Loading matrix from {:?}", path);
    read_matrix_file(path).with_context(|| format!("Failed to read matrix: {}", path.display()))
}

fn emit(m: &Matrix, name: Option<&str>, config: &PrintConfig) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_matrix(&mut handle, m, name, config).context("Failed to write matrix to stdout")
}

fn handle_slice(matches: &ArgMatches, config: &PrintConfig) -> Result<()> {
    let m = load(matches, "file")?;
    let start_row = *required::<usize>(matches, "start_row")?;
    let start_col = *required::<usize>(matches, "start_col")?;
    let end_row = *required::<usize>(matches, "end_row")?;
    let end_col = *required::<usize>(matches, "end_col")?;
    let out = m
        .sub_matrix(start_row, start_col, end_row, end_col)
        .context("Failed to extract sub-matrix")?;
    emit(&out, Some("slice"), config)
}

fn handle_random(matches: &ArgMatches, config: &PrintConfig) -> Result<()> {
    let rows = *required::<usize>(matches, "rows")?;
    let cols = *required::<usize>(matches, "cols")?;
    let min = *required::<f64>(matches, "min")?;
    let max = *required::<f64>(matches, "max")?;

    let mut m = Matrix::zeros(rows, cols);
    match matches.get_one::<u64>("seed") {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(*seed);
            m.randomize_with(&mut rng, min, max)?;
        }
        None => {
            m.randomize(min, max)?;
        }
    }
    emit(&m, Some("random"), config)
}
