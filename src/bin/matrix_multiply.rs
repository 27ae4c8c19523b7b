//! Умножение случайных матриц N×N с выводом A, B и C
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use nctools::config::{self, MatrixConfig};
use nctools::matrix::display::matrix_table;
use nctools::matrix::{compare, initialize_matrices, multiply_with, BackendKind, Matrix, MatrixType, Sequential};
use nctools::utils::timed;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn, Level};

#[derive(Debug, Parser)]
#[command(name = "matrix_multiply", about = "Multiply two square integer matrices")]
struct Args {
    /// JSON-файл конфигурации
    #[arg(long)]
    config: Option<PathBuf>,

    /// Размер N матриц
    #[arg(long)]
    size: Option<usize>,

    /// Верхняя граница случайных значений (по умолчанию N·N)
    #[arg(long)]
    bound: Option<i64>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum)]
    fill: Option<MatrixType>,

    #[arg(long, value_enum)]
    backend: Option<BackendKind>,

    /// Сколько строк и столбцов выводить
    #[arg(long, conflicts_with = "full")]
    preview: Option<usize>,

    /// Выводить матрицы целиком
    #[arg(long)]
    full: bool,

    /// Сверить результат с последовательным бэкендом
    #[arg(long)]
    verify: bool,

    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<MatrixConfig> {
        let mut config = match &self.config {
            Some(path) => config::load(path).with_context(|| format!("Не удалось загрузить {}", path.display()))?,
            None => MatrixConfig::default(),
        };
        if let Some(size) = self.size {
            config.size = size;
        }
        if self.bound.is_some() {
            config.value_bound = self.bound;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(fill) = self.fill {
            config.fill = fill;
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if self.full {
            config.preview = None;
        } else if self.preview.is_some() {
            config.preview = self.preview;
        }
        config.verify |= self.verify;
        config.validate()?;
        Ok(config)
    }
}

fn print_matrix(title: &str, matrix: &Matrix<i64>, preview: Option<usize>) {
    println!("\n\n*************{}***************\n", title);
    matrix_table(matrix, preview).printstd();
}

/// Построчно пересчитывает C последовательным бэкендом
fn reference_product(a: &Matrix<i64>, b: &Matrix<i64>) -> Result<Matrix<i64>> {
    let pb = ProgressBar::new(a.rows() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} строк")?
            .progress_chars("#>-"),
    );

    let mut data = Vec::with_capacity(a.rows() * b.cols());
    for row in a.iter_rows() {
        let row = Matrix::new(1, a.cols(), row.to_vec())?;
        data.extend_from_slice(multiply_with(&Sequential, &row, b)?.as_slice());
        pb.inc(1);
    }
    pb.finish_with_message("Проверка завершена");
    Ok(Matrix::new(a.rows(), b.cols(), data)?)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).with_target(false).init();

    let config = args.into_config()?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(size = config.size, fill = ?config.fill, backend = ?config.backend, "Умножение матриц");
    let (a, b) = initialize_matrices(config.fill, config.size, config.bound()?, &mut rng)?;

    print_matrix("MATRIX A", &a, config.preview);
    print_matrix("MATRIX B", &b, config.preview);

    let backend = config.backend.create().context("Не удалось создать бэкенд")?;
    let (c, elapsed) = timed(backend.name(), || multiply_with(backend.as_ref(), &a, &b));
    let c = c?;

    print_matrix("MATRIX C", &c, config.preview);
    println!("\nБэкенд: {}, время: {:?}", backend.name(), elapsed);

    if config.verify {
        let reference = reference_product(&a, &b)?;
        let summary = compare(&c, &reference, 0.0)?;
        if summary.matches() {
            println!("Результаты {} и sequential полностью совпадают!", backend.name());
        } else {
            warn!(differing = summary.differing, max_abs_diff = summary.max_abs_diff, "Обнаружены расхождения");
            anyhow::bail!("Результаты различаются в {} ячейках", summary.differing);
        }
    }

    Ok(())
}
