//! Сортировка слиянием случайного массива с выводом до и после
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use nctools::config::{self, SortConfig, SortStrategy};
use nctools::matrix::display::sequence_table;
use nctools::sort::{merge_sort, MergeScratch, ParallelMergeSort};
use nctools::utils::{is_sorted, timed};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, Level};

#[derive(Debug, Parser)]
#[command(name = "mergesort", about = "Sort a random integer array with a stable mergesort")]
struct Args {
    /// JSON-файл конфигурации
    #[arg(long)]
    config: Option<PathBuf>,

    /// Длина массива
    #[arg(long)]
    len: Option<usize>,

    /// Верхняя граница случайных значений (по умолчанию len·len)
    #[arg(long)]
    bound: Option<i64>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum)]
    strategy: Option<SortStrategy>,

    /// Порог последовательного режима для стратегии parallel
    #[arg(long)]
    cutoff: Option<usize>,

    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<SortConfig> {
        let mut config = match &self.config {
            Some(path) => config::load(path).with_context(|| format!("Не удалось загрузить {}", path.display()))?,
            None => SortConfig::default(),
        };
        if let Some(len) = self.len {
            config.len = len;
        }
        if self.bound.is_some() {
            config.value_bound = self.bound;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(cutoff) = self.cutoff {
            config.parallel_cutoff = cutoff;
        }
        config.validate()?;
        Ok(config)
    }
}

fn sort(values: &mut [i64], config: &SortConfig) -> Result<()> {
    match config.strategy {
        SortStrategy::PerMerge => merge_sort(values),
        SortStrategy::SharedScratch => MergeScratch::with_capacity(values.len()).sort(values),
        SortStrategy::Parallel => ParallelMergeSort::with_cutoff(config.parallel_cutoff)?.sort(values),
    }
    Ok(())
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

    let bound = config.bound()?;
    let mut values: Vec<i64> = (0..config.len).map(|_| rng.gen_range(0..bound)).collect();
    info!(len = config.len, strategy = ?config.strategy, "Сортировка слиянием");

    println!("\n\n **********Original array**********\n");
    sequence_table("original", &values).printstd();

    let (result, elapsed) = timed("mergesort", || sort(&mut values, &config));
    result?;
    ensure!(is_sorted(&values), "Массив не отсортирован");

    println!("\n\n **********Sorted array**********\n");
    sequence_table("sorted", &values).printstd();
    println!("\nВремя сортировки: {:?}", elapsed);

    Ok(())
}
