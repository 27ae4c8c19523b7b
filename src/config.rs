//! Конфигурация драйверов
//!
//! Значения по умолчанию повторяют исходные демонстрационные программы:
//! матрицы 100×100 со значениями из `[0, N·N)` и массив из 10 элементов
//! со значениями из `[0, len·len)`. Файл конфигурации в формате JSON
//! необязателен, флаги командной строки имеют приоритет над ним.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{KernelError, Result};
use crate::matrix::{BackendKind, MatrixType};
use crate::sort::DEFAULT_SEQUENTIAL_CUTOFF;

/// Размер матриц по умолчанию
pub const DEFAULT_MATRIX_SIZE: usize = 100;

/// Длина сортируемого массива по умолчанию
pub const DEFAULT_SORT_LEN: usize = 10;

/// Настройки умножения матриц
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatrixConfig {
    /// Размер N квадратных матриц
    pub size: usize,

    /// Верхняя граница случайных значений; по умолчанию N·N
    pub value_bound: Option<i64>,

    /// Зерно генератора; без него берется энтропия ОС
    pub seed: Option<u64>,

    pub fill: MatrixType,

    pub backend: BackendKind,

    /// Сколько строк и столбцов выводить; `None` выводит все
    pub preview: Option<usize>,

    /// Сверять результат с последовательным бэкендом
    pub verify: bool,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_MATRIX_SIZE,
            value_bound: None,
            seed: None,
            fill: MatrixType::Random,
            backend: BackendKind::Parallel,
            preview: Some(8),
            verify: false,
        }
    }
}

impl MatrixConfig {
    /// Граница значений с учетом значения по умолчанию N·N
    pub fn bound(&self) -> Result<i64> {
        match self.value_bound {
            Some(bound) => Ok(bound),
            None => self
                .size
                .checked_mul(self.size)
                .and_then(|cells| i64::try_from(cells).ok())
                .ok_or_else(|| KernelError::Config(format!("matrix size {} is too large", self.size))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(KernelError::Config("matrix size must be positive".to_string()));
        }
        let bound = self.bound()?;
        if bound <= 0 {
            return Err(KernelError::Config(format!("value bound must be positive, got {bound}")));
        }
        Ok(())
    }
}

/// Стратегия сортировки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SortStrategy {
    /// Временные буферы на каждое слияние
    #[default]
    PerMerge,
    /// Один буфер на всю сортировку
    SharedScratch,
    /// Половины сортируются параллельно
    Parallel,
}

/// Настройки сортировки
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SortConfig {
    pub len: usize,

    /// Верхняя граница случайных значений; по умолчанию len·len
    pub value_bound: Option<i64>,

    pub seed: Option<u64>,

    pub strategy: SortStrategy,

    /// Порог последовательного режима для параллельной стратегии
    pub parallel_cutoff: usize,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            len: DEFAULT_SORT_LEN,
            value_bound: None,
            seed: None,
            strategy: SortStrategy::PerMerge,
            parallel_cutoff: DEFAULT_SEQUENTIAL_CUTOFF,
        }
    }
}

impl SortConfig {
    /// Граница значений; для пустого массива равна 1
    pub fn bound(&self) -> Result<i64> {
        match self.value_bound {
            Some(bound) => Ok(bound),
            None => self
                .len
                .checked_mul(self.len)
                .and_then(|cells| i64::try_from(cells.max(1)).ok())
                .ok_or_else(|| KernelError::Config(format!("sequence length {} is too large", self.len))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.parallel_cutoff == 0 {
            return Err(KernelError::Config("parallel cutoff must be positive".to_string()));
        }
        let bound = self.bound()?;
        if bound <= 0 {
            return Err(KernelError::Config(format!("value bound must be positive, got {bound}")));
        }
        Ok(())
    }
}

/// Загружает конфигурацию из JSON-файла
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!(path = %path.display(), "loading configuration");
    let text = fs::read_to_string(path)
        .map_err(|e| KernelError::Config(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| KernelError::Config(format!("cannot parse {}: {e}", path.display())))
}
