//! Бэкенды матричного умножения
//!
//! Каждая ячейка C[i][j] независима от остальных, а A и B только читаются,
//! поэтому бэкенд волен распределять пары (i, j) как угодно. Свертка по k
//! внутри ячейки остается последовательной.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{Element, Matrix};
use crate::error::{KernelError, Result};

/// Исполнитель произведения C = A · B
pub trait MultiplyBackend<T> {
    /// Короткое имя для логов и отчетов
    fn name(&self) -> &'static str;

    /// Возвращает новую матрицу C; содержимое прежних буферов не читается
    fn multiply(&self, a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>>;
}

/// Выбор бэкенда в конфигурации и командной строке
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    Sequential,
    #[default]
    Parallel,
    /// OpenCL-устройство (требует feature `opencl`)
    #[value(name = "opencl")]
    #[serde(rename = "opencl")]
    OpenCl,
}

impl BackendKind {
    /// Создает бэкенд для целочисленных матриц драйвера
    pub fn create(self) -> Result<Box<dyn MultiplyBackend<i64>>> {
        match self {
            BackendKind::Sequential => Ok(Box::new(Sequential)),
            BackendKind::Parallel => Ok(Box::new(Parallel::default())),
            #[cfg(feature = "opencl")]
            BackendKind::OpenCl => Ok(Box::new(crate::opencl::OpenClMultiplier::new()?)),
            #[cfg(not(feature = "opencl"))]
            BackendKind::OpenCl => Err(KernelError::BackendMessage(
                "built without the `opencl` feature".to_string(),
            )),
        }
    }
}

/// Проверяет, что внутренние размеры A и B совпадают, и возвращает число ячеек C
pub(crate) fn check_shapes<T>(a: &Matrix<T>, b: &Matrix<T>) -> Result<usize> {
    if a.cols() != b.rows() {
        return Err(KernelError::DimensionMismatch {
            left_rows: a.rows(),
            left_cols: a.cols(),
            right_rows: b.rows(),
            right_cols: b.cols(),
        });
    }
    // A (m×0) и B (0×n) хранят пустые буферы при любых m и n
    a.rows().checked_mul(b.cols()).ok_or(KernelError::BufferSize {
        rows: a.rows(),
        cols: b.cols(),
        got: 0,
    })
}

/// Скалярное произведение строки `i` матрицы A на столбец `j` матрицы B
#[inline]
pub(crate) fn dot_cell<T: Element>(a: &Matrix<T>, b: &Matrix<T>, i: usize, j: usize) -> T {
    let (a, b, inner, n) = (a.as_slice(), b.as_slice(), a.cols(), b.cols());
    let mut sum = T::zero();
    for k in 0..inner {
        sum = sum + a[i * inner + k] * b[k * n + j];
    }
    sum
}

/// Тройной цикл в одном потоке, эталон для остальных бэкендов
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl<T: Element> MultiplyBackend<T> for Sequential {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn multiply(&self, a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
        let len = check_shapes(a, b)?;
        let (m, n) = (a.rows(), b.cols());
        debug!(m, k = a.cols(), n, "sequential multiply");

        let mut c = Vec::with_capacity(len);
        for i in 0..m {
            for j in 0..n {
                c.push(dot_cell(a, b, i, j));
            }
        }
        Matrix::new(m, n, c)
    }
}

/// Ячейки C распределяются по пулу потоков `rayon`
#[derive(Debug, Clone, Copy)]
pub struct Parallel {
    /// Минимальное число ячеек в одной задаче пула
    pub min_cells_per_task: usize,
}

impl Default for Parallel {
    fn default() -> Self {
        Self { min_cells_per_task: 64 }
    }
}

impl<T: Element> MultiplyBackend<T> for Parallel {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn multiply(&self, a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
        let len = check_shapes(a, b)?;
        let (m, n) = (a.rows(), b.cols());
        debug!(m, k = a.cols(), n, threads = rayon::current_num_threads(), "parallel multiply");

        let mut c = vec![T::zero(); len];
        c.par_iter_mut()
            .with_min_len(self.min_cells_per_task.max(1))
            .enumerate()
            .for_each(|(idx, cell)| {
                *cell = dot_cell(a, b, idx / n, idx % n);
            });
        Matrix::new(m, n, c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Matrix<i64>, Matrix<i64>) {
        (
            Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap(),
            Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap(),
        )
    }

    #[test]
    fn sequential_computes_full_inner_product() {
        let (a, b) = sample();
        let c = Sequential.multiply(&a, &b).unwrap();
        assert_eq!(c, Matrix::from_rows(vec![vec![19, 22], vec![43, 50]]).unwrap());
    }

    #[test]
    fn parallel_matches_sequential() {
        let a = Matrix::new(7, 5, (0..35).collect::<Vec<i64>>()).unwrap();
        let b = Matrix::new(5, 3, (0..15).map(|x| x - 7).collect::<Vec<i64>>()).unwrap();
        let backend = Parallel { min_cells_per_task: 1 };
        assert_eq!(backend.multiply(&a, &b).unwrap(), Sequential.multiply(&a, &b).unwrap());
    }

    #[test]
    fn mismatched_shapes_are_reported() {
        let a: Matrix<i64> = Matrix::zeros(2, 3);
        let b: Matrix<i64> = Matrix::zeros(2, 3);
        let err = Parallel::default().multiply(&a, &b).unwrap_err();
        assert_eq!(
            err,
            KernelError::DimensionMismatch { left_rows: 2, left_cols: 3, right_rows: 2, right_cols: 3 }
        );
    }

    #[test]
    fn oversized_output_is_reported() {
        let a: Matrix<i64> = Matrix::new(1 << 33, 0, Vec::new()).unwrap();
        let b: Matrix<i64> = Matrix::new(0, 1 << 33, Vec::new()).unwrap();
        let expected = KernelError::BufferSize { rows: 1 << 33, cols: 1 << 33, got: 0 };

        assert_eq!(Sequential.multiply(&a, &b).unwrap_err(), expected);
        assert_eq!(Parallel::default().multiply(&a, &b).unwrap_err(), expected);
    }

    #[test]
    fn empty_inner_dimension_gives_zeros() {
        let a: Matrix<i64> = Matrix::zeros(2, 0);
        let b: Matrix<i64> = Matrix::zeros(0, 2);
        assert_eq!(Sequential.multiply(&a, &b).unwrap(), Matrix::zeros(2, 2));
    }

    #[cfg(not(feature = "opencl"))]
    #[test]
    fn opencl_kind_requires_feature() {
        assert!(BackendKind::OpenCl.create().is_err());
        assert_eq!(BackendKind::Sequential.create().unwrap().name(), "sequential");
    }
}
