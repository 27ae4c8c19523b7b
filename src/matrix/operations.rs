//! Операции над матрицами

use num_traits::{CheckedAdd, CheckedMul, ToPrimitive};
use rand::Rng;
use tracing::debug;

use super::backend::{check_shapes, MultiplyBackend, Sequential};
use super::types::{Element, Matrix, MatrixType};
use crate::error::{KernelError, Result};

/// Произведение C = A · B в текущем потоке
pub fn multiply<T: Element>(a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
    Sequential.multiply(a, b)
}

/// Произведение через выбранный бэкенд
pub fn multiply_with<T, B>(backend: &B, a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>>
where
    B: MultiplyBackend<T> + ?Sized,
{
    debug!(backend = backend.name(), "multiply");
    backend.multiply(a, b)
}

impl<T> Matrix<T>
where
    T: Element + CheckedAdd + CheckedMul,
{
    /// Произведение с проверкой переполнения каждой ячейки
    pub fn checked_product(&self, other: &Matrix<T>) -> Result<Matrix<T>> {
        let len = check_shapes(self, other)?;
        let (m, inner, n) = (self.rows(), self.cols(), other.cols());
        let (a, b) = (self.as_slice(), other.as_slice());

        let mut c = Vec::with_capacity(len);
        for i in 0..m {
            for j in 0..n {
                let mut sum = T::zero();
                for k in 0..inner {
                    sum = a[i * inner + k]
                        .checked_mul(&b[k * n + j])
                        .and_then(|product| sum.checked_add(&product))
                        .ok_or(KernelError::Overflow { row: i, col: j })?;
                }
                c.push(sum);
            }
        }
        Matrix::new(m, n, c)
    }
}

/// Инициализирует пару квадратных матриц заданного типа и размера
///
/// Случайные значения берутся из `[0, bound)`. Для [`MatrixType::Identity`]
/// случайной заполняется только A, а B единичная.
pub fn initialize_matrices<R: Rng + ?Sized>(
    matrix_type: MatrixType,
    size: usize,
    bound: i64,
    rng: &mut R,
) -> Result<(Matrix<i64>, Matrix<i64>)> {
    if bound <= 0 {
        return Err(KernelError::Config(format!("value bound must be positive, got {bound}")));
    }
    let pair = match matrix_type {
        MatrixType::OnesAndTwos => (Matrix::filled(size, size, 1), Matrix::filled(size, size, 2)),
        MatrixType::ThreesAndFours => (Matrix::filled(size, size, 3), Matrix::filled(size, size, 4)),
        MatrixType::Identity => (random_matrix(size, bound, rng)?, Matrix::identity(size)),
        MatrixType::Random => (random_matrix(size, bound, rng)?, random_matrix(size, bound, rng)?),
    };
    Ok(pair)
}

fn random_matrix<R: Rng + ?Sized>(size: usize, bound: i64, rng: &mut R) -> Result<Matrix<i64>> {
    let data = (0..size * size).map(|_| rng.gen_range(0..bound)).collect();
    Matrix::square(size, data)
}

/// Итог поэлементного сравнения двух матриц
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    /// Число ячеек, разница в которых превышает допуск
    pub differing: usize,
    /// Максимальная абсолютная разница среди таких ячеек
    pub max_abs_diff: f64,
}

impl Comparison {
    pub fn matches(&self) -> bool {
        self.differing == 0
    }
}

/// Сравнивает результаты двух бэкендов с допуском `tolerance`
pub fn compare<T>(left: &Matrix<T>, right: &Matrix<T>, tolerance: f64) -> Result<Comparison>
where
    T: Copy + ToPrimitive,
{
    if left.rows() != right.rows() || left.cols() != right.cols() {
        return Err(KernelError::DimensionMismatch {
            left_rows: left.rows(),
            left_cols: left.cols(),
            right_rows: right.rows(),
            right_cols: right.cols(),
        });
    }

    let mut summary = Comparison { differing: 0, max_abs_diff: 0.0 };
    for (x, y) in left.as_slice().iter().zip(right.as_slice()) {
        let diff = match (x.to_f64(), y.to_f64()) {
            (Some(x), Some(y)) => (x - y).abs(),
            _ => f64::INFINITY,
        };
        if diff > tolerance {
            summary.differing += 1;
            summary.max_abs_diff = summary.max_abs_diff.max(diff);
        }
    }
    Ok(summary)
}
