//! Типы матриц и связанные структуры

use std::fmt::Debug;
use std::ops::{Index, IndexMut};

use ndarray::Array2;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};

/// Тип элемента, допустимый для матричного умножения
pub trait Element: Copy + Debug + PartialEq + Zero + std::ops::Mul<Output = Self> + Send + Sync + 'static {}

impl<T> Element for T where T: Copy + Debug + PartialEq + Zero + std::ops::Mul<Output = Self> + Send + Sync + 'static {}

/// Способ заполнения входных матриц
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MatrixType {
    /// A заполнена 1, B заполнена 2
    OnesAndTwos,
    /// A заполнена 3, B заполнена 4
    ThreesAndFours,
    /// Случайная A, единичная B: произведение равно A
    Identity,
    /// Случайные значения в `[0, bound)`
    Random,
}

/// Плотная матрица в построчном (row-major) порядке
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> Matrix<T> {
    /// Создает матрицу из буфера длины `rows * cols`
    pub fn new(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        match rows.checked_mul(cols) {
            Some(len) if len == data.len() => Ok(Self { rows, cols, data }),
            _ => Err(KernelError::BufferSize { rows, cols, got: data.len() }),
        }
    }

    /// Квадратная матрица N×N из буфера длины N²
    pub fn square(n: usize, data: Vec<T>) -> Result<Self> {
        Self::new(n, n, data)
    }

    /// Собирает матрицу из строк одинаковой длины
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let total: usize = rows.iter().map(Vec::len).sum();
        if rows.iter().any(|row| row.len() != n_cols) {
            return Err(KernelError::BufferSize { rows: n_rows, cols: n_cols, got: total });
        }
        Self::new(n_rows, n_cols, rows.into_iter().flatten().collect())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Элемент (row, col) или `None` за пределами матрицы
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row < self.rows && col < self.cols {
            self.data.get_mut(row * self.cols + col)
        } else {
            None
        }
    }

    /// Строка `row` целиком
    pub fn row(&self, row: usize) -> Option<&[T]> {
        (row < self.rows).then(|| &self.data[row * self.cols..(row + 1) * self.cols])
    }

    /// Строки по порядку; при `cols == 0` каждая строка пуста
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> {
        (0..self.rows).map(move |row| &self.data[row * self.cols..(row + 1) * self.cols])
    }
}

impl<T: Clone + Zero> Matrix<T> {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { rows, cols, data: vec![T::zero(); rows * cols] }
    }

    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self { rows, cols, data: vec![value; rows * cols] }
    }
}

impl<T: Clone + Zero + One> Matrix<T> {
    /// Единичная матрица N×N
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = T::one();
        }
        m
    }
}

impl<T: Clone> Matrix<T> {
    pub fn to_ndarray(&self) -> Array2<T> {
        Array2::from_shape_fn((self.rows, self.cols), |(i, j)| self.data[i * self.cols + j].clone())
    }

    pub fn from_ndarray(array: &Array2<T>) -> Self {
        let (rows, cols) = array.dim();
        Self { rows, cols, data: array.iter().cloned().collect() }
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(row < self.rows && col < self.cols, "index ({row}, {col}) out of bounds for {}x{}", self.rows, self.cols);
        &self.data[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(row < self.rows && col < self.cols, "index ({row}, {col}) out of bounds for {}x{}", self.rows, self.cols);
        &mut self.data[row * self.cols + col]
    }
}
