//! Устойчивая сортировка слиянием и параллельное умножение матриц
//!
//! Два независимых ядра:
//! - [`sort`]: рекурсивная сортировка слиянием поддиапазона на месте
//! - [`matrix`]: произведение матриц с независимыми ячейками и сменными бэкендами
//!
//! OpenCL-бэкенд подключается feature `opencl`.

pub mod config;
pub mod error;
pub mod matrix;
pub mod sort;
pub mod utils;
#[cfg(feature = "opencl")]
pub mod opencl;

// Реэкспорт основных типов для удобства
pub use error::{KernelError, Result};
pub use matrix::{multiply, BackendKind, Matrix, MatrixType, MultiplyBackend};
pub use sort::{merge_sort, merge_sort_by, merge_sort_range, merge_sort_range_by, MergeScratch, ParallelMergeSort};
