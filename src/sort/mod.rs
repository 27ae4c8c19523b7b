//! Устойчивая сортировка слиянием
//!
//! Предоставляет:
//! - Рекурсивную сортировку диапазона `[low, high]` с буферами на каждое слияние
//! - Вариант с одним заранее выделенным буфером ([`MergeScratch`])
//! - Параллельный вариант на `rayon` ([`ParallelMergeSort`])
//!
//! Границы диапазона включительные. Левая половина получает лишний элемент
//! при нечетной длине: `mid = (low + high) / 2`.

mod merge;
mod parallel;
mod scratch;

use std::cmp::Ordering;

use tracing::debug;

use crate::error::{KernelError, Result};

pub use parallel::{ParallelMergeSort, DEFAULT_SEQUENTIAL_CUTOFF};
pub use scratch::MergeScratch;

/// Сортирует всю последовательность по возрастанию
pub fn merge_sort<T: Ord + Clone>(sequence: &mut [T]) {
    merge_sort_by(sequence, T::cmp);
}

/// Сортирует всю последовательность с заданным компаратором
pub fn merge_sort_by<T, F>(sequence: &mut [T], mut compare: F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    debug!(len = sequence.len(), "merge sort");
    sort_slice(sequence, &mut compare);
}

/// Сортирует включительный поддиапазон `[low, high]` по возрастанию
///
/// `low == high + 1` задает пустой диапазон. Диапазон за пределами
/// последовательности возвращает [`KernelError::InvalidRange`], последовательность
/// при этом не изменяется.
pub fn merge_sort_range<T: Ord + Clone>(sequence: &mut [T], low: usize, high: usize) -> Result<()> {
    merge_sort_range_by(sequence, low, high, T::cmp)
}

/// То же, что [`merge_sort_range`], но с заданным компаратором
pub fn merge_sort_range_by<T, F>(sequence: &mut [T], low: usize, high: usize, mut compare: F) -> Result<()>
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let range = checked_range(sequence.len(), low, high)?;
    debug!(low, high, len = sequence.len(), "merge sort over sub-range");
    sort_slice(&mut sequence[range], &mut compare);
    Ok(())
}

/// Проверяет `low <= high + 1 <= len` и возвращает полуоткрытый диапазон
pub(crate) fn checked_range(len: usize, low: usize, high: usize) -> Result<std::ops::Range<usize>> {
    let end = high.checked_add(1).filter(|&end| low <= end && end <= len);
    match end {
        Some(end) => Ok(low..end),
        None => Err(KernelError::InvalidRange { low, high, len }),
    }
}

/// Длина левой половины: для `[0, len - 1]` середина равна `(len - 1) / 2`
#[inline]
pub(crate) fn left_len(len: usize) -> usize {
    (len + 1) / 2
}

fn sort_slice<T, F>(slice: &mut [T], compare: &mut F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    if slice.len() < 2 {
        return;
    }
    let mid = left_len(slice.len());
    sort_slice(&mut slice[..mid], compare);
    sort_slice(&mut slice[mid..], compare);
    merge::merge(slice, mid, compare);
}
