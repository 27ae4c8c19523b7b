//! Сортировка слиянием с одним переиспользуемым буфером

use std::cmp::Ordering;

use tracing::debug;

use super::{checked_range, left_len, merge::merge_into};
use crate::error::Result;

/// Буфер, общий для всех слияний одной сортировки
///
/// Выделяется один раз под длину сортируемой последовательности и
/// переиспользуется между вызовами. Результат совпадает с [`super::merge_sort`].
#[derive(Debug)]
pub struct MergeScratch<T> {
    buffer: Vec<T>,
}

impl<T> Default for MergeScratch<T> {
    fn default() -> Self {
        Self { buffer: Vec::new() }
    }
}

impl<T: Clone> MergeScratch<T> {
    /// Создает буфер с запасом на `capacity` элементов
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buffer: Vec::with_capacity(capacity) }
    }

    /// Текущая емкость буфера
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn sort(&mut self, sequence: &mut [T])
    where
        T: Ord,
    {
        self.sort_by(sequence, T::cmp);
    }

    pub fn sort_by<F>(&mut self, sequence: &mut [T], mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.reserve(sequence.len());
        self.sort_slice(sequence, &mut compare);
    }

    /// Сортирует включительный поддиапазон `[low, high]`
    pub fn sort_range(&mut self, sequence: &mut [T], low: usize, high: usize) -> Result<()>
    where
        T: Ord,
    {
        self.sort_range_by(sequence, low, high, T::cmp)
    }

    pub fn sort_range_by<F>(&mut self, sequence: &mut [T], low: usize, high: usize, mut compare: F) -> Result<()>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let range = checked_range(sequence.len(), low, high)?;
        self.reserve(range.len());
        self.sort_slice(&mut sequence[range], &mut compare);
        Ok(())
    }

    fn reserve(&mut self, len: usize) {
        if self.buffer.capacity() < len {
            debug!(len, "growing merge scratch buffer");
            self.buffer.reserve(len - self.buffer.len());
        }
    }

    fn sort_slice<F>(&mut self, slice: &mut [T], compare: &mut F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        if slice.len() < 2 {
            return;
        }
        let mid = left_len(slice.len());
        self.sort_slice(&mut slice[..mid], compare);
        self.sort_slice(&mut slice[mid..], compare);

        self.buffer.clear();
        self.buffer.extend_from_slice(slice);
        let (left, right) = self.buffer.split_at(mid);
        merge_into(slice, left, right, compare);
    }
}
