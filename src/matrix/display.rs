//! Табличный вывод матриц и последовательностей

use std::fmt::Display;

use prettytable::format::consts::FORMAT_CLEAN;
use prettytable::{Cell, Row, Table};

use super::types::Matrix;

const ELLIPSIS: &str = "...";

/// Строит таблицу из левого верхнего угла `preview × preview`
///
/// `None` выводит матрицу целиком. Обрезанные строки и столбцы
/// обозначаются многоточием, как в отчете о GPU-вычислениях.
pub fn matrix_table<T: Display>(matrix: &Matrix<T>, preview: Option<usize>) -> Table {
    let shown_rows = preview.map_or(matrix.rows(), |p| p.min(matrix.rows()));
    let shown_cols = preview.map_or(matrix.cols(), |p| p.min(matrix.cols()));
    let cut_cols = shown_cols < matrix.cols();

    let mut table = Table::new();
    table.set_format(*FORMAT_CLEAN);
    for row in matrix.iter_rows().take(shown_rows) {
        let mut cells: Vec<Cell> = row[..shown_cols]
            .iter()
            .map(|value| Cell::new(&value.to_string()).style_spec("r"))
            .collect();
        if cut_cols {
            cells.push(Cell::new(ELLIPSIS));
        }
        table.add_row(Row::new(cells));
    }
    if shown_rows < matrix.rows() {
        table.add_row(Row::new(vec![Cell::new(ELLIPSIS)]));
    }
    table
}

/// Таблица «индекс / значение» для последовательности
pub fn sequence_table<T: Display>(title: &str, values: &[T]) -> Table {
    let mut table = Table::new();
    table.set_titles(Row::new(vec![Cell::new(title).style_spec("bc"), Cell::new("")]));
    for (index, value) in values.iter().enumerate() {
        table.add_row(Row::new(vec![
            Cell::new(&format!("[{index}]")),
            Cell::new(&value.to_string()).style_spec("r"),
        ]));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_matrix_has_all_rows() {
        let m = Matrix::from_rows(vec![vec![1, 20], vec![300, 4]]).unwrap();
        let table = matrix_table(&m, None);
        assert_eq!(table.len(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("300"));
        assert!(!rendered.contains(ELLIPSIS));
    }

    #[test]
    fn preview_truncates_with_ellipsis() {
        let m = Matrix::new(5, 5, (0..25).collect::<Vec<i64>>()).unwrap();
        let table = matrix_table(&m, Some(2));
        // две строки данных и строка с многоточием
        assert_eq!(table.len(), 3);
        let rendered = table.to_string();
        assert!(rendered.contains(ELLIPSIS));
        assert!(!rendered.contains("24"));
    }

    #[test]
    fn sequence_table_lists_every_value() {
        let table = sequence_table("sorted", &[3, 1, 2]);
        assert_eq!(table.len(), 3);
        assert!(table.to_string().contains("[2]"));
    }
}
