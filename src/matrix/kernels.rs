//! OpenCL ядра для матричных операций

/// Имя точки входа ядра умножения
pub const MATRIX_MULTIPLY_ENTRY: &str = "multiply_i64";

/// Исходный код ядра умножения целочисленных матриц
///
/// Один рабочий элемент на ячейку C: глобальный индекс (row, col),
/// свертка по k выполняется внутри элемента.
pub static MATRIX_MULTIPLY_KERNEL: &str = r#"
__kernel void multiply_i64(
    __global const long* a,
    __global const long* b,
    __global long* c,
    const int rows,
    const int inner,
    const int cols
) {
    const int row = get_global_id(0);
    const int col = get_global_id(1);
    if (row >= rows || col >= cols) {
        return;
    }

    long sum = 0;
    for (int k = 0; k < inner; k++) {
        sum += a[row * inner + k] * b[k * cols + col];
    }
    c[row * cols + col] = sum;
}
"#;
