//! Модуль для работы с OpenCL
//!
//! Содержит низкоуровневые привязки и безопасную обертку для запуска
//! ядра умножения матриц на устройстве.

pub mod bindings;
pub mod types;

/// Вызов OpenCL, возвращающий код статуса, как `Result<()>`
macro_rules! cl_check {
    ($func:ident($($arg:expr),* $(,)?)) => {{
        let code = unsafe { $func($($arg),*) };
        if code == $crate::opencl::types::CL_SUCCESS {
            Ok(())
        } else {
            Err($crate::error::KernelError::Backend { call: stringify!($func), code })
        }
    }};
}

/// Вызов OpenCL, создающий объект; код ошибки передается последним аргументом
macro_rules! cl_create {
    ($func:ident($($arg:expr),* $(,)?)) => {{
        let mut code: $crate::opencl::types::cl_int = $crate::opencl::types::CL_SUCCESS;
        let obj = unsafe { $func($($arg,)* &mut code) };
        if obj.is_null() || code != $crate::opencl::types::CL_SUCCESS {
            Err($crate::error::KernelError::Backend { call: stringify!($func), code })
        } else {
            Ok(obj)
        }
    }};
}

mod multiplier;

pub use multiplier::OpenClMultiplier;
