//! Умножение целочисленных матриц на OpenCL-устройстве

use std::ffi::{c_void, CString};
use std::mem::size_of;
use std::ptr;

use tracing::{debug, warn};

use super::bindings::*;
use super::types::*;
use crate::error::{KernelError, Result};
use crate::matrix::backend::{check_shapes, MultiplyBackend};
use crate::matrix::kernels::{MATRIX_MULTIPLY_ENTRY, MATRIX_MULTIPLY_KERNEL};
use crate::matrix::Matrix;

/// Скомпилированное ядро умножения вместе с контекстом и очередью команд
///
/// Все объекты OpenCL освобождаются в `Drop`.
pub struct OpenClMultiplier {
    device: cl_device_id,
    context: cl_context,
    command_queue: cl_command_queue,
    program: cl_program,
    kernel: cl_kernel,
}

/// Буфер устройства, освобождаемый при выходе из области видимости
struct DeviceBuffer(cl_mem);

impl Drop for DeviceBuffer {
    fn drop(&mut self) {
        unsafe {
            clReleaseMemObject(self.0);
        }
    }
}

impl OpenClMultiplier {
    /// Выбирает GPU первой платформы (или CPU, если GPU нет) и собирает ядро
    pub fn new() -> Result<Self> {
        let mut platform: cl_platform_id = ptr::null_mut();
        let mut num_platforms: cl_uint = 0;
        cl_check!(clGetPlatformIDs(1, &mut platform, &mut num_platforms))?;
        if num_platforms == 0 {
            return Err(KernelError::BackendMessage("no OpenCL platform found".to_string()));
        }

        let device = Self::pick_device(platform)?;

        let context = cl_create!(clCreateContext(ptr::null(), 1, &device, None, ptr::null_mut()))?;
        let command_queue = match cl_create!(clCreateCommandQueue(context, device, 0)) {
            Ok(queue) => queue,
            Err(e) => {
                unsafe { clReleaseContext(context) };
                return Err(e);
            }
        };

        // Дальше частично созданные объекты освобождает Drop
        let mut multiplier = Self {
            device,
            context,
            command_queue,
            program: ptr::null_mut(),
            kernel: ptr::null_mut(),
        };
        multiplier.build()?;
        debug!("OpenCL multiply kernel ready");
        Ok(multiplier)
    }

    fn pick_device(platform: cl_platform_id) -> Result<cl_device_id> {
        let mut device: cl_device_id = ptr::null_mut();
        let mut num_devices: cl_uint = 0;
        let gpu = cl_check!(clGetDeviceIDs(platform, CL_DEVICE_TYPE_GPU, 1, &mut device, &mut num_devices));
        if gpu.is_ok() && num_devices > 0 {
            return Ok(device);
        }

        warn!("no OpenCL GPU device, falling back to CPU device");
        cl_check!(clGetDeviceIDs(platform, CL_DEVICE_TYPE_CPU, 1, &mut device, &mut num_devices))?;
        Ok(device)
    }

    fn build(&mut self) -> Result<()> {
        let source = MATRIX_MULTIPLY_KERNEL.as_ptr() as *const std::ffi::c_char;
        let length = MATRIX_MULTIPLY_KERNEL.len();
        self.program = cl_create!(clCreateProgramWithSource(self.context, 1, &source, &length))?;

        if let Err(e) = cl_check!(clBuildProgram(self.program, 1, &self.device, ptr::null(), None, ptr::null_mut())) {
            let log = self.build_log().unwrap_or_default();
            return Err(KernelError::BackendMessage(format!("{e}; build log:\n{log}")));
        }

        let entry = CString::new(MATRIX_MULTIPLY_ENTRY)
            .map_err(|e| KernelError::BackendMessage(e.to_string()))?;
        self.kernel = cl_create!(clCreateKernel(self.program, entry.as_ptr()))?;
        Ok(())
    }

    fn build_log(&self) -> Result<String> {
        let mut log_size = 0usize;
        cl_check!(clGetProgramBuildInfo(
            self.program,
            self.device,
            CL_PROGRAM_BUILD_LOG,
            0,
            ptr::null_mut(),
            &mut log_size
        ))?;

        let mut log = vec![0u8; log_size];
        cl_check!(clGetProgramBuildInfo(
            self.program,
            self.device,
            CL_PROGRAM_BUILD_LOG,
            log_size,
            log.as_mut_ptr() as *mut c_void,
            ptr::null_mut()
        ))?;
        Ok(String::from_utf8_lossy(&log).trim_end_matches('\0').to_string())
    }

    fn input_buffer(&self, data: &[i64]) -> Result<DeviceBuffer> {
        let mem = cl_create!(clCreateBuffer(
            self.context,
            CL_MEM_READ_ONLY | CL_MEM_COPY_HOST_PTR,
            data.len() * size_of::<i64>(),
            data.as_ptr() as *mut c_void
        ))?;
        Ok(DeviceBuffer(mem))
    }

    fn set_arg<V>(&self, index: cl_uint, value: &V) -> Result<()> {
        cl_check!(clSetKernelArg(self.kernel, index, size_of::<V>(), value as *const V as *const c_void))
    }
}

/// Размеры для ядра: индексы `row * inner`, `k * cols` и `row * cols`
/// вычисляются в `int`, поэтому все три произведения должны умещаться в `i32`
fn kernel_dims(m: usize, inner: usize, n: usize) -> Result<[i32; 3]> {
    let fits = |x: usize, y: usize| x.checked_mul(y).is_some_and(|p| i32::try_from(p).is_ok());
    if !(fits(m, inner) && fits(inner, n) && fits(m, n)) {
        return Err(KernelError::BackendMessage(format!(
            "{m}x{inner} * {inner}x{n} exceeds kernel index range"
        )));
    }
    // каждый множитель не больше произведения, уже проверенного выше
    let dim = |x: usize| i32::try_from(x).unwrap_or(i32::MAX);
    Ok([dim(m), dim(inner), dim(n)])
}

impl MultiplyBackend<i64> for OpenClMultiplier {
    fn name(&self) -> &'static str {
        "opencl"
    }

    fn multiply(&self, a: &Matrix<i64>, b: &Matrix<i64>) -> Result<Matrix<i64>> {
        let len = check_shapes(a, b)?;
        let (m, inner, n) = (a.rows(), a.cols(), b.cols());
        // OpenCL не допускает буферов и диапазонов нулевого размера
        if m == 0 || inner == 0 || n == 0 {
            return Ok(Matrix::zeros(m, n));
        }
        let dims = kernel_dims(m, inner, n)?;
        debug!(m, k = inner, n, "opencl multiply");

        let a_buffer = self.input_buffer(a.as_slice())?;
        let b_buffer = self.input_buffer(b.as_slice())?;
        let c_buffer = DeviceBuffer(cl_create!(clCreateBuffer(
            self.context,
            CL_MEM_WRITE_ONLY,
            len * size_of::<i64>(),
            ptr::null_mut()
        ))?);

        self.set_arg(0, &a_buffer.0)?;
        self.set_arg(1, &b_buffer.0)?;
        self.set_arg(2, &c_buffer.0)?;
        for (offset, dim) in dims.iter().enumerate() {
            self.set_arg(3 + offset as cl_uint, dim)?;
        }

        let global_size = [m, n];
        cl_check!(clEnqueueNDRangeKernel(
            self.command_queue,
            self.kernel,
            2,
            ptr::null(),
            global_size.as_ptr(),
            ptr::null(),
            0,
            ptr::null(),
            ptr::null_mut()
        ))?;
        cl_check!(clFinish(self.command_queue))?;

        let mut c = vec![0i64; len];
        cl_check!(clEnqueueReadBuffer(
            self.command_queue,
            c_buffer.0,
            CL_TRUE,
            0,
            c.len() * size_of::<i64>(),
            c.as_mut_ptr() as *mut c_void,
            0,
            ptr::null(),
            ptr::null_mut()
        ))?;

        Matrix::new(m, n, c)
    }
}

impl Drop for OpenClMultiplier {
    fn drop(&mut self) {
        unsafe {
            if !self.kernel.is_null() {
                clReleaseKernel(self.kernel);
            }
            if !self.program.is_null() {
                clReleaseProgram(self.program);
            }
            clReleaseCommandQueue(self.command_queue);
            clReleaseContext(self.context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Sequential;

    // Требует установленный OpenCL-драйвер
    #[test]
    #[ignore]
    fn matches_sequential_backend() {
        let backend = OpenClMultiplier::new().unwrap();
        let a = Matrix::new(17, 9, (0..153).collect::<Vec<i64>>()).unwrap();
        let b = Matrix::new(9, 13, (0..117).map(|x| 50 - x).collect::<Vec<i64>>()).unwrap();
        assert_eq!(backend.multiply(&a, &b).unwrap(), Sequential.multiply(&a, &b).unwrap());
    }

    #[test]
    fn kernel_dimensions_fit_i32() {
        assert_eq!(kernel_dims(100, 100, 100).unwrap(), [100, 100, 100]);
        assert!(kernel_dims(usize::MAX, 1, 1).is_err());
    }

    #[test]
    fn kernel_index_products_fit_i32() {
        // каждый размер по отдельности умещается в i32, произведения нет
        assert!(kernel_dims(50_000, 50_000, 1).is_err());
        assert!(kernel_dims(1, 50_000, 50_000).is_err());
        assert!(kernel_dims(50_000, 1, 50_000).is_err());
        assert!(kernel_dims(40_000, 50_000, 1).is_ok());
    }
}
