#![forbid(unsafe_op_in_unsafe_fn)]

//! C ABI exports for hosts that own the attachment memory (a wasm page or a
//! native staging buffer) and hand the kernel a raw pointer once per frame.
//!
//! Calls are unchecked in the same sense as [`Kernel::populate`]: the host
//! guarantees that `ptr..ptr + len` is valid, writable and not aliased for the
//! duration of the call. Null pointers are the only thing rejected here.

use std::ptr;
use std::slice;

use gbuffer_kernel::{
    CameraMatrices, FrameInputs, Kernel, KernelConfig, Mode, Resolution, SolidFill,
};

/// Bumped whenever a signature in [`GBufferExports`] changes.
pub const ABI_VERSION: u32 = 1;

/* =============================================================================================
   Helpers
   ============================================================================================= */

/// # Safety
/// `ptr` must be valid for `len` bytes of writes and unaliased for `'a`.
#[inline]
unsafe fn attachment<'a>(ptr: *mut u8, len: usize, call: &str) -> Option<&'a mut [u8]> {
    if ptr.is_null() {
        log::error!("{call}: null attachment pointer, nothing written");
        return None;
    }
    // SAFETY: non-null, and the caller vouches for the rest.
    Some(unsafe { slice::from_raw_parts_mut(ptr, len) })
}

/// Host buffers are always whole frames, so every pixel gets written even when
/// the count is not a multiple of four.
#[inline]
fn config_for(mode: Mode) -> KernelConfig {
    let mut config = KernelConfig::default().with_mode(mode);
    config.finish_tail = true;
    config
}

#[inline]
fn kernel_for(mode: Mode) -> Kernel {
    Kernel::new(config_for(mode))
}

/* =============================================================================================
   Exports
   ============================================================================================= */

/// Mode A. There is no resolution argument; the buffer is treated as one row.
///
/// # Safety
/// `ptr` must be valid for `len` bytes of writes.
#[no_mangle]
pub unsafe extern "C" fn gbuffer_populate_gradient(ptr: *mut u8, len: usize, frame_index: u32) {
    // SAFETY: forwarded caller contract.
    let Some(buf) = (unsafe { attachment(ptr, len, "gbuffer_populate_gradient") }) else {
        return;
    };
    let resolution = Resolution::row((len / 4) as u32);
    kernel_for(Mode::Gradient).populate(buf, &FrameInputs::new(frame_index, resolution));
}

/// Mode B.
///
/// # Safety
/// `ptr` must be valid for `len` bytes of writes.
#[no_mangle]
pub unsafe extern "C" fn gbuffer_populate_uv(
    ptr: *mut u8,
    len: usize,
    frame_index: u32,
    width: u32,
    height: u32,
) {
    // SAFETY: forwarded caller contract.
    let Some(buf) = (unsafe { attachment(ptr, len, "gbuffer_populate_uv") }) else {
        return;
    };
    let frame = FrameInputs::new(frame_index, Resolution::new(width, height));
    kernel_for(Mode::Uv).populate(buf, &frame);
}

/// Mode C.
///
/// `resolution` points at `[width, height]`; `camera` at the 96-float bundle in
/// upload order.
///
/// # Safety
/// `ptr` must be valid for `len` bytes of writes, `resolution` for two `u32`
/// reads and `camera` for [`CameraMatrices::FLOATS`] `f32` reads, all suitably
/// aligned.
#[no_mangle]
pub unsafe extern "C" fn gbuffer_populate_ray_direction(
    ptr: *mut u8,
    len: usize,
    frame_index: u32,
    resolution: *const u32,
    camera: *const f32,
) {
    const CALL: &str = "gbuffer_populate_ray_direction";
    if resolution.is_null() {
        log::error!("{CALL}: null resolution pointer, nothing written");
        return;
    }
    if camera.is_null() {
        log::error!("{CALL}: null camera pointer, nothing written");
        return;
    }
    // SAFETY: forwarded caller contract.
    let Some(buf) = (unsafe { attachment(ptr, len, CALL) }) else {
        return;
    };

    // SAFETY: non-null; the caller vouches for two readable u32.
    let [width, height] = unsafe { ptr::read(resolution.cast::<[u32; 2]>()) };
    // SAFETY: non-null; the caller vouches for FLOATS readable f32.
    let floats = unsafe { slice::from_raw_parts(camera, CameraMatrices::FLOATS) };
    let matrices = match CameraMatrices::from_f32_slice(floats) {
        Ok(m) => m,
        Err(e) => {
            log::error!("{CALL}: {e}");
            return;
        }
    };

    let frame = FrameInputs::new(frame_index, Resolution::new(width, height)).with_camera(matrices);
    kernel_for(Mode::RayDirection).populate(buf, &frame);
}

/// Mode D with no x ramp. `rgba` is little-endian: red in the low byte.
///
/// # Safety
/// `ptr` must be valid for `len` bytes of writes.
#[no_mangle]
pub unsafe extern "C" fn gbuffer_populate_solid(
    ptr: *mut u8,
    len: usize,
    frame_index: u32,
    width: u32,
    height: u32,
    rgba: u32,
) {
    // SAFETY: forwarded caller contract.
    let Some(buf) = (unsafe { attachment(ptr, len, "gbuffer_populate_solid") }) else {
        return;
    };
    let mut config = config_for(Mode::Solid);
    config.solid = SolidFill {
        rgba: rgba.to_le_bytes(),
        x_gradient: None,
    };
    let frame = FrameInputs::new(frame_index, Resolution::new(width, height));
    Kernel::new(config).populate(buf, &frame);
}

/// Zeroed host-visible allocation for an attachment. Returns null for `len == 0`.
#[no_mangle]
pub extern "C" fn gbuffer_alloc(len: usize) -> *mut u8 {
    if len == 0 {
        return ptr::null_mut();
    }
    let boxed = vec![0u8; len].into_boxed_slice();
    Box::into_raw(boxed).cast::<u8>()
}

/// Releases memory from [`gbuffer_alloc`].
///
/// # Safety
/// `ptr` must come from `gbuffer_alloc(len)` with the same `len`, and must not be
/// used afterwards.
#[no_mangle]
pub unsafe extern "C" fn gbuffer_free(ptr: *mut u8, len: usize) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: reconstructs exactly the box handed out by gbuffer_alloc.
    drop(unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(ptr, len)) });
}

/* =============================================================================================
   Function table
   ============================================================================================= */

pub type PopulateGradientFn = unsafe extern "C" fn(*mut u8, usize, u32);
pub type PopulateUvFn = unsafe extern "C" fn(*mut u8, usize, u32, u32, u32);
pub type PopulateRayDirectionFn = unsafe extern "C" fn(*mut u8, usize, u32, *const u32, *const f32);
pub type PopulateSolidFn = unsafe extern "C" fn(*mut u8, usize, u32, u32, u32, u32);
pub type AllocFn = extern "C" fn(usize) -> *mut u8;
pub type FreeFn = unsafe extern "C" fn(*mut u8, usize);

/// Everything a dynamically loading host needs, behind one symbol.
#[repr(C)]
pub struct GBufferExports {
    pub abi_version: u32,
    pub populate_gradient: PopulateGradientFn,
    pub populate_uv: PopulateUvFn,
    pub populate_ray_direction: PopulateRayDirectionFn,
    pub populate_solid: PopulateSolidFn,
    pub alloc: AllocFn,
    pub free: FreeFn,
}

static EXPORTS: GBufferExports = GBufferExports {
    abi_version: ABI_VERSION,
    populate_gradient: gbuffer_populate_gradient,
    populate_uv: gbuffer_populate_uv,
    populate_ray_direction: gbuffer_populate_ray_direction,
    populate_solid: gbuffer_populate_solid,
    alloc: gbuffer_alloc,
    free: gbuffer_free,
};

#[no_mangle]
pub extern "C" fn gbuffer_exports() -> *const GBufferExports {
    &EXPORTS
}
