//! Minimal object-lifetime ABI shim.
//!
//! Compiled object-oriented extension code links against a handful of
//! bookkeeping entry points that normally come with a full language runtime.
//! This module satisfies those link-time expectations without exception
//! unwinding or RTTI: a destruction-order identity token, dispatch guards
//! for non-instantiable virtual slots, a deliberately inert static-destructor
//! registrar, and never-returning termination primitives.
//!
//! The shim is process-wide and stateless apart from the write-once
//! terminator slot; concurrently loaded extensions all share it.

use crate::{ExportTableBuilder, Result, SymbolKind};
use core::ffi::{c_int, c_void};
use spin::Once;

static DSO_ANCHOR: u8 = 0;

/// Returns the process-wide destruction-order handle (`__dso_handle`).
///
/// The address is stable and unique for the lifetime of the image and is
/// only ever used as an opaque identity token by the object model's
/// destruction-ordering convention. It is never dereferenced.
#[inline]
pub fn dso_handle() -> *const () {
    core::ptr::from_ref(&DSO_ANCHOR).cast()
}

/// Dispatch guard for a pure virtual method slot (`__cxa_pure_virtual`).
///
/// Reaching this function is an unambiguous logic defect: the caller went
/// through a corrupted or stale vtable. The guard deliberately does nothing
/// and returns, keeping the original silent-continuation contract, but the
/// no-op is explicit here rather than implied: with the `log` feature the
/// event is reported at error level, and callers should treat it as
/// fatal-adjacent since no meaningful progress is possible afterwards.
pub extern "C" fn pure_virtual_trap() {
    #[cfg(feature = "log")]
    log::error!("pure virtual method slot invoked; vtable is corrupted or stale");
}

/// Dispatch guard for a deleted virtual method slot (`__cxa_deleted_virtual`).
///
/// Same contract as [`pure_virtual_trap`].
pub extern "C" fn deleted_virtual_trap() {
    #[cfg(feature = "log")]
    log::error!("deleted virtual method slot invoked; vtable is corrupted or stale");
}

/// Destructor signature expected by static-destructor registration.
pub type StaticDtor = unsafe extern "C" fn(*mut c_void);

/// Accepts a static-object destructor registration (`__cxa_atexit`) and
/// reports success without scheduling anything.
///
/// This is a documented contract, not an oversight: the host image never
/// terminates in the ordinary sense, so destructors registered for
/// static/global objects are never required to run. The registration is
/// acknowledged (return value 0) and `func` will never be invoked.
pub extern "C" fn register_static_dtor(
    _func: Option<StaticDtor>,
    _arg: *mut c_void,
    _dso: *mut c_void,
) -> c_int {
    0
}

/// Why a termination primitive was entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminateReason {
    /// `abort` was called.
    Abort,
    /// `exit` was called with the given status.
    Exit(c_int),
    /// `_exit` was called with the given status; cleanup hooks are skipped.
    ExitImmediate(c_int),
}

/// A host fatal/termination handler. Must never return.
pub type Terminator = fn(TerminateReason) -> !;

static TERMINATOR: Once<Terminator> = Once::new();

/// Installs the host termination handler. First install wins.
///
/// Returns whether this call installed the handler. Until one is installed,
/// the termination primitives park the calling CPU in a spin loop instead
/// of returning; there is nowhere better to go on an image without a fatal
/// handler, and returning would break the never-returns contract.
pub fn install_terminator(terminator: Terminator) -> bool {
    let mut installed = false;
    TERMINATOR.call_once(|| {
        installed = true;
        terminator
    });
    installed
}

fn terminate(reason: TerminateReason) -> ! {
    #[cfg(feature = "log")]
    log::error!("termination requested: {:?}", reason);
    match TERMINATOR.get() {
        Some(terminator) => terminator(reason),
        None => loop {
            core::hint::spin_loop();
        },
    }
}

extern "C" fn real_abort() -> ! {
    terminate(TerminateReason::Abort)
}

extern "C" fn real_exit(status: c_int) -> ! {
    terminate(TerminateReason::Exit(status))
}

extern "C" fn real_exit_immediate(status: c_int) -> ! {
    terminate(TerminateReason::ExitImmediate(status))
}

/// Trampoline for `abort`. Never returns.
pub extern "C" fn abort() -> ! {
    real_abort()
}

/// Trampoline for `exit`. Never returns.
pub extern "C" fn exit(status: c_int) -> ! {
    real_exit(status)
}

/// Trampoline for `_exit`. Never returns.
pub extern "C" fn exit_immediate(status: c_int) -> ! {
    real_exit_immediate(status)
}

/// Installs the shim surface in the export table.
///
/// The guards and the destructor registrar are direct exports (their own
/// addresses are host-resident), while the termination primitives follow
/// the same trampoline discipline as every other forwarded routine.
pub fn register(builder: &mut ExportTableBuilder) -> Result<()> {
    builder
        .export("__dso_handle", dso_handle(), SymbolKind::Data)?
        .export(
            "__cxa_pure_virtual",
            pure_virtual_trap as *const (),
            SymbolKind::Function,
        )?
        .export(
            "__cxa_deleted_virtual",
            deleted_virtual_trap as *const (),
            SymbolKind::Function,
        )?
        .export(
            "__cxa_atexit",
            register_static_dtor as *const (),
            SymbolKind::Function,
        )?
        .forward("abort", abort as *const (), real_abort as *const ())?
        .forward("exit", exit as *const (), real_exit as *const ())?
        .forward(
            "_exit",
            exit_immediate as *const (),
            real_exit_immediate as *const (),
        )?;
    Ok(())
}
