//! The export catalog: which names a given host build offers.
//!
//! Conditional symbol membership is modeled as compile-time feature
//! composition. Each subsystem contributes a [`Group`] manifest, gated by
//! the cargo feature that stands in for the host's build configuration
//! flag; [`enabled`] assembles the active set for this image build. A
//! disabled subsystem contributes zero names, so an extension referencing
//! one fails resolution at the loader instead of silently linking to a
//! stray address.
//!
//! The manifests are names only. The addresses behind them are wired by the
//! host through [`forwarded_exports!`](crate::forwarded_exports) and
//! [`export_symbols!`](crate::export_symbols), and
//! [`ExportTable::audit`](crate::ExportTable::audit) checks the two against
//! each other at initialization.

use alloc::vec::Vec;

/// A named set of exports contributed by one host subsystem.
#[derive(Debug)]
pub struct Group {
    /// Subsystem name, for diagnostics.
    pub name: &'static str,
    /// Public names the subsystem exports.
    pub symbols: &'static [&'static str],
    /// Whether each name is a trampoline with a `__real_` alias behind it.
    pub forwarded: bool,
}

/// The closed set of libc routines reachable from extension code.
///
/// Precompiled toolchain libraries call these by name with short-range
/// direct relocations, so every one of them goes through a trampoline.
pub static LIBC: Group = Group {
    name: "libc",
    symbols: &[
        // string.h
        "memcpy", "memmove", "strlen", "strnlen", "strchr", "strrchr", "strstr", "strcmp",
        "strncmp", "strcasecmp", "strncpy", "strcat",
        // stdlib.h - conversion
        "strtod", "strtol", "strtoul", "atoi", "atof", "atol",
        // stdlib.h - memory
        "malloc", "realloc", "calloc", "free",
        // stdlib.h - random
        "rand", "srand",
        // ctype.h
        "isspace", "isalnum", "tolower", "toupper", "isalpha", "iscntrl", "isdigit", "isgraph",
        "isprint", "isupper", "islower", "isxdigit",
        // math.h
        "acos", "asin", "atan", "cos", "exp", "exp2", "log", "log2", "log10", "sin", "sqrt",
        "tan", "acosf", "asinf", "atanf", "cosf", "logf", "sinf", "sqrtf", "tanf", "atan2",
        "pow", "atan2f",
        // stdio.h
        "puts", "putchar", "vsnprintf",
        // process control
        "atexit", "abort", "exit", "_exit",
    ],
    forwarded: true,
};

/// Kernel primitives and formatted-output routines exported directly.
///
/// Their addresses are host-resident already, so no trampoline is needed.
pub static KERNEL: Group = Group {
    name: "kernel",
    symbols: &[
        "k_malloc",
        "k_free",
        "k_sched_lock",
        "k_sched_unlock",
        "k_timer_init",
        "k_fatal_halt",
        "k_work_schedule",
        "sys_clock_cycle_get_32",
        "printf",
        "sprintf",
        "snprintf",
        "sscanf",
    ],
    forwarded: false,
};

/// The object-lifetime ABI shim surface, always present.
///
/// The termination trio (`abort`, `exit`, `_exit`) is part of [`LIBC`];
/// this group carries the bookkeeping entries only.
pub static SHIM: Group = Group {
    name: "abi",
    symbols: &[
        "__dso_handle",
        "__cxa_pure_virtual",
        "__cxa_deleted_virtual",
        "__cxa_atexit",
    ],
    forwarded: false,
};

#[cfg(feature = "net")]
pub static NET: Group = Group {
    name: "net",
    symbols: &[
        "socket",
        "connect",
        "send",
        "recv",
        "open",
        "close",
        "accept",
        "bind",
        "listen",
        "sendto",
        "recvfrom",
        "setsockopt",
        "getpeername",
        "inet_pton",
        "inet_ntop",
        "getaddrinfo",
        "freeaddrinfo",
    ],
    forwarded: false,
};

#[cfg(feature = "bluetooth")]
pub static BLUETOOTH: Group = Group {
    name: "bluetooth",
    symbols: &[
        "bt_enable_raw",
        "bt_send",
        "bt_buf_get_tx",
        "net_buf_unref",
        "net_buf_simple_pull",
        "net_buf_simple_add_mem",
        "net_buf_simple_pull_mem",
    ],
    forwarded: false,
};

#[cfg(feature = "usb")]
pub static USB: Group = Group {
    name: "usb",
    symbols: &["usb_enable", "usb_disable"],
    forwarded: false,
};

#[cfg(feature = "flash")]
pub static FLASH: Group = Group {
    name: "flash",
    symbols: &[
        "flash_area_open",
        "flash_area_read",
        "flash_area_write",
        "flash_area_erase",
        "flash_area_close",
    ],
    forwarded: false,
};

#[cfg(feature = "fs")]
pub static FS: Group = Group {
    name: "fs",
    symbols: &[
        "fs_open", "fs_close", "fs_unlink", "fs_rename", "fs_read", "fs_write", "fs_seek",
        "fs_tell", "fs_truncate", "fs_sync", "fs_mkdir", "fs_opendir", "fs_readdir",
        "fs_closedir", "fs_mount", "fs_unmount", "fs_stat", "fs_statvfs",
    ],
    forwarded: false,
};

#[cfg(feature = "matrix")]
pub static MATRIX: Group = Group {
    name: "matrix",
    symbols: &[
        "matrixBegin",
        "matrixWrite",
        "matrixPlay",
        "matrixGrayscaleWrite",
        "matrixSetGrayscaleBits",
        "matrixEnd",
    ],
    forwarded: false,
};

#[cfg(feature = "logging")]
pub static LOGGING: Group = Group {
    name: "logging",
    symbols: &["z_log_msg_runtime_vcreate"],
    forwarded: false,
};

/// Composes the export groups active for this build configuration.
///
/// Determined once at build time by cargo features and therefore a strict,
/// fixed subset of the full catalog for the lifetime of the image.
pub fn enabled() -> Vec<&'static Group> {
    #[allow(unused_mut)]
    let mut groups = alloc::vec![&LIBC, &KERNEL, &SHIM];
    #[cfg(feature = "net")]
    groups.push(&NET);
    #[cfg(feature = "bluetooth")]
    groups.push(&BLUETOOTH);
    #[cfg(feature = "usb")]
    groups.push(&USB);
    #[cfg(feature = "flash")]
    groups.push(&FLASH);
    #[cfg(feature = "fs")]
    groups.push(&FS);
    #[cfg(feature = "matrix")]
    groups.push(&MATRIX);
    #[cfg(feature = "logging")]
    groups.push(&LOGGING);
    groups
}
