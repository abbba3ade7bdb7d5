//! The long-call trampoline layer.
//!
//! Extension modules are compiled ahead of time with direct-call relocations
//! to well-known routine names. Direct branch encodings carry a fixed signed
//! displacement ([`DIRECT_CALL_RANGE`]), and the loader places extension code
//! wherever memory is available, not wherever those branches can reach. The
//! fix is structural rather than detected after the fact: the public name is
//! redefined as a forwarding stub that lives in the host's statically linked
//! image (hence always reachable from anything resolved against that image),
//! while the true implementation is exported only under its `__real_` alias.
//!
//! [`forwarded_exports!`] declares such stubs. Each wrapper reproduces the
//! exact parameter list and return type of its target and forwards every
//! argument unmodified, in order, with no interposition logic; signature
//! equality between stub and target is enforced by construction, since the
//! declared signature types both the wrapper and the call it makes. Any
//! failure belongs to the forwarded routine.

use alloc::{format, string::String};

/// Maximum displacement a short direct call/branch encoding can express.
///
/// 16 MiB, matching the ±16 MiB window of the direct-branch instruction
/// forms the extension toolchain emits.
pub const DIRECT_CALL_RANGE: usize = 16 * 1024 * 1024;

/// Prefix under which a forwarded routine's true implementation is exported.
///
/// The public (unprefixed) name is owned by the trampoline, so a direct,
/// range-risking reference to the implementation is never resolvable.
pub const REAL_PREFIX: &str = "__real_";

/// Returns whether a direct call at `from` can reach `to`.
#[inline]
pub fn in_direct_call_range(from: usize, to: usize) -> bool {
    from.abs_diff(to) <= DIRECT_CALL_RANGE
}

/// Builds the `__real_` alias for a public routine name.
#[inline]
pub fn real_alias(public: &str) -> String {
    format!("{REAL_PREFIX}{public}")
}

/// Strips the `__real_` prefix, returning the public name of an alias.
#[inline]
pub fn public_name(alias: &str) -> Option<&str> {
    alias.strip_prefix(REAL_PREFIX)
}

/// Declares a module of long-call trampolines and their lock-step exports.
///
/// For every routine the macro emits a `pub extern "C"` pass-through wrapper
/// with the declared signature, a `NAMES` manifest, and a `register` function
/// that installs each wrapper/target pair through
/// [`ExportTableBuilder::forward`](crate::ExportTableBuilder::forward) as a
/// single declared unit.
///
/// Targets must be spelled as full paths (`crate::...` or `super::...`)
/// because they are resolved inside the generated module; the same applies
/// to any non-primitive parameter type.
///
/// # Examples
/// ```rust
/// mod host {
///     pub extern "C" fn ticks() -> u64 {
///         1
///     }
/// }
///
/// extlink::forwarded_exports! {
///     pub mod forwards {
///         fn ticks() -> u64 = crate::host::ticks;
///     }
/// }
///
/// fn main() -> extlink::Result<()> {
///     let mut exports = extlink::ExportTableBuilder::new();
///     forwards::register(&mut exports)?;
///     let table = exports.freeze();
///     assert!(table.lookup("ticks").is_some());
///     assert!(table.lookup("__real_ticks").is_some());
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! forwarded_exports {
    (
        $vis:vis mod $mod_name:ident {
            $(
                fn $name:ident ( $( $arg:ident : $ty:ty ),* $(,)? ) $( -> $ret:ty )? = $target:path;
            )*
        }
    ) => {
        $vis mod $mod_name {
            $(
                pub extern "C" fn $name( $( $arg : $ty ),* ) $( -> $ret )? {
                    $target( $( $arg ),* )
                }
            )*

            /// Public names of every routine forwarded by this block.
            pub const NAMES: &[&str] = &[ $( stringify!($name) ),* ];

            /// Installs each trampoline and its `__real_` target as one unit.
            pub fn register(
                builder: &mut $crate::ExportTableBuilder,
            ) -> $crate::Result<()> {
                $(
                    builder.forward(
                        stringify!($name),
                        $name as *const (),
                        $target as *const (),
                    )?;
                )*
                Ok(())
            }
        }
    };
}

/// Registers a list of direct (non-trampolined) exports.
///
/// This is the counterpart of [`forwarded_exports!`] for symbols whose own
/// address is already host-resident and therefore inherently in range:
/// kernel primitives, data objects, constants. Expands to a
/// [`Result`](crate::Result), so call sites apply `?` once.
///
/// # Examples
/// ```rust
/// extern "C" fn uptime() -> u64 {
///     0
/// }
///
/// fn main() -> extlink::Result<()> {
///     let mut exports = extlink::ExportTableBuilder::new();
///     extlink::export_symbols!(&mut exports, {
///         k_uptime_get: Function = uptime as *const (),
///     })?;
///     assert!(exports.freeze().lookup("k_uptime_get").is_some());
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! export_symbols {
    ( $builder:expr, { $( $name:ident : $kind:ident = $addr:expr ),* $(,)? } ) => {{
        let builder: &mut $crate::ExportTableBuilder = $builder;
        (|| -> $crate::Result<()> {
            $(
                builder.export(
                    stringify!($name),
                    $addr,
                    $crate::SymbolKind::$kind,
                )?;
            )*
            Ok(())
        })()
    }};
}
