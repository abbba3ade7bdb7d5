//! # extlink
//!
//! **extlink** is the host-resident linkage surface for dynamically loaded,
//! relocatable extension modules. It owns the three pieces a running embedded
//! image needs so that independently compiled extension code can call back
//! into the statically linked host, no matter where the loader places it:
//!
//! * **🗂 Export table**: an immutable, collision-checked registry of every
//!   name an extension is permitted to reference, consumed by the external
//!   module loader during relocation fix-up.
//! * **🦘 Long-call trampolines**: zero-overhead forwarding stubs that live in
//!   the host image and redirect short-range direct calls to their true
//!   implementations, sidestepping the ±16 MiB displacement limit of direct
//!   branch encodings.
//! * **🪦 Object-lifetime ABI shim**: the minimal construction/destruction
//!   bookkeeping surface compiled object code expects (`__dso_handle`,
//!   vtable dispatch guards, static-destructor registration, termination
//!   primitives) without a full language runtime.
//!
//! The crate performs no ELF parsing and no relocation arithmetic; those
//! belong to the external loader. extlink only guarantees that every name it
//! declares resolves to a stable, reachable address.
//!
//! ## Quick Start
//!
//! ```rust
//! use extlink::{ExportTableBuilder, SymbolKind};
//!
//! extern "C" fn sys_tick() -> u32 {
//!     42
//! }
//!
//! fn main() -> extlink::Result<()> {
//!     let mut exports = ExportTableBuilder::new();
//!     exports.export("sys_tick", sys_tick as *const (), SymbolKind::Function)?;
//!     extlink::shim::register(&mut exports)?;
//!
//!     // Freezing the builder is the only way to obtain a table the loader
//!     // can query, so no lookup can observe a half-populated registry.
//!     let table = exports.freeze();
//!     assert!(table.lookup("sys_tick").is_some());
//!     Ok(())
//! }
//! ```
#![no_std]
#![warn(
    clippy::unnecessary_wraps,
    clippy::unnecessary_lazy_evaluations,
    clippy::collapsible_if,
    clippy::cast_lossless,
    clippy::explicit_iter_loop,
    clippy::manual_assert,
    clippy::needless_question_mark,
    clippy::needless_return,
    clippy::redundant_clone,
    clippy::redundant_else,
    clippy::redundant_static_lifetimes
)]
extern crate alloc;

pub mod catalog;
mod error;
pub mod export;
pub mod region;
pub mod shim;
pub mod trampoline;

pub use error::Error;
pub use export::{ExportTable, ExportTableBuilder, ExportedSymbol, SymbolKind, SymbolLookup};
pub use region::MemoryRegion;

/// A type alias for `Result`s returned by `extlink` functions.
///
/// This is a convenience alias that eliminates the need to repeatedly specify
/// the `Error` type in function signatures.
pub type Result<T> = core::result::Result<T, Error>;
