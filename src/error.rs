use alloc::string::String;
use core::fmt;

/// Errors reported while assembling or auditing the host export surface.
///
/// Every variant corresponds to a defect that must stop the host image from
/// coming up: a table that fails to build is never handed to the loader, so
/// an extension can never observe a partial or inconsistent export surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A name was registered twice with a different address or kind.
    DuplicateExport { name: String },
    /// A `__real_`-aliased implementation has no public trampoline
    /// counterpart, or a forwarded catalog entry is missing its alias.
    ///
    /// This is the latent out-of-range-call bug the trampoline layer exists
    /// to prevent: the export would link, then fault only once an extension
    /// happens to load far enough from the host text segment.
    OrphanForward { alias: String },
    /// A trampoline's address lies outside the host image region, which
    /// voids its reachability guarantee.
    TrampolineOutOfImage { name: String, addr: usize },
    /// A catalog group is enabled for this build but one of its names is
    /// absent from the table.
    MissingExport {
        group: &'static str,
        name: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DuplicateExport { name } => {
                write!(f, "symbol `{name}` is already exported with a different definition")
            }
            Error::OrphanForward { alias } => {
                write!(f, "forwarded symbol `{alias}` has no matching trampoline/alias pair")
            }
            Error::TrampolineOutOfImage { name, addr } => {
                write!(f, "trampoline `{name}` at {addr:#x} lies outside the host image")
            }
            Error::MissingExport { group, name } => {
                write!(f, "export group `{group}` is enabled but `{name}` is not registered")
            }
        }
    }
}

impl core::error::Error for Error {}
