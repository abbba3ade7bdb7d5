//! The host symbol export table.
//!
//! This module implements the authoritative registry of names an extension
//! module may reference. The table is assembled once during host
//! initialization through [`ExportTableBuilder`], then frozen into an
//! immutable [`ExportTable`] that the external loader queries during
//! relocation fix-up. Freezing consumes the builder, so there is no window
//! in which a lookup can observe a partially populated table.

use crate::{
    Error, Result,
    catalog::Group,
    region::MemoryRegion,
    trampoline::{public_name, real_alias},
};
use alloc::{
    boxed::Box,
    string::{String, ToString},
    vec::Vec,
};
use hashbrown::HashMap;

/// Classification of an exported symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    /// A callable routine.
    Function,
    /// A mutable or immutable data object.
    Data,
    /// A constant value whose address is taken but whose contents never
    /// change for the lifetime of the image.
    Constant,
}

/// A single entry in the export table.
///
/// The address is a stable token valid for the lifetime of the host image.
/// extlink never dereferences it; only the loader (and ultimately the
/// extension) does, through whatever signature the name implies.
#[derive(Clone, Debug)]
pub struct ExportedSymbol {
    name: String,
    addr: *const (),
    kind: SymbolKind,
}

// Safety: the address is carried as an opaque token and never dereferenced
// by this crate, so an ExportedSymbol can be shared between threads.
unsafe impl Send for ExportedSymbol {}
unsafe impl Sync for ExportedSymbol {}

impl ExportedSymbol {
    fn new(name: String, addr: *const (), kind: SymbolKind) -> Self {
        Self { name, addr, kind }
    }

    /// Gets the exported name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the address the name resolves to.
    #[inline]
    pub fn addr(&self) -> *const () {
        self.addr
    }

    /// Gets the symbol classification.
    #[inline]
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }
}

/// Name resolution interface handed to the external module loader.
///
/// The signature mirrors what a relocation engine wants during fix-up: a
/// name in, an address out, with `None` as the unambiguous "not declared"
/// answer. It is implemented for [`ExportTable`] and for plain closures so
/// tests and embedders can splice in custom resolution scopes.
pub trait SymbolLookup {
    /// Resolves `name` to an address, or `None` if the name is not declared.
    fn lookup(&self, name: &str) -> Option<*const ()>;
}

impl SymbolLookup for ExportTable {
    #[inline]
    fn lookup(&self, name: &str) -> Option<*const ()> {
        self.lookup(name).map(ExportedSymbol::addr)
    }
}

impl<F> SymbolLookup for F
where
    F: Fn(&str) -> Option<*const ()>,
{
    #[inline]
    fn lookup(&self, name: &str) -> Option<*const ()> {
        (self)(name)
    }
}

/// Append-only assembler for the export table.
///
/// The builder is the Rust rendition of a link-time export list: host
/// initialization registers every symbol group, propagates any
/// [`Error::DuplicateExport`] with `?` (refusing to bring the image up, the
/// moral equivalent of failing the host build), and finally calls
/// [`freeze`](ExportTableBuilder::freeze).
#[derive(Debug, Default)]
pub struct ExportTableBuilder {
    symbols: Vec<ExportedSymbol>,
    index: HashMap<String, usize>,
}

impl ExportTableBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` as resolving to `addr`.
    ///
    /// Re-registering an identical `(name, addr, kind)` triple is accepted
    /// and does nothing, since the same declarative export may legitimately
    /// expand in more than one place. A colliding *distinct* entry is
    /// rejected.
    ///
    /// # Errors
    /// [`Error::DuplicateExport`] if `name` is already registered with a
    /// different address or kind.
    pub fn export(&mut self, name: &str, addr: *const (), kind: SymbolKind) -> Result<&mut Self> {
        if !self.probe(name, addr, kind)? {
            self.insert(name.to_string(), addr, kind);
        }
        Ok(self)
    }

    /// Registers a forwarded routine as one unit: the real implementation
    /// under its `__real_` alias and the trampoline under the public name.
    ///
    /// Keeping the pair a single operation is what rules out the classic
    /// drift bug where a routine gets exported without its trampoline and
    /// only faults once an extension loads out of branch range. On any
    /// collision neither half is registered.
    ///
    /// # Arguments
    /// * `name` - The public name extension code calls.
    /// * `trampoline` - Address of the in-image forwarding stub.
    /// * `real` - Address of the true implementation.
    pub fn forward(&mut self, name: &str, trampoline: *const (), real: *const ()) -> Result<&mut Self> {
        let alias = real_alias(name);
        let alias_present = self.probe(&alias, real, SymbolKind::Function)?;
        let public_present = self.probe(name, trampoline, SymbolKind::Function)?;
        if !alias_present {
            self.insert(alias, real, SymbolKind::Function);
        }
        if !public_present {
            self.insert(name.to_string(), trampoline, SymbolKind::Function);
        }
        Ok(self)
    }

    /// Returns the number of symbols registered so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns whether no symbol has been registered yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Consumes the builder and produces the immutable table.
    ///
    /// This is the population/consumption boundary: the loader only ever
    /// sees a fully assembled table, so lookups need no locking and no
    /// initialization check.
    pub fn freeze(self) -> ExportTable {
        #[cfg(feature = "log")]
        log::debug!("export table frozen with {} symbols", self.symbols.len());
        ExportTable {
            symbols: self.symbols.into_boxed_slice(),
            index: self.index,
        }
    }

    /// Checks whether `name` is free (`Ok(false)`), already holds an
    /// identical entry (`Ok(true)`), or collides.
    fn probe(&self, name: &str, addr: *const (), kind: SymbolKind) -> Result<bool> {
        match self.index.get(name) {
            Some(&i) => {
                let existing = &self.symbols[i];
                if existing.addr == addr && existing.kind == kind {
                    Ok(true)
                } else {
                    Err(Error::DuplicateExport { name: name.into() })
                }
            }
            None => Ok(false),
        }
    }

    fn insert(&mut self, name: String, addr: *const (), kind: SymbolKind) {
        let i = self.symbols.len();
        self.index.insert(name.clone(), i);
        self.symbols.push(ExportedSymbol::new(name, addr, kind));
    }
}

/// The immutable host export table.
///
/// Fully populated before any extension is loaded and never mutated
/// afterwards, so it can be shared across any number of concurrently
/// executing extensions or host threads without locking.
pub struct ExportTable {
    symbols: Box<[ExportedSymbol]>,
    index: HashMap<String, usize>,
}

impl ExportTable {
    /// Resolves `name` to its export entry.
    ///
    /// Pure and referentially stable: two lookups of the same name at any
    /// two points during one host run return the same entry.
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<&ExportedSymbol> {
        self.index.get(name).map(|&i| &self.symbols[i])
    }

    /// Returns the number of exported symbols.
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns whether the table exports nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterates over every exported symbol in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ExportedSymbol> {
        self.symbols.iter()
    }

    /// Verifies the export/trampoline lock-step invariant.
    ///
    /// For every `__real_`-aliased implementation there must be exactly one
    /// public entry, and that entry's address must lie inside `host` (the
    /// statically linked image region), which is precisely the property that
    /// keeps the trampoline reachable from any extension placement.
    ///
    /// # Errors
    /// * [`Error::OrphanForward`] - An alias has no public counterpart.
    /// * [`Error::TrampolineOutOfImage`] - A trampoline escaped the host
    ///   image region.
    pub fn verify(&self, host: MemoryRegion) -> Result<()> {
        for sym in &*self.symbols {
            let Some(public) = public_name(sym.name()) else {
                continue;
            };
            let Some(trampoline) = self.lookup(public) else {
                #[cfg(feature = "log")]
                log::error!("alias {} exported without a trampoline", sym.name());
                return Err(Error::OrphanForward {
                    alias: sym.name().into(),
                });
            };
            if !host.contains_ptr(trampoline.addr()) {
                return Err(Error::TrampolineOutOfImage {
                    name: public.into(),
                    addr: trampoline.addr() as usize,
                });
            }
        }
        #[cfg(feature = "log")]
        log::debug!("export table verified against host image {:#x?}", host);
        Ok(())
    }

    /// Checks that every name of each given catalog group is registered,
    /// including the `__real_` aliases of forwarded groups.
    ///
    /// Hosts call this with [`crate::catalog::enabled`] after assembling
    /// the table, so a build that enables a subsystem but forgets to wire
    /// its exports fails at initialization instead of at extension link
    /// time.
    pub fn audit<'a, I>(&self, groups: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Group>,
    {
        for group in groups {
            for &name in group.symbols {
                if self.lookup(name).is_none() {
                    return Err(Error::MissingExport {
                        group: group.name,
                        name,
                    });
                }
                if group.forwarded && self.lookup(&real_alias(name)).is_none() {
                    return Err(Error::OrphanForward {
                        alias: real_alias(name),
                    });
                }
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for ExportTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ExportTable")
            .field("symbols", &self.symbols.len())
            .finish()
    }
}
