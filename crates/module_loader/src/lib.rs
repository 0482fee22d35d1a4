//! Resolves module references to runnable units.
//!
//! The set of modules is closed: every reference is registered up front in a
//! [`ModuleCatalog`] together with a factory. A [`ModuleLoader`] resolves
//! references through that catalog and memoizes the resulting [`Unit`]s for
//! the lifetime of one session.

use std::{
    any::Any,
    collections::HashMap,
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use shared::domain::ModuleRef;
use thiserror::Error;
use tracing::{debug, warn};

mod page;

pub use page::{Block, Metric, Page, Table};

/// The single callable a module exposes. It renders into the page as a side
/// effect; its success value carries nothing.
pub type EntryPoint = Arc<dyn Fn(&mut Page) -> anyhow::Result<()> + Send + Sync>;

pub trait Module: Send + Sync {
    /// `None` when the module resolves but does not export an entry point.
    fn entry_point(&self) -> Option<EntryPoint>;
}

type ModuleFactory = Arc<dyn Fn() -> anyhow::Result<Box<dyn Module>> + Send + Sync>;

struct FnModule(EntryPoint);

impl Module for FnModule {
    fn entry_point(&self) -> Option<EntryPoint> {
        Some(self.0.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    MissingEntryPoint,
    ResolutionFailed,
}

impl fmt::Display for LoadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadErrorKind::MissingEntryPoint => f.write_str("missing entry point"),
            LoadErrorKind::ResolutionFailed => f.write_str("resolution failed"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{kind} for module '{detail}'")]
pub struct LoadError {
    pub kind: LoadErrorKind,
    pub detail: ModuleRef,
    pub reason: Option<String>,
}

impl LoadError {
    fn resolution_failed(detail: &ModuleRef, reason: Option<String>) -> Self {
        Self {
            kind: LoadErrorKind::ResolutionFailed,
            detail: detail.clone(),
            reason,
        }
    }

    fn missing_entry_point(detail: &ModuleRef) -> Self {
        Self {
            kind: LoadErrorKind::MissingEntryPoint,
            detail: detail.clone(),
            reason: None,
        }
    }
}

/// Failure raised while a loaded unit was rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderFailure {
    #[error("{0}")]
    Error(String),
    #[error("panicked: {0}")]
    Panic(String),
}

#[derive(Clone, Default)]
pub struct ModuleCatalog {
    factories: HashMap<ModuleRef, ModuleFactory>,
}

impl fmt::Debug for ModuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleCatalog")
            .field("references", &self.references())
            .finish()
    }
}

impl ModuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, reference: &str, factory: F) -> &mut Self
    where
        F: Fn() -> anyhow::Result<Box<dyn Module>> + Send + Sync + 'static,
    {
        self.factories
            .insert(ModuleRef::from(reference), Arc::new(factory));
        self
    }

    pub fn register_fn<F>(&mut self, reference: &str, main: F) -> &mut Self
    where
        F: Fn(&mut Page) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let entry: EntryPoint = Arc::new(main);
        self.register(reference, move || {
            Ok(Box::new(FnModule(entry.clone())) as Box<dyn Module>)
        })
    }

    pub fn contains(&self, reference: &ModuleRef) -> bool {
        self.factories.contains_key(reference)
    }

    pub fn references(&self) -> Vec<&ModuleRef> {
        let mut references: Vec<_> = self.factories.keys().collect();
        references.sort();
        references
    }

    fn resolve(&self, reference: &ModuleRef) -> Result<Box<dyn Module>, LoadError> {
        let factory = self
            .factories
            .get(reference)
            .ok_or_else(|| LoadError::resolution_failed(reference, None))?;
        factory()
            .map_err(|err| LoadError::resolution_failed(reference, Some(format!("{err:#}"))))
    }
}

/// A resolved module whose entry point is known to exist.
pub struct Unit {
    reference: ModuleRef,
    entry: EntryPoint,
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("reference", &self.reference)
            .finish_non_exhaustive()
    }
}

impl Unit {
    pub fn reference(&self) -> &ModuleRef {
        &self.reference
    }

    /// Runs the entry point. Errors and panics both come back as a
    /// [`RenderFailure`]; nothing escapes to the caller's render cycle.
    pub fn run(&self, page: &mut Page) -> Result<(), RenderFailure> {
        let entry = &self.entry;
        match panic::catch_unwind(AssertUnwindSafe(|| entry(page))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(RenderFailure::Error(format!("{err:#}"))),
            Err(payload) => Err(RenderFailure::Panic(panic_message(payload.as_ref()))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Per-session loader. Successful loads are cached by reference; failures are
/// retried on the next load.
#[derive(Debug)]
pub struct ModuleLoader {
    catalog: Arc<ModuleCatalog>,
    cache: HashMap<ModuleRef, Arc<Unit>>,
}

impl ModuleLoader {
    pub fn new(catalog: Arc<ModuleCatalog>) -> Self {
        Self {
            catalog,
            cache: HashMap::new(),
        }
    }

    pub fn load(&mut self, reference: &ModuleRef) -> Result<Arc<Unit>, LoadError> {
        if let Some(unit) = self.cache.get(reference) {
            debug!(module = %reference, "module cache hit");
            return Ok(unit.clone());
        }

        let module = self.catalog.resolve(reference).map_err(|err| {
            warn!(module = %reference, reason = ?err.reason, "module resolution failed");
            err
        })?;
        let entry = module.entry_point().ok_or_else(|| {
            warn!(module = %reference, "module has no entry point");
            LoadError::missing_entry_point(reference)
        })?;

        let unit = Arc::new(Unit {
            reference: reference.clone(),
            entry,
        });
        Ok(self
            .cache
            .entry(reference.clone())
            .or_insert(unit)
            .clone())
    }

    pub fn cached_units(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
