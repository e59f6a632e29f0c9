//! Formatter registry.
//!
//! [`FormatterRegistry`] keeps formatters in registration order and files
//! each under the event/call names it handles. That order is the order the
//! resolver consults formatters in.
//!
//! A process-wide registry is available through
//! [`FormatterRegistry::global`]. It starts empty; populate it with
//! [`register`](FormatterRegistry::register) during start-up and tear it
//! down with [`clear`](FormatterRegistry::clear).

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::{RegistryError, RegistryResult};
use crate::formatter::{BoxedFormatter, Formatter, FormatterId, SharedFormatter};

static GLOBAL_REGISTRY: OnceLock<FormatterRegistry> = OnceLock::new();

/// One registration: the formatter and the names it was filed under.
#[derive(Clone)]
struct Registration {
    formatter: SharedFormatter,
    names: Vec<String>,
}

impl Registration {
    fn new(formatter: SharedFormatter) -> Self {
        let mut names: Vec<String> = Vec::new();
        for name in formatter.handled_names() {
            if !names.iter().any(|n| *n == name) {
                names.push(name.into_owned());
            }
        }
        Self { formatter, names }
    }

    fn handles(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// A set of registered formatters, kept in registration order.
///
/// # Example
///
/// ```
/// use eme_logger_format::{FormatterRegistry, builtin::ClearKeyFormatter};
///
/// let registry = FormatterRegistry::new();
/// registry.register(ClearKeyFormatter::new()).unwrap();
///
/// assert!(registry.handles("message"));
/// assert_eq!(registry.formatters_for("message").len(), 1);
/// ```
#[derive(Default)]
pub struct FormatterRegistry {
    /// Formatters by ID.
    formatters: DashMap<FormatterId, SharedFormatter>,
    /// Every registration, oldest first. Writers hold this lock while they
    /// touch `formatters`.
    order: RwLock<Vec<Registration>>,
}

impl FormatterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            formatters: DashMap::new(),
            order: RwLock::new(Vec::new()),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static FormatterRegistry {
        GLOBAL_REGISTRY.get_or_init(FormatterRegistry::new)
    }

    /// Create a registry with the given formatters, in order.
    pub fn with_formatters(formatters: Vec<BoxedFormatter>) -> RegistryResult<Self> {
        let registry = Self::new();
        registry.register_all(formatters.into_iter().map(SharedFormatter::from).collect())?;
        Ok(registry)
    }

    /// Register a formatter.
    ///
    /// # Errors
    ///
    /// Returns an error if a formatter with the same ID is already
    /// registered, or if the formatter fails validation.
    pub fn register<F: Formatter + 'static>(&self, formatter: F) -> RegistryResult<()> {
        self.register_shared(Arc::new(formatter))
    }

    /// Register a boxed formatter.
    pub fn register_boxed(&self, formatter: BoxedFormatter) -> RegistryResult<()> {
        self.register_shared(formatter.into())
    }

    /// Register a shared formatter.
    pub fn register_shared(&self, formatter: SharedFormatter) -> RegistryResult<()> {
        self.register_all(vec![formatter])
    }

    /// Register several formatters, in order, as one unit.
    ///
    /// Nothing is registered unless every formatter validates and no ID
    /// collides with a registered formatter or another one in the batch.
    pub fn register_all(&self, formatters: Vec<SharedFormatter>) -> RegistryResult<()> {
        self.insert_batch(formatters, false).map(|_| ())
    }

    /// Register the formatters whose IDs are not taken yet.
    ///
    /// Returns how many were registered. Validation failures still reject
    /// the whole batch.
    pub fn register_missing(&self, formatters: Vec<SharedFormatter>) -> RegistryResult<usize> {
        self.insert_batch(formatters, true)
    }

    fn insert_batch(
        &self,
        formatters: Vec<SharedFormatter>,
        skip_existing: bool,
    ) -> RegistryResult<usize> {
        let mut order = self.order.write();

        let mut accepted: Vec<Registration> = Vec::with_capacity(formatters.len());
        for formatter in formatters {
            let id = formatter.id();
            let taken = self.formatters.contains_key(&id)
                || accepted.iter().any(|r| r.formatter.id() == id);
            if taken {
                if skip_existing {
                    debug!(formatter = %id, "Formatter already registered, skipping");
                    continue;
                }
                return Err(RegistryError::AlreadyExists(id));
            }

            formatter.validate()?;
            accepted.push(Registration::new(formatter));
        }

        let count = accepted.len();
        for registration in accepted {
            let id = registration.formatter.id();
            match self.formatters.entry(id.clone()) {
                Entry::Occupied(_) => return Err(RegistryError::AlreadyExists(id)),
                Entry::Vacant(slot) => {
                    slot.insert(Arc::clone(&registration.formatter));
                }
            }
            info!(formatter = %id, names = ?registration.names, "Formatter registered");
            order.push(registration);
        }

        Ok(count)
    }

    /// Remove a formatter.
    pub fn unregister(&self, id: &FormatterId) -> Option<SharedFormatter> {
        let mut order = self.order.write();
        let (_, formatter) = self.formatters.remove(id)?;
        order.retain(|r| r.formatter.id() != *id);

        info!(formatter = %id, "Formatter unregistered");
        Some(formatter)
    }

    /// Formatters handling `name`, in registration order.
    ///
    /// The list is a snapshot; formatters can be called without holding any
    /// registry lock.
    pub fn formatters_for(&self, name: &str) -> Vec<SharedFormatter> {
        self.indexed_formatters_for(name)
            .into_iter()
            .map(|(_, formatter)| formatter)
            .collect()
    }

    /// Formatters handling `name`, each paired with its position among all
    /// registered formatters.
    pub fn indexed_formatters_for(&self, name: &str) -> Vec<(usize, SharedFormatter)> {
        let formatters: Vec<(usize, SharedFormatter)> = self
            .order
            .read()
            .iter()
            .enumerate()
            .filter(|(_, r)| r.handles(name))
            .map(|(index, r)| (index, Arc::clone(&r.formatter)))
            .collect();
        debug!(name = name, count = formatters.len(), "Looked up formatters");
        formatters
    }

    /// Whether any formatter handles `name`.
    pub fn handles(&self, name: &str) -> bool {
        self.order.read().iter().any(|r| r.handles(name))
    }

    /// Check if a formatter is registered.
    pub fn has(&self, id: &FormatterId) -> bool {
        self.formatters.contains_key(id)
    }

    /// Get a formatter by ID.
    pub fn get(&self, id: &FormatterId) -> Option<SharedFormatter> {
        self.formatters.get(id).map(|r| Arc::clone(r.value()))
    }

    /// Number of registered formatters.
    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }

    /// All registered IDs, sorted.
    pub fn ids(&self) -> Vec<FormatterId> {
        let mut ids: Vec<FormatterId> = self.formatters.iter().map(|r| r.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Remove every formatter.
    pub fn clear(&self) {
        let mut order = self.order.write();
        self.formatters.clear();
        order.clear();
        info!("Formatter registry cleared");
    }
}

impl Clone for FormatterRegistry {
    fn clone(&self) -> Self {
        let order = self.order.read();
        let new_registry = Self::new();
        for registration in order.iter() {
            new_registry.formatters.insert(
                registration.formatter.id(),
                Arc::clone(&registration.formatter),
            );
        }
        *new_registry.order.write() = order.clone();
        new_registry
    }
}

impl std::fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatterRegistry")
            .field("formatters", &self.ids())
            .finish()
    }
}

/// Builder for constructing formatter registries.
#[derive(Default)]
pub struct FormatterRegistryBuilder {
    formatters: Vec<BoxedFormatter>,
}

impl FormatterRegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a formatter.
    pub fn with<F: Formatter + 'static>(mut self, formatter: F) -> Self {
        self.formatters.push(Box::new(formatter));
        self
    }

    /// Add a boxed formatter.
    pub fn with_boxed(mut self, formatter: BoxedFormatter) -> Self {
        self.formatters.push(formatter);
        self
    }

    /// Build the registry.
    pub fn build(self) -> RegistryResult<FormatterRegistry> {
        FormatterRegistry::with_formatters(self.formatters)
    }
}
