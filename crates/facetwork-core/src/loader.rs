//! # Specification Loader
//!
//! Cache of object specifications keyed by [`TypeName`].
//!
//! ## Slots
//!
//! Every type gets a slot registered *before* introspection starts:
//!
//! | State                        | Visible to                               |
//! |------------------------------|------------------------------------------|
//! | `Introspecting { owner }`    | `peek` only; other threads wait on it    |
//! | `Ready(spec)`                | everyone                                 |
//!
//! The thread that inserts the slot owns the introspection. Concurrent first
//! loads of the same type wait on the slot's condition variable, so a type is
//! introspected exactly once and every caller observes the same `Arc`.
//!
//! ## Ordering
//!
//! Supertypes are loaded recursively and fully before the subtype's members
//! are processed. Supertype cycles are detected up front, so supertype waits
//! always follow the (acyclic) hierarchy. Types referenced by members are
//! queued and loaded only after the referring spec is published, which is
//! what lets `Customer -> Order -> Customer` resolve without deadlock.

use crate::class::ClassRegistry;
use crate::config::MetamodelConfig;
use crate::facet::{Facet, HasFacets};
use crate::factory::{FacetProcessor, ProgrammingModel};
use crate::introspector;
use crate::persistence::PersistenceProvider;
use crate::spec::ObjectSpecification;
use crate::{BeanSort, Pojo, TypeName};
use parking_lot::{Condvar, Mutex, RwLock};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, ThreadId};

// =============================================================================
// SLOTS
// =============================================================================

/// Lifecycle state of a cache slot.
#[derive(Debug, Clone)]
pub enum SpecState {
    /// Being introspected by `owner`.
    Introspecting { owner: ThreadId },
    /// Published.
    Ready(Arc<ObjectSpecification>),
}

struct SpecSlot {
    state: Mutex<SpecState>,
    ready: Condvar,
}

impl SpecSlot {
    fn introspecting(owner: ThreadId) -> Self {
        Self {
            state: Mutex::new(SpecState::Introspecting { owner }),
            ready: Condvar::new(),
        }
    }

    fn publish(&self, spec: Arc<ObjectSpecification>) {
        *self.state.lock() = SpecState::Ready(spec);
        self.ready.notify_all();
    }

    fn wait_ready(&self) -> Arc<ObjectSpecification> {
        let mut state = self.state.lock();
        loop {
            if let SpecState::Ready(spec) = &*state {
                return Arc::clone(spec);
            }
            self.ready.wait(&mut state);
        }
    }
}

enum Claim {
    Ready(Arc<ObjectSpecification>),
    Wait(Arc<SpecSlot>),
    Reentrant,
    Owner(Arc<SpecSlot>),
}

/// Publishes an unintrospectable spec if introspection unwinds, so waiters
/// are never stranded.
struct PublishGuard<'a> {
    slot: &'a SpecSlot,
    type_name: &'a TypeName,
    published: bool,
}

impl PublishGuard<'_> {
    fn publish(mut self, spec: Arc<ObjectSpecification>) {
        self.slot.publish(spec);
        self.published = true;
    }
}

impl Drop for PublishGuard<'_> {
    fn drop(&mut self) {
        if !self.published {
            tracing::warn!(type_name = %self.type_name, "introspection aborted");
            self.slot.publish(Arc::new(ObjectSpecification::unintrospectable(
                self.type_name.clone(),
                BeanSort::Unknown,
                "introspection aborted",
            )));
        }
    }
}

// =============================================================================
// LOAD SESSION
// =============================================================================

/// Member-referenced types discovered during one top-level load.
#[derive(Debug, Default)]
pub(crate) struct LoadSession {
    pending: VecDeque<TypeName>,
    seen: BTreeSet<TypeName>,
}

impl LoadSession {
    /// Queue a referenced type for loading once the current spec is published.
    pub(crate) fn enqueue(&mut self, type_name: &TypeName) {
        if self.seen.insert(type_name.clone()) {
            self.pending.push_back(type_name.clone());
        }
    }

    fn next(&mut self) -> Option<TypeName> {
        self.pending.pop_front()
    }
}

// =============================================================================
// SPECIFICATION LOADER
// =============================================================================

/// Builds and caches [`ObjectSpecification`]s.
pub struct SpecificationLoader {
    registry: Arc<ClassRegistry>,
    processor: FacetProcessor,
    config: Arc<MetamodelConfig>,
    persistence: Arc<dyn PersistenceProvider>,
    slots: RwLock<BTreeMap<TypeName, Arc<SpecSlot>>>,
    introspections: AtomicUsize,
}

impl SpecificationLoader {
    /// Create a loader over a registry and programming model.
    #[must_use]
    pub fn new(
        registry: Arc<ClassRegistry>,
        model: ProgrammingModel,
        config: Arc<MetamodelConfig>,
        persistence: Arc<dyn PersistenceProvider>,
    ) -> Self {
        Self {
            registry,
            processor: FacetProcessor::new(model),
            config,
            persistence,
            slots: RwLock::new(BTreeMap::new()),
            introspections: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    #[must_use]
    pub fn processor(&self) -> &FacetProcessor {
        &self.processor
    }

    #[must_use]
    pub fn config(&self) -> &MetamodelConfig {
        &self.config
    }

    #[must_use]
    pub fn persistence(&self) -> &Arc<dyn PersistenceProvider> {
        &self.persistence
    }

    /// The specification of `type_name`, introspecting it on first use.
    ///
    /// Idempotent: every call for the same name returns the same `Arc` until
    /// the entry is invalidated. Unknown or malformed types yield a cached,
    /// unintrospectable spec.
    pub fn load_specification(&self, type_name: &TypeName) -> Arc<ObjectSpecification> {
        let mut session = LoadSession::default();
        let spec = self.load_in(type_name, &mut session);
        while let Some(next) = session.next() {
            self.load_in(&next, &mut session);
        }
        spec
    }

    /// The specification of a domain instance's class.
    pub fn specification_for(&self, pojo: &Pojo) -> Arc<ObjectSpecification> {
        self.load_specification(pojo.class())
    }

    pub(crate) fn load_in(
        &self,
        type_name: &TypeName,
        session: &mut LoadSession,
    ) -> Arc<ObjectSpecification> {
        match self.claim_slot(type_name) {
            Claim::Ready(spec) => spec,
            Claim::Wait(slot) => slot.wait_ready(),
            Claim::Reentrant => {
                tracing::debug!(type_name = %type_name, "re-entrant load; returning placeholder");
                Arc::new(ObjectSpecification::unintrospectable(
                    type_name.clone(),
                    BeanSort::Unknown,
                    "cyclic reference during introspection",
                ))
            }
            Claim::Owner(slot) => {
                let guard = PublishGuard {
                    slot: &slot,
                    type_name,
                    published: false,
                };
                self.introspections.fetch_add(1, Ordering::Relaxed);
                let spec = Arc::new(introspector::introspect(self, type_name, session));
                guard.publish(Arc::clone(&spec));
                spec
            }
        }
    }

    fn claim_slot(&self, type_name: &TypeName) -> Claim {
        let existing = self.slots.read().get(type_name).cloned();
        if let Some(slot) = existing {
            return Self::inspect_slot(slot);
        }

        let mut slots = self.slots.write();
        if let Some(slot) = slots.get(type_name).cloned() {
            drop(slots);
            return Self::inspect_slot(slot);
        }
        let slot = Arc::new(SpecSlot::introspecting(thread::current().id()));
        slots.insert(type_name.clone(), Arc::clone(&slot));
        Claim::Owner(slot)
    }

    fn inspect_slot(slot: Arc<SpecSlot>) -> Claim {
        let state = slot.state.lock().clone();
        match state {
            SpecState::Ready(spec) => Claim::Ready(spec),
            SpecState::Introspecting { owner } if owner == thread::current().id() => {
                Claim::Reentrant
            }
            SpecState::Introspecting { .. } => Claim::Wait(slot),
        }
    }

    /// Current state of a slot without loading or waiting.
    #[must_use]
    pub fn peek(&self, type_name: &TypeName) -> Option<SpecState> {
        let slot = self.slots.read().get(type_name).cloned()?;
        let state = slot.state.lock().clone();
        Some(state)
    }

    /// Every published specification, ordered by type name.
    #[must_use]
    pub fn all_specifications(&self) -> Vec<Arc<ObjectSpecification>> {
        let slots: Vec<Arc<SpecSlot>> = self.slots.read().values().cloned().collect();
        slots
            .iter()
            .filter_map(|slot| match &*slot.state.lock() {
                SpecState::Ready(spec) => Some(Arc::clone(spec)),
                SpecState::Introspecting { .. } => None,
            })
            .collect()
    }

    /// Number of introspections run since construction.
    #[must_use]
    pub fn introspection_count(&self) -> usize {
        self.introspections.load(Ordering::Relaxed)
    }

    /// Evict a type and, transitively, its known subtypes.
    ///
    /// Returns how many entries were evicted. The next load re-introspects.
    pub fn invalidate_cache(&self, type_name: &TypeName) -> usize {
        let mut slots = self.slots.write();
        let mut stack = vec![type_name.clone()];
        let mut evicted = 0;
        while let Some(next) = stack.pop() {
            let Some(slot) = slots.remove(&next) else {
                continue;
            };
            evicted += 1;
            if let SpecState::Ready(spec) = &*slot.state.lock() {
                stack.extend(spec.subtypes());
            }
        }
        tracing::debug!(type_name = %type_name, evicted, "cache invalidated");
        evicted
    }

    /// Evict the specification of a domain instance's class.
    pub fn invalidate_cache_for(&self, pojo: &Pojo) -> usize {
        self.invalidate_cache(pojo.class())
    }

    /// Drop every cached specification.
    pub fn clear(&self) {
        let mut slots = self.slots.write();
        let count = slots.len();
        slots.clear();
        tracing::debug!(evicted = count, "cache cleared");
    }

    /// Facet lookup with inheritance: the spec's own facet, otherwise the
    /// nearest ancestor's.
    pub fn lookup_facet<F: Facet>(&self, spec: &ObjectSpecification) -> Option<Arc<F>> {
        if let Some(facet) = spec.get_facet::<F>() {
            return Some(facet);
        }
        spec.ancestors()
            .iter()
            .find_map(|ancestor| self.load_specification(ancestor).get_facet::<F>())
    }
}

impl std::fmt::Debug for SpecificationLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecificationLoader")
            .field("registered", &self.registry.len())
            .field("cached", &self.slots.read().len())
            .field("introspections", &self.introspection_count())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
