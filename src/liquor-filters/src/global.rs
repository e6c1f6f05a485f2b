//! Process-wide filter registration
//!
//! Filters reach a render from three places: providers submitted through
//! `inventory` at link time, provider types registered at runtime, and ad hoc
//! functions registered by name. Registration is global; the locks only keep
//! the tables memory-safe, so callers must finish mutating before concurrent
//! renders start.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use liquor_shared::NamingConvention;

use crate::descriptor::FilterDescriptor;

/// A type exposing a set of filters
pub trait FilterProvider: 'static {
    /// Every filter overload the provider exposes
    fn filters() -> Vec<FilterDescriptor>;
}

/// A provider submitted at link time with `inventory::submit!`
pub struct ProviderRegistration {
    /// Provider name, used as its cache key
    pub name: &'static str,
    /// Descriptor factory
    pub filters: fn() -> Vec<FilterDescriptor>,
}

inventory::collect!(ProviderRegistration);

#[derive(Clone, Copy)]
struct RegisteredProvider {
    name: &'static str,
    filters: fn() -> Vec<FilterDescriptor>,
}

static PROVIDERS: Lazy<RwLock<IndexMap<TypeId, RegisteredProvider>>> =
    Lazy::new(|| RwLock::new(IndexMap::new()));
/// Keyed by lookup key under the process default convention; the value keeps
/// the name of the latest registration
static FUNCTIONS: Lazy<RwLock<IndexMap<String, (String, FilterDescriptor)>>> =
    Lazy::new(|| RwLock::new(IndexMap::new()));
static DESCRIPTOR_CACHE: Lazy<RwLock<HashMap<&'static str, Arc<Vec<FilterDescriptor>>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Register a provider type for every subsequent render.
///
/// Registering the same type again is a no-op.
pub fn register_filter_provider<P: FilterProvider>() {
    let name = std::any::type_name::<P>();
    let mut providers = PROVIDERS.write().unwrap_or_else(PoisonError::into_inner);
    if providers
        .insert(
            TypeId::of::<P>(),
            RegisteredProvider {
                name,
                filters: P::filters,
            },
        )
        .is_none()
    {
        log::debug!("registered filter provider {name}");
    }
}

/// Remove a provider type; returns whether it was registered
pub fn unregister_filter_provider<P: FilterProvider>() -> bool {
    PROVIDERS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .shift_remove(&TypeId::of::<P>())
        .is_some()
}

/// Register an ad hoc filter function under `name`.
///
/// Names are canonicalized with the process default naming convention, so a
/// later registration under any spelling of the same name replaces the
/// earlier one.
pub fn register_filter_function(name: impl Into<String>, descriptor: FilterDescriptor) {
    let name = name.into();
    let key = NamingConvention::global().lookup_key(&name);
    let mut functions = FUNCTIONS.write().unwrap_or_else(PoisonError::into_inner);
    if functions.insert(key, (name.clone(), descriptor)).is_some() {
        log::debug!("replaced filter function {name}");
    } else {
        log::debug!("registered filter function {name}");
    }
}

/// Remove an ad hoc filter function; returns whether it was registered
pub fn unregister_filter_function(name: &str) -> bool {
    FUNCTIONS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .shift_remove(&NamingConvention::global().lookup_key(name))
        .is_some()
}

/// Forget every runtime registration. Link-time providers stay.
pub fn reset_filters() {
    PROVIDERS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
    FUNCTIONS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
    log::debug!("filter registrations reset");
}

/// Names of link-time and runtime providers, in merge order
pub fn provider_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = inventory::iter::<ProviderRegistration>
        .into_iter()
        .map(|p| p.name)
        .collect();
    names.extend(
        PROVIDERS
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|p| p.name),
    );
    names
}

/// Descriptors of every provider, in merge order: link-time providers first,
/// then runtime providers in registration order
pub(crate) fn provider_descriptors() -> Vec<Arc<Vec<FilterDescriptor>>> {
    let mut sources: Vec<(&'static str, fn() -> Vec<FilterDescriptor>)> =
        inventory::iter::<ProviderRegistration>
            .into_iter()
            .map(|p| (p.name, p.filters))
            .collect();
    sources.extend(
        PROVIDERS
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|p| (p.name, p.filters)),
    );
    sources
        .into_iter()
        .map(|(name, filters)| cached_descriptors(name, filters))
        .collect()
}

/// Ad hoc functions in registration order
pub(crate) fn function_descriptors() -> Vec<(String, FilterDescriptor)> {
    FUNCTIONS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .values()
        .map(|(name, d)| (name.clone(), d.clone()))
        .collect()
}

/// Descriptors of one provider, built once per process
pub(crate) fn cached_descriptors(
    name: &'static str,
    filters: fn() -> Vec<FilterDescriptor>,
) -> Arc<Vec<FilterDescriptor>> {
    if let Some(cached) = DESCRIPTOR_CACHE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
    {
        return cached.clone();
    }
    let built = Arc::new(filters());
    log::trace!("cached {} filter descriptors for {name}", built.len());
    DESCRIPTOR_CACHE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(name)
        .or_insert(built)
        .clone()
}
