//! Drops: duck-typed objects exposing computed members to templates
//!
//! A drop answers `contains_key` and `resolve` for member names. Host types can
//! implement [`LiquidDrop`] directly, or declare a member table through
//! [`DropMembers`] and be wrapped in a [`TypedDrop`]. Member tables are built
//! once per concrete type and naming convention, then shared.

use once_cell::sync::Lazy;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::naming::NamingConvention;
use crate::ops::traits::Context;
use crate::value::Value;

/// Capability interface of a drop
pub trait LiquidDrop: Send + Sync + fmt::Debug {
    /// Whether `name` addresses a member of this drop
    fn contains_key(&self, name: &str, context: &dyn Context) -> bool;

    /// Resolve member `name`, or `None` when the drop has no such member
    fn resolve(&self, name: &str, context: &dyn Context) -> Option<Value>;

    /// The drop's own equality contract.
    ///
    /// `None` means the drop does not define equality against `other`.
    fn equals(&self, _other: &Value) -> Option<bool> {
        None
    }

    /// Text used when the drop is rendered
    fn to_liquid_string(&self) -> Option<String> {
        None
    }

    /// Get as Any for downcasting
    fn as_any(&self) -> &dyn Any;
}

/// Getter for one declared member
pub type MemberGetter<T> = fn(&T) -> Value;

/// Declares the members a host type exposes to templates
pub trait DropMembers: Send + Sync + fmt::Debug + 'static {
    /// Declared member names and their getters
    fn members() -> Vec<(&'static str, MemberGetter<Self>)>
    where
        Self: Sized;

    /// Fallback for names that are not declared members
    fn before_method(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Own equality contract, see [`LiquidDrop::equals`]
    fn equals(&self, _other: &Value) -> Option<bool> {
        None
    }

    /// Text used when the drop is rendered
    fn to_liquid_string(&self) -> Option<String> {
        None
    }
}

struct MemberTable<T> {
    getters: HashMap<String, MemberGetter<T>>,
}

type TableCache = HashMap<(TypeId, NamingConvention), Arc<dyn Any + Send + Sync>>;

static MEMBER_TABLES: Lazy<RwLock<TableCache>> = Lazy::new(|| RwLock::new(HashMap::new()));

fn member_table<T: DropMembers>(naming: NamingConvention) -> Arc<MemberTable<T>> {
    let key = (TypeId::of::<T>(), naming);
    let cached = MEMBER_TABLES
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
        .cloned();
    if let Some(table) = cached.and_then(|t| t.downcast::<MemberTable<T>>().ok()) {
        return table;
    }

    let getters = T::members()
        .into_iter()
        .map(|(name, getter)| (naming.lookup_key(name), getter))
        .collect();
    let table = Arc::new(MemberTable { getters });
    log::trace!(
        "cached member table for {} under {naming}",
        std::any::type_name::<T>()
    );
    let mut tables = MEMBER_TABLES
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    let shared: Arc<dyn Any + Send + Sync> = table.clone();
    tables
        .entry(key)
        .or_insert(shared)
        .clone()
        .downcast::<MemberTable<T>>()
        .unwrap_or(table)
}

/// Adapter exposing a [`DropMembers`] type as a drop
pub struct TypedDrop<T> {
    inner: T,
}

impl<T: DropMembers> TypedDrop<T> {
    /// Wrap a host value
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// The wrapped host value
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: DropMembers> fmt::Debug for TypedDrop<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl<T: DropMembers> LiquidDrop for TypedDrop<T> {
    fn contains_key(&self, name: &str, context: &dyn Context) -> bool {
        let naming = context.naming();
        member_table::<T>(naming)
            .getters
            .contains_key(&naming.lookup_key(name))
            || self.inner.before_method(name).is_some()
    }

    fn resolve(&self, name: &str, context: &dyn Context) -> Option<Value> {
        let naming = context.naming();
        match member_table::<T>(naming).getters.get(&naming.lookup_key(name)) {
            Some(getter) => Some(getter(&self.inner)),
            None => self.inner.before_method(name),
        }
    }

    fn equals(&self, other: &Value) -> Option<bool> {
        self.inner.equals(other)
    }

    fn to_liquid_string(&self) -> Option<String> {
        self.inner.to_liquid_string()
    }

    fn as_any(&self) -> &dyn Any {
        &self.inner
    }
}
