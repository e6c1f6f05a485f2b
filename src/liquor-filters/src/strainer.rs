//! Per-render filter registry and dispatcher
//!
//! A [`Strainer`] merges the globally registered filters into one table keyed
//! by lookup name, then resolves each call to a single overload, binds and
//! converts its arguments and invokes it.

use indexmap::IndexMap;

use liquor_shared::{Context, Error, NamingConvention, Object, Result, Value};

use crate::convert::try_coerce;
use crate::descriptor::{FilterArgs, FilterDescriptor};
use crate::global::{self, FilterProvider};

/// Filter registry for one render
pub struct Strainer<'ctx> {
    context: &'ctx dyn Context,
    naming: NamingConvention,
    methods: IndexMap<String, Vec<FilterDescriptor>>,
}

impl std::fmt::Debug for Strainer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Strainer {{ naming: {}, filters: {} names }}",
            self.naming,
            self.methods.len()
        )
    }
}

impl<'ctx> Strainer<'ctx> {
    /// Create an empty strainer for `context`
    pub fn new(context: &'ctx dyn Context) -> Self {
        Self {
            context,
            naming: context.naming(),
            methods: IndexMap::new(),
        }
    }

    /// Create a strainer holding every globally registered filter.
    ///
    /// Link-time providers come first, then runtime providers in registration
    /// order, then ad hoc functions.
    pub fn create(context: &'ctx dyn Context) -> Self {
        let mut strainer = Self::new(context);
        for descriptors in global::provider_descriptors() {
            strainer.extend(descriptors.iter().cloned());
        }
        for (name, descriptor) in global::function_descriptors() {
            strainer.add_function(&name, descriptor);
        }
        strainer
    }

    /// Naming convention used for lookups
    pub fn naming(&self) -> NamingConvention {
        self.naming
    }

    /// Merge provider descriptors.
    ///
    /// An incoming descriptor replaces existing ones with the same lookup name
    /// and signature; differently-signed overloads stay callable.
    pub fn extend(&mut self, descriptors: impl IntoIterator<Item = FilterDescriptor>) {
        let naming = self.naming;
        for descriptor in descriptors {
            let overloads = self
                .methods
                .entry(naming.lookup_key(descriptor.name()))
                .or_default();
            let before = overloads.len();
            overloads.retain(|existing| !existing.same_signature(&descriptor, naming));
            if overloads.len() != before {
                log::debug!("replaced filter overload {}", descriptor.name());
            }
            overloads.push(descriptor);
        }
    }

    /// Merge the filters of provider `P`
    pub fn extend_provider<P: FilterProvider>(&mut self) {
        let descriptors = global::cached_descriptors(std::any::type_name::<P>(), P::filters);
        self.extend(descriptors.iter().cloned());
    }

    /// Add one overload under `name` at instance scope
    pub fn add_function(&mut self, name: &str, descriptor: FilterDescriptor) {
        self.methods
            .entry(self.naming.lookup_key(name))
            .or_default()
            .push(descriptor);
    }

    /// Whether any overload answers to `name`
    pub fn respond_to(&self, name: &str) -> bool {
        self.methods.contains_key(&self.naming.lookup_key(name))
    }

    /// Lookup names of every registered filter
    pub fn filter_names(&self) -> Vec<String> {
        self.methods.keys().cloned().collect()
    }

    /// Every registered overload
    pub fn descriptors(&self) -> impl Iterator<Item = &FilterDescriptor> {
        self.methods.values().flatten()
    }

    /// Pick the overload answering a call
    fn resolve(&self, name: &str, positional: usize, named: &Object) -> Result<&FilterDescriptor> {
        let overloads = self
            .methods
            .get(&self.naming.lookup_key(name))
            .filter(|o| !o.is_empty())
            .ok_or_else(|| Error::UnknownFilter(name.to_string()))?;

        if let Some(exact) = overloads.iter().find(|d| {
            d.is_count_and_named_match(positional, named.keys().map(String::as_str), self.naming)
        }) {
            return Ok(exact);
        }

        // First overload with the most declared parameters
        let mut widest = &overloads[0];
        for candidate in &overloads[1..] {
            if candidate.total_parameter_count() > widest.total_parameter_count() {
                widest = candidate;
            }
        }
        log::debug!(
            "no exact overload of {name} for {positional} positional argument(s), using the {}-parameter one",
            widest.total_parameter_count()
        );
        Ok(widest)
    }

    /// Invoke filter `name`.
    ///
    /// Excess positional arguments are dropped, missing ones take their
    /// declared default, named arguments override by parameter name and every
    /// argument is converted to its declared type. Errors raised by the filter
    /// body are returned unchanged as [`Error::Filter`].
    pub fn invoke(&self, name: &str, args: Vec<Value>, named: &Object) -> Result<Value> {
        let descriptor = self.resolve(name, args.len(), named)?;
        let params: Vec<_> = descriptor.params().collect();

        let mut slots: Vec<Option<Value>> = args
            .into_iter()
            .take(descriptor.ordered_parameter_count())
            .map(Some)
            .collect();
        slots.resize(params.len(), None);

        for (key, value) in named {
            match params
                .iter()
                .position(|p| self.naming.names_match(&p.name, key))
            {
                Some(index) => slots[index] = Some(value.clone()),
                None => log::trace!("ignoring unknown named argument {key} for {name}"),
            }
        }

        let mut values = Vec::with_capacity(params.len());
        for (slot, param) in slots.into_iter().zip(&params) {
            let value = match slot.or_else(|| param.default.clone()) {
                Some(value) => value,
                None => {
                    return Err(Error::MissingDefaultValue {
                        filter: name.to_string(),
                        parameter: param.name.clone(),
                    })
                }
            };
            let converted = try_coerce(value, param.ty).map_err(|value| Error::ArgumentConversion {
                filter: name.to_string(),
                parameter: param.name.clone(),
                value: value.to_string(),
                target: param.ty.to_string(),
            })?;
            values.push(converted);
        }

        let context = descriptor.takes_context().then_some(self.context);
        let filter_args = FilterArgs::new(descriptor, context, values);
        descriptor.call(&filter_args).map_err(Error::Filter)
    }
}
