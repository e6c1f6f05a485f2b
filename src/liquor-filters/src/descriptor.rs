//! Filter descriptors
//!
//! A [`FilterDescriptor`] is one callable overload: a declared name, an
//! optional leading render-context parameter, ordered parameters, named-only
//! parameters and the body. Several descriptors may share a name as long as
//! their signatures differ.

use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use liquor_shared::{Context, NamingConvention, Value};

/// Declared type of a filter parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Accepts any value unchanged
    Any,
    /// Boolean
    Bool,
    /// 32-bit integer
    Int32,
    /// 64-bit integer
    Int64,
    /// Floating point number
    Float,
    /// Single character
    Char,
    /// Text
    String,
    /// Sequence
    Array,
    /// Map
    Object,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamType::Any => "any",
            ParamType::Bool => "bool",
            ParamType::Int32 => "int32",
            ParamType::Int64 => "int64",
            ParamType::Float => "float",
            ParamType::Char => "char",
            ParamType::String => "string",
            ParamType::Array => "array",
            ParamType::Object => "object",
        };
        write!(f, "{name}")
    }
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// Declared name
    pub name: String,
    /// Declared type
    pub ty: ParamType,
    /// Value used when the caller supplies none
    pub default: Option<Value>,
}

/// Filter body
pub type FilterBody = Arc<dyn Fn(&FilterArgs<'_>) -> anyhow::Result<Value> + Send + Sync>;

/// Target object captured by an ad hoc filter function
pub type FilterTarget = Arc<dyn Any + Send + Sync>;

/// Arguments handed to a filter body after binding and conversion
pub struct FilterArgs<'a> {
    descriptor: &'a FilterDescriptor,
    context: Option<&'a dyn Context>,
    values: Vec<Value>,
}

static NIL: Value = Value::Nil;

impl<'a> FilterArgs<'a> {
    pub(crate) fn new(
        descriptor: &'a FilterDescriptor,
        context: Option<&'a dyn Context>,
        values: Vec<Value>,
    ) -> Self {
        Self {
            descriptor,
            context,
            values,
        }
    }

    /// The render context, present only for filters declared with one
    pub fn context(&self) -> Option<&'a dyn Context> {
        self.context
    }

    /// Argument at `index`, ordered parameters first and named-only ones after
    pub fn get(&self, index: usize) -> &Value {
        self.values.get(index).unwrap_or(&NIL)
    }

    /// The piped input, i.e. the first ordered argument
    pub fn input(&self) -> &Value {
        self.get(0)
    }

    /// Argument bound to the parameter declared as `name`
    pub fn named(&self, name: &str) -> &Value {
        self.descriptor
            .params()
            .position(|p| p.name == name)
            .map_or(&NIL, |index| self.get(index))
    }

    /// All bound arguments in slot order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// The object captured with [`FilterBuilder::bind`]
    pub fn target<T: Any>(&self) -> Option<&T> {
        self.descriptor.target.as_ref()?.downcast_ref::<T>()
    }
}

/// A callable filter overload
#[derive(Clone)]
pub struct FilterDescriptor {
    name: String,
    takes_context: bool,
    ordered: Vec<ParamSpec>,
    named: Vec<ParamSpec>,
    target: Option<FilterTarget>,
    body: FilterBody,
}

impl fmt::Debug for FilterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterDescriptor")
            .field("name", &self.name)
            .field("takes_context", &self.takes_context)
            .field("ordered", &self.ordered)
            .field("named", &self.named)
            .field("bound", &self.target.is_some())
            .finish()
    }
}

impl FilterDescriptor {
    /// Start building a descriptor for `name`
    pub fn builder(name: impl Into<String>) -> FilterBuilder {
        FilterBuilder {
            name: name.into(),
            takes_context: false,
            ordered: Vec::new(),
            named: Vec::new(),
            target: None,
        }
    }

    /// Declared name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the render context is injected as the leading argument
    pub fn takes_context(&self) -> bool {
        self.takes_context
    }

    /// Ordered parameters, excluding the render context
    pub fn ordered_params(&self) -> &[ParamSpec] {
        &self.ordered
    }

    /// Named-only parameters
    pub fn named_params(&self) -> &[ParamSpec] {
        &self.named
    }

    /// Every parameter in slot order
    pub fn params(&self) -> impl Iterator<Item = &ParamSpec> {
        self.ordered.iter().chain(&self.named)
    }

    /// Number of ordered parameters a caller supplies positionally
    pub fn ordered_parameter_count(&self) -> usize {
        self.ordered.len()
    }

    /// Total declared parameters, counting an injected context
    pub fn total_parameter_count(&self) -> usize {
        usize::from(self.takes_context) + self.ordered.len() + self.named.len()
    }

    /// Lookup keys of the named-only parameters
    pub fn named_parameter_keys(&self, naming: NamingConvention) -> BTreeSet<String> {
        self.named.iter().map(|p| naming.lookup_key(&p.name)).collect()
    }

    /// Whether a call with `positional` arguments and `named` keys matches this
    /// overload exactly
    pub fn is_count_and_named_match<'k>(
        &self,
        positional: usize,
        named: impl IntoIterator<Item = &'k str>,
        naming: NamingConvention,
    ) -> bool {
        if positional != self.ordered.len() {
            return false;
        }
        let keys: BTreeSet<String> = named.into_iter().map(|k| naming.lookup_key(k)).collect();
        keys == self.named_parameter_keys(naming)
    }

    /// Whether `other` has the same ordered count and named-only set
    pub fn same_signature(&self, other: &FilterDescriptor, naming: NamingConvention) -> bool {
        self.ordered.len() == other.ordered.len()
            && self.named_parameter_keys(naming) == other.named_parameter_keys(naming)
    }

    pub(crate) fn call(&self, args: &FilterArgs<'_>) -> anyhow::Result<Value> {
        (self.body)(args)
    }
}

/// Builder for [`FilterDescriptor`]
#[derive(Clone)]
pub struct FilterBuilder {
    name: String,
    takes_context: bool,
    ordered: Vec<ParamSpec>,
    named: Vec<ParamSpec>,
    target: Option<FilterTarget>,
}

impl FilterBuilder {
    /// Declare a leading render-context parameter
    pub fn with_context(mut self) -> Self {
        self.takes_context = true;
        self
    }

    /// Declare a required ordered parameter
    pub fn param(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.ordered.push(ParamSpec {
            name: name.into(),
            ty,
            default: None,
        });
        self
    }

    /// Declare an ordered parameter with a default
    pub fn param_default(
        mut self,
        name: impl Into<String>,
        ty: ParamType,
        default: impl Into<Value>,
    ) -> Self {
        self.ordered.push(ParamSpec {
            name: name.into(),
            ty,
            default: Some(default.into()),
        });
        self
    }

    /// Declare a named-only parameter; these always carry a default
    pub fn named(mut self, name: impl Into<String>, ty: ParamType, default: impl Into<Value>) -> Self {
        self.named.push(ParamSpec {
            name: name.into(),
            ty,
            default: Some(default.into()),
        });
        self
    }

    /// Capture a target object the body can reach through [`FilterArgs::target`]
    pub fn bind<T: Any + Send + Sync>(mut self, target: T) -> Self {
        self.target = Some(Arc::new(target));
        self
    }

    /// Finish with the filter body
    pub fn build<F>(self, body: F) -> FilterDescriptor
    where
        F: Fn(&FilterArgs<'_>) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        FilterDescriptor {
            name: self.name,
            takes_context: self.takes_context,
            ordered: self.ordered,
            named: self.named,
            target: self.target,
            body: Arc::new(body),
        }
    }
}
