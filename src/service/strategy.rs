//! Accessor resolution strategies.
//!
//! Each strategy knows one way a class can expose a property. A
//! [`StrategyChain`] asks them in a fixed order and the first that answers
//! wins:
//!
//! ```text
//! read "name"                     write "name"
//! 1. getName() / isName()         1. setName(v)
//! 2. name()                       2. name(v)
//! 3. field name                   3. field name (unless final)
//! ```

use tracing::{debug, trace};

use crate::ds::cache::{Accessor, Member};
use crate::ds::class::Class;
use crate::ds::error::Direction;
use crate::parser::util::{to_accessor_name, GET_GETTER, IS_GETTER, SETTER};
use crate::service::config::ServiceConfig;

/// One way of finding an accessor on a class.
pub trait AccessorStrategy: Send + Sync {
    /// Return the accessor for `property` if this strategy finds one.
    ///
    /// Must be pure: the same class and property always give the same answer.
    fn resolve(&self, class: &Class, property: &str, direction: Direction) -> Option<Accessor>;

    fn name(&self) -> &str;
}

/// Conventional prefixed methods: `getName`/`isName` and `setName`.
pub struct PrefixedMethodStrategy {
    getter_prefixes: Vec<String>,
    setter_prefix: String,
}

impl PrefixedMethodStrategy {
    pub fn new(getter_prefixes: Vec<String>, setter_prefix: impl Into<String>) -> Self {
        PrefixedMethodStrategy {
            getter_prefixes,
            setter_prefix: setter_prefix.into(),
        }
    }
}

impl Default for PrefixedMethodStrategy {
    fn default() -> Self {
        Self::new(
            vec![GET_GETTER.to_string(), IS_GETTER.to_string()],
            SETTER,
        )
    }
}

impl AccessorStrategy for PrefixedMethodStrategy {
    fn resolve(&self, class: &Class, property: &str, direction: Direction) -> Option<Accessor> {
        match direction {
            Direction::Read => self.getter_prefixes.iter().find_map(|prefix| {
                let method = to_accessor_name(prefix, property);
                class
                    .zero_arg_method(&method)
                    .map(|call| Accessor::getter(Member::Method(method.clone()), call.clone()))
            }),
            Direction::Write => {
                let method = to_accessor_name(&self.setter_prefix, property);
                class
                    .one_arg_method(&method)
                    .map(|call| Accessor::setter(Member::Method(method.clone()), call.clone()))
            }
        }
    }

    fn name(&self) -> &str {
        "prefixed_method"
    }
}

/// A method named exactly like the property.
pub struct ExactMethodStrategy;

impl AccessorStrategy for ExactMethodStrategy {
    fn resolve(&self, class: &Class, property: &str, direction: Direction) -> Option<Accessor> {
        let member = Member::Method(property.to_string());
        match direction {
            Direction::Read => class
                .zero_arg_method(property)
                .map(|call| Accessor::getter(member, call.clone())),
            Direction::Write => class
                .one_arg_method(property)
                .map(|call| Accessor::setter(member, call.clone())),
        }
    }

    fn name(&self) -> &str {
        "exact_method"
    }
}

/// A public field. Final fields are readable only.
pub struct PublicFieldStrategy;

impl AccessorStrategy for PublicFieldStrategy {
    fn resolve(&self, class: &Class, property: &str, direction: Direction) -> Option<Accessor> {
        let field = class.field(property)?;
        let member = Member::Field(field.name().to_string());
        match direction {
            Direction::Read => Some(Accessor::getter(member, field.getter().clone())),
            Direction::Write => field
                .setter()
                .map(|call| Accessor::setter(member, call.clone())),
        }
    }

    fn name(&self) -> &str {
        "public_field"
    }
}

/// Strategies queried in registration order.
pub struct StrategyChain {
    strategies: Vec<Box<dyn AccessorStrategy>>,
}

impl StrategyChain {
    pub fn new() -> Self {
        StrategyChain {
            strategies: Vec::new(),
        }
    }

    /// Prefixed methods, then exact-name methods, then public fields.
    pub fn standard(getter_prefixes: Vec<String>, setter_prefix: &str) -> Self {
        let mut chain = Self::new();
        chain.add(Box::new(PrefixedMethodStrategy::new(
            getter_prefixes,
            setter_prefix,
        )));
        chain.add(Box::new(ExactMethodStrategy));
        chain.add(Box::new(PublicFieldStrategy));
        chain
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::standard(config.getter_prefixes.clone(), &config.setter_prefix)
    }

    pub fn add(&mut self, strategy: Box<dyn AccessorStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn resolve(&self, class: &Class, property: &str, direction: Direction) -> Option<Accessor> {
        for strategy in &self.strategies {
            if let Some(accessor) = strategy.resolve(class, property, direction) {
                debug!(
                    class = class.name(),
                    property,
                    strategy = strategy.name(),
                    member = %accessor.member(),
                    "resolved {}",
                    direction
                );
                return Some(accessor);
            }
        }
        None
    }

    /// Every accessor the chain offers for `property`, in strategy order.
    ///
    /// A class can expose one property through several members. Callers that
    /// invoke the accessor fall back to the next candidate when one fails.
    pub fn candidates(&self, class: &Class, property: &str, direction: Direction) -> Vec<Accessor> {
        self.strategies
            .iter()
            .filter_map(|strategy| {
                let accessor = strategy.resolve(class, property, direction)?;
                trace!(
                    class = class.name(),
                    property,
                    strategy = strategy.name(),
                    member = %accessor.member(),
                    "{} candidate",
                    direction
                );
                Some(accessor)
            })
            .collect()
    }

    pub fn strategies(&self) -> &[Box<dyn AccessorStrategy>] {
        &self.strategies
    }
}

impl Default for StrategyChain {
    fn default() -> Self {
        Self::from_config(&ServiceConfig::default())
    }
}
