//! Locator abstraction for element selection.
//!
//! A [`Locator`] is an immutable (strategy, value) pair; a
//! [`LocatorRegistry`] maps symbolic element names to exactly one locator,
//! so page objects and scenario scripts never carry raw selectors. The
//! registry is built once per page object type and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::result::{EnsayarError, EnsayarResult};

/// Lookup strategy for locating elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Element id attribute
    Id,
    /// CSS selector
    Css,
    /// Single class name
    ClassName,
    /// XPath expression
    XPath,
}

impl Strategy {
    /// Short name used in diagnostics (e.g. `id=user-name`)
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Css => "css",
            Self::ClassName => "class",
            Self::XPath => "xpath",
        }
    }
}

/// An immutable element locator.
///
/// The (strategy, value) pair never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    value: String,
}

impl Locator {
    /// Locate by element id
    #[must_use]
    pub fn id(value: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Id,
            value: value.into(),
        }
    }

    /// Locate by CSS selector
    #[must_use]
    pub fn css(value: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Css,
            value: value.into(),
        }
    }

    /// Locate by class name
    #[must_use]
    pub fn class_name(value: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::ClassName,
            value: value.into(),
        }
    }

    /// Locate by XPath expression
    #[must_use]
    pub fn xpath(value: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::XPath,
            value: value.into(),
        }
    }

    /// Get the lookup strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Get the raw locator value
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Render as a CSS selector where the strategy allows it.
    ///
    /// XPath locators have no CSS equivalent and return `None`.
    #[must_use]
    pub fn as_css(&self) -> Option<String> {
        match self.strategy {
            Strategy::Id => Some(format!("#{}", self.value)),
            Strategy::Css => Some(self.value.clone()),
            Strategy::ClassName => Some(format!(".{}", self.value)),
            Strategy::XPath => None,
        }
    }

    /// Convert to a JavaScript lookup expression evaluating to the element
    /// (or `null` when nothing matches).
    #[must_use]
    pub fn to_query(&self) -> String {
        match self.strategy {
            Strategy::Id => format!("document.getElementById({:?})", self.value),
            Strategy::Css => format!("document.querySelector({:?})", self.value),
            Strategy::ClassName => {
                format!("document.querySelector({:?})", format!(".{}", self.value))
            }
            Strategy::XPath => format!(
                "document.evaluate({:?}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
                self.value
            ),
        }
    }

    /// Error for a failed resolution of this locator
    #[must_use]
    pub fn not_found(&self) -> EnsayarError {
        EnsayarError::ElementNotFound {
            selector: self.to_string(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy.as_str(), self.value)
    }
}

/// Fixed mapping from symbolic element names to locators.
///
/// Built once via [`LocatorRegistry::builder`] and immutable afterwards.
/// Looking up a name that was never registered fails with
/// [`EnsayarError::UnknownElement`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatorRegistry {
    elements: HashMap<String, Locator>,
}

impl LocatorRegistry {
    /// Start building a registry
    #[must_use]
    pub fn builder() -> LocatorRegistryBuilder {
        LocatorRegistryBuilder {
            elements: HashMap::new(),
        }
    }

    /// Look up the locator for a symbolic element name.
    ///
    /// # Errors
    ///
    /// Returns [`EnsayarError::UnknownElement`] if the name is not registered.
    pub fn lookup(&self, name: &str) -> EnsayarResult<&Locator> {
        self.elements
            .get(name)
            .ok_or_else(|| EnsayarError::UnknownElement {
                name: name.to_string(),
            })
    }

    /// Whether a name is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.elements.contains_key(name)
    }

    /// All registered element names
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.elements.keys().map(String::as_str).collect()
    }

    /// Number of registered elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Builder for [`LocatorRegistry`]
#[derive(Debug, Default)]
pub struct LocatorRegistryBuilder {
    elements: HashMap<String, Locator>,
}

impl LocatorRegistryBuilder {
    /// Register an element name with its locator.
    ///
    /// Registering the same name twice keeps the last locator.
    #[must_use]
    pub fn element(mut self, name: impl Into<String>, locator: Locator) -> Self {
        let _ = self.elements.insert(name.into(), locator);
        self
    }

    /// Finish building the registry
    #[must_use]
    pub fn build(self) -> LocatorRegistry {
        LocatorRegistry {
            elements: self.elements,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod locator_tests {
        use super::*;

        #[test]
        fn test_id_locator() {
            let locator = Locator::id("user-name");
            assert_eq!(locator.strategy(), Strategy::Id);
            assert_eq!(locator.value(), "user-name");
        }

        #[test]
        fn test_css_locator() {
            let locator = Locator::css(".error-message-container");
            assert_eq!(locator.strategy(), Strategy::Css);
            assert_eq!(locator.to_string(), "css=.error-message-container");
        }

        #[test]
        fn test_class_name_query() {
            let locator = Locator::class_name("inventory_container");
            let query = locator.to_query();
            assert!(query.contains("querySelector"));
            assert!(query.contains(".inventory_container"));
        }

        #[test]
        fn test_id_query() {
            let locator = Locator::id("login-button");
            let query = locator.to_query();
            assert!(query.contains("getElementById"));
            assert!(query.contains("login-button"));
        }

        #[test]
        fn test_xpath_query() {
            let locator = Locator::xpath("//input[@id='password']");
            let query = locator.to_query();
            assert!(query.contains("evaluate"));
            assert!(query.contains("XPathResult"));
        }

        #[test]
        fn test_as_css() {
            assert_eq!(Locator::id("user-name").as_css().as_deref(), Some("#user-name"));
            assert_eq!(
                Locator::class_name("inventory_container").as_css().as_deref(),
                Some(".inventory_container")
            );
            assert_eq!(Locator::css("svg.fa-times").as_css().as_deref(), Some("svg.fa-times"));
            assert_eq!(Locator::xpath("//input").as_css(), None);
        }

        #[test]
        fn test_not_found_error() {
            let locator = Locator::id("missing");
            let err = locator.not_found();
            assert!(err.to_string().contains("id=missing"));
        }

        #[test]
        fn test_locator_is_immutable_value() {
            let a = Locator::id("user-name");
            let b = a.clone();
            assert_eq!(a, b);
        }
    }

    mod registry_tests {
        use super::*;

        fn sample() -> LocatorRegistry {
            LocatorRegistry::builder()
                .element("username-field", Locator::id("user-name"))
                .element("password-field", Locator::id("password"))
                .element("login-button", Locator::id("login-button"))
                .build()
        }

        #[test]
        fn test_lookup_registered() {
            let registry = sample();
            let locator = registry.lookup("username-field").unwrap();
            assert_eq!(locator, &Locator::id("user-name"));
        }

        #[test]
        fn test_lookup_unknown() {
            let registry = sample();
            let err = registry.lookup("nope").unwrap_err();
            assert!(matches!(err, EnsayarError::UnknownElement { name } if name == "nope"));
        }

        #[test]
        fn test_lookup_is_deterministic() {
            let registry = sample();
            let first = registry.lookup("login-button").unwrap().clone();
            for _ in 0..10 {
                assert_eq!(registry.lookup("login-button").unwrap(), &first);
            }
        }

        #[test]
        fn test_names_and_len() {
            let registry = sample();
            assert_eq!(registry.len(), 3);
            assert!(!registry.is_empty());
            assert!(registry.contains("password-field"));
            assert!(registry.names().contains(&"login-button"));
        }

        #[test]
        fn test_duplicate_name_keeps_last() {
            let registry = LocatorRegistry::builder()
                .element("field", Locator::id("first"))
                .element("field", Locator::id("second"))
                .build();
            assert_eq!(registry.lookup("field").unwrap().value(), "second");
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn lookup_never_changes_across_calls(name in "[a-z][a-z-]{0,20}", id in "[a-z][a-z0-9-]{0,20}") {
                let registry = LocatorRegistry::builder()
                    .element(name.clone(), Locator::id(id))
                    .build();
                let first = registry.lookup(&name).unwrap().clone();
                for _ in 0..5 {
                    prop_assert_eq!(registry.lookup(&name).unwrap(), &first);
                }
            }

            #[test]
            fn unknown_names_always_fail(name in "[a-z]{1,10}") {
                let registry = LocatorRegistry::builder().build();
                prop_assert!(registry.lookup(&name).is_err());
            }
        }
    }
}
