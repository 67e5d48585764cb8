//! Core types for locator system

use serde::{Deserialize, Serialize};
use stretch_core_types::ElementRef;

pub const DATA_ADUNIT_CODE: &str = "data-adunit-code";
pub const DATA_AD_UNIT: &str = "data-ad-unit";

/// Locator strategy enumeration
///
/// Strategies are tried in the order of [`LocatorStrategy::fallback_chain`]:
/// exact matches first, then the two data attribute spellings, then the
/// loose substring matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocatorStrategy {
    /// Element id equals the slot id
    ExactId,

    /// `[id="<slot>"]` attribute selector
    IdAttribute,

    /// `[data-adunit-code="<slot>"]`
    DataAdUnitCode,

    /// `[data-ad-unit="<slot>"]`
    DataAdUnit,

    /// `[id*="<slot>"]`
    IdContains,

    /// `[class*="<slot>"]`
    ClassContains,
}

impl LocatorStrategy {
    /// Get strategy name as string
    pub fn name(&self) -> &'static str {
        match self {
            LocatorStrategy::ExactId => "exact-id",
            LocatorStrategy::IdAttribute => "id-attribute",
            LocatorStrategy::DataAdUnitCode => "data-adunit-code",
            LocatorStrategy::DataAdUnit => "data-ad-unit",
            LocatorStrategy::IdContains => "id-contains",
            LocatorStrategy::ClassContains => "class-contains",
        }
    }

    /// Get all strategies in fallback order
    pub fn fallback_chain() -> Vec<LocatorStrategy> {
        vec![
            LocatorStrategy::ExactId,
            LocatorStrategy::IdAttribute,
            LocatorStrategy::DataAdUnitCode,
            LocatorStrategy::DataAdUnit,
            LocatorStrategy::IdContains,
            LocatorStrategy::ClassContains,
        ]
    }

    /// Whether a hit from this strategy is an exact identifier match
    pub fn is_exact(&self) -> bool {
        !matches!(
            self,
            LocatorStrategy::IdContains | LocatorStrategy::ClassContains
        )
    }
}

/// A single host query produced by a strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ElementQuery {
    /// Lookup by element id (`getElementById` semantics)
    ById { id: String },

    /// Attribute equals value
    AttributeEquals { name: String, value: String },

    /// Attribute contains value as a substring
    AttributeContains { name: String, value: String },
}

impl ElementQuery {
    /// Evaluate the query against an element's attributes.
    ///
    /// `attribute` returns the raw attribute value; `id` and `class` are
    /// expected to be reachable through it as well.
    pub fn matches<'a, F>(&self, attribute: F) -> bool
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        match self {
            ElementQuery::ById { id } => attribute("id") == Some(id.as_str()),
            ElementQuery::AttributeEquals { name, value } => {
                attribute(name.as_str()) == Some(value.as_str())
            }
            ElementQuery::AttributeContains { name, value } => {
                !value.is_empty()
                    && attribute(name.as_str()).is_some_and(|raw| raw.contains(value.as_str()))
            }
        }
    }

    /// Render the query as a CSS selector for hosts backed by `querySelector`.
    pub fn to_selector(&self) -> String {
        match self {
            ElementQuery::ById { id } => format!("#{}", escape_ident(id)),
            ElementQuery::AttributeEquals { name, value } => {
                format!("[{}=\"{}\"]", name, escape_string(value))
            }
            ElementQuery::AttributeContains { name, value } => {
                format!("[{}*=\"{}\"]", name, escape_string(value))
            }
        }
    }
}

/// Successful resolution of a slot id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Resolved element
    pub element: ElementRef,

    /// Strategy that produced the match
    pub strategy: LocatorStrategy,
}

fn escape_ident(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (index, ch) in raw.chars().enumerate() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii() {
            if index == 0 && ch.is_ascii_digit() {
                out.push_str(&format!("\\{:x} ", ch as u32));
            } else {
                out.push(ch);
            }
        } else {
            out.push('\\');
            out.push(ch);
        }
    }
    out
}

fn escape_string(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}
