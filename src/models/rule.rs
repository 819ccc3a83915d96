//! Declarative field-extraction rules.

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Attribute filter used to find a sub-node within a listing.
///
/// Empty strings are treated the same as absent filters. With no filter set
/// the locator matches any element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    /// Element (tag) name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Class attribute; whitespace-separated classes must all be present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl Locator {
    /// Locator matching elements carrying the given class.
    pub fn class(class_name: impl Into<String>) -> Self {
        Self {
            name: None,
            class_name: Some(class_name.into()),
        }
    }

    /// Locator matching elements with the given tag name.
    pub fn tag(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            class_name: None,
        }
    }

    /// Render the locator as a CSS selector string.
    pub fn css(&self) -> String {
        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        let classes: String = self
            .class_name
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(|c| format!(".{c}"))
            .collect();

        match (name.is_empty(), classes.is_empty()) {
            (true, true) => "*".to_string(),
            (true, false) => classes,
            (false, _) => format!("{name}{classes}"),
        }
    }

    /// Compile the locator into a `scraper` selector.
    pub fn selector(&self) -> Result<Selector> {
        let css = self.css();
        Selector::parse(&css).map_err(|e| AppError::selector(&css, format!("{e:?}")))
    }
}

/// How a value is read from a located sub-node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Accessor {
    /// Inner text content
    Text,
    /// Hyperlink target (`href`)
    LinkTarget,
}

/// Typed post-processing applied to a raw extracted string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostProcessor {
    /// Strip everything but digits and `.` and parse as a float
    Number,
    /// Append the processing year and reformat as `YYYY-MM-DD`.
    /// An optional first argument overrides the input format.
    Date,
}

/// One extraction rule: where to look, what to read, where to store it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRule {
    /// Output field name
    pub field: String,

    /// Sub-node filter
    pub locator: Locator,

    pub accessor: Accessor,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_processor: Option<PostProcessor>,

    /// Extra arguments for the post-processor
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl ExtractionRule {
    /// Rule reading the inner text of the first element with `class_name`.
    pub fn text(class_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(Locator::class(class_name), Accessor::Text, field)
    }

    /// Rule reading the link target of the first element with `class_name`.
    pub fn link(class_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(Locator::class(class_name), Accessor::LinkTarget, field)
    }

    pub fn new(locator: Locator, accessor: Accessor, field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            locator,
            accessor,
            post_processor: None,
            args: Vec::new(),
        }
    }

    pub fn with_processor(mut self, processor: PostProcessor) -> Self {
        self.post_processor = Some(processor);
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}
