//! Field extractor.
//!
//! Walks listing nodes and applies an ordered list of extraction rules to
//! each one, producing one `Record` per node. A rule that finds nothing
//! yields a null field; nothing here fails per item.

use scraper::{ElementRef, Selector};

use crate::error::Result;
use crate::models::{Accessor, ExtractionRule, FieldValue, Record};
use crate::services::markup::find;
use crate::services::postprocess::ProcessContext;

/// Attribute read by the link-target accessor.
const LINK_ATTR: &str = "href";

/// A rule with its locator compiled.
struct CompiledRule {
    rule: ExtractionRule,
    selector: Selector,
}

/// Applies extraction rules to listing nodes.
pub struct FieldExtractor {
    rules: Vec<CompiledRule>,
    context: ProcessContext,
}

impl FieldExtractor {
    /// Compile `rules` once for the run.
    pub fn new(rules: &[ExtractionRule], context: ProcessContext) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                Ok(CompiledRule {
                    selector: rule.locator.selector()?,
                    rule: rule.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules, context })
    }

    /// Extract one record per item, each tagged with `page_num`.
    pub fn extract(&self, items: &[ElementRef<'_>], page_num: u32) -> Vec<Record> {
        items
            .iter()
            .map(|item| self.extract_item(*item, page_num))
            .collect()
    }

    /// Extract a single record. Field order follows rule order.
    pub fn extract_item(&self, item: ElementRef<'_>, page_num: u32) -> Record {
        let fields = self
            .rules
            .iter()
            .map(|compiled| {
                let value = self.extract_field(item, compiled);
                (compiled.rule.field.clone(), value)
            })
            .collect();

        Record::new(fields, page_num)
    }

    fn extract_field(&self, item: ElementRef<'_>, compiled: &CompiledRule) -> Option<FieldValue> {
        let rule = &compiled.rule;
        let node = find(item, &compiled.selector)?;

        let raw = match rule.accessor {
            Accessor::Text => node.text().collect::<String>(),
            Accessor::LinkTarget => node.value().attr(LINK_ATTR)?.to_string(),
        };

        match rule.post_processor {
            Some(processor) => self.context.apply(processor, &raw, &rule.args),
            None => Some(FieldValue::Text(raw)),
        }
    }
}
