//! Record shaper: maps extracted records onto the output document shape.

use crate::models::config::fields;
use crate::models::{Listing, NamedPlace, Place, PropertyValue, Record};

/// Builds output listings, nesting every neighborhood in one wider place.
pub struct RecordShaper {
    location: String,
}

impl RecordShaper {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    pub fn shape(&self, records: &[Record]) -> Vec<Listing> {
        records.iter().map(|r| self.shape_one(r)).collect()
    }

    /// Values are carried over as-is; a missing field becomes `null`.
    pub fn shape_one(&self, record: &Record) -> Listing {
        let field = |name: &str| record.get(name).cloned();

        Listing {
            name: field(fields::TITLE),
            url: field(fields::URL),
            contained_in: Place {
                name: field(fields::NEIGHBORHOOD),
                contained_in_place: NamedPlace {
                    name: self.location.clone(),
                },
            },
            additional_property: PropertyValue::price(field(fields::PRICE)),
            date: field(fields::DATE),
        }
    }
}
