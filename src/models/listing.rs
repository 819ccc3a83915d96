//! Output document shape for a single listing.

use serde::{Deserialize, Serialize};

use super::FieldValue;

/// Currency attached to every price.
pub const CURRENCY: &str = "USD";

/// Property name attached to every price.
pub const PRICE_PROPERTY: &str = "price";

/// One element of the output JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub name: Option<FieldValue>,
    pub url: Option<FieldValue>,
    pub contained_in: Place,
    pub additional_property: PropertyValue,
    pub date: Option<FieldValue>,
}

/// Neighborhood the listing is in, nested inside the wider location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub name: Option<FieldValue>,
    pub contained_in_place: NamedPlace,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPlace {
    pub name: String,
}

/// Price as a name/value pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    pub name: String,
    pub value: Option<FieldValue>,
    pub currency: String,
}

impl PropertyValue {
    pub fn price(value: Option<FieldValue>) -> Self {
        Self {
            name: PRICE_PROPERTY.to_string(),
            value,
            currency: CURRENCY.to_string(),
        }
    }
}
