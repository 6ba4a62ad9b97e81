//! Field-level value model for venue records.
//!
//! Reconciliation and store updates work on named fields rather than whole
//! records, so both get a shared vocabulary here: [`VenueField`] names every
//! field a merge is allowed to touch, and [`FieldValue`] carries the value in
//! a dynamically typed form that survives serialization and SQL boundaries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The primitive kind a venue field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Int,
    Float,
}

/// A dynamically typed field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
}

impl FieldValue {
    /// Whether this value counts as absent for reconciliation purposes.
    ///
    /// Missing values and blank text are empty. A numeric zero is a real
    /// value (`parking_spaces = 0` means "no parking"); unknown numerics are
    /// represented as `Null`, never as zero.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Int(_) | FieldValue::Float(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Int(n) => write!(f, "{}", n),
            FieldValue::Float(x) => write!(f, "{}", x),
        }
    }
}

/// A venue field that reconciliation may copy between records.
///
/// Identity (`id`), `name`, and raw coordinates are deliberately absent:
/// the surviving record keeps its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueField {
    Address,
    City,
    County,
    Postcode,
    Phone,
    Website,
    OpeningHours,
    ParkingSpaces,
    TotalFloorArea,
    NumberOfStores,
    NumberOfFloors,
    AnchorTenants,
    PublicTransit,
    Owner,
    Management,
    ManagementContact,
    ManagementEmail,
    ManagementPhone,
    OpenedYear,
    HeroImage,
    Facebook,
    Instagram,
    Twitter,
    Youtube,
    Tiktok,
    GoogleRating,
    GoogleReviews,
    GoogleVotes,
}

impl VenueField {
    /// Every mergeable field, in reconciliation order.
    pub const ALL: [VenueField; 28] = [
        VenueField::Address,
        VenueField::City,
        VenueField::County,
        VenueField::Postcode,
        VenueField::Phone,
        VenueField::Website,
        VenueField::OpeningHours,
        VenueField::ParkingSpaces,
        VenueField::TotalFloorArea,
        VenueField::NumberOfStores,
        VenueField::NumberOfFloors,
        VenueField::AnchorTenants,
        VenueField::PublicTransit,
        VenueField::Owner,
        VenueField::Management,
        VenueField::ManagementContact,
        VenueField::ManagementEmail,
        VenueField::ManagementPhone,
        VenueField::OpenedYear,
        VenueField::HeroImage,
        VenueField::Facebook,
        VenueField::Instagram,
        VenueField::Twitter,
        VenueField::Youtube,
        VenueField::Tiktok,
        VenueField::GoogleRating,
        VenueField::GoogleReviews,
        VenueField::GoogleVotes,
    ];

    /// Stable column/JSON name.
    pub fn name(&self) -> &'static str {
        match self {
            VenueField::Address => "address",
            VenueField::City => "city",
            VenueField::County => "county",
            VenueField::Postcode => "postcode",
            VenueField::Phone => "phone",
            VenueField::Website => "website",
            VenueField::OpeningHours => "opening_hours",
            VenueField::ParkingSpaces => "parking_spaces",
            VenueField::TotalFloorArea => "total_floor_area",
            VenueField::NumberOfStores => "number_of_stores",
            VenueField::NumberOfFloors => "number_of_floors",
            VenueField::AnchorTenants => "anchor_tenants",
            VenueField::PublicTransit => "public_transit",
            VenueField::Owner => "owner",
            VenueField::Management => "management",
            VenueField::ManagementContact => "management_contact",
            VenueField::ManagementEmail => "management_email",
            VenueField::ManagementPhone => "management_phone",
            VenueField::OpenedYear => "opened_year",
            VenueField::HeroImage => "hero_image",
            VenueField::Facebook => "facebook",
            VenueField::Instagram => "instagram",
            VenueField::Twitter => "twitter",
            VenueField::Youtube => "youtube",
            VenueField::Tiktok => "tiktok",
            VenueField::GoogleRating => "google_rating",
            VenueField::GoogleReviews => "google_reviews",
            VenueField::GoogleVotes => "google_votes",
        }
    }

    /// The value kind this field stores.
    pub fn kind(&self) -> FieldKind {
        match self {
            VenueField::ParkingSpaces
            | VenueField::TotalFloorArea
            | VenueField::NumberOfStores
            | VenueField::NumberOfFloors
            | VenueField::AnchorTenants
            | VenueField::OpenedYear
            | VenueField::GoogleReviews
            | VenueField::GoogleVotes => FieldKind::Int,
            VenueField::GoogleRating => FieldKind::Float,
            _ => FieldKind::Text,
        }
    }
}

impl fmt::Display for VenueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_blank_text_are_empty() {
        assert!(FieldValue::Null.is_empty());
        assert!(FieldValue::Text("".into()).is_empty());
        assert!(FieldValue::Text("   ".into()).is_empty());
        assert!(!FieldValue::Text("x".into()).is_empty());
    }

    #[test]
    fn numeric_zero_is_a_value() {
        assert!(!FieldValue::Int(0).is_empty());
        assert!(!FieldValue::Float(0.0).is_empty());
    }

    #[test]
    fn field_names_are_unique() {
        let mut names: Vec<&str> = VenueField::ALL.iter().map(|f| f.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), VenueField::ALL.len());
    }

    #[test]
    fn field_value_serde_round_trip() {
        let values = vec![
            FieldValue::Null,
            FieldValue::Text("High Street".into()),
            FieldValue::Int(42),
            FieldValue::Float(4.3),
        ];
        for v in &values {
            let json = serde_json::to_string(v).unwrap();
            let back: FieldValue = serde_json::from_str(&json).unwrap();
            assert_eq!(*v, back);
        }
    }
}
