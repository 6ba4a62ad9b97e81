//! Venue records: shopping centres, retail parks, and outlet villages.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::field::{FieldValue, VenueField};

/// Unique venue identifier.
pub type VenueId = Uuid;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A retail venue with its matching and enrichment fields.
///
/// `latitude`/`longitude` keep the legacy storage convention where exactly
/// `(0.0, 0.0)` means "never geocoded". Use [`VenueRecord::position`] instead
/// of reading the raw columns so the sentinel cannot be mistaken for a real
/// point off the coast of Ghana.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueRecord {
    pub id: VenueId,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub county: Option<String>,
    pub postcode: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
    pub opening_hours: Option<String>,
    pub parking_spaces: Option<u32>,
    pub total_floor_area: Option<u32>,
    pub number_of_stores: Option<u32>,
    pub number_of_floors: Option<u32>,
    pub anchor_tenants: Option<u32>,
    pub public_transit: Option<String>,
    pub owner: Option<String>,
    pub management: Option<String>,
    pub management_contact: Option<String>,
    pub management_email: Option<String>,
    pub management_phone: Option<String>,
    pub opened_year: Option<i32>,
    pub hero_image: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub youtube: Option<String>,
    pub tiktok: Option<String>,
    pub google_rating: Option<f64>,
    pub google_reviews: Option<u32>,
    pub google_votes: Option<u32>,
}

impl VenueRecord {
    /// Create an empty venue with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            address: None,
            city: None,
            county: None,
            postcode: None,
            phone: None,
            website: None,
            latitude: 0.0,
            longitude: 0.0,
            description: None,
            opening_hours: None,
            parking_spaces: None,
            total_floor_area: None,
            number_of_stores: None,
            number_of_floors: None,
            anchor_tenants: None,
            public_transit: None,
            owner: None,
            management: None,
            management_contact: None,
            management_email: None,
            management_phone: None,
            opened_year: None,
            hero_image: None,
            facebook: None,
            instagram: None,
            twitter: None,
            youtube: None,
            tiktok: None,
            google_rating: None,
            google_reviews: None,
            google_votes: None,
        }
    }

    /// The venue's position, or `None` when it was never geocoded.
    pub fn position(&self) -> Option<Coordinates> {
        if self.latitude == 0.0 && self.longitude == 0.0 {
            None
        } else {
            Some(Coordinates {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Read a mergeable field as a dynamic value.
    pub fn field(&self, field: VenueField) -> FieldValue {
        match field {
            VenueField::Address => text(&self.address),
            VenueField::City => text(&self.city),
            VenueField::County => text(&self.county),
            VenueField::Postcode => text(&self.postcode),
            VenueField::Phone => text(&self.phone),
            VenueField::Website => text(&self.website),
            VenueField::OpeningHours => text(&self.opening_hours),
            VenueField::ParkingSpaces => int(&self.parking_spaces),
            VenueField::TotalFloorArea => int(&self.total_floor_area),
            VenueField::NumberOfStores => int(&self.number_of_stores),
            VenueField::NumberOfFloors => int(&self.number_of_floors),
            VenueField::AnchorTenants => int(&self.anchor_tenants),
            VenueField::PublicTransit => text(&self.public_transit),
            VenueField::Owner => text(&self.owner),
            VenueField::Management => text(&self.management),
            VenueField::ManagementContact => text(&self.management_contact),
            VenueField::ManagementEmail => text(&self.management_email),
            VenueField::ManagementPhone => text(&self.management_phone),
            VenueField::OpenedYear => self
                .opened_year
                .map(|y| FieldValue::Int(i64::from(y)))
                .unwrap_or(FieldValue::Null),
            VenueField::HeroImage => text(&self.hero_image),
            VenueField::Facebook => text(&self.facebook),
            VenueField::Instagram => text(&self.instagram),
            VenueField::Twitter => text(&self.twitter),
            VenueField::Youtube => text(&self.youtube),
            VenueField::Tiktok => text(&self.tiktok),
            VenueField::GoogleRating => self
                .google_rating
                .map(FieldValue::Float)
                .unwrap_or(FieldValue::Null),
            VenueField::GoogleReviews => int(&self.google_reviews),
            VenueField::GoogleVotes => int(&self.google_votes),
        }
    }

    /// Write a mergeable field from a dynamic value.
    ///
    /// Returns `false` when the value's kind does not fit the field (for
    /// example text into a numeric column); the record is left unchanged.
    pub fn set_field(&mut self, field: VenueField, value: &FieldValue) -> bool {
        match field {
            VenueField::Address => set_text(&mut self.address, value),
            VenueField::City => set_text(&mut self.city, value),
            VenueField::County => set_text(&mut self.county, value),
            VenueField::Postcode => set_text(&mut self.postcode, value),
            VenueField::Phone => set_text(&mut self.phone, value),
            VenueField::Website => set_text(&mut self.website, value),
            VenueField::OpeningHours => set_text(&mut self.opening_hours, value),
            VenueField::ParkingSpaces => set_u32(&mut self.parking_spaces, value),
            VenueField::TotalFloorArea => set_u32(&mut self.total_floor_area, value),
            VenueField::NumberOfStores => set_u32(&mut self.number_of_stores, value),
            VenueField::NumberOfFloors => set_u32(&mut self.number_of_floors, value),
            VenueField::AnchorTenants => set_u32(&mut self.anchor_tenants, value),
            VenueField::PublicTransit => set_text(&mut self.public_transit, value),
            VenueField::Owner => set_text(&mut self.owner, value),
            VenueField::Management => set_text(&mut self.management, value),
            VenueField::ManagementContact => set_text(&mut self.management_contact, value),
            VenueField::ManagementEmail => set_text(&mut self.management_email, value),
            VenueField::ManagementPhone => set_text(&mut self.management_phone, value),
            VenueField::OpenedYear => set_i32(&mut self.opened_year, value),
            VenueField::HeroImage => set_text(&mut self.hero_image, value),
            VenueField::Facebook => set_text(&mut self.facebook, value),
            VenueField::Instagram => set_text(&mut self.instagram, value),
            VenueField::Twitter => set_text(&mut self.twitter, value),
            VenueField::Youtube => set_text(&mut self.youtube, value),
            VenueField::Tiktok => set_text(&mut self.tiktok, value),
            VenueField::GoogleRating => set_f64(&mut self.google_rating, value),
            VenueField::GoogleReviews => set_u32(&mut self.google_reviews, value),
            VenueField::GoogleVotes => set_u32(&mut self.google_votes, value),
        }
    }
}

fn text(slot: &Option<String>) -> FieldValue {
    match slot {
        Some(s) => FieldValue::Text(s.clone()),
        None => FieldValue::Null,
    }
}

fn int(slot: &Option<u32>) -> FieldValue {
    match slot {
        Some(n) => FieldValue::Int(i64::from(*n)),
        None => FieldValue::Null,
    }
}

fn set_text(slot: &mut Option<String>, value: &FieldValue) -> bool {
    match value {
        FieldValue::Null => {
            *slot = None;
            true
        }
        FieldValue::Text(s) => {
            *slot = Some(s.clone());
            true
        }
        _ => false,
    }
}

fn set_u32(slot: &mut Option<u32>, value: &FieldValue) -> bool {
    match value {
        FieldValue::Null => {
            *slot = None;
            true
        }
        FieldValue::Int(n) => match u32::try_from(*n) {
            Ok(v) => {
                *slot = Some(v);
                true
            }
            Err(_) => false,
        },
        _ => false,
    }
}

fn set_i32(slot: &mut Option<i32>, value: &FieldValue) -> bool {
    match value {
        FieldValue::Null => {
            *slot = None;
            true
        }
        FieldValue::Int(n) => match i32::try_from(*n) {
            Ok(v) => {
                *slot = Some(v);
                true
            }
            Err(_) => false,
        },
        _ => false,
    }
}

fn set_f64(slot: &mut Option<f64>, value: &FieldValue) -> bool {
    match value {
        FieldValue::Null => {
            *slot = None;
            true
        }
        FieldValue::Float(f) => {
            *slot = Some(*f);
            true
        }
        FieldValue::Int(n) => {
            *slot = Some(*n as f64);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_coordinates_mean_unknown() {
        let venue = VenueRecord::new("Crown Point");
        assert_eq!(venue.position(), None);
    }

    #[test]
    fn real_coordinates_round_trip() {
        let mut venue = VenueRecord::new("Crown Point");
        venue.latitude = 53.7743;
        venue.longitude = -1.5438;
        let pos = venue.position().unwrap();
        assert_eq!(pos.latitude, 53.7743);
        assert_eq!(pos.longitude, -1.5438);
    }

    #[test]
    fn zero_latitude_alone_is_known() {
        // A venue on the equator is real; only the exact origin is the sentinel.
        let mut venue = VenueRecord::new("Equator Retail");
        venue.longitude = 6.52;
        assert!(venue.position().is_some());
    }

    #[test]
    fn field_get_set_round_trip() {
        let mut venue = VenueRecord::new("Crown Point");
        for field in VenueField::ALL {
            assert!(
                venue.field(field).is_empty(),
                "new record should be empty at {field}"
            );
        }
        assert!(venue.set_field(VenueField::Phone, &FieldValue::Text("0113 245".into())));
        assert!(venue.set_field(VenueField::ParkingSpaces, &FieldValue::Int(800)));
        assert!(venue.set_field(VenueField::GoogleRating, &FieldValue::Float(4.2)));
        assert_eq!(venue.phone.as_deref(), Some("0113 245"));
        assert_eq!(venue.parking_spaces, Some(800));
        assert_eq!(venue.google_rating, Some(4.2));
        assert_eq!(venue.field(VenueField::ParkingSpaces), FieldValue::Int(800));
    }

    #[test]
    fn set_field_rejects_kind_mismatch() {
        let mut venue = VenueRecord::new("Crown Point");
        assert!(!venue.set_field(VenueField::ParkingSpaces, &FieldValue::Text("lots".into())));
        assert!(!venue.set_field(VenueField::ParkingSpaces, &FieldValue::Int(-4)));
        assert_eq!(venue.parking_spaces, None);
    }

    #[test]
    fn int_accepted_into_float_field() {
        let mut venue = VenueRecord::new("Crown Point");
        assert!(venue.set_field(VenueField::GoogleRating, &FieldValue::Int(4)));
        assert_eq!(venue.google_rating, Some(4.0));
    }
}
