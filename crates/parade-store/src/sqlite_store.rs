//! SQLite-backed venue and tenant store.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::types::{Type, Value};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use parade_domain::{FieldValue, TenantId, TenantRecord, VenueId, VenueRecord};

use crate::store::{StoreError, TenantStore, VenueFilter, VenuePatch, VenueStore};

const VENUE_COLUMNS: &str = "id, name, address, city, county, postcode, phone, website, \
     latitude, longitude, description, opening_hours, parking_spaces, total_floor_area, \
     number_of_stores, number_of_floors, anchor_tenants, public_transit, owner, management, \
     management_contact, management_email, management_phone, opened_year, hero_image, \
     facebook, instagram, twitter, youtube, tiktok, google_rating, google_reviews, google_votes";

/// SQLite-backed implementation of [`VenueStore`] and [`TenantStore`].
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn =
            Connection::open(path).map_err(|e| StoreError::Storage(format!("open: {}", e)))?;
        Self::init_with_connection(conn)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Storage(format!("open_in_memory: {}", e)))?;
        Self::init_with_connection(conn)
    }

    fn init_with_connection(conn: Connection) -> Result<Self, StoreError> {
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS venues (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                address TEXT,
                city TEXT,
                county TEXT,
                postcode TEXT,
                phone TEXT,
                website TEXT,
                latitude REAL NOT NULL DEFAULT 0,
                longitude REAL NOT NULL DEFAULT 0,
                description TEXT,
                opening_hours TEXT,
                parking_spaces INTEGER,
                total_floor_area INTEGER,
                number_of_stores INTEGER,
                number_of_floors INTEGER,
                anchor_tenants INTEGER,
                public_transit TEXT,
                owner TEXT,
                management TEXT,
                management_contact TEXT,
                management_email TEXT,
                management_phone TEXT,
                opened_year INTEGER,
                hero_image TEXT,
                facebook TEXT,
                instagram TEXT,
                twitter TEXT,
                youtube TEXT,
                tiktok TEXT,
                google_rating REAL,
                google_reviews INTEGER,
                google_votes INTEGER
            );

            CREATE TABLE IF NOT EXISTS tenants (
                id TEXT PRIMARY KEY,
                location_id TEXT NOT NULL REFERENCES venues(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                category TEXT,
                is_anchor INTEGER NOT NULL DEFAULT 0,
                UNIQUE (location_id, name)
            );

            CREATE INDEX IF NOT EXISTS idx_tenants_location ON tenants(location_id);
            CREATE INDEX IF NOT EXISTS idx_venues_website ON venues(website);
            ",
        )
        .map_err(|e| StoreError::Storage(format!("init schema: {}", e)))?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))
    }
}

fn row_to_venue(row: &Row) -> rusqlite::Result<VenueRecord> {
    let id_str: String = row.get(0)?;
    let id = Uuid::parse_str(&id_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
    Ok(VenueRecord {
        id,
        name: row.get(1)?,
        address: row.get(2)?,
        city: row.get(3)?,
        county: row.get(4)?,
        postcode: row.get(5)?,
        phone: row.get(6)?,
        website: row.get(7)?,
        latitude: row.get(8)?,
        longitude: row.get(9)?,
        description: row.get(10)?,
        opening_hours: row.get(11)?,
        parking_spaces: row.get(12)?,
        total_floor_area: row.get(13)?,
        number_of_stores: row.get(14)?,
        number_of_floors: row.get(15)?,
        anchor_tenants: row.get(16)?,
        public_transit: row.get(17)?,
        owner: row.get(18)?,
        management: row.get(19)?,
        management_contact: row.get(20)?,
        management_email: row.get(21)?,
        management_phone: row.get(22)?,
        opened_year: row.get(23)?,
        hero_image: row.get(24)?,
        facebook: row.get(25)?,
        instagram: row.get(26)?,
        twitter: row.get(27)?,
        youtube: row.get(28)?,
        tiktok: row.get(29)?,
        google_rating: row.get(30)?,
        google_reviews: row.get(31)?,
        google_votes: row.get(32)?,
    })
}

fn row_to_tenant(row: &Row) -> rusqlite::Result<TenantRecord> {
    let id_str: String = row.get(0)?;
    let id = Uuid::parse_str(&id_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
    let parent_str: String = row.get(1)?;
    let location_id = Uuid::parse_str(&parent_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    Ok(TenantRecord {
        id,
        location_id,
        name: row.get(2)?,
        category: row.get(3)?,
        is_anchor: row.get(4)?,
    })
}

fn field_value_to_sql(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Text(s) => Value::Text(s.clone()),
        FieldValue::Int(n) => Value::Integer(*n),
        FieldValue::Float(f) => Value::Real(*f),
    }
}

impl VenueStore for SqliteStore {
    fn insert(&self, venue: &VenueRecord) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let id_str = venue.id.to_string();

        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) FROM venues WHERE id = ?1",
                params![&id_str],
                |row| row.get::<_, i64>(0),
            )
            .map(|c| c > 0)
            .map_err(|e| StoreError::Storage(format!("check exists: {}", e)))?;
        if exists {
            return Err(StoreError::AlreadyExists(venue.id));
        }

        conn.execute(
            &format!(
                "INSERT INTO venues ({VENUE_COLUMNS}) VALUES (\
                 ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, \
                 ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30, ?31, ?32, ?33)"
            ),
            params![
                id_str,
                venue.name,
                venue.address,
                venue.city,
                venue.county,
                venue.postcode,
                venue.phone,
                venue.website,
                venue.latitude,
                venue.longitude,
                venue.description,
                venue.opening_hours,
                venue.parking_spaces,
                venue.total_floor_area,
                venue.number_of_stores,
                venue.number_of_floors,
                venue.anchor_tenants,
                venue.public_transit,
                venue.owner,
                venue.management,
                venue.management_contact,
                venue.management_email,
                venue.management_phone,
                venue.opened_year,
                venue.hero_image,
                venue.facebook,
                venue.instagram,
                venue.twitter,
                venue.youtube,
                venue.tiktok,
                venue.google_rating,
                venue.google_reviews,
                venue.google_votes,
            ],
        )
        .map_err(|e| StoreError::Storage(format!("insert venue: {}", e)))?;
        Ok(())
    }

    fn find_all(&self, filter: &VenueFilter) -> Result<Vec<VenueRecord>, StoreError> {
        let conn = self.lock()?;
        let sql = if filter.website_only {
            format!(
                "SELECT {VENUE_COLUMNS} FROM venues \
                 WHERE website IS NOT NULL AND TRIM(website) != '' ORDER BY rowid"
            )
        } else {
            format!("SELECT {VENUE_COLUMNS} FROM venues ORDER BY rowid")
        };
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| StoreError::Storage(format!("prepare find_all: {}", e)))?;
        let rows = stmt
            .query_map([], row_to_venue)
            .map_err(|e| StoreError::Storage(format!("query find_all: {}", e)))?;
        let mut venues = Vec::new();
        for row in rows {
            venues.push(row.map_err(|e| StoreError::Storage(format!("read venue row: {}", e)))?);
        }
        Ok(venues)
    }

    fn get(&self, id: VenueId) -> Result<Option<VenueRecord>, StoreError> {
        let conn = self.lock()?;
        let result = conn.query_row(
            &format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = ?1"),
            params![id.to_string()],
            row_to_venue,
        );
        match result {
            Ok(venue) => Ok(Some(venue)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Storage(format!("get venue: {}", e))),
        }
    }

    fn update(&self, id: VenueId, patch: &VenuePatch) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let id_str = id.to_string();

        let exists: bool = conn
            .query_row(
                "SELECT COUNT(*) FROM venues WHERE id = ?1",
                params![&id_str],
                |row| row.get::<_, i64>(0),
            )
            .map(|c| c > 0)
            .map_err(|e| StoreError::Storage(format!("check exists: {}", e)))?;
        if !exists {
            return Err(StoreError::NotFound(id));
        }

        for (field, value) in patch.iter() {
            // Column names come from the VenueField enum, never from input.
            conn.execute(
                &format!("UPDATE venues SET {} = ?1 WHERE id = ?2", field.name()),
                params![field_value_to_sql(value), &id_str],
            )
            .map_err(|e| StoreError::Storage(format!("set {}: {}", field.name(), e)))?;
        }
        Ok(())
    }

    fn delete(&self, id: VenueId) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let affected = conn
            .execute(
                "DELETE FROM venues WHERE id = ?1",
                params![id.to_string()],
            )
            .map_err(|e| StoreError::Storage(format!("delete venue: {}", e)))?;
        if affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

impl TenantStore for SqliteStore {
    fn insert(&self, tenant: &TenantRecord) -> Result<(), StoreError> {
        if let Some(existing) =
            self.find_by_parent_and_name(tenant.location_id, &tenant.name)?
        {
            return Err(StoreError::AlreadyExists(existing.id));
        }
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO tenants (id, location_id, name, category, is_anchor) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                tenant.id.to_string(),
                tenant.location_id.to_string(),
                tenant.name,
                tenant.category,
                tenant.is_anchor,
            ],
        )
        .map_err(|e| StoreError::Storage(format!("insert tenant: {}", e)))?;
        Ok(())
    }

    fn find_by_parent(&self, location_id: VenueId) -> Result<Vec<TenantRecord>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, location_id, name, category, is_anchor FROM tenants \
                 WHERE location_id = ?1 ORDER BY rowid",
            )
            .map_err(|e| StoreError::Storage(format!("prepare find_by_parent: {}", e)))?;
        let rows = stmt
            .query_map(params![location_id.to_string()], row_to_tenant)
            .map_err(|e| StoreError::Storage(format!("query find_by_parent: {}", e)))?;
        let mut tenants = Vec::new();
        for row in rows {
            tenants.push(row.map_err(|e| StoreError::Storage(format!("read tenant row: {}", e)))?);
        }
        Ok(tenants)
    }

    fn find_by_parent_and_name(
        &self,
        location_id: VenueId,
        name: &str,
    ) -> Result<Option<TenantRecord>, StoreError> {
        let conn = self.lock()?;
        let result = conn.query_row(
            "SELECT id, location_id, name, category, is_anchor FROM tenants \
             WHERE location_id = ?1 AND name = ?2",
            params![location_id.to_string(), name],
            row_to_tenant,
        );
        match result {
            Ok(tenant) => Ok(Some(tenant)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Storage(format!("find tenant by name: {}", e))),
        }
    }

    fn update_parent(
        &self,
        tenant_id: TenantId,
        new_location_id: VenueId,
    ) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let affected = conn
            .execute(
                "UPDATE tenants SET location_id = ?1 WHERE id = ?2",
                params![new_location_id.to_string(), tenant_id.to_string()],
            )
            .map_err(|e| StoreError::Storage(format!("update tenant parent: {}", e)))?;
        if affected == 0 {
            return Err(StoreError::NotFound(tenant_id));
        }
        Ok(())
    }

    fn delete(&self, tenant_id: TenantId) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let affected = conn
            .execute(
                "DELETE FROM tenants WHERE id = ?1",
                params![tenant_id.to_string()],
            )
            .map_err(|e| StoreError::Storage(format!("delete tenant: {}", e)))?;
        if affected == 0 {
            return Err(StoreError::NotFound(tenant_id));
        }
        Ok(())
    }
}
