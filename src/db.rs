//! Persistence for hospitals and bookings.
//!
//! A thin data-access layer over SQLite; the conversation engine treats it
//! as the booking repository.

mod schema;

pub use schema::*;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type DbResult<T> = Result<T, DbError>;

const DEMO_HOSPITALS: &[(&str, &str, f64, f64, i64, &str)] = &[
    (
        "St. Mary Medical Center",
        "12 Hill Road, Andheri West",
        19.1197,
        72.8468,
        12,
        "+91 22 2674 1001",
    ),
    (
        "City General Hospital",
        "48 Marine Drive",
        18.9430,
        72.8238,
        5,
        "+91 22 2282 0450",
    ),
    (
        "Riverside Community Clinic",
        "3 Riverside Lane, Mahim",
        19.0176,
        72.8562,
        2,
        "+91 22 2431 7788",
    ),
];

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ==================== Hospital Operations ====================

    /// List hospitals in insertion order, bounded by `limit`
    pub fn list_hospitals(&self, limit: u32) -> DbResult<Vec<Hospital>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, address, latitude, longitude, available_beds, phone
             FROM hospitals ORDER BY rowid LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit], hospital_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Look up a hospital by id
    pub fn get_hospital(&self, id: &str) -> DbResult<Option<Hospital>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, address, latitude, longitude, available_beds, phone
             FROM hospitals WHERE id = ?1",
        )?;

        match stmt.query_row(params![id], hospital_from_row) {
            Ok(hospital) => Ok(Some(hospital)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(other) => Err(DbError::Sqlite(other)),
        }
    }

    pub fn insert_hospital(&self, hospital: &Hospital) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO hospitals (id, name, address, latitude, longitude, available_beds, phone)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                hospital.id,
                hospital.name,
                hospital.address,
                hospital.latitude,
                hospital.longitude,
                hospital.available_beds,
                hospital.phone
            ],
        )?;
        Ok(())
    }

    pub fn count_hospitals(&self) -> DbResult<i64> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row("SELECT COUNT(*) FROM hospitals", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Insert a small fixed set of hospitals for local development
    pub fn seed_demo_hospitals(&self) -> DbResult<usize> {
        for (name, address, latitude, longitude, beds, phone) in DEMO_HOSPITALS {
            self.insert_hospital(&Hospital {
                id: Uuid::new_v4().to_string(),
                name: (*name).to_string(),
                address: Some((*address).to_string()),
                latitude: Some(*latitude),
                longitude: Some(*longitude),
                available_beds: *beds,
                phone: Some((*phone).to_string()),
            })?;
        }
        Ok(DEMO_HOSPITALS.len())
    }

    // ==================== Booking Operations ====================

    /// Create a booking with server-assigned id, timestamps and defaults
    pub fn create_booking(
        &self,
        user_id: &str,
        hospital_id: &str,
        requires_ambulance: bool,
    ) -> DbResult<Booking> {
        let conn = self.conn.lock().unwrap();
        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            hospital_id: hospital_id.to_string(),
            status: BookingStatus::default(),
            requires_ambulance,
            payment_status: PaymentStatus::default(),
            created_at: Utc::now(),
        };

        conn.execute(
            "INSERT INTO bookings (id, user_id, hospital_id, status, requires_ambulance, payment_status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                booking.id,
                booking.user_id,
                booking.hospital_id,
                booking.status.as_str(),
                booking.requires_ambulance,
                booking.payment_status.as_str(),
                booking.created_at.to_rfc3339()
            ],
        )?;

        Ok(booking)
    }

    /// Bookings for one user, oldest first
    #[allow(dead_code)] // Used in tests
    pub fn bookings_for_user(&self, user_id: &str) -> DbResult<Vec<Booking>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, hospital_id, status, requires_ambulance, payment_status, created_at
             FROM bookings WHERE user_id = ?1 ORDER BY rowid",
        )?;

        let rows = stmt.query_map(params![user_id], booking_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }
}

fn hospital_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Hospital> {
    Ok(Hospital {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        latitude: row.get(3)?,
        longitude: row.get(4)?,
        available_beds: row.get(5)?,
        phone: row.get(6)?,
    })
}

fn booking_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Booking> {
    Ok(Booking {
        id: row.get(0)?,
        user_id: row.get(1)?,
        hospital_id: row.get(2)?,
        status: BookingStatus::parse(row.get::<_, String>(3)?.as_str()),
        requires_ambulance: row.get(4)?,
        payment_status: PaymentStatus::parse(row.get::<_, String>(5)?.as_str()),
        created_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

fn parse_datetime(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
