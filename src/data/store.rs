use rusqlite::Connection;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::{
    data::{AttendanceRecord, Student},
    error::Result,
};

const SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS students (
    serial      INTEGER PRIMARY KEY,
    id          INTEGER NOT NULL,
    name        TEXT NOT NULL,
    image_path  TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS attendance (
    id          INTEGER NOT NULL,
    name        TEXT NOT NULL,
    status      TEXT NOT NULL,
    timestamp   TEXT NOT NULL
);
";

/// The single-file record store behind the two ledgers.
///
/// Every operation opens its own connection and closes it on drop; sessions
/// are user-triggered and synchronous, so the store is never shared.
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let connection = Connection::open(&self.path)?;
        migrate(&connection)?;
        Ok(connection)
    }

    /// inserts or overwrites the row for this serial
    pub fn upsert_student(&self, student: &Student) -> Result<()> {
        let connection = self.open()?;
        connection.execute(
            "INSERT OR REPLACE INTO students (serial, id, name, image_path) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![student.serial, student.id, student.name, student.image_path],
        )?;
        Ok(())
    }

    /// the id to name mapping, snapshotted once at the start of a recognition session
    pub fn roster(&self) -> Result<HashMap<i32, String>> {
        let connection = self.open()?;
        let mut statement = connection.prepare("SELECT id, name FROM students")?;
        let rows = statement.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut roster = HashMap::new();
        for row in rows {
            let (id, name) = row?;
            roster.insert(id, name);
        }
        Ok(roster)
    }

    /// (label, sample path) pairs the trainer rebuilds the model from
    pub fn sample_manifest(&self) -> Result<Vec<(i32, PathBuf)>> {
        let connection = self.open()?;
        let mut statement =
            connection.prepare("SELECT id, image_path FROM students ORDER BY serial")?;
        let rows = statement.query_map([], |row| {
            Ok((row.get::<_, i32>(0)?, row.get::<_, String>(1)?))
        })?;
        let mut manifest = Vec::new();
        for row in rows {
            let (id, path) = row?;
            manifest.push((id, PathBuf::from(path)));
        }
        Ok(manifest)
    }

    pub fn insert_attendance(&self, record: &AttendanceRecord) -> Result<()> {
        let connection = self.open()?;
        connection.execute(
            "INSERT INTO attendance (id, name, status, timestamp) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![record.id, record.name, record.status, record.timestamp],
        )?;
        Ok(())
    }
}

/// One-time schema creation guarded by the database's own version marker,
/// so attendance history survives every later launch.
fn migrate(connection: &Connection) -> Result<()> {
    let version: i64 = connection.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version < SCHEMA_VERSION {
        connection.execute_batch(SCHEMA)?;
        connection.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn student(serial: i64, id: i32, name: &str) -> Student {
        Student {
            serial,
            id,
            name: name.to_string(),
            image_path: format!("TrainingImage/{}.{}.{}.jpg", name, serial, id),
        }
    }

    #[test]
    fn upsert_overwrites_instead_of_duplicating() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("store.db"));

        store.upsert_student(&student(1, 7, "Ada")).unwrap();
        store.upsert_student(&student(1, 9, "Grace")).unwrap();

        let connection = Connection::open(dir.path().join("store.db")).unwrap();
        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        let (id, name): (i32, String) = connection
            .query_row("SELECT id, name FROM students WHERE serial = 1", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!((id, name.as_str()), (9, "Grace"));
    }

    #[test]
    fn attendance_survives_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        let record = AttendanceRecord::present(7, "Ada", "2026-08-06 09:30:00".to_string());

        RecordStore::new(&path).insert_attendance(&record).unwrap();
        // a fresh handle runs the migration again, which must not reset anything
        let store = RecordStore::new(&path);
        store.upsert_student(&student(1, 7, "Ada")).unwrap();

        let connection = Connection::open(&path).unwrap();
        let (count, status, timestamp): (i64, String, String) = connection
            .query_row(
                "SELECT COUNT(*), status, timestamp FROM attendance",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(status, "Present");
        assert_eq!(timestamp, "2026-08-06 09:30:00");
    }

    #[test]
    fn roster_maps_id_to_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("store.db"));
        store.upsert_student(&student(1, 7, "Ada")).unwrap();
        store.upsert_student(&student(2, 8, "Grace")).unwrap();

        let roster = store.roster().unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get(&7).map(String::as_str), Some("Ada"));
        assert_eq!(roster.get(&8).map(String::as_str), Some("Grace"));
    }

    #[test]
    fn sample_manifest_lists_every_student_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("store.db"));
        store.upsert_student(&student(2, 8, "Grace")).unwrap();
        store.upsert_student(&student(1, 7, "Ada")).unwrap();
        // re-registration replaces the sample, not extends it
        store.upsert_student(&student(1, 7, "Ada")).unwrap();

        let manifest = store.sample_manifest().unwrap();
        assert_eq!(
            manifest,
            vec![
                (7, PathBuf::from("TrainingImage/Ada.1.7.jpg")),
                (8, PathBuf::from("TrainingImage/Grace.2.8.jpg")),
            ]
        );
    }
}
