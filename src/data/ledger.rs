//! Human-readable CSV mirrors of the record store tables.

use serde::Serialize;
use std::{fs::OpenOptions, path::Path};

use crate::error::Result;

/// appends one record, writing the header only when the file is created
pub fn append<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let write_header = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(write_header)
        .from_writer(file);
    writer.serialize(record)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::append;
    use crate::data::{AttendanceRecord, Student};

    #[test]
    fn header_is_written_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("StudentDetails.csv");
        let ada = Student {
            serial: 1,
            id: 7,
            name: "Ada".to_string(),
            image_path: "TrainingImage/Ada.1.7.jpg".to_string(),
        };
        let grace = Student {
            serial: 2,
            id: 8,
            name: "Grace".to_string(),
            image_path: "TrainingImage/Grace.2.8.jpg".to_string(),
        };

        append(&path, &ada).unwrap();
        append(&path, &grace).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 3);
        assert!(contents.starts_with("serial,id,name,image_path"));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<Student> = reader.deserialize().map(|row| row.unwrap()).collect();
        assert_eq!(rows, vec![ada, grace]);
    }

    #[test]
    fn attendance_rows_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Attendance.csv");
        let record = AttendanceRecord::present(7, "Ada", "2026-08-06 09:30:00".to_string());

        append(&path, &record).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<AttendanceRecord> = reader.deserialize().map(|row| row.unwrap()).collect();
        assert_eq!(rows, vec![record]);
    }

    #[test]
    fn missing_parent_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Attendance").join("Attendance.csv");
        let record = AttendanceRecord::present(7, "Ada", "2026-08-06 09:30:00".to_string());

        append(&path, &record).unwrap();
        assert!(path.exists());
    }
}
