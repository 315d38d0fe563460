pub mod ledger;
pub mod store;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// the three registration fields exactly as typed into the interface
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub serial: String,
    pub id: String,
    pub name: String,
}

impl RegistrationForm {
    /// checks every field before any camera or store resource is touched
    pub fn validate(&self) -> Result<Registration> {
        let serial: i64 = self.serial.trim().parse().map_err(|_| Error::InvalidSerial)?;
        if serial < 0 {
            return Err(Error::InvalidSerial);
        }
        // the recognizer labels faces with i32, which bounds the id
        let id: i32 = self.id.trim().parse().map_err(|_| Error::InvalidId)?;
        if id < 0 {
            return Err(Error::InvalidId);
        }
        let name = self.name.trim();
        if name.is_empty() || !name.chars().all(char::is_alphabetic) {
            return Err(Error::InvalidName);
        }
        Ok(Registration {
            serial,
            id,
            name: name.to_string(),
        })
    }
}

/// a validated registration, ready to drive a capture session
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub serial: i64,
    pub id: i32,
    pub name: String,
}

impl Registration {
    /// where this registration's face sample lives on disk
    pub fn sample_path(&self, training_dir: &Path) -> PathBuf {
        training_dir.join(format!("{}.{}.{}.jpg", self.name, self.serial, self.id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub serial: i64,
    pub id: i32,
    pub name: String,
    pub image_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: i32,
    pub name: String,
    pub status: String,
    pub timestamp: String,
}

impl AttendanceRecord {
    pub fn present(id: i32, name: &str, timestamp: String) -> Self {
        Self {
            id,
            name: name.to_string(),
            status: "Present".to_string(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn form(serial: &str, id: &str, name: &str) -> RegistrationForm {
        RegistrationForm {
            serial: serial.to_string(),
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn valid_form_parses() {
        let registration = form("12", "7", "Ada").validate().unwrap();
        assert_eq!(
            registration,
            Registration {
                serial: 12,
                id: 7,
                name: "Ada".to_string()
            }
        );
    }

    #[test]
    fn fields_are_trimmed() {
        let registration = form(" 3 ", "44", "  Grace ").validate().unwrap();
        assert_eq!(registration.serial, 3);
        assert_eq!(registration.name, "Grace");
    }

    #[test]
    fn bad_serial_is_rejected() {
        assert_eq!(form("twelve", "7", "Ada").validate(), Err(Error::InvalidSerial));
        assert_eq!(form("", "7", "Ada").validate(), Err(Error::InvalidSerial));
        assert_eq!(form("-2", "7", "Ada").validate(), Err(Error::InvalidSerial));
    }

    #[test]
    fn bad_id_is_rejected() {
        assert_eq!(form("12", "7.5", "Ada").validate(), Err(Error::InvalidId));
        assert_eq!(form("12", "-1", "Ada").validate(), Err(Error::InvalidId));
    }

    #[test]
    fn bad_name_is_rejected() {
        assert_eq!(form("12", "7", "Ada1").validate(), Err(Error::InvalidName));
        assert_eq!(form("12", "7", "").validate(), Err(Error::InvalidName));
        assert_eq!(form("12", "7", "Ada Lovelace").validate(), Err(Error::InvalidName));
    }

    #[test]
    fn sample_path_encodes_the_triple() {
        let registration = form("12", "7", "Ada").validate().unwrap();
        assert_eq!(
            registration.sample_path(Path::new("TrainingImage")),
            Path::new("TrainingImage/Ada.12.7.jpg")
        );
    }

    #[test]
    fn present_record_carries_the_status_constant() {
        let record = AttendanceRecord::present(7, "Ada", "2026-08-06 09:30:00".to_string());
        assert_eq!(record.status, "Present");
        assert_eq!(record.name, "Ada");
    }
}
