use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: String,
    pub patient_name: String,
    pub email: String,
    pub phone: String,
    pub department: Department,
    pub date: NaiveDate,
    pub time: String,
    pub reason: String,
    pub status: AppointmentStatus,
    pub booked_at: DateTime<Utc>,
}

impl Appointment {
    /// Still scheduled and not before `today`. Time of day is ignored.
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.status == AppointmentStatus::Scheduled && self.date >= today
    }

    /// Exact complement of [`Appointment::is_upcoming`].
    pub fn is_past(&self, today: NaiveDate) -> bool {
        !self.is_upcoming(today)
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "Scheduled"),
            AppointmentStatus::Completed => write!(f, "Completed"),
            AppointmentStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "General Medicine", alias = "general_medicine")]
    GeneralMedicine,

    #[serde(rename = "Cardiology", alias = "cardiology")]
    Cardiology,

    #[serde(rename = "Dermatology", alias = "dermatology")]
    Dermatology,

    #[serde(rename = "Orthopedics", alias = "orthopedics")]
    Orthopedics,

    #[serde(rename = "Pediatrics", alias = "pediatrics")]
    Pediatrics,

    #[serde(rename = "Neurology", alias = "neurology")]
    Neurology,

    #[serde(rename = "ENT (Ear, Nose, Throat)", alias = "ent", alias = "ENT")]
    Ent,

    #[serde(rename = "Gynecology", alias = "gynecology")]
    Gynecology,

    #[serde(rename = "Ophthalmology", alias = "ophthalmology")]
    Ophthalmology,

    #[serde(rename = "Dental", alias = "dental")]
    Dental,
}

impl Department {
    pub const ALL: [Department; 10] = [
        Department::GeneralMedicine,
        Department::Cardiology,
        Department::Dermatology,
        Department::Orthopedics,
        Department::Pediatrics,
        Department::Neurology,
        Department::Ent,
        Department::Gynecology,
        Department::Ophthalmology,
        Department::Dental,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Department::GeneralMedicine => "General Medicine",
            Department::Cardiology => "Cardiology",
            Department::Dermatology => "Dermatology",
            Department::Orthopedics => "Orthopedics",
            Department::Pediatrics => "Pediatrics",
            Department::Neurology => "Neurology",
            Department::Ent => "ENT (Ear, Nose, Throat)",
            Department::Gynecology => "Gynecology",
            Department::Ophthalmology => "Ophthalmology",
            Department::Dental => "Dental",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn appointment(date: &str, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            user_id: "u-1".to_string(),
            patient_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+441234".to_string(),
            department: Department::Cardiology,
            date: date.parse().unwrap(),
            time: "10:30".to_string(),
            reason: "Checkup".to_string(),
            status,
            booked_at: Utc::now(),
        }
    }

    #[test]
    fn test_upcoming_includes_today() {
        let today: NaiveDate = "2024-06-01".parse().unwrap();

        assert!(appointment("2024-06-01", AppointmentStatus::Scheduled).is_upcoming(today));
        assert!(appointment("2024-05-31", AppointmentStatus::Scheduled).is_past(today));
        assert!(appointment("2024-12-31", AppointmentStatus::Cancelled).is_past(today));
        assert!(appointment("2024-12-31", AppointmentStatus::Completed).is_past(today));
    }

    #[test]
    fn test_department_wire_names() {
        assert_eq!(
            serde_json::to_value(Department::Ent).unwrap(),
            json!("ENT (Ear, Nose, Throat)")
        );

        let by_label: Department = serde_json::from_value(json!("General Medicine")).unwrap();
        let by_name: Department = serde_json::from_value(json!("general_medicine")).unwrap();
        assert_eq!(by_label, Department::GeneralMedicine);
        assert_eq!(by_name, Department::GeneralMedicine);

        assert!(serde_json::from_value::<Department>(json!("Astrology")).is_err());
    }

    #[test]
    fn test_department_labels_match_serde() {
        for department in Department::ALL {
            assert_eq!(serde_json::to_value(department).unwrap(), json!(department.label()));
        }
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_value(AppointmentStatus::Scheduled).unwrap(), json!("Scheduled"));
        assert_eq!(AppointmentStatus::Cancelled.to_string(), "Cancelled");
    }
}
