use std::fmt;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const TIME_SLOTS: [&str; 12] = [
    "9:00 AM", "9:30 AM", "10:00 AM", "10:30 AM", "11:00 AM", "11:30 AM",
    "2:00 PM", "2:30 PM", "3:00 PM", "3:30 PM", "4:00 PM", "4:30 PM",
];

pub const APPOINTMENT_TYPES: [&str; 6] = [
    "Routine Checkup",
    "Follow-up",
    "Consultation",
    "Physical Exam",
    "Urgent Care",
    "Specialist Visit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct AppointmentId(pub u64);

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Confirmed,
    Pending,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub date: NaiveDate,
    pub time_slot: String,
    pub doctor: String,
    pub appointment_type: String,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Doctor {
    pub name: &'static str,
    pub specialty: &'static str,
    pub available: bool,
}

pub const DOCTORS: [Doctor; 5] = [
    Doctor { name: "Dr. Sarah Smith", specialty: "Internal Medicine", available: true },
    Doctor { name: "Dr. Michael Johnson", specialty: "Cardiology", available: true },
    Doctor { name: "Dr. Emily Williams", specialty: "Dermatology", available: false },
    Doctor { name: "Dr. David Brown", specialty: "Orthopedics", available: true },
    Doctor { name: "Dr. Lisa Davis", specialty: "Pediatrics", available: true },
];

/// Doctors the booking form may offer.
pub fn available_doctors() -> impl Iterator<Item = &'static Doctor> {
    DOCTORS.iter().filter(|doctor| doctor.available)
}

/// Booking form contents. Every field is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingRequest {
    pub date: Option<NaiveDate>,
    pub time_slot: Option<String>,
    pub doctor: Option<String>,
    pub appointment_type: Option<String>,
}

/// Answer to a reschedule request. Rescheduling is not supported, so this
/// only acknowledges the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RescheduleAck {
    pub appointment_id: AppointmentId,
    pub message: &'static str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AppointmentCounts {
    pub confirmed: usize,
    pub pending: usize,
    pub total: usize,
}
