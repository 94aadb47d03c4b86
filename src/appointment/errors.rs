use thiserror::Error;
use super::types::AppointmentId;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AppointmentError {
    #[error("Please fill in all required fields: {0} is missing")]
    MissingRequiredField(&'static str),

    #[error("Appointment {0} not found")]
    NotFound(AppointmentId),
}

pub type Result<T, E = AppointmentError> = std::result::Result<T, E>;
