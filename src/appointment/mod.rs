mod book;
mod errors;
pub mod types;

pub use book::AppointmentBook;
pub use errors::{AppointmentError, Result};
pub use types::{
    available_doctors,
    Appointment,
    AppointmentCounts,
    AppointmentId,
    AppointmentStatus,
    BookingRequest,
    RescheduleAck,
    APPOINTMENT_TYPES,
    DOCTORS,
    TIME_SLOTS,
};
