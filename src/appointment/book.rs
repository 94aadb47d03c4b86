use chrono::NaiveDate;
use super::errors::{AppointmentError, Result};
use super::types::{
    Appointment,
    AppointmentCounts,
    AppointmentId,
    AppointmentStatus,
    BookingRequest,
    RescheduleAck,
};

/// Appointments owned by the scheduler view. Plain local state, no actor:
/// nothing here runs on a timer.
#[derive(Debug, Default)]
pub struct AppointmentBook {
    appointments: Vec<Appointment>,
    next_id: u64,
}

impl AppointmentBook {
    pub fn new() -> Self {
        Self {
            appointments: Vec::new(),
            next_id: 1,
        }
    }

    pub fn with_demo_appointments() -> Self {
        let mut book = Self::new();
        let seed = [
            ((2024, 7, 15), "10:00 AM", "Dr. Smith", "Routine Checkup", AppointmentStatus::Confirmed),
            ((2024, 7, 20), "2:30 PM", "Dr. Johnson", "Cardiology", AppointmentStatus::Pending),
            ((2024, 7, 25), "9:00 AM", "Dr. Williams", "Dermatology", AppointmentStatus::Confirmed),
        ];

        for ((y, m, d), time_slot, doctor, appointment_type, status) in seed {
            let Some(date) = NaiveDate::from_ymd_opt(y, m, d) else {
                continue;
            };
            let id = book.allocate_id();
            book.appointments.push(Appointment {
                id,
                date,
                time_slot: time_slot.to_string(),
                doctor: doctor.to_string(),
                appointment_type: appointment_type.to_string(),
                status,
            });
        }

        book
    }

    /// Validates the form and adds a `Pending` appointment.
    pub fn book(&mut self, request: BookingRequest) -> Result<AppointmentId> {
        let date = request.date.ok_or(AppointmentError::MissingRequiredField("date"))?;
        let time_slot = required(request.time_slot, "time")?;
        let doctor = required(request.doctor, "doctor")?;
        let appointment_type = required(request.appointment_type, "appointment type")?;

        let id = self.allocate_id();
        self.appointments.push(Appointment {
            id,
            date,
            time_slot,
            doctor,
            appointment_type,
            status: AppointmentStatus::Pending,
        });

        tracing::info!(appointment_id = %id, %date, "Appointment booked");
        Ok(id)
    }

    pub fn cancel(&mut self, id: AppointmentId) -> Result<()> {
        let appointment = self.appointments
            .iter_mut()
            .find(|appointment| appointment.id == id)
            .ok_or(AppointmentError::NotFound(id))?;

        appointment.status = AppointmentStatus::Cancelled;
        tracing::info!(appointment_id = %id, "Appointment cancelled");
        Ok(())
    }

    /// Acknowledges the request and changes nothing.
    pub fn reschedule(&self, id: AppointmentId) -> Result<RescheduleAck> {
        self.get(id).ok_or(AppointmentError::NotFound(id))?;

        Ok(RescheduleAck {
            appointment_id: id,
            message: "Reschedule functionality would be implemented here",
        })
    }

    pub fn get(&self, id: AppointmentId) -> Option<&Appointment> {
        self.appointments.iter().find(|appointment| appointment.id == id)
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn counts(&self) -> AppointmentCounts {
        let count = |status| {
            self.appointments
                .iter()
                .filter(|appointment| appointment.status == status)
                .count()
        };

        AppointmentCounts {
            confirmed: count(AppointmentStatus::Confirmed),
            pending: count(AppointmentStatus::Pending),
            total: self.appointments.len(),
        }
    }

    fn allocate_id(&mut self) -> AppointmentId {
        // Default-constructed books start at zero
        self.next_id = self.next_id.max(1);
        let id = AppointmentId(self.next_id);
        self.next_id += 1;
        id
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or(AppointmentError::MissingRequiredField(field))
}
