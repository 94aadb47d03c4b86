use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use super::types::{DocumentCategory, FileAction, FileDescriptor, UploadId, UploadStatus};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UploadedFile {
    pub id: UploadId,
    pub name: String,
    pub category: DocumentCategory,
    pub size_bytes: u64,
    pub intake_date: NaiveDate,
    pub status: UploadStatus,
    pub submitted_at: DateTime<Utc>,
}

impl UploadedFile {
    /// New record for a freshly submitted descriptor.
    pub fn intake(descriptor: FileDescriptor, category: Option<DocumentCategory>) -> Self {
        Self {
            id: UploadId::new(),
            name: descriptor.name,
            category: category.unwrap_or_default(),
            size_bytes: descriptor.size_bytes,
            intake_date: chrono::Local::now().date_naive(),
            status: UploadStatus::Uploading,
            submitted_at: Utc::now(),
        }
    }

    /// Size in megabytes with one decimal, e.g. `2.1 MB`.
    pub fn display_size(&self) -> String {
        format!("{:.1} MB", self.size_bytes as f64 / 1024.0 / 1024.0)
    }

    pub fn available_actions(&self) -> &'static [FileAction] {
        match self.status {
            UploadStatus::Processed => &[FileAction::View, FileAction::Download, FileAction::Share],
            _ => &[],
        }
    }
}

/// The three documents the demo view starts with. They carry fixed statuses
/// and never get timers.
pub fn demo_documents() -> Vec<UploadedFile> {
    let seed = [
        ("Blood_Test_Results.pdf", DocumentCategory::LabReports, (2024, 7, 10), 2.1, UploadStatus::Processed),
        ("X-Ray_Chest.jpg", DocumentCategory::Imaging, (2024, 7, 8), 5.3, UploadStatus::Processing),
        ("Medical_History.pdf", DocumentCategory::MedicalRecords, (2024, 7, 5), 1.8, UploadStatus::Processed),
    ];

    seed.into_iter()
        .filter_map(|(name, category, (y, m, d), megabytes, status)| {
            let intake_date = NaiveDate::from_ymd_opt(y, m, d)?;
            let submitted_at = intake_date.and_hms_opt(0, 0, 0)?.and_utc();
            Some(UploadedFile {
                id: UploadId::new(),
                name: name.to_string(),
                category,
                size_bytes: (megabytes * 1024.0 * 1024.0) as u64,
                intake_date,
                status,
                submitted_at,
            })
        })
        .collect()
}
