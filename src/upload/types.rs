use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use uuid::Uuid;
use super::errors::{Result, UploadError};
use super::record::UploadedFile;

/// Guideline upper bound shown to users, not enforced at intake.
pub const MAX_FILE_SIZE_GUIDELINE: u64 = 10 * 1024 * 1024;

/// Extensions the picker advertises.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["pdf", "jpg", "jpeg", "png", "doc", "docx"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct UploadId(Uuid);

impl UploadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UploadId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Record status. Ordering follows the pipeline, so a transition is only
/// applied when the target compares greater than the current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    /// 上传中
    Uploading,
    /// 处理中
    Processing,
    /// 已处理
    Processed,
    /// Reserved. Nothing in the pipeline produces it.
    Error,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Uploading => "uploading",
            UploadStatus::Processing => "processing",
            UploadStatus::Processed => "processed",
            UploadStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Processed | UploadStatus::Error)
    }

    /// Whether moving from `self` to `next` is a forward step of the pipeline.
    pub fn can_advance_to(&self, next: UploadStatus) -> bool {
        !self.is_terminal() && next != UploadStatus::Error && next > *self
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum DocumentCategory {
    #[serde(rename = "Lab Reports")]
    LabReports,
    #[serde(rename = "Imaging")]
    Imaging,
    #[serde(rename = "Medical Records")]
    MedicalRecords,
    #[serde(rename = "Prescriptions")]
    Prescriptions,
    #[serde(rename = "Insurance Documents")]
    InsuranceDocuments,
    #[serde(rename = "Discharge Summary")]
    DischargeSummary,
    #[serde(rename = "Other")]
    Other,
    #[default]
    #[serde(rename = "Uncategorized")]
    Uncategorized,
}

impl DocumentCategory {
    /// Categories offered in the picker. `Uncategorized` is only ever a fallback.
    pub const SELECTABLE: [DocumentCategory; 7] = [
        DocumentCategory::LabReports,
        DocumentCategory::Imaging,
        DocumentCategory::MedicalRecords,
        DocumentCategory::Prescriptions,
        DocumentCategory::InsuranceDocuments,
        DocumentCategory::DischargeSummary,
        DocumentCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DocumentCategory::LabReports => "Lab Reports",
            DocumentCategory::Imaging => "Imaging",
            DocumentCategory::MedicalRecords => "Medical Records",
            DocumentCategory::Prescriptions => "Prescriptions",
            DocumentCategory::InsuranceDocuments => "Insurance Documents",
            DocumentCategory::DischargeSummary => "Discharge Summary",
            DocumentCategory::Other => "Other",
            DocumentCategory::Uncategorized => "Uncategorized",
        }
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocumentCategory {
    type Err = UploadError;

    fn from_str(s: &str) -> Result<Self> {
        let label = s.trim();
        Self::SELECTABLE
            .iter()
            .chain(std::iter::once(&DocumentCategory::Uncategorized))
            .find(|category| category.label().eq_ignore_ascii_case(label))
            .copied()
            .ok_or_else(|| UploadError::UnknownCategory(s.to_string()))
    }
}

/// Name and size of a file handed over by a picker or drop zone. Content is never read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileDescriptor {
    pub name: String,
    pub size_bytes: u64,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
        }
    }

    pub fn extension(&self) -> Option<&str> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext)
    }

    pub fn is_supported_format(&self) -> bool {
        self.extension()
            .map(|ext| SUPPORTED_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    pub fn exceeds_size_guideline(&self) -> bool {
        self.size_bytes > MAX_FILE_SIZE_GUIDELINE
    }
}

/// Actions a display surface may offer for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileAction {
    View,
    Download,
    Share,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UploadEvent {
    /// 新记录已加入
    Submitted {
        upload_id: UploadId,
        name: String,
        category: DocumentCategory,
    },

    /// 状态变更
    StatusChanged {
        upload_id: UploadId,
        old_status: UploadStatus,
        new_status: UploadStatus,
    },

    /// 记录已删除
    Removed {
        upload_id: UploadId,
    },
}

impl UploadEvent {
    pub fn upload_id(&self) -> UploadId {
        match self {
            UploadEvent::Submitted { upload_id, .. }
            | UploadEvent::StatusChanged { upload_id, .. }
            | UploadEvent::Removed { upload_id } => *upload_id,
        }
    }
}

/// 追踪器命令
pub enum TrackerCommand {
    /// 批量提交
    Submit {
        files: Vec<FileDescriptor>,
        category: Option<DocumentCategory>,
        reply: oneshot::Sender<Result<Vec<UploadId>>>,
    },

    /// 删除
    Remove {
        upload_id: UploadId,
        reply: oneshot::Sender<bool>,
    },

    /// 获取单个记录
    GetFile {
        upload_id: UploadId,
        reply: oneshot::Sender<Option<UploadedFile>>,
    },

    /// 获取所有记录
    ListFiles {
        reply: oneshot::Sender<Vec<UploadedFile>>,
    },

    /// 记录数量
    Count {
        reply: oneshot::Sender<usize>,
    },
}

/// Sent by a timer task once its deadline passes.
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub upload_id: UploadId,
    pub target: UploadStatus,
}

const _: () = {
    fn assert_send<T: Send>() {}
    fn assert_types() {
        assert_send::<UploadedFile>();
        assert_send::<UploadEvent>();
        assert_send::<TrackerCommand>();
    }
};
