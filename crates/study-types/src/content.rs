//! Study materials, homework and mind maps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

// ============= Materials =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Docx,
    Txt,
    Image,
    #[serde(other)]
    Other,
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FileType::Pdf => "pdf",
            FileType::Docx => "docx",
            FileType::Txt => "txt",
            FileType::Image => "image",
            FileType::Other => "other",
        };
        f.write_str(label)
    }
}

/// An uploaded study document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub name: String,
    pub file_url: String,
    pub file_type: FileType,
    pub size: u64,
    pub session_id: String,
    #[serde(with = "crate::time::lenient")]
    pub uploaded_at: DateTime<Utc>,
}

// ============= Homework =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    Pending,
    Submitted,
    Graded,
}

impl HomeworkStatus {
    /// Capitalized label used in listings.
    pub fn label(&self) -> &'static str {
        match self {
            HomeworkStatus::Pending => "Pending",
            HomeworkStatus::Submitted => "Submitted",
            HomeworkStatus::Graded => "Graded",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
    Pass,
    Fail,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
            Grade::Pass => "PASS",
            Grade::Fail => "FAIL",
        };
        f.write_str(label)
    }
}

/// Review attached to a single task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeworkTaskReview {
    pub id: String,
    #[serde(default)]
    pub task_feedback: Option<String>,
    /// Decimal columns are serialized as strings by the backend.
    #[serde(default, deserialize_with = "deserialize_score")]
    pub score: Option<f64>,
}

/// Review attached to a whole homework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeworkReview {
    pub id: String,
    #[serde(default)]
    pub grade: Option<Grade>,
    #[serde(default)]
    pub overall_feedback: Option<String>,
    #[serde(with = "crate::time::lenient")]
    pub reviewed_at: DateTime<Utc>,
    #[serde(default)]
    pub reviewed_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeworkTask {
    pub id: String,
    pub task_number: u32,
    pub description: String,
    #[serde(default)]
    pub uploaded_file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homework_id: Option<String>,
    #[serde(default)]
    pub reviews: Vec<HomeworkTaskReview>,
}

impl HomeworkTask {
    /// The most recent review, which is the last one in server order.
    pub fn latest_review(&self) -> Option<&HomeworkTaskReview> {
        self.reviews.last()
    }

    pub fn has_submission(&self) -> bool {
        self.uploaded_file_url.is_some()
    }
}

/// A generated set of tasks tied to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Homework {
    pub id: String,
    pub title: String,
    pub status: HomeworkStatus,
    pub session_id: String,
    #[serde(with = "crate::time::lenient")]
    pub generated_at: DateTime<Utc>,
    #[serde(default, with = "crate::time::lenient_option")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tasks: Vec<HomeworkTask>,
    #[serde(default)]
    pub reviews: Vec<HomeworkReview>,
}

impl Homework {
    /// The most recent review, which is the last one in server order.
    pub fn latest_review(&self) -> Option<&HomeworkReview> {
        self.reviews.last()
    }

    pub fn is_pending(&self) -> bool {
        self.status == HomeworkStatus::Pending
    }

    /// Look a task up by id, or by its task number when `key` is numeric.
    pub fn find_task(&self, key: &str) -> Option<&HomeworkTask> {
        self.tasks.iter().find(|t| t.id == key).or_else(|| {
            let number: u32 = key.trim_start_matches('#').parse().ok()?;
            self.tasks.iter().find(|t| t.task_number == number)
        })
    }
}

/// Body of `POST /api/sessions/{id}/homework`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateHomeworkRequest {
    pub prompt: String,
    pub material_ids: Vec<String>,
}

// ============= Mind maps =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMap {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub node_count: u32,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(with = "crate::time::lenient")]
    pub created_at: DateTime<Utc>,
}

fn deserialize_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawScore {
        Number(f64),
        Text(String),
    }

    match Option::<RawScore>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawScore::Number(n)) => Ok(Some(n)),
        Some(RawScore::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid score: {text}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn homework_json() -> Value {
        json!({
            "id": "hw1",
            "title": "Cells",
            "status": "graded",
            "session_id": "s1",
            "generated_at": "2024-05-01T09:00:00",
            "submitted_at": null,
            "tasks": [
                {
                    "id": "t1",
                    "task_number": 1,
                    "description": "Name the organelles",
                    "uploaded_file_url": "/files/t1.pdf",
                    "reviews": [
                        {"id": "r1", "task_feedback": "ok", "score": "7.50"},
                        {"id": "r2", "task_feedback": "better", "score": 9}
                    ]
                },
                {"id": "t2", "task_number": 2, "description": "Draw a cell"}
            ],
            "reviews": [
                {"id": "hr1", "grade": "B", "overall_feedback": "Good", "reviewed_at": "2024-05-02T10:00:00Z", "reviewed_by": null},
                {"id": "hr2", "grade": "PASS", "overall_feedback": null, "reviewed_at": "2024-05-03T10:00:00Z"}
            ]
        })
    }

    #[test]
    fn test_homework_from_backend() {
        let hw: Homework = serde_json::from_value(homework_json()).unwrap();
        assert_eq!(hw.status, HomeworkStatus::Graded);
        assert!(!hw.is_pending());
        assert_eq!(hw.tasks.len(), 2);
        assert!(hw.tasks[1].reviews.is_empty());
        assert!(!hw.tasks[1].has_submission());
    }

    #[test]
    fn test_latest_reviews_are_last() {
        let hw: Homework = serde_json::from_value(homework_json()).unwrap();
        assert_eq!(hw.latest_review().unwrap().grade, Some(Grade::Pass));
        let task_review = hw.tasks[0].latest_review().unwrap();
        assert_eq!(task_review.score, Some(9.0));
        assert_eq!(hw.tasks[0].reviews[0].score, Some(7.5));
    }

    #[test]
    fn test_find_task_by_id_or_number() {
        let hw: Homework = serde_json::from_value(homework_json()).unwrap();
        assert_eq!(hw.find_task("t2").unwrap().task_number, 2);
        assert_eq!(hw.find_task("1").unwrap().id, "t1");
        assert_eq!(hw.find_task("#2").unwrap().id, "t2");
        assert!(hw.find_task("9").is_none());
    }

    #[test]
    fn test_unknown_file_type_is_other() {
        let material: Material = serde_json::from_value(json!({
            "id": "m1",
            "name": "notes.rtf",
            "file_url": "/files/notes.rtf",
            "file_type": "rtf",
            "size": 2048,
            "session_id": "s1",
            "uploaded_at": "2024-05-01T09:00:00Z"
        }))
        .unwrap();
        assert_eq!(material.file_type, FileType::Other);
    }

    #[test]
    fn test_mind_map_defaults() {
        let map: MindMap = serde_json::from_value(json!({
            "id": "mm1",
            "title": "Photosynthesis",
            "created_at": "2024-05-01T09:00:00Z"
        }))
        .unwrap();
        assert_eq!(map.node_count, 0);
        assert!(map.data.is_null());
    }

    #[test]
    fn test_status_label() {
        assert_eq!(HomeworkStatus::Submitted.label(), "Submitted");
        assert_eq!(Grade::Fail.to_string(), "FAIL");
    }
}
