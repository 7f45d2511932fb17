//! Request and response bodies for the SwiftHire REST API.

use crate::interview::{Application, ApplicationStatus};
use crate::matching::Searchable;
use crate::session::Role;
use serde::{Deserialize, Serialize};
use std::path::Path;

// -------------------------------------------------------------------------
// Authentication & registration
// -------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// A file attached to a multipart form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            mime: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Read a file from disk; the MIME type is guessed from the extension
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string());
        Ok(Self {
            file_name,
            bytes,
            mime,
        })
    }

    pub(crate) fn into_part(self) -> Result<reqwest::multipart::Part, reqwest::Error> {
        let part = reqwest::multipart::Part::bytes(self.bytes).file_name(self.file_name);
        match self.mime {
            Some(mime) => part.mime_str(&mime),
            None => Ok(part),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CandidateRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Comma-separated
    pub skills: String,
    pub bio: Option<String>,
    pub resume: Upload,
    pub profile_image: Option<Upload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewerRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub expertise: String,
    pub availability: String,
    pub department: String,
}

// -------------------------------------------------------------------------
// Job applications
// -------------------------------------------------------------------------

/// Row of a candidate's own applications list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CandidateApplication {
    #[serde(flatten)]
    pub application: Application,
    pub job_id: i64,
    pub job_title: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, rename = "type")]
    pub job_type: Option<String>,
    #[serde(default)]
    pub interview_title: Option<String>,
    #[serde(default)]
    pub interview_description: Option<String>,
    #[serde(default)]
    pub applied_date: Option<String>,
}

/// Row of the applications addressed to an interviewer, with candidate details
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InterviewerApplication {
    #[serde(flatten)]
    pub application: Application,
    pub job_id: i64,
    pub job_title: String,
    pub company: String,
    #[serde(default)]
    pub candidate_id: Option<i64>,
    pub candidate_name: String,
    pub candidate_email: String,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub years_of_experience: Option<i64>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub interview_title: Option<String>,
    #[serde(default)]
    pub interview_description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Searchable for InterviewerApplication {
    fn skills(&self) -> Option<&str> {
        self.skills.as_deref()
    }

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.candidate_name.as_str()),
            Some(self.job_title.as_str()),
            self.skills.as_deref(),
            self.education.as_deref(),
            Some(self.company.as_str()),
        ]
    }
}

/// Row of the shortlisted-candidate search
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShortlistedCandidate {
    #[serde(flatten)]
    pub application: Application,
    pub job_id: i64,
    pub job_title: String,
    pub company: String,
    pub candidate_name: String,
    pub candidate_email: String,
    #[serde(default)]
    pub interviewer_email: Option<String>,
    #[serde(default)]
    pub interview_title: Option<String>,
    #[serde(default)]
    pub interview_description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaginatedApplications {
    pub items: Vec<ShortlistedCandidate>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub pages: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShortlistQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for ShortlistQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: crate::matching::DEFAULT_PAGE_SIZE as u32,
            status: None,
            search: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewApplication {
    pub candidate_email: String,
    pub job_id: i64,
    pub interviewer_email: String,
}

/// The application as stored after create or update
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApplicationRecord {
    #[serde(flatten)]
    pub application: Application,
    pub candidate_email: String,
    pub job_id: i64,
    pub interviewer_email: String,
    #[serde(default)]
    pub interview_title: Option<String>,
    #[serde(default)]
    pub interview_description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Status change, optionally scheduling the interview at the same time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationUpdate {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_form_url: Option<String>,
    /// ISO timestamp as entered by the interviewer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_schedule: Option<String>,
    /// Minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_description: Option<String>,
}

impl ApplicationUpdate {
    pub fn status(status: ApplicationStatus) -> Self {
        Self {
            status: status.as_str().to_string(),
            ..Default::default()
        }
    }

    /// Shortlist and attach the meeting details
    pub fn schedule(
        form_url: impl Into<String>,
        schedule: impl Into<String>,
        duration_minutes: u32,
    ) -> Self {
        Self {
            interview_form_url: Some(form_url.into()),
            interview_schedule: Some(schedule.into()),
            interview_duration: Some(duration_minutes),
            ..Self::status(ApplicationStatus::Shortlisted)
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.interview_title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.interview_description = Some(description.into());
        self
    }
}

// -------------------------------------------------------------------------
// Notes
// -------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Note {
    pub id: i64,
    pub application_id: i64,
    pub content: String,
    pub created_by: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct NoteBody<'a> {
    pub content: &'a str,
    pub created_by: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct NoteAuthor<'a> {
    pub created_by: &'a str,
}

// -------------------------------------------------------------------------
// Job posts & saved jobs
// -------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct JobPostForm {
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub salary: String,
    pub description: String,
    pub skills: String,
    pub interviewer_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobPost {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub salary: String,
    pub description: String,
    pub skills: String,
    pub interviewer_email: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SavedJob {
    pub id: i64,
    pub candidate_email: String,
    pub job_id: i64,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SaveJobForm<'a> {
    pub candidate_email: &'a str,
    pub job_id: i64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct Count {
    pub count: u64,
}

// -------------------------------------------------------------------------
// Candidate profile
// -------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CandidateProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub years_of_experience: Option<i64>,
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: String,
    pub skills: String,
    pub bio: Option<String>,
    pub education: Option<String>,
    pub years_of_experience: Option<u32>,
    pub resume: Option<Upload>,
    pub profile_image: Option<Upload>,
}

// -------------------------------------------------------------------------
// Feedback
// -------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackForm {
    /// 1 to 5
    pub rating: u8,
    pub message: String,
    pub user_email: String,
    pub user_name: String,
    pub user_role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub rating: u8,
    pub message: String,
    pub user_email: String,
    pub user_name: String,
    pub user_role: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

// -------------------------------------------------------------------------
// Administration
// -------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserQuery {
    /// Partial name match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::{CandidateFilter, Profile};

    #[test]
    fn test_candidate_row_flattens_application() {
        let row: CandidateApplication = serde_json::from_str(
            r#"{
                "application_id": 4,
                "job_id": 9,
                "job_title": "Frontend Engineer",
                "company": "Acme",
                "location": "Remote",
                "type": "Full-time",
                "status": "Shortlisted",
                "interview_form_url": "https://meet.example.com/q",
                "interview_schedule": "2025-05-01T10:00:00Z",
                "interview_duration": null,
                "interview_title": "Round 1",
                "interview_description": null,
                "applied_date": "2025-04-20T08:12:00"
            }"#,
        )
        .unwrap();

        assert_eq!(row.application.application_id, 4);
        assert!(row.application.has_scheduled_interview());
        assert_eq!(row.job_type.as_deref(), Some("Full-time"));
    }

    #[test]
    fn test_interviewer_rows_are_searchable() {
        let row: InterviewerApplication = serde_json::from_str(
            r#"{
                "application_id": 1,
                "job_id": 2,
                "job_title": "Data Engineer",
                "company": "Initech",
                "candidate_id": 5,
                "candidate_name": "Priya",
                "candidate_email": "priya@example.com",
                "education": "BSc",
                "years_of_experience": 3,
                "skills": "Spark, Airflow",
                "status": "Applied"
            }"#,
        )
        .unwrap();

        let filter = CandidateFilter::new().with_profile(Profile::DataEngineering);
        assert!(filter.accepts(&row));
        let filter = CandidateFilter::new().with_query("initech");
        assert!(filter.accepts(&row));
        let filter = CandidateFilter::new().with_profile(Profile::Ios);
        assert!(!filter.accepts(&row));
    }

    #[test]
    fn test_schedule_update_body() {
        let update = ApplicationUpdate::schedule("https://meet.example.com/z", "2025-05-01T10:00", 45)
            .with_title("Technical");
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body["status"], "Shortlisted");
        assert_eq!(body["interview_duration"], 45);
        assert_eq!(body["interview_title"], "Technical");
        assert!(body.get("interview_description").is_none());

        let body = serde_json::to_value(ApplicationUpdate::status(ApplicationStatus::Rejected)).unwrap();
        assert_eq!(body, serde_json::json!({"status": "Rejected"}));
    }

    #[test]
    fn test_new_user_role_serializes_capitalized() {
        let user = NewUser {
            name: "Ola".into(),
            email: "ola@example.com".into(),
            role: Role::Interviewer,
            password: "secret".into(),
        };
        assert_eq!(serde_json::to_value(&user).unwrap()["role"], "Interviewer");
    }

    #[tokio::test]
    async fn test_upload_from_path_guesses_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.PDF");
        tokio::fs::write(&path, b"%PDF-1.4").await.unwrap();

        let upload = Upload::from_path(&path).await.unwrap();
        assert_eq!(upload.file_name, "cv.PDF");
        assert_eq!(upload.mime.as_deref(), Some("application/pdf"));
        assert_eq!(upload.bytes, b"%PDF-1.4");
    }
}
