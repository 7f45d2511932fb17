//! REST client for the SwiftHire backend.
//!
//! One method per endpoint. Requests are never retried; a failure comes back
//! as a [`ClientError`] and the caller keeps whatever state it had.

pub mod error;
pub mod models;
pub mod validation;

pub use error::{ClientError, ValidationErrorBuilder, ValidationErrors};
pub use models::*;

use crate::config::ApiConfig;
use crate::session::{Role, Session};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Typed client for the SwiftHire REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("swifthire/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Send a request and decode the JSON body of a 2xx response.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%status, path = %url, "API request failed");
            return Err(ClientError::from_response(status, &body));
        }

        let bytes = response.bytes().await?;
        // 204 and empty bodies decode as `null`
        let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        serde_json::from_slice(body).map_err(|e| ClientError::Decode(format!("{}: {}", url, e)))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.request(Method::GET, path)).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(self.request(method, path).json(body)).await
    }

    async fn post_form<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(self.request(Method::POST, path).form(body)).await
    }

    async fn send_multipart<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        form: Form,
    ) -> Result<T> {
        self.send(self.request(method, path).multipart(form)).await
    }

    // -------------------------------------------------------------------------
    // Authentication
    // -------------------------------------------------------------------------

    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        validation::validate_credentials(credentials)?;
        self.post_form("/login", credentials).await
    }

    pub async fn register_candidate(&self, form: CandidateRegistration) -> Result<Session> {
        validation::validate_candidate_registration(&form)?;

        let mut multipart = Form::new()
            .text("name", form.name)
            .text("email", form.email)
            .text("password", form.password)
            .text("skills", form.skills)
            .part("resume", form.resume.into_part()?);
        if let Some(bio) = form.bio {
            multipart = multipart.text("bio", bio);
        }
        if let Some(image) = form.profile_image {
            multipart = multipart.part("profile_image", image.into_part()?);
        }

        self.send_multipart(Method::POST, &registration_path(Role::Candidate), multipart)
            .await
    }

    pub async fn register_interviewer(&self, form: &InterviewerRegistration) -> Result<Session> {
        validation::validate_interviewer_registration(form)?;
        self.post_form(&registration_path(Role::Interviewer), form)
            .await
    }

    // -------------------------------------------------------------------------
    // Job applications
    // -------------------------------------------------------------------------

    pub async fn candidate_applications(&self, email: &str) -> Result<Vec<CandidateApplication>> {
        self.get(&format!("/job-applications/candidate/{}", email))
            .await
    }

    pub async fn interviewer_applications(
        &self,
        email: &str,
    ) -> Result<Vec<InterviewerApplication>> {
        self.get(&format!("/job-applications/interviewer/{}", email))
            .await
    }

    pub async fn search_shortlisted(&self, query: &ShortlistQuery) -> Result<PaginatedApplications> {
        self.send(
            self.request(Method::GET, "/job-applications/shortlisted-candidate")
                .query(query),
        )
        .await
    }

    pub async fn apply(&self, application: &NewApplication) -> Result<ApplicationRecord> {
        self.send_json(Method::POST, "/job-applications/", application)
            .await
    }

    /// Change status and, when shortlisting, the interview details
    pub async fn update_application(
        &self,
        application_id: i64,
        update: &ApplicationUpdate,
    ) -> Result<ApplicationRecord> {
        validation::validate_application_update(update)?;
        tracing::debug!(application_id, status = %update.status, "Updating application");
        self.send_json(
            Method::PATCH,
            &format!("/job-applications/{}", application_id),
            update,
        )
        .await
    }

    // -------------------------------------------------------------------------
    // Notes
    // -------------------------------------------------------------------------

    pub async fn create_note(
        &self,
        application_id: i64,
        content: &str,
        created_by: &str,
    ) -> Result<Note> {
        validation::validate_note(content, created_by)?;
        self.send_json(
            Method::POST,
            &format!("/job-applications/{}/notes", application_id),
            &NoteBody {
                content,
                created_by,
            },
        )
        .await
    }

    pub async fn update_note(&self, note_id: i64, content: &str, created_by: &str) -> Result<Note> {
        validation::validate_note(content, created_by)?;
        self.send_json(
            Method::PATCH,
            &format!("/job-applications/notes/{}", note_id),
            &NoteBody {
                content,
                created_by,
            },
        )
        .await
    }

    /// Only the note's author may delete it
    pub async fn delete_note(&self, note_id: i64, created_by: &str) -> Result<()> {
        let _: IgnoredAny = self
            .send_json(
                Method::DELETE,
                &format!("/job-applications/notes/{}", note_id),
                &NoteAuthor { created_by },
            )
            .await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Job posts
    // -------------------------------------------------------------------------

    pub async fn job_posts(&self) -> Result<Vec<JobPost>> {
        self.get("/job-posts").await
    }

    pub async fn create_job_post(&self, form: &JobPostForm) -> Result<JobPost> {
        validation::validate_job_post(form)?;
        self.post_form("/job-posts", form).await
    }

    pub async fn delete_job_post(&self, job_id: i64) -> Result<()> {
        let _: IgnoredAny = self
            .send(self.request(Method::DELETE, &format!("/job-posts/{}", job_id)))
            .await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Saved jobs
    // -------------------------------------------------------------------------

    pub async fn saved_jobs(&self, email: &str) -> Result<Vec<JobPost>> {
        self.get(&format!("/saved-jobs/{}", email)).await
    }

    pub async fn save_job(&self, email: &str, job_id: i64) -> Result<SavedJob> {
        self.post_form(
            "/saved-jobs",
            &SaveJobForm {
                candidate_email: email,
                job_id,
            },
        )
        .await
    }

    pub async fn unsave_job(&self, email: &str, job_id: i64) -> Result<()> {
        let _: IgnoredAny = self
            .send(self.request(
                Method::DELETE,
                &format!("/saved-jobs/{}/{}", email, job_id),
            ))
            .await?;
        Ok(())
    }

    pub async fn saved_job_count(&self, email: &str) -> Result<u64> {
        let count: Count = self.get(&format!("/saved-jobs/count/{}", email)).await?;
        Ok(count.count)
    }

    // -------------------------------------------------------------------------
    // Candidate profile
    // -------------------------------------------------------------------------

    pub async fn candidate_profile(&self, email: &str) -> Result<CandidateProfile> {
        self.get(&format!("/candidates/{}", email)).await
    }

    pub async fn update_candidate_profile(
        &self,
        email: &str,
        update: ProfileUpdate,
    ) -> Result<CandidateProfile> {
        validation::validate_profile_update(&update)?;

        let mut multipart = Form::new()
            .text("name", update.name)
            .text("skills", update.skills);
        if let Some(bio) = update.bio {
            multipart = multipart.text("bio", bio);
        }
        if let Some(education) = update.education {
            multipart = multipart.text("education", education);
        }
        if let Some(years) = update.years_of_experience {
            multipart = multipart.text("years_of_experience", years.to_string());
        }
        if let Some(resume) = update.resume {
            multipart = multipart.part("resume", resume.into_part()?);
        }
        if let Some(image) = update.profile_image {
            multipart = multipart.part("profile_image", image.into_part()?);
        }

        self.send_multipart(Method::PUT, &format!("/candidates/{}", email), multipart)
            .await
    }

    // -------------------------------------------------------------------------
    // Feedback
    // -------------------------------------------------------------------------

    pub async fn submit_feedback(&self, form: &FeedbackForm) -> Result<Feedback> {
        validation::validate_feedback(form)?;

        let multipart = Form::new()
            .text("rating", form.rating.to_string())
            .text("message", form.message.clone())
            .text("user_email", form.user_email.clone())
            .text("user_name", form.user_name.clone())
            .text("user_role", form.user_role.clone());

        self.send_multipart(Method::POST, "/feedback", multipart)
            .await
    }

    // -------------------------------------------------------------------------
    // Administration
    // -------------------------------------------------------------------------

    pub async fn list_users(&self, query: &UserQuery) -> Result<Vec<User>> {
        self.send(self.request(Method::GET, "/api/admin/users").query(query))
            .await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User> {
        validation::validate_new_user(user)?;
        self.send_json(Method::POST, "/api/admin/users", user).await
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<()> {
        let _: IgnoredAny = self
            .send(self.request(Method::DELETE, &format!("/api/admin/users/{}", user_id)))
            .await?;
        Ok(())
    }
}

fn registration_path(role: Role) -> String {
    format!("/register/{}", role.registration_slug())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_path_per_role() {
        assert_eq!(registration_path(Role::Candidate), "/register/candidate");
        assert_eq!(registration_path(Role::Interviewer), "/register/interviewer");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.url("/job-posts"),
            "http://localhost:8000/job-posts"
        );
    }

    #[tokio::test]
    async fn test_validation_runs_before_request() {
        // nothing listens on this port; a network attempt would be a Transport error
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let err = client
            .login(&Credentials {
                email: "not-an-email".into(),
                password: "pw".into(),
            })
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }
}
