//! Input validation for API requests.
//!
//! Field validators return `Err(message)` for the first problem they find.
//! The `validate_*` request checks collect every failing field with a
//! [`ValidationErrorBuilder`] and run before anything is sent.

use super::error::{ClientError, ValidationErrorBuilder};
use super::models::{
    ApplicationUpdate, CandidateRegistration, Credentials, FeedbackForm, InterviewerRegistration,
    JobPostForm, NewUser, ProfileUpdate,
};
use crate::interview::parse_schedule;
use lazy_static::lazy_static;
use regex::Regex;

pub const FEEDBACK_MESSAGE_MAX: usize = 300;

lazy_static! {
    /// Regex for validating email addresses
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?)+$"
    ).unwrap();

    /// Regex for validating HTTP/HTTPS meeting links
    static ref HTTP_URL_REGEX: Regex = Regex::new(
        r"^https?://[a-zA-Z0-9][-a-zA-Z0-9]*(\.[a-zA-Z0-9][-a-zA-Z0-9]*)*(:\d+)?(/[^\s]*)?$"
    ).unwrap();
}

pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }
    Ok(())
}

/// Non-blank text field
pub fn validate_required(value: &str, label: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", label));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), String> {
    validate_required(name, "Name")?;

    if name.trim().len() > 100 {
        return Err("Name is too long (max 100 characters)".to_string());
    }

    Ok(())
}

pub fn validate_rating(rating: u8) -> Result<(), String> {
    if !(1..=5).contains(&rating) {
        return Err("Rating must be between 1 and 5".to_string());
    }
    Ok(())
}

pub fn validate_feedback_message(message: &str) -> Result<(), String> {
    validate_required(message, "Message")?;

    if message.chars().count() > FEEDBACK_MESSAGE_MAX {
        return Err(format!(
            "Message is too long (max {} characters)",
            FEEDBACK_MESSAGE_MAX
        ));
    }

    Ok(())
}

/// Interview length in minutes
pub fn validate_duration(minutes: u32) -> Result<(), String> {
    if minutes == 0 {
        return Err("Interview duration must be greater than 0".to_string());
    }
    Ok(())
}

/// Meeting link for an interview
pub fn validate_form_url(url: &str) -> Result<(), String> {
    let url = url.trim();
    if url.is_empty() {
        return Err("Interview link is required".to_string());
    }

    if url.len() > 2048 {
        return Err("Interview link is too long (max 2048 characters)".to_string());
    }

    if !HTTP_URL_REGEX.is_match(url) {
        return Err("Interview link must be an http(s) URL".to_string());
    }

    Ok(())
}

pub fn validate_schedule(schedule: &str) -> Result<(), String> {
    validate_required(schedule, "Interview time")?;

    if parse_schedule(schedule).is_none() {
        return Err("Interview time must be a date and time like 2025-06-01T14:30".to_string());
    }

    Ok(())
}

// -------------------------------------------------------------------------
// Request checks
// -------------------------------------------------------------------------

pub fn validate_credentials(credentials: &Credentials) -> Result<(), ClientError> {
    let mut errors = ValidationErrorBuilder::new();
    errors
        .check("email", validate_email(&credentials.email))
        .check("password", validate_password(&credentials.password));
    errors.finish()
}

pub fn validate_candidate_registration(form: &CandidateRegistration) -> Result<(), ClientError> {
    let mut errors = ValidationErrorBuilder::new();
    errors
        .check("name", validate_name(&form.name))
        .check("email", validate_email(&form.email))
        .check("password", validate_password(&form.password))
        .check("skills", validate_required(&form.skills, "Skills"));
    if form.resume.bytes.is_empty() {
        errors.add("resume", "Resume is required");
    }
    errors.finish()
}

pub fn validate_interviewer_registration(
    form: &InterviewerRegistration,
) -> Result<(), ClientError> {
    let mut errors = ValidationErrorBuilder::new();
    errors
        .check("name", validate_name(&form.name))
        .check("email", validate_email(&form.email))
        .check("password", validate_password(&form.password))
        .check("expertise", validate_required(&form.expertise, "Expertise"))
        .check(
            "availability",
            validate_required(&form.availability, "Availability"),
        )
        .check("department", validate_required(&form.department, "Department"));
    errors.finish()
}

pub fn validate_profile_update(form: &ProfileUpdate) -> Result<(), ClientError> {
    let mut errors = ValidationErrorBuilder::new();
    errors
        .check("name", validate_name(&form.name))
        .check("skills", validate_required(&form.skills, "Skills"));
    errors.finish()
}

pub fn validate_feedback(form: &FeedbackForm) -> Result<(), ClientError> {
    let mut errors = ValidationErrorBuilder::new();
    errors
        .check("rating", validate_rating(form.rating))
        .check("message", validate_feedback_message(&form.message))
        .check("user_email", validate_email(&form.user_email))
        .check("user_name", validate_required(&form.user_name, "Name"))
        .check("user_role", validate_required(&form.user_role, "Role"));
    errors.finish()
}

pub fn validate_job_post(form: &JobPostForm) -> Result<(), ClientError> {
    let mut errors = ValidationErrorBuilder::new();
    errors
        .check("title", validate_required(&form.title, "Title"))
        .check("company", validate_required(&form.company, "Company"))
        .check("location", validate_required(&form.location, "Location"))
        .check("type", validate_required(&form.job_type, "Job type"))
        .check("salary", validate_required(&form.salary, "Salary"))
        .check(
            "description",
            validate_required(&form.description, "Description"),
        )
        .check("skills", validate_required(&form.skills, "Skills"))
        .check("interviewer_email", validate_email(&form.interviewer_email));
    errors.finish()
}

/// Scheduling fields are only checked when present
pub fn validate_application_update(update: &ApplicationUpdate) -> Result<(), ClientError> {
    let mut errors = ValidationErrorBuilder::new();
    errors.check("status", validate_required(&update.status, "Status"));
    if let Some(url) = &update.interview_form_url {
        errors.check("interview_form_url", validate_form_url(url));
    }
    if let Some(schedule) = &update.interview_schedule {
        errors.check("interview_schedule", validate_schedule(schedule));
    }
    if let Some(minutes) = update.interview_duration {
        errors.check("interview_duration", validate_duration(minutes));
    }
    errors.finish()
}

pub fn validate_new_user(user: &NewUser) -> Result<(), ClientError> {
    let mut errors = ValidationErrorBuilder::new();
    errors
        .check("name", validate_name(&user.name))
        .check("email", validate_email(&user.email))
        .check("password", validate_password(&user.password));
    errors.finish()
}

pub fn validate_note(content: &str, created_by: &str) -> Result<(), ClientError> {
    let mut errors = ValidationErrorBuilder::new();
    errors
        .check("content", validate_required(content, "Note"))
        .check("created_by", validate_email(created_by));
    errors.finish()
}
