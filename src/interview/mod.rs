//! Interview lifecycle evaluation
//!
//! Classifies an application's interview relative to "now":
//! - `NotScheduled`: not shortlisted, or missing a meeting link or a time
//! - `Upcoming`: before the join window; shows a countdown to the start
//! - `Joinable`: from 5 minutes before the start until the end
//! - `Completed`: at or after `start + duration`
//!
//! Evaluation is pure. Views re-run it on a clock (see [`CountdownTicker`])
//! and never mutate the application.

pub mod countdown;

pub use countdown::{Countdown, CountdownTicker};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Meeting length assumed when the interviewer left it unset
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

/// How long before the start the join action becomes available
pub const JOIN_WINDOW_LEAD_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "applied" => Ok(ApplicationStatus::Applied),
            "shortlisted" => Ok(ApplicationStatus::Shortlisted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            _ => Err(format!("Unknown application status: {}", s)),
        }
    }
}

impl TryFrom<String> for ApplicationStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ApplicationStatus> for String {
    fn from(status: ApplicationStatus) -> Self {
        status.as_str().to_string()
    }
}

/// The interview-relevant part of a job application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    #[serde(alias = "id")]
    pub application_id: i64,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub interview_form_url: Option<String>,
    #[serde(default, with = "schedule_format")]
    pub interview_schedule: Option<DateTime<Utc>>,
    /// Minutes
    #[serde(default)]
    pub interview_duration: Option<u32>,
}

impl Application {
    /// Shortlisted with both a meeting link and a start time
    pub fn has_scheduled_interview(&self) -> bool {
        self.status == ApplicationStatus::Shortlisted
            && self
                .interview_form_url
                .as_deref()
                .is_some_and(|url| !url.trim().is_empty())
            && self.interview_schedule.is_some()
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(
            self.interview_duration
                .unwrap_or(DEFAULT_DURATION_MINUTES)
                .into(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    NotScheduled,
    Upcoming,
    Joinable,
    Completed,
}

impl LifecycleState {
    /// No further transitions can happen from this state
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::NotScheduled | LifecycleState::Completed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub state: LifecycleState,
    /// Time left until the scheduled start; only for `Upcoming`
    pub countdown: Option<Countdown>,
    /// Meeting link; only for `Joinable`
    pub join_url: Option<String>,
}

/// What a view offers for an evaluated interview
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action<'a> {
    /// Text only, no control
    Status(&'static str),
    /// Enabled join control
    Join { url: &'a str },
    /// Disabled control with a live countdown
    Disabled { countdown: Countdown },
}

impl Evaluation {
    fn bare(state: LifecycleState) -> Self {
        Self {
            state,
            countdown: None,
            join_url: None,
        }
    }

    pub fn action(&self) -> Action<'_> {
        match self.state {
            LifecycleState::NotScheduled => Action::Status("Not scheduled yet"),
            LifecycleState::Completed => Action::Status("Interview completed"),
            LifecycleState::Joinable => match self.join_url.as_deref() {
                Some(url) => Action::Join { url },
                None => Action::Status("Not scheduled yet"),
            },
            LifecycleState::Upcoming => Action::Disabled {
                countdown: self.countdown.unwrap_or_default(),
            },
        }
    }
}

pub fn evaluate(application: &Application, now: DateTime<Utc>) -> Evaluation {
    if !application.has_scheduled_interview() {
        return Evaluation::bare(LifecycleState::NotScheduled);
    }
    let Some(start) = application.interview_schedule else {
        return Evaluation::bare(LifecycleState::NotScheduled);
    };

    let join_window_start = start - Duration::minutes(JOIN_WINDOW_LEAD_MINUTES);
    let end = start + application.duration();

    if now >= end {
        Evaluation::bare(LifecycleState::Completed)
    } else if now >= join_window_start {
        Evaluation {
            state: LifecycleState::Joinable,
            countdown: None,
            join_url: application.interview_form_url.clone(),
        }
    } else {
        Evaluation {
            state: LifecycleState::Upcoming,
            countdown: Some(Countdown::until(start, now)),
            join_url: None,
        }
    }
}

/// Applications-page list filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplicationFilter {
    #[default]
    All,
    /// Only applications with a scheduled interview
    Interviews,
    Status(ApplicationStatus),
}

impl ApplicationFilter {
    pub fn matches(&self, application: &Application) -> bool {
        match self {
            ApplicationFilter::All => true,
            ApplicationFilter::Interviews => application.has_scheduled_interview(),
            ApplicationFilter::Status(status) => application.status == *status,
        }
    }
}

impl std::str::FromStr for ApplicationFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(ApplicationFilter::All),
            "interviews" => Ok(ApplicationFilter::Interviews),
            other => other.parse().map(ApplicationFilter::Status),
        }
    }
}

/// Interview times arrive either as RFC 3339 or as naive ISO timestamps.
/// Naive ones are read in the local timezone, as a browser would.
mod schedule_format {
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NAIVE_FORMATS.iter().find_map(|fmt| {
            let naive = NaiveDateTime::parse_from_str(raw, fmt).ok()?;
            Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
        })
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.and_then(|raw| {
            let parsed = parse(&raw);
            if parsed.is_none() && !raw.trim().is_empty() {
                tracing::warn!(value = %raw, "Ignoring unparseable interview schedule");
            }
            parsed
        }))
    }
}

pub use schedule_format::parse as parse_schedule;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, NaiveDateTime, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 15, 0, 0).unwrap()
    }

    fn scheduled(start: DateTime<Utc>, duration: Option<u32>) -> Application {
        Application {
            application_id: 7,
            status: ApplicationStatus::Shortlisted,
            interview_form_url: Some("https://meet.example.com/abc".to_string()),
            interview_schedule: Some(start),
            interview_duration: duration,
        }
    }

    #[test]
    fn test_not_shortlisted_is_never_scheduled() {
        for status in [ApplicationStatus::Applied, ApplicationStatus::Rejected] {
            let mut app = scheduled(now() - Duration::minutes(2), Some(30));
            app.status = status;
            assert_eq!(evaluate(&app, now()).state, LifecycleState::NotScheduled);
        }
    }

    #[test]
    fn test_missing_link_or_time_is_not_scheduled() {
        let mut app = scheduled(now(), Some(30));
        app.interview_form_url = None;
        assert_eq!(evaluate(&app, now()).state, LifecycleState::NotScheduled);

        app.interview_form_url = Some("   ".to_string());
        assert_eq!(evaluate(&app, now()).state, LifecycleState::NotScheduled);

        let mut app = scheduled(now(), Some(30));
        app.interview_schedule = None;
        let eval = evaluate(&app, now());
        assert_eq!(eval.state, LifecycleState::NotScheduled);
        assert_eq!(eval.action(), Action::Status("Not scheduled yet"));
    }

    #[test]
    fn test_upcoming_counts_down_to_start() {
        let app = scheduled(now() + Duration::minutes(10), Some(30));
        let eval = evaluate(&app, now());
        assert_eq!(eval.state, LifecycleState::Upcoming);
        assert_eq!(eval.countdown.unwrap().to_string(), "00:10:00");
        assert!(matches!(eval.action(), Action::Disabled { .. }));
    }

    #[test]
    fn test_joinable_inside_window() {
        let app = scheduled(now() - Duration::minutes(2), Some(30));
        let eval = evaluate(&app, now());
        assert_eq!(eval.state, LifecycleState::Joinable);
        assert_eq!(
            eval.action(),
            Action::Join {
                url: "https://meet.example.com/abc"
            }
        );
    }

    #[test]
    fn test_completed_after_end() {
        let app = scheduled(now() - Duration::minutes(40), Some(30));
        let eval = evaluate(&app, now());
        assert_eq!(eval.state, LifecycleState::Completed);
        assert_eq!(eval.action(), Action::Status("Interview completed"));
    }

    #[test]
    fn test_window_boundaries() {
        let start = now();
        let app = scheduled(start, Some(30));

        let just_before = start - Duration::minutes(5) - Duration::milliseconds(1);
        assert_eq!(evaluate(&app, just_before).state, LifecycleState::Upcoming);
        assert_eq!(
            evaluate(&app, start - Duration::minutes(5)).state,
            LifecycleState::Joinable
        );
        assert_eq!(
            evaluate(&app, start + Duration::minutes(30) - Duration::milliseconds(1)).state,
            LifecycleState::Joinable
        );
        assert_eq!(
            evaluate(&app, start + Duration::minutes(30)).state,
            LifecycleState::Completed
        );
    }

    #[test]
    fn test_default_duration_is_thirty_minutes() {
        let app = scheduled(now() - Duration::minutes(29), None);
        assert_eq!(evaluate(&app, now()).state, LifecycleState::Joinable);

        let app = scheduled(now() - Duration::minutes(30), None);
        assert_eq!(evaluate(&app, now()).state, LifecycleState::Completed);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let app = scheduled(now() + Duration::hours(2), Some(45));
        let before = app.clone();
        let first = evaluate(&app, now());
        let second = evaluate(&app, now());
        assert_eq!(first, second);
        assert_eq!(app, before);
    }

    #[test]
    fn test_application_filter() {
        let interview = scheduled(now(), Some(30));
        let mut applied = scheduled(now(), Some(30));
        applied.status = ApplicationStatus::Applied;

        assert!(ApplicationFilter::All.matches(&applied));
        assert!(ApplicationFilter::Interviews.matches(&interview));
        assert!(!ApplicationFilter::Interviews.matches(&applied));
        assert!(ApplicationFilter::Status(ApplicationStatus::Applied).matches(&applied));

        assert_eq!(
            "interviews".parse::<ApplicationFilter>().unwrap(),
            ApplicationFilter::Interviews
        );
        assert_eq!(
            "Rejected".parse::<ApplicationFilter>().unwrap(),
            ApplicationFilter::Status(ApplicationStatus::Rejected)
        );
        assert!("pending".parse::<ApplicationFilter>().is_err());
    }

    #[test]
    fn test_deserialize_backend_row() {
        let app: Application = serde_json::from_str(
            r#"{
                "application_id": 12,
                "status": "Shortlisted",
                "interview_form_url": "https://meet.example.com/x",
                "interview_schedule": "2025-03-14T15:00:00Z",
                "interview_duration": 45
            }"#,
        )
        .unwrap();
        assert_eq!(app.interview_schedule, Some(now()));
        assert_eq!(app.duration(), Duration::minutes(45));

        let bare: Application =
            serde_json::from_str(r#"{"id": 3, "status": "Applied", "interview_schedule": null}"#)
                .unwrap();
        assert_eq!(bare.application_id, 3);
        assert!(bare.interview_schedule.is_none());
    }

    #[test]
    fn test_status_deserializes_any_case() {
        let status: ApplicationStatus = serde_json::from_str("\"shortlisted\"").unwrap();
        assert_eq!(status, ApplicationStatus::Shortlisted);
        let status: ApplicationStatus = serde_json::from_str("\"REJECTED\"").unwrap();
        assert_eq!(status, ApplicationStatus::Rejected);
        assert!(serde_json::from_str::<ApplicationStatus>("\"Hired\"").is_err());
        assert_eq!(
            serde_json::to_value(ApplicationStatus::Applied).unwrap(),
            "Applied"
        );
    }

    #[test]
    fn test_naive_schedule_is_local_time() {
        let naive =
            NaiveDateTime::parse_from_str("2025-03-14T15:00:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        let expected = Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc));
        assert_eq!(parse_schedule("2025-03-14T15:00:00"), expected);
        assert_eq!(parse_schedule("not a date"), None);
    }
}
