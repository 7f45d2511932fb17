//! CLI module for the SwiftHire command-line client.
//!
//! Every page of the web client has a subcommand here. Role-protected
//! commands go through the same route guard as the pages they stand in for.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::api::{
    ApiClient, ApplicationUpdate, CandidateRegistration, ClientError, FeedbackForm,
    InterviewerRegistration, JobPostForm, NewApplication, NewUser, ProfileUpdate, ShortlistQuery,
    Upload, UserQuery,
};
use crate::auth::Auth;
use crate::config::Config;
use crate::guard::{self, Decision, NavBar, NavTarget, Route};
use crate::interview::{
    evaluate, Action, Application, ApplicationFilter, ApplicationStatus, CountdownTicker,
    Evaluation,
};
use crate::matching::{paginate, CandidateFilter, Profile, DEFAULT_PAGE_SIZE};
use crate::scope::ViewScope;
use crate::session::{Role, Session, SessionStore};

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "swifthire")]
#[command(author, version, about = "Command-line client for the SwiftHire recruiting platform", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "swifthire.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Backend URL (overrides api.base_url)
    #[arg(long, env = "SWIFTHIRE_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and remember the session
    Login {
        email: String,
        #[arg(long, env = "SWIFTHIRE_PASSWORD")]
        password: String,
    },

    /// Create an account
    #[command(subcommand)]
    Register(RegisterCommands),

    /// Forget the current session
    Logout,

    /// Show who is signed in
    Whoami,

    /// Show the navigation links for the current identity
    Nav,

    /// Check whether a page path may be opened, and where it redirects otherwise
    Open {
        /// Page path, e.g. /candidate-dashboard
        path: String,
    },

    /// List your applications with their interview state
    Applications {
        /// all, interviews, applied, shortlisted or rejected
        #[arg(short, long, default_value = "all")]
        filter: ApplicationFilter,
    },

    /// Follow one interview's countdown until it can be joined or is over
    Watch {
        /// Application ID
        application_id: i64,
    },

    /// Filter applicants by skill profile and free text (interviewers)
    Candidates {
        /// Skill profile, repeatable (e.g. -p Frontend -p "Data Science")
        #[arg(short, long = "profile")]
        profiles: Vec<Profile>,
        /// Matches name, job title, skills, education or company
        #[arg(short, long)]
        query: Option<String>,
        #[arg(long, default_value = "1")]
        page: usize,
    },

    /// Search applications server-side by status (interviewers)
    Shortlisted {
        #[arg(short, long)]
        status: Option<ApplicationStatus>,
        #[arg(short = 'q', long)]
        search: Option<String>,
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "10")]
        limit: u32,
    },

    /// Shortlist an application and schedule its interview (interviewers)
    Schedule {
        application_id: i64,
        /// Meeting link
        #[arg(long)]
        url: String,
        /// Start time, e.g. 2025-06-01T14:30
        #[arg(long)]
        at: String,
        /// Minutes
        #[arg(long, default_value = "30")]
        duration: u32,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Set an application's status without scheduling (interviewers)
    Review {
        application_id: i64,
        status: ApplicationStatus,
    },

    /// Job posts and saved jobs
    #[command(subcommand)]
    Jobs(JobsCommands),

    /// Private notes on applications (interviewers)
    #[command(subcommand)]
    Notes(NotesCommands),

    /// Candidate profile
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Send feedback about the platform
    Feedback {
        /// 1 to 5
        #[arg(short, long)]
        rating: u8,
        message: String,
    },

    /// User administration
    #[command(subcommand)]
    Admin(AdminCommands),

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum RegisterCommands {
    Candidate {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "SWIFTHIRE_PASSWORD")]
        password: String,
        /// Comma-separated
        #[arg(long)]
        skills: String,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        resume: PathBuf,
        #[arg(long)]
        profile_image: Option<PathBuf>,
    },
    Interviewer {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "SWIFTHIRE_PASSWORD")]
        password: String,
        #[arg(long)]
        expertise: String,
        #[arg(long)]
        availability: String,
        #[arg(long)]
        department: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum JobsCommands {
    /// List open job posts
    List,
    /// Publish a job post (interviewers)
    Post {
        #[arg(long)]
        title: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        location: String,
        #[arg(long = "type")]
        job_type: String,
        #[arg(long)]
        salary: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        skills: String,
    },
    /// Remove a job post (interviewers)
    Delete { job_id: i64 },
    /// Apply to a job (candidates)
    Apply { job_id: i64 },
    /// Bookmark a job (candidates)
    Save { job_id: i64 },
    /// Remove a bookmark (candidates)
    Unsave { job_id: i64 },
    /// List bookmarked jobs (candidates)
    Saved,
}

#[derive(Subcommand, Debug)]
pub enum NotesCommands {
    Add { application_id: i64, content: String },
    Edit { note_id: i64, content: String },
    Delete { note_id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    Show,
    Update {
        #[arg(long)]
        name: String,
        #[arg(long)]
        skills: String,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        education: Option<String>,
        #[arg(long)]
        years_of_experience: Option<u32>,
        #[arg(long)]
        resume: Option<PathBuf>,
        #[arg(long)]
        profile_image: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// List users
    Users {
        /// Partial name match
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        role: Option<Role>,
    },
    /// Create a user
    AddUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        role: Role,
        #[arg(long, env = "SWIFTHIRE_PASSWORD")]
        password: String,
    },
    /// Delete a user
    RemoveUser { user_id: i64 },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration file
    Check,
}

// ============================================================================
// CLI Command Handlers
// ============================================================================

/// Shared state for one command invocation
struct CommandContext {
    config: Config,
    auth: Auth,
}

impl CommandContext {
    fn new(cli: &Cli, config: Config) -> Result<Self> {
        let mut api_config = config.api.clone();
        if let Some(url) = &cli.api_url {
            api_config.base_url = url.clone();
        }
        let api = ApiClient::from_config(&api_config).context("Failed to create HTTP client")?;
        let store = SessionStore::from_config(&config.storage);
        Ok(Self {
            auth: Auth::new(api, store),
            config,
        })
    }

    fn api(&self) -> &ApiClient {
        self.auth.api()
    }

    fn store(&self) -> &SessionStore {
        self.auth.store()
    }

    /// Guard a page the same way the web client does
    fn require(&self, route: Route) -> Result<Session> {
        let session = self.store().get_session();
        match guard::resolve(route, session.as_ref()) {
            Decision::Allow => session.context("Please sign in first (swifthire login)"),
            Decision::RedirectToLogin(role) => anyhow::bail!(
                "{} is for {}s. Please sign in first (swifthire login)",
                route,
                role
            ),
            Decision::RedirectToOwnDashboard(role) => anyhow::bail!(
                "{} is not available to {}s. Your dashboard is {}",
                route,
                role,
                Route::dashboard_for(role)
            ),
        }
    }

    fn require_session(&self) -> Result<Session> {
        self.store()
            .get_session()
            .context("Not signed in. Use `swifthire login` first.")
    }
}

/// Turn an API failure into the message a user would see inline
fn inline(err: ClientError) -> anyhow::Error {
    match &err {
        ClientError::Validation(errors) => {
            let lines: Vec<String> = errors
                .fields()
                .iter()
                .flat_map(|(field, messages)| {
                    messages.iter().map(move |m| format!("  {}: {}", field, m))
                })
                .collect();
            anyhow::anyhow!("Please fix the following:\n{}", lines.join("\n"))
        }
        _ => {
            tracing::debug!(error = %err, "Request failed");
            anyhow::anyhow!(err.user_message())
        }
    }
}

/// Run a CLI command
pub async fn run_command(cli: &Cli, config: Config) -> Result<()> {
    if let Commands::Config(ConfigCommands::Check) = &cli.command {
        return cmd_config_check(cli, &config);
    }

    let ctx = CommandContext::new(cli, config)?;
    match &cli.command {
        Commands::Login { email, password } => cmd_login(&ctx, email, password).await,
        Commands::Register(command) => cmd_register(&ctx, command).await,
        Commands::Logout => cmd_logout(&ctx),
        Commands::Whoami => cmd_whoami(&ctx),
        Commands::Nav => cmd_nav(&ctx),
        Commands::Open { path } => cmd_open(&ctx, path),
        Commands::Applications { filter } => cmd_applications(&ctx, *filter).await,
        Commands::Watch { application_id } => cmd_watch(&ctx, *application_id).await,
        Commands::Candidates {
            profiles,
            query,
            page,
        } => cmd_candidates(&ctx, profiles, query.as_deref(), *page).await,
        Commands::Shortlisted {
            status,
            search,
            page,
            limit,
        } => cmd_shortlisted(&ctx, *status, search.clone(), *page, *limit).await,
        Commands::Schedule {
            application_id,
            url,
            at,
            duration,
            title,
            description,
        } => {
            let update =
                schedule_update(url, at, *duration, title.as_deref(), description.as_deref());
            cmd_update_application(&ctx, *application_id, update).await
        }
        Commands::Review {
            application_id,
            status,
        } => {
            cmd_update_application(&ctx, *application_id, ApplicationUpdate::status(*status))
                .await
        }
        Commands::Jobs(command) => cmd_jobs(&ctx, command).await,
        Commands::Notes(command) => cmd_notes(&ctx, command).await,
        Commands::Profile(command) => cmd_profile(&ctx, command).await,
        Commands::Feedback { rating, message } => cmd_feedback(&ctx, *rating, message).await,
        Commands::Admin(command) => cmd_admin(&ctx, command).await,
        Commands::Config(ConfigCommands::Check) => Ok(()),
    }
}

async fn cmd_login(ctx: &CommandContext, email: &str, password: &str) -> Result<()> {
    let landing = ctx.auth.sign_in(email, password).await.map_err(inline)?;
    let session = ctx.require_session()?;
    println!(
        "Successfully logged in as {} ({})",
        session.display_label(),
        session.role
    );
    println!("Your dashboard: {}", landing);
    Ok(())
}

async fn cmd_register(ctx: &CommandContext, command: &RegisterCommands) -> Result<()> {
    let account = match command {
        RegisterCommands::Candidate {
            name,
            email,
            password,
            skills,
            bio,
            resume,
            profile_image,
        } => {
            let form = CandidateRegistration {
                name: name.clone(),
                email: email.clone(),
                password: password.clone(),
                skills: skills.clone(),
                bio: bio.clone(),
                resume: read_upload(resume).await?,
                profile_image: match profile_image {
                    Some(path) => Some(read_upload(path).await?),
                    None => None,
                },
            };
            ctx.auth.register_candidate(form).await.map_err(inline)?
        }
        RegisterCommands::Interviewer {
            name,
            email,
            password,
            expertise,
            availability,
            department,
        } => {
            let form = InterviewerRegistration {
                name: name.clone(),
                email: email.clone(),
                password: password.clone(),
                expertise: expertise.clone(),
                availability: availability.clone(),
                department: department.clone(),
            };
            ctx.auth.register_interviewer(&form).await.map_err(inline)?
        }
    };

    println!("Successfully registered as {}!", account.role);
    println!("Sign in with: swifthire login {}", account.email);
    Ok(())
}

async fn read_upload(path: &Path) -> Result<Upload> {
    Upload::from_path(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn cmd_logout(ctx: &CommandContext) -> Result<()> {
    ctx.auth.sign_out().map_err(inline)?;
    println!("Signed out.");
    Ok(())
}

fn cmd_whoami(ctx: &CommandContext) -> Result<()> {
    match ctx.store().get_session() {
        Some(session) => {
            println!("Name:  {}", session.display_label());
            println!("Email: {}", session.email);
            println!("Role:  {}", session.role);
        }
        None => println!("Not signed in."),
    }
    Ok(())
}

fn cmd_nav(ctx: &CommandContext) -> Result<()> {
    let nav = NavBar::mount(ctx.store());
    if let Some(label) = nav.user_label() {
        println!("Signed in as {}", label);
        println!();
    }
    for link in nav.links() {
        let target = match link.target {
            NavTarget::Route(route) => route.path().to_string(),
            NavTarget::Login(role) => format!("login as {}", role),
            NavTarget::SignOut => "logout".to_string(),
        };
        println!("{:<22}  {}", link.label, target);
    }
    Ok(())
}

fn cmd_open(ctx: &CommandContext, path: &str) -> Result<()> {
    let route = Route::from_path(path).with_context(|| format!("Unknown page: {}", path))?;
    let session = ctx.store().get_session();
    let decision = guard::resolve(route, session.as_ref());

    match decision.redirect() {
        None => println!("[OK] {}", route),
        Some(redirect) => {
            let preselect = redirect
                .preselect_role
                .map(|role| format!(" (login as {})", role))
                .unwrap_or_default();
            println!("[->] {} redirects to {}{}", route, redirect.route, preselect);
        }
    }
    Ok(())
}

/// One-line summary of where an interview stands
fn describe(evaluation: &Evaluation) -> String {
    match evaluation.action() {
        Action::Status(text) => text.to_string(),
        Action::Join { url } => format!("Join now: {}", url),
        Action::Disabled { countdown } => format!("Starts in {}", countdown),
    }
}

async fn cmd_applications(ctx: &CommandContext, filter: ApplicationFilter) -> Result<()> {
    let session = ctx.require_session()?;
    let now = chrono::Utc::now();

    match session.role {
        Role::Candidate => {
            let rows = ctx
                .api()
                .candidate_applications(&session.email)
                .await
                .map_err(inline)?;
            let rows: Vec<_> = rows
                .into_iter()
                .filter(|r| filter.matches(&r.application))
                .collect();
            if rows.is_empty() {
                println!("No applications found.");
                return Ok(());
            }

            println!();
            println!(
                "{:<6}  {:<28}  {:<20}  {:<12}  {}",
                "ID", "JOB", "COMPANY", "STATUS", "INTERVIEW"
            );
            println!("{}", "-".repeat(100));
            for row in rows {
                println!(
                    "{:<6}  {:<28}  {:<20}  {:<12}  {}",
                    row.application.application_id,
                    truncate(&row.job_title, 28),
                    truncate(&row.company, 20),
                    row.application.status,
                    describe(&evaluate(&row.application, now))
                );
            }
        }
        Role::Interviewer => {
            let rows = ctx
                .api()
                .interviewer_applications(&session.email)
                .await
                .map_err(inline)?;
            let rows: Vec<_> = rows
                .into_iter()
                .filter(|r| filter.matches(&r.application))
                .collect();
            if rows.is_empty() {
                println!("No applications found.");
                return Ok(());
            }

            println!();
            println!(
                "{:<6}  {:<22}  {:<28}  {:<12}  {}",
                "ID", "CANDIDATE", "JOB", "STATUS", "INTERVIEW"
            );
            println!("{}", "-".repeat(100));
            for row in rows {
                println!(
                    "{:<6}  {:<22}  {:<28}  {:<12}  {}",
                    row.application.application_id,
                    truncate(&row.candidate_name, 22),
                    truncate(&row.job_title, 28),
                    row.application.status,
                    describe(&evaluate(&row.application, now))
                );
            }
        }
    }

    println!();
    Ok(())
}

async fn find_application(
    ctx: &CommandContext,
    session: &Session,
    application_id: i64,
) -> Result<Option<Application>> {
    let found = match session.role {
        Role::Candidate => ctx
            .api()
            .candidate_applications(&session.email)
            .await
            .map_err(inline)?
            .into_iter()
            .map(|r| r.application)
            .find(|a| a.application_id == application_id),
        Role::Interviewer => ctx
            .api()
            .interviewer_applications(&session.email)
            .await
            .map_err(inline)?
            .into_iter()
            .map(|r| r.application)
            .find(|a| a.application_id == application_id),
    };
    Ok(found)
}

fn schedule_update(
    url: &str,
    at: &str,
    duration: u32,
    title: Option<&str>,
    description: Option<&str>,
) -> ApplicationUpdate {
    let mut update = ApplicationUpdate::schedule(url, at, duration);
    if let Some(title) = title {
        update = update.with_title(title);
    }
    if let Some(description) = description {
        update = update.with_description(description);
    }
    update
}

async fn cmd_watch(ctx: &CommandContext, application_id: i64) -> Result<()> {
    let session = ctx.require_session()?;

    let scope = ViewScope::new();
    let disposer = scope.disposer();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            disposer.dispose();
        }
    });

    let Some(found) = scope
        .run(find_application(ctx, &session, application_id))
        .await
    else {
        return Ok(());
    };
    let application =
        found?.with_context(|| format!("Application {} not found", application_id))?;

    let mut ticker =
        CountdownTicker::start_in(&scope, application, ctx.config.interview.tick_interval());
    let mut stdout = std::io::stdout();
    let mut last = describe(&ticker.current());
    print!("\r{:<60}", last);
    stdout.flush()?;

    while let Some(Some(evaluation)) = scope.run(ticker.changed()).await {
        let line = describe(&evaluation);
        if line != last {
            print!("\r{:<60}", line);
            stdout.flush()?;
            last = line;
        }
    }
    println!();
    Ok(())
}

async fn cmd_candidates(
    ctx: &CommandContext,
    profiles: &[Profile],
    query: Option<&str>,
    page: usize,
) -> Result<()> {
    let session = ctx.require(Route::FilterCandidates)?;
    let rows = ctx
        .api()
        .interviewer_applications(&session.email)
        .await
        .map_err(inline)?;

    let mut filter = CandidateFilter::new();
    for profile in profiles {
        filter.toggle(*profile);
    }
    if let Some(query) = query {
        filter.set_query(query);
    }

    let matched: Vec<_> = filter.apply(&rows);
    if matched.is_empty() {
        println!("No candidates match.");
        return Ok(());
    }

    let page = paginate(&matched, page, DEFAULT_PAGE_SIZE);
    println!();
    println!(
        "{:<6}  {:<22}  {:<24}  {:<30}  {:<8}",
        "ID", "CANDIDATE", "JOB", "SKILLS", "YEARS"
    );
    println!("{}", "-".repeat(100));
    for row in page.items {
        println!(
            "{:<6}  {:<22}  {:<24}  {:<30}  {:<8}",
            row.application.application_id,
            truncate(&row.candidate_name, 22),
            truncate(&row.job_title, 24),
            truncate(row.skills.as_deref().unwrap_or("-"), 30),
            row.years_of_experience
                .map(|y| y.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    }
    println!();
    println!(
        "Page {} of {} ({} matching)",
        page.page,
        page.total_pages,
        matched.len()
    );
    Ok(())
}

async fn cmd_shortlisted(
    ctx: &CommandContext,
    status: Option<ApplicationStatus>,
    search: Option<String>,
    page: u32,
    limit: u32,
) -> Result<()> {
    ctx.require(Route::ConductInterview)?;
    let result = ctx
        .api()
        .search_shortlisted(&ShortlistQuery {
            page,
            limit,
            status,
            search,
        })
        .await
        .map_err(inline)?;

    if result.items.is_empty() {
        println!("No applications found.");
        return Ok(());
    }

    let now = chrono::Utc::now();
    println!();
    println!(
        "{:<6}  {:<22}  {:<26}  {:<12}  {}",
        "ID", "CANDIDATE", "JOB", "STATUS", "INTERVIEW"
    );
    println!("{}", "-".repeat(100));
    for row in &result.items {
        println!(
            "{:<6}  {:<22}  {:<26}  {:<12}  {}",
            row.application.application_id,
            truncate(&row.candidate_name, 22),
            truncate(&row.job_title, 26),
            row.application.status,
            describe(&evaluate(&row.application, now))
        );
    }
    println!();
    println!(
        "Page {} of {} ({} total)",
        result.page, result.pages, result.total
    );
    Ok(())
}

async fn cmd_update_application(
    ctx: &CommandContext,
    application_id: i64,
    update: ApplicationUpdate,
) -> Result<()> {
    ctx.require(Route::ConductInterview)?;
    let record = ctx
        .api()
        .update_application(application_id, &update)
        .await
        .map_err(inline)?;

    println!(
        "Application {} is now {}",
        record.application.application_id, record.application.status
    );
    if record.application.has_scheduled_interview() {
        println!(
            "Interview: {}",
            describe(&evaluate(&record.application, chrono::Utc::now()))
        );
    }
    Ok(())
}

async fn cmd_jobs(ctx: &CommandContext, command: &JobsCommands) -> Result<()> {
    match command {
        JobsCommands::List => {
            let jobs = ctx.api().job_posts().await.map_err(inline)?;
            print_jobs(&jobs);
        }
        JobsCommands::Post {
            title,
            company,
            location,
            job_type,
            salary,
            description,
            skills,
        } => {
            let session = ctx.require(Route::PostJobs)?;
            let post = ctx
                .api()
                .create_job_post(&JobPostForm {
                    title: title.clone(),
                    company: company.clone(),
                    location: location.clone(),
                    job_type: job_type.clone(),
                    salary: salary.clone(),
                    description: description.clone(),
                    skills: skills.clone(),
                    interviewer_email: session.email,
                })
                .await
                .map_err(inline)?;
            println!("Posted job {} ({})", post.id, post.title);
        }
        JobsCommands::Delete { job_id } => {
            ctx.require(Route::PostJobs)?;
            ctx.api().delete_job_post(*job_id).await.map_err(inline)?;
            println!("Deleted job {}", job_id);
        }
        JobsCommands::Apply { job_id } => {
            let session = ctx.require(Route::BrowseJobs)?;
            let jobs = ctx.api().job_posts().await.map_err(inline)?;
            let job = jobs
                .iter()
                .find(|j| j.id == *job_id)
                .with_context(|| format!("Job {} not found", job_id))?;
            let record = ctx
                .api()
                .apply(&NewApplication {
                    candidate_email: session.email,
                    job_id: job.id,
                    interviewer_email: job.interviewer_email.clone(),
                })
                .await
                .map_err(inline)?;
            println!(
                "Applied to {} at {} (application {})",
                job.title, job.company, record.application.application_id
            );
        }
        JobsCommands::Save { job_id } => {
            let session = ctx.require(Route::BrowseJobs)?;
            ctx.api()
                .save_job(&session.email, *job_id)
                .await
                .map_err(inline)?;
            println!("Saved job {}", job_id);
        }
        JobsCommands::Unsave { job_id } => {
            let session = ctx.require(Route::BrowseJobs)?;
            ctx.api()
                .unsave_job(&session.email, *job_id)
                .await
                .map_err(inline)?;
            println!("Removed job {} from saved jobs", job_id);
        }
        JobsCommands::Saved => {
            let session = ctx.require(Route::BrowseJobs)?;
            let jobs = ctx.api().saved_jobs(&session.email).await.map_err(inline)?;
            print_jobs(&jobs);
        }
    }
    Ok(())
}

fn print_jobs(jobs: &[crate::api::JobPost]) {
    if jobs.is_empty() {
        println!("No jobs found.");
        return;
    }

    println!();
    println!(
        "{:<6}  {:<28}  {:<20}  {:<18}  {:<12}  {:<14}",
        "ID", "TITLE", "COMPANY", "LOCATION", "TYPE", "SALARY"
    );
    println!("{}", "-".repeat(110));
    for job in jobs {
        println!(
            "{:<6}  {:<28}  {:<20}  {:<18}  {:<12}  {:<14}",
            job.id,
            truncate(&job.title, 28),
            truncate(&job.company, 20),
            truncate(&job.location, 18),
            truncate(&job.job_type, 12),
            truncate(&job.salary, 14)
        );
    }
    println!();
}

async fn cmd_notes(ctx: &CommandContext, command: &NotesCommands) -> Result<()> {
    let session = ctx.require(Route::ConductInterview)?;
    match command {
        NotesCommands::Add {
            application_id,
            content,
        } => {
            let note = ctx
                .api()
                .create_note(*application_id, content, &session.email)
                .await
                .map_err(inline)?;
            println!("Added note {} to application {}", note.id, note.application_id);
        }
        NotesCommands::Edit { note_id, content } => {
            ctx.api()
                .update_note(*note_id, content, &session.email)
                .await
                .map_err(inline)?;
            println!("Updated note {}", note_id);
        }
        NotesCommands::Delete { note_id } => {
            ctx.api()
                .delete_note(*note_id, &session.email)
                .await
                .map_err(inline)?;
            println!("Deleted note {}", note_id);
        }
    }
    Ok(())
}

async fn cmd_profile(ctx: &CommandContext, command: &ProfileCommands) -> Result<()> {
    let session = ctx.require(Route::CandidateDashboard)?;
    let profile = match command {
        ProfileCommands::Show => ctx
            .api()
            .candidate_profile(&session.email)
            .await
            .map_err(inline)?,
        ProfileCommands::Update {
            name,
            skills,
            bio,
            education,
            years_of_experience,
            resume,
            profile_image,
        } => {
            let update = ProfileUpdate {
                name: name.clone(),
                skills: skills.clone(),
                bio: bio.clone(),
                education: education.clone(),
                years_of_experience: *years_of_experience,
                resume: match resume {
                    Some(path) => Some(read_upload(path).await?),
                    None => None,
                },
                profile_image: match profile_image {
                    Some(path) => Some(read_upload(path).await?),
                    None => None,
                },
            };
            let profile = ctx.auth.update_profile(update).await.map_err(inline)?;
            println!("Profile updated.");
            profile
        }
    };

    println!();
    println!("Name:       {}", profile.name);
    println!("Email:      {}", profile.email);
    println!("Skills:     {}", profile.skills.as_deref().unwrap_or("-"));
    println!("Education:  {}", profile.education.as_deref().unwrap_or("-"));
    println!(
        "Experience: {} years",
        profile.years_of_experience.unwrap_or(0)
    );
    if let Some(bio) = &profile.bio {
        println!("Bio:        {}", bio);
    }
    if let Some(resume) = &profile.resume {
        println!("Resume:     {}", resume);
    }
    Ok(())
}

async fn cmd_feedback(ctx: &CommandContext, rating: u8, message: &str) -> Result<()> {
    let session = ctx.require_session()?;
    ctx.api()
        .submit_feedback(&FeedbackForm {
            rating,
            message: message.to_string(),
            user_email: session.email.clone(),
            user_name: session.name.clone(),
            user_role: session.role.to_string(),
        })
        .await
        .map_err(inline)?;
    println!("Thank you for your feedback!");
    Ok(())
}

async fn cmd_admin(ctx: &CommandContext, command: &AdminCommands) -> Result<()> {
    match command {
        AdminCommands::Users { name, role } => {
            let users = ctx
                .api()
                .list_users(&UserQuery {
                    name: name.clone(),
                    role: *role,
                })
                .await
                .map_err(inline)?;
            if users.is_empty() {
                println!("No users found.");
                return Ok(());
            }

            println!();
            println!("{:<6}  {:<24}  {:<32}  {:<12}", "ID", "NAME", "EMAIL", "ROLE");
            println!("{}", "-".repeat(80));
            for user in users {
                println!(
                    "{:<6}  {:<24}  {:<32}  {:<12}",
                    user.id,
                    truncate(&user.name, 24),
                    truncate(&user.email, 32),
                    user.role
                );
            }
            println!();
        }
        AdminCommands::AddUser {
            name,
            email,
            role,
            password,
        } => {
            let user = ctx
                .api()
                .create_user(&NewUser {
                    name: name.clone(),
                    email: email.clone(),
                    role: *role,
                    password: password.clone(),
                })
                .await
                .map_err(inline)?;
            println!("Created user {} ({})", user.id, user.email);
        }
        AdminCommands::RemoveUser { user_id } => {
            ctx.api().delete_user(*user_id).await.map_err(inline)?;
            println!("Deleted user {}", user_id);
        }
    }
    Ok(())
}

/// Validate configuration file
fn cmd_config_check(cli: &Cli, config: &Config) -> Result<()> {
    let config_path = &cli.config;

    println!("Checking configuration file: {}", config_path.display());
    println!();

    if !config_path.exists() {
        println!(
            "[!!] Configuration file not found: {}",
            config_path.display()
        );
        println!();
        println!("Defaults will be used.");
        println!();
    } else {
        println!("[OK] Configuration file parsed");
        println!();
    }

    let base_url = cli.api_url.as_deref().unwrap_or(&config.api.base_url);
    println!("=== Configuration Summary ===");
    println!();
    println!("API:");
    println!("  Base URL:     {}", base_url);
    println!("  Timeout:      {}s", config.api.timeout_secs);
    println!();
    println!("Storage:");
    println!("  Backend:      {:?}", config.storage.backend);
    println!("  Data Dir:     {}", config.storage.data_dir.display());
    println!();
    println!("Interview:");
    println!("  Tick:         {}ms", config.interview.tick_interval_ms);
    println!();
    println!("Logging:");
    println!("  Level:        {}", config.logging.level);
    println!();

    let report = config.validate();
    for warning in &report.warnings {
        println!("[!] {}", warning);
    }
    for error in &report.errors {
        println!("[!!] {}", error);
    }

    if !report.is_ok() {
        anyhow::bail!("Configuration has {} error(s)", report.errors.len());
    }
    if report.warnings.is_empty() {
        println!("[OK] No problems found");
    }
    Ok(())
}

/// Truncate a string to max length with ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long job title", 10), "a very ...");
        assert_eq!(truncate("Zoë Müller-Lüdenscheidt", 8), "Zoë M...");
    }

    #[test]
    fn test_parse_candidates_command() {
        let cli = Cli::try_parse_from([
            "swifthire",
            "candidates",
            "-p",
            "frontend",
            "-p",
            "Data Science",
            "--query",
            "acme",
        ])
        .unwrap();

        match cli.command {
            Commands::Candidates {
                profiles, query, page,
            } => {
                assert_eq!(profiles, [Profile::Frontend, Profile::DataScience]);
                assert_eq!(query.as_deref(), Some("acme"));
                assert_eq!(page, 1);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_applications_filter() {
        let cli = Cli::try_parse_from(["swifthire", "applications", "--filter", "interviews"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Applications {
                filter: ApplicationFilter::Interviews
            }
        ));

        assert!(Cli::try_parse_from(["swifthire", "applications", "--filter", "pending"]).is_err());
    }

    #[test]
    fn test_schedule_update_carries_title_and_description() {
        let update = schedule_update(
            "https://meet.example.com/a",
            "2025-06-01T10:00",
            45,
            Some("Technical"),
            Some("Systems design round"),
        );
        assert_eq!(update.status, "Shortlisted");
        assert_eq!(update.interview_title.as_deref(), Some("Technical"));
        assert_eq!(
            update.interview_description.as_deref(),
            Some("Systems design round")
        );

        let bare = schedule_update("https://meet.example.com/a", "2025-06-01T10:00", 30, None, None);
        assert!(bare.interview_title.is_none());
        assert!(bare.interview_description.is_none());
    }

    #[test]
    fn test_describe_upcoming() {
        let start = chrono::Utc::now() + chrono::Duration::hours(2);
        let application = Application {
            application_id: 1,
            status: ApplicationStatus::Shortlisted,
            interview_form_url: Some("https://meet.example.com/a".into()),
            interview_schedule: Some(start),
            interview_duration: None,
        };
        assert!(describe(&evaluate(&application, chrono::Utc::now())).starts_with("Starts in 01:59"));
    }

    #[test]
    fn test_guarded_command_rejects_wrong_role() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.data_dir = dir.path().to_path_buf();
        let cli = Cli::try_parse_from(["swifthire", "whoami"]).unwrap();
        let ctx = CommandContext::new(&cli, config).unwrap();

        ctx.store()
            .set_session(Session::new("Cal", "cal@x.io", Role::Candidate))
            .unwrap();
        let err = ctx.require(Route::FilterCandidates).unwrap_err();
        assert!(err.to_string().contains("/candidate-dashboard"));
        assert!(ctx.require(Route::BrowseJobs).is_ok());

        ctx.store().clear_session().unwrap();
        assert!(ctx.require(Route::BrowseJobs).is_err());
    }
}
