use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sourcematch::applications::StatusFilter;
use sourcematch::auth::Registration;
use sourcematch::config::Config;
use sourcematch::confirm::{AutoConfirm, ConfirmGate, DeleteOutcome, StdinConfirm};
use sourcematch::matching::ResumeArtifact;
use sourcematch::models::application::{Application, ApplicationStatus};
use sourcematch::models::job::{split_skills, NewJob, DEFAULT_EXPERIENCE_LEVEL};
use sourcematch::models::user::Role;
use sourcematch::session::store::FileSessionStore;
use sourcematch::settings::SaveOutcome;
use sourcematch::{AppState, ClientError};

#[derive(Debug, Parser)]
#[command(name = "sourcematch", version, about = "Smoke-test driver for the SourceMatch API")]
struct Cli {
    /// Answer yes to every confirmation prompt.
    #[arg(long, global = true)]
    yes: bool,

    /// Overrides SOURCEMATCH_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoleArg {
    Candidate,
    Recruiter,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Candidate => Role::Candidate,
            RoleArg::Recruiter => Role::Recruiter,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an account and log in with it.
    Register {
        email: String,
        password: String,
        #[arg(long)]
        confirm_password: Option<String>,
        #[arg(long, default_value = "")]
        full_name: String,
        #[arg(long, value_enum, default_value = "candidate")]
        role: RoleArg,
    },
    Login {
        email: String,
        password: String,
    },
    Logout,
    Whoami,
    /// List job postings.
    Jobs,
    PostJob {
        title: String,
        description: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        salary_min: Option<i64>,
        #[arg(long)]
        salary_max: Option<i64>,
        #[arg(long, default_value = DEFAULT_EXPERIENCE_LEVEL)]
        experience_level: String,
        /// Comma-separated skill list.
        #[arg(long, default_value = "")]
        skills: String,
    },
    DeleteJob {
        job_id: i64,
    },
    /// Score a resume against every job and show the top matches.
    Score {
        resume: PathBuf,
    },
    /// Apply to a job as the logged-in user.
    Apply {
        job_id: i64,
        /// Resume to attach; a placeholder is sent when omitted.
        #[arg(long)]
        resume: Option<PathBuf>,
    },
    History,
    DeleteHistory {
        search_id: i64,
    },
    Applications {
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },
    Application {
        application_id: i64,
    },
    SetStatus {
        application_id: i64,
        status: ApplicationStatus,
    },
    DeleteApplication {
        application_id: i64,
    },
    Users,
    DeleteUser {
        user_id: i64,
    },
    /// Show the skill threshold, or set it when a value is given.
    Threshold {
        value: Option<String>,
    },
    /// Recruiter statistics over the application list.
    Stats,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(api_url) = cli.api_url.clone() {
        config.api_url = api_url;
    }

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        "sourcematch v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.api_url
    );

    let store = Arc::new(FileSessionStore::new(config.session_file.clone()));
    let gate: Arc<dyn ConfirmGate> = if cli.yes {
        Arc::new(AutoConfirm(true))
    } else {
        Arc::new(StdinConfirm)
    };
    let state = AppState::new(config, store, gate)?;

    match run(&state, cli.command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err((fallback, e)) => {
            eprintln!("error: {}", e.user_message(fallback));
            if e.is_auth_failure() {
                eprintln!("You have been logged out.");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

type CommandResult = Result<(), (&'static str, ClientError)>;

/// Tags an error with the generic message shown when the server gave no detail.
fn fail(fallback: &'static str) -> impl FnOnce(ClientError) -> (&'static str, ClientError) {
    move |e| (fallback, e)
}

async fn run(state: &AppState, command: Command) -> CommandResult {
    match command {
        Command::Register {
            email,
            password,
            confirm_password,
            full_name,
            role,
        } => {
            let registration = Registration {
                email,
                full_name,
                confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                password,
                role: role.into(),
            };
            let user = state
                .auth()
                .register(&registration)
                .await
                .map_err(fail("Registration failed"))?;
            println!("Registered and logged in as {} ({})", user.display_name(), user.role);
        }
        Command::Login { email, password } => {
            let user = state
                .auth()
                .login(&email, &password)
                .await
                .map_err(fail("Login failed"))?;
            println!("Logged in as {} ({})", user.display_name(), user.role);
        }
        Command::Logout => {
            if state.auth().logout() {
                println!("Logged out");
            } else {
                println!("Not logged in");
            }
        }
        Command::Whoami => match state.session().current_user() {
            Some(user) => println!("{} <{}> #{} ({})", user.display_name(), user.email, user.id, user.role),
            None => println!("Not logged in"),
        },
        Command::Jobs => {
            let mut board = state.jobs();
            let jobs = board.refresh().await.map_err(fail("Failed to load jobs"))?;
            for job in jobs {
                println!(
                    "#{:<4} {} @ {} [{}]",
                    job.id,
                    job.title,
                    job.company.as_deref().unwrap_or("-"),
                    job.experience_level
                );
                if let Some(salary) = job.salary_range() {
                    println!("      salary: {salary}");
                }
                let skills = job.skills();
                if !skills.is_empty() {
                    println!("      skills: {}", skills.join(", "));
                }
            }
        }
        Command::PostJob {
            title,
            description,
            company,
            location,
            salary_min,
            salary_max,
            experience_level,
            skills,
        } => {
            let job = NewJob {
                company,
                location,
                salary_min,
                salary_max,
                experience_level,
                required_skills: split_skills(&skills),
                ..NewJob::new(title, description)
            };
            let created = state
                .jobs()
                .post(&job)
                .await
                .map_err(fail("Failed to post job"))?;
            println!("Posted job #{} {}", created.id, created.title);
        }
        Command::DeleteJob { job_id } => {
            let outcome = state
                .jobs()
                .delete(job_id)
                .await
                .map_err(fail("Failed to delete job"))?;
            report_delete("Job", outcome);
        }
        Command::Score { resume } => {
            let artifact = ResumeArtifact::from_path(&resume)
                .await
                .map_err(fail("Failed to read resume"))?;
            let mut session = state.matching();
            session.select_resume(artifact);
            let matches = session.score().await.map_err(fail("Failed to score resume"))?;
            if matches.is_empty() {
                println!("No matching jobs");
            }
            for m in matches {
                println!("{}. {:>3}%  #{} {}", m.rank, m.percent, m.result.job_id, m.result.job_title);
                if !m.result.matched_skills.is_empty() {
                    println!("         matched: {}", m.result.matched_skills.join(", "));
                }
                if let Some(summary) = m.result.summary() {
                    println!("         {summary}");
                }
            }
        }
        Command::Apply { job_id, resume } => {
            let mut session = state.matching();
            if let Some(path) = resume {
                let artifact = ResumeArtifact::from_path(&path)
                    .await
                    .map_err(fail("Failed to read resume"))?;
                session.select_resume(artifact);
            }
            let ack = session
                .apply_as_current_user(job_id)
                .await
                .map_err(fail("Failed to apply"))?;
            println!("Applied successfully (application #{})", ack.application_id);
        }
        Command::History => {
            let mut panel = state.history();
            let entries = panel.refresh().await.map_err(fail("Failed to load history"))?;
            if entries.is_empty() {
                println!("Your search history will appear here when you score resumes.");
            }
            for entry in entries {
                println!(
                    "Search #{} at {} (resume: {})",
                    entry.search_id,
                    entry.created_at.format("%Y-%m-%d %H:%M"),
                    entry.resume_file_name().unwrap_or("Unknown")
                );
                for result in &entry.results {
                    println!("    {:>3}%  #{} {}", result.percent(), result.job_id, result.job_title);
                }
            }
        }
        Command::DeleteHistory { search_id } => {
            let outcome = state
                .history()
                .delete(search_id)
                .await
                .map_err(fail("Failed to delete history"))?;
            report_delete("History entry", outcome);
        }
        Command::Applications { status } => {
            let mut board = state.applications();
            let apps = board
                .set_filter(status)
                .await
                .map_err(fail("Failed to load applications"))?;
            for app in apps {
                print_application_row(app);
            }
        }
        Command::Application { application_id } => {
            let mut board = state.applications();
            let app = board
                .open(application_id)
                .await
                .map_err(fail("Failed to load application details"))?;
            print_application_row(app);
            println!("    email: {}", app.candidate_email);
            if let Some(course) = &app.course {
                println!("    course: {course}");
            }
            if let Some(year) = &app.year_of_passing {
                println!("    year of passing: {year}");
            }
            if let Some(dob) = &app.date_of_birth {
                println!("    date of birth: {dob}");
            }
            if !app.candidate_skills.is_empty() {
                println!("    skills: {}", app.candidate_skills.join(", "));
            }
            if !app.matched_skills().is_empty() {
                println!("    matched: {}", app.matched_skills().join(", "));
            }
        }
        Command::SetStatus {
            application_id,
            status,
        } => {
            let mut board = state.applications();
            let ack = board
                .transition(application_id, status)
                .await
                .map_err(fail("Failed to update status"))?;
            println!("Application {} successfully!", ack.new_status);
        }
        Command::DeleteApplication { application_id } => {
            let outcome = state
                .applications()
                .delete(application_id)
                .await
                .map_err(fail("Failed to delete application"))?;
            report_delete("Application", outcome);
        }
        Command::Users => {
            let mut admin = state.users();
            let users = admin.refresh().await.map_err(fail("Failed to load users"))?;
            for user in users {
                println!("#{:<4} {} <{}> ({})", user.id, user.display_name(), user.email, user.role);
            }
        }
        Command::DeleteUser { user_id } => {
            let outcome = state
                .users()
                .delete(user_id)
                .await
                .map_err(fail("Failed to delete user"))?;
            report_delete("User", outcome);
        }
        Command::Threshold { value } => {
            let mut panel = state.settings();
            let current = panel
                .load()
                .await
                .map_err(fail("Failed to load skill threshold"))?;
            match value {
                None => println!("Skill threshold: {}", current.skill_threshold),
                Some(input) => match panel
                    .save(&input)
                    .await
                    .map_err(fail("Failed to update settings"))?
                {
                    SaveOutcome::Saved(saved) => {
                        println!("Settings updated: skill threshold {}", saved.skill_threshold)
                    }
                    SaveOutcome::Unchanged => println!("No changes to save"),
                },
            }
        }
        Command::Stats => {
            let mut board = state.applications();
            board
                .refresh()
                .await
                .map_err(fail("Failed to load applications"))?;
            let stats = board.stats();
            println!("Total applications: {}", stats.total);
            println!("Shortlisted:        {}", stats.shortlisted);
            println!("Rejected:           {}", stats.rejected);
            println!("Pending review:     {}", stats.applied);
            if let Some(avg) = stats.average_percent {
                println!("Average match:      {avg}%");
            }
            for (i, top) in stats.top.iter().enumerate() {
                println!("  {}. {:>3}%  {} ({})", i + 1, top.percent, top.candidate_name, top.job_title);
            }
        }
    }
    Ok(())
}

fn print_application_row(app: &Application) {
    println!(
        "#{:<4} {:<12} {:>3}%  {} -> {} ({})",
        app.application_id,
        app.status,
        app.percent(),
        app.candidate_name,
        app.job_title,
        app.created_at.format("%Y-%m-%d")
    );
}

fn report_delete(what: &str, outcome: DeleteOutcome) {
    match outcome {
        DeleteOutcome::Deleted => println!("{what} deleted"),
        DeleteOutcome::Declined => println!("Cancelled"),
    }
}
