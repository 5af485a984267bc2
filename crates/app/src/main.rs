use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use portal_core::model::{ProfileContactDraft, SortOrder, StatusFilter, TrailId, UserId};
use services::{AppServices, CheckStatus, Clock, ResumeSections, SessionListQuery};
use storage::repository::Storage;

mod seed;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingUser,
    MissingTrail,
    InvalidId { flag: &'static str, raw: String },
    InvalidNumber { flag: &'static str, raw: String },
    InvalidOrder { raw: String },
    InvalidDbUrl { raw: String },
    InvalidPath { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingUser => write!(f, "no user given (use --user or PORTAL_USER_ID)"),
            ArgsError::MissingTrail => write!(f, "favorite requires --trail <id>"),
            ArgsError::InvalidId { flag, raw } => write!(f, "invalid {flag} value: {raw:?}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidOrder { raw } => write!(f, "invalid --order value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidPath { raw } => write!(f, "cannot build a file url for: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number(value: String, flag: &'static str) -> Result<usize, ArgsError> {
    value
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw: value })
}

fn parse_id<T: std::str::FromStr>(value: String, flag: &'static str) -> Result<T, ArgsError> {
    value
        .parse()
        .map_err(|_| ArgsError::InvalidId { flag, raw: value })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- dashboard [--user <id>] [--status <s>] [--order asc|desc]");
    eprintln!("                                [--page <n>] [--page-size <n>]");
    eprintln!("  cargo run -p app -- candidate [--user <id>]");
    eprintln!("  cargo run -p app -- favorite  --trail <id> [--user <id>]");
    eprintln!("  cargo run -p app -- profile   [--user <id>] [--name <n> [--phone <p>]] [--avatar <url>]");
    eprintln!("  cargo run -p app -- resume    [--user <id>] [--out <path>] [--summary <t>]");
    eprintln!("                                [--skills <t>] [--experience <t>] [--education <t>]");
    eprintln!("  cargo run -p app -- check");
    eprintln!("  cargo run -p app -- seed");
    eprintln!();
    eprintln!("Every command accepts --db <sqlite_url> (default sqlite://portal.sqlite3).");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PORTAL_DB_URL, PORTAL_USER_ID, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Dashboard,
    Candidate,
    Favorite,
    Profile,
    Resume,
    Check,
    Seed,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "dashboard" => Some(Self::Dashboard),
            "candidate" => Some(Self::Candidate),
            "favorite" => Some(Self::Favorite),
            "profile" => Some(Self::Profile),
            "resume" => Some(Self::Resume),
            "check" => Some(Self::Check),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

#[derive(Default)]
struct ProfileEdits {
    name: Option<String>,
    phone: Option<String>,
    avatar: Option<String>,
}

struct Args {
    db_url: String,
    user: Option<UserId>,
    trail: Option<TrailId>,
    query: SessionListQuery,
    profile: ProfileEdits,
    resume: ResumeSections,
    out: Option<PathBuf>,
}

enum Parsed {
    Run(Args),
    Help,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Parsed, ArgsError> {
        let mut db_url = std::env::var("PORTAL_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://portal.sqlite3".into(), normalize_sqlite_url);
        let mut user = std::env::var("PORTAL_USER_ID")
            .ok()
            .and_then(|value| value.parse::<UserId>().ok());
        let mut trail = None;
        let mut query = SessionListQuery::default();
        let mut profile = ProfileEdits::default();
        let mut resume = ResumeSections::default();
        let mut out = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--user" => user = Some(parse_id(require_value(args, "--user")?, "--user")?),
                "--trail" => trail = Some(parse_id(require_value(args, "--trail")?, "--trail")?),
                "--status" => {
                    query.status = StatusFilter::parse(&require_value(args, "--status")?);
                }
                "--order" => {
                    let value = require_value(args, "--order")?;
                    query.order = match value.as_str() {
                        "asc" => SortOrder::Asc,
                        "desc" => SortOrder::Desc,
                        _ => return Err(ArgsError::InvalidOrder { raw: value }),
                    };
                }
                "--page" => query.page = parse_number(require_value(args, "--page")?, "--page")?,
                "--page-size" => {
                    query.page_size =
                        parse_number(require_value(args, "--page-size")?, "--page-size")?;
                }
                "--name" => profile.name = Some(require_value(args, "--name")?),
                "--phone" => profile.phone = Some(require_value(args, "--phone")?),
                "--avatar" => profile.avatar = Some(require_value(args, "--avatar")?),
                "--summary" => resume.summary = require_value(args, "--summary")?,
                "--skills" => resume.skills = require_value(args, "--skills")?,
                "--experience" => resume.experience = require_value(args, "--experience")?,
                "--education" => resume.education = require_value(args, "--education")?,
                "--out" => out = Some(PathBuf::from(require_value(args, "--out")?)),
                "--help" | "-h" => return Ok(Parsed::Help),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Parsed::Run(Self {
            db_url,
            user,
            trail,
            query,
            profile,
            resume,
            out,
        }))
    }

    fn user(&self) -> Result<&UserId, ArgsError> {
        self.user.as_ref().ok_or(ArgsError::MissingUser)
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    absolute_path(Path::new(&path_str))
        .map_or(format!("sqlite://{path_str}"), |p| format!("sqlite://{}", p.display()))
}

fn absolute_path(path: &Path) -> Option<PathBuf> {
    if path.is_absolute() {
        return Some(path.to_path_buf());
    }
    std::env::current_dir().ok().map(|dir| dir.join(path))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct DashboardOutput<'a> {
    #[serde(flatten)]
    dashboard: &'a services::MigrantDashboard,
    appointments: services::Page<portal_core::model::Session>,
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None | Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    let mut iter = argv.into_iter().skip(1);
    let parsed = match Args::parse(&mut iter) {
        Ok(Parsed::Run(args)) => args,
        Ok(Parsed::Help) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            print_usage();
            return Err(e.into());
        }
    };

    let clock = Clock::default_clock();
    tracing::info!(command = ?cmd, db = %parsed.db_url, "starting");

    if cmd == Command::Check {
        // Diagnostics must see the schema as it is, so no migrations here.
        let storage = Storage::sqlite_existing(&parsed.db_url).await?;
        let report = AppServices::new(storage, clock).connection_check().run().await;
        print_json(&report)?;
        if report.database == CheckStatus::Error {
            std::process::exit(1);
        }
        return Ok(());
    }

    prepare_sqlite_file(&parsed.db_url)?;
    let app = AppServices::new_sqlite(&parsed.db_url, clock).await?;

    match cmd {
        Command::Dashboard => {
            let dashboard = app.migrant_dashboard().load(parsed.user()?).await?;
            let appointments = dashboard.session_page(&parsed.query);
            print_json(&DashboardOutput {
                dashboard: &dashboard,
                appointments,
            })
        }
        Command::Candidate => {
            let profile = app.candidate_profiles().load(parsed.user()?).await?;
            print_json(&profile)
        }
        Command::Favorite => {
            let trail = parsed.trail.as_ref().ok_or(ArgsError::MissingTrail)?;
            let now_favorite = app
                .preferences()
                .toggle_favorite(parsed.user()?, trail)
                .await?;
            println!(
                "{trail} {}",
                if now_favorite { "added to favorites" } else { "removed from favorites" }
            );
            Ok(())
        }
        Command::Profile => {
            let user = parsed.user()?;
            let profiles = app.profiles();
            if let Some(name) = parsed.profile.name.clone() {
                let draft = ProfileContactDraft {
                    name,
                    phone: parsed.profile.phone.clone(),
                };
                profiles.save_contact(user, draft).await?;
            }
            if let Some(avatar) = parsed.profile.avatar.as_deref() {
                let avatar = Some(avatar).filter(|url| !url.is_empty());
                profiles.set_avatar_url(user, avatar).await?;
            }
            print_json(&profiles.get(user).await?)
        }
        Command::Resume => {
            let user = parsed.user()?;
            let text = app.profiles().generate_resume(user, &parsed.resume).await?;
            let out = parsed
                .out
                .clone()
                .unwrap_or_else(|| PathBuf::from(format!("{user}-resume.txt")));
            let out = absolute_path(&out).unwrap_or(out);
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&out, text)?;

            let url = Url::from_file_path(&out).map_err(|()| ArgsError::InvalidPath {
                raw: out.display().to_string(),
            })?;
            app.preferences().set_resume_url(user, url.as_str()).await?;
            tracing::info!(user = %user, path = %out.display(), "stored generated resume");
            println!("{url}");
            Ok(())
        }
        Command::Seed => {
            let written = seed::seed_demo(app.storage(), clock).await?;
            tracing::info!(rows = written, "seeded demo data");
            println!(
                "seeded {written} rows; try --user {} or --user {}",
                seed::DEMO_MIGRANT,
                seed::DEMO_CANDIDATE
            );
            Ok(())
        }
        Command::Check => Ok(()),
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "app=info,services=info,storage=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "command failed");
        eprintln!("{err}");
        std::process::exit(2);
    }
}
