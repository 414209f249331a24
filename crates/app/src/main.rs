use std::error::Error;
use std::fmt;
use std::io::{self, BufRead, Write};

use practice_core::catalog::{self, SessionMode, Skill};
use practice_core::model::{Report, SkillId, UserId};
use services::config::{parse_api_url, parse_positive};
use services::{
    Advance, AnswerState, Clock, ConfigError, Identity, PracticeConfig, PracticeServices,
    SessionController, SessionError, SessionPhase,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidDbUrl { raw: String },
    UnknownSkill(SkillId),
    Config(ConfigError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::UnknownSkill(id) => write!(f, "no skill with id {id}; try `skills`"),
            ArgsError::Config(err) => write!(f, "{err}"),
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

fn parse_flag<T: std::str::FromStr>(flag: &'static str, raw: String) -> Result<T, ArgsError> {
    raw.parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw: raw.clone() })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [practice] [--skill <id>] [--count <n>] [--seed <n>]");
    eprintln!("                     [--user <id>] [--api <url> | --db <sqlite_url>]");
    eprintln!("  cargo run -p app -- skills");
    eprintln!("  cargo run -p app -- history --skill <id> [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Without --user nothing is recorded. Without --api or --db results stay in memory.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PRACTICE_API_URL, PRACTICE_API_TOKEN, PRACTICE_DB_URL,");
    eprintln!("  PRACTICE_QUESTION_COUNT, PRACTICE_SEED, PRACTICE_USER_ID, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Practice,
    Skills,
    History,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "practice" => Some(Self::Practice),
            "skills" => Some(Self::Skills),
            "history" => Some(Self::History),
            _ => None,
        }
    }
}

struct Args {
    config: PracticeConfig,
    identity: Identity,
    skill: Option<SkillId>,
}

impl Args {
    /// Flags override whatever the environment provided.
    fn parse(
        args: &mut impl Iterator<Item = String>,
        mut config: PracticeConfig,
        mut identity: Identity,
    ) -> Result<Self, ArgsError> {
        let mut skill = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => {
                    let value = require_value(args, "--api")?;
                    config.api_url =
                        Some(parse_api_url("--api", &value).map_err(ArgsError::Config)?);
                }
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    config.db_url = Some(value);
                }
                "--skill" => {
                    let value = require_value(args, "--skill")?;
                    skill = Some(parse_flag::<SkillId>("--skill", value)?);
                }
                "--count" => {
                    let value = require_value(args, "--count")?;
                    config.question_count =
                        Some(parse_positive("--count", &value).map_err(ArgsError::Config)?);
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    config.seed = Some(parse_flag::<u64>("--seed", value)?);
                }
                "--user" => {
                    let value = require_value(args, "--user")?;
                    identity = Identity::user(parse_flag::<UserId>("--user", value)?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        config.db_url = config.db_url.map(normalize_sqlite_url);
        Ok(Self {
            config,
            identity,
            skill,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") || raw.starts_with("sqlite:file:")
    {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn Error>> {
    if db_url == "sqlite::memory:" || db_url.starts_with("sqlite:file:") {
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

    let path = std::path::Path::new(path);
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

//
// ─── TERMINAL SESSION ──────────────────────────────────────────────────────────
//

enum Flow {
    Continue,
    Quit,
}

fn read_command(input: &mut impl BufRead) -> io::Result<Option<String>> {
    print!("> ");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_lowercase()))
}

fn letter_index(choice: &str) -> Option<usize> {
    let mut chars = choice.chars();
    match (chars.next(), chars.next()) {
        (Some(c @ 'a'..='z'), None) => Some(c as usize - 'a' as usize),
        _ => None,
    }
}

fn print_help(mode: SessionMode) {
    println!("Type a letter to answer, n for next, p for previous, q to quit.");
    if mode.allows_skip() {
        println!("Type s to skip; skipped questions come back for review at the end.");
    }
}

fn render_question(c: &SessionController) -> Result<(), SessionError> {
    let q = c.current_question()?;
    let index = c.current_index();
    println!();
    println!(
        "Question {}/{} [{}]",
        index + 1,
        c.question_count(),
        q.difficulty()
    );
    println!("{}", q.prompt());
    for (letter, option) in (b'a'..).zip(q.options()) {
        println!("  {}) {option}", char::from(letter));
    }
    match c.answer_state(index) {
        Some(AnswerState::Submitted { choice, correct }) => {
            let verdict = if *correct { "correct" } else { "incorrect" };
            println!("  answered {choice} ({verdict})");
        }
        Some(AnswerState::Skipped) => println!("  skipped"),
        _ => {}
    }
    Ok(())
}

fn announce(advance: Advance) {
    if advance == Advance::Review {
        println!();
        println!("You reached the end with questions still open.");
    }
}

fn answer(c: &mut SessionController, choice: &str) -> Result<(), SessionError> {
    let option = letter_index(choice)
        .and_then(|i| c.current_question().ok()?.options().get(i).cloned())
        .ok_or_else(|| SessionError::UnknownOption(choice.to_owned()))?;
    c.select_option(&option)?;
    let submission = c.submit()?;

    if submission.correct {
        println!("  Correct!");
    } else {
        println!("  Not quite. The answer is {}.", submission.correct_answer);
    }
    println!("  {}", submission.solution);
    if let Some(advance) = submission.advance {
        announce(advance);
    }
    Ok(())
}

fn question_screen(
    c: &mut SessionController,
    input: &mut impl BufRead,
) -> Result<Flow, Box<dyn Error>> {
    render_question(c)?;
    let Some(command) = read_command(input)? else {
        return Ok(Flow::Quit);
    };
    let outcome = match command.as_str() {
        "q" => return Ok(Flow::Quit),
        "" => Ok(()),
        "n" => c.next().map(announce),
        "p" => c.previous().map(|_| ()),
        "s" => c.skip().map(announce),
        "?" | "h" => {
            print_help(c.skill().mode);
            Ok(())
        }
        choice => answer(c, choice),
    };
    if let Err(err) = outcome {
        println!("  ! {err}");
    }
    Ok(Flow::Continue)
}

fn review_screen(
    c: &mut SessionController,
    input: &mut impl BufRead,
) -> Result<Flow, Box<dyn Error>> {
    let open: Vec<String> = c
        .review_queue()
        .iter()
        .map(|i| (i + 1).to_string())
        .collect();
    println!();
    if open.is_empty() {
        println!("Review: every question is answered.");
    } else {
        println!("Review: open questions {}", open.join(", "));
    }
    println!("Type a question number to revisit it, b to go back, f to finish.");

    let Some(command) = read_command(input)? else {
        return Ok(Flow::Quit);
    };
    let outcome = match command.as_str() {
        "q" => return Ok(Flow::Quit),
        "f" => c.submit_anyway().map(|_| ()),
        "b" => c.go_back().map(|_| ()),
        raw => match raw.parse::<usize>() {
            Ok(n) if n >= 1 => c.open_review(n - 1).map(|_| ()),
            _ => {
                println!("  ! not a question number: {raw}");
                Ok(())
            }
        },
    };
    if let Err(err) = outcome {
        println!("  ! {err}");
    }
    Ok(Flow::Continue)
}

fn print_report(report: &Report) {
    println!();
    println!(
        "{}: {}/{} correct, score {:.0}%, {}s",
        report.title(),
        report.correct_answers(),
        report.total_questions(),
        report.score(),
        report.time_taken_seconds()
    );
}

fn drive(c: &mut SessionController, input: &mut impl BufRead) -> Result<(), Box<dyn Error>> {
    c.start()?;
    println!("{} ({} questions)", c.skill().name, c.question_count());
    print_help(c.skill().mode);

    while !c.phase().is_over() {
        let flow = if c.phase() == SessionPhase::ReviewPending {
            review_screen(c, input)?
        } else {
            question_screen(c, input)?
        };
        if let Flow::Quit = flow {
            if !c.phase().is_over() {
                c.finalize()?;
            }
            break;
        }
    }

    if let Some(report) = c.report() {
        print_report(report);
    }
    Ok(())
}

fn choose_skill(input: &mut impl BufRead) -> Result<&'static Skill, Box<dyn Error>> {
    print_skills();
    loop {
        println!("Pick a skill id:");
        let Some(raw) = read_command(input)? else {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no skill chosen").into());
        };
        match raw.parse::<SkillId>().ok().and_then(catalog::find) {
            Some(skill) => return Ok(skill),
            None => println!("  ! unknown skill: {raw}"),
        }
    }
}

fn print_skills() {
    for skill in catalog::skills() {
        println!("  {:>5}  {} ({})", skill.id.value(), skill.name, skill.mode);
    }
}

fn find_skill(id: SkillId) -> Result<&'static Skill, ArgsError> {
    catalog::find(id).ok_or(ArgsError::UnknownSkill(id))
}

async fn run() -> Result<(), Box<dyn Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Practice,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Practice,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            io::Error::new(io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter, PracticeConfig::from_env()?, Identity::from_env()?)
        .map_err(|e| {
            eprintln!("{e}");
            print_usage();
            e
        })?;

    if cmd == Command::Skills {
        print_skills();
        return Ok(());
    }

    // sqlx will not create a missing database file.
    if parsed.config.api_url.is_none() {
        if let Some(db_url) = &parsed.config.db_url {
            prepare_sqlite_file(db_url)?;
        }
    }
    let services =
        PracticeServices::connect(parsed.config, parsed.identity, Clock::system()).await?;

    match cmd {
        Command::History => {
            let skill_id = parsed.skill.ok_or(ArgsError::MissingValue { flag: "--skill" })?;
            let skill = find_skill(skill_id)?;
            let rows = services.recent_reports(skill.id, 10).await?;
            if rows.is_empty() {
                println!("No local reports for {}.", skill.name);
            }
            for row in rows {
                println!(
                    "  {}  {}/{}  {:.0}%  {}s",
                    row.timestamp.format("%Y-%m-%d %H:%M"),
                    row.correct_answers,
                    row.total_questions,
                    row.score,
                    row.time_taken_seconds
                );
            }
            Ok(())
        }
        Command::Practice => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let skill = match parsed.skill {
                Some(id) => find_skill(id)?,
                None => choose_skill(&mut input)?,
            };
            if services.identity().user_id().is_none() {
                println!("(no --user given: this run will not be recorded)");
            }

            let mut controller = services.controller(skill);
            drive(&mut controller, &mut input)?;
            drop(input);

            info!(run_id = %controller.run_id(), "waiting for pending deliveries");
            controller.settle().await;
            Ok(())
        }
        Command::Skills => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
