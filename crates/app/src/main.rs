mod terminal;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{QuizId, RevealPolicy};
use services::config::{normalize_base_url, parse_quiz_id};
use services::provider::wire::parse_quiz_detail;
use services::{
    CachingQuizProvider, HttpQuizProvider, InMemoryQuizProvider, LogErrorReporter, MediaSlot,
    Notifier, QuizCollaborators, QuizConfig, QuizController, QuizDataProvider, QuizPhase,
    QuizRequest, TokioCountdownScheduler, fetch_once,
};
use storage::repository::Storage;
use tokio::io::{AsyncBufReadExt, BufReader};

use terminal::TerminalSurface;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidQuizId { raw: String },
    InvalidBaseUrl { raw: String },
    InvalidDbUrl { raw: String },
    NoSource,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidQuizId { raw } => write!(f, "invalid --quiz-id value: {raw}"),
            ArgsError::InvalidBaseUrl { raw } => write!(f, "invalid --base-url value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::NoSource => write!(f, "either --base-url or --file is required"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- --base-url <url> --quiz-id <id> [--user <uuid>] [--token <token>] [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- --file <quiz.json> [--quiz-id <id>]");
    eprintln!();
    eprintln!("While playing:");
    eprintln!("  <number>  pick an answer");
    eprintln!("  n         next question");
    eprintln!("  p / s     play / stop answer audio (pq / sq for question audio)");
    eprintln!("  q         quit");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_API_BASE_URL, QUIZ_USER_UUID, QUIZ_API_TOKEN, QUIZ_ID, QUIZ_DB_URL,");
    eprintln!("  QUIZ_REQUEST_TIMEOUT_SECS, RUST_LOG");
}

/// Where questions come from.
enum Source {
    Remote { base_url: String },
    File(PathBuf),
}

struct Args {
    config: QuizConfig,
    source: Source,
}

impl Args {
    fn parse(
        mut config: QuizConfig,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<Self, ArgsError> {
        let mut file = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--base-url" => {
                    let value = require_value(args, "--base-url")?;
                    let url = normalize_base_url(value.clone())
                        .map_err(|_| ArgsError::InvalidBaseUrl { raw: value })?;
                    config.base_url = Some(url);
                }
                "--quiz-id" => {
                    let value = require_value(args, "--quiz-id")?;
                    let id = parse_quiz_id(&value)
                        .map_err(|_| ArgsError::InvalidQuizId { raw: value.clone() })?;
                    config.quiz_id = Some(id);
                }
                "--user" => config.user_uuid = require_value(args, "--user")?,
                "--token" => config.api_token = require_value(args, "--token")?,
                "--file" => file = Some(PathBuf::from(require_value(args, "--file")?)),
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    config.db_url = Some(normalize_sqlite_url(value));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let source = match (file, config.base_url.clone()) {
            (Some(path), _) => {
                // A local file needs no id from the caller.
                config.quiz_id.get_or_insert(QuizId::new(1));
                Source::File(path)
            }
            (None, Some(base_url)) => Source::Remote { base_url },
            (None, None) => return Err(ArgsError::NoSource),
        };
        Ok(Self { config, source })
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
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
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

async fn build_provider(args: &Args) -> Result<Arc<dyn QuizDataProvider>, Box<dyn std::error::Error>> {
    match &args.source {
        Source::File(path) => {
            let body = tokio::fs::read_to_string(path).await?;
            let quiz_id = args.config.quiz_id.unwrap_or(QuizId::new(1));
            let detail = parse_quiz_detail(quiz_id, &body)?;
            log::info!("loaded {} questions from {}", detail.questions.len(), path.display());
            Ok(Arc::new(InMemoryQuizProvider::new().with_detail(detail)))
        }
        Source::Remote { base_url } => {
            let remote: Arc<dyn QuizDataProvider> = Arc::new(HttpQuizProvider::with_timeout(
                base_url.clone(),
                args.config.request_timeout,
            )?);
            let Some(db_url) = args.config.db_url.as_deref() else {
                return Ok(remote);
            };
            // Open + migrate the quiz cache in the binary glue so services stay storage-agnostic.
            prepare_sqlite_file(db_url)?;
            let storage = Storage::sqlite(db_url).await?;
            Ok(Arc::new(CachingQuizProvider::new(
                Clock::system(),
                remote,
                storage.quiz_details,
            )))
        }
    }
}

enum Command {
    Pick(usize),
    Next,
    Play(MediaSlot),
    Stop(MediaSlot),
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "n" | "next" => Some(Self::Next),
            "p" => Some(Self::Play(MediaSlot::AnswerAudio)),
            "s" => Some(Self::Stop(MediaSlot::AnswerAudio)),
            "pq" => Some(Self::Play(MediaSlot::QuestionAudio)),
            "sq" => Some(Self::Stop(MediaSlot::QuestionAudio)),
            "q" | "quit" => Some(Self::Quit),
            other => other.parse::<usize>().ok().filter(|n| *n > 0).map(Self::Pick),
        }
    }
}

fn apply(controller: &mut QuizController, surface: &TerminalSurface, command: Command) -> bool {
    match command {
        Command::Pick(_) if !surface.answers_enabled() => eprintln!("answers are locked"),
        Command::Next if !surface.next_enabled() => eprintln!("answer the question first"),
        Command::Pick(number) => {
            let answer = controller
                .current_question()
                .and_then(|q| q.answers().get(number - 1))
                .map(|a| a.id());
            match answer {
                Some(id) => {
                    controller.on_answer_selected(id);
                }
                None => eprintln!("no answer {number}"),
            }
        }
        Command::Next => {
            controller.advance();
        }
        Command::Play(slot) => {
            controller.play_audio(slot);
        }
        Command::Stop(slot) => {
            controller.pause_audio(slot);
        }
        Command::Quit => return false,
    }
    true
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = QuizConfig::from_env()?;
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(config, &mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let request = args.config.request()?;
    let provider = build_provider(&args).await?;
    let fetch = fetch_once(Arc::clone(&provider), request.clone());

    let surface = Arc::new(TerminalSurface::new());
    let (scheduler, mut timer_events) = TokioCountdownScheduler::channel();
    let collaborators = QuizCollaborators::new(surface.clone(), surface.clone(), Arc::new(scheduler))
        .with_errors(Arc::new(LogErrorReporter))
        .with_notifier(surface.clone());
    let mut controller = QuizController::new(collaborators);

    controller.on_quiz_loaded(fetch.recv().await);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match controller.phase() {
            QuizPhase::Complete | QuizPhase::Disposed => break,
            // Nothing to show: let the controller report completion.
            QuizPhase::Idle => {
                controller.advance();
                continue;
            }
            QuizPhase::Displaying | QuizPhase::Revealing => {}
        }

        tokio::select! {
            Some(event) = timer_events.recv() => {
                controller.on_timer(event);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Command::parse(&line) {
                    Some(command) => {
                        if !apply(&mut controller, &surface, command) {
                            break;
                        }
                    }
                    None => eprintln!("unrecognised input: {}", line.trim()),
                }
            }
        }
    }

    if controller.phase() == QuizPhase::Complete && !controller.records().is_empty() {
        submit(provider.as_ref(), &request, &controller, &surface).await;
    }
    controller.on_dispose();
    Ok(())
}

/// Send the answer sheet; a deferred quiz then shows every correct answer at once.
async fn submit(
    provider: &dyn QuizDataProvider,
    request: &QuizRequest,
    controller: &QuizController,
    surface: &TerminalSurface,
) {
    if let Err(err) = provider.submit_result(request, controller.records()).await {
        log::warn!("could not submit quiz {}: {err}", request.quiz_id());
        surface.notify(&err.user_message());
        return;
    }
    if controller.policy() != RevealPolicy::Deferred {
        return;
    }
    match provider.fetch_result(request).await {
        Ok(result) => surface.show_result(&result),
        Err(err) => {
            log::warn!("could not fetch result of quiz {}: {err}", request.quiz_id());
            surface.notify(&err.user_message());
        }
    }
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
