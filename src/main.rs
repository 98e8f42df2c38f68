use chrono::Local;
use clap::{Parser, Subcommand};
use hrbotics::analysis::{FeedbackKind, InterviewAnalysis};
use hrbotics::app::{App, PracticeSummary};
use hrbotics::config::{Settings, DEFAULT_REPORT_DIR};
use hrbotics::db::DEFAULT_DB_PATH;
use hrbotics::report::{self, ExportError, ReportFormat};
use hrbotics::resume::{self, DocumentSubmission, ResumeAnalysis};
use hrbotics::upload::{UploadKind, ValidationError};
use hrbotics::{mode, Authenticator, FileBackend, InterviewMode, InterviewSession, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "hrbotics")]
#[command(author, version, about = "Practice interviews and get feedback on how you come across")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// SQLite database holding results, practice stats and accounts
    #[arg(long, env = "HRBOTICS_DB", default_value = DEFAULT_DB_PATH, global = true)]
    db: PathBuf,

    /// Directory for exported reports
    #[arg(long, env = "HRBOTICS_REPORT_DIR", default_value = DEFAULT_REPORT_DIR, global = true)]
    report_dir: PathBuf,

    /// How long the mocked analysis takes, in milliseconds
    #[arg(long, env = "HRBOTICS_ANALYSIS_DELAY_MS", default_value_t = 3000, global = true)]
    analysis_delay_ms: u64,

    /// Sessions per week to aim for
    #[arg(long, global = true)]
    weekly_goal: Option<u32>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show warnings and results
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse a recorded interview video
    Analyze {
        /// Video file (webm, mp4, mov, mkv, avi, m4v)
        video: Option<PathBuf>,

        /// Interview mode: general, technical, hr, leadership
        #[arg(short, long, default_value = "general")]
        mode: String,

        /// Replay emotion samples from a JSON file instead of the mocked backend
        #[arg(long)]
        samples: Option<PathBuf>,

        /// Pick the video with a file dialog
        #[arg(long)]
        gui: bool,

        /// Also export a report (svg, html, json)
        #[arg(short, long)]
        report: Option<String>,
    },

    /// Show the results of the last interview
    Results {
        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the last interview's report
    Report {
        /// Report format: svg, html, json
        #[arg(short, long, default_value = "svg")]
        format: String,

        /// Write to this file instead (format from its extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Don't prompt to open the report
        #[arg(long)]
        no_open: bool,
    },

    /// List interview modes, or draw a question for one
    Modes {
        /// Print a random question for this mode
        #[arg(long)]
        question: Option<String>,
    },

    /// Show practice streak and weekly progress
    Practice {
        /// Change the weekly goal
        #[arg(long)]
        goal: Option<u32>,

        #[arg(long)]
        json: bool,
    },

    /// Analyse a resume (pdf, doc, docx)
    Resume {
        file: Option<PathBuf>,

        /// Pick the file with a file dialog
        #[arg(long)]
        gui: bool,

        /// Also export a report (svg, html, json)
        #[arg(short, long)]
        report: Option<String>,
    },

    /// Send a document to an email address
    SubmitDocument {
        /// Document file (pdf, doc, docx, txt, rtf)
        file: Option<PathBuf>,

        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Local account management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Stored state maintenance
    State {
        #[command(subcommand)]
        action: StateAction,
    },

    /// Start the local web UI
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,

        /// Don't open a browser
        #[arg(long)]
        no_open: bool,
    },
}

#[derive(Subcommand, Debug)]
enum AuthAction {
    /// Create an account and sign in
    SignUp {
        email: String,

        #[arg(long, env = "HRBOTICS_PASSWORD", hide_env_values = true)]
        password: String,

        /// Display name (default: part of the email before @)
        #[arg(long)]
        name: Option<String>,
    },

    SignIn {
        email: String,

        #[arg(long, env = "HRBOTICS_PASSWORD", hide_env_values = true)]
        password: String,
    },

    SignOut,

    /// Show the signed-in user
    Whoami,
}

#[derive(Subcommand, Debug)]
enum StateAction {
    /// Import a JSON dump of the browser build's stored keys
    ImportLegacy { file: PathBuf },

    /// Create a backup of the database
    Backup {
        /// Output path for backup (default: hrbotics_backup_<timestamp>.db)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Forget results and practice stats (accounts are kept)
    Reset {
        /// Don't ask for confirmation
        #[arg(long)]
        yes: bool,
    },
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let settings = Settings {
        db_path: args.db.clone(),
        report_dir: args.report_dir.clone(),
        analysis_delay: Duration::from_millis(args.analysis_delay_ms),
        weekly_goal: args.weekly_goal,
    };

    if let Err(e) = run(args.command, settings, args.quiet) {
        eprintln!("\x1b[31mError:\x1b[0m {}", e);
        std::process::exit(if e.is_user_error() { 2 } else { 1 });
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(command: Command, settings: Settings, quiet: bool) -> Result<()> {
    match command {
        Command::Analyze { video, mode, samples, gui, report } => {
            let mode: InterviewMode = mode.parse()?;
            let format = report.as_deref().map(str::parse::<ReportFormat>).transpose()?;
            let video = match video {
                Some(v) if !gui => v,
                _ => pick_file("Select interview video", "Video", UploadKind::Video.extensions())
                    .ok_or(ValidationError::NoVideo)?,
            };

            let mut app = App::open(settings)?;
            if let Some(path) = samples {
                app = app.with_backend(Arc::new(FileBackend::new(path)));
            }
            analyze(&app, &video, mode, quiet)?;

            if let Some(format) = format {
                let path = app.export_report(format)?;
                eprintln!("\n\x1b[32mReport saved: {}\x1b[0m", path.display());
            }
            Ok(())
        }

        Command::Results { json } => {
            let app = App::open(settings)?;
            match app.last_results()? {
                Some(analysis) if json => println!("{}", serde_json::to_string_pretty(&analysis)?),
                Some(analysis) => print_analysis(&analysis),
                None => eprintln!("No interview results yet. Run `hrbotics analyze <VIDEO>` first."),
            }
            Ok(())
        }

        Command::Report { format, output, no_open } => {
            let app = App::open(settings)?;
            let path = match output {
                Some(path) => {
                    let surface = app.report_surface()?.ok_or(ExportError::SurfaceNotFound)?;
                    report::generate(&path, &surface)?;
                    path
                }
                None => app.export_report(format.parse()?)?,
            };
            eprintln!("\x1b[32mReport saved: {}\x1b[0m", path.display());
            if !no_open && !quiet {
                prompt_open(&path);
            }
            Ok(())
        }

        Command::Modes { question } => {
            match question {
                Some(id) => {
                    let mode: InterviewMode = id.parse()?;
                    println!("\x1b[1m{}\x1b[0m", mode.name());
                    println!("{}", mode.random_question());
                }
                None => {
                    for info in mode::catalog() {
                        println!("\x1b[1m{:<12}\x1b[0m {} - {}", info.id, info.name, info.description);
                        for q in info.questions {
                            println!("    \x1b[90m• {}\x1b[0m", q);
                        }
                    }
                }
            }
            Ok(())
        }

        Command::Practice { goal, json } => {
            let app = App::open(settings)?;
            let summary = match goal {
                Some(goal) => app.set_weekly_goal(goal)?,
                None => app.practice()?,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_practice(&summary);
            }
            Ok(())
        }

        Command::Resume { file, gui, report } => {
            let format = report.as_deref().map(str::parse::<ReportFormat>).transpose()?;
            let file = match file {
                Some(f) if !gui => f,
                _ => pick_file("Select your resume", "Resume", UploadKind::Resume.extensions())
                    .ok_or(ValidationError::NoFile)?,
            };
            let analysis = resume::analyze_path(&file)?;
            print_resume(&analysis);

            if let Some(format) = format {
                let app = App::open(settings)?;
                let path = app.export_resume(&analysis, format)?;
                eprintln!("\n\x1b[32mReport saved: {}\x1b[0m", path.display());
            }
            Ok(())
        }

        Command::SubmitDocument { file, title, email, description } => {
            let submission = DocumentSubmission { title, description, email, file };
            let message = submission.submit()?;
            println!("\x1b[32m✓\x1b[0m {}", message);
            Ok(())
        }

        Command::Auth { action } => {
            let app = App::open(settings)?;
            let auth = app.auth();
            match action {
                AuthAction::SignUp { email, password, name } => {
                    let user = auth.sign_up(&email, &password, name.as_deref())?;
                    println!("\x1b[32m✓\x1b[0m Account created. Signed in as {} <{}>", user.name, user.email);
                }
                AuthAction::SignIn { email, password } => {
                    let user = auth.sign_in(&email, &password)?;
                    println!("\x1b[32m✓\x1b[0m Signed in as {} <{}>", user.name, user.email);
                }
                AuthAction::SignOut => {
                    auth.sign_out()?;
                    println!("Signed out.");
                }
                AuthAction::Whoami => match auth.current_user()? {
                    Some(user) => println!("{} <{}>", user.name, user.email),
                    None => println!("Not signed in."),
                },
            }
            Ok(())
        }

        Command::State { action } => {
            let app = App::open(settings)?;
            let store = app.store();
            match action {
                StateAction::ImportLegacy { file } => {
                    let report = store.import_legacy_file(&file)?;
                    for key in &report.imported {
                        println!("\x1b[32m✓\x1b[0m imported {}", key);
                    }
                    for key in &report.skipped {
                        println!("\x1b[33m-\x1b[0m skipped {}", key);
                    }
                }
                StateAction::Backup { output } => {
                    let backup_path = output.unwrap_or_else(|| {
                        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
                        PathBuf::from(format!("hrbotics_backup_{}.db", timestamp))
                    });
                    let bytes = store.backup(&backup_path)?;
                    println!("Backup created: {} ({} bytes)", backup_path.display(), bytes);
                }
                StateAction::Reset { yes } => {
                    if yes || confirm("Forget all interview results and practice stats?") {
                        store.reset()?;
                        println!("State reset.");
                    } else {
                        println!("Cancelled.");
                    }
                }
            }
            Ok(())
        }

        Command::Serve { port, no_open } => {
            let app = App::open(settings)?;
            hrbotics::serve::start(port, &app, !no_open)?;
            Ok(())
        }
    }
}

fn analyze(app: &App, video: &Path, mode: InterviewMode, quiet: bool) -> Result<()> {
    let mut session = InterviewSession::new(mode);
    session.upload(video)?;

    if !quiet {
        eprintln!("\x1b[1mHRbotics - {}\x1b[0m", mode.name());
        eprintln!("{}", "─".repeat(70));
        eprintln!("Question: {}\n", session.question());
    }

    let pending = app.start_analysis(&session)?;

    let pb = if quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} {elapsed}") {
            pb.set_style(style);
        }
        pb.set_message("Analyzing your interview...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    };

    let result = app.finish_analysis(pending);
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    print_analysis(&result?);
    Ok(())
}

fn print_analysis(a: &InterviewAnalysis) {
    let m = &a.metrics;
    println!("\x1b[1m{}\x1b[0m  ({} samples)", a.mode_name, a.sample_count);
    println!("{}", "─".repeat(70));
    println!("  Overall score:         \x1b[1m{}/100\x1b[0m", m.overall_score);
    println!("  Confidence:            {}%", m.confidence);
    println!("  Positive expressions:  {}%", m.positive_expressions);
    println!(
        "  Voice clarity:         {}%{}",
        m.voice_clarity,
        if m.voice_clarity_measured { "" } else { " \x1b[90m(estimate)\x1b[0m" }
    );

    println!("\n\x1b[1mTimeline:\x1b[0m");
    println!("  {:>6}  {:<12} {:>2}   {:<12} {:>2}", "TIME", "FACE", "", "VOICE", "");
    for p in &a.timeline {
        println!(
            "  {:>5}s  {:<12} {:>2}   {:<12} {:>2}",
            p.time,
            p.face_emotion.as_str(),
            p.face_score,
            p.voice_emotion.as_str(),
            p.voice_score
        );
    }

    println!("\n\x1b[1mEmotion distribution:\x1b[0m");
    for e in &a.distribution {
        println!("  {:<12} {:>3}  {}", e.label.as_str(), e.count, "█".repeat(e.count));
    }

    println!("\n\x1b[1mFeedback:\x1b[0m");
    for f in &a.feedback {
        let (color, mark) = match f.kind {
            FeedbackKind::Positive => ("\x1b[32m", "✓"),
            FeedbackKind::Improvement => ("\x1b[33m", "!"),
            FeedbackKind::Tip => ("\x1b[36m", "→"),
        };
        println!("  {}{}\x1b[0m {}", color, mark, f.text);
    }
}

fn print_practice(s: &PracticeSummary) {
    println!("\x1b[1mPractice\x1b[0m");
    println!("{}", "─".repeat(40));
    println!("  Streak:          {} day(s)", s.stats.streak);
    println!(
        "  Last practice:   {}",
        s.stats.last_practice.map(|d| d.to_string()).unwrap_or_else(|| "never".to_string())
    );
    println!("  Total sessions:  {}", s.stats.total_sessions);
    println!(
        "  This week:       {}/{} ({}%)",
        s.stats.weekly_progress, s.stats.weekly_goal, s.weekly_percent
    );
    println!("\n  \x1b[36m{}\x1b[0m", s.message);
}

fn print_resume(r: &ResumeAnalysis) {
    println!("\x1b[1mResume analysis:\x1b[0m {}", r.filename);
    for (heading, color, items) in [
        ("Skills", "\x1b[36m", &r.skills),
        ("Strengths", "\x1b[32m", &r.strengths),
        ("Improvements", "\x1b[33m", &r.improvements),
    ] {
        println!("\n  {}{}\x1b[0m", color, heading);
        for item in items.iter() {
            println!("    • {}", item);
        }
    }
}

fn confirm(question: &str) -> bool {
    eprint!("{} [y/N] ", question);
    io::stderr().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

fn prompt_open(path: &Path) {
    eprint!("\nOpen report? [Y/n] ");
    io::stderr().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_ok() {
        let input = input.trim().to_lowercase();
        if input.is_empty() || input == "y" || input == "yes" {
            if let Err(e) = open::that(path) {
                eprintln!("Failed to open report: {}", e);
            }
        }
    }
}

#[cfg(feature = "gui")]
fn pick_file(title: &str, filter: &str, extensions: &[&str]) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter(filter, extensions)
        .pick_file()
}

#[cfg(not(feature = "gui"))]
fn pick_file(_title: &str, _filter: &str, _extensions: &[&str]) -> Option<PathBuf> {
    log::warn!("file dialog not available in this build; pass the file path instead");
    None
}
