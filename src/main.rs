use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use studyplan::config::{self, CONFIG_FILE, DATABASE_FILE, DEFAULT_CONFIG};
use studyplan::{DailyReport, PlanRecord, Planner, Session, Store, Topic};

/// studyplan - adaptive study planner
/// Builds daily study schedules that adapt to how a learner is actually doing
#[derive(Parser)]
#[command(name = "studyplan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Adaptive study planner", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Data directory (defaults to ./.studyplan or ~/.studyplan)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and default configuration
    Init,

    /// Generate a study plan for a learner
    Plan {
        /// Learner id
        #[arg(long)]
        learner: String,
        /// JSON file with a list of topics
        #[arg(long)]
        topics: PathBuf,
        /// Nominal study hours per day (config default if omitted)
        #[arg(long)]
        hours: Option<f64>,
        /// Days until the deadline (config default if omitted)
        #[arg(long)]
        days: Option<u32>,
        /// Planning date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Print the stored plan record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply a daily study report to a learner's state
    Report {
        #[arg(long)]
        learner: String,
        /// JSON file with the day's study sessions, micro-tests and hours
        #[arg(long)]
        report: PathBuf,
        /// Date the report covers, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// List topics due for revision
    Revisions {
        #[arg(long)]
        learner: String,
        /// Maximum topics to list (config default if omitted)
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Show a learner's pacing and per-topic estimates
    Status {
        #[arg(long)]
        learner: String,
    },

    /// Show the latest stored plan for a learner
    Show {
        #[arg(long)]
        learner: String,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // stdout carries command output only
        .init();

    let data_dir = config::get_data_dir(cli.data_dir)?;
    let config = config::load_config(&data_dir.join(CONFIG_FILE))?;

    match cli.command {
        Commands::Init => {
            init(&data_dir)?;
        }
        Commands::Plan {
            learner,
            topics,
            hours,
            days,
            today,
            json,
        } => {
            let topics = read_topics(&topics)?;
            let hours = hours.unwrap_or(config.planning.hours_per_day);
            let days = days.unwrap_or(config.planning.deadline_days);
            let planner = open_planner(&data_dir)?;

            let record = planner
                .generate(&learner, &topics, hours, days, today.unwrap_or_else(local_today))
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print_plan(&record);
            }
        }
        Commands::Report {
            learner,
            report,
            today,
        } => {
            let content = std::fs::read_to_string(&report)
                .with_context(|| format!("reading report {}", report.display()))?;
            let report: DailyReport = serde_json::from_str(&content)
                .with_context(|| format!("parsing report {}", report.display()))?;
            let today = today.unwrap_or_else(local_today);

            let planner = open_planner(&data_dir)?;
            let state = planner.record_day(&learner, &report, today).await?;

            println!("✅ Recorded {} for {}", today, learner);
            println!("   Learning speed: {:.2}", state.learning_speed);
            println!("   Consistency: {:.2}", state.consistency);
            println!("   Topics tracked: {}", state.topic_states.len());
        }
        Commands::Revisions {
            learner,
            limit,
            today,
        } => {
            let limit = limit.unwrap_or(config.revision.daily_limit);
            let planner = open_planner(&data_dir)?;
            let queue = planner
                .revisions(&learner, today.unwrap_or_else(local_today), limit)
                .await?;

            if queue.is_empty() {
                println!("No topics due for revision");
            } else {
                println!("Due for revision:");
                for candidate in queue {
                    println!(
                        "  {:<30} retention {:.3}  familiarity {:.2}  attempts {}",
                        candidate.topic,
                        candidate.retention,
                        candidate.familiarity,
                        candidate.attempts
                    );
                }
            }
        }
        Commands::Status { learner } => {
            let planner = open_planner(&data_dir)?;
            show_status(&planner, &learner).await?;
        }
        Commands::Show { learner, json } => {
            let planner = open_planner(&data_dir)?;
            match planner.latest_plan(&learner).await? {
                Some(record) if json => println!("{}", serde_json::to_string_pretty(&record)?),
                Some(record) => print_plan(&record),
                None => println!("No plan stored for {}", learner),
            }
        }
    }

    Ok(())
}

fn init(data_dir: &Path) -> Result<()> {
    info!("Initializing studyplan");
    std::fs::create_dir_all(data_dir)?;
    Store::open(&data_dir.join(DATABASE_FILE))?;

    let config_path = data_dir.join(CONFIG_FILE);
    if !config_path.exists() {
        std::fs::write(&config_path, DEFAULT_CONFIG)?;
        info!("Created default configuration at {:?}", config_path);
    }

    println!("✅ Initialized at {}", data_dir.display());
    Ok(())
}

fn open_planner(data_dir: &Path) -> Result<Planner> {
    std::fs::create_dir_all(data_dir)?;
    let store = Store::open(&data_dir.join(DATABASE_FILE))?;
    Ok(Planner::new(store))
}

fn read_topics(path: &Path) -> Result<Vec<Topic>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading topics {}", path.display()))?;
    let topics: Vec<Topic> = serde_json::from_str(&content)
        .with_context(|| format!("parsing topics {}", path.display()))?;
    Ok(topics)
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn print_plan(record: &PlanRecord) {
    let plan = &record.plan;
    println!(
        "Plan {} for {} ({} days, {:.2}h/day nominal, {:.2}h/day effective)",
        record.id,
        record.learner_id,
        record.deadline_days,
        record.hours_per_day,
        plan.effective_daily_hours
    );
    println!("Generated: {}", record.generated_at.format("%Y-%m-%d %H:%M UTC"));
    println!("Foundation phase: days 1-{} (no Hard topics)", plan.early_phase_days);

    for (day, sessions) in &plan.days {
        println!();
        println!("Day {}", day);
        for session in sessions {
            let kind = session.kind();
            match session {
                Session::Study {
                    topic,
                    hours,
                    complexity,
                } => println!("  {:<11} {:<30} {:>5.2}h  {}", kind, topic, hours, complexity),
                Session::Revision { topic, hours } => println!(
                    "  {:<11} {:<30} {:>5.2}h",
                    kind,
                    topic.as_deref().unwrap_or("-"),
                    hours
                ),
                Session::MicroTest { questions } => {
                    println!("  {:<11} {} questions", kind, questions)
                }
            }
        }
    }

    if !plan.is_complete() {
        println!();
        println!(
            "⚠️  Plan insufficient for workload: {:.2}h left unscheduled",
            plan.unfinished_hours()
        );
        for (topic, hours) in &plan.unfinished {
            println!("   {:<30} {:.2}h", topic, hours);
        }
    }
}

async fn show_status(planner: &Planner, learner: &str) -> Result<()> {
    println!("Learner: {}", learner);
    println!("==========");

    let Some(state) = planner.learner(learner).await? else {
        println!("No state stored. Generate a plan or record a report first.");
        return Ok(());
    };

    println!("Learning speed: {:.2}", state.learning_speed);
    println!("Consistency: {:.2}", state.consistency);
    println!("Days recorded: {}", state.history.len());
    println!();
    println!(
        "  {:<30} {:>6} {:>6} {:>6} {:>5}  {:<10} {}",
        "topic", "famil", "conf", "ret", "tries", "last", "due"
    );
    for (name, topic) in &state.topic_states {
        let last = topic
            .last_studied
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<30} {:>6.2} {:>6.2} {:>6.3} {:>5}  {:<10} {}",
            name,
            topic.familiarity,
            topic.confidence,
            topic.retention,
            topic.attempts,
            last,
            if topic.revision_due { "yes" } else { "" }
        );
    }

    if let Some(record) = planner.latest_plan(learner).await? {
        println!();
        println!(
            "Latest plan: #{} ({} days, generated {})",
            record.id,
            record.deadline_days,
            record.generated_at.format("%Y-%m-%d")
        );
        println!("Plans stored: {}", planner.plan_count(learner).await?);
    }

    Ok(())
}
