use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracker_cli::cli::{Cli, Command, collect_config_overrides};
use tracker_core::catalog::Catalog;
use tracker_core::clock::format_millis;
use tracker_core::config::{Config, load_config};
use tracker_core::error::AppError;
use tracker_core::identity::identifier_of;
use tracker_core::model::{ConsolidatedTask, Event, EventShape, Notice};
use tracker_core::notify::notifier_from_env;
use tracker_core::placeholder::{display_description, display_name};
use tracker_core::reset::{RESET_WINDOW_MS, ResetOutcome, ResetScheduler};
use tracker_core::storage::json_store::JsonFileStorage;
use tracker_core::tracker::{Tracker, resolve_catalog};

type FileTracker = Tracker<JsonFileStorage>;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "Done")]
    done: &'static str,
    #[tabled(rename = "Type")]
    task_type: String,
    #[tabled(rename = "Task")]
    name: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Priority")]
    priority: &'static str,
    #[tabled(rename = "Sources")]
    sources: String,
}

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Selected")]
    selected: &'static str,
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Day")]
    day: String,
}

fn source_summary(task: &ConsolidatedTask) -> String {
    task.source_events
        .iter()
        .map(|source| {
            if source.original_count > 0 {
                format!("{} ({})", source.event_name, source.original_count)
            } else {
                source.event_name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn progress_label(task: &ConsolidatedTask, current: u64) -> String {
    if task.template.is_toggle() {
        "-".to_string()
    } else {
        format!("{}/{}", current, task.required_count())
    }
}

fn print_tasks_plain(tracker: &FileTracker) {
    let tasks = tracker.current_tasks();
    if tasks.is_empty() {
        println!("No tasks for today.");
        return;
    }

    let satisfied = tracker.satisfied_types();
    let rows: Vec<TaskRow> = tasks
        .iter()
        .map(|task| TaskRow {
            done: if satisfied.contains(task.task_type()) {
                "x"
            } else {
                ""
            },
            task_type: task.task_type().to_string(),
            name: display_name(&task.template),
            progress: progress_label(task, tracker.task_count(task.task_type())),
            priority: task.template.priority.label(),
            sources: source_summary(task),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{table}");
}

fn print_tasks_json(tracker: &FileTracker) {
    let satisfied = tracker.satisfied_types();
    let payload: Vec<serde_json::Value> = tracker
        .current_tasks()
        .iter()
        .map(|task| {
            serde_json::json!({
                "id": identifier_of(&task.template),
                "type": task.task_type(),
                "name": display_name(&task.template),
                "description": display_description(&task.template),
                "category": task.template.category,
                "priority": task.template.priority,
                "count": task.template.count,
                "current": tracker.task_count(task.task_type()),
                "completed": satisfied.contains(task.task_type()),
                "sourceEvents": task.source_events,
            })
        })
        .collect();
    println!("{}", serde_json::Value::Array(payload));
}

fn event_kind(event: &Event) -> String {
    match &event.shape {
        EventShape::Flat { .. } => "flat".to_string(),
        EventShape::Durational { duration, .. } => format!("{duration}-day"),
        EventShape::MultiDay { sub_events, .. } => format!("{} days", sub_events.len()),
    }
}

fn print_events_plain(catalog: &Catalog, tracker: &FileTracker) {
    let state = tracker.state();
    let rows: Vec<EventRow> = catalog
        .events
        .iter()
        .map(|event| EventRow {
            selected: if state.is_event_selected(&event.id) {
                "x"
            } else {
                ""
            },
            id: event.id.clone(),
            name: event.name.clone(),
            kind: event_kind(event),
            day: state
                .selected_sub_event(&event.id)
                .unwrap_or("-")
                .to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{table}");
}

fn print_events_json(catalog: &Catalog, tracker: &FileTracker) {
    let state = tracker.state();
    let payload: Vec<serde_json::Value> = catalog
        .events
        .iter()
        .map(|event| {
            serde_json::json!({
                "id": event.id,
                "name": event.name,
                "kind": event_kind(event),
                "selected": state.is_event_selected(&event.id),
                "selectedDay": state.selected_sub_event(&event.id),
                "days": event
                    .sub_events()
                    .iter()
                    .map(|sub_event| sub_event.id.as_str())
                    .collect::<Vec<_>>(),
            })
        })
        .collect();
    println!("{}", serde_json::Value::Array(payload));
}

fn print_notices_plain(notices: &[Notice]) {
    if notices.is_empty() {
        println!("No notices.");
        return;
    }
    for notice in notices {
        println!("[{}] {}", notice.notice_type, notice.message);
    }
}

fn print_reset(outcome: Option<&ResetOutcome>, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({ "reset": outcome.is_some(), "outcome": outcome })
        );
        return;
    }

    match outcome {
        Some(outcome) => println!("{}", tracker_core::notify::reset_message(outcome)),
        None => println!("No reset due."),
    }
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(current.clone());
                current.clear();
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn resolve_config(raw_overrides: &[String]) -> Result<Config, AppError> {
    let overrides = collect_config_overrides(raw_overrides).map_err(AppError::invalid_input)?;
    let loaded = load_config();
    if let Some(problem) = loaded.problem {
        log::warn!("using default configuration: {problem}");
    }
    Ok(loaded.config.with_overrides(&overrides))
}

/// Opens the store and applies any reset that came due while the tracker was
/// not running.
fn open_tracker(catalog: Catalog) -> Result<FileTracker, AppError> {
    let mut tracker = Tracker::open(catalog)?;
    tracker.check_for_reset()?;
    Ok(tracker)
}

fn watch(catalog: &Catalog, config: &Config, once: bool, json: bool) -> Result<(), AppError> {
    let notifier = notifier_from_env()?;
    let mut scheduler = ResetScheduler::new(config.check_interval());
    log::info!("checking for the daily reset every {:?}", scheduler.interval());

    loop {
        // Reopened each tick so edits from other invocations are not overwritten.
        let mut tracker = Tracker::open(catalog.clone())?;
        let outcome = tracker.poll_reset(&mut scheduler)?;
        if let Some(outcome) = outcome.as_ref() {
            if let Err(err) = notifier.notify_reset(outcome) {
                log::warn!("reset notification failed: {err}");
            }
            print_reset(Some(outcome), json);
        } else if once {
            print_reset(None, json);
        }

        if once {
            return Ok(());
        }
        std::thread::sleep(scheduler.interval());
    }
}

fn run_command(cli: Cli) -> Result<(), AppError> {
    let config = resolve_config(&cli.config_override)?;
    let catalog = resolve_catalog(&config)?;

    match cli.command {
        Command::Tasks => {
            let tracker = open_tracker(catalog)?;
            if cli.json {
                print_tasks_json(&tracker);
            } else {
                print_tasks_plain(&tracker);
            }
        }
        Command::Progress => {
            let tracker = open_tracker(catalog)?;
            let progress = tracker.progress();
            let next_reset =
                format_millis(tracker.state().last_reset.saturating_add(RESET_WINDOW_MS));
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "completed": progress.completed,
                        "total": progress.total,
                        "percentage": progress.percentage,
                        "nextReset": next_reset,
                    })
                );
            } else {
                println!(
                    "Progress: {}/{} tasks ({:.0}%)",
                    progress.completed,
                    progress.total,
                    progress.percentage
                );
                if let Some(next_reset) = next_reset {
                    println!("Next reset: {next_reset}");
                }
            }
        }
        Command::Notices => {
            let tracker = open_tracker(catalog)?;
            let notices = tracker.notices();
            if cli.json {
                println!("{}", serde_json::json!(notices));
            } else {
                print_notices_plain(&notices);
            }
        }
        Command::Events => {
            let tracker = open_tracker(catalog.clone())?;
            if cli.json {
                print_events_json(&catalog, &tracker);
            } else {
                print_events_plain(&catalog, &tracker);
            }
        }
        Command::Toggle { id, event } => {
            let mut tracker = open_tracker(catalog)?;
            let completed = tracker.toggle_task(&id, event.as_deref())?;
            let id = id.trim();
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({ "type": id, "eventId": event, "completed": completed })
                );
            } else if completed {
                println!("Completed task: {id}");
            } else {
                println!("Reopened task: {id}");
            }
        }
        Command::Count { id, count } => {
            let mut tracker = open_tracker(catalog)?;
            let stored = tracker.update_task_count(&id, count)?;
            let task = tracker.find_task(&id)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "type": task.task_type(),
                        "current": stored,
                        "required": task.required_count(),
                    })
                );
            } else {
                println!(
                    "Updated count: {} {}/{}",
                    task.task_type(),
                    stored,
                    task.required_count()
                );
            }
        }
        Command::Milestones { id } => {
            let tracker = open_tracker(catalog)?;
            let milestones = tracker.milestones(&id)?;
            if cli.json {
                println!("{}", serde_json::json!(milestones));
            } else {
                for milestone in &milestones {
                    let marker = if milestone.reached { "x" } else { " " };
                    println!(
                        "[{marker}] {} {}/{}",
                        milestone.event_name, milestone.achieved, milestone.required
                    );
                }
            }
        }
        Command::Event { id } => {
            let mut tracker = open_tracker(catalog)?;
            let selected = tracker.toggle_event(&id)?;
            let id = id.trim();
            if cli.json {
                println!("{}", serde_json::json!({ "id": id, "selected": selected }));
            } else if selected {
                println!("Selected event: {id}");
            } else {
                println!("Deselected event: {id}");
            }
        }
        Command::Day {
            event_id,
            sub_event_id,
        } => {
            let mut tracker = open_tracker(catalog)?;
            tracker.select_sub_event(&event_id, &sub_event_id)?;
            let (event_id, sub_event_id) = (event_id.trim(), sub_event_id.trim());
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({ "eventId": event_id, "subEventId": sub_event_id })
                );
            } else {
                println!("Selected day: {sub_event_id} ({event_id})");
            }
        }
        Command::Reset => {
            let mut tracker = Tracker::open(catalog)?;
            let outcome = tracker.check_for_reset()?;
            print_reset(outcome.as_ref(), cli.json);
        }
        Command::Watch { once } => {
            watch(&catalog, &config, once, cli.json)?;
        }
    }

    Ok(())
}

fn run_interactive() -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("tracker".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(cli) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive() {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) {
                err.exit();
            }
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
