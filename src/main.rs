mod app;
mod domain;
mod editor;
mod error;
mod input;
mod logging;
mod persistence;
mod ui;

use anyhow::Result;
use app::AppState;
use chrono::Local;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{checkbox, format_due_date, Filter, ListView, Priority, Task, TaskIndicators};
use error::TaskflowError;
use persistence::{
    ensure_dir, get_taskflow_dir, init_local_dir, load_metadata, meta_file, migrate, FileStore,
    TaskRepository,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "taskflow")]
#[command(about = "A keyboard-driven terminal task list with notes, due dates and subtasks", long_about = None)]
struct Cli {
    /// Data directory to use instead of the resolved one
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .taskflow directory in the current directory
    Init,
    /// Add a task
    Add {
        /// Task text
        text: String,
        /// Priority: low, medium or high
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
    },
    /// List tasks
    List {
        /// Filter: all, active or completed
        #[arg(short, long, default_value = "all")]
        filter: Filter,
    },
    /// Flip a task between active and completed
    Toggle { id: String },
    /// Delete a task
    Remove { id: String },
    /// Show a task with its notes, due date and subtasks
    Show { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            // Initialize local .taskflow directory
            let dir = init_local_dir()?;
            println!("Initialized taskflow directory: {}", dir.display());
            println!();
            println!("Taskflow will now use this local directory for task storage.");
            println!("Run 'taskflow' to start.");
            Ok(())
        }
        command => {
            let dir = match cli.dir {
                Some(dir) => dir,
                None => get_taskflow_dir()?,
            };
            ensure_dir(&dir)?;
            logging::init_logging(&dir)?;
            let repo = open_repository(&dir)?;

            match command {
                Some(command) => run_command(repo, command),
                None => run_tui(repo, &dir),
            }
        }
    }
}

fn run_command(mut repo: TaskRepository, command: Commands) -> Result<()> {
    match command {
        Commands::Init => {}
        Commands::Add { text, priority } => match repo.add(&text, priority) {
            Ok(task) => println!("Added {}", task.id),
            Err(TaskflowError::EmptyInput) => eprintln!("Task text is empty, nothing added"),
            Err(e) => return Err(e.into()),
        },
        Commands::List { filter } => print_list(&repo, filter),
        Commands::Toggle { id } => match repo.toggle_completed(&id) {
            Ok(task) => {
                let state = if task.completed { "completed" } else { "active" };
                println!("{} is now {}", task.id, state);
            }
            Err(TaskflowError::NotFound(id)) => println!("Task not found: {}", id),
            Err(e) => return Err(e.into()),
        },
        Commands::Remove { id } => {
            if repo.remove(&id)? {
                println!("Removed {}", id);
            } else {
                println!("Task not found: {}", id);
            }
        }
        Commands::Show { id } => match repo.get_by_id(&id) {
            Some(task) => print_task(task),
            None => println!("Task not found: {}", id),
        },
    }
    Ok(())
}

/// Bring the stored collection up to the current shape, then load it
fn open_repository(dir: &Path) -> Result<TaskRepository> {
    let mut store = FileStore::new(dir);
    match migrate(&mut store) {
        Ok(report) if report.written => {
            tracing::info!(migrated = report.migrated, "task store migrated");
        }
        Ok(_) => {}
        // Repository load backs up an unreadable store
        Err(e @ TaskflowError::MalformedPersistedRecord(_)) => {
            tracing::warn!(error = %e, "migration skipped");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(TaskRepository::open(Box::new(store))?)
}

fn print_list(repo: &TaskRepository, filter: Filter) {
    let view = ListView::compute(repo.tasks(), filter);
    if view.is_empty_state() {
        println!("{}", view.empty_message());
    } else {
        let today = Local::now().date_naive();
        for index in view.visible_indices() {
            let task = &repo.tasks()[index];
            println!("{}", summary_line(task, &TaskIndicators::for_task(task, today)));
        }
    }
    println!();
    println!("Done: {} / Total: {}", view.completed, view.total);
}

fn summary_line(task: &Task, indicators: &TaskIndicators) -> String {
    let mut line = format!(
        "{} {:<6} {}  ({})",
        checkbox(task.completed),
        task.priority.to_tag(),
        task.text,
        task.id
    );
    if indicators.has_notes {
        line.push_str("  [notes]");
    }
    if let Some(due) = indicators.due_date {
        line.push_str(&format!("  due {}", format_due_date(due)));
        if indicators.overdue {
            line.push_str(" (overdue)");
        }
    }
    if let Some((done, total)) = indicators.subtasks {
        line.push_str(&format!("  {}/{}", done, total));
    }
    line
}

fn print_task(task: &Task) {
    println!("{} {}", checkbox(task.completed), task.text);
    println!("  id:       {}", task.id);
    println!("  priority: {}", task.priority);
    match task.due_date {
        Some(due) => println!("  due:      {}", format_due_date(due)),
        None => println!("  due:      none"),
    }
    println!("  created:  {}", task.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
    println!("  updated:  {}", task.updated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
    if task.has_notes() {
        println!("  notes:");
        for line in task.notes.lines() {
            println!("    {}", line);
        }
    }
    if !task.subtasks.is_empty() {
        let (done, total) = task.subtask_progress();
        println!("  subtasks ({}/{}):", done, total);
        for subtask in &task.subtasks {
            println!("    {} {}", checkbox(subtask.completed), subtask.text);
        }
    }
}

fn run_tui(repo: TaskRepository, dir: &Path) -> Result<()> {
    let meta_path = meta_file(dir);
    let metadata = load_metadata(&meta_path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "unreadable metadata, using defaults");
        Default::default()
    });

    let mut app = AppState::new(repo, metadata).with_meta_path(meta_path);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Print any errors
    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let tick_rate = Duration::from_millis(250);

    loop {
        // Render
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press {
                    let should_quit = input::handle_key(app, key)?;
                    if should_quit {
                        return Ok(());
                    }
                }
            }
        }
    }
}
