//! Headless driver: opens a folder (and optionally files) against the local
//! filesystem, then prints the resulting tree and tabs.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use quill::app::Session;
use quill::kernel::services::adapters::{
    ensure_settings_file, load_settings, LocalStorage, NoPicker, PlainRenderer,
};
use quill::kernel::services::ports::{
    ConfirmPrompt, FileProperties, Notification, Settings, TabView, ViewPort,
};
use quill::kernel::Action;
use quill::models::FileTreeRow;

mod logging;

const IDLE_TICKS: u32 = 20;
const TICK_INTERVAL: Duration = Duration::from_millis(10);
const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

struct ConsoleView;

impl ViewPort for ConsoleView {
    fn render_tabs(&mut self, _tabs: &[TabView]) {}

    fn render_tree(&mut self, _root: Option<&Path>, _rows: &[FileTreeRow]) {}

    fn set_active_label(&mut self, label: &str) {
        tracing::debug!(label, "active document");
    }

    fn set_preview(&mut self, _html: &str) {}

    fn confirm(&mut self, prompt: &ConfirmPrompt) {
        eprintln!("confirm: {}", prompt.message);
    }

    fn notify(&mut self, notification: &Notification) {
        let status = if notification.is_error() { "error" } else { "ok" };
        eprintln!("[{status}] {}", notification.text());
    }

    fn show_properties(&mut self, properties: &FileProperties) {
        println!(
            "{} ({} bytes, dir: {})",
            properties.path.display(),
            properties.size,
            properties.is_directory
        );
    }

    fn download(&mut self, file_name: &str, content: &str) {
        println!("--- {file_name} ---\n{content}");
    }
}

fn main() -> io::Result<()> {
    let logging = logging::init();

    if let Err(e) = ensure_settings_file() {
        tracing::warn!(error = %e, "settings file unavailable, using defaults");
    }
    let settings = load_settings().unwrap_or_else(Settings::default);

    let mut args = std::env::args().skip(1);
    let folder = args.next().map(absolute);
    let files: Vec<PathBuf> = args.map(absolute).collect();

    let mut session = Session::new(Box::new(ConsoleView), Box::new(PlainRenderer), settings);
    let storage = LocalStorage::spawn(session.bus_sender(), NoPicker)?;
    session.attach_storage(Box::new(storage));

    session.dispatch(Action::NewDocument);
    if let Some(folder) = folder {
        session.dispatch(Action::OpenFolder(folder));
    }
    settle(&mut session);
    for file in files {
        session.dispatch(Action::OpenPath(file));
        settle(&mut session);
    }

    print_tree(&session);
    print_tabs(&session);

    // Drain the storage queue before exit.
    drop(session.detach_storage());
    if let Some(guard) = &logging {
        tracing::info!(log_dir = %guard.log_dir().display(), "session finished");
    }
    Ok(())
}

fn absolute(arg: String) -> PathBuf {
    let path = PathBuf::from(arg);
    std::fs::canonicalize(&path).unwrap_or(path)
}

/// Ticks until replies stop arriving and no debounce is pending.
fn settle(session: &mut Session) {
    let started = Instant::now();
    let mut idle = 0u32;
    while started.elapsed() < SETTLE_TIMEOUT {
        if session.tick() {
            idle = 0;
        } else {
            idle += 1;
        }
        if idle >= IDLE_TICKS && !session.has_pending_debounce() {
            return;
        }
        std::thread::sleep(TICK_INTERVAL);
    }
    tracing::warn!("session did not settle before timeout");
}

fn print_tree(session: &Session) {
    let tree = &session.state().explorer;
    let Some(root) = tree.root_path() else {
        return;
    };
    println!("{}", root.display());
    for row in tree.rows() {
        let marker = match (row.is_dir, row.is_expanded) {
            (true, true) => "v ",
            (true, false) => "> ",
            (false, _) => "  ",
        };
        let active = if row.is_active { " *" } else { "" };
        println!(
            "{}{marker}{}{active}",
            "  ".repeat(usize::from(row.depth) + 1),
            row.name
        );
    }
}

fn print_tabs(session: &Session) {
    for tab in session.tab_views() {
        let active = if tab.active { ">" } else { " " };
        let dirty = if tab.dirty { " [+]" } else { "" };
        println!("{active} {}{dirty}  ({})", tab.label, tab.path);
    }
}
