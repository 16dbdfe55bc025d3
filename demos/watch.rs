//! Watch Demo - A small watch app in the terminal
//!
//! Pages:
//! - `/` clock face, face button opens contacts
//! - `contacts` list, top/bottom move the selection, face opens a contact,
//!   left goes home
//! - `contact` one contact, left goes back to the list
//! - `404` anything else
//!
//! Arrow keys and space press the watch buttons, or click them with the
//! mouse. `n` raises a notification, `x` dismisses it, `q` quits.
//!
//! Run with: cargo run --example watch -- demos/watch.toml
//! Logs go to the configured log file, filtered by `RUST_LOG`.

use std::fs::File;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing_subscriber::EnvFilter;

use watch_shell::host::{TerminalHost, WatchMetrics};
use watch_shell::{
    App, Page, PageProps, PageType, Props, RouteTable, ShellConfig, WatchDocument, FALLBACK_KEY,
};

const CONTACTS: &[(&str, &str)] = &[
    ("Ada Lovelace", "+44 20 7946 0018"),
    ("Grace Hopper", "+1 202 555 0143"),
    ("Alan Turing", "+44 161 496 0751"),
    ("Edsger Dijkstra", "+31 20 794 6012"),
];

// =============================================================================
// PAGES
// =============================================================================

struct Clock {
    props: PageProps,
    time: String,
}

impl PageType for Clock {
    fn create(props: PageProps) -> Self {
        Self {
            props,
            time: String::new(),
        }
    }
}

impl Page for Clock {
    fn page_will_load(&mut self) {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.time = format!("{:02}:{:02}", (secs / 3600) % 24, (secs / 60) % 60);
    }

    fn template(&self) -> String {
        format!(
            "<div><h1>{}</h1><p>UTC</p><p>Press the face for contacts</p></div>",
            self.time
        )
    }

    fn face_button_event(&mut self) {
        self.props.navigate.navigate("contacts", Props::new());
    }
}

struct Contacts {
    props: PageProps,
    selected: usize,
}

impl PageType for Contacts {
    fn create(props: PageProps) -> Self {
        let selected = props
            .get("selected")
            .and_then(|v| v.as_u64())
            .map(|n| n as usize)
            .unwrap_or(0)
            .min(CONTACTS.len() - 1);
        Self { props, selected }
    }
}

impl Contacts {
    fn show(&self, selected: usize) {
        self.props
            .navigate
            .navigate("contacts", Props::new().with("selected", selected as u64));
    }
}

impl Page for Contacts {
    fn template(&self) -> String {
        let items: String = CONTACTS
            .iter()
            .enumerate()
            .map(|(i, (name, _))| {
                let marker = if i == self.selected { "&gt; " } else { "&nbsp; " };
                format!("<li>{marker}{name}</li>")
            })
            .collect();
        format!("<div><h2>Contacts</h2><ul>{items}</ul></div>")
    }

    fn top_button_event(&mut self) {
        self.show(self.selected.saturating_sub(1));
    }

    fn bottom_button_event(&mut self) {
        self.show((self.selected + 1).min(CONTACTS.len() - 1));
    }

    fn face_button_event(&mut self) {
        self.props
            .navigate
            .navigate("contact", Props::new().with("index", self.selected as u64));
    }

    fn left_button_event(&mut self) {
        self.props.navigate.navigate("/", Props::new());
    }
}

struct Contact {
    props: PageProps,
    index: usize,
}

impl PageType for Contact {
    fn create(props: PageProps) -> Self {
        let index = props
            .get("index")
            .and_then(|v| v.as_u64())
            .map(|n| n as usize)
            .unwrap_or(0);
        Self { props, index }
    }
}

impl Page for Contact {
    fn template(&self) -> String {
        match CONTACTS.get(self.index) {
            Some((name, phone)) => format!("<div><h2>{name}</h2><p>{phone}</p></div>"),
            None => "<div>Unknown contact</div>".to_string(),
        }
    }

    fn left_button_event(&mut self) {
        self.props
            .navigate
            .navigate("contacts", Props::new().with("selected", self.index as u64));
    }
}

struct NotFound {
    props: PageProps,
}

impl PageType for NotFound {
    fn create(props: PageProps) -> Self {
        Self { props }
    }
}

impl Page for NotFound {
    fn template(&self) -> String {
        "<div><h2>404</h2><p>Oops, page not found</p></div>".to_string()
    }

    fn face_button_event(&mut self) {
        self.props.navigate.navigate("/", Props::new());
    }
}

// =============================================================================
// MAIN
// =============================================================================

fn init_logging(config: &ShellConfig) -> watch_shell::Result<()> {
    let Some(path) = &config.host.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run() -> watch_shell::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => ShellConfig::load(path)?,
        None => ShellConfig::default(),
    };
    init_logging(&config)?;

    let routes = RouteTable::new()
        .route::<Clock>("/")
        .route::<Contacts>("contacts")
        .route::<Contact>("contact")
        .route::<NotFound>(FALLBACK_KEY);

    let document = WatchDocument::new(config.elements.clone());
    let app = App::new(routes, config.notifications.clone(), &document)?;
    let _hash_changes = app.listen_hash_changes();

    let mut host = TerminalHost::enter(WatchMetrics::default())?;
    host.run(&app, &config.host)?;
    host.leave()
}

fn main() {
    if let Err(error) = run() {
        eprintln!("watch: {error}");
        std::process::exit(1);
    }
}
