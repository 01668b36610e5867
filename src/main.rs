use crossterm::style::Stylize;
use reedline::{
    FileBackedHistory, Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus,
    Reedline, Signal,
};
use std::{borrow::Cow, path::PathBuf};

use anyhow::{anyhow, Result};
use chrono::{Local, Utc};
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use tracing::warn;

mod commands;

use commands::parse_go_args;
use epervier_cli::api_client::ApiClient;
use epervier_cli::app_state::AppState;
use epervier_cli::config::config::Config;
use epervier_cli::geometry::LatLon;
use epervier_cli::history::{SubmissionEntry, SubmissionHistory};
use epervier_cli::kml_exporter::KmlExporter;
use epervier_cli::logging::{init_tracing, LogRingBuffer};
use epervier_cli::map_surface::{HeadlessMapSurface, MapSurface, OverlayKind};
use epervier_cli::notifications::NotificationStyle;
use epervier_cli::reset_controller::ResetController;
use epervier_cli::search_orchestrator::{SearchOrchestrator, SubmitOutcome};

struct EpervierPrompt;

impl Prompt for EpervierPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed("epervier> ")
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, edit_mode: PromptEditMode) -> Cow<'_, str> {
        match edit_mode {
            PromptEditMode::Default | PromptEditMode::Emacs => "> ".into(),
            PromptEditMode::Vi(vi_mode) => match vi_mode {
                reedline::PromptViMode::Normal => "N> ".into(),
                reedline::PromptViMode::Insert => "I> ".into(),
            },
            PromptEditMode::Custom(str) => format!("{str}> ").into(),
        }
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse search: {})",
            prefix, history_search.term
        ))
    }
}

fn print_help() {
    println!("{}", "Epervier CLI - Dragnet planning console".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  epervier-cli [OPTIONS]");
    println!();
    println!("{}", "Options:".yellow());
    println!(
        "  {} - Write a commented config file and exit",
        "--generate-config".green()
    );
    println!(
        "  {}       - Override the configured backend URL",
        "--url <URL>".green()
    );
    println!();
    println!("{}", "Commands:".yellow());
    println!(
        "  {} - Submit a search",
        "go address=\"...\" time=<min|H:MM> strat=<mode>".green()
    );
    println!("      address  street address of the triggering event (required)");
    println!("      time     leak time, minutes or H:MM (required)");
    println!("      strat    search strategy name (required)");
    println!("      dir      compass leak direction: N NE E SE S SO O NO");
    println!("      n        candidate point count (default 10)");
    println!("      dt       isochrone time step in seconds");
    println!("      color    zone outline color, #rgb/#rrggbb/#rrggbbaa");
    println!("      dot      candidate point color");
    println!("      zone     on|off, draw the reachable-area polygons");
    println!("  {}   - Remove every overlay from the map", "reset".green());
    println!("  {}  - Write the last result to export.kml", "export".green());
    println!("  {}    - Show the map state", "view".green());
    println!("  {} - Show past submissions", "history".green());
    println!(
        "  {}    - Show recent log lines ({} empties them)",
        "logs".green(),
        "logs clear".green()
    );
    println!("  {}   - Clear screen", "clear".green());
    println!("  {}    - Show this help", "help".green());
    println!("  {}    - Exit (or Ctrl+D)", "quit".green());
    println!();
    println!("{}", "Examples:".yellow());
    println!("  go address=\"12 rue de la Paix, Auch\" time=25 strat=vitesse");
    println!("  go address=\"place du Capitole, Toulouse\" time=1:30 strat=distance dir=NE n=20");
    println!();
}

fn run_submit(
    runtime: &tokio::runtime::Runtime,
    orchestrator: &mut SearchOrchestrator<ApiClient>,
    surface: &mut HeadlessMapSurface,
    submissions: Option<&mut SubmissionHistory>,
    config: &Config,
    args: &str,
) {
    let command = match parse_go_args(args, config) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", format!("Error: {:#}", e).red());
            return;
        }
    };

    let address = command.request.address.clone();
    let strategy = command.request.strategy.clone();
    let point_count = command.request.point_count;

    // The waiting state of a terminal UI: one line before the block_on.
    println!("{}", format!("Searching around {}...", address).cyan());

    let outcome = runtime.block_on(orchestrator.submit(command.request, &command.options, surface));

    for alert in orchestrator.state_mut().take_alerts() {
        eprintln!("{}", format!("alert: {}", alert).red().bold());
    }

    if let Some(notification) = orchestrator.state().notifications.active() {
        let line = format!("[{}] {}", notification.timestamp, notification.message);
        match notification.style {
            NotificationStyle::Success => println!("{}", line.green()),
            NotificationStyle::Error => println!("{}", line.red()),
        }
    }

    match &outcome {
        SubmitOutcome::Success { stats, .. } => {
            if let Some(points) = orchestrator
                .state()
                .last_result()
                .and_then(|result| result.points.as_ref())
            {
                display_points(points);
            }
            println!(
                "{} zone(s), {} graph node(s), {} graph edge(s) drawn",
                stats.zones, stats.graph_nodes, stats.graph_edges
            );
            if stats.skipped_edges > 0 {
                println!(
                    "{}",
                    format!("{} edge(s) skipped", stats.skipped_edges).yellow()
                );
            }
        }
        SubmitOutcome::ApplicationError { message, .. } => {
            eprintln!("{}", format!("Backend error: {}", message).red());
        }
        SubmitOutcome::TransportError(_) => {}
    }

    if let Some(history) = submissions {
        let entry = SubmissionEntry {
            address,
            strategy,
            point_count,
            success: outcome.is_success(),
            elapsed_seconds: outcome.elapsed_seconds(),
            timestamp: Utc::now(),
        };
        if let Err(e) = history.record(entry) {
            warn!(target: "history", "could not record the submission: {}", e);
        }
    }
}

fn display_points(points: &[LatLon]) {
    if points.is_empty() {
        println!("{}", "No candidate points returned.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("latitude").add_attribute(Attribute::Bold),
        Cell::new("longitude").add_attribute(Attribute::Bold),
    ]);

    for (index, point) in points.iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            format!("{:.5}", point.lat),
            format!("{:.5}", point.lon),
        ]);
    }

    println!("{table}");
    println!("\n{}", format!("{} candidate points", points.len()).green());
}

fn run_export(state: &AppState) {
    let Some(result) = state.last_result() else {
        println!("{}", "No results to export. Run a search first.".yellow());
        return;
    };

    let points = result.points.clone().unwrap_or_default();
    let zone = result.zpp.clone().unwrap_or_default();
    let kml = KmlExporter::export(&points, &zone);

    match std::fs::write("export.kml", kml) {
        Ok(()) => println!("{}", "Wrote export.kml".green()),
        Err(e) => eprintln!("{}", format!("Export error: {}", e).red()),
    }
}

fn display_view(state: &AppState, surface: &HeadlessMapSurface) {
    match surface.view() {
        Some((center, zoom)) => {
            println!("Center {:.4}, {:.4} at zoom {}", center.lat, center.lon, zoom)
        }
        None => println!("No view set."),
    }
    println!(
        "Overlays: {} marker(s), {} circle(s), {} polyline(s), {} polygon(s)",
        surface.count_of(OverlayKind::Marker),
        surface.count_of(OverlayKind::CircleMarker),
        surface.count_of(OverlayKind::Polyline),
        surface.count_of(OverlayKind::Polygon),
    );

    match state.last_result() {
        Some(result) => println!("Last search answered in {:.2}s", result.elapsed_seconds),
        None => println!("No search submitted yet."),
    }

    if let Some(notification) = state.notifications.active() {
        println!("[{}] {}", notification.timestamp, notification.message);
    }
}

fn display_history(submissions: Option<&SubmissionHistory>) {
    let Some(history) = submissions else {
        println!("{}", "History is disabled in the config.".yellow());
        return;
    };
    if history.is_empty() {
        println!("{}", "No submissions recorded yet.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("when").add_attribute(Attribute::Bold),
        Cell::new("address").add_attribute(Attribute::Bold),
        Cell::new("strategy").add_attribute(Attribute::Bold),
        Cell::new("points").add_attribute(Attribute::Bold),
        Cell::new("ok").add_attribute(Attribute::Bold),
        Cell::new("elapsed").add_attribute(Attribute::Bold),
    ]);

    for entry in history.get_recent(20) {
        table.add_row(vec![
            entry
                .timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            entry.address.clone(),
            entry.strategy.clone(),
            entry.point_count.to_string(),
            if entry.success { "yes" } else { "no" }.to_string(),
            format!("{:.2}s", entry.elapsed_seconds),
        ]);
    }

    println!("{table}");
}

fn run_logs(buffer: &LogRingBuffer, args: &str) {
    if args == "clear" {
        buffer.clear();
        println!("{}", "Logs cleared.".cyan());
        return;
    }

    let entries = buffer.get_recent(50);
    if entries.is_empty() {
        println!("{}", "No log entries captured.".yellow());
        return;
    }
    for entry in &entries {
        println!("{}", entry.format_for_display());
    }
}

fn main() -> Result<()> {
    let log_buffer = init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.contains(&"--help".to_string()) || args.contains(&"-h".to_string()) {
        print_help();
        return Ok(());
    }

    // Check for config file generation
    if args.contains(&"--generate-config".to_string()) {
        match Config::get_config_path() {
            Ok(path) => {
                let config_content = Config::create_default_with_comments();
                if let Some(parent) = path.parent() {
                    if let Err(e) = std::fs::create_dir_all(parent) {
                        eprintln!("Error creating config directory: {}", e);
                        std::process::exit(1);
                    }
                }
                if let Err(e) = std::fs::write(&path, config_content) {
                    eprintln!("Error writing config file: {}", e);
                    std::process::exit(1);
                }
                println!("Configuration file created at: {:?}", path);
                println!("Edit this file to customize the console.");
                return Ok(());
            }
            Err(e) => {
                eprintln!("Error determining config path: {}", e);
                std::process::exit(1);
            }
        }
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("Error loading config, using defaults: {}", e);
        Config::default()
    });

    if let Some(pos) = args.iter().position(|arg| arg == "--url") {
        match args.get(pos + 1) {
            Some(url) => config.backend.base_url = url.clone(),
            None => {
                eprintln!("{}", "Usage: epervier-cli --url <URL>".red());
                std::process::exit(1);
            }
        }
    }

    print_help();

    let client = ApiClient::new(&config.backend.base_url, config.timeout())
        .map_err(|e| anyhow!("could not build the HTTP client: {e}"))?;
    let mut orchestrator =
        SearchOrchestrator::new(client, config.map.recenter_zoom, config.notification_ttl());

    let mut surface = HeadlessMapSurface::new();
    surface.set_view(config.initial_center(), config.map.initial_zoom);

    let mut submissions = if config.history.enabled {
        match SubmissionHistory::new(config.history.max_entries) {
            Ok(history) => Some(history),
            Err(e) => {
                eprintln!("{}", format!("History disabled: {}", e).yellow());
                None
            }
        }
    } else {
        None
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let history_file = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".epervier_cli_history");
    let history = Box::new(
        FileBackedHistory::with_file(50, history_file).expect("Error configuring history"),
    );

    let mut line_editor = Reedline::create().with_history(history);
    let prompt = EpervierPrompt;

    println!(
        "{}",
        format!("Connected to backend: {}", config.backend.base_url).cyan()
    );

    loop {
        let sig = line_editor.read_line(&prompt)?;
        match sig {
            Signal::Success(buffer) => {
                let trimmed = buffer.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let (command, rest) = match trimmed.split_once(char::is_whitespace) {
                    Some((command, rest)) => (command, rest.trim()),
                    None => (trimmed, ""),
                };

                match command {
                    "go" => run_submit(
                        &runtime,
                        &mut orchestrator,
                        &mut surface,
                        submissions.as_mut(),
                        &config,
                        rest,
                    ),
                    "reset" => {
                        ResetController::reset(
                            &mut surface,
                            &mut orchestrator.state_mut().overlays,
                        );
                        println!("{}", "Map cleared.".cyan());
                    }
                    "export" => run_export(orchestrator.state()),
                    "view" => display_view(orchestrator.state(), &surface),
                    "history" => display_history(submissions.as_ref()),
                    "logs" => run_logs(&log_buffer, rest),
                    "clear" => {
                        print!("{esc}[2J{esc}[1;1H", esc = 27 as char);
                    }
                    "help" => print_help(),
                    "quit" | "exit" => {
                        println!("Goodbye!");
                        break;
                    }
                    other => {
                        eprintln!("{}", format!("Unknown command: {} (try help)", other).red())
                    }
                }
            }
            Signal::CtrlD | Signal::CtrlC => {
                println!("\nGoodbye!");
                break;
            }
        }
    }

    Ok(())
}
