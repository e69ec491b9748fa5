// Console front end for the village income rankings.
//
// - Option [1] loads the dataset (and the optional village names) and builds
//   the rank index.
// - Option [2] shows the ranked value list for a year/metric selection and
//   exports it to CSV.
// - Option [3] shows one village's yearly figures and exports its chart
//   series to JSON.
// - Option [4] prints the color legend.
use cunli_income::colors::legend;
use cunli_income::query::Orientation;
use cunli_income::{config, loader, output, util};
use cunli_income::{DatasetSession, Result, Selection, SharedSession, StyleCache, VillageDirectory};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

struct App {
    session: SharedSession,
    selection: Selection,
    styles: StyleCache,
}

/// Line-oriented user input. `None` from any reader means input is closed.
struct Console<R: BufRead> {
    reader: R,
}

impl<R: BufRead> Console<R> {
    fn new(reader: R) -> Self {
        Console { reader }
    }

    fn line(&mut self, label: &str) -> Option<String> {
        print!("{}", label);
        let _ = io::stdout().flush();
        let mut buf = String::new();
        match self.reader.read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => Some(buf.trim().to_string()),
            Err(e) => {
                tracing::error!(error = %e, "failed to read input");
                None
            }
        }
    }

    /// Read a single line of input after the common "Enter choice:" prompt.
    fn read_choice(&mut self) -> Option<String> {
        self.line("Enter choice: ")
    }

    /// Ask whether to go back to the menu after showing a view.
    ///
    /// `Some(true)` for `Y`, `Some(false)` for `N`, `None` once input is closed.
    fn back_to_menu(&mut self) -> Option<bool> {
        loop {
            match self.line("Back to Menu (Y/N): ")?.to_uppercase().as_str() {
                "Y" => return Some(true),
                "N" => return Some(false),
                _ => println!("Invalid choice. Please enter Y or N."),
            }
        }
    }
}

fn load_session() -> Result<DatasetSession> {
    let path = config::data_path();
    let (raw, report) = loader::load_dataset(&path)?;
    println!(
        "Processing dataset... ({} villages, {} yearly records, {} values)",
        util::format_int(report.villages),
        util::format_int(report.year_records),
        util::format_int(report.metric_values)
    );
    if report.null_values > 0 {
        println!(
            "Note: {} empty values treated as missing.",
            util::format_int(report.null_values)
        );
    }

    let directory = match config::villages_path() {
        Some(path) => loader::load_directory(&path)?,
        None => VillageDirectory::new(),
    };
    DatasetSession::with_directory(raw, directory)
}

/// Handle option [1]: load the dataset and swap in a freshly built session.
fn handle_load(app: &App) {
    match load_session() {
        Ok(session) => {
            let years = session.years_desc();
            println!(
                "Ranked {} years ({}).\n",
                years.len(),
                years.join(", ")
            );
            app.session.replace(session);
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to load dataset");
            eprintln!("Failed to load dataset: {}\n", e);
        }
    }
}

/// Handle option [2]: ranked list for a year/metric selection.
fn handle_ranked_list<R: BufRead>(app: &mut App, console: &mut Console<R>) {
    let Some(session) = app.session.current() else {
        println!("Error: No data loaded. Please load the dataset first (option 1).\n");
        return;
    };

    let Some(input) = console.line(&format!("Selection year/metric [{}]: ", app.selection)) else {
        return;
    };
    if !input.is_empty() {
        match input.parse::<Selection>() {
            Ok(selection) => app.selection = selection,
            Err(e) => {
                println!("{}\n", e);
                return;
            }
        }
    }
    let Selection { year, metric, .. } = &app.selection;

    let rows = session.ranked_rows(year, *metric, Orientation::Descending, config::names_per_row());
    output::preview_table(
        &format!("{} / {} ({})", year, metric, metric.label()),
        Some("values in thousand NTD, highest first"),
        &rows,
        config::preview_rows(),
    );
    if rows.is_empty() {
        return;
    }

    if !util::is_safe_file_component(year) {
        println!("Year {:?} cannot be used in a file name; skipping export.\n", year);
        return;
    }
    let file = config::export_dir().join(format!("ranking_{}_{}.csv", year, metric));
    match output::write_csv(&file, &rows) {
        Ok(()) => println!("(Full list of {} values exported to {})\n", util::format_int(rows.len()), file.display()),
        Err(e) => eprintln!("Write error: {}", e),
    }
}

/// Handle option [3]: yearly figures of one village.
fn handle_village_detail<R: BufRead>(app: &mut App, console: &mut Console<R>) {
    let Some(session) = app.session.current() else {
        println!("Error: No data loaded. Please load the dataset first (option 1).\n");
        return;
    };

    let Some(code) = console.line("Village code: ") else {
        return;
    };
    if !util::is_safe_file_component(&code) {
        println!("Invalid village code.\n");
        return;
    }
    app.selection.village = Some(code.clone());

    let series = session.village_series(&code);
    if series.is_empty() {
        println!("No data for {}.\n", code);
        return;
    }

    let Selection { year, metric, .. } = &app.selection;
    let style = session.feature_style(&code, year, *metric);
    let fill = app.styles.get(style.token).fill;
    output::preview_table(
        &session.detail_title(&code),
        Some("amounts in thousand NTD"),
        &session.detail_rows(&code),
        series.records.len(),
    );
    match style.label {
        Some(rank) => println!("{}: rank {} in {} ({}, {})", app.selection, rank, year, style.token, fill),
        None => println!("{}: no data for {} {}", app.selection, year, metric),
    }

    let file = config::export_dir().join(format!("village_{}.json", code));
    match output::write_json(&file, &series) {
        Ok(()) => println!("(Chart series exported to {})\n", file.display()),
        Err(e) => eprintln!("Write error: {}", e),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .init();

    let mut app = App {
        session: SharedSession::default(),
        selection: Selection::new(config::default_year(), config::default_metric()),
        styles: StyleCache::new(),
    };
    tracing::debug!(selection = %app.selection, "starting");
    let mut console = Console::new(io::stdin().lock());

    loop {
        println!("Village Income Rankings:");
        println!("[1] Load the dataset");
        println!("[2] Ranked list");
        println!("[3] Village detail");
        println!("[4] Legend");
        println!("[0] Exit\n");
        let Some(choice) = console.read_choice() else {
            println!("\nExiting the program.");
            break;
        };
        match choice.as_str() {
            "1" => handle_load(&app),
            "2" => {
                println!();
                handle_ranked_list(&mut app, &mut console);
                if console.back_to_menu() != Some(true) {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => {
                println!();
                handle_village_detail(&mut app, &mut console);
                if console.back_to_menu() != Some(true) {
                    println!("Exiting the program.");
                    break;
                }
            }
            "4" => output::preview_table("Legend", None, &legend(), 9),
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 0 to 4.\n"),
        }
    }
}
