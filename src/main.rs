// ============================================================================
// StockScope - Point d'entrée
// ============================================================================
// Explorateur d'actions en terminal : choisir un symbole du catalogue,
// récupérer ses fondamentaux et produire un graphique PNG
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : render → input → update
// 3. Worker thread : un runtime tokio dédié aux appels réseau
// 4. Channels mpsc : l'état App reste la propriété de la boucle d'événements
// ============================================================================

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use stockscope::api::YahooClient;
use stockscope::app::{App, Outcome};
use stockscope::catalog::SymbolCatalog;
use stockscope::chart::{register_font_file, register_system_font, PlottersRenderer};
use stockscope::config::Config;
use stockscope::format::CurrencyFormatter;
use stockscope::handler::{RequestHandler, StockReport};
use stockscope::ui::{events::EventHandler, render};

type StockHandler = RequestHandler<YahooClient, PlottersRenderer>;

// ============================================================================
// Messages échangés avec le worker thread
// ============================================================================

/// Commandes envoyées au worker thread
#[derive(Debug, Clone)]
enum AppCommand {
    /// Lancer le pipeline complet pour un symbole nu du catalogue
    Fetch { symbol: String },
}

/// Résultats renvoyés par le worker thread
#[derive(Debug)]
enum AppResult {
    /// Requête terminée (rapport ou échec)
    Finished(Outcome),
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// Les println! ne fonctionnent pas une fois le TUI lancé : les logs vont
// dans un fichier à rotation quotidienne.
// ============================================================================

/// Initialise le logging vers `<log_dir>/stockscope.log`
///
/// # Contrôler le niveau de log
/// ```bash
/// RUST_LOG=stockscope=trace stockscope
/// tail -f ~/.local/share/stockscope/logs/stockscope.log.*
/// ```
fn init_logging(log_dir: &Path) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(log_dir).with_context(|| {
        format!(
            "Échec de la création du répertoire de logs {}",
            log_dir.display()
        )
    })?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "stockscope.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockscope=debug,info".into()),
        )
        .init();

    info!(log_dir = %log_dir.display(), "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée
// ============================================================================

fn main() -> Result<ExitCode> {
    let config = Config::parse();

    init_logging(&config.log_dir()).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(?config, "StockScope starting up");

    match &config.font {
        Some(path) => register_font_file(path)
            .with_context(|| format!("Police inutilisable : {}", path.display()))?,
        None => {
            if register_system_font().is_none() {
                eprintln!("⚠️  Aucune police système trouvée, utilisez --font <fichier.ttf>");
            }
        }
    }

    let formatter = CurrencyFormatter::new(config.currency.clone());
    let handler = RequestHandler::new(
        YahooClient::new().context("Échec de la création du client HTTP")?,
        PlottersRenderer::new(config.chart_width, config.chart_height, formatter.clone()),
        formatter,
        config.exchange_suffix.clone(),
    );
    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;

    if let Some(symbol) = &config.symbol {
        return Ok(run_headless(&runtime, &handler, symbol, &config.chart_dir));
    }

    let catalog = SymbolCatalog::load(&config.catalog)
        .with_context(|| format!("Échec du chargement du catalogue {}", config.catalog.display()))?;

    run_tui(catalog, handler, runtime, config.chart_dir)?;
    Ok(ExitCode::SUCCESS)
}

/// Mode non interactif : une requête, sortie sur stdout
fn run_headless(
    runtime: &tokio::runtime::Runtime,
    handler: &StockHandler,
    symbol: &str,
    chart_dir: &Path,
) -> ExitCode {
    info!(symbol, "Running headless request");

    match runtime.block_on(handler.handle(symbol)) {
        Ok(report) => {
            println!("{}", report.text);
            match save_chart(&report, chart_dir) {
                Ok(path) => println!("\nChart saved to {}", path.display()),
                Err(reason) => eprintln!("⚠️  {}", reason),
            }
            ExitCode::SUCCESS
        }
        Err(failure) => {
            println!("{}", failure);
            ExitCode::FAILURE
        }
    }
}

/// Enregistre le PNG du rapport dans le répertoire des graphiques
fn save_chart(report: &StockReport, chart_dir: &Path) -> Result<PathBuf, String> {
    report
        .chart
        .save(chart_dir, &report.ticker.file_stem())
        .map_err(|e| {
            warn!(ticker = %report.ticker, error = %e, "Failed to save chart");
            e.to_string()
        })
}

// ============================================================================
// Mode TUI
// ============================================================================

fn run_tui(
    catalog: SymbolCatalog,
    handler: StockHandler,
    runtime: tokio::runtime::Runtime,
    chart_dir: PathBuf,
) -> Result<()> {
    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let mut app = App::new(catalog);

    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_background_worker(command_rx, result_tx, handler, runtime, chart_dir);

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, command_tx, result_rx);

    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Background Worker Thread
// ============================================================================
// CONCEPT RUST : Thread + runtime async
// - Le runtime et le handler sont déplacés (move) dans le thread
// - Les requêtes sont traitées une par une, dans l'ordre du channel
// - La boucle se termine quand l'event loop lâche command_tx
// ============================================================================

fn spawn_background_worker(
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
    handler: StockHandler,
    runtime: tokio::runtime::Runtime,
    chart_dir: PathBuf,
) {
    std::thread::spawn(move || {
        for command in command_rx {
            info!(?command, "Worker received command");

            let outcome = match command {
                AppCommand::Fetch { symbol } => match runtime.block_on(handler.handle(&symbol)) {
                    Ok(report) => {
                        let chart_path = save_chart(&report, &chart_dir);
                        Outcome::Report {
                            report: Box::new(report),
                            chart_path,
                        }
                    }
                    Err(failure) => Outcome::Failure(failure),
                },
            };

            if result_tx.send(AppResult::Finished(outcome)).is_err() {
                break;
            }
        }
        info!("Worker thread exiting (channel closed)");
    });
}

// ============================================================================
// Event Loop Principal
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    while app.is_running() {
        // 0. RÉSULTATS : try_recv ne bloque pas
        match result_rx.try_recv() {
            Ok(AppResult::Finished(outcome)) => {
                if let Outcome::Failure(failure) = &outcome {
                    debug!(%failure, "Showing request failure");
                }
                app.finish_request(outcome);
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                error!("Worker thread disconnected!");
                app.stop_loading();
            }
        }

        // 1. RENDER
        terminal.draw(|frame| render(frame, app))?;

        // 2. INPUT
        if let Ok(event) = events.next() {
            handle_event(app, event, &command_tx);
        }
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================
// CONCEPT RUST : match avec guards
// - Chaque bras combine la touche et l'écran courant
// - L'ordre des bras compte : le mode filtre capture les caractères
//   avant les raccourcis ('q', 'j', 'k')
// ============================================================================

fn handle_event(
    app: &mut App,
    event: stockscope::ui::events::Event,
    command_tx: &mpsc::Sender<AppCommand>,
) {
    use stockscope::ui::events::{
        get_char_from_event, is_back_event, is_backspace_event, is_down_event, is_enter_event,
        is_escape_event, is_filter_event, is_quit_event, is_symbol_char_event, is_up_event, Event,
    };

    match event {
        // ========================================
        // Mode filtre
        // ========================================
        Event::Key(_) if app.is_in_filter_mode() && is_escape_event(&event) => {
            debug!("User cleared filter");
            app.cancel_filter();
        }
        Event::Key(_) if app.is_in_filter_mode() && is_enter_event(&event) => {
            info!(filter = %app.filter, matches = app.visible.len(), "User applied filter");
            app.submit_filter();
        }
        Event::Key(_) if app.is_in_filter_mode() && is_backspace_event(&event) => {
            app.backspace();
        }
        Event::Key(_) if app.is_in_filter_mode() && is_symbol_char_event(&event) => {
            if let Some(c) = get_char_from_event(&event) {
                app.append_char(c);
            }
        }
        Event::Key(_) if app.is_in_filter_mode() => {}

        // ========================================
        // Two-step quit
        // ========================================
        Event::Key(_) if is_quit_event(&event) => {
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        // ========================================
        // Liste des symboles
        // ========================================
        Event::Key(_) if app.is_on_picker() && is_up_event(&event) => {
            app.cancel_quit();
            app.navigate_up();
        }
        Event::Key(_) if app.is_on_picker() && is_down_event(&event) => {
            app.cancel_quit();
            app.navigate_down();
        }
        Event::Key(_) if app.is_on_picker() && is_filter_event(&event) => {
            app.cancel_quit();
            app.start_filter();
        }
        Event::Key(_) if app.is_on_picker() && is_enter_event(&event) => {
            app.cancel_quit();
            match app.begin_request() {
                Some(symbol) => {
                    info!(symbol = %symbol, "User requested stock report");
                    if command_tx.send(AppCommand::Fetch { symbol }).is_err() {
                        error!("Worker channel closed, request dropped");
                        app.stop_loading();
                    }
                }
                None => debug!("Selection ignored (loading or empty list)"),
            }
        }

        // ========================================
        // Rapport
        // ========================================
        Event::Key(_) if app.is_on_report() && is_back_event(&event) => {
            app.cancel_quit();
            debug!("User returned to symbol list");
            app.show_picker();
        }

        Event::Key(_) => app.cancel_quit(),
        Event::Tick => {}
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    Terminal::new(CrosstermBackend::new(stdout)).map_err(Into::into)
}

/// Restaure le terminal, à appeler même si la boucle a échoué
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}
