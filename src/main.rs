// ============================================================================
// OWNLY - Client terminal
// ============================================================================
// Programme TUI : deals, investissement, marché secondaire, bundles, FAQ
// Consomme l'API REST OWNLY ; toute la logique métier reste côté serveur
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle infinie qui gère événements et rendering
// 3. Async dans sync : un worker thread possède le runtime tokio
// 4. Channels : l'UI envoie des AppCommand, le worker renvoie des AppResult
// ============================================================================

use std::io;
use std::path::Path;
use std::sync::{mpsc, Arc, Mutex, MutexGuard};
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use ownly::api::{OwnlyClient, Receipt};
use ownly::app::{App, InputField, ListKind, QueryRequest, Screen, Submitted};
use ownly::browse::QueryTicket;
use ownly::config::Config;
use ownly::models::{Bundle, Deal, SecondaryListing, WalletBalance};
use ownly::store::{LocalStore, Token};
use ownly::ui::{events::EventHandler, render};

// ============================================================================
// AppCommand : Commandes pour le worker thread
// ============================================================================
// CONCEPT RUST : Command pattern avec channels
// - L'event loop envoie des commandes au worker thread
// - Le worker thread exécute les appels API (async)
// ============================================================================

/// Commandes envoyées au worker thread
#[derive(Debug, Clone)]
enum AppCommand {
    /// GET /deals ; la génération permet d'ignorer une réponse périmée
    LoadDeals { ticket: QueryTicket },

    /// GET /deals/:id
    LoadDeal { id: String },

    /// GET /wallet/balance
    LoadBalance,

    /// GET /secondary-market/listings
    LoadListings { ticket: QueryTicket },

    /// GET /bundles
    LoadBundles,

    /// POST /investments
    Invest { spv_id: String, amount: f64 },

    /// POST /secondary-market/listings/:id/offer
    MakeOffer { listing_id: String, offer_price: f64 },

    /// POST /secondary-market/offers/:id/accept
    AcceptOffer { offer_id: String },

    /// POST /secondary-market/offers/:id/reject
    RejectOffer { offer_id: String },

    /// POST /secondary-market/listings/:id/cancel
    CancelListing { listing_id: String },
}

impl AppCommand {
    /// Message affiché pendant l'exécution
    fn loading_message(&self) -> String {
        match self {
            AppCommand::LoadDeals { .. } => "Chargement des deals...".to_string(),
            AppCommand::LoadDeal { id } => format!("Chargement du deal {}...", id),
            AppCommand::LoadBalance => "Chargement du solde...".to_string(),
            AppCommand::LoadListings { .. } => "Chargement des annonces...".to_string(),
            AppCommand::LoadBundles => "Chargement des bundles...".to_string(),
            AppCommand::Invest { .. } => "Envoi de l'investissement...".to_string(),
            AppCommand::MakeOffer { .. } => "Envoi de l'offre...".to_string(),
            AppCommand::AcceptOffer { .. } => "Acceptation de l'offre...".to_string(),
            AppCommand::RejectOffer { .. } => "Refus de l'offre...".to_string(),
            AppCommand::CancelListing { .. } => "Retrait de l'annonce...".to_string(),
        }
    }
}

impl From<QueryRequest> for AppCommand {
    fn from(request: QueryRequest) -> Self {
        match request {
            QueryRequest::Deals(ticket) => AppCommand::LoadDeals { ticket },
            QueryRequest::Listings(ticket) => AppCommand::LoadListings { ticket },
        }
    }
}

/// Résultats renvoyés par le worker thread
#[derive(Debug)]
enum AppResult {
    DealsLoaded { generation: u64, deals: Vec<Deal> },
    DealsFailed { generation: u64, error: String },
    DealLoaded { deal: Deal },
    DealFailed { id: String, error: String },
    BalanceLoaded { balance: WalletBalance },
    BalanceFailed { error: String },
    ListingsLoaded { generation: u64, listings: Vec<SecondaryListing> },
    ListingsFailed { generation: u64, error: String },
    BundlesLoaded { bundles: Vec<Bundle> },
    BundlesFailed { error: String },
    Invested { receipt: Receipt },
    InvestFailed { error: String },
    /// Écriture du marché secondaire réussie
    ActionDone { message: String },
    ActionFailed { error: String },
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place, avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans le répertoire `log_dir` de la configuration
/// (par défaut ~/.local/share/ownly/logs/ownly.log.AAAA-MM-JJ).
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/ownly/logs/ownly.log.*
/// RUST_LOG=ownly=trace cargo run
/// ```
fn init_logging(log_dir: &Path) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "ownly.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_thread_ids(true) // Utile pour distinguer UI et worker
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour ownly, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ownly=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(log_dir = %log_dir.display(), "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let config = Config::load().context("Échec du chargement de la configuration")?;

    init_logging(&config.log_dir).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(api = %config.api_base_url, "OWNLY client starting up");

    let store = LocalStore::open(&config.data_dir)?;

    // Token : configuration d'abord, sinon celui conservé par une session
    // précédente
    let token = match &config.api_token {
        Some(token) => {
            if let Err(e) = store.set::<Token>(&Some(token.clone())) {
                warn!(error = ?e, "Failed to persist token");
            }
            Some(token.clone())
        }
        None => store.get::<Token>().unwrap_or_else(|e| {
            warn!(error = ?e, "Failed to read stored token");
            None
        }),
    };

    let client = OwnlyClient::new(&config.api_base_url, token, config.request_timeout())?;
    let has_token = client.has_token();
    if !has_token {
        info!("No API token, wallet and write actions will be rejected by the server");
    }

    let mut app = App::new(config.page_size, config.debounce(), config.refresh_interval());
    app.load_local_state(&store);
    let initial = app.initial_requests(Instant::now());

    // CONCEPT RUST : Arc<Mutex<>> pour partage entre threads
    // - Le worker met à jour l'indicateur de chargement
    // - L'UI lit et modifie tout le reste
    let app = Arc::new(Mutex::new(app));

    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_background_worker(client, command_rx, result_tx, app.clone());

    let dispatcher = Dispatcher { tx: command_tx, has_token };
    for request in initial {
        dispatcher.send(request.into());
    }
    dispatcher.send(AppCommand::LoadBundles);
    if has_token {
        dispatcher.send(AppCommand::LoadBalance);
    }

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, app, &events, &dispatcher, result_rx, &store);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

/// Envoi des commandes au worker
struct Dispatcher {
    tx: mpsc::Sender<AppCommand>,
    /// Sans token, le solde n'est pas demandé (401 garanti)
    has_token: bool,
}

impl Dispatcher {
    fn send(&self, command: AppCommand) {
        debug!(?command, "Dispatching command");
        if let Err(e) = self.tx.send(command) {
            error!(error = %e, "Failed to send command, worker is gone");
        }
    }
}

/// Verrouille l'état partagé
///
/// Un mutex empoisonné signifie qu'un thread a paniqué en le tenant : on
/// arrête proprement plutôt que de paniquer à notre tour.
fn lock_app(app: &Arc<Mutex<App>>) -> Result<MutexGuard<'_, App>> {
    app.lock().map_err(|_| anyhow!("État de l'application inaccessible (mutex empoisonné)"))
}

// ============================================================================
// Background Worker Thread
// ============================================================================
// CONCEPT RUST : Background async worker avec channels
// - Thread séparé qui possède son runtime tokio
// - block_on() bloque le worker, jamais l'UI
// ============================================================================

fn spawn_background_worker(
    client: OwnlyClient,
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
    app: Arc<Mutex<App>>,
) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                // Le channel de résultats se ferme : l'UI le signalera
                error!(error = ?e, "Failed to create tokio runtime");
                return;
            }
        };

        // Boucle de traitement des commandes
        // - recv() bloque jusqu'à la prochaine commande
        // - Err : l'UI a fermé le channel, on quitte
        while let Ok(command) = command_rx.recv() {
            info!(?command, "Worker received command");

            if let Ok(mut app_lock) = app.lock() {
                app_lock.start_loading(Some(command.loading_message()));
            }

            let result = execute(&runtime, &client, command);

            if let Ok(mut app_lock) = app.lock() {
                app_lock.stop_loading();
            }

            if result_tx.send(result).is_err() {
                break;
            }
        }

        info!("Worker thread exiting (channel closed)");
    });
}

/// Exécute une commande et la convertit en résultat
///
/// Les erreurs sont journalisées ici ; l'UI ne reçoit que le message à
/// afficher (message du serveur tel quel, ou message générique).
fn execute(runtime: &tokio::runtime::Runtime, client: &OwnlyClient, command: AppCommand) -> AppResult {
    match command {
        AppCommand::LoadDeals { ticket } => match runtime.block_on(client.list_deals(&ticket.query)) {
            Ok(deals) => AppResult::DealsLoaded { generation: ticket.generation, deals },
            Err(e) => {
                error!(generation = ticket.generation, error = ?e, "Failed to load deals");
                AppResult::DealsFailed { generation: ticket.generation, error: e.user_message() }
            }
        },

        AppCommand::LoadDeal { id } => match runtime.block_on(client.get_deal(&id)) {
            Ok(deal) => AppResult::DealLoaded { deal },
            Err(e) => {
                error!(deal_id = %id, error = ?e, "Failed to load deal");
                AppResult::DealFailed { id, error: e.user_message() }
            }
        },

        AppCommand::LoadBalance => match runtime.block_on(client.wallet_balance()) {
            Ok(balance) => AppResult::BalanceLoaded { balance },
            Err(e) => {
                error!(error = ?e, "Failed to load wallet balance");
                AppResult::BalanceFailed { error: e.user_message() }
            }
        },

        AppCommand::LoadListings { ticket } => {
            match runtime.block_on(client.list_listings(&ticket.query)) {
                Ok(listings) => AppResult::ListingsLoaded { generation: ticket.generation, listings },
                Err(e) => {
                    error!(generation = ticket.generation, error = ?e, "Failed to load listings");
                    AppResult::ListingsFailed { generation: ticket.generation, error: e.user_message() }
                }
            }
        }

        AppCommand::LoadBundles => match runtime.block_on(client.list_bundles()) {
            Ok(bundles) => AppResult::BundlesLoaded { bundles },
            Err(e) => {
                error!(error = ?e, "Failed to load bundles");
                AppResult::BundlesFailed { error: e.user_message() }
            }
        },

        AppCommand::Invest { spv_id, amount } => match runtime.block_on(client.invest(&spv_id, amount)) {
            Ok(receipt) => AppResult::Invested { receipt },
            Err(e) => {
                error!(spv_id = %spv_id, amount, status = ?e.status(), error = ?e, "Investment rejected");
                AppResult::InvestFailed { error: e.user_message() }
            }
        },

        AppCommand::MakeOffer { listing_id, offer_price } => {
            write_result(runtime.block_on(client.make_offer(&listing_id, offer_price)), "Offre envoyée")
        }
        AppCommand::AcceptOffer { offer_id } => {
            write_result(runtime.block_on(client.accept_offer(&offer_id)), "Offre acceptée")
        }
        AppCommand::RejectOffer { offer_id } => {
            write_result(runtime.block_on(client.reject_offer(&offer_id)), "Offre refusée")
        }
        AppCommand::CancelListing { listing_id } => {
            write_result(runtime.block_on(client.cancel_listing(&listing_id)), "Annonce retirée")
        }
    }
}

/// Résultat d'une écriture du marché secondaire
fn write_result(result: Result<Receipt, ownly::api::ApiError>, fallback: &str) -> AppResult {
    match result {
        Ok(receipt) => AppResult::ActionDone {
            message: receipt.message.unwrap_or_else(|| fallback.to_string()),
        },
        Err(e) => {
            error!(status = ?e.status(), error = ?e, "Secondary market action rejected");
            AppResult::ActionFailed { error: e.user_message() }
        }
    }
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   0. Résultats du worker
//   1. Render
//   2. Input
//   3. Update (tick : debounce, redirection, rafraîchissement)
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: Arc<Mutex<App>>,
    events: &EventHandler,
    dispatcher: &Dispatcher,
    result_rx: mpsc::Receiver<AppResult>,
    store: &LocalStore,
) -> Result<()> {
    let mut worker_lost = false;

    loop {
        if !lock_app(&app)?.is_running() {
            break;
        }

        // ========================================
        // 0. RÉSULTATS : Traite les résultats du worker
        // ========================================
        // CONCEPT : Non-blocking receive avec try_recv
        loop {
            match result_rx.try_recv() {
                Ok(result) => {
                    let mut app_lock = lock_app(&app)?;
                    apply_result(&mut app_lock, result, dispatcher);
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    if !worker_lost {
                        error!("Worker thread disconnected!");
                        lock_app(&app)?
                            .notifications
                            .error("Le worker réseau s'est arrêté, redémarrez l'application");
                        worker_lost = true;
                    }
                    break;
                }
            }
        }

        // ========================================
        // 1. RENDER : Dessine l'interface
        // ========================================
        {
            let app_lock = lock_app(&app)?;
            terminal.draw(|frame| render(frame, &app_lock))?;
        }

        // ========================================
        // 2. INPUT : Traite les événements
        // ========================================
        match events.next() {
            Ok(event) => {
                let mut app_lock = lock_app(&app)?;
                handle_event(&mut app_lock, event, dispatcher, store);
            }
            Err(e) => {
                warn!(error = ?e, "Failed to read terminal event");
            }
        }

        // ========================================
        // 3. UPDATE : Met à jour l'état
        // ========================================
        let requests = lock_app(&app)?.tick(Instant::now());
        for request in requests {
            dispatcher.send(request.into());
        }
    }

    Ok(())
}

/// Applique un résultat du worker à l'état
fn apply_result(app: &mut App, result: AppResult, dispatcher: &Dispatcher) {
    let now = Instant::now();

    match result {
        AppResult::DealsLoaded { generation, deals } => {
            app.apply_deals(generation, deals);
        }
        AppResult::DealsFailed { generation, error } => app.deals_failed(generation, &error),

        AppResult::DealLoaded { deal } => {
            app.apply_deal_detail(deal);
        }
        AppResult::DealFailed { id, error } => {
            warn!(deal_id = %id, "Keeping list snapshot for deal detail");
            app.notifications.error(format!("Impossible de charger le deal : {}", error));
        }

        AppResult::BalanceLoaded { balance } => app.apply_balance(balance),
        AppResult::BalanceFailed { error } => {
            app.notifications.error(format!("Impossible de charger le solde : {}", error));
        }

        AppResult::ListingsLoaded { generation, listings } => {
            app.apply_listings(generation, listings);
        }
        AppResult::ListingsFailed { generation, error } => app.listings_failed(generation, &error),

        AppResult::BundlesLoaded { bundles } => app.apply_bundles(bundles),
        AppResult::BundlesFailed { error } => {
            app.notifications.error(format!("Impossible de charger les bundles : {}", error));
        }

        AppResult::Invested { receipt } => {
            info!(investment_id = ?receipt.id, "Investment confirmed");
            app.invest_succeeded(&receipt, now);
            // Montant levé et solde ont changé
            if let Some(request) = app.refresh(now) {
                dispatcher.send(request.into());
            }
            if dispatcher.has_token {
                dispatcher.send(AppCommand::LoadBalance);
            }
        }
        AppResult::InvestFailed { error } => app.invest_failed(&error),

        AppResult::ActionDone { message } => {
            app.action_succeeded(&message);
            if let Some(request) = app.refresh(now) {
                dispatcher.send(request.into());
            }
        }
        AppResult::ActionFailed { error } => app.action_failed(&error),
    }
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
///
/// CONCEPT RUST : Pattern matching avec guards
/// - Le mode saisie capture toutes les touches (même 'q')
/// - Sinon, chaque raccourci n'est actif que sur les écrans concernés
fn handle_event(app: &mut App, event: ownly::ui::events::Event, dispatcher: &Dispatcher, store: &LocalStore) {
    use ownly::ui::events::*;

    let now = Instant::now();

    if app.is_in_input_mode() {
        handle_input_event(app, &event, dispatcher, store, now);
        return;
    }

    // Toute touche autre que la confirmation annule la confirmation en cours
    if let Event::Key(_) = event {
        if !is_quit_event(&event) {
            app.cancel_quit();
        }
        if !is_withdraw_event(&event) {
            app.cancel_withdraw();
        }
    }

    let screen = app.current_screen;
    let on_lists = matches!(screen, Screen::Deals | Screen::Market);

    match event {
        Event::Key(_) if is_quit_event(&event) => {
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        Event::Key(_) if is_dismiss_event(&event) => {
            app.notifications.dismiss_front();
        }

        // ESC : retour à la liste depuis le détail, sinon ferme la notification
        Event::Key(_) if is_escape_event(&event) => {
            if screen == Screen::DealDetail {
                debug!("User returned to deals list");
                app.show_screen(Screen::Deals);
            } else {
                app.notifications.dismiss_front();
            }
        }

        Event::Key(_) if is_tab_event(&event) => app.next_tab(),
        Event::Key(_) if get_tab_from_event(&event).is_some() => {
            if let Some(screen) = get_tab_from_event(&event).and_then(|i| Screen::TABS.get(i)) {
                app.show_screen(*screen);
            }
        }

        Event::Key(_) if is_up_event(&event) => app.navigate_up(),
        Event::Key(_) if is_down_event(&event) => app.navigate_down(),

        // Enter : ouvrir le deal / déplier la question
        Event::Key(_) if is_enter_event(&event) && screen == Screen::Deals => {
            if let Some(id) = app.open_selected_deal() {
                load_deal_detail(dispatcher, id);
            }
        }
        Event::Key(_) if is_enter_event(&event) && screen == Screen::Faq => app.toggle_faq(),

        // Filtres (deals et annonces)
        Event::Key(_) if is_search_event(&event) && on_lists => {
            app.start_input(match app.list_kind() {
                Some(ListKind::Listings) => InputField::ListingSearch,
                _ => InputField::DealSearch,
            });
        }
        Event::Key(_) if is_min_price_event(&event) && on_lists => {
            app.start_input(match app.list_kind() {
                Some(ListKind::Listings) => InputField::ListingMinPrice,
                _ => InputField::DealMinPrice,
            });
        }
        Event::Key(_) if is_max_price_event(&event) && on_lists => {
            app.start_input(match app.list_kind() {
                Some(ListKind::Listings) => InputField::ListingMaxPrice,
                _ => InputField::DealMaxPrice,
            });
        }
        Event::Key(_) if is_type_event(&event) && on_lists => app.cycle_type(now),
        Event::Key(_) if is_status_event(&event) && on_lists => app.cycle_status(now),
        Event::Key(_) if is_sort_event(&event) && on_lists => app.cycle_sort(now),
        Event::Key(_) if is_saved_only_event(&event) && on_lists => app.toggle_saved_only(now),
        Event::Key(_) if is_more_event(&event) && on_lists => app.show_more(),

        // Watchlist / favoris
        Event::Key(_) if is_watch_event(&event) && screen == Screen::Market => app.toggle_favorite(store),
        Event::Key(_) if is_watch_event(&event) && matches!(screen, Screen::Deals | Screen::DealDetail) => {
            app.toggle_watchlist(store)
        }

        // Rafraîchissement manuel
        Event::Key(_) if is_refresh_event(&event) => match screen {
            Screen::DealDetail => {
                if let Some(id) = app.current_deal.as_ref().map(|d| d.id.clone()) {
                    load_deal_detail(dispatcher, id);
                }
            }
            Screen::Bundles => dispatcher.send(AppCommand::LoadBundles),
            _ => {
                if let Some(request) = app.refresh(now) {
                    dispatcher.send(request.into());
                }
            }
        },

        // Investissement
        Event::Key(_) if is_invest_event(&event) && screen == Screen::DealDetail => app.start_invest(),

        // Marché secondaire
        Event::Key(_) if is_offer_event(&event) && screen == Screen::Market => app.start_offer(),
        Event::Key(_) if (is_accept_event(&event) || is_reject_event(&event)) && screen == Screen::Market => {
            match app.selected_pending_offer() {
                Some(offer_id) if is_accept_event(&event) => {
                    info!(offer_id = %offer_id, "User accepted offer");
                    dispatcher.send(AppCommand::AcceptOffer { offer_id });
                }
                Some(offer_id) => {
                    info!(offer_id = %offer_id, "User rejected offer");
                    dispatcher.send(AppCommand::RejectOffer { offer_id });
                }
                None => {
                    app.notifications.info("Aucune offre en attente sur cette annonce");
                }
            }
        }
        Event::Key(_) if is_withdraw_event(&event) && screen == Screen::Market => {
            // Two-step : première pression = confirmation
            if app.is_awaiting_withdraw_confirmation() {
                if let Some(listing_id) = app.confirm_withdraw_selected() {
                    info!(listing_id = %listing_id, "User confirmed listing withdrawal");
                    dispatcher.send(AppCommand::CancelListing { listing_id });
                }
            } else {
                app.request_withdraw();
            }
        }
        Event::Key(_) if is_compare_event(&event) && screen == Screen::Market => app.toggle_compare(),
        Event::Key(_) if is_clear_compare_event(&event) && screen == Screen::Market => app.comparison.clear(),
        Event::Key(_) if is_save_search_event(&event) && screen == Screen::Market => {
            app.start_input(InputField::SaveSearch)
        }
        Event::Key(_) if is_load_search_event(&event) && screen == Screen::Market => {
            app.start_input(InputField::LoadSearch)
        }
        Event::Key(_) if is_delete_search_event(&event) && screen == Screen::Market => {
            app.start_input(InputField::DeleteSearch)
        }

        Event::Tick | Event::Key(_) | Event::Error => {}
    }
}

/// Mode saisie : Enter valide, ESC annule, le reste édite le champ
fn handle_input_event(
    app: &mut App,
    event: &ownly::ui::events::Event,
    dispatcher: &Dispatcher,
    store: &LocalStore,
    now: Instant,
) {
    use ownly::ui::events::*;

    if is_escape_event(event) {
        debug!("User cancelled input");
        app.cancel_input(now);
    } else if is_enter_event(event) {
        match app.submit_input() {
            Submitted::Nothing => {}
            Submitted::Invest { spv_id, amount } => {
                dispatcher.send(AppCommand::Invest { spv_id, amount });
            }
            Submitted::Offer { listing_id, offer_price } => {
                dispatcher.send(AppCommand::MakeOffer { listing_id, offer_price });
            }
            Submitted::SaveSearch(name) => app.save_search(store, &name),
            Submitted::LoadSearch(name) => app.load_search(store, &name, now),
            Submitted::DeleteSearch(name) => app.delete_search(store, &name),
        }
    } else if is_backspace_event(event) {
        app.backspace(now);
    } else if is_text_char_event(event) {
        if let Some(c) = get_char_from_event(event) {
            app.append_char(c, now);
        }
    }
}

/// Recharge un deal (et le solde, pour les avertissements du formulaire)
fn load_deal_detail(dispatcher: &Dispatcher, id: String) {
    info!(deal_id = %id, "User opened deal detail");
    dispatcher.send(AppCommand::LoadDeal { id });
    if dispatcher.has_token {
        dispatcher.send(AppCommand::LoadBalance);
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI (raw mode + alternate screen)
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}
