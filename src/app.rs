// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global du client TUI OWNLY
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Temps injecté : les méthodes liées au temps prennent `now: Instant`,
//    ce qui rend debounce, redirection et rafraîchissement testables
//
// PATTERN : "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// - Les appels réseau ne sont jamais faits ici : App décrit ce qu'il faut
//   charger (QueryRequest, tuples retournés), main.rs l'envoie au worker
// ============================================================================

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::api::Receipt;
use crate::browse::{
    CompareToggle, Comparison, DealFilter, ListingFilter, Pagination, QueryTicket, QueryTrigger,
};
use crate::content::{Accordion, FAQ};
use crate::invest::{InvestForm, OfferForm, REDIRECT_DELAY};
use crate::models::{Bundle, Deal, DealStatus, DealType, ListingStatus, SecondaryListing, WalletBalance};
use crate::notify::NotificationQueue;
use crate::store::{FavoriteListings, LocalStore, SavedSearches, UserProfile, Watchlist};

// ============================================================================
// Enum : Screen
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Un seul écran actif à la fois
// - Le compilateur force à gérer tous les cas (exhaustivité)
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Liste des deals (écran d'accueil)
    Deals,

    /// Détail d'un deal + formulaire d'investissement
    DealDetail,

    /// Marché secondaire
    Market,

    /// Paniers de deals
    Bundles,

    /// FAQ, conformité Shariah, chiffres clés
    Faq,

    /// Mode saisie (Vim-like) : Enter valide, ESC annule
    Input,
}

impl Screen {
    /// Onglets affichés dans l'en-tête
    pub const TABS: [Screen; 4] = [Screen::Deals, Screen::Market, Screen::Bundles, Screen::Faq];

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Deals | Screen::DealDetail => "Deals",
            Screen::Market => "Secondary market",
            Screen::Bundles => "Bundles",
            Screen::Faq => "FAQ",
            Screen::Input => "Input",
        }
    }
}

/// Liste concernée par un changement de filtre
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Deals,
    Listings,
}

/// Champ édité en mode saisie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    DealSearch,
    DealMinPrice,
    DealMaxPrice,
    ListingSearch,
    ListingMinPrice,
    ListingMaxPrice,
    InvestAmount,
    OfferPrice,
    SaveSearch,
    LoadSearch,
    DeleteSearch,
}

impl InputField {
    pub fn prompt(&self) -> &'static str {
        match self {
            InputField::DealSearch | InputField::ListingSearch => "Search: ",
            InputField::DealMinPrice => "Min ticket: ",
            InputField::DealMaxPrice => "Max ticket: ",
            InputField::ListingMinPrice => "Min price: ",
            InputField::ListingMaxPrice => "Max price: ",
            InputField::InvestAmount => "Amount to invest: $",
            InputField::OfferPrice => "Offer price: $",
            InputField::SaveSearch => "Save search as: ",
            InputField::LoadSearch => "Load search: ",
            InputField::DeleteSearch => "Delete search: ",
        }
    }

    /// Les champs de filtre s'appliquent en direct pendant la frappe
    pub fn filter_kind(&self) -> Option<ListKind> {
        match self {
            InputField::DealSearch | InputField::DealMinPrice | InputField::DealMaxPrice => {
                Some(ListKind::Deals)
            }
            InputField::ListingSearch | InputField::ListingMinPrice | InputField::ListingMaxPrice => {
                Some(ListKind::Listings)
            }
            _ => None,
        }
    }
}

/// État du mode saisie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    pub field: InputField,
    /// Valeur avant édition (restaurée par ESC)
    original: String,
    /// Écran à réafficher en sortie de saisie
    pub return_to: Screen,
}

/// Résultat de la validation d'une saisie
#[derive(Debug, Clone, PartialEq)]
pub enum Submitted {
    /// Rien à envoyer (filtre appliqué, saisie invalide...)
    Nothing,
    Invest { spv_id: String, amount: f64 },
    Offer { listing_id: String, offer_price: f64 },
    SaveSearch(String),
    LoadSearch(String),
    DeleteSearch(String),
}

/// Requête de liste à transmettre au worker
#[derive(Debug, Clone, PartialEq)]
pub enum QueryRequest {
    Deals(QueryTicket),
    Listings(QueryTicket),
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    // --- Deals ---
    pub deals: Vec<Deal>,
    pub deal_filter: DealFilter,
    pub deal_page: Pagination,
    deal_query: QueryTrigger,
    /// Index dans la liste visible (filtrée + paginée)
    pub deal_selected: usize,
    pub watchlist: BTreeSet<String>,

    // --- Détail + investissement ---
    pub current_deal: Option<Deal>,
    pub invest_form: InvestForm,
    pub balance: Option<WalletBalance>,
    /// Un POST /investments est en cours
    pub submitting: bool,
    /// Retour à la liste programmé après un investissement réussi
    pub redirect_at: Option<Instant>,

    // --- Marché secondaire ---
    pub listings: Vec<SecondaryListing>,
    pub listing_filter: ListingFilter,
    pub listing_page: Pagination,
    listing_query: QueryTrigger,
    pub listing_selected: usize,
    pub favorites: BTreeSet<String>,
    pub comparison: Comparison,
    pub offer_form: OfferForm,
    offer_listing_id: Option<String>,
    /// Noms des recherches sauvegardées
    pub saved_searches: Vec<String>,

    // --- Bundles, FAQ ---
    pub bundles: Vec<Bundle>,
    pub bundle_selected: usize,
    pub faq: Accordion,
    pub faq_selected: usize,

    // --- Session ---
    pub user: Option<UserProfile>,

    // --- Transverse ---
    pub notifications: NotificationQueue,
    pub input: Option<InputState>,
    /// Buffer des saisies qui ne modifient pas un champ existant (noms)
    pub input_buffer: String,
    refresh_interval: Option<Duration>,
    last_refresh: Instant,

    /// Two-step quit (première pression de 'q' : confirmation)
    pub confirm_quit: bool,

    /// Two-step retrait d'annonce (première pression de 'd' : confirmation)
    pub confirm_withdraw: bool,

    pub is_loading: bool,
    pub loading_message: Option<String>,
}

impl App {
    /// Crée l'état initial
    ///
    /// # Arguments
    /// * `page_size` - Nombre d'éléments par "page"
    /// * `debounce` - Délai avant de relancer une requête après un filtre
    /// * `refresh_interval` - Rafraîchissement automatique (None = jamais)
    pub fn new(page_size: usize, debounce: Duration, refresh_interval: Option<Duration>) -> Self {
        Self {
            running: true,
            current_screen: Screen::Deals,
            deals: Vec::new(),
            deal_filter: DealFilter::default(),
            deal_page: Pagination::new(page_size),
            deal_query: QueryTrigger::new(debounce),
            deal_selected: 0,
            watchlist: BTreeSet::new(),
            current_deal: None,
            invest_form: InvestForm::default(),
            balance: None,
            submitting: false,
            redirect_at: None,
            listings: Vec::new(),
            listing_filter: ListingFilter::default(),
            listing_page: Pagination::new(page_size),
            listing_query: QueryTrigger::new(debounce),
            listing_selected: 0,
            favorites: BTreeSet::new(),
            comparison: Comparison::new(),
            offer_form: OfferForm::default(),
            offer_listing_id: None,
            saved_searches: Vec::new(),
            bundles: Vec::new(),
            bundle_selected: 0,
            faq: Accordion::default(),
            faq_selected: 0,
            user: None,
            notifications: NotificationQueue::new(),
            input: None,
            input_buffer: String::new(),
            refresh_interval,
            last_refresh: Instant::now(),
            confirm_quit: false,
            confirm_withdraw: false,
            is_loading: false,
            loading_message: None,
        }
    }

    /// Charge l'état persistant (watchlist, favoris, recherches, profil)
    ///
    /// Une clé illisible est journalisée et laissée vide : le client reste
    /// utilisable sans son état local.
    pub fn load_local_state(&mut self, store: &LocalStore) {
        match store.get::<Watchlist>() {
            Ok(ids) => self.watchlist = ids,
            Err(e) => warn!(error = ?e, "Failed to read watchlist"),
        }
        match store.get::<FavoriteListings>() {
            Ok(ids) => self.favorites = ids,
            Err(e) => warn!(error = ?e, "Failed to read favorite listings"),
        }
        match store.get::<crate::store::User>() {
            Ok(user) => self.user = user,
            Err(e) => warn!(error = ?e, "Failed to read user profile"),
        }
        self.reload_saved_searches(store);
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // ========================================================================
    // Navigation entre écrans
    // ========================================================================

    /// Écran "de fond" : celui qui est dessiné sous la ligne de saisie
    pub fn base_screen(&self) -> Screen {
        match &self.input {
            Some(input) => input.return_to,
            None => self.current_screen,
        }
    }

    pub fn show_screen(&mut self, screen: Screen) {
        if screen == Screen::Input {
            return;
        }
        debug!(?screen, "Switching screen");
        self.current_screen = screen;
        self.confirm_withdraw = false;
    }

    /// Onglet suivant (Tab)
    pub fn next_tab(&mut self) {
        let index = Screen::TABS
            .iter()
            .position(|s| *s == self.tab_screen())
            .unwrap_or(0);
        self.show_screen(Screen::TABS[(index + 1) % Screen::TABS.len()]);
    }

    /// Onglet sélectionné dans l'en-tête (le détail appartient à "Deals")
    pub fn tab_screen(&self) -> Screen {
        match self.base_screen() {
            Screen::DealDetail => Screen::Deals,
            other => other,
        }
    }

    /// Navigue vers le haut dans la liste de l'écran courant
    ///
    /// CONCEPT RUST : Saturating arithmetic
    /// - saturating_sub() ne descend pas en dessous de 0
    pub fn navigate_up(&mut self) {
        if let Some(selected) = self.selection_mut() {
            *selected = selected.saturating_sub(1);
        }
    }

    /// Navigue vers le bas (borné au dernier élément visible)
    pub fn navigate_down(&mut self) {
        let len = self.current_len();
        if let Some(selected) = self.selection_mut() {
            *selected = (*selected + 1).min(len.saturating_sub(1));
        }
    }

    fn selection_mut(&mut self) -> Option<&mut usize> {
        match self.current_screen {
            Screen::Deals => Some(&mut self.deal_selected),
            Screen::Market => Some(&mut self.listing_selected),
            Screen::Bundles => Some(&mut self.bundle_selected),
            Screen::Faq => Some(&mut self.faq_selected),
            Screen::DealDetail | Screen::Input => None,
        }
    }

    fn current_len(&self) -> usize {
        match self.current_screen {
            Screen::Deals => self.visible_deals().len(),
            Screen::Market => self.visible_listings().len(),
            Screen::Bundles => self.bundles.len(),
            Screen::Faq => FAQ.len(),
            Screen::DealDetail | Screen::Input => 0,
        }
    }

    // ========================================================================
    // Deals
    // ========================================================================

    /// Deals filtrés et triés (toute la liste, avant pagination)
    pub fn filtered_deals(&self) -> Vec<&Deal> {
        self.deal_filter.apply(&self.deals, &self.watchlist)
    }

    /// Deals affichés (filtrés, triés, paginés)
    pub fn visible_deals(&self) -> Vec<&Deal> {
        let deals = self.filtered_deals();
        self.deal_page.slice(&deals).to_vec()
    }

    pub fn selected_deal(&self) -> Option<&Deal> {
        self.visible_deals().get(self.deal_selected).copied()
    }

    /// Remplace la liste si la réponse est encore d'actualité
    ///
    /// Retourne false pour une réponse périmée (ignorée).
    pub fn apply_deals(&mut self, generation: u64, deals: Vec<Deal>) -> bool {
        if !self.deal_query.is_current(generation) {
            debug!(generation, latest = self.deal_query.generation(), "Dropping stale deals response");
            return false;
        }
        info!(count = deals.len(), generation, "Deals list updated");
        self.deals = deals;
        self.clamp_selections();
        true
    }

    /// Échec de lecture : on garde la liste précédente
    pub fn deals_failed(&mut self, generation: u64, message: &str) {
        if !self.deal_query.is_current(generation) {
            return;
        }
        error!(generation, message, "Deals fetch failed, keeping previous list");
        self.notifications
            .error(format!("Impossible de charger les deals : {}", message));
    }

    /// Ouvre le détail du deal sélectionné
    ///
    /// Retourne l'id à recharger (GET /deals/:id).
    pub fn open_selected_deal(&mut self) -> Option<String> {
        let deal = self.selected_deal()?.clone();
        info!(deal_id = %deal.id, "Opening deal detail");
        self.invest_form = InvestForm::new(deal.min_ticket, self.available_balance());
        let id = deal.id.clone();
        self.current_deal = Some(deal);
        self.redirect_at = None;
        self.show_screen(Screen::DealDetail);
        Some(id)
    }

    /// Détail rechargé : ignoré si l'utilisateur a changé de deal entre-temps
    pub fn apply_deal_detail(&mut self, deal: Deal) -> bool {
        match &self.current_deal {
            Some(current) if current.id == deal.id => {
                self.invest_form.min_ticket = deal.min_ticket;
                self.current_deal = Some(deal);
                true
            }
            _ => {
                debug!(deal_id = %deal.id, "Dropping detail for a deal no longer displayed");
                false
            }
        }
    }

    pub fn apply_balance(&mut self, balance: WalletBalance) {
        self.invest_form.balance = Some(balance.available_balance);
        self.balance = Some(balance);
    }

    pub fn available_balance(&self) -> Option<f64> {
        self.balance.map(|b| b.available_balance)
    }

    /// Ajoute ou retire le deal courant de la watchlist (persistée)
    pub fn toggle_watchlist(&mut self, store: &LocalStore) {
        let id = match self.current_screen {
            Screen::DealDetail => self.current_deal.as_ref().map(|d| d.id.clone()),
            _ => self.selected_deal().map(|d| d.id.clone()),
        };
        let Some(id) = id else { return };

        match store.toggle::<Watchlist>(&id) {
            Ok(true) => {
                self.watchlist.insert(id);
                self.notifications.success("Ajouté à la watchlist");
            }
            Ok(false) => {
                self.watchlist.remove(&id);
                self.notifications.info("Retiré de la watchlist");
            }
            Err(e) => {
                error!(deal_id = %id, error = ?e, "Failed to persist watchlist");
                self.notifications.error("Impossible d'enregistrer la watchlist");
            }
        }
        self.clamp_selections();
    }

    // ========================================================================
    // Investissement
    // ========================================================================

    /// Ouvre la saisie du montant (seulement si le deal accepte des fonds)
    pub fn start_invest(&mut self) {
        let Some(deal) = &self.current_deal else { return };

        if !deal.status.accepts_investments() {
            self.notifications
                .warning(format!("Ce deal n'accepte plus d'investissements ({})", deal.status.as_str()));
            return;
        }
        if deal.spv_id().is_none() {
            self.notifications.warning("Aucun SPV associé à ce deal");
            return;
        }
        // Envoi en cours ou redirection programmée : pas de nouvelle saisie
        if self.submitting || self.redirect_at.is_some() {
            return;
        }
        self.start_input(InputField::InvestAmount);
    }

    /// Valide le formulaire ; retourne (spv_id, montant) si l'envoi est possible
    fn submit_invest(&mut self) -> Option<(String, f64)> {
        if self.submitting {
            return None;
        }
        let spv_id = self.current_deal.as_ref()?.spv_id()?.to_string();

        if let Some(warning) = self.invest_form.validate().first() {
            self.notifications.warning(warning.to_string());
            return None;
        }
        let amount = self.invest_form.amount()?;
        self.submitting = true;
        info!(spv_id = %spv_id, amount, "Submitting investment");
        Some((spv_id, amount))
    }

    /// Investissement accepté : notification puis retour à la liste
    pub fn invest_succeeded(&mut self, receipt: &Receipt, now: Instant) {
        self.submitting = false;
        let message = receipt
            .message
            .clone()
            .unwrap_or_else(|| "Investissement confirmé".to_string());
        self.notifications.success(message);
        self.redirect_at = Some(now + REDIRECT_DELAY);
    }

    /// Investissement refusé : message du serveur tel quel
    pub fn invest_failed(&mut self, message: &str) {
        self.submitting = false;
        self.notifications.error(message);
    }

    // ========================================================================
    // Marché secondaire
    // ========================================================================

    pub fn filtered_listings(&self) -> Vec<&SecondaryListing> {
        self.listing_filter.apply(&self.listings, &self.favorites)
    }

    pub fn visible_listings(&self) -> Vec<&SecondaryListing> {
        let listings = self.filtered_listings();
        self.listing_page.slice(&listings).to_vec()
    }

    pub fn selected_listing(&self) -> Option<&SecondaryListing> {
        self.visible_listings().get(self.listing_selected).copied()
    }

    pub fn apply_listings(&mut self, generation: u64, listings: Vec<SecondaryListing>) -> bool {
        if !self.listing_query.is_current(generation) {
            debug!(generation, latest = self.listing_query.generation(), "Dropping stale listings response");
            return false;
        }
        info!(count = listings.len(), generation, "Listings updated");
        self.listings = listings;
        self.clamp_selections();
        true
    }

    pub fn listings_failed(&mut self, generation: u64, message: &str) {
        if !self.listing_query.is_current(generation) {
            return;
        }
        error!(generation, message, "Listings fetch failed, keeping previous list");
        self.notifications
            .error(format!("Impossible de charger les annonces : {}", message));
    }

    pub fn toggle_favorite(&mut self, store: &LocalStore) {
        let Some(id) = self.selected_listing().map(|l| l.id.clone()) else { return };

        match store.toggle::<FavoriteListings>(&id) {
            Ok(true) => {
                self.favorites.insert(id);
                self.notifications.success("Ajouté aux favoris");
            }
            Ok(false) => {
                self.favorites.remove(&id);
                self.notifications.info("Retiré des favoris");
            }
            Err(e) => {
                error!(listing_id = %id, error = ?e, "Failed to persist favorites");
                self.notifications.error("Impossible d'enregistrer les favoris");
            }
        }
        self.clamp_selections();
    }

    /// Ajoute ou retire l'annonce sélectionnée du comparateur
    pub fn toggle_compare(&mut self) {
        let Some(id) = self.selected_listing().map(|l| l.id.clone()) else { return };
        match self.comparison.toggle(&id) {
            CompareToggle::Added | CompareToggle::Removed => {}
            CompareToggle::Full => {
                self.notifications.warning(format!(
                    "Comparaison limitée à {} annonces",
                    crate::browse::compare::MAX_COMPARED
                ));
            }
        }
    }

    /// Annonces comparées, dans l'ordre de sélection
    ///
    /// Une annonce disparue de la liste (vendue...) est simplement omise.
    pub fn compared_listings(&self) -> Vec<&SecondaryListing> {
        self.comparison
            .ids()
            .iter()
            .filter_map(|id| self.listings.iter().find(|l| &l.id == id))
            .collect()
    }

    /// Ouvre la saisie d'une offre sur l'annonce sélectionnée
    pub fn start_offer(&mut self) {
        let Some(listing) = self.selected_listing() else { return };
        if listing.status != ListingStatus::Active {
            let status = listing.status.as_str();
            self.notifications
                .warning(format!("Cette annonce n'accepte pas d'offre ({})", status));
            return;
        }
        let (id, total) = (listing.id.clone(), listing.total_price);
        self.offer_form = OfferForm::new(total);
        self.offer_listing_id = Some(id);
        self.start_input(InputField::OfferPrice);
    }

    fn submit_offer(&mut self) -> Option<(String, f64)> {
        let Some(price) = self.offer_form.parse() else {
            self.notifications.warning("Entrez un prix valide");
            return None;
        };
        let listing_id = self.offer_listing_id.clone()?;
        if self.offer_form.at_or_above_ask() {
            self.notifications.info("Offre au prix demandé ou plus");
        }
        info!(listing_id = %listing_id, offer_price = price, "Submitting offer");
        Some((listing_id, price))
    }

    /// Première offre en attente sur l'annonce sélectionnée
    pub fn selected_pending_offer(&self) -> Option<String> {
        self.selected_listing()?
            .pending_offers()
            .next()
            .map(|offer| offer.id.clone())
    }

    /// Demande la confirmation de retrait de l'annonce sélectionnée
    pub fn request_withdraw(&mut self) {
        if self.selected_listing().is_some() {
            self.confirm_withdraw = true;
        }
    }

    pub fn cancel_withdraw(&mut self) {
        self.confirm_withdraw = false;
    }

    pub fn is_awaiting_withdraw_confirmation(&self) -> bool {
        self.confirm_withdraw
    }

    /// Confirme le retrait ; retourne l'id de l'annonce à annuler
    pub fn confirm_withdraw_selected(&mut self) -> Option<String> {
        self.confirm_withdraw = false;
        self.selected_listing().map(|l| l.id.clone())
    }

    /// Action d'écriture réussie (offre, acceptation, retrait)
    pub fn action_succeeded(&mut self, message: &str) {
        self.notifications.success(message);
    }

    /// Action d'écriture refusée : message du serveur tel quel
    pub fn action_failed(&mut self, message: &str) {
        self.notifications.error(message);
    }

    // ------------------------------------------------------------------------
    // Recherches sauvegardées
    // ------------------------------------------------------------------------

    pub fn reload_saved_searches(&mut self, store: &LocalStore) {
        match store.get::<SavedSearches>() {
            Ok(searches) => self.saved_searches = searches.into_iter().map(|s| s.name).collect(),
            Err(e) => warn!(error = ?e, "Failed to read saved searches"),
        }
    }

    pub fn save_search(&mut self, store: &LocalStore, name: &str) {
        match store.save_search(name, &self.listing_filter) {
            Ok(()) => {
                info!(name, "Search saved");
                self.notifications.success(format!("Recherche \"{}\" sauvegardée", name.trim()));
                self.reload_saved_searches(store);
            }
            Err(e) => {
                error!(name, error = ?e, "Failed to save search");
                self.notifications.error(format!("{:#}", e));
            }
        }
    }

    pub fn load_search(&mut self, store: &LocalStore, name: &str, now: Instant) {
        match store.load_search(name) {
            Ok(Some(filter)) => {
                info!(name, "Search loaded");
                self.listing_filter = filter;
                self.filters_changed(ListKind::Listings, now);
                self.notifications.info(format!("Recherche \"{}\" chargée", name.trim()));
            }
            Ok(None) => {
                self.notifications.warning(format!("Aucune recherche nommée \"{}\"", name.trim()));
            }
            Err(e) => {
                error!(name, error = ?e, "Failed to load search");
                self.notifications.error(format!("{:#}", e));
            }
        }
    }

    pub fn delete_search(&mut self, store: &LocalStore, name: &str) {
        match store.delete_search(name) {
            Ok(true) => {
                self.notifications.info(format!("Recherche \"{}\" supprimée", name.trim()));
                self.reload_saved_searches(store);
            }
            Ok(false) => {
                self.notifications.warning(format!("Aucune recherche nommée \"{}\"", name.trim()));
            }
            Err(e) => {
                error!(name, error = ?e, "Failed to delete search");
                self.notifications.error(format!("{:#}", e));
            }
        }
    }

    // ========================================================================
    // Bundles, FAQ
    // ========================================================================

    pub fn apply_bundles(&mut self, bundles: Vec<Bundle>) {
        info!(count = bundles.len(), "Bundles updated");
        self.bundles = bundles;
        self.clamp_selections();
    }

    pub fn selected_bundle(&self) -> Option<&Bundle> {
        self.bundles.get(self.bundle_selected)
    }

    pub fn toggle_faq(&mut self) {
        self.faq.toggle(self.faq_selected);
    }

    // ========================================================================
    // Filtres
    // ========================================================================

    /// Liste concernée par les touches de filtre sur l'écran courant
    pub fn list_kind(&self) -> Option<ListKind> {
        match self.base_screen() {
            Screen::Deals | Screen::DealDetail => Some(ListKind::Deals),
            Screen::Market => Some(ListKind::Listings),
            _ => None,
        }
    }

    /// À appeler après toute modification d'un filtre
    ///
    /// - revient à la première page et au premier élément
    /// - signale la partie "serveur" au déclencheur (debounce + empreinte)
    pub fn filters_changed(&mut self, kind: ListKind, now: Instant) {
        match kind {
            ListKind::Deals => {
                self.deal_page.reset();
                self.deal_selected = 0;
                self.deal_query.on_change(self.deal_filter.server_query(), now);
            }
            ListKind::Listings => {
                self.listing_page.reset();
                self.listing_selected = 0;
                self.listing_query.on_change(self.listing_filter.server_query(), now);
            }
        }
    }

    /// Type suivant ("" = tous)
    pub fn cycle_type(&mut self, now: Instant) {
        let types: Vec<&str> = DealType::all().iter().map(|t| t.as_str()).collect();
        match self.list_kind() {
            Some(ListKind::Deals) => {
                self.deal_filter.deal_type = cycle_option(&self.deal_filter.deal_type, &types);
                self.filters_changed(ListKind::Deals, now);
            }
            Some(ListKind::Listings) => {
                self.listing_filter.deal_type = cycle_option(&self.listing_filter.deal_type, &types);
                self.filters_changed(ListKind::Listings, now);
            }
            None => {}
        }
    }

    /// Statut suivant ("" = tous)
    pub fn cycle_status(&mut self, now: Instant) {
        match self.list_kind() {
            Some(ListKind::Deals) => {
                let statuses: Vec<&str> = DealStatus::all().iter().map(|s| s.as_str()).collect();
                self.deal_filter.status = cycle_option(&self.deal_filter.status, &statuses);
                self.filters_changed(ListKind::Deals, now);
            }
            Some(ListKind::Listings) => {
                let statuses: Vec<&str> = ListingStatus::all().iter().map(|s| s.as_str()).collect();
                self.listing_filter.status = cycle_option(&self.listing_filter.status, &statuses);
                self.filters_changed(ListKind::Listings, now);
            }
            None => {}
        }
    }

    pub fn cycle_sort(&mut self, now: Instant) {
        match self.list_kind() {
            Some(ListKind::Deals) => {
                self.deal_filter.sort = self.deal_filter.sort.next();
                self.filters_changed(ListKind::Deals, now);
            }
            Some(ListKind::Listings) => {
                self.listing_filter.sort = self.listing_filter.sort.next();
                self.filters_changed(ListKind::Listings, now);
            }
            None => {}
        }
    }

    /// Bascule "watchlist seulement" / "favoris seulement"
    pub fn toggle_saved_only(&mut self, now: Instant) {
        match self.list_kind() {
            Some(ListKind::Deals) => {
                self.deal_filter.watchlist_only = !self.deal_filter.watchlist_only;
                self.filters_changed(ListKind::Deals, now);
            }
            Some(ListKind::Listings) => {
                self.listing_filter.favorites_only = !self.listing_filter.favorites_only;
                self.filters_changed(ListKind::Listings, now);
            }
            None => {}
        }
    }

    /// Révèle une page de plus
    pub fn show_more(&mut self) {
        match self.current_screen {
            Screen::Deals => self.deal_page.show_more(),
            Screen::Market => self.listing_page.show_more(),
            _ => {}
        }
    }

    // ========================================================================
    // Requêtes et temps
    // ========================================================================

    /// Premières requêtes au démarrage
    pub fn initial_requests(&mut self, now: Instant) -> Vec<QueryRequest> {
        self.last_refresh = now;
        vec![
            QueryRequest::Deals(self.deal_query.force(self.deal_filter.server_query())),
            QueryRequest::Listings(self.listing_query.force(self.listing_filter.server_query())),
        ]
    }

    /// Recharge la liste de l'écran courant, sans tenir compte de l'empreinte
    pub fn refresh(&mut self, now: Instant) -> Option<QueryRequest> {
        self.last_refresh = now;
        match self.list_kind()? {
            ListKind::Deals => Some(QueryRequest::Deals(
                self.deal_query.force(self.deal_filter.server_query()),
            )),
            ListKind::Listings => Some(QueryRequest::Listings(
                self.listing_query.force(self.listing_filter.server_query()),
            )),
        }
    }

    /// Tick : appelé à chaque itération de la boucle
    ///
    /// CONCEPT : Event Loop Pattern
    /// - expire les notifications
    /// - exécute la redirection programmée après un investissement
    /// - envoie les requêtes dont le debounce est écoulé
    /// - rafraîchit périodiquement la liste affichée
    pub fn tick(&mut self, now: Instant) -> Vec<QueryRequest> {
        self.notifications.expire(now);

        // Une saisie ouverte retarde la redirection jusqu'à sa fermeture
        if let Some(at) = self.redirect_at {
            if now >= at && self.input.is_none() {
                debug!("Redirecting to deals list after investment");
                self.redirect_at = None;
                self.invest_form = InvestForm::default();
                self.show_screen(Screen::Deals);
            }
        }

        let mut requests = Vec::new();
        if let Some(ticket) = self.deal_query.poll(now) {
            requests.push(QueryRequest::Deals(ticket));
        }
        if let Some(ticket) = self.listing_query.poll(now) {
            requests.push(QueryRequest::Listings(ticket));
        }

        if let Some(interval) = self.refresh_interval {
            if now.saturating_duration_since(self.last_refresh) >= interval && requests.is_empty() {
                if let Some(request) = self.refresh(now) {
                    debug!("Periodic refresh");
                    requests.push(request);
                }
            }
        }
        requests
    }

    /// Garde les index de sélection dans les bornes après un changement de liste
    fn clamp_selections(&mut self) {
        let deals = self.visible_deals().len();
        let listings = self.visible_listings().len();
        self.deal_selected = self.deal_selected.min(deals.saturating_sub(1));
        self.listing_selected = self.listing_selected.min(listings.saturating_sub(1));
        self.bundle_selected = self.bundle_selected.min(self.bundles.len().saturating_sub(1));
    }

    // ========================================================================
    // Confirmation de quit, chargement
    // ========================================================================

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    pub fn start_loading(&mut self, message: Option<String>) {
        self.is_loading = true;
        self.loading_message = message;
    }

    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.loading_message = None;
    }

    // ========================================================================
    // Input Mode Management
    // ========================================================================

    /// Entre en mode saisie pour un champ
    ///
    /// Les champs de filtre sont édités en place : la liste se met à jour
    /// pendant la frappe, ESC restaure la valeur d'origine.
    pub fn start_input(&mut self, field: InputField) {
        if self.input.is_some() {
            return;
        }
        self.input_buffer.clear();
        let original = self.input_target(field).clone();
        self.input = Some(InputState {
            field,
            original,
            return_to: self.current_screen,
        });
        self.current_screen = Screen::Input;
    }

    pub fn input_field(&self) -> Option<InputField> {
        self.input.as_ref().map(|i| i.field)
    }

    /// Valeur en cours de saisie
    pub fn input_value(&self) -> &str {
        match self.input_field() {
            Some(InputField::DealSearch) => &self.deal_filter.search,
            Some(InputField::DealMinPrice) => &self.deal_filter.min_price,
            Some(InputField::DealMaxPrice) => &self.deal_filter.max_price,
            Some(InputField::ListingSearch) => &self.listing_filter.search,
            Some(InputField::ListingMinPrice) => &self.listing_filter.min_price,
            Some(InputField::ListingMaxPrice) => &self.listing_filter.max_price,
            Some(InputField::InvestAmount) => &self.invest_form.amount_input,
            Some(InputField::OfferPrice) => &self.offer_form.price_input,
            Some(InputField::SaveSearch | InputField::LoadSearch | InputField::DeleteSearch)
            | None => &self.input_buffer,
        }
    }

    fn input_target(&mut self, field: InputField) -> &mut String {
        match field {
            InputField::DealSearch => &mut self.deal_filter.search,
            InputField::DealMinPrice => &mut self.deal_filter.min_price,
            InputField::DealMaxPrice => &mut self.deal_filter.max_price,
            InputField::ListingSearch => &mut self.listing_filter.search,
            InputField::ListingMinPrice => &mut self.listing_filter.min_price,
            InputField::ListingMaxPrice => &mut self.listing_filter.max_price,
            InputField::InvestAmount => &mut self.invest_form.amount_input,
            InputField::OfferPrice => &mut self.offer_form.price_input,
            InputField::SaveSearch | InputField::LoadSearch | InputField::DeleteSearch => {
                &mut self.input_buffer
            }
        }
    }

    /// Ajoute un caractère au champ en cours
    pub fn append_char(&mut self, c: char, now: Instant) {
        let Some(field) = self.input_field() else { return };
        self.input_target(field).push(c);
        if let Some(kind) = field.filter_kind() {
            self.filters_changed(kind, now);
        }
    }

    /// Supprime le dernier caractère du champ en cours
    pub fn backspace(&mut self, now: Instant) {
        let Some(field) = self.input_field() else { return };
        self.input_target(field).pop();
        if let Some(kind) = field.filter_kind() {
            self.filters_changed(kind, now);
        }
    }

    /// Annule la saisie : restaure la valeur d'origine
    pub fn cancel_input(&mut self, now: Instant) {
        let Some(input) = self.input.take() else { return };
        *self.input_target(input.field) = input.original;
        if let Some(kind) = input.field.filter_kind() {
            self.filters_changed(kind, now);
        }
        self.input_buffer.clear();
        self.current_screen = input.return_to;
    }

    /// Valide la saisie
    ///
    /// Une saisie d'investissement ou d'offre invalide laisse le mode saisie
    /// ouvert (l'avertissement est affiché, rien n'est envoyé).
    pub fn submit_input(&mut self) -> Submitted {
        let Some(field) = self.input_field() else { return Submitted::Nothing };

        let submitted = match field {
            InputField::InvestAmount => match self.submit_invest() {
                Some((spv_id, amount)) => Submitted::Invest { spv_id, amount },
                None => return Submitted::Nothing,
            },
            InputField::OfferPrice => match self.submit_offer() {
                Some((listing_id, offer_price)) => Submitted::Offer { listing_id, offer_price },
                None => return Submitted::Nothing,
            },
            InputField::SaveSearch => Submitted::SaveSearch(self.input_buffer.trim().to_string()),
            InputField::LoadSearch => Submitted::LoadSearch(self.input_buffer.trim().to_string()),
            InputField::DeleteSearch => Submitted::DeleteSearch(self.input_buffer.trim().to_string()),
            _ => Submitted::Nothing,
        };

        if let Some(input) = self.input.take() {
            self.current_screen = input.return_to;
        }
        self.input_buffer.clear();
        submitted
    }

    pub fn is_in_input_mode(&self) -> bool {
        self.current_screen == Screen::Input
    }
}

/// Passe à l'option suivante ; après la dernière, revient à "" (tous)
fn cycle_option(current: &str, options: &[&str]) -> String {
    let current = current.trim();
    if current.is_empty() {
        return options.first().map(|s| s.to_string()).unwrap_or_default();
    }
    match options.iter().position(|o| o.eq_ignore_ascii_case(current)) {
        Some(i) if i + 1 < options.len() => options[i + 1].to_string(),
        _ => String::new(),
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(12, Duration::from_millis(400), Some(Duration::from_secs(60)))
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DealSummary, InvestmentRef, Offer, Seller, Spv};
    use crate::notify::Level;

    fn deal(id: &str, status: DealStatus, min_ticket: f64) -> Deal {
        let mut deal = Deal::new(id, format!("Deal {}", id), DealType::RealEstate);
        deal.status = status;
        deal.min_ticket = Some(min_ticket);
        deal.expected_roi = Some(12.0);
        deal.spv = Some(Spv {
            id: format!("spv-{}", id),
            total_shares: Some(1000.0),
            issued_shares: Some(100.0),
            share_price: Some(100.0),
        });
        deal
    }

    fn listing(id: &str, total: f64) -> SecondaryListing {
        SecondaryListing {
            id: id.to_string(),
            seller: Seller { id: None, name: "Sara".to_string() },
            investment: InvestmentRef {
                id: format!("inv-{}", id),
                deal: DealSummary {
                    id: "d1".to_string(),
                    title: format!("Listing {}", id),
                    deal_type: DealType::Franchise,
                    location: None,
                    expected_roi: Some(9.0),
                    share_price: Some(100.0),
                },
            },
            shares_for_sale: 10.0,
            price_per_share: Some(total / 10.0),
            total_price: Some(total),
            status: ListingStatus::Active,
            created_at: None,
            offers: vec![Offer {
                id: format!("offer-{}", id),
                buyer: Some("Omar".to_string()),
                offer_price: total * 0.9,
                status: "pending".to_string(),
            }],
        }
    }

    /// App avec deals et annonces déjà chargés (génération 1)
    fn loaded_app() -> (App, Instant) {
        let now = Instant::now();
        let mut app = App::new(2, Duration::from_millis(400), None);
        let requests = app.initial_requests(now);
        assert_eq!(requests.len(), 2);

        app.apply_deals(
            1,
            vec![
                deal("a", DealStatus::Open, 500.0),
                deal("b", DealStatus::Funded, 1_000.0),
                deal("c", DealStatus::Open, 250.0),
            ],
        );
        app.apply_listings(1, vec![listing("l1", 1_000.0), listing("l2", 2_000.0)]);
        (app, now)
    }

    #[test]
    fn test_app_creation() {
        let app = App::default();
        assert!(app.is_running());
        assert_eq!(app.current_screen, Screen::Deals);
        assert!(app.deals.is_empty());
    }

    #[test]
    fn test_app_quit() {
        let mut app = App::default();
        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        app.quit();
        assert!(!app.is_running());
    }

    #[test]
    fn test_navigation_is_bounded_by_visible_page() {
        let (mut app, _) = loaded_app();

        // page_size = 2 : seuls 2 deals visibles
        assert_eq!(app.visible_deals().len(), 2);
        app.navigate_down();
        app.navigate_down();
        assert_eq!(app.deal_selected, 1);

        app.show_more();
        app.navigate_down();
        assert_eq!(app.deal_selected, 2);

        app.navigate_up();
        app.navigate_up();
        app.navigate_up();
        assert_eq!(app.deal_selected, 0);
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let (mut app, now) = loaded_app();

        // Nouveau filtre serveur -> génération 2
        app.cycle_status(now);
        let requests = app.tick(now + Duration::from_millis(500));
        assert!(matches!(requests.as_slice(), [QueryRequest::Deals(t)] if t.generation == 2));

        // La réponse lente de la génération 1 arrive après : ignorée
        assert!(!app.apply_deals(1, vec![deal("old", DealStatus::Closed, 1.0)]));
        assert_eq!(app.deals.len(), 3);

        assert!(app.apply_deals(2, vec![deal("a", DealStatus::Open, 500.0)]));
        assert_eq!(app.deals.len(), 1);
    }

    #[test]
    fn test_failed_fetch_keeps_previous_list() {
        let (mut app, _) = loaded_app();
        app.deals_failed(1, "boom");
        assert_eq!(app.deals.len(), 3);
        assert_eq!(app.notifications.front().map(|n| n.level), Some(Level::Error));
    }

    #[test]
    fn test_search_is_client_side_only() {
        let (mut app, now) = loaded_app();
        app.start_input(InputField::DealSearch);
        app.append_char('c', now);
        assert_eq!(app.filtered_deals().len(), 1);

        // Même empreinte serveur : aucun re-fetch après le debounce
        assert!(app.tick(now + Duration::from_secs(1)).is_empty());

        // ESC restaure la recherche d'origine
        app.cancel_input(now);
        assert_eq!(app.deal_filter.search, "");
        assert_eq!(app.current_screen, Screen::Deals);
    }

    #[test]
    fn test_price_bound_typing_is_debounced() {
        let (mut app, now) = loaded_app();
        app.start_input(InputField::DealMinPrice);
        app.append_char('5', now);
        app.append_char('0', now + Duration::from_millis(100));
        app.append_char('0', now + Duration::from_millis(200));

        assert!(app.tick(now + Duration::from_millis(300)).is_empty());
        let requests = app.tick(now + Duration::from_millis(700));
        match requests.as_slice() {
            [QueryRequest::Deals(ticket)] => assert_eq!(ticket.query.min_price, Some(500.0)),
            other => panic!("expected one deals request, got {:?}", other),
        }
    }

    #[test]
    fn test_invest_below_minimum_is_not_submitted() {
        let (mut app, _) = loaded_app();
        assert_eq!(app.open_selected_deal().as_deref(), Some("a"));
        app.apply_balance(WalletBalance::new(10_000.0));

        app.start_invest();
        for c in "400".chars() {
            app.append_char(c, Instant::now());
        }
        assert_eq!(app.submit_input(), Submitted::Nothing);
        assert!(app.is_in_input_mode());
        assert_eq!(app.notifications.front().map(|n| n.level), Some(Level::Warning));
    }

    #[test]
    fn test_invest_success_redirects_after_delay() {
        let (mut app, now) = loaded_app();
        app.open_selected_deal();
        app.apply_balance(WalletBalance::new(10_000.0));
        app.start_invest();
        for c in "1,500".chars() {
            app.append_char(c, now);
        }

        assert_eq!(
            app.submit_input(),
            Submitted::Invest { spv_id: "spv-a".to_string(), amount: 1_500.0 }
        );
        assert_eq!(app.current_screen, Screen::DealDetail);
        assert!(app.submitting);

        let receipt = Receipt { id: Some("inv-1".to_string()), message: None };
        app.invest_succeeded(&receipt, now);
        app.tick(now + Duration::from_secs(1));
        assert_eq!(app.current_screen, Screen::DealDetail);

        app.tick(now + REDIRECT_DELAY);
        assert_eq!(app.current_screen, Screen::Deals);
    }

    #[test]
    fn test_redirect_survives_open_input() {
        let (mut app, now) = loaded_app();
        app.open_selected_deal();
        app.apply_balance(WalletBalance::new(10_000.0));
        app.start_invest();
        for c in "1500".chars() {
            app.append_char(c, now);
        }
        assert!(matches!(app.submit_input(), Submitted::Invest { .. }));
        app.invest_succeeded(&Receipt { id: None, message: None }, now);

        // Pendant la fenêtre de redirection, 'i' n'ouvre plus de saisie
        app.start_invest();
        assert!(!app.is_in_input_mode());

        // Une saisie ouverte autrement retarde la redirection sans l'annuler
        app.start_input(InputField::InvestAmount);
        app.tick(now + REDIRECT_DELAY);
        assert_eq!(app.current_screen, Screen::Input);
        assert!(app.redirect_at.is_some());

        app.cancel_input(now + REDIRECT_DELAY);
        app.tick(now + Duration::from_secs(6));
        assert_eq!(app.current_screen, Screen::Deals);
        assert!(app.redirect_at.is_none());
    }

    #[test]
    fn test_closed_deal_cannot_be_invested() {
        let (mut app, _) = loaded_app();
        app.navigate_down();
        app.open_selected_deal();
        app.start_invest();
        assert!(!app.is_in_input_mode());
    }

    #[test]
    fn test_detail_for_other_deal_is_dropped() {
        let (mut app, _) = loaded_app();
        app.open_selected_deal();
        assert!(!app.apply_deal_detail(deal("b", DealStatus::Open, 1.0)));

        let mut fresh = deal("a", DealStatus::Open, 750.0);
        fresh.raised_amount = Some(42.0);
        assert!(app.apply_deal_detail(fresh));
        assert_eq!(app.invest_form.min_ticket, Some(750.0));
    }

    #[test]
    fn test_offer_keeps_exact_price() {
        let (mut app, now) = loaded_app();
        app.show_screen(Screen::Market);
        app.start_offer();
        for c in "1000.25".chars() {
            app.append_char(c, now);
        }
        let listing_id = app.selected_listing().map(|l| l.id.clone());
        assert_eq!(
            app.submit_input(),
            Submitted::Offer { listing_id: listing_id.unwrap(), offer_price: 1000.25 }
        );
    }

    #[test]
    fn test_compare_is_capped() {
        let (mut app, _) = loaded_app();
        app.show_screen(Screen::Market);
        app.toggle_compare();
        app.navigate_down();
        app.toggle_compare();
        assert_eq!(app.compared_listings().len(), 2);

        app.toggle_compare();
        assert_eq!(app.comparison.len(), 1);
    }

    #[test]
    fn test_watchlist_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        let (mut app, now) = loaded_app();

        app.toggle_watchlist(&store);
        assert!(app.watchlist.contains("a"));

        let mut reopened = App::default();
        reopened.load_local_state(&LocalStore::open(dir.path()).unwrap());
        assert!(reopened.watchlist.contains("a"));

        app.toggle_saved_only(now);
        assert_eq!(app.filtered_deals().len(), 1);
    }

    #[test]
    fn test_saved_search_roundtrip_through_app() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        let (mut app, now) = loaded_app();
        app.show_screen(Screen::Market);

        app.listing_filter.min_price = "1000".to_string();
        app.save_search(&store, "High ROI");
        assert_eq!(app.saved_searches, vec!["High ROI".to_string()]);

        app.listing_filter = ListingFilter::default();
        app.load_search(&store, "High ROI", now);
        assert_eq!(app.listing_filter.min_price, "1000");
        assert_eq!(app.filtered_listings().len(), 2);
    }

    #[test]
    fn test_withdraw_two_step() {
        let (mut app, _) = loaded_app();
        app.show_screen(Screen::Market);
        app.request_withdraw();
        assert!(app.is_awaiting_withdraw_confirmation());
        assert_eq!(app.confirm_withdraw_selected().as_deref(), Some("l1"));
        assert!(!app.is_awaiting_withdraw_confirmation());
        assert_eq!(app.selected_pending_offer().as_deref(), Some("offer-l1"));
    }

    #[test]
    fn test_cycle_option() {
        let options = ["open", "funded"];
        assert_eq!(cycle_option("", &options), "open");
        assert_eq!(cycle_option("open", &options), "funded");
        assert_eq!(cycle_option("funded", &options), "");
    }

    #[test]
    fn test_periodic_refresh() {
        let now = Instant::now();
        let mut app = App::new(12, Duration::from_millis(400), Some(Duration::from_secs(60)));
        app.initial_requests(now);

        assert!(app.tick(now + Duration::from_secs(30)).is_empty());
        let requests = app.tick(now + Duration::from_secs(61));
        assert!(matches!(requests.as_slice(), [QueryRequest::Deals(t)] if t.generation == 2));
    }
}
