// ============================================================================
// Filtres et tri côté client
// ============================================================================
// Les listes (deals, annonces) sont déjà en mémoire : on les filtre puis on
// les trie à chaque changement de filtre, sans refaire d'appel réseau
//
// CONCEPTS RUST :
// 1. Lifetimes : apply() retourne des références vers la liste source
//    (Vec<&'a T>), aucune copie des deals
// 2. Iterator chaining : filter -> collect -> sort_by
// 3. Ordering : comparaison de f64 avec total_cmp (pas de panic sur NaN)
// ============================================================================

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{Deal, SecondaryListing};

// ============================================================================
// Helpers communs
// ============================================================================

/// Parse une borne de prix saisie par l'utilisateur
///
/// Une chaîne vide ou non numérique est ignorée (borne non définie).
pub fn parse_bound(input: &str) -> Option<f64> {
    let trimmed = input.trim().replace(',', "");
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Vérifie qu'une valeur respecte les bornes
///
/// Une valeur inconnue est exclue dès qu'une borne est définie : on ne peut
/// pas affirmer qu'elle la respecte.
fn within_bounds(value: Option<f64>, min: Option<f64>, max: Option<f64>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    match value {
        Some(v) => min.map_or(true, |m| v >= m) && max.map_or(true, |m| v <= m),
        None => false,
    }
}

/// Recherche textuelle insensible à la casse sur plusieurs champs
fn text_matches(needle: &str, haystacks: &[Option<&str>]) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    haystacks
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Égalité sur le nom du fil ("" = pas de filtre)
fn enum_matches(wanted: &str, actual: &str) -> bool {
    let wanted = wanted.trim();
    wanted.is_empty() || wanted.eq_ignore_ascii_case(actual)
}

/// Compare deux valeurs optionnelles, les inconnues toujours en dernier
///
/// CONCEPT RUST : match sur un tuple
/// - Permet de traiter les 4 combinaisons Some/None d'un coup
fn cmp_known_first(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => {
            if descending {
                y.total_cmp(&x)
            } else {
                x.total_cmp(&y)
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ============================================================================
// Partie "serveur" d'un filtre
// ============================================================================

/// Filtres que l'API sait appliquer elle-même (type, statut, prix)
///
/// Un changement de ces champs déclenche un nouvel appel réseau. Les autres
/// champs (recherche texte, favoris, tri) sont recalculés localement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerQuery {
    pub deal_type: Option<String>,
    pub status: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ServerQuery {
    /// Empreinte stable de la requête
    ///
    /// Deux filtres qui produisent la même requête HTTP ont la même empreinte
    /// (espaces, casse et format des nombres normalisés).
    pub fn fingerprint(&self) -> String {
        let bound = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        format!(
            "type={};status={};min={};max={}",
            self.deal_type.as_deref().unwrap_or(""),
            self.status.as_deref().unwrap_or(""),
            bound(self.min_price),
            bound(self.max_price),
        )
    }

    /// Paramètres de query string (seulement les champs définis)
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(t) = &self.deal_type {
            pairs.push(("type", t.clone()));
        }
        if let Some(s) = &self.status {
            pairs.push(("status", s.clone()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("min_price", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("max_price", max.to_string()));
        }
        pairs
    }
}

fn normalized(value: &str) -> Option<String> {
    let value = value.trim().to_ascii_lowercase();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

// ============================================================================
// Deals
// ============================================================================

/// Ordre d'affichage des deals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealSort {
    /// Ordre renvoyé par le serveur
    #[default]
    Default,
    Progress,
    Roi,
    MinTicket,
    Target,
}

impl DealSort {
    pub fn label(&self) -> &'static str {
        match self {
            DealSort::Default => "featured",
            DealSort::Progress => "funding progress",
            DealSort::Roi => "expected ROI",
            DealSort::MinTicket => "min ticket",
            DealSort::Target => "target size",
        }
    }

    /// Cycle : Default → Progress → Roi → MinTicket → Target → Default
    pub fn next(&self) -> Self {
        match self {
            DealSort::Default => DealSort::Progress,
            DealSort::Progress => DealSort::Roi,
            DealSort::Roi => DealSort::MinTicket,
            DealSort::MinTicket => DealSort::Target,
            DealSort::Target => DealSort::Default,
        }
    }

    fn compare(&self, a: &Deal, b: &Deal) -> Ordering {
        match self {
            DealSort::Default => Ordering::Equal,
            DealSort::Progress => cmp_known_first(a.funding_progress(), b.funding_progress(), true),
            DealSort::Roi => cmp_known_first(a.expected_roi, b.expected_roi, true),
            DealSort::MinTicket => cmp_known_first(a.min_ticket, b.min_ticket, false),
            DealSort::Target => cmp_known_first(a.target_amount, b.target_amount, true),
        }
    }
}

/// Filtre de la page de deals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DealFilter {
    pub search: String,
    pub deal_type: String,
    pub status: String,
    /// Borne basse sur le ticket minimum (chaîne saisie)
    pub min_price: String,
    pub max_price: String,
    pub watchlist_only: bool,
    pub sort: DealSort,
}

impl DealFilter {
    pub fn server_query(&self) -> ServerQuery {
        ServerQuery {
            deal_type: normalized(&self.deal_type),
            status: normalized(&self.status),
            min_price: parse_bound(&self.min_price),
            max_price: parse_bound(&self.max_price),
        }
    }

    pub fn matches(&self, deal: &Deal, watchlist: &BTreeSet<String>) -> bool {
        if self.watchlist_only && !watchlist.contains(&deal.id) {
            return false;
        }

        text_matches(&self.search, &[Some(deal.title.as_str()), deal.location.as_deref()])
            && enum_matches(&self.deal_type, deal.deal_type.as_str())
            && enum_matches(&self.status, deal.status.as_str())
            && within_bounds(
                deal.min_ticket,
                parse_bound(&self.min_price),
                parse_bound(&self.max_price),
            )
    }

    /// Filtre puis trie la liste source
    pub fn apply<'a>(&self, deals: &'a [Deal], watchlist: &BTreeSet<String>) -> Vec<&'a Deal> {
        let mut result: Vec<&Deal> = deals
            .iter()
            .filter(|deal| self.matches(deal, watchlist))
            .collect();

        // sort_by est stable : à égalité, l'ordre du serveur est conservé
        result.sort_by(|a, b| self.sort.compare(a, b));
        result
    }
}

// ============================================================================
// Annonces du marché secondaire
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Roi,
    Discount,
}

impl ListingSort {
    pub fn label(&self) -> &'static str {
        match self {
            ListingSort::Newest => "newest",
            ListingSort::PriceAsc => "price ↑",
            ListingSort::PriceDesc => "price ↓",
            ListingSort::Roi => "expected ROI",
            ListingSort::Discount => "discount",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ListingSort::Newest => ListingSort::PriceAsc,
            ListingSort::PriceAsc => ListingSort::PriceDesc,
            ListingSort::PriceDesc => ListingSort::Roi,
            ListingSort::Roi => ListingSort::Discount,
            ListingSort::Discount => ListingSort::Newest,
        }
    }

    fn compare(&self, a: &SecondaryListing, b: &SecondaryListing) -> Ordering {
        match self {
            ListingSort::Newest => match (a.created_at, b.created_at) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            ListingSort::PriceAsc => cmp_known_first(a.total_price, b.total_price, false),
            ListingSort::PriceDesc => cmp_known_first(a.total_price, b.total_price, true),
            ListingSort::Roi => cmp_known_first(
                a.investment.deal.expected_roi,
                b.investment.deal.expected_roi,
                true,
            ),
            ListingSort::Discount => cmp_known_first(a.discount_percent(), b.discount_percent(), true),
        }
    }
}

/// Filtre de la page marché secondaire (c'est lui qu'on sauvegarde)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingFilter {
    pub search: String,
    pub deal_type: String,
    pub status: String,
    /// Borne basse sur le prix total de l'annonce
    pub min_price: String,
    pub max_price: String,
    pub favorites_only: bool,
    pub sort: ListingSort,
}

impl ListingFilter {
    pub fn server_query(&self) -> ServerQuery {
        ServerQuery {
            deal_type: normalized(&self.deal_type),
            status: normalized(&self.status),
            min_price: parse_bound(&self.min_price),
            max_price: parse_bound(&self.max_price),
        }
    }

    pub fn matches(&self, listing: &SecondaryListing, favorites: &BTreeSet<String>) -> bool {
        if self.favorites_only && !favorites.contains(&listing.id) {
            return false;
        }

        let deal = &listing.investment.deal;
        text_matches(
            &self.search,
            &[Some(deal.title.as_str()), deal.location.as_deref(), Some(listing.seller.name.as_str())],
        ) && enum_matches(&self.deal_type, deal.deal_type.as_str())
            && enum_matches(&self.status, listing.status.as_str())
            && within_bounds(
                listing.total_price,
                parse_bound(&self.min_price),
                parse_bound(&self.max_price),
            )
    }

    pub fn apply<'a>(
        &self,
        listings: &'a [SecondaryListing],
        favorites: &BTreeSet<String>,
    ) -> Vec<&'a SecondaryListing> {
        let mut result: Vec<&SecondaryListing> = listings
            .iter()
            .filter(|listing| self.matches(listing, favorites))
            .collect();
        result.sort_by(|a, b| self.sort.compare(a, b));
        result
    }

    /// Nombre de critères actifs (affiché dans l'en-tête)
    pub fn active_count(&self) -> usize {
        [
            !self.search.trim().is_empty(),
            !self.deal_type.trim().is_empty(),
            !self.status.trim().is_empty(),
            parse_bound(&self.min_price).is_some(),
            parse_bound(&self.max_price).is_some(),
            self.favorites_only,
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DealStatus, DealSummary, DealType, InvestmentRef, ListingStatus, Seller,
    };
    use chrono::{TimeZone, Utc};

    fn deal(id: &str, status: DealStatus, min_ticket: Option<f64>, roi: Option<f64>) -> Deal {
        let mut d = Deal::new(id, format!("Deal {}", id), DealType::RealEstate);
        d.status = status;
        d.min_ticket = min_ticket;
        d.expected_roi = roi;
        d.location = Some("Dubai Marina".to_string());
        d
    }

    fn listing(id: &str, total: Option<f64>, day: u32) -> SecondaryListing {
        SecondaryListing {
            id: id.to_string(),
            seller: Seller { id: None, name: "Omar".to_string() },
            investment: InvestmentRef {
                id: format!("inv-{}", id),
                deal: DealSummary {
                    id: "d1".to_string(),
                    title: format!("Listing {}", id),
                    deal_type: DealType::Franchise,
                    location: None,
                    expected_roi: None,
                    share_price: Some(100.0),
                },
            },
            shares_for_sale: 10.0,
            price_per_share: total.map(|t| t / 10.0),
            total_price: total,
            status: ListingStatus::Active,
            created_at: Some(Utc.with_ymd_and_hms(2026, 1, day, 0, 0, 0).unwrap()),
            offers: Vec::new(),
        }
    }

    #[test]
    fn test_status_filter_keeps_only_open_deals() {
        let deals = vec![
            deal("1", DealStatus::Open, Some(500.0), None),
            deal("2", DealStatus::Funded, Some(500.0), None),
            deal("3", DealStatus::Open, Some(500.0), None),
            deal("4", DealStatus::Exited, Some(500.0), None),
        ];
        let filter = DealFilter { status: "open".to_string(), ..Default::default() };

        let result = filter.apply(&deals, &BTreeSet::new());
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|d| d.status == DealStatus::Open));
    }

    #[test]
    fn test_text_search_is_case_insensitive() {
        let deals = vec![deal("1", DealStatus::Open, None, None)];
        let filter = DealFilter { search: "MARINA".to_string(), ..Default::default() };
        assert_eq!(filter.apply(&deals, &BTreeSet::new()).len(), 1);

        let filter = DealFilter { search: "riyadh".to_string(), ..Default::default() };
        assert!(filter.apply(&deals, &BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_price_bounds_exclude_unknown_values() {
        let deals = vec![
            deal("1", DealStatus::Open, Some(500.0), None),
            deal("2", DealStatus::Open, Some(5_000.0), None),
            deal("3", DealStatus::Open, None, None),
        ];

        let filter = DealFilter { min_price: "1,000".to_string(), ..Default::default() };
        let ids: Vec<_> = filter.apply(&deals, &BTreeSet::new()).iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["2"]);

        // Borne illisible : ignorée
        let filter = DealFilter { min_price: "abc".to_string(), ..Default::default() };
        assert_eq!(filter.apply(&deals, &BTreeSet::new()).len(), 3);
    }

    #[test]
    fn test_watchlist_only() {
        let deals = vec![
            deal("1", DealStatus::Open, None, None),
            deal("2", DealStatus::Open, None, None),
        ];
        let watchlist: BTreeSet<String> = ["2".to_string()].into_iter().collect();
        let filter = DealFilter { watchlist_only: true, ..Default::default() };

        let result = filter.apply(&deals, &watchlist);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "2");
    }

    #[test]
    fn test_sort_by_roi_puts_unknown_last_and_keeps_ties_in_order() {
        let deals = vec![
            deal("a", DealStatus::Open, None, None),
            deal("b", DealStatus::Open, None, Some(8.0)),
            deal("c", DealStatus::Open, None, Some(12.0)),
            deal("d", DealStatus::Open, None, Some(8.0)),
        ];
        let filter = DealFilter { sort: DealSort::Roi, ..Default::default() };
        let ids: Vec<_> = filter.apply(&deals, &BTreeSet::new()).iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "d", "a"]);
    }

    #[test]
    fn test_listing_sort_and_price_filter() {
        let listings = vec![
            listing("1", Some(900.0), 1),
            listing("2", Some(1_500.0), 3),
            listing("3", Some(1_200.0), 2),
        ];

        let filter = ListingFilter { sort: ListingSort::Newest, ..Default::default() };
        let ids: Vec<_> = filter.apply(&listings, &BTreeSet::new()).iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);

        let filter = ListingFilter {
            min_price: "1000".to_string(),
            sort: ListingSort::PriceAsc,
            ..Default::default()
        };
        let ids: Vec<_> = filter.apply(&listings, &BTreeSet::new()).iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2"]);
    }

    #[test]
    fn test_fingerprint_ignores_client_side_fields() {
        let a = ListingFilter { status: " Active ".to_string(), min_price: "1000".to_string(), ..Default::default() };
        let b = ListingFilter {
            status: "active".to_string(),
            min_price: "1000.0".to_string(),
            search: "flat".to_string(),
            sort: ListingSort::Discount,
            favorites_only: true,
            ..Default::default()
        };
        assert_eq!(a.server_query().fingerprint(), b.server_query().fingerprint());

        let c = ListingFilter { status: "sold".to_string(), ..Default::default() };
        assert_ne!(a.server_query().fingerprint(), c.server_query().fingerprint());
    }

    #[test]
    fn test_query_pairs() {
        let filter = DealFilter {
            deal_type: "franchise".to_string(),
            max_price: "2500".to_string(),
            ..Default::default()
        };
        assert_eq!(
            filter.server_query().to_query_pairs(),
            vec![("type", "franchise".to_string()), ("max_price", "2500".to_string())]
        );
    }

    #[test]
    fn test_active_count() {
        let filter = ListingFilter {
            search: "flat".to_string(),
            min_price: "1000".to_string(),
            favorites_only: true,
            ..Default::default()
        };
        assert_eq!(filter.active_count(), 3);
    }
}
