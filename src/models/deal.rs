// ============================================================================
// Structure : Deal
// ============================================================================
// Représente une opportunité d'investissement fractionné (immobilier,
// franchise, startup...) telle que renvoyée par l'API OWNLY
//
// CONCEPTS RUST :
// 1. Enums "fermés" avec un variant Other : l'API peut évoluer sans casser
//    le client
// 2. Option<f64> : une valeur numérique absente reste "inconnue", elle n'est
//    jamais convertie silencieusement en 0
// 3. Snapshot : le client ne modifie jamais un Deal, il l'affiche
// ============================================================================

use chrono::{DateTime, Utc};

use crate::metrics;

/// Catégorie d'actif d'un deal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DealType {
    RealEstate,  // Immobilier
    Franchise,   // Franchise
    Startup,     // Startup
    Asset,       // Actif physique (véhicule, équipement...)
    Other,       // Type inconnu de ce client
}

impl DealType {
    /// Nom utilisé sur le fil (query string, JSON)
    pub fn as_str(&self) -> &'static str {
        match self {
            DealType::RealEstate => "real_estate",
            DealType::Franchise => "franchise",
            DealType::Startup => "startup",
            DealType::Asset => "asset",
            DealType::Other => "other",
        }
    }

    /// Convertit le nom du fil en DealType (les valeurs inconnues -> Other)
    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "real_estate" | "realestate" | "real-estate" => DealType::RealEstate,
            "franchise" => DealType::Franchise,
            "startup" => DealType::Startup,
            "asset" => DealType::Asset,
            _ => DealType::Other,
        }
    }

    /// Label lisible pour l'affichage
    pub fn label(&self) -> &'static str {
        match self {
            DealType::RealEstate => "Real Estate",
            DealType::Franchise => "Franchise",
            DealType::Startup => "Startup",
            DealType::Asset => "Asset",
            DealType::Other => "Other",
        }
    }

    /// Types proposés dans les filtres (cycle avec la touche 't')
    pub fn all() -> Vec<DealType> {
        vec![
            DealType::RealEstate,
            DealType::Franchise,
            DealType::Startup,
            DealType::Asset,
        ]
    }
}

/// Statut d'un deal
///
/// Les transitions (open → funding → funded → closed/exited) sont garanties
/// par le backend, le client se contente de les afficher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DealStatus {
    Open,
    Funding,
    Funded,
    Closed,
    Exited,
    Other,
}

impl DealStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStatus::Open => "open",
            DealStatus::Funding => "funding",
            DealStatus::Funded => "funded",
            DealStatus::Closed => "closed",
            DealStatus::Exited => "exited",
            DealStatus::Other => "other",
        }
    }

    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => DealStatus::Open,
            "funding" => DealStatus::Funding,
            "funded" => DealStatus::Funded,
            "closed" => DealStatus::Closed,
            "exited" => DealStatus::Exited,
            _ => DealStatus::Other,
        }
    }

    /// Un deal accepte encore des investissements
    pub fn accepts_investments(&self) -> bool {
        matches!(self, DealStatus::Open | DealStatus::Funding)
    }

    pub fn all() -> Vec<DealStatus> {
        vec![
            DealStatus::Open,
            DealStatus::Funding,
            DealStatus::Funded,
            DealStatus::Closed,
            DealStatus::Exited,
        ]
    }
}

/// Special Purpose Vehicle : entité qui détient l'actif et émet les parts
#[derive(Debug, Clone, PartialEq)]
pub struct Spv {
    pub id: String,
    pub total_shares: Option<f64>,
    pub issued_shares: Option<f64>,
    pub share_price: Option<f64>,
}

impl Spv {
    /// Parts encore disponibles à l'émission
    pub fn shares_available(&self) -> Option<f64> {
        metrics::shares_available(self.total_shares, self.issued_shares)
    }
}

/// Un deal tel que renvoyé par GET /deals
#[derive(Debug, Clone, PartialEq)]
pub struct Deal {
    pub id: String,
    pub title: String,
    pub deal_type: DealType,
    pub location: Option<String>,
    pub min_ticket: Option<f64>,
    pub target_amount: Option<f64>,
    pub raised_amount: Option<f64>,
    pub investor_count: Option<u64>,
    pub expected_roi: Option<f64>,
    pub expected_irr: Option<f64>,
    pub holding_period_months: Option<u32>,
    pub status: DealStatus,
    pub images: Vec<String>,
    pub spv: Option<Spv>,

    /// Date de clôture de la levée (compte à rebours)
    pub closing_date: Option<DateTime<Utc>>,
}

impl Deal {
    /// Constructeur minimal, utilisé surtout par les tests
    pub fn new(id: impl Into<String>, title: impl Into<String>, deal_type: DealType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            deal_type,
            location: None,
            min_ticket: None,
            target_amount: None,
            raised_amount: None,
            investor_count: None,
            expected_roi: None,
            expected_irr: None,
            holding_period_months: None,
            status: DealStatus::Open,
            images: Vec::new(),
            spv: None,
            closing_date: None,
        }
    }

    /// Progression de la levée en pourcentage (peut dépasser 100)
    pub fn funding_progress(&self) -> Option<f64> {
        metrics::funding_progress(self.raised_amount, self.target_amount)
    }

    /// Identifiant de SPV à utiliser pour investir
    pub fn spv_id(&self) -> Option<&str> {
        self.spv.as_ref().map(|spv| spv.id.as_str())
    }

    /// Formatte le deal pour une ligne de liste
    ///
    /// Format : "Marina Flat      Real Estate  Dubai        8.5%   62.0%"
    pub fn display(&self) -> String {
        let title = truncate(&self.title, 24);
        let location = truncate(self.location.as_deref().unwrap_or("-"), 14);

        format!(
            "{:<24} {:<12} {:<14} {:>8} {:>8}  {}",
            title,
            self.deal_type.label(),
            location,
            metrics::fmt_percent(self.expected_roi),
            metrics::fmt_percent(self.funding_progress()),
            self.status.as_str(),
        )
    }
}

/// Tronque une chaîne à `max` caractères avec une ellipse
pub(crate) fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let truncated: String = value.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deal_type_from_wire() {
        assert_eq!(DealType::from_wire("real_estate"), DealType::RealEstate);
        assert_eq!(DealType::from_wire(" Franchise "), DealType::Franchise);
        assert_eq!(DealType::from_wire("crypto"), DealType::Other);
    }

    #[test]
    fn test_status_accepts_investments() {
        assert!(DealStatus::Open.accepts_investments());
        assert!(DealStatus::Funding.accepts_investments());
        assert!(!DealStatus::Exited.accepts_investments());
    }

    #[test]
    fn test_deal_funding_progress() {
        let mut deal = Deal::new("d1", "Marina Flat", DealType::RealEstate);
        assert_eq!(deal.funding_progress(), None);

        deal.raised_amount = Some(50.0);
        deal.target_amount = Some(200.0);
        assert_eq!(deal.funding_progress(), Some(25.0));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long deal title", 8), "a very …");
    }
}
