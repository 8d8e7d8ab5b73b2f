// ============================================================================
// Structure : SecondaryListing
// ============================================================================
// Une annonce du marché secondaire : un investisseur revend une partie de ses
// parts avant la sortie officielle du deal
// ============================================================================

use chrono::{DateTime, Utc};

use crate::metrics;
use crate::models::deal::{truncate, DealType};

/// Statut d'une annonce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingStatus {
    Active,
    Pending,
    Sold,
    Cancelled,
    Other,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::Pending => "pending",
            ListingStatus::Sold => "sold",
            ListingStatus::Cancelled => "cancelled",
            ListingStatus::Other => "other",
        }
    }

    pub fn from_wire(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" | "open" => ListingStatus::Active,
            "pending" => ListingStatus::Pending,
            "sold" | "completed" => ListingStatus::Sold,
            "cancelled" | "canceled" => ListingStatus::Cancelled,
            _ => ListingStatus::Other,
        }
    }

    pub fn all() -> Vec<ListingStatus> {
        vec![
            ListingStatus::Active,
            ListingStatus::Pending,
            ListingStatus::Sold,
            ListingStatus::Cancelled,
        ]
    }
}

/// Vendeur d'une annonce
#[derive(Debug, Clone, PartialEq)]
pub struct Seller {
    pub id: Option<String>,
    pub name: String,
}

/// Résumé du deal sous-jacent, tel qu'imbriqué dans une annonce
#[derive(Debug, Clone, PartialEq)]
pub struct DealSummary {
    pub id: String,
    pub title: String,
    pub deal_type: DealType,
    pub location: Option<String>,
    pub expected_roi: Option<f64>,

    /// Prix d'émission de la part (référence pour calculer la décote)
    pub share_price: Option<f64>,
}

/// Investissement revendu
#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentRef {
    pub id: String,
    pub deal: DealSummary,
}

/// Offre d'achat reçue sur une annonce
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    pub id: String,
    pub buyer: Option<String>,
    pub offer_price: f64,
    pub status: String,
}

impl Offer {
    pub fn is_pending(&self) -> bool {
        self.status.eq_ignore_ascii_case("pending")
    }
}

/// Annonce du marché secondaire
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryListing {
    pub id: String,
    pub seller: Seller,
    pub investment: InvestmentRef,
    pub shares_for_sale: f64,
    pub price_per_share: Option<f64>,
    pub total_price: Option<f64>,
    pub status: ListingStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub offers: Vec<Offer>,
}

impl SecondaryListing {
    /// Décote (positive) ou prime (négative) par rapport au prix d'émission
    pub fn discount_percent(&self) -> Option<f64> {
        metrics::discount_percent(self.price_per_share, self.investment.deal.share_price)
    }

    pub fn title(&self) -> &str {
        &self.investment.deal.title
    }

    pub fn pending_offers(&self) -> impl Iterator<Item = &Offer> {
        self.offers.iter().filter(|offer| offer.is_pending())
    }

    /// Formatte l'annonce pour une ligne de liste
    pub fn display(&self) -> String {
        let discount = match self.discount_percent() {
            Some(d) if d > 0.0 => format!("-{:.1}%", d),
            Some(d) => format!("+{:.1}%", d.abs()),
            None => "N/A".to_string(),
        };

        format!(
            "{:<24} {:>8} sh @ {:>10} = {:>12} {:>8}  {}",
            truncate(self.title(), 24),
            format!("{:.0}", self.shares_for_sale),
            metrics::fmt_money(self.price_per_share),
            metrics::fmt_money(self.total_price),
            discount,
            self.status.as_str(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(price_per_share: Option<f64>, share_price: Option<f64>) -> SecondaryListing {
        SecondaryListing {
            id: "l1".to_string(),
            seller: Seller { id: None, name: "Sara".to_string() },
            investment: InvestmentRef {
                id: "i1".to_string(),
                deal: DealSummary {
                    id: "d1".to_string(),
                    title: "Marina Flat".to_string(),
                    deal_type: DealType::RealEstate,
                    location: None,
                    expected_roi: Some(8.0),
                    share_price,
                },
            },
            shares_for_sale: 10.0,
            price_per_share,
            total_price: price_per_share.map(|p| p * 10.0),
            status: ListingStatus::Active,
            created_at: None,
            offers: Vec::new(),
        }
    }

    #[test]
    fn test_discount_percent() {
        let l = listing(Some(90.0), Some(100.0));
        assert_eq!(l.discount_percent(), Some(10.0));

        let premium = listing(Some(110.0), Some(100.0));
        assert_eq!(premium.discount_percent(), Some(-10.0));

        assert_eq!(listing(Some(90.0), None).discount_percent(), None);
    }

    #[test]
    fn test_status_from_wire() {
        assert_eq!(ListingStatus::from_wire("canceled"), ListingStatus::Cancelled);
        assert_eq!(ListingStatus::from_wire("ACTIVE"), ListingStatus::Active);
    }

    #[test]
    fn test_pending_offers() {
        let mut l = listing(Some(90.0), Some(100.0));
        l.offers = vec![
            Offer { id: "o1".into(), buyer: None, offer_price: 850.0, status: "pending".into() },
            Offer { id: "o2".into(), buyer: None, offer_price: 800.0, status: "rejected".into() },
        ];
        let pending: Vec<_> = l.pending_offers().map(|o| o.id.as_str()).collect();
        assert_eq!(pending, vec!["o1"]);
    }
}
