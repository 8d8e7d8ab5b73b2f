// ============================================================================
// Module : invest
// ============================================================================
// Formulaires d'investissement (page détail d'un deal) et d'offre (marché
// secondaire)
//
// La validation côté client ne fait qu'avertir et désactiver la soumission :
// c'est le backend qui décide réellement.
// ============================================================================

use std::fmt;
use std::time::Duration;

use crate::metrics;

/// Délai avant le retour à la liste après un investissement réussi
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Parse un montant saisi ("1,500.25" accepté)
pub fn parse_amount(input: &str) -> Option<f64> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && *c != '_' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ============================================================================
// Investissement
// ============================================================================

/// Avertissement affiché sous le champ montant
#[derive(Debug, Clone, PartialEq)]
pub enum InvestWarning {
    /// Montant vide, non numérique, nul ou négatif
    InvalidAmount,
    /// Montant inférieur au ticket minimum
    BelowMinimum { min: f64 },
    /// Montant supérieur au solde disponible
    InsufficientBalance { available: f64 },
}

impl fmt::Display for InvestWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvestWarning::InvalidAmount => write!(f, "Enter a valid amount"),
            InvestWarning::BelowMinimum { min } => {
                write!(f, "Below minimum investment of {}", metrics::fmt_money(Some(*min)))
            }
            InvestWarning::InsufficientBalance { available } => write!(
                f,
                "Insufficient balance ({} available)",
                metrics::fmt_money(Some(*available))
            ),
        }
    }
}

/// État du formulaire d'investissement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvestForm {
    /// Texte saisi
    pub amount_input: String,
    pub min_ticket: Option<f64>,
    /// Solde du portefeuille (None tant qu'il n'est pas chargé)
    pub balance: Option<f64>,
}

impl InvestForm {
    pub fn new(min_ticket: Option<f64>, balance: Option<f64>) -> Self {
        Self {
            amount_input: String::new(),
            min_ticket,
            balance,
        }
    }

    pub fn amount(&self) -> Option<f64> {
        parse_amount(&self.amount_input).filter(|v| *v > 0.0)
    }

    /// Liste des avertissements pour la saisie courante
    pub fn validate(&self) -> Vec<InvestWarning> {
        let amount = match self.amount() {
            Some(amount) => amount,
            None => return vec![InvestWarning::InvalidAmount],
        };

        let mut warnings = Vec::new();
        if let Some(min) = self.min_ticket {
            if amount < min {
                warnings.push(InvestWarning::BelowMinimum { min });
            }
        }
        if let Some(available) = self.balance {
            if amount > available {
                warnings.push(InvestWarning::InsufficientBalance { available });
            }
        }
        warnings
    }

    /// Le bouton "Invest" est actif seulement sans avertissement
    pub fn can_submit(&self) -> bool {
        self.validate().is_empty()
    }

    /// Revenu mensuel estimé pour le montant saisi
    pub fn projected_monthly_income(&self, roi_percent: Option<f64>) -> Option<f64> {
        metrics::monthly_income(self.amount(), roi_percent)
    }
}

// ============================================================================
// Offre sur le marché secondaire
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfferForm {
    pub price_input: String,
    /// Prix demandé par le vendeur
    pub listing_total: Option<f64>,
}

impl OfferForm {
    pub fn new(listing_total: Option<f64>) -> Self {
        Self {
            price_input: String::new(),
            listing_total,
        }
    }

    /// Prix offert, exactement tel que saisi (aucun arrondi)
    pub fn parse(&self) -> Option<f64> {
        parse_amount(&self.price_input).filter(|v| *v > 0.0)
    }

    /// L'offre atteint ou dépasse le prix demandé
    pub fn at_or_above_ask(&self) -> bool {
        match (self.parse(), self.listing_total) {
            (Some(offer), Some(ask)) => offer >= ask,
            _ => false,
        }
    }

    /// Écart par rapport au prix demandé, en pourcentage (négatif = sous le prix)
    pub fn delta_percent(&self) -> Option<f64> {
        metrics::discount_percent(self.parse(), self.listing_total).map(|d| -d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(amount: &str, min: f64, balance: Option<f64>) -> InvestForm {
        InvestForm {
            amount_input: amount.to_string(),
            min_ticket: Some(min),
            balance,
        }
    }

    #[test]
    fn test_below_minimum_disables_submit() {
        let f = form("400", 500.0, Some(10_000.0));
        assert_eq!(f.validate(), vec![InvestWarning::BelowMinimum { min: 500.0 }]);
        assert!(!f.can_submit());
        assert_eq!(f.validate()[0].to_string(), "Below minimum investment of $500.00");
    }

    #[test]
    fn test_insufficient_balance_disables_submit() {
        let f = form("1500", 500.0, Some(1_000.0));
        assert_eq!(
            f.validate(),
            vec![InvestWarning::InsufficientBalance { available: 1_000.0 }]
        );
        assert!(!f.can_submit());
    }

    #[test]
    fn test_valid_amount() {
        let f = form("1,000", 500.0, Some(1_000.0));
        assert!(f.can_submit());
        assert_eq!(f.projected_monthly_income(Some(12.0)), Some(10.0));
    }

    #[test]
    fn test_balance_not_loaded_only_checks_minimum() {
        let f = form("600", 500.0, None);
        assert!(f.can_submit());
    }

    #[test]
    fn test_invalid_amounts() {
        for input in ["", "abc", "0", "-50"] {
            let f = form(input, 500.0, Some(1_000.0));
            assert_eq!(f.validate(), vec![InvestWarning::InvalidAmount], "input {:?}", input);
        }
    }

    #[test]
    fn test_offer_keeps_exact_value() {
        let offer = OfferForm {
            price_input: "1234.567".to_string(),
            listing_total: Some(1_200.0),
        };
        assert_eq!(offer.parse(), Some(1234.567));
        assert!(offer.at_or_above_ask());

        let equal = OfferForm {
            price_input: "$1,200".to_string(),
            listing_total: Some(1_200.0),
        };
        assert_eq!(equal.parse(), Some(1200.0));
        assert!(equal.at_or_above_ask());
        assert_eq!(equal.delta_percent(), Some(0.0));
    }

    #[test]
    fn test_offer_below_ask() {
        let offer = OfferForm {
            price_input: "900".to_string(),
            listing_total: Some(1_000.0),
        };
        assert!(!offer.at_or_above_ask());
        assert_eq!(offer.delta_percent(), Some(-10.0));
    }
}
