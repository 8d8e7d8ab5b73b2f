// ============================================================================
// Structure : Bundle
// ============================================================================
// Panier de deals pré-composé (ex: "Revenus passifs Golfe")
// ============================================================================

use crate::metrics;

/// Poids d'un deal dans un bundle
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub deal_id: String,
    /// Pourcentage du bundle investi dans ce deal
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub expected_roi: Option<f64>,
    pub min_investment: Option<f64>,
    pub allocation: Vec<Allocation>,
}

impl Bundle {
    /// Somme des poids (100 attendu, mais c'est le backend qui le garantit)
    pub fn total_weight(&self) -> f64 {
        self.allocation.iter().map(|a| a.weight).sum()
    }

    /// Répartit un montant entre les deals du bundle
    pub fn split_amount(&self, amount: f64) -> Vec<(&str, f64)> {
        let total = self.total_weight();
        if total <= 0.0 {
            return Vec::new();
        }

        self.allocation
            .iter()
            .map(|a| (a.deal_id.as_str(), amount * a.weight / total))
            .collect()
    }

    pub fn display(&self) -> String {
        format!(
            "{:<28} {:>8}  min {:>10}  {} deals",
            self.name,
            metrics::fmt_percent(self.expected_roi),
            metrics::fmt_money(self.min_investment),
            self.allocation.len(),
        )
    }
}
