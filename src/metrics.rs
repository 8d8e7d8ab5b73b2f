// ============================================================================
// Module : metrics
// ============================================================================
// Calculs dérivés affichés à l'écran : progression de levée, revenu mensuel
// estimé, décote, compte à rebours...
//
// CONCEPT RUST : Option<f64> en entrée ET en sortie
// - Une donnée absente donne un résultat absent (None)
// - L'affichage transforme None en "N/A", partout de la même façon
// - Aucun NaN ne peut s'échapper : les entrées non finies sont rejetées
// ============================================================================

use chrono::{DateTime, Utc};

/// Texte affiché pour toute valeur inconnue
pub const NOT_AVAILABLE: &str = "N/A";

/// Garde uniquement les nombres finis
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Progression de la levée en pourcentage : raised / target * 100
///
/// La valeur brute peut dépasser 100 (sursouscription). None si la cible est
/// absente ou nulle.
pub fn funding_progress(raised: Option<f64>, target: Option<f64>) -> Option<f64> {
    let raised = finite(raised)?;
    let target = finite(target)?;
    if target <= 0.0 {
        return None;
    }
    Some(raised * 100.0 / target)
}

/// Largeur de la barre de progression, bornée à [0, 100]
pub fn progress_bar_width(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

/// Revenu mensuel estimé : amount * roi / 100 / 12
pub fn monthly_income(amount: Option<f64>, roi_percent: Option<f64>) -> Option<f64> {
    let amount = finite(amount)?;
    let roi = finite(roi_percent)?;
    Some(amount * roi / 100.0 / 12.0)
}

/// Rendement cumulé sur la durée de détention (intérêts simples)
pub fn total_return(amount: Option<f64>, roi_percent: Option<f64>, months: Option<u32>) -> Option<f64> {
    let monthly = monthly_income(amount, roi_percent)?;
    Some(monthly * f64::from(months?))
}

/// Décote d'un prix par rapport à une référence, en pourcentage
///
/// Positive : moins cher que la référence. Négative : prime.
pub fn discount_percent(price: Option<f64>, reference: Option<f64>) -> Option<f64> {
    let price = finite(price)?;
    let reference = finite(reference)?;
    if reference <= 0.0 {
        return None;
    }
    Some((reference - price) * 100.0 / reference)
}

/// Parts restantes : total - émises, jamais négatif
pub fn shares_available(total: Option<f64>, issued: Option<f64>) -> Option<f64> {
    let total = finite(total)?;
    let issued = finite(issued).unwrap_or(0.0);
    Some((total - issued).max(0.0))
}

/// Temps restant avant une échéance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    pub fn is_over(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }

    /// Format : "3j 04h 12m 09s"
    pub fn label(&self) -> String {
        format!(
            "{}j {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Compte à rebours jusqu'à `end` (zéro si l'échéance est passée)
pub fn countdown(now: DateTime<Utc>, end: DateTime<Utc>) -> Countdown {
    let remaining = (end - now).num_seconds().max(0);

    Countdown {
        days: remaining / 86_400,
        hours: (remaining % 86_400) / 3_600,
        minutes: (remaining % 3_600) / 60,
        seconds: remaining % 60,
    }
}

// ============================================================================
// Formatage
// ============================================================================

/// Montant : "$1,250.00" ou "N/A"
pub fn fmt_money(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => {
            let cents = format!("{:.2}", v.abs());
            // Signe décidé sur la valeur arrondie : -0.001 s'affiche "$0.00"
            let negative = v < 0.0 && cents != "0.00";
            let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

            // Séparateur de milliers
            let mut grouped = String::new();
            for (i, c) in int_part.chars().enumerate() {
                if i > 0 && (int_part.len() - i) % 3 == 0 {
                    grouped.push(',');
                }
                grouped.push(c);
            }

            format!("{}${}.{}", if negative { "-" } else { "" }, grouped, dec_part)
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Pourcentage avec une décimale : "125.0%" ou "N/A"
pub fn fmt_percent(value: Option<f64>) -> String {
    match finite(value) {
        Some(v) => {
            let text = format!("{:.1}", v);
            if text == "-0.0" {
                "0.0%".to_string()
            } else {
                format!("{}%", text)
            }
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_funding_progress() {
        assert_eq!(funding_progress(Some(50.0), Some(200.0)), Some(25.0));
        assert_eq!(funding_progress(Some(50.0), Some(0.0)), None);
        assert_eq!(funding_progress(None, Some(200.0)), None);
        assert_eq!(funding_progress(Some(f64::NAN), Some(200.0)), None);
    }

    #[test]
    fn test_overfunded_progress_is_clamped_for_display_only() {
        let pct = funding_progress(Some(250.0), Some(200.0)).unwrap();
        assert_eq!(pct, 125.0);
        assert_eq!(progress_bar_width(pct), 100.0);
        assert_eq!(fmt_percent(Some(pct)), "125.0%");
        assert_eq!(progress_bar_width(-5.0), 0.0);
    }

    #[test]
    fn test_monthly_income() {
        assert_eq!(monthly_income(Some(12_000.0), Some(10.0)), Some(100.0));
        assert_eq!(monthly_income(Some(12_000.0), None), None);
        assert_eq!(total_return(Some(12_000.0), Some(10.0), Some(24)), Some(2400.0));
    }

    #[test]
    fn test_shares_available() {
        assert_eq!(shares_available(Some(1000.0), Some(400.0)), Some(600.0));
        assert_eq!(shares_available(Some(1000.0), Some(1200.0)), Some(0.0));
        assert_eq!(shares_available(Some(1000.0), None), Some(1000.0));
        assert_eq!(shares_available(None, Some(10.0)), None);
    }

    #[test]
    fn test_countdown() {
        let now = Utc::now();
        let end = now + Duration::seconds(3 * 86_400 + 4 * 3_600 + 12 * 60 + 9);
        let cd = countdown(now, end);
        assert_eq!(cd, Countdown { days: 3, hours: 4, minutes: 12, seconds: 9 });
        assert_eq!(cd.label(), "3j 04h 12m 09s");

        assert!(countdown(end, now).is_over());
    }

    #[test]
    fn test_formatting() {
        assert_eq!(fmt_money(Some(1_250.0)), "$1,250.00");
        assert_eq!(fmt_money(Some(999.5)), "$999.50");
        assert_eq!(fmt_money(Some(-1_234_567.891)), "-$1,234,567.89");
        assert_eq!(fmt_money(None), "N/A");
        assert_eq!(fmt_money(Some(-0.004)), "$0.00");
        assert_eq!(fmt_money(Some(-0.006)), "-$0.01");
        assert_eq!(fmt_percent(Some(-0.04)), "0.0%");
        assert_eq!(fmt_percent(None), "N/A");
    }
}
