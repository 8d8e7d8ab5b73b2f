// ============================================================================
// Module : content
// ============================================================================
// Contenu statique affiché tel quel : FAQ, conformité Shariah, chiffres clés
// de la page "About". Aucun calcul ici.
//
// CONCEPT RUST : &'static [T]
// - Tableaux constants compilés dans le binaire, aucune allocation
// ============================================================================

/// Une entrée de FAQ (accordéon)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

/// Un chiffre clé ("$12M+ invested")
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMetric {
    pub value: &'static str,
    pub label: &'static str,
}

pub const FAQ: &[FaqEntry] = &[
    FaqEntry {
        question: "What is fractional ownership?",
        answer: "Each deal is held by a dedicated SPV (Special Purpose Vehicle). \
                 You buy shares of that SPV, so you own a fraction of the underlying asset \
                 and receive your share of its income.",
    },
    FaqEntry {
        question: "What is the minimum investment?",
        answer: "Every deal sets its own minimum ticket, shown on the deal page. \
                 Most deals start at a few hundred dollars.",
    },
    FaqEntry {
        question: "How are returns paid?",
        answer: "Rental or operating income is distributed to your wallet according to the \
                 deal's schedule. Expected ROI and IRR are projections, not guarantees.",
    },
    FaqEntry {
        question: "Can I sell my shares before the exit?",
        answer: "Yes. List your shares on the secondary market, set your price, \
                 and accept or reject the offers you receive.",
    },
    FaqEntry {
        question: "What happens when a deal is fully funded?",
        answer: "The deal moves to 'funded', the SPV completes the acquisition, and \
                 distributions start once the asset is operating.",
    },
];

pub const SHARIAH_PRINCIPLES: &[&str] = &[
    "No interest (riba): returns come from real asset income, never from lending.",
    "Asset-backed: every deal is tied to a tangible asset or operating business.",
    "Excluded sectors: alcohol, gambling, conventional finance and other non-compliant activities.",
    "Transparency (no gharar): deal terms, fees and risks are disclosed before you invest.",
    "Profit and loss sharing: investors share in both the upside and the downside.",
];

pub const KEY_METRICS: &[KeyMetric] = &[
    KeyMetric { value: "3", label: "asset classes" },
    KeyMetric { value: "SPV", label: "per deal, ring-fenced ownership" },
    KeyMetric { value: "24/7", label: "secondary market access" },
];

/// État de l'accordéon FAQ : au plus une entrée dépliée
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accordion {
    expanded: Option<usize>,
}

impl Accordion {
    /// Déplie l'entrée (ou la replie si elle était déjà dépliée)
    pub fn toggle(&mut self, index: usize) {
        self.expanded = if self.expanded == Some(index) { None } else { Some(index) };
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded == Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accordion_single_expanded() {
        let mut accordion = Accordion::default();
        accordion.toggle(1);
        assert!(accordion.is_expanded(1));

        accordion.toggle(2);
        assert!(!accordion.is_expanded(1));
        assert!(accordion.is_expanded(2));

        accordion.toggle(2);
        assert!(!accordion.is_expanded(2));
    }

    #[test]
    fn test_static_content_is_not_empty() {
        assert!(!FAQ.is_empty());
        assert!(FAQ.iter().all(|e| !e.question.is_empty() && !e.answer.is_empty()));
        assert!(!SHARIAH_PRINCIPLES.is_empty());
    }
}
