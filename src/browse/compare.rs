// ============================================================================
// Comparateur d'annonces
// ============================================================================
// L'utilisateur peut sélectionner jusqu'à 3 annonces pour les comparer côte
// à côte (prix, décote, ROI attendu)
// ============================================================================

/// Nombre maximum d'annonces comparées
pub const MAX_COMPARED: usize = 3;

/// Résultat d'un toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareToggle {
    Added,
    Removed,
    /// Déjà 3 annonces sélectionnées : rien n'a changé
    Full,
}

/// Sélection ordonnée d'identifiants d'annonces
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    ids: Vec<String>,
}

impl Comparison {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: &str) -> CompareToggle {
        if let Some(index) = self.ids.iter().position(|existing| existing == id) {
            self.ids.remove(index);
            return CompareToggle::Removed;
        }

        if self.ids.len() >= MAX_COMPARED {
            return CompareToggle::Full;
        }

        self.ids.push(id.to_string());
        CompareToggle::Added
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_caps_at_three() {
        let mut cmp = Comparison::new();
        assert_eq!(cmp.toggle("a"), CompareToggle::Added);
        assert_eq!(cmp.toggle("b"), CompareToggle::Added);
        assert_eq!(cmp.toggle("c"), CompareToggle::Added);
        assert_eq!(cmp.toggle("d"), CompareToggle::Full);
        assert_eq!(cmp.len(), 3);
        assert!(!cmp.contains("d"));

        assert_eq!(cmp.toggle("b"), CompareToggle::Removed);
        assert_eq!(cmp.toggle("d"), CompareToggle::Added);
        assert_eq!(cmp.ids(), &["a", "c", "d"]);
    }
}
