// ============================================================================
// Pagination "Afficher plus"
// ============================================================================
// La liste filtrée est entièrement en mémoire : on n'affiche que les N
// premiers éléments, et chaque "show more" en révèle N de plus
// ============================================================================

/// Compteur d'éléments visibles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
    visible: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self { page_size, visible: page_size }
    }

    /// Nombre d'éléments à afficher pour une liste de `len` éléments
    pub fn visible(&self, len: usize) -> usize {
        self.visible.min(len)
    }

    pub fn has_more(&self, len: usize) -> bool {
        self.visible < len
    }

    /// Révèle une page de plus
    pub fn show_more(&mut self) {
        self.visible = self.visible.saturating_add(self.page_size);
    }

    /// Revient à la première page (à chaque changement de filtre)
    pub fn reset(&mut self) {
        self.visible = self.page_size;
    }

    /// Tranche visible d'une slice
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.visible(items.len())]
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(12)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_more() {
        let mut page = Pagination::new(3);
        let items: Vec<u32> = (0..7).collect();

        assert_eq!(page.slice(&items), &[0, 1, 2]);
        assert!(page.has_more(items.len()));

        page.show_more();
        assert_eq!(page.visible(items.len()), 6);

        page.show_more();
        assert_eq!(page.visible(items.len()), 7);
        assert!(!page.has_more(items.len()));

        page.reset();
        assert_eq!(page.visible(items.len()), 3);
    }

    #[test]
    fn test_zero_page_size_is_bumped() {
        let page = Pagination::new(0);
        assert_eq!(page.visible(10), 1);
    }
}
