// ============================================================================
// Module : browse
// ============================================================================
// Navigation dans les listes déjà récupérées : filtres, tri, pagination,
// déclenchement des re-fetch et sélection pour comparaison
// ============================================================================

pub mod filter;     // Filtres et tri côté client
pub mod pagination; // "Afficher plus"
pub mod query;      // Debounce + empreinte + génération des requêtes
pub mod compare;    // Comparateur (3 annonces max)

pub use filter::{DealFilter, DealSort, ListingFilter, ListingSort, ServerQuery};
pub use pagination::Pagination;
pub use query::{QueryTicket, QueryTrigger};
pub use compare::{CompareToggle, Comparison};
