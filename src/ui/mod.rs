// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events;    // Gestion des événements clavier
pub mod dashboard; // Cadre commun + liste des deals
pub mod detail;    // Détail d'un deal + formulaire d'investissement
pub mod market;    // Marché secondaire + comparateur
pub mod info;      // Bundles, FAQ

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};
pub use dashboard::render;
