// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod dashboard; // Liste des symboles, header, footer
pub mod events;    // Gestion des événements clavier
pub mod report;    // Rapport : table, barres, courbes, erreurs

// Re-exports pour simplifier les imports
pub use dashboard::render;
pub use events::{Event, EventHandler};
