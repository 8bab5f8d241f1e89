// ============================================================================
// StockScope - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests d'intégration
// ============================================================================

pub mod api;       // Provider de données de marché (Yahoo Finance)
pub mod app;       // État de l'application TUI
pub mod catalog;   // Catalogue CSV des symboles
pub mod chart;     // Rendu PNG des trois panneaux
pub mod config;    // Arguments CLI / variables d'environnement
pub mod format;    // Formatage des montants
pub mod handler;   // Pipeline d'une requête
pub mod metrics;   // Table d'informations d'une action
pub mod models;    // Structures de données
pub mod quarterly; // Moyennes High/Low par trimestre
pub mod ui;        // Interface utilisateur
