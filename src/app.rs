// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Ownership : App appartient à la boucle d'événements, le worker
//    ne fait qu'envoyer des résultats par channel
// ============================================================================

use std::path::PathBuf;

use crate::catalog::SymbolCatalog;
use crate::handler::{RequestFailure, StockReport};

// ============================================================================
// Enum : Screen
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Liste des symboles du catalogue
    Picker,

    /// Saisie du filtre (touche '/')
    /// - Le filtre est appliqué à chaque caractère
    /// - Enter valide, ESC efface le filtre
    FilterInput,

    /// Résultat de la dernière requête (rapport ou erreur)
    Report,
}

/// Résultat de la dernière requête terminée
#[derive(Debug)]
pub enum Outcome {
    /// Rapport complet + emplacement du PNG (ou raison de l'échec d'écriture)
    Report {
        report: Box<StockReport>,
        chart_path: Result<PathBuf, String>,
    },

    /// Requête échouée : seul le message est affiché
    Failure(RequestFailure),
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Catalogue chargé au démarrage, jamais modifié
    pub catalog: SymbolCatalog,

    /// Indices (dans le catalogue) des symboles visibles avec le filtre courant
    pub visible: Vec<usize>,

    /// Position sélectionnée dans `visible`
    pub selected_index: usize,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Two-step quit : première pression de 'q' → true, seconde → quit
    pub confirm_quit: bool,

    /// Une requête est en cours côté worker
    /// - Les nouvelles sélections sont ignorées tant qu'elle n'est pas terminée
    pub is_loading: bool,

    /// Message de chargement optionnel
    pub loading_message: Option<String>,

    /// Texte du filtre
    pub filter: String,

    /// Dernier résultat reçu du worker
    pub outcome: Option<Outcome>,
}

impl App {
    /// Crée l'application à partir d'un catalogue déjà chargé
    pub fn new(catalog: SymbolCatalog) -> Self {
        let visible = (0..catalog.len()).collect();
        Self {
            running: true,
            catalog,
            visible,
            selected_index: 0,
            current_screen: Screen::Picker,
            confirm_quit: false,
            is_loading: false,
            loading_message: None,
            filter: String::new(),
            outcome: None,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // ========================================================================
    // Navigation dans la liste
    // ========================================================================

    /// CONCEPT RUST : saturating_sub évite le panic sur usize à 0
    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn navigate_down(&mut self) {
        let max_index = self.visible.len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    /// Symbole sous le curseur, None si la liste filtrée est vide
    pub fn selected_symbol(&self) -> Option<&str> {
        self.visible
            .get(self.selected_index)
            .and_then(|&i| self.catalog.symbols().get(i))
            .map(String::as_str)
    }

    /// Symboles visibles, dans l'ordre du catalogue
    pub fn visible_symbols(&self) -> impl Iterator<Item = &str> {
        let symbols = self.catalog.symbols();
        self.visible.iter().filter_map(move |&i| symbols.get(i).map(String::as_str))
    }

    // ========================================================================
    // Écrans
    // ========================================================================

    pub fn show_picker(&mut self) {
        self.current_screen = Screen::Picker;
    }

    pub fn is_on_picker(&self) -> bool {
        self.current_screen == Screen::Picker
    }

    pub fn is_on_report(&self) -> bool {
        self.current_screen == Screen::Report
    }

    pub fn is_in_filter_mode(&self) -> bool {
        self.current_screen == Screen::FilterInput
    }

    // ========================================================================
    // Filtre
    // ========================================================================

    /// Entre en mode saisie du filtre
    pub fn start_filter(&mut self) {
        self.current_screen = Screen::FilterInput;
    }

    pub fn append_char(&mut self, c: char) {
        self.filter.push(c);
        self.apply_filter();
    }

    pub fn backspace(&mut self) {
        self.filter.pop();
        self.apply_filter();
    }

    /// Garde le filtre et revient à la liste
    pub fn submit_filter(&mut self) {
        self.current_screen = Screen::Picker;
    }

    /// Efface le filtre et revient à la liste
    pub fn cancel_filter(&mut self) {
        self.filter.clear();
        self.apply_filter();
        self.current_screen = Screen::Picker;
    }

    /// Recalcule la liste visible, le curseur revient en tête
    fn apply_filter(&mut self) {
        self.visible = self.catalog.filter(&self.filter);
        self.selected_index = 0;
    }

    // ========================================================================
    // Two-step quit
    // ========================================================================

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Cycle d'une requête
    // ========================================================================

    /// Démarre une requête pour le symbole sélectionné
    ///
    /// Retourne le symbole à envoyer au worker, ou None si une requête est
    /// déjà en cours ou si la liste est vide.
    pub fn begin_request(&mut self) -> Option<String> {
        if self.is_loading {
            return None;
        }
        let symbol = self.selected_symbol()?.to_string();
        self.start_loading(Some(format!("Chargement de {}...", symbol)));
        Some(symbol)
    }

    /// Enregistre le résultat du worker et affiche l'écran de rapport
    ///
    /// Le rapport précédent est remplacé (et libéré).
    pub fn finish_request(&mut self, outcome: Outcome) {
        self.stop_loading();
        self.outcome = Some(outcome);
        self.current_screen = Screen::Report;
    }

    pub fn start_loading(&mut self, message: Option<String>) {
        self.is_loading = true;
        self.loading_message = message;
    }

    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.loading_message = None;
    }

    pub fn is_loading_data(&self) -> bool {
        self.is_loading
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
