// ============================================================================
// Gestion des événements
// ============================================================================
// Lecture des événements clavier (crossterm) et helpers de classification
//
// CONCEPTS RUST :
// 1. Enums avec données : Key(KeyEvent) ou Tick
// 2. Polling avec timeout : l'UI se redessine même sans frappe, ce qui
//    permet de voir arriver les résultats du worker
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

/// Délai de polling par défaut
const TICK_RATE: Duration = Duration::from_millis(250);

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Aucun événement pendant le délai de polling
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::with_tick_rate(TICK_RATE)
    }

    pub fn with_tick_rate(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Attend le prochain événement au plus `tick_rate`
    ///
    /// Seuls les appuis (Press) sont remontés : certains terminaux envoient
    /// aussi Release, ce qui doublerait chaque frappe.
    pub fn next(&self) -> Result<Event> {
        if !event::poll(self.tick_rate)? {
            return Ok(Event::Tick);
        }

        match event::read()? {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
            _ => Ok(Event::Tick),
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers de classification
// ============================================================================

/// Code de la touche, None pour un Tick
fn key_code(event: &Event) -> Option<KeyCode> {
    match event {
        Event::Key(key) => Some(key.code),
        Event::Tick => None,
    }
}

/// 'q' : quitter (avec confirmation)
pub fn is_quit_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('q' | 'Q')))
}

pub fn is_escape_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Esc))
}

pub fn is_enter_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Enter))
}

pub fn is_backspace_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Backspace))
}

/// Flèche haut ou 'k' (vim)
pub fn is_up_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Up | KeyCode::Char('k')))
}

/// Flèche bas ou 'j' (vim)
pub fn is_down_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Down | KeyCode::Char('j')))
}

/// '/' : ouvrir la saisie du filtre
pub fn is_filter_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char('/')))
}

/// Retour à la liste depuis le rapport (ESC, espace ou Backspace)
pub fn is_back_event(event: &Event) -> bool {
    matches!(
        key_code(event),
        Some(KeyCode::Esc | KeyCode::Char(' ') | KeyCode::Backspace)
    )
}

/// Caractère accepté dans un filtre de symbole (ex: "M&M", "BAJAJ-AUTO")
pub fn is_symbol_char_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Char(c)) if c.is_alphanumeric() || "-&._".contains(c))
}

/// Caractère tapé, None pour les touches spéciales
pub fn get_char_from_event(event: &Event) -> Option<char> {
    match key_code(event) {
        Some(KeyCode::Char(c)) => Some(c),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    #[test]
    fn test_is_quit_event() {
        assert!(is_quit_event(&key(KeyCode::Char('q'))));
        assert!(!is_quit_event(&key(KeyCode::Char('a'))));
        assert!(!is_quit_event(&Event::Tick));
    }

    #[test]
    fn test_navigation_keys() {
        assert!(is_up_event(&key(KeyCode::Up)));
        assert!(is_up_event(&key(KeyCode::Char('k'))));
        assert!(is_down_event(&key(KeyCode::Char('j'))));
        assert!(is_filter_event(&key(KeyCode::Char('/'))));
        assert!(is_back_event(&key(KeyCode::Esc)));
    }

    #[test]
    fn test_symbol_chars() {
        assert!(is_symbol_char_event(&key(KeyCode::Char('M'))));
        assert!(is_symbol_char_event(&key(KeyCode::Char('&'))));
        assert!(!is_symbol_char_event(&key(KeyCode::Char(' '))));
        assert!(!is_symbol_char_event(&key(KeyCode::Enter)));
        assert_eq!(get_char_from_event(&key(KeyCode::Char('x'))), Some('x'));
        assert_eq!(get_char_from_event(&Event::Tick), None);
    }
}
