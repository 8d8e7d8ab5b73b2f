// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier et les ticks de l'application
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Pattern matching sur KeyCode : une fonction is_*_event par raccourci
// 3. Error handling avec Result
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Tick régulier (debounce, compte à rebours, notifications)
    Tick,

    /// Erreur survenue
    Error,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Crée un gestionnaire avec un poll de 250ms
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
        }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT : Non-blocking I/O avec timeout
    /// - poll(timeout) attend au maximum tick_rate
    /// - Si pas d'événement, retourne Ok(Event::Tick)
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                // Sur certains OS, on reçoit Press ET Release :
                // on ne garde que Press pour éviter les doublons
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers : Convertir KeyEvent en action
// ============================================================================

/// L'événement est-il l'un de ces caractères ?
fn is_char_event(event: &Event, chars: &[char]) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char(c) if chars.contains(&c))
    } else {
        false
    }
}

fn is_code_event(event: &Event, code: KeyCode) -> bool {
    matches!(event, Event::Key(key) if key.code == code)
}

/// 'q' : quitter (two-step)
pub fn is_quit_event(event: &Event) -> bool {
    is_char_event(event, &['q', 'Q'])
}

pub fn is_escape_event(event: &Event) -> bool {
    is_code_event(event, KeyCode::Esc)
}

pub fn is_enter_event(event: &Event) -> bool {
    is_code_event(event, KeyCode::Enter)
}

pub fn is_backspace_event(event: &Event) -> bool {
    is_code_event(event, KeyCode::Backspace)
}

/// Flèche vers le haut ou 'k' (vim)
pub fn is_up_event(event: &Event) -> bool {
    is_code_event(event, KeyCode::Up) || is_char_event(event, &['k'])
}

/// Flèche vers le bas ou 'j' (vim)
pub fn is_down_event(event: &Event) -> bool {
    is_code_event(event, KeyCode::Down) || is_char_event(event, &['j'])
}

/// Tab : onglet suivant
pub fn is_tab_event(event: &Event) -> bool {
    is_code_event(event, KeyCode::Tab)
}

/// '1'..'4' : accès direct à un onglet (index à partir de 0)
pub fn get_tab_from_event(event: &Event) -> Option<usize> {
    match event {
        Event::Key(key) => match key.code {
            KeyCode::Char(c @ '1'..='4') => c.to_digit(10).map(|d| d as usize - 1),
            _ => None,
        },
        _ => None,
    }
}

/// '/' : recherche texte
pub fn is_search_event(event: &Event) -> bool {
    is_char_event(event, &['/'])
}

/// 't' : type suivant
pub fn is_type_event(event: &Event) -> bool {
    is_char_event(event, &['t'])
}

/// 's' : statut suivant
pub fn is_status_event(event: &Event) -> bool {
    is_char_event(event, &['s'])
}

/// 'o' : ordre de tri suivant
pub fn is_sort_event(event: &Event) -> bool {
    is_char_event(event, &['o'])
}

/// '[' : borne basse de prix
pub fn is_min_price_event(event: &Event) -> bool {
    is_char_event(event, &['['])
}

/// ']' : borne haute de prix
pub fn is_max_price_event(event: &Event) -> bool {
    is_char_event(event, &[']'])
}

/// 'w' (deals) ou 'f' (annonces) : watchlist / favoris
pub fn is_watch_event(event: &Event) -> bool {
    is_char_event(event, &['w', 'f'])
}

/// 'W' ou 'F' : n'afficher que la watchlist / les favoris
pub fn is_saved_only_event(event: &Event) -> bool {
    is_char_event(event, &['W', 'F'])
}

/// 'm' : afficher plus
pub fn is_more_event(event: &Event) -> bool {
    is_char_event(event, &['m'])
}

/// 'r' : rafraîchir
pub fn is_refresh_event(event: &Event) -> bool {
    is_char_event(event, &['r'])
}

/// 'i' : investir (détail d'un deal)
pub fn is_invest_event(event: &Event) -> bool {
    is_char_event(event, &['i'])
}

/// 'b' : faire une offre (bid)
pub fn is_offer_event(event: &Event) -> bool {
    is_char_event(event, &['b'])
}

/// 'a' : accepter la première offre en attente
pub fn is_accept_event(event: &Event) -> bool {
    is_char_event(event, &['a'])
}

/// 'x' : refuser la première offre en attente
pub fn is_reject_event(event: &Event) -> bool {
    is_char_event(event, &['x'])
}

/// 'd' : retirer l'annonce (two-step, comme la suppression Vim)
pub fn is_withdraw_event(event: &Event) -> bool {
    is_char_event(event, &['d'])
}

/// 'c' : ajouter / retirer du comparateur
pub fn is_compare_event(event: &Event) -> bool {
    is_char_event(event, &['c'])
}

/// 'C' : vider le comparateur
pub fn is_clear_compare_event(event: &Event) -> bool {
    is_char_event(event, &['C'])
}

/// 'S' : sauvegarder la recherche
pub fn is_save_search_event(event: &Event) -> bool {
    is_char_event(event, &['S'])
}

/// 'L' : charger une recherche
pub fn is_load_search_event(event: &Event) -> bool {
    is_char_event(event, &['L'])
}

/// 'X' : supprimer une recherche
pub fn is_delete_search_event(event: &Event) -> bool {
    is_char_event(event, &['X'])
}

/// 'n' : fermer la notification affichée
pub fn is_dismiss_event(event: &Event) -> bool {
    is_char_event(event, &['n'])
}

/// Caractère imprimable (mode saisie)
pub fn is_text_char_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char(c) if !c.is_control())
    } else {
        false
    }
}

/// Extrait le caractère d'un événement clavier si c'est un caractère
pub fn get_char_from_event(event: &Event) -> Option<char> {
    if let Event::Key(key) = event {
        if let KeyCode::Char(c) = key.code {
            return Some(c);
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, event::KeyModifiers::empty()))
    }

    #[test]
    fn test_is_quit_event() {
        assert!(is_quit_event(&key(KeyCode::Char('q'))));
        assert!(!is_quit_event(&key(KeyCode::Char('a'))));
        assert!(!is_quit_event(&Event::Tick));
    }

    #[test]
    fn test_vim_navigation() {
        assert!(is_up_event(&key(KeyCode::Char('k'))));
        assert!(is_down_event(&key(KeyCode::Down)));
        assert!(!is_down_event(&key(KeyCode::Char('J'))));
    }

    #[test]
    fn test_tab_digits() {
        assert_eq!(get_tab_from_event(&key(KeyCode::Char('1'))), Some(0));
        assert_eq!(get_tab_from_event(&key(KeyCode::Char('4'))), Some(3));
        assert_eq!(get_tab_from_event(&key(KeyCode::Char('5'))), None);
    }

    #[test]
    fn test_case_sensitive_shortcuts() {
        assert!(is_watch_event(&key(KeyCode::Char('w'))));
        assert!(!is_watch_event(&key(KeyCode::Char('W'))));
        assert!(is_saved_only_event(&key(KeyCode::Char('W'))));
        assert!(is_text_char_event(&key(KeyCode::Char('$'))));
    }
}
