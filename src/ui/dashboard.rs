// ============================================================================
// Dashboard - Liste des symboles et barre d'état
// ============================================================================
// Dessine l'écran de sélection : header, liste filtrable, footer
//
// CONCEPTS RATATUI :
// 1. Layout : découpage de l'espace en zones
// 2. List + ListState : liste défilante, la sélection reste visible
// 3. Span / Line : texte multi-couleurs
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, Screen};
use crate::ui::report;

/// Dessine l'interface complète selon l'écran courant
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);

    match app.current_screen {
        Screen::Picker | Screen::FilterInput => render_symbol_list(frame, app, chunks[1]),
        Screen::Report => report::render_report(frame, app, chunks[1]),
    }

    if app.is_in_filter_mode() {
        render_filter_footer(frame, app, chunks[2]);
    } else {
        render_footer(frame, app, chunks[2]);
    }
}

/// Header, contenu, footer
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(4),
        ])
        .split(area)
        .to_vec()
}

fn key_style(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

// ============================================================================
// Header
// ============================================================================

/// Titre + indicateur de chargement
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" StockScope ")
        .title_alignment(Alignment::Center);

    let line = match (&app.loading_message, app.is_loading_data()) {
        (Some(message), true) => Line::from(Span::styled(
            format!("⏳ {}", message),
            key_style(Color::Yellow),
        )),
        _ => Line::from(Span::styled(
            format!("📈 {} symboles dans le catalogue", app.catalog.len()),
            key_style(Color::Green),
        )),
    };

    frame.render_widget(
        Paragraph::new(line).block(block).alignment(Alignment::Center),
        area,
    );
}

// ============================================================================
// Liste des symboles
// ============================================================================

fn render_symbol_list(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.filter.is_empty() {
        " 📋 Symboles ".to_string()
    } else {
        format!(" 📋 Symboles [/{}] ({}) ", app.filter, app.visible.len())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);

    if app.visible.is_empty() {
        let message = if app.catalog.is_empty() {
            "Catalogue vide : vérifiez --catalog (colonne SYMBOL)"
        } else {
            "Aucun symbole ne correspond au filtre"
        };
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(message, Style::default().fg(Color::Gray))),
        ])
        .block(block)
        .alignment(Alignment::Center);

        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .visible_symbols()
        .map(|symbol| ListItem::new(format!(" {}", symbol)))
        .collect();

    let list = List::new(items)
        .block(block)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::REVERSED),
        )
        .highlight_symbol("▶");

    // CONCEPT RATATUI : rendu stateful
    // - ListState garde l'offset de défilement pour que la sélection reste visible
    let mut state = ListState::default().with_selected(Some(app.selected_index));
    frame.render_stateful_widget(list, area, &mut state);
}

// ============================================================================
// Footer
// ============================================================================

/// Raccourcis clavier, ou confirmation de quit
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let shortcuts = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled("⚠  Appuyez sur ", key_style(Color::Yellow)),
            Span::styled(
                "[q]",
                key_style(Color::Red).add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                key_style(Color::Yellow),
            ),
        ])
    } else if app.is_on_report() {
        Line::from(vec![
            Span::styled("[q]", key_style(Color::Yellow)),
            Span::raw(" Quit  "),
            Span::styled("[ESC / Space]", key_style(Color::Yellow)),
            Span::raw(" Retour à la liste"),
        ])
    } else {
        Line::from(vec![
            Span::styled("[q]", key_style(Color::Yellow)),
            Span::raw(" Quit  "),
            Span::styled("[↑↓ / j k]", key_style(Color::Yellow)),
            Span::raw(" Navigate  "),
            Span::styled("[Enter]", key_style(Color::Yellow)),
            Span::raw(" Analyse  "),
            Span::styled("[/]", key_style(Color::Green)),
            Span::raw(" Filtre"),
        ])
    };

    let paragraph = Paragraph::new(vec![shortcuts])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Ligne de saisie du filtre
fn render_filter_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let input_line = Line::from(vec![
        Span::styled("Filtre : ", key_style(Color::Cyan)),
        Span::styled(app.filter.as_str(), Style::default().fg(Color::White)),
        Span::styled(
            "█",
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ),
    ]);

    let help_line = Line::from(vec![
        Span::styled("[Enter]", key_style(Color::Green)),
        Span::raw(" Valider  "),
        Span::styled("[ESC]", key_style(Color::Red)),
        Span::raw(" Effacer"),
    ]);

    frame.render_widget(
        Paragraph::new(vec![input_line, help_line]).block(block),
        area,
    );
}
