// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Cadre commun à tous les écrans (en-tête à onglets, barre de notification,
// pied de page avec raccourcis) et liste des deals
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Widgets : Block, Paragraph, List, Tabs
// 3. Layout : découpage de l'espace en zones
// 4. Style : couleurs et attributs de texte
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, ListKind, Screen};
use crate::metrics;
use crate::notify::Level;
use crate::ui::{detail, info, market};

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - En mode saisie, l'écran d'origine reste dessiné derrière la ligne de
///   saisie
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);

    match app.base_screen() {
        Screen::Deals => render_deals(frame, app, chunks[1]),
        Screen::DealDetail => detail::render_deal_detail(frame, app, chunks[1]),
        Screen::Market => market::render_market(frame, app, chunks[1]),
        Screen::Bundles => info::render_bundles(frame, app, chunks[1]),
        Screen::Faq => info::render_faq(frame, app, chunks[1]),
        // base_screen() ne retourne jamais Input
        Screen::Input => {}
    }

    render_status_line(frame, app, chunks[2]);

    if app.is_in_input_mode() {
        render_input_footer(frame, app, chunks[3]);
    } else {
        render_footer(frame, app, chunks[3]);
    }
}

// ============================================================================
// Layout : Découpage de l'écran
// ============================================================================

/// Crée le layout principal (header, content, status, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header : onglets
            Constraint::Min(0),    // Content : tout le reste
            Constraint::Length(1), // Notification / chargement
            Constraint::Length(3), // Footer : raccourcis
        ])
        .split(area)
        .to_vec()
}

/// Style des raccourcis clavier dans les pieds de page
pub(crate) fn key_style(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Bloc standard avec bordure cyan
pub(crate) fn panel(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title)
}

/// Couleur d'une valeur signée (vert positif, rouge négatif, gris inconnu)
pub(crate) fn signed_color(value: Option<f64>) -> Color {
    match value {
        Some(v) if v > 0.0 => Color::Green,
        Some(v) if v < 0.0 => Color::Red,
        Some(_) => Color::White,
        None => Color::Gray,
    }
}

// ============================================================================
// Header : onglets + session
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Screen::TABS
        .iter()
        .enumerate()
        .map(|(i, screen)| Line::from(format!("{} {}", i + 1, screen.title())))
        .collect();

    let selected = Screen::TABS
        .iter()
        .position(|s| *s == app.tab_screen())
        .unwrap_or(0);

    // Utilisateur et solde à droite du titre
    let session = match (&app.user, app.available_balance()) {
        (Some(user), balance) => format!(" {} · {} ", user.name, metrics::fmt_money(balance)),
        (None, Some(balance)) => format!(" {} ", metrics::fmt_money(Some(balance))),
        (None, None) => String::new(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" OWNLY ")
        .title(
            ratatui::widgets::block::Title::from(session).alignment(Alignment::Right),
        );

    let tabs = Tabs::new(titles)
        .block(block)
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

// ============================================================================
// Deals : liste filtrée
// ============================================================================

fn render_deals(frame: &mut Frame, app: &App, area: Rect) {
    let filtered = app.filtered_deals();
    let visible = app.visible_deals();

    let mut title = format!(
        " 🏢 Deals ({}/{}) · sort: {} ",
        visible.len(),
        filtered.len(),
        app.deal_filter.sort.label()
    );
    let filters = filter_summary(app, ListKind::Deals);
    if !filters.is_empty() {
        title.push_str(&format!("· {} ", filters));
    }
    let block = panel(title);

    if visible.is_empty() {
        let message = if app.deals.is_empty() {
            if app.is_loading { "Chargement des deals..." } else { "Aucun deal disponible" }
        } else {
            "Aucun deal ne correspond aux filtres"
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

    let mut items: Vec<ListItem> = visible
        .iter()
        .map(|deal| {
            let marker = if app.watchlist.contains(&deal.id) { "★" } else { " " };
            let style = if deal.status.accepts_investments() {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::Gray)
            };
            ListItem::new(format!(" {} {}", marker, deal.display())).style(style)
        })
        .collect();

    if app.deal_page.has_more(filtered.len()) {
        items.push(
            ListItem::new(format!(
                "   … {} de plus, [m] pour afficher",
                filtered.len() - visible.len()
            ))
            .style(Style::default().fg(Color::DarkGray)),
        );
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

    let mut state = ListState::default().with_selected(Some(app.deal_selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Résumé des filtres actifs : "type=franchise status=open min=500"
pub(crate) fn filter_summary(app: &App, kind: ListKind) -> String {
    let (search, deal_type, status, min, max, saved_only) = match kind {
        ListKind::Deals => {
            let f = &app.deal_filter;
            (&f.search, &f.deal_type, &f.status, &f.min_price, &f.max_price, f.watchlist_only)
        }
        ListKind::Listings => {
            let f = &app.listing_filter;
            (&f.search, &f.deal_type, &f.status, &f.min_price, &f.max_price, f.favorites_only)
        }
    };

    let mut parts = Vec::new();
    for (label, value) in [("search", search), ("type", deal_type), ("status", status), ("min", min), ("max", max)] {
        if !value.trim().is_empty() {
            parts.push(format!("{}={}", label, value.trim()));
        }
    }
    if saved_only {
        parts.push("★ only".to_string());
    }
    parts.join(" ")
}

// ============================================================================
// Ligne de statut : notification ou chargement
// ============================================================================

fn render_status_line(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(notification) = app.notifications.front() {
        let (icon, color) = match notification.level {
            Level::Info => ("ℹ", Color::Cyan),
            Level::Success => ("✓", Color::Green),
            Level::Warning => ("⚠", Color::Yellow),
            Level::Error => ("✗", Color::Red),
        };
        let pending = app.notifications.len().saturating_sub(1);
        let mut spans = vec![Span::styled(
            format!(" {} {}", icon, notification.message),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )];
        if pending > 0 {
            spans.push(Span::styled(
                format!("  (+{})", pending),
                Style::default().fg(Color::DarkGray),
            ));
        }
        spans.push(Span::styled("  [n] fermer", Style::default().fg(Color::DarkGray)));
        Line::from(spans)
    } else if app.is_loading {
        Line::from(Span::styled(
            format!(" ⏳ {}", app.loading_message.as_deref().unwrap_or("Chargement...")),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from("")
    };

    frame.render_widget(Paragraph::new(line), area);
}

// ============================================================================
// Footer : Instructions
// ============================================================================

/// Dessine le footer avec les raccourcis clavier de l'écran courant
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let shortcuts = if app.is_awaiting_withdraw_confirmation() {
        let title = app.selected_listing().map(|l| l.title()).unwrap_or("?");
        confirmation_line("[d]", &format!(" à nouveau pour retirer \"{}\" ou autre touche pour annuler ⚠", title))
    } else if app.is_awaiting_quit_confirmation() {
        confirmation_line(
            "[q]",
            " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
        )
    } else {
        let mut spans = vec![
            Span::styled("[q]", key_style(Color::Yellow)),
            Span::raw(" Quit  "),
            Span::styled("[Tab/1-4]", key_style(Color::Yellow)),
            Span::raw(" Screens  "),
        ];
        let specific: &[(&str, &str)] = match app.current_screen {
            Screen::Deals => &[
                ("[Enter]", " Detail  "),
                ("[/]", " Search  "),
                ("[t/s/o]", " Type/Status/Sort  "),
                ("[[ ]]", " Min/Max  "),
                ("[w/W]", " Watch/Only  "),
                ("[m]", " More"),
            ],
            Screen::DealDetail => &[
                ("[i]", " Invest  "),
                ("[w]", " Watch  "),
                ("[r]", " Reload  "),
                ("[Esc]", " Back"),
            ],
            Screen::Market => &[
                ("[b]", " Offer  "),
                ("[a/x]", " Accept/Reject  "),
                ("[d]", " Withdraw  "),
                ("[f/F]", " Fav/Only  "),
                ("[c/C]", " Compare  "),
                ("[S/L/X]", " Searches  "),
                ("[/ t s o [ ] m]", " Filters"),
            ],
            Screen::Bundles => &[("[↑↓]", " Navigate  "), ("[r]", " Reload")],
            Screen::Faq => &[("[↑↓]", " Navigate  "), ("[Enter]", " Expand")],
            Screen::Input => &[],
        };
        for (key, label) in specific {
            spans.push(Span::styled(*key, key_style(Color::Green)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    let paragraph = Paragraph::new(vec![shortcuts])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Message de confirmation two-step (touche qui clignote)
fn confirmation_line(key: &str, rest: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled("⚠  Appuyez sur ", key_style(Color::Yellow)),
        Span::styled(
            key.to_string(),
            key_style(Color::Red).add_modifier(Modifier::SLOW_BLINK),
        ),
        Span::styled(rest.to_string(), key_style(Color::Yellow)),
    ])
}

// ============================================================================
// Input Mode : ligne de saisie
// ============================================================================

/// Dessine le footer en mode input avec la ligne de saisie
fn render_input_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green)); // Vert pour indiquer mode input

    let prompt = app.input_field().map(|f| f.prompt()).unwrap_or("");

    let input_line = Line::from(vec![
        Span::styled(prompt, key_style(Color::Cyan)),
        Span::styled(app.input_value(), Style::default().fg(Color::White)),
        Span::styled(
            "█", // Curseur
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ),
        Span::raw("   "),
        Span::styled("[Enter]", key_style(Color::Green)),
        Span::raw(" Confirm  "),
        Span::styled("[ESC]", key_style(Color::Red)),
        Span::raw(" Cancel"),
    ]);

    let paragraph = Paragraph::new(vec![input_line])
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}
