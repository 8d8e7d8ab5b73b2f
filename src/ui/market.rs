// ============================================================================
// Marché secondaire
// ============================================================================
// Liste des annonces, offres reçues sur l'annonce sélectionnée, recherches
// sauvegardées et comparateur (3 annonces côte à côte)
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, List, ListItem, ListState, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, InputField, ListKind};
use crate::metrics::{fmt_money, fmt_percent};
use crate::models::SecondaryListing;
use crate::ui::dashboard::{filter_summary, panel, signed_color};

pub fn render_market(frame: &mut Frame, app: &App, area: Rect) {
    let compare_height = if app.comparison.is_empty() { 0 } else { 9 };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(compare_height)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(rows[0]);

    render_listings(frame, app, columns[0]);
    render_side_panel(frame, app, columns[1]);

    if !app.comparison.is_empty() {
        render_comparison(frame, app, rows[1]);
    }
}

fn render_listings(frame: &mut Frame, app: &App, area: Rect) {
    let filtered = app.filtered_listings();
    let visible = app.visible_listings();

    let mut title = format!(
        " 🔁 Listings ({}/{}) · sort: {} ",
        visible.len(),
        filtered.len(),
        app.listing_filter.sort.label()
    );
    let filters = filter_summary(app, ListKind::Listings);
    if !filters.is_empty() {
        title.push_str(&format!("· {} ", filters));
    }
    let block = panel(title);

    if visible.is_empty() {
        let message = if app.listings.is_empty() {
            "Aucune annonce disponible"
        } else {
            "Aucune annonce ne correspond aux filtres"
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
        .map(|listing| {
            let favorite = if app.favorites.contains(&listing.id) { "★" } else { " " };
            let compared = if app.comparison.contains(&listing.id) { "◆" } else { " " };
            ListItem::new(Line::from(vec![
                Span::raw(format!(" {}{} ", favorite, compared)),
                Span::styled(
                    listing.display(),
                    Style::default().fg(signed_color(listing.discount_percent())),
                ),
            ]))
        })
        .collect();

    if app.listing_page.has_more(filtered.len()) {
        items.push(
            ListItem::new(format!(
                "    … {} de plus, [m] pour afficher",
                filtered.len() - visible.len()
            ))
            .style(Style::default().fg(Color::DarkGray)),
        );
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

    let mut state = ListState::default().with_selected(Some(app.listing_selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Offres de l'annonce sélectionnée + recherches sauvegardées
fn render_side_panel(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    match app.selected_listing() {
        Some(listing) => {
            lines.push(Line::from(Span::styled(
                listing.title().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!("Seller: {}", listing.seller.name)));
            lines.push(Line::from(format!(
                "Ask: {}  ROI: {}",
                fmt_money(listing.total_price),
                fmt_percent(listing.investment.deal.expected_roi)
            )));
            lines.push(Line::from(""));

            if app.input_field() == Some(InputField::OfferPrice) {
                let form = &app.offer_form;
                let color = if form.at_or_above_ask() { Color::Yellow } else { Color::Green };
                lines.push(Line::from(Span::styled(
                    format!(
                        "Votre offre : {} ({} vs ask)",
                        fmt_money(form.parse()),
                        fmt_percent(form.delta_percent())
                    ),
                    Style::default().fg(color),
                )));
                lines.push(Line::from(""));
            }

            let pending: Vec<_> = listing.pending_offers().collect();
            if pending.is_empty() {
                lines.push(Line::from(Span::styled(
                    "Aucune offre en attente",
                    Style::default().fg(Color::Gray),
                )));
            } else {
                lines.push(Line::from(format!("Offres en attente ({})", pending.len())));
                for offer in pending {
                    lines.push(Line::from(format!(
                        "  {} · {}",
                        offer.buyer.as_deref().unwrap_or("?"),
                        fmt_money(Some(offer.offer_price))
                    )));
                }
            }
        }
        None => lines.push(Line::from("Aucune annonce sélectionnée")),
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Recherches sauvegardées · {} filtre(s) actif(s)", app.listing_filter.active_count()),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));
    if app.saved_searches.is_empty() {
        lines.push(Line::from(Span::styled("  (aucune)", Style::default().fg(Color::Gray))));
    }
    for name in &app.saved_searches {
        lines.push(Line::from(format!("  • {}", name)));
    }

    frame.render_widget(Paragraph::new(lines).block(panel(" Offers ".into())), area);
}

/// Tableau de comparaison : une colonne par annonce
fn render_comparison(frame: &mut Frame, app: &App, area: Rect) {
    let compared = app.compared_listings();

    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(compared.iter().map(|l| Cell::from(l.title().to_string()))),
    )
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let metric_rows: [(&str, fn(&SecondaryListing) -> String); 5] = [
        ("Total price", |l| fmt_money(l.total_price)),
        ("Price / share", |l| fmt_money(l.price_per_share)),
        ("Discount", |l| fmt_percent(l.discount_percent())),
        ("Expected ROI", |l| fmt_percent(l.investment.deal.expected_roi)),
        ("Shares", |l| format!("{:.0}", l.shares_for_sale)),
    ];

    let rows: Vec<Row> = metric_rows
        .iter()
        .map(|(label, value)| {
            Row::new(
                std::iter::once(Cell::from(label.to_string()))
                    .chain(compared.iter().map(|l| Cell::from(value(*l)))),
            )
        })
        .collect();

    let mut widths = vec![Constraint::Length(14)];
    widths.extend(compared.iter().map(|_| Constraint::Min(16)));

    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(format!(" Comparison ({}/3) · [C] clear ", compared.len())));

    frame.render_widget(table, area);
}
