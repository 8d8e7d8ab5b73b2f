// ============================================================================
// Écrans d'information : bundles et FAQ
// ============================================================================

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::content::{FAQ, KEY_METRICS, SHARIAH_PRINCIPLES};
use crate::metrics::{fmt_money, fmt_percent};
use crate::ui::dashboard::panel;

// ============================================================================
// Bundles
// ============================================================================

pub fn render_bundles(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let items: Vec<ListItem> = app
        .bundles
        .iter()
        .map(|bundle| ListItem::new(format!(" {}", bundle.display())))
        .collect();

    if items.is_empty() {
        let paragraph = Paragraph::new(Span::styled(
            "Aucun bundle disponible",
            Style::default().fg(Color::Gray),
        ))
        .block(panel(" 📦 Bundles ".into()));
        frame.render_widget(paragraph, columns[0]);
    } else {
        let list = List::new(items)
            .block(panel(format!(" 📦 Bundles ({}) ", app.bundles.len())))
            .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));
        let mut state = ListState::default().with_selected(Some(app.bundle_selected));
        frame.render_stateful_widget(list, columns[0], &mut state);
    }

    let mut lines = Vec::new();
    if let Some(bundle) = app.selected_bundle() {
        lines.push(Line::from(Span::styled(
            bundle.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        if let Some(description) = &bundle.description {
            lines.push(Line::from(description.clone()));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(format!(
            "Expected ROI {}  ·  Minimum {}",
            fmt_percent(bundle.expected_roi),
            fmt_money(bundle.min_investment)
        )));
        lines.push(Line::from(""));

        // Répartition du ticket minimum entre les deals du bundle
        let split = bundle.min_investment.map(|min| bundle.split_amount(min)).unwrap_or_default();
        lines.push(Line::from(Span::styled("Allocation", Style::default().fg(Color::Cyan))));
        for allocation in &bundle.allocation {
            let amount = split
                .iter()
                .find(|(id, _)| *id == allocation.deal_id)
                .map(|(_, amount)| *amount);
            let title = app
                .deals
                .iter()
                .find(|d| d.id == allocation.deal_id)
                .map(|d| d.title.as_str())
                .unwrap_or(allocation.deal_id.as_str());
            lines.push(Line::from(format!(
                "  {:<24} {:>6.1}%  {}",
                title,
                allocation.weight,
                fmt_money(amount)
            )));
        }
    }

    let detail = Paragraph::new(lines)
        .block(panel(" Detail ".into()))
        .wrap(Wrap { trim: false });
    frame.render_widget(detail, columns[1]);
}

// ============================================================================
// FAQ (accordéon) + conformité Shariah + chiffres clés
// ============================================================================

pub fn render_faq(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let mut lines = Vec::new();
    for (index, entry) in FAQ.iter().enumerate() {
        let expanded = app.faq.is_expanded(index);
        let marker = if expanded { "▾" } else { "▸" };
        let mut style = Style::default().add_modifier(Modifier::BOLD);
        if index == app.faq_selected {
            style = style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(Span::styled(format!("{} {}", marker, entry.question), style)));
        if expanded {
            lines.push(Line::from(Span::styled(
                format!("  {}", entry.answer),
                Style::default().fg(Color::Gray),
            )));
        }
        lines.push(Line::from(""));
    }

    let faq = Paragraph::new(lines)
        .block(panel(" ❓ FAQ ".into()))
        .wrap(Wrap { trim: false });
    frame.render_widget(faq, columns[0]);

    let mut notes: Vec<Line> = KEY_METRICS
        .iter()
        .map(|m| {
            Line::from(vec![
                Span::styled(
                    format!("{:>5} ", m.value),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::raw(m.label),
            ])
        })
        .collect();
    notes.push(Line::from(""));
    notes.push(Line::from(Span::styled(
        "Shariah compliance",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));
    notes.extend(SHARIAH_PRINCIPLES.iter().map(|p| Line::from(format!("• {}", p))));

    let about = Paragraph::new(notes)
        .block(panel(" About ".into()))
        .wrap(Wrap { trim: false });
    frame.render_widget(about, columns[1]);
}
