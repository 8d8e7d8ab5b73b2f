// ============================================================================
// Détail d'un deal
// ============================================================================
// Chiffres clés, barre de levée, compte à rebours et formulaire
// d'investissement avec avertissements en direct
// ============================================================================

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputField};
use crate::metrics::{self, fmt_money, fmt_percent, NOT_AVAILABLE};
use crate::models::Deal;
use crate::ui::dashboard::{key_style, panel};

pub fn render_deal_detail(frame: &mut Frame, app: &App, area: Rect) {
    let Some(deal) = &app.current_deal else {
        frame.render_widget(Paragraph::new("Aucun deal sélectionné").block(panel(" Deal ".into())), area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(columns[0]);

    render_progress(frame, deal, left[0]);
    render_facts(frame, app, deal, left[1]);
    render_invest_form(frame, app, deal, columns[1]);
}

/// Barre de progression de la levée
///
/// Le texte affiche la valeur brute (ex: 125.0%), la barre est bornée à 100.
fn render_progress(frame: &mut Frame, deal: &Deal, area: Rect) {
    let progress = deal.funding_progress();
    let ratio = progress.map(metrics::progress_bar_width).unwrap_or(0.0) / 100.0;
    let color = match progress {
        Some(p) if p >= 100.0 => Color::Green,
        Some(_) => Color::Cyan,
        None => Color::DarkGray,
    };

    let gauge = Gauge::default()
        .block(panel(" Funding ".into()))
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .ratio(ratio)
        .label(format!(
            "{} of {} raised ({})",
            fmt_money(deal.raised_amount),
            fmt_money(deal.target_amount),
            fmt_percent(progress)
        ));

    frame.render_widget(gauge, area);
}

fn fact(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<18}", label), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
    ])
}

fn render_facts(frame: &mut Frame, app: &App, deal: &Deal, area: Rect) {
    let watched = if app.watchlist.contains(&deal.id) { " ★" } else { "" };
    let title = format!(" {}{} ", deal.title, watched);

    let spv = deal.spv.as_ref();
    let mut lines = vec![
        fact("Type", deal.deal_type.label().to_string()),
        fact("Location", deal.location.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())),
        fact("Status", deal.status.as_str().to_string()),
        Line::from(""),
        fact("Min ticket", fmt_money(deal.min_ticket)),
        fact("Expected ROI", fmt_percent(deal.expected_roi)),
        fact("Expected IRR", fmt_percent(deal.expected_irr)),
        fact(
            "Holding period",
            deal.holding_period_months
                .map(|m| format!("{} months", m))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        fact(
            "Investors",
            deal.investor_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        Line::from(""),
        fact("Share price", fmt_money(spv.and_then(|s| s.share_price))),
        fact(
            "Shares available",
            spv.and_then(|s| s.shares_available())
                .map(|n| format!("{:.0}", n))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
    ];

    if let Some(closing) = deal.closing_date {
        let countdown = metrics::countdown(Utc::now(), closing);
        let value = if countdown.is_over() {
            "closed".to_string()
        } else {
            countdown.label()
        };
        lines.push(Line::from(""));
        lines.push(fact("Closes in", value));
    }

    let paragraph = Paragraph::new(lines)
        .block(panel(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Formulaire d'investissement
///
/// Les avertissements sont recalculés à chaque frappe ; tant qu'il y en a un,
/// la soumission est refusée.
fn render_invest_form(frame: &mut Frame, app: &App, deal: &Deal, area: Rect) {
    let form = &app.invest_form;
    let editing = app.input_field() == Some(InputField::InvestAmount);

    let mut lines = vec![
        fact("Available balance", fmt_money(app.available_balance())),
        fact("Minimum", fmt_money(form.min_ticket)),
        Line::from(""),
    ];

    if !deal.status.accepts_investments() {
        lines.push(Line::from(Span::styled(
            format!("Ce deal n'accepte plus d'investissements ({})", deal.status.as_str()),
            Style::default().fg(Color::Yellow),
        )));
    } else if app.submitting {
        lines.push(Line::from(Span::styled(
            "⏳ Envoi de l'investissement...",
            Style::default().fg(Color::Yellow),
        )));
    } else if app.redirect_at.is_some() {
        lines.push(Line::from(Span::styled(
            "✓ Investissement confirmé, retour à la liste...",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
    } else if editing || !form.amount_input.is_empty() {
        lines.push(fact("Amount", format!("${}", form.amount_input)));
        lines.push(fact(
            "Monthly income",
            fmt_money(form.projected_monthly_income(deal.expected_roi)),
        ));
        lines.push(fact(
            "Total return",
            fmt_money(metrics::total_return(
                form.amount(),
                deal.expected_roi,
                deal.holding_period_months,
            )),
        ));
        lines.push(Line::from(""));

        let warnings = form.validate();
        if warnings.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("[Enter]", key_style(Color::Green)),
                Span::raw(" Invest"),
            ]));
        } else {
            for warning in warnings {
                lines.push(Line::from(Span::styled(
                    format!("⚠ {}", warning),
                    Style::default().fg(Color::Yellow),
                )));
            }
        }
    } else {
        lines.push(Line::from(vec![
            Span::raw("Press "),
            Span::styled("[i]", key_style(Color::Green)),
            Span::raw(" to invest"),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(panel(" 💰 Invest ".into()))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
