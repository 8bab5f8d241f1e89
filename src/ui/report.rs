// ============================================================================
// Report - Rendu du résultat d'une requête
// ============================================================================
// Colonne gauche : table d'informations + chemin du PNG
// Colonne droite : les trois panneaux du graphique en version terminal
//   1. BarChart résultat net
//   2. BarChart chiffre d'affaires
//   3. Chart ligne des moyennes High / Low par trimestre
//
// CONCEPTS RATATUI :
// 1. BarChart + BarGroup + Bar : barres avec libellé et texte de valeur
// 2. Chart + Dataset : plusieurs séries sur les mêmes axes
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap,
    },
    Frame,
};

use crate::app::{App, Outcome};
use crate::format::CurrencyFormatter;
use crate::handler::{RequestFailure, StockReport};
use crate::models::{QuarterlyAverage, QUARTERS};

/// Dessine l'écran de rapport (ou l'erreur de la dernière requête)
pub fn render_report(frame: &mut Frame, app: &App, area: Rect) {
    match &app.outcome {
        Some(Outcome::Report { report, chart_path }) => {
            render_stock_report(frame, report, chart_path, area)
        }
        Some(Outcome::Failure(failure)) => render_failure(frame, failure, area),
        None => render_message(frame, area, "Aucune requête effectuée"),
    }
}

fn render_stock_report(
    frame: &mut Frame,
    report: &StockReport,
    chart_path: &Result<std::path::PathBuf, String>,
    area: Rect,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_info(frame, report, chart_path, columns[0]);

    let panels = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
        ])
        .split(columns[1]);

    let ticker = report.ticker.qualified();
    let periods: Vec<String> = report
        .financials
        .periods
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();
    let period_hint = if periods.is_empty() {
        String::new()
    } else {
        format!(" [{}]", periods.join(", "))
    };

    render_bars(
        frame,
        panels[0],
        &format!(" {} - Net Profit (Last 3 Quarters){} ", ticker, period_hint),
        &report.financials.net_profit,
        Color::Blue,
    );
    render_bars(
        frame,
        panels[1],
        &format!(" {} - Sales (Last 3 Quarters) ", ticker),
        &report.financials.sales,
        Color::LightYellow,
    );
    render_high_low(
        frame,
        panels[2],
        &format!(" {} - 52-Week High/Low Averages by Quarter ", ticker),
        &report.averages,
    );
}

// ============================================================================
// Table d'informations
// ============================================================================

fn render_info(
    frame: &mut Frame,
    report: &StockReport,
    chart_path: &Result<std::path::PathBuf, String>,
    area: Rect,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" 📊 {} ", report.ticker));

    let mut lines: Vec<Line> = report
        .info
        .iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(
                    format!("{}: ", label),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw(value),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(match chart_path {
        Ok(path) => Line::from(vec![
            Span::styled("🖼  Graphique : ", Style::default().fg(Color::Green)),
            Span::raw(path.display().to_string()),
        ]),
        Err(reason) => Line::from(Span::styled(
            format!("⚠ Graphique non enregistré : {}", reason),
            Style::default().fg(Color::Red),
        )),
    });

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Barres trimestrielles
// ============================================================================

/// BarChart sur 3 trimestres, Q1 = le plus récent
///
/// Les barres n'ont pas de hauteur négative : une perte est dessinée à 0,
/// son montant reste lisible dans le texte de la barre.
fn render_bars(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    values: &[Option<f64>; QUARTERS],
    color: Color,
) {
    let formatter = CurrencyFormatter::new("");

    let bars: Vec<Bar> = values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let height = value.map(|v| v.max(0.0) as u64).unwrap_or(0);
            let text = formatter.format(*value);
            Bar::default()
                .value(height)
                .label(Line::from(format!("Q{}", i + 1)))
                .text_value(text)
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect();

    // Trois barres qui se partagent la largeur utile
    let inner_width = area.width.saturating_sub(2);
    let bar_width = (inner_width / QUARTERS as u16).saturating_sub(2).max(3);

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(title.to_string()),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(2);

    frame.render_widget(chart, area);
}

// ============================================================================
// Moyennes High / Low
// ============================================================================

fn render_high_low(frame: &mut Frame, area: Rect, title: &str, averages: &[QuarterlyAverage]) {
    if averages.is_empty() {
        render_message(frame, area, "Pas d'historique sur 1 an");
        return;
    }

    let highs: Vec<(f64, f64)> = averages
        .iter()
        .enumerate()
        .map(|(i, a)| (i as f64, a.high))
        .collect();
    let lows: Vec<(f64, f64)> = averages
        .iter()
        .enumerate()
        .map(|(i, a)| (i as f64, a.low))
        .collect();

    let (y_min, y_max) = averages.iter().fold((f64::MAX, f64::MIN), |(lo, hi), a| {
        (lo.min(a.low), hi.max(a.high))
    });
    let margin = ((y_max - y_min) * 0.1).max(1.0);
    let (y_min, y_max) = ((y_min - margin).max(0.0), y_max + margin);

    let datasets = vec![
        Dataset::default()
            .name("High")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&highs),
        Dataset::default()
            .name("Low")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&lows),
    ];

    let x_labels: Vec<Span> = averages.iter().map(|a| Span::raw(a.label())).collect();
    let x_axis = Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, (averages.len().max(2) - 1) as f64])
        .labels(x_labels);

    let y_axis = Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format!("{:.0}", y_min)),
            Span::raw(format!("{:.0}", (y_min + y_max) / 2.0)),
            Span::raw(format!("{:.0}", y_max)),
        ]);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(title.to_string()),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

// ============================================================================
// Erreurs
// ============================================================================

/// Vue d'erreur : uniquement le message, aucun graphique
fn render_failure(frame: &mut Frame, failure: &RequestFailure, area: Rect) {
    render_message(frame, area, &failure.to_string());
}

fn render_message(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" ⚠ Erreur ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled("[ESC] Retour", Style::default().fg(Color::Gray))),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::catalog::SymbolCatalog;
    use crate::models::Ticker;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_failure_view_shows_error_line() {
        let mut app = App::new(SymbolCatalog::from_symbols(["TCS"]));
        app.finish_request(Outcome::Failure(RequestFailure {
            ticker: Ticker::qualify("TCS", "NS"),
            reason: "boom".to_string(),
        }));

        let mut terminal = Terminal::new(TestBackend::new(100, 10)).unwrap();
        terminal
            .draw(|frame| render_report(frame, &app, frame.size()))
            .unwrap();

        assert!(buffer_text(&terminal).contains("Error fetching data for TCS.NS: boom"));
    }
}
