use ratatui::prelude::*;
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Block, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row, Table, Tabs, Wrap,
};

use crate::insights::{Summary, EMPTY_MESSAGE};
use crate::output::{format_score, truncate_name};
use crate::scoring::{RankedUseCase, ScoredUseCase, WEIGHT_MAX, WEIGHT_STEP};
use crate::tui::app::{App, InputMode, View};
use crate::tui::theme::{ThemeColors, READINESS_HIGH, READINESS_LOW};
use crate::usecase::{Factor, Field, UseCase};

const WEIGHTS_PANEL_WIDTH: u16 = 28;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 12 || area.width < 60 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    let body = Layout::horizontal([Constraint::Length(WEIGHTS_PANEL_WIDTH), Constraint::Fill(1)])
        .split(chunks[2]);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    render_weights(frame, body[0], app);
    match app.current_view {
        View::UseCases => render_use_case_table(frame, body[1], app),
        View::Ranking => render_ranking(frame, body[1], app),
        View::Summary => render_summary(frame, body[1], app),
    }
    render_status_bar(frame, chunks[3], app);

    // Render overlays based on input mode
    match app.input_mode {
        InputMode::Edit => render_edit_popup(frame, app),
        InputMode::Help => render_help_popup(frame, &app.theme),
        InputMode::ScoreBreakdown => render_breakdown_popup(frame, app),
        InputMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let left = "AI Opportunity & Change Readiness Evaluator";
    let right = format!("{} use cases", app.session.len());
    let padding_len = (area.width as usize).saturating_sub(left.len() + right.len());

    let title = Line::from(vec![
        Span::styled(left, Style::default().fg(app.theme.title_color).bold()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right, Style::default().fg(app.theme.muted)),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<&str> = View::ALL.iter().map(|v| v.title()).collect();
    let selected = View::ALL
        .iter()
        .position(|v| *v == app.current_view)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive_style)
        .highlight_style(app.theme.tab_active_style)
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_weights(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let weights = app.session.weights();
    let mut lines = Vec::new();

    for (i, factor) in Factor::ALL.iter().enumerate() {
        let selected = *factor == app.selected_weight;
        let marker = if selected { "> " } else { "  " };
        let label_style = if selected {
            theme.weight_selected
        } else {
            Style::default()
        };

        let mut label = vec![
            Span::styled(format!("{}{} ", marker, i + 1), label_style),
            Span::styled(factor.label(), label_style),
        ];
        if factor.is_penalty() {
            label.push(Span::styled(" (-)", Style::default().fg(theme.weight_penalty)));
        }
        lines.push(Line::from(label));

        let weight = weights.get(*factor);
        let mut value = vec![Span::raw(format!("    {:>4.1} ", weight))];
        value.extend(weight_bar(weight, 10, theme).spans);
        lines.push(Line::from(value));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Sum {:.1}  Step {}", weights.sum(), WEIGHT_STEP),
        Style::default().fg(theme.muted),
    )));
    if weights.sum() == 0.0 {
        lines.push(Line::from(Span::styled(
            "All weights zero",
            Style::default().fg(theme.flash_warning),
        )));
    }

    let block = Block::bordered().title(" Weights ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn weight_bar(weight: f64, width: usize, theme: &ThemeColors) -> Line<'static> {
    let ratio = (weight / WEIGHT_MAX).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled("█".repeat(filled), Style::default().fg(theme.title_color)));
    }
    if empty > 0 {
        spans.push(Span::styled("░".repeat(empty), Style::default().fg(theme.bar_empty)));
    }
    Line::from(spans)
}

fn render_empty(frame: &mut Frame, area: Rect, theme: &ThemeColors) {
    let msg = Paragraph::new(vec![
        Line::from(EMPTY_MESSAGE),
        Line::from(Span::styled("Press a to add one", Style::default().fg(theme.muted))),
    ])
    .alignment(Alignment::Center)
    .block(Block::bordered());
    frame.render_widget(msg, area);
}

fn rating_cell<'a>(use_case: &UseCase, factor: Factor, theme: &ThemeColors) -> Cell<'a> {
    let rating = use_case.rating(factor);
    let style = if rating.is_out_of_range() {
        Style::default().fg(theme.out_of_range)
    } else {
        Style::default()
    };
    Cell::from(rating.display()).style(style)
}

fn render_use_case_table(frame: &mut Frame, area: Rect, app: &mut App) {
    let scored = app.session.scored();
    if scored.is_empty() {
        render_empty(frame, area, &app.theme);
        return;
    }

    let theme = &app.theme;
    let max_score = max_priority(&scored);

    let rows: Vec<Row> = scored
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let uc = &row.use_case;
            let mut cells = vec![
                Cell::from(format!("{}.", idx + 1)).style(Style::default().fg(theme.index_color)),
                Cell::from(truncate_name(&uc.name, 40)),
            ];
            cells.extend(Factor::ALL.iter().map(|f| rating_cell(uc, *f, theme)));
            cells.push(Cell::from(truncate_name(&uc.owner, 18)));
            cells.push(
                Cell::from(format_score(row.priority_score))
                    .style(Style::default().fg(theme.score_color(row.priority_score, max_score))),
            );
            cells.push(
                Cell::from(format_score(row.readiness_score))
                    .style(Style::default().fg(theme.readiness_color(row.readiness_score))),
            );

            // Alternating row background (odd rows get subtle background)
            let row_style = if idx % 2 == 1 {
                Style::default().bg(theme.row_alt_bg)
            } else {
                Style::default()
            };
            Row::new(cells).style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(18),
        Constraint::Length(7),
        Constraint::Length(7),
    ];

    let mut header = vec!["#", "Use Case"];
    header.extend(Factor::ALL.iter().map(|f| f.short()));
    header.extend(["Owner", "Prio", "Ready"]);

    let table = Table::new(rows, widths)
        .header(Row::new(header).style(theme.header_style).bottom_margin(1))
        .row_highlight_style(theme.row_selected)
        .block(Block::bordered().title(" Use Cases "));

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn max_priority(scored: &[ScoredUseCase]) -> f64 {
    scored
        .iter()
        .map(|s| s.priority_score)
        .fold(0.0_f64, f64::max)
}

fn ranked_rows<'a>(ranked: &[RankedUseCase], max_score: f64, theme: &ThemeColors) -> Vec<Row<'a>> {
    ranked
        .iter()
        .map(|r| {
            let s = &r.scored;
            let score_color = theme.score_color(s.priority_score, max_score);
            let mut score_spans = vec![Span::styled(
                format!("{:>6} ", format_score(s.priority_score)),
                Style::default().fg(score_color),
            )];
            score_spans.extend(score_bar(s.priority_score, max_score, 10, theme).spans);

            Row::new(vec![
                Cell::from(format!("{}.", r.rank)).style(Style::default().fg(theme.index_color)),
                Cell::from(Line::from(score_spans)),
                Cell::from(format_score(s.readiness_score))
                    .style(Style::default().fg(theme.readiness_color(s.readiness_score))),
                Cell::from(truncate_name(&s.use_case.name, 40)),
            ])
        })
        .collect()
}

fn ranked_table<'a>(rows: Vec<Row<'a>>, title: &'a str, theme: &ThemeColors) -> Table<'a> {
    let widths = [
        Constraint::Length(4),
        Constraint::Length(18),
        Constraint::Length(6),
        Constraint::Fill(1),
    ];
    Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Priority", "Ready", "Use Case"])
                .style(theme.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(theme.row_selected)
        .block(Block::bordered().title(title))
}

fn render_ranking(frame: &mut Frame, area: Rect, app: &mut App) {
    let ranked = app.ranked();
    if ranked.is_empty() {
        render_empty(frame, area, &app.theme);
        return;
    }

    let chunks =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).split(area);

    let max_score = ranked
        .iter()
        .map(|r| r.scored.priority_score)
        .fold(0.0_f64, f64::max);
    let rows = ranked_rows(&ranked, max_score, &app.theme);
    let table = ranked_table(rows, " Priority Ranking ", &app.theme);
    frame.render_stateful_widget(table, chunks[0], &mut app.table_state);

    render_scatter(frame, chunks[1], &ranked, &app.theme);
}

/// Feasibility vs value, one dataset per readiness band
fn render_scatter(frame: &mut Frame, area: Rect, ranked: &[RankedUseCase], theme: &ThemeColors) {
    let mut ready = Vec::new();
    let mut partial = Vec::new();
    let mut groundwork = Vec::new();
    for r in ranked {
        let uc = &r.scored.use_case;
        let point = (
            uc.value(Factor::TechnicalFeasibility),
            uc.value(Factor::BusinessValue),
        );
        if r.scored.readiness_score >= READINESS_HIGH {
            ready.push(point);
        } else if r.scored.readiness_score >= READINESS_LOW {
            partial.push(point);
        } else {
            groundwork.push(point);
        }
    }

    let x_bounds = axis_bounds(ranked.iter().map(|r| r.scored.use_case.value(Factor::TechnicalFeasibility)));
    let y_bounds = axis_bounds(ranked.iter().map(|r| r.scored.use_case.value(Factor::BusinessValue)));

    let datasets = vec![
        Dataset::default()
            .name(format!("Ready >= {}", READINESS_HIGH))
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(theme.score_high))
            .data(&ready),
        Dataset::default()
            .name("Partial")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(theme.score_mid))
            .data(&partial),
        Dataset::default()
            .name(format!("Groundwork < {}", READINESS_LOW))
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(theme.score_low))
            .data(&groundwork),
    ];

    let chart = Chart::new(datasets)
        .block(Block::bordered().title(" Feasibility vs Value "))
        .x_axis(
            Axis::default()
                .title("Feasibility")
                .style(Style::default().fg(theme.muted))
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title("Value")
                .style(Style::default().fg(theme.muted))
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds)),
        );

    frame.render_widget(chart, area);
}

/// Axis range covering 1-5 plus any out-of-range ratings
fn axis_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (lo, hi) = values.fold((1.0_f64, 5.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    [lo - 0.5, hi + 0.5]
}

fn axis_labels(bounds: [f64; 2]) -> Vec<String> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    vec![
        format!("{:.0}", bounds[0]),
        format!("{:.0}", mid),
        format!("{:.0}", bounds[1]),
    ]
}

fn score_bar(score: f64, max_score: f64, width: usize, theme: &ThemeColors) -> Line<'static> {
    if score < 0.0 {
        // Penalties outweigh benefits: draw a single marker instead of a bar
        return Line::from(Span::styled("◂", Style::default().fg(theme.bar_negative)));
    }
    let ratio = if max_score > 0.0 {
        (score / max_score).min(1.0)
    } else {
        0.0
    };
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    let bar_color = theme.score_color(score, max_score);

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled("█".repeat(filled), Style::default().fg(bar_color)));
    }
    if empty > 0 {
        spans.push(Span::styled("░".repeat(empty), Style::default().fg(theme.bar_empty)));
    }

    Line::from(spans)
}

fn render_summary(frame: &mut Frame, area: Rect, app: &mut App) {
    let ranked = app.ranked();
    let summary = Summary::from_ranked(&ranked, app.effective_top_n());
    let theme = app.theme.clone();

    if summary.is_empty() {
        render_empty(frame, area, &theme);
        return;
    }

    let table_height = summary.top.len() as u16 + 4;
    let chunks =
        Layout::vertical([Constraint::Length(table_height), Constraint::Fill(1)]).split(area);

    let max_score = summary
        .top
        .iter()
        .map(|r| r.scored.priority_score)
        .fold(0.0_f64, f64::max);
    let title = format!(" Top {} of {} ", summary.top.len(), ranked.len());
    let rows = ranked_rows(summary.top, max_score, &theme);
    let table = ranked_table(rows, &title, &theme);
    frame.render_stateful_widget(table, chunks[0], &mut app.table_state);

    let mut lines: Vec<Line> = summary
        .narrative
        .iter()
        .map(|s| Line::from(s.as_str()))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "< / > change how many opportunities are shown",
        Style::default().fg(theme.muted),
    )));

    let narrative = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::bordered().title(" Workshop Readout "));
    frame.render_widget(narrative, chunks[1]);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.contains("outside 1-5") {
            theme.flash_warning
        } else if msg.starts_with("Updated:") || msg.starts_with("Removed:") {
            theme.flash_success
        } else {
            Color::White
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let mut hint_spans = Vec::new();
        let hints = match app.current_view {
            View::UseCases => vec![
                ("j/k", ":nav "),
                ("1-5", ":weight "),
                ("+/-", ":adjust "),
                ("e", ":edit "),
                ("a", ":add "),
                ("d", ":delete "),
                ("Tab", ":view "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
            View::Ranking => vec![
                ("j/k", ":nav "),
                ("1-5", ":weight "),
                ("+/-", ":adjust "),
                ("b", ":breakdown "),
                ("Tab", ":view "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
            View::Summary => vec![
                ("</>", ":top N "),
                ("+/-", ":adjust "),
                ("b", ":breakdown "),
                ("Tab", ":view "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
        };

        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                hint_spans.push(Span::raw(" "));
            }
            hint_spans.push(Span::styled(*key, Style::default().fg(theme.status_key_color)));
            hint_spans.push(Span::raw(*label));
        }

        let mut spans = vec![
            Span::styled(app.current_view.title(), Style::default().fg(theme.muted)),
            Span::raw("  "),
        ];
        spans.extend(hint_spans);
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bar_bg)),
        area,
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

fn popup_block<'a>(title: &'a str, theme: &ThemeColors) -> Block<'a> {
    Block::bordered()
        .title(title)
        .title_style(theme.popup_title)
        .border_style(Style::default().fg(theme.popup_border))
        .style(Style::default().bg(theme.popup_bg))
}

fn render_edit_popup(frame: &mut Frame, app: &App) {
    let Some(edit) = app.edit.as_ref() else {
        return;
    };
    let use_case = &edit.draft;
    let theme = &app.theme;

    let popup_area = centered_rect_fixed(64, Field::ALL.len() as u16 + 5, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = popup_block(" Edit Use Case ", theme);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines: Vec<Line> = Field::ALL
        .iter()
        .map(|field| {
            let label = format!("{:<30}", field.column());
            if *field == edit.field {
                Line::from(vec![
                    Span::styled(label, theme.weight_selected),
                    Span::raw(format!("{}|", edit.buffer)),
                ])
            } else {
                Line::from(vec![
                    Span::styled(label, Style::default().fg(theme.muted)),
                    Span::raw(field.get(use_case)),
                ])
            }
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tab/Up/Down: field | Enter: save | Esc: cancel",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_breakdown_popup(frame: &mut Frame, app: &App) {
    let (Some(breakdown), Some(use_case)) = (app.selected_breakdown(), app.selected_use_case())
    else {
        return;
    };
    let theme = &app.theme;

    let popup_area = centered_rect_fixed(64, 18, frame.area());
    frame.render_widget(Clear, popup_area);

    let title = format!(" {} ", truncate_name(&use_case.name, 50));
    let block = popup_block(&title, theme);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines = vec![Line::from(Span::styled("Priority", theme.header_style))];
    for c in &breakdown.factors {
        let sign = if c.factor.is_penalty() { '-' } else { '+' };
        let rating_style = if use_case.rating(c.factor).is_out_of_range() {
            Style::default().fg(theme.out_of_range)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw(format!("  {} {:<22}", sign, c.factor.label())),
            Span::styled(format!("{:>5.2}", c.rating), rating_style),
            Span::raw(format!(" x {:>3.1} = {:>+7.2}", c.weight, c.contribution)),
        ]));
    }
    lines.push(Line::from(Span::styled(
        format!(
            "  / {:.1} (weight sum {:.1}) = {:.2}",
            breakdown.denominator, breakdown.weight_sum, breakdown.priority_score
        ),
        Style::default().fg(theme.muted),
    )));
    lines.push(Line::from(""));

    let [tf, dr, ci, r] = breakdown.readiness_components;
    lines.push(Line::from(Span::styled("Readiness", theme.header_style)));
    lines.push(Line::from(format!(
        "  ({:.2} + {:.2} + {:.2} + {:.2}) / 4 = {:.2}",
        tf, dr, ci, r, breakdown.readiness_score
    )));

    let out_of_range = use_case.out_of_range_factors();
    if !out_of_range.is_empty() {
        let labels: Vec<&str> = out_of_range.iter().map(|f| f.label()).collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Outside 1-5: {}", labels.join(", ")),
            Style::default().fg(theme.flash_warning),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "j/k: next row | Esc/b: close",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_help_popup(frame: &mut Frame, theme: &ThemeColors) {
    let popup_area = centered_rect_fixed(52, 20, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = popup_block(" Keyboard Shortcuts ", theme);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(theme.status_key_color).bold();
    let entries = [
        ("j / Down", "Move down"),
        ("k / Up", "Move up"),
        ("Tab", "Next view"),
        ("1-5", "Select weight"),
        ("+ / -", "Adjust selected weight by 0.5"),
        ("e / Enter", "Edit selected use case"),
        ("a", "Add use case"),
        ("d", "Delete selected use case"),
        ("< / >", "Fewer / more top opportunities"),
        ("b", "Score breakdown"),
        ("?", "Show/hide this help"),
        ("q / Ctrl-c", "Quit (edits are not saved)"),
    ];

    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("{:<14}", key), key_style),
                Span::raw(*desc),
            ])
        })
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}
