use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, Clear, Gauge, Paragraph, Wrap};
use std::f64::consts::FRAC_PI_2;

use crate::catalog::Category;
use crate::guidelines::guidelines_for;
use crate::scoring::{CategoryAverages, ANSWER_MAX, ANSWER_MIN};
use crate::tui::app::{App, FlashKind, InputMode, Outcome, Screen};

/// Scale anchors shown under the answer boxes
const SCALE_LOW: &str = "Strongly disagree";
const SCALE_HIGH: &str = "Strongly agree";

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.height < 12 || area.width < 40 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    match app.screen() {
        Screen::Welcome => render_welcome(frame, chunks[1], app),
        Screen::Question => render_question(frame, chunks[1], app),
        Screen::Result => match app.outcome {
            Some(ref outcome) => render_result(frame, chunks[1], app, outcome),
            None => render_welcome(frame, chunks[1], app),
        },
    }
    render_status_bar(frame, chunks[2], app);

    if app.input_mode == InputMode::Help {
        render_help_popup(frame, app);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let title = "Get Authentic";
    let mut spans = vec![Span::styled(
        title,
        Style::default().fg(app.theme.title_color).bold(),
    )];

    if let Some(ref user) = app.user {
        let name = user.display_name();
        let padding = (area.width as usize).saturating_sub(title.len() + name.chars().count());
        spans.push(Span::raw(" ".repeat(padding)));
        spans.push(Span::styled(name.to_string(), Style::default().fg(app.theme.muted)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_welcome(frame: &mut Frame, area: Rect, app: &App) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Thai Cultural Authenticity Assessment",
            Style::default().fg(app.theme.title_color).bold(),
        )),
        Line::from(""),
        Line::from(format!(
            "Rate {} statements about your restaurant from {} ({}) to {} ({}).",
            app.quiz.len(),
            ANSWER_MIN,
            SCALE_LOW,
            ANSWER_MAX,
            SCALE_HIGH
        )),
        Line::from("Your answers place the restaurant in one of three customer profiles."),
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("Enter", Style::default().fg(app.theme.status_key_color).bold()),
            Span::raw(" to begin"),
        ]),
    ];

    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(body, area);
}

fn render_question(frame: &mut Frame, area: Rect, app: &App) {
    let (Some(index), Some(question)) = (app.quiz.current_index(), app.quiz.current_question())
    else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1), // Position and category
        Constraint::Length(1), // Progress
        Constraint::Length(1),
        Constraint::Fill(1),   // Statement
        Constraint::Length(3), // Scale
        Constraint::Length(1), // Anchors
    ])
    .split(area.inner(Margin::new(2, 1)));

    let header = Line::from(vec![
        Span::styled(
            format!("Statement {} of {}", index + 1, app.quiz.len()),
            Style::default().bold(),
        ),
        Span::raw("  "),
        Span::styled(question.category.label(), Style::default().fg(app.theme.muted)),
    ]);
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let percent = app.quiz.progress_percent();
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(app.theme.gauge))
        .percent(percent as u16)
        .label(format!("{}%", percent));
    frame.render_widget(gauge, chunks[1]);

    let statement = Paragraph::new(question.text)
        .style(Style::default().bold())
        .wrap(Wrap { trim: true });
    frame.render_widget(statement, chunks[3]);

    render_scale(frame, chunks[4], app);

    let anchors = Line::from(vec![
        Span::styled(SCALE_LOW, Style::default().fg(app.theme.muted)),
        Span::raw(" ".repeat(
            (chunks[5].width as usize).saturating_sub(SCALE_LOW.len() + SCALE_HIGH.len()),
        )),
        Span::styled(SCALE_HIGH, Style::default().fg(app.theme.muted)),
    ]);
    frame.render_widget(Paragraph::new(anchors), chunks[5]);
}

/// One bordered box per value on the scale, the current answer highlighted
fn render_scale(frame: &mut Frame, area: Rect, app: &App) {
    let count = (ANSWER_MAX - ANSWER_MIN + 1) as usize;
    let boxes = Layout::horizontal(vec![Constraint::Ratio(1, count as u32); count]).split(area);
    let current = app.quiz.current_answer();

    for (slot, value) in boxes.iter().zip(ANSWER_MIN..=ANSWER_MAX) {
        let style = if current == Some(value) {
            app.theme.scale_selected
        } else {
            app.theme.scale_idle
        };
        let cell = Paragraph::new(value.to_string())
            .alignment(Alignment::Center)
            .style(style)
            .block(Block::bordered().border_style(style));
        frame.render_widget(cell, *slot);
    }
}

fn render_result(frame: &mut Frame, area: Rect, app: &App, outcome: &Outcome) {
    let columns = Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_radar(frame, columns[0], app, &outcome.result.averages);

    let profile = outcome.result.profile;
    let profile_color = app.theme.profile_color(profile);
    let guidelines = guidelines_for(profile);

    let mut lines = vec![
        Line::from(Span::styled(
            profile.label(),
            Style::default().fg(profile_color).bold(),
        )),
        Line::from(profile.description()),
        Line::from(""),
    ];

    for (category, score) in outcome.result.averages.iter() {
        lines.push(Line::from(vec![
            Span::raw(format!("{:<30}", category.label())),
            Span::styled(format!("{:.2}", score), Style::default().bold()),
        ]));
    }
    if let Some(mean) = outcome.result.breakdown.tie_break_average {
        lines.push(Line::from(Span::styled(
            format!("Votes tied; decided on mean score {:.2}", mean),
            Style::default().fg(app.theme.muted),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Must Have", app.theme.heading)));
    lines.extend(guidelines.must_have.iter().map(|item| Line::from(format!("• {}", item))));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Nice to Have", app.theme.heading)));
    lines.extend(
        guidelines
            .nice_to_have
            .iter()
            .map(|item| Line::from(format!("• {}", item))),
    );

    let details = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::bordered().title(" Result "));
    frame.render_widget(details, columns[1]);
}

/// Angle of each axis, Ingredients at the top then clockwise
fn axis_angle(category: Category) -> f64 {
    FRAC_PI_2 - category.index() as f64 * FRAC_PI_2
}

/// Distance from the centre for a score on the 1-7 axis range
fn radius(score: f64) -> f64 {
    let min = ANSWER_MIN as f64;
    let max = ANSWER_MAX as f64;
    ((score - min) / (max - min)).clamp(0.0, 1.0)
}

/// Canvas coordinates of the radar polygon vertices, in category order
pub fn radar_points(averages: &CategoryAverages) -> [(f64, f64); 4] {
    let mut points = [(0.0, 0.0); 4];
    for (category, score) in averages.iter() {
        let r = radius(score);
        let angle = axis_angle(category);
        points[category.index()] = (r * angle.cos(), r * angle.sin());
    }
    points
}

fn render_radar(frame: &mut Frame, area: Rect, app: &App, averages: &CategoryAverages) {
    let points = radar_points(averages);
    let theme = &app.theme;

    let canvas = Canvas::default()
        .block(Block::bordered().title(" Profile "))
        .marker(Marker::Braille)
        .x_bounds([-1.4, 1.4])
        .y_bounds([-1.2, 1.2])
        .paint(move |ctx| {
            // Grid ring at every scale value
            for level in ANSWER_MIN + 1..=ANSWER_MAX {
                let r = radius(level as f64);
                for (i, category) in Category::ALL.iter().enumerate() {
                    let next = Category::ALL[(i + 1) % Category::ALL.len()];
                    let (a, b) = (axis_angle(*category), axis_angle(next));
                    ctx.draw(&CanvasLine::new(
                        r * a.cos(),
                        r * a.sin(),
                        r * b.cos(),
                        r * b.sin(),
                        theme.radar_grid,
                    ));
                }
            }

            for category in Category::ALL {
                let angle = axis_angle(category);
                ctx.draw(&CanvasLine::new(
                    0.0,
                    0.0,
                    angle.cos(),
                    angle.sin(),
                    theme.radar_axis,
                ));
            }

            ctx.layer();

            for i in 0..points.len() {
                let (x1, y1) = points[i];
                let (x2, y2) = points[(i + 1) % points.len()];
                ctx.draw(&CanvasLine::new(x1, y1, x2, y2, theme.radar_shape));
            }

            for category in Category::ALL {
                let angle = axis_angle(category);
                let label = category.short_label();
                // Nudge labels left so they sit centred on their axis end
                let x = 1.1 * angle.cos() - label.len() as f64 * 0.03;
                let y = 1.1 * angle.sin();
                ctx.print(x, y, Span::styled(label, Style::default().fg(theme.muted)));
            }
        });

    frame.render_widget(canvas, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let text = if let Some((ref msg, kind, _)) = app.flash_message {
        let color = match kind {
            FlashKind::Success => app.theme.flash_success,
            FlashKind::Error => app.theme.flash_error,
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(color)))
    } else if app.is_submitting {
        Line::from(Span::styled(
            "Submitting result...",
            Style::default().fg(app.theme.muted),
        ))
    } else {
        let hints: &[(&str, &str)] = match app.screen() {
            Screen::Welcome => &[("Enter", ":start "), ("?", ":help "), ("q", ":quit")],
            Screen::Question => &[
                ("1-7", ":answer "),
                ("←/→", ":adjust "),
                ("Enter", ":next "),
                ("p", ":back "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
            Screen::Result => &[
                ("s", ":save "),
                ("e", ":export "),
                ("u", ":submit "),
                ("r", ":redo "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
        };

        let mut spans = Vec::new();
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(
                *key,
                Style::default().fg(app.theme.status_key_color),
            ));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(app.theme.status_bar_bg)),
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

fn render_help_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(50, 15, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Keyboard Shortcuts ", app.theme.popup_title))
        .border_style(Style::default().fg(app.theme.popup_border));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(app.theme.status_key_color).bold();
    let entries = [
        ("1 - 7         ", "Choose an answer"),
        ("← / h         ", "Lower the answer"),
        ("→ / l         ", "Raise the answer"),
        ("Enter / n     ", "Next statement (submits at the end)"),
        ("p / Backspace ", "Previous statement"),
        ("s             ", "Save result to history"),
        ("e             ", "Export report"),
        ("u             ", "Submit result to the backend"),
        ("r             ", "Answer again"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut lines: Vec<Line> = entries
        .iter()
        .map(|(key, action)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*action)]))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(app.theme.muted),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::averages_from_scores;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_radar_points_at_maximum() {
        let averages = averages_from_scores([7.0; 4]).unwrap();
        let points = radar_points(&averages);
        let expected = [(0.0, 1.0), (1.0, 0.0), (0.0, -1.0), (-1.0, 0.0)];
        for (p, e) in points.iter().zip(expected.iter()) {
            assert!(close(p.0, e.0) && close(p.1, e.1), "{:?} != {:?}", p, e);
        }
    }

    #[test]
    fn test_radar_points_at_minimum_collapse() {
        let averages = averages_from_scores([1.0; 4]).unwrap();
        for (x, y) in radar_points(&averages) {
            assert!(close(x, 0.0) && close(y, 0.0));
        }
    }

    #[test]
    fn test_radar_empty_category_clamped_to_centre() {
        let averages = averages_from_scores([0.0, 4.0, 4.0, 4.0]).unwrap();
        let points = radar_points(&averages);
        assert!(close(points[0].0, 0.0) && close(points[0].1, 0.0));
        // 4 sits halfway along the 1-7 range
        assert!(close(points[1].0, 0.5));
    }

    #[test]
    fn test_centered_rect_clamps() {
        let area = Rect::new(0, 0, 20, 10);
        let rect = centered_rect_fixed(50, 15, area);
        assert_eq!(rect, Rect::new(0, 0, 20, 10));
    }
}
