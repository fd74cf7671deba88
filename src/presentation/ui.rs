use crate::application::{App, AppMode, FormField};
use crate::domain::{ConditionLabel, MAX_CONDITION};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

const LABEL_WIDTH: usize = 18;

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    render_header(f, chunks[0]);
    render_form(f, app, body[0]);
    render_result(f, app, body[1]);
    render_status_bar(f, app, chunks[2]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new("guitar-quote - Instrument Valuation | F1/?: help | q: quit")
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let enablement = app.form.enablement();
    let mut lines = Vec::new();

    for field in FormField::ALL {
        let enabled = enablement.is_enabled(field);
        let focused = field == app.focus && matches!(app.mode, AppMode::Normal);

        let value_style = if focused {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else if enabled {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let label_style = if enabled {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{:<LABEL_WIDTH$}", field.label()), label_style),
            Span::styled(field_value(app, field), value_style),
        ]));
        lines.push(Line::from(""));
    }

    let button_style = if enablement.submit {
        Style::default().bg(Color::Green).fg(Color::Black).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    lines.push(Line::from(vec![
        Span::styled(" Enter: estimate value ", button_style),
        Span::raw("   "),
        Span::styled(" Ctrl+R: reset form ", Style::default().fg(Color::Gray)),
    ]));

    let form = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Instrument"));
    f.render_widget(form, area);
}

fn field_value(app: &App, field: FormField) -> String {
    let catalog = app.form.catalog();
    let state = app.form.state();

    match field {
        FormField::Category => state
            .category_id()
            .and_then(|id| catalog.category_by_id(id).ok())
            .map(|category| format!("< {} >", category.name))
            .unwrap_or_else(|| "Choose an instrument type".to_string()),
        FormField::Wood => state
            .wood_id()
            .and_then(|id| catalog.wood_by_id(id).ok())
            .map(|wood| format!("< {} >", wood.name))
            .unwrap_or_else(|| "Choose a wood".to_string()),
        FormField::StringCount => {
            let view = app.form.view();
            match view.selected_string_count {
                Some(selected) => view
                    .string_options
                    .iter()
                    .map(|count| {
                        if *count == selected {
                            format!("[{}]", count)
                        } else {
                            count.to_string()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" "),
                None => "Choose an instrument type first".to_string(),
            }
        }
        FormField::Age => {
            if app.age_input.is_empty() {
                "Enter age".to_string()
            } else {
                app.age_input.clone()
            }
        }
        FormField::Condition => {
            let condition = app.form.condition();
            let filled = condition.clamp(0, MAX_CONDITION as i32) as usize / 2;
            let empty = MAX_CONDITION as usize / 2 - filled;
            format!(
                "{:>2} {}{} {}",
                condition,
                "█".repeat(filled),
                "░".repeat(empty),
                ConditionLabel::from_score(condition)
            )
        }
    }
}

fn render_result(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Valuation");

    let Some(outcome) = app.outcome.as_ref() else {
        let hint = Paragraph::new("Fill in the form and press Enter to estimate the value.")
            .style(Style::default().fg(Color::Gray))
            .block(block);
        f.render_widget(hint, area);
        return;
    };

    let Some(rows) = outcome.result_rows.as_ref() else {
        let message = Paragraph::new(outcome.message.as_str())
            .style(Style::default().fg(Color::Red))
            .block(block);
        f.render_widget(message, area);
        return;
    };

    let last = rows.len().saturating_sub(1);
    let table_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let style = if index == last {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format!("{}:", row.label)).style(Style::default().fg(Color::Yellow)),
                Cell::from(row.value.clone()).style(style),
            ])
        })
        .collect();

    let table = Table::new(table_rows, [Constraint::Length(LABEL_WIDTH as u16), Constraint::Min(10)])
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                "Tab: next field | ←→: change | Enter: estimate | Ctrl+S: save | Ctrl+E: export CSV | Ctrl+Y: copy".to_string()
            }
        }
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
        AppMode::SaveQuote => format!("Save quote as: {} (Enter to save, Esc to cancel)", app.filename_input),
        AppMode::ExportCsv => format!("Export CSV as: {} (Enter to export, Esc to cancel)", app.filename_input),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::SaveQuote => Style::default().fg(Color::Yellow),
            AppMode::ExportCsv => Style::default().fg(Color::Magenta),
        });
    f.render_widget(input, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("guitar-quote Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

pub const HELP_TEXT: &str = r#"GUITAR-QUOTE VALUATION HELP

=== FILLING IN THE FORM ===
Pick an instrument type first, then a wood. The string count becomes
available once the instrument is chosen; the age and the estimate button
once both instrument and wood are chosen.

=== HOW THE PRICE IS COMPUTED ===
value = base price × wood multiplier × (1 + strings bonus)
        × (1 - age discount) × (1 - condition penalty)

Strings bonus      0% at the lowest string count, 50% at the highest
Age discount       1% per year of age
Condition penalty  1% per condition point (0 = pristine, 50 = worst)

The estimate never drops below zero.

=== CONDITION LABELS ===
0-10    New
11-20   Excellent
21-30   Very good
31-40   Good
41-50   Poor

=== KEYS ===
Tab / ↓         Next field
Shift+Tab / ↑   Previous field
← →             Change the focused selection or value
PgUp / PgDn     Move the condition slider by 10
0-9, -          Type the age
Backspace       Delete an age digit or clear a selection
Enter           Estimate the value
Ctrl+R          Reset the form
Ctrl+S          Save the last quote as JSON
Ctrl+E          Export the last result as CSV
Ctrl+Y          Copy the last result to the clipboard
F1 or ?         Show this help
q               Quit

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window"#;
