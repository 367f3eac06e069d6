use crate::page::{Focus, SignupPage, side_action};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use signup_core::{ActionKind, SignupField};

const TEXT_FIELDS: [SignupField; 5] = [
    SignupField::Id,
    SignupField::Email,
    SignupField::EmailConfirm,
    SignupField::Password,
    SignupField::PasswordConfirm,
];

const BUTTON_WIDTH: u16 = 20;

pub fn draw(frame: &mut Frame, page: &SignupPage) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(15),
            Constraint::Percentage(70),
            Constraint::Percentage(15),
        ])
        .split(frame.area());

    let form_block = Block::default()
        .title(" 회원가입 ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Color::Cyan));

    frame.render_widget(form_block.clone(), chunks[1]);
    let inner = form_block.inner(chunks[1]);

    // label, input and error line per text field, then checkbox, button, help
    let mut constraints: Vec<Constraint> = Vec::new();
    for _ in TEXT_FIELDS {
        constraints.extend([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ]);
    }
    constraints.extend([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(inner);

    for (i, field) in TEXT_FIELDS.into_iter().enumerate() {
        let base = i * 3;
        draw_text_field(frame, page, field, rows[base], rows[base + 1], rows[base + 2]);
    }

    let base = TEXT_FIELDS.len() * 3;
    draw_agreement(frame, page, rows[base], rows[base + 1]);
    draw_submit(frame, page, rows[base + 2]);

    let help = Paragraph::new(Line::from(
        "Tab/↑↓ 이동 · Enter 실행 · Space 동의 · Ctrl+S 가입하기 · Esc 종료",
    ))
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    frame.render_widget(help, rows[base + 4]);

    if let Some(alert) = page.alert() {
        draw_alert_popup(frame, alert, page.queued_alerts());
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

fn draw_text_field(
    frame: &mut Frame,
    page: &SignupPage,
    field: SignupField,
    label_area: Rect,
    input_area: Rect,
    error_area: Rect,
) {
    let focused = page.focus() == Focus::Field(field);
    let form = page.form();

    frame.render_widget(
        Paragraph::new(field.label()).style(focus_style(focused)),
        label_area,
    );

    let action = side_action(field);
    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(if action.is_some() { BUTTON_WIDTH } else { 0 }),
        ])
        .split(input_area);

    let value = form.value(field);
    let shown = if field.is_secret() {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let input_style = focus_style(focused).add_modifier(Modifier::UNDERLINED);
    let input = if value.is_empty() {
        Line::from(Span::styled(
            field.placeholder(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::UNDERLINED),
        ))
    } else {
        Line::from(Span::styled(shown.clone(), input_style))
    };
    frame.render_widget(Paragraph::new(input), parts[0]);

    if let Some(kind) = action {
        frame.render_widget(button(page, kind, false), parts[1]);
    }

    if let Some(error) = form.error(field) {
        frame.render_widget(
            Paragraph::new(error.to_string()).style(Style::default().fg(Color::Red)),
            error_area,
        );
    }

    if focused && page.alert().is_none() {
        let offset = Span::raw(shown).width() as u16;
        let x = (parts[0].x + offset).min(parts[0].right().saturating_sub(1));
        frame.set_cursor_position((x, parts[0].y));
    }
}

fn draw_agreement(frame: &mut Frame, page: &SignupPage, checkbox_area: Rect, error_area: Rect) {
    let focused = page.focus() == Focus::Field(SignupField::Agree);
    let mark = if page.form().agree() { "[x]" } else { "[ ]" };
    let checkbox = Line::from(vec![
        Span::styled(mark, focus_style(focused)),
        Span::raw(" "),
        Span::styled(SignupField::Agree.label(), focus_style(focused)),
    ]);
    frame.render_widget(Paragraph::new(checkbox), checkbox_area);

    if let Some(error) = page.form().error(SignupField::Agree) {
        frame.render_widget(
            Paragraph::new(error.to_string()).style(Style::default().fg(Color::Red)),
            error_area,
        );
    }
}

fn draw_submit(frame: &mut Frame, page: &SignupPage, area: Rect) {
    let focused = page.focus() == Focus::Submit;
    frame.render_widget(
        button(page, ActionKind::SubmitSignup, focused).alignment(Alignment::Center),
        area,
    );
}

fn button(page: &SignupPage, kind: ActionKind, focused: bool) -> Paragraph<'static> {
    let caption = if page.is_pending(kind) {
        format!("[ {} … ]", kind.button_label())
    } else {
        format!("[ {} ]", kind.button_label())
    };
    let style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else if page.is_pending(kind) {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Green)
    };
    Paragraph::new(Line::from(Span::styled(caption, style)))
}

fn draw_alert_popup(frame: &mut Frame, message: &str, queued: usize) {
    let area = centered_rect(60, 20, frame.area());

    let title = if queued > 1 {
        format!(" 알림 (1/{queued}) ")
    } else {
        " 알림 ".to_string()
    };
    let popup_block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .style(Style::default().fg(Color::Yellow));

    let text = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Enter / Esc 닫기",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: true })
    .style(Style::default().fg(Color::White))
    .block(popup_block);

    frame.render_widget(Clear, area);
    frame.render_widget(text, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
