use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::app::App;
use crate::board::{PageButton, PageButtonKind};
use crate::format::{extract_preview, format_date, label_color, status_text};
use crate::issue::{Issue, IssueState};
use crate::markdown;
use crate::render::EMPTY_MESSAGE;
use crate::theme::{ThemePalette, label_colors};

const CARD_PREVIEW_CHARS: usize = 72;
const HELP: &str =
    "c/C category • s/S status • ←/→ page • 1-9 jump • j/k move • PgUp/PgDn scroll • q quit";

pub fn draw(frame: &mut Frame<'_>, app: &App, theme: &ThemePalette) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg_app)), area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(56), Constraint::Percentage(44)])
        .split(sections[1]);

    draw_header(frame, app, theme, sections[0]);
    draw_cards(frame, app, theme, panes[0]);
    draw_detail(frame, app, theme, panes[1]);
    draw_pagination(frame, app, theme, sections[2]);
    draw_status(frame, app, theme, sections[3]);
}

fn draw_header(frame: &mut Frame<'_>, app: &App, theme: &ThemePalette, area: Rect) {
    let counts = app.counts();
    let selection = app.board().selection();
    let view = app.view();
    let muted = Style::default().fg(theme.text_muted);
    let strong = Style::default()
        .fg(theme.accent)
        .add_modifier(Modifier::BOLD);

    let header = Text::from(vec![
        Line::from(vec![
            Span::styled(app.repo_label().to_string(), strong),
            Span::raw("  "),
            Span::styled(format!("全体 {}", counts.total), Style::default().fg(theme.text_primary)),
            Span::raw("  "),
            Span::styled(
                format!("{} {}", status_text(IssueState::Open), counts.open),
                Style::default().fg(theme.status_open),
            ),
            Span::raw("  "),
            Span::styled(
                format!("{} {}", status_text(IssueState::Closed), counts.closed),
                Style::default().fg(theme.status_closed),
            ),
        ]),
        Line::from(vec![
            Span::styled("カテゴリ: ", muted),
            Span::styled(selection.category.label().to_string(), strong),
            Span::styled(" (c)", muted),
            Span::raw("  "),
            Span::styled("状態: ", muted),
            Span::styled(selection.status.label(), strong),
            Span::styled(" (s)", muted),
            Span::raw("  "),
            Span::styled(
                format!(
                    "{} 件 ({} 件/ページ)",
                    view.visible_count,
                    app.board().page_size()
                ),
                muted,
            ),
        ]),
    ]);
    frame.render_widget(
        Paragraph::new(header).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.border_panel))
                .style(Style::default().bg(theme.bg_panel)),
        ),
        area.inner(Margin {
            vertical: 0,
            horizontal: 1,
        }),
    );
}

fn draw_cards(frame: &mut Frame<'_>, app: &App, theme: &ThemePalette, area: Rect) {
    let view = app.view();
    let block = panel_block("困りごと", theme, true);
    let area = area.inner(Margin {
        vertical: 0,
        horizontal: 1,
    });

    if view.is_empty() {
        frame.render_widget(
            Paragraph::new(EMPTY_MESSAGE)
                .style(Style::default().fg(theme.text_muted))
                .block(block),
            area,
        );
        return;
    }

    let items = view
        .issues
        .iter()
        .map(|issue| card_item(issue, theme))
        .collect::<Vec<ListItem<'static>>>();
    let list = List::new(items)
        .block(block)
        .highlight_symbol("▸ ")
        .highlight_style(
            Style::default()
                .bg(theme.bg_selected)
                .add_modifier(Modifier::BOLD),
        );
    let mut state = ListState::default();
    state.select(Some(app.selected().min(view.issues.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);
}

fn card_item(issue: &Issue, theme: &ThemePalette) -> ListItem<'static> {
    let status_color = match issue.state {
        IssueState::Open => theme.status_open,
        IssueState::Closed => theme.status_closed,
    };
    let title = Line::from(vec![
        Span::styled(
            format!("#{} ", issue.number),
            Style::default().fg(theme.text_muted),
        ),
        Span::styled(
            issue.title.clone(),
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(status_text(issue.state), Style::default().fg(status_color)),
    ]);

    let mut meta = Vec::new();
    for name in &issue.labels {
        let (background, foreground) = label_colors(label_color(name));
        meta.push(Span::styled(
            format!(" {} ", name),
            Style::default().bg(background).fg(foreground),
        ));
        meta.push(Span::raw(" "));
    }
    meta.push(Span::styled(
        format!("報告日: {}", format_date(&issue.created_at)),
        Style::default().fg(theme.text_muted),
    ));

    let preview = extract_preview(issue.body.as_deref(), CARD_PREVIEW_CHARS);
    let mut lines = vec![title, Line::from(meta)];
    if !preview.is_empty() {
        lines.push(Line::from(Span::styled(
            preview.replace('\n', " "),
            Style::default().fg(theme.text_muted),
        )));
    }
    lines.push(Line::from(""));
    ListItem::new(lines)
}

fn draw_detail(frame: &mut Frame<'_>, app: &App, theme: &ThemePalette, area: Rect) {
    let area = area.inner(Margin {
        vertical: 0,
        horizontal: 1,
    });
    let issue = match app.selected_issue() {
        Some(issue) => issue,
        None => {
            frame.render_widget(panel_block("詳細", theme, false), area);
            return;
        }
    };

    let mut lines = vec![
        Line::from(Span::styled(
            issue.title.clone(),
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(markdown::render(issue.body.as_deref().unwrap_or_default(), theme));

    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .scroll((app.detail_scroll(), 0))
            .block(panel_block(&format!("詳細 #{}", issue.number), theme, false)),
        area,
    );
}

fn draw_pagination(frame: &mut Frame<'_>, app: &App, theme: &ThemePalette, area: Rect) {
    let buttons = app.view().pagination().buttons();
    if buttons.is_empty() {
        return;
    }
    let mut spans = Vec::new();
    for button in &buttons {
        spans.push(page_button_span(button, theme));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(ratatui::layout::Alignment::Center),
        area,
    );
}

fn page_button_span(button: &PageButton, theme: &ThemePalette) -> Span<'static> {
    let caption = match button.kind {
        PageButtonKind::Number => format!(" {} ", button.caption()),
        PageButtonKind::Previous | PageButtonKind::Next => format!("[{}]", button.caption()),
    };
    let style = if button.disabled {
        Style::default()
            .fg(theme.text_muted)
            .add_modifier(Modifier::DIM)
    } else if button.active {
        Style::default()
            .fg(theme.bg_panel)
            .bg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_primary)
    };
    Span::styled(caption, style)
}

fn draw_status(frame: &mut Frame<'_>, app: &App, theme: &ThemePalette, area: Rect) {
    let mut lines = Vec::new();
    if !app.status().is_empty() {
        lines.push(Line::from(Span::styled(
            app.status().to_string(),
            Style::default().fg(theme.warning),
        )));
    }
    lines.push(Line::from(HELP));
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(theme.text_muted).bg(theme.bg_app))
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(theme.border_panel)),
            ),
        area.inner(Margin {
            vertical: 0,
            horizontal: 1,
        }),
    );
}

fn panel_block(title: &str, theme: &ThemePalette, focused: bool) -> Block<'static> {
    let border = if focused {
        theme.border_focus
    } else {
        theme.border_panel
    };
    Block::default()
        .title(Line::from(Span::styled(
            title.to_string(),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(theme.bg_panel).fg(theme.text_primary))
        .border_style(Style::default().fg(border))
}
