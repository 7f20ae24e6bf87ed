use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Pane, Prompt, Workspace};
use crate::discover::{DiscoverWizard, WizardStep};
use crate::models::Role;
use crate::sync::NoticeLevel;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn draw(frame: &mut Frame, app: &App) {
    match app.workspace.as_ref() {
        Some(ws) => draw_workspace(frame, app, ws),
        None => draw_home(frame, app),
    }

    // Modal popups, innermost last
    if let Some(prompt) = app.prompt.as_ref() {
        render_prompt(frame, prompt);
    }
    if app.show_help {
        render_help(frame);
    }
}

fn draw_home(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(0),    // Notebook list
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    render_home_header(frame, app, chunks[0]);
    render_notebook_list(frame, app, chunks[1]);
    render_status(
        frame,
        app,
        chunks[2],
        "j/k:nav  enter:open  n:new  d:delete  r:rename  ?:help  q:quit",
    );
}

fn draw_workspace(frame: &mut Frame, app: &App, ws: &Workspace) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Panes
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    // Main horizontal split: sources/history on the left, chat in the
    // middle, notes on the right
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 4), // Left: sources + history
            Constraint::Ratio(2, 4), // Center: chat
            Constraint::Ratio(1, 4), // Right: notes
        ])
        .split(chunks[0]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(60), // Source list
            Constraint::Percentage(40), // Conversation history
        ])
        .split(columns[0]);

    render_sources(frame, ws, left[0]);
    render_history(frame, ws, left[1]);
    render_chat(frame, app, ws, columns[1]);
    render_notes(frame, ws, columns[2]);
    render_status(
        frame,
        app,
        chunks[1],
        "tab:pane  space:check  a:check all  i:ask  u:upload  s:discover  ?:help  q:quit",
    );

    if ws.open_note.is_some() {
        render_note_view(frame, ws);
    }
    if let Some(wizard) = ws.wizard.as_ref() {
        render_wizard(frame, app, wizard);
    }
}

fn pane_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_home_header(frame: &mut Frame, app: &App, area: Rect) {
    let stats = format!(" {} notebooks", app.notebooks.len());

    let block = Block::default()
        .title(" Notebooks ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(stats).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_notebook_list(frame: &mut Frame, app: &App, area: Rect) {
    if app.notebooks.is_empty() {
        let paragraph = Paragraph::new("No notebooks yet. Press 'n' to create one.")
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .notebooks
        .items()
        .iter()
        .map(|notebook| {
            let label = if notebook.avatar.is_empty() {
                notebook.title.clone()
            } else {
                format!("{} {}", notebook.avatar, notebook.title)
            };
            ListItem::new(Line::from(Span::styled(
                label,
                Style::default().fg(Color::White),
            )))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.home_cursor));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_sources(frame: &mut Frame, ws: &Workspace, area: Rect) {
    let focused = ws.pane == Pane::Sources;
    let checked = ws.sources.files().iter().filter(|f| f.checked).count();
    let mark = if checked == 0 {
        " "
    } else if checked == ws.sources.len() {
        "x"
    } else {
        "~"
    };
    let title = format!(" Sources [{}] ", mark);

    let items: Vec<ListItem> = ws
        .sources
        .files()
        .iter()
        .map(|file| {
            let checkbox = if file.checked { "[x] " } else { "[ ] " };
            let style = if file.checked {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            let mut spans = vec![
                Span::styled(checkbox, Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("[{}] ", file.format.as_str()),
                    Style::default().fg(Color::Blue),
                ),
                Span::styled(file.title.as_str(), style),
            ];
            if ws.sources.downloading(&file.public_id) {
                spans.push(Span::styled(" ↓", Style::default().fg(Color::Green)));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(pane_border(focused)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(if focused { Some(ws.source_cursor) } else { None });

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_history(frame: &mut Frame, ws: &Workspace, area: Rect) {
    let focused = ws.pane == Pane::History;

    let items: Vec<ListItem> = ws
        .conversations
        .conversations()
        .iter()
        .map(|conversation| {
            let open = ws.conversations.selected() == Some(conversation.id.as_str());
            let marker = if open { "• " } else { "  " };
            let style = if open {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::Gray)
            };

            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Yellow)),
                Span::styled(conversation.title.as_str(), style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" History ")
                .borders(Borders::ALL)
                .border_style(pane_border(focused)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(if focused { Some(ws.history_cursor) } else { None });

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_notes(frame: &mut Frame, ws: &Workspace, area: Rect) {
    let focused = ws.pane == Pane::Notes;

    let items: Vec<ListItem> = ws
        .notes
        .notes()
        .iter()
        .map(|note| {
            ListItem::new(Line::from(Span::styled(
                note.title.as_str(),
                Style::default().fg(Color::White),
            )))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Notes ")
                .borders(Borders::ALL)
                .border_style(pane_border(focused)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(if focused { Some(ws.note_cursor) } else { None });

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_chat(frame: &mut Frame, app: &App, ws: &Workspace, area: Rect) {
    let focused = ws.pane == Pane::Chat;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Transcript
            Constraint::Length(3), // Input box
        ])
        .split(area);

    render_transcript(frame, app, ws, chunks[0], focused);
    render_chat_input(frame, app, ws, chunks[1], focused);
}

fn render_transcript(frame: &mut Frame, app: &App, ws: &Workspace, area: Rect, focused: bool) {
    let block = Block::default()
        .title(format!(" {} ", ws.chat.title))
        .borders(Borders::ALL)
        .border_style(pane_border(focused));
    let inner = block.inner(area);
    let width = inner.width.max(1) as usize;

    let mut lines: Vec<Line> = Vec::new();
    for message in &ws.chat.messages {
        let (label, color) = match message.role {
            Role::User => ("You", Color::Cyan),
            Role::Assistant => ("Assistant", Color::Magenta),
        };
        lines.push(Line::from(Span::styled(
            format!("{}:", label),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        let text = message.text();
        for wrapped in textwrap::wrap(&text, width) {
            lines.push(Line::from(wrapped.into_owned()));
        }
        lines.push(Line::from(""));
    }
    if app.asking() {
        let spinner = SPINNER[app.spinner_frame % SPINNER.len()];
        lines.push(Line::from(Span::styled(
            format!("{} Thinking...", spinner),
            Style::default().fg(Color::DarkGray),
        )));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Ask a question about the checked sources (press 'i').",
            Style::default().fg(Color::DarkGray),
        )));
    }

    // Keep the latest messages in view
    let scroll = lines.len().saturating_sub(inner.height as usize) as u16;
    let paragraph = Paragraph::new(lines).block(block).scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_chat_input(frame: &mut Frame, app: &App, ws: &Workspace, area: Rect, focused: bool) {
    let text = if ws.chat_input_active {
        format!("> {}_", ws.chat_input)
    } else if app.asking() {
        "Waiting for the answer...".to_string()
    } else {
        "Press 'i' to ask a question".to_string()
    };
    let style = if ws.chat_input_active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .title(" Ask ")
        .borders(Borders::ALL)
        .border_style(pane_border(focused));
    let paragraph = Paragraph::new(text).style(style).block(block);
    frame.render_widget(paragraph, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect, hint: &str) {
    let (text, style) = match app.latest_notice() {
        Some(notice) => {
            let color = match notice.level {
                NoticeLevel::Error => Color::Red,
                NoticeLevel::Info => Color::Green,
            };
            (notice.text.clone(), Style::default().fg(color))
        }
        None => {
            let mut text = String::new();
            if app.uploading() {
                text.push_str("⏳ Uploading...  ");
            }
            text.push_str(hint);
            (text, Style::default().fg(Color::DarkGray))
        }
    };

    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, area);
}

fn render_note_view(frame: &mut Frame, ws: &Workspace) {
    let Some(note) = ws.open_note.as_ref() else {
        return;
    };
    let area = centered_rect(70, 80, frame.area());

    let block = Block::default()
        .title(format!(" {} ", note.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);

    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Note body
            Constraint::Length(1), // Hint
        ])
        .split(inner);

    let body = note.plain_text();
    let text = if body.is_empty() {
        "(empty note)".to_string()
    } else {
        body
    };
    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, chunks[0]);

    let hint =
        Paragraph::new("p:add paragraph  Esc:close").style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hint, chunks[1]);
}

fn render_wizard(frame: &mut Frame, app: &App, wizard: &DiscoverWizard) {
    match wizard.step {
        WizardStep::Topic => render_wizard_topic(frame, app, wizard),
        WizardStep::Results => render_wizard_results(frame, wizard),
    }
}

fn render_wizard_topic(frame: &mut Frame, app: &App, wizard: &DiscoverWizard) {
    let area = centered_rect(60, 20, frame.area());

    let block = Block::default()
        .title(" Discover sources - enter a topic ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);

    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Topic input
            Constraint::Min(0),    // Status
        ])
        .split(inner);

    let input = format!("> {}_", wizard.topic);
    let paragraph = Paragraph::new(input).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, chunks[0]);

    let status = if wizard.searching {
        let spinner = SPINNER[app.spinner_frame % SPINNER.len()];
        format!("{} Searching the web...", spinner)
    } else {
        "Enter:search  Esc:cancel".to_string()
    };
    let paragraph = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, chunks[1]);
}

fn render_wizard_results(frame: &mut Frame, wizard: &DiscoverWizard) {
    let area = centered_rect(70, 70, frame.area());

    let block = Block::default()
        .title(format!(
            " Discovered sources ({}/{} selected) ",
            wizard.selected_count(),
            wizard.candidates.len()
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);

    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Candidate list
            Constraint::Length(1), // Hint
        ])
        .split(inner);

    if wizard.candidates.is_empty() {
        let paragraph = Paragraph::new("No sources found for this topic.")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, chunks[0]);
    } else {
        let items: Vec<ListItem> = wizard
            .candidates
            .iter()
            .map(|candidate| {
                let checkbox = if candidate.checked { "[x] " } else { "[ ] " };
                let mut item_lines = vec![Line::from(vec![
                    Span::styled(checkbox, Style::default().fg(Color::Yellow)),
                    Span::styled(candidate.title.as_str(), Style::default().fg(Color::White)),
                ])];
                if !candidate.description.is_empty() {
                    item_lines.push(Line::from(Span::styled(
                        format!("    {}", candidate.description),
                        Style::default().fg(Color::Gray),
                    )));
                }
                item_lines.push(Line::from(Span::styled(
                    format!("    {}", candidate.url),
                    Style::default().fg(Color::Blue),
                )));

                ListItem::new(item_lines)
            })
            .collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(wizard.cursor));

        frame.render_stateful_widget(list, chunks[0], &mut state);
    }

    let hint = Paragraph::new("space:toggle  a:toggle all  Enter:import  Esc:back")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hint, chunks[1]);
}

fn render_prompt(frame: &mut Frame, prompt: &Prompt) {
    let area = centered_rect(60, 20, frame.area());

    let block = Block::default()
        .title(format!(" {} ", prompt.label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);

    // Clear the area first
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let input_text = format!("> {}_", prompt.value);
    let paragraph = Paragraph::new(input_text).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let help_text = vec![
        "",
        " Navigation:",
        "   j / ↓    Move down",
        "   k / ↑    Move up",
        "   Tab      Next pane",
        "   Enter    Open / select",
        "   Esc      Back / close",
        "",
        " Sources:",
        "   Space    Toggle source selection",
        "   a        Toggle all sources",
        "   u        Upload files",
        "   s        Discover sources with AI",
        "   o        Download / open source",
        "",
        " Items:",
        "   n        New notebook / chat / note",
        "   d        Delete selected",
        "   r        Rename selected",
        "   i        Ask a question",
        "   p        Add paragraph to open note",
        "",
        " General:",
        "   ?        Toggle this help",
        "   q        Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
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
