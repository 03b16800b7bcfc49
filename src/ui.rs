use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::audience::AudiencePoll;
use crate::game::GameState;
use crate::progression::{Progress, LADDER_LEN};
use crate::round::Round;
use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

const ANSWER_KEYS: [char; 4] = ['A', 'B', 'C', 'D'];

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.game.state() {
            GameState::Loading { progress } => {
                render_loading(*progress, self.spinner_frame, area, buf)
            }
            GameState::Playing { progress, round } => {
                render_round(*progress, round, self.game.lifeline_used(), area, buf)
            }
            GameState::Victory => render_victory(area, buf),
        }
    }
}

fn dim_style() -> Style {
    Style::default()
        .add_modifier(Modifier::BOLD)
        .add_modifier(Modifier::DIM)
}

fn render_loading(progress: Progress, spinner_frame: usize, area: Rect, buf: &mut Buffer) {
    let frame = SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()];

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(3) / 2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let spinner = Paragraph::new(Span::styled(
        format!("{} fetching question {} of {}", frame, progress.question_number(), LADDER_LEN),
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    spinner.render(chunks[1], buf);

    let tier = Paragraph::new(Span::styled(
        format!("difficulty: {}", progress.difficulty()),
        dim_style(),
    ))
    .alignment(Alignment::Center);
    tier.render(chunks[2], buf);
}

fn render_round(progress: Progress, round: &Round, lifeline_used: bool, area: Rect, buf: &mut Buffer) {
    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let prompt_lines =
        ((round.prompt.width() as f64 / max_chars_per_line as f64).ceil() as u16).max(1);

    let poll_height = if round.poll().is_some() { 8 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(1)
        .constraints([
            Constraint::Length(2),              // header
            Constraint::Length(prompt_lines + 1), // question text
            Constraint::Length(4),              // 2x2 answer grid
            Constraint::Length(poll_height),    // audience results
            Constraint::Min(0),                 // spacer
            Constraint::Length(1),              // key hints
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("question {} of {}", progress.question_number(), LADDER_LEN),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  ·  {}", progress.difficulty()), dim_style()),
    ]))
    .alignment(Alignment::Center);
    header.render(chunks[0], buf);

    let question = Paragraph::new(round.prompt.as_str())
        .alignment(if prompt_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true });
    question.render(chunks[1], buf);

    render_answer_grid(round, chunks[2], buf);

    if let Some(poll) = round.poll() {
        render_audience_results(round, poll, chunks[3], buf);
    }

    let lifeline_hint = if lifeline_used {
        "lifeline spent"
    } else {
        "(l) ask the audience"
    };
    let hints = Paragraph::new(Span::styled(
        format!("(a-d) answer  {}  (n) new game  (esc) quit", lifeline_hint),
        Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
    ))
    .alignment(Alignment::Center);
    hints.render(chunks[5], buf);
}

fn render_answer_grid(round: &Round, area: Rect, buf: &mut Buffer) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    for (row_idx, row_area) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(*row_area);

        for (col_idx, col_area) in cols.iter().enumerate() {
            let answer_idx = row_idx * 2 + col_idx;
            let Some(answer) = round.answers().get(answer_idx) else {
                continue;
            };
            let label = Paragraph::new(Line::from(vec![
                Span::styled(
                    format!("{}. ", ANSWER_KEYS[answer_idx]),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw(answer.as_str()),
            ]))
            .wrap(Wrap { trim: true });
            label.render(*col_area, buf);
        }
    }
}

fn render_audience_results(round: &Round, poll: &AudiencePoll, area: Rect, buf: &mut Buffer) {
    // The answer the simulated audience favors; probably but not certainly
    // the correct one on hard questions.
    let favourite = poll
        .votes()
        .iter()
        .position_max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rows: Vec<Row> = round
        .answers()
        .iter()
        .enumerate()
        .map(|(idx, answer)| {
            let style = if Some(idx) == favourite {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format!("{}. {}", ANSWER_KEYS[idx], answer)),
                Cell::from(format!("{:.0}%", poll.percentage(idx))),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(rows, &[Constraint::Min(20), Constraint::Length(6)])
        .header(
            Row::new(vec![Cell::from("Answer"), Cell::from("Votes")])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Audience Results"),
        );
    table.render(area, buf);
}

fn render_victory(area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(4) / 2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let banner = Paragraph::new(Span::styled(
        "VICTORY",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    banner.render(chunks[1], buf);

    let detail = Paragraph::new(Span::styled(
        format!("all {} questions answered", LADDER_LEN),
        dim_style(),
    ))
    .alignment(Alignment::Center);
    detail.render(chunks[2], buf);

    let hints = Paragraph::new(Span::styled(
        "(n) new game  (esc) quit",
        Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
    ))
    .alignment(Alignment::Center);
    hints.render(chunks[3], buf);
}
