pub mod sprites;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::{
    celebration::StarAnimation,
    game::{Game, Level, Screen},
    App,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

const TITLE: &str = "SUPER LETTER BROS";
const TITLE_COLORS: [Color; 4] = [Color::Red, Color::Yellow, Color::Green, Color::Cyan];

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.game.screen {
            Screen::Menu => render_menu(area, buf),
            Screen::Playing => render_playing(&self.game, area, buf),
            Screen::GameOver => render_game_over(&self.game, area, buf),
        }

        // Star particles go on top of whatever screen is showing.
        if self.celebration.is_active {
            render_star_particles(&self.celebration, area, buf);
        }
    }
}

fn render_menu(area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let mut title_spans: Vec<Span> = Vec::new();
    for (idx, c) in TITLE.chars().enumerate() {
        if c == ' ' {
            title_spans.push(Span::raw("  "));
        } else {
            title_spans.push(Span::styled(
                format!("{c} "),
                Style::default()
                    .patch(bold_style)
                    .fg(TITLE_COLORS[idx % TITLE_COLORS.len()]),
            ));
        }
    }

    let mut lines = vec![
        Line::from(title_spans),
        Line::default(),
        Line::from(Span::styled(
            "Typ mee en leer de letters!",
            Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
        )),
        Line::default(),
    ];
    for row in sprites::HERO_STANDING {
        lines.push(Line::from(Span::styled(
            row,
            Style::default().fg(Color::LightRed),
        )));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "[1] LEVEL 1 - Letters & Cijfers",
        bold_style,
    )));
    lines.push(Line::from(Span::styled(
        "[2] LEVEL 2 - Woorden Leren",
        bold_style,
    )));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("[Esc] stoppen", italic_style)));

    render_centered_lines(lines, area, buf);
}

fn render_playing(game: &Game, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // score, streak, lives
            Constraint::Length(1), // word label on level two
            Constraint::Min(1),    // play field
            Constraint::Length(1), // key hints
        ])
        .split(area);

    render_hud(game, chunks[0], buf);

    if game.level == Level::Two {
        let word = Paragraph::new(Span::styled(
            format!("WOORD: {}", game.round.word()),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        word.render(chunks[1], buf);
    }

    render_play_field(game, chunks[2], buf);

    let hints = Paragraph::new(Span::styled(
        "[Enter] zeg het nog eens   [Esc] menu",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    hints.render(chunks[3], buf);
}

fn render_hud(game: &Game, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let score = Paragraph::new(Span::styled(
        format!("PUNTEN {:06}", game.score),
        Style::default().patch(bold_style).fg(Color::Yellow),
    ));
    score.render(columns[0], buf);

    let streak_style = if game.streak > 0 {
        Style::default().patch(bold_style).fg(Color::Green)
    } else {
        Style::default().patch(bold_style).add_modifier(Modifier::DIM)
    };
    let streak = Paragraph::new(Span::styled(format!("REEKS {}", game.streak), streak_style))
        .alignment(Alignment::Center);
    streak.render(columns[1], buf);

    let lives = Paragraph::new(Span::styled(
        sprites::hearts(game.lives, game.starting_lives),
        Style::default().fg(Color::Red),
    ))
    .alignment(Alignment::Right);
    lives.render(columns[2], buf);
}

fn render_play_field(game: &Game, area: Rect, buf: &mut Buffer) {
    let mut lines: Vec<Line> = Vec::new();

    if let Some(expected) = game.expected_char() {
        for row in sprites::speech_bubble(&format!("DRUK OP \"{expected}\"")) {
            lines.push(Line::from(Span::styled(
                row,
                Style::default().fg(Color::Yellow),
            )));
        }
        match game.deck.letter_name(expected) {
            Some(name) => lines.push(Line::from(Span::styled(
                format!("(zeg: {name})"),
                Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
            ))),
            None => lines.push(Line::default()),
        }
    }
    lines.push(Line::default());

    lines.extend(block_rows(game));

    let coin_line = if game.coin_visible {
        Line::from(Span::styled(
            sprites::COIN.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::default()
    };

    // While airborne the figure sits one row higher, right under the coin.
    let hero_style = Style::default().fg(Color::LightRed);
    let frame = if game.jumping {
        sprites::HERO_JUMPING
    } else {
        sprites::HERO_STANDING
    };
    lines.push(coin_line);
    if game.jumping {
        for row in frame {
            lines.push(Line::from(Span::styled(row, hero_style)));
        }
        lines.push(Line::default());
    } else {
        lines.push(Line::default());
        for row in frame {
            lines.push(Line::from(Span::styled(row, hero_style)));
        }
    }

    render_centered_lines(lines, area, buf);
}

/// The round's characters as bordered blocks: hit ones green, the one under
/// the cursor highlighted (red while the wrong-key flash is on), the rest dim.
fn block_rows(game: &Game) -> [Line<'static>; 3] {
    let mut top: Vec<Span> = Vec::new();
    let mut mid: Vec<Span> = Vec::new();
    let mut bottom: Vec<Span> = Vec::new();

    for (idx, &c) in game.round.chars.iter().enumerate() {
        if idx > 0 {
            top.push(Span::raw(" "));
            mid.push(Span::raw(" "));
            bottom.push(Span::raw(" "));
        }
        let style = block_style(game, idx);
        top.push(Span::styled("╔═══╗", style));
        mid.push(Span::styled(format!("║ {c} ║"), style));
        bottom.push(Span::styled("╚═══╝", style));
    }

    [Line::from(top), Line::from(mid), Line::from(bottom)]
}

fn block_style(game: &Game, idx: usize) -> Style {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    if game.round.hits.get(idx).copied().unwrap_or(false) {
        return Style::default().patch(bold_style).fg(Color::Green);
    }
    if idx == game.round.cursor {
        if game.error_flash {
            Style::default().patch(bold_style).fg(Color::Red)
        } else {
            Style::default().patch(bold_style).fg(Color::Yellow)
        }
    } else {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::DIM)
    }
}

fn render_game_over(game: &Game, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let mut lines = vec![
        Line::from(Span::styled(
            "G A M E   O V E R",
            Style::default().patch(bold_style).fg(Color::Red),
        )),
        Line::default(),
        Line::from(Span::styled(
            format!("PUNTEN {:06}", game.score),
            Style::default().patch(bold_style).fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            format!("BESTE REEKS {}", game.summary.best_streak),
            bold_style,
        )),
        Line::from(Span::styled(
            format!("RONDES {}", game.summary.rounds_completed),
            bold_style,
        )),
    ];

    let missed = game.summary.top_missed(3);
    if !missed.is_empty() {
        let chars = missed
            .iter()
            .map(|(c, _)| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("Oefen nog eens met: {chars}"),
            Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
        )));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "[Enter] nog een keer   [Esc] menu",
        italic_style,
    )));

    render_centered_lines(lines, area, buf);
}

/// Renders a fixed block of lines centered both ways inside `area`.
fn render_centered_lines(lines: Vec<Line>, area: Rect, buf: &mut Buffer) {
    let height = lines.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
}

/// Paint celebration particles over the current screen
fn render_star_particles(celebration: &StarAnimation, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightYellow,
    ];

    for particle in &celebration.particles {
        let x = particle.x as u16;
        let y = particle.y as u16;

        if x < area.width && y < area.height {
            let color = colors[particle.color_index % colors.len()];
            let alpha = 1.0 - (particle.age / particle.max_age);

            let style = if particle.is_text {
                // Cheer text stays bold and bright until it is almost gone
                if alpha > 0.4 {
                    Style::default().fg(color).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(color)
                }
            } else if alpha > 0.7 {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else if alpha > 0.3 {
                Style::default().fg(color)
            } else {
                Style::default().fg(color).add_modifier(Modifier::DIM)
            };

            if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                cell.set_symbol(&particle.symbol.to_string());
                cell.set_style(style);
            }
        }
    }
}
