use crate::cards::Card;
use crate::combatant::Combatant;
use crate::controller::ControllerState;
use crate::encounter::EnemySlot;
use crate::tui::app::AppState;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::layout::{centered_rect, columns, inner};

pub(super) fn draw_battle(f: &mut Frame, app: &AppState) {
    let size = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Min(6),    // enemies
            Constraint::Length(3), // play area
            Constraint::Length(7), // hand
            Constraint::Length(4), // status bar
        ])
        .split(size);

    draw_header(f, chunks[0], app);
    draw_enemies(f, chunks[1], app);
    draw_play_area(f, chunks[2], app);
    draw_hand(f, chunks[3], app);
    draw_status(f, chunks[4], app);

    if app.help_open() {
        draw_help(f);
    } else if app.log_open() {
        draw_log(f, app);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &AppState) {
    let (ap, mp) = app.board.points();
    let hero = app.controller.combatant();
    let mut lines = vec![Line::from(format!(
        "Round {}   HP {:.0}/{:.0}   AP {ap}   MP {mp}   Deck {}",
        app.encounter.round(),
        hero.health(),
        hero.max_health(),
        hero.deck().len(),
    ))];
    let state = match app.controller.state() {
        ControllerState::ChoosingCard if app.controller.is_turn() => "Choose a card".to_string(),
        ControllerState::ChoosingCard => "Waiting for the enemies".to_string(),
        ControllerState::ChoosingTargets { pending, targets } => format!(
            "Targeting with {} ({}: {} picked)",
            pending.data().name,
            pending.data().target,
            targets.len()
        ),
        ControllerState::EncounterOver(result) => format!("Encounter over: {result}"),
    };
    let mut spans = vec![Span::raw(state)];
    if app.controller.resolving() > 0 {
        spans.push(Span::styled(
            format!("   resolving {}", app.controller.resolving()),
            Style::default().fg(Color::Yellow),
        ));
    }
    if app.controller.end_turn_pending() {
        spans.push(Span::styled("   ending turn...", Style::default().fg(Color::Yellow)));
    }
    lines.push(Line::from(spans));
    let header =
        Paragraph::new(lines).block(Block::default().title("card-combat").borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_enemies(f: &mut Frame, area: Rect, app: &AppState) {
    f.render_widget(Block::default().title("Enemies").borders(Borders::ALL), area);
    let slots = app.encounter.enemies();
    for (i, (slot, cell)) in slots.iter().zip(columns(inner(area), slots.len())).enumerate() {
        let pointed = i == app.cursor.slot();
        let targeted = app.controller.targets().contains(&slot.id);
        render_enemy(f, cell, slot, pointed, targeted);
    }
}

fn render_enemy(f: &mut Frame, area: Rect, slot: &EnemySlot, pointed: bool, targeted: bool) {
    let fighter = &slot.fighter;
    let mut title = format!("{} {}", slot.id, fighter.name());
    if pointed {
        title.push_str(" [Pointer]");
    }
    if targeted {
        title.push_str(" [Target]");
    }
    let mut block = Block::default().title(title).borders(Borders::ALL);
    if fighter.is_dead() {
        block = block.border_style(Style::default().fg(Color::DarkGray));
    } else if targeted {
        block = block.border_style(Style::default().fg(Color::Red));
    } else if pointed {
        block = block.border_style(Style::default().fg(Color::Yellow));
    }
    let mut lines = Vec::with_capacity(3);
    if fighter.is_dead() {
        lines.push(Line::from(Span::styled("Defeated", Style::default().add_modifier(Modifier::DIM))));
    } else {
        lines.push(Line::from(format!("HP {:.0}/{:.0}", fighter.health(), fighter.max_health())));
    }
    if !fighter.effects().is_empty() {
        lines.push(Line::from(Span::styled(
            format!("Effects: {}", fighter.effects().len()),
            Style::default().fg(Color::Green),
        )));
    }
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}

fn draw_play_area(f: &mut Frame, area: Rect, app: &AppState) {
    let names: Vec<Span> = app
        .board
        .play_area()
        .iter()
        .map(|p| {
            let style = if p.started.is_some() {
                Style::default().fg(Color::Magenta)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };
            Span::styled(format!("{}  ", p.card.data().name), style)
        })
        .collect();
    let para = Paragraph::new(Line::from(names))
        .block(Block::default().title("Play area").borders(Borders::ALL));
    f.render_widget(para, area);
}

fn draw_hand(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .title(format!("Hand ({})", app.hand.len()))
        .borders(Borders::ALL)
        .border_style(if app.board.target_indicator() {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        });
    f.render_widget(block, area);
    let cards = app.hand.cards();
    for (i, (card, cell)) in cards.iter().zip(columns(inner(area), cards.len())).enumerate() {
        let highlighted = app.hand.selected_index() == Some(i);
        let raised = app.board.raised() == Some(card.id());
        let affordable = app.controller.can_play(card.data());
        render_card(f, cell, card, highlighted, raised, affordable);
    }
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    card: &Card,
    highlighted: bool,
    raised: bool,
    affordable: bool,
) {
    let data = card.data();
    let mut block = Block::default().title(data.name.clone()).borders(Borders::ALL);
    if raised {
        block = block.border_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
    } else if highlighted {
        block = block.border_style(Style::default().fg(Color::Cyan));
    }
    let text_style = if affordable {
        Style::default()
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    let lines = vec![
        Line::from(Span::styled(format!("AP {} MP {}", data.action_cost, data.movement_cost), text_style)),
        Line::from(Span::styled(format!("Target: {}", data.target), text_style)),
        Line::from(Span::styled(format!("{} {:.0}", data.damage_type, data.power), text_style)),
    ];
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}

fn draw_status(f: &mut Frame, area: Rect, app: &AppState) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Status"), area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(inner(area));

    let mut left = Vec::with_capacity(2);
    if let Some(result) = app.board.result() {
        left.push(Line::from(Span::styled(
            format!("{result}! Press N for a new encounter."),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
    } else if let Some(line) = app.encounter.log().last() {
        left.push(Line::from(line.clone()));
    }
    if let Some(reason) = app.status_message() {
        left.push(Line::from(Span::styled(
            format!("Ignored: {reason}"),
            Style::default().fg(Color::Red),
        )));
    }
    let right = vec![Line::from("E end turn • F flee"), Line::from("? help • L log • Q quit")];
    f.render_widget(Paragraph::new(left).wrap(Wrap { trim: true }), cols[0]);
    f.render_widget(
        Paragraph::new(right).wrap(Wrap { trim: true }).alignment(Alignment::Right),
        cols[1],
    );
}

fn draw_log(f: &mut Frame, app: &AppState) {
    let area = centered_rect(70, 80, f.area());
    let block = Block::default().title("Combat log").borders(Borders::ALL);
    let log = app.encounter.log();
    let start = log.len().saturating_sub(AppState::LOG_PAGE_SIZE);
    let mut lines: Vec<Line> = if log.is_empty() {
        vec![Line::from("Nothing has happened yet.")]
    } else {
        log[start..].iter().map(|l| Line::from(l.as_str())).collect()
    };
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Close: L or Esc",
        Style::default().add_modifier(Modifier::DIM),
    )));
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(70, 80, f.area());
    let block = Block::default().title("Help").borders(Borders::ALL);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("Cards:", bold)),
        Line::from("- Left / Right: highlight card"),
        Line::from("- Enter / Space: play highlighted card"),
        Line::from(""),
        Line::from(Span::styled("Targeting:", bold)),
        Line::from("- Up / Down: move pointer over enemies"),
        Line::from("- Enter / Space: target enemy under pointer"),
        Line::from("- Esc: cancel targeting"),
        Line::from(""),
        Line::from(Span::styled("Encounter:", bold)),
        Line::from("- E: end turn"),
        Line::from("- F: flee"),
        Line::from("- N: new encounter (after it ends)"),
        Line::from("- L: combat log"),
        Line::from("- Q: quit"),
        Line::from(""),
        Line::from("Close help: ? or Esc"),
    ];
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner(area));
}
