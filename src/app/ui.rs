// Handles the rendering of widgets to the terminal frame.

use super::model::{Models, Service, ServiceUnit, ServiceUnitList};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

/// Size of a single unit box, borders included.
pub const UNIT_WIDTH: u16 = 18;
pub const UNIT_HEIGHT: u16 = 4;

const SIDEBAR_WIDTH: u16 = 36;

/// Main render function called every frame.
pub fn render(f: &mut Frame, models: &Models, list_state: &mut ListState, error: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(chunks[0]);

    // Charm list takes at most a third of the sidebar.
    let charm_height = u16::try_from(models.charms.len())
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .min(body[0].height / 3);
    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(charm_height)])
        .split(body[0]);

    render_service_list(f, sidebar[0], models, list_state);
    render_charm_list(f, sidebar[1], models);

    let selected = list_state
        .selected()
        .and_then(|i| models.services.get(i));
    render_service_view(f, body[1], selected, &models.units);

    render_footer(f, chunks[1], error);
}

/// Border colour for a unit in the given agent state.
pub fn state_color(state: Option<&str>) -> Color {
    match state {
        Some("running") => Color::Green,
        Some("pending") => Color::Yellow,
        Some("error") => Color::Red,
        _ => Color::Gray,
    }
}

fn render_service_list(f: &mut Frame, area: Rect, models: &Models, state: &mut ListState) {
    let items: Vec<ListItem> = models
        .services
        .iter()
        .map(|service| {
            let states = models.units.get_informative_states_for_service(service);

            let (status_symbol, color) = if states.contains_key("error") {
                ("✖", Color::Red)
            } else if !states.is_empty() && states.keys().all(|s| s == "running") {
                ("●", Color::Green)
            } else {
                ("○", Color::DarkGray)
            };

            let summary = states
                .iter()
                .map(|(state, count)| format!("{state}:{count}"))
                .collect::<Vec<_>>()
                .join(" ");

            let content = Line::from(vec![
                Span::styled(status_symbol, Style::default().fg(color)),
                Span::raw(format!(" {:<14}", service.id())),
                Span::styled(summary, Style::default().fg(Color::Gray)),
            ]);

            ListItem::new(content)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Services "))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol(">> ");

    f.render_stateful_widget(list, area, state);
}

fn render_charm_list(f: &mut Frame, area: Rect, models: &Models) {
    let items: Vec<ListItem> = models
        .charms
        .map(|charm| ListItem::new(charm.name().to_owned()));

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Charms "));
    f.render_widget(list, area);
}

/// Draws the units of `service` as fixed-size boxes, packed row by row.
fn render_service_view(
    f: &mut Frame,
    area: Rect,
    service: Option<&Service>,
    units: &ServiceUnitList,
) {
    let Some(service) = service else {
        let block = Block::default().borders(Borders::ALL).title(" Units ");
        f.render_widget(Paragraph::new("No service selected").block(block), area);
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Units of {} ", service.id()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let units = units.get_units_for_service(service);
    for (unit, cell) in units.iter().zip(pack(inner, units.len())) {
        render_unit(f, cell, unit);
    }
}

/// Splits `area` into `count` unit-sized cells, left to right then top to
/// bottom. Cells that do not fit are dropped.
fn pack(area: Rect, count: usize) -> Vec<Rect> {
    let columns = usize::from((area.width / UNIT_WIDTH).max(1));
    let rows = count.div_ceil(columns).min(usize::from(area.height / UNIT_HEIGHT));
    if rows == 0 {
        return Vec::new();
    }

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .flex(Flex::Start)
        .constraints(vec![Constraint::Length(UNIT_HEIGHT); rows])
        .split(area);

    row_areas
        .iter()
        .flat_map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .flex(Flex::Start)
                .constraints(vec![Constraint::Length(UNIT_WIDTH); columns])
                .split(*row)
                .to_vec()
        })
        .take(count)
        .collect()
}

fn render_unit(f: &mut Frame, area: Rect, unit: &ServiceUnit) {
    let color = state_color(unit.agent_state());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let content = vec![
        Line::from(Span::styled(
            unit.id().to_owned(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            unit.agent_state().unwrap_or("unknown").to_owned(),
            Style::default().fg(color),
        )),
    ];

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn render_footer(f: &mut Frame, area: Rect, error: Option<&str>) {
    let help_text = match error {
        Some(error) => Line::from(vec![
            Span::styled("Reload failed: ", Style::default().fg(Color::Red)),
            Span::raw(error.to_owned()),
        ]),
        None => Line::from(vec![
            Span::raw("Nav: "),
            Span::styled("j/k ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Reload: "),
            Span::styled("r ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Quit: "),
            Span::styled("q", Style::default().fg(Color::Red)),
        ]),
    };

    let paragraph =
        Paragraph::new(help_text).block(Block::default().borders(Borders::ALL).title(" Controls "));

    f.render_widget(paragraph, area);
}
