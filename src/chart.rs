// src/chart.rs
use crate::aggregate::NetWorthPoint;
use chrono::NaiveDate;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget};
use std::fmt::Write;

/// Scale domains for the net-worth chart: date extent on x, `[0, max]` on y.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBounds {
    pub first: NaiveDate,
    pub last: NaiveDate,
    pub max_value: f64,
}

impl ChartBounds {
    /// `None` for an empty series, where both scales collapse.
    pub fn from_points(points: &[NetWorthPoint]) -> Option<Self> {
        let first = points.iter().map(|p| p.date).min()?;
        let last = points.iter().map(|p| p.date).max()?;
        let max_value = points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
        Some(ChartBounds {
            first,
            last,
            max_value,
        })
    }

    /// Days since the first date; the chart's x coordinate.
    pub fn x_of(&self, date: NaiveDate) -> f64 {
        (date - self.first).num_days() as f64
    }

    // A single date or an all-zero series would give a zero-width axis.
    fn x_bounds(&self) -> [f64; 2] {
        [0.0, self.x_of(self.last).max(1.0)]
    }

    fn y_bounds(&self) -> [f64; 2] {
        let top = if self.max_value > 0.0 { self.max_value } else { 1.0 };
        [0.0, top]
    }
}

fn net_worth_chart<'a>(data: &'a [(f64, f64)], bounds: &ChartBounds) -> Chart<'a> {
    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(data);

    let [y_min, y_max] = bounds.y_bounds();
    Chart::new(vec![dataset])
        .block(Block::default().borders(Borders::ALL).title(" Net worth "))
        .x_axis(
            Axis::default()
                .title("Date")
                .style(Style::default().fg(Color::Gray))
                .bounds(bounds.x_bounds())
                .labels(vec![bounds.first.to_string(), bounds.last.to_string()]),
        )
        .y_axis(
            Axis::default()
                .title("Value")
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(vec![
                    format!("{:.2}", y_min),
                    format!("{:.2}", (y_min + y_max) / 2.0),
                    format!("{:.2}", y_max),
                ]),
        )
}

fn buffer_to_string(buf: &Buffer) -> String {
    let width = buf.area.width.max(1) as usize;
    let mut out = String::new();
    for row in buf.content.chunks(width) {
        let line: String = row.iter().map(|cell| cell.symbol()).collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Draws the series as a line chart into a `width` x `height` cell grid.
pub fn render_chart(points: &[NetWorthPoint], width: u16, height: u16) -> String {
    let Some(bounds) = ChartBounds::from_points(points) else {
        return "No historical data.\n".to_string();
    };
    let data: Vec<(f64, f64)> = points.iter().map(|p| (bounds.x_of(p.date), p.value)).collect();

    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    net_worth_chart(&data, &bounds).render(area, &mut buf);
    buffer_to_string(&buf)
}

pub fn render_table(points: &[NetWorthPoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<12} {:>14}  {}", "Date", "Value", "Sources");
    for p in points {
        let _ = writeln!(out, "{:<12} {:>14.2}  {}", p.date.to_string(), p.value, p.sources);
    }
    out
}
