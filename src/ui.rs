use colored::*;

use crate::{
    dashboard::{
        camera::{CameraCommand, LngLat, LngLatBounds},
        map::MapPoint,
        sidebar::SidebarItem,
    },
    models::{location::Location, location_log::LocationLog},
};

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

pub fn format_coordinates(lat: f64, long: f64) -> String {
    let ns = if lat < 0.0 { 'S' } else { 'N' };
    let ew = if long < 0.0 { 'W' } else { 'E' };
    format!("{:.5}°{} {:.5}°{}", lat.abs(), ns, long.abs(), ew)
}

fn format_lng_lat([long, lat]: LngLat) -> String {
    format_coordinates(lat, long)
}

/// Format a timestamp in the local time zone (e.g. "Jun 01 2025, 18:30")
pub fn format_timestamp(timestamp: jiff::Timestamp) -> String {
    let zoned = timestamp.to_zoned(jiff::tz::TimeZone::system());
    zoned.strftime("%b %d %Y, %H:%M").to_string()
}

/// Print `left` with `right` dimmed against the right edge when it fits
fn render_aligned(left: ColoredString, left_visible_len: usize, right: &str) {
    let terminal_width = get_terminal_width();
    let right_visible_len = right.chars().count();
    let total_content = left_visible_len + right_visible_len;

    if !right.is_empty() && total_content + 4 < terminal_width {
        let padding = terminal_width - total_content - 2;
        println!("{}{}{}", left, " ".repeat(padding), right.dimmed());
    } else {
        println!("{}", left);
    }
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize, noun: &str) {
    let noun = if count == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    };
    println!("\n  {} ({} {})\n", title.cyan().bold(), count, noun);
}

/// Render a section header (e.g., "Sidebar", "Camera")
pub fn render_section_header(title: &str) {
    println!("\n  ─── {} ───\n", title.bold());
}

pub fn render_location_line(location: &Location) {
    let left = format!("  {:>3}  {}  {}", location.id, "●".green(), location.name);
    let visible = location.id.to_string().len().max(3) + location.name.chars().count() + 7;
    render_aligned(
        left.bold(),
        visible,
        &format!(
            "{}  ·  {}",
            location.slug,
            format_coordinates(location.lat, location.long)
        ),
    );
}

pub fn render_location_details(location: &Location, logs: &[LocationLog]) {
    println!("\n  {}", location.name.cyan().bold());
    println!("    {} {}", "Slug:".dimmed(), location.slug);
    println!(
        "    {} {}",
        "At:".dimmed(),
        format_coordinates(location.lat, location.long)
    );
    if let Some(description) = &location.description {
        println!("    {} {}", "Notes:".dimmed(), description);
    }

    if logs.is_empty() {
        println!("\n  {}", "No logs yet".dimmed());
        return;
    }

    render_section_header(&format!("Logs ({})", logs.len()));
    for log in logs {
        render_location_log_line(log);
    }
}

pub fn render_location_log_line(log: &LocationLog) {
    let left = format!("  {:>3}  {}  {}", log.id, "○".normal(), log.name);
    let visible = log.id.to_string().len().max(3) + log.name.chars().count() + 7;

    let when = match log.ended_at {
        Some(ended_at) => format!(
            "{} → {}",
            format_timestamp(log.started_at),
            format_timestamp(ended_at)
        ),
        None => format_timestamp(log.started_at),
    };
    render_aligned(left.bold(), visible, &when);
}

pub fn render_location_log_details(log: &LocationLog) {
    println!("\n  {}", log.name.cyan().bold());
    println!(
        "    {} {}",
        "At:".dimmed(),
        format_coordinates(log.lat, log.long)
    );
    println!(
        "    {} {}",
        "Started:".dimmed(),
        format_timestamp(log.started_at)
    );
    if let Some(ended_at) = log.ended_at {
        println!("    {} {}", "Ended:".dimmed(), format_timestamp(ended_at));
    }
    if let Some(description) = &log.description {
        println!("    {} {}", "Notes:".dimmed(), description);
    }
}

pub fn render_sidebar_item(item: &SidebarItem) {
    let glyph = if item.icon.ends_with("-filled") {
        "●"
    } else {
        "○"
    };
    let left = format!("  {}  {}", glyph.green(), item.label);
    let visible = item.label.chars().count() + 5;
    render_aligned(left.bold(), visible, &item.navigation_target.path());
}

pub fn render_map_point(point: &MapPoint, selected: bool) {
    let marker = if selected { "◉".red() } else { "◦".normal() };
    let left = format!("  {}  {}", marker, point.label);
    let visible = point.label.chars().count() + 5;
    render_aligned(
        left.normal(),
        visible,
        &format_coordinates(point.lat, point.long),
    );
}

fn format_bounds(bounds: &LngLatBounds) -> String {
    format!(
        "{} … {}",
        format_lng_lat(bounds.south_west),
        format_lng_lat(bounds.north_east)
    )
}

pub fn render_bounds(bounds: &LngLatBounds) {
    println!("\n  {} {}", "Bounds:".dimmed(), format_bounds(bounds));
}

pub fn render_camera_command(command: &CameraCommand) {
    let line = match command {
        CameraCommand::FlyTo {
            center,
            zoom,
            speed,
        } => {
            let mut line = format!("fly to {}", format_lng_lat(*center));
            if let Some(zoom) = zoom {
                line.push_str(&format!(" · zoom {zoom}"));
            }
            if let Some(speed) = speed {
                line.push_str(&format!(" · speed {speed}"));
            }
            line
        }
        CameraCommand::FitBounds {
            bounds,
            padding,
            max_zoom,
        } => {
            let mut line = format!("fit {} · padding {padding}", format_bounds(bounds));
            if let Some(max_zoom) = max_zoom {
                line.push_str(&format!(" · max zoom {max_zoom}"));
            }
            line
        }
    };
    println!("  {} {}", "→".blue(), line);
}
