//! Continuous timeline rendering.
//!
//! Paints the sticky day header, the fixed time column, the day grid, the
//! current time indicator and the event blocks, and forwards raw egui input
//! to the [`CalendarSession`].

use chrono::{Datelike, NaiveDate, Weekday};
use egui::{Align2, FontId, Painter, Pos2, Rect, Stroke, Vec2};
use std::ops::Range;
use std::time::Duration;

use crate::services::geometry::{
    column_left, y_for_minutes, DAY_COLUMN_WIDTH, GRID_HEIGHT, HOUR_ROW_HEIGHT, TIME_COLUMN_WIDTH,
};
use crate::services::interaction::{
    InteractionKey, PointerButton, PointerTarget, ReleaseOutcome,
};
use crate::services::session::CalendarSession;
use crate::ui_egui::theme::CalendarTheme;
use crate::utils::date::{format_hm, hour_label, weekday_short};

pub const HEADER_HEIGHT: f32 = 48.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ScrollInput {
    /// Shift+wheel, positive steps forward in time
    ColumnStep(f32),
    /// Content offset delta
    Free(Vec2),
    None,
}

/// egui reports wheel deltas as content movement, so the sign is flipped to
/// get an offset delta. Shift+wheel may arrive on either axis.
fn classify_scroll(raw: Vec2, smooth: Vec2, shift: bool) -> ScrollInput {
    if shift {
        let wheel = raw.x + raw.y;
        if wheel != 0.0 {
            return ScrollInput::ColumnStep(-wheel);
        }
        return ScrollInput::None;
    }
    if smooth != Vec2::ZERO {
        ScrollInput::Free(-smooth)
    } else {
        ScrollInput::None
    }
}

/// Day columns intersecting `[offset, offset + width)`.
fn columns_in(offset: f32, width: f32, day_count: usize) -> Range<usize> {
    let first = (offset / DAY_COLUMN_WIDTH).floor().max(0.0) as usize;
    let last = ((offset + width) / DAY_COLUMN_WIDTH).ceil().max(0.0) as usize;
    first.min(day_count)..last.min(day_count)
}

/// Every key press counts for the click-away rule, only some edit.
fn interaction_key(key: egui::Key) -> InteractionKey {
    match key {
        egui::Key::Delete => InteractionKey::Delete,
        egui::Key::Backspace => InteractionKey::Backspace,
        egui::Key::Escape => InteractionKey::Escape,
        _ => InteractionKey::Other,
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Render the timeline into the remaining space of `ui`.
///
/// `panel_rect` is the edit panel's screen rectangle, if shown, so presses on
/// it are not treated as click-away.
pub fn render_timeline(
    ui: &mut egui::Ui,
    session: &mut CalendarSession,
    theme: &CalendarTheme,
    now: Duration,
    panel_rect: Option<Rect>,
) {
    let full = ui.available_rect_before_wrap();
    let header_rect = Rect::from_min_max(full.min, Pos2::new(full.right(), full.top() + HEADER_HEIGHT));
    let grid_rect = Rect::from_min_max(Pos2::new(full.left(), header_rect.bottom()), full.max);
    ui.allocate_rect(full, egui::Sense::hover());

    session.set_viewport(grid_rect);
    if !session.is_mounted() {
        session.mount(now);
    }

    handle_input(ui, session, grid_rect, panel_rect, now);

    let painter = ui.painter_at(full);
    painter.rect_filled(full, 0.0, theme.calendar_background);
    paint_grid(&painter.with_clip_rect(grid_rect), session, theme);
    paint_indicator(&painter.with_clip_rect(grid_rect), session, theme);
    paint_event_blocks(&painter.with_clip_rect(grid_rect), session, theme);
    paint_time_column(&painter.with_clip_rect(grid_rect), session, theme, grid_rect);
    paint_header(&painter.with_clip_rect(header_rect), session, theme, header_rect);
}

fn handle_input(
    ui: &egui::Ui,
    session: &mut CalendarSession,
    grid_rect: Rect,
    panel_rect: Option<Rect>,
    now: Duration,
) {
    let (press, latest, moved, released, scroll, keys) = ui.input(|i| {
        let press = if i.pointer.primary_pressed() {
            i.pointer.interact_pos().map(|pos| (pos, PointerButton::Primary))
        } else if i.pointer.secondary_pressed() {
            i.pointer.interact_pos().map(|pos| (pos, PointerButton::Secondary))
        } else {
            None
        };
        let scroll = classify_scroll(i.raw_scroll_delta, i.smooth_scroll_delta, i.modifiers.shift);
        let keys: Vec<InteractionKey> = i
            .events
            .iter()
            .filter_map(|event| match event {
                egui::Event::Key {
                    key, pressed: true, ..
                } => Some(interaction_key(*key)),
                _ => None,
            })
            .collect();
        (
            press,
            i.pointer.latest_pos(),
            i.pointer.delta() != Vec2::ZERO,
            i.pointer.primary_released(),
            scroll,
            keys,
        )
    });

    if let Some((pos, button)) = press {
        let on_grid = grid_rect.contains(pos) && pos.x >= grid_rect.left() + TIME_COLUMN_WIDTH;
        if on_grid {
            session.pointer_down(pos, button);
        } else if panel_rect.is_some_and(|rect| rect.contains(pos)) {
            session.global_pointer_down(PointerTarget::EditPanel);
        } else {
            session.global_pointer_down(PointerTarget::Elsewhere);
        }
    }

    if moved {
        if let Some(pos) = latest {
            session.pointer_move(pos);
        }
    }

    if released {
        match session.pointer_up() {
            ReleaseOutcome::Created(event) => {
                log::debug!("Pending event {} from {} to {}", event.id, event.start, event.end)
            }
            ReleaseOutcome::Moved(event) => log::debug!("Moved event {} to {}", event.id, event.start),
            ReleaseOutcome::Discarded | ReleaseOutcome::Idle => {}
        }
    }

    if latest.is_some_and(|pos| grid_rect.contains(pos)) {
        match scroll {
            ScrollInput::ColumnStep(delta) => {
                session.wheel(delta, true, now);
            }
            ScrollInput::Free(delta) => session.scroll_by(delta, now),
            ScrollInput::None => {}
        }
    }

    if !keys.is_empty() {
        let target = if ui.ctx().memory(|memory| memory.focused().is_some()) {
            PointerTarget::EditPanel
        } else {
            PointerTarget::Elsewhere
        };
        for key in keys {
            session.key(key, target);
        }
    }
}

fn paint_grid(painter: &Painter, session: &CalendarSession, theme: &CalendarTheme) {
    let geometry = session.geometry();
    let days = session.days();
    let line = Stroke::new(1.0, theme.grid_line);

    for index in session.scroll().visible_columns(days.len()) {
        let column = geometry.to_screen(Rect::from_min_size(
            Pos2::new(column_left(index), 0.0),
            Vec2::new(DAY_COLUMN_WIDTH, GRID_HEIGHT),
        ));
        if is_weekend(days[index]) {
            painter.rect_filled(column, 0.0, theme.weekend_background);
        }
        painter.line_segment([column.left_top(), column.left_bottom()], line);

        for hour in 0..24 {
            let y = column.top() + y_for_minutes(hour as f32 * 60.0);
            painter.line_segment([Pos2::new(column.left(), y), Pos2::new(column.right(), y)], line);
            let half = y + HOUR_ROW_HEIGHT / 2.0;
            painter.line_segment(
                [Pos2::new(column.left(), half), Pos2::new(column.right(), half)],
                Stroke::new(0.5, theme.grid_line.linear_multiply(0.6)),
            );
        }
    }
}

fn paint_indicator(painter: &Painter, session: &CalendarSession, theme: &CalendarTheme) {
    let geometry = session.geometry();
    let offset = session.indicator_offset();
    let line = geometry.to_screen(Rect::from_min_size(
        Pos2::new(0.0, offset),
        Vec2::new(session.indicator_line_width(), 0.0),
    ));
    painter.line_segment(
        [line.left_top(), line.right_top()],
        Stroke::new(1.0, theme.indicator.linear_multiply(0.5)),
    );

    if let Some(segment) = session.today_segment() {
        let today = geometry.to_screen(Rect::from_min_size(
            Pos2::new(segment.left, offset),
            Vec2::new(segment.width, 0.0),
        ));
        painter.line_segment(
            [today.left_top(), today.right_top()],
            Stroke::new(2.0, theme.indicator),
        );
        painter.circle_filled(today.left_top(), 4.0, theme.indicator);
    }
}

fn paint_event_blocks(painter: &Painter, session: &CalendarSession, theme: &CalendarTheme) {
    let geometry = session.geometry();
    let visible = session.scroll().visible_columns(session.days().len());
    let active = session.active_event();

    for block in session.event_blocks() {
        if !visible.contains(&block.day_index) {
            continue;
        }
        let Some(event) = active
            .filter(|active| block.is_active && active.id == block.event_id)
            .or_else(|| session.events().get(&block.event_id))
        else {
            continue;
        };

        let rect = geometry.to_screen(block.rect).shrink2(Vec2::new(2.0, 1.0));
        let fill = if block.is_temporary {
            theme.event_creating_fill
        } else {
            theme.event_fill
        };
        painter.rect_filled(rect, 4.0, fill);
        if block.is_active {
            painter.rect_stroke(rect, 4.0, Stroke::new(2.0, theme.event_active_border));
        }

        let title = if event.title.trim().is_empty() {
            "(No title)"
        } else {
            event.title.as_str()
        };
        let (start, end) = event.normalized();
        let text = painter.with_clip_rect(rect.intersect(painter.clip_rect()));
        text.text(
            rect.left_top() + Vec2::new(6.0, 4.0),
            Align2::LEFT_TOP,
            title,
            FontId::proportional(13.0),
            theme.event_text,
        );
        if rect.height() > 36.0 {
            text.text(
                rect.left_top() + Vec2::new(6.0, 20.0),
                Align2::LEFT_TOP,
                format!("{} - {}", format_hm(start.time()), format_hm(end.time())),
                FontId::proportional(11.0),
                theme.event_text.linear_multiply(0.85),
            );
        }
    }
}

fn paint_time_column(
    painter: &Painter,
    session: &CalendarSession,
    theme: &CalendarTheme,
    grid_rect: Rect,
) {
    let column = Rect::from_min_size(grid_rect.min, Vec2::new(TIME_COLUMN_WIDTH, grid_rect.height()));
    painter.rect_filled(column, 0.0, theme.app_background);
    painter.line_segment(
        [column.right_top(), column.right_bottom()],
        Stroke::new(1.0, theme.grid_line),
    );

    let top = grid_rect.top() - session.scroll().scroll_top();
    for hour in 1..24 {
        let y = top + y_for_minutes(hour as f32 * 60.0);
        painter.text(
            Pos2::new(column.right() - 6.0, y),
            Align2::RIGHT_CENTER,
            hour_label(hour),
            FontId::proportional(11.0),
            theme.text_secondary,
        );
    }

    let now_y = top + session.indicator_offset();
    painter.text(
        Pos2::new(column.right() - 6.0, now_y),
        Align2::RIGHT_CENTER,
        session.current_time_label(),
        FontId::proportional(11.0),
        theme.indicator,
    );
}

fn paint_header(
    painter: &Painter,
    session: &CalendarSession,
    theme: &CalendarTheme,
    header_rect: Rect,
) {
    painter.rect_filled(header_rect, 0.0, theme.app_background);
    let offset = session.scroll().header_scroll_left();
    let client_width = header_rect.width() - TIME_COLUMN_WIDTH;
    let left = header_rect.left() + TIME_COLUMN_WIDTH - offset;
    let days = session.days();
    let cells = painter.with_clip_rect(Rect::from_min_max(
        Pos2::new(header_rect.left() + TIME_COLUMN_WIDTH, header_rect.top()),
        header_rect.max,
    ));

    for index in columns_in(offset, client_width, days.len()) {
        let date = days[index];
        let cell = Rect::from_min_size(
            Pos2::new(left + column_left(index), header_rect.top()),
            Vec2::new(DAY_COLUMN_WIDTH, HEADER_HEIGHT),
        );
        let is_today = date == session.today();
        if is_today {
            cells.rect_filled(cell.shrink(2.0), 4.0, theme.today_background);
            cells.rect_stroke(cell.shrink(2.0), 4.0, Stroke::new(1.0, theme.today_border));
        }
        cells.text(
            cell.center_top() + Vec2::new(0.0, 6.0),
            Align2::CENTER_TOP,
            weekday_short(date),
            FontId::proportional(11.0),
            theme.text_secondary,
        );
        cells.text(
            cell.center_bottom() - Vec2::new(0.0, 6.0),
            Align2::CENTER_BOTTOM,
            date.day().to_string(),
            FontId::proportional(18.0),
            if is_today { theme.today_border } else { theme.text_primary },
        );
    }

    painter.line_segment(
        [header_rect.left_bottom(), header_rect.right_bottom()],
        Stroke::new(1.0, theme.grid_line),
    );
}
