use crate::domain::{SlotOffset, VacancyItem};
use ratatui::layout::Rect;

/// Pseudo-pixels per terminal row when turning mouse rows into drag distance
pub const ROW_PX: f32 = 16.0;

/// Converts a terminal row to the drag coordinate the swipe controller uses
pub fn row_to_px(row: u16) -> f32 {
    row as f32 * ROW_PX
}

/// Rows a slot is displaced by inside a viewport `height` rows tall
pub fn slot_rows(offset: SlotOffset, height: u16) -> i32 {
    let rows = offset.percent / 100.0 * height as f32 + offset.px / ROW_PX;
    rows.round() as i32
}

/// `area` moved down by `offset` rows and clipped back into `area`.
/// `None` when nothing of it stays visible.
pub fn shifted_rect(area: Rect, offset: i32) -> Option<Rect> {
    let top = area.y as i32 + offset;
    let bottom = top + area.height as i32;
    let visible_top = top.max(area.y as i32);
    let visible_bottom = bottom.min(area.bottom() as i32);
    if visible_bottom <= visible_top {
        return None;
    }
    Some(Rect::new(
        area.x,
        visible_top as u16,
        area.width,
        (visible_bottom - visible_top) as u16,
    ))
}

/// Fraction of the feed seen so far, for the header gauge
pub fn calculate_progress(index: Option<usize>, total: usize) -> f64 {
    match index {
        Some(i) if total > 0 => ((i + 1) as f64 / total as f64).min(1.0),
        _ => 0.0,
    }
}

/// "Title 👑" style heading
pub fn title_with_badge(item: &VacancyItem) -> String {
    match item.employer_tier.badge() {
        Some(badge) => format!("{} {}", item.title, badge),
        None => item.title.clone(),
    }
}

pub fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("#{}", t))
        .collect::<Vec<_>>()
        .join("  ")
}

/// "1/3" position label, "0/0" for an empty feed
pub fn position_label(index: Option<usize>, total: usize) -> String {
    match index {
        Some(i) => format!("{}/{}", i + 1, total),
        None => format!("0/{}", total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support::published;
    use crate::domain::{slot_offset, CardSlot, EmployerTier};

    #[test]
    fn test_row_to_px() {
        assert_eq!(row_to_px(0), 0.0);
        assert_eq!(row_to_px(5), 80.0);
    }

    #[test]
    fn test_slot_rows_at_rest() {
        assert_eq!(slot_rows(slot_offset(CardSlot::Active, 0.0, 80.0), 20), 0);
        assert_eq!(slot_rows(slot_offset(CardSlot::Next, 0.0, 80.0), 20), 20);
        assert_eq!(slot_rows(slot_offset(CardSlot::Previous, 0.0, 80.0), 20), -20);
    }

    #[test]
    fn test_slot_rows_half_drag() {
        // Dragging up by half the threshold pulls the next card halfway in
        assert_eq!(slot_rows(slot_offset(CardSlot::Next, -40.0, 80.0), 20), 10);
        assert_eq!(slot_rows(slot_offset(CardSlot::Active, -32.0, 80.0), 20), -2);
    }

    #[test]
    fn test_shifted_rect() {
        let area = Rect::new(0, 5, 40, 10);
        assert_eq!(shifted_rect(area, 0), Some(area));
        assert_eq!(shifted_rect(area, 3), Some(Rect::new(0, 8, 40, 7)));
        assert_eq!(shifted_rect(area, -4), Some(Rect::new(0, 5, 40, 6)));
        assert_eq!(shifted_rect(area, 10), None);
        assert_eq!(shifted_rect(area, -12), None);
    }

    #[test]
    fn test_calculate_progress() {
        assert_eq!(calculate_progress(None, 0), 0.0);
        assert_eq!(calculate_progress(Some(0), 4), 0.25);
        assert_eq!(calculate_progress(Some(3), 4), 1.0);
    }

    #[test]
    fn test_title_with_badge() {
        let item = published("1", EmployerTier::Premium);
        assert_eq!(title_with_badge(&item), "Vacancy 1 👑");
        let item = published("2", EmployerTier::Econom);
        assert_eq!(title_with_badge(&item), "Vacancy 2");
    }

    #[test]
    fn test_format_tags() {
        let tags = vec!["Part-time".to_string(), "Daily pay".to_string()];
        assert_eq!(format_tags(&tags), "#Part-time  #Daily pay");
        assert_eq!(format_tags(&[]), "");
    }

    #[test]
    fn test_position_label() {
        assert_eq!(position_label(Some(0), 3), "1/3");
        assert_eq!(position_label(None, 0), "0/0");
    }
}
