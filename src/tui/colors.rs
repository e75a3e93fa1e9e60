// Palette shared by every screen
use crate::domain::EmployerTier;
use ratatui::style::Color;

pub const BG_DARK: Color = Color::Rgb(24, 24, 32);
pub const TEXT_PRIMARY: Color = Color::Rgb(230, 230, 235);
pub const TEXT_SECONDARY: Color = Color::Rgb(150, 150, 165);
pub const BORDER_COLOR: Color = Color::Rgb(80, 80, 100);

/// Errors and destructive hints
pub const ACCENT_PRIMARY: Color = Color::Rgb(235, 90, 90);
/// Salary and positive hints
pub const ACCENT_SECONDARY: Color = Color::Rgb(90, 200, 130);
pub const ACCENT_HIGHLIGHT: Color = Color::Rgb(120, 160, 255);

pub const TIER_PREMIUM: Color = Color::Rgb(245, 190, 60);
pub const TIER_VIP: Color = Color::Rgb(190, 120, 250);

/// Card border for an employer tier
pub fn tier_border_color(tier: EmployerTier) -> Color {
    match tier {
        EmployerTier::Premium => TIER_PREMIUM,
        EmployerTier::Vip => TIER_VIP,
        EmployerTier::Econom | EmployerTier::Free => BORDER_COLOR,
    }
}
