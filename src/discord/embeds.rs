// Embed helpers shared by every command so replies look the same everywhere.

use poise::serenity_prelude as serenity;

pub const FOOTER_TEXT: &str = "orangeBOT";

/// Green, used for celebrations (level-ups).
pub const COLOR_SUCCESS: u32 = 0x00ff00;
/// Blue, used for everything informational.
pub const COLOR_INFO: u32 = 0x0099ff;

/// An embed with the bot's footer and the current timestamp already set.
pub fn branded_embed(color: u32) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .color(color)
        .timestamp(serenity::Timestamp::now())
        .footer(serenity::CreateEmbedFooter::new(FOOTER_TEXT))
}

pub fn build_progress_bar(progress: f64, length: usize) -> String {
    let clamped = progress.clamp(0.0, 1.0);
    let mut filled = (clamped * length as f64).round() as usize;
    if clamped > 0.0 && filled == 0 {
        filled = 1;
    }
    filled = filled.min(length);
    let filled_char = "▰";
    let empty_char = "▱";
    let bar = filled_char.repeat(filled) + &empty_char.repeat(length - filled);
    format!("{} ({}%)", bar, (clamped * 100.0).round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(build_progress_bar(0.0, 4), "▱▱▱▱ (0%)");
        assert_eq!(build_progress_bar(0.5, 4), "▰▰▱▱ (50%)");
        assert_eq!(build_progress_bar(1.0, 4), "▰▰▰▰ (100%)");
    }

    #[test]
    fn any_progress_shows_at_least_one_segment() {
        assert_eq!(build_progress_bar(0.01, 10), "▰▱▱▱▱▱▱▱▱▱ (1%)");
    }

    #[test]
    fn progress_bar_clamps_out_of_range_values() {
        assert_eq!(build_progress_bar(3.0, 2), "▰▰ (100%)");
        assert_eq!(build_progress_bar(-1.0, 2), "▱▱ (0%)");
    }
}
