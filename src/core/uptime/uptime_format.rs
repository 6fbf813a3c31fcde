use std::time::Duration;

/// Render elapsed time as `{d}d {h}h {m}m {s}s`.
pub fn format_uptime(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let days = total / 86_400;
    let hours = (total / 3_600) % 24;
    let minutes = (total / 60) % 60;
    let seconds = total % 60;

    format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
}
