/// Shown instead of a countdown when the group plays without a timer.
pub const NO_TIMER_PLACEHOLDER: &str = "--:--";

/// `MM:SS`, both fields zero padded. Minutes keep growing past 59.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
