/// Formats a job runtime in seconds as `{h}h {mm}m {ss}s`, the format the
/// report pages always used. Hours are shown even when zero so columns of
/// runtimes line up.
pub fn runtime_display(duration: i64) -> String {
    let duration = duration.max(0);
    let hours = duration / 3600;
    let mins = (duration % 3600) / 60;
    let secs = duration % 60;
    format!("{}h {:02}m {:02}s", hours, mins, secs)
}
