// Small formatting helpers shared by the views

use std::path::Path;

/// Human readable byte count, e.g. `1.5 MB`
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", size, UNITS[unit])
}

/// Shortens `path` from the left so it fits in `max_width` characters
pub fn truncate_path(path: &Path, max_width: usize) -> String {
    let full = path.display().to_string();
    let len = full.chars().count();
    if len <= max_width {
        return full;
    }
    if max_width <= 1 {
        return "…".chars().take(max_width).collect();
    }

    let tail: String = full.chars().skip(len - (max_width - 1)).collect();
    format!("…{}", tail)
}

/// File name for display, falling back to the whole path
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
