//! Utility functions that don't belong in any other module.

/// Converts a byte length into a human-readable string.
///
/// This condenses the length until it can't be shrunk any further and returns it with the
/// relevant unit (bytes, KB, MB, ...). Mainly used for log output so hex-and-byte-count heavy
/// messages stay readable.
///
/// # Warnings
/// This function uses `f64`, which on inputs over 2^53 will lose precision, but for firmware-sized
/// buffers it will always round to a close-enough value.
#[must_use]
pub fn format_size(length: usize) -> String {
    const UNITS: [&str; 5] = ["bytes", "KB", "MB", "GB", "TB"];
    let mut size = length as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{size:.2} {}", UNITS[unit_index])
}
