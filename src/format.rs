//! Human-readable formatting for coordinates, timestamps and sizes
//!
//! Free functions shared by the overlay compositor, the stores and any
//! caller that wants to present readings to an operator.

use chrono::{DateTime, Local, SecondsFormat, Utc};

/// How a coordinate pair is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateFormat {
    Decimal,
    Dms,
}

/// How a timestamp is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    Short,
    Long,
    Iso,
}

/// Format a latitude/longitude pair, e.g. `37.774900°N, 122.419400°W`
pub fn format_coordinates(latitude: f64, longitude: f64, format: CoordinateFormat) -> String {
    if format == CoordinateFormat::Dms {
        return format!(
            "{}, {}",
            format_dms(latitude, true),
            format_dms(longitude, false)
        );
    }

    let lat_dir = if latitude >= 0.0 { 'N' } else { 'S' };
    let lng_dir = if longitude >= 0.0 { 'E' } else { 'W' };

    format!(
        "{:.6}°{}, {:.6}°{}",
        latitude.abs(),
        lat_dir,
        longitude.abs(),
        lng_dir
    )
}

/// Format one decimal coordinate as degrees/minutes/seconds with a
/// cardinal direction, e.g. `37°46'29.64"N`
pub fn format_dms(decimal: f64, is_latitude: bool) -> String {
    let abs = decimal.abs();
    let degrees = abs.floor();
    let minutes = ((abs - degrees) * 60.0).floor();
    let seconds = (abs - degrees - minutes / 60.0) * 3600.0;

    let direction = if is_latitude {
        if decimal >= 0.0 {
            'N'
        } else {
            'S'
        }
    } else if decimal >= 0.0 {
        'E'
    } else {
        'W'
    };

    format!("{}°{}'{:.2}\"{}", degrees as i64, minutes as i64, seconds, direction)
}

/// Render a timestamp in the local timezone
pub fn format_timestamp(timestamp: DateTime<Utc>, format: TimestampFormat) -> String {
    let local = timestamp.with_timezone(&Local);
    match format {
        TimestampFormat::Short => local.format("%Y-%m-%d %H:%M").to_string(),
        TimestampFormat::Long => local.format("%Y-%m-%d %H:%M:%S").to_string(),
        TimestampFormat::Iso => timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// Format a byte count with binary units, e.g. `1.21 MB`
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".into();
    }

    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let exponent = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);

    format!(
        "{:.2} {}",
        bytes as f64 / 1024_f64.powi(exponent as i32),
        UNITS[exponent]
    )
}

/// Format a distance in meters, switching to kilometers past 1 km
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.0}m", meters)
    } else {
        format!("{:.1}km", meters / 1000.0)
    }
}

/// Format a positioning accuracy radius, e.g. `±12m`
pub fn format_accuracy(accuracy: f64) -> String {
    if accuracy < 1.0 {
        format!("±{:.0}cm", accuracy * 100.0)
    } else {
        format!("±{:.0}m", accuracy)
    }
}

/// Build a filesystem-safe filename like `photo_2026-08-06_12-34-56.jpeg`
pub fn generate_filename(prefix: &str, timestamp: DateTime<Utc>, extension: &str) -> String {
    format!(
        "{}_{}_{}.{}",
        prefix,
        timestamp.format("%Y-%m-%d"),
        timestamp.format("%H-%M-%S"),
        extension
    )
}

/// ISO-8601 timestamp with `:` and `.` replaced for filesystem safety.
/// Raw and processed artifacts of one capture share this token.
pub fn timestamp_token(timestamp: DateTime<Utc>) -> String {
    timestamp
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

/// Parse `"lat, lng"` or `"lat lng"` decimal input into a coordinate pair
pub fn parse_coordinates(input: &str) -> Option<(f64, f64)> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, [',', ' ']);

    let latitude: f64 = parts.next()?.trim().parse().ok()?;
    let longitude: f64 = parts.next()?.trim().parse().ok()?;

    if latitude.is_finite() && longitude.is_finite() {
        Some((latitude, longitude))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn dms_north_and_south() {
        let north = format_dms(37.7749, true);
        assert_eq!(north, "37°46'29.64\"N");

        let south = format_dms(-37.7749, true);
        assert!(south.ends_with('S'));
    }

    #[test]
    fn dms_longitude_directions() {
        assert!(format_dms(-122.4194, false).ends_with('W'));
        assert!(format_dms(151.2093, false).ends_with('E'));
    }

    #[test]
    fn decimal_coordinates() {
        let formatted = format_coordinates(37.7749, -122.4194, CoordinateFormat::Decimal);
        assert_eq!(formatted, "37.774900°N, 122.419400°W");
    }

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512.00 B");
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn distances_and_accuracy() {
        assert_eq!(format_distance(42.4), "42m");
        assert_eq!(format_distance(1500.0), "1.5km");
        assert_eq!(format_accuracy(0.25), "±25cm");
        assert_eq!(format_accuracy(12.0), "±12m");
    }

    #[test]
    fn filename_generation() {
        let ts = Utc.with_ymd_and_hms(2026, 8, 6, 12, 34, 56).unwrap();
        assert_eq!(
            generate_filename("photo", ts, "jpeg"),
            "photo_2026-08-06_12-34-56.jpeg"
        );
    }

    #[test]
    fn token_is_filesystem_safe() {
        let token = timestamp_token(Utc::now());
        assert!(!token.contains(':'));
        assert!(!token.contains('.'));
    }

    #[test]
    fn parse_decimal_inputs() {
        assert_eq!(
            parse_coordinates("40.7128, -74.0060"),
            Some((40.7128, -74.0060))
        );
        assert_eq!(
            parse_coordinates("40.7128 -74.0060"),
            Some((40.7128, -74.0060))
        );
        assert_eq!(parse_coordinates("not a coordinate"), None);
    }
}
