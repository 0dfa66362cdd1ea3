//! Plain-text waypoint lists.
//!
//! Each line holds `lat lon` or `id lat lon`, separated by whitespace or
//! commas. Blank lines and lines starting with `#` are ignored. Lines that
//! cannot be parsed are skipped and reported rather than failing the file.

use std::io::{BufRead, BufReader};

use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use log::warn;
use thiserror::Error;
use waypoint_core::{NodeId, Waypoint};

/// Errors that abort reading a waypoint file.
#[derive(Debug, Error)]
pub enum WaypointFileError {
    /// The file could not be opened.
    #[error("failed to open waypoint file {path}")]
    Open {
        /// File that failed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Reading a line failed part way through.
    #[error("failed to read waypoint line {line}")]
    Read {
        /// One-based line number.
        line: usize,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Why a single line was skipped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineError {
    /// Neither two nor three fields.
    #[error("expected `lat lon` or `id lat lon`, found {0} fields")]
    FieldCount(usize),
    /// The id field is not an unsigned integer.
    #[error("invalid node id `{0}`")]
    InvalidId(String),
    /// A coordinate field is not a finite number.
    #[error("invalid coordinate `{0}`")]
    InvalidNumber(String),
    /// Latitude outside `[-90, 90]`.
    #[error("latitude {0} is out of range")]
    LatitudeOutOfRange(f64),
    /// Longitude outside `[-180, 180]`.
    #[error("longitude {0} is out of range")]
    LongitudeOutOfRange(f64),
}

/// A line that did not produce a waypoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLine {
    /// One-based line number.
    pub line: usize,
    /// Reason the line was rejected.
    pub error: LineError,
}

/// Parsed waypoints together with the lines that were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaypointReport {
    /// Waypoints in file order.
    pub waypoints: Vec<Waypoint>,
    /// Malformed lines in file order.
    pub skipped: Vec<SkippedLine>,
}

/// Parse waypoints from `reader`.
///
/// # Examples
/// ```
/// use waypoint_data::parse_waypoints;
///
/// # fn main() -> Result<(), waypoint_data::WaypointFileError> {
/// let text = "# depot\n4.65 -74.05\n7, 4.66, -74.06\nnonsense\n";
/// let report = parse_waypoints(text.as_bytes())?;
/// assert_eq!(report.waypoints.len(), 2);
/// assert_eq!(report.waypoints[1].id, Some(7));
/// assert_eq!(report.skipped.len(), 1);
/// # Ok(())
/// # }
/// ```
pub fn parse_waypoints<R: BufRead>(reader: R) -> Result<WaypointReport, WaypointFileError> {
    let mut report = WaypointReport::default();
    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let text = line.map_err(|source| WaypointFileError::Read {
            line: number,
            source,
        })?;
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_line(trimmed) {
            Ok(waypoint) => report.waypoints.push(waypoint),
            Err(error) => {
                warn!("skipping waypoint line {number}: {error}");
                report.skipped.push(SkippedLine {
                    line: number,
                    error,
                });
            }
        }
    }
    Ok(report)
}

/// Read and parse the waypoint file at `path`.
pub fn load_waypoints_file(path: &Utf8Path) -> Result<WaypointReport, WaypointFileError> {
    let file = waypoint_fs::open_utf8_file(path).map_err(|source| WaypointFileError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_waypoints(BufReader::new(file))
}

fn parse_line(line: &str) -> Result<Waypoint, LineError> {
    let fields: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
        .collect();
    match fields.as_slice() {
        [lat, lon] => Ok(Waypoint::new(coordinate(lat, lon)?)),
        [id, lat, lon] => {
            let id: NodeId = id
                .parse()
                .map_err(|_| LineError::InvalidId((*id).to_owned()))?;
            Ok(Waypoint::with_id(id, coordinate(lat, lon)?))
        }
        other => Err(LineError::FieldCount(other.len())),
    }
}

fn coordinate(lat: &str, lon: &str) -> Result<Coord<f64>, LineError> {
    let latitude = number(lat)?;
    let longitude = number(lon)?;
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(LineError::LatitudeOutOfRange(latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(LineError::LongitudeOutOfRange(longitude));
    }
    Ok(Coord {
        x: longitude,
        y: latitude,
    })
}

fn number(field: &str) -> Result<f64, LineError> {
    field
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| LineError::InvalidNumber(field.to_owned()))
}
