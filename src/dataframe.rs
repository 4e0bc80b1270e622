//! Delimited-text ingestion and emission of photon tables.
//!
//! The input format is a comma-separated table with a header row. Three
//! columns are required (`index_ph`, `x_atc`, `geoid_corr_h`); the label,
//! prediction and elevation columns are picked up when present. Structural
//! problems — a missing required column, a malformed numeric field, a table
//! with no rows — are fatal and reported with the offending line.

use std::io::{BufRead, Write};

use crate::types::Photon;

pub const INDEX_COLUMN: &str = "index_ph";
pub const X_COLUMN: &str = "x_atc";
pub const Z_COLUMN: &str = "geoid_corr_h";
pub const LABEL_COLUMN: &str = "manual_label";
pub const PREDICTION_COLUMN: &str = "prediction";
pub const SEA_SURFACE_COLUMN: &str = "sea_surface_h";
pub const BATHY_COLUMN: &str = "bathy_h";

/// Photons read from a delimited table, with flags recording which optional
/// columns were present.
#[derive(Clone, Debug)]
pub struct PhotonFrame {
    pub photons: Vec<Photon>,
    pub has_manual_label: bool,
    pub has_predictions: bool,
    pub has_surface_elevations: bool,
    pub has_bathy_elevations: bool,
}

struct Columns {
    index: usize,
    x: usize,
    z: usize,
    label: Option<usize>,
    prediction: Option<usize>,
    surface: Option<usize>,
    bathy: Option<usize>,
    total: usize,
}

impl Columns {
    fn parse(header: &str) -> Result<Self, String> {
        let names: Vec<String> = header
            .split(',')
            .map(|h| h.replace('\r', "").trim().to_string())
            .collect();
        let find = |name: &str| names.iter().position(|h| h == name);

        let index = find(INDEX_COLUMN)
            .ok_or_else(|| format!("missing required column '{INDEX_COLUMN}'"))?;
        let x = find(X_COLUMN).ok_or_else(|| format!("missing required column '{X_COLUMN}'"))?;
        let z = find(Z_COLUMN).ok_or_else(|| format!("missing required column '{Z_COLUMN}'"))?;

        Ok(Self {
            index,
            x,
            z,
            label: find(LABEL_COLUMN),
            prediction: find(PREDICTION_COLUMN),
            surface: find(SEA_SURFACE_COLUMN),
            bathy: find(BATHY_COLUMN),
            total: names.len(),
        })
    }
}

/// Read a photon table from a CSV stream.
pub fn read_photons<R: BufRead>(reader: R) -> Result<PhotonFrame, String> {
    let mut lines = reader.lines().enumerate();

    let header = match lines.next() {
        Some((_, Ok(line))) => line,
        Some((_, Err(e))) => return Err(format!("failed to read header: {e}")),
        None => return Err("empty input: no header row".to_string()),
    };
    let columns = Columns::parse(&header)?;

    let mut photons = Vec::new();
    for (lineno, line) in lines {
        let line = line.map_err(|e| format!("failed to read line {}: {e}", lineno + 1))?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != columns.total {
            return Err(format!(
                "line {}: expected {} fields, found {}",
                lineno + 1,
                columns.total,
                fields.len()
            ));
        }

        let field = |col: usize| -> Result<f64, String> {
            let raw = fields[col].trim();
            raw.parse::<f64>()
                .map_err(|_| format!("line {}: malformed numeric field '{raw}'", lineno + 1))
        };

        let mut photon = Photon {
            index: field(columns.index)? as u64,
            x: field(columns.x)?,
            z: field(columns.z)?,
            ..Photon::default()
        };
        if let Some(col) = columns.label {
            photon.cls = field(col)? as u16;
        }
        if let Some(col) = columns.prediction {
            photon.prediction = field(col)? as u16;
        }
        if let Some(col) = columns.surface {
            photon.surface_elevation = field(col)?;
        }
        if let Some(col) = columns.bathy {
            photon.bathy_elevation = field(col)?;
        }
        photons.push(photon);
    }

    if photons.is_empty() {
        return Err("input contains a header but no data rows".to_string());
    }

    Ok(PhotonFrame {
        photons,
        has_manual_label: columns.label.is_some(),
        has_predictions: columns.prediction.is_some(),
        has_surface_elevations: columns.surface.is_some(),
        has_bathy_elevations: columns.bathy.is_some(),
    })
}

/// Write a photon table as CSV, one row per photon in input order.
///
/// Coordinates and elevations carry four decimal places; identifiers and
/// class codes are integers.
pub fn write_photons<W: Write>(mut writer: W, photons: &[Photon]) -> Result<(), String> {
    writeln!(
        writer,
        "{INDEX_COLUMN},{X_COLUMN},{Z_COLUMN},{LABEL_COLUMN},{PREDICTION_COLUMN},{SEA_SURFACE_COLUMN},{BATHY_COLUMN}"
    )
    .map_err(|e| format!("failed to write header: {e}"))?;

    for p in photons {
        writeln!(
            writer,
            "{},{:.4},{:.4},{},{},{:.4},{:.4}",
            p.index, p.x, p.z, p.cls, p.prediction, p.surface_elevation, p.bathy_elevation
        )
        .map_err(|e| format!("failed to write photon {}: {e}", p.index))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
index_ph,x_atc,geoid_corr_h,manual_label\r
10,0.5,-1.25,41\r
11,1.5,-7.0,40\r
12,2.5,0.125,0\r
";

    #[test]
    fn reads_required_and_optional_columns() {
        let frame = read_photons(SAMPLE.as_bytes()).unwrap();
        assert_eq!(frame.photons.len(), 3);
        assert!(frame.has_manual_label);
        assert!(!frame.has_predictions);

        let p = &frame.photons[0];
        assert_eq!(p.index, 10);
        assert_eq!(p.x, 0.5);
        assert_eq!(p.z, -1.25);
        assert_eq!(p.cls, 41);
        assert_eq!(p.prediction, 0);
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let err = read_photons("index_ph,geoid_corr_h\n1,2.0\n".as_bytes()).unwrap_err();
        assert!(err.contains("x_atc"), "{err}");
    }

    #[test]
    fn malformed_numeric_field_is_fatal() {
        let input = "index_ph,x_atc,geoid_corr_h\n1,abc,2.0\n";
        let err = read_photons(input.as_bytes()).unwrap_err();
        assert!(err.contains("line 2"), "{err}");
        assert!(err.contains("abc"), "{err}");
    }

    #[test]
    fn zero_rows_is_fatal() {
        let err = read_photons("index_ph,x_atc,geoid_corr_h\n".as_bytes()).unwrap_err();
        assert!(err.contains("no data rows"), "{err}");
    }

    #[test]
    fn empty_lines_are_skipped() {
        let input = "index_ph,x_atc,geoid_corr_h\n1,0.0,1.0\n\n2,1.0,2.0\n";
        let frame = read_photons(input.as_bytes()).unwrap();
        assert_eq!(frame.photons.len(), 2);
    }

    #[test]
    fn round_trip_preserves_the_logical_table() {
        let frame = read_photons(SAMPLE.as_bytes()).unwrap();
        let mut buf = Vec::new();
        write_photons(&mut buf, &frame.photons).unwrap();

        let again = read_photons(buf.as_slice()).unwrap();
        assert_eq!(again.photons.len(), frame.photons.len());
        for (a, b) in frame.photons.iter().zip(&again.photons) {
            assert_eq!(a.index, b.index);
            assert_eq!(a.x, b.x);
            assert_eq!(a.z, b.z);
            assert_eq!(a.cls, b.cls);
            assert_eq!(a.prediction, b.prediction);
        }
    }

    #[test]
    fn writes_fixed_precision() {
        let photons = vec![Photon {
            index: 7,
            x: 1.0 / 3.0,
            z: -2.0,
            cls: 0,
            prediction: 41,
            surface_elevation: 0.125,
            bathy_elevation: -6.0,
        }];
        let mut buf = Vec::new();
        write_photons(&mut buf, &photons).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "index_ph,x_atc,geoid_corr_h,manual_label,prediction,sea_surface_h,bathy_h"
        );
        assert_eq!(lines.next().unwrap(), "7,0.3333,-2.0000,0,41,0.1250,-6.0000");
    }
}
