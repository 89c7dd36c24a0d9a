//! WMM reference test vectors
//!
//! Reference points are published as parallel columns (date, height,
//! latitude, longitude and the X/Y/Z field components). This module holds
//! those columns, checks that they line up, and turns each row into an
//! [`EcefCase`] ready for code generation.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::codegen::CheckStyle;
use crate::constants::{KM_TO_M, NT_TO_T};
use crate::coordinates::{ned_to_uvw, EcefCase, Geodetic};
use crate::{io_err, Result, TestgenError};

/// Default header under test
pub const DEFAULT_HEADER: &str = "geomag.h";
/// Default model label used in test-case names
pub const DEFAULT_MODEL: &str = "WMM2020";
/// Default C routine invoked by each test case
pub const DEFAULT_ROUTINE: &str = "geoMag";
/// Default Catch2 tag
pub const DEFAULT_TAG: &str = "[GeoMag]";
/// Default acceptable error per field component, in nT
pub const DEFAULT_MARGIN_NT: f64 = 0.1;

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Text that can sit between the quotes of a C++ string literal as is
fn is_string_literal_safe(text: &str) -> bool {
    !text.chars().any(|c| c == '"' || c == '\\' || c.is_control())
}

/// One WMM reference point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestVector {
    /// Decimal year
    pub date: f64,
    /// Height above the WGS84 ellipsoid in km
    pub height_km: f64,
    /// Geodetic latitude in degrees
    pub lat_deg: f64,
    /// Longitude in degrees
    pub lon_deg: f64,
    /// X (local north) field in nT
    pub north_nt: f64,
    /// Y (local east) field in nT
    pub east_nt: f64,
    /// Z (local down) field in nT
    pub down_nt: f64,
}

impl TestVector {
    /// Checks that the vector describes a real point on Earth
    pub fn validate(&self, index: usize) -> Result<()> {
        let values = [
            ("date", self.date),
            ("height", self.height_km),
            ("latitude", self.lat_deg),
            ("longitude", self.lon_deg),
            ("north field", self.north_nt),
            ("east field", self.east_nt),
            ("down field", self.down_nt),
        ];
        for (name, value) in values {
            if !value.is_finite() {
                return Err(TestgenError::InvalidVector {
                    index,
                    reason: format!("{} is not finite ({})", name, value),
                });
            }
        }

        if !(-90.0..=90.0).contains(&self.lat_deg) {
            return Err(TestgenError::InvalidVector {
                index,
                reason: format!("latitude {} is outside [-90, 90]", self.lat_deg),
            });
        }

        Ok(())
    }

    /// Position of the test point in ECEF meters
    pub fn position_ecef(&self) -> Vector3<f64> {
        Geodetic::new(self.lat_deg, self.lon_deg, self.height_km * KM_TO_M).to_ecef()
    }

    /// Reference field rotated into ECEF axes, in tesla
    pub fn field_ecef(&self) -> Vector3<f64> {
        let ned = Vector3::new(self.north_nt, self.east_nt, self.down_nt) * NT_TO_T;
        ned_to_uvw(&ned, self.lat_deg, self.lon_deg)
    }

    /// Converts the vector into the frame the library under test uses
    pub fn to_ecef_case(&self, index: usize) -> EcefCase {
        EcefCase {
            index,
            date: self.date,
            position_m: self.position_ecef(),
            field_t: self.field_ecef(),
        }
    }
}

/// Parallel-array form of a vector set, as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorColumns {
    /// Decimal test years
    pub dates: Vec<f64>,
    /// Heights (km) with respect to the WGS84 ellipsoid
    pub heights: Vec<f64>,
    /// Geodetic latitudes (deg)
    pub lats: Vec<f64>,
    /// Longitudes (deg)
    pub lons: Vec<f64>,
    /// X (local north) field (nT)
    pub bns: Vec<f64>,
    /// Y (local east) field (nT)
    pub bes: Vec<f64>,
    /// Z (local down) field (nT)
    pub bds: Vec<f64>,
}

impl VectorColumns {
    /// Zips the columns into rows, failing if any column length differs from `dates`
    pub fn into_vectors(self) -> Result<Vec<TestVector>> {
        let expected = self.dates.len();
        let columns: [(&'static str, usize); 6] = [
            ("heights", self.heights.len()),
            ("lats", self.lats.len()),
            ("lons", self.lons.len()),
            ("bns", self.bns.len()),
            ("bes", self.bes.len()),
            ("bds", self.bds.len()),
        ];
        if let Some(&(column, actual)) = columns.iter().find(|(_, len)| *len != expected) {
            return Err(TestgenError::LengthMismatch {
                column,
                expected,
                actual,
            });
        }

        Ok((0..expected)
            .map(|i| TestVector {
                date: self.dates[i],
                height_km: self.heights[i],
                lat_deg: self.lats[i],
                lon_deg: self.lons[i],
                north_nt: self.bns[i],
                east_nt: self.bes[i],
                down_nt: self.bds[i],
            })
            .collect())
    }
}

impl From<&[TestVector]> for VectorColumns {
    fn from(vectors: &[TestVector]) -> Self {
        VectorColumns {
            dates: vectors.iter().map(|v| v.date).collect(),
            heights: vectors.iter().map(|v| v.height_km).collect(),
            lats: vectors.iter().map(|v| v.lat_deg).collect(),
            lons: vectors.iter().map(|v| v.lon_deg).collect(),
            bns: vectors.iter().map(|v| v.north_nt).collect(),
            bes: vectors.iter().map(|v| v.east_nt).collect(),
            bds: vectors.iter().map(|v| v.down_nt).collect(),
        }
    }
}

/// On-disk layout of a suite: optional metadata plus the parallel columns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SuiteFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    header: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    routine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    margin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    check: Option<CheckStyle>,
    dates: Vec<f64>,
    heights: Vec<f64>,
    lats: Vec<f64>,
    lons: Vec<f64>,
    bns: Vec<f64>,
    bes: Vec<f64>,
    bds: Vec<f64>,
}

/// Metadata overrides layered on top of a loaded suite
///
/// `None` keeps the suite's value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuiteOverrides {
    pub header: Option<PathBuf>,
    pub model: Option<String>,
    pub routine: Option<String>,
    pub tag: Option<String>,
    pub margin: Option<f64>,
    pub check: Option<CheckStyle>,
}

/// Everything needed to generate one test file
#[derive(Debug, Clone, PartialEq)]
pub struct TestSuite {
    /// C header with the model and coefficients
    pub header: PathBuf,
    /// Model label used in test-case names
    pub model: String,
    /// C routine computing the field
    pub routine: String,
    /// Catch2 tag attached to every test case
    pub tag: String,
    /// Acceptable error in each component (nT)
    pub margin: f64,
    /// Assertion style of the generated checks
    pub check: CheckStyle,
    /// Reference points, one test case each
    pub vectors: Vec<TestVector>,
}

impl Default for TestSuite {
    fn default() -> Self {
        TestSuite {
            header: PathBuf::from(DEFAULT_HEADER),
            model: DEFAULT_MODEL.to_string(),
            routine: DEFAULT_ROUTINE.to_string(),
            tag: DEFAULT_TAG.to_string(),
            margin: DEFAULT_MARGIN_NT,
            check: CheckStyle::default(),
            vectors: Vec::new(),
        }
    }
}

impl TestSuite {
    /// Builds a suite from parallel columns with default metadata
    pub fn from_columns(columns: VectorColumns) -> Result<Self> {
        Ok(TestSuite {
            vectors: columns.into_vectors()?,
            ..TestSuite::default()
        })
    }

    /// The WMM2020 reference points published with the model
    pub fn wmm2020() -> Self {
        let dates = [vec![2020.0; 6], vec![2022.5; 6]].concat();
        let heights = [0.0, 0.0, 0.0, 100.0, 100.0, 100.0].repeat(2);
        let lats = [80.0, 0.0, -80.0].repeat(4);
        let lons = [0.0, 120.0, 240.0].repeat(4);

        #[rustfmt::skip]
        let bns = vec![
            6570.4, 39624.3, 5940.6, 6261.8, 37636.7, 5744.9,
            6529.9, 39684.7, 6016.5, 6224.0, 37694.0, 5815.0,
        ];
        #[rustfmt::skip]
        let bes = vec![
            -146.3, 109.9, 15772.1, -185.5, 104.9, 14799.5,
            1.1, -42.2, 15776.7, -44.5, -35.3, 14803.0,
        ];
        #[rustfmt::skip]
        let bds = vec![
            54606.0, -10932.5, -52480.8, 52429.1, -10474.8, -49969.4,
            54713.4, -10809.5, -52251.6, 52527.0, -10362.0, -49755.3,
        ];

        let vectors = (0..dates.len())
            .map(|i| TestVector {
                date: dates[i],
                height_km: heights[i],
                lat_deg: lats[i],
                lon_deg: lons[i],
                north_nt: bns[i],
                east_nt: bes[i],
                down_nt: bds[i],
            })
            .collect();

        TestSuite {
            vectors,
            ..TestSuite::default()
        }
    }

    /// Parses a suite from JSON text
    ///
    /// Metadata fields are optional and fall back to the defaults; the seven
    /// columns are required.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: SuiteFile = serde_json::from_str(json)?;
        let columns = VectorColumns {
            dates: file.dates,
            heights: file.heights,
            lats: file.lats,
            lons: file.lons,
            bns: file.bns,
            bes: file.bes,
            bds: file.bds,
        };
        let mut suite = TestSuite::from_columns(columns)?;
        suite.apply_overrides(SuiteOverrides {
            header: file.header,
            model: file.model,
            routine: file.routine,
            tag: file.tag,
            margin: file.margin,
            check: file.check,
        });
        Ok(suite)
    }

    /// Replaces every metadata field the overrides set
    pub fn apply_overrides(&mut self, overrides: SuiteOverrides) {
        if let Some(header) = overrides.header {
            self.header = header;
        }
        if let Some(model) = overrides.model {
            self.model = model;
        }
        if let Some(routine) = overrides.routine {
            self.routine = routine;
        }
        if let Some(tag) = overrides.tag {
            self.tag = tag;
        }
        if let Some(margin) = overrides.margin {
            self.margin = margin;
        }
        if let Some(check) = overrides.check {
            self.check = check;
        }
    }

    /// Loads a suite from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        debug!("Loaded {} bytes of test vectors from {}", json.len(), path.display());
        Self::from_json_str(&json)
    }

    /// Serializes the suite into the same JSON layout `from_json_str` reads
    pub fn to_json_string(&self) -> Result<String> {
        let columns = VectorColumns::from(self.vectors.as_slice());
        let file = SuiteFile {
            header: Some(self.header.clone()),
            model: Some(self.model.clone()),
            routine: Some(self.routine.clone()),
            tag: Some(self.tag.clone()),
            margin: Some(self.margin),
            check: Some(self.check),
            dates: columns.dates,
            heights: columns.heights,
            lats: columns.lats,
            lons: columns.lons,
            bns: columns.bns,
            bes: columns.bes,
            bds: columns.bds,
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Checks metadata and every vector
    ///
    /// Duplicate vectors are allowed but logged, since they usually mean a
    /// copy-paste slip in the source table.
    pub fn validate(&self) -> Result<()> {
        if self.vectors.is_empty() {
            return Err(TestgenError::InvalidSuite(
                "no test vectors to generate".to_string(),
            ));
        }

        let header_ok = matches!(
            self.header.extension().and_then(|e| e.to_str()),
            Some("h") | Some("hpp")
        );
        if !header_ok {
            return Err(TestgenError::InvalidSuite(format!(
                "header {} must end in .h or .hpp",
                self.header.display()
            )));
        }

        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(TestgenError::InvalidSuite(format!(
                "margin must be a non-negative number of nT, got {}",
                self.margin
            )));
        }

        if !is_c_identifier(&self.routine) {
            return Err(TestgenError::InvalidSuite(format!(
                "routine {:?} is not a C identifier",
                self.routine
            )));
        }

        for (name, value) in [("model", &self.model), ("tag", &self.tag)] {
            if !is_string_literal_safe(value) {
                return Err(TestgenError::InvalidSuite(format!(
                    "{} {:?} cannot contain quotes, backslashes or control characters",
                    name, value
                )));
            }
        }

        let mut seen = HashSet::new();
        for (index, vector) in self.vectors.iter().enumerate() {
            vector.validate(index)?;
            let key = [
                vector.date,
                vector.height_km,
                vector.lat_deg,
                vector.lon_deg,
                vector.north_nt,
                vector.east_nt,
                vector.down_nt,
            ]
            .map(f64::to_bits);
            if !seen.insert(key) {
                warn!("Test vector {} duplicates an earlier vector", index);
            }
        }

        Ok(())
    }

    /// Validates the suite and converts every vector into an [`EcefCase`]
    pub fn ecef_cases(&self) -> Result<Vec<EcefCase>> {
        self.validate()?;
        Ok(self
            .vectors
            .iter()
            .enumerate()
            .map(|(index, vector)| {
                let case = vector.to_ecef_case(index);
                debug!(
                    "Case {}: position {:?} m, field {:?} T",
                    index,
                    case.position_m.as_slice(),
                    case.field_t.as_slice()
                );
                case
            })
            .collect())
    }
}
