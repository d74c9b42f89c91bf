//! `YieldCurve` — an insertion-ordered sequence of `(maturity, rate)` points.
//!
//! Engines query the curve at a normalized time in `[0, 1]` (the fraction of
//! the option's life). Between two points the rate is interpolated linearly;
//! outside the observed range it is clamped to the nearest end point. An
//! empty curve is a valid value meaning "use the flat fallback rate", but
//! querying it is an error.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;
use vp_core::{
    errors::{Error, Result},
    Rate, Time,
};

/// A single point of the curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    /// Time coordinate of the point (normalized maturity fraction).
    pub maturity: Time,
    /// Rate observed at `maturity`.
    pub rate: Rate,
}

/// A piecewise-linear rate curve.
///
/// Points are kept in the order they were added; callers are expected to
/// add them in non-decreasing maturity order. Duplicates are not removed.
///
/// Serializes as a plain array of `{ maturity, rate }` tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YieldCurve {
    points: Vec<RatePoint>,
}

impl YieldCurve {
    /// An empty curve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point. No sorting or de-duplication takes place.
    pub fn add_rate_point(&mut self, maturity: Time, rate: Rate) {
        self.points.push(RatePoint { maturity, rate });
    }

    /// Builder form of [`add_rate_point`](Self::add_rate_point).
    pub fn with_rate_point(mut self, maturity: Time, rate: Rate) -> Self {
        self.add_rate_point(maturity, rate);
        self
    }

    /// Interpolated rate at `t`.
    ///
    /// # Errors
    /// [`Error::EmptyCurve`] if the curve has no points.
    pub fn rate(&self, t: Time) -> Result<Rate> {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return Err(Error::EmptyCurve),
        };
        if t <= first.maturity {
            return Ok(first.rate);
        }
        if t >= last.maturity {
            return Ok(last.rate);
        }
        for w in self.points.windows(2) {
            let (p0, p1) = (&w[0], &w[1]);
            if t < p1.maturity {
                let factor = (t - p0.maturity) / (p1.maturity - p0.maturity);
                return Ok(p0.rate + factor * (p1.rate - p0.rate));
            }
        }
        // unreachable for ordered curves; unordered input falls back to the tail
        Ok(last.rate)
    }

    /// Curve rate at `t`, or `flat` when the curve is empty.
    pub fn rate_or(&self, t: Time, flat: Rate) -> Rate {
        self.rate(t).unwrap_or(flat)
    }

    /// Read-only view of the points.
    pub fn data(&self) -> &[RatePoint] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` if the curve has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A copy of the curve with every rate moved by `bump`.
    pub fn shifted(&self, bump: Rate) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| RatePoint {
                    maturity: p.maturity,
                    rate: p.rate + bump,
                })
                .collect(),
        }
    }

    /// Append the points read from a whitespace-separated text file.
    ///
    /// Each non-blank line holds a maturity followed by a rate. Points are
    /// appended in file order after any already present.
    ///
    /// # Errors
    /// [`Error::Resource`] if the file cannot be opened or a line is malformed.
    /// On a malformed line the points read before it are kept.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = fs::File::open(path)
            .map_err(|e| Error::Resource(format!("cannot open {}: {e}", path.display())))?;
        let before = self.len();
        self.extend_from_reader(file)?;
        debug!(
            path = %path.display(),
            points = self.len() - before,
            "loaded yield curve points"
        );
        Ok(())
    }

    /// Parse a curve from any reader in the same format as
    /// [`load_from_file`](Self::load_from_file).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut curve = Self::new();
        curve.extend_from_reader(reader)?;
        Ok(curve)
    }

    fn extend_from_reader<R: Read>(&mut self, reader: R) -> Result<()> {
        for (idx, line) in BufReader::new(reader).lines().enumerate() {
            let line = line.map_err(|e| Error::Resource(format!("read error: {e}")))?;
            if line.trim().is_empty() {
                continue;
            }
            let (maturity, rate) = parse_line(&line).ok_or_else(|| {
                Error::Resource(format!("invalid format on line {}: {line:?}", idx + 1))
            })?;
            self.add_rate_point(maturity, rate);
        }
        Ok(())
    }
}

/// First two numeric fields of a line; trailing tokens are ignored.
fn parse_line(line: &str) -> Option<(Time, Rate)> {
    let mut it = line.split_whitespace();
    let maturity = it.next()?.parse().ok()?;
    let rate = it.next()?.parse().ok()?;
    Some((maturity, rate))
}

impl FromStr for YieldCurve {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_reader(s.as_bytes())
    }
}

impl FromIterator<(Time, Rate)> for YieldCurve {
    fn from_iter<I: IntoIterator<Item = (Time, Rate)>>(iter: I) -> Self {
        let mut curve = Self::new();
        for (m, r) in iter {
            curve.add_rate_point(m, r);
        }
        curve
    }
}
