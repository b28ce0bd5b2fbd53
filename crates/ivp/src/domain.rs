//! Decision space: an ordered set of named, ranged, discretized variables.
//!
//! Purpose
//! - Every box, map, and solve is expressed in discrete indices into a `Domain`.
//!   The domain is the only place that knows how an index maps back to a value.
//!
//! Conventions
//! - Variable `i` has `points` grid values `low + delta * j` for `j in 0..points`,
//!   with `delta = (high - low) / (points - 1)` (zero when `points == 1`).
//! - A domain is immutable once handed to a map; maps share it via `Arc`.

use std::fmt;

/// Rounding used when a continuous value is mapped onto the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Snap {
    /// Largest grid index whose value is `<=` the given value.
    Down,
    /// Smallest grid index whose value is `>=` the given value.
    Up,
    /// Closest grid index; exact midpoints go to the lower index.
    Nearest,
}

/// One variable of a domain.
#[derive(Clone, Debug, PartialEq)]
pub struct DomainVar {
    pub name: String,
    pub low: f64,
    pub high: f64,
    pub points: u32,
    pub delta: f64,
}

/// Errors raised while assembling a domain.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    DuplicateVar { name: String },
    InvalidRange { name: String, reason: String },
}

impl DomainError {
    fn range(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateVar { name } => write!(f, "domain already has variable `{name}`"),
            Self::InvalidRange { name, reason } => {
                write!(f, "invalid range for variable `{name}`: {reason}")
            }
        }
    }
}

impl std::error::Error for DomainError {}

/// Ordered, named decision space.
///
/// Invariants:
/// - Names are unique.
/// - `points >= 1`, and `points == 1` only when `low == high`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Domain {
    vars: Vec<DomainVar>,
}

impl Domain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a variable; rejected if the name is taken or the range is malformed.
    pub fn add_var(
        &mut self,
        name: &str,
        low: f64,
        high: f64,
        points: u32,
    ) -> Result<(), DomainError> {
        if self.has_var(name) {
            return Err(DomainError::DuplicateVar {
                name: name.to_string(),
            });
        }
        if !(low.is_finite() && high.is_finite()) {
            return Err(DomainError::range(name, "bounds must be finite"));
        }
        if low > high {
            return Err(DomainError::range(name, "low > high"));
        }
        if points < 1 {
            return Err(DomainError::range(name, "need at least one point"));
        }
        if points == 1 && low != high {
            return Err(DomainError::range(name, "a single point requires low == high"));
        }
        let delta = if points > 1 {
            (high - low) / f64::from(points - 1)
        } else {
            0.0
        };
        self.vars.push(DomainVar {
            name: name.to_string(),
            low,
            high,
            points,
            delta,
        });
        Ok(())
    }

    /// Builder-style `add_var`.
    pub fn with_var(mut self, name: &str, low: f64, high: f64, points: u32) -> Result<Self, DomainError> {
        self.add_var(name, low, high, points)?;
        Ok(self)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.vars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.vars.iter().position(|v| v.name == name)
    }

    pub fn has_var(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    #[inline]
    pub fn var(&self, ix: usize) -> Option<&DomainVar> {
        self.vars.get(ix)
    }

    pub fn vars(&self) -> &[DomainVar] {
        &self.vars
    }

    pub fn var_name(&self, ix: usize) -> Option<&str> {
        self.vars.get(ix).map(|v| v.name.as_str())
    }

    /// Number of grid points of variable `ix`; zero for an unknown index.
    #[inline]
    pub fn point_count(&self, ix: usize) -> u32 {
        self.vars.get(ix).map_or(0, |v| v.points)
    }

    /// Product of all point counts (as `f64`; may exceed `u64` for wide domains).
    pub fn total_points(&self) -> f64 {
        self.vars.iter().map(|v| f64::from(v.points)).product()
    }

    /// Continuous value of grid index `j` of variable `ix`.
    pub fn value_at(&self, ix: usize, j: u32) -> Option<f64> {
        let v = self.vars.get(ix)?;
        if j >= v.points {
            return None;
        }
        Some(v.low + v.delta * f64::from(j))
    }

    /// Map a continuous value onto a grid index of variable `ix`.
    ///
    /// Values at or below `low` give 0, at or above `high` give `points - 1`.
    /// An unknown index gives 0.
    pub fn discretize(&self, ix: usize, value: f64, snap: Snap) -> u32 {
        let Some(v) = self.vars.get(ix) else {
            return 0;
        };
        if value <= v.low {
            return 0;
        }
        if value >= v.high {
            return v.points - 1;
        }
        let shifted = match snap {
            Snap::Down => return ((value - v.low) / v.delta) as u32,
            Snap::Up => value,
            Snap::Nearest => value - v.delta / 2.0,
        };
        let dval = (shifted - v.low) / v.delta;
        if dval <= 0.0 {
            return 0;
        }
        let ival = dval as u32;
        let j = if dval > f64::from(ival) { ival + 1 } else { ival };
        j.min(v.points - 1)
    }

    /// Grid value nearest to `value` under the given rounding.
    pub fn snapped_value(&self, ix: usize, value: f64, snap: Snap) -> Option<f64> {
        self.var(ix)?;
        self.value_at(ix, self.discretize(ix, value, snap))
    }

    /// Grid value one step below the snapped value. At the bottom, returns the
    /// given value, or `high` when `wrap` is set.
    pub fn next_lower_value(&self, ix: usize, value: f64, snap: Snap, wrap: bool) -> f64 {
        let Some(v) = self.vars.get(ix) else {
            return value;
        };
        match self.discretize(ix, value, snap) {
            0 if wrap => v.high,
            0 => value,
            j => self.value_at(ix, j - 1).unwrap_or(value),
        }
    }

    /// Grid value one step above the snapped value. At the top, returns the
    /// given value, or `low` when `wrap` is set.
    pub fn next_higher_value(&self, ix: usize, value: f64, snap: Snap, wrap: bool) -> f64 {
        let Some(v) = self.vars.get(ix) else {
            return value;
        };
        let j = self.discretize(ix, value, snap);
        if j + 1 >= v.points {
            return if wrap { v.low } else { value };
        }
        self.value_at(ix, j + 1).unwrap_or(value)
    }
}
