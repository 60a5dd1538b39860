//! Interface of the polygon clipping engine and verification of fixture cases against it
use crate::{ClipType, FillRule, Path64, Paths64, Point64, Scalar, TestCase, paths_area};
use std::{fmt, io};

/// Corner style used when offsetting paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JoinType {
    #[default]
    Square,
    Bevel,
    Round,
    Miter,
}

/// How ends of offset paths are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EndType {
    /// Paths are closed polygons
    #[default]
    Polygon,
    /// Open paths are joined end to end and offset as polygons
    Joined,
    Butt,
    Square,
    Round,
}

/// Closed and open paths produced by a clipping operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    pub closed: Paths64,
    pub open: Paths64,
}

impl Solution {
    /// Absolute value of the summed signed area of closed paths
    pub fn area(&self) -> Scalar {
        paths_area(&self.closed).abs()
    }

    /// Number of closed and open paths
    pub fn count(&self) -> usize {
        self.closed.len() + self.open.len()
    }
}

/// Polygon clipping engine
///
/// Only [`ClipEngine::execute`], [`ClipEngine::inflate_paths`] and
/// [`ClipEngine::minkowski_sum`] need to be implemented, batch boolean
/// operations are derived from `execute`.
pub trait ClipEngine {
    /// Clip closed and open subjects by closed clips
    fn execute(
        &self,
        clip_type: ClipType,
        fill_rule: FillRule,
        subjects: &[Path64],
        subjects_open: &[Path64],
        clips: &[Path64],
    ) -> Result<Solution, EngineError>;

    /// Grow (positive `delta`) or shrink (negative `delta`) paths
    fn inflate_paths(
        &self,
        paths: &[Path64],
        delta: Scalar,
        join_type: JoinType,
        end_type: EndType,
        miter_limit: Scalar,
    ) -> Result<Paths64, EngineError>;

    /// Minkowski sum of `pattern` swept along `path`
    fn minkowski_sum(
        &self,
        pattern: &[Point64],
        path: &[Point64],
        is_closed: bool,
    ) -> Result<Paths64, EngineError>;

    /// Boolean operation over closed paths
    fn boolean_op(
        &self,
        clip_type: ClipType,
        fill_rule: FillRule,
        subjects: &[Path64],
        clips: &[Path64],
    ) -> Result<Paths64, EngineError> {
        Ok(self
            .execute(clip_type, fill_rule, subjects, &[], clips)?
            .closed)
    }

    fn intersect(
        &self,
        subjects: &[Path64],
        clips: &[Path64],
        fill_rule: FillRule,
    ) -> Result<Paths64, EngineError> {
        self.boolean_op(ClipType::Intersection, fill_rule, subjects, clips)
    }

    fn union(
        &self,
        subjects: &[Path64],
        clips: &[Path64],
        fill_rule: FillRule,
    ) -> Result<Paths64, EngineError> {
        self.boolean_op(ClipType::Union, fill_rule, subjects, clips)
    }

    fn difference(
        &self,
        subjects: &[Path64],
        clips: &[Path64],
        fill_rule: FillRule,
    ) -> Result<Paths64, EngineError> {
        self.boolean_op(ClipType::Difference, fill_rule, subjects, clips)
    }

    fn xor(
        &self,
        subjects: &[Path64],
        clips: &[Path64],
        fill_rule: FillRule,
    ) -> Result<Paths64, EngineError> {
        self.boolean_op(ClipType::Xor, fill_rule, subjects, clips)
    }
}

/// Allowed absolute difference between stored and measured values
const ABS_TOLERANCE: i64 = 2;
/// Allowed difference relative to the stored value
const REL_TOLERANCE: Scalar = 0.02;

/// Outcome of running a fixture case through an engine
#[derive(Debug, Clone, PartialEq)]
pub struct CaseReport {
    pub ordinal: Option<i64>,
    pub solution: Solution,
    /// Measured area of the closed solution
    pub area: i64,
    /// Measured number of closed solution paths, open paths are not counted
    pub count: i64,
    pub area_mismatch: bool,
    pub count_mismatch: bool,
}

impl CaseReport {
    /// Measured values agree with stored ones (absent stored values always agree)
    pub fn is_ok(&self) -> bool {
        !self.area_mismatch && !self.count_mismatch
    }
}

// both absolute and relative differences must exceed the tolerance
fn is_mismatch(stored: Option<i64>, measured: i64) -> bool {
    let Some(stored) = stored else {
        return false;
    };
    let diff = stored.abs_diff(measured);
    if diff <= ABS_TOLERANCE as u64 {
        return false;
    }
    let ratio = diff as Scalar / (stored.unsigned_abs().max(1) as Scalar);
    ratio > REL_TOLERANCE
}

/// Execute test case and compare the solution with stored area and count
pub fn verify_case(
    engine: &impl ClipEngine,
    case: &TestCase,
) -> Result<CaseReport, EngineError> {
    let solution = engine.execute(
        case.clip_type,
        case.fill_rule,
        &case.subjects,
        &case.subjects_open,
        &case.clips,
    )?;
    let area = solution.area().round() as i64;
    let count = solution.closed.len() as i64;
    let report = CaseReport {
        ordinal: case.ordinal,
        area_mismatch: is_mismatch(case.area, area),
        count_mismatch: is_mismatch(case.count, count),
        solution,
        area,
        count,
    };
    tracing::debug!(
        ordinal = ?case.ordinal,
        area,
        count,
        stored_area = ?case.area,
        stored_count = ?case.count,
        ok = report.is_ok(),
        "[engine:verify]"
    );
    Ok(report)
}

/// Error reported by an engine implementation
#[derive(Debug, Clone)]
pub enum EngineError {
    /// Operation is not provided by the engine
    Unsupported(&'static str),
    /// Engine failed to produce a result
    Failed(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EngineError::{:?}", self)
    }
}

impl From<EngineError> for io::Error {
    fn from(error: EngineError) -> Self {
        Self::other(error)
    }
}

impl std::error::Error for EngineError {}
