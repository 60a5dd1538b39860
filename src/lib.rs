//! Persistence and visualization toolkit for polygon clipping test cases.
//!
//! Main features:
//!  - Line oriented fixture format for clipping test cases (read/write)
//!  - Diagram model with standard styles for subjects, clips and solutions
//!  - SVG rendering of diagrams and recovery of geometry from rendered files
//!  - Clipping engine interface with verification of stored expectations
//!
#![deny(warnings)]

mod color;
mod diagram;
mod engine;
mod fixture;
mod geometry;
mod svg;
mod utils;

pub use color::{Argb, ColorError, RgbHex};
pub use diagram::{Category, Diagram, PathGroup, TextLabel};
pub use engine::{
    CaseReport, ClipEngine, EndType, EngineError, JoinType, Solution, verify_case,
};
pub use fixture::{
    Cases, ClipType, FillRule, FixtureError, FixtureReader, TestCase, make_path, parse_numeric,
    parse_path, read_paths, save_fixture, write_fixture, write_paths,
};
pub use geometry::{
    Align, BBox, EPSILON, PI, Path64, PathD, Paths64, PathsD, Point, Point64, Scalar, Transform,
    area, paths_area, paths_to_f64, scalar_fmt,
};
pub use svg::{
    CoordsStyle, SvgConfig, SvgError, SvgWriter, load_svg, parse_path_data, read_svg,
};
pub use utils::{Rect64, Rnd, ellipse, random_offset, random_poly, rectangle};
