//! Line oriented text format used to persist clipping test cases
//!
//! ```text
//! CAPTION: 1. simple union
//! CLIPTYPE: UNION
//! FILLRULE: NONZERO
//! SOL_AREA: 9000
//! SOL_COUNT: 1
//! SUBJECTS
//! 0, 0, 100, 0, 100, 100
//! SUBJECTS_OPEN
//! 10, 10, 90, 90
//! CLIPS
//! 50, 50, 150, 50, 150, 150, 50, 150
//! ```
//!
//! Keywords are matched anywhere in a line, each path occupies exactly one line,
//! and a block of paths ends at the first line that does not contain a point.
use crate::{Path64, Paths64, Point64};
use std::{
    fmt,
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Seek, SeekFrom, Write},
    str::FromStr,
};

const CAPTION: &str = "CAPTION:";
const CLIPTYPE: &str = "CLIPTYPE";
const SOL_AREA: &str = "SOL_AREA";
const SOL_COUNT: &str = "SOL_COUNT";
const SUBJECTS: &str = "SUBJECTS";
const SUBJECTS_OPEN: &str = "SUBJECTS_OPEN";
const CLIPS: &str = "CLIPS";

/// Boolean set operation applied to subjects and clips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClipType {
    #[default]
    None,
    Intersection,
    Union,
    Difference,
    Xor,
}

impl ClipType {
    /// Keyword used by the fixture format
    pub fn token(self) -> &'static str {
        match self {
            ClipType::None => "NONE",
            ClipType::Intersection => "INTERSECTION",
            ClipType::Union => "UNION",
            ClipType::Difference => "DIFFERENCE",
            ClipType::Xor => "XOR",
        }
    }

    // `NONE` is only recognized on an explicit `CLIPTYPE` line
    fn find_in(line: &str) -> Option<Self> {
        [
            ClipType::Intersection,
            ClipType::Union,
            ClipType::Difference,
            ClipType::Xor,
        ]
        .into_iter()
        .find(|clip_type| line.contains(clip_type.token()))
        .or_else(|| {
            (line.contains(CLIPTYPE) && line.contains(ClipType::None.token()))
                .then_some(ClipType::None)
        })
    }
}

impl fmt::Display for ClipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ClipType {
    type Err = FixtureError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        let upper = text.to_ascii_uppercase();
        ClipType::find_in(&upper)
            .or_else(|| (upper == ClipType::None.token()).then_some(ClipType::None))
            .ok_or_else(|| FixtureError::InvalidKeyword(text.to_owned()))
    }
}

/// Rule used to determine polygon interior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillRule {
    #[default]
    EvenOdd,
    NonZero,
    Positive,
    Negative,
}

impl FillRule {
    /// Keyword used by the fixture format
    pub fn token(self) -> &'static str {
        match self {
            FillRule::EvenOdd => "EVENODD",
            FillRule::NonZero => "NONZERO",
            FillRule::Positive => "POSITIVE",
            FillRule::Negative => "NEGATIVE",
        }
    }

    fn find_in(line: &str) -> Option<Self> {
        [
            FillRule::EvenOdd,
            FillRule::NonZero,
            FillRule::Positive,
            FillRule::Negative,
        ]
        .into_iter()
        .find(|fill_rule| line.contains(fill_rule.token()))
    }
}

impl fmt::Display for FillRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for FillRule {
    type Err = FixtureError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        FillRule::find_in(&text.to_ascii_uppercase())
            .ok_or_else(|| FixtureError::InvalidKeyword(text.to_owned()))
    }
}

/// Single clipping test case
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TestCase {
    /// Caption text following `CAPTION:`
    pub caption: String,
    /// Number the caption starts with, if any
    pub ordinal: Option<i64>,
    pub clip_type: ClipType,
    pub fill_rule: FillRule,
    /// Expected area of the solution
    pub area: Option<i64>,
    /// Expected number of paths in the solution
    pub count: Option<i64>,
    pub subjects: Paths64,
    pub subjects_open: Paths64,
    pub clips: Paths64,
}

impl TestCase {
    /// Whether at least one input collection is not empty
    pub fn has_paths(&self) -> bool {
        !self.subjects.is_empty() || !self.subjects_open.is_empty() || !self.clips.is_empty()
    }

    /// Write complete test case in the fixture format
    pub fn save(&self, mut out: impl Write) -> io::Result<()> {
        writeln!(out, "{} {}", CAPTION, self.caption)?;
        writeln!(out, "{}: {}", CLIPTYPE, self.clip_type)?;
        writeln!(out, "FILLRULE: {}", self.fill_rule)?;
        if let Some(area) = self.area {
            writeln!(out, "{}: {}", SOL_AREA, area)?;
        }
        if let Some(count) = self.count {
            writeln!(out, "{}: {}", SOL_COUNT, count)?;
        }
        writeln!(out, "{}", SUBJECTS)?;
        write_paths(&mut out, &self.subjects)?;
        if !self.subjects_open.is_empty() {
            writeln!(out, "{}", SUBJECTS_OPEN)?;
            write_paths(&mut out, &self.subjects_open)?;
        }
        writeln!(out, "{}", CLIPS)?;
        write_paths(&mut out, &self.clips)?;
        Ok(())
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<serde_json::Value, FixtureError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Parse single integer starting at `cursor`
///
/// Leading spaces, an optional minus sign, and digits are consumed, followed by
/// trailing spaces and at most one comma. On success `cursor` is moved past all
/// consumed bytes, otherwise it is left untouched.
pub fn parse_numeric(line: &str, cursor: &mut usize) -> Option<i64> {
    let bytes = line.as_bytes();
    let mut pos = *cursor;
    while bytes.get(pos) == Some(&b' ') {
        pos += 1;
    }
    let negative = bytes.get(pos) == Some(&b'-');
    if negative {
        pos += 1;
    }
    let digits = pos;
    let mut value: i64 = 0;
    while let Some(byte @ b'0'..=b'9') = bytes.get(pos).copied() {
        value = value.wrapping_mul(10).wrapping_add((byte - b'0') as i64);
        pos += 1;
    }
    if pos == digits {
        return None;
    }
    while bytes.get(pos) == Some(&b' ') {
        pos += 1;
    }
    if bytes.get(pos) == Some(&b',') {
        pos += 1;
    }
    *cursor = pos;
    Some(if negative { value.wrapping_neg() } else { value })
}

/// Parse a line of `x, y, x, y, ...` pairs, `None` if the line contains no point
pub fn parse_path(line: &str) -> Option<Path64> {
    let mut cursor = 0;
    let mut path = Path64::new();
    while let Some(x) = parse_numeric(line, &mut cursor) {
        let Some(y) = parse_numeric(line, &mut cursor) else {
            break;
        };
        path.push(Point64::new(x, y));
    }
    if path.is_empty() { None } else { Some(path) }
}

/// Path from its textual representation, empty if `text` contains no point
pub fn make_path(text: &str) -> Path64 {
    parse_path(text).unwrap_or_default()
}

/// Read consecutive path lines from `input` and append them to `paths`
///
/// Reading stops at the end of input or at the first line that is not a path,
/// in which case `input` is positioned at the start of that line. Returns number
/// of appended paths.
pub fn read_paths<R: BufRead + Seek>(input: &mut R, paths: &mut Paths64) -> io::Result<usize> {
    let mut source = LineSource::new(input)?;
    let count = paths.len();
    if let Some(line) = source.read_paths(paths)? {
        source.seek(line.start)?;
    }
    Ok(paths.len() - count)
}

/// Write one path per line, empty paths are skipped
pub fn write_paths(out: &mut impl Write, paths: &[Path64]) -> io::Result<()> {
    for path in paths.iter() {
        let Some((last, init)) = path.split_last() else {
            continue;
        };
        for point in init {
            write!(out, "{}, ", point)?;
        }
        writeln!(out, "{}", last)?;
    }
    Ok(())
}

/// Write clipping operation with its subjects and clips
pub fn write_fixture(
    mut out: impl Write,
    clip_type: ClipType,
    fill_rule: FillRule,
    subjects: &[Path64],
    clips: &[Path64],
) -> io::Result<()> {
    writeln!(out, "{} {} {}", CAPTION, clip_type, fill_rule)?;
    writeln!(out, "{}: {}", CLIPTYPE, clip_type)?;
    writeln!(out, "FILLRULE: {}", fill_rule)?;
    writeln!(out, "{}", SUBJECTS)?;
    write_paths(&mut out, subjects)?;
    writeln!(out, "{}", CLIPS)?;
    write_paths(&mut out, clips)?;
    Ok(())
}

/// Same as [`write_fixture`] but creates (or truncates) file at `path`
pub fn save_fixture(
    path: impl AsRef<std::path::Path>,
    clip_type: ClipType,
    fill_rule: FillRule,
    subjects: &[Path64],
    clips: &[Path64],
) -> Result<(), FixtureError> {
    let mut out = BufWriter::new(File::create(path.as_ref())?);
    write_fixture(&mut out, clip_type, fill_rule, subjects, clips)?;
    out.flush()?;
    tracing::debug!(path = ?path.as_ref(), "[fixture:save]");
    Ok(())
}

#[derive(Debug)]
struct Line {
    // offset of the first byte of the line
    start: u64,
    // line content without line terminator
    text: String,
}

/// Line reader that tracks offset of every line it produces
struct LineSource<R> {
    input: R,
    offset: u64,
    buffer: Vec<u8>,
}

impl<R: BufRead + Seek> LineSource<R> {
    fn new(mut input: R) -> io::Result<Self> {
        let offset = input.stream_position()?;
        Ok(Self {
            input,
            offset,
            buffer: Vec::new(),
        })
    }

    fn next_line(&mut self) -> io::Result<Option<Line>> {
        self.buffer.clear();
        let size = self.input.read_until(b'\n', &mut self.buffer)?;
        if size == 0 {
            return Ok(None);
        }
        let start = self.offset;
        self.offset += size as u64;
        let mut text = String::from_utf8_lossy(&self.buffer).into_owned();
        while text.ends_with(['\n', '\r']) {
            text.pop();
        }
        Ok(Some(Line { start, text }))
    }

    fn seek(&mut self, offset: u64) -> io::Result<()> {
        self.offset = self.input.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    // append paths until the first non path line, which is returned
    fn read_paths(&mut self, paths: &mut Paths64) -> io::Result<Option<Line>> {
        while let Some(line) = self.next_line()? {
            match parse_path(&line.text) {
                Some(path) => paths.push(path),
                None => return Ok(Some(line)),
            }
        }
        Ok(None)
    }
}

/// Classification of a line inside of a test case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Caption,
    ClipType(ClipType),
    FillRule(FillRule),
    Area(Option<i64>),
    Count(Option<i64>),
    SubjectsOpen,
    Subjects,
    Clips,
    Other,
}

impl Section {
    fn classify(line: &str) -> Self {
        if line.contains(CAPTION) {
            Section::Caption
        } else if let Some(clip_type) = ClipType::find_in(line) {
            Section::ClipType(clip_type)
        } else if let Some(fill_rule) = FillRule::find_in(line) {
            Section::FillRule(fill_rule)
        } else if let Some(area) = keyword_value(line, SOL_AREA) {
            Section::Area(area)
        } else if let Some(count) = keyword_value(line, SOL_COUNT) {
            Section::Count(count)
        } else if line.contains(SUBJECTS_OPEN) {
            Section::SubjectsOpen
        } else if line.contains(SUBJECTS) {
            Section::Subjects
        } else if line.contains(CLIPS) {
            Section::Clips
        } else {
            Section::Other
        }
    }
}

// `None` if keyword is absent, `Some(None)` if its value is malformed
fn keyword_value(line: &str, keyword: &str) -> Option<Option<i64>> {
    let index = line.find(keyword)?;
    let mut cursor = index + keyword.len();
    if line.as_bytes().get(cursor) == Some(&b':') {
        cursor += 1;
    }
    Some(parse_numeric(line, &mut cursor))
}

/// Outcome of a single scan over the source
enum Scan {
    Found(TestCase),
    // case was located but contains no paths
    Empty,
    NotFound,
}

/// Reader of test cases from a seekable fixture source
///
/// After each lookup the source is positioned exactly at the start of the next
/// caption line (or at its end), so ascending lookups never rescan cases that
/// were already passed. Captions are expected to be in ascending order of their
/// ordinals.
pub struct FixtureReader<R> {
    source: LineSource<R>,
}

impl FixtureReader<BufReader<File>> {
    /// Open fixture file
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, FixtureError> {
        let file = File::open(path.as_ref())?;
        Self::new(BufReader::new(file))
    }
}

impl<R: BufRead + Seek> FixtureReader<R> {
    pub fn new(input: R) -> Result<Self, FixtureError> {
        Ok(Self {
            source: LineSource::new(input)?,
        })
    }

    /// Current offset in the underlying source
    pub fn position(&self) -> u64 {
        self.source.offset
    }

    /// Move back to the start of the source
    pub fn rewind(&mut self) -> Result<(), FixtureError> {
        self.source.seek(0)?;
        Ok(())
    }

    pub fn into_inner(self) -> R {
        self.source.input
    }

    /// Find test case with the given `ordinal`, or the next one if `ordinal <= 0`
    ///
    /// Returns `None` if no such case exists, if a caption with a greater ordinal is
    /// met first, or if the located case has no paths.
    pub fn read_case(&mut self, ordinal: i64) -> Result<Option<TestCase>, FixtureError> {
        match self.scan(ordinal)? {
            Scan::Found(case) => Ok(Some(case)),
            Scan::Empty | Scan::NotFound => Ok(None),
        }
    }

    /// Read the next test case
    pub fn next_case(&mut self) -> Result<Option<TestCase>, FixtureError> {
        self.read_case(0)
    }

    /// Iterate over all remaining test cases, cases without paths are skipped
    pub fn cases(&mut self) -> Cases<'_, R> {
        Cases { reader: self }
    }

    fn scan(&mut self, ordinal: i64) -> Result<Scan, FixtureError> {
        // searching for the caption
        let (caption, number) = loop {
            let Some(line) = self.source.next_line()? else {
                return Ok(Scan::NotFound);
            };
            let Some(index) = line.text.find(CAPTION) else {
                continue;
            };
            let mut cursor = index + CAPTION.len();
            let number = parse_numeric(&line.text, &mut cursor);
            // caption without a number matches any ordinal
            if let (true, Some(number)) = (ordinal > 0, number) {
                if number > ordinal {
                    self.source.seek(line.start)?;
                    tracing::debug!(ordinal, number, "[fixture:not-found]");
                    return Ok(Scan::NotFound);
                }
                if number != ordinal {
                    continue;
                }
            }
            let caption = line.text[index + CAPTION.len()..].trim().to_owned();
            break (caption, number);
        };

        let mut case = TestCase {
            caption,
            ordinal: number,
            ..TestCase::default()
        };
        // non path line that terminated the last block of paths
        let mut pending: Option<Line> = None;
        loop {
            let line = match pending.take() {
                Some(line) => line,
                None => match self.source.next_line()? {
                    Some(line) => line,
                    None => break,
                },
            };
            let section = Section::classify(&line.text);
            tracing::trace!(?section, line = %line.text, "[fixture:line]");
            match section {
                Section::Caption => {
                    self.source.seek(line.start)?;
                    break;
                }
                Section::ClipType(clip_type) => case.clip_type = clip_type,
                Section::FillRule(fill_rule) => case.fill_rule = fill_rule,
                Section::Area(area) => case.area = area,
                Section::Count(count) => case.count = count,
                Section::SubjectsOpen => {
                    pending = self.source.read_paths(&mut case.subjects_open)?;
                }
                Section::Subjects => pending = self.source.read_paths(&mut case.subjects)?,
                Section::Clips => pending = self.source.read_paths(&mut case.clips)?,
                Section::Other => {}
            }
        }

        tracing::debug!(
            caption = %case.caption,
            subjects = case.subjects.len(),
            subjects_open = case.subjects_open.len(),
            clips = case.clips.len(),
            "[fixture:case]"
        );
        if case.has_paths() {
            Ok(Scan::Found(case))
        } else {
            Ok(Scan::Empty)
        }
    }
}

/// Iterator over consecutive test cases of a [`FixtureReader`]
pub struct Cases<'a, R> {
    reader: &'a mut FixtureReader<R>,
}

impl<R: BufRead + Seek> Iterator for Cases<'_, R> {
    type Item = Result<TestCase, FixtureError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.reader.scan(0) {
                Ok(Scan::Found(case)) => return Some(Ok(case)),
                Ok(Scan::Empty) => continue,
                Ok(Scan::NotFound) => return None,
                Err(error) => return Some(Err(error)),
            }
        }
    }
}

/// Error while reading or writing fixtures
#[derive(Debug)]
pub enum FixtureError {
    /// Unrecognized clip type or fill rule keyword
    InvalidKeyword(String),
    /// JSON error
    #[cfg(feature = "serde")]
    Json(serde_json::Error),
    /// IO error propagated from the underlying stream
    IoError(io::Error),
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixtureError::{:?}", self)
    }
}

impl From<io::Error> for FixtureError {
    fn from(error: io::Error) -> Self {
        Self::IoError(error)
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for FixtureError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error)
    }
}

impl From<FixtureError> for io::Error {
    fn from(error: FixtureError) -> Self {
        match error {
            FixtureError::IoError(error) => error,
            _ => Self::new(io::ErrorKind::InvalidData, error),
        }
    }
}

impl std::error::Error for FixtureError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn square(x: i64, y: i64, size: i64) -> Path64 {
        vec![
            Point64::new(x, y),
            Point64::new(x + size, y),
            Point64::new(x + size, y + size),
            Point64::new(x, y + size),
        ]
    }

    const TESTS: &str = "\
CAPTION: 1. first
CLIPTYPE: INTERSECTION
FILLRULE: EVENODD
SOL_AREA: 2500
SOL_COUNT: 1
SUBJECTS
0, 0, 100, 0, 100, 100, 0, 100
CLIPS
50, 50, 150, 50, 150, 150, 50, 150
CAPTION: 2. second
CLIPTYPE: UNION
FILLRULE: NONZERO
SUBJECTS
0, 0, 10, 0, 10, 10
20, 20, 30, 20, 30, 30
SUBJECTS_OPEN
-5, -5, 5, 5
CLIPS
1, 1, 2, 1, 2, 2
CAPTION: 3. third
CLIPTYPE: XOR
FILLRULE: NEGATIVE
SUBJECTS
7, 7, 8, 8, 9, 7
";

    fn caption_offset(text: &str, caption: &str) -> u64 {
        text.find(caption).unwrap() as u64
    }

    #[test]
    fn test_parse_numeric() {
        let line = " -42, ";
        let mut cursor = 0;
        assert_eq!(parse_numeric(line, &mut cursor), Some(-42));
        assert_eq!(cursor, 5);

        let mut cursor = 0;
        assert_eq!(parse_numeric("", &mut cursor), None);
        assert_eq!(cursor, 0);

        let mut cursor = 0;
        assert_eq!(parse_numeric("abc", &mut cursor), None);
        assert_eq!(cursor, 0);

        let mut cursor = 0;
        assert_eq!(parse_numeric("-x", &mut cursor), None);
        assert_eq!(cursor, 0);

        let line = "12 ,34,  -5";
        let mut cursor = 0;
        assert_eq!(parse_numeric(line, &mut cursor), Some(12));
        assert_eq!(cursor, 4);
        assert_eq!(parse_numeric(line, &mut cursor), Some(34));
        assert_eq!(parse_numeric(line, &mut cursor), Some(-5));
        assert_eq!(cursor, line.len());
        assert_eq!(parse_numeric(line, &mut cursor), None);
    }

    #[test]
    fn test_parse_path() {
        assert_eq!(
            parse_path("0, 0, 100, 200, 200, 0 "),
            Some(vec![
                Point64::new(0, 0),
                Point64::new(100, 200),
                Point64::new(200, 0)
            ])
        );
        // dangling coordinate is ignored
        assert_eq!(parse_path("1,2,3"), Some(vec![Point64::new(1, 2)]));
        assert_eq!(parse_path("5"), None);
        assert_eq!(parse_path(""), None);
        assert_eq!(parse_path("SUBJECTS"), None);
        assert!(make_path("CLIPS").is_empty());
    }

    #[test]
    fn test_read_paths() -> io::Result<()> {
        let text = "1, 2, 3, 4\n5, 6\nCLIPS\n7, 8\n";
        let mut input = Cursor::new(text);
        let mut paths = vec![square(0, 0, 1)];
        assert_eq!(read_paths(&mut input, &mut paths)?, 2);
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[2], vec![Point64::new(5, 6)]);
        assert_eq!(input.position(), caption_offset(text, "CLIPS"));

        // keyword line is not consumed, reading again yields nothing
        assert_eq!(read_paths(&mut input, &mut paths)?, 0);
        assert_eq!(input.position(), caption_offset(text, "CLIPS"));

        let mut input = Cursor::new("1, 2\n3, 4");
        let mut paths = Vec::new();
        assert_eq!(read_paths(&mut input, &mut paths)?, 2);
        Ok(())
    }

    #[test]
    fn test_read_case_sequential() -> Result<(), FixtureError> {
        let mut reader = FixtureReader::new(Cursor::new(TESTS))?;

        let case = reader.read_case(2)?.unwrap();
        assert_eq!(case.caption, "2. second");
        assert_eq!(case.ordinal, Some(2));
        assert_eq!(case.clip_type, ClipType::Union);
        assert_eq!(case.fill_rule, FillRule::NonZero);
        assert_eq!(case.area, None);
        assert_eq!(case.count, None);
        assert_eq!(case.subjects.len(), 2);
        assert_eq!(
            case.subjects_open,
            vec![vec![Point64::new(-5, -5), Point64::new(5, 5)]]
        );
        assert_eq!(case.clips.len(), 1);
        assert_eq!(reader.position(), caption_offset(TESTS, "CAPTION: 3"));

        let case = reader.read_case(3)?.unwrap();
        assert_eq!(case.clip_type, ClipType::Xor);
        assert_eq!(case.fill_rule, FillRule::Negative);
        assert_eq!(case.subjects.len(), 1);
        assert_eq!(reader.position(), TESTS.len() as u64);

        assert!(reader.read_case(4)?.is_none());

        reader.rewind()?;
        let case = reader.read_case(1)?.unwrap();
        assert_eq!(case.clip_type, ClipType::Intersection);
        assert_eq!(case.fill_rule, FillRule::EvenOdd);
        assert_eq!(case.area, Some(2500));
        assert_eq!(case.count, Some(1));
        assert_eq!(case.subjects, vec![square(0, 0, 100)]);
        assert_eq!(case.clips, vec![square(50, 50, 100)]);
        assert_eq!(reader.position(), caption_offset(TESTS, "CAPTION: 2"));
        Ok(())
    }

    #[test]
    fn test_read_case_early_exit() -> Result<(), FixtureError> {
        let text = "CAPTION: 5.\nSUBJECTS\n1, 1, 2, 2\nCAPTION: 6.\nCLIPS\n3, 3, 4, 4\n";
        let mut reader = FixtureReader::new(Cursor::new(text))?;
        assert!(reader.read_case(2)?.is_none());
        // stopped at the first caption, without consuming the rest
        assert_eq!(reader.position(), 0);

        let case = reader.read_case(6)?.unwrap();
        assert_eq!(case.ordinal, Some(6));
        assert_eq!(case.clips, vec![vec![Point64::new(3, 3), Point64::new(4, 4)]]);
        Ok(())
    }

    #[test]
    fn test_read_case_any() -> Result<(), FixtureError> {
        let mut reader = FixtureReader::new(Cursor::new(TESTS))?;
        let ordinals: Vec<_> = reader
            .cases()
            .map(|case| case.map(|case| case.ordinal))
            .collect::<Result<_, _>>()?;
        assert_eq!(ordinals, vec![Some(1), Some(2), Some(3)]);
        assert!(reader.next_case()?.is_none());
        Ok(())
    }

    #[test]
    fn test_block_terminated_by_caption() -> Result<(), FixtureError> {
        let text = "CAPTION: 1\r\nSUBJECTS\r\n0, 0, 5, 5\r\nCAPTION: 2\r\nCLIPS\r\n1, 1, 2, 2\r\n";
        let mut reader = FixtureReader::new(Cursor::new(text))?;
        let case = reader.next_case()?.unwrap();
        assert_eq!(case.subjects.len(), 1);
        assert!(case.clips.is_empty());
        assert_eq!(reader.position(), caption_offset(text, "CAPTION: 2"));

        let case = reader.next_case()?.unwrap();
        assert_eq!(case.ordinal, Some(2));
        assert_eq!(case.clips.len(), 1);
        Ok(())
    }

    #[test]
    fn test_keyword_after_block() -> Result<(), FixtureError> {
        let text = "\
CAPTION: 1
SUBJECTS
0, 0, 10, 0, 10, 10
FILLRULE: NONZERO
SOL_AREA: 5
CLIPS
1, 1, 2, 1, 2, 2
SOL_COUNT: 3
";
        let case = FixtureReader::new(Cursor::new(text))?.next_case()?.unwrap();
        assert_eq!(case.fill_rule, FillRule::NonZero);
        assert_eq!(case.area, Some(5));
        assert_eq!(case.count, Some(3));
        assert_eq!(case.subjects, vec![make_path("0, 0, 10, 0, 10, 10")]);
        assert_eq!(case.clips, vec![make_path("1, 1, 2, 1, 2, 2")]);
        Ok(())
    }

    #[test]
    fn test_sections_any_order() -> Result<(), FixtureError> {
        let text = "\
CAPTION: 4. reordered
CLIPS
5, 5, 6, 5, 6, 6
SOL_COUNT: 2
SUBJECTS_OPEN
0, 0, 9, 9
FILLRULE: POSITIVE
SUBJECTS
0, 0, 3, 0, 3, 3
CLIPTYPE: DIFFERENCE
SOL_AREA: 7
";
        let case = FixtureReader::new(Cursor::new(text))?.read_case(4)?.unwrap();
        assert_eq!(case.clip_type, ClipType::Difference);
        assert_eq!(case.fill_rule, FillRule::Positive);
        assert_eq!(case.area, Some(7));
        assert_eq!(case.count, Some(2));
        assert_eq!(case.subjects.len(), 1);
        assert_eq!(case.subjects_open, vec![make_path("0, 0, 9, 9")]);
        assert_eq!(case.clips.len(), 1);
        Ok(())
    }

    #[test]
    fn test_none_requires_cliptype_line() -> Result<(), FixtureError> {
        let text = "\
CAPTION: 1
CLIPTYPE: INTERSECTION
NOTE: NONE of these lines change the operation
SUBJECTS
0, 0, 1, 0, 1, 1
CAPTION: 2
CLIPTYPE: NONE
SUBJECTS
0, 0, 1, 0, 1, 1
";
        let mut reader = FixtureReader::new(Cursor::new(text))?;
        let case = reader.next_case()?.unwrap();
        assert_eq!(case.clip_type, ClipType::Intersection);
        let case = reader.next_case()?.unwrap();
        assert_eq!(case.clip_type, ClipType::None);
        assert_eq!(Section::classify("NOTE: NONE"), Section::Other);
        Ok(())
    }

    #[test]
    fn test_empty_and_malformed_cases() -> Result<(), FixtureError> {
        let text = "\
CAPTION: 1. no paths
CLIPTYPE: UNION
CAPTION: 2. malformed values
SOL_AREA: abc
SOL_COUNT: 0
SUBJECTS

CLIPS
0, 0, 3, 0, 0, 3
";
        let mut reader = FixtureReader::new(Cursor::new(text))?;
        assert!(reader.read_case(1)?.is_none());
        assert_eq!(reader.position(), caption_offset(text, "CAPTION: 2"));

        let case = reader.read_case(2)?.unwrap();
        assert_eq!(case.area, None);
        assert_eq!(case.count, Some(0));
        assert!(case.subjects.is_empty());
        assert_eq!(case.clips.len(), 1);
        // clip type is not inherited from the previous case
        assert_eq!(case.clip_type, ClipType::None);

        reader.rewind()?;
        let cases = reader.cases().collect::<Result<Vec<_>, _>>()?;
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].ordinal, Some(2));
        Ok(())
    }

    #[test]
    fn test_write_fixture() -> Result<(), FixtureError> {
        let subjects = vec![square(0, 0, 10), Vec::new()];
        let clips = vec![vec![Point64::new(-1, 2), Point64::new(3, -4)]];
        let mut output = Vec::new();
        write_fixture(
            &mut output,
            ClipType::Difference,
            FillRule::Positive,
            &subjects,
            &clips,
        )?;
        let text = String::from_utf8_lossy(&output);
        assert_eq!(
            text,
            "CAPTION: DIFFERENCE POSITIVE\n\
             CLIPTYPE: DIFFERENCE\n\
             FILLRULE: POSITIVE\n\
             SUBJECTS\n\
             0, 0, 10, 0, 10, 10, 0, 10\n\
             CLIPS\n\
             -1, 2, 3, -4\n"
        );

        let case = FixtureReader::new(Cursor::new(output))?
            .read_case(7)?
            .unwrap();
        assert_eq!(case.clip_type, ClipType::Difference);
        assert_eq!(case.fill_rule, FillRule::Positive);
        assert_eq!(case.subjects, vec![square(0, 0, 10)]);
        assert_eq!(case.clips, clips);
        Ok(())
    }

    #[test]
    fn test_save_load_case() -> Result<(), FixtureError> {
        let mut reader = FixtureReader::new(Cursor::new(TESTS))?;
        let cases = reader.cases().collect::<Result<Vec<_>, _>>()?;
        let mut output = Vec::new();
        for case in cases.iter() {
            case.save(&mut output)?;
        }
        let mut reader = FixtureReader::new(Cursor::new(output))?;
        let loaded = reader.cases().collect::<Result<Vec<_>, _>>()?;
        assert_eq!(cases, loaded);
        Ok(())
    }

    #[test]
    fn test_save_fixture_file() -> Result<(), FixtureError> {
        let path = std::env::temp_dir().join(format!("clipkit-fixture-{}.txt", std::process::id()));
        let subjects = vec![square(10, 10, 20)];
        save_fixture(&path, ClipType::Union, FillRule::NonZero, &subjects, &[])?;
        let case = FixtureReader::open(&path)?.next_case()?;
        std::fs::remove_file(&path)?;
        let case = case.unwrap();
        assert_eq!(case.caption, "UNION NONZERO");
        assert_eq!(case.subjects, subjects);
        assert!(FixtureReader::open(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_keywords() -> Result<(), FixtureError> {
        assert_eq!("xor".parse::<ClipType>()?, ClipType::Xor);
        assert_eq!(" NONE ".parse::<ClipType>()?, ClipType::None);
        assert_eq!("nonzero".parse::<FillRule>()?, FillRule::NonZero);
        assert!("bogus".parse::<FillRule>().is_err());
        assert_eq!(Section::classify("FILLRULE: NONZERO"), Section::FillRule(FillRule::NonZero));
        assert_eq!(Section::classify("SUBJECTS_OPEN"), Section::SubjectsOpen);
        assert_eq!(Section::classify("SOL_AREA: -12"), Section::Area(Some(-12)));
        assert_eq!(Section::classify("1, 2, 3, 4"), Section::Other);
        Ok(())
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_case_json() -> Result<(), FixtureError> {
        let case = FixtureReader::new(Cursor::new(TESTS))?.next_case()?.unwrap();
        let json = case.to_json()?;
        assert_eq!(json["clip_type"], "Intersection");
        assert_eq!(json["area"], 2500);
        assert_eq!(json["subjects"][0][1]["x"], 100);
        Ok(())
    }
}
