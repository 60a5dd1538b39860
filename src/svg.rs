//! SVG rendering of diagrams and recovery of path geometry from rendered files
//!
//! Only the subset emitted by [`SvgWriter`] is understood by [`read_svg`]: `<path>`
//! elements whose `d` attribute is built from `M`, `L`, `H`, `V` and `Z` commands.
use crate::{
    Align, Argb, BBox, Diagram, FillRule, PathD, PathGroup, PathsD, Point, Scalar, TextLabel,
    Transform, scalar_fmt,
};
use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, Read, Write},
    str::FromStr,
};

/// Font used for per vertex coordinate labels
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CoordsStyle {
    pub font_name: String,
    pub font_color: Argb,
    pub font_size: u32,
}

impl Default for CoordsStyle {
    fn default() -> Self {
        Self {
            font_name: "Verdana".to_owned(),
            font_color: Argb::BLACK,
            font_size: 11,
        }
    }
}

/// Output canvas and styling shared by all diagrams rendered with a writer
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SvgConfig {
    /// Canvas width
    pub width: u32,
    /// Canvas height
    pub height: u32,
    /// Space left empty on each side of the canvas
    pub margin: u32,
    /// Number of fractional digits in emitted coordinates
    pub precision: usize,
    /// Fill rule of closed paths
    pub fill_rule: FillRule,
    pub coords_style: CoordsStyle,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            margin: 80,
            precision: 2,
            fill_rule: FillRule::EvenOdd,
            coords_style: CoordsStyle::default(),
        }
    }
}

impl SvgConfig {
    #[cfg(feature = "serde")]
    pub fn from_json(text: &str) -> Result<Self, SvgError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Same as [`SvgConfig::from_json`] but top level fields missing in `text`
    /// are taken from `self`
    #[cfg(feature = "serde")]
    pub fn update_from_json(&self, text: &str) -> Result<Self, SvgError> {
        let serde_json::Value::Object(update) = serde_json::from_str(text)? else {
            return Self::from_json(text);
        };
        let mut config = serde_json::to_value(self)?;
        if let Some(config) = config.as_object_mut() {
            config.extend(update);
        }
        Ok(serde_json::from_value(config)?)
    }
}

/// Renders [`Diagram`]s scaled to fit the configured canvas
#[derive(Debug, Clone, Default)]
pub struct SvgWriter {
    config: SvgConfig,
}

impl SvgWriter {
    pub fn new(config: SvgConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SvgConfig {
        &self.config
    }

    /// Uniform scale and translation placing diagram geometry in the center
    /// of the canvas inset by the margin
    pub fn fit_transform(&self, diagram: &Diagram) -> Result<Transform, SvgError> {
        let src = match diagram.bbox() {
            Some(bbox) if !bbox.is_degenerate() => bbox,
            _ => return Err(SvgError::EmptyGeometry),
        };
        let SvgConfig {
            width,
            height,
            margin,
            ..
        } = self.config;
        let margin = margin as Scalar;
        let dst = BBox::new(
            (margin, margin),
            (width as Scalar - margin, height as Scalar - margin),
        );
        if width as Scalar <= 2.0 * margin || height as Scalar <= 2.0 * margin {
            return Err(SvgError::InvalidCanvas);
        }
        Ok(Transform::fit(src, dst, Align::Mid))
    }

    /// Render diagram into `out`
    pub fn write(&self, diagram: &Diagram, mut out: impl Write) -> Result<(), SvgError> {
        let tr = self.fit_transform(diagram)?;
        self.write_document(diagram, tr, &mut out)?;
        Ok(())
    }

    /// Render diagram into a file, nothing is created if there is nothing to draw
    pub fn save(
        &self,
        diagram: &Diagram,
        path: impl AsRef<std::path::Path>,
    ) -> Result<(), SvgError> {
        let tr = self.fit_transform(diagram)?;
        let mut out = BufWriter::new(File::create(path.as_ref())?);
        self.write_document(diagram, tr, &mut out)?;
        out.flush()?;
        tracing::debug!(
            path = ?path.as_ref(),
            groups = diagram.groups().len(),
            scale = tr.scale_factor(),
            "[svg:save]"
        );
        Ok(())
    }

    fn write_document<W: Write>(
        &self,
        diagram: &Diagram,
        tr: Transform,
        out: &mut W,
    ) -> io::Result<()> {
        let SvgConfig { width, height, .. } = self.config;
        writeln!(out, r#"<?xml version="1.0" standalone="no"?>"#)?;
        writeln!(
            out,
            r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">"#
        )?;
        writeln!(
            out,
            r#"<svg width="{width}px" height="{height}px" viewBox="0 0 {width} {height}" version="1.1" xmlns="http://www.w3.org/2000/svg">"#
        )?;
        for group in diagram.groups() {
            self.write_group(group, tr, out)?;
            if group.show_coords {
                self.write_coords(group, tr, out)?;
            }
        }
        for label in diagram.labels() {
            write_label(label, out)?;
        }
        writeln!(out, "</svg>")
    }

    fn write_group<W: Write>(&self, group: &PathGroup, tr: Transform, out: &mut W) -> io::Result<()> {
        let precision = self.config.precision;
        let mut data = String::new();
        for path in group.paths.iter().filter(|path| !path.is_empty()) {
            if !data.is_empty() {
                data.push(' ');
            }
            for (index, point) in path.iter().enumerate() {
                let Point([x, y]) = tr.apply(*point);
                let cmd = match index {
                    0 => "M ",
                    1 => " L ",
                    _ => " ",
                };
                data.push_str(cmd);
                data.push_str(&format!("{},{}", Num(x, precision), Num(y, precision)));
            }
            if !group.is_open {
                data.push_str(" z");
            }
        }
        if data.is_empty() {
            return Ok(());
        }

        let pen = group.pen;
        let stroke = format!(
            "stroke:{}; stroke-opacity:{:.2}; stroke-width:{};",
            pen.rgb_hex(),
            pen.opacity(),
            Num(group.pen_width, precision),
        );
        if group.is_open {
            writeln!(out, r#"  <path d="{data}" style="fill:none; {stroke}"/>"#)
        } else {
            let brush = group.brush;
            let fill_rule = match self.config.fill_rule {
                FillRule::EvenOdd => "evenodd",
                _ => "nonzero",
            };
            writeln!(
                out,
                r#"  <path d="{data}" style="fill:{}; fill-opacity:{:.2}; fill-rule:{fill_rule}; {stroke}"/>"#,
                brush.rgb_hex(),
                brush.opacity(),
            )
        }
    }

    // labels show original coordinates at the transformed position
    fn write_coords<W: Write>(&self, group: &PathGroup, tr: Transform, out: &mut W) -> io::Result<()> {
        let precision = self.config.precision;
        let style = &self.config.coords_style;
        writeln!(
            out,
            r#"  <g font-family="{}" font-size="{}" fill="{}" fill-opacity="{:.2}">"#,
            xml_escape(&style.font_name),
            style.font_size,
            style.font_color.rgb_hex(),
            style.font_color.opacity(),
        )?;
        for point in group.paths.iter().flatten() {
            let Point([x, y]) = tr.apply(*point);
            writeln!(
                out,
                r#"    <text x="{}" y="{}">{},{}</text>"#,
                Num(x, precision),
                Num(y, precision),
                Label(point.x()),
                Label(point.y()),
            )?;
        }
        writeln!(out, "  </g>")
    }
}

fn write_label<W: Write>(label: &TextLabel, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        r#"  <g font-family="{}" font-style="normal" font-weight="{}" font-size="{}" fill="{}" fill-opacity="{:.2}">"#,
        xml_escape(&label.font_name),
        label.font_weight,
        label.font_size,
        label.font_color.rgb_hex(),
        label.font_color.opacity(),
    )?;
    writeln!(
        out,
        r#"    <text x="{}" y="{}">{}</text>"#,
        Num(label.x, 2),
        Num(label.y, 2),
        xml_escape(&label.text),
    )?;
    writeln!(out, "  </g>")
}

/// Scalar rounded to a fixed number of fractional digits
struct Num(Scalar, usize);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale: Scalar = (10.0 as Scalar).powi(self.1 as i32);
        let value = (self.0 * scale).round() / scale;
        if value.fract() == 0.0 && value.abs() < 1e15 {
            write!(f, "{}", value as i64)
        } else {
            let mut buffer = [0u8; lexical_core::BUFFER_SIZE];
            let bytes = lexical_core::write(value, &mut buffer);
            f.write_str(std::str::from_utf8(bytes).map_err(|_| fmt::Error)?)
        }
    }
}

/// Compact coordinate label
struct Label(Scalar);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        scalar_fmt(f, self.0)
    }
}

fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// Extract geometry of all `<path>` elements
///
/// Styles, labels and the transformation applied by the writer are not recovered.
/// Elements with unsupported path data are skipped.
pub fn read_svg(mut input: impl Read) -> Result<PathsD, SvgError> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    let mut paths = PathsD::new();
    let mut rest = text.as_str();
    while let Some(start) = rest.find("<path") {
        let element = &rest[start..];
        let end = element.find('>').unwrap_or(element.len());
        rest = &element[end..];
        let Some(data) = attribute(&element[..end], "d") else {
            continue;
        };
        match parse_path_data(data) {
            Ok(element_paths) => paths.extend(element_paths),
            Err(error) => tracing::debug!(?error, "[svg:skip-path]"),
        }
    }
    if paths.is_empty() {
        return Err(SvgError::NoPaths);
    }
    Ok(paths)
}

/// Same as [`read_svg`] but reads from the file at `path`
pub fn load_svg(path: impl AsRef<std::path::Path>) -> Result<PathsD, SvgError> {
    read_svg(File::open(path.as_ref())?)
}

// value of the double quoted attribute `name`
fn attribute<'a>(element: &'a str, name: &str) -> Option<&'a str> {
    let pattern = format!(" {}=\"", name);
    let start = element.find(&pattern)? + pattern.len();
    let len = element[start..].find('"')?;
    Some(&element[start..start + len])
}

/// Parse SVG path data into polylines, every sub-path becomes a separate path
pub fn parse_path_data(data: &str) -> Result<PathsD, SvgError> {
    PathDataParser::new(data.as_bytes()).parse()
}

#[derive(Debug)]
struct PathDataParser<'a> {
    // text containing unparsed path data
    text: &'a [u8],
    // current offset in the text
    offset: usize,
    // previous command
    prev_cmd: Option<u8>,
    // current position from which next segment will start
    position: Point,
    // start of the current sub-path
    subpath_start: Point,
}

impl<'a> PathDataParser<'a> {
    fn new(text: &'a [u8]) -> Self {
        Self {
            text,
            offset: 0,
            prev_cmd: None,
            position: Point::new(0.0, 0.0),
            subpath_start: Point::new(0.0, 0.0),
        }
    }

    fn is_eof(&self) -> bool {
        self.offset >= self.text.len()
    }

    fn current(&self) -> Option<u8> {
        self.text.get(self.offset).copied()
    }

    /// Consume insignificant separators
    fn parse_separators(&mut self) {
        while let Some(b' ' | b'\t' | b'\r' | b'\n' | b',') = self.current() {
            self.offset += 1;
        }
    }

    fn parse_digits(&mut self) -> bool {
        let start = self.offset;
        while let Some(b'0'..=b'9') = self.current() {
            self.offset += 1;
        }
        self.offset > start
    }

    fn parse_sign(&mut self) {
        if let Some(b'-' | b'+') = self.current() {
            self.offset += 1;
        }
    }

    /// Parse single scalar
    fn parse_scalar(&mut self) -> Result<Scalar, SvgError> {
        self.parse_separators();
        let start = self.offset;
        self.parse_sign();
        let whole = self.parse_digits();
        let fraction = if self.current() == Some(b'.') {
            self.offset += 1;
            self.parse_digits()
        } else {
            false
        };
        if !whole && !fraction {
            return Err(SvgError::InvalidScalar);
        }
        if let Some(b'e' | b'E') = self.current() {
            self.offset += 1;
            self.parse_sign();
            if !self.parse_digits() {
                return Err(SvgError::InvalidScalar);
            }
        }
        std::str::from_utf8(&self.text[start..self.offset])
            .ok()
            .and_then(|scalar| Scalar::from_str(scalar).ok())
            .ok_or(SvgError::InvalidScalar)
    }

    /// Parse pair of scalars and convert it to a point
    fn parse_point(&mut self) -> Result<Point, SvgError> {
        let x = self.parse_scalar()?;
        let y = self.parse_scalar()?;
        let point = Point::new(x, y);
        match self.prev_cmd {
            Some(cmd) if cmd.is_ascii_lowercase() => Ok(point + self.position),
            _ => Ok(point),
        }
    }

    /// Parse command, repeated arguments reuse the previous command
    fn parse_cmd(&mut self) -> Result<u8, SvgError> {
        let cmd = self.current().ok_or(SvgError::InvalidScalar)?;
        match cmd {
            b'M' | b'm' | b'L' | b'l' | b'H' | b'h' | b'V' | b'v' | b'Z' | b'z' => {
                self.offset += 1;
                self.prev_cmd = match cmd {
                    b'm' => Some(b'l'),
                    b'M' => Some(b'L'),
                    b'Z' | b'z' => None,
                    _ => Some(cmd),
                };
                Ok(cmd)
            }
            _ if cmd.is_ascii_alphabetic() => Err(SvgError::InvalidCmd(cmd)),
            _ => self.prev_cmd.ok_or(SvgError::InvalidCmd(cmd)),
        }
    }

    fn parse(mut self) -> Result<PathsD, SvgError> {
        let mut paths = PathsD::new();
        let mut current: Option<PathD> = None;
        loop {
            self.parse_separators();
            if self.is_eof() {
                break;
            }
            let cmd = self.parse_cmd()?;
            let point = match cmd {
                b'M' | b'm' => {
                    let x = self.parse_scalar()?;
                    let y = self.parse_scalar()?;
                    let point = if cmd == b'm' {
                        Point::new(x, y) + self.position
                    } else {
                        Point::new(x, y)
                    };
                    paths.extend(current.take());
                    self.subpath_start = point;
                    point
                }
                b'L' | b'l' => self.parse_point()?,
                b'H' | b'h' => {
                    let x = self.parse_scalar()?;
                    if cmd == b'h' {
                        Point::new(self.position.x() + x, self.position.y())
                    } else {
                        Point::new(x, self.position.y())
                    }
                }
                b'V' | b'v' => {
                    let y = self.parse_scalar()?;
                    if cmd == b'v' {
                        Point::new(self.position.x(), self.position.y() + y)
                    } else {
                        Point::new(self.position.x(), y)
                    }
                }
                _ => {
                    paths.extend(current.take());
                    self.position = self.subpath_start;
                    continue;
                }
            };
            if matches!(cmd, b'M' | b'm') {
                current = Some(vec![point]);
            } else {
                let start = self.position;
                current.get_or_insert_with(|| vec![start]).push(point);
            }
            self.position = point;
        }
        paths.extend(current);
        Ok(paths)
    }
}

/// Error while writing or reading SVG diagrams
#[derive(Debug)]
pub enum SvgError {
    /// Diagram bounds have zero width or height
    EmptyGeometry,
    /// Margin leaves no space on the canvas
    InvalidCanvas,
    /// Unsupported or unexpected path command
    InvalidCmd(u8),
    /// Failed to parse scalar value
    InvalidScalar,
    /// Document does not contain recognizable paths
    NoPaths,
    /// JSON error
    #[cfg(feature = "serde")]
    Json(serde_json::Error),
    /// IO error propagated while reading or writing
    IoError(io::Error),
}

impl fmt::Display for SvgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SvgError::{:?}", self)
    }
}

impl From<io::Error> for SvgError {
    fn from(error: io::Error) -> Self {
        Self::IoError(error)
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for SvgError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error)
    }
}

impl From<SvgError> for io::Error {
    fn from(error: SvgError) -> Self {
        match error {
            SvgError::IoError(error) => error,
            _ => Self::new(io::ErrorKind::InvalidData, error),
        }
    }
}

impl std::error::Error for SvgError {}
