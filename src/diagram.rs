//! Format independent description of a diagram: styled groups of paths and text labels
use crate::{Argb, BBox, Path64, PathD, PathsD, Scalar, Solution, TestCase, paths_to_f64};

/// Collection of paths rendered as one visual unit
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathGroup {
    pub paths: PathsD,
    /// Paths are polylines (stroke only) instead of polygons
    pub is_open: bool,
    /// Fill color, ignored for open paths
    pub brush: Argb,
    /// Stroke color
    pub pen: Argb,
    /// Stroke width
    pub pen_width: Scalar,
    /// Label every vertex with its coordinates
    pub show_coords: bool,
}

impl PathGroup {
    /// Bounding box of all points, `None` if group has no points
    pub fn bbox(&self) -> Option<BBox> {
        BBox::from_points(self.paths.iter().flatten().copied())
    }
}

/// Free standing text, positioned in the output canvas coordinates
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextLabel {
    pub text: String,
    pub font_name: String,
    pub font_color: Argb,
    pub font_weight: u32,
    pub font_size: u32,
    pub x: Scalar,
    pub y: Scalar,
}

impl TextLabel {
    pub fn new(text: impl Into<String>, x: Scalar, y: Scalar) -> Self {
        Self {
            text: text.into(),
            font_name: "Verdana".to_owned(),
            font_color: Argb::BLACK,
            font_weight: 600,
            font_size: 11,
            x,
            y,
        }
    }
}

/// Kinds of geometry taking part in a clipping operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    Subjects,
    OpenSubjects,
    Clips,
    Solution,
    OpenSolution,
}

impl Category {
    /// Open flag, brush, pen and pen width used to draw the category
    pub fn style(self) -> (bool, Argb, Argb, Scalar) {
        match self {
            Category::Subjects => (false, Argb(0x1200009c), Argb(0xccd3d3da), 0.8),
            Category::OpenSubjects => (true, Argb::TRANSPARENT, Argb(0xffd3d3da), 1.0),
            Category::Clips => (false, Argb(0x129c0000), Argb(0xccffa07a), 0.8),
            Category::Solution => (false, Argb(0xff80ff9c), Argb(0xff003300), 0.8),
            Category::OpenSolution => (true, Argb::TRANSPARENT, Argb::BLACK, 1.0),
        }
    }
}

/// Ordered collection of path groups and text labels
///
/// Groups are painted in the order they were added.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagram {
    groups: Vec<PathGroup>,
    labels: Vec<TextLabel>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagram of a test case inputs and optionally of its solution
    pub fn from_case(case: &TestCase, solution: Option<&Solution>, show_coords: bool) -> Self {
        let mut diagram = Self::new();
        diagram
            .add_category(Category::Subjects, &case.subjects, show_coords)
            .add_category(Category::OpenSubjects, &case.subjects_open, show_coords)
            .add_category(Category::Clips, &case.clips, show_coords);
        if let Some(solution) = solution {
            diagram
                .add_category(Category::Solution, &solution.closed, show_coords)
                .add_category(Category::OpenSolution, &solution.open, show_coords);
        }
        diagram
    }

    pub fn groups(&self) -> &[PathGroup] {
        &self.groups
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    pub fn add_group(&mut self, group: PathGroup) -> &mut Self {
        self.groups.push(group);
        self
    }

    pub fn add_paths(
        &mut self,
        paths: PathsD,
        is_open: bool,
        brush: Argb,
        pen: Argb,
        pen_width: Scalar,
        show_coords: bool,
    ) -> &mut Self {
        self.add_group(PathGroup {
            paths,
            is_open,
            brush,
            pen,
            pen_width,
            show_coords,
        })
    }

    pub fn add_path(
        &mut self,
        path: PathD,
        is_open: bool,
        brush: Argb,
        pen: Argb,
        pen_width: Scalar,
        show_coords: bool,
    ) -> &mut Self {
        self.add_paths(vec![path], is_open, brush, pen, pen_width, show_coords)
    }

    /// Add integer paths with the style of the `category`, empty collections are skipped
    pub fn add_category(
        &mut self,
        category: Category,
        paths: &[Path64],
        show_coords: bool,
    ) -> &mut Self {
        if paths.iter().all(|path| path.is_empty()) {
            return self;
        }
        let (is_open, brush, pen, pen_width) = category.style();
        self.add_paths(paths_to_f64(paths), is_open, brush, pen, pen_width, show_coords)
    }

    pub fn add_label(&mut self, label: TextLabel) -> &mut Self {
        self.labels.push(label);
        self
    }

    pub fn add_text(
        &mut self,
        text: impl Into<String>,
        font_color: Argb,
        font_size: u32,
        x: Scalar,
        y: Scalar,
    ) -> &mut Self {
        self.add_label(TextLabel {
            font_color,
            font_size,
            ..TextLabel::new(text, x, y)
        })
    }

    /// Remove all groups and labels
    pub fn clear(&mut self) {
        self.groups.clear();
        self.labels.clear();
    }

    /// Bounding box of all groups, `None` if there is nothing to draw
    pub fn bbox(&self) -> Option<BBox> {
        self.groups.iter().fold(None, |bbox, group| match bbox {
            Some(bbox) => Some(bbox.union_opt(group.bbox())),
            None => group.bbox(),
        })
    }
}
