//! Placement options and entries
//!
//! One options struct per geometry manager. The struct a caller passes to
//! `pack`/`grid`/`place` is also what the engine records as that widget's
//! placement entry.

use std::fmt;
use std::str::FromStr;

use tkshim_core::{CoreError, Options, Result as CoreResult};
use tkshim_platform::{Align, Orientation};

/// Which geometry manager governs a master
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GeometryMode {
    /// Nothing placed yet
    #[default]
    None,
    Pack,
    Grid,
    Place,
}

impl fmt::Display for GeometryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GeometryMode::None => "none",
            GeometryMode::Pack => "pack",
            GeometryMode::Grid => "grid",
            GeometryMode::Place => "place",
        })
    }
}

// ============================================================================
// Pack
// ============================================================================

/// Edge of the master a packed widget is stacked against
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Side {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Box orientation a side implies
    pub fn orientation(&self) -> Orientation {
        match self {
            Side::Left | Side::Right => Orientation::Horizontal,
            Side::Top | Side::Bottom => Orientation::Vertical,
        }
    }

    /// Start-anchored (`top`/`left`) versus end-anchored (`bottom`/`right`)
    pub fn is_start(&self) -> bool {
        matches!(self, Side::Top | Side::Left)
    }
}

impl FromStr for Side {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "top" => Ok(Side::Top),
            "bottom" => Ok(Side::Bottom),
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            other => Err(CoreError::validation(
                "side",
                format!("expected top, bottom, left or right, got '{other}'"),
            )),
        }
    }
}

/// Axes a packed widget stretches along
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Fill {
    #[default]
    None,
    X,
    Y,
    Both,
}

impl Fill {
    pub fn covers_x(&self) -> bool {
        matches!(self, Fill::X | Fill::Both)
    }

    pub fn covers_y(&self) -> bool {
        matches!(self, Fill::Y | Fill::Both)
    }
}

impl FromStr for Fill {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "none" => Ok(Fill::None),
            "x" => Ok(Fill::X),
            "y" => Ok(Fill::Y),
            "both" => Ok(Fill::Both),
            other => Err(CoreError::validation(
                "fill",
                format!("expected none, x, y or both, got '{other}'"),
            )),
        }
    }
}

/// Compass anchor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Anchor {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
    Center,
}

impl Anchor {
    /// (horizontal, vertical) alignment for this anchor
    pub fn align(&self) -> (Align, Align) {
        match self {
            Anchor::N => (Align::Center, Align::Start),
            Anchor::NE => (Align::End, Align::Start),
            Anchor::E => (Align::End, Align::Center),
            Anchor::SE => (Align::End, Align::End),
            Anchor::S => (Align::Center, Align::End),
            Anchor::SW => (Align::Start, Align::End),
            Anchor::W => (Align::Start, Align::Center),
            Anchor::NW => (Align::Start, Align::Start),
            Anchor::Center => (Align::Center, Align::Center),
        }
    }
}

impl FromStr for Anchor {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "n" => Ok(Anchor::N),
            "ne" => Ok(Anchor::NE),
            "e" => Ok(Anchor::E),
            "se" => Ok(Anchor::SE),
            "s" => Ok(Anchor::S),
            "sw" => Ok(Anchor::SW),
            "w" => Ok(Anchor::W),
            "nw" => Ok(Anchor::NW),
            "center" => Ok(Anchor::Center),
            other => Err(CoreError::validation(
                "anchor",
                format!("expected a compass point or center, got '{other}'"),
            )),
        }
    }
}

fn parse_opt<T: FromStr<Err = CoreError>>(options: &Options, key: &str) -> CoreResult<Option<T>> {
    options
        .get_opt::<String>(key)?
        .map(|s| s.parse::<T>())
        .transpose()
}

/// `pack` options; also the recorded pack entry
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PackOptions {
    pub side: Side,
    pub expand: bool,
    pub fill: Fill,
    pub anchor: Option<Anchor>,
    pub padx: u32,
    pub pady: u32,
    /// Internal padding, forwarded to hosts that support it
    pub ipadx: u32,
    pub ipady: u32,
}

impl PackOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn expand(mut self, expand: bool) -> Self {
        self.expand = expand;
        self
    }

    pub fn fill(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn padx(mut self, padx: u32) -> Self {
        self.padx = padx;
        self
    }

    pub fn pady(mut self, pady: u32) -> Self {
        self.pady = pady;
        self
    }

    pub fn ipad(mut self, ipadx: u32, ipady: u32) -> Self {
        self.ipadx = ipadx;
        self.ipady = ipady;
        self
    }

    /// Parse from loose key/value options
    pub fn from_options(options: &Options) -> CoreResult<Self> {
        Ok(Self {
            side: parse_opt(options, "side")?.unwrap_or_default(),
            expand: options.get_or("expand", false)?,
            fill: parse_opt(options, "fill")?.unwrap_or_default(),
            anchor: parse_opt(options, "anchor")?,
            padx: options.get_or("padx", 0)?,
            pady: options.get_or("pady", 0)?,
            ipadx: options.get_or("ipadx", 0)?,
            ipady: options.get_or("ipady", 0)?,
        })
    }
}

// ============================================================================
// Grid
// ============================================================================

/// `grid` options; also the recorded grid entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridOptions {
    pub row: u32,
    pub column: u32,
    pub rowspan: u32,
    pub columnspan: u32,
    pub padx: u32,
    pub pady: u32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            row: 0,
            column: 0,
            rowspan: 1,
            columnspan: 1,
            padx: 0,
            pady: 0,
        }
    }
}

impl GridOptions {
    /// Cell at `row`, `column` with unit span
    pub fn cell(row: u32, column: u32) -> Self {
        Self {
            row,
            column,
            ..Default::default()
        }
    }

    pub fn span(mut self, rowspan: u32, columnspan: u32) -> Self {
        self.rowspan = rowspan;
        self.columnspan = columnspan;
        self
    }

    pub fn pad(mut self, padx: u32, pady: u32) -> Self {
        self.padx = padx;
        self.pady = pady;
        self
    }

    /// Whether two entries share at least one cell
    pub fn overlaps(&self, other: &GridOptions) -> bool {
        let rows = spans_meet(self.row, self.rowspan, other.row, other.rowspan);
        let cols = spans_meet(self.column, self.columnspan, other.column, other.columnspan);
        rows && cols
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.rowspan == 0 {
            return Err(CoreError::validation("rowspan", "must be at least 1"));
        }
        if self.columnspan == 0 {
            return Err(CoreError::validation("columnspan", "must be at least 1"));
        }
        Ok(())
    }

    /// Parse from loose key/value options
    pub fn from_options(options: &Options) -> CoreResult<Self> {
        let opts = Self {
            row: options.get_or("row", 0)?,
            column: options.get_or("column", 0)?,
            rowspan: options.get_or("rowspan", 1)?,
            columnspan: options.get_or("columnspan", 1)?,
            padx: options.get_or("padx", 0)?,
            pady: options.get_or("pady", 0)?,
        };
        opts.validate()?;
        Ok(opts)
    }
}

// Widened so a span starting at u32::MAX cannot overflow
fn spans_meet(start: u32, span: u32, other_start: u32, other_span: u32) -> bool {
    let (start, other_start) = (u64::from(start), u64::from(other_start));
    start < other_start + u64::from(other_span) && other_start < start + u64::from(span)
}

// ============================================================================
// Place
// ============================================================================

/// `place` options; also the recorded place entry
///
/// An absent width or height means the widget keeps its intrinsic size on
/// that axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaceOptions {
    pub x: i32,
    pub y: i32,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

impl PlaceOptions {
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    pub fn size(mut self, width: i32, height: i32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Positional form: `(x, y)` or `(x, y, width, height)`
    pub fn from_args(args: &[i32]) -> CoreResult<Self> {
        match *args {
            [x, y] => Ok(Self::at(x, y)),
            [x, y, width, height] => {
                let opts = Self::at(x, y).size(width, height);
                opts.validate()?;
                Ok(opts)
            }
            _ => Err(CoreError::validation(
                "place",
                format!("expected 2 or 4 positional arguments, got {}", args.len()),
            )),
        }
    }

    /// Width and height, when given, must not be negative
    pub fn validate(&self) -> CoreResult<()> {
        for (name, size) in [("width", self.width), ("height", self.height)] {
            if let Some(size) = size.filter(|s| *s < 0) {
                return Err(CoreError::validation(
                    name,
                    format!("must not be negative, got {size}"),
                ));
            }
        }
        Ok(())
    }

    /// Whether the entry carries an explicit size request
    pub fn has_size(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }

    /// Parse from loose key/value options
    pub fn from_options(options: &Options) -> CoreResult<Self> {
        let opts = Self {
            x: options.get_or("x", 0)?,
            y: options.get_or("y", 0)?,
            width: options.get_opt("width")?,
            height: options.get_opt("height")?,
        };
        opts.validate()?;
        Ok(opts)
    }
}

// ============================================================================
// Entry
// ============================================================================

/// Mode-dependent record of where one widget sits under its master
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementEntry {
    Pack(PackOptions),
    Grid(GridOptions),
    Place(PlaceOptions),
}

impl PlacementEntry {
    pub fn mode(&self) -> GeometryMode {
        match self {
            PlacementEntry::Pack(_) => GeometryMode::Pack,
            PlacementEntry::Grid(_) => GeometryMode::Grid,
            PlacementEntry::Place(_) => GeometryMode::Place,
        }
    }

    /// Default entry a migrated child lands on after a container conversion
    pub fn reset(mode: GeometryMode) -> Option<Self> {
        match mode {
            GeometryMode::None => None,
            GeometryMode::Pack => Some(PlacementEntry::Pack(PackOptions::default())),
            GeometryMode::Grid => Some(PlacementEntry::Grid(GridOptions::default())),
            GeometryMode::Place => Some(PlacementEntry::Place(PlaceOptions::default())),
        }
    }

    pub fn as_pack(&self) -> Option<&PackOptions> {
        match self {
            PlacementEntry::Pack(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_grid(&self) -> Option<&GridOptions> {
        match self {
            PlacementEntry::Grid(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_place(&self) -> Option<&PlaceOptions> {
        match self {
            PlacementEntry::Place(p) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for PlacementEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementEntry::Pack(p) => {
                write!(f, "pack side={:?} expand={} fill={:?}", p.side, p.expand, p.fill)?;
                if let Some(anchor) = p.anchor {
                    write!(f, " anchor={anchor:?}")?;
                }
                write!(f, " pad=({},{})", p.padx, p.pady)
            }
            PlacementEntry::Grid(g) => write!(
                f,
                "grid row={} column={} span=({}x{}) pad=({},{})",
                g.row, g.column, g.rowspan, g.columnspan, g.padx, g.pady
            ),
            PlacementEntry::Place(p) => {
                write!(f, "place at=({},{})", p.x, p.y)?;
                match (p.width, p.height) {
                    (None, None) => Ok(()),
                    (w, h) => write!(
                        f,
                        " size=({},{})",
                        w.map_or("-".to_string(), |v| v.to_string()),
                        h.map_or("-".to_string(), |v| v.to_string())
                    ),
                }
            }
        }
    }
}
