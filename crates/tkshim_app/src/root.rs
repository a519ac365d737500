//! Toplevel window options
//!
//! `Tk` and `Toplevel` share one option table. Window management calls that
//! Tk exposes as methods (`title`, `geometry`, `resizable`, ...) are options
//! here, so they flow through the same dispatcher as everything else.

use std::fmt;
use std::str::FromStr;

use tkshim_core::{CoreError, OptionTable, OptionValue, Result};

use crate::classes::{common_options, host_get, host_set};
use crate::widget::Widget;

/// Parsed `WxH[+X+Y]` window geometry
///
/// Either part may be absent (`"300x200"`, `"+10+20"`), but not both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowGeometry {
    pub size: Option<(u32, u32)>,
    pub position: Option<(i32, i32)>,
}

impl FromStr for WindowGeometry {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            CoreError::validation(
                "geometry",
                format!("expected WxH[+X+Y] or +X+Y, got '{s}'"),
            )
        };

        let s = s.trim().trim_start_matches('=');
        let offset_at = s.find(&['+', '-'][..]);
        let (size_part, offset_part) = match offset_at {
            Some(i) => (&s[..i], Some(&s[i..])),
            None => (s, None),
        };

        let size = if size_part.is_empty() {
            None
        } else {
            let (w, h) = size_part.split_once('x').ok_or_else(invalid)?;
            let w: u32 = w.parse().map_err(|_| invalid())?;
            let h: u32 = h.parse().map_err(|_| invalid())?;
            Some((w, h))
        };

        let position = match offset_part {
            None => None,
            Some(offsets) => {
                // "+X+Y" / "-X-Y" / "+X-Y": split before the second sign
                let second = offsets[1..]
                    .find(&['+', '-'][..])
                    .map(|i| i + 1)
                    .ok_or_else(invalid)?;
                let x: i32 = offsets[..second]
                    .trim_start_matches('+')
                    .parse()
                    .map_err(|_| invalid())?;
                let y: i32 = offsets[second..]
                    .trim_start_matches('+')
                    .parse()
                    .map_err(|_| invalid())?;
                Some((x, y))
            }
        };

        if size.is_none() && position.is_none() {
            return Err(invalid());
        }
        Ok(Self { size, position })
    }
}

impl fmt::Display for WindowGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((w, h)) = self.size {
            write!(f, "{w}x{h}")?;
        }
        if let Some((x, y)) = self.position {
            write!(f, "{x:+}{y:+}")?;
        }
        Ok(())
    }
}

fn pair<T: tkshim_core::FromOptionValue>(option: &str, value: &OptionValue) -> Result<(T, T)> {
    let bad = || CoreError::validation(option, format!("expected two values, got {value}"));
    let items: Vec<OptionValue> = match value {
        OptionValue::List(items) => items.clone(),
        OptionValue::Str(s) => s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .map(OptionValue::from)
            .collect(),
        _ => return Err(bad()),
    };
    match items.as_slice() {
        [a, b] => {
            let a = T::from_option_value(a).map_err(|_| bad())?;
            let b = T::from_option_value(b).map_err(|_| bad())?;
            Ok((a, b))
        }
        _ => Err(bad()),
    }
}

fn expected(option: &str, what: &str, v: &OptionValue) -> CoreError {
    CoreError::validation(option, format!("expected {what}, got {}", v.type_name()))
}

fn int_list(a: i64, b: i64) -> OptionValue {
    OptionValue::List(vec![OptionValue::Int(a), OptionValue::Int(b)])
}

// ============================================================================
// Setters
// ============================================================================

fn set_title(w: &Widget, v: &OptionValue) -> Result<()> {
    host_set(w, "title", OptionValue::Str(v.display_text()))
}

fn get_title(w: &Widget) -> Result<OptionValue> {
    Ok(host_get(w, "title"))
}

fn set_geometry(w: &Widget, v: &OptionValue) -> Result<()> {
    let text = v
        .as_str()
        .ok_or_else(|| expected("geometry", "a string", v))?;
    let geometry: WindowGeometry = text.parse()?;
    if let Some((width, height)) = geometry.size {
        host_set(w, "default_size", int_list(width.into(), height.into()))?;
    }
    if let Some((x, y)) = geometry.position {
        host_set(w, "position", int_list(x.into(), y.into()))?;
    }
    tracing::trace!(widget = ?w.id(), %geometry, "window geometry");
    Ok(())
}

fn set_resizable(w: &Widget, v: &OptionValue) -> Result<()> {
    let (width, height) = match v {
        OptionValue::Bool(b) => (*b, *b),
        other => pair::<bool>("resizable", other)?,
    };
    // The host only has a single flag
    host_set(w, "resizable", OptionValue::Bool(width && height))
}

fn set_minsize(w: &Widget, v: &OptionValue) -> Result<()> {
    let (width, height) = pair::<u32>("minsize", v)?;
    host_set(w, "min_size", int_list(width.into(), height.into()))
}

fn set_maxsize(w: &Widget, v: &OptionValue) -> Result<()> {
    let (width, height) = pair::<u32>("maxsize", v)?;
    if width == 0 || height == 0 {
        return Ok(());
    }
    host_set(w, "max_size", int_list(width.into(), height.into()))
}

fn set_alpha(w: &Widget, v: &OptionValue) -> Result<()> {
    let alpha = v
        .as_f64()
        .ok_or_else(|| expected("alpha", "a number", v))?;
    if !(0.0..=1.0).contains(&alpha) {
        return Err(CoreError::validation("alpha", format!("{alpha} is outside 0.0..=1.0")));
    }
    host_set(w, "opacity", OptionValue::Float(alpha))
}

fn set_fullscreen(w: &Widget, v: &OptionValue) -> Result<()> {
    let on = bool_value("fullscreen", v)?;
    host_set(w, "fullscreen", OptionValue::Bool(on))
}

fn set_overrideredirect(w: &Widget, v: &OptionValue) -> Result<()> {
    let on = bool_value("overrideredirect", v)?;
    host_set(w, "decorated", OptionValue::Bool(!on))
}

fn set_position(w: &Widget, v: &OptionValue) -> Result<()> {
    match v.as_str() {
        Some(p @ ("center" | "mouse")) => host_set(w, "window_position", OptionValue::from(p)),
        _ => Err(CoreError::validation(
            "position",
            format!("expected center or mouse, got {v}"),
        )),
    }
}

fn bool_value(option: &str, v: &OptionValue) -> Result<bool> {
    <bool as tkshim_core::FromOptionValue>::from_option_value(v)
        .map_err(|_| CoreError::validation(option, format!("expected a boolean, got {v}")))
}

/// Option table shared by `Tk` and `Toplevel`
pub fn window_table(class: &str) -> OptionTable<Widget> {
    OptionTable::builder(class)
        .inherit(&common_options())
        .option("title", set_title, get_title)
        .setter("geometry", set_geometry)
        .setter("resizable", set_resizable)
        .setter("minsize", set_minsize)
        .setter("maxsize", set_maxsize)
        .setter("alpha", set_alpha)
        .setter("fullscreen", set_fullscreen)
        .setter("overrideredirect", set_overrideredirect)
        .setter("position", set_position)
        .build()
}
