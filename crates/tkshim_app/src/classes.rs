//! Built-in widget classes
//!
//! Thin adapters that map Tk option names onto host properties. Every class
//! starts from [`common_options`] and adds what is specific to it.

use std::path::Path;

use tkshim_core::{CoreError, FromOptionValue, OptionTable, OptionValue, Result};
use tkshim_layout::Anchor;

use crate::class::{ClassRole, WidgetClass};
use crate::root::window_table;
use crate::widget::Widget;

/// Set a host property, treating a host without it as a no-op
pub(crate) fn host_set(w: &Widget, property: &str, value: OptionValue) -> Result<()> {
    match w.host().set_property(property, &value) {
        Some(result) => result,
        None => {
            tracing::debug!(
                widget = ?w.id(),
                host_class = w.host().host_class(),
                property,
                "host has no such property"
            );
            Ok(())
        }
    }
}

/// Read a host property, `None` when the host lacks it
pub(crate) fn host_get(w: &Widget, property: &str) -> OptionValue {
    w.host().property(property).unwrap_or_default()
}

fn typed<T: FromOptionValue>(option: &str, v: &OptionValue) -> Result<T> {
    T::from_option_value(v).map_err(|err| match err {
        CoreError::TypeMismatch { expected, actual } => {
            CoreError::validation(option, format!("expected {expected}, got {actual}"))
        }
        other => other,
    })
}

fn one_of<'a>(option: &str, v: &'a OptionValue, allowed: &[&str]) -> Result<&'a str> {
    match v.as_str() {
        Some(s) if allowed.contains(&s) => Ok(s),
        _ => Err(CoreError::validation(
            option,
            format!("expected one of {}, got {v}", allowed.join(", ")),
        )),
    }
}

// ============================================================================
// Common options
// ============================================================================

fn set_bg(w: &Widget, v: &OptionValue) -> Result<()> {
    host_set(w, "background", OptionValue::Str(v.display_text()))
}

fn set_fg(w: &Widget, v: &OptionValue) -> Result<()> {
    host_set(w, "foreground", OptionValue::Str(v.display_text()))
}

/// Font descriptions pass through untouched: `"Helvetica 12 bold"` or a
/// family/size/style list
fn set_font(w: &Widget, v: &OptionValue) -> Result<()> {
    host_set(w, "font", OptionValue::Str(v.display_text()))
}

fn set_relief(w: &Widget, v: &OptionValue) -> Result<()> {
    let relief = one_of(
        "relief",
        v,
        &["flat", "raised", "sunken", "groove", "ridge", "solid"],
    )?;
    host_set(w, "relief", OptionValue::from(relief))
}

fn set_cursor(w: &Widget, v: &OptionValue) -> Result<()> {
    host_set(w, "cursor", OptionValue::Str(v.display_text()))
}

fn set_padx(w: &Widget, v: &OptionValue) -> Result<()> {
    let padx: u32 = typed("padx", v)?;
    let pady = w.recorded::<u32>("pady").unwrap_or(0);
    w.host().set_margins(padx, pady);
    Ok(())
}

fn set_pady(w: &Widget, v: &OptionValue) -> Result<()> {
    let pady: u32 = typed("pady", v)?;
    let padx = w.recorded::<u32>("padx").unwrap_or(0);
    w.host().set_margins(padx, pady);
    Ok(())
}

fn set_borderwidth(w: &Widget, v: &OptionValue) -> Result<()> {
    let width: u32 = typed("borderwidth", v)?;
    host_set(w, "border_width", OptionValue::Int(width.into()))
}

fn set_anchor(w: &Widget, v: &OptionValue) -> Result<()> {
    let anchor: Anchor = typed::<String>("anchor", v)?.parse()?;
    let (halign, valign) = anchor.align();
    w.host().set_align(halign, valign);
    Ok(())
}

fn set_width(w: &Widget, v: &OptionValue) -> Result<()> {
    let width: i32 = typed("width", v)?;
    let height = w.recorded::<i32>("height");
    w.host().set_size_request(Some(width), height);
    Ok(())
}

fn set_height(w: &Widget, v: &OptionValue) -> Result<()> {
    let height: i32 = typed("height", v)?;
    let width = w.recorded::<i32>("width");
    w.host().set_size_request(width, Some(height));
    Ok(())
}

fn set_tooltip(w: &Widget, v: &OptionValue) -> Result<()> {
    host_set(w, "tooltip_text", OptionValue::Str(v.display_text()))
}

fn set_state(w: &Widget, v: &OptionValue) -> Result<()> {
    let state = one_of("state", v, &["normal", "active", "disabled", "readonly"])?;
    host_set(w, "sensitive", OptionValue::Bool(state != "disabled"))?;
    if w.host().host_class() == "entry" {
        host_set(w, "editable", OptionValue::Bool(state == "normal" || state == "active"))?;
    }
    Ok(())
}

/// `image` names a file on disk; a missing file is an error
fn set_image(w: &Widget, v: &OptionValue) -> Result<()> {
    if v.is_none() {
        return host_set(w, "image", OptionValue::None);
    }
    let path: String = typed("image", v)?;
    if !Path::new(&path).exists() {
        return Err(CoreError::MissingResource { path: path.into() });
    }
    host_set(w, "image", OptionValue::Str(path))
}

/// Options every class understands
pub fn common_options() -> OptionTable<Widget> {
    OptionTable::builder("Widget")
        .setter("bg", set_bg)
        .setter("background", set_bg)
        .setter("fg", set_fg)
        .setter("foreground", set_fg)
        .setter("font", set_font)
        .setter("relief", set_relief)
        .setter("cursor", set_cursor)
        .setter("padx", set_padx)
        .setter("pady", set_pady)
        .setter("borderwidth", set_borderwidth)
        .setter("bd", set_borderwidth)
        .setter("anchor", set_anchor)
        .setter("width", set_width)
        .setter("height", set_height)
        .setter("tooltip", set_tooltip)
        .setter("state", set_state)
        .setter("image", set_image)
        .build()
}

// ============================================================================
// Value and link options
// ============================================================================

fn set_text(w: &Widget, v: &OptionValue) -> Result<()> {
    host_set(w, "label", OptionValue::Str(v.display_text()))
}

fn get_text(w: &Widget) -> Result<OptionValue> {
    Ok(host_get(w, "label"))
}

/// `textvariable` / `variable`: bind, rebind, or unbind with `None`
fn set_variable(w: &Widget, v: &OptionValue) -> Result<()> {
    match v {
        OptionValue::Variable(variable) => w.bind_variable(variable.clone()),
        OptionValue::None => {
            w.unbind_variable();
            Ok(())
        }
        other => Err(CoreError::validation(
            "variable",
            format!("expected a variable, got {}", other.type_name()),
        )),
    }
}

fn get_variable(w: &Widget) -> Result<OptionValue> {
    Ok(w
        .bound_variable()
        .map(OptionValue::Variable)
        .unwrap_or_default())
}

fn set_command(w: &Widget, v: &OptionValue) -> Result<()> {
    w.set_command(v)
}

fn set_justify(w: &Widget, v: &OptionValue) -> Result<()> {
    let justify = one_of("justify", v, &["left", "center", "right"])?;
    host_set(w, "justify", OptionValue::from(justify))?;
    let xalign = match justify {
        "left" => 0.0,
        "right" => 1.0,
        _ => 0.5,
    };
    host_set(w, "xalign", OptionValue::Float(xalign))
}

fn set_wraplength(w: &Widget, v: &OptionValue) -> Result<()> {
    let length: u32 = typed("wraplength", v)?;
    host_set(w, "wrap", OptionValue::Bool(length > 0))
}

fn set_width_chars(w: &Widget, v: &OptionValue) -> Result<()> {
    let chars: u32 = typed("width", v)?;
    host_set(w, "width_chars", OptionValue::Int(chars.into()))
}

fn set_height_chars(w: &Widget, v: &OptionValue) -> Result<()> {
    let lines: u32 = typed("height", v)?;
    host_set(w, "height_chars", OptionValue::Int(lines.into()))
}

// Width is counted in characters here, so only the height is requested.
fn set_text_height(w: &Widget, v: &OptionValue) -> Result<()> {
    let height: i32 = typed("height", v)?;
    w.host().set_size_request(None, Some(height));
    Ok(())
}

fn set_show(w: &Widget, v: &OptionValue) -> Result<()> {
    let mask = v.display_text();
    host_set(w, "visibility", OptionValue::Bool(mask.is_empty()))
}

fn set_from(w: &Widget, v: &OptionValue) -> Result<()> {
    let lower: f64 = typed("from_", v)?;
    host_set(w, "lower", OptionValue::Float(lower))
}

fn set_to(w: &Widget, v: &OptionValue) -> Result<()> {
    let upper: f64 = typed("to", v)?;
    host_set(w, "upper", OptionValue::Float(upper))
}

fn set_orient(w: &Widget, v: &OptionValue) -> Result<()> {
    let orient = one_of("orient", v, &["horizontal", "vertical"])?;
    host_set(w, "orientation", OptionValue::from(orient))
}

fn set_digits(w: &Widget, v: &OptionValue) -> Result<()> {
    let digits: u32 = typed("digits", v)?;
    host_set(w, "digits", OptionValue::Int(digits.into()))
}

// ============================================================================
// Classes
// ============================================================================

fn class_table(class: &str) -> tkshim_core::OptionTableBuilder<Widget> {
    OptionTable::builder(class).inherit(&common_options())
}

fn frame() -> WidgetClass {
    WidgetClass::new("frame", class_table("Frame").build()).role(ClassRole::Container)
}

fn label() -> WidgetClass {
    let table = class_table("Label")
        .option("text", set_text, get_text)
        .option("textvariable", set_variable, get_variable)
        .setter("justify", set_justify)
        .setter("wraplength", set_wraplength)
        .setter("width", set_width_chars)
        .setter("height", set_height_chars)
        .build();
    WidgetClass::new("label", table).display("label", true)
}

fn button() -> WidgetClass {
    let table = class_table("Button")
        .option("text", set_text, get_text)
        .option("textvariable", set_variable, get_variable)
        .setter("command", set_command)
        .setter("width", set_width_chars)
        .setter("height", set_text_height)
        .build();
    WidgetClass::new("button", table).display("label", true)
}

fn entry() -> WidgetClass {
    let table = class_table("Entry")
        .option("textvariable", set_variable, get_variable)
        .setter("show", set_show)
        .setter("justify", set_justify)
        .setter("width", set_width_chars)
        .setter("height", set_text_height)
        .build();
    WidgetClass::new("entry", table)
        .display("text", true)
        .editable()
}

fn checkbutton() -> WidgetClass {
    let table = class_table("Checkbutton")
        .option("text", set_text, get_text)
        .option("variable", set_variable, get_variable)
        .setter("command", set_command)
        .build();
    WidgetClass::new("check_button", table)
        .display("active", false)
        .editable()
}

fn scale() -> WidgetClass {
    let table = class_table("Scale")
        .option("variable", set_variable, get_variable)
        .setter("from_", set_from)
        .setter("to", set_to)
        .setter("orient", set_orient)
        .setter("digits", set_digits)
        .build();
    WidgetClass::new("scale", table)
        .display("value", false)
        .editable()
}

fn window(class: &str) -> WidgetClass {
    WidgetClass::new("window", window_table(class)).role(ClassRole::Window)
}

/// Classes every [`AppContext`](crate::AppContext) starts with
pub fn builtin() -> Vec<WidgetClass> {
    vec![
        window("Tk"),
        window("Toplevel"),
        frame(),
        label(),
        button(),
        entry(),
        checkbutton(),
        scale(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShimConfig;
    use crate::context::AppContext;
    use crate::error::AppError;
    use std::rc::Rc;
    use tkshim_core::{Options, StringVar};
    use tkshim_platform::headless::HeadlessWidget;
    use tkshim_platform::{Align, HeadlessToolkit};

    fn setup() -> (AppContext, HeadlessToolkit, Widget) {
        let (ctx, tk) = AppContext::headless(ShimConfig::default());
        let root = ctx.tk().unwrap();
        (ctx, tk, root)
    }

    fn host(tk: &HeadlessToolkit, w: &Widget) -> Rc<HeadlessWidget> {
        tk.widget(w.host().host_id()).unwrap()
    }

    #[test]
    fn test_builtin_classes() {
        let names: Vec<_> = builtin().iter().map(|c| c.name().to_string()).collect();
        assert_eq!(
            names,
            ["Tk", "Toplevel", "Frame", "Label", "Button", "Entry", "Checkbutton", "Scale"]
        );
        assert!(builtin().iter().all(|c| c.table().contains("bg")));
    }

    #[test]
    fn test_padding_combines_axes() {
        let (ctx, tk, root) = setup();
        let label = ctx
            .create("Label", &root, Options::new().with("padx", 4).with("pady", 6))
            .unwrap();
        assert_eq!(host(&tk, &label).margins(), (4, 6));

        label.set("padx", 1).unwrap();
        assert_eq!(host(&tk, &label).margins(), (1, 6));
    }

    #[test]
    fn test_text_round_trips_through_host() {
        let (ctx, tk, root) = setup();
        let label = ctx
            .create("Label", &root, Options::new().with("text", "Hello"))
            .unwrap();
        assert_eq!(host(&tk, &label).stored("label"), Some(OptionValue::from("Hello")));
        assert_eq!(label.cget("text").unwrap(), OptionValue::from("Hello"));
    }

    #[test]
    fn test_textvariable_drives_label() {
        let (ctx, tk, root) = setup();
        let name = StringVar::new("first".to_string());
        let label = ctx
            .create("Label", &root, Options::new().with("textvariable", &name))
            .unwrap();
        assert_eq!(host(&tk, &label).stored("label"), Some(OptionValue::from("first")));

        name.set("second".to_string());
        assert_eq!(host(&tk, &label).stored("label"), Some(OptionValue::from("second")));

        label.set("textvariable", OptionValue::None).unwrap();
        name.set("third".to_string());
        assert_eq!(host(&tk, &label).stored("label"), Some(OptionValue::from("second")));
    }

    #[test]
    fn test_textvariable_rejects_plain_values() {
        let (ctx, _tk, root) = setup();
        let err = ctx
            .create("Label", &root, Options::new().with("textvariable", "oops"))
            .unwrap_err();
        assert!(matches!(err, AppError::Core(CoreError::Validation { .. })));
    }

    #[test]
    fn test_relief_validated() {
        let (ctx, tk, root) = setup();
        let frame = ctx.create("Frame", &root, Options::new()).unwrap();
        frame.set("relief", "sunken").unwrap();
        assert_eq!(host(&tk, &frame).stored("relief"), Some(OptionValue::from("sunken")));

        let err = frame.set("relief", "wobbly").unwrap_err();
        assert!(matches!(err, AppError::Core(CoreError::Validation { .. })));
    }

    #[test]
    fn test_anchor_sets_alignment() {
        let (ctx, tk, root) = setup();
        let label = ctx
            .create("Label", &root, Options::new().with("anchor", "nw"))
            .unwrap();
        assert_eq!(host(&tk, &label).align(), (Align::Start, Align::Start));
    }

    #[test]
    fn test_width_depends_on_class() {
        let (ctx, tk, root) = setup();
        let label = ctx
            .create("Label", &root, Options::new().with("width", 12))
            .unwrap();
        assert_eq!(host(&tk, &label).stored("width_chars"), Some(OptionValue::Int(12)));
        assert_eq!(host(&tk, &label).size_request(), (None, None));

        label.set("height", 3).unwrap();
        assert_eq!(host(&tk, &label).stored("height_chars"), Some(OptionValue::Int(3)));
        assert_eq!(host(&tk, &label).size_request(), (None, None));

        let button = ctx
            .create("Button", &root, Options::new().with("width", 8).with("height", 40))
            .unwrap();
        assert_eq!(host(&tk, &button).stored("width_chars"), Some(OptionValue::Int(8)));
        assert_eq!(host(&tk, &button).size_request(), (None, Some(40)));

        let frame = ctx
            .create("Frame", &root, Options::new().with("width", 100).with("height", 50))
            .unwrap();
        assert_eq!(host(&tk, &frame).size_request(), (Some(100), Some(50)));
    }

    #[test]
    fn test_state_controls_sensitivity() {
        let (ctx, tk, root) = setup();
        let entry = ctx
            .create("Entry", &root, Options::new().with("state", "readonly"))
            .unwrap();
        assert_eq!(host(&tk, &entry).stored("sensitive"), Some(OptionValue::Bool(true)));
        assert_eq!(host(&tk, &entry).stored("editable"), Some(OptionValue::Bool(false)));

        entry.set("state", "disabled").unwrap();
        assert_eq!(host(&tk, &entry).stored("sensitive"), Some(OptionValue::Bool(false)));
    }

    #[test]
    fn test_missing_image() {
        let (ctx, _tk, root) = setup();
        let err = ctx
            .create(
                "Label",
                &root,
                Options::new().with("image", "/nonexistent/picture.png"),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Core(CoreError::MissingResource { .. })
        ));
        // The half-built label is gone again
        assert_eq!(ctx.widget_count(), 1);
    }

    #[test]
    fn test_command_must_be_callable() {
        let (ctx, _tk, root) = setup();
        let button = ctx.create("Button", &root, Options::new()).unwrap();
        let err = button.set("command", 42).unwrap_err();
        assert!(matches!(
            err,
            AppError::Core(CoreError::InvalidCallable { found: "Int", .. })
        ));
    }

    #[test]
    fn test_scale_range() {
        let (ctx, tk, root) = setup();
        let scale = ctx
            .create(
                "Scale",
                &root,
                Options::new()
                    .with("from_", 0)
                    .with("to", 10.5)
                    .with("orient", "horizontal"),
            )
            .unwrap();
        let host = host(&tk, &scale);
        assert_eq!(host.stored("lower"), Some(OptionValue::Float(0.0)));
        assert_eq!(host.stored("upper"), Some(OptionValue::Float(10.5)));
        assert_eq!(host.stored("orientation"), Some(OptionValue::from("horizontal")));
    }
}
