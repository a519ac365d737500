//! Scene files
//!
//! A scene describes a widget tree in TOML:
//!
//! ```toml
//! [settings]                 # optional, same keys as ShimConfig
//! option_policy = "lenient"
//!
//! [[variable]]
//! name = "name"
//! kind = "string"            # string | int | boolean | double
//! value = "world"
//!
//! [[widget]]
//! name = "root"
//! class = "Tk"               # widgets without a parent must be windows
//! options = { title = "Demo" }
//!
//! [[widget]]
//! name = "hello"
//! class = "Label"
//! parent = "root"
//! options = { textvariable = "$name" }   # `$` refers to a variable
//! pack = { side = "left" }               # or grid = {..} / place = {..}
//! ```

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use tkshim_app::core::UnknownOption;
use tkshim_app::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub settings: ShimConfig,
    #[serde(rename = "variable")]
    pub variables: Vec<VariableSpec>,
    #[serde(rename = "widget")]
    pub widgets: Vec<WidgetSpec>,
}

#[derive(Debug, Deserialize)]
pub struct VariableSpec {
    pub name: String,
    pub kind: VariableKind,
    #[serde(default)]
    pub value: Option<toml::Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    String,
    Int,
    Boolean,
    Double,
}

#[derive(Debug, Deserialize)]
pub struct WidgetSpec {
    pub name: String,
    pub class: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub options: toml::Table,
    #[serde(default)]
    pub pack: Option<toml::Table>,
    #[serde(default)]
    pub grid: Option<toml::Table>,
    #[serde(default)]
    pub place: Option<toml::Table>,
}

type Variables = IndexMap<String, VariableRef>;

/// A scene realized on the headless host
pub struct BuiltScene {
    pub ctx: AppContext,
    pub host: HeadlessToolkit,
    pub widgets: IndexMap<String, Widget>,
    /// Unknown options, with the name of the widget they were given to
    pub warnings: Vec<(String, UnknownOption)>,
    // Keeps variables alive for as long as the scene
    _variables: Variables,
}

impl Scene {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Create every variable and widget, in file order
    pub fn build(&self, config: ShimConfig) -> Result<BuiltScene> {
        let (ctx, host) = AppContext::headless(config);

        let mut variables = Variables::new();
        for spec in &self.variables {
            let variable = spec
                .create()
                .with_context(|| format!("variable '{}'", spec.name))?;
            variables.insert(spec.name.clone(), variable);
        }

        let mut widgets: IndexMap<String, Widget> = IndexMap::new();
        let mut warnings = Vec::new();
        for spec in &self.widgets {
            if widgets.contains_key(&spec.name) {
                bail!("Duplicate widget name '{}'", spec.name);
            }
            let widget = spec
                .create(&ctx, &widgets)
                .with_context(|| format!("widget '{}'", spec.name))?;
            let options = table_options(&spec.options, &variables)
                .with_context(|| format!("widget '{}'", spec.name))?;
            let report = widget
                .configure(options)
                .with_context(|| format!("widget '{}'", spec.name))?;
            warnings.extend(report.warnings.into_iter().map(|w| (spec.name.clone(), w)));
            spec.apply_geometry(&widget, &variables)
                .with_context(|| format!("widget '{}'", spec.name))?;

            tracing::debug!(widget = %spec.name, class = %spec.class, "scene widget built");
            widgets.insert(spec.name.clone(), widget);
        }

        Ok(BuiltScene {
            ctx,
            host,
            widgets,
            warnings,
            _variables: variables,
        })
    }
}

impl VariableSpec {
    fn create(&self) -> Result<VariableRef> {
        let variable = match self.kind {
            VariableKind::String => VariableRef::from(&StringVar::new(String::new())),
            VariableKind::Int => VariableRef::from(&IntVar::new(0)),
            VariableKind::Boolean => VariableRef::from(&BooleanVar::new(false)),
            VariableKind::Double => VariableRef::from(&DoubleVar::new(0.0)),
        };
        if let Some(value) = &self.value {
            variable.set(&option_value(value, &Variables::new())?)?;
        }
        Ok(variable)
    }
}

impl WidgetSpec {
    fn create(&self, ctx: &AppContext, widgets: &IndexMap<String, Widget>) -> Result<Widget> {
        let Some(parent) = &self.parent else {
            return Ok(match self.class.as_str() {
                "Tk" => ctx.tk()?,
                "Toplevel" => ctx.toplevel()?,
                other => bail!("'{other}' is not a window class and needs a parent"),
            });
        };
        let master = widgets
            .get(parent)
            .with_context(|| format!("Unknown parent '{parent}'"))?;
        Ok(ctx.create(&self.class, master, Options::new())?)
    }

    fn apply_geometry(&self, widget: &Widget, variables: &Variables) -> Result<()> {
        match (&self.pack, &self.grid, &self.place) {
            (None, None, None) => {}
            (Some(pack), None, None) => widget.pack_with(&table_options(pack, variables)?)?,
            (None, Some(grid), None) => widget.grid_with(&table_options(grid, variables)?)?,
            (None, None, Some(place)) => widget.place_with(&table_options(place, variables)?)?,
            _ => bail!("Only one of pack, grid and place may be given"),
        }
        Ok(())
    }
}

fn table_options(table: &toml::Table, variables: &Variables) -> Result<Options> {
    let mut options = Options::new();
    for (key, value) in table {
        let value = option_value(value, variables).with_context(|| format!("option '{key}'"))?;
        options.insert(key.as_str(), value);
    }
    Ok(options)
}

fn option_value(value: &toml::Value, variables: &Variables) -> Result<OptionValue> {
    Ok(match value {
        toml::Value::String(s) => match s.strip_prefix('$') {
            Some(name) => variables
                .get(name)
                .cloned()
                .map(OptionValue::Variable)
                .with_context(|| format!("Unknown variable '${name}'"))?,
            None => OptionValue::Str(s.clone()),
        },
        toml::Value::Integer(i) => OptionValue::Int(*i),
        toml::Value::Float(f) => OptionValue::Float(*f),
        toml::Value::Boolean(b) => OptionValue::Bool(*b),
        toml::Value::Array(items) => OptionValue::List(
            items
                .iter()
                .map(|item| option_value(item, variables))
                .collect::<Result<_>>()?,
        ),
        other => bail!("Unsupported value {other}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"
        [[variable]]
        name = "count"
        kind = "int"
        value = 3

        [[widget]]
        name = "root"
        class = "Tk"
        options = { title = "Test" }

        [[widget]]
        name = "counter"
        class = "Label"
        parent = "root"
        options = { textvariable = "$count", colour = "red" }
        pack = { side = "left" }
    "#;

    #[test]
    fn test_build_scene() {
        let scene = Scene::from_toml_str(SCENE).unwrap();
        let built = scene.build(scene.settings.clone()).unwrap();

        assert_eq!(built.widgets.len(), 2);
        let counter = &built.widgets["counter"];
        assert_eq!(counter.display_value(), Some(OptionValue::from("3")));
        assert!(counter.placement().is_some());

        assert_eq!(built.warnings.len(), 1);
        assert_eq!(built.warnings[0].0, "counter");
        assert_eq!(built.warnings[0].1.option, "colour");

        let dump = built.host.dump();
        assert!(dump.contains("title=\"Test\""));
        assert!(dump.contains("hbox"));
    }

    #[test]
    fn test_strict_scene_fails() {
        let scene = Scene::from_toml_str(SCENE).unwrap();
        assert!(scene.build(ShimConfig::strict()).is_err());
    }

    #[test]
    fn test_scene_errors() {
        let orphan = r#"
            [[widget]]
            name = "lonely"
            class = "Label"
        "#;
        let scene = Scene::from_toml_str(orphan).unwrap();
        assert!(scene.build(ShimConfig::default()).is_err());

        let unknown_var = r#"
            [[widget]]
            name = "root"
            class = "Tk"
            options = { title = "$missing" }
        "#;
        let scene = Scene::from_toml_str(unknown_var).unwrap();
        assert!(scene.build(ShimConfig::default()).is_err());

        let two_managers = r#"
            [[widget]]
            name = "root"
            class = "Tk"

            [[widget]]
            name = "a"
            class = "Label"
            parent = "root"
            pack = {}
            grid = {}
        "#;
        let scene = Scene::from_toml_str(two_managers).unwrap();
        assert!(scene.build(ShimConfig::default()).is_err());
    }
}
