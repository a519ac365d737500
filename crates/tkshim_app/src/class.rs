//! Widget classes
//!
//! A [`WidgetClass`] is registered once per class name with the
//! [`AppContext`](crate::AppContext). It bundles everything the layer needs to
//! know about a kind of widget: the host class to instantiate, the option
//! table, which host property shows the widget's value, and whether the user
//! can edit that value.

use tkshim_core::OptionTable;
use tkshim_layout::Nesting;

use crate::widget::Widget;

/// Part a class plays in the widget tree
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClassRole {
    /// Leaf control
    #[default]
    Control,
    /// Widget that holds children (frame)
    Container,
    /// Toplevel window
    Window,
}

/// Host property that displays a widget's value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayProperty {
    pub name: &'static str,
    /// Convert values to their text form before pushing them
    pub as_text: bool,
}

/// Capability set of one widget class
pub struct WidgetClass {
    host_class: String,
    table: OptionTable<Widget>,
    display: Option<DisplayProperty>,
    editable: bool,
    role: ClassRole,
}

impl WidgetClass {
    /// Class named after its option table, instantiated as `host_class`
    pub fn new(host_class: impl Into<String>, table: OptionTable<Widget>) -> Self {
        Self {
            host_class: host_class.into(),
            table,
            display: None,
            editable: false,
            role: ClassRole::Control,
        }
    }

    /// Property that bound variables are pushed into
    pub fn display(mut self, name: &'static str, as_text: bool) -> Self {
        self.display = Some(DisplayProperty { name, as_text });
        self
    }

    /// The user can change the displayed value; bound variables follow it
    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    pub fn role(mut self, role: ClassRole) -> Self {
        self.role = role;
        self
    }

    pub fn name(&self) -> &str {
        self.table.class()
    }

    pub fn host_class(&self) -> &str {
        &self.host_class
    }

    pub fn table(&self) -> &OptionTable<Widget> {
        &self.table
    }

    pub fn display_property(&self) -> Option<DisplayProperty> {
        self.display
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn class_role(&self) -> ClassRole {
        self.role
    }

    /// How this class behaves as a geometry master
    pub fn nesting(&self) -> Nesting {
        match self.role {
            ClassRole::Window => Nesting::Toplevel,
            ClassRole::Control | ClassRole::Container => Nesting::Nested,
        }
    }
}

impl std::fmt::Debug for WidgetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetClass")
            .field("name", &self.name())
            .field("host_class", &self.host_class)
            .field("options", &self.table.len())
            .field("display", &self.display)
            .field("editable", &self.editable)
            .field("role", &self.role)
            .finish()
    }
}
