//! Constructors for the built-in classes
//!
//! ```rust
//! use tkshim_app::prelude::*;
//! use tkshim_app::widgets;
//!
//! let (ctx, _host) = AppContext::headless(ShimConfig::default());
//! let root = ctx.tk().unwrap();
//! let hello = widgets::label(&root, Options::new().with("text", "Hello")).unwrap();
//! hello.pack(PackOptions::new()).unwrap();
//! ```

use tkshim_core::Options;

use crate::error::Result;
use crate::widget::Widget;

pub fn frame(master: &Widget, options: Options) -> Result<Widget> {
    master.create_child("Frame", options)
}

pub fn label(master: &Widget, options: Options) -> Result<Widget> {
    master.create_child("Label", options)
}

pub fn button(master: &Widget, options: Options) -> Result<Widget> {
    master.create_child("Button", options)
}

pub fn entry(master: &Widget, options: Options) -> Result<Widget> {
    master.create_child("Entry", options)
}

pub fn checkbutton(master: &Widget, options: Options) -> Result<Widget> {
    master.create_child("Checkbutton", options)
}

pub fn scale(master: &Widget, options: Options) -> Result<Widget> {
    master.create_child("Scale", options)
}
