mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::{app, content_of, host_of};
use tkshim_app::platform::{HostEvent, HostSignal};
use tkshim_app::prelude::*;
use tkshim_app::widgets;

#[test]
fn test_command_fires_on_click() {
    let (_ctx, host, root) = app(ShimConfig::default());
    let clicks = Rc::new(Cell::new(0));
    let command = {
        let clicks = clicks.clone();
        Callback::new(move || clicks.set(clicks.get() + 1))
    };
    let button = widgets::button(
        &root,
        Options::new().with("text", "Go").with("command", command),
    )
    .unwrap();

    let button_host = host_of(&host, &button);
    button_host.click();
    button_host.click();
    assert_eq!(clicks.get(), 2);

    // Replacing the command keeps a single handler
    button.set("command", Callback::new(|| {})).unwrap();
    assert_eq!(button_host.handler_count(HostSignal::Activate), 1);

    button.set("command", OptionValue::None).unwrap();
    button_host.click();
    assert_eq!(clicks.get(), 2);
    assert_eq!(button_host.handler_count(HostSignal::Activate), 0);
}

#[test]
fn test_bind_filters_by_button() {
    let (_ctx, host, root) = app(ShimConfig::default());
    let label = widgets::label(&root, Options::new()).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));

    for tag in ["a", "b"] {
        let seen = seen.clone();
        assert!(label.bind("<Button-1>", move |event: &HostEvent| {
            seen.borrow_mut().push((tag, event.x));
        }));
    }
    let label_host = host_of(&host, &label);
    label_host.emit(HostSignal::ButtonPress, &HostEvent::button(1, 4.0, 2.0));
    label_host.emit(HostSignal::ButtonPress, &HostEvent::button(3, 9.0, 9.0));
    assert_eq!(*seen.borrow(), [("a", 4.0), ("b", 4.0)]);

    assert_eq!(label.unbind("<Button-1>"), 2);
    assert_eq!(label_host.handler_count(HostSignal::ButtonPress), 0);
    assert_eq!(label.unbind("<Button-1>"), 0);
}

#[test]
fn test_unsupported_sequence_binds_nothing() {
    let (_ctx, host, root) = app(ShimConfig::default());
    let label = widgets::label(&root, Options::new()).unwrap();
    assert!(!label.bind("<Double-Button-1>", |_| {}));
    assert_eq!(host_of(&host, &label).handler_count(HostSignal::ButtonPress), 0);
}

#[test]
fn test_destroy_releases_everything() {
    let (ctx, host, root) = app(ShimConfig::default());
    let text = StringVar::new("start".to_string());
    let frame = widgets::frame(&root, Options::new()).unwrap();
    frame.pack(PackOptions::new()).unwrap();
    let entry = widgets::entry(&frame, Options::new().with("textvariable", &text)).unwrap();
    entry.pack(PackOptions::new()).unwrap();
    entry.bind("<FocusIn>", |_| {});
    let before = ctx.widget_count();

    let entry_host = host_of(&host, &entry);
    let frame_host = host_of(&host, &frame);
    frame.destroy();

    assert!(frame.is_destroyed());
    assert!(entry.is_destroyed());
    assert_eq!(ctx.widget_count(), before - 2);
    assert!(ctx.widget(entry.id()).is_none());
    assert!(entry_host.is_destroyed());
    assert!(frame_host.content().is_none());
    assert_eq!(entry_host.handler_count(HostSignal::Changed), 0);
    assert_eq!(entry_host.handler_count(HostSignal::FocusIn), 0);

    // The variable no longer drives the dead entry
    text.set("later".to_string());
    assert_eq!(entry_host.stored("text"), Some(OptionValue::from("start")));

    assert_eq!(ctx.mode_of(&frame), GeometryMode::None);
    assert!(ctx.geometry().children(root.id()).is_empty());
    assert!(content_of(&host, &root).unwrap().is_empty());

    assert!(matches!(
        frame.configure(Options::new()),
        Err(AppError::Destroyed(_))
    ));
    assert!(matches!(
        widgets::label(&frame, Options::new()),
        Err(AppError::Destroyed(_))
    ));

    // Second destroy is a no-op
    frame.destroy();
}

#[test]
fn test_children_in_creation_order() {
    let (_ctx, _host, root) = app(ShimConfig::default());
    let a = widgets::label(&root, Options::new()).unwrap();
    let b = widgets::button(&root, Options::new()).unwrap();
    let c = widgets::frame(&root, Options::new()).unwrap();
    let ids: Vec<_> = root.children().iter().map(Widget::id).collect();
    assert_eq!(ids, vec![a.id(), b.id(), c.id()]);
    assert!(c.master().unwrap().ptr_eq(&root));
}

#[test]
fn test_main_loop() {
    let (ctx, host, _root) = app(ShimConfig::default());
    ctx.mainloop();
    assert!(host.is_running());
    assert_eq!(host.loops_run(), 1);
    ctx.quit();
    assert!(!host.is_running());
}

#[test]
fn test_dump_shows_tree() {
    let (_ctx, host, root) = app(ShimConfig::default());
    root.set("title", "Demo").unwrap();
    let frame = widgets::frame(&root, Options::new()).unwrap();
    frame.pack(PackOptions::new().fill(Fill::Both).expand(true)).unwrap();
    let hello = widgets::label(&frame, Options::new().with("text", "Hello")).unwrap();
    hello.grid(GridOptions::cell(0, 1)).unwrap();

    let dump = host.dump();
    let lines: Vec<&str> = dump.lines().collect();
    assert!(lines[0].starts_with("window #1 title=\"Demo\""));
    assert!(lines[1].trim_start().starts_with("vbox"));
    assert!(lines[2].contains("frame") && lines[2].contains("[start expand=true fill=true"));
    assert!(lines[3].trim_start().starts_with("grid"));
    assert!(lines[4].contains("label=\"Hello\"") && lines[4].contains("[cell row=0 column=1"));
}
