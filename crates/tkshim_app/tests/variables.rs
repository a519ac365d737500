mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::{app, host_of};
use tkshim_app::platform::HostSignal;
use tkshim_app::prelude::*;
use tkshim_app::widgets;

#[test]
fn test_equal_set_notifies_nobody() {
    let count = IntVar::new(5);
    let log = Rc::new(RefCell::new(Vec::new()));
    let _first = {
        let log = log.clone();
        count.subscribe(move || log.borrow_mut().push("first"))
    };
    let _second = {
        let log = log.clone();
        count.subscribe(move || log.borrow_mut().push("second"))
    };

    assert!(!count.set(5));
    assert!(log.borrow().is_empty());

    assert!(count.set(6));
    assert_eq!(*log.borrow(), ["first", "second"]);
}

#[test]
fn test_disposed_subscriber_is_not_called() {
    let flag = BooleanVar::new(false);
    let calls = Rc::new(Cell::new(0));
    let sub = {
        let calls = calls.clone();
        flag.subscribe(move || calls.set(calls.get() + 1))
    };

    flag.set(true);
    assert!(sub.dispose());
    flag.set(false);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_user_edit_flows_to_display_without_looping() {
    let (_ctx, host, root) = app(ShimConfig::default());
    let text = StringVar::new(String::new());
    let label = widgets::label(&root, Options::new().with("textvariable", &text)).unwrap();
    let entry = widgets::entry(&root, Options::new().with("textvariable", &text)).unwrap();

    let notified = Rc::new(Cell::new(0));
    let _watch = {
        let notified = notified.clone();
        text.subscribe(move || notified.set(notified.get() + 1))
    };

    host_of(&host, &entry).user_edit("typed").unwrap();

    assert_eq!(text.get(), "typed");
    assert_eq!(
        host_of(&host, &label).stored("label"),
        Some(OptionValue::from("typed"))
    );
    assert_eq!(notified.get(), 1);

    // Programmatic changes reach both widgets, again exactly once
    text.set("from code".to_string());
    assert_eq!(
        host_of(&host, &entry).stored("text"),
        Some(OptionValue::from("from code"))
    );
    assert_eq!(
        host_of(&host, &label).stored("label"),
        Some(OptionValue::from("from code"))
    );
    assert_eq!(notified.get(), 2);
}

#[test]
fn test_checkbutton_and_scale_edits() {
    let (_ctx, host, root) = app(ShimConfig::default());
    let on = BooleanVar::new(false);
    let level = DoubleVar::new(1.0);
    let check = widgets::checkbutton(&root, Options::new().with("variable", &on)).unwrap();
    let scale = widgets::scale(&root, Options::new().with("variable", &level)).unwrap();
    assert_eq!(
        host_of(&host, &check).stored("active"),
        Some(OptionValue::Bool(false))
    );

    host_of(&host, &check).user_edit(true).unwrap();
    assert!(on.get());

    host_of(&host, &scale).user_edit(7.5).unwrap();
    assert_eq!(level.get(), 7.5);

    level.set(2.0);
    assert_eq!(
        host_of(&host, &scale).stored("value"),
        Some(OptionValue::Float(2.0))
    );
}

#[test]
fn test_scale_bound_to_nan_settles() {
    let (_ctx, host, root) = app(ShimConfig::default());
    let level = DoubleVar::new(1.0);
    let scale = widgets::scale(&root, Options::new().with("variable", &level)).unwrap();
    let notified = Rc::new(Cell::new(0));
    let _sub = {
        let notified = notified.clone();
        level.subscribe(move || notified.set(notified.get() + 1))
    };

    assert!(level.set(f64::NAN));
    assert!(level.get().is_nan());
    assert_eq!(notified.get(), 1);
    assert!(matches!(
        host_of(&host, &scale).stored("value"),
        Some(OptionValue::Float(v)) if v.is_nan()
    ));

    // The host echoes NaN back; nothing changes a second time.
    host_of(&host, &scale).user_edit(f64::NAN).unwrap();
    assert_eq!(notified.get(), 1);
}

#[test]
fn test_int_variable_shown_as_text() {
    let (_ctx, host, root) = app(ShimConfig::default());
    let clicks = IntVar::new(0);
    let label = widgets::label(&root, Options::new().with("textvariable", &clicks)).unwrap();

    clicks.set(3);
    assert_eq!(
        host_of(&host, &label).stored("label"),
        Some(OptionValue::from("3"))
    );
    assert_eq!(label.display_value(), Some(OptionValue::from("3")));
}

#[test]
fn test_rebinding_drops_the_old_variable() {
    let (_ctx, host, root) = app(ShimConfig::default());
    let first = StringVar::new("one".to_string());
    let second = StringVar::new("two".to_string());
    let entry = widgets::entry(&root, Options::new().with("textvariable", &first)).unwrap();

    entry.set("textvariable", &second).unwrap();
    assert_eq!(host_of(&host, &entry).handler_count(HostSignal::Changed), 1);

    first.set("ignored".to_string());
    assert_eq!(
        host_of(&host, &entry).stored("text"),
        Some(OptionValue::from("two"))
    );

    host_of(&host, &entry).user_edit("edited").unwrap();
    assert_eq!(first.get(), "ignored");
    assert_eq!(second.get(), "edited");
    assert!(entry
        .cget("textvariable")
        .unwrap()
        .as_variable()
        .is_some_and(|v| v.ptr_eq(&VariableRef::from(&second))));
}
