#![allow(dead_code)]

use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use tkshim_app::platform::headless::{HeadlessContainer, HeadlessWidget};
use tkshim_app::platform::{HostContainer, HostWidget};
use tkshim_app::prelude::*;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::util::SubscriberInitExt;

/// Headless application with its main window
pub fn app(config: ShimConfig) -> (AppContext, HeadlessToolkit, Widget) {
    let (ctx, host) = AppContext::headless(config);
    let root = ctx.tk().expect("main window");
    (ctx, host, root)
}

/// Recording host control behind a widget
pub fn host_of(host: &HeadlessToolkit, widget: &Widget) -> Rc<HeadlessWidget> {
    host.widget(widget.host().host_id())
        .expect("widget was created by this toolkit")
}

/// Recording container a master currently shows
pub fn content_of(host: &HeadlessToolkit, master: &Widget) -> Option<Rc<HeadlessContainer>> {
    let content = host_of(host, master).content()?;
    host.container(content.container_id())
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut lines) = self.0.lock() {
            lines.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return the warnings it logged
pub fn capture_warnings<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::WARN)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();

    let result = {
        let _guard = subscriber.set_default();
        f()
    };
    let bytes = buffer.0.lock().map(|b| b.clone()).unwrap_or_default();
    let lines = String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_string)
        .collect();
    (result, lines)
}
