//! Lay out a small form with the headless backend and print the result.
//!
//! Run with `RUST_LOG=boden=trace` to watch the coordinator flushes.

use boden::backend::HeadlessUiProvider;
use boden::widgets::{Button, LinearLayoutView, ScrollView, TextView, Window};
use boden::{HorizontalAlignment, Result, UiContext, UiLength, UiMargin, View};
use tracing_subscriber::EnvFilter;

fn print_tree(view: &View, indent: usize) {
    println!(
        "{:indent$}{} {:?}",
        "",
        view.kind().name(),
        view.bounds(),
        indent = indent * 2
    );
    for child in view.child_views() {
        print_tree(&child, indent + 1);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let context = UiContext::new();
    let provider = HeadlessUiProvider::for_context(&context);
    let window = Window::with_provider(&context, provider)?;
    window.set_title("Headless layout");

    let form = LinearLayoutView::new(&context);
    form.set_padding(Some(UiMargin::uniform(UiLength::em(0.5))));

    let title = TextView::with_text(&context, "Layout without a platform");
    let body = TextView::with_text(
        &context,
        "Every character of the headless font is equally wide, so the sizes below are predictable.",
    );
    body.set_horizontal_alignment(HorizontalAlignment::Expand);
    let scroll = ScrollView::new(&context);
    scroll.set_content_view(Some(body.view()))?;
    scroll.set_horizontal_alignment(HorizontalAlignment::Expand);

    let buttons = LinearLayoutView::horizontal(&context);
    buttons.set_horizontal_alignment(HorizontalAlignment::Right);
    for label in ["Cancel", "OK"] {
        let button = Button::with_label(&context, label);
        button.set_margin(UiMargin::symmetric(UiLength::NONE, UiLength::dip(4.0)));
        buttons.add_child(&button)?;
    }

    form.add_child(&title)?;
    form.add_child(&scroll)?;
    form.add_child(&buttons)?;
    window.set_content_view(Some(form.view()))?;

    window.request_auto_size();
    window.request_center();
    let tasks = context.run_until_idle()?;
    tracing::info!(tasks, "layout settled");

    print_tree(&window, 0);
    Ok(())
}
