use std::time::Duration;

use anyhow::Result;
use tracing::info;

use carousel_core::sim::{SimControl, SimPage, SimSlider, SimSliderSpec};
use carousel_core::{AppConfig, Control, SliderEngine, Slide, Viewport};

const CONTAINER_ID: &str = "demo-slider";

pub struct DemoOptions {
    pub slides: usize,
    pub width: f64,
    pub gap: f64,
    pub seconds: u64,
    pub finite: bool,
    pub autoplay: bool,
}

pub async fn run(config: &AppConfig, options: DemoOptions) -> Result<()> {
    let page = SimPage::new();
    let slider = page.add_slider(
        CONTAINER_ID,
        SimSliderSpec {
            slides: options.slides,
            gap: options.gap,
            viewport_width: options.width,
            scroll: config.smooth_scroll.clone(),
            ..Default::default()
        },
    );

    let mut slider_config = config.slider.clone();
    if options.finite {
        slider_config.infinite_scroll = false;
    }
    if options.autoplay {
        slider_config.auto_scroll = true;
    }
    let autoplay = slider_config.auto_scroll;

    let engine = SliderEngine::new(CONTAINER_ID, &page, slider_config)?;
    engine.run(&page);

    let geometry = engine.geometry();
    println!(
        "Running {} slides at {:.1}px (gap {:.1}px) in a {:.1}px viewport for {}s\n",
        slider.slides.len(),
        geometry.slide_width,
        geometry.gap(),
        geometry.inner_width,
        options.seconds
    );

    let mut status = tokio::time::interval(Duration::from_millis(500));
    let mut clicks = tokio::time::interval(Duration::from_secs(1));
    // Skip the first tick (fires immediately)
    clicks.tick().await;

    let deadline = tokio::time::sleep(Duration::from_secs(options.seconds));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,

            result = tokio::signal::ctrl_c() => {
                result?;
                info!("Interrupted");
                break;
            }

            _ = status.tick() => print_status(&engine, &slider),

            _ = clicks.tick(), if !autoplay => {
                if let Some(right) = &slider.right {
                    page.click(right);
                }
            }
        }
    }

    engine.stop_auto_scroll();
    println!("\nDone.");
    Ok(())
}

fn print_status(engine: &SliderEngine, slider: &SimSlider) {
    let edges = engine.edge_state();
    let width = slider
        .slides
        .first()
        .map(|s| s.bounding_width())
        .unwrap_or(0.0);

    println!(
        "offset {:>8.1} / {:<8.1} slide {:>6.1}px  begin={:<5} end={:<5} left={:<3} right={:<3}",
        slider.viewport.scroll_offset(),
        slider.viewport.scroll_extent(),
        width,
        edges.at_begin,
        edges.at_end,
        control_state(slider.left.as_deref()),
        control_state(slider.right.as_deref()),
    );
}

fn control_state(control: Option<&SimControl>) -> &'static str {
    match control {
        Some(c) if c.is_disabled() => "off",
        Some(_) => "on",
        None => "-",
    }
}
