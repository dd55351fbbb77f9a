use anyhow::{bail, Result};

use carousel_core::{layout::slide_width, AppConfig};

pub fn run(
    config: &AppConfig,
    width: f64,
    gap: f64,
    per_view: Option<u32>,
    min_width: f64,
) -> Result<()> {
    let per_view = per_view.unwrap_or(config.slider.slides_per_view);
    if per_view == 0 {
        bail!("--per-view must be at least 1");
    }

    let slide = slide_width(width, gap, per_view, min_width);
    let step = slide + gap;

    println!("Viewport:      {:.1}px, {} per view, {:.1}px gap", width, per_view, gap);
    println!("Slide width:   {:.2}px", slide);
    println!(
        "Scroll step:   {:.2}px ({} slide(s) per command)",
        step * config.slider.scroll_number as f64,
        config.slider.scroll_number
    );
    if slide > (width - gap * (per_view as f64 - 1.0)) / per_view as f64 {
        println!("Note: minimum width {:.1}px overrides the fitted width", min_width);
    }

    Ok(())
}
