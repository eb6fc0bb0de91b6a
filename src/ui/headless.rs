//! Line-oriented front end for scripts and CI: no terminal takeover.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::connect::ConnectedView;
use crate::publisher::StatePublisher;
use crate::store::{FeedAction, FeedStore};
use crate::ui::summary::SummaryView;

/// Pump the store for `ticks` ticks. Prints the summary once up front and
/// again after every tick that changed the state; side effects print as
/// `error:` lines.
pub fn run_headless(
    store: Arc<dyn FeedStore>,
    config: &Config,
    ticks: u32,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let tick_rate = Duration::from_millis(config.ui.tick_rate_ms);
    let publisher = StatePublisher::builder(store)
        .settings(config.bridge.clone())
        .build()?;
    let summary = SummaryView.connect().mount(&publisher);

    writeln!(out, "{}", summary.output())?;
    let mut printed = summary.render_count();

    if config.store.refresh_on_start {
        publisher.dispatch(FeedAction::Refresh { force_load: false });
    }

    for _ in 0..ticks {
        publisher.wait_and_pump(tick_rate);
        if summary.render_count() != printed {
            printed = summary.render_count();
            writeln!(out, "{}", summary.output())?;
        }
        for effect in publisher.drain_side_effects() {
            writeln!(out, "error: {}", effect.message())?;
        }
    }

    publisher.close();
    Ok(())
}
