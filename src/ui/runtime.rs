use crate::config::Config;
use crate::connect::ConnectedView;
use crate::publisher::StatePublisher;
use crate::store::{FeedAction, FeedStore};
use crate::ui::events::{AppEvent, EventHandler};
use crate::ui::feed_list::FeedListView;
use crate::ui::footer::Footer;
use crate::ui::header::HeaderView;
use crate::ui::layout::layout_regions;
use crate::ui::terminal_guard::setup_terminal;
use crossterm::event::{KeyCode, KeyModifiers};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::Duration;

pub fn run(store: Arc<dyn FeedStore>, config: &Config) -> anyhow::Result<()> {
    let (mut terminal, guard) = setup_terminal()?;
    let tick_rate = Duration::from_millis(config.ui.tick_rate_ms);
    let events = EventHandler::new(tick_rate);

    let wake = events.sender();
    let publisher = StatePublisher::builder(store)
        .settings(config.bridge.clone())
        .waker(move || {
            let _ = wake.send(AppEvent::StoreChanged);
        })
        .build()?;

    let header = HeaderView.connect().mount(&publisher);
    let feed_list = FeedListView.connect().mount(&publisher);
    let footer = Rc::new(RefCell::new(Footer::new()));
    let _errors = {
        let footer = Rc::clone(&footer);
        publisher.side_effect().subscribe(move |event| {
            if let Some(event) = event {
                footer.borrow_mut().show_error(event.effect.message());
            }
        })
    };

    if config.store.refresh_on_start {
        publisher.dispatch(FeedAction::Refresh { force_load: false });
    }

    loop {
        terminal.draw(|frame| {
            let (header_area, body, footer_area) = layout_regions(frame.area());
            frame.render_widget(header.output().as_ref().clone(), header_area);
            feed_list.output().draw(frame, body);
            frame.render_widget(footer.borrow().widget(footer_area), footer_area);
        })?;

        match events.next(tick_rate) {
            Ok(AppEvent::Key(key)) => {
                let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c');
                if key.code == KeyCode::Char('q') || ctrl_c {
                    break;
                }
                footer.borrow_mut().clear();
                if !feed_list.output().handle_key(key.code) {
                    tracing::trace!(code = ?key.code, "unbound key");
                }
            }
            Ok(AppEvent::Tick) | Ok(AppEvent::StoreChanged) | Ok(AppEvent::Resize(..)) => {}
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        publisher.pump();
    }

    publisher.close();
    drop(guard);
    Ok(())
}
