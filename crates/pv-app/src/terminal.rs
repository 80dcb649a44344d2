//! Line-oriented terminal presentation
//!
//! Reads commands from stdin, turns them into controller calls and prints
//! whatever the controller exposes. No state lives here.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use pv_core::events::{events, handler_from_fn, EventBus};
use pv_core::{
    GalleryController, Item, ItemStats, LoadState, PageDirection, PhotoSource, ViewSnapshot,
    ViewSubscriber,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::commands::{Command, HELP};

/// Whether the input loop keeps going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Logs every view change at debug level
pub struct ViewLogger;

impl ViewSubscriber for ViewLogger {
    fn on_view_change(&self, snapshot: &ViewSnapshot) {
        debug!(
            state = ?snapshot.load_state,
            query = %snapshot.search_query,
            page = snapshot.page.page,
            total_pages = snapshot.page.total_pages,
            shown = snapshot.page.items.len(),
            "view changed"
        );
    }
}

/// One-line notices built from controller events, printed after a command
#[derive(Clone, Default)]
pub struct StatusLine {
    notices: Arc<Mutex<Vec<String>>>,
}

impl StatusLine {
    /// Subscribe to the load and paging events on `bus`
    pub fn attach(bus: &EventBus) -> Self {
        let status = Self::default();

        let notices = status.notices.clone();
        bus.subscribe::<events::PhotosLoaded>(handler_from_fn(move |event| {
            if let Some(loaded) = event.as_any().downcast_ref::<events::PhotosLoaded>() {
                notices.lock().push(format!(
                    "Loaded {} photos from {} at {}.",
                    loaded.item_count,
                    loaded.source_name,
                    loaded.loaded_at.format("%H:%M:%S UTC")
                ));
            }
        }));

        // The cause stays in the log
        let notices = status.notices.clone();
        bus.subscribe::<events::PhotosLoadFailed>(handler_from_fn(move |event| {
            if let Some(failed) = event.as_any().downcast_ref::<events::PhotosLoadFailed>() {
                notices.lock().push(format!("Load from {} failed.", failed.source_name));
            }
        }));

        bus.subscribe::<events::PageChanged>(handler_from_fn(|event| {
            if let Some(changed) = event.as_any().downcast_ref::<events::PageChanged>() {
                debug!(page = changed.page, total_pages = changed.total_pages, "page changed");
            }
        }));

        status
    }

    /// Take every notice collected since the last call
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.notices.lock())
    }
}

pub struct Terminal<W: Write> {
    controller: Arc<GalleryController>,
    source: Arc<dyn PhotoSource>,
    status: StatusLine,
    out: W,
}

impl<W: Write> Terminal<W> {
    pub fn new(controller: Arc<GalleryController>, source: Arc<dyn PhotoSource>, out: W) -> Self {
        let status = StatusLine::attach(controller.event_bus());
        Self {
            controller,
            source,
            status,
            out,
        }
    }

    /// Load once, then serve commands from stdin until quit or EOF
    pub async fn run(&mut self) -> Result<()> {
        self.handle(Command::Reload).await?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            if self.handle(Command::parse(&line)).await? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    pub async fn handle(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Next => self.page(PageDirection::Next)?,
            Command::Previous => self.page(PageDirection::Previous)?,
            Command::Search(query) => {
                // Unchanged queries print nothing; before a load, say why
                let changed = self.controller.on_query_changed(&query).is_some();
                if changed || self.controller.load_state() != LoadState::Loaded {
                    self.render_view()?;
                }
            }
            Command::Show(id) => match self.controller.on_item_selected(id) {
                Some(item) => render_detail(&mut self.out, &item)?,
                None => writeln!(self.out, "No photo with id {}.", id)?,
            },
            Command::Stats => render_stats(&mut self.out, &self.controller.stats())?,
            Command::Reload => {
                writeln!(self.out, "Loading photos...")?;
                if self.controller.load(self.source.as_ref()).await.is_none() {
                    writeln!(self.out, "A load is already in progress.")?;
                }
                self.render_view()?;
            }
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Empty => {}
            Command::Unknown(input) => {
                writeln!(self.out, "Unknown command: {}", input)?;
                writeln!(self.out, "{}", HELP)?;
            }
        }

        for notice in self.status.drain() {
            writeln!(self.out, "{}", notice)?;
        }
        Ok(Flow::Continue)
    }

    fn page(&mut self, direction: PageDirection) -> Result<()> {
        if self.controller.on_page_requested(direction).is_some() {
            self.render_view()?;
        } else {
            let edge = match direction {
                PageDirection::Next => "last",
                PageDirection::Previous => "first",
            };
            writeln!(self.out, "Already on the {} page.", edge)?;
        }
        Ok(())
    }

    fn render_view(&mut self) -> Result<()> {
        render_snapshot(&mut self.out, &self.controller.snapshot())?;
        Ok(())
    }
}

/// Print the banner, cards and paging line for a snapshot
pub fn render_snapshot(out: &mut impl Write, snapshot: &ViewSnapshot) -> std::io::Result<()> {
    match &snapshot.load_state {
        LoadState::Initial => {
            return writeln!(out, "No photos loaded. Type `reload` to fetch them.");
        }
        LoadState::Loading => return writeln!(out, "Loading photos..."),
        LoadState::Error { message } => {
            return writeln!(out, "{} Type `reload` to retry.", message);
        }
        LoadState::Loaded => {}
    }

    let page = &snapshot.page;
    if !snapshot.search_query.is_empty() {
        writeln!(
            out,
            "Search \"{}\": {} match{}",
            snapshot.search_query,
            page.total_items,
            if page.total_items == 1 { "" } else { "es" }
        )?;
    }

    if page.is_empty() {
        writeln!(out, "No matching photos found.")?;
    }
    for item in &page.items {
        writeln!(out, "  #{:<5} {}", item.id, item.title)?;
        writeln!(out, "         {}", item.description)?;
    }

    let mut paging = format!("Page {} / {}", page.page, page.total_pages);
    if page.has_previous() {
        paging.push_str("  [p] previous");
    }
    if page.has_next() {
        paging.push_str("  [n] next");
    }
    writeln!(out, "{}", paging)
}

pub fn render_detail(out: &mut impl Write, item: &Item) -> std::io::Result<()> {
    writeln!(out, "{}", item.title)?;
    writeln!(out, "{}", item.description)?;
    writeln!(out, "Image: {}", item.url)?;
    writeln!(out, "Thumbnail: {}", item.thumbnail_url)?;
    writeln!(out, "Image ID: {} | Album ID: {}", item.id, item.album_id)
}

pub fn render_stats(out: &mut impl Write, stats: &ItemStats) -> std::io::Result<()> {
    writeln!(out, "{} photos in {} albums", stats.total_items, stats.total_albums)?;
    for (album_id, count) in &stats.items_per_album {
        writeln!(out, "  album {:<4} {}", album_id, count)?;
    }
    Ok(())
}
