//! Page-parallel, order-preserving translation pipeline.
//!
//! Every selected page becomes one task on a dedicated rayon pool. Tasks
//! open their own source handle, run [`process_page`], and send
//! `(index, fragment)` back over a crossbeam channel. The calling thread
//! places fragments into slots indexed by page, so the assembled document
//! is always in page order regardless of completion order. A task that
//! errors or panics is replaced by an error fragment; the run continues.

mod options;
mod output;
mod page;

pub use options::{PageSelection, TranslateOptions};
pub use output::write_output_atomic;
pub use page::{process_page, PageContext};

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crossbeam_channel::unbounded;
use rayon::ThreadPoolBuilder;

use crate::error::{Error, Result};
use crate::model::{Document, PageFragment};
use crate::render::page_error_fragment;
use crate::source::SourceOpener;
use crate::translate::Translator;

/// Translate every selected page of a document.
pub fn translate_document<O>(
    opener: &O,
    translator: &dyn Translator,
    options: &TranslateOptions,
) -> Result<Document>
where
    O: SourceOpener,
{
    translate_document_with_progress(opener, translator, options, |_, _| {})
}

/// Translate every selected page, reporting `(done, total)` as pages finish.
///
/// `progress` runs on the calling thread, once per completed page, in
/// completion order.
pub fn translate_document_with_progress<O, F>(
    opener: &O,
    translator: &dyn Translator,
    options: &TranslateOptions,
    mut progress: F,
) -> Result<Document>
where
    O: SourceOpener,
    F: FnMut(u32, u32),
{
    let info = opener.info()?;
    let indices = options.pages.indices(info.page_count);
    let total = indices.len() as u32;

    log::info!(
        "Translating {} of {} pages ({} -> {}) with the {} translator",
        total,
        info.page_count,
        options.source_lang,
        options.target_lang,
        translator.name()
    );

    let pool = ThreadPoolBuilder::new()
        .num_threads(options.threads.unwrap_or(0))
        .thread_name(|i| format!("transpdf-page-{}", i))
        .build()
        .map_err(|e| Error::Other(format!("failed to start worker pool: {}", e)))?;

    let ctx = PageContext {
        translator,
        source_lang: &options.source_lang,
        target_lang: &options.target_lang,
        layout: &options.layout,
    };

    let mut slots: Vec<Option<PageFragment>> = vec![None; indices.len()];
    let (tx, rx) = unbounded::<(usize, PageFragment)>();

    pool.in_place_scope(|scope| {
        for (slot, &index) in indices.iter().enumerate() {
            let tx = tx.clone();
            let ctx = &ctx;
            scope.spawn(move |_| {
                let fragment = run_page(opener, index, ctx);
                // The receiver outlives the scope
                let _ = tx.send((slot, fragment));
            });
        }
        drop(tx);

        let mut done = 0;
        for (slot, fragment) in rx.iter() {
            slots[slot] = Some(fragment);
            done += 1;
            progress(done, total);
        }
    });

    let pages: Vec<PageFragment> = slots
        .into_iter()
        .zip(&indices)
        .map(|(fragment, &index)| {
            fragment.unwrap_or_else(|| page_error_fragment(index, "page task did not complete"))
        })
        .collect();

    let document = Document::new(info, pages);
    log::info!(
        "Finished: {} paragraphs, {} images, {} links, {} failed pages",
        document.stats.paragraph_count,
        document.stats.image_count,
        document.stats.link_count,
        document.stats.failed_pages
    );
    Ok(document)
}

/// Run one page task, turning errors and panics into an error fragment.
fn run_page<O: SourceOpener>(opener: &O, index: u32, ctx: &PageContext<'_>) -> PageFragment {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let source = opener.open()?;
        process_page(&source, index, ctx)
    }));

    match outcome {
        Ok(Ok(fragment)) => fragment,
        Ok(Err(e)) => {
            log::error!("Error processing page {}: {}", index + 1, e);
            page_error_fragment(index, &e.to_string())
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            log::error!("Page {} task panicked: {}", index + 1, message);
            page_error_fragment(index, &message)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "page task panicked".to_string()
    }
}
