use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use web_sys::Window;

use crate::browser::{
    on_click, on_window, BrowserDocument, IntersectionVisibility, LocalStore, NavigatorClipboard,
    SelectionCopy, TimeoutTimer, WindowViewport,
};
use crate::components::back_to_top::BackToTop;
use crate::components::collapsibles::Collapsibles;
use crate::components::email_copier::EmailCopier;
use crate::components::scroll_progress::ScrollProgress;
use crate::components::section_highlighter::{SectionHighlighter, VisibilityOptions};
use crate::components::smooth_scroll::{ScrollOutcome, SmoothScrollLinks};
use crate::config::EnhanceConfig;
use crate::dom::{DomNode, Init};
use crate::error::EnhanceError;
use crate::theme::ThemeToggle;

/// Attaches every enhancement to the already-rendered page.
///
/// Each one starts independently; a missing element or a failure in one
/// never stops the others.
pub fn start() {
    // Everything is let through until the configured level is known.
    let logger_ready = console_log::init_with_level(log::Level::Trace).is_ok();
    let config = EnhanceConfig::load();
    if logger_ready {
        log::set_max_level(config.log_level().to_level_filter());
    }

    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        log::warn!("No document; enhancements disabled");
        return;
    };
    let doc = BrowserDocument::new(document.clone());

    report("theme toggle", start_theme(&doc, &window, &config));
    report("smooth scrolling", start_smooth_scroll(&doc, &config));
    report("section highlighter", start_section_highlighter(&doc, &config));
    report("back to top", start_back_to_top(&doc, &window, &config));
    report("email copy", start_email_copier(&doc, &window, &document, &config));
    report("scroll progress", start_scroll_progress(&doc, &window, &config));
    report("collapsibles", start_collapsibles(&doc, &config));
}

fn report(name: &str, result: Result<(), EnhanceError>) {
    if let Err(e) = result {
        log::error!("Failed to start {}: {}", name, e);
    }
}

fn active<T>(name: &str, init: Init<T>) -> Option<T> {
    match init {
        Init::Active(component) => Some(component),
        Init::NotApplicable(what) => {
            log::debug!("Skipping {}: {} not found", name, what);
            None
        }
    }
}

fn start_theme(
    doc: &BrowserDocument,
    window: &Window,
    config: &EnhanceConfig,
) -> Result<(), EnhanceError> {
    let store = LocalStore::new(window.clone());
    let Some(toggle) = active("theme toggle", ThemeToggle::init(doc, store, &config.theme)) else {
        return Ok(());
    };
    let toggle = Rc::new(toggle);
    let button = toggle.button().clone();
    on_click(&button, move |_| {
        let theme = toggle.click();
        log::debug!("Theme switched to {}", theme.as_str());
    })
}

fn start_smooth_scroll(doc: &BrowserDocument, config: &EnhanceConfig) -> Result<(), EnhanceError> {
    let Some(links) = active("smooth scrolling", SmoothScrollLinks::init(doc, &config.nav)) else {
        return Ok(());
    };
    let links = Rc::new(links);
    for link in links.links() {
        let links = links.clone();
        let doc = doc.clone();
        let href_source = link.clone();
        on_click(link, move |ev| {
            let href = href_source.attribute("href").unwrap_or_default();
            if links.click(&href, &doc) == ScrollOutcome::Smooth {
                ev.prevent_default();
            }
        })?;
    }
    Ok(())
}

fn start_section_highlighter(
    doc: &BrowserDocument,
    config: &EnhanceConfig,
) -> Result<(), EnhanceError> {
    let Some(highlighter) = active(
        "section highlighter",
        SectionHighlighter::init(doc, &config.nav),
    ) else {
        return Ok(());
    };
    let highlighter = Rc::new(highlighter);
    let observer = IntersectionVisibility::new(&VisibilityOptions::from(&config.nav), {
        let highlighter = highlighter.clone();
        move |entries| {
            if let Some(id) = highlighter.on_visibility(&entries) {
                log::trace!("Active section: {}", id);
            }
        }
    })?;
    highlighter.observe_with(&observer);
    Ok(())
}

fn start_back_to_top(
    doc: &BrowserDocument,
    window: &Window,
    config: &EnhanceConfig,
) -> Result<(), EnhanceError> {
    let viewport = WindowViewport::new(window.clone());
    let Some(back) = active(
        "back to top",
        BackToTop::init(doc, viewport, &config.back_to_top),
    ) else {
        return Ok(());
    };
    let back = Rc::new(back);
    // A reload can restore a scrolled position before any scroll event fires.
    back.refresh();

    let button = back.button().clone();
    on_window(window, "scroll", true, {
        let back = back.clone();
        move |_| {
            back.refresh();
        }
    })?;
    on_click(&button, move |_| back.click())
}

fn start_email_copier(
    doc: &BrowserDocument,
    window: &Window,
    document: &web_sys::Document,
    config: &EnhanceConfig,
) -> Result<(), EnhanceError> {
    let copier = EmailCopier::init(
        doc,
        NavigatorClipboard::new(window.clone()),
        SelectionCopy::new(document.clone()),
        TimeoutTimer,
        &config.email,
    );
    let Some(copier) = active("email copy", copier) else {
        return Ok(());
    };
    let copier = Rc::new(copier);
    let button = copier.button().clone();
    on_click(&button, move |_| {
        let copier = copier.clone();
        spawn_local(async move {
            let path = copier.copy().await;
            log::debug!("Email copied via {:?}", path);
        });
    })
}

fn start_scroll_progress(
    doc: &BrowserDocument,
    window: &Window,
    config: &EnhanceConfig,
) -> Result<(), EnhanceError> {
    let viewport = WindowViewport::new(window.clone());
    let progress = ScrollProgress::init(
        doc,
        viewport,
        &config.nav,
        &config.progress,
        &config.back_to_top,
    )?;
    let Some(progress) = active("scroll progress", progress) else {
        return Ok(());
    };
    let progress = Rc::new(progress);
    on_window(window, "scroll", true, {
        let progress = progress.clone();
        move |_| {
            progress.update();
        }
    })?;
    on_window(window, "resize", false, move |_| {
        progress.update();
    })
}

fn start_collapsibles(doc: &BrowserDocument, config: &EnhanceConfig) -> Result<(), EnhanceError> {
    let Some(cards) = active("collapsibles", Collapsibles::init(doc, &config.collapsibles)?) else {
        return Ok(());
    };
    let cards = Rc::new(cards);
    for (index, card) in cards.cards().iter().enumerate() {
        let cards = cards.clone();
        on_click(card.heading(), move |_| {
            cards.toggle(index);
        })?;
    }
    Ok(())
}
