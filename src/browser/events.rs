use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Element, Event, MouseEvent, Window};

use super::dom_error;
use crate::error::EnhanceError;

/// Adds a click listener that lives as long as the page.
pub fn on_click(
    target: &Element,
    handler: impl FnMut(MouseEvent) + 'static,
) -> Result<(), EnhanceError> {
    let closure = Closure::<dyn FnMut(MouseEvent)>::new(handler);
    target
        .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
        .map_err(dom_error)?;
    closure.forget();
    Ok(())
}

/// Adds a window listener that lives as long as the page.
///
/// A passive listener must not call `preventDefault`.
pub fn on_window(
    window: &Window,
    event: &str,
    passive: bool,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), EnhanceError> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    window
        .add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(dom_error)?;
    closure.forget();
    Ok(())
}
