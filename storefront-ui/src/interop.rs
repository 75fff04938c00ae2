use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, TouchEvent};

use crate::config::StorefrontConfig;
use crate::controller::Storefront;
use crate::page::PageBinder;
use crate::web::{js_error, read_page_config, BrowserStorage, WebDocument};
use crate::zoom::{ProductZoom, TouchPoint};

/// Name of the global function templates call from the theme button.
pub const THEME_TOGGLE_GLOBAL: &str = "toggleTheme";

/// Event the modal library fires once the dialog is fully hidden.
const MODAL_HIDDEN_EVENT: &str = "hidden.bs.modal";

pub type WebStorefront = Storefront<BrowserStorage, WebDocument>;

/// Run [`boot`] once the DOM is parsed, or right away if it already is.
pub fn start() {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };

    if document.ready_state() != "loading" {
        boot();
        return;
    }

    let on_ready = Closure::wrap(Box::new(move |_e: Event| boot()) as Box<dyn FnMut(Event)>);
    if document
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())
        .is_err()
    {
        // Nothing is logging yet; booting early beats never booting.
        boot();
    }
    on_ready.forget();
}

/// Read the page config, start console logging and mount the storefront.
pub fn boot() {
    let Some(document) = WebDocument::current() else {
        return;
    };

    let config = read_page_config(document.inner());
    let level = config
        .as_ref()
        .map(StorefrontConfig::log_level)
        .unwrap_or(log::Level::Info);
    wasm_logger::init(wasm_logger::Config::new(level));

    let config = config.unwrap_or_else(|e| {
        log::error!("Invalid storefront config, using defaults: {}", e);
        StorefrontConfig::default()
    });

    mount(document, config);
}

/// Build the controller over `document` and wire every listener.
pub fn mount(document: WebDocument, config: StorefrontConfig) -> Rc<RefCell<WebStorefront>> {
    let storefront = Rc::new(RefCell::new(Storefront::new(
        BrowserStorage::local(),
        document,
        config,
    )));

    expose_theme_toggle(storefront.clone());

    let mut binder = WebBinder {
        storefront: storefront.clone(),
    };
    let result = storefront.borrow_mut().initialize(&mut binder);
    if let Err(e) = result {
        log::error!("Initialization error: {}", e);
    }

    storefront
}

fn with_storefront(storefront: &Rc<RefCell<WebStorefront>>, f: impl FnOnce(&mut WebStorefront)) {
    match storefront.try_borrow_mut() {
        Ok(mut storefront) => f(&mut storefront),
        Err(_) => log::warn!("Storefront busy, dropping event"),
    }
}

fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    if let Err(e) =
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    {
        log::error!("Failed to add {} listener: {}", event, js_error(e));
    }
    // Leak the closure to keep it alive (it is cleaned up when the page unloads)
    closure.forget();
}

fn expose_theme_toggle(storefront: Rc<RefCell<WebStorefront>>) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let toggle = Closure::wrap(Box::new(move || {
        with_storefront(&storefront, |storefront| {
            storefront.toggle_theme();
        });
    }) as Box<dyn FnMut()>);

    if let Err(e) = js_sys::Reflect::set(
        &window,
        &JsValue::from_str(THEME_TOGGLE_GLOBAL),
        toggle.as_ref(),
    ) {
        log::error!("Failed to expose {}: {}", THEME_TOGGLE_GLOBAL, js_error(e));
    }
    toggle.forget();
}

fn touch_points(event: &Event) -> Vec<TouchPoint> {
    let Some(event) = event.dyn_ref::<TouchEvent>() else {
        return Vec::new();
    };
    let touches = event.touches();
    (0..touches.length())
        .filter_map(|index| touches.item(index))
        .map(|touch| TouchPoint::new(f64::from(touch.page_x()), f64::from(touch.page_y())))
        .collect()
}

/// Attaches real DOM listeners that call back into the shared controller.
struct WebBinder {
    storefront: Rc<RefCell<WebStorefront>>,
}

impl PageBinder<web_sys::Element> for WebBinder {
    fn bind_product_zoom(&mut self, zoom: ProductZoom<web_sys::Element>) {
        let image = zoom.image().clone();
        let zoom = Rc::new(RefCell::new(zoom));

        let on_click = zoom.clone();
        listen(&image, "click", move |_e| on_click.borrow_mut().click());

        let on_start = zoom.clone();
        listen(&image, "touchstart", move |e| {
            on_start.borrow_mut().touch_start(&touch_points(&e));
        });

        let on_move = zoom.clone();
        listen(&image, "touchmove", move |e| {
            if on_move.borrow_mut().touch_move(&touch_points(&e)) {
                e.prevent_default();
            }
        });

        listen(&image, "touchend", move |_e| zoom.borrow_mut().touch_end());
    }

    fn bind_add_to_cart(&mut self, button: web_sys::Element) {
        let storefront = self.storefront.clone();
        let target = button.clone();
        listen(&button, "click", move |_e| {
            with_storefront(&storefront, |s| s.handle_add_to_cart_click(&target));
        });
    }

    fn bind_clear_cart(&mut self, button: web_sys::Element) {
        let storefront = self.storefront.clone();
        listen(&button, "click", move |_e| {
            with_storefront(&storefront, |s| s.clear_cart());
        });
    }

    fn bind_scroll_anchor(&mut self, anchor: web_sys::Element, href: String) {
        let storefront = self.storefront.clone();
        listen(&anchor, "click", move |e| {
            e.prevent_default();
            with_storefront(&storefront, |s| s.handle_anchor_click(&href));
        });
    }

    fn bind_cart_icon(&mut self, icon: web_sys::Element) {
        let storefront = self.storefront.clone();
        listen(&icon, "click", move |_e| {
            with_storefront(&storefront, |s| s.handle_cart_icon_click());
        });
    }

    fn bind_modal_hidden(&mut self, modal: web_sys::Element) {
        let storefront = self.storefront.clone();
        listen(&modal, MODAL_HIDDEN_EVENT, move |_e| {
            with_storefront(&storefront, |s| s.handle_cart_modal_hidden());
        });
    }
}
