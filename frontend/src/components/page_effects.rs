use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlImageElement, Node, ScrollLogicalPosition, Window};
use yew::prelude::*;

use crate::analytics::{self, AnalyticsEvent, Tracker};
use crate::config::SiteConfig;
use crate::dom::{self, DomError, ListenerGuard, ObserverGuard};
use crate::scroll::{self, Visibility};

const ANIMATED: &str = "animated";
const LOADED: &str = "loaded";

#[derive(Properties, PartialEq)]
pub struct PageEffectsProps {
    pub config: Rc<SiteConfig>,
    #[prop_or_default]
    pub tracker: Tracker,
}

/// Wires the static page: header shadow, parallax, reveal-on-scroll, lazy
/// images, staggered delays, anchor scrolling and CTA/load analytics.
/// Renders nothing.
#[function_component(PageEffects)]
pub fn page_effects(props: &PageEffectsProps) -> Html {
    {
        let config = props.config.clone();
        let tracker = props.tracker.clone();
        use_effect_with_deps(
            move |_| {
                let bindings = PageBindings::install(&config, &tracker);
                move || drop(bindings)
            },
            (),
        );
    }

    html! {}
}

#[derive(Default)]
struct PageBindings {
    listeners: Vec<ListenerGuard>,
    observers: Vec<ObserverGuard>,
}

impl PageBindings {
    fn install(config: &SiteConfig, tracker: &Tracker) -> Self {
        let mut bindings = Self::default();
        let (window, document) = match dom::window().and_then(|w| dom::document().map(|d| (w, d))) {
            Ok(pair) => pair,
            Err(e) => {
                log::warn!("Page effects disabled: {}", e);
                return bindings;
            }
        };

        apply_staggered_delays(&document, config);

        let steps: [(&str, Result<(), DomError>); 6] = [
            ("header/parallax", bindings.bind_scroll_effects(&window, &document, config)),
            ("reveal-on-scroll", bindings.bind_reveal(&window, &document, config)),
            ("lazy images", bindings.bind_lazy_images(&window, &document, config)),
            ("anchor scrolling", bindings.bind_anchors(&document, config)),
            ("CTA tracking", bindings.bind_cta_tracking(&document, config, tracker)),
            ("load timing", bindings.bind_load_timing(&window, &document, tracker)),
        ];
        for (name, result) in steps {
            if let Err(e) = result {
                log::warn!("{} disabled: {}", name, e);
            }
        }

        log::debug!(
            "Page effects installed: {} listeners, {} observers",
            bindings.listeners.len(),
            bindings.observers.len()
        );
        bindings
    }

    fn bind_scroll_effects(
        &mut self,
        window: &Window,
        document: &Document,
        config: &SiteConfig,
    ) -> Result<(), DomError> {
        let header = document.query_selector(&config.header_selector)?;
        let hero = document.get_element_by_id(&config.hero_id);
        if header.is_none() && hero.is_none() {
            log::debug!("No header or hero on this page");
            return Ok(());
        }

        let threshold = config.scroll_top_threshold_px;
        let speed = config.parallax_speed;
        let win = window.clone();
        let mut apply = move || {
            let effects = scroll::effects_at(
                dom::scroll_offset(&win),
                dom::viewport_height(&win),
                threshold,
                speed,
            );
            if let Some(header) = &header {
                dom::toggle_class(header, "shadow-lg", effects.header_shadow);
            }
            if let (Some(hero), Some(offset)) = (&hero, effects.hero_offset) {
                dom::set_style(hero, "transform", &scroll::hero_transform(offset));
            }
        };
        apply();

        self.listeners
            .push(ListenerGuard::new(window, "scroll", false, move |_| apply())?);
        Ok(())
    }

    fn bind_reveal(
        &mut self,
        window: &Window,
        document: &Document,
        config: &SiteConfig,
    ) -> Result<(), DomError> {
        let elements = dom::query_all(document, &config.reveal_selector);
        if elements.is_empty() {
            return Ok(());
        }
        for element in &elements {
            dom::toggle_class(element, "animate-on-scroll", true);
        }

        let threshold = config.reveal_threshold;
        let margin = config.reveal_bottom_margin_px;
        if dom::intersection_observer_supported(window) {
            let win = window.clone();
            let observer = ObserverGuard::new(
                threshold,
                &config.reveal_root_margin(),
                move |entry, _| {
                    if !entry.is_intersecting() {
                        return;
                    }
                    let root_height = entry
                        .root_bounds()
                        .map(|r| r.height())
                        .unwrap_or_else(|| dom::viewport_height(&win) - margin);
                    let reachable = scroll::reachable_threshold(
                        threshold,
                        entry.bounding_client_rect().height(),
                        root_height,
                    );
                    reveal(&entry.target(), entry.intersection_ratio(), reachable);
                },
            )?;
            for element in &elements {
                observer.observe(element);
            }
            self.observers.push(observer);
            return Ok(());
        }

        log::debug!("IntersectionObserver unavailable, revealing on scroll");
        let win = window.clone();
        let mut check = move || {
            let viewport = dom::viewport_height(&win);
            for element in &elements {
                let rect = element.get_bounding_client_rect();
                let ratio = scroll::visible_ratio(rect.top(), rect.height(), viewport, margin);
                let reachable =
                    scroll::reachable_threshold(threshold, rect.height(), viewport - margin);
                reveal(element, ratio, reachable);
            }
        };
        check();
        self.listeners
            .push(ListenerGuard::new(window, "scroll", false, move |_| check())?);
        Ok(())
    }

    fn bind_lazy_images(
        &mut self,
        window: &Window,
        document: &Document,
        config: &SiteConfig,
    ) -> Result<(), DomError> {
        let images = dom::query_all(document, &config.lazy_image_selector);
        if images.is_empty() {
            return Ok(());
        }

        if !dom::intersection_observer_supported(window) {
            images.iter().for_each(load_image);
            return Ok(());
        }

        let observer = ObserverGuard::new(0.0, "0px", |entry, observer| {
            if entry.is_intersecting() {
                let image = entry.target();
                load_image(&image);
                observer.unobserve(&image);
            }
        })?;
        for image in &images {
            observer.observe(image);
        }
        self.observers.push(observer);
        Ok(())
    }

    fn bind_anchors(&mut self, document: &Document, config: &SiteConfig) -> Result<(), DomError> {
        for anchor in dom::query_all(document, &config.anchor_selector) {
            let doc = document.clone();
            let href = anchor.get_attribute("href").unwrap_or_default();
            let listener = ListenerGuard::new(&anchor, "click", false, move |e| {
                e.prevent_default();
                // a bare "#" is not a valid selector
                if let Ok(Some(target)) = doc.query_selector(&href) {
                    dom::scroll_into_view(&target, ScrollLogicalPosition::Start);
                }
            })?;
            self.listeners.push(listener);
        }
        Ok(())
    }

    fn bind_cta_tracking(
        &mut self,
        document: &Document,
        config: &SiteConfig,
        tracker: &Tracker,
    ) -> Result<(), DomError> {
        for button in dom::query_all(document, &config.cta_selector) {
            let tracker = tracker.clone();
            let listener = ListenerGuard::new(&button, "click", false, move |e| {
                let text = e
                    .target()
                    .and_then(|t| t.dyn_into::<Node>().ok())
                    .and_then(|n| n.text_content())
                    .unwrap_or_default();
                tracker.track(AnalyticsEvent::cta_click(&text));
            })?;
            self.listeners.push(listener);
        }
        Ok(())
    }

    fn bind_load_timing(
        &mut self,
        window: &Window,
        document: &Document,
        tracker: &Tracker,
    ) -> Result<(), DomError> {
        // the wasm bundle can finish loading after the page did
        if document.ready_state() == "complete" {
            report_load_time(window, tracker);
            return Ok(());
        }

        let win = window.clone();
        let tracker = tracker.clone();
        let listener = ListenerGuard::new(window, "load", false, move |_| {
            report_load_time(&win, &tracker);
        })?;
        self.listeners.push(listener);
        Ok(())
    }
}

fn reveal(element: &Element, ratio: f64, threshold: f64) {
    let state = Visibility::from_marked(element.class_list().contains(ANIMATED));
    let (_, revealed) = state.observe(ratio, threshold);
    if revealed {
        dom::toggle_class(element, ANIMATED, true);
    }
}

fn load_image(element: &Element) {
    let state = Visibility::from_marked(element.class_list().contains(LOADED));
    if !state.reveal().1 {
        return;
    }
    if let (Some(image), Some(src)) = (
        element.dyn_ref::<HtmlImageElement>(),
        element.get_attribute("data-src"),
    ) {
        image.set_src(&src);
    }
    dom::toggle_class(element, LOADED, true);
}

fn apply_staggered_delays(document: &Document, config: &SiteConfig) {
    for rule in &config.stagger {
        for (index, element) in dom::query_all(document, &rule.selector).iter().enumerate() {
            dom::set_style(
                element,
                "animation-delay",
                &scroll::animation_delay(index, rule.base_delay_secs),
            );
        }
    }
}

fn report_load_time(window: &Window, tracker: &Tracker) {
    let Some(timing) = window.performance().map(|p| p.timing()) else {
        return;
    };
    if let Some(ms) = analytics::load_time_ms(
        timing.navigation_start(),
        timing.dom_content_loaded_event_end(),
    ) {
        log::info!("Page loaded in {}ms", ms);
        tracker.track(AnalyticsEvent::page_load(ms));
    }
}
