use std::rc::Rc;

use web_sys::Event;
use yew::prelude::*;
use yew_hooks::prelude::*;

use crate::config::SiteConfig;
use crate::dom;
use crate::scroll;

#[derive(Properties, PartialEq)]
pub struct ScrollToTopProps {
    pub config: Rc<SiteConfig>,
}

#[function_component(ScrollToTop)]
pub fn scroll_to_top(props: &ScrollToTopProps) -> Html {
    let visible = use_state_eq(|| false);

    let refresh = {
        let visible = visible.clone();
        let config = props.config.clone();
        move || {
            if let Ok(window) = dom::window() {
                let effects = scroll::effects_at(
                    dom::scroll_offset(&window),
                    dom::viewport_height(&window),
                    config.scroll_top_threshold_px,
                    config.parallax_speed,
                );
                visible.set(effects.show_scroll_top);
            }
        }
    };

    {
        let refresh = refresh.clone();
        use_effect_once(move || {
            // page may be restored mid-scroll
            refresh();
            || ()
        });
    }

    use_event_with_window("scroll", move |_: Event| refresh());

    let onclick = Callback::from(|_: MouseEvent| {
        if let Ok(window) = dom::window() {
            dom::scroll_window_to_top(&window);
        }
    });

    html! {
        <div class={classes!("scroll-to-top", (*visible).then(|| "visible"))} {onclick}>
            <svg class="w-6 h-6" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M5 10l7-7m0 0l7 7m-7-7v18"></path>
            </svg>
        </div>
    }
}
