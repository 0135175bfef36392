use std::rc::Rc;

use log::info;
use yew::prelude::*;

mod analytics;
mod config;
mod dom;
mod scroll;
mod form {
    pub mod state;
    pub mod submission;
    pub mod validation;
}
mod components {
    pub mod contact_form;
    pub mod page_effects;
    pub mod scroll_to_top;
}

use analytics::Tracker;
use components::{
    contact_form::ContactForm,
    page_effects::PageEffects,
    scroll_to_top::ScrollToTop,
};
use config::SiteConfig;
use dom::DomError;

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: Rc<SiteConfig>,
    pub tracker: Tracker,
}

#[function_component]
fn App(props: &AppProps) -> Html {
    html! {
        <>
            <ScrollToTop config={props.config.clone()} />
            <ContactForm config={props.config.clone()} tracker={props.tracker.clone()} />
            <PageEffects config={props.config.clone()} tracker={props.tracker.clone()} />
        </>
    }
}

fn print_welcome_banner() {
    gloo_console::log!(
        "%c포미서비스 AI SNS 마케팅",
        "font-size: 24px; font-weight: bold; color: #1243A6;"
    );
    gloo_console::log!("%c우리와 함께 성장하세요!", "font-size: 14px; color: #F24822;");
    gloo_console::log!("Contact: contact@formi.co.kr");
}

fn mount(config: Rc<SiteConfig>, tracker: Tracker) -> Result<(), DomError> {
    let document = dom::document()?;
    let body = document.body().ok_or(DomError::NoBody)?;

    // the scroll-to-top control is the only thing rendered; it lives at the end of <body>
    let host = document.create_element("div")?;
    host.set_id(&config.effects_host_id);
    body.append_child(&host)?;
    yew::Renderer::<App>::with_root_and_props(host, AppProps { config, tracker }).render();
    Ok(())
}

fn main() {
    console_error_panic_hook::set_once();

    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting page enhancements");
    print_welcome_banner();

    let config = match dom::document() {
        Ok(document) => SiteConfig::load(&document),
        Err(_) => SiteConfig::default(),
    };

    if let Err(e) = mount(Rc::new(config), Tracker::default()) {
        log::error!("Failed to mount page enhancements: {}", e);
    }
}
