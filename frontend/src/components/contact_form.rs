use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlTextAreaElement, ScrollLogicalPosition,
};
use yew::prelude::*;

use crate::analytics::{AnalyticsEvent, Tracker};
use crate::config::SiteConfig;
use crate::dom::{self, DomError, ListenerGuard};
use crate::form::state::{ContactFormState, Field, FormSnapshot, SubmissionOutcome, SubmitDecision};
use crate::form::submission;

const SUCCESS_ICON: &str = r#"<svg class="w-6 h-6 inline-block mr-2" fill="none" stroke="currentColor" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M9 12l2 2 4-4m6 2a9 9 0 11-18 0 9 9 0 0118 0z"></path></svg>"#;

pub fn success_markup(message: &str) -> String {
    format!("{} {}", SUCCESS_ICON, message)
}

pub fn submitting_markup(label: &str) -> String {
    format!(r#"<span class="loading"></span> {}"#, label)
}

#[derive(Properties, PartialEq)]
pub struct ContactFormProps {
    pub config: Rc<SiteConfig>,
    #[prop_or_default]
    pub tracker: Tracker,
}

/// Enhances the page's own `#contactForm`: real-time validation, phone
/// formatting, submission feedback and field-focus analytics. Renders nothing.
#[function_component(ContactForm)]
pub fn contact_form(props: &ContactFormProps) -> Html {
    {
        let config = props.config.clone();
        let tracker = props.tracker.clone();
        use_effect_with_deps(
            move |_| {
                let bindings = match FormBindings::install(config, tracker) {
                    Ok(bindings) => bindings,
                    Err(e) => {
                        log::warn!("Contact form enhancements disabled: {}", e);
                        None
                    }
                };
                move || drop(bindings)
            },
            (),
        );
    }

    html! {}
}

/// The page's form controls, looked up once.
struct FormElements {
    form: HtmlFormElement,
    fields: [Option<Element>; 5],
}

impl FormElements {
    fn find(document: &Document, config: &SiteConfig) -> Option<Self> {
        let form = document
            .get_element_by_id(&config.form_id)?
            .dyn_into::<HtmlFormElement>()
            .ok()?;
        let fields = Field::ALL.map(|field| document.get_element_by_id(field.id()));
        Some(Self { form, fields })
    }

    fn control(&self, field: Field) -> Option<&Element> {
        self.fields[field.index()].as_ref()
    }

    fn value(&self, field: Field) -> String {
        let Some(control) = self.control(field) else {
            return String::new();
        };
        if let Some(input) = control.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = control.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else {
            String::new()
        }
    }

    fn set_value(&self, field: Field, value: &str) {
        if let Some(input) = self.control(field).and_then(|c| c.dyn_ref::<HtmlInputElement>()) {
            input.set_value(value);
        }
    }

    fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            name: self.value(Field::Name),
            phone: self.value(Field::Phone),
            email: self.value(Field::Email),
            company: self.value(Field::Company),
            message: self.value(Field::Message),
        }
    }

    /// Shows or hides the error element next to the field. Without one the
    /// field is left untouched.
    fn present_error(&self, field: Field, show: bool, config: &SiteConfig) {
        let Some(control) = self.control(field) else {
            return;
        };
        let message = control
            .parent_element()
            .and_then(|parent| parent.query_selector(&config.error_selector).ok().flatten());
        let Some(message) = message else {
            log::debug!("No {} next to #{}", config.error_selector, field.id());
            return;
        };

        dom::toggle_class(&message, "show", show);
        dom::toggle_class(&message, "hidden", !show);
        dom::toggle_class(control, &config.error_class, show);
    }

    fn submit_button(&self, config: &SiteConfig) -> Option<HtmlButtonElement> {
        self.form
            .query_selector(&config.submit_button_selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
    }
}

struct FormContext {
    elements: FormElements,
    state: RefCell<ContactFormState>,
    config: Rc<SiteConfig>,
    tracker: Tracker,
}

impl FormContext {
    fn present_errors(&self) {
        let state = self.state.borrow();
        for field in Field::ALL.into_iter().filter(|f| f.is_validated()) {
            self.elements
                .present_error(field, state.has_error(field), &self.config);
        }
    }

    fn on_blur(&self, field: Field) {
        let value = self.elements.value(field);
        let mut state = self.state.borrow_mut();
        state.capture_field(field, value);
        state.blur(field);
        self.elements
            .present_error(field, state.has_error(field), &self.config);
    }

    fn on_input(&self, field: Field) {
        let raw = self.elements.value(field);
        let mut state = self.state.borrow_mut();
        let was_errored = state.has_error(field);
        let shown = state.input(field, &raw);
        if shown != raw {
            self.elements.set_value(field, &shown);
        }
        if was_errored && !state.has_error(field) {
            self.elements.present_error(field, false, &self.config);
        }
    }

    fn on_focus(&self, target: Option<Element>) {
        let Some(target) = target else {
            return;
        };
        if matches!(target.tag_name().as_str(), "INPUT" | "TEXTAREA") {
            let name = target.get_attribute("name").unwrap_or_default();
            self.tracker.track(AnalyticsEvent::field_focus(&name));
        }
    }

    fn on_submit(self: &Rc<Self>) {
        let decision = {
            let mut state = self.state.borrow_mut();
            state.capture(self.elements.snapshot());
            state.begin_submit()
        };

        match decision {
            SubmitDecision::Busy => log::debug!("Submission already in flight, ignoring submit"),
            SubmitDecision::Invalid { first } => {
                self.present_errors();
                log::debug!("Contact form invalid, first error on #{}", first.id());
                if let Some(control) = self.elements.control(first) {
                    dom::scroll_into_view(control, ScrollLogicalPosition::Center);
                    if let Some(control) = control.dyn_ref::<HtmlElement>() {
                        dom::ok_or_debug(control.focus(), "focus");
                    }
                }
            }
            SubmitDecision::Accepted(snapshot) => {
                self.present_errors();
                let button = self.elements.submit_button(&self.config);
                let original_label = button.as_ref().map(|b| b.inner_html());
                if let Some(button) = &button {
                    button.set_disabled(true);
                    button.set_inner_html(&submitting_markup(&self.config.submitting_label));
                }

                let ctx = Rc::clone(self);
                spawn_local(async move {
                    let result = submission::submit(snapshot, ctx.config.submit_delay_ms).await;
                    let outcome = ctx.state.borrow_mut().finish_submit(result);
                    match outcome {
                        SubmissionOutcome::Succeeded => {
                            ctx.show_success();
                            ctx.elements.form.reset();
                        }
                        SubmissionOutcome::Failed(reason) => {
                            log::error!("Form submission error: {}", reason);
                            ctx.alert_failure();
                        }
                    }
                    if let (Some(button), Some(label)) = (button, original_label) {
                        button.set_disabled(false);
                        button.set_inner_html(&label);
                    }
                });
            }
        }
    }

    fn alert_failure(&self) {
        let alerted = dom::window().and_then(|window| {
            window
                .alert_with_message(&self.config.failure_alert)
                .map_err(DomError::from)
        });
        dom::ok_or_debug(alerted, "failure alert");
    }

    /// Reuses the form's `.success-message` or creates it as the first child.
    fn success_element(&self) -> Result<Element, DomError> {
        let form = &self.elements.form;
        if let Some(existing) = form.query_selector(".success-message")? {
            return Ok(existing);
        }
        let element = dom::document()?.create_element("div")?;
        element.set_class_name("success-message");
        form.insert_before(&element, form.first_child().as_ref())?;
        Ok(element)
    }

    fn show_success(self: &Rc<Self>) {
        let element = match self.success_element() {
            Ok(element) => element,
            Err(e) => {
                log::warn!("Success message not shown: {}", e);
                return;
            }
        };

        element.set_inner_html(&success_markup(&self.config.success_message));
        dom::toggle_class(&element, "show", true);
        dom::scroll_into_view(&element, ScrollLogicalPosition::Center);

        let ctx = Rc::clone(self);
        let timeout = Timeout::new(self.config.success_hide_ms, move || {
            ctx.state.borrow_mut().hide_success();
            dom::toggle_class(&element, "show", false);
        });
        timeout.forget();
    }
}

struct FormBindings {
    _listeners: Vec<ListenerGuard>,
}

impl FormBindings {
    fn install(config: Rc<SiteConfig>, tracker: Tracker) -> Result<Option<Self>, DomError> {
        let document = dom::document()?;
        let Some(elements) = FormElements::find(&document, &config) else {
            log::debug!("No #{} on this page", config.form_id);
            return Ok(None);
        };

        let ctx = Rc::new(FormContext {
            elements,
            state: RefCell::new(ContactFormState::default()),
            config,
            tracker,
        });
        let mut listeners = Vec::new();

        for field in Field::ALL.into_iter().filter(|f| f.is_validated()) {
            let Some(control) = ctx.elements.control(field) else {
                continue;
            };
            let on_blur = Rc::clone(&ctx);
            listeners.push(ListenerGuard::new(control, "blur", false, move |_| {
                on_blur.on_blur(field)
            })?);
            let on_input = Rc::clone(&ctx);
            listeners.push(ListenerGuard::new(control, "input", false, move |_| {
                on_input.on_input(field)
            })?);
        }

        let form = ctx.elements.form.clone();
        let on_submit = Rc::clone(&ctx);
        listeners.push(ListenerGuard::new(&form, "submit", false, move |e| {
            e.prevent_default();
            on_submit.on_submit();
        })?);

        // focus does not bubble, so listen in the capture phase
        let on_focus = Rc::clone(&ctx);
        listeners.push(ListenerGuard::new(&form, "focus", true, move |e| {
            on_focus.on_focus(e.target().and_then(|t| t.dyn_into::<Element>().ok()))
        })?);

        log::info!("Contact form #{} enhanced", ctx.config.form_id);
        Ok(Some(Self {
            _listeners: listeners,
        }))
    }
}
