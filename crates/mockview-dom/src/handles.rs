//! Borrowed views over a live document, mirroring `document` and `window`.

use mockview_common::DomError;

use crate::dom::{HeadlessDom, ReadyState};
use crate::prelude::js_string;
use crate::value::ScriptValue;

pub struct Document<'a> {
    dom: &'a mut HeadlessDom,
}

impl<'a> Document<'a> {
    pub(crate) fn new(dom: &'a mut HeadlessDom) -> Self {
        Self { dom }
    }
}

impl Document<'_> {
    pub fn ready_state(&self) -> ReadyState {
        self.dom.ready_state()
    }

    pub fn title(&mut self) -> String {
        self.dom.title()
    }

    pub fn url(&mut self) -> String {
        self.dom.url()
    }

    pub fn body_text(&mut self) -> Result<String, DomError> {
        let value = self
            .dom
            .evaluate("document.body ? document.body.textContent : ''")?;
        expect_string(value).map(Option::unwrap_or_default)
    }

    /// `textContent` of the first match, `None` when nothing matches.
    pub fn text_content(&mut self, selector: &str) -> Result<Option<String>, DomError> {
        self.query(selector, "el.textContent")
    }

    pub fn inner_html(&mut self, selector: &str) -> Result<Option<String>, DomError> {
        self.query(selector, "el.innerHTML")
    }

    pub fn attribute(&mut self, selector: &str, name: &str) -> Result<Option<String>, DomError> {
        self.query(selector, &format!("el.getAttribute({})", js_string(name)?))
    }

    pub fn count(&mut self, selector: &str) -> Result<usize, DomError> {
        let value = self.dom.evaluate(&format!(
            "document.querySelectorAll({}).length",
            js_string(selector)?
        ))?;
        value
            .as_f64()
            .map(|n| n as usize)
            .ok_or_else(|| DomError::Decode(format!("expected a count, got {}", value.type_name())))
    }

    pub fn evaluate(&mut self, source: &str) -> Result<ScriptValue, DomError> {
        self.dom.evaluate(source)
    }

    fn query(&mut self, selector: &str, read: &str) -> Result<Option<String>, DomError> {
        let value = self.dom.evaluate(&format!(
            "(function (el) {{ return el ? {read} : undefined; }})(document.querySelector({}))",
            js_string(selector)?
        ))?;
        expect_string(value)
    }
}

pub struct Window<'a> {
    dom: &'a mut HeadlessDom,
}

impl<'a> Window<'a> {
    pub(crate) fn new(dom: &'a mut HeadlessDom) -> Self {
        Self { dom }
    }
}

impl Window<'_> {
    /// Read a global by name.
    pub fn get(&mut self, name: &str) -> Result<ScriptValue, DomError> {
        self.dom
            .evaluate(&format!("globalThis[{}]", js_string(name)?))
    }

    pub fn evaluate(&mut self, source: &str) -> Result<ScriptValue, DomError> {
        self.dom.evaluate(source)
    }

    pub fn location_href(&mut self) -> String {
        self.dom.url()
    }

    pub fn user_agent(&mut self) -> Result<String, DomError> {
        let value = self.dom.evaluate("navigator.userAgent")?;
        expect_string(value).map(Option::unwrap_or_default)
    }

    pub fn pending_timers(&mut self) -> usize {
        self.dom.pending_timers()
    }

    pub fn run_timers(&mut self) -> usize {
        self.dom.run_timers()
    }
}

fn expect_string(value: ScriptValue) -> Result<Option<String>, DomError> {
    match value {
        ScriptValue::String(s) => Ok(Some(s)),
        ScriptValue::Undefined | ScriptValue::Null => Ok(None),
        other => Err(DomError::Decode(format!(
            "expected a string, got {}",
            other.type_name()
        ))),
    }
}
