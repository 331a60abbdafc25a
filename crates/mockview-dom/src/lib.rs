//! Headless DOM for driving page scripts without a browser.
//!
//! HTML is parsed with `scraper`, rebuilt as live nodes inside a `boa`
//! context, and advanced through the browser load lifecycle on demand.

mod console;
mod dom;
mod handles;
mod location;
mod parse;
mod prelude;
mod runtime;
mod value;

pub use console::{ConsoleLevel, ConsoleMessage, CONSOLE_TARGET};
pub use dom::{
    default_user_agent, DomOptions, HeadlessDom, LifecycleEvent, LoadPhase, ReadyState,
    ScriptError, ABOUT_BLANK,
};
pub use handles::{Document, Window};
pub use location::LocationParts;
pub use parse::{parse_document, InlineScript, NodeKind, NodeRecord, ParsedDocument};
pub use runtime::RuntimeLimits;
pub use value::ScriptValue;
