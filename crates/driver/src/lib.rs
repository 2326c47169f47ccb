//! Session driver for Flutter web apps over the Chrome DevTools Protocol.
//!
//! The driver owns a single browser/page handle and exposes primitive
//! interactions: navigate, click, type, evaluate page-side script, locate
//! elements by the target app's attribute convention or visible text, click
//! by text, screenshot, read the DOM structure, and condition-based idle
//! waits. Application-specific flows build on top of it (see `fw-plur`).

pub mod backend;
pub mod config;
pub mod dom;
pub mod element;
pub mod error;
mod js;
pub mod session;
pub mod testing;

pub use backend::PageBackend;
pub use backend::cdp::CdpBackend;
pub use config::{APP_URL_ENV, DriverConfig, WaitPolicy};
pub use dom::DomNode;
pub use element::{BoundingRect, ElementDescriptor, ElementQuery, Point, TextClick};
pub use error::{DriverError, Result};
pub use session::{RendererInfo, Session, Viewport};
