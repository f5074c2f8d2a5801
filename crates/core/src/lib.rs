//! The tekton design-token pipeline.
//!
//! A request flows registry → access → resolver → WCAG audit → CSS:
//! [`registry::ThemeRegistry`] hands out validated themes,
//! [`access`] filters them by license, [`resolver`] turns token references
//! into concrete values, [`wcag`] audits declared colour pairs and [`css`]
//! emits stylesheets from resolved tokens and [`patterns`] layout tokens.
//! [`pipeline::Pipeline`] wires these together for hosts.

pub mod access;
pub mod color;
pub mod config;
pub mod css;
pub mod error;
pub mod patterns;
pub mod pipeline;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod wcag;

pub use error::{Error, ErrorKind};
pub use pipeline::{LayoutRequest, LayoutStylesheet, Pipeline, ThemeStylesheet};
pub use registry::{LazyRegistry, ThemeRegistry};
