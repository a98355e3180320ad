#![forbid(unsafe_code)]

//! The DexLora brochure site.
//!
//! - [`content`]: founders, services, projects and contact channels.
//! - [`route`]: the four pages and the navbar.
//! - [`page`]: page composition, effect mounts and nominal layout.
//! - [`html`]: static HTML rendering with escaped text.
//! - [`site`]: [`Site`], the running page with its effect hosts and form.
//! - [`export`]: JSON export of the site content.

pub mod content;
pub mod export;
pub mod html;
pub mod page;
pub mod route;
pub mod site;

pub use export::SiteData;
pub use html::{FormView, HtmlRenderer};
pub use page::{Block, Mount, Page, PageLayout, Placement, Section};
pub use route::{NavItem, Route};
pub use site::Site;
