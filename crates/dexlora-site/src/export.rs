#![forbid(unsafe_code)]

//! JSON export of the site's content, for static hosting pipelines and
//! client-side hydration.

use serde::Serialize;

use crate::content::{
    self, CONTACT_CHANNELS, ContactChannel, FOUNDERS, Founder, PROJECTS, Project, SERVICES, Service,
};
use crate::page::Page;
use crate::route::{NavItem, Route, nav_items};

/// One effect mount as seen by the browser glue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MountData {
    pub name: &'static str,
    pub element: u64,
    pub effect: &'static str,
    pub fixed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageData {
    pub route: Route,
    pub path: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub mounts: Vec<MountData>,
}

impl PageData {
    pub fn of(page: &Page) -> Self {
        Self {
            route: page.route,
            path: page.route.path(),
            title: page.route.title(),
            description: page.route.description(),
            mounts: page
                .mounts()
                .map(|m| MountData {
                    name: m.name,
                    element: m.element.0,
                    effect: m.config.kind().as_str(),
                    fixed: m.placement == crate::page::Placement::Fixed,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyData {
    pub name: &'static str,
    pub tagline: &'static str,
    pub email: &'static str,
    pub phone: &'static str,
    pub location: &'static str,
    pub copyright: &'static str,
}

/// Everything the site shows, in one serializable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteData {
    pub company: CompanyData,
    pub navigation: Vec<NavItem>,
    pub pages: Vec<PageData>,
    pub founders: &'static [Founder],
    pub services: &'static [Service],
    pub projects: &'static [Project],
    pub contact_channels: &'static [ContactChannel],
}

impl SiteData {
    pub fn collect() -> Self {
        Self {
            company: CompanyData {
                name: content::COMPANY,
                tagline: content::TAGLINE,
                email: content::EMAIL,
                phone: content::PHONE,
                location: content::LOCATION,
                copyright: content::COPYRIGHT,
            },
            navigation: nav_items().collect(),
            pages: Route::ALL
                .into_iter()
                .map(|route| PageData::of(&Page::for_route(route)))
                .collect(),
            founders: &FOUNDERS,
            services: &SERVICES,
            projects: &PROJECTS,
            contact_channels: &CONTACT_CHANNELS,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn contact_page_mounts() {
        let data = SiteData::collect();
        let value = serde_json::to_value(&data).expect("serializes");
        let contact = &value["pages"][3];
        assert_eq!(contact["route"], "contact");
        assert_eq!(
            contact["mounts"],
            serde_json::json!([
                {"name": "contact-color-bends", "element": 4, "effect": "color-bends", "fixed": true},
                {"name": "contact-hyperspeed", "element": 3, "effect": "hyperspeed", "fixed": false},
            ])
        );
    }

    #[test]
    fn content_counts() {
        let value = serde_json::to_value(SiteData::collect()).expect("serializes");
        assert_eq!(value["founders"].as_array().map(Vec::len), Some(3));
        assert_eq!(value["services"].as_array().map(Vec::len), Some(9));
        assert_eq!(value["projects"].as_array().map(Vec::len), Some(4));
        assert_eq!(value["contact_channels"].as_array().map(Vec::len), Some(6));
        assert_eq!(value["services"][0]["points"].as_array().map(Vec::len), Some(5));
        assert_eq!(value["navigation"][3]["label"], "Contact Us");
    }
}
