#![forbid(unsafe_code)]

//! Routes and navigation.

use std::fmt;

use serde::Serialize;

/// One addressable page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Home,
    Projects,
    Services,
    Contact,
    /// Any path that matches no page.
    NotFound,
}

impl Route {
    /// Routable pages in navigation order.
    pub const ALL: [Route; 4] = [Self::Home, Self::Projects, Self::Services, Self::Contact];

    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Projects => "/projects",
            Self::Services => "/services",
            Self::Contact => "/contact",
            Self::NotFound => "/404",
        }
    }

    /// Resolve a request path. Trailing slashes, query strings and fragments
    /// are ignored.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_end_matches('/');
        match path {
            "" => Self::Home,
            "/projects" => Self::Projects,
            "/services" => Self::Services,
            "/contact" => Self::Contact,
            _ => Self::NotFound,
        }
    }

    /// Navbar label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Projects => "Projects",
            Self::Services => "Services",
            Self::Contact => "Contact Us",
            Self::NotFound => "Not Found",
        }
    }

    /// Document `<title>`.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "DexLora Innovations | Building Digital & Smart Solutions for the Future",
            Self::Projects => "Projects | DexLora Innovations",
            Self::Services => "Services | DexLora Innovations",
            Self::Contact => "Contact Us | DexLora Innovations",
            Self::NotFound => "Page Not Found | DexLora Innovations",
        }
    }

    /// `<meta name="description">` content.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Home => {
                "DexLora Innovations builds future-ready digital solutions including websites, apps, games, UI/UX design, and IoT hardware. Partner with us to transform your ideas into reality."
            }
            Self::Projects => {
                "Explore the innovative projects built by DexLora Innovations - from smart mapping platforms to autonomous robots and responsive websites."
            }
            Self::Services => {
                "DexLora Innovations offers custom website development, mobile apps, UI/UX design, IoT solutions, and more. Explore our full range of digital services."
            }
            Self::Contact => {
                "Get in touch with DexLora Innovations for project discussions, collaborations, or support. Reach us via email, Instagram, LinkedIn, or WhatsApp."
            }
            Self::NotFound => "The page you are looking for does not exist.",
        }
    }

    /// Whether the navbar shows this route as a highlighted call to action.
    pub const fn is_call_to_action(self) -> bool {
        matches!(self, Self::Contact)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A navbar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
    pub call_to_action: bool,
}

/// Navbar entries in display order.
pub fn nav_items() -> impl Iterator<Item = NavItem> {
    Route::ALL.into_iter().map(|route| NavItem {
        label: route.label(),
        href: route.path(),
        call_to_action: route.is_call_to_action(),
    })
}
