#![forbid(unsafe_code)]

//! Page composition.
//!
//! A [`Page`] is an ordered list of [`Section`]s. A section may carry a
//! [`Mount`]: the slot where an effect host lives. Pages may also carry a
//! fixed backdrop mount that covers the viewport regardless of scroll.

use dexlora_core::geometry::Rect;
use dexlora_core::visibility::ElementId;
use dexlora_fx::EffectConfig;

use crate::content::SERVICES;
use crate::route::Route;

/// Height of the fixed navbar; page content starts below it.
pub const NAVBAR_HEIGHT: u32 = 64;

/// Mount element ids. Stable across renders so web glue can find them.
pub mod mounts {
    use dexlora_core::visibility::ElementId;

    pub const FOUNDERS_PARTICLES: ElementId = ElementId(1);
    pub const PROJECTS_PILLAR: ElementId = ElementId(2);
    pub const CONTACT_HYPERSPEED: ElementId = ElementId(3);
    pub const CONTACT_BACKDROP: ElementId = ElementId(4);
}

/// How a mount is positioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Fills its section and scrolls with the document.
    Section,
    /// Covers the viewport at all times.
    Fixed,
}

/// Where an effect host attaches.
#[derive(Debug, Clone, PartialEq)]
pub struct Mount {
    pub element: ElementId,
    /// Value of the `data-effect-host` attribute.
    pub name: &'static str,
    pub config: EffectConfig,
    pub placement: Placement,
}

/// Presentational building blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    /// Logo, company name, tagline, offerings, call-to-action buttons.
    HomeHero,
    Founders,
    /// "Let's Build Something Impactful" with the static message card.
    Connect,
    CallToAction,
    /// "OUR <accent>" heading with an intro paragraph.
    PageHero {
        accent: &'static str,
        intro: &'static str,
    },
    ProjectsGrid,
    ServicesFlow,
    ContactHero,
    ContactChannels,
    ContactForm,
    /// Company blurb, address, email, phone and social links.
    ContactStrip,
    Footer,
    NotFound,
}

impl Block {
    /// Nominal height in CSS pixels at the given viewport height.
    pub fn nominal_height(self, viewport_height: u32) -> u32 {
        match self {
            Self::HomeHero => viewport_height.max(640),
            Self::Founders => 900,
            Self::Connect => 760,
            Self::CallToAction => 480,
            Self::PageHero { .. } => 420,
            Self::ProjectsGrid => 1600,
            Self::ServicesFlow => 260 * SERVICES.len() as u32,
            Self::ContactHero => 600,
            Self::ContactChannels => 420,
            Self::ContactForm => 900,
            Self::ContactStrip => 420,
            Self::Footer => 80,
            Self::NotFound => viewport_height.max(400),
        }
    }

    /// Anchor id rendered on the section element, if any.
    pub const fn anchor(self) -> Option<&'static str> {
        match self {
            Self::Founders => Some("founders"),
            Self::Connect => Some("connect"),
            Self::CallToAction => Some("cta"),
            Self::ContactForm => Some("contact-form"),
            _ => None,
        }
    }
}

/// One section of a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub block: Block,
    pub mount: Option<Mount>,
}

impl Section {
    const fn plain(block: Block) -> Self {
        Self { block, mount: None }
    }

    fn mounted(block: Block, element: ElementId, name: &'static str, config: EffectConfig) -> Self {
        Self {
            block,
            mount: Some(Mount {
                element,
                name,
                config,
                placement: Placement::Section,
            }),
        }
    }
}

const PROJECTS_INTRO: &str = "Discover our portfolio of innovative solutions spanning mapping platforms, autonomous robotics, and web development. Each project showcases our commitment to creativity, technical excellence, and delivering impactful digital experiences.";

const SERVICES_INTRO: &str = "DexLora Innovations delivers end-to-end digital and smart technology solutions. We blend creativity, engineering, and innovation to build scalable products. From websites and applications to IoT hardware and UI/UX design, our services are crafted to support growth, performance, and future readiness. Every solution is tailored to real-world business and technology needs.";

/// A composed page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub route: Route,
    /// Whether the fixed navbar is shown.
    pub navbar: bool,
    pub backdrop: Option<Mount>,
    pub sections: Vec<Section>,
}

impl Page {
    /// Compose the page for `route`.
    pub fn for_route(route: Route) -> Self {
        match route {
            Route::Home => Self {
                route,
                navbar: true,
                backdrop: None,
                sections: vec![
                    Section::plain(Block::HomeHero),
                    Section::mounted(
                        Block::Founders,
                        mounts::FOUNDERS_PARTICLES,
                        "founders-particles",
                        EffectConfig::founders(),
                    ),
                    Section::plain(Block::Connect),
                    Section::plain(Block::CallToAction),
                    Section::plain(Block::Footer),
                ],
            },
            Route::Projects => Self {
                route,
                navbar: true,
                backdrop: None,
                sections: vec![
                    Section::plain(Block::PageHero {
                        accent: "PROJECTS",
                        intro: PROJECTS_INTRO,
                    }),
                    Section::mounted(
                        Block::ProjectsGrid,
                        mounts::PROJECTS_PILLAR,
                        "projects-light-pillar",
                        EffectConfig::projects_hero(),
                    ),
                    Section::plain(Block::Footer),
                ],
            },
            Route::Services => Self {
                route,
                navbar: true,
                backdrop: None,
                sections: vec![
                    Section::plain(Block::PageHero {
                        accent: "SERVICES",
                        intro: SERVICES_INTRO,
                    }),
                    Section::plain(Block::ServicesFlow),
                    Section::plain(Block::ContactStrip),
                ],
            },
            Route::Contact => Self {
                route,
                navbar: true,
                backdrop: Some(Mount {
                    element: mounts::CONTACT_BACKDROP,
                    name: "contact-color-bends",
                    config: EffectConfig::contact_backdrop(),
                    placement: Placement::Fixed,
                }),
                sections: vec![
                    Section::mounted(
                        Block::ContactHero,
                        mounts::CONTACT_HYPERSPEED,
                        "contact-hyperspeed",
                        EffectConfig::contact_hero(),
                    ),
                    Section::plain(Block::ContactChannels),
                    Section::plain(Block::ContactForm),
                    Section::plain(Block::ContactStrip),
                    Section::plain(Block::Footer),
                ],
            },
            Route::NotFound => Self {
                route,
                navbar: true,
                backdrop: None,
                sections: vec![Section::plain(Block::NotFound), Section::plain(Block::Footer)],
            },
        }
    }

    /// Every mount on the page, backdrop first.
    pub fn mounts(&self) -> impl Iterator<Item = &Mount> {
        self.backdrop
            .iter()
            .chain(self.sections.iter().filter_map(|s| s.mount.as_ref()))
    }

    pub fn has_block(&self, block: Block) -> bool {
        self.sections.iter().any(|s| s.block == block)
    }

    /// Stack sections vertically below the navbar.
    pub fn layout(&self, width: u32, viewport_height: u32) -> PageLayout {
        let mut y: i64 = if self.navbar { i64::from(NAVBAR_HEIGHT) } else { 0 };
        let mut sections = Vec::with_capacity(self.sections.len());
        for section in &self.sections {
            let height = section.block.nominal_height(viewport_height);
            let top = i32::try_from(y).unwrap_or(i32::MAX);
            sections.push(Rect::new(0, top, width, height));
            y += i64::from(height);
        }
        PageLayout {
            sections,
            height: u32::try_from(y).unwrap_or(u32::MAX),
        }
    }
}

/// Nominal document rectangles, one per section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    pub sections: Vec<Rect>,
    /// Total document height.
    pub height: u32,
}

impl PageLayout {
    /// Rectangle of the section carrying `element`, if it is a section mount.
    pub fn mount_rect(&self, page: &Page, element: ElementId) -> Option<Rect> {
        page.sections
            .iter()
            .zip(&self.sections)
            .find(|(s, _)| s.mount.as_ref().is_some_and(|m| m.element == element))
            .map(|(_, rect)| *rect)
    }

    /// Scroll offset that brings the top of section `index` under the navbar.
    pub fn scroll_offset(&self, index: usize) -> Option<i32> {
        let rect = self.sections.get(index)?;
        Some((rect.y - NAVBAR_HEIGHT as i32).max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dexlora_fx::EffectKind;

    #[test]
    fn mount_variants_per_page() {
        let kinds = |route| {
            Page::for_route(route)
                .mounts()
                .map(|m| m.config.kind())
                .collect::<Vec<_>>()
        };
        assert_eq!(kinds(Route::Home), vec![EffectKind::Particles]);
        assert_eq!(kinds(Route::Projects), vec![EffectKind::LightPillar]);
        assert_eq!(kinds(Route::Services), vec![]);
        assert_eq!(
            kinds(Route::Contact),
            vec![EffectKind::ColorBends, EffectKind::Hyperspeed]
        );
    }

    #[test]
    fn mount_elements_are_unique_across_pages() {
        let mut ids: Vec<_> = Route::ALL
            .into_iter()
            .flat_map(|r| Page::for_route(r).mounts().map(|m| m.element).collect::<Vec<_>>())
            .collect();
        let total = ids.len();
        ids.sort_by_key(|id| id.0);
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn layout_stacks_below_navbar() {
        let page = Page::for_route(Route::Home);
        let layout = page.layout(1280, 720);
        assert_eq!(layout.sections[0], Rect::new(0, 64, 1280, 720));
        assert_eq!(layout.sections[1].y, 64 + 720);
        let founders = layout
            .mount_rect(&page, mounts::FOUNDERS_PARTICLES)
            .expect("founders mount");
        assert_eq!(founders, layout.sections[1]);
        assert_eq!(layout.scroll_offset(1), Some(720));
        assert_eq!(
            layout.height,
            64 + page
                .sections
                .iter()
                .map(|s| s.block.nominal_height(720))
                .sum::<u32>()
        );
    }

    #[test]
    fn backdrop_has_no_section_rect() {
        let page = Page::for_route(Route::Contact);
        let layout = page.layout(800, 600);
        assert_eq!(layout.mount_rect(&page, mounts::CONTACT_BACKDROP), None);
        assert!(layout.mount_rect(&page, mounts::CONTACT_HYPERSPEED).is_some());
    }
}
