#![forbid(unsafe_code)]

//! Static site content.

use serde::Serialize;

pub const COMPANY: &str = "DexLora Innovations";
pub const TAGLINE: &str = "Building Digital & Smart Solutions for the Future";
pub const EMAIL: &str = "dexlora.innovations@gmail.com";
pub const PHONE: &str = "+91 7092269839";
pub const PHONE_HREF: &str = "tel:+917092269839";
pub const LOCATION: &str = "Tamil Nadu, India";
pub const WHATSAPP_URL: &str = "https://wa.me/917092269839";
pub const COPYRIGHT: &str = "© 2026 DexLora Innovations. All rights reserved.";

/// Offerings listed under the home hero.
pub const HERO_OFFERINGS: [&str; 5] = ["Websites", "Apps", "Games", "UI/UX", "IoT Hardware"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Founder {
    pub name: &'static str,
    pub role: &'static str,
    /// National number, without the `+91` prefix.
    pub phone: &'static str,
    pub email: &'static str,
    pub linkedin: &'static str,
    pub photo: &'static str,
}

impl Founder {
    pub fn phone_display(&self) -> String {
        format!("+91 {}", self.phone)
    }

    pub fn phone_href(&self) -> String {
        format!("tel:+91{}", self.phone)
    }
}

pub const FOUNDERS: [Founder; 3] = [
    Founder {
        name: "Aravind Muthiah M",
        role: "Founder & CEO",
        phone: "9445180946",
        email: "aravindmuthiah23@gmail.com",
        linkedin: "https://www.linkedin.com/in/aravind-muthiah-m/",
        photo: "/aravind.jpg",
    },
    Founder {
        name: "Vinnarasu R",
        role: "Co-Founder & COO",
        phone: "7092269839",
        email: "r.vinnarasu2006@gmail.com",
        linkedin: "https://www.linkedin.com/in/vinnarasu-r-50439b328/",
        photo: "/vinnarasu.png",
    },
    Founder {
        name: "Pruthevi S",
        role: "Co-Founder & CTO",
        phone: "7200402867",
        email: "pruthevis9d@gmail.com",
        linkedin: "https://www.linkedin.com/in/pruthevi-s/",
        photo: "/pruthevi.jpg",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Service {
    pub title: &'static str,
    pub points: [&'static str; 5],
}

pub const SERVICES: [Service; 9] = [
    Service {
        title: "Custom Website Development",
        points: [
            "Fully Customized Design & Development",
            "Scalable & Future-Ready Architecture",
            "Unique Brand-Focused Layouts",
            "Clean, Secure Custom Code",
            "Easy Third-Party Integrations",
        ],
    },
    Service {
        title: "Portfolio & Personal Websites",
        points: [
            "Modern Visual Showcases",
            "Simple & Smooth Navigation",
            "Social Media & Contact Integration",
            "High-Speed Performance",
            "Strong Personal Branding",
        ],
    },
    Service {
        title: "Business & Corporate Websites",
        points: [
            "Professional & Trust-Building Design",
            "Lead Generation & Inquiry Forms",
            "SEO-Optimized Structure",
            "Analytics & Tracking Ready",
            "Scalable Business Growth Support",
        ],
    },
    Service {
        title: "Responsive Mobile Design",
        points: [
            "Mobile Optimized Layouts",
            "Seamless Cross-Device Compatibility",
            "Google Mobile-Friendly Standards",
            "Reduced Bounce Rates",
            "Enhanced User Reach",
        ],
    },
    Service {
        title: "Mobile App Development",
        points: [
            "Android & iOS App Solutions",
            "User-Friendly UI & UX",
            "High Performance & Security",
            "Scalable Backend Integration",
            "App Store Deployment Support",
        ],
    },
    Service {
        title: "Web Application Development",
        points: [
            "Powerful Web-Based Applications",
            "Secure Data Handling",
            "Real-Time Features & APIs",
            "Scalable System Architecture",
            "Cloud-Ready Deployment",
        ],
    },
    Service {
        title: "UI / UX Design",
        points: [
            "User-Centric Design Approach",
            "Interactive Wireframes & Prototypes",
            "Clean & Modern Interfaces",
            "Improved User Engagement",
            "Brand-Consistent Visuals",
        ],
    },
    Service {
        title: "IoT Solutions & Hardware Projects",
        points: [
            "Smart Device Development",
            "Sensor & Microcontroller Integration",
            "Real-Time Data Monitoring",
            "Cloud & Mobile Connectivity",
            "Industry & Academic Ready Solutions",
        ],
    },
    Service {
        title: "Final Year Project Development",
        points: [
            "Complete Project Implementation",
            "Latest Technologies & Domains",
            "Working Models & Source Code",
            "Detailed Documentation & Reports",
            "Viva & Presentation Support",
        ],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Project {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub image: &'static str,
}

pub const PROJECTS: [Project; 4] = [
    Project {
        title: "GeoPulse",
        subtitle: "Smart Mapping & Heritage Navigation",
        description: "A modern mapping platform similar to Google Maps, enhanced with heritage-aware search. GeoPulse allows users to find cities using both current and historic names, supports multiple languages, and delivers a highly interactive interface for a superior navigation experience.",
        features: &[
            "Search cities using old and current names",
            "Multi-language support for global and regional users",
            "Unique and interactive UI beyond traditional maps",
            "Fast and intelligent search results",
        ],
        image: "/assets/project-geopulse.jpg",
    },
    Project {
        title: "Autonomous Wall-E Inspired Robot",
        subtitle: "Self-Driving Intelligent Robot",
        description: "An autonomous mobile robot designed to move, think, and react independently without remote control. Built using ESP32, it leverages sensors and smart algorithms to detect obstacles, make decisions, and navigate autonomously while showcasing expressive OLED animations inspired by Wall-E.",
        features: &[
            "Fully autonomous navigation",
            "ESP32 microcontroller as the main processing unit",
            "OLED display with animated expressive eyes",
            "Front steering with rear-wheel drive",
            "Ultrasonic sensor + servo scanning for obstacle detection",
            "Live tracking and control via Blynk app",
        ],
        image: "/assets/project-walle-robot.png",
    },
    Project {
        title: "Restaurant Website",
        subtitle: "Responsive Restaurant Landing Page",
        description: "A fully designed and coded-from-scratch restaurant website built using pure HTML and CSS. The project features a clean modern UI, structured layout, and interactive elements, created as part of an early full-stack learning journey.",
        features: &[
            "Restaurant landing page with structured layout",
            "Menu sections with images and descriptions",
            "Styled buttons with hover effects",
            "Footer contact form",
            "Custom theme colors and Google Fonts",
        ],
        image: "/assets/project-restaurant.jpg",
    },
    Project {
        title: "AI-Based Portfolio Creation Platform",
        subtitle: "Intelligent Portfolio Builder",
        description: "An intelligent portfolio creation platform where users simply enter a prompt, and the system automatically generates a complete professional portfolio website. Users can customize sections and publish instantly on the same platform without any coding knowledge.",
        features: &[
            "Prompt-based portfolio generation",
            "One-click publishing",
            "Auto-generated content and sections",
            "Multiple professional templates",
            "Responsive and mobile-friendly design",
            "No coding required",
        ],
        image: "/portfolio-platform.png",
    },
];

/// An external way to reach the company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContactChannel {
    pub title: &'static str,
    pub text: &'static str,
    pub href: &'static str,
}

impl ContactChannel {
    /// Mail links open in place; everything else opens a new tab.
    pub fn opens_new_tab(&self) -> bool {
        !self.href.starts_with("mailto:")
    }
}

pub const CONTACT_CHANNELS: [ContactChannel; 6] = [
    ContactChannel {
        title: "Mail Us",
        text: "Reach out to DexLora Innovations for project discussions, collaborations, or support.",
        href: "mailto:dexlora.innovations@gmail.com",
    },
    ContactChannel {
        title: "Instagram",
        text: "Follow us for updates, projects, and creative technology insights.",
        href: "https://www.instagram.com/dexlora_innovations?utm_source=qr&igsh=MXU2amV0eGZyeWNscQ==",
    },
    ContactChannel {
        title: "LinkedIn",
        text: "Connect with DexLora Innovations for professional updates and partnerships.",
        href: "https://www.linkedin.com/in/dexlora-innovations/",
    },
    ContactChannel {
        title: "WhatsApp",
        text: "Chat with our team directly for quick discussions and inquiries.",
        href: "https://chat.whatsapp.com/FOcvkxkZRoZKLaQTKU3uCI",
    },
    ContactChannel {
        title: "Facebook",
        text: "Follow DexLora Innovations for news, updates, and community engagement.",
        href: "https://www.facebook.com/profile.php?id=61585169746090",
    },
    ContactChannel {
        title: "Twitter (X)",
        text: "Follow DexLora Innovations for announcements, updates, and technology insights.",
        href: "https://x.com/DexLora3994",
    },
];

/// Social links in the contact strip at the bottom of Services and Contact.
pub const SOCIAL_LINKS: [(&str, &str); 3] = [
    ("Instagram", "https://instagram.com"),
    ("WhatsApp", WHATSAPP_URL),
    ("LinkedIn", "https://www.linkedin.com/company/dexlora-innovations"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_service_has_five_points() {
        assert_eq!(SERVICES.len(), 9);
        for service in &SERVICES {
            assert!(service.points.iter().all(|p| !p.is_empty()), "{}", service.title);
        }
    }

    #[test]
    fn founder_phone_formats() {
        assert_eq!(FOUNDERS[1].phone_display(), "+91 7092269839");
        assert_eq!(FOUNDERS[1].phone_href(), "tel:+917092269839");
    }

    #[test]
    fn only_mail_channel_stays_in_tab() {
        let in_tab: Vec<_> = CONTACT_CHANNELS
            .iter()
            .filter(|c| !c.opens_new_tab())
            .map(|c| c.title)
            .collect();
        assert_eq!(in_tab, vec!["Mail Us"]);
    }
}
