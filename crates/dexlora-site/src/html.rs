#![forbid(unsafe_code)]

//! Static HTML rendering.
//!
//! Text and attribute values are escaped. Effect mounts render as empty
//! `<div data-effect-host="…">` elements that the browser glue attaches
//! canvases to.
//!
//! ```
//! use dexlora_site::html::HtmlRenderer;
//! use dexlora_site::page::Page;
//! use dexlora_site::route::Route;
//!
//! let html = HtmlRenderer::default().render(&Page::for_route(Route::Home), None);
//! assert!(html.contains(r#"data-effect-host="founders-particles""#));
//! ```

use std::fmt::{self, Write};

use dexlora_contact::{ContactDraft, ContactForm, Field, FieldErrors};

use crate::content::{
    self, CONTACT_CHANNELS, COPYRIGHT, FOUNDERS, HERO_OFFERINGS, PROJECTS, SERVICES, SOCIAL_LINKS,
};
use crate::page::{Block, Mount, Page, Placement};
use crate::route::{Route, nav_items};

/// Canonical origin used for `<link rel="canonical">`.
pub const CANONICAL_ORIGIN: &str = "https://dexlora.com";

/// Read-only view of the contact form for rendering.
#[derive(Debug, Clone, Copy)]
pub struct FormView<'a> {
    pub draft: &'a ContactDraft,
    pub errors: &'a FieldErrors,
    pub submit_label: &'static str,
    /// Submit control disabled while sending and right after success.
    pub disabled: bool,
}

impl<'a> FormView<'a> {
    pub fn of<T, C>(form: &'a ContactForm<T, C>) -> Self {
        Self {
            draft: form.draft(),
            errors: form.errors(),
            submit_label: form.submit_label(),
            disabled: form.is_submitting() || form.is_success(),
        }
    }
}

/// Configuration for HTML rendering.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    /// CSS class prefix for generated elements.
    pub class_prefix: String,
    /// Emit `<!DOCTYPE html>`, `<head>` and `<body>` around the page.
    pub full_document: bool,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self {
            class_prefix: "dl".into(),
            full_document: true,
        }
    }
}

impl HtmlRenderer {
    /// Render only the page body, without the document wrapper.
    pub fn fragment() -> Self {
        Self {
            full_document: false,
            ..Self::default()
        }
    }

    /// Render `page`. Without a form view the contact form renders empty.
    pub fn render(&self, page: &Page, form: Option<FormView<'_>>) -> String {
        let mut out = String::with_capacity(16 * 1024);
        // Writing into a String cannot fail.
        let _ = self.write_page(&mut out, page, form);
        out
    }

    /// Render only the `<form>` element, for hosts that swap the form region
    /// in place without rebuilding the page.
    pub fn render_form(&self, form: Option<FormView<'_>>) -> String {
        let mut out = String::with_capacity(2 * 1024);
        let _ = self.write_form(&mut out, form);
        out
    }

    /// CSS selector matching the element produced by [`render_form`](Self::render_form).
    pub fn form_selector(&self) -> String {
        format!("form.{}-form", self.class_prefix)
    }

    fn write_page(
        &self,
        out: &mut String,
        page: &Page,
        form: Option<FormView<'_>>,
    ) -> fmt::Result {
        if self.full_document {
            out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
            out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n<title>");
            escape_into(out, page.route.title());
            out.push_str("</title>\n<meta name=\"description\" content=\"");
            escape_into(out, page.route.description());
            out.push_str("\">\n");
            if page.route != Route::NotFound {
                writeln!(
                    out,
                    "<link rel=\"canonical\" href=\"{CANONICAL_ORIGIN}{}\">",
                    page.route.path()
                )?;
            }
            out.push_str("</head>\n<body>\n");
        }
        if let Some(backdrop) = &page.backdrop {
            self.write_mount(out, backdrop)?;
        }
        if page.navbar {
            self.write_navbar(out, page.route)?;
        }
        writeln!(out, "<main class=\"{}-main\">", self.class_prefix)?;
        for section in &page.sections {
            self.write_block(out, section.block, section.mount.as_ref(), form)?;
        }
        out.push_str("</main>\n");
        if self.full_document {
            out.push_str("</body>\n</html>\n");
        }
        Ok(())
    }

    fn write_mount(&self, out: &mut String, mount: &Mount) -> fmt::Result {
        let placement = match mount.placement {
            Placement::Section => "section",
            Placement::Fixed => "fixed",
        };
        writeln!(
            out,
            "<div class=\"{p}-effect {p}-effect-{placement}\" data-effect-host=\"{}\" data-effect-kind=\"{}\" data-element-id=\"{}\" aria-hidden=\"true\"></div>",
            mount.name,
            mount.config.kind(),
            mount.element.0,
            p = self.class_prefix,
        )
    }

    fn write_navbar(&self, out: &mut String, current: Route) -> fmt::Result {
        let p = &self.class_prefix;
        writeln!(
            out,
            "<nav class=\"{p}-nav\"><a class=\"{p}-brand\" href=\"/\">DexLora <span class=\"{p}-accent\">Innovations</span></a><div class=\"{p}-nav-links\">"
        )?;
        for item in nav_items() {
            out.push_str("<a");
            if item.call_to_action {
                write!(out, " class=\"{p}-nav-cta\"")?;
            }
            write!(out, " href=\"{}\"", item.href)?;
            if item.href == current.path() {
                out.push_str(" aria-current=\"page\"");
            }
            out.push('>');
            escape_into(out, item.label);
            out.push_str("</a>");
        }
        out.push_str("</div></nav>\n");
        Ok(())
    }

    fn open_section(&self, out: &mut String, block: Block, kind: &str) -> fmt::Result {
        write!(out, "<section class=\"{}-{kind}\"", self.class_prefix)?;
        if let Some(anchor) = block.anchor() {
            write!(out, " id=\"{anchor}\"")?;
        }
        out.push_str(">\n");
        Ok(())
    }

    fn write_block(
        &self,
        out: &mut String,
        block: Block,
        mount: Option<&Mount>,
        form: Option<FormView<'_>>,
    ) -> fmt::Result {
        let p = &self.class_prefix;
        match block {
            Block::HomeHero => {
                self.open_section(out, block, "hero")?;
                write!(
                    out,
                    "<img class=\"{p}-logo\" src=\"/assets/dexlora-logo.png\" alt=\"DexLora Innovations Logo\">\n<h1>DexLora <span class=\"{p}-accent\">Innovations</span></h1>\n<p class=\"{p}-tagline\">"
                )?;
                escape_into(out, content::TAGLINE);
                write!(out, "</p>\n<ul class=\"{p}-offerings\">")?;
                for offering in HERO_OFFERINGS {
                    out.push_str("<li>");
                    escape_into(out, offering);
                    out.push_str("</li>");
                }
                writeln!(
                    out,
                    "</ul>\n<div class=\"{p}-actions\"><a class=\"{p}-button\" href=\"/services\">Learn More</a><a class=\"{p}-button-outline\" href=\"/contact\">Contact Us</a></div>"
                )?;
            }
            Block::Founders => {
                self.open_section(out, block, "founders")?;
                if let Some(mount) = mount {
                    self.write_mount(out, mount)?;
                }
                writeln!(
                    out,
                    "<h2>Meet the <span class=\"{p}-accent\">Founding Team</span></h2>\n<p>Vision-driven leaders building future-ready digital and smart solutions.</p>"
                )?;
                write!(out, "<div class=\"{p}-grid\">")?;
                for founder in &FOUNDERS {
                    write!(out, "<article class=\"{p}-card\"><img src=\"")?;
                    escape_into(out, founder.photo);
                    out.push_str("\" alt=\"");
                    escape_into(out, founder.name);
                    out.push_str("\"><h3>");
                    escape_into(out, founder.name);
                    out.push_str("</h3><p>");
                    escape_into(out, founder.role);
                    write!(
                        out,
                        "</p><a href=\"{}\">{}</a><a href=\"mailto:",
                        founder.phone_href(),
                        founder.phone_display()
                    )?;
                    escape_into(out, founder.email);
                    out.push_str("\">");
                    escape_into(out, founder.email);
                    out.push_str("</a><a href=\"");
                    escape_into(out, founder.linkedin);
                    out.push_str("\" target=\"_blank\" rel=\"noopener noreferrer\">View Profile</a></article>");
                }
                out.push_str("</div>\n");
            }
            Block::Connect => {
                self.open_section(out, block, "connect")?;
                writeln!(
                    out,
                    "<h2>Let's Build Something <span class=\"{p}-accent\">Impactful</span></h2>\n<p>Have an idea, product vision, or digital challenge?</p>\n<p>DexLora Innovations partners with you to design, develop, and deliver future-ready solutions.</p>"
                )?;
                self.write_reach(out)?;
            }
            Block::CallToAction => {
                self.open_section(out, block, "cta")?;
                writeln!(
                    out,
                    "<h2>Have a project in mind?</h2>\n<p>Let's transform your idea into a powerful digital experience.</p>\n<a class=\"{p}-button\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">LET'S WORK TOGETHER</a>",
                    content::WHATSAPP_URL
                )?;
            }
            Block::PageHero { accent, intro } => {
                self.open_section(out, block, "page-hero")?;
                write!(out, "<h1>OUR<br><span class=\"{p}-accent\">")?;
                escape_into(out, accent);
                out.push_str("</span></h1>\n<p>");
                escape_into(out, intro);
                out.push_str("</p>\n");
            }
            Block::ProjectsGrid => {
                self.open_section(out, block, "projects")?;
                if let Some(mount) = mount {
                    self.write_mount(out, mount)?;
                }
                write!(out, "<div class=\"{p}-grid\">")?;
                for project in &PROJECTS {
                    write!(out, "<article class=\"{p}-card\"><img loading=\"lazy\" src=\"")?;
                    escape_into(out, project.image);
                    out.push_str("\" alt=\"");
                    escape_into(out, project.title);
                    write!(out, "\"><span class=\"{p}-badge\">")?;
                    escape_into(out, project.subtitle);
                    out.push_str("</span><h3>");
                    escape_into(out, project.title);
                    out.push_str("</h3><p>");
                    escape_into(out, project.description);
                    out.push_str("</p><h4>Key Features</h4><ul>");
                    for feature in project.features {
                        out.push_str("<li>");
                        escape_into(out, feature);
                        out.push_str("</li>");
                    }
                    out.push_str("</ul></article>");
                }
                out.push_str("</div>\n");
            }
            Block::ServicesFlow => {
                self.open_section(out, block, "services")?;
                write!(out, "<ol class=\"{p}-timeline\">")?;
                for (index, service) in SERVICES.iter().enumerate() {
                    let side = if index % 2 == 0 { "left" } else { "right" };
                    write!(
                        out,
                        "<li class=\"{p}-card {p}-{side}\"><span class=\"{p}-index\">{:02}</span><h3>",
                        index + 1
                    )?;
                    escape_into(out, service.title);
                    out.push_str("</h3><ul>");
                    for point in service.points {
                        out.push_str("<li>");
                        escape_into(out, point);
                        out.push_str("</li>");
                    }
                    out.push_str("</ul></li>");
                }
                out.push_str("</ol>\n");
            }
            Block::ContactHero => {
                self.open_section(out, block, "contact-hero")?;
                if let Some(mount) = mount {
                    self.write_mount(out, mount)?;
                }
                writeln!(
                    out,
                    "<h1><span class=\"{p}-accent\">CONTACT US</span></h1>\n<p>Need an expert solution or have a project idea?<br>Leave your contact details or reach out through our channels. We'll connect with you shortly.</p>"
                )?;
            }
            Block::ContactChannels => {
                self.open_section(out, block, "channels")?;
                write!(out, "<div class=\"{p}-grid\">")?;
                for channel in &CONTACT_CHANNELS {
                    write!(out, "<a class=\"{p}-card\" href=\"")?;
                    escape_into(out, channel.href);
                    out.push('"');
                    if channel.opens_new_tab() {
                        out.push_str(" target=\"_blank\" rel=\"noopener noreferrer\"");
                    }
                    out.push_str("><h3>");
                    escape_into(out, channel.title);
                    out.push_str("</h3><p>");
                    escape_into(out, channel.text);
                    out.push_str("</p></a>");
                }
                out.push_str("</div>\n");
            }
            Block::ContactForm => {
                self.open_section(out, block, "contact-form")?;
                writeln!(
                    out,
                    "<span class=\"{p}-pill\">Send Us a Mail</span>\n<h2>Get In <span class=\"{p}-accent\">Touch</span></h2>\n<p>Have a project idea or want to collaborate? Fill out the form below and we'll get back to you instantly!</p>"
                )?;
                self.write_form(out, form)?;
            }
            Block::ContactStrip => {
                self.open_section(out, block, "strip")?;
                writeln!(
                    out,
                    "<h2>DexLora <span class=\"{p}-accent\">Innovations</span></h2>\n<p>Ready to bring your ideas to life? DexLora Innovations helps you build powerful digital, mobile, and smart technology solutions with clarity, quality, and innovation.</p>"
                )?;
                self.write_reach(out)?;
                write!(out, "<h3>Connect With Us</h3><div class=\"{p}-social\">")?;
                for (label, href) in SOCIAL_LINKS {
                    write!(out, "<a href=\"")?;
                    escape_into(out, href);
                    out.push_str("\" target=\"_blank\" rel=\"noopener noreferrer\" aria-label=\"");
                    escape_into(out, label);
                    out.push_str("\"></a>");
                }
                out.push_str("</div>\n");
            }
            Block::Footer => {
                write!(out, "<footer class=\"{p}-footer\"><p>")?;
                escape_into(out, COPYRIGHT);
                out.push_str("</p></footer>\n");
                return Ok(());
            }
            Block::NotFound => {
                self.open_section(out, block, "not-found")?;
                writeln!(
                    out,
                    "<h1>404</h1>\n<p>Oops! Page not found</p>\n<a class=\"{p}-button\" href=\"/\">Return to Home</a>"
                )?;
            }
        }
        out.push_str("</section>\n");
        Ok(())
    }

    fn write_reach(&self, out: &mut String) -> fmt::Result {
        let p = &self.class_prefix;
        write!(out, "<ul class=\"{p}-reach\"><li>")?;
        escape_into(out, content::LOCATION);
        writeln!(
            out,
            "</li><li><a href=\"mailto:{email}\">{email}</a></li><li><a href=\"{}\">{}</a></li></ul>",
            content::PHONE_HREF,
            content::PHONE,
            email = content::EMAIL,
        )
    }

    fn write_form(&self, out: &mut String, form: Option<FormView<'_>>) -> fmt::Result {
        let p = &self.class_prefix;
        writeln!(out, "<form class=\"{p}-form\" method=\"post\" novalidate>")?;
        for field in Field::ALL {
            let name = field.as_str();
            let value = form.map_or("", |f| f.draft.get(field));
            let error = form.and_then(|f| f.errors.get(field));
            let required = if field == Field::Subject { "" } else { " *" };
            write!(out, "<div class=\"{p}-field\"><label for=\"{name}\">")?;
            escape_into(out, field.label());
            write!(out, "{required}</label>")?;
            match field {
                Field::Message => {
                    write!(out, "<textarea id=\"{name}\" name=\"{name}\" rows=\"5\"")?
                }
                Field::Email => write!(out, "<input type=\"email\" id=\"{name}\" name=\"{name}\"")?,
                Field::Name | Field::Subject => {
                    write!(out, "<input type=\"text\" id=\"{name}\" name=\"{name}\"")?
                }
            }
            out.push_str(" placeholder=\"");
            escape_into(out, field.placeholder());
            out.push('"');
            if error.is_some() {
                write!(out, " aria-invalid=\"true\" aria-describedby=\"{name}-error\"")?;
            }
            if field == Field::Message {
                out.push('>');
                escape_into(out, value);
                out.push_str("</textarea>");
            } else {
                out.push_str(" value=\"");
                escape_into(out, value);
                out.push_str("\">");
            }
            if let Some(error) = error {
                write!(out, "<p class=\"{p}-field-error\" id=\"{name}-error\" role=\"alert\">")?;
                escape_into(out, &error.format_message());
                out.push_str("</p>");
            }
            out.push_str("</div>\n");
        }
        let label = form.map_or("Send Message", |f| f.submit_label);
        let disabled = if form.is_some_and(|f| f.disabled) {
            " disabled"
        } else {
            ""
        };
        write!(out, "<button type=\"submit\"{disabled}>")?;
        escape_into(out, label);
        out.push_str("</button>\n<p class=\"");
        write!(
            out,
            "{p}-privacy\">By submitting this form, you agree to our privacy policy. We'll never share your information with third parties.</p>\n</form>\n"
        )
    }
}

/// HTML-escape a string into the output buffer. Safe for text and
/// double- or single-quoted attribute values.
pub fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// HTML-escape into a new string.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_into(&mut out, s);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dexlora_contact::validate;

    fn render(route: Route) -> String {
        HtmlRenderer::default().render(&Page::for_route(route), None)
    }

    #[test]
    fn escape_handles_all_special_chars() {
        assert_eq!(
            escape("<script>alert(\"hi&bye\")</script>"),
            "&lt;script&gt;alert(&quot;hi&amp;bye&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape("it's"), "it&#39;s");
        assert_eq!(escape("plain text"), "plain text");
    }

    #[test]
    fn document_head_carries_route_metadata() {
        let html = render(Route::Services);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Services | DexLora Innovations</title>"));
        assert!(html.contains("<link rel=\"canonical\" href=\"https://dexlora.com/services\">"));
    }

    #[test]
    fn fragment_has_no_document_wrapper() {
        let html = HtmlRenderer::fragment().render(&Page::for_route(Route::Home), None);
        assert!(!html.contains("<html"));
        assert!(html.starts_with("<nav"));
    }

    #[test]
    fn navbar_marks_current_page() {
        let html = render(Route::Projects);
        assert!(html.contains("<a href=\"/projects\" aria-current=\"page\">Projects</a>"));
        assert!(html.contains("<a class=\"dl-nav-cta\" href=\"/contact\">Contact Us</a>"));
    }

    #[test]
    fn home_renders_content_and_single_mount() {
        let html = render(Route::Home);
        assert_eq!(html.matches("data-effect-host=").count(), 1);
        assert!(html.contains("data-effect-kind=\"particles\""));
        assert!(html.contains("Meet the <span class=\"dl-accent\">Founding Team</span>"));
        assert!(html.contains("Aravind Muthiah M"));
        assert!(html.contains("Let's transform your idea"));
        assert!(html.contains("© 2026 DexLora Innovations. All rights reserved."));
    }

    #[test]
    fn services_lists_every_point() {
        let html = render(Route::Services);
        assert_eq!(html.matches("<span class=\"dl-index\">").count(), 9);
        assert!(html.contains("<span class=\"dl-index\">09</span>"));
        assert!(html.contains("Viva &amp; Presentation Support"));
        assert!(!html.contains("data-effect-host="));
    }

    #[test]
    fn contact_renders_backdrop_before_navbar() {
        let html = render(Route::Contact);
        let backdrop = html.find("data-effect-host=\"contact-color-bends\"").expect("backdrop");
        let nav = html.find("<nav").expect("nav");
        assert!(backdrop < nav);
        assert!(html.contains("dl-effect-fixed"));
        assert!(html.contains("data-effect-host=\"contact-hyperspeed\""));
        assert!(html.matches("target=\"_blank\"").count() >= 5);
    }

    #[test]
    fn form_renders_values_and_errors() {
        let draft = ContactDraft::new("<b>J</b>", "bad", "", "short");
        let errors = validate(&draft).expect_err("invalid");
        let view = FormView {
            draft: &draft,
            errors: &errors,
            submit_label: "Send Message",
            disabled: false,
        };
        let html = HtmlRenderer::fragment().render(&Page::for_route(Route::Contact), Some(view));
        assert!(html.contains("value=\"&lt;b&gt;J&lt;/b&gt;\""));
        assert!(
            html.contains("id=\"name-error\" role=\"alert\">Name must be at least 2 characters</p>")
        );
        assert!(html.contains("Please enter a valid email address"));
        assert!(html.contains(">short</textarea>"));
        assert!(!html.contains("id=\"subject-error\""));
        assert!(html.contains("<button type=\"submit\">Send Message</button>"));
    }

    #[test]
    fn form_region_matches_page_render() {
        let draft = ContactDraft::new("Jane", "", "", "");
        let errors = FieldErrors::new();
        let view = FormView {
            draft: &draft,
            errors: &errors,
            submit_label: "Send Message",
            disabled: false,
        };
        let renderer = HtmlRenderer::fragment();
        let region = renderer.render_form(Some(view));
        assert!(region.starts_with("<form class=\"dl-form\""));
        assert!(region.trim_end().ends_with("</form>"));
        let page = renderer.render(&Page::for_route(Route::Contact), Some(view));
        assert!(page.contains(&region));
        assert_eq!(renderer.form_selector(), "form.dl-form");
    }

    #[test]
    fn disabled_submit_while_sending() {
        let draft = ContactDraft::default();
        let errors = FieldErrors::new();
        let view = FormView {
            draft: &draft,
            errors: &errors,
            submit_label: "Sending Message...",
            disabled: true,
        };
        let html = HtmlRenderer::fragment().render(&Page::for_route(Route::Contact), Some(view));
        assert!(html.contains("<button type=\"submit\" disabled>Sending Message...</button>"));
    }
}
