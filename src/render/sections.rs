//! Section renderers for the structured portfolio regions.
//!
//! Each renderer reads one data section (records carrying inline per-language
//! text), clears its region and rebuilds it in the data's order.

use crate::i18n::I18nError;
use crate::render::{LocalizedText, RenderContext, SectionRenderer};
use crate::view::{Markup, Selector, ViewPort};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Navigation entry whose href marks the active link on first render.
const HOME_ANCHOR: &str = "#inicio";

// ==================== Data Shapes ====================

#[derive(Debug, Deserialize)]
struct Navigation {
    items: Vec<NavItem>,
}

#[derive(Debug, Deserialize)]
struct NavItem {
    href: String,
    #[serde(flatten)]
    label: LocalizedText,
}

#[derive(Debug, Deserialize)]
struct Personal {
    #[serde(default)]
    name: Option<LocalizedText>,
    #[serde(default)]
    title: Option<LocalizedText>,
    #[serde(default)]
    description: Option<LocalizedText>,
}

#[derive(Debug, Deserialize)]
struct About {
    stats: Vec<Stat>,
}

#[derive(Debug, Deserialize)]
struct Stat {
    value: Value,
    #[serde(default)]
    label: LocalizedText,
}

#[derive(Debug, Deserialize)]
struct Skills {
    categories: Vec<SkillCategory>,
}

#[derive(Debug, Deserialize)]
struct SkillCategory {
    #[serde(default)]
    icon: String,
    #[serde(default)]
    title: LocalizedText,
    #[serde(default)]
    skills: Vec<Skill>,
}

#[derive(Debug, Deserialize)]
struct Skill {
    name: String,
    #[serde(default)]
    level: u32,
}

#[derive(Debug, Deserialize)]
struct Experience {
    jobs: Vec<Job>,
}

#[derive(Debug, Deserialize)]
struct Job {
    #[serde(default)]
    title: LocalizedText,
    #[serde(default)]
    company: String,
    #[serde(default)]
    period: LocalizedText,
    #[serde(default)]
    description: LocalizedText,
    #[serde(default)]
    skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Certifications {
    items: Vec<Certification>,
}

#[derive(Debug, Deserialize)]
struct Certification {
    #[serde(default)]
    icon: String,
    #[serde(default)]
    title: LocalizedText,
    #[serde(default)]
    company: String,
    #[serde(default)]
    id_number: Option<String>,
    #[serde(default)]
    technologies: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Projects {
    items: Vec<Project>,
}

#[derive(Debug, Deserialize)]
struct Project {
    #[serde(default)]
    image: String,
    #[serde(default)]
    demo: String,
    #[serde(default)]
    code: String,
    #[serde(default)]
    title: LocalizedText,
    #[serde(default)]
    description: LocalizedText,
    #[serde(default)]
    technologies: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Contact {
    #[serde(default)]
    greeting: LocalizedText,
    #[serde(default)]
    description: LocalizedText,
    info: ContactInfo,
    #[serde(default)]
    social_links: Vec<SocialLink>,
    #[serde(default)]
    form: Option<ContactForm>,
}

#[derive(Debug, Default, Deserialize)]
struct ContactInfo {
    email: Option<ContactItem>,
    linkedin: Option<ContactItem>,
    location: Option<ContactItem>,
}

#[derive(Debug, Deserialize)]
struct ContactItem {
    #[serde(default)]
    label: LocalizedText,
    value: TextValue,
    #[serde(default)]
    url: Option<String>,
}

/// A record value that is either the same in every language or localized.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextValue {
    Plain(String),
    Localized(LocalizedText),
}

impl TextValue {
    fn get<'t>(&'t self, ctx: &RenderContext<'_>) -> &'t str {
        match self {
            TextValue::Plain(text) => text,
            TextValue::Localized(text) => ctx.localized(text),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SocialLink {
    url: String,
    #[serde(default)]
    icon: String,
    #[serde(default)]
    label: LocalizedText,
}

#[derive(Debug, Deserialize)]
struct ContactForm {
    #[serde(default)]
    fields: Vec<FormField>,
    #[serde(default)]
    submit: LocalizedText,
}

#[derive(Debug, Deserialize)]
struct FormField {
    name: String,
    #[serde(rename = "type", default = "default_field_type")]
    kind: String,
    #[serde(default)]
    label: LocalizedText,
    #[serde(default)]
    placeholder: LocalizedText,
    #[serde(default)]
    required: bool,
}

fn default_field_type() -> String {
    "text".to_string()
}

// ==================== Helpers ====================

/// Resolve a region and its records, or log why the renderer is skipping.
fn region_and_data<T: serde::de::DeserializeOwned>(
    ctx: &RenderContext<'_>,
    view: &dyn ViewPort,
    data_key: &str,
    records: &str,
    region: Selector<'_>,
) -> Option<(crate::view::NodeId, T)> {
    let Some(data) = ctx.records::<T>(data_key, records) else {
        debug!("No '{}' data; leaving region as is", data_key);
        return None;
    };
    let Some(node) = view.query(&region) else {
        let err = I18nError::MissingDomTarget(format!("{:?}", region));
        debug!("{}; skipping '{}'", err, data_key);
        return None;
    };
    Some((node, data))
}

fn tag_list(container_class: &str, tag_class: &str, items: &[String]) -> Markup {
    Markup::new("div")
        .class(container_class)
        .children(items.iter().map(|item| Markup::new("span").class(tag_class).text(item)))
}

fn icon(class: &str) -> Markup {
    Markup::new("i").class(class)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// ==================== Renderers ====================

/// `.nav-menu` links from `navigation.items`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NavigationRenderer;

impl SectionRenderer for NavigationRenderer {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn render(&self, ctx: &RenderContext<'_>, view: &mut dyn ViewPort) {
        let Some((menu, navigation)) =
            region_and_data::<Navigation>(ctx, view, "navigation", "items", Selector::Class("nav-menu"))
        else {
            return;
        };

        let items = navigation.items.iter().map(|item| {
            let class = if item.href == HOME_ANCHOR {
                "nav-link active"
            } else {
                "nav-link"
            };
            Markup::new("li").child(
                Markup::new("a")
                    .attr("href", &item.href)
                    .class(class)
                    .text(ctx.localized(&item.label)),
            )
        });
        view.replace_children(menu, items.collect());
    }
}

/// `[data-hero="name|title|description"]` from `personal`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeroRenderer;

impl SectionRenderer for HeroRenderer {
    fn name(&self) -> &'static str {
        "hero"
    }

    fn render(&self, ctx: &RenderContext<'_>, view: &mut dyn ViewPort) {
        let Some(personal) = ctx.section::<Personal>("personal") else {
            debug!("No 'personal' data; leaving hero as is");
            return;
        };

        let fields = [
            ("name", &personal.name),
            ("title", &personal.title),
            ("description", &personal.description),
        ];
        for (slot, text) in fields {
            let (Some(text), Some(node)) =
                (text, view.query(&Selector::AttributeValue("data-hero", slot)))
            else {
                continue;
            };
            view.set_text(node, ctx.localized(text));
        }
    }
}

/// `.about-stats` from `about.stats`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AboutRenderer;

impl SectionRenderer for AboutRenderer {
    fn name(&self) -> &'static str {
        "about"
    }

    fn render(&self, ctx: &RenderContext<'_>, view: &mut dyn ViewPort) {
        let Some((container, about)) =
            region_and_data::<About>(ctx, view, "about", "stats", Selector::Class("about-stats"))
        else {
            return;
        };

        let stats = about.stats.iter().map(|stat| {
            Markup::new("div")
                .class("stat")
                .child(Markup::new("h3").text(&display_value(&stat.value)))
                .child(Markup::new("p").text(ctx.localized(&stat.label)))
        });
        view.replace_children(container, stats.collect());
    }
}

/// `.skills-grid` from `skills.categories`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SkillsRenderer;

impl SectionRenderer for SkillsRenderer {
    fn name(&self) -> &'static str {
        "skills"
    }

    fn render(&self, ctx: &RenderContext<'_>, view: &mut dyn ViewPort) {
        let Some((grid, skills)) =
            region_and_data::<Skills>(ctx, view, "skills", "categories", Selector::Class("skills-grid"))
        else {
            return;
        };

        let categories = skills.categories.iter().map(|category| {
            let items = category.skills.iter().map(|skill| {
                Markup::new("div")
                    .class("skill-item")
                    .child(Markup::new("span").class("skill-name").text(&skill.name))
                    .child(
                        Markup::new("div").class("skill-bar").child(
                            Markup::new("div")
                                .class("skill-level")
                                .attr("data-level", &skill.level.to_string()),
                        ),
                    )
            });

            Markup::new("div")
                .class("skill-category")
                .child(
                    Markup::new("h3")
                        .child(icon(&category.icon))
                        .child(Markup::new("span").text(ctx.localized(&category.title))),
                )
                .child(Markup::new("div").class("skill-list").children(items))
        });
        view.replace_children(grid, categories.collect());
    }
}

/// `.timeline` from `experience.jobs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExperienceRenderer;

impl SectionRenderer for ExperienceRenderer {
    fn name(&self) -> &'static str {
        "experience"
    }

    fn render(&self, ctx: &RenderContext<'_>, view: &mut dyn ViewPort) {
        let Some((timeline, experience)) =
            region_and_data::<Experience>(ctx, view, "experience", "jobs", Selector::Class("timeline"))
        else {
            return;
        };

        debug!("Rendering {} jobs", experience.jobs.len());
        let jobs = experience.jobs.iter().map(|job| {
            Markup::new("div")
                .class("timeline-item")
                .child(Markup::new("div").class("timeline-marker"))
                .child(
                    Markup::new("div")
                        .class("timeline-content")
                        .child(Markup::new("h3").text(ctx.localized(&job.title)))
                        .child(Markup::new("h4").text(&job.company))
                        .child(
                            Markup::new("span")
                                .class("timeline-date")
                                .text(ctx.localized(&job.period)),
                        )
                        .child(Markup::new("p").text(ctx.localized(&job.description)))
                        .child(tag_list("timeline-skills", "skill-tag", &job.skills)),
                )
        });
        view.replace_children(timeline, jobs.collect());
    }
}

/// `.certifications-grid` from `certifications.items`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CertificationsRenderer;

impl SectionRenderer for CertificationsRenderer {
    fn name(&self) -> &'static str {
        "certifications"
    }

    fn render(&self, ctx: &RenderContext<'_>, view: &mut dyn ViewPort) {
        let Some((grid, certifications)) = region_and_data::<Certifications>(
            ctx,
            view,
            "certifications",
            "items",
            Selector::Class("certifications-grid"),
        ) else {
            return;
        };

        let cards = certifications.items.iter().map(|cert| {
            let mut content = Markup::new("div")
                .class("cert-content")
                .child(Markup::new("h3").text(ctx.localized(&cert.title)))
                .child(Markup::new("h4").text(&cert.company));
            if let Some(id) = cert.id_number.as_deref().filter(|id| !id.is_empty()) {
                content = content.child(Markup::new("p").class("cert-id").text(&format!("ID: {}", id)));
            }
            content = content.child(tag_list("cert-tech", "tech-tag", &cert.technologies));

            Markup::new("div")
                .class("cert-card")
                .child(Markup::new("div").class("cert-icon").child(icon(&cert.icon)))
                .child(content)
        });
        view.replace_children(grid, cards.collect());
    }
}

/// `.projects-grid` from `projects.items`, with translated link buttons.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProjectsRenderer;

impl SectionRenderer for ProjectsRenderer {
    fn name(&self) -> &'static str {
        "projects"
    }

    fn render(&self, ctx: &RenderContext<'_>, view: &mut dyn ViewPort) {
        let Some((grid, projects)) =
            region_and_data::<Projects>(ctx, view, "projects", "items", Selector::Class("projects-grid"))
        else {
            return;
        };

        let view_project = ctx.t("ui.buttons.viewProject");
        let view_code = ctx.t("ui.buttons.viewCode");

        let cards = projects.items.iter().map(|project| {
            let title = ctx.localized(&project.title);
            let links = Markup::new("div")
                .class("project-links")
                .child(
                    Markup::new("a")
                        .attr("href", &project.demo)
                        .class("btn btn-primary")
                        .attr("target", "_blank")
                        .text(&view_project),
                )
                .child(
                    Markup::new("a")
                        .attr("href", &project.code)
                        .class("btn btn-secondary")
                        .attr("target", "_blank")
                        .text(&view_code),
                );

            Markup::new("div")
                .class("project-card")
                .child(
                    Markup::new("div")
                        .class("project-image")
                        .child(
                            Markup::new("img")
                                .attr("src", &project.image)
                                .attr("alt", title)
                                .attr("loading", "lazy"),
                        )
                        .child(Markup::new("div").class("project-overlay").child(links)),
                )
                .child(
                    Markup::new("div")
                        .class("project-content")
                        .child(Markup::new("h3").text(title))
                        .child(Markup::new("p").text(ctx.localized(&project.description)))
                        .child(tag_list("project-tech", "tech-tag", &project.technologies)),
                )
        });
        view.replace_children(grid, cards.collect());
    }
}

/// `.contact-info` and `.contact-form form` from `contact`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContactRenderer;

impl ContactRenderer {
    fn info(ctx: &RenderContext<'_>, contact: &Contact) -> Vec<Markup> {
        let entries = [
            (&contact.info.email, "fas fa-envelope"),
            (&contact.info.linkedin, "fab fa-linkedin"),
            (&contact.info.location, "fas fa-map-marker-alt"),
        ];

        let items = entries.into_iter().filter_map(|(item, icon_class)| {
            let item = item.as_ref()?;
            let value = item.value.get(ctx);
            let body = match &item.url {
                Some(url) => Markup::new("p").child(
                    Markup::new("a")
                        .attr("href", url)
                        .attr("target", "_blank")
                        .text(value),
                ),
                None => Markup::new("p").text(value),
            };

            Some(
                Markup::new("div")
                    .class("contact-item")
                    .child(Markup::new("div").class("contact-item-icon").child(icon(icon_class)))
                    .child(
                        Markup::new("div")
                            .class("contact-item-content")
                            .child(Markup::new("h4").text(ctx.localized(&item.label)))
                            .child(body),
                    ),
            )
        });

        let socials = contact.social_links.iter().map(|social| {
            Markup::new("a")
                .attr("href", &social.url)
                .class("social-link")
                .attr("target", "_blank")
                .attr("title", ctx.localized(&social.label))
                .child(icon(&social.icon))
        });

        vec![
            Markup::new("h3").text(ctx.localized(&contact.greeting)),
            Markup::new("p")
                .class("contact-description")
                .text(ctx.localized(&contact.description)),
            Markup::new("div").class("contact-items").children(items),
            Markup::new("div").class("social-links").children(socials),
        ]
    }

    fn form(ctx: &RenderContext<'_>, form: &ContactForm) -> Vec<Markup> {
        let mut children: Vec<Markup> = form
            .fields
            .iter()
            .map(|field| {
                let mut label = ctx.localized(&field.label).to_string();
                if field.required {
                    label.push_str(" *");
                }

                let mut input = if field.kind == "textarea" {
                    Markup::new("textarea")
                } else {
                    Markup::new("input").attr("type", &field.kind)
                };
                input = input
                    .attr("id", &field.name)
                    .attr("name", &field.name)
                    .attr("placeholder", ctx.localized(&field.placeholder));
                if field.required {
                    input = input.attr("required", "");
                }

                Markup::new("div")
                    .class("form-group")
                    .child(Markup::new("label").attr("for", &field.name).text(&label))
                    .child(input)
            })
            .collect();

        children.push(
            Markup::new("button")
                .attr("type", "submit")
                .class("btn btn-primary btn-full")
                .text(ctx.localized(&form.submit)),
        );
        children
    }
}

impl SectionRenderer for ContactRenderer {
    fn name(&self) -> &'static str {
        "contact"
    }

    fn render(&self, ctx: &RenderContext<'_>, view: &mut dyn ViewPort) {
        let Some(contact) = ctx.records::<Contact>("contact", "info") else {
            debug!("No 'contact' data; leaving contact section as is");
            return;
        };

        if let Some(info) = view.query(&Selector::Class("contact-info")) {
            view.replace_children(info, Self::info(ctx, &contact));
        }

        let form_node = view
            .query(&Selector::Class("contact-form"))
            .and_then(|container| view.query_within(container, &Selector::Tag("form")));
        if let (Some(node), Some(form)) = (form_node, &contact.form) {
            if form.fields.is_empty() {
                debug!("No contact form fields; leaving form as is");
            } else {
                view.replace_children(node, Self::form(ctx, form));
            }
        }
    }
}

/// `.lang-toggle` button and `#language-toggle` selector.
///
/// Runs without any data: it only reflects the pass language.
#[derive(Debug, Default, Clone, Copy)]
pub struct LanguageToggleRenderer;

impl SectionRenderer for LanguageToggleRenderer {
    fn name(&self) -> &'static str {
        "language-toggle"
    }

    fn render(&self, ctx: &RenderContext<'_>, view: &mut dyn ViewPort) {
        let language = ctx.language();
        let tooltip = ctx.t("ui.language.toggle");

        // The button offers the language you would switch to
        if let Some(toggle) = view.query(&Selector::Class("lang-toggle")) {
            view.set_text(toggle, language.next().label());
            view.set_attribute(toggle, "title", &tooltip);
        }

        if let Some(selector) = view.query(&Selector::Id("language-toggle")) {
            view.set_attribute(selector, "title", &tooltip);
            if let Some(flag) = view.query_within(selector, &Selector::Class("flag")) {
                view.set_text(flag, language.flag());
            }
            if let Some(text) = view.query_within(selector, &Selector::Class("lang-text")) {
                view.set_text(text, language.label());
            }
        }
    }
}
