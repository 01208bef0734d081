use std::collections::BTreeMap;

use tracing::error;

use crate::content::{FooterData, FooterLink, FooterLinks, SiteContent};
use crate::model::Project;

const DEFAULT_PROJECTS: &str = include_str!("../data/default_projects.json");

const SITE_CONTENT: &[(&str, &str)] = &[
    ("site.title", "nominalco"),
    ("site.logoHeavy", "nominal"),
    ("site.logoLight", "co"),
    ("nav.work", "Work"),
    ("nav.about", "About"),
    ("nav.contact", "Contact"),
    ("hero.title", "Multi-disciplinary art and design studio."),
    ("hero.subtitle", "We design objects, interfaces, and ideas."),
    ("work.title", "Selected Work"),
    ("about.title", "About nominalco"),
    (
        "about.paragraph1",
        "nominalco is an art and design practice specializing in the development of functional, bold, and appealing artifacts, stories, and experiences.",
    ),
    (
        "about.paragraph2",
        "Our process is elastic. We adapt bespoke workflows to reveal compelling solutions for each of our projects.",
    ),
    ("contact.title", "Contact"),
    ("contact.email", "hello@nominalco.com"),
];

const FOOTER_CONTENT: &[(&str, &str)] = &[
    ("logo.heavy", "nominal"),
    ("logo.light", "co"),
    ("tagline", "Crafting digital experiences that matter"),
    ("work.title", "Work"),
    ("connect.title", "Connect"),
    ("cta.title", "Ready to start a project?"),
    ("cta.button", "Let's talk"),
    ("cta.disabled", "false"),
    ("copyright", "© 2025 nominalco. All rights reserved."),
    ("signature", "Designed & developed with care"),
];

// (text, url, key)
const FOOTER_WORK_LINKS: &[(&str, &str, &str)] = &[
    ("Portfolio", "#work", "portfolio"),
    ("Process", "#about", "process"),
    ("Case Studies", "#contact", "case-studies"),
];

const FOOTER_CONNECT_LINKS: &[(&str, &str, &str)] = &[
    ("hello@nominalco.com", "mailto:hello@nominalco.com", "email"),
    ("LinkedIn", "https://linkedin.com/company/nominalco", "linkedin"),
    ("Twitter", "https://twitter.com/nominalco", "twitter"),
];

/// Built-in project list, the last tier of the project feed.
pub fn projects() -> Vec<Project> {
    serde_json::from_str(DEFAULT_PROJECTS).unwrap_or_else(|e| {
        error!("Bundled default projects are invalid: {}", e);
        Vec::new()
    })
}

pub fn site_content() -> SiteContent {
    SiteContent::new(to_map(SITE_CONTENT))
}

pub fn site_content_value(key: &str) -> Option<&'static str> {
    SITE_CONTENT
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

pub fn footer() -> FooterData {
    FooterData {
        content: to_map(FOOTER_CONTENT),
        links: FooterLinks {
            work: to_links(FOOTER_WORK_LINKS),
            connect: to_links(FOOTER_CONNECT_LINKS),
        },
    }
}

fn to_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn to_links(links: &[(&str, &str, &str)]) -> Vec<FooterLink> {
    links
        .iter()
        .map(|(text, url, key)| FooterLink {
            text: text.to_string(),
            url: url.to_string(),
            key: key.to_string(),
        })
        .collect()
}
