//! Inline UI dictionaries compiled into the crate.
//!
//! These cover the fixed chrome of the page (navigation, buttons, form labels,
//! notifications, tooltips). Structured content (jobs, projects, skills,
//! certifications) comes from the bootstrap data file instead.
//!
//! Placeholders use the `{{name}}` syntax understood by `KeyResolver::resolve_with`.

use crate::i18n::{Language, TranslationDictionary};
use serde_json::{json, Value};

/// Inline dictionary for a language.
pub fn builtin_dictionary(language: Language) -> TranslationDictionary {
    let value = match language.code() {
        "en" => english(),
        _ => spanish(),
    };
    TranslationDictionary::from(match value {
        Value::Object(map) => map,
        _ => Default::default(),
    })
}

fn spanish() -> Value {
    json!({
        "nav": {
            "inicio": "Inicio",
            "sobreMi": "Sobre Mí",
            "habilidades": "Habilidades",
            "experiencia": "Experiencia",
            "certificaciones": "Certificaciones",
            "proyectos": "Proyectos",
            "contacto": "Contacto",
            "idioma": "Language"
        },
        "hero": {
            "greeting": "Hola, soy",
            "btnProjects": "Ver Proyectos",
            "btnContact": "Contáctame"
        },
        "about": { "title": "Sobre Mí" },
        "skills": {
            "title": "Habilidades Técnicas",
            "subtitle": "Tecnologías y herramientas que domino"
        },
        "experience": {
            "title": "Experiencia Profesional",
            "subtitle": "Mi trayectoria profesional"
        },
        "certifications": {
            "title": "Certificaciones",
            "subtitle": "Certificaciones profesionales y especializaciones"
        },
        "projects": {
            "title": "Proyectos Destacados",
            "subtitle": "Algunos de mis trabajos destacados"
        },
        "contact": {
            "title": "Contacto",
            "subtitle": "Trabajemos juntos",
            "form": {
                "name": "Nombre",
                "email": "Email",
                "subject": "Asunto",
                "message": "Mensaje",
                "send": "Enviar Mensaje"
            },
            "notifications": {
                "success": "¡Mensaje enviado correctamente!",
                "error": "Error al enviar el mensaje. Inténtalo de nuevo.",
                "languageChanged": "Idioma cambiado a {{language}}"
            }
        },
        "footer": {
            "copyright": "© {{year}} Laura Carvajal. Todos los derechos reservados.",
            "madeWith": "Diseñado y desarrollado con ❤️ usando HTML5, CSS3 y JavaScript"
        },
        "ui": {
            "buttons": {
                "viewProject": "Ver Proyecto",
                "viewCode": "Ver Código"
            },
            "language": { "toggle": "Cambiar idioma" },
            "theme": {
                "toggle": "Cambiar tema",
                "switchToLight": "Cambiar a tema claro",
                "switchToDark": "Cambiar a tema oscuro"
            },
            "system": {
                "loading": "Enviando...",
                "error": "Error",
                "success": "Éxito"
            }
        }
    })
}

fn english() -> Value {
    json!({
        "nav": {
            "inicio": "Home",
            "sobreMi": "About Me",
            "habilidades": "Skills",
            "experiencia": "Experience",
            "certificaciones": "Certifications",
            "proyectos": "Projects",
            "contacto": "Contact",
            "idioma": "Idioma"
        },
        "hero": {
            "greeting": "Hi, I'm",
            "btnProjects": "View Projects",
            "btnContact": "Contact Me"
        },
        "about": { "title": "About Me" },
        "skills": {
            "title": "Technical Skills",
            "subtitle": "Technologies and tools I master"
        },
        "experience": {
            "title": "Professional Experience",
            "subtitle": "My professional journey"
        },
        "certifications": {
            "title": "Certifications",
            "subtitle": "Professional certifications and specializations"
        },
        "projects": {
            "title": "Featured Projects",
            "subtitle": "Some of my featured work"
        },
        "contact": {
            "title": "Contact",
            "subtitle": "Let's work together",
            "form": {
                "name": "Name",
                "email": "Email",
                "subject": "Subject",
                "message": "Message",
                "send": "Send Message"
            },
            "notifications": {
                "success": "Message sent successfully!",
                "error": "There was an error. Please try again.",
                "languageChanged": "Language changed to {{language}}"
            }
        },
        "footer": {
            "copyright": "© {{year}} Laura Carvajal. All rights reserved.",
            "madeWith": "Designed and developed with ❤️ using HTML5, CSS3 and JavaScript"
        },
        "ui": {
            "buttons": {
                "viewProject": "View Project",
                "viewCode": "View Code"
            },
            "language": { "toggle": "Change language" },
            "theme": {
                "toggle": "Switch theme",
                "switchToLight": "Switch to light theme",
                "switchToDark": "Switch to dark theme"
            },
            "system": {
                "loading": "Sending...",
                "error": "Error",
                "success": "Success"
            }
        }
    })
}
