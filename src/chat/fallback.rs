//! Rule-based fallback responder
//!
//! Answers a chat message from a fixed table of canned replies when the AI
//! provider is unconfigured or failing. Pure CPU logic, no I/O, cannot fail.
//!
//! Matching is case-insensitive substring search over an ordered rule table;
//! the first rule with any matching keyword wins, so "what projects use
//! your skills?" resolves to [`Topic::Skills`].

use serde::Serialize;

/// Category a message was matched to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Skills,
    Experience,
    Education,
    Contact,
    Projects,
    Location,
    Languages,
    Default,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Skills => "skills",
            Topic::Experience => "experience",
            Topic::Education => "education",
            Topic::Contact => "contact",
            Topic::Projects => "projects",
            Topic::Location => "location",
            Topic::Languages => "languages",
            Topic::Default => "default",
        }
    }

    /// Canned answer for this topic
    pub fn answer(&self) -> &'static str {
        match self {
            Topic::Skills => {
                "Oussema works across the stack: React, Vue.js, Node.js, Express, NestJS, \
                 Spring Boot and Django, in Java, Python, JavaScript and TypeScript. On the \
                 operations side he uses AWS, Docker, Kubernetes, CI/CD pipelines and Git."
            }
            Topic::Experience => {
                "Oussema was a Backend Engineer at Talan Tunisie (2021-2022), building services \
                 with Spring Boot and Java, and then a Web Developer at Ditriot (2022-2023), \
                 focused on React, Node.js and AWS."
            }
            Topic::Education => {
                "Oussema is studying for a Master's in Computer Science at Hochschule \
                 Schmalkalden in Germany. He holds a Bachelor's degree from Esprit School of \
                 Engineering in Tunisia."
            }
            Topic::Contact => {
                "You can reach Oussema by email at o.amri@stud.fh-sm.de or by phone at \
                 (+49) 15510 357723. The contact form on this site works too."
            }
            Topic::Projects => {
                "Highlights include an AI-driven Quiz Application with adaptive learning, \
                 Collaboradoc (real-time document collaboration with versioning), a DevOps \
                 pipeline with Jenkins, Maven and Docker, a Spring Boot microservices \
                 architecture on Kubernetes, and a University Dormitory Management System."
            }
            Topic::Location => "Oussema is currently based in Meiningen, Germany.",
            Topic::Languages => {
                "Oussema speaks Arabic (native), English (fluent), French (fluent) and German \
                 (intermediate)."
            }
            Topic::Default => {
                "I'm Oussema's portfolio assistant. I can tell you about his skills, work \
                 experience, education, contact details or projects. What would you like to know?"
            }
        }
    }
}

/// Ordered rule table; earlier rules take priority
const RULES: &[(Topic, &[&str])] = &[
    (Topic::Skills, &["skill"]),
    (Topic::Experience, &["experience", "work"]),
    (Topic::Education, &["education", "study"]),
    (Topic::Contact, &["contact", "email", "phone"]),
    (Topic::Projects, &["project"]),
    (Topic::Location, &["location", "live"]),
    (Topic::Languages, &["language", "speak"]),
];

/// Match a message to the first topic whose keywords it contains
pub fn classify(message: &str) -> Topic {
    let lowered = message.to_lowercase();
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(topic, _)| *topic)
        .unwrap_or(Topic::Default)
}

/// Canned answer for `message`
pub fn fallback_answer(message: &str) -> &'static str {
    classify(message).answer()
}
