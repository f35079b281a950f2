//! Pure read operations over a loaded [`ProfileDocument`].
//!
//! Nothing here fails on document content: absent optional values render as
//! [`NOT_SPECIFIED`] instead of erroring.

use std::fmt;

use crate::document::ProfileDocument;

pub const NOT_SPECIFIED: &str = "Not specified";
pub const TOP_SKILLS_LIMIT: usize = 5;

/// The full document, unfiltered. Shared borrow only; the store stays immutable.
pub fn get_full(doc: &ProfileDocument) -> &ProfileDocument {
    doc
}

/// Full document as pretty JSON behind a short preamble.
pub fn render_full(doc: &ProfileDocument) -> Result<String, serde_json::Error> {
    let json = get_full(doc).to_pretty_json()?;
    Ok(format!("Here's the complete resume data:\n\n{json}"))
}

/// Deterministic multi-line digest of the document.
pub fn summarize(doc: &ProfileDocument) -> String {
    let info = &doc.personal_info;
    let current_role = doc
        .current_role()
        .map(|role| format!("{} at {}", role.position, role.company))
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());
    let education = doc
        .education
        .first()
        .map(|edu| format!("{} in {} from {}", edu.degree, edu.field, edu.institution))
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());
    let top_skills = if doc.skills.technical.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        doc.skills
            .technical
            .iter()
            .take(TOP_SKILLS_LIMIT)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "📋 Resume Summary:\n\
         \n\
         👤 {name}\n\
         📧 {email}\n\
         📍 {location}\n\
         \n\
         💼 Current Role: {current_role}\n\
         🎓 Education: {education}\n\
         ⭐ Top Skills: {top_skills}\n\
         🏆 Experience: {positions} positions listed\n\
         \n\
         📄 Summary: {summary}",
        name = info.name,
        email = or_placeholder(info.email.as_deref()),
        location = or_placeholder(info.location.as_deref()),
        positions = doc.experience.len(),
        summary = doc.summary,
    )
}

fn or_placeholder(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_SPECIFIED)
}

/// One matching field, with enough context to find its source entity.
/// Indices are 1-based positions in their source list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchHit<'a> {
    Experience {
        index: usize,
        position: &'a str,
        company: &'a str,
        description: &'a str,
    },
    Achievement {
        experience_index: usize,
        text: &'a str,
    },
    TechnicalSkill(&'a str),
    Project {
        index: usize,
        name: &'a str,
        description: &'a str,
    },
}

impl SearchHit<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            SearchHit::Experience { .. } => "Experience",
            SearchHit::Achievement { .. } => "Achievement",
            SearchHit::TechnicalSkill(_) => "Technical Skill",
            SearchHit::Project { .. } => "Project",
        }
    }
}

impl fmt::Display for SearchHit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchHit::Experience {
                index,
                position,
                company,
                description,
            } => write!(
                f,
                "🏢 {} {index}: {position} at {company} - {description}",
                self.label()
            ),
            SearchHit::Achievement {
                experience_index,
                text,
            } => write!(
                f,
                "🎯 {} (Experience {experience_index}): {text}",
                self.label()
            ),
            SearchHit::TechnicalSkill(skill) => write!(f, "🛠️ {}: {skill}", self.label()),
            SearchHit::Project {
                index,
                name,
                description,
            } => write!(f, "🚀 {} {index}: {name} - {description}", self.label()),
        }
    }
}

/// Case-insensitive substring matcher. An empty query matches every field.
struct Matcher {
    needle: String,
}

impl Matcher {
    fn new(query: &str) -> Self {
        Self {
            needle: query.to_lowercase(),
        }
    }

    fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.needle)
    }
}

/// All hits for `query`, in source order: experience entries (each followed by
/// its matching achievements), then technical skills, then projects.
pub fn search_hits<'a>(doc: &'a ProfileDocument, query: &str) -> Vec<SearchHit<'a>> {
    let matcher = Matcher::new(query);
    let mut hits = Vec::new();

    for (i, exp) in doc.experience.iter().enumerate() {
        let index = i + 1;
        if matcher.matches(&exp.company)
            || matcher.matches(&exp.position)
            || matcher.matches(&exp.description)
        {
            hits.push(SearchHit::Experience {
                index,
                position: &exp.position,
                company: &exp.company,
                description: &exp.description,
            });
        }
        hits.extend(
            exp.achievements
                .iter()
                .filter(|achievement| matcher.matches(achievement))
                .map(|text| SearchHit::Achievement {
                    experience_index: index,
                    text,
                }),
        );
    }

    hits.extend(
        doc.skills
            .technical
            .iter()
            .filter(|skill| matcher.matches(skill))
            .map(|skill| SearchHit::TechnicalSkill(skill)),
    );

    for (i, project) in doc.projects.iter().enumerate() {
        if matcher.matches(&project.name) || matcher.matches(&project.description) {
            hits.push(SearchHit::Project {
                index: i + 1,
                name: &project.name,
                description: &project.description,
            });
        }
    }

    hits
}

/// Rendered search listing. Never empty: zero hits yield a "no results" line.
pub fn search(doc: &ProfileDocument, query: &str) -> String {
    let hits = search_hits(doc, query);
    if hits.is_empty() {
        return format!("No results found for \"{query}\" in the resume.");
    }

    let lines: Vec<String> = hits.iter().map(ToString::to_string).collect();
    format!(
        "Found {} results for \"{query}\":\n\n{}",
        hits.len(),
        lines.join("\n\n")
    )
}
