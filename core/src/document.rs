use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// The structured profile (resume) every tool reads from.
///
/// Immutable once loaded. List fields default to empty so a document parsed from
/// a sparse JSON file is still fully populated before any handler sees it.
/// Documents read with [`ProfileDocument::from_json`] also keep the JSON they
/// came from, so keys outside the typed model survive full-document output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDocument {
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: Skills,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(skip)]
    source: Option<Value>,
}

/// Name plus optional contact and profile links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "linkedIn", default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// One position held. `current` marks the role shown in summaries; more than one
/// entry may carry it, in which case the first wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Skills {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ProfileDocument {
    /// Parse a document from JSON text, keeping the parsed source.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let source: Value = serde_json::from_str(raw)?;
        let mut document = Self::deserialize(&source)?;
        document.source = Some(source);
        Ok(document)
    }

    /// Pretty JSON of the document as loaded: the source JSON when there is
    /// one, otherwise the typed fields.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        match &self.source {
            Some(source) => serde_json::to_string_pretty(source),
            None => serde_json::to_string_pretty(self),
        }
    }

    /// First experience entry flagged `current`, if any.
    pub fn current_role(&self) -> Option<&ExperienceEntry> {
        self.experience.iter().find(|entry| entry.current)
    }

    /// Built-in placeholder resume served when no document file is configured.
    pub fn sample() -> Self {
        Self {
            personal_info: PersonalInfo {
                name: "Your Name".to_string(),
                email: Some("your.email@example.com".to_string()),
                phone: Some("+1 (555) 123-4567".to_string()),
                location: Some("San Francisco, CA".to_string()),
                linkedin: Some("https://linkedin.com/in/yourprofile".to_string()),
                github: Some("https://github.com/yourusername".to_string()),
                website: Some("https://yourwebsite.com".to_string()),
            },
            summary: "Experienced software engineer with expertise in full-stack development, cloud technologies, and scalable system design.".to_string(),
            experience: vec![ExperienceEntry {
                company: "Tech Company Inc.".to_string(),
                position: "Senior Software Engineer".to_string(),
                start_date: "2022-01".to_string(),
                end_date: None,
                current: true,
                description:
                    "Lead development of cloud-native applications and microservices architecture"
                        .to_string(),
                achievements: vec![
                    "Designed and implemented scalable APIs serving 1M+ requests/day".to_string(),
                    "Reduced deployment time by 80% through CI/CD automation".to_string(),
                    "Mentored 5 junior developers and led cross-functional teams".to_string(),
                ],
            }],
            education: vec![EducationEntry {
                institution: "Stanford University".to_string(),
                degree: "Bachelor of Science".to_string(),
                field: "Computer Science".to_string(),
                year: "2020".to_string(),
                gpa: Some("3.8".to_string()),
            }],
            skills: Skills {
                technical: [
                    "JavaScript",
                    "TypeScript",
                    "React",
                    "Node.js",
                    "Python",
                    "AWS",
                    "Docker",
                    "Kubernetes",
                ]
                .into_iter()
                .map(String::from)
                .collect(),
                languages: vec![
                    "English (Native)".to_string(),
                    "Spanish (Conversational)".to_string(),
                ],
                certifications: vec!["AWS Certified Solutions Architect".to_string()],
            },
            projects: vec![ProjectEntry {
                name: "Open Source Project".to_string(),
                description: "A TypeScript library for building scalable web applications"
                    .to_string(),
                technologies: vec![
                    "TypeScript".to_string(),
                    "Node.js".to_string(),
                    "Jest".to_string(),
                ],
                url: Some("https://npm.js/package/your-project".to_string()),
            }],
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn sparse_json_loads_with_empty_lists() {
        let doc = ProfileDocument::from_json(r#"{ "personalInfo": { "name": "Ada" } }"#)
            .expect("minimal document should parse");
        assert_eq!(doc.personal_info.name, "Ada");
        assert!(doc.experience.is_empty());
        assert!(doc.education.is_empty());
        assert!(doc.projects.is_empty());
        assert!(doc.skills.technical.is_empty());
        assert_eq!(doc.summary, "");
    }

    #[test]
    fn sample_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(ProfileDocument::sample()).unwrap();
        assert_eq!(value["personalInfo"]["linkedIn"], "https://linkedin.com/in/yourprofile");
        assert_eq!(value["experience"][0]["startDate"], "2022-01");
        assert!(value["experience"][0].get("endDate").is_none());
        assert_eq!(value["education"][0]["gpa"], "3.8");
    }

    #[test]
    fn json_round_trip_keeps_every_field() {
        let raw = json!({
            "personalInfo": { "name": "Grace", "github": "https://github.com/grace" },
            "summary": "Compiler pioneer",
            "experience": [{
                "company": "Navy",
                "position": "Rear Admiral",
                "startDate": "1943-12",
                "endDate": "1986-08",
                "current": false,
                "description": "COBOL",
                "achievements": ["First compiler"]
            }],
            "education": [{ "institution": "Yale", "degree": "PhD", "field": "Mathematics", "year": "1934" }],
            "skills": { "technical": ["COBOL"], "languages": [], "certifications": [] },
            "projects": [{ "name": "A-0", "description": "Linker", "technologies": [] }]
        });
        let doc: ProfileDocument = serde_json::from_value(raw.clone()).unwrap();
        let back: Value = serde_json::to_value(&doc).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn current_role_picks_first_flagged_entry() {
        let mut doc = ProfileDocument::sample();
        let mut second = doc.experience[0].clone();
        second.company = "Other Corp".to_string();
        doc.experience.push(second);
        assert_eq!(doc.current_role().unwrap().company, "Tech Company Inc.");

        for entry in &mut doc.experience {
            entry.current = false;
        }
        assert!(doc.current_role().is_none());
    }

    #[test]
    fn pretty_json_keeps_unknown_keys_and_absent_defaults() {
        let raw = json!({
            "personalInfo": { "name": "Ada", "twitter": "@ada" },
            "experience": [{
                "company": "Analytical Engines",
                "position": "Programmer",
                "startDate": "1842",
                "team": "Notes"
            }],
            "skills": { "technical": ["Bernoulli numbers"], "soft": ["Writing"] },
            "awards": [{ "title": "First program" }]
        });
        let doc = ProfileDocument::from_json(&raw.to_string()).unwrap();
        assert_eq!(doc.experience[0].description, "");
        assert!(!doc.experience[0].current);

        let back: Value = serde_json::from_str(&doc.to_pretty_json().unwrap()).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn pretty_json_without_source_uses_typed_fields() {
        let doc = ProfileDocument::sample();
        let back: Value = serde_json::from_str(&doc.to_pretty_json().unwrap()).unwrap();
        assert_eq!(back, serde_json::to_value(&doc).unwrap());
    }
}
