use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameworkKind {
    #[default]
    Danielson,
    Marshall,
    Custom,
}

impl FrameworkKind {
    pub const fn ordered() -> [Self; 3] {
        [Self::Danielson, Self::Marshall, Self::Custom]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Danielson => "danielson",
            Self::Marshall => "marshall",
            Self::Custom => "custom",
        }
    }

    /// Short name used in framework listings.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Danielson => "Danielson Framework",
            Self::Marshall => "Marshall Rubrics",
            Self::Custom => "Custom (Mix of Both)",
        }
    }
}

impl fmt::Display for FrameworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrameworkKind {
    type Err = UnknownFramework;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "danielson" => Ok(Self::Danielson),
            "marshall" => Ok(Self::Marshall),
            "custom" => Ok(Self::Custom),
            _ => Err(UnknownFramework(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown framework '{0}'")]
pub struct UnknownFramework(pub String);

#[derive(Debug, Serialize)]
pub struct Element {
    pub id: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Domain {
    pub id: &'static str,
    pub name: &'static str,
    pub elements: &'static [Element],
}

/// One framework as exposed to callers. Custom is assembled on demand from the
/// Danielson and Marshall domains rather than stored.
#[derive(Debug, Clone, Serialize)]
pub struct FrameworkView {
    #[serde(rename = "type")]
    pub kind: FrameworkKind,
    pub name: &'static str,
    pub domains: Vec<&'static Domain>,
}

impl FrameworkView {
    pub fn elements(&self) -> impl Iterator<Item = (&'static Domain, &'static Element)> + '_ {
        self.domains
            .iter()
            .flat_map(|domain| domain.elements.iter().map(move |element| (*domain, element)))
    }

    pub fn element(&self, element_id: &str) -> Option<&'static Element> {
        self.elements()
            .map(|(_, element)| element)
            .find(|element| element.id == element_id)
    }

    pub fn element_ids(&self) -> Vec<String> {
        self.elements()
            .map(|(_, element)| element.id.to_string())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameworkSummary {
    #[serde(rename = "type")]
    pub kind: FrameworkKind,
    pub name: &'static str,
    pub domain_count: usize,
}

/// An element selected for scoring, with its owning domain name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedElement {
    pub id: &'static str,
    pub name: &'static str,
    pub domain: &'static str,
}

pub fn framework(kind: FrameworkKind) -> FrameworkView {
    let (name, domains): (&'static str, Vec<&'static Domain>) = match kind {
        FrameworkKind::Danielson => ("Danielson Framework", DANIELSON_DOMAINS.iter().collect()),
        FrameworkKind::Marshall => (
            "Marshall Teacher Evaluation Rubrics",
            MARSHALL_DOMAINS.iter().collect(),
        ),
        FrameworkKind::Custom => (
            "Custom Framework",
            DANIELSON_DOMAINS
                .iter()
                .chain(MARSHALL_DOMAINS.iter())
                .collect(),
        ),
    };

    FrameworkView {
        kind,
        name,
        domains,
    }
}

pub fn summaries() -> Vec<FrameworkSummary> {
    FrameworkKind::ordered()
        .into_iter()
        .map(|kind| FrameworkSummary {
            kind,
            name: kind.label(),
            domain_count: framework(kind).domains.len(),
        })
        .collect()
}

/// Elements to score for a framework; an empty selection means every element.
pub fn elements_for(kind: FrameworkKind, selected: &[String]) -> Vec<SelectedElement> {
    framework(kind)
        .elements()
        .filter(|(_, element)| selected.is_empty() || selected.iter().any(|id| id == element.id))
        .map(|(domain, element)| SelectedElement {
            id: element.id,
            name: element.name,
            domain: domain.name,
        })
        .collect()
}

/// Roster columns used when no framework selection has been saved.
pub fn default_selection() -> Vec<String> {
    framework(FrameworkKind::Danielson).element_ids()
}

/// Resolves an element name anywhere in the combined catalog.
pub fn element_name(element_id: &str) -> Option<&'static str> {
    framework(FrameworkKind::Custom)
        .element(element_id)
        .map(|element| element.name)
}

macro_rules! elements {
    ($(($id:literal, $name:literal)),+ $(,)?) => {
        &[$(Element { id: $id, name: $name }),+]
    };
}

static DANIELSON_DOMAINS: [Domain; 4] = [
    Domain {
        id: "d1",
        name: "Domain 1: Planning and Preparation",
        elements: elements![
            ("d1a", "Demonstrating Knowledge of Content and Pedagogy"),
            ("d1b", "Demonstrating Knowledge of Students"),
            ("d1c", "Setting Instructional Outcomes"),
            ("d1d", "Demonstrating Knowledge of Resources"),
            ("d1e", "Designing Coherent Instruction"),
            ("d1f", "Designing Student Assessments"),
        ],
    },
    Domain {
        id: "d2",
        name: "Domain 2: Classroom Environment",
        elements: elements![
            ("d2a", "Creating an Environment of Respect and Rapport"),
            ("d2b", "Establishing a Culture for Learning"),
            ("d2c", "Managing Classroom Procedures"),
            ("d2d", "Managing Student Behavior"),
            ("d2e", "Organizing Physical Space"),
        ],
    },
    Domain {
        id: "d3",
        name: "Domain 3: Instruction",
        elements: elements![
            ("d3a", "Communicating with Students"),
            ("d3b", "Using Questioning and Discussion Techniques"),
            ("d3c", "Engaging Students in Learning"),
            ("d3d", "Using Assessment in Instruction"),
            ("d3e", "Demonstrating Flexibility and Responsiveness"),
        ],
    },
    Domain {
        id: "d4",
        name: "Domain 4: Professional Responsibilities",
        elements: elements![
            ("d4a", "Reflecting on Teaching"),
            ("d4b", "Maintaining Accurate Records"),
            ("d4c", "Communicating with Families"),
            ("d4d", "Participating in the Professional Community"),
            ("d4e", "Growing and Developing Professionally"),
            ("d4f", "Showing Professionalism"),
        ],
    },
];

static MARSHALL_DOMAINS: [Domain; 6] = [
    Domain {
        id: "m1",
        name: "A. Planning and Preparation for Learning",
        elements: elements![
            ("m1a", "Knowledge of Subject Matter"),
            ("m1b", "Strategic Planning"),
            ("m1c", "Curriculum Alignment"),
            ("m1d", "Assessment Design"),
            ("m1e", "Anticipating Student Needs"),
            ("m1f", "Lesson Preparation"),
            ("m1g", "Student Engagement Planning"),
            ("m1h", "Materials Preparation"),
            ("m1i", "Differentiation Planning"),
            ("m1j", "Environment Setup"),
        ],
    },
    Domain {
        id: "m2",
        name: "B. Classroom Management",
        elements: elements![
            ("m2a", "Expectations and Norms"),
            ("m2b", "Student Relationships"),
            ("m2c", "Routines and Procedures"),
            ("m2d", "Behavior Management"),
            ("m2e", "Physical Space Organization"),
        ],
    },
    Domain {
        id: "m3",
        name: "C. Delivery of Instruction",
        elements: elements![
            ("m3a", "Clear Communication"),
            ("m3b", "Questioning Techniques"),
            ("m3c", "Student Engagement"),
            ("m3d", "Pacing and Flexibility"),
            ("m3e", "Differentiated Instruction"),
        ],
    },
    Domain {
        id: "m4",
        name: "D. Monitoring, Assessment, and Follow-Up",
        elements: elements![
            ("m4a", "Ongoing Assessment"),
            ("m4b", "Feedback Quality"),
            ("m4c", "Data-Driven Decisions"),
            ("m4d", "Student Progress Tracking"),
        ],
    },
    Domain {
        id: "m5",
        name: "E. Family and Community Outreach",
        elements: elements![
            ("m5a", "Family Communication"),
            ("m5b", "Community Engagement"),
            ("m5c", "Cultural Responsiveness"),
        ],
    },
    Domain {
        id: "m6",
        name: "F. Professional Responsibilities",
        elements: elements![
            ("m6a", "Self-Reflection"),
            ("m6b", "Professional Development"),
            ("m6c", "Collaboration"),
            ("m6d", "School Community Participation"),
        ],
    },
];
