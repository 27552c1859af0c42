use std::collections::HashSet;
use std::fmt::Debug;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Wire identifier (and label) of the general application pseudo-posting.
pub const GENERAL_APPLICATION_ID: &str = "new-role";

/// Employment arrangement advertised on a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentKind {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Internship")]
    Internship,
    #[serde(rename = "Contract")]
    Contract,
}

impl EmploymentKind {
    pub fn label(self) -> &'static str {
        match self {
            EmploymentKind::FullTime => "Full-time",
            EmploymentKind::Internship => "Internship",
            EmploymentKind::Contract => "Contract",
        }
    }
}

/// Descriptive metadata for a listed role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: EmploymentKind,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub description: String,
    pub tag_color: String,
}

impl JobPosting {
    /// The pseudo-posting offered to applicants whose role is not listed.
    pub fn general_application() -> Self {
        Self {
            id: GENERAL_APPLICATION_ID.to_string(),
            title: "New Role Application".to_string(),
            kind: EmploymentKind::FullTime,
            location: "TBD".to_string(),
            experience: None,
            duration: None,
            description: "You're applying for a role that isn't currently listed.".to_string(),
            tag_color: "bg-blue-500".to_string(),
        }
    }

    pub fn is_general_application(&self) -> bool {
        self.id == GENERAL_APPLICATION_ID
    }

    pub fn target(&self) -> PositionTarget {
        if self.is_general_application() {
            PositionTarget::GeneralApplication
        } else {
            PositionTarget::Listed {
                id: self.id.clone(),
                title: self.title.clone(),
            }
        }
    }
}

/// What an applicant is applying for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionTarget {
    Listed { id: String, title: String },
    GeneralApplication,
}

impl PositionTarget {
    /// Interpret the `position` label and `positionId` fields of a form post.
    pub fn from_form(label: &str, id: &str) -> Self {
        if label == GENERAL_APPLICATION_ID {
            PositionTarget::GeneralApplication
        } else {
            PositionTarget::Listed {
                id: id.to_string(),
                title: label.to_string(),
            }
        }
    }

    pub fn form_label(&self) -> &str {
        match self {
            PositionTarget::Listed { title, .. } => title,
            PositionTarget::GeneralApplication => GENERAL_APPLICATION_ID,
        }
    }

    pub fn form_id(&self) -> &str {
        match self {
            PositionTarget::Listed { id, .. } => id,
            PositionTarget::GeneralApplication => GENERAL_APPLICATION_ID,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("unable to read listings: {0}")]
    Io(#[from] std::io::Error),
    #[error("listings are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("posting id '{0}' is reserved for general applications")]
    ReservedId(String),
    #[error("posting id '{0}' appears more than once")]
    DuplicateId(String),
}

/// Read-only supplier of the postings rendered on the careers page.
pub trait ListingSource: Debug + Send + Sync {
    fn postings(&self) -> Vec<JobPosting>;

    fn find(&self, id: &str) -> Option<JobPosting> {
        if id == GENERAL_APPLICATION_ID {
            return Some(JobPosting::general_application());
        }
        self.postings().into_iter().find(|posting| posting.id == id)
    }
}

/// In-process posting list.
#[derive(Debug, Clone)]
pub struct StaticListings {
    postings: Vec<JobPosting>,
}

impl StaticListings {
    pub fn new(postings: Vec<JobPosting>) -> Result<Self, ListingError> {
        let mut seen = HashSet::new();
        for posting in &postings {
            if posting.is_general_application() {
                return Err(ListingError::ReservedId(posting.id.clone()));
            }
            if !seen.insert(posting.id.as_str()) {
                return Err(ListingError::DuplicateId(posting.id.clone()));
            }
        }
        Ok(Self { postings })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ListingError> {
        let postings: Vec<JobPosting> = serde_json::from_reader(reader)?;
        Self::new(postings)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, ListingError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// The roles currently advertised on the site.
    pub fn standard() -> Self {
        let postings = vec![
            full_time(
                "event-manager",
                "Event Manager",
                "Ahmedabad / Remote",
                "2+ years",
                "Plan and execute amazing events. Lead event planning, coordinate with vendors, manage logistics, and ensure memorable experiences for our attendees.",
            ),
            full_time(
                "marketing-lead",
                "Marketing Lead",
                "Ahmedabad / Remote",
                "3+ years",
                "Drive marketing strategy and campaigns. Create engaging content, manage social media, analyze performance metrics, and grow our brand presence.",
            ),
            full_time(
                "content-specialist",
                "Content Specialist",
                "Ahmedabad / Remote",
                "1+ years",
                "Create engaging content across platforms. Write compelling copy, create social media content, manage content calendar, and maintain brand voice.",
            ),
            full_time(
                "operations-associate",
                "Operations Associate",
                "Ahmedabad (Onsite)",
                "1+ years",
                "Keep everything running smoothly. Support day-to-day operations, coordinate with teams, manage documentation, and ensure efficient processes.",
            ),
            full_time(
                "developer",
                "Developer (React.js/Next.js)",
                "Ahmedabad / Remote",
                "2+ years",
                "Build our platform and features. Develop responsive web applications, write clean code, collaborate with team, and maintain high code quality.",
            ),
            JobPosting {
                id: "sales-intern".to_string(),
                title: "Inside Sales Intern".to_string(),
                kind: EmploymentKind::Internship,
                location: "Ahmedabad (Onsite)".to_string(),
                experience: None,
                duration: Some("3-6 months".to_string()),
                description: "Gain hands-on experience in technology sales, business development, and customer relations. Opportunity for full-time role (PPO) upon completion.".to_string(),
                tag_color: "bg-yellow-500".to_string(),
            },
            full_time(
                "ui-designer",
                "UI/UX Designer",
                "Ahmedabad / Remote",
                "2+ years",
                "Create beautiful user experiences. Design intuitive interfaces, create prototypes, conduct user research, and collaborate with development team.",
            ),
        ];

        Self { postings }
    }
}

impl Default for StaticListings {
    fn default() -> Self {
        Self::standard()
    }
}

impl ListingSource for StaticListings {
    fn postings(&self) -> Vec<JobPosting> {
        self.postings.clone()
    }
}

fn full_time(
    id: &str,
    title: &str,
    location: &str,
    experience: &str,
    description: &str,
) -> JobPosting {
    JobPosting {
        id: id.to_string(),
        title: title.to_string(),
        kind: EmploymentKind::FullTime,
        location: location.to_string(),
        experience: Some(experience.to_string()),
        duration: None,
        description: description.to_string(),
        tag_color: "bg-blue-500".to_string(),
    }
}
