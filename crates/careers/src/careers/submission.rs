use super::postings::PositionTarget;

/// Raw fields of an apply form post, as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationForm {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub position_id: Option<String>,
    pub resume: Option<ResumeAttachment>,
}

/// Uploaded resume, forwarded verbatim.
#[derive(Clone, PartialEq, Eq)]
pub struct ResumeAttachment {
    pub filename: String,
    pub content: Vec<u8>,
}

impl ResumeAttachment {
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }
}

impl std::fmt::Debug for ResumeAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResumeAttachment")
            .field("filename", &self.filename)
            .field("bytes", &self.content.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("Missing required fields: email, phone, and position are required")]
    MissingFields,
}

/// A validated application, consumed once by the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationSubmission {
    pub email: String,
    pub phone: String,
    pub position_label: String,
    pub position_id: String,
    pub target: PositionTarget,
    pub resume: Option<ResumeAttachment>,
}

impl ApplicationSubmission {
    /// Presence check on the required fields. Contents are not otherwise validated.
    pub fn from_form(form: ApplicationForm) -> Result<Self, SubmissionError> {
        let ApplicationForm {
            email,
            phone,
            position,
            position_id,
            resume,
        } = form;

        let (Some(email), Some(phone), Some(position_label)) =
            (present(email), present(phone), present(position))
        else {
            return Err(SubmissionError::MissingFields);
        };

        let position_id = position_id.unwrap_or_default();
        let target = PositionTarget::from_form(&position_label, &position_id);

        Ok(Self {
            email,
            phone,
            position_label,
            position_id,
            target,
            resume: resume.filter(|file| !file.is_empty()),
        })
    }

    pub fn is_general_application(&self) -> bool {
        self.target == PositionTarget::GeneralApplication
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
