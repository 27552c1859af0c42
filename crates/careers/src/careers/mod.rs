//! Careers page backend: the posting list, the apply endpoint that relays
//! applications by email, and the form client that posts to it.

pub mod clock;
pub mod form;
pub mod mailer;
pub mod message;
pub mod postings;
pub mod relay;
pub mod router;
pub mod submission;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use form::{ApplicationClient, ApplicationFormState, FormError, ResumeFile, SubmitReceipt};
pub use mailer::{
    DispatchReceipt, MailError, Mailer, OutgoingMail, SmtpMailer, TransportSecurity,
};
pub use message::ApplicationEmail;
pub use postings::{
    EmploymentKind, JobPosting, ListingError, ListingSource, PositionTarget, StaticListings,
    GENERAL_APPLICATION_ID,
};
pub use relay::{ApplicationRelay, RelayError, RelayReceipt};
pub use router::{careers_router, ApplyResponse, CareersState, APPLY_PATH, POSITIONS_PATH};
pub use submission::{ApplicationForm, ApplicationSubmission, ResumeAttachment, SubmissionError};
