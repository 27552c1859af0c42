use crate::infra::load_listings;
use careers::careers::{
    ApplicationClient, ApplicationFormState, JobPosting, ListingSource, PositionTarget, ResumeFile,
    GENERAL_APPLICATION_ID,
};
use careers::config::AppConfig;
use careers::error::AppError;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct PositionsArgs {
    /// Print the postings as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ApplyArgs {
    /// Applicant email address
    #[arg(long)]
    pub(crate) email: String,
    /// Applicant phone number
    #[arg(long)]
    pub(crate) phone: String,
    /// Posting id to apply for (defaults to a general application)
    #[arg(long, default_value = GENERAL_APPLICATION_ID)]
    pub(crate) position: String,
    /// Resume file to attach
    #[arg(long)]
    pub(crate) resume: Option<PathBuf>,
    /// Base URL of the careers service
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    pub(crate) endpoint: String,
}

pub(crate) fn run_positions(args: PositionsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let listings = load_listings(&config.careers)?;
    let postings = listings.postings();

    if args.json {
        let rendered = serde_json::to_string_pretty(&postings)
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
        println!("{rendered}");
        return Ok(());
    }

    println!("Open positions ({})", postings.len());
    for posting in &postings {
        println!("  {}", posting_line(posting));
    }
    println!(
        "\nDon't see your role? Apply with --position {}",
        GENERAL_APPLICATION_ID
    );
    Ok(())
}

fn posting_line(posting: &JobPosting) -> String {
    let mut line = format!(
        "{:<24} {:<28} {:<11} {}",
        posting.id,
        posting.title,
        posting.kind.label(),
        posting.location
    );
    if let Some(experience) = &posting.experience {
        line.push_str(&format!(" | {experience}"));
    }
    if let Some(duration) = &posting.duration {
        line.push_str(&format!(" | {duration}"));
    }
    line
}

pub(crate) async fn run_apply(args: ApplyArgs) -> Result<(), AppError> {
    let ApplyArgs {
        email,
        phone,
        position,
        resume,
        endpoint,
    } = args;

    let target = resolve_target(&position)?;
    let mut state = ApplicationFormState::new(target);
    state.email = email;
    state.phone = phone;
    if let Some(path) = resume {
        state.resume = Some(ResumeFile::from_path(&path)?);
    }

    let client = ApplicationClient::new(&endpoint);
    let receipt = client.submit(&mut state).await?;

    println!("{}", receipt.message);
    println!("Message ID: {}", receipt.message_id);
    Ok(())
}

fn resolve_target(position: &str) -> Result<PositionTarget, AppError> {
    if position == GENERAL_APPLICATION_ID {
        return Ok(PositionTarget::GeneralApplication);
    }
    let config = AppConfig::load()?;
    let listings = load_listings(&config.careers)?;
    listings
        .find(position)
        .map(|posting| posting.target())
        .ok_or_else(|| AppError::UnknownPosition(position.to_string()))
}
