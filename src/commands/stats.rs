use crate::{
    libs::{messages::Message, service::BookingService, view::View},
    msg_bail_anyhow, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Only show this user
    #[arg(short, long)]
    email: Option<String>,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn cmd(service: &BookingService, args: StatsArgs) -> Result<()> {
    let stats = match &args.email {
        Some(email) => match service.user_stats(email)? {
            Some(stats) => vec![stats],
            None => msg_bail_anyhow!(Message::UserNotFound(email.clone())),
        },
        None => service.all_user_stats()?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    msg_print!(Message::RegistrationCount(service.registration_count()?));
    msg_print!(Message::StatsHeader, true);
    View::stats(&stats)?;
    Ok(())
}
