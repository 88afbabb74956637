use super::report;
use crate::{
    libs::{messages::Message, service::BookingService},
    msg_print, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct AccessCodeArgs {
    /// Replace the access code with this value
    #[arg(short, long)]
    set: Option<String>,
}

pub fn cmd(service: &BookingService, args: AccessCodeArgs) -> Result<()> {
    match args.set {
        Some(code) => match service.set_access_code(&code) {
            Ok(()) => msg_success!(Message::AccessCodeUpdated),
            Err(e) => report(e)?,
        },
        None => match service.access_code() {
            Ok(code) => msg_print!(Message::AccessCodeCurrent(code)),
            Err(e) => report(e)?,
        },
    }
    Ok(())
}
