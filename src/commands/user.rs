use super::report;
use crate::{
    db::users::User,
    libs::{
        messages::Message,
        service::{BookingService, LoginOutcome},
        view::View,
    },
    msg_bail_anyhow, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Password};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    /// Register a new user
    Register {
        /// First name
        first_name: String,
        /// Last name
        last_name: String,
        /// Email address, used as the login
        email: String,
        /// Registration access code
        #[arg(short, long)]
        code: String,
        /// Password; prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Check a user's credentials
    Login {
        email: String,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Show a registered user
    Show { email: String },
    /// Grant administrator rights
    Promote { email: String },
}

pub fn cmd(service: &BookingService, args: UserArgs) -> Result<()> {
    match args.command {
        UserCommand::Register {
            first_name,
            last_name,
            email,
            code,
            password,
        } => {
            let password = password_or_prompt(password, true)?;
            match service.register(&first_name, &last_name, &email, &password, &code) {
                Ok(user) => msg_success!(Message::UserRegistered(user.email)),
                Err(e) => report(e)?,
            }
            Ok(())
        }
        UserCommand::Login { email, password } => {
            let password = password_or_prompt(password, false)?;
            match service.authenticate(&email, &password)? {
                LoginOutcome::Success => msg_success!(Message::LoginSucceeded(email)),
                LoginOutcome::AdminSuccess => msg_success!(Message::AdminLoginSucceeded(email)),
                LoginOutcome::WrongPassword => msg_bail_anyhow!(Message::LoginWrongPassword),
                LoginOutcome::UnknownEmail => msg_bail_anyhow!(Message::LoginUnknownEmail),
            }
            Ok(())
        }
        UserCommand::Show { email } => {
            match service.lookup_user(&email)? {
                Some(user) => {
                    msg_print!(Message::UserHeader, true);
                    View::user(&user)?;
                }
                None => msg_bail_anyhow!(Message::UserNotFound(email)),
            }
            Ok(())
        }
        UserCommand::Promote { email } => {
            match service.promote_to_admin(&email) {
                Ok(()) => msg_success!(Message::UserPromoted(email)),
                Err(e) => report(e)?,
            }
            Ok(())
        }
    }
}

/// Authenticates the user a booking command acts for.
pub fn sign_in(service: &BookingService, email: &str, password: Option<String>) -> Result<User> {
    let password = password_or_prompt(password, false)?;
    match service.authenticate(email, &password)? {
        outcome if outcome.is_success() => match service.lookup_user(email)? {
            Some(user) => Ok(user),
            None => msg_bail_anyhow!(Message::UserNotFound(email.to_string())),
        },
        LoginOutcome::WrongPassword => msg_bail_anyhow!(Message::LoginWrongPassword),
        _ => msg_bail_anyhow!(Message::LoginUnknownEmail),
    }
}

fn password_or_prompt(password: Option<String>, confirm: bool) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    let theme = ColorfulTheme::default();
    let mut prompt = Password::with_theme(&theme).with_prompt(Message::PromptPassword.to_string());
    if confirm {
        prompt = prompt.with_confirmation(Message::PromptRepeatPassword.to_string(), Message::PasswordMismatch.to_string());
    }
    Ok(prompt.interact()?)
}
