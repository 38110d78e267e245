//! Send command implementation.
//!
//! Builds one backend command from the arguments, sends it and renders
//! the fresh snapshot. With `--snapshot` the reply is applied to a session
//! opened on that file, so a role mismatch is reported.

use tracing::info;

use crate::api::{load_snapshot, KontoClient};
use crate::cli::{parse_role, Cli, SendArgs, SendCommand};
use crate::dispatch::Command;
use crate::error::Result;

use super::{print_view, resolve_section};

/// Run the send command.
pub async fn run(cli: &Cli, args: &SendArgs) -> Result<()> {
    let config = cli.load_config()?;
    let command = build_command(&args.command)?;
    let client = KontoClient::from_config(config, cli.auth())?;

    let mut state = match &args.snapshot {
        Some(path) => {
            let mut state = client.open_session(load_snapshot(path)?);
            client.execute(&mut state, &command).await?;
            state
        }
        None => {
            let reply = client.send(&command).await?;
            client.open_session(reply.snapshot)
        }
    };
    info!(action = command.action(), "Command applied");

    if let Some(section) = &args.section {
        let index = resolve_section(&state, section)?;
        state.change_section(index);
    }

    print_view(&state, cli.json, 120)
}

/// Translate CLI arguments into a backend command.
pub fn build_command(cmd: &SendCommand) -> Result<Command> {
    Ok(match cmd {
        SendCommand::ApproveAccess { ids } => Command::approve_access(ids),
        SendCommand::RejectAccess { ids } => Command::reject_access(ids),
        SendCommand::WithdrawAccess { ids } => Command::withdraw_access(ids),
        SendCommand::CreateUser {
            name,
            email,
            password,
            role,
        } => Command::create_user(name, email, password, parse_role(role)?)?,
        SendCommand::DeleteUsers { ids } => Command::delete_users(ids),
        SendCommand::EditUserRole {
            role,
            id,
            selection,
        } => Command::edit_user_role(parse_role(role)?, id, selection),
        SendCommand::GenerateKeypair { id } => Command::generate_keypair(id),
        SendCommand::CreateDistrict {
            land,
            court,
            district,
        } => Command::create_district(land, court, district)?,
        SendCommand::DeleteDistricts { ids } => Command::delete_districts(ids),
        SendCommand::EditSetting { key, value } => Command::edit_setting(key, value)?,
        SendCommand::Subscribe {
            kind,
            court,
            district,
            sheet,
            target,
            reference,
        } => Command::create_subscription(kind, court, district, sheet, target, reference)?,
        SendCommand::EndSubscriptions { ids } => Command::end_subscriptions(ids),
        SendCommand::Custom { action, args } => Command::custom(action.clone(), args.iter().cloned()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KontoError;

    #[test]
    fn test_build_command() {
        let cmd = build_command(&SendCommand::EditUserRole {
            role: "bearbeiter".into(),
            id: "a@b.com".into(),
            selection: vec!["c@d.de".into()],
        })
        .unwrap();
        assert_eq!(cmd.action(), "benutzer-bearbeite-kontotyp");
        assert_eq!(cmd.args(), ["bearbeiter", "a@b.com", "c@d.de"]);
    }

    #[test]
    fn test_build_command_rejects_bad_role() {
        let err = build_command(&SendCommand::EditUserRole {
            role: "root".into(),
            id: "a@b.com".into(),
            selection: vec![],
        })
        .unwrap_err();
        assert!(matches!(err, KontoError::InvalidArgument { .. }));
    }
}
