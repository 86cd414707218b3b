//! Catch-up for members that were not part of the initiating round.

use crate::application::abort::AbortSignal;
use crate::application::awaiter::WaitOptions;
use crate::application::group::member_of;
use crate::application::participant::Participant;
use crate::domain::notification::newest_for_route;
use crate::domain::{CredentialData, Exchange, JoinGroupArgs, Note, Operation, Route};
use crate::foundation::{MultisigError, Result, Said};
use log::{debug, info, warn};

impl Participant {
    /// Poll the mailbox at a fixed interval until a note on `route` shows up; the newest one wins.
    pub async fn wait_notification(&self, route: &Route, signal: &AbortSignal) -> Result<Note> {
        let pause = self.config().notifications.poll_interval_ms;
        let options = WaitOptions { min_sleep_ms: pause, max_sleep_ms: pause, increase_factor: 1, ..WaitOptions::default() }
            .with_signal(signal.clone());
        let what = format!("notification {route}");
        let note = self
            .awaiter()
            .poll_until(&what, &options, move || async move {
                let notes = self.agent().list_notifications().await?;
                Ok::<_, MultisigError>(newest_for_route(&notes, route).cloned())
            })
            .await?;
        debug!("join: notification found route={} note={} by={}", route, note.id, self.alias());
        Ok(note)
    }

    pub async fn get_exchange(&self, said: &Said) -> Result<Exchange> {
        self.agent().get_exchange(said).await
    }

    /// Contribute to the group action carried by `exchange`.
    ///
    /// Only issuance and rotation can be joined; every other route fails with
    /// `UnsupportedRoute`.
    pub async fn join(&self, group_alias: &str, exchange: &Exchange) -> Result<Operation> {
        let route = exchange.route();
        info!("join: dispatch route={} group_alias={} by={}", route, group_alias, self.alias());
        match route {
            Route::Iss => {
                let acdc = exchange
                    .embed("acdc")
                    .ok_or_else(|| MultisigError::InvalidArgument("issuance exchange without an acdc embed".to_string()))?;
                self.create_credential(group_alias, CredentialData::from_acdc(acdc)?).await
            }
            Route::Rot => self.join_rotation(group_alias, exchange).await,
            Route::Icp | Route::Rpy | Route::Vcp | Route::Exn | Route::IpexGrant | Route::Unknown(_) => {
                warn!("join: unsupported route={} group_alias={}", route, group_alias);
                Err(MultisigError::unsupported_route(route.as_str()))
            }
        }
    }

    async fn join_rotation(&self, group_alias: &str, exchange: &Exchange) -> Result<Operation> {
        let rot = exchange
            .embed("rot")
            .cloned()
            .ok_or_else(|| MultisigError::InvalidArgument("rotation exchange without a rot embed".to_string()))?;
        let gid = exchange
            .header_str("gid")
            .ok_or_else(|| MultisigError::InvalidArgument("rotation exchange without gid".to_string()))?;
        let mhab = match self.agent().get_identifier(group_alias).await {
            Ok(group) => member_of(&group)?,
            Err(MultisigError::NotFound { .. }) => self.identifier()?,
            Err(err) => return Err(err),
        };
        let args = JoinGroupArgs {
            group_alias: group_alias.to_string(),
            mhab,
            rot,
            gid: gid.into(),
            smids: exchange.header_prefixes("smids"),
            rmids: exchange.header_prefixes("rmids"),
        };
        self.agent().join_group(args).await
    }

    /// Wait for a proposal on `route`, join it and consume the notification.
    pub async fn catch_up(&self, group_alias: &str, route: &Route, signal: &AbortSignal) -> Result<Operation> {
        let note = self.wait_notification(route, signal).await?;
        let exchange = self.get_exchange(&note.attrs.exchange).await?;
        let op = self.join(group_alias, &exchange).await?;
        self.agent().mark_notification(&note.id).await?;
        self.agent().delete_notification(&note.id).await?;
        Ok(op)
    }
}
