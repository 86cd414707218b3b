//! Group formation: compose a group event, sign it locally, broadcast it to co-signers.
//!
//! The coordinator never counts signatures. Quorum is detected by the identity service;
//! the returned operation completes once it has been reached.

use crate::application::participant::Participant;
use crate::domain::coordination::split_proposals;
use crate::domain::event::messagize;
use crate::domain::identifier::parse_threshold;
use crate::domain::{
    CreateIdentifierArgs, Embed, Exchange, ExchangeRequest, GroupInceptArgs, Identifier, KeyState, Operation, PendingProposal,
    RotateArgs, Route, SealEvent,
};
use crate::foundation::constants::MULTISIG_TOPIC;
use crate::foundation::{MultisigError, Prefix, Result, Said};
use crate::infrastructure::config::default_toad;
use log::{debug, info};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Parameters of a group inception.
#[derive(Clone, Debug, Default)]
pub struct GroupArgs {
    /// Signing members, in key order.
    pub smids: Vec<Prefix>,
    pub isith: usize,
    /// Defaults to `isith`.
    pub nsith: Option<usize>,
    pub wits: Vec<String>,
    /// Defaults to the witness-count based toad.
    pub toad: Option<usize>,
}

/// Member sets for a group rotation; unset keeps the current signing members.
#[derive(Clone, Debug, Default)]
pub struct GroupRotationArgs {
    pub smids: Option<Vec<Prefix>>,
    pub rmids: Option<Vec<Prefix>>,
}

impl GroupArgs {
    /// Both thresholds must be satisfiable by the listed members.
    pub fn validate(&self) -> Result<()> {
        check_threshold("isith", self.isith, self.smids.len())?;
        check_threshold("nsith", self.nsith.unwrap_or(self.isith), self.smids.len())?;
        if let Some(toad) = self.toad {
            if toad > self.wits.len() {
                return Err(MultisigError::InvalidArgument(format!("toad {toad} exceeds {} witnesses", self.wits.len())));
            }
        }
        Ok(())
    }
}

/// `threshold` signatures out of `members` must be possible and required.
fn check_threshold(name: &str, threshold: usize, members: usize) -> Result<()> {
    if threshold == 0 || threshold > members {
        return Err(MultisigError::InvalidArgument(format!("{name} {threshold} must be between 1 and {members} members")));
    }
    Ok(())
}

impl Participant {
    pub async fn create_group(&self, group_alias: &str, args: GroupArgs) -> Result<Operation> {
        args.validate()?;
        let mhab = self.identifier()?;
        let states = self.current_states(&args.smids).await?;

        let toad = args.toad.unwrap_or_else(|| default_toad(args.wits.len()));
        let create = CreateIdentifierArgs {
            transferable: true,
            wits: args.wits.clone(),
            toad,
            group: Some(GroupInceptArgs {
                mhab: mhab.clone(),
                isith: args.isith,
                nsith: args.nsith.unwrap_or(args.isith),
                states: states.clone(),
                rstates: states,
            }),
        };
        let result = self.agent().create_identifier(group_alias, create).await?;

        let mut embeds = BTreeMap::new();
        embeds.insert("icp".to_string(), Embed::new(result.serder.clone(), messagize(&result.sigs, None)));
        let mut payload = Map::new();
        payload.insert("smids".to_string(), json!(args.smids));
        let recipients = args.smids.iter().filter(|smid| **smid != mhab.prefix).cloned().collect();
        self.broadcast(&mhab, Route::Icp, payload, embeds, recipients).await?;

        info!(
            "group: proposed inception group_alias={} prefix={} isith={} members={}",
            group_alias,
            result.serder.get("i").and_then(Value::as_str).unwrap_or_default(),
            args.isith,
            args.smids.len()
        );
        Ok(result.op)
    }

    /// Rotate a group to new member key states and broadcast the rotation.
    ///
    /// Each member must have rotated its own identifier first; the key states are
    /// refreshed through the agent right before composing.
    pub async fn rotate_group(&self, group_alias: &str, args: GroupRotationArgs) -> Result<Operation> {
        let hab = self.agent().get_identifier(group_alias).await?;
        let mhab = member_of(&hab)?;
        let smids = match args.smids {
            Some(smids) => smids,
            None => self.agent().members(group_alias).await?.signing.into_iter().map(|member| member.aid).collect(),
        };
        let rmids = args.rmids.unwrap_or_else(|| smids.clone());
        // The rotation keeps the group's thresholds, so the new member sets must still meet them.
        check_threshold("isith", hab.state.threshold()?, smids.len())?;
        check_threshold("nsith", parse_threshold(&hab.state.next_threshold)?, rmids.len())?;

        let mut all: Vec<Prefix> = smids.clone();
        all.extend(rmids.iter().filter(|rmid| !smids.contains(rmid)).cloned());
        for member in &all {
            self.query_key_state(member, None, None, None).await?;
        }
        let states = self.current_states(&smids).await?;
        let rstates = self.current_states(&rmids).await?;

        let result = self.agent().rotate_identifier(group_alias, RotateArgs { states, rstates, isith: None, nsith: None }).await?;

        let mut embeds = BTreeMap::new();
        embeds.insert("rot".to_string(), Embed::new(result.serder.clone(), messagize(&result.sigs, None)));
        let mut payload = Map::new();
        payload.insert("gid".to_string(), json!(hab.prefix));
        payload.insert("smids".to_string(), json!(smids));
        payload.insert("rmids".to_string(), json!(rmids));
        let recipients = all.into_iter().filter(|member| *member != mhab.prefix).collect();
        self.broadcast(&mhab, Route::Rot, payload, embeds, recipients).await?;

        info!("group: proposed rotation group_alias={} prefix={} signers={}", group_alias, hab.prefix, smids.len());
        Ok(result.op)
    }

    /// Signing members of `group` other than the local member.
    pub async fn list_other_members(&self, group: &Identifier) -> Result<Vec<Prefix>> {
        let mhab = member_of(group)?;
        let members = self.agent().members(&group.name).await?;
        Ok(members.signing.into_iter().map(|member| member.aid).filter(|aid| *aid != mhab.prefix).collect())
    }

    /// Seal to the latest establishment event of `hab`.
    pub fn create_seal(hab: &Identifier) -> SealEvent {
        SealEvent::latest_establishment(hab)
    }

    /// Proposals for the group the service has not accepted.
    pub async fn pending_proposals(&self, group_alias: &str) -> Result<Vec<PendingProposal>> {
        self.agent().pending_proposals(group_alias).await
    }

    /// Sequence numbers at which the group has competing, digest-different proposals.
    pub async fn split_proposals(&self, group_alias: &str) -> Result<Vec<(u64, Vec<Said>)>> {
        Ok(split_proposals(&self.pending_proposals(group_alias).await?))
    }

    /// Current (index 0) key state of every member, read fresh.
    async fn current_states(&self, members: &[Prefix]) -> Result<Vec<KeyState>> {
        let mut states = Vec::with_capacity(members.len());
        for member in members {
            let state = self
                .agent()
                .get_key_states(member)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| MultisigError::not_found("key state", member.as_str()))?;
            states.push(state);
        }
        Ok(states)
    }

    /// Send a group proposal from the local member to `recipients`.
    pub(crate) async fn broadcast(
        &self,
        sender: &Identifier,
        route: Route,
        payload: Map<String, Value>,
        embeds: BTreeMap<String, Embed>,
        recipients: Vec<Prefix>,
    ) -> Result<Exchange> {
        debug!("group: broadcast route={} sender={} recipients={}", route, sender.prefix, recipients.len());
        let request = ExchangeRequest {
            sender_alias: sender.name.clone(),
            topic: MULTISIG_TOPIC.to_string(),
            route,
            payload,
            embeds,
            recipients,
        };
        self.agent().send_exchange(request).await
    }
}

/// Local member identifier of a group record.
pub(crate) fn member_of(group: &Identifier) -> Result<Identifier> {
    group
        .group
        .as_ref()
        .map(|info| (*info.mhab).clone())
        .ok_or_else(|| MultisigError::InvalidArgument(format!("{} is not a group identifier", group.name)))
}
