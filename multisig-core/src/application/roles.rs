//! Agent end-role delegation for local and group identifiers.

use crate::application::group::member_of;
use crate::application::participant::Participant;
use crate::domain::event::messagize;
use crate::domain::{Embed, Operation, Route};
use crate::foundation::constants::AGENT_ROLE;
use crate::foundation::{MultisigError, Prefix, Result};
use log::info;
use serde_json::{json, Map};
use std::collections::BTreeMap;

impl Participant {
    /// Authorise `agent_id` as agent of `alias`; for a group, broadcast the signed reply.
    ///
    /// Every member must use the same `timestamp` or the replies will not converge.
    pub async fn add_end_role(&self, alias: &str, timestamp: &str, agent_id: &Prefix) -> Result<Operation> {
        let hab = self.agent().get_identifier(alias).await?;
        let result = self.agent().add_end_role(&hab.name, AGENT_ROLE, agent_id, Some(timestamp)).await?;

        if hab.is_group() {
            let mhab = member_of(&hab)?;
            let recipients = self.list_other_members(&hab).await?;
            let seal = Participant::create_seal(&hab);
            let mut embeds = BTreeMap::new();
            embeds.insert("rpy".to_string(), Embed::new(result.serder.clone(), messagize(&result.sigs, Some(&seal))));
            let mut payload = Map::new();
            payload.insert("gid".to_string(), json!(hab.prefix));
            self.broadcast(&mhab, Route::Rpy, payload, embeds, recipients).await?;
            info!("roles: proposed agent end role group={} eid={}", hab.prefix, agent_id);
        }
        Ok(result.op)
    }

    /// Delegate the group's agent role to the agent of every signing member.
    ///
    /// All members are checked before anything is sent, so a member without a
    /// discoverable agent fails the whole call with `NoAgentId`.
    pub async fn configure_group_agents(&self, group_alias: &str, timestamp: &str) -> Result<Vec<Operation>> {
        let members = self.agent().members(group_alias).await?;
        let agent_ids = members
            .signing
            .iter()
            .map(|member| member.end_ids(AGENT_ROLE).into_iter().next().ok_or_else(|| MultisigError::no_agent_id(member.aid.as_str())))
            .collect::<Result<Vec<_>>>()?;

        let mut ops = Vec::with_capacity(agent_ids.len());
        for agent_id in &agent_ids {
            ops.push(self.add_end_role(group_alias, timestamp, agent_id).await?);
        }
        Ok(ops)
    }
}
