//! Shared world of the simulated identity agents.

use super::keys::Controller;
use crate::domain::coordination::{has_threshold, Contribution};
use crate::domain::event::next_state;
use crate::domain::{
    Contact, Exchange, GroupInfo, Identifier, KeyState, Note, NoteAttrs, Operation, OperationError, OperationMetadata,
    PendingProposal, ProposalKind, ProposalStatus, Registry, Route,
};
use crate::foundation::util::create_timestamp;
use crate::foundation::{MultisigError, NoteId, OperationName, Prefix, Result, Said};
use crate::infrastructure::config::SimulationConfig;
use log::{debug, info, trace, warn};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tokio::time::Instant;

pub(crate) struct HubState {
    pub config: SimulationConfig,
    pub agent_url: String,
    pub agents: HashMap<Prefix, AgentState>,
    pub passcodes: HashMap<String, Prefix>,
    pub controllers: HashMap<Prefix, Controller>,
    pub logs: HashMap<Prefix, KeyLog>,
    pub proposals: BTreeMap<Said, Proposal>,
    pub exchanges: HashMap<Said, Exchange>,
    pub registries: HashMap<Prefix, RegistryRecord>,
    pub credentials: HashMap<Said, CredentialRecord>,
    pub end_roles: HashMap<Prefix, BTreeMap<String, BTreeSet<Prefix>>>,
    seq: u64,
}

/// Accepted events of one identifier; `states[sn]` is the state after event `sn`.
#[derive(Clone, Debug, Default)]
pub(crate) struct KeyLog {
    pub events: Vec<Value>,
    pub states: Vec<KeyState>,
}

impl KeyLog {
    pub fn current(&self) -> Option<&KeyState> {
        self.states.last()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Proposal {
    pub group: Prefix,
    pub kind: ProposalKind,
    pub route: Route,
    pub sn: u64,
    pub prior: Option<Said>,
    pub event: Value,
    pub keys: Vec<String>,
    pub threshold: usize,
    pub contributions: Vec<Contribution>,
    pub status: ProposalStatus,
    pub effect: AcceptEffect,
}

#[derive(Clone, Debug)]
pub(crate) enum AcceptEffect {
    None,
    Credential(Said),
    EndRole { cid: Prefix, role: String, eid: Prefix },
}

#[derive(Clone, Debug)]
pub(crate) struct RegistryRecord {
    pub owner: Prefix,
}

#[derive(Clone, Debug)]
pub(crate) struct CredentialRecord {
    pub sad: Value,
    pub issuer: Prefix,
    pub issued: bool,
}

pub(crate) struct AgentState {
    pub prefix: Prefix,
    pub connected: bool,
    pub habs: BTreeMap<String, HabRecord>,
    pub contacts: BTreeMap<Prefix, ContactRecord>,
    pub deleted_contacts: HashSet<Prefix>,
    pub notes: Vec<NoteRecord>,
    pub operations: BTreeMap<OperationName, OpRecord>,
    pub views: HashMap<Prefix, KeyState>,
    pub registries: Vec<Registry>,
    pub credentials: BTreeSet<Said>,
}

impl AgentState {
    pub fn new(prefix: Prefix) -> Self {
        Self {
            prefix,
            connected: false,
            habs: BTreeMap::new(),
            contacts: BTreeMap::new(),
            deleted_contacts: HashSet::new(),
            notes: Vec::new(),
            operations: BTreeMap::new(),
            views: HashMap::new(),
            registries: Vec::new(),
            credentials: BTreeSet::new(),
        }
    }

    pub fn hab(&self, alias: &str) -> Result<&HabRecord> {
        self.habs.get(alias).ok_or_else(|| MultisigError::not_found("identifier", alias))
    }
}

#[derive(Clone, Debug)]
pub(crate) struct HabRecord {
    pub name: String,
    pub prefix: Prefix,
    pub group: Option<HabGroup>,
    /// State of the group's own proposed inception until the agent sees it accepted.
    pub pending_state: Option<KeyState>,
}

#[derive(Clone, Debug)]
pub(crate) struct HabGroup {
    pub mhab: String,
    pub smids: Vec<Prefix>,
    pub rmids: Vec<Prefix>,
}

#[derive(Clone, Debug)]
pub(crate) struct ContactRecord {
    pub contact: Contact,
    pub visible_at: Instant,
}

#[derive(Clone, Debug)]
pub(crate) struct NoteRecord {
    pub note: Note,
    pub visible_at: Instant,
}

#[derive(Clone, Debug)]
pub(crate) struct OpRecord {
    pub created: Instant,
    pub kind: OpKind,
    pub depends: Option<OperationName>,
}

#[derive(Clone, Debug)]
pub(crate) enum OpKind {
    /// Completes when the proposal with this digest is accepted.
    Proposal { digest: Said, response: Value },
    /// Completes when the log of `prefix` reaches `sn` (and contains `anchor`), refreshing the agent's view.
    Query { prefix: Prefix, sn: Option<u64>, anchor: Option<Said> },
    Resolved { response: Value },
    Failed { code: u16, message: String },
}

/// True when `event` is `digest` or carries a seal to it.
fn anchors(event: &Value, digest: &Said) -> bool {
    if event.get("d").and_then(Value::as_str) == Some(digest.as_str()) {
        return true;
    }
    event
        .get("a")
        .and_then(Value::as_array)
        .map_or(false, |seals| seals.iter().any(|seal| seal.get("d").and_then(Value::as_str) == Some(digest.as_str())))
}

impl HubState {
    pub fn new(config: SimulationConfig, agent_url: String) -> Self {
        Self {
            config,
            agent_url,
            agents: HashMap::new(),
            passcodes: HashMap::new(),
            controllers: HashMap::new(),
            logs: HashMap::new(),
            proposals: BTreeMap::new(),
            exchanges: HashMap::new(),
            registries: HashMap::new(),
            credentials: HashMap::new(),
            end_roles: HashMap::new(),
            seq: 0,
        }
    }

    pub fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    pub fn agent(&self, agent: &Prefix) -> Result<&AgentState> {
        self.agents.get(agent).ok_or_else(|| MultisigError::transport("agent", format!("unknown agent {agent}")))
    }

    pub fn agent_mut(&mut self, agent: &Prefix) -> Result<&mut AgentState> {
        self.agents.get_mut(agent).ok_or_else(|| MultisigError::transport("agent", format!("unknown agent {agent}")))
    }

    pub fn connected_agent(&self, agent: &Prefix) -> Result<&AgentState> {
        let state = self.agent(agent)?;
        if !state.connected {
            return Err(MultisigError::rejected("session", 401, "agent is not connected"));
        }
        Ok(state)
    }

    pub fn controller(&self, prefix: &Prefix) -> Result<&Controller> {
        self.controllers.get(prefix).ok_or_else(|| MultisigError::not_found("controller", prefix.as_str()))
    }

    /// Key state of `prefix` as `agent` knows it: authoritative for its own controllers, its view otherwise.
    pub fn key_state_for(&self, agent: &Prefix, prefix: &Prefix) -> Option<KeyState> {
        if self.controllers.get(prefix).map_or(false, |c| &c.agent == agent) {
            return self.logs.get(prefix).and_then(KeyLog::current).cloned();
        }
        self.agents.get(agent).and_then(|state| state.views.get(prefix)).cloned()
    }

    pub fn identifier(&self, agent: &Prefix, alias: &str) -> Result<Identifier> {
        let hab = self.agent(agent)?.hab(alias)?;
        let state = self
            .key_state_for(agent, &hab.prefix)
            .or_else(|| hab.pending_state.clone())
            .ok_or_else(|| MultisigError::not_found("key state", hab.prefix.as_str()))?;
        let group = match &hab.group {
            Some(group) => {
                let mhab = self.identifier(agent, &group.mhab)?;
                Some(GroupInfo { mhab: Box::new(mhab), keys: state.keys.clone(), ndigs: state.next_digests.clone() })
            }
            None => None,
        };
        Ok(Identifier { name: hab.name.clone(), prefix: hab.prefix.clone(), state, transferable: true, group })
    }

    /// Register `proposal` (or find the identical one) and add `contribution` to it.
    pub fn propose(&mut self, digest: &Said, proposal: Proposal, contribution: Contribution) {
        let entry = self.proposals.entry(digest.clone()).or_insert_with(|| {
            debug!("memory agent: new proposal kind={:?} group={} sn={} digest={}", proposal.kind, proposal.group, proposal.sn, digest);
            proposal
        });
        if !entry.contributions.iter().any(|c| c.member == contribution.member) {
            trace!("memory agent: contribution member={} digest={}", contribution.member, digest);
            entry.contributions.push(contribution);
        }
        let accepted = entry.status == ProposalStatus::Accepted;
        if accepted {
            self.refresh_views(digest);
        } else {
            self.try_accept(digest);
        }
    }

    fn try_accept(&mut self, digest: &Said) {
        let Some(proposal) = self.proposals.get(digest).cloned() else {
            return;
        };
        if proposal.status != ProposalStatus::Escrowed || !has_threshold(&proposal.contributions, &proposal.keys, proposal.threshold) {
            return;
        }

        match proposal.kind {
            ProposalKind::Inception => {
                if self.logs.contains_key(&proposal.group) {
                    return;
                }
                let Ok(state) = next_state(&proposal.event, None) else {
                    warn!("memory agent: malformed inception digest={digest}");
                    return;
                };
                self.logs.insert(proposal.group.clone(), KeyLog { events: vec![proposal.event.clone()], states: vec![state] });
            }
            ProposalKind::Rotation | ProposalKind::Interaction => {
                let Some(log) = self.logs.get_mut(&proposal.group) else {
                    return;
                };
                let Some(current) = log.current().cloned() else {
                    return;
                };
                let current_sn = current.sn().unwrap_or_default();
                if current_sn + 1 != proposal.sn || proposal.prior.as_ref() != Some(&current.digest) {
                    if current_sn >= proposal.sn {
                        self.mark(digest, ProposalStatus::Superseded);
                    }
                    return;
                }
                let Ok(state) = next_state(&proposal.event, Some(&current)) else {
                    warn!("memory agent: malformed event digest={digest}");
                    return;
                };
                log.events.push(proposal.event.clone());
                log.states.push(state);
            }
            ProposalKind::EndRole => {}
        }

        self.mark(digest, ProposalStatus::Accepted);
        info!(
            "memory agent: accepted {:?} group={} sn={} signers={}/{}",
            proposal.kind,
            proposal.group,
            proposal.sn,
            proposal.contributions.len(),
            proposal.threshold
        );
        self.apply_effect(&proposal.effect);
        if matches!(proposal.kind, ProposalKind::Rotation | ProposalKind::Interaction) {
            self.supersede_competitors(&proposal.group, proposal.sn, digest);
        }
        self.refresh_views(digest);
    }

    fn mark(&mut self, digest: &Said, status: ProposalStatus) {
        if let Some(proposal) = self.proposals.get_mut(digest) {
            proposal.status = status;
        }
    }

    fn supersede_competitors(&mut self, group: &Prefix, sn: u64, accepted: &Said) {
        for (digest, proposal) in self.proposals.iter_mut() {
            if digest != accepted
                && &proposal.group == group
                && proposal.sn == sn
                && proposal.status == ProposalStatus::Escrowed
                && matches!(proposal.kind, ProposalKind::Rotation | ProposalKind::Interaction)
            {
                warn!("memory agent: proposal {} superseded at sn={} by {}", digest, sn, accepted);
                proposal.status = ProposalStatus::Superseded;
            }
        }
    }

    fn apply_effect(&mut self, effect: &AcceptEffect) {
        match effect {
            AcceptEffect::None => {}
            AcceptEffect::Credential(said) => {
                if let Some(record) = self.credentials.get_mut(said) {
                    record.issued = true;
                }
            }
            AcceptEffect::EndRole { cid, role, eid } => {
                self.end_roles.entry(cid.clone()).or_default().entry(role.clone()).or_default().insert(eid.clone());
            }
        }
    }

    /// Advance the view of every contributing agent to the state after the accepted event.
    fn refresh_views(&mut self, digest: &Said) {
        let Some(proposal) = self.proposals.get(digest) else {
            return;
        };
        if proposal.kind == ProposalKind::EndRole {
            return;
        }
        let Some(state) = self.logs.get(&proposal.group).and_then(|log| log.states.get(proposal.sn as usize)).cloned() else {
            return;
        };
        let agents: Vec<Prefix> =
            proposal.contributions.iter().filter_map(|c| self.controllers.get(&c.member)).map(|c| c.agent.clone()).collect();
        for agent in agents {
            if let Some(agent_state) = self.agents.get_mut(&agent) {
                let behind = agent_state.views.get(&proposal.group).map_or(true, |view| view.sn().unwrap_or_default() < proposal.sn);
                if behind {
                    agent_state.views.insert(proposal.group.clone(), state.clone());
                }
            }
        }
    }

    pub fn pending_proposals(&self, group: &Prefix) -> Vec<PendingProposal> {
        self.proposals
            .iter()
            .filter(|(_, p)| &p.group == group && p.status != ProposalStatus::Accepted)
            .map(|(digest, p)| PendingProposal {
                group: p.group.clone(),
                kind: p.kind,
                route: p.route.clone(),
                sn: p.sn,
                digest: digest.clone(),
                signers: p.contributions.iter().map(|c| c.member.clone()).collect(),
                threshold: p.threshold,
                status: p.status,
            })
            .collect()
    }

    pub fn add_operation(&mut self, agent: &Prefix, name: OperationName, kind: OpKind, depends: Option<OperationName>) -> Result<Operation> {
        let record = OpRecord { created: Instant::now(), kind, depends };
        self.agent_mut(agent)?.operations.entry(name.clone()).or_insert(record);
        self.evaluate_operation(agent, &name)
    }

    /// Current state of an operation; completing a key state query refreshes the agent's view.
    pub fn evaluate_operation(&mut self, agent: &Prefix, name: &OperationName) -> Result<Operation> {
        let record = self
            .agent(agent)?
            .operations
            .get(name)
            .cloned()
            .ok_or_else(|| MultisigError::rejected("operations.get", 404, format!("operation {name} not found")))?;

        let depends = match &record.depends {
            Some(dep) => Some(self.evaluate_operation(agent, dep)?),
            None => None,
        };
        let settled = Instant::now() >= record.created + self.config.operation_latency() && depends.as_ref().map_or(true, |d| d.done);

        let (done, response, error) = match &record.kind {
            OpKind::Proposal { digest, response } => {
                let accepted = self.proposals.get(digest).map_or(false, |p| p.status == ProposalStatus::Accepted);
                (settled && accepted, Some(response.clone()), None)
            }
            OpKind::Query { prefix, sn, anchor } => {
                let reached = self.logs.get(prefix).and_then(|log| {
                    let current = log.current()?;
                    let sn_ok = sn.map_or(true, |sn| current.sn().map_or(false, |at| at >= sn));
                    let anchor_ok = anchor.as_ref().map_or(true, |d| log.events.iter().any(|event| anchors(event, d)));
                    (sn_ok && anchor_ok).then(|| current.clone())
                });
                match reached {
                    Some(state) if settled => {
                        if let Some(agent_state) = self.agents.get_mut(agent) {
                            agent_state.views.insert(prefix.clone(), state.clone());
                        }
                        (true, Some(serde_json::to_value(&state)?), None)
                    }
                    _ => (false, None, None),
                }
            }
            OpKind::Resolved { response } => (settled, Some(response.clone()), None),
            OpKind::Failed { code, message } => (settled, None, Some(OperationError { code: *code, message: message.clone() })),
        };

        Ok(Operation {
            name: name.clone(),
            done,
            error: if done { error } else { None },
            response: if done { response } else { None },
            metadata: depends.map(|dep| OperationMetadata { depends: Some(Box::new(dep)), extra: Default::default() }),
        })
    }

    /// Drop a note into the mailbox of the agent controlling `recipient`.
    pub fn notify(&mut self, recipient: &Prefix, route: &Route, exchange: &Said) -> Result<()> {
        let agent = self.mailbox_of(recipient)?;
        let id = NoteId::new(format!("note.{}", self.next_seq()));
        let visible_at = Instant::now() + self.config.notification_delay();
        if let Some(state) = self.agents.get_mut(&agent) {
            let note = Note {
                id,
                dt: create_timestamp(),
                read: false,
                attrs: NoteAttrs { route: route.clone(), exchange: exchange.clone() },
            };
            state.notes.push(NoteRecord { note, visible_at });
        }
        Ok(())
    }

    /// Agent whose mailbox receives notes addressed to `recipient`.
    pub fn mailbox_of(&self, recipient: &Prefix) -> Result<Prefix> {
        self.controllers
            .get(recipient)
            .map(|controller| controller.agent.clone())
            .ok_or_else(|| MultisigError::not_found("recipient mailbox", recipient.as_str()))
    }
}
