use super::keys::Controller;
use super::state::{AcceptEffect, ContactRecord, CredentialRecord, HabGroup, HabRecord, HubState, OpKind, Proposal, RegistryRecord};
use super::MemoryAgent;
use crate::domain::coordination::Contribution;
use crate::domain::event::builder::{acdc, anchor_seal, incept, interact, issue, registry_incept, reply, rotate, versioned};
use crate::domain::event::{event_said, event_sn, field_str, next_state, string_list, InceptionParams, RotationParams, KERI_PROTOCOL};
use crate::domain::identifier::parse_threshold;
use crate::domain::{
    oobi_prefix, Contact, CreateIdentifierArgs, CreateRegistryArgs, Credential, CredentialData, CredentialStatus, EndRole, EventResult,
    Exchange, ExchangeMessage, ExchangeRequest, Identifier, IssueResult, JoinGroupArgs, KeyState, Member, Members, Note,
    Operation, PendingProposal, ProposalKind, ProposalStatus, Registry, RegistryResult, RotateArgs, Route, SealEvent,
};
use crate::foundation::util::{create_timestamp, saidify};
use crate::foundation::{MultisigError, NoteId, OperationName, Prefix, Result, Said};
use crate::infrastructure::agent::traits::{
    ContactService, ExchangeService, GroupService, IdentifierService, KeyStateService, NotificationService, OobiService,
    OperationService, RegistryService, SessionService,
};
use async_trait::async_trait;
use log::{debug, info};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tokio::time::Instant;

fn first_key(state: &KeyState) -> Result<String> {
    state.keys.first().cloned().ok_or_else(|| MultisigError::InvalidArgument(format!("key state of {} has no keys", state.prefix)))
}

fn first_next_digest(state: &KeyState) -> Result<String> {
    state
        .next_digests
        .first()
        .cloned()
        .ok_or_else(|| MultisigError::InvalidArgument(format!("key state of {} has no next key digest", state.prefix)))
}

/// The local controller that signs for `hab` and its hab record.
fn signer_of(state: &HubState, agent: &Prefix, hab: &HabRecord) -> Result<(Prefix, Controller)> {
    let member = match &hab.group {
        Some(group) => state.agent(agent)?.hab(&group.mhab)?.prefix.clone(),
        None => hab.prefix.clone(),
    };
    let controller = state.controller(&member)?.clone();
    Ok((member, controller))
}

/// Compose, sign and escrow an interaction event of `hab` anchoring `seals`.
fn anchor(
    state: &mut HubState,
    agent: &Prefix,
    hab: &HabRecord,
    seals: Vec<Value>,
    route: Route,
    effect: AcceptEffect,
) -> Result<(Said, Value, Vec<String>)> {
    let current =
        state.key_state_for(agent, &hab.prefix).ok_or_else(|| MultisigError::not_found("key state", hab.prefix.as_str()))?;
    let (member, controller) = signer_of(state, agent, hab)?;
    let index = current
        .keys
        .iter()
        .position(|key| key == &controller.current_key)
        .ok_or_else(|| MultisigError::rejected("ixn", 400, format!("{member} is not a current signer of {}", hab.prefix)))?;
    let sn = current.sn()? + 1;
    let (digest, ixn) = interact(&hab.prefix, sn, &current.digest, seals)?;
    let sig = controller.sign(index, &digest);

    let proposal = Proposal {
        group: hab.prefix.clone(),
        kind: ProposalKind::Interaction,
        route,
        sn,
        prior: Some(current.digest.clone()),
        event: ixn.clone(),
        keys: current.keys.clone(),
        threshold: current.threshold()?,
        contributions: Vec::new(),
        status: ProposalStatus::Escrowed,
        effect,
    };
    state.propose(&digest, proposal, Contribution { member, index, key: controller.current_key });
    Ok((digest, ixn, vec![sig]))
}

fn ends_of(state: &HubState, aid: &Prefix) -> BTreeMap<String, BTreeMap<String, Value>> {
    let mut ends = BTreeMap::new();
    ends.insert("agent".to_string(), BTreeMap::new());
    if let Some(roles) = state.end_roles.get(aid) {
        for (role, eids) in roles {
            let entry = ends.entry(role.clone()).or_insert_with(BTreeMap::new);
            for eid in eids {
                entry.insert(eid.to_string(), json!({ "http": state.agent_url }));
            }
        }
    }
    ends
}

impl MemoryAgent {
    fn lock(&self) -> parking_lot::MutexGuard<'_, HubState> {
        self.hub.state.lock()
    }
}

#[async_trait]
impl SessionService for MemoryAgent {
    async fn connect(&self) -> Result<()> {
        let mut state = self.lock();
        state.agent_mut(&self.prefix)?.connected = true;
        debug!("memory agent: connected agent={}", self.prefix);
        Ok(())
    }

    fn agent_prefix(&self) -> Option<Prefix> {
        let state = self.lock();
        state.agent(&self.prefix).ok().filter(|agent| agent.connected).map(|agent| agent.prefix.clone())
    }
}

#[async_trait]
impl IdentifierService for MemoryAgent {
    async fn create_identifier(&self, alias: &str, args: CreateIdentifierArgs) -> Result<EventResult> {
        let mut state = self.lock();
        let agent = self.prefix.clone();
        if state.connected_agent(&agent)?.habs.contains_key(alias) {
            return Err(MultisigError::rejected("identifiers.create", 400, format!("alias {alias} already in use")));
        }

        match args.group {
            None => {
                let controller = Controller::generate(agent.clone(), alias);
                let key = controller.current_key.clone();
                let (digest, icp) = incept(&InceptionParams {
                    keys: vec![key.clone()],
                    isith: 1,
                    next_digests: vec![controller.next_digest()],
                    nsith: 1,
                    wits: args.wits,
                    toad: args.toad,
                })?;
                let prefix = Prefix::from_said(&digest);
                let sig = controller.sign(0, &digest);
                state.controllers.insert(prefix.clone(), controller);
                state.agent_mut(&agent)?.habs.insert(
                    alias.to_string(),
                    HabRecord { name: alias.to_string(), prefix: prefix.clone(), group: None, pending_state: None },
                );
                let proposal = Proposal {
                    group: prefix.clone(),
                    kind: ProposalKind::Inception,
                    route: ProposalKind::Inception.default_route(),
                    sn: 0,
                    prior: None,
                    event: icp.clone(),
                    keys: vec![key.clone()],
                    threshold: 1,
                    contributions: Vec::new(),
                    status: ProposalStatus::Escrowed,
                    effect: AcceptEffect::None,
                };
                state.propose(&digest, proposal, Contribution { member: prefix.clone(), index: 0, key });
                info!("memory agent: created identifier alias={alias} prefix={prefix}");
                let op = state.add_operation(
                    &agent,
                    OperationName::new(format!("witness.{prefix}")),
                    OpKind::Proposal { digest, response: icp.clone() },
                    None,
                )?;
                Ok(EventResult { serder: icp, sigs: vec![sig], op })
            }
            Some(group) => {
                let mhab = state.agent(&agent)?.hab(&group.mhab.name)?.clone();
                if mhab.group.is_some() {
                    return Err(MultisigError::InvalidArgument(format!("mhab {} must be a local identifier", mhab.name)));
                }
                let controller = state.controller(&mhab.prefix)?.clone();
                let keys = group.states.iter().map(first_key).collect::<Result<Vec<_>>>()?;
                let next_digests = group.rstates.iter().map(first_next_digest).collect::<Result<Vec<_>>>()?;
                let index = group.states.iter().position(|s| s.prefix == mhab.prefix).ok_or_else(|| {
                    MultisigError::InvalidArgument(format!("local member {} is not among the signing states", mhab.prefix))
                })?;

                let (digest, icp) = incept(&InceptionParams {
                    keys: keys.clone(),
                    isith: group.isith,
                    next_digests,
                    nsith: group.nsith,
                    wits: args.wits,
                    toad: args.toad,
                })?;
                let prefix = Prefix::from_said(&digest);
                let sig = controller.sign(index, &digest);
                let pending_state = next_state(&icp, None)?;

                state.agent_mut(&agent)?.habs.insert(
                    alias.to_string(),
                    HabRecord {
                        name: alias.to_string(),
                        prefix: prefix.clone(),
                        group: Some(HabGroup {
                            mhab: mhab.name.clone(),
                            smids: group.states.iter().map(|s| s.prefix.clone()).collect(),
                            rmids: group.rstates.iter().map(|s| s.prefix.clone()).collect(),
                        }),
                        pending_state: Some(pending_state),
                    },
                );
                let proposal = Proposal {
                    group: prefix.clone(),
                    kind: ProposalKind::Inception,
                    route: ProposalKind::Inception.default_route(),
                    sn: 0,
                    prior: None,
                    event: icp.clone(),
                    keys,
                    threshold: group.isith,
                    contributions: Vec::new(),
                    status: ProposalStatus::Escrowed,
                    effect: AcceptEffect::None,
                };
                state.propose(&digest, proposal, Contribution { member: mhab.prefix.clone(), index, key: controller.current_key });
                info!("memory agent: proposed group alias={alias} prefix={prefix} member={}", mhab.prefix);
                let op = state.add_operation(
                    &agent,
                    OperationName::new(format!("group.{digest}")),
                    OpKind::Proposal { digest, response: icp.clone() },
                    None,
                )?;
                Ok(EventResult { serder: icp, sigs: vec![sig], op })
            }
        }
    }

    async fn get_identifier(&self, alias: &str) -> Result<Identifier> {
        let state = self.lock();
        state.connected_agent(&self.prefix)?;
        state.identifier(&self.prefix, alias)
    }

    async fn list_identifiers(&self) -> Result<Vec<Identifier>> {
        let state = self.lock();
        let aliases: Vec<String> = state.connected_agent(&self.prefix)?.habs.keys().cloned().collect();
        aliases.iter().map(|alias| state.identifier(&self.prefix, alias)).collect()
    }

    async fn rotate_identifier(&self, alias: &str, args: RotateArgs) -> Result<EventResult> {
        let mut state = self.lock();
        let agent = self.prefix.clone();
        let hab = state.connected_agent(&agent)?.hab(alias)?.clone();
        let current =
            state.key_state_for(&agent, &hab.prefix).ok_or_else(|| MultisigError::not_found("key state", hab.prefix.as_str()))?;
        let sn = current.sn()? + 1;
        let toad = parse_threshold(&current.witness_threshold)?;

        let (member, index, keys, next_digests, isith, nsith) = match &hab.group {
            None => {
                let controller = state
                    .controllers
                    .get_mut(&hab.prefix)
                    .ok_or_else(|| MultisigError::not_found("controller", hab.prefix.as_str()))?;
                controller.rotate();
                (hab.prefix.clone(), 0, vec![controller.current_key.clone()], vec![controller.next_digest()], 1, 1)
            }
            Some(group) => {
                if args.states.is_empty() {
                    return Err(MultisigError::InvalidArgument("group rotation needs signing member states".to_string()));
                }
                let rstates = if args.rstates.is_empty() { &args.states } else { &args.rstates };
                let member = state.agent(&agent)?.hab(&group.mhab)?.prefix.clone();
                let index = args
                    .states
                    .iter()
                    .position(|s| s.prefix == member)
                    .ok_or_else(|| MultisigError::InvalidArgument(format!("local member {member} is not among the signing states")))?;
                (
                    member,
                    index,
                    args.states.iter().map(first_key).collect::<Result<Vec<_>>>()?,
                    rstates.iter().map(first_next_digest).collect::<Result<Vec<_>>>()?,
                    args.isith.map_or_else(|| current.threshold(), Ok)?,
                    args.nsith.map_or_else(|| parse_threshold(&current.next_threshold), Ok)?,
                )
            }
        };

        let (digest, rot) = rotate(&RotationParams {
            prefix: hab.prefix.clone(),
            sn,
            prior: current.digest.clone(),
            keys: keys.clone(),
            isith,
            next_digests,
            nsith,
            toad,
        })?;
        let controller = state.controller(&member)?.clone();
        let sig = controller.sign(index, &digest);

        if let Some(group) = &hab.group {
            let smids: Vec<Prefix> = args.states.iter().map(|s| s.prefix.clone()).collect();
            let rmids: Vec<Prefix> =
                if args.rstates.is_empty() { smids.clone() } else { args.rstates.iter().map(|s| s.prefix.clone()).collect() };
            let mhab = group.mhab.clone();
            if let Some(record) = state.agent_mut(&agent)?.habs.get_mut(alias) {
                record.group = Some(HabGroup { mhab, smids, rmids });
            }
        }

        let proposal = Proposal {
            group: hab.prefix.clone(),
            kind: ProposalKind::Rotation,
            route: ProposalKind::Rotation.default_route(),
            sn,
            prior: Some(current.digest.clone()),
            event: rot.clone(),
            keys,
            threshold: isith,
            contributions: Vec::new(),
            status: ProposalStatus::Escrowed,
            effect: AcceptEffect::None,
        };
        state.propose(&digest, proposal, Contribution { member, index, key: controller.current_key });
        info!("memory agent: proposed rotation alias={alias} sn={sn}");
        let name = if hab.group.is_some() { format!("group.{digest}") } else { format!("rotation.{digest}") };
        let op = state.add_operation(&agent, OperationName::new(name), OpKind::Proposal { digest, response: rot.clone() }, None)?;
        Ok(EventResult { serder: rot, sigs: vec![sig], op })
    }

    async fn add_end_role(&self, alias: &str, role: &str, eid: &Prefix, timestamp: Option<&str>) -> Result<EventResult> {
        let mut state = self.lock();
        let agent = self.prefix.clone();
        let hab = state.connected_agent(&agent)?.hab(alias)?.clone();
        let current =
            state.key_state_for(&agent, &hab.prefix).ok_or_else(|| MultisigError::not_found("key state", hab.prefix.as_str()))?;
        let (member, controller) = signer_of(&state, &agent, &hab)?;
        let index = current
            .keys
            .iter()
            .position(|key| key == &controller.current_key)
            .ok_or_else(|| MultisigError::rejected("endroles.add", 400, format!("{member} is not a current signer of {}", hab.prefix)))?;

        let dt = timestamp.map(str::to_string).unwrap_or_else(create_timestamp);
        let (digest, rpy) = reply(&hab.prefix, role, eid, &dt)?;
        let sig = controller.sign(index, &digest);
        let proposal = Proposal {
            group: hab.prefix.clone(),
            kind: ProposalKind::EndRole,
            route: ProposalKind::EndRole.default_route(),
            sn: current.sn()?,
            prior: None,
            event: rpy.clone(),
            keys: current.keys.clone(),
            threshold: current.threshold()?,
            contributions: Vec::new(),
            status: ProposalStatus::Escrowed,
            effect: AcceptEffect::EndRole { cid: hab.prefix.clone(), role: role.to_string(), eid: eid.clone() },
        };
        state.propose(&digest, proposal, Contribution { member, index, key: controller.current_key });
        debug!("memory agent: end role alias={alias} role={role} eid={eid}");
        let op = state.add_operation(
            &agent,
            OperationName::new(format!("endrole.{digest}")),
            OpKind::Proposal { digest, response: rpy.clone() },
            None,
        )?;
        Ok(EventResult { serder: rpy, sigs: vec![sig], op })
    }

    async fn list_end_roles(&self, alias: &str, role: Option<&str>) -> Result<Vec<EndRole>> {
        let state = self.lock();
        let hab = state.connected_agent(&self.prefix)?.hab(alias)?;
        let mut roles = Vec::new();
        if let Some(by_role) = state.end_roles.get(&hab.prefix) {
            for (name, eids) in by_role {
                if role.map_or(true, |wanted| wanted == name) {
                    roles.extend(eids.iter().map(|eid| EndRole { cid: hab.prefix.clone(), role: name.clone(), eid: eid.clone() }));
                }
            }
        }
        Ok(roles)
    }

    async fn members(&self, alias: &str) -> Result<Members> {
        let state = self.lock();
        let hab = state.connected_agent(&self.prefix)?.hab(alias)?;
        let group = hab
            .group
            .as_ref()
            .ok_or_else(|| MultisigError::rejected("identifiers.members", 400, format!("{alias} is not a group identifier")))?;
        let member = |aid: &Prefix| Member { aid: aid.clone(), ends: ends_of(&state, aid) };
        Ok(Members { signing: group.smids.iter().map(member).collect(), rotation: group.rmids.iter().map(member).collect() })
    }
}

#[async_trait]
impl KeyStateService for MemoryAgent {
    async fn get_key_states(&self, prefix: &Prefix) -> Result<Vec<KeyState>> {
        let state = self.lock();
        state.connected_agent(&self.prefix)?;
        Ok(state.key_state_for(&self.prefix, prefix).into_iter().collect())
    }

    async fn query_key_state(&self, prefix: &Prefix, sn: Option<u64>, anchor: Option<SealEvent>) -> Result<Operation> {
        let mut state = self.lock();
        state.connected_agent(&self.prefix)?;
        let name = OperationName::new(format!("query.{prefix}.{}", state.next_seq()));
        state.add_operation(&self.prefix, name, OpKind::Query { prefix: prefix.clone(), sn, anchor: anchor.map(|seal| seal.d) }, None)
    }
}

#[async_trait]
impl OobiService for MemoryAgent {
    async fn get_oobis(&self, alias: &str, role: &str) -> Result<Vec<String>> {
        let state = self.lock();
        let hab = state.connected_agent(&self.prefix)?.hab(alias)?;
        let eids = state.end_roles.get(&hab.prefix).and_then(|roles| roles.get(role)).cloned().unwrap_or_default();
        Ok(eids.iter().map(|eid| format!("{}/oobi/{}/{}/{}", state.agent_url, hab.prefix, role, eid)).collect())
    }

    async fn resolve_oobi(&self, oobi: &str, alias: Option<&str>) -> Result<Operation> {
        let mut state = self.lock();
        let agent = self.prefix.clone();
        state.connected_agent(&agent)?;
        let prefix = oobi_prefix(oobi)?;
        let name = OperationName::new(format!("oobi.{}", state.next_seq()));

        let known = state.logs.get(&prefix).and_then(|log| log.current()).cloned();
        let Some(current) = known else {
            return state.add_operation(
                &agent,
                name,
                OpKind::Failed { code: 404, message: format!("unable to resolve {oobi}") },
                None,
            );
        };

        let overwrite = state.config.overwrite_contacts_on_resolve;
        let visible_later = Instant::now() + state.config.contact_visibility_delay();
        let fallback_alias = alias
            .map(str::to_string)
            .or_else(|| state.controllers.get(&prefix).map(|c| c.alias.clone()))
            .unwrap_or_else(|| prefix.to_string());
        let own = state.controllers.get(&prefix).map_or(false, |c| c.agent == agent);

        let agent_state = state.agent_mut(&agent)?;
        if !own {
            agent_state.views.insert(prefix.clone(), current);
        }
        let recreated = agent_state.deleted_contacts.remove(&prefix);
        match agent_state.contacts.get_mut(&prefix) {
            Some(record) => {
                if overwrite {
                    record.contact.metadata = Map::new();
                }
                if let Some(alias) = alias {
                    record.contact.alias = alias.to_string();
                }
                record.contact.oobi = Some(oobi.to_string());
            }
            None => {
                let mut contact = Contact::new(prefix.clone(), fallback_alias);
                contact.oobi = Some(oobi.to_string());
                let visible_at = if recreated { visible_later } else { Instant::now() };
                agent_state.contacts.insert(prefix.clone(), ContactRecord { contact, visible_at });
            }
        }
        debug!("memory agent: resolved oobi prefix={prefix} recreated={recreated}");
        state.add_operation(&agent, name, OpKind::Resolved { response: json!({ "i": prefix, "oobi": oobi }) }, None)
    }
}

#[async_trait]
impl ContactService for MemoryAgent {
    async fn list_contacts(&self) -> Result<Vec<Contact>> {
        let state = self.lock();
        let now = Instant::now();
        Ok(state
            .connected_agent(&self.prefix)?
            .contacts
            .values()
            .filter(|record| record.visible_at <= now)
            .map(|record| record.contact.clone())
            .collect())
    }

    async fn get_contact(&self, prefix: &Prefix) -> Result<Contact> {
        let state = self.lock();
        state
            .connected_agent(&self.prefix)?
            .contacts
            .get(prefix)
            .filter(|record| record.visible_at <= Instant::now())
            .map(|record| record.contact.clone())
            .ok_or_else(|| MultisigError::not_found("contact", prefix.as_str()))
    }

    async fn update_contact(&self, prefix: &Prefix, info: Map<String, Value>) -> Result<Contact> {
        let mut state = self.lock();
        state.connected_agent(&self.prefix)?;
        let record = state
            .agent_mut(&self.prefix)?
            .contacts
            .get_mut(prefix)
            .filter(|record| record.visible_at <= Instant::now())
            .ok_or_else(|| MultisigError::not_found("contact", prefix.as_str()))?;
        for (key, value) in info {
            match key.as_str() {
                "id" | "oobi" => continue,
                "alias" => {
                    if let Some(alias) = value.as_str() {
                        record.contact.alias = alias.to_string();
                    }
                }
                _ => {
                    record.contact.metadata.insert(key, value);
                }
            }
        }
        Ok(record.contact.clone())
    }

    async fn delete_contact(&self, prefix: &Prefix) -> Result<()> {
        let mut state = self.lock();
        state.connected_agent(&self.prefix)?;
        let agent_state = state.agent_mut(&self.prefix)?;
        agent_state.contacts.remove(prefix).ok_or_else(|| MultisigError::not_found("contact", prefix.as_str()))?;
        agent_state.deleted_contacts.insert(prefix.clone());
        Ok(())
    }
}

#[async_trait]
impl ExchangeService for MemoryAgent {
    async fn send_exchange(&self, request: ExchangeRequest) -> Result<Exchange> {
        let mut state = self.lock();
        let sender = state.connected_agent(&self.prefix)?.hab(&request.sender_alias)?.prefix.clone();
        for recipient in request.recipients.iter().filter(|recipient| **recipient != sender) {
            state.mailbox_of(recipient)?;
        }

        let mut embeds = Map::new();
        let mut pathed = BTreeMap::new();
        for (label, embed) in &request.embeds {
            embeds.insert(label.clone(), embed.sad.clone());
            pathed.insert(label.clone(), embed.atc.clone());
        }
        let (_, embeds) = saidify(&Value::Object(embeds), "d")?;

        let dt = create_timestamp();
        let (said, _) = versioned(
            KERI_PROTOCOL,
            json!({
                "t": "exn",
                "i": sender,
                "rp": "",
                "p": "",
                "dt": dt,
                "r": request.route,
                "q": {},
                "a": request.payload,
                "e": embeds,
            }),
            &["d"],
        )?;
        let exchange = Exchange {
            exn: ExchangeMessage {
                said: said.clone(),
                sender: sender.clone(),
                timestamp: dt,
                route: request.route.clone(),
                payload: request.payload,
                embeds: embeds.as_object().cloned().unwrap_or_default(),
            },
            pathed,
        };
        state.exchanges.insert(said.clone(), exchange.clone());

        for recipient in request.recipients.iter().filter(|recipient| **recipient != sender) {
            state.notify(recipient, &request.route, &said)?;
        }
        info!("memory agent: exchange sent route={} sender={} recipients={}", request.route, sender, request.recipients.len());
        Ok(exchange)
    }

    async fn get_exchange(&self, said: &Said) -> Result<Exchange> {
        let state = self.lock();
        state.connected_agent(&self.prefix)?;
        state.exchanges.get(said).cloned().ok_or_else(|| MultisigError::not_found("exchange", said.as_str()))
    }
}

#[async_trait]
impl NotificationService for MemoryAgent {
    async fn list_notifications(&self) -> Result<Vec<Note>> {
        let state = self.lock();
        let now = Instant::now();
        Ok(state
            .connected_agent(&self.prefix)?
            .notes
            .iter()
            .filter(|record| record.visible_at <= now)
            .map(|record| record.note.clone())
            .collect())
    }

    async fn mark_notification(&self, id: &NoteId) -> Result<()> {
        let mut state = self.lock();
        let record = state
            .agent_mut(&self.prefix)?
            .notes
            .iter_mut()
            .find(|record| &record.note.id == id)
            .ok_or_else(|| MultisigError::not_found("notification", id.as_str()))?;
        record.note.read = true;
        Ok(())
    }

    async fn delete_notification(&self, id: &NoteId) -> Result<()> {
        let mut state = self.lock();
        let notes = &mut state.agent_mut(&self.prefix)?.notes;
        let before = notes.len();
        notes.retain(|record| &record.note.id != id);
        if notes.len() == before {
            return Err(MultisigError::not_found("notification", id.as_str()));
        }
        Ok(())
    }
}

#[async_trait]
impl RegistryService for MemoryAgent {
    async fn create_registry(&self, args: CreateRegistryArgs) -> Result<RegistryResult> {
        let mut state = self.lock();
        let agent = self.prefix.clone();
        let hab = state.connected_agent(&agent)?.hab(&args.name)?.clone();

        let (regk_said, vcp) = registry_incept(&hab.prefix, &args.nonce)?;
        let regk = Prefix::from_said(&regk_said);
        state
            .registries
            .entry(regk.clone())
            .or_insert_with(|| RegistryRecord { owner: hab.prefix.clone() });
        let agent_state = state.agent_mut(&agent)?;
        if !agent_state.registries.iter().any(|registry| registry.regk == regk) {
            agent_state.registries.push(Registry { name: args.registry_name.clone(), regk: regk.clone(), pre: hab.prefix.clone() });
        }

        let seal = anchor_seal(&regk, "0", &regk_said);
        let (digest, anc, sigs) = anchor(&mut state, &agent, &hab, vec![seal], Route::Vcp, AcceptEffect::None)?;
        info!("memory agent: registry proposed name={} regk={regk} anchor={digest}", args.registry_name);
        let op = state.add_operation(
            &agent,
            OperationName::new(format!("registry.{regk}")),
            OpKind::Proposal { digest, response: vcp.clone() },
            None,
        )?;
        Ok(RegistryResult { regser: vcp, serder: anc, sigs, op })
    }

    async fn list_registries(&self, owner_alias: &str) -> Result<Vec<Registry>> {
        let state = self.lock();
        let agent_state = state.connected_agent(&self.prefix)?;
        let owner = agent_state.hab(owner_alias)?.prefix.clone();
        Ok(agent_state.registries.iter().filter(|registry| registry.pre == owner).cloned().collect())
    }

    async fn issue_credential(&self, alias: &str, data: CredentialData) -> Result<IssueResult> {
        let mut state = self.lock();
        let agent = self.prefix.clone();
        let hab = state.connected_agent(&agent)?.hab(alias)?.clone();
        match state.registries.get(&data.ri) {
            Some(record) if record.owner == hab.prefix => {}
            _ => return Err(MultisigError::not_found("registry", data.ri.as_str())),
        }

        let dt = data.timestamp().map(str::to_string).unwrap_or_else(create_timestamp);
        let (said, sad) = acdc(&hab.prefix, &data.ri, &data.s, &Value::Object(data.a.clone()), data.r.as_ref())?;
        let (iss_said, iss) = issue(&said, &data.ri, &dt)?;
        state
            .credentials
            .entry(said.clone())
            .or_insert_with(|| CredentialRecord { sad: sad.clone(), issuer: hab.prefix.clone(), issued: false });
        state.agent_mut(&agent)?.credentials.insert(said.clone());

        let seal = anchor_seal(&said, "0", &iss_said);
        let (digest, anc, sigs) = anchor(&mut state, &agent, &hab, vec![seal], Route::Iss, AcceptEffect::Credential(said.clone()))?;
        let anchor_op = OperationName::new(format!("group.{digest}"));
        state.add_operation(&agent, anchor_op.clone(), OpKind::Proposal { digest: digest.clone(), response: anc.clone() }, None)?;
        let op = state.add_operation(
            &agent,
            OperationName::new(format!("credential.{said}")),
            OpKind::Proposal { digest, response: sad.clone() },
            Some(anchor_op),
        )?;
        info!("memory agent: credential proposed said={said} issuer={}", hab.prefix);
        Ok(IssueResult { acdc: sad, iss, anc, sigs, op })
    }

    async fn list_credentials(&self, owner_alias: &str) -> Result<Vec<Credential>> {
        let state = self.lock();
        let agent_state = state.connected_agent(&self.prefix)?;
        let owner = agent_state.hab(owner_alias)?.prefix.clone();
        Ok(agent_state
            .credentials
            .iter()
            .filter_map(|said| state.credentials.get(said))
            .filter(|record| record.issuer == owner)
            .map(|record| Credential {
                sad: record.sad.clone(),
                status: if record.issued { CredentialStatus::Issued } else { CredentialStatus::Pending },
            })
            .collect())
    }
}

#[async_trait]
impl OperationService for MemoryAgent {
    async fn get_operation(&self, name: &OperationName) -> Result<Operation> {
        let mut state = self.lock();
        state.connected_agent(&self.prefix)?;
        state.evaluate_operation(&self.prefix, name)
    }

    async fn list_operations(&self) -> Result<Vec<Operation>> {
        let mut state = self.lock();
        let names: Vec<OperationName> = state.connected_agent(&self.prefix)?.operations.keys().cloned().collect();
        names.iter().map(|name| state.evaluate_operation(&self.prefix, name)).collect()
    }
}

#[async_trait]
impl GroupService for MemoryAgent {
    async fn join_group(&self, args: JoinGroupArgs) -> Result<Operation> {
        let mut state = self.lock();
        let agent = self.prefix.clone();
        let mhab = state.connected_agent(&agent)?.hab(&args.mhab.name)?.clone();
        let controller = state.controller(&mhab.prefix)?.clone();
        let digest = event_said(&args.rot)?;
        let sn = event_sn(&args.rot)?;
        let keys = string_list(&args.rot, "k");
        let index = args
            .smids
            .iter()
            .position(|smid| smid == &mhab.prefix)
            .ok_or_else(|| MultisigError::InvalidArgument(format!("{} is not a signing member of {}", mhab.prefix, args.gid)))?;

        let agent_state = state.agent_mut(&agent)?;
        let group = HabGroup { mhab: mhab.name.clone(), smids: args.smids.clone(), rmids: args.rmids.clone() };
        match agent_state.habs.get_mut(&args.group_alias) {
            Some(record) => record.group = Some(group),
            None => {
                agent_state.habs.insert(
                    args.group_alias.clone(),
                    HabRecord { name: args.group_alias.clone(), prefix: args.gid.clone(), group: Some(group), pending_state: None },
                );
            }
        }

        let proposal = Proposal {
            group: args.gid.clone(),
            kind: ProposalKind::Rotation,
            route: ProposalKind::Rotation.default_route(),
            sn,
            prior: Some(Said::new(field_str(&args.rot, "p")?)),
            event: args.rot.clone(),
            keys,
            threshold: parse_threshold(field_str(&args.rot, "kt")?)?,
            contributions: Vec::new(),
            status: ProposalStatus::Escrowed,
            effect: AcceptEffect::None,
        };
        state.propose(&digest, proposal, Contribution { member: mhab.prefix.clone(), index, key: controller.current_key });
        info!("memory agent: joined rotation group={} sn={sn} member={}", args.gid, mhab.prefix);
        state.add_operation(&agent, OperationName::new(format!("group.{digest}")), OpKind::Proposal { digest, response: args.rot }, None)
    }

    async fn pending_proposals(&self, group_alias: &str) -> Result<Vec<PendingProposal>> {
        let state = self.lock();
        let group = state.connected_agent(&self.prefix)?.hab(group_alias)?.prefix.clone();
        Ok(state.pending_proposals(&group))
    }
}
