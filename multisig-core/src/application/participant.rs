//! One participant: a session with its agent plus its local identifier.

use crate::application::abort::AbortSignal;
use crate::application::awaiter::{OperationAwaiter, WaitOptions};
use crate::domain::{Contact, CreateIdentifierArgs, EndRole, Identifier, Operation, RotateArgs, SealEvent};
use crate::foundation::constants::AGENT_ROLE;
use crate::foundation::{MultisigError, Prefix, Result};
use crate::infrastructure::agent::Agent;
use crate::infrastructure::config::AppConfig;
use log::{debug, info};
use parking_lot::RwLock;
use std::sync::Arc;

pub struct Participant {
    alias: String,
    agent: Arc<dyn Agent>,
    awaiter: OperationAwaiter<dyn Agent>,
    config: AppConfig,
    identifier: RwLock<Option<Identifier>>,
}

impl Participant {
    pub fn new(alias: impl Into<String>, agent: Arc<dyn Agent>) -> Self {
        Self::with_config(alias, agent, AppConfig::default())
    }

    pub fn with_config(alias: impl Into<String>, agent: Arc<dyn Agent>, config: AppConfig) -> Self {
        let awaiter = OperationAwaiter::new(Arc::clone(&agent));
        Self { alias: alias.into(), agent, awaiter, config, identifier: RwLock::new(None) }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn agent(&self) -> &Arc<dyn Agent> {
        &self.agent
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn awaiter(&self) -> &OperationAwaiter<dyn Agent> {
        &self.awaiter
    }

    /// Connect and make sure the local identifier exists with its agent end role.
    pub async fn init(&self) -> Result<()> {
        self.agent.connect().await?;
        self.create_identifier().await
    }

    async fn create_identifier(&self) -> Result<()> {
        self.refresh_identifier().await?;
        if self.identifier.read().is_some() {
            debug!("participant: identifier already present alias={}", self.alias);
            return Ok(());
        }

        let agent_id = self.agent_id()?;
        let args = CreateIdentifierArgs {
            transferable: true,
            wits: self.config.witnesses.ids.clone(),
            toad: self.config.witnesses.toad(),
            group: None,
        };
        let incept = self.agent.create_identifier(&self.alias, args).await?;
        self.wait(incept.op).await?;

        let end_role = self.agent.add_end_role(&self.alias, AGENT_ROLE, &agent_id, None).await?;
        self.wait(end_role.op).await?;

        self.refresh_identifier().await?;
        info!("participant: identifier ready alias={} prefix={}", self.alias, self.identifier()?.prefix);
        Ok(())
    }

    /// Cached local identifier; fails until [`Participant::init`] has run.
    pub fn identifier(&self) -> Result<Identifier> {
        self.identifier.read().clone().ok_or_else(|| MultisigError::no_local_identifier(self.alias.as_str()))
    }

    /// Re-read the local identifier; a missing identifier leaves the cache empty.
    pub async fn refresh_identifier(&self) -> Result<Option<Identifier>> {
        let fresh = match self.agent.get_identifier(&self.alias).await {
            Ok(identifier) => Some(identifier),
            Err(MultisigError::NotFound { .. }) => None,
            Err(err) => return Err(err),
        };
        *self.identifier.write() = fresh.clone();
        Ok(fresh)
    }

    pub fn agent_id(&self) -> Result<Prefix> {
        self.agent.agent_prefix().ok_or_else(|| MultisigError::rejected("session", 401, "no agent id available"))
    }

    /// Wait options from config, bounded by the configured scenario timeout.
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions::from_config(&self.config.wait).with_signal(AbortSignal::timeout(self.config.wait.timeout()))
    }

    pub async fn wait(&self, op: Operation) -> Result<Operation> {
        self.awaiter.wait(op, &self.wait_options()).await
    }

    pub async fn wait_with_signal(&self, op: Operation, signal: AbortSignal) -> Result<Operation> {
        let options = WaitOptions::from_config(&self.config.wait).with_signal(signal);
        self.awaiter.wait(op, &options).await
    }

    /// Rotate a local (non-group) identifier and wait for it.
    pub async fn rotate_identifier(&self, alias: &str) -> Result<Operation> {
        let result = self.agent.rotate_identifier(alias, RotateArgs::default()).await?;
        let op = self.wait(result.op).await?;
        if alias == self.alias {
            self.refresh_identifier().await?;
        }
        Ok(op)
    }

    /// Refresh this agent's view of `prefix`, optionally up to `sn` or until `anchor` is seen.
    pub async fn query_key_state(
        &self,
        prefix: &Prefix,
        sn: Option<u64>,
        anchor: Option<SealEvent>,
        signal: Option<AbortSignal>,
    ) -> Result<Operation> {
        let op = self.agent.query_key_state(prefix, sn, anchor).await?;
        match signal {
            Some(signal) => self.wait_with_signal(op, signal).await,
            None => self.wait(op).await,
        }
    }

    pub async fn list_end_roles(&self, alias: &str, role: Option<&str>) -> Result<Vec<EndRole>> {
        self.agent.list_end_roles(alias, role).await
    }

    pub async fn list_contacts(&self) -> Result<Vec<Contact>> {
        self.agent.list_contacts().await
    }

    pub async fn list_operations(&self) -> Result<Vec<Operation>> {
        self.agent.list_operations().await
    }

    /// Delete notifications until the mailbox reads empty.
    pub async fn clear_notifications(&self) -> Result<usize> {
        let mut cleared = 0;
        let mut notes = self.agent.list_notifications().await?;
        while !notes.is_empty() {
            for note in &notes {
                self.agent.delete_notification(&note.id).await?;
                cleared += 1;
            }
            notes = self.agent.list_notifications().await?;
        }
        debug!("participant: cleared {} notifications alias={}", cleared, self.alias);
        Ok(cleared)
    }
}
