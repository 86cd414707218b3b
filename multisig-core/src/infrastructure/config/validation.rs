use crate::infrastructure::config::types::AppConfig;

const MAX_TIMEOUT_MS: u64 = 600_000;

impl AppConfig {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.agent.hostname.trim().is_empty() {
            errors.push("agent.hostname must not be empty".to_string());
        }
        if self.agent.agent_port == 0 || self.agent.boot_port == 0 {
            errors.push("agent.agent_port and agent.boot_port must be > 0".to_string());
        }
        if self.agent.agent_port == self.agent.boot_port {
            errors.push(format!("agent.agent_port and agent.boot_port must differ (both {})", self.agent.agent_port));
        }

        if let Some(toad) = self.witnesses.toad {
            if toad > self.witnesses.ids.len() {
                errors.push(format!("witnesses.toad ({toad}) cannot exceed the number of witnesses ({})", self.witnesses.ids.len()));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for id in &self.witnesses.ids {
            if !seen.insert(id) {
                errors.push(format!("duplicate witness id: {id}"));
            }
        }

        if self.wait.min_sleep_ms == 0 {
            errors.push("wait.min_sleep_ms must be > 0".to_string());
        }
        if self.wait.min_sleep_ms > self.wait.max_sleep_ms {
            errors.push(format!(
                "wait.min_sleep_ms ({}) cannot exceed wait.max_sleep_ms ({})",
                self.wait.min_sleep_ms, self.wait.max_sleep_ms
            ));
        }
        if self.wait.increase_factor < 1 {
            errors.push("wait.increase_factor must be >= 1".to_string());
        }
        if self.wait.timeout_ms == 0 || self.wait.timeout_ms > MAX_TIMEOUT_MS {
            errors.push(format!("wait.timeout_ms must be in 1..={MAX_TIMEOUT_MS}"));
        }

        if self.notifications.timeout_ms == 0 || self.notifications.timeout_ms > MAX_TIMEOUT_MS {
            errors.push(format!("notifications.timeout_ms must be in 1..={MAX_TIMEOUT_MS}"));
        }
        if self.notifications.poll_interval_ms >= self.notifications.timeout_ms {
            errors.push("notifications.poll_interval_ms must be shorter than notifications.timeout_ms".to_string());
        }

        if self.contacts.visibility_timeout_ms > MAX_TIMEOUT_MS {
            errors.push(format!("contacts.visibility_timeout_ms should not exceed {MAX_TIMEOUT_MS}"));
        }

        if self.simulation.operation_latency_ms >= self.wait.timeout_ms {
            errors.push("simulation.operation_latency_ms must be shorter than wait.timeout_ms".to_string());
        }
        if self.simulation.notification_delay_ms >= self.notifications.timeout_ms {
            errors.push("simulation.notification_delay_ms must be shorter than notifications.timeout_ms".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
