//! System-wide constants for group identifier coordination.

/// Lower bound for a single awaiter sleep, in milliseconds.
pub const DEFAULT_MIN_SLEEP_MS: u64 = 100;

/// Upper bound for a single awaiter sleep, in milliseconds.
pub const DEFAULT_MAX_SLEEP_MS: u64 = 1_000;

/// Base of the awaiter's exponential backoff.
pub const DEFAULT_INCREASE_FACTOR: u64 = 2;

/// Default deadline for scenario-level operation waits (20 seconds).
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 20_000;

/// Default deadline for notification discovery (10 seconds).
pub const DEFAULT_NOTIFICATION_TIMEOUT_MS: u64 = 10_000;

/// Pause between two mailbox polls while waiting for a notification.
pub const DEFAULT_NOTIFICATION_POLL_MS: u64 = 10;

/// Default deadline for a resolved contact to become readable (5 seconds).
pub const DEFAULT_CONTACT_VISIBILITY_TIMEOUT_MS: u64 = 5_000;

/// Default agent API port of the identity service.
pub const DEFAULT_AGENT_PORT: u16 = 3901;

/// Default boot API port of the identity service.
pub const DEFAULT_BOOT_PORT: u16 = 3903;

/// Default identity service hostname.
pub const DEFAULT_AGENT_HOSTNAME: &str = "localhost";

/// End role granted to a participant's cloud agent.
pub const AGENT_ROLE: &str = "agent";

/// Exchange topic class used for every group proposal.
pub const MULTISIG_TOPIC: &str = "multisig";

/// Length of a rendered self-addressing identifier.
pub const SAID_LENGTH: usize = 44;

/// Derivation code prefix for Blake3-256 digests.
pub const BLAKE3_DIGEST_CODE: char = 'E';

/// Length of a passcode used to boot an agent.
pub const PASSCODE_LENGTH: usize = 21;

/// Schema SAID of the vLEI Qualified vLEI Issuer credential.
pub const QVI_SCHEMA_SAID: &str = "EBfdlu8R27Fbx-ehrqwImnK-8Cm79sqbAQ4MmvEAYqao";

/// Rules text of the vLEI usage disclaimer.
pub const VLEI_USAGE_DISCLAIMER: &str = "Usage of a valid, unexpired, and non-revoked vLEI Credential, as defined in the associated Ecosystem Governance Framework, does not assert that the Legal Entity is trustworthy, honest, reputable in its business dealings, safe to do business with, or compliant with any laws or that an implied or expressly intended purpose will be fulfilled.";

/// Rules text of the vLEI issuance disclaimer.
pub const VLEI_ISSUANCE_DISCLAIMER: &str = "All information in a valid, unexpired, and non-revoked vLEI Credential, as defined in the associated Ecosystem Governance Framework, is accurate as of the date the validation process was complete. The vLEI Credential has been issued to the legal entity or person named in the vLEI Credential as the subject; and the qualified vLEI Issuer exercised reasonable care to perform the validation process set forth in the vLEI Ecosystem Governance Framework.";

#[cfg(test)]
pub mod test {
    /// Short deadline for tests that expect a wait to be cut off.
    pub const TEST_SHORT_TIMEOUT_MS: u64 = 250;
}
