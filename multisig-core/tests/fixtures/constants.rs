#![allow(dead_code)]

pub const TEST_GROUP_ALIAS: &str = "group";
pub const TEST_REGISTRY_NAME: &str = "reg";
pub const TEST_LEI: &str = "OO123123123123123123";
pub const TEST_TIMESTAMP: &str = "2024-05-01T10:00:00.000000+00:00";
pub const TEST_OTHER_TIMESTAMP: &str = "2024-05-01T10:00:01.000000+00:00";
pub const TEST_OPERATION_LATENCY_MS: u64 = 200;
pub const TEST_NOTIFICATION_DELAY_MS: u64 = 150;
pub const TEST_CONTACT_DELAY_MS: u64 = 400;
