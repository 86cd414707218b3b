use multisig_service::ScenarioReport;

#[allow(dead_code)]
pub fn assert_converged(report: &ScenarioReport, members: usize) {
    assert_eq!(report.group_prefixes.len(), members, "report: {}", report.summary());
    assert!(report.converged(), "group prefixes diverged: {:?}", report.group_prefixes);
}

#[allow(dead_code)]
pub fn assert_counts(report: &ScenarioReport, registries: usize, credentials: usize) {
    for (alias, count) in &report.registries {
        assert_eq!(*count, registries, "registries of {alias}");
    }
    for (alias, count) in &report.credentials {
        assert_eq!(*count, credentials, "credentials of {alias}");
    }
}
