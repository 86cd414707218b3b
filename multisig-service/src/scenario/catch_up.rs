use super::report::ScenarioReport;
use super::world::{create_registry, form_group, introduce_all, issue, qvi_data, signing_members, ScenarioWorld, GROUP_ALIAS};
use super::{collect_group_state, Scenario};
use log::info;
use multisig_core::application::{AbortSignal, Participant};
use multisig_core::domain::Route;
use multisig_core::foundation::util::random_nonce;
use multisig_core::Result;

/// Three members at threshold two: the first two issue, the third wakes up later and joins.
pub(super) async fn run(world: &ScenarioWorld) -> Result<ScenarioReport> {
    let members = world.participants(3).await?;
    let members: Vec<&Participant> = members.iter().collect();
    introduce_all(&members).await?;

    let smids = signing_members(&members)?;
    form_group(&members, &smids, 2).await?;
    create_registry(&members, &random_nonce()).await?;

    let holder = members[0].identifier()?.prefix;
    let data = qvi_data(members[0], &holder).await?;
    issue(&members[..2], &data).await?;
    info!("scenario: credential issued by two of three members");

    let sleeper = members[2];
    let signal = AbortSignal::timeout(world.config().notifications.timeout());
    let op = sleeper.catch_up(GROUP_ALIAS, &Route::Iss, &signal).await?;
    sleeper.wait(op).await?;
    info!("scenario: {} caught up with the issuance", sleeper.alias());

    collect_group_state(Scenario::CatchUp, &members).await
}
