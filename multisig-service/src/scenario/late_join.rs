use super::report::ScenarioReport;
use super::world::{create_registry, form_group, introduce_all, signing_members, ScenarioWorld, GROUP_ALIAS};
use super::{collect_group_state, Scenario};
use log::info;
use multisig_core::application::{GroupArgs, Participant};
use multisig_core::foundation::util::random_nonce;
use multisig_core::Result;

/// Three of four members incept the group and its registry; the fourth proposes the same
/// inception and registry afterwards and converges on both.
pub(super) async fn run(world: &ScenarioWorld) -> Result<ScenarioReport> {
    let members = world.participants(4).await?;
    let members: Vec<&Participant> = members.iter().collect();
    introduce_all(&members).await?;

    let smids = signing_members(&members)?;
    let isith = 3;
    form_group(&members[..3], &smids, isith).await?;
    let nonce = random_nonce();
    create_registry(&members[..3], &nonce).await?;

    let late = members[3];
    info!("scenario: {} proposes the accepted inception", late.alias());
    let op = late.create_group(GROUP_ALIAS, GroupArgs { smids, isith, ..GroupArgs::default() }).await?;
    late.wait(op).await?;
    create_registry(&[late], &nonce).await?;

    collect_group_state(Scenario::LateJoin, &members).await
}
