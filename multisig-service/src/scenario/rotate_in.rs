use super::report::ScenarioReport;
use super::world::{form_group, introduce_all, member_alias, signing_members, ScenarioWorld, GROUP_ALIAS};
use super::{collect_group_state, Scenario};
use futures_util::future::try_join_all;
use log::info;
use multisig_core::application::{AbortSignal, GroupRotationArgs, Participant};
use multisig_core::domain::Route;
use multisig_core::Result;

/// A three-member group rotates to four signers; every other member joins the rotation
/// from its mailbox, the new member included.
pub(super) async fn run(world: &ScenarioWorld) -> Result<ScenarioReport> {
    let mut members = world.participants(3).await?;
    {
        let founders: Vec<&Participant> = members.iter().collect();
        introduce_all(&founders).await?;
        let smids = signing_members(&founders)?;
        form_group(&founders, &smids, 2).await?;
        for founder in &founders {
            founder.rotate_identifier(founder.alias()).await?;
        }
    }

    members.push(world.participant(&member_alias(3)).await?);
    let members: Vec<&Participant> = members.iter().collect();
    introduce_all(&members).await?;

    let all = signing_members(&members)?;
    let op = members[0]
        .rotate_group(GROUP_ALIAS, GroupRotationArgs { smids: Some(all.clone()), rmids: Some(all) })
        .await?;
    info!("scenario: {} proposed the rotation", members[0].alias());

    try_join_all(members[1..].iter().map(|member| async move {
        let signal = AbortSignal::timeout(member.config().notifications.timeout());
        let op = member.catch_up(GROUP_ALIAS, &Route::Rot, &signal).await?;
        member.wait(op).await
    }))
    .await?;
    members[0].wait(op).await?;

    collect_group_state(Scenario::RotateIn, &members).await
}
