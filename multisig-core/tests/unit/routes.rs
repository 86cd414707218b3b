use multisig_core::domain::notification::newest_for_route;
use multisig_core::domain::{oobi_prefix, Note, NoteAttrs, Route};
use multisig_core::foundation::{MultisigError, NoteId, Said};

fn note(id: &str, dt: &str, route: Route) -> Note {
    Note { id: NoteId::new(id), dt: dt.to_string(), read: false, attrs: NoteAttrs { route, exchange: Said::new(format!("E{id}")) } }
}

#[test]
fn test_route_when_parsed_then_round_trips_known_routes() {
    for route in [Route::Icp, Route::Rot, Route::Rpy, Route::Vcp, Route::Iss, Route::Exn, Route::IpexGrant] {
        assert_eq!(Route::parse(route.as_str()), route);
    }
    assert_eq!(Route::parse("/multisig/ixn"), Route::Unknown("/multisig/ixn".to_string()));
}

#[test]
fn test_notifications_when_several_match_then_newest_wins() {
    let notes = vec![
        note("1", "2024-05-01T10:00:00.000000+00:00", Route::Iss),
        note("2", "2024-05-01T10:00:05.000000+00:00", Route::Iss),
        note("3", "2024-05-01T10:00:09.000000+00:00", Route::Rot),
    ];
    assert_eq!(newest_for_route(&notes, &Route::Iss).map(|n| n.id.as_str()), Some("2"));
    assert!(newest_for_route(&notes, &Route::Vcp).is_none());
}

#[test]
fn test_oobi_when_malformed_then_rejected() {
    assert_eq!(oobi_prefix("http://localhost:3902/oobi/EAbc/agent/EAgent").expect("prefix").as_str(), "EAbc");
    assert!(matches!(oobi_prefix("http://localhost:3902/introduce"), Err(MultisigError::InvalidArgument(_))));
}
