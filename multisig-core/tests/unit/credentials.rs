use crate::fixtures::{TEST_LEI, TEST_TIMESTAMP};
use multisig_core::domain::event::builder::acdc;
use multisig_core::domain::vlei::{qvi_credential, QviCredentialConfig};
use multisig_core::domain::CredentialData;
use multisig_core::foundation::constants::QVI_SCHEMA_SAID;
use multisig_core::foundation::Prefix;

fn config(holder: &str) -> QviCredentialConfig {
    QviCredentialConfig {
        registry: Prefix::new("ERegistry"),
        holder: Prefix::new(holder),
        issuer: Prefix::new("EGroup"),
        timestamp: TEST_TIMESTAMP.to_string(),
        lei: TEST_LEI.to_string(),
    }
}

fn compose(data: &CredentialData) -> serde_json::Value {
    let (_, sad) = acdc(&Prefix::new("EGroup"), &data.ri, &data.s, &serde_json::Value::Object(data.a.clone()), data.r.as_ref())
        .expect("acdc");
    sad
}

#[test]
fn test_qvi_when_same_inputs_then_members_compose_identical_acdc() {
    let first = compose(&qvi_credential(&config("EHolder")).expect("qvi"));
    let second = compose(&qvi_credential(&config("EHolder")).expect("qvi"));
    assert_eq!(first["d"], second["d"]);
    assert_eq!(first["s"], QVI_SCHEMA_SAID);
    assert_eq!(first["a"]["LEI"], TEST_LEI);
}

#[test]
fn test_qvi_when_holder_differs_then_digest_differs() {
    let first = compose(&qvi_credential(&config("EHolderA")).expect("qvi"));
    let second = compose(&qvi_credential(&config("EHolderB")).expect("qvi"));
    assert_ne!(first["d"], second["d"]);
}

#[test]
fn test_credential_data_when_recovered_from_acdc_then_recomposes_same_said() {
    let original = compose(&qvi_credential(&config("EHolder")).expect("qvi"));
    let recovered = CredentialData::from_acdc(&original).expect("from acdc");
    assert_eq!(recovered.timestamp(), Some(TEST_TIMESTAMP));
    assert_eq!(compose(&recovered)["d"], original["d"]);
}

#[test]
fn test_credential_data_when_acdc_lacks_attributes_then_rejected() {
    let broken = serde_json::json!({ "ri": "ERegistry", "s": QVI_SCHEMA_SAID });
    assert!(CredentialData::from_acdc(&broken).is_err());
}
