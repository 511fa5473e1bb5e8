//! # Lifecycle Scenarios
//!
//! End-to-end walks through the controller's public API: the reference
//! issuance scenario, the validity truth table, holder portfolio ordering,
//! record immutability, and concurrent readers during mutation.

use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use skillcert_core::{ManualClock, Principal, SkillLevel, ValidityPeriod};
use skillcert_state::{
    CredentialError, LifecycleController, MemorySink, MintRequest, Notification,
};

const START: i64 = 1_767_225_600; // 2026-01-01T00:00:00Z

fn admin() -> Principal {
    Principal::new("registry-admin")
}

fn issuer_a() -> Principal {
    Principal::new("0x00000000000000000000000000000000000000a1")
}

fn holder_h() -> Principal {
    Principal::new("0x00000000000000000000000000000000000000b2")
}

fn setup() -> (LifecycleController, Arc<ManualClock>, Arc<MemorySink>) {
    let clock = Arc::new(ManualClock::at_epoch(START));
    let sink = Arc::new(MemorySink::new());
    let controller = LifecycleController::builder(admin())
        .clock(clock.clone())
        .sink(sink.clone())
        .build();
    (controller, clock, sink)
}

fn rust_request(holder: Principal, secs: u64) -> MintRequest {
    MintRequest {
        holder,
        skill_name: "Rust".to_string(),
        issuer_label: "Acme Academy".to_string(),
        level: SkillLevel::Advanced,
        validity: ValidityPeriod::from_secs(secs),
    }
}

#[test]
fn reference_issuance_scenario() {
    let (ctl, clock, sink) = setup();

    ctl.authorize_issuer(&admin(), &issuer_a(), "Acme Academy")
        .unwrap();
    let id = ctl.mint(&issuer_a(), rust_request(holder_h(), 1000)).unwrap();

    let v = ctl.verify(id).unwrap();
    assert!(v.is_valid);
    assert_eq!(
        v.record.expires_at.epoch_secs(),
        v.record.issued_at.epoch_secs() + 1000
    );

    clock.advance(1001);
    let v = ctl.verify(id).unwrap();
    assert!(!v.is_valid);
    assert!(ctl.is_expired(id).unwrap());
    assert!(v.record.active);

    ctl.revoke_issuer(&admin(), &issuer_a()).unwrap();
    assert!(!ctl.is_authorized(&issuer_a()));

    assert_eq!(
        ctl.mint(&issuer_a(), rust_request(holder_h(), 1000)),
        Err(CredentialError::NotAuthorizedIssuer(issuer_a()))
    );

    ctl.revoke_credential(&admin(), id, "policy").unwrap();
    assert!(!ctl.verify(id).unwrap().record.active);
    assert_eq!(
        ctl.revoke_credential(&admin(), id, "policy"),
        Err(CredentialError::AlreadyRevoked(id))
    );

    let names: Vec<_> = sink.events().iter().map(Notification::name).collect();
    assert_eq!(
        names,
        vec![
            "institution_authorized",
            "certificate_minted",
            "institution_revoked",
            "certificate_revoked",
        ]
    );
}

/// Each of the eight (active, expired, authorized) combinations, set up
/// independently.
#[test]
fn validity_truth_table() {
    for active in [true, false] {
        for expired in [true, false] {
            for authorized in [true, false] {
                let (ctl, clock, _) = setup();
                ctl.authorize_issuer(&admin(), &issuer_a(), "Acme Academy")
                    .unwrap();
                let id = ctl.mint(&issuer_a(), rust_request(holder_h(), 500)).unwrap();
                if !active {
                    ctl.revoke_credential(&issuer_a(), id, "x").unwrap();
                }
                if expired {
                    clock.advance(501);
                }
                if !authorized {
                    ctl.revoke_issuer(&admin(), &issuer_a()).unwrap();
                }
                let v = ctl.verify(id).unwrap();
                assert_eq!(
                    v.is_valid,
                    active && !expired && authorized,
                    "active={active} expired={expired} authorized={authorized}"
                );
                assert_eq!(ctl.is_expired(id).unwrap(), expired);
            }
        }
    }
}

/// Deauthorization invalidates every outstanding credential of that issuer
/// and leaves other issuers' credentials alone. Validity is recomputed on
/// read; the stored records are not rewritten.
#[test]
fn deauthorizing_issuer_invalidates_all_its_credentials_on_read() {
    let (ctl, _, _) = setup();
    let other = Principal::new("globex");
    ctl.authorize_issuer(&admin(), &issuer_a(), "Acme Academy")
        .unwrap();
    ctl.authorize_issuer(&admin(), &other, "Globex").unwrap();

    let mine: Vec<_> = (0..3)
        .map(|i| {
            ctl.mint(&issuer_a(), rust_request(Principal::new(format!("h{i}")), 1000))
                .unwrap()
        })
        .collect();
    let theirs = ctl.mint(&other, rust_request(holder_h(), 1000)).unwrap();
    let before: Vec<_> = mine.iter().map(|id| ctl.credential(*id).unwrap()).collect();

    ctl.revoke_issuer(&admin(), &issuer_a()).unwrap();

    for (id, record) in mine.iter().zip(&before) {
        let v = ctl.verify(*id).unwrap();
        assert!(!v.is_valid);
        assert_eq!(&v.record, record);
    }
    assert!(ctl.verify(theirs).unwrap().is_valid);
}

#[test]
fn holder_portfolio_keeps_mint_order_including_revoked() {
    let (ctl, _, _) = setup();
    ctl.authorize_issuer(&admin(), &issuer_a(), "Acme Academy")
        .unwrap();
    let a = ctl.mint(&issuer_a(), rust_request(holder_h(), 10)).unwrap();
    let _ = ctl
        .mint(&issuer_a(), rust_request(Principal::new("someone"), 10))
        .unwrap();
    let b = ctl.mint(&issuer_a(), rust_request(holder_h(), 10)).unwrap();
    ctl.revoke_credential(&issuer_a(), a, "superseded").unwrap();
    let c = ctl.mint(&issuer_a(), rust_request(holder_h(), 10)).unwrap();

    assert_eq!(ctl.holder_credentials(&holder_h()), vec![a, b, c]);
    assert!(ctl
        .holder_credentials(&Principal::new("stranger"))
        .is_empty());
}

#[test]
fn concurrent_readers_never_see_partial_revocation() {
    let clock = Arc::new(ManualClock::at_epoch(START));
    let sink = Arc::new(MemorySink::new());
    let ctl = Arc::new(
        LifecycleController::builder(admin())
            .clock(clock)
            .sink(sink.clone())
            .build(),
    );
    ctl.authorize_issuer(&admin(), &issuer_a(), "Acme Academy")
        .unwrap();
    let ids: Vec<_> = (0..50)
        .map(|_| ctl.mint(&issuer_a(), rust_request(holder_h(), 1000)).unwrap())
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let ctl = Arc::clone(&ctl);
            let sink = Arc::clone(&sink);
            let ids = ids.clone();
            thread::spawn(move || {
                for _ in 0..20 {
                    for id in &ids {
                        let record = ctl.credential(*id).unwrap();
                        if !record.active {
                            // The revocation notification was delivered
                            // before the write lock was released.
                            let notified = sink.events().iter().any(|n| {
                                matches!(n, Notification::CertificateRevoked { id: rid, .. } if rid == id)
                            });
                            assert!(notified, "credential {id} revoked without notification");
                        }
                    }
                }
            })
        })
        .collect();

    for id in &ids {
        ctl.revoke_credential(&admin(), *id, "bulk").unwrap();
    }
    for r in readers {
        r.join().unwrap();
    }
    assert_eq!(sink.len(), 1 + 50 + 50);
}

proptest! {
    /// Repeated verification never changes any mint-time field, whatever
    /// happens to the clock and the issuer in between.
    #[test]
    fn mint_fields_never_change(
        validity in 1u64..10_000,
        steps in proptest::collection::vec((0u64..5_000, any::<bool>()), 1..12),
    ) {
        let (ctl, clock, _) = setup();
        ctl.authorize_issuer(&admin(), &issuer_a(), "Acme Academy").unwrap();
        let id = ctl.mint(&issuer_a(), rust_request(holder_h(), validity)).unwrap();
        let original = ctl.verify(id).unwrap().record;

        for (advance, toggle_issuer) in steps {
            clock.advance(advance);
            if toggle_issuer {
                if ctl.is_authorized(&issuer_a()) {
                    ctl.revoke_issuer(&admin(), &issuer_a()).unwrap();
                } else {
                    ctl.authorize_issuer(&admin(), &issuer_a(), "Acme Academy").unwrap();
                }
            }
            let v = ctl.verify(id).unwrap();
            prop_assert!(v.record.same_mint_fields(&original));
            prop_assert_eq!(v.record.active, true);
            let expected = !ctl.is_expired(id).unwrap() && ctl.is_authorized(&issuer_a());
            prop_assert_eq!(v.is_valid, expected);
        }
    }
}
