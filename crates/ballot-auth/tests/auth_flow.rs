use ballot_auth::{normalize_phone, OtpError, OtpStore, VerifiedVoters};
use ballot_core::{Ledger, VoteOutcome};

fn authenticate(store: &OtpStore, raw_phone: &str) -> anyhow::Result<String> {
    let phone = normalize_phone(raw_phone)?;
    let code = store.issue(&phone);
    Ok(store.verify(&phone, &code)?)
}

#[test]
fn reauthenticated_phone_cannot_vote_twice() -> anyhow::Result<()> {
    let store = OtpStore::default();
    let ledger = Ledger::new(2);

    let first = authenticate(&store, "(555) 123-4567")?;
    assert!(ledger.submit_vote(&first, "c1")?.is_accepted());

    // Same number, different formatting, fresh passcode.
    let second = authenticate(&store, "555 123 4567")?;
    assert_eq!(first, second);
    assert_eq!(ledger.submit_vote(&second, "c2")?, VoteOutcome::AlreadyVoted);
    assert_eq!(ledger.get_total_votes(), 1);
    assert_eq!(ledger.get_candidate_votes("c2"), 0);
    Ok(())
}

#[test]
fn distinct_phones_vote_independently() -> anyhow::Result<()> {
    let store = OtpStore::default();
    let ledger = Ledger::new(2);
    let verified = VerifiedVoters::new();
    for phone in ["5550000001", "5550000002", "5550000003"] {
        let voter_id = authenticate(&store, phone)?;
        verified.insert(voter_id.clone());
        assert!(ledger.submit_vote(&voter_id, "c1")?.is_accepted());
        assert!(verified.contains(&voter_id));
    }
    assert_eq!(ledger.get_candidate_votes("c1"), 3);
    assert!(ledger.is_valid());
    Ok(())
}

#[test]
fn wrong_passcode_yields_no_voter_id() -> anyhow::Result<()> {
    let store = OtpStore::default();
    let phone = normalize_phone("5551234567")?;
    let code = store.issue(&phone);
    let wrong = if code == "123456" { "654321" } else { "123456" };
    assert_eq!(store.verify(&phone, wrong), Err(OtpError::Mismatch));
    Ok(())
}
