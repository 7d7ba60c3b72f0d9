use super::SessionId;

#[test]
fn it_creates_prefixed_ids() {
    let id = SessionId::create();
    let parts = id.split('-').collect::<Vec<&str>>();

    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "session");
    assert!(parts[1].parse::<u128>().is_ok());
    assert_eq!(parts[2].len(), 8);
}

#[test]
fn it_regenerates_a_different_id() {
    let previous = SessionId::create();
    for _ in 0..100 {
        assert_ne!(SessionId::regenerate(&previous), previous);
    }
}
