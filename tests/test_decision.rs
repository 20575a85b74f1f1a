use shellshield::decision::Decision;

#[test]
fn allow_has_empty_fields() {
    let d = Decision::allow();
    assert!(!d.blocked);
    assert!(d.reason.is_empty());
    assert!(d.suggestion.is_empty());
    assert!(d.rule.is_empty());
}

#[test]
fn block_carries_all_fields() {
    let d = Decision::block("CoreAst", "CRITICAL PATH PROTECTED", "avoid targeting /");
    assert!(d.blocked);
    assert_eq!(d.rule, "CoreAst");
    assert_eq!(d.reason, "CRITICAL PATH PROTECTED");
}
