use shellshield::paths::{is_critical_path, is_sensitive_path};

#[test]
fn root_is_critical() {
    assert!(is_critical_path("/"));
    assert!(is_critical_path(""));
}

#[test]
fn unix_system_dirs_are_critical() {
    assert!(is_critical_path("/etc"));
    assert!(is_critical_path("/etc/"));
    assert!(is_critical_path("/Usr"));
}

#[test]
fn windows_system_dirs_are_critical() {
    assert!(is_critical_path("C:/Windows"));
    assert!(is_critical_path("C:\\Windows\\System32"));
}

#[test]
fn git_directory_is_critical() {
    assert!(is_critical_path(".git"));
    assert!(is_critical_path("/home/user/project/.git"));
}

#[test]
fn ordinary_path_is_not_critical() {
    assert!(!is_critical_path("/home/user/project/file.txt"));
}

#[test]
fn ssh_directory_is_sensitive() {
    std::env::set_var("HOME", "/home/tester");
    assert!(is_sensitive_path("~/.ssh/id_rsa"));
    assert!(is_sensitive_path("~/.bashrc"));
    assert!(!is_sensitive_path("~/notes.txt"));
}
