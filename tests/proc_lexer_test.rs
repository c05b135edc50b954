use portal_view::{
    error::ViewerError,
    proc::{ProcLexer, Token, TokenStream},
};

#[test]
fn should_read_typed_values_skipping_punctuation() {
    let mut lexer = ProcLexer::new(r#"{ "textures/floor" 3 ( 1.5 -2 0 ) }"#);
    assert_eq!(lexer.next_string().unwrap(), "textures/floor");
    assert_eq!(lexer.next_int().unwrap(), 3);
    assert_eq!(lexer.next_float().unwrap(), 1.5);
    assert_eq!(lexer.next_float().unwrap(), -2.0);
    assert_eq!(lexer.next_count("zero").unwrap(), 0);
    assert_eq!(lexer.next_token().unwrap(), Some(Token::Punct(')')));
}

#[test]
fn should_skip_comments() {
    let text = "/* numVerts = */ 4 // trailing\n/* multi\nline */ 5";
    let mut lexer = ProcLexer::new(text);
    assert_eq!(lexer.next_int().unwrap(), 4);
    assert_eq!(lexer.next_int().unwrap(), 5);
    assert_eq!(lexer.line(), 3);
}

#[test]
fn should_fail_at_end_of_input() {
    let mut lexer = ProcLexer::new("1");
    lexer.next_int().unwrap();
    assert!(matches!(lexer.next_int(), Err(ViewerError::MalformedInput(_))));
    assert!(matches!(lexer.next_string(), Err(ViewerError::MalformedInput(_))));
}

#[test]
fn should_report_line_of_type_mismatch() {
    let mut lexer = ProcLexer::new("1\n2\n\"name\"");
    lexer.next_int().unwrap();
    lexer.next_int().unwrap();
    match lexer.next_float() {
        Err(ViewerError::MalformedInput(message)) => assert!(message.starts_with("line 3")),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn should_reject_non_numeric_word() {
    let mut lexer = ProcLexer::new("abc");
    assert!(lexer.next_int().is_err());
}

#[test]
fn should_reject_negative_count() {
    let mut lexer = ProcLexer::new("-4");
    assert!(matches!(
        lexer.next_count("vertex count"),
        Err(ViewerError::MalformedInput(_))
    ));
}

#[test]
fn should_skip_nested_blocks() {
    let mut lexer = ProcLexer::new("{ a { b } \"}\" } next");
    lexer.skip_block().unwrap();
    assert_eq!(lexer.next_token().unwrap(), Some(Token::Word("next".into())));
}

#[test]
fn should_fail_on_unterminated_input() {
    assert!(ProcLexer::new("/* open").next_token().is_err());
    assert!(ProcLexer::new("\"open").next_token().is_err());
    assert!(ProcLexer::new("{ a { b }").skip_block().is_err());
    assert!(ProcLexer::new("x").expect_punct('{').is_err());
}
