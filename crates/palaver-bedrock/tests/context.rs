use palaver_bedrock::context::{ContextFile, assemble_prompt, build_context_block, to_model_messages};
use palaver_core::models::message::{FileRef, Message, Role};
use pretty_assertions::assert_eq;

fn file(name: &str, text: &str) -> ContextFile {
    ContextFile {
        filename: name.to_string(),
        text: text.to_string(),
    }
}

#[test]
fn empty_files_returns_empty_string() {
    assert_eq!(build_context_block(&[]), "");
}

#[test]
fn files_are_wrapped_and_joined() {
    let block = build_context_block(&[file("a.txt", "alpha"), file("b.pdf", "beta")]);
    assert_eq!(
        block,
        "Here are the files provided as context:\n\n<file name='a.txt'>\nalpha\n</file>\n<file name='b.pdf'>\nbeta\n</file>"
    );
}

#[test]
fn prompt_without_files_is_history_then_user() {
    let history = vec![Message::user("hi", 1), Message::assistant("hello", 2)];
    let user = Message::user("how are you?", 10);

    let prompt = assemble_prompt(&history, &[], &user);
    assert_eq!(prompt, vec![history[0].clone(), history[1].clone(), user]);
}

#[test]
fn file_context_sits_just_before_user_message() {
    let history = vec![Message::user("earlier", 1)];
    let user = Message::user("summarize", 1_000).with_files(vec![FileRef {
        name: "notes.txt".to_string(),
        file_type: "text/plain".to_string(),
    }]);

    let prompt = assemble_prompt(&history, &[file("notes.txt", "content")], &user);

    assert_eq!(prompt.len(), 3);
    let context = &prompt[1];
    assert_eq!(context.role, Role::User);
    assert_eq!(context.timestamp, 999);
    assert!(context.files.is_none());
    assert!(context.content.contains("<file name='notes.txt'>\ncontent\n</file>"));
    assert_eq!(prompt[2], user);
}

#[test]
fn model_messages_carry_role_and_content_only() {
    let messages = vec![
        Message::user("q", 1).with_files(vec![FileRef {
            name: "x".to_string(),
            file_type: "y".to_string(),
        }]),
        Message::assistant("a", 2),
    ];

    let json = serde_json::to_value(to_model_messages(&messages)).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            { "role": "user", "content": "q" },
            { "role": "assistant", "content": "a" }
        ])
    );
}
