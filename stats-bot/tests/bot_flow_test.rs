//! End-to-end chain tests: core messages in, mock bot calls and store rows out.

mod common;

use common::mock_bot::{drain, BotCall};
use common::{edited, group, harness, message, user, GROUP_ID};
use stats_bot::handlers::{BANNED_NOTICE, GENERIC_FAILURE};
use stats_core::{Attachment, Chat, HandlerResponse};

/// **Test: Plain group messages are counted and produce no reply.**
#[tokio::test]
async fn test_group_message_is_counted_silently() {
    let mut h = harness(None).await;
    let ann = user(1, "Ann");

    let response = h.chain.handle(&message(&ann, &group(), "hello  world", None)).await.unwrap();
    h.chain
        .handle(&message(&ann, &group(), "", Some(Attachment::Sticker)))
        .await
        .unwrap();

    assert_eq!(response, HandlerResponse::Continue);
    assert!(drain(&mut h.calls).is_empty());
    let stat = h.services.query.get_user_stat(1, GROUP_ID).await.unwrap().unwrap();
    assert_eq!(stat.message_count, 2);
    assert_eq!(stat.word_count, 2);
    assert_eq!(stat.sticker_count, 1);
    assert_eq!(stat.group_title.as_deref(), Some("Rustaceans"));
}

/// **Test: /stats in a group replies with aggregated counters, including the command itself.**
#[tokio::test]
async fn test_stats_command_in_group() {
    let mut h = harness(Some("https://example.com/app")).await;
    let ann = user(1, "Ann");
    h.chain.handle(&message(&ann, &group(), "hello world", None)).await.unwrap();

    let response = h.chain.handle(&message(&ann, &group(), "/stats", None)).await.unwrap();

    let calls = drain(&mut h.calls);
    assert_eq!(calls.len(), 1);
    let BotCall::Reply { chat_id, text } = &calls[0] else {
        panic!("expected a plain reply in groups, got {:?}", calls[0]);
    };
    assert_eq!(*chat_id, GROUP_ID);
    assert!(text.contains("👤 Name: Ann"));
    assert!(text.contains("💬 Messages: 2"));
    assert!(text.contains("📝 Words: 3"));
    assert!(text.contains("📈 Avg. words/msg: 2"));
    assert_eq!(response, HandlerResponse::Reply(text.clone()));
}

/// **Test: /stats in private gets the Web App button when the URL is configured.**
#[tokio::test]
async fn test_stats_command_in_private_with_webapp() {
    let mut h = harness(Some("https://example.com/app")).await;
    let ann = user(1, "Ann");

    h.chain
        .handle(&message(&ann, &Chat::private(1), "/stats", None))
        .await
        .unwrap();

    let calls = drain(&mut h.calls);
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        BotCall::WebAppButton { text, button, url, .. } => {
            assert!(text.contains("No activity recorded yet."));
            assert_eq!(button, "🌐 Open Web App");
            assert_eq!(url, "https://example.com/app");
        }
        other => panic!("expected web app button, got {:?}", other),
    }
}

/// **Test: /ping sends "Pong!" and edits the same message with the round trip.**
#[tokio::test]
async fn test_ping_sends_then_edits() {
    let mut h = harness(None).await;

    h.chain
        .handle(&message(&user(1, "Ann"), &Chat::private(1), "/ping", None))
        .await
        .unwrap();

    let calls = drain(&mut h.calls);
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0],
        BotCall::Send {
            chat_id: 1,
            text: "Pong!".to_string()
        }
    );
    match &calls[1] {
        BotCall::Edit { message_id, text, .. } => {
            assert_eq!(message_id, "1");
            assert!(text.starts_with("Pong!\n<code>"));
            assert!(text.ends_with("</code> ms"));
        }
        other => panic!("expected edit, got {:?}", other),
    }
}

/// **Test: A banned user is kicked with a notice and nothing is counted, commands included.**
#[tokio::test]
async fn test_banned_user_is_kicked() {
    let mut h = harness(None).await;
    h.services.aggregator.ban_user(2, Some("spam".to_string())).await.unwrap();
    let bob = user(2, "Bob");

    let response = h.chain.handle(&message(&bob, &group(), "/stats", None)).await.unwrap();

    assert_eq!(response, HandlerResponse::Stop);
    assert_eq!(
        drain(&mut h.calls),
        vec![
            BotCall::Ban {
                chat_id: GROUP_ID,
                user_id: 2
            },
            BotCall::Reply {
                chat_id: GROUP_ID,
                text: BANNED_NOTICE.to_string()
            },
        ]
    );
    assert!(h.services.query.get_user_stat(2, GROUP_ID).await.unwrap().is_none());
}

/// **Test: A failed kick is swallowed; the message is still not counted.**
#[tokio::test]
async fn test_failed_kick_is_not_retried() {
    let mut h = harness(None).await;
    h.services.aggregator.ban_user(2, None).await.unwrap();
    h.bot.fail_bans();

    let response = h
        .chain
        .handle(&message(&user(2, "Bob"), &group(), "hi", None))
        .await
        .unwrap();

    assert_eq!(response, HandlerResponse::Stop);
    assert!(drain(&mut h.calls).is_empty());
    assert!(h.services.query.get_user_stat(2, GROUP_ID).await.unwrap().is_none());
}

/// **Test: Messages in a banned group are dropped without any outbound call.**
#[tokio::test]
async fn test_banned_group_is_ignored() {
    let mut h = harness(None).await;
    h.services.aggregator.ban_group(GROUP_ID, None).await.unwrap();

    let response = h
        .chain
        .handle(&message(&user(1, "Ann"), &group(), "/stats", None))
        .await
        .unwrap();

    assert_eq!(response, HandlerResponse::Stop);
    assert!(drain(&mut h.calls).is_empty());
    assert!(h.services.query.get_group(GROUP_ID).await.unwrap().is_none());
}

/// **Test: Edits bump only the edit counter and never run commands.**
#[tokio::test]
async fn test_edit_counts_and_stops() {
    let mut h = harness(None).await;
    let ann = user(1, "Ann");
    h.chain.handle(&message(&ann, &group(), "hello", None)).await.unwrap();

    let response = h.chain.handle(&edited(&ann, &group(), "/stats")).await.unwrap();

    assert_eq!(response, HandlerResponse::Stop);
    assert!(drain(&mut h.calls).is_empty());
    let stat = h.services.query.get_user_stat(1, GROUP_ID).await.unwrap().unwrap();
    assert_eq!(stat.message_count, 1);
    assert_eq!(stat.edited_message_count, 1);
}

/// **Test: /deletelast counts a deletion in groups and refuses in private chats.**
#[tokio::test]
async fn test_deletelast() {
    let mut h = harness(None).await;
    let ann = user(1, "Ann");

    h.chain.handle(&message(&ann, &group(), "/deletelast", None)).await.unwrap();
    h.chain
        .handle(&message(&ann, &Chat::private(1), "/deletelast", None))
        .await
        .unwrap();

    let texts: Vec<String> = drain(&mut h.calls)
        .iter()
        .filter_map(|c| c.text().map(str::to_string))
        .collect();
    assert_eq!(
        texts,
        vec![
            "🗑️ Simulated a message deletion for user Ann.".to_string(),
            "This command only works in groups.".to_string(),
        ]
    );
    let stat = h.services.query.get_user_stat(1, GROUP_ID).await.unwrap().unwrap();
    assert_eq!(stat.deleted_count, 1);
    assert_eq!(stat.message_count, 1);
}

/// **Test: /web is silent in groups and explains itself when no URL is configured.**
#[tokio::test]
async fn test_web_command() {
    let mut h = harness(None).await;
    let ann = user(1, "Ann");

    let in_group = h.chain.handle(&message(&ann, &group(), "/web", None)).await.unwrap();
    assert_eq!(in_group, HandlerResponse::Stop);
    assert!(drain(&mut h.calls).is_empty());

    h.chain
        .handle(&message(&ann, &Chat::private(1), "/web", None))
        .await
        .unwrap();
    let calls = drain(&mut h.calls);
    assert_eq!(calls.len(), 1);
    assert!(calls[0].text().unwrap().contains("not configured"));
}

/// **Test: /leaderboard ranks the group's users by messages.**
#[tokio::test]
async fn test_group_leaderboard() {
    let mut h = harness(None).await;
    let ann = user(1, "Ann");
    let bob = user(2, "Bob");
    for _ in 0..3 {
        h.chain.handle(&message(&bob, &group(), "one two", None)).await.unwrap();
    }
    h.chain.handle(&message(&ann, &group(), "/leaderboard", None)).await.unwrap();

    let calls = drain(&mut h.calls);
    let text = calls[0].text().unwrap();
    assert!(text.starts_with("🏆 <b>Top users in Rustaceans</b>"));
    assert!(text.contains("1. Bob: 3 messages, 6 words"));
    assert!(text.contains("2. Ann: 1 messages, 1 words"));
}

/// **Test: Commands addressed to another bot, and unknown commands, pass through.**
#[tokio::test]
async fn test_foreign_and_unknown_commands_pass_through() {
    let mut h = harness(None).await;
    let ann = user(1, "Ann");

    for text in ["/stats@other_bot", "/frobnicate", "/stats with a caption"] {
        let attachment = text.ends_with("caption").then_some(Attachment::Photo);
        let response = h
            .chain
            .handle(&message(&ann, &group(), text, attachment))
            .await
            .unwrap();
        assert_eq!(response, HandlerResponse::Continue, "{}", text);
    }
    assert!(drain(&mut h.calls).is_empty());

    h.chain
        .handle(&message(&ann, &group(), "/stats@group_stats_bot", None))
        .await
        .unwrap();
    let calls = drain(&mut h.calls);
    assert_eq!(calls.len(), 1);
    assert_ne!(calls[0].text(), Some(GENERIC_FAILURE));
}
