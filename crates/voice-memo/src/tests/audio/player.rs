use crate::audio::{ExternalPlayer, PlayerCommand};

use std::time::Duration;

use voice_memo_core::{AudioHandle, AudioStatus};

fn shell(script: &str) -> PlayerCommand {
    PlayerCommand {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string(), "sh".to_string()],
    }
}

/// WHAT: Replay runs the player and pause stops it
/// WHY: Status must follow the process so toggling picks the right action
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_long_running_player_when_replaying_and_pausing_then_status_follows() {
    // Given: A player that runs until killed
    let mut player = ExternalPlayer::new("/tmp/memo.wav".into(), shell("sleep 30"));
    assert_eq!(player.status().await, AudioStatus::Idle);

    // When: Starting, then pausing
    player.replay().await.unwrap();
    let while_running = player.status().await;
    player.pause().await.unwrap();

    // Then: Playing, then paused
    assert_eq!(while_running, AudioStatus::Playing);
    assert_eq!(player.status().await, AudioStatus::Paused);
}

/// WHAT: A player process that exits on its own reports Finished
/// WHY: Finished recordings restart from the beginning on the next toggle
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_short_player_when_process_exits_then_finished() {
    // Given: A player that exits immediately
    let mut player = ExternalPlayer::new("/tmp/memo.wav".into(), shell("exit 0"));

    // When: Starting and waiting for it to exit
    player.replay().await.unwrap();
    let mut status = player.status().await;
    for _ in 0..100 {
        if status != AudioStatus::Playing {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        status = player.status().await;
    }

    // Then: Finished
    assert_eq!(status, AudioStatus::Finished);
}

/// WHAT: A missing player program fails to start
/// WHY: The failure must surface instead of reporting Playing
#[tokio::test]
async fn given_missing_program_when_replaying_then_error() {
    // Given: A program that does not exist
    let mut player = ExternalPlayer::new(
        "/tmp/memo.wav".into(),
        PlayerCommand {
            program: "voice-memo-no-such-player".to_string(),
            args: Vec::new(),
        },
    );

    // When / Then
    assert!(player.replay().await.is_err());
    assert_eq!(player.status().await, AudioStatus::Idle);
}
