mod utils;

use std::sync::Arc;

use tokio::sync::mpsc;

use router_dex_sdk::{ExchangeEvent, SwapProvider, SyncManager, TokenRef};
use utils::test_utils::{amt, MockProvider, ACCOUNT, ROUTER, TOKEN_A, TOKEN_B};

#[tokio::test(start_paused = true)]
async fn test_sync_emits_balance_and_allowance_events() {
    let provider = Arc::new(MockProvider::new());
    provider.set_balance(TOKEN_A, amt("100"));
    provider.set_allowance(TOKEN_A, amt("25"));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut sync = SyncManager::new(
        tx,
        Arc::clone(&provider) as Arc<dyn SwapProvider>,
        ACCOUNT,
        ROUTER,
        None,
    );
    // targeting before the polling tasks start must not be lost
    sync.set_token(Some(TokenRef::from(TOKEN_A)));
    sync.start_background_sync();

    let mut saw_balance = false;
    let mut saw_allowance = false;
    while !(saw_balance && saw_allowance) {
        match rx.recv().await.unwrap() {
            ExchangeEvent::BalanceRefreshed { token, balance } => {
                assert_eq!(token, TokenRef::from(TOKEN_A));
                assert_eq!(balance, Some(amt("100")));
                saw_balance = true;
            }
            ExchangeEvent::AllowanceRefreshed { token, allowance } => {
                assert_eq!(token, TokenRef::from(TOKEN_A));
                assert_eq!(allowance, Some(amt("25")));
                saw_allowance = true;
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    sync.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_sync_retargets_to_newly_selected_token() {
    let provider = Arc::new(MockProvider::new());
    provider.set_balance(TOKEN_A, amt("100"));
    provider.set_balance(TOKEN_B, amt("7"));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut sync = SyncManager::new(
        tx,
        Arc::clone(&provider) as Arc<dyn SwapProvider>,
        ACCOUNT,
        ROUTER,
        None,
    );
    sync.set_token(Some(TokenRef::from(TOKEN_A)));
    sync.start_background_sync();

    // wait for the first observation of token A, then retarget
    loop {
        if let ExchangeEvent::BalanceRefreshed { token, .. } = rx.recv().await.unwrap() {
            assert_eq!(token, TokenRef::from(TOKEN_A));
            break;
        }
    }
    sync.set_token(Some(TokenRef::from(TOKEN_B)));

    // later polls observe the new token
    loop {
        if let ExchangeEvent::BalanceRefreshed { token, balance } = rx.recv().await.unwrap() {
            if token == TokenRef::from(TOKEN_B) {
                assert_eq!(balance, Some(amt("7")));
                break;
            }
        }
    }

    sync.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_sync_idles_without_a_target_token() {
    let provider = Arc::new(MockProvider::new());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut sync = SyncManager::new(tx, provider, ACCOUNT, ROUTER, None);
    sync.start_background_sync();

    tokio::time::advance(std::time::Duration::from_secs(30)).await;
    assert!(rx.try_recv().is_err());

    sync.shutdown();
}
