//! Shared test helpers: an in-memory mock provider and session fixtures.

pub mod test_utils {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::sync::watch;

    use router_dex_sdk::{
        Amount, Error, ExchangeConfig, Pool, SwapProvider, TokenRef, TransactionState, TxHandle,
    };

    /// Install a test subscriber so RUST_LOG surfaces orchestrator tracing
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    pub const ACCOUNT: &str = "0xaccount";
    pub const ROUTER: &str = "0xrouter";
    pub const TOKEN_A: &str = "0xaaaa";
    pub const TOKEN_B: &str = "0xbbbb";
    pub const TOKEN_C: &str = "0xcccc";

    /// A swap submission recorded by the mock provider
    #[derive(Debug, Clone)]
    pub struct SubmittedSwap {
        pub amount_in: Amount,
        pub amount_out_min: Amount,
        pub path: Vec<TokenRef>,
        pub recipient: String,
        pub deadline: i64,
    }

    /// An approval submission recorded by the mock provider
    #[derive(Debug, Clone)]
    pub struct SubmittedApproval {
        pub token: TokenRef,
        pub spender: String,
        pub amount: Amount,
    }

    /// In-memory provider; tests drive transaction outcomes through the
    /// retained watch senders.
    #[derive(Default)]
    pub struct MockProvider {
        pub balances: Mutex<HashMap<String, Amount>>,
        pub allowances: Mutex<HashMap<String, Amount>>,
        pub approvals: Mutex<Vec<SubmittedApproval>>,
        pub swaps: Mutex<Vec<SubmittedSwap>>,
        approve_senders: Mutex<Vec<watch::Sender<TransactionState>>>,
        swap_senders: Mutex<Vec<watch::Sender<TransactionState>>>,
    }

    impl MockProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_balance(&self, token: &str, amount: Amount) {
            self.balances.lock().unwrap().insert(token.to_string(), amount);
        }

        pub fn set_allowance(&self, token: &str, amount: Amount) {
            self.allowances
                .lock()
                .unwrap()
                .insert(token.to_string(), amount);
        }

        /// Sender driving the most recently submitted approval
        pub fn last_approve_sender(&self) -> watch::Sender<TransactionState> {
            self.approve_senders
                .lock()
                .unwrap()
                .last()
                .expect("no approval submitted")
                .clone()
        }

        /// Sender driving the most recently submitted swap
        pub fn last_swap_sender(&self) -> watch::Sender<TransactionState> {
            self.swap_senders
                .lock()
                .unwrap()
                .last()
                .expect("no swap submitted")
                .clone()
        }

        pub fn last_approval(&self) -> SubmittedApproval {
            self.approvals
                .lock()
                .unwrap()
                .last()
                .expect("no approval submitted")
                .clone()
        }

        pub fn last_swap(&self) -> SubmittedSwap {
            self.swaps
                .lock()
                .unwrap()
                .last()
                .expect("no swap submitted")
                .clone()
        }
    }

    #[async_trait]
    impl SwapProvider for MockProvider {
        async fn get_balance(
            &self,
            token: &TokenRef,
            _account: &str,
        ) -> Result<Option<Amount>, Error> {
            Ok(self.balances.lock().unwrap().get(token.as_str()).copied())
        }

        async fn get_allowance(
            &self,
            token: &TokenRef,
            _owner: &str,
            _spender: &str,
        ) -> Result<Option<Amount>, Error> {
            Ok(self.allowances.lock().unwrap().get(token.as_str()).copied())
        }

        async fn submit_approve(
            &self,
            token: &TokenRef,
            spender: &str,
            amount: Amount,
        ) -> Result<TxHandle, Error> {
            self.approvals.lock().unwrap().push(SubmittedApproval {
                token: token.clone(),
                spender: spender.to_string(),
                amount,
            });
            let (tx, handle) = TxHandle::channel();
            self.approve_senders.lock().unwrap().push(tx);
            Ok(handle)
        }

        async fn submit_swap(
            &self,
            amount_in: Amount,
            amount_out_min: Amount,
            path: Vec<TokenRef>,
            recipient: &str,
            deadline: i64,
        ) -> Result<TxHandle, Error> {
            self.swaps.lock().unwrap().push(SubmittedSwap {
                amount_in,
                amount_out_min,
                path,
                recipient: recipient.to_string(),
                deadline,
            });
            let (tx, handle) = TxHandle::channel();
            self.swap_senders.lock().unwrap().push(tx);
            Ok(handle)
        }
    }

    /// Config pointing at the mock router with the default timings
    pub fn test_config() -> ExchangeConfig {
        ExchangeConfig {
            network_name: "goerli".to_string(),
            chain_id: 5,
            rpc_url: "http://localhost:8545".to_string(),
            router_address: ROUTER.to_string(),
            deadline_window_secs: 20 * 60,
            reset_delay_secs: 5,
            tokens: HashMap::new(),
        }
    }

    /// Pools A/B and B/C
    pub fn test_pools() -> Vec<Pool> {
        vec![
            Pool::new("0xpool-ab", TokenRef::from(TOKEN_A), TokenRef::from(TOKEN_B)),
            Pool::new("0xpool-bc", TokenRef::from(TOKEN_B), TokenRef::from(TOKEN_C)),
        ]
    }

    /// Parse at the default 18-decimal scale
    pub fn amt(value: &str) -> Amount {
        Amount::parse(value, 18).unwrap()
    }
}
