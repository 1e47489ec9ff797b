//! Node account provisioning.
//!
//! Runs once the node's RPC endpoint is reachable:
//!
//! 1. list the node's accounts, ignoring the reserved test account
//! 2. create accounts until the target count is reached (fail-fast)
//! 3. list again and unlock every account, collecting per-account failures
//! 4. report all unlock failures together
//!
//! Creation stops at the first error because later creations would fail the
//! same way. Unlocking keeps going so the operator sees every account that
//! could not be unlocked.

use crate::accounts::policy::ProvisioningPolicy;
use crate::accounts::well_known::{is_dev_account, is_reserved_test_account, DEV_ACCOUNT_PASSWORD};
use crate::resolver::ConfigWarning;
use crate::rpc::{AccountRpc, RpcError};
use log::{info, warn};
use std::fmt;

/// A single account that could not be unlocked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockFailure {
    pub address: String,
    pub reason: String,
}

impl fmt::Display for UnlockFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.address, self.reason)
    }
}

/// Provisioning errors; the node keeps running when these occur
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProvisioningError {
    #[error("Failed to list node accounts: {0}")]
    ListFailed(#[source] RpcError),

    #[error("Refusing to create node accounts with a blank password")]
    BlankPasswordForbidden,

    #[error("Failed to create node account: {0}")]
    CreateFailed(#[source] RpcError),

    #[error("Failed to unlock node accounts: {}", join_failures(.0))]
    UnlockFailed(Vec<UnlockFailure>),
}

fn join_failures(failures: &[UnlockFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// What a successful run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisioningReport {
    pub created: Vec<String>,
    pub unlocked: Vec<String>,
}

/// Ensure the policy's accounts exist and are unlocked.
///
/// Without a policy there is nothing to provision and the call succeeds.
pub fn provision<R: AccountRpc + ?Sized>(
    rpc: &R,
    policy: Option<&ProvisioningPolicy>,
    is_development: bool,
) -> Result<ProvisioningReport, ProvisioningError> {
    let Some(policy) = policy else {
        return Ok(ProvisioningReport::default());
    };

    let created = ensure_account_count(rpc, policy)?;
    let unlocked = unlock_all(rpc, policy, is_development)?;

    Ok(ProvisioningReport { created, unlocked })
}

fn managed_accounts<R: AccountRpc + ?Sized>(rpc: &R) -> Result<Vec<String>, ProvisioningError> {
    let accounts = rpc.list_accounts().map_err(ProvisioningError::ListFailed)?;
    Ok(accounts
        .into_iter()
        .filter(|address| !is_reserved_test_account(address))
        .collect())
}

fn ensure_account_count<R: AccountRpc + ?Sized>(
    rpc: &R,
    policy: &ProvisioningPolicy,
) -> Result<Vec<String>, ProvisioningError> {
    let existing = managed_accounts(rpc)?.len();
    if existing >= policy.target_count {
        return Ok(Vec::new());
    }
    if policy.password.is_empty() {
        return Err(ProvisioningError::BlankPasswordForbidden);
    }

    let missing = policy.target_count - existing;
    info!("Creating {} node account(s)", missing);
    let mut created = Vec::with_capacity(missing);
    for _ in 0..missing {
        let address = rpc
            .create_account(&policy.password)
            .map_err(ProvisioningError::CreateFailed)?;
        info!("Created node account {}", address);
        created.push(address);
    }
    Ok(created)
}

fn unlock_all<R: AccountRpc + ?Sized>(
    rpc: &R,
    policy: &ProvisioningPolicy,
    is_development: bool,
) -> Result<Vec<String>, ProvisioningError> {
    let accounts = managed_accounts(rpc)?;
    if policy.password.is_empty() && !accounts.is_empty() {
        warn!("{}", ConfigWarning::BlankUnlockPassword);
    }

    let mut unlocked = Vec::with_capacity(accounts.len());
    let mut failures = Vec::new();
    for address in accounts {
        let password = if is_development && is_dev_account(&address) {
            DEV_ACCOUNT_PASSWORD
        } else {
            policy.password.as_str()
        };

        match rpc.unlock_account(&address, password, policy.unlock_duration) {
            Ok(true) => unlocked.push(address),
            Ok(false) => failures.push(UnlockFailure {
                address,
                reason: "node refused to unlock the account".to_string(),
            }),
            Err(e) => failures.push(UnlockFailure {
                address,
                reason: e.to_string(),
            }),
        }
    }

    if !failures.is_empty() {
        return Err(ProvisioningError::UnlockFailed(failures));
    }
    info!("Unlocked {} node account(s)", unlocked.len());
    Ok(unlocked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::well_known::{DEV_ACCOUNT_ADDRESS, RESERVED_TEST_ACCOUNT_ADDRESS};
    use std::cell::RefCell;
    use std::collections::HashSet;

    /// In-memory node that records every call
    #[derive(Default)]
    struct FakeNode {
        accounts: RefCell<Vec<String>>,
        passwords: RefCell<Vec<(String, String)>>,
        created: RefCell<usize>,
        unlock_calls: RefCell<Vec<(String, String, u64)>>,
        failing_unlocks: HashSet<String>,
        refused_unlocks: HashSet<String>,
        fail_create_after: Option<usize>,
    }

    impl FakeNode {
        fn with_accounts(accounts: &[(&str, &str)]) -> Self {
            let node = Self::default();
            for (address, password) in accounts {
                node.accounts.borrow_mut().push(address.to_string());
                node.passwords.borrow_mut().push((address.to_string(), password.to_string()));
            }
            node
        }

        fn password_of(&self, address: &str) -> Option<String> {
            self.passwords
                .borrow()
                .iter()
                .find(|(a, _)| a.eq_ignore_ascii_case(address))
                .map(|(_, p)| p.clone())
        }
    }

    impl AccountRpc for FakeNode {
        fn list_accounts(&self) -> Result<Vec<String>, RpcError> {
            Ok(self.accounts.borrow().clone())
        }

        fn create_account(&self, password: &str) -> Result<String, RpcError> {
            let n = *self.created.borrow();
            if self.fail_create_after == Some(n) {
                return Err(RpcError::Transport("connection reset".to_string()));
            }
            *self.created.borrow_mut() += 1;
            let address = format!("0x{:040x}", n + 1);
            self.accounts.borrow_mut().push(address.clone());
            self.passwords.borrow_mut().push((address.clone(), password.to_string()));
            Ok(address)
        }

        fn unlock_account(
            &self,
            address: &str,
            password: &str,
            duration_secs: u64,
        ) -> Result<bool, RpcError> {
            self.unlock_calls
                .borrow_mut()
                .push((address.to_string(), password.to_string(), duration_secs));
            if self.failing_unlocks.contains(address) {
                return Err(RpcError::Remote {
                    code: -32000,
                    message: "account not found".to_string(),
                });
            }
            if self.refused_unlocks.contains(address) {
                return Ok(false);
            }
            Ok(self.password_of(address).as_deref() == Some(password))
        }
    }

    fn policy(target_count: usize, password: &str) -> ProvisioningPolicy {
        ProvisioningPolicy {
            target_count,
            password_source: None,
            password: password.to_string(),
            unlock_duration: 0,
        }
    }

    #[test]
    fn test_no_policy_is_noop() {
        let node = FakeNode::default();
        let report = provision(&node, None, false).unwrap();
        assert_eq!(report, ProvisioningReport::default());
        assert!(node.unlock_calls.borrow().is_empty());
    }

    #[test]
    fn test_creates_and_unlocks_target_count() {
        let node = FakeNode::with_accounts(&[(RESERVED_TEST_ACCOUNT_ADDRESS, "internal")]);
        let report = provision(&node, Some(&policy(3, "pw")), false).unwrap();

        assert_eq!(report.created.len(), 3);
        assert_eq!(report.unlocked, report.created);

        let calls = node.unlock_calls.borrow();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|(a, p, d)| !is_reserved_test_account(a) && p == "pw" && *d == 0));
    }

    #[test]
    fn test_existing_accounts_count_towards_target() {
        let node = FakeNode::with_accounts(&[("0xaaa", "pw"), ("0xbbb", "pw")]);
        let report = provision(&node, Some(&policy(3, "pw")), false).unwrap();
        assert_eq!(report.created.len(), 1);
        assert_eq!(report.unlocked.len(), 3);

        let node = FakeNode::with_accounts(&[("0xaaa", "pw"), ("0xbbb", "pw")]);
        let report = provision(&node, Some(&policy(1, "pw")), false).unwrap();
        assert!(report.created.is_empty());
        assert_eq!(report.unlocked, vec!["0xaaa", "0xbbb"]);
    }

    #[test]
    fn test_blank_password_forbids_creation() {
        let node = FakeNode::default();
        let err = provision(&node, Some(&policy(3, "")), false).unwrap_err();
        assert_eq!(err, ProvisioningError::BlankPasswordForbidden);
        assert_eq!(*node.created.borrow(), 0);
        assert!(node.unlock_calls.borrow().is_empty());
    }

    #[test]
    fn test_blank_password_allowed_for_unlock() {
        let node = FakeNode::with_accounts(&[("0xaaa", "")]);
        let report = provision(&node, Some(&policy(1, "")), false).unwrap();
        assert_eq!(report.unlocked, vec!["0xaaa"]);
    }

    #[test]
    fn test_creation_failure_aborts() {
        let node = FakeNode {
            fail_create_after: Some(1),
            ..Default::default()
        };
        let err = provision(&node, Some(&policy(3, "pw")), false).unwrap_err();
        assert!(matches!(err, ProvisioningError::CreateFailed(RpcError::Transport(_))));
        assert_eq!(*node.created.borrow(), 1);
        assert!(node.unlock_calls.borrow().is_empty());
    }

    #[test]
    fn test_development_account_uses_fixed_password() {
        let node = FakeNode::with_accounts(&[(DEV_ACCOUNT_ADDRESS, DEV_ACCOUNT_PASSWORD)]);
        let report = provision(&node, Some(&policy(1, "configured")), true).unwrap();
        assert_eq!(report.unlocked, vec![DEV_ACCOUNT_ADDRESS]);
        assert_eq!(node.unlock_calls.borrow()[0].1, DEV_ACCOUNT_PASSWORD);
    }

    #[test]
    fn test_development_password_only_in_development() {
        let node = FakeNode::with_accounts(&[(DEV_ACCOUNT_ADDRESS, DEV_ACCOUNT_PASSWORD)]);
        let err = provision(&node, Some(&policy(1, "configured")), false).unwrap_err();
        assert!(matches!(err, ProvisioningError::UnlockFailed(ref f) if f.len() == 1));
        assert_eq!(node.unlock_calls.borrow()[0].1, "configured");
    }

    #[test]
    fn test_unlock_failures_are_collected() {
        let mut node =
            FakeNode::with_accounts(&[("0xaaa", "pw"), ("0xbbb", "pw"), ("0xccc", "pw")]);
        node.failing_unlocks.insert("0xbbb".to_string());

        let err = provision(&node, Some(&policy(3, "pw")), false).unwrap_err();
        match &err {
            ProvisioningError::UnlockFailed(failures) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].address, "0xbbb");
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(err.to_string().contains("0xbbb: RPC error -32000: account not found"));

        let attempted: Vec<String> =
            node.unlock_calls.borrow().iter().map(|c| c.0.clone()).collect();
        assert_eq!(attempted, vec!["0xaaa", "0xbbb", "0xccc"]);
    }

    #[test]
    fn test_refused_unlock_is_a_failure() {
        let mut node = FakeNode::with_accounts(&[("0xaaa", "pw"), ("0xbbb", "pw")]);
        node.refused_unlocks.insert("0xaaa".to_string());

        let err = provision(&node, Some(&policy(0, "pw")), false).unwrap_err();
        assert_eq!(
            err,
            ProvisioningError::UnlockFailed(vec![UnlockFailure {
                address: "0xaaa".to_string(),
                reason: "node refused to unlock the account".to_string(),
            }])
        );
        assert_eq!(node.unlock_calls.borrow().len(), 2);
    }

    #[test]
    fn test_reserved_account_is_never_unlocked() {
        let node = FakeNode::with_accounts(&[
            ("0xD119B8B038D3A67D34CA1D46E1898881626A082B", "internal"),
            ("0xaaa", "pw"),
        ]);
        let report = provision(&node, Some(&policy(1, "pw")), false).unwrap();
        assert_eq!(report.unlocked, vec!["0xaaa"]);
        assert_eq!(node.unlock_calls.borrow().len(), 1);
    }

    #[test]
    fn test_unlock_duration_is_passed_through() {
        let node = FakeNode::with_accounts(&[("0xaaa", "pw")]);
        let mut p = policy(1, "pw");
        p.unlock_duration = 300;
        provision(&node, Some(&p), false).unwrap();
        assert_eq!(node.unlock_calls.borrow()[0].2, 300);
    }

    struct BrokenNode;

    impl AccountRpc for BrokenNode {
        fn list_accounts(&self) -> Result<Vec<String>, RpcError> {
            Err(RpcError::Transport("connection refused".to_string()))
        }
        fn create_account(&self, _password: &str) -> Result<String, RpcError> {
            unreachable!()
        }
        fn unlock_account(
            &self,
            _address: &str,
            _password: &str,
            _duration_secs: u64,
        ) -> Result<bool, RpcError> {
            unreachable!()
        }
    }

    #[test]
    fn test_list_failure() {
        let err = provision(&BrokenNode, Some(&policy(1, "pw")), false).unwrap_err();
        assert!(matches!(err, ProvisioningError::ListFailed(_)));
    }
}
