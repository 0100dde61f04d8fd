//! Caller identity resolution.

use crate::client::ChainClient;
use crate::error::{GatewayError, GatewayResult};
use medchain_types::Address;

/// Resolves the account that authorizes a submission.
///
/// With no preferred account configured this is the first account the node reports. A
/// preferred account is only used if the node reports it, since the node cannot sign for
/// anything else.
#[derive(Clone, Copy, Debug, Default)]
pub struct AccountResolver {
    preferred: Option<Address>,
}

impl AccountResolver {
    pub fn new(preferred: Option<Address>) -> Self {
        Self { preferred }
    }

    pub async fn resolve(&self, client: &dyn ChainClient) -> GatewayResult<Address> {
        let accounts = client.accounts().await.map_err(|e| {
            GatewayError::Unauthenticated(format!("could not list accounts: {e}"))
        })?;

        match self.preferred {
            Some(preferred) if accounts.contains(&preferred) => Ok(preferred),
            Some(preferred) => Err(GatewayError::Unauthenticated(format!(
                "account {preferred} is not available on the node"
            ))),
            None => accounts.first().copied().ok_or_else(|| {
                GatewayError::Unauthenticated("the node reports no accounts".into())
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingClient;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[tokio::test]
    async fn picks_first_account_by_default() {
        let client = RecordingClient::new(vec![addr(1), addr(2)]);
        let resolved = AccountResolver::default().resolve(&client).await;
        assert_eq!(resolved, Ok(addr(1)));
    }

    #[tokio::test]
    async fn honours_available_preferred_account() {
        let client = RecordingClient::new(vec![addr(1), addr(2)]);
        let resolved = AccountResolver::new(Some(addr(2))).resolve(&client).await;
        assert_eq!(resolved, Ok(addr(2)));
    }

    #[tokio::test]
    async fn unavailable_identity_is_unauthenticated() {
        let empty = RecordingClient::new(vec![]);
        assert!(matches!(
            AccountResolver::default().resolve(&empty).await,
            Err(GatewayError::Unauthenticated(_))
        ));

        let other = RecordingClient::new(vec![addr(1)]);
        assert!(matches!(
            AccountResolver::new(Some(addr(9))).resolve(&other).await,
            Err(GatewayError::Unauthenticated(_))
        ));

        let broken = RecordingClient::new(vec![addr(1)]).with_accounts_error("connection refused");
        match AccountResolver::default().resolve(&broken).await {
            Err(GatewayError::Unauthenticated(msg)) => assert!(msg.contains("connection refused")),
            other => panic!("expected Unauthenticated, got {other:?}"),
        }
    }
}
