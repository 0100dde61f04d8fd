//! Gateway runtime configuration.
//!
//! Resolved once at process startup and then passed into the gateway and the chain client.
//! Nothing below the binaries reads process-wide environment variables; they call
//! [`GatewayConfig::from_lookup`] with `std::env::var` and hand the result down.

use crate::client::ContractKind;
use crate::constants::*;
use crate::error::{ConfigError, ConfigResult};
use medchain_types::Address;
use std::time::Duration;

/// Addresses of the three deployed contracts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContractAddresses {
    pub hospital: Address,
    pub patient: Address,
    pub records: Address,
}

impl ContractAddresses {
    pub fn get(&self, kind: ContractKind) -> Address {
        match kind {
            ContractKind::Hospital => self.hospital,
            ContractKind::Patient => self.patient,
            ContractKind::Records => self.records,
        }
    }
}

/// Gateway configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    rpc_url: String,
    contracts: ContractAddresses,
    call_timeout: Duration,
    poll_interval: Duration,
    from_account: Option<Address>,
}

impl GatewayConfig {
    /// Create a new `GatewayConfig` with default timings and no preferred account.
    pub fn new(rpc_url: impl Into<String>, contracts: ContractAddresses) -> ConfigResult<Self> {
        let rpc_url = rpc_url.into();
        if rpc_url.trim().is_empty() {
            return Err(ConfigError::Empty { key: ENV_RPC_URL });
        }

        Ok(Self {
            rpc_url,
            contracts,
            call_timeout: Duration::from_secs(DEFAULT_CALL_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            from_account: None,
        })
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_from_account(mut self, account: Option<Address>) -> Self {
        self.from_account = account;
        self
    }

    /// Resolve configuration through `lookup`, which returns the value for a key if set.
    ///
    /// Unset or blank optional keys fall back to their defaults. The three contract
    /// addresses are required.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let address = |key: &'static str| -> ConfigResult<Address> {
            let raw = value(key).ok_or(ConfigError::Missing { key })?;
            Address::parse(&raw).map_err(|source| ConfigError::InvalidAddress { key, source })
        };

        let positive = |key: &'static str, default: u64| -> ConfigResult<u64> {
            match value(key) {
                None => Ok(default),
                Some(raw) => match raw.parse::<u64>() {
                    Ok(n) if n > 0 => Ok(n),
                    _ => Err(ConfigError::InvalidNumber { key, value: raw }),
                },
            }
        };

        let contracts = ContractAddresses {
            hospital: address(ENV_HOSPITAL_CONTRACT)?,
            patient: address(ENV_PATIENT_CONTRACT)?,
            records: address(ENV_RECORDS_CONTRACT)?,
        };

        let from_account = value(ENV_FROM_ACCOUNT)
            .map(|raw| {
                Address::parse(&raw).map_err(|source| ConfigError::InvalidAddress {
                    key: ENV_FROM_ACCOUNT,
                    source,
                })
            })
            .transpose()?;

        let rpc_url = value(ENV_RPC_URL).unwrap_or_else(|| DEFAULT_RPC_URL.to_string());

        Ok(Self::new(rpc_url, contracts)?
            .with_call_timeout(Duration::from_secs(positive(
                ENV_CALL_TIMEOUT_SECS,
                DEFAULT_CALL_TIMEOUT_SECS,
            )?))
            .with_poll_interval(Duration::from_millis(positive(
                ENV_POLL_INTERVAL_MS,
                DEFAULT_POLL_INTERVAL_MS,
            )?))
            .with_from_account(from_account))
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    pub fn contracts(&self) -> &ContractAddresses {
        &self.contracts
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn from_account(&self) -> Option<Address> {
        self.from_account
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const HOSPITAL: &str = "0x1111111111111111111111111111111111111111";
    const PATIENT: &str = "0x2222222222222222222222222222222222222222";
    const RECORDS: &str = "0x3333333333333333333333333333333333333333";

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn base_env() -> HashMap<String, String> {
        env(&[
            (ENV_HOSPITAL_CONTRACT, HOSPITAL),
            (ENV_PATIENT_CONTRACT, PATIENT),
            (ENV_RECORDS_CONTRACT, RECORDS),
        ])
    }

    #[test]
    fn defaults_apply_when_optional_keys_unset() {
        let vars = base_env();
        let cfg = GatewayConfig::from_lookup(|k| vars.get(k).cloned()).expect("valid config");

        assert_eq!(cfg.rpc_url(), DEFAULT_RPC_URL);
        assert_eq!(cfg.call_timeout(), Duration::from_secs(DEFAULT_CALL_TIMEOUT_SECS));
        assert_eq!(cfg.poll_interval(), Duration::from_millis(DEFAULT_POLL_INTERVAL_MS));
        assert_eq!(cfg.from_account(), None);
        assert_eq!(
            cfg.contracts().get(ContractKind::Records),
            Address::parse(RECORDS).expect("address")
        );
    }

    #[test]
    fn overrides_are_honoured() {
        let mut vars = base_env();
        vars.insert(ENV_RPC_URL.into(), "http://node:8545".into());
        vars.insert(ENV_CALL_TIMEOUT_SECS.into(), "5".into());
        vars.insert(ENV_POLL_INTERVAL_MS.into(), "50".into());
        vars.insert(ENV_FROM_ACCOUNT.into(), HOSPITAL.into());

        let cfg = GatewayConfig::from_lookup(|k| vars.get(k).cloned()).expect("valid config");
        assert_eq!(cfg.rpc_url(), "http://node:8545");
        assert_eq!(cfg.call_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.poll_interval(), Duration::from_millis(50));
        assert_eq!(cfg.from_account(), Some(Address::parse(HOSPITAL).expect("address")));
    }

    #[test]
    fn missing_contract_address_is_an_error() {
        let mut vars = base_env();
        vars.remove(ENV_PATIENT_CONTRACT);
        let err = GatewayConfig::from_lookup(|k| vars.get(k).cloned()).expect_err("missing");
        assert!(matches!(err, ConfigError::Missing { key } if key == ENV_PATIENT_CONTRACT));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut vars = base_env();
        vars.insert(ENV_HOSPITAL_CONTRACT.into(), "0x...".into());
        let err = GatewayConfig::from_lookup(|k| vars.get(k).cloned()).expect_err("bad address");
        assert!(matches!(err, ConfigError::InvalidAddress { .. }));

        let mut vars = base_env();
        vars.insert(ENV_CALL_TIMEOUT_SECS.into(), "0".into());
        let err = GatewayConfig::from_lookup(|k| vars.get(k).cloned()).expect_err("zero timeout");
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));
    }
}
