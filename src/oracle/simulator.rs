//! In-memory oracle contract.
//!
//! Behaves like the deployed contract: the instantiator becomes owner, only
//! the owner may update the price, and every call reports the same
//! attributes the chain would emit. Useful offline (`--simulate`) and in
//! tests of code generic over `PriceOracle`.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use crate::blockchain::types::Coin;
use crate::oracle::msg::{ExecuteMsg, InstantiateMsg, PriceResponse, QueryMsg};
use crate::oracle::types::{ContractResponse, OracleError, OracleResult, UpdateReceipt};
use crate::oracle::PriceOracle;

/// Who is calling and what they attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageInfo {
    pub sender: String,
    pub funds: Vec<Coin>,
}

impl MessageInfo {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            funds: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct State {
    owner: String,
    price: u64,
}

/// Contract storage plus entry points.
#[derive(Debug, Default)]
pub struct OracleSimulator {
    state: RwLock<Option<State>>,
}

impl OracleSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instantiate(
        &self,
        info: &MessageInfo,
        msg: InstantiateMsg,
    ) -> OracleResult<ContractResponse> {
        let state = State {
            owner: info.sender.clone(),
            price: msg.price,
        };
        let response = ContractResponse::default()
            .add_attribute("method", "instantiate")
            .add_attribute("owner", &state.owner)
            .add_attribute("price", state.price.to_string());

        *self.state.write().unwrap_or_else(|e| e.into_inner()) = Some(state);
        Ok(response)
    }

    pub fn execute(&self, info: &MessageInfo, msg: ExecuteMsg) -> OracleResult<ContractResponse> {
        match msg {
            ExecuteMsg::UpdatePrice { price } => self.try_update_price(info, price),
        }
    }

    fn try_update_price(&self, info: &MessageInfo, new_price: u64) -> OracleResult<ContractResponse> {
        let mut guard = self.state.write().unwrap_or_else(|e| e.into_inner());
        let state = guard
            .as_mut()
            .ok_or_else(|| OracleError::NotFound("oracle state".into()))?;

        if state.owner != info.sender {
            return Err(OracleError::Unauthorized);
        }

        let old_price = state.price;
        state.price = new_price;

        Ok(ContractResponse::default()
            .add_attribute("method", "try_update_price")
            .add_attribute("owner", &state.owner)
            .add_attribute("old_price", old_price.to_string())
            .add_attribute("new_price", new_price.to_string()))
    }

    /// Answer a query with its JSON encoding, as a contract would.
    pub fn query(&self, msg: QueryMsg) -> OracleResult<Value> {
        match msg {
            QueryMsg::QueryPrice {} => Ok(serde_json::to_value(self.query_price()?)?),
        }
    }

    fn query_price(&self) -> OracleResult<PriceResponse> {
        let guard = self.state.read().unwrap_or_else(|e| e.into_inner());
        let state = guard
            .as_ref()
            .ok_or_else(|| OracleError::NotFound("oracle state".into()))?;
        Ok(PriceResponse { price: state.price })
    }
}

/// `PriceOracle` over a shared simulator, calling as a fixed sender.
#[derive(Debug, Clone)]
pub struct LocalOracle {
    contract: Arc<OracleSimulator>,
    caller: MessageInfo,
}

impl LocalOracle {
    /// Instantiate a fresh simulator owned by `owner`.
    pub fn instantiate(owner: impl Into<String>, price: u64) -> OracleResult<Self> {
        let caller = MessageInfo::new(owner);
        let contract = Arc::new(OracleSimulator::new());
        let response = contract.instantiate(&caller, InstantiateMsg { price })?;

        tracing::debug!(
            owner = response.attribute("owner").unwrap_or_default(),
            price = price,
            "Local oracle instantiated"
        );
        Ok(Self { contract, caller })
    }

    /// Same contract, different sender.
    pub fn as_caller(&self, sender: impl Into<String>) -> Self {
        Self {
            contract: Arc::clone(&self.contract),
            caller: MessageInfo::new(sender),
        }
    }
}

#[async_trait]
impl PriceOracle for LocalOracle {
    async fn query_price(&self) -> OracleResult<PriceResponse> {
        let raw = self.contract.query(QueryMsg::QueryPrice {})?;
        Ok(serde_json::from_value(raw)?)
    }

    async fn update_price(&self, price: u64) -> OracleResult<UpdateReceipt> {
        let response = self
            .contract
            .execute(&self.caller, ExecuteMsg::UpdatePrice { price })?;
        tracing::info!(
            sender = %self.caller.sender,
            old_price = response.attribute("old_price").unwrap_or_default(),
            new_price = price,
            "Local price updated"
        );
        Ok(UpdateReceipt::Local(response))
    }
}
