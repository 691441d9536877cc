//! JSON messages understood by the oracle contract.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantiateMsg {
    pub price: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    /// Owner-only price replacement.
    UpdatePrice { price: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    QueryPrice {},
}

/// Answer to `QueryMsg::QueryPrice`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceResponse {
    pub price: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_wire_format() {
        assert_eq!(
            serde_json::to_value(QueryMsg::QueryPrice {}).unwrap(),
            json!({ "query_price": {} })
        );
    }

    #[test]
    fn test_execute_wire_format() {
        assert_eq!(
            serde_json::to_string(&ExecuteMsg::UpdatePrice { price: 1234 }).unwrap(),
            r#"{"update_price":{"price":1234}}"#
        );
    }

    #[test]
    fn test_price_response_decodes() {
        let resp: PriceResponse = serde_json::from_value(json!({ "price": 17 })).unwrap();
        assert_eq!(resp.price, 17);
    }

    #[test]
    fn test_unknown_execute_variant_rejected() {
        let result: Result<ExecuteMsg, _> =
            serde_json::from_value(json!({ "set_owner": { "owner": "x" } }));
        assert!(result.is_err());
    }
}
