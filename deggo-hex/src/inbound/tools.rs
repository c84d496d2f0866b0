//! MCP tool definitions and handlers.

use chrono::SecondsFormat;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use deggo_types::{Currency, Money, PaymentRequest, ProviderId, Recipient};

use crate::Deggo;

pub const SEND_PAYMENT: &str = "send-payment";
pub const CHECK_BALANCE: &str = "check-balance";
pub const TEST_CONNECTIONS: &str = "test-connections";

#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: None,
        }
    }

    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: format!("Error: {}", message),
            }],
            is_error: Some(true),
        }
    }

    /// Text of the first content block.
    pub fn first_text(&self) -> &str {
        match self.content.first() {
            Some(ToolContent::Text { text }) => text,
            None => "",
        }
    }
}

fn provider_schema(description: &str) -> Value {
    json!({
        "type": "string",
        "enum": ProviderId::all().iter().map(|p| p.as_str()).collect::<Vec<_>>(),
        "description": description
    })
}

/// Every tool this server exposes.
pub fn tool_definitions() -> Vec<Tool> {
    vec![
        Tool {
            name: SEND_PAYMENT,
            description: "Send money to a recipient using specified payment provider",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "provider": provider_schema("Payment provider to use"),
                    "amount": {
                        "type": "number",
                        "description": "Amount to send in major currency units"
                    },
                    "currency": {
                        "type": "string",
                        "enum": ["XOF", "XAF", "USD", "EUR"],
                        "default": "XOF",
                        "description": "Currency code"
                    },
                    "recipient_phone": {
                        "type": "string",
                        "description": "Recipient phone number (Senegalese format)"
                    },
                    "recipient_name": {
                        "type": "string",
                        "description": "Recipient name (optional)"
                    },
                    "description": {
                        "type": "string",
                        "description": "Payment description (optional)"
                    },
                    "reference": {
                        "type": "string",
                        "description": "Custom reference for tracking (optional)"
                    }
                },
                "required": ["provider", "amount", "recipient_phone"]
            }),
        },
        Tool {
            name: CHECK_BALANCE,
            description: "Check account balance for a payment provider",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "provider": provider_schema("Payment provider to check"),
                    "account_id": {
                        "type": "string",
                        "description": "Specific account ID (optional)"
                    }
                },
                "required": ["provider"]
            }),
        },
        Tool {
            name: TEST_CONNECTIONS,
            description: "Test connectivity to all configured payment providers",
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
    ]
}

#[derive(Debug, Deserialize)]
struct SendPaymentArgs {
    provider: ProviderId,
    amount: Decimal,
    #[serde(default)]
    currency: Option<Currency>,
    recipient_phone: String,
    #[serde(default)]
    recipient_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    reference: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CheckBalanceArgs {
    provider: ProviderId,
    #[serde(default)]
    account_id: Option<String>,
}

fn parse_args<T: serde::de::DeserializeOwned>(args: Value) -> Result<T, String> {
    serde_json::from_value(args).map_err(|e| format!("Invalid arguments: {}", e))
}

/// Runs a tool. Failures are reported in the result, never raised.
pub async fn call_tool(deggo: &Deggo, name: &str, args: Value) -> ToolResult {
    let outcome = match name {
        SEND_PAYMENT => send_payment(deggo, args).await,
        CHECK_BALANCE => check_balance(deggo, args).await,
        TEST_CONNECTIONS => Ok(test_connections(deggo).await),
        _ => Err(format!("Unknown tool: {}", name)),
    };

    match outcome {
        Ok(text) => ToolResult::text(text),
        Err(message) => {
            tracing::warn!(tool = name, %message, "Tool call failed");
            ToolResult::error(message)
        }
    }
}

async fn send_payment(deggo: &Deggo, args: Value) -> Result<String, String> {
    let args: SendPaymentArgs = parse_args(args)?;

    if args.amount <= Decimal::ZERO {
        return Err("Invalid arguments: amount must be positive".to_string());
    }

    let mut recipient = Recipient::new(args.recipient_phone);
    recipient.name = args.recipient_name;

    let request = PaymentRequest {
        amount: Money::new(args.amount, args.currency.unwrap_or(Currency::XOF)),
        recipient,
        description: args.description,
        reference: args.reference,
        provider: args.provider,
    };

    let result = deggo
        .send_money(&request)
        .await
        .map_err(|e| e.to_string())?;

    Ok(format!(
        "Payment sent successfully!\n\n\
         Transaction ID: {}\n\
         Status: {}\n\
         Amount: {}\n\
         Fees: {}\n\
         Provider: {}\n\
         Timestamp: {}",
        result.transaction_id,
        result.status,
        result.amount,
        result.fees,
        result.provider,
        result.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    ))
}

async fn check_balance(deggo: &Deggo, args: Value) -> Result<String, String> {
    let args: CheckBalanceArgs = parse_args(args)?;

    let result = deggo
        .check_balance(args.provider, args.account_id.as_deref())
        .await
        .map_err(|e| e.to_string())?;

    Ok(format!(
        "Account Balance\n\n\
         Provider: {}\n\
         Balance: {}\n\
         Account ID: {}\n\
         Last Updated: {}",
        result.provider,
        result.balance,
        result.account_id,
        result.last_updated.to_rfc3339_opts(SecondsFormat::Millis, true)
    ))
}

async fn test_connections(deggo: &Deggo) -> String {
    let status_list = deggo
        .test_connections()
        .await
        .into_iter()
        .map(|(provider, ok)| {
            format!(
                "- {}: {}",
                provider,
                if ok { "✓ Connected" } else { "✗ Failed" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("Provider Connection Status\n\n{}", status_list)
}
