//! Netze BW energy knowledge base tool (simulated).
//!
//! A domain-specific lookup over a small in-memory knowledge base about a
//! German distribution network operator: tariffs, contacts, company facts.
//! Entries are matched by counting query keyword hits; the entry with the
//! most hits wins.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::types::Payload;

use super::base_tool::{Tool, ToolError};

struct KbEntry {
    keywords: &'static [&'static str],
    data: fn() -> Value,
    summary: &'static str,
}

const KB: &[KbEntry] = &[
    KbEntry {
        keywords: &[
            "electricity price",
            "residential",
            "home",
            "household",
            "strompreis privatkunden",
        ],
        data: || {
            json!({
                "price_kwh_ct": 30.5,
                "base_fee_eur_month": 8.50,
                "tariff_name": "NetzeStrom Privat Plus",
                "valid_from": "2024-01-01",
                "source": "Simulated Netze BW internal document KBP-2024-01A"
            })
        },
        summary: "The current electricity price for residential customers under the \
                  NetzeStrom Privat Plus tariff is 30.5 ct/kWh with a monthly base fee \
                  of 8.50 EUR, valid from January 1, 2024.",
    },
    KbEntry {
        keywords: &["new connection", "contact", "anschluss", "netzanschluss"],
        data: || {
            json!({
                "department": "Netzanschluss-Service",
                "phone": "0800-123-4567",
                "email": "netzanschluss@netze-bw-simulated.de",
                "website_info": "Visit www.netze-bw-simulated.de/netzanschluss for forms and details."
            })
        },
        summary: "For new connections, please contact Netze BW's Netzanschluss-Service at \
                  0800-123-4567 or netzanschluss@netze-bw-simulated.de. Further information \
                  is available on their website.",
    },
    KbEntry {
        keywords: &["about netze bw", "company information", "who is netze bw"],
        data: || {
            json!({
                "full_name": "Netze BW GmbH",
                "role": "Distribution Network Operator (DNO) in Baden-Württemberg, Germany",
                "parent_company": "EnBW Energie Baden-Württemberg AG"
            })
        },
        summary: "Netze BW GmbH is the largest distribution network operator for electricity, \
                  gas, and water in Baden-Württemberg, Germany. It is a subsidiary of EnBW AG.",
    },
];

/// Simulated Netze BW knowledge base lookup.
#[derive(Debug, Clone, Default)]
pub struct EnergyKbTool;

impl EnergyKbTool {
    /// Create the tool.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for EnergyKbTool {
    fn name(&self) -> &str {
        "netz_bw_energy"
    }

    async fn run(&self, input: Payload) -> Result<Payload, ToolError> {
        let query = match input.get("query").and_then(Value::as_str) {
            Some(q) if !q.is_empty() => q.to_string(),
            _ => {
                let mut output = Payload::new();
                output.insert(
                    "error".into(),
                    json!("No query provided for Netze BW knowledge base."),
                );
                output.insert("retrieved_info".into(), Value::Null);
                output.insert("status".into(), json!("Error - No query"));
                output.insert("text_summary".into(), json!("Query was empty."));
                return Ok(output);
            }
        };

        let query_lower = query.to_lowercase();
        let mut best_match: Option<&KbEntry> = None;
        let mut best_score = 0usize;
        for entry in KB {
            let score = entry
                .keywords
                .iter()
                .filter(|kw| query_lower.contains(*kw))
                .count();
            if score > best_score {
                best_score = score;
                best_match = Some(entry);
            }
        }

        let mut output = Payload::new();
        output.insert("query_received".into(), json!(query));
        match best_match {
            Some(entry) => {
                output.insert(
                    "status".into(),
                    json!("Information retrieved from Netze BW knowledge base (simulated)."),
                );
                output.insert("retrieved_info".into(), (entry.data)());
                output.insert("text_summary".into(), json!(entry.summary));
            }
            None => {
                output.insert(
                    "status".into(),
                    json!("No information found in Netze BW knowledge base (simulated)."),
                );
                output.insert("retrieved_info".into(), Value::Null);
                output.insert(
                    "text_summary".into(),
                    json!(format!(
                        "No specific information found in Netze BW knowledge base for query: '{}'",
                        query
                    )),
                );
            }
        }
        Ok(output)
    }
}
