// # ENUM Name and NAPTR Record Codec
//
// Converts MSISDNs into RFC 6116 domain names and builds the record-set
// changes submitted to the DNS management API.
//
// ## Example
//
// ```text
// MSISDN:    491721234567
// Domain:    e164.arpa
// ENUM name: 7.6.5.4.3.2.1.2.7.1.9.4.e164.arpa.
// NAPTR:     10 10 "u" "E2U+sip" "!^.*$!sip:491721234567@ims.example.org!" .
// ```
//
// ## Wire Shape
//
// `RrsetChange` serializes to one entry of the PowerDNS `rrsets` array:
//
// ```json
// {
//   "name": "7.6.5.4.3.2.1.2.7.1.9.4.e164.arpa.",
//   "type": "NAPTR",
//   "ttl": 3600,
//   "changetype": "REPLACE",
//   "records": [{ "content": "10 10 \"u\" ...", "disabled": false }]
// }
// ```

use serde::Serialize;

use crate::msisdn::normalize;

/// DNS record type managed by this crate
pub const NAPTR: &str = "NAPTR";

/// Build the ENUM domain name for an MSISDN under `domain`
///
/// Digits are reversed, one label per digit, and `domain` is appended as-is.
/// No trailing dot; see [`RrsetChange`] for the API form.
pub fn to_enum_name(msisdn: &str, domain: &str) -> String {
    let digits = normalize(msisdn);
    let mut name = String::with_capacity(digits.len() * 2 + domain.len());

    for digit in digits.chars().rev() {
        name.push(digit);
        name.push('.');
    }
    name.push_str(domain);

    name
}

/// NAPTR ordering parameters shared by every record the engine writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaptrRule {
    pub order: u16,
    pub preference: u16,
}

impl NaptrRule {
    pub fn new(order: u16, preference: u16) -> Self {
        Self { order, preference }
    }

    /// NAPTR content pointing the number at `sip:<digits>@<sip_domain>`
    pub fn content(&self, msisdn: &str, sip_domain: &str) -> String {
        format!(
            r#"{} {} "u" "E2U+sip" "!^.*$!sip:{}@{}!" ."#,
            self.order,
            self.preference,
            normalize(msisdn),
            sip_domain
        )
    }
}

/// Kind of record-set mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    /// Replace every record of the set with the supplied ones
    Replace,
    /// Remove the whole record set
    Delete,
}

/// One record inside a record set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordContent {
    pub content: String,
    pub disabled: bool,
}

/// One record-set mutation for a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RrsetChange {
    /// Fully qualified name, always with trailing dot
    pub name: String,

    #[serde(rename = "type")]
    pub record_type: &'static str,

    /// Only present on additive changes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,

    pub changetype: ChangeType,

    pub records: Vec<RecordContent>,
}

impl RrsetChange {
    /// REPLACE change publishing the NAPTR record for `msisdn`
    pub fn replace(msisdn: &str, domain: &str, sip_domain: &str, rule: NaptrRule, ttl: u32) -> Self {
        Self {
            name: fqdn(msisdn, domain),
            record_type: NAPTR,
            ttl: Some(ttl),
            changetype: ChangeType::Replace,
            records: vec![RecordContent {
                content: rule.content(msisdn, sip_domain),
                disabled: false,
            }],
        }
    }

    /// DELETE change removing the NAPTR set for `msisdn`
    pub fn delete(msisdn: &str, domain: &str) -> Self {
        Self {
            name: fqdn(msisdn, domain),
            record_type: NAPTR,
            ttl: None,
            changetype: ChangeType::Delete,
            records: Vec::new(),
        }
    }
}

fn fqdn(msisdn: &str, domain: &str) -> String {
    let mut name = to_enum_name(msisdn, domain);
    name.push('.');
    name
}
